pub mod output;
pub mod render;

use std::path::PathBuf;

use chrono::NaiveDate;
use clap::{Parser, Subcommand};
use serde::Serialize;

use crate::{
    config::{Config, ConfigManager},
    core::{
        aggregation::TopN,
        anomaly::AnomalyReport,
        services::{PeriodReport, ReportOptions, ReportService},
    },
    domain::{MonthPeriod, SourceCatalog, YearPeriod},
    errors::{IncomeError, Result},
    presentation::{calendar_grid, ranked_sources, stats_card},
    storage::{json_backend::load_catalog_from_path, JsonRecordStore},
    utils::{app_data_dir, build_info},
};

use output::{Formatter, OutputPreferences};

const DEFAULT_RECORDS_FILE: &str = "records.json";
const DEFAULT_CATALOG_FILE: &str = "sources.json";

#[derive(Parser, Debug)]
#[command(name = "income_core_cli")]
#[command(version, long_version = build_info::LONG_VERSION)]
#[command(about = "Income reports from dated, source-tagged records")]
pub struct Cli {
    /// Records file (JSON array); defaults to the configured or home-directory file
    #[arg(long, global = true)]
    pub records: Option<PathBuf>,

    /// Source catalog file (JSON array of sources)
    #[arg(long, global = true)]
    pub catalog: Option<PathBuf>,

    /// Date to treat as today, YYYY-MM-DD
    #[arg(long, global = true, value_parser = parse_date)]
    pub today: Option<NaiveDate>,

    /// Disable colors and emphasis
    #[arg(long, global = true)]
    pub plain: bool,

    /// Print the report as JSON instead of text
    #[arg(long, global = true, conflicts_with = "plain")]
    pub json: bool,

    /// Hide anomaly warnings
    #[arg(short, long, global = true)]
    pub quiet: bool,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Daily calendar, stats and top sources for a month (YYYY-MM)
    Month {
        #[arg(value_parser = parse_month)]
        month: MonthPeriod,
    },
    /// Monthly totals, stats and top sources for a year (YYYY)
    Year {
        #[arg(value_parser = parse_year)]
        year: YearPeriod,
    },
    /// Full source breakdown for a month (YYYY-MM)
    Sources {
        #[arg(value_parser = parse_month)]
        month: MonthPeriod,
    },
}

fn parse_date(raw: &str) -> std::result::Result<NaiveDate, String> {
    NaiveDate::parse_from_str(raw.trim(), "%Y-%m-%d").map_err(|err| err.to_string())
}

fn parse_month(raw: &str) -> std::result::Result<MonthPeriod, String> {
    raw.parse::<MonthPeriod>().map_err(|err| err.to_string())
}

fn parse_year(raw: &str) -> std::result::Result<YearPeriod, String> {
    let year: i32 = raw
        .trim()
        .parse()
        .map_err(|_| format!("`{raw}` is not a year"))?;
    YearPeriod::new(year).map_err(|err| err.to_string())
}

/// Parses the process arguments and runs the requested report.
pub fn run_cli() -> Result<()> {
    run(Cli::parse())
}

pub fn run(cli: Cli) -> Result<()> {
    let config = ConfigManager::new()?.load()?;
    output::set_preferences(OutputPreferences {
        plain_mode: cli.plain || cli.json,
        quiet_mode: cli.quiet || cli.json,
    });
    if cli.plain || cli.json {
        colored::control::set_override(false);
    }

    let calendar = config.calendar()?;
    let today = cli.today.unwrap_or_else(|| calendar.today());
    let store = JsonRecordStore::new(records_path(&cli, &config));
    let catalog = load_catalog(&cli, &config)?;
    let options = ReportOptions::new(calendar, today).with_top_sources(config.top_n());
    let fmt = Formatter::new(
        config.currency_code(),
        config.locale_config(),
        cli.plain || cli.json,
    );
    tracing::debug!(path = %store.path().display(), %today, "running report command");

    match cli.command {
        Command::Month { month } => {
            let outcome = ReportService::monthly(&store, &catalog, month, &options)?;
            if cli.json {
                return print_json(&outcome);
            }
            let report = outcome.value();
            output::section(month.first_day().format("%B %Y"));
            print_lines(render::headline(&stats_card(report), &fmt));
            output::section("Calendar");
            let grid = calendar_grid(report, config.first_weekday);
            print_lines(render::calendar_lines(&grid, &fmt));
            print_sources(report, &catalog, options.top_sources, &fmt);
            warn_anomalies(&report.anomalies, &fmt);
        }
        Command::Year { year } => {
            let outcome = ReportService::yearly(&store, &catalog, year, &options)?;
            if cli.json {
                return print_json(&outcome);
            }
            let report = outcome.value();
            output::section(year);
            print_lines(render::headline(&stats_card(report), &fmt));
            output::section("Months");
            let best = report.summary.best_bucket.map(|best| best.key);
            print_lines(render::month_lines(&report.monthly, best, &fmt));
            print_sources(report, &catalog, options.top_sources, &fmt);
            warn_anomalies(&report.anomalies, &fmt);
        }
        Command::Sources { month } => {
            let outcome = ReportService::monthly(&store, &catalog, month, &options)?;
            let ranked = ranked_sources(outcome.value(), &catalog, TopN::All);
            if cli.json {
                return print_json(&ranked);
            }
            let report = outcome.value();
            output::section(format!("Sources, {}", month.first_day().format("%B %Y")));
            print_lines(render::ranking_lines(
                &ranked,
                report.summary.unresolved_total,
                &fmt,
            ));
            warn_anomalies(&report.anomalies, &fmt);
        }
    }
    Ok(())
}

fn records_path(cli: &Cli, config: &Config) -> PathBuf {
    cli.records
        .clone()
        .or_else(|| config.records_path.clone())
        .unwrap_or_else(|| app_data_dir().join(DEFAULT_RECORDS_FILE))
}

/// Loads the catalog named on the command line or in the config.
///
/// Without either, the default file is optional and an empty catalog is used,
/// which leaves every record uncategorized.
fn load_catalog(cli: &Cli, config: &Config) -> Result<SourceCatalog> {
    if let Some(path) = cli.catalog.as_ref().or(config.catalog_path.as_ref()) {
        return Ok(load_catalog_from_path(path)?);
    }
    let fallback = app_data_dir().join(DEFAULT_CATALOG_FILE);
    if fallback.exists() {
        Ok(load_catalog_from_path(&fallback)?)
    } else {
        tracing::info!("no source catalog found, reporting without source names");
        Ok(SourceCatalog::default())
    }
}

fn print_lines(lines: Vec<String>) {
    for line in lines {
        output::info(line);
    }
}

fn print_sources(
    report: &dyn PeriodReport,
    catalog: &SourceCatalog,
    limit: TopN,
    fmt: &Formatter,
) {
    output::section("Top sources");
    let ranked = ranked_sources(report, catalog, limit);
    print_lines(render::ranking_lines(
        &ranked,
        report.summary().unresolved_total,
        fmt,
    ));
}

fn warn_anomalies(report: &AnomalyReport, fmt: &Formatter) {
    for line in render::anomaly_lines(report, fmt) {
        output::warning(line);
    }
}

fn print_json<T: Serialize>(value: &T) -> Result<()> {
    let json = serde_json::to_string_pretty(value).map_err(IncomeError::from)?;
    println!("{json}");
    Ok(())
}
