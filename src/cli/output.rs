use colored::Colorize;
use std::fmt;
use std::sync::{OnceLock, RwLock};

use crate::{
    core::trend::PeriodComparison,
    currency::{format_amount, format_number, CurrencyCode, LocaleConfig},
    presentation::describe_delta,
};

/// Message categories used by the CLI output helpers.
#[derive(Clone, Copy, PartialEq, Eq)]
pub enum MessageKind {
    Info,
    Warning,
    Error,
    Section,
}

#[derive(Clone, Copy, Debug, Default)]
pub struct OutputPreferences {
    /// No colors or emphasis; one fact per line.
    pub plain_mode: bool,
    /// Suppress anomaly warnings.
    pub quiet_mode: bool,
}

static PREFERENCES: OnceLock<RwLock<OutputPreferences>> = OnceLock::new();

pub fn set_preferences(prefs: OutputPreferences) {
    let lock = PREFERENCES.get_or_init(|| RwLock::new(OutputPreferences::default()));
    if let Ok(mut guard) = lock.write() {
        *guard = prefs;
    }
}

pub fn preferences() -> OutputPreferences {
    PREFERENCES
        .get_or_init(|| RwLock::new(OutputPreferences::default()))
        .read()
        .map(|guard| *guard)
        .unwrap_or_default()
}

fn should_skip(kind: MessageKind, prefs: &OutputPreferences) -> bool {
    prefs.quiet_mode && matches!(kind, MessageKind::Warning)
}

fn label(kind: MessageKind) -> &'static str {
    match kind {
        MessageKind::Warning => "WARNING",
        MessageKind::Error => "ERROR",
        MessageKind::Info | MessageKind::Section => "",
    }
}

pub fn style(kind: MessageKind, message: impl fmt::Display, prefs: &OutputPreferences) -> String {
    let text = message.to_string();
    let formatted = match kind {
        MessageKind::Section => format!("=== {} ===", text.trim()),
        MessageKind::Info => text,
        _ => format!("{}: {}", label(kind), text),
    };

    if prefs.plain_mode {
        return formatted;
    }

    match kind {
        MessageKind::Warning => formatted.bright_yellow().to_string(),
        MessageKind::Error => formatted.bright_red().to_string(),
        MessageKind::Section => formatted.bold().to_string(),
        MessageKind::Info => formatted,
    }
}

pub fn print(kind: MessageKind, message: impl fmt::Display) {
    let prefs = preferences();
    if should_skip(kind, &prefs) {
        return;
    }
    let formatted = style(kind, message, &prefs);
    match kind {
        MessageKind::Section => println!("\n{}", formatted),
        MessageKind::Error | MessageKind::Warning => eprintln!("{}", formatted),
        MessageKind::Info => println!("{}", formatted),
    }
}

pub fn info(message: impl fmt::Display) {
    print(MessageKind::Info, message);
}

pub fn warning(message: impl fmt::Display) {
    print(MessageKind::Warning, message);
}

pub fn error(message: impl fmt::Display) {
    print(MessageKind::Error, message);
}

pub fn section(title: impl fmt::Display) {
    print(MessageKind::Section, title);
}

/// Renders amounts and deltas in the configured currency and locale.
#[derive(Debug, Clone)]
pub struct Formatter {
    currency: CurrencyCode,
    locale: LocaleConfig,
    plain: bool,
}

impl Formatter {
    pub fn new(currency: CurrencyCode, locale: LocaleConfig, plain: bool) -> Self {
        Self {
            currency,
            locale,
            plain,
        }
    }

    pub fn amount(&self, value: f64) -> String {
        format_amount(value, &self.currency, &self.locale)
    }

    /// Whole units with grouping and no symbol, for dense layouts.
    pub fn compact(&self, value: f64) -> String {
        format_number(&self.locale, value, 0)
    }

    pub fn delta(&self, comparison: &PeriodComparison) -> String {
        let text = describe_delta(comparison);
        if self.plain {
            return text;
        }
        match comparison.delta_percentage {
            Some(pct) if pct > 0.0 => text.bright_green().to_string(),
            Some(pct) if pct < 0.0 => text.bright_red().to_string(),
            _ => text.dimmed().to_string(),
        }
    }

    pub fn highlight(&self, text: String) -> String {
        if self.plain {
            text
        } else {
            text.bold().to_string()
        }
    }
}
