#![doc(test(attr(deny(warnings))))]

//! Income Core turns flat, dated, source-tagged income records into the
//! figures an income dashboard shows: daily and monthly rollups, per-source
//! breakdowns, period comparisons and full-period projections.

pub mod calendar;
pub mod cli;
pub mod config;
pub mod core;
pub mod currency;
pub mod domain;
pub mod errors;
pub mod presentation;
pub mod storage;
pub mod utils;

use std::sync::Once;

static INIT_TRACING: Once = Once::new();

/// Initializes global tracing and emits a startup info log.
pub fn init() {
    INIT_TRACING.call_once(|| {
        utils::init_tracing();
        tracing::info!("Income Core tracing initialized.");
    });
}
