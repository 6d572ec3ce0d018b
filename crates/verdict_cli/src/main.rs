//! CLI smoke entry point.
//!
//! # Responsibility
//! - Provide a minimal executable to verify `verdict_core` linkage.
//! - When `VERDICT_DB_PATH` is set, print a read-only analytics summary.

use std::process::ExitCode;
use verdict_core::db::open_db;
use verdict_core::{
    CaseAnalytics, ChartSeries, SqliteDocumentStore, StoreConfig, SystemClock, VerdictService,
    VerdictStore,
};

fn main() -> ExitCode {
    println!("verdict_core ping={}", verdict_core::ping());
    println!("verdict_core version={}", verdict_core::core_version());

    match run_summary() {
        Ok(()) => ExitCode::SUCCESS,
        Err(message) => {
            eprintln!("error: {message}");
            ExitCode::FAILURE
        }
    }
}

fn run_summary() -> Result<(), String> {
    let config = StoreConfig::from_env().map_err(|err| err.to_string())?;
    let Some(db_path) = config.db_path.as_ref() else {
        return Ok(());
    };

    let conn = open_db(db_path).map_err(|err| err.to_string())?;
    let service = VerdictService::with_edit_policy(
        VerdictStore::from_config(SqliteDocumentStore::new(&conn), &config),
        config.edit_policy,
    );
    let records = service.list_all().map_err(|err| err.to_string())?;
    let analytics = CaseAnalytics::build(&records, &SystemClock);

    println!(
        "collection={} verdicts={}",
        config.verdict_collection, analytics.total
    );
    print_series(&analytics.by_court);
    print_series(&analytics.by_month);
    Ok(())
}

fn print_series(series: &ChartSeries) {
    println!("{}:", series.label);
    for (label, count) in series.labels.iter().zip(&series.counts) {
        println!("  {label}: {count}");
    }
}
