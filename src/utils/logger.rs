//! Console logging for the CLI. Library callers install their own `log` backend.

use colored::Colorize;
use env_logger::Builder;
use log::{Level, LevelFilter, Record};
use std::io::Write;

const CRATE: &str = env!("CARGO_PKG_NAME");

/// Install the global logger. `verbose` enables per-action debug lines (`main: Download{..}`,
/// walker listings, skipped fetches). Later calls are no-ops.
pub fn setup_logging(verbose: bool) {
    let level = if verbose {
        LevelFilter::Debug
    } else {
        LevelFilter::Info
    };

    let _ = Builder::from_default_env()
        .filter_level(LevelFilter::Warn)
        .filter_module(CRATE, level)
        .format(|buf, record| writeln!(buf, "{}", format_record(record)))
        .try_init();
}

fn format_record(record: &Record) -> String {
    let tag = CRATE.cyan();
    match record.level() {
        Level::Error => format!("[{} {}] {}", tag, "ERROR".red(), record.args()),
        Level::Warn => format!(
            "[{} {} {}] {}",
            tag,
            "WARN".yellow(),
            short_target(record.target()).white(),
            record.args()
        ),
        Level::Info => format!("[{}] {}", tag, record.args()),
        Level::Debug | Level::Trace => format!(
            "[{} {}] {}",
            tag,
            short_target(record.target()).dimmed(),
            record.args()
        ),
    }
}

/// `walkfetch::engine::pool` → `engine::pool`; foreign targets are left alone.
pub fn short_target(target: &str) -> &str {
    target
        .strip_prefix(CRATE)
        .and_then(|rest| rest.strip_prefix("::"))
        .unwrap_or(target)
}
