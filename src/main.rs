//! Walkfetch CLI: crawl roots at random and fetch files; use --download-only to drain and exit.

use anyhow::Result;
use clap::Parser;
use std::time::Instant;
use walkfetch::engine::arg_parser::Cli;
use walkfetch::engine::handle_run;

fn main() -> Result<()> {
    let start_time = Instant::now();
    let cli = Cli::parse();
    handle_run(&cli)?;
    log::debug!("Total time: {:?}", start_time.elapsed());
    Ok(())
}
