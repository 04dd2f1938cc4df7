//! CLI command handler: crawl by default; --download-only drains the given work and exits.

use anyhow::{Context, Result};
use log::{debug, warn};
use std::path::PathBuf;

use crate::Opts;
use crate::engine::arg_parser::Cli;
use crate::engine::main_context::MainExit;
use crate::engine::runtime::Runtime;
use crate::utils::walkfetch_toml::{WalkfetchToml, apply_file_to_opts};
use crate::utils::{config_path_in, load_walkfetch_toml, setup_logging};

/// Defaults < config file < CLI flags.
pub fn build_opts(cli: &Cli, file: Option<&WalkfetchToml>) -> Opts {
    let mut opts = Opts::default();
    if let Some(file) = file {
        apply_file_to_opts(file, &mut opts);
    }
    opts.roots.extend(cli.roots.iter().cloned());
    opts.urls.extend(cli.urls.iter().cloned());
    opts.exclude.extend(cli.exclude.iter().cloned());
    if let Some(ref dest) = cli.dest {
        opts.dest = dest.clone();
    }
    if let Some(v) = cli.download_only {
        opts.download_only = v;
    }
    if let Some(n) = cli.seed {
        opts.seed = n;
    }
    if cli.threads.is_some() {
        opts.num_threads = cli.threads;
    }
    if let Some(v) = cli.verbose {
        opts.verbose = v;
    }
    opts
}

fn config_path(cli: &Cli) -> PathBuf {
    cli.config
        .clone()
        .unwrap_or_else(|| config_path_in(std::path::Path::new(".")))
}

/// Load config, set up logging, run until drained (download-only) or interrupted.
pub fn handle_run(cli: &Cli) -> Result<()> {
    let loaded = load_walkfetch_toml(&config_path(cli));
    let file = loaded.as_ref().ok().and_then(Option::as_ref);
    let opts = build_opts(cli, file);
    setup_logging(opts.verbose);
    if let Err(e) = &loaded {
        warn!("{:#}; using defaults and flags only", e);
    }
    debug!("{} CONFIG:{:#?}", env!("CARGO_PKG_NAME").to_uppercase(), opts);

    let runtime = Runtime::new(&opts)?;
    let handle = runtime.main_handle();
    ctrlc::set_handler(move || handle.interrupt()).context("install Ctrl-C handler")?;

    match runtime.run()? {
        MainExit::Interrupted => warn!("Interrupted"),
        MainExit::Requested | MainExit::Disconnected => {}
    }
    Ok(())
}
