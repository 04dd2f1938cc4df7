use clap::Parser;
use std::path::PathBuf;

/// Sample files from crawl roots at random and fetch them through a worker pool.
#[derive(Clone, Parser)]
#[command(name = "walkfetch")]
#[command(about = "Crawl roots in random order and fetch files; --download-only drains and exits.")]
pub struct Cli {
    /// Crawl roots (directories). Adds to `roots` from the config file.
    #[arg(value_name = "ROOT")]
    pub roots: Vec<PathBuf>,

    /// Destination directory for fetched files. Default: current directory.
    #[arg(long, short)]
    pub dest: Option<PathBuf>,

    /// Fetch the given URLs (and any --seed picks), then exit once the queue drains.
    #[arg(long, short = 'o', num_args = 0..=1, default_missing_value = "true", value_parser = clap::value_parser!(bool))]
    pub download_only: Option<bool>,

    /// URL to download. Can repeat: -u url1 -u url2
    #[arg(long = "url", short = 'u')]
    pub urls: Vec<String>,

    /// Number of random picks queued at startup.
    #[arg(long, short = 's')]
    pub seed: Option<usize>,

    /// Worker thread count. Default: derived from available threads, capped by the FD limit.
    #[arg(long, short = 't')]
    pub threads: Option<usize>,

    /// Exclude patterns (glob syntax). Can specify multiple: -e pattern1 pattern2 pattern3
    #[arg(long, short = 'e', num_args = 1..)]
    pub exclude: Vec<String>,

    /// Verbose output.
    #[arg(long, short = 'v', num_args = 0..=1, default_missing_value = "true", value_parser = clap::value_parser!(bool))]
    pub verbose: Option<bool>,

    /// Config file. Default: `.walkfetch.toml` in the current directory.
    #[arg(long, short = 'c')]
    pub config: Option<PathBuf>,
}
