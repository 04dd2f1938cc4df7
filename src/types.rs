//! Public and internal types for the walkfetch API and runtime.

use std::fmt;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::Duration;

use crate::utils::config::PollConsts;

/// A base location files are discovered under. Identified by its URL string.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct CrawlRoot {
    url: String,
    path: PathBuf,
}

impl CrawlRoot {
    /// Root for a local directory. The URL is the `file://` form of `path` when it is absolute,
    /// otherwise the display string of the path.
    pub fn from_dir(path: impl Into<PathBuf>) -> Self {
        let path = path.into();
        let url = url::Url::from_directory_path(&path)
            .map(String::from)
            .unwrap_or_else(|_| path.display().to_string());
        Self { url, path }
    }

    /// Root with an explicit URL (e.g. test fixtures or remote mirrors mounted at `path`).
    pub fn new(url: impl Into<String>, path: impl Into<PathBuf>) -> Self {
        Self {
            url: url.into(),
            path: path.into(),
        }
    }

    pub fn url(&self) -> &str {
        &self.url
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl fmt::Display for CrawlRoot {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.url)
    }
}

/// Shared handle to a crawl root. The walker cache only ever holds a `Weak` of this.
pub type RootHandle = Arc<CrawlRoot>;

/// Full options (CLI and `.walkfetch.toml`).
#[derive(Clone, Debug)]
pub struct Opts {
    /// Crawl roots (local directories).
    pub roots: Vec<PathBuf>,
    /// Destination directory for fetched files.
    pub dest: PathBuf,
    /// Only drain queued downloads, then exit. Disables idle seeding of discovery work.
    pub download_only: bool,
    /// Explicit URLs to download before anything else.
    pub urls: Vec<String>,
    /// Number of `RandomNextFile` actions queued at startup.
    pub seed: usize,
    /// Override worker thread count. When None, derived from available threads and FD limit.
    pub num_threads: Option<usize>,
    /// Exclude patterns (glob syntax, e.g. `*.tmp`, `node_modules`).
    pub exclude: Vec<String>,
    /// Debug logging.
    pub verbose: bool,
    /// Pause after each termination poll tick.
    pub poll_interval: Duration,
}

impl Default for Opts {
    fn default() -> Self {
        Self {
            roots: Vec::new(),
            dest: PathBuf::from("."),
            download_only: false,
            urls: Vec::new(),
            seed: 0,
            num_threads: None,
            exclude: Vec::new(),
            verbose: false,
            poll_interval: PollConsts::POLL_INTERVAL,
        }
    }
}
