//! Application configuration constants.
//! Tuning and thresholds in one place.

use std::sync::OnceLock;
use std::time::Duration;

// ---- Package / paths (from CARGO_PKG_NAME, cached) ----

/// Package-derived names: built once from `CARGO_PKG_NAME`, then cached.
pub struct PackagePaths {
    pkg_name: &'static str,
    config_filename: String,
}

static PACKAGE_PATHS: OnceLock<PackagePaths> = OnceLock::new();

impl PackagePaths {
    /// Build and cache names from `CARGO_PKG_NAME`. Called once on first use.
    pub fn get() -> &'static PackagePaths {
        PACKAGE_PATHS.get_or_init(|| {
            let pkg = env!("CARGO_PKG_NAME");
            PackagePaths {
                pkg_name: pkg,
                config_filename: format!(".{pkg}.toml"),
            }
        })
    }

    pub fn pkg_name(&self) -> &str {
        self.pkg_name
    }

    /// `.walkfetch.toml`
    pub fn config_filename(&self) -> &str {
        &self.config_filename
    }

    /// Partial downloads; never handed out by a walker.
    pub fn default_exclude_patterns(&self) -> Vec<String> {
        vec!["*.part".to_string()]
    }
}

// ---- Worker threads ----

/// Thread limits for the worker pool.
/// Use [`WorkerThreadLimits::current()`] to fill `all_threads` from rayon; the rest are const.
#[derive(Clone, Copy, Debug)]
pub struct WorkerThreadLimits {
    /// Available threads (from rayon); set by [`WorkerThreadLimits::current()`].
    pub all_threads: usize,
    /// Floor / minimum.
    pub floor: usize,
    /// Default cap when no override is given. Workers mostly block on IO, but the walker cache
    /// lock is shared, so more is not always better.
    pub default_max: usize,
}

impl Default for WorkerThreadLimits {
    fn default() -> Self {
        Self {
            all_threads: 0, // use current() to set from rayon
            floor: Self::FLOOR_THREADS,
            default_max: Self::DEFAULT_MAX_THREADS,
        }
    }
}

impl WorkerThreadLimits {
    pub const FLOOR_THREADS: usize = 2;
    pub const DEFAULT_MAX_THREADS: usize = 16;

    /// Build limits with `all_threads` set from `rayon::current_num_threads()`.
    pub fn current() -> Self {
        Self {
            all_threads: rayon::current_num_threads(),
            ..Self::default()
        }
    }

    /// Worker count when the user gave none.
    pub fn default_workers(&self) -> usize {
        self.all_threads.clamp(self.floor, self.default_max)
    }
}

// ---- Polling ----

/// Scheduling pace for idle workers and termination polls.
pub struct PollConsts;

impl PollConsts {
    /// Pause after each `CheckDownloadsFinished` tick.
    pub const POLL_INTERVAL: Duration = Duration::from_millis(200);
    /// How long an idle worker waits for work before seeding a new action.
    pub const IDLE_TIMEOUT: Duration = Duration::from_millis(100);
}

// ---- Hashing ----

/// Hashing I/O thresholds and buffer sizes.
pub struct HashingConsts;

impl HashingConsts {
    /// File size above which hashing uses memory-mapped I/O (bytes). 100 MB.
    pub const HASH_MMAP_THRESHOLD: u64 = 100 * 1024 * 1024;
    /// Chunk size for reading files below mmap threshold (bytes). 1 MB.
    pub const HASH_READ_CHUNK_SIZE: usize = 1024 * 1024;
}
