//! Collaborator seams consumed by actions. Concrete implementations live in [`crate::engine`],
//! [`crate::walker`] and [`crate::index`]; tests substitute recording fakes.

use std::sync::Arc;

use crate::action::Action;
use crate::error::{DownloadError, WalkError};
use crate::types::{CrawlRoot, RootHandle};

/// Shared work queue the executor pulls from.
pub trait WorkQueue: Send + Sync {
    fn enqueue(&self, action: Action);

    /// Queued plus currently executing actions.
    fn pending_count(&self) -> usize;
}

/// Fetches a single URL. Success handling (storing, indexing) is the downloader's job.
///
/// Implementations must classify every failure as [`DownloadError::Temporary`] or
/// [`DownloadError::Fatal`]; there is no other way to fail.
pub trait Downloader: Send + Sync {
    fn download(&self, url: &str) -> Result<(), DownloadError>;
}

/// Process-wide set of crawl roots.
pub trait CrawlIndex: Send + Sync {
    /// Pick a root at random. Thread-safe.
    fn select_random_root(&self) -> RootHandle;
}

/// Filesystem abstraction shared by all enumerators.
pub trait FileSystem: Send + Sync {
    /// List regular files under `root`, recursively, as absolute paths.
    fn list_files(&self, root: &CrawlRoot) -> std::io::Result<Vec<std::path::PathBuf>>;
}

/// Stateful producer of file URLs under one root. Handles its own locking.
pub trait Enumerator: Send + Sync {
    /// `Ok(None)` when the root is empty or exhausted.
    fn next_file(&self) -> Result<Option<String>, WalkError>;
}

/// Builds enumerators for the walker cache.
pub trait EnumeratorFactory: Send + Sync {
    fn create(
        &self,
        root: &CrawlRoot,
        fs: Arc<dyn FileSystem>,
    ) -> Result<Arc<dyn Enumerator>, WalkError>;
}

/// Hands actions to the distinguished main execution context.
pub trait MainDispatcher: Send + Sync {
    /// `wait = false` returns immediately; `wait = true` blocks until the action ran.
    fn run_in_main(&self, action: Action, wait: bool);
}
