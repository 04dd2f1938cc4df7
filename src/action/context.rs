//! Collaborators injected into every action execution.

use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};

use crate::collab::{CrawlIndex, Downloader, MainDispatcher, WorkQueue};
use crate::walker::WalkerCache;

/// Shared context passed to [`Action::execute`](super::Action::execute). Cheap to clone; every
/// field is shared.
#[derive(Clone)]
pub struct ActionContext {
    pub queue: Arc<dyn WorkQueue>,
    pub downloader: Arc<dyn Downloader>,
    pub index: Arc<dyn CrawlIndex>,
    pub walkers: Arc<WalkerCache>,
    pub main: Arc<dyn MainDispatcher>,
    /// Download-only mode. Owned by whoever configured the run; may flip at runtime.
    pub download_only: Arc<AtomicBool>,
}

impl ActionContext {
    pub fn download_only(&self) -> bool {
        self.download_only.load(Ordering::Acquire)
    }
}

/// What the executor should do after an action returns.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Control {
    Continue,
    /// Stop the whole process.
    Exit,
}
