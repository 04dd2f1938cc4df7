//! Random-order file enumerator for one crawl root.

use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex, PoisonError};

use log::{debug, warn};
use rand::seq::SliceRandom;

use crate::collab::{Enumerator, EnumeratorFactory, FileSystem};
use crate::error::{WalkError, is_transient_io};
use crate::types::CrawlRoot;

/// Lists the root lazily on first use, shuffles, then hands out one `file://` URL per call.
///
/// Holds a copy of the root's URL and path, never the [`RootHandle`](crate::RootHandle) itself,
/// so caching a walker does not keep its root alive.
pub struct RandomFileQueue {
    root: CrawlRoot,
    fs: Arc<dyn FileSystem>,
    /// `None` until listed. Shuffled; files are popped from the back.
    pending: Mutex<Option<Vec<PathBuf>>>,
}

impl RandomFileQueue {
    pub fn new(root: &CrawlRoot, fs: Arc<dyn FileSystem>) -> Self {
        Self {
            root: root.clone(),
            fs,
            pending: Mutex::new(None),
        }
    }

    /// Files not yet handed out, or `None` if the root has not been listed yet.
    pub fn remaining(&self) -> Option<usize> {
        self.pending
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .as_ref()
            .map(Vec::len)
    }

    fn list_shuffled(&self) -> Result<Vec<PathBuf>, WalkError> {
        match self.fs.list_files(&self.root) {
            Ok(mut files) => {
                files.shuffle(&mut rand::thread_rng());
                debug!("{}: {} files queued in random order", self.root, files.len());
                Ok(files)
            }
            Err(e) if is_transient_io(&e) => {
                warn!("{}: temporarily unavailable: {}", self.root, e);
                Err(WalkError::TemporarilyUnavailable {
                    root: self.root.url().to_string(),
                    source: e,
                })
            }
            Err(e) => {
                warn!("{}: cannot list, treating as empty: {}", self.root, e);
                Ok(Vec::new())
            }
        }
    }
}

impl Enumerator for RandomFileQueue {
    fn next_file(&self) -> Result<Option<String>, WalkError> {
        let mut pending = self.pending.lock().unwrap_or_else(PoisonError::into_inner);
        if pending.is_none() {
            *pending = Some(self.list_shuffled()?);
        }
        Ok(pending
            .as_mut()
            .and_then(Vec::pop)
            .map(|path| file_url(&path)))
    }
}

fn file_url(path: &Path) -> String {
    url::Url::from_file_path(path)
        .map(String::from)
        .unwrap_or_else(|_| path.display().to_string())
}

/// Factory used by the walker cache in production.
#[derive(Debug, Default, Clone, Copy)]
pub struct RandomFileQueueFactory;

impl EnumeratorFactory for RandomFileQueueFactory {
    fn create(
        &self,
        root: &CrawlRoot,
        fs: Arc<dyn FileSystem>,
    ) -> Result<Arc<dyn Enumerator>, WalkError> {
        Ok(Arc::new(RandomFileQueue::new(root, fs)))
    }
}
