//! Pull the next file from a root's walker and queue it for download.

use anyhow::Result;
use log::trace;

use crate::collab::CrawlIndex;
use crate::error::WalkError;
use crate::types::RootHandle;

use super::{Action, ActionContext, Control, Download};

#[derive(Clone)]
pub struct RandomNextFile {
    root: RootHandle,
}

impl RandomNextFile {
    /// The root is sampled once here and stays fixed for this instance.
    pub fn new(index: &dyn CrawlIndex) -> Self {
        Self {
            root: index.select_random_root(),
        }
    }

    pub fn with_root(root: RootHandle) -> Self {
        Self { root }
    }

    pub fn root(&self) -> &RootHandle {
        &self.root
    }

    pub(super) fn execute(&self, ctx: &ActionContext) -> Result<Control> {
        let walker = ctx.walkers.get_or_create(&self.root)?;
        match walker.next_file() {
            Ok(Some(url)) => ctx.queue.enqueue(Action::Download(Download::new(url))),
            Ok(None) => trace!("{} has nothing left", self.root),
            // The walker logged it; skip this tick.
            Err(WalkError::TemporarilyUnavailable { .. }) => {}
            Err(e) => return Err(e.into()),
        }
        Ok(Control::Continue)
    }
}

// Which root doesn't matter for the repr; a fresh instance samples another one.
impl std::fmt::Debug for RandomNextFile {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str("RandomNextFile()")
    }
}
