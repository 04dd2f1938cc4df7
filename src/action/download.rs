//! Fetch one URL; reschedule on temporary failure, drop on fatal.

use log::debug;

use crate::error::DownloadError;

use super::{Action, ActionContext, Control, RandomNextFile};

#[derive(Debug, Clone)]
pub struct Download {
    url: String,
}

impl Download {
    pub fn new(url: impl Into<String>) -> Self {
        Self { url: url.into() }
    }

    pub fn url(&self) -> &str {
        &self.url
    }

    /// Retries are unbounded and immediate. The filler queued ahead of the retry is the only
    /// throttle, so a URL that keeps failing temporarily keeps cycling through the queue.
    pub(super) fn execute(&self, ctx: &ActionContext) -> Control {
        match ctx.downloader.download(&self.url) {
            Ok(()) => {}
            Err(DownloadError::Temporary { reason, .. }) => {
                debug!("retry later: {} ({})", self.url, reason);
                ctx.queue
                    .enqueue(Action::RandomNextFile(RandomNextFile::new(ctx.index.as_ref())));
                ctx.queue.enqueue(Action::Download(self.clone()));
            }
            // Abandoned. The downloader already reported it.
            Err(DownloadError::Fatal { .. }) => {}
        }
        Control::Continue
    }
}
