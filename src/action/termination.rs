//! Drain detection for download-only runs, and the exit it triggers.

use log::info;

use super::{Action, ActionContext, Control, InstanceToken};

/// Self-requeuing poll. Each tick is a distinct occurrence so the queue never coalesces two polls.
#[derive(Debug, Clone)]
pub struct CheckDownloadsFinished {
    token: InstanceToken,
}

impl CheckDownloadsFinished {
    pub fn new() -> Self {
        Self {
            token: InstanceToken::next(),
        }
    }

    pub fn token(&self) -> InstanceToken {
        self.token
    }

    pub(super) fn execute(&self, ctx: &ActionContext) -> Control {
        // Can be left over from a run that had download-only enabled. Ignore it.
        if !ctx.download_only() {
            return Control::Continue;
        }
        // The count includes this poll itself, hence <= 1 rather than == 0.
        if ctx.queue.pending_count() <= 1 {
            info!("All downloads finished.");
            ctx.main
                .run_in_main(Action::IssueSystemExit(IssueSystemExit::new()), false);
        } else {
            ctx.queue
                .enqueue(Action::CheckDownloadsFinished(CheckDownloadsFinished::new()));
        }
        Control::Continue
    }
}

impl Default for CheckDownloadsFinished {
    fn default() -> Self {
        Self::new()
    }
}

/// Stops the whole process, not just a worker. Only reached through [`CheckDownloadsFinished`].
#[derive(Debug, Clone)]
pub struct IssueSystemExit {
    token: InstanceToken,
}

impl IssueSystemExit {
    pub fn new() -> Self {
        Self {
            token: InstanceToken::next(),
        }
    }

    pub fn token(&self) -> InstanceToken {
        self.token
    }

    pub(super) fn execute(&self) -> Control {
        info!("Exit now.");
        Control::Exit
    }
}

impl Default for IssueSystemExit {
    fn default() -> Self {
        Self::new()
    }
}
