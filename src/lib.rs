//! Walkfetch: action-driven random crawler.
//!
//! Work is a stream of [`Action`]s executed by a worker pool. A [`RandomNextFile`] asks a root's
//! cached walker for the next file and queues a [`Download`]; a download that fails temporarily
//! queues a filler pick plus itself again; in download-only runs a [`CheckDownloadsFinished`]
//! poll watches the queue drain and hands an [`IssueSystemExit`] to the main context.

pub mod action;
pub mod collab;
pub mod engine;
pub mod error;
pub mod index;
pub mod types;
pub mod utils;
pub mod walker;

/// Re-export types for API
pub use action::{
    Action, ActionContext, CheckDownloadsFinished, Control, Download, IssueSystemExit,
    RandomNextFile, new_action,
};
pub use error::{DownloadError, WalkError};
pub use types::*;

/// Result alias used by public walkfetch API
pub use anyhow::Error;
pub type Result<T> = std::result::Result<T, Error>;

/// Build the runtime for `opts` and run it on the calling thread until the queue drains
/// (download-only) or the main context is interrupted.
///
/// ```ignore
/// let opts = walkfetch::Opts {
///     roots: vec!["/srv/mirror".into()],
///     dest: "/tmp/out".into(),
///     download_only: true,
///     seed: 10,
///     ..Default::default()
/// };
/// walkfetch::run(&opts)?;
/// ```
pub fn run(opts: &Opts) -> Result<engine::MainExit> {
    engine::Runtime::new(opts)?.run()
}
