//! Queueable units of work.
//!
//! An [`Action`] runs to completion on a worker and may enqueue follow-up actions; it never waits
//! on another action. Equality, hashing and ordering follow one rule set so any queue can dedup or
//! sort them:
//!
//! - [`Download`] and [`RandomNextFile`] compare by value (URL, root URL).
//! - [`CheckDownloadsFinished`] and [`IssueSystemExit`] compare by [`InstanceToken`]; two separately
//!   built instances are never equal.
//! - Different kinds are never equal and order by kind name.

mod context;
mod download;
mod identity;
mod random_next_file;
mod termination;

use std::cmp::Ordering;
use std::fmt;
use std::hash::{Hash, Hasher};

use anyhow::Result;

pub use context::{ActionContext, Control};
pub use download::Download;
pub use identity::{IdentityKey, InstanceToken};
pub use random_next_file::RandomNextFile;
pub use termination::{CheckDownloadsFinished, IssueSystemExit};

#[derive(Clone)]
pub enum Action {
    Download(Download),
    RandomNextFile(RandomNextFile),
    CheckDownloadsFinished(CheckDownloadsFinished),
    IssueSystemExit(IssueSystemExit),
}

impl Action {
    /// Variant name; also the cross-kind ordering key.
    pub fn kind(&self) -> &'static str {
        match self {
            Action::Download(_) => "Download",
            Action::RandomNextFile(_) => "RandomNextFile",
            Action::CheckDownloadsFinished(_) => "CheckDownloadsFinished",
            Action::IssueSystemExit(_) => "IssueSystemExit",
        }
    }

    pub fn identity(&self) -> IdentityKey<'_> {
        match self {
            Action::Download(a) => IdentityKey::Url(a.url()),
            Action::RandomNextFile(a) => IdentityKey::Url(a.root().url()),
            Action::CheckDownloadsFinished(a) => IdentityKey::Token(a.token()),
            Action::IssueSystemExit(a) => IdentityKey::Token(a.token()),
        }
    }

    /// Termination polls; the executor may pace these.
    pub fn is_poll(&self) -> bool {
        matches!(self, Action::CheckDownloadsFinished(_))
    }

    /// Actions that must execute in the main context, never on a worker.
    pub fn main_only(&self) -> bool {
        matches!(self, Action::IssueSystemExit(_))
    }

    /// Run the action. Only failures nobody classified (walker construction) come back as `Err`.
    pub fn execute(&self, ctx: &ActionContext) -> Result<Control> {
        match self {
            Action::Download(a) => Ok(a.execute(ctx)),
            Action::RandomNextFile(a) => a.execute(ctx),
            Action::CheckDownloadsFinished(a) => Ok(a.execute(ctx)),
            Action::IssueSystemExit(a) => Ok(a.execute()),
        }
    }
}

/// The sole source of new discovery work: one `RandomNextFile` on a freshly sampled root.
pub fn new_action(ctx: &ActionContext) -> Action {
    Action::RandomNextFile(RandomNextFile::new(ctx.index.as_ref()))
}

impl PartialEq for Action {
    fn eq(&self, other: &Self) -> bool {
        self.kind() == other.kind() && self.identity() == other.identity()
    }
}

impl Eq for Action {}

impl Hash for Action {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.kind().hash(state);
        self.identity().hash(state);
    }
}

impl Ord for Action {
    fn cmp(&self, other: &Self) -> Ordering {
        self.kind()
            .cmp(other.kind())
            .then_with(|| self.identity().cmp(&other.identity()))
    }
}

impl PartialOrd for Action {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl fmt::Display for Action {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Action::Download(a) => write!(f, "Download({:?})", a.url()),
            Action::RandomNextFile(a) => write!(f, "RandomNextFile{{{:?}}}", a.root().url()),
            Action::CheckDownloadsFinished(_) => f.write_str("CheckDownloadsFinished()"),
            Action::IssueSystemExit(_) => f.write_str("IssueSystemExit()"),
        }
    }
}

impl fmt::Debug for Action {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Action::Download(a) => write!(f, "Download({:?})", a.url()),
            Action::RandomNextFile(a) => fmt::Debug::fmt(a, f),
            Action::CheckDownloadsFinished(_) => f.write_str("CheckDownloadsFinished()"),
            Action::IssueSystemExit(_) => f.write_str("IssueSystemExit()"),
        }
    }
}
