//! Classified failures reported by collaborators.
//!
//! Actions resolve these locally (reschedule, skip or drop); nothing here bubbles out of an
//! action except [`WalkError::Factory`].

use std::io;

use thiserror::Error;

/// Outcome of a failed download. There is intentionally no third variant: a downloader that
/// cannot classify a failure as one of these two is violating its contract and must report it
/// through its own channel (log, panic) instead of returning it.
#[derive(Debug, Error)]
pub enum DownloadError {
    /// Transient failure (network hiccup, busy storage). The download is retried.
    #[error("temporary failure downloading {url}: {reason}")]
    Temporary { url: String, reason: String },

    /// The download can never succeed. The URL is abandoned.
    #[error("fatal failure downloading {url}: {reason}")]
    Fatal { url: String, reason: String },
}

impl DownloadError {
    pub fn temporary(url: impl Into<String>, reason: impl ToString) -> Self {
        Self::Temporary {
            url: url.into(),
            reason: reason.to_string(),
        }
    }

    pub fn fatal(url: impl Into<String>, reason: impl ToString) -> Self {
        Self::Fatal {
            url: url.into(),
            reason: reason.to_string(),
        }
    }

    pub fn is_temporary(&self) -> bool {
        matches!(self, Self::Temporary { .. })
    }

    /// Classify an IO error: interruptions and timeouts are temporary, everything else is fatal.
    pub fn from_io(url: impl Into<String>, err: &io::Error) -> Self {
        if is_transient_io(err) {
            Self::temporary(url, err)
        } else {
            Self::fatal(url, err)
        }
    }
}

/// Failures from the walker layer.
#[derive(Debug, Error)]
pub enum WalkError {
    /// Storage under the root is temporarily inaccessible. Already logged by the enumerator.
    #[error("{root} temporarily unavailable: {source}")]
    TemporarilyUnavailable {
        root: String,
        #[source]
        source: io::Error,
    },

    /// The enumerator for a root could not be built. Never cached.
    #[error("cannot create walker for {root}: {reason}")]
    Factory { root: String, reason: String },
}

/// IO error kinds that are worth retrying.
pub fn is_transient_io(err: &io::Error) -> bool {
    matches!(
        err.kind(),
        io::ErrorKind::Interrupted
            | io::ErrorKind::TimedOut
            | io::ErrorKind::WouldBlock
            | io::ErrorKind::ConnectionReset
            | io::ErrorKind::ConnectionAborted
            | io::ErrorKind::NotConnected
            | io::ErrorKind::BrokenPipe
            | io::ErrorKind::UnexpectedEof
    )
}
