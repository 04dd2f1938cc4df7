//! Per-instance identity for actions that carry no value of their own.

use std::sync::atomic::{AtomicU64, Ordering};

static NEXT_TOKEN: AtomicU64 = AtomicU64::new(1);

/// Opaque, process-unique token. Two tokens from separate [`InstanceToken::next`] calls never
/// compare equal; copies of one token do.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct InstanceToken(u64);

impl InstanceToken {
    pub fn next() -> Self {
        Self(NEXT_TOKEN.fetch_add(1, Ordering::Relaxed))
    }

    pub fn get(self) -> u64 {
        self.0
    }
}

/// What an action is compared and hashed by.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum IdentityKey<'a> {
    Url(&'a str),
    Token(InstanceToken),
}
