//! Per-root file walkers and the cache that shares them across actions.

pub mod cache;
pub mod filter;
pub mod local_fs;
pub mod random_queue;

pub use cache::WalkerCache;
pub use filter::{glob_match, is_os_hidden_file, should_include_file};
pub use local_fs::LocalFs;
pub use random_queue::{RandomFileQueue, RandomFileQueueFactory};
