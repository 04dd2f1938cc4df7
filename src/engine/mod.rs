//! Runtime: queue, worker pool, main context, local downloader and the CLI around them.

pub mod arg_parser;
pub mod cli;
pub mod downloader;
pub mod hashing;
pub mod main_context;
pub mod pool;
pub mod queue;
pub mod runtime;

// Re-export commonly used items
pub use arg_parser::Cli;
pub use cli::{build_opts, handle_run};
pub use downloader::FsDownloader;
pub use hashing::{hash_file, same_content};
pub use main_context::{MainContext, MainExit, MainHandle, main_context};
pub use pool::{PoolSettings, join_workers, spawn_workers};
pub use queue::{Next, Running, TaskQueue};
pub use runtime::Runtime;
