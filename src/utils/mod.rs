pub mod config;
pub mod fd_limit;
pub mod logger;
pub mod walkfetch_toml;

pub use config::*;
pub use fd_limit::{
    FDS_PER_WORKER, determine_threads_given_fd_limit, max_open_fds, max_workers_by_fd_limit,
};
pub use logger::{setup_logging, short_target};
pub use walkfetch_toml::{apply_file_to_opts, config_path_in, load_walkfetch_toml};
