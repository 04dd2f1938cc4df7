//! Wire the concrete collaborators together and run a crawl.

use anyhow::{Context, Result};
use log::{debug, info};
use std::sync::Arc;
use std::sync::atomic::AtomicBool;

use crate::Opts;
use crate::action::{Action, ActionContext, CheckDownloadsFinished, Download, new_action};
use crate::collab::{FileSystem, WorkQueue};
use crate::engine::downloader::FsDownloader;
use crate::engine::main_context::{MainContext, MainExit, MainHandle, main_context};
use crate::engine::pool::{PoolSettings, join_workers, spawn_workers};
use crate::engine::queue::TaskQueue;
use crate::index::RootIndex;
use crate::utils::config::{PackagePaths, PollConsts, WorkerThreadLimits};
use crate::utils::fd_limit::determine_threads_given_fd_limit;
use crate::walker::{LocalFs, RandomFileQueueFactory, WalkerCache};

/// A fully wired crawl. Build with [`Runtime::new`], grab [`Runtime::main_handle`] for signal
/// handlers, then [`Runtime::run`] on the main thread.
pub struct Runtime {
    ctx: ActionContext,
    queue: Arc<TaskQueue>,
    main_handle: MainHandle,
    main: MainContext,
    settings: PoolSettings,
}

impl Runtime {
    pub fn new(opts: &Opts) -> Result<Self> {
        std::fs::create_dir_all(&opts.dest)
            .with_context(|| format!("create destination {}", opts.dest.display()))?;
        let dest = opts
            .dest
            .canonicalize()
            .with_context(|| format!("canonicalize destination {}", opts.dest.display()))?;

        let index = Arc::new(RootIndex::from_dirs(&opts.roots)?);

        let mut exclude = PackagePaths::get().default_exclude_patterns();
        exclude.extend(opts.exclude.iter().cloned());
        let fs: Arc<dyn FileSystem> = Arc::new(LocalFs::new(exclude).skip_dir(&dest));
        let walkers = Arc::new(WalkerCache::new(fs, Arc::new(RandomFileQueueFactory)));

        let queue = Arc::new(TaskQueue::new());
        let (main_handle, main) = main_context();

        let ctx = ActionContext {
            queue: Arc::clone(&queue) as Arc<dyn WorkQueue>,
            downloader: Arc::new(FsDownloader::new(dest)),
            index,
            walkers,
            main: Arc::new(main_handle.clone()),
            download_only: Arc::new(AtomicBool::new(opts.download_only)),
        };

        let wanted = opts
            .num_threads
            .unwrap_or_else(|| WorkerThreadLimits::current().default_workers());
        let settings = PoolSettings {
            num_threads: determine_threads_given_fd_limit(wanted),
            idle_timeout: PollConsts::IDLE_TIMEOUT,
            poll_interval: opts.poll_interval,
        };

        let runtime = Self {
            ctx,
            queue,
            main_handle,
            main,
            settings,
        };
        runtime.seed(opts);
        Ok(runtime)
    }

    /// Explicit downloads first, then random picks, then the drain poll (download-only runs).
    fn seed(&self, opts: &Opts) {
        let queue = &self.ctx.queue;
        for url in &opts.urls {
            queue.enqueue(Action::Download(Download::new(url.clone())));
        }
        for _ in 0..opts.seed {
            queue.enqueue(new_action(&self.ctx));
        }
        if opts.download_only {
            queue.enqueue(Action::CheckDownloadsFinished(CheckDownloadsFinished::new()));
        }
        debug!("seeded {} actions", self.queue.queued_len());
    }

    pub fn main_handle(&self) -> MainHandle {
        self.main_handle.clone()
    }

    pub fn context(&self) -> &ActionContext {
        &self.ctx
    }

    pub fn queue(&self) -> &Arc<TaskQueue> {
        &self.queue
    }

    /// Run workers and drain the main context on the calling thread. Returns once an exit was
    /// requested or the run was interrupted; workers are stopped and joined before returning.
    pub fn run(self) -> Result<MainExit> {
        info!(
            "Starting {} workers ({})",
            self.settings.num_threads,
            if self.ctx.download_only() {
                "download-only"
            } else {
                "crawl"
            }
        );
        let workers = spawn_workers(&self.queue, &self.ctx, &self.settings);
        let exit = self.main.run(&self.ctx);
        self.queue.close();
        join_workers(workers);
        exit
    }
}
