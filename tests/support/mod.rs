//! Recording fakes for the collaborator traits.
#![allow(dead_code)]

use std::collections::VecDeque;
use std::path::PathBuf;
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};

use walkfetch::collab::{
    CrawlIndex, Downloader, Enumerator, EnumeratorFactory, FileSystem, MainDispatcher, WorkQueue,
};
use walkfetch::walker::WalkerCache;
use walkfetch::{Action, ActionContext, CrawlRoot, DownloadError, RootHandle, WalkError};

// --- queue ---

#[derive(Default)]
pub struct RecordingQueue {
    pub enqueued: Mutex<Vec<Action>>,
    pub pending: AtomicUsize,
}

impl RecordingQueue {
    pub fn with_pending(n: usize) -> Self {
        Self {
            enqueued: Mutex::new(Vec::new()),
            pending: AtomicUsize::new(n),
        }
    }

    pub fn take(&self) -> Vec<Action> {
        std::mem::take(&mut *self.enqueued.lock().unwrap())
    }
}

impl WorkQueue for RecordingQueue {
    fn enqueue(&self, action: Action) {
        self.enqueued.lock().unwrap().push(action);
    }

    fn pending_count(&self) -> usize {
        self.pending.load(Ordering::SeqCst)
    }
}

// --- downloader ---

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Outcome {
    Ok,
    Temporary,
    Fatal,
}

pub struct ScriptedDownloader {
    pub outcome: Outcome,
    pub calls: Mutex<Vec<String>>,
}

impl ScriptedDownloader {
    pub fn new(outcome: Outcome) -> Self {
        Self {
            outcome,
            calls: Mutex::new(Vec::new()),
        }
    }
}

impl Downloader for ScriptedDownloader {
    fn download(&self, url: &str) -> Result<(), DownloadError> {
        self.calls.lock().unwrap().push(url.to_string());
        match self.outcome {
            Outcome::Ok => Ok(()),
            Outcome::Temporary => Err(DownloadError::temporary(url, "connection reset")),
            Outcome::Fatal => Err(DownloadError::fatal(url, "gone")),
        }
    }
}

// --- index ---

/// Hands out its roots round-robin so tests are deterministic.
pub struct FixedIndex {
    roots: Vec<RootHandle>,
    next: AtomicUsize,
}

impl FixedIndex {
    pub fn new(roots: Vec<RootHandle>) -> Self {
        Self {
            roots,
            next: AtomicUsize::new(0),
        }
    }

    pub fn single(url: &str) -> Self {
        Self::new(vec![root(url)])
    }
}

impl CrawlIndex for FixedIndex {
    fn select_random_root(&self) -> RootHandle {
        let i = self.next.fetch_add(1, Ordering::SeqCst) % self.roots.len();
        Arc::clone(&self.roots[i])
    }
}

pub fn root(url: &str) -> RootHandle {
    Arc::new(CrawlRoot::new(url, PathBuf::from("/nonexistent")))
}

// --- dispatcher ---

#[derive(Default)]
pub struct RecordingDispatcher {
    pub dispatched: Mutex<Vec<(Action, bool)>>,
}

impl MainDispatcher for RecordingDispatcher {
    fn run_in_main(&self, action: Action, wait: bool) {
        self.dispatched.lock().unwrap().push((action, wait));
    }
}

// --- walkers ---

pub struct NullFs;

impl FileSystem for NullFs {
    fn list_files(&self, _root: &CrawlRoot) -> std::io::Result<Vec<PathBuf>> {
        Ok(Vec::new())
    }
}

/// Scripted `next_file` results, then `Ok(None)` forever.
pub struct ScriptedEnumerator {
    script: Mutex<VecDeque<Result<Option<String>, WalkError>>>,
}

impl ScriptedEnumerator {
    pub fn new(script: Vec<Result<Option<String>, WalkError>>) -> Self {
        Self {
            script: Mutex::new(script.into()),
        }
    }
}

impl Enumerator for ScriptedEnumerator {
    fn next_file(&self) -> Result<Option<String>, WalkError> {
        self.script.lock().unwrap().pop_front().unwrap_or(Ok(None))
    }
}

/// Counts `create` calls; every walker it builds runs the same script.
pub struct CountingFactory {
    pub created: AtomicUsize,
    pub fail: AtomicBool,
    script: Mutex<Option<Vec<Result<Option<String>, WalkError>>>>,
}

impl CountingFactory {
    pub fn new() -> Self {
        Self {
            created: AtomicUsize::new(0),
            fail: AtomicBool::new(false),
            script: Mutex::new(None),
        }
    }

    pub fn scripted(script: Vec<Result<Option<String>, WalkError>>) -> Self {
        let f = Self::new();
        *f.script.lock().unwrap() = Some(script);
        f
    }

    pub fn created(&self) -> usize {
        self.created.load(Ordering::SeqCst)
    }
}

impl EnumeratorFactory for CountingFactory {
    fn create(
        &self,
        root: &CrawlRoot,
        _fs: Arc<dyn FileSystem>,
    ) -> Result<Arc<dyn Enumerator>, WalkError> {
        if self.fail.load(Ordering::SeqCst) {
            return Err(WalkError::Factory {
                root: root.url().to_string(),
                reason: "filesystem unavailable".to_string(),
            });
        }
        self.created.fetch_add(1, Ordering::SeqCst);
        let script = self.script.lock().unwrap().take().unwrap_or_default();
        Ok(Arc::new(ScriptedEnumerator::new(script)))
    }
}

pub fn transient(root: &str) -> WalkError {
    WalkError::TemporarilyUnavailable {
        root: root.to_string(),
        source: std::io::Error::new(std::io::ErrorKind::TimedOut, "nfs timeout"),
    }
}

// --- context ---

pub struct Harness {
    pub queue: Arc<RecordingQueue>,
    pub downloader: Arc<ScriptedDownloader>,
    pub index: Arc<FixedIndex>,
    pub factory: Arc<CountingFactory>,
    pub main: Arc<RecordingDispatcher>,
    pub ctx: ActionContext,
}

impl Harness {
    pub fn new(outcome: Outcome, factory: CountingFactory) -> Self {
        Self::with_queue(RecordingQueue::default(), outcome, factory)
    }

    pub fn with_queue(queue: RecordingQueue, outcome: Outcome, factory: CountingFactory) -> Self {
        let queue = Arc::new(queue);
        let downloader = Arc::new(ScriptedDownloader::new(outcome));
        let index = Arc::new(FixedIndex::single("file:///crawl/a/"));
        let factory = Arc::new(factory);
        let main = Arc::new(RecordingDispatcher::default());
        let walkers = Arc::new(WalkerCache::new(
            Arc::new(NullFs),
            Arc::clone(&factory) as Arc<dyn EnumeratorFactory>,
        ));
        let ctx = ActionContext {
            queue: Arc::clone(&queue) as Arc<dyn WorkQueue>,
            downloader: Arc::clone(&downloader) as Arc<dyn Downloader>,
            index: Arc::clone(&index) as Arc<dyn CrawlIndex>,
            walkers,
            main: Arc::clone(&main) as Arc<dyn MainDispatcher>,
            download_only: Arc::new(AtomicBool::new(true)),
        };
        Self {
            queue,
            downloader,
            index,
            factory,
            main,
            ctx,
        }
    }

    pub fn set_download_only(&self, on: bool) {
        self.ctx.download_only.store(on, Ordering::SeqCst);
    }

    pub fn dispatched(&self) -> Vec<(Action, bool)> {
        self.main.dispatched.lock().unwrap().clone()
    }
}
