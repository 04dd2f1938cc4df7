mod support;

use std::fs;
use std::sync::{Arc, mpsc};
use std::thread;
use std::time::{Duration, Instant};

use clap::Parser;
use walkfetch::collab::{Downloader, MainDispatcher, WorkQueue};
use walkfetch::engine::{
    Cli, FsDownloader, MainExit, Next, Runtime, TaskQueue, build_opts, hash_file, main_context,
    same_content,
};
use walkfetch::utils::walkfetch_toml::parse_walkfetch_toml;
use walkfetch::{Action, CheckDownloadsFinished, Download, IssueSystemExit, Opts};

fn download(url: &str) -> Action {
    Action::Download(Download::new(url))
}

const SHORT: Duration = Duration::from_millis(10);

// --- TaskQueue ---

#[test]
fn test_queue_coalesces_equal_pending_downloads() {
    let q = TaskQueue::new();
    q.enqueue(download("file:///a"));
    q.enqueue(download("file:///a"));
    q.enqueue(download("file:///b"));
    assert_eq!(q.pending_count(), 2);
}

#[test]
fn test_queue_never_coalesces_polls() {
    let q = TaskQueue::new();
    q.enqueue(Action::CheckDownloadsFinished(CheckDownloadsFinished::new()));
    q.enqueue(Action::CheckDownloadsFinished(CheckDownloadsFinished::new()));
    assert_eq!(q.pending_count(), 2);
}

#[test]
fn test_queue_counts_in_flight_until_dropped() {
    let q = TaskQueue::new();
    q.enqueue(download("file:///a"));
    let running = match q.next(SHORT) {
        Next::Ready(r) => r,
        _ => panic!("expected work"),
    };
    assert_eq!(running.action(), &download("file:///a"));
    assert_eq!(q.queued_len(), 0);
    assert_eq!(q.pending_count(), 1);

    // Popped actions no longer block re-enqueueing the same value.
    q.enqueue(download("file:///a"));
    assert_eq!(q.pending_count(), 2);

    drop(running);
    assert_eq!(q.pending_count(), 1);
}

#[test]
fn test_queue_fifo_order() {
    let q = TaskQueue::new();
    q.enqueue(download("file:///b"));
    q.enqueue(download("file:///a"));
    let first = match q.next(SHORT) {
        Next::Ready(r) => r.action().clone(),
        _ => panic!("expected work"),
    };
    assert_eq!(first, download("file:///b"));
}

#[test]
fn test_queue_idle_and_closed() {
    let q = TaskQueue::new();
    assert!(matches!(q.next(SHORT), Next::Idle));
    q.enqueue(download("file:///a"));
    q.close();
    assert!(matches!(q.next(SHORT), Next::Closed));
    q.enqueue(download("file:///b"));
    assert_eq!(q.pending_count(), 0);
    assert!(q.is_closed());
}

#[test]
fn test_queue_close_wakes_waiter() {
    let q = Arc::new(TaskQueue::new());
    let waiter = {
        let q = Arc::clone(&q);
        thread::spawn(move || matches!(q.next(Duration::from_secs(30)), Next::Closed))
    };
    thread::sleep(Duration::from_millis(50));
    q.close();
    assert!(waiter.join().unwrap());
}

// --- main context ---

#[test]
fn test_main_context_runs_exit_and_returns_requested() {
    let h = support::Harness::new(support::Outcome::Ok, support::CountingFactory::new());
    let (handle, main) = main_context();
    handle.run_in_main(Action::IssueSystemExit(IssueSystemExit::new()), false);
    assert_eq!(main.run(&h.ctx).unwrap(), MainExit::Requested);
}

#[test]
fn test_main_context_interrupt() {
    let h = support::Harness::new(support::Outcome::Ok, support::CountingFactory::new());
    let (handle, main) = main_context();
    handle.interrupt();
    assert_eq!(main.run(&h.ctx).unwrap(), MainExit::Interrupted);
}

#[test]
fn test_main_context_disconnected() {
    let h = support::Harness::new(support::Outcome::Ok, support::CountingFactory::new());
    let (handle, main) = main_context();
    drop(handle);
    assert_eq!(main.run(&h.ctx).unwrap(), MainExit::Disconnected);
}

#[test]
fn test_main_context_wait_blocks_until_run() {
    let h = support::Harness::new(support::Outcome::Ok, support::CountingFactory::new());
    let (handle, main) = main_context();
    let sender = {
        let handle = handle.clone();
        thread::spawn(move || {
            handle.run_in_main(download("file:///a"), true);
            handle.run_in_main(Action::IssueSystemExit(IssueSystemExit::new()), false);
        })
    };
    assert_eq!(main.run(&h.ctx).unwrap(), MainExit::Requested);
    sender.join().unwrap();
    assert_eq!(*h.downloader.calls.lock().unwrap(), ["file:///a"]);
}

// --- FsDownloader ---

fn url_for(p: &std::path::Path) -> String {
    format!("file://{}", p.display())
}

#[test]
fn test_fs_downloader_copies_into_mirror() {
    let src_dir = tempfile::tempdir().unwrap();
    let dest_dir = tempfile::tempdir().unwrap();
    let src = src_dir.path().canonicalize().unwrap().join("doc.txt");
    fs::write(&src, b"hello").unwrap();

    let d = FsDownloader::new(dest_dir.path());
    d.download(&url_for(&src)).unwrap();

    let target = d.target_for(&src);
    assert!(target.starts_with(dest_dir.path()));
    assert_eq!(fs::read(&target).unwrap(), b"hello");
    let leftovers = fs::read_dir(target.parent().unwrap())
        .unwrap()
        .filter_map(|e| e.ok())
        .filter(|e| e.file_name().to_string_lossy().ends_with(".part"))
        .count();
    assert_eq!(leftovers, 0);
    assert!(same_content(&src, &target).unwrap());
}

#[test]
fn test_fs_downloader_second_fetch_is_noop() {
    let src_dir = tempfile::tempdir().unwrap();
    let dest_dir = tempfile::tempdir().unwrap();
    let src = src_dir.path().canonicalize().unwrap().join("doc.txt");
    fs::write(&src, b"hello").unwrap();
    let d = FsDownloader::new(dest_dir.path());
    d.download(&url_for(&src)).unwrap();
    let before = hash_file(&d.target_for(&src)).unwrap();
    d.download(&url_for(&src)).unwrap();
    assert_eq!(hash_file(&d.target_for(&src)).unwrap(), before);
}

#[test]
fn test_fs_downloader_missing_source_is_fatal() {
    let dest_dir = tempfile::tempdir().unwrap();
    let d = FsDownloader::new(dest_dir.path());
    let err = d
        .download("file:///definitely/not/here/walkfetch.bin")
        .unwrap_err();
    assert!(!err.is_temporary());
}

#[test]
fn test_fs_downloader_unsupported_scheme_is_fatal() {
    let dest_dir = tempfile::tempdir().unwrap();
    let d = FsDownloader::new(dest_dir.path());
    let err = d.download("ftp://example.com/x").unwrap_err();
    assert!(!err.is_temporary());
}

#[test]
fn test_download_error_io_classification() {
    use std::io::{Error, ErrorKind};
    use walkfetch::DownloadError;
    assert!(DownloadError::from_io("u", &Error::from(ErrorKind::TimedOut)).is_temporary());
    assert!(DownloadError::from_io("u", &Error::from(ErrorKind::Interrupted)).is_temporary());
    assert!(!DownloadError::from_io("u", &Error::from(ErrorKind::NotFound)).is_temporary());
    assert!(
        !DownloadError::from_io("u", &Error::from(ErrorKind::PermissionDenied)).is_temporary()
    );
}

// --- Runtime (end to end) ---

#[test]
fn test_runtime_download_only_drains_and_exits() {
    let root = tempfile::tempdir().unwrap();
    for name in ["a.txt", "b.txt", "sub/c.txt"] {
        let p = root.path().join(name);
        fs::create_dir_all(p.parent().unwrap()).unwrap();
        fs::write(&p, name.as_bytes()).unwrap();
    }
    let explicit = root.path().canonicalize().unwrap().join("a.txt");
    let dest = tempfile::tempdir().unwrap();

    let opts = Opts {
        roots: vec![root.path().to_path_buf()],
        dest: dest.path().to_path_buf(),
        download_only: true,
        urls: vec![url_for(&explicit)],
        seed: 3,
        num_threads: Some(3),
        poll_interval: Duration::from_millis(5),
        ..Default::default()
    };
    let runtime = Runtime::new(&opts).unwrap();
    let target = FsDownloader::new(dest.path().canonicalize().unwrap()).target_for(&explicit);

    assert_eq!(runtime.run().unwrap(), MainExit::Requested);
    assert_eq!(fs::read(target).unwrap(), b"a.txt");
}

#[test]
fn test_runtime_requires_a_root() {
    let dest = tempfile::tempdir().unwrap();
    let opts = Opts {
        dest: dest.path().to_path_buf(),
        ..Default::default()
    };
    assert!(Runtime::new(&opts).is_err());
}

#[test]
fn test_runtime_crawl_discovers_files_when_idle() {
    let root = tempfile::tempdir().unwrap();
    fs::write(root.path().join("a.txt"), b"a").unwrap();
    let src = root.path().canonicalize().unwrap().join("a.txt");
    let dest = tempfile::tempdir().unwrap();
    let target = FsDownloader::new(dest.path().canonicalize().unwrap()).target_for(&src);
    // No explicit URLs and no seed: idle workers are the only source of work.
    let opts = Opts {
        roots: vec![root.path().to_path_buf()],
        dest: dest.path().to_path_buf(),
        num_threads: Some(2),
        seed: 0,
        ..Default::default()
    };
    let runtime = Runtime::new(&opts).unwrap();
    let handle = runtime.main_handle();
    let stopper = {
        let target = target.clone();
        thread::spawn(move || {
            let deadline = Instant::now() + Duration::from_secs(10);
            while !target.exists() && Instant::now() < deadline {
                thread::sleep(Duration::from_millis(10));
            }
            handle.interrupt();
        })
    };
    assert_eq!(runtime.run().unwrap(), MainExit::Interrupted);
    stopper.join().unwrap();
    assert_eq!(fs::read(&target).unwrap(), b"a");
}

#[test]
fn test_runtime_exit_picked_up_by_worker_stops_run() {
    let root = tempfile::tempdir().unwrap();
    let dest = tempfile::tempdir().unwrap();
    let opts = Opts {
        roots: vec![root.path().to_path_buf()],
        dest: dest.path().to_path_buf(),
        num_threads: Some(1),
        ..Default::default()
    };
    let runtime = Runtime::new(&opts).unwrap();
    runtime
        .context()
        .queue
        .enqueue(Action::IssueSystemExit(IssueSystemExit::new()));

    let (tx, rx) = mpsc::channel();
    let runner = thread::spawn(move || {
        let _ = tx.send(runtime.run().unwrap());
    });
    assert_eq!(
        rx.recv_timeout(Duration::from_secs(10)).unwrap(),
        MainExit::Requested
    );
    runner.join().unwrap();
}

// --- config ---

#[test]
fn test_build_opts_cli_overrides_file() {
    let file = parse_walkfetch_toml(
        r#"
        [settings]
        roots = ["/srv/a"]
        dest = "/tmp/from-file"
        download_only = true
        threads = 4
        seed = 2
        poll_interval_ms = 50
        "#,
    )
    .unwrap();
    let cli = Cli::parse_from(["walkfetch", "/srv/b", "--dest", "/tmp/cli", "-t", "8"]);
    let opts = build_opts(&cli, Some(&file));
    assert_eq!(
        opts.roots,
        vec![
            std::path::PathBuf::from("/srv/a"),
            std::path::PathBuf::from("/srv/b")
        ]
    );
    assert_eq!(opts.dest, std::path::PathBuf::from("/tmp/cli"));
    assert!(opts.download_only);
    assert_eq!(opts.num_threads, Some(8));
    assert_eq!(opts.seed, 2);
    assert_eq!(opts.poll_interval, Duration::from_millis(50));
}

#[test]
fn test_build_opts_flag_without_value_means_true() {
    let cli = Cli::parse_from(["walkfetch", "--download-only", "-u", "file:///x", "-v"]);
    let opts = build_opts(&cli, None);
    assert!(opts.download_only);
    assert!(opts.verbose);
    assert_eq!(opts.urls, vec!["file:///x".to_string()]);
}

#[test]
fn test_log_target_strips_crate_prefix() {
    use walkfetch::utils::short_target;
    assert_eq!(short_target("walkfetch::engine::pool"), "engine::pool");
    assert_eq!(short_target("walkfetch"), "walkfetch");
    assert_eq!(short_target("walkdir"), "walkdir");
}

#[test]
fn test_config_rejects_unknown_keys() {
    assert!(parse_walkfetch_toml("[settings]\nbogus = 1\n").is_err());
    assert!(parse_walkfetch_toml("").is_ok());
}
