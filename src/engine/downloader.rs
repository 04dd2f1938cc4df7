//! Local [`Downloader`]: copies `file://` URLs into a destination tree.

use std::fs;
use std::path::{Component, Path, PathBuf};
use std::sync::atomic::{AtomicU64, Ordering};

use log::{debug, warn};

use crate::collab::Downloader;
use crate::engine::hashing::same_content;
use crate::error::DownloadError;

/// Mirrors each source file under `dest` by its absolute path (`/a/b/c.txt` → `dest/a/b/c.txt`).
/// Writes go through a `<name>.<pid>-<n>.part` file and are renamed into place, so a partial copy is never mistaken
/// for a finished one.
#[derive(Debug, Clone)]
pub struct FsDownloader {
    dest: PathBuf,
}

impl FsDownloader {
    pub fn new(dest: impl Into<PathBuf>) -> Self {
        Self { dest: dest.into() }
    }

    pub fn dest(&self) -> &Path {
        &self.dest
    }

    /// Where `src` lands under the destination.
    pub fn target_for(&self, src: &Path) -> PathBuf {
        let rel: PathBuf = src
            .components()
            .filter(|c| matches!(c, Component::Normal(_)))
            .collect();
        self.dest.join(rel)
    }

    fn fetch(&self, url: &str, src: &Path) -> Result<(), DownloadError> {
        let meta = fs::metadata(src).map_err(|e| DownloadError::from_io(url, &e))?;
        if !meta.is_file() {
            return Err(DownloadError::fatal(url, "not a regular file"));
        }

        let target = self.target_for(src);
        if same_content(src, &target).map_err(|e| DownloadError::from_io(url, &e))? {
            debug!("already have {}", target.display());
            return Ok(());
        }

        if let Some(parent) = target.parent() {
            fs::create_dir_all(parent).map_err(|e| DownloadError::from_io(url, &e))?;
        }
        let part = part_path_for(&target);
        let copied = fs::copy(src, &part).and_then(|_| fs::rename(&part, &target));
        if let Err(e) = copied {
            let _ = fs::remove_file(&part);
            return Err(DownloadError::from_io(url, &e));
        }
        debug!("fetched {} -> {}", url, target.display());
        Ok(())
    }
}

impl Downloader for FsDownloader {
    fn download(&self, url: &str) -> Result<(), DownloadError> {
        let result = source_path(url).and_then(|src| self.fetch(url, &src));
        if let Err(e) = &result
            && !e.is_temporary()
        {
            warn!("{}", e);
        }
        result
    }
}

/// Resolve a `file://` URL (or a bare absolute path) to a local path.
fn source_path(url: &str) -> Result<PathBuf, DownloadError> {
    match url::Url::parse(url) {
        Ok(parsed) if parsed.scheme() == "file" => parsed
            .to_file_path()
            .map_err(|_| DownloadError::fatal(url, "invalid file URL")),
        Ok(parsed) => Err(DownloadError::fatal(
            url,
            format!("unsupported scheme {}", parsed.scheme()),
        )),
        Err(_) if Path::new(url).is_absolute() => Ok(PathBuf::from(url)),
        Err(e) => Err(DownloadError::fatal(url, e)),
    }
}

/// Unique per attempt: the same URL can be in flight twice (a retry racing a fresh pick).
fn part_path_for(target: &Path) -> PathBuf {
    static ATTEMPT: AtomicU64 = AtomicU64::new(0);
    let name = target
        .file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_default();
    let n = ATTEMPT.fetch_add(1, Ordering::Relaxed);
    target.with_file_name(format!("{name}.{}-{n}.part", std::process::id()))
}
