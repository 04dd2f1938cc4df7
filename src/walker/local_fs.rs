//! Local-disk [`FileSystem`].

use std::io;
use std::path::PathBuf;

use log::debug;
use walkdir::WalkDir;

use crate::collab::FileSystem;
use crate::types::CrawlRoot;

use super::filter::should_include_file;

#[derive(Debug, Clone, Default)]
pub struct LocalFs {
    follow_links: bool,
    exclude: Vec<String>,
    /// Directories never descended into (e.g. the download destination inside a root).
    skip_dirs: Vec<PathBuf>,
}

impl LocalFs {
    pub fn new(exclude: Vec<String>) -> Self {
        Self {
            follow_links: false,
            exclude,
            skip_dirs: Vec::new(),
        }
    }

    pub fn skip_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.skip_dirs.push(dir.into());
        self
    }

    pub fn follow_links(mut self, yes: bool) -> Self {
        self.follow_links = yes;
        self
    }
}

impl FileSystem for LocalFs {
    /// Fails only if the root itself cannot be read; unreadable entries below it are skipped.
    fn list_files(&self, root: &CrawlRoot) -> io::Result<Vec<PathBuf>> {
        std::fs::read_dir(root.path())?;

        let mut files = Vec::new();
        let mut skipped = 0_usize;
        let walk = WalkDir::new(root.path())
            .follow_links(self.follow_links)
            .into_iter()
            .filter_entry(|e| !self.skip_dirs.iter().any(|d| e.path() == d.as_path()));
        for entry in walk {
            match entry {
                Ok(entry) => {
                    if entry.file_type().is_file()
                        && should_include_file(entry.path(), &self.exclude)
                    {
                        files.push(entry.into_path());
                    }
                }
                Err(_) => skipped += 1,
            }
        }
        if skipped > 0 {
            debug!("{}: skipped {} unreadable entries", root, skipped);
        }
        Ok(files)
    }
}
