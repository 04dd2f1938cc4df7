//! Process-wide set of crawl roots.

use std::path::PathBuf;
use std::sync::Arc;

use anyhow::{Result, bail};
use log::debug;
use rand::seq::SliceRandom;

use crate::collab::CrawlIndex;
use crate::types::{CrawlRoot, RootHandle};

/// Fixed, non-empty list of roots. Holds the strong handles that keep walker cache entries alive.
#[derive(Debug)]
pub struct RootIndex {
    roots: Vec<RootHandle>,
}

impl RootIndex {
    pub fn new(roots: Vec<RootHandle>) -> Result<Self> {
        if roots.is_empty() {
            bail!("no crawl roots configured");
        }
        Ok(Self { roots })
    }

    /// Build from local directories. Paths are canonicalized so the same directory always maps to
    /// the same root URL.
    pub fn from_dirs(dirs: &[PathBuf]) -> Result<Self> {
        let roots = dirs
            .iter()
            .map(|dir| {
                let dir = dir.canonicalize().unwrap_or_else(|_| dir.clone());
                let root = CrawlRoot::from_dir(dir);
                debug!("crawl root: {}", root);
                Arc::new(root)
            })
            .collect();
        Self::new(roots)
    }

    pub fn roots(&self) -> &[RootHandle] {
        &self.roots
    }
}

impl CrawlIndex for RootIndex {
    fn select_random_root(&self) -> RootHandle {
        // Non-empty by construction.
        let root = self
            .roots
            .choose(&mut rand::thread_rng())
            .unwrap_or(&self.roots[0]);
        Arc::clone(root)
    }
}
