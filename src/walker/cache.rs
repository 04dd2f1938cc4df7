//! Weakly-keyed cache of walkers, one per crawl root.

use std::collections::HashMap;
use std::sync::{Arc, Mutex, PoisonError, Weak};

use log::debug;

use crate::collab::{Enumerator, EnumeratorFactory, FileSystem};
use crate::error::WalkError;
use crate::types::{CrawlRoot, RootHandle};

struct CacheSlot {
    root: Weak<CrawlRoot>,
    walker: Arc<dyn Enumerator>,
}

impl CacheSlot {
    fn is_live(&self) -> bool {
        self.root.strong_count() > 0
    }
}

/// Root URL → walker. Entries hold only a `Weak` to their root; once every `RootHandle` for a root
/// is dropped the entry is evicted on the next access and the walk state is lost.
pub struct WalkerCache {
    slots: Mutex<HashMap<String, CacheSlot>>,
    fs: Arc<dyn FileSystem>,
    factory: Arc<dyn EnumeratorFactory>,
}

impl WalkerCache {
    pub fn new(fs: Arc<dyn FileSystem>, factory: Arc<dyn EnumeratorFactory>) -> Self {
        Self {
            slots: Mutex::new(HashMap::new()),
            fs,
            factory,
        }
    }

    /// Cached walker for `root`, building one on a miss. Concurrent callers for the same root get
    /// the same instance. Factory failures are returned and not cached.
    pub fn get_or_create(&self, root: &RootHandle) -> Result<Arc<dyn Enumerator>, WalkError> {
        let mut slots = self.slots.lock().unwrap_or_else(PoisonError::into_inner);
        Self::evict_dead(&mut slots);

        if let Some(slot) = slots.get(root.url()) {
            return Ok(Arc::clone(&slot.walker));
        }
        let walker = self.factory.create(root, Arc::clone(&self.fs))?;
        slots.insert(
            root.url().to_string(),
            CacheSlot {
                root: Arc::downgrade(root),
                walker: Arc::clone(&walker),
            },
        );
        Ok(walker)
    }

    /// Drop entries whose root is gone. Returns how many were evicted.
    pub fn sweep(&self) -> usize {
        let mut slots = self.slots.lock().unwrap_or_else(PoisonError::into_inner);
        Self::evict_dead(&mut slots)
    }

    /// Live entries.
    pub fn len(&self) -> usize {
        let slots = self.slots.lock().unwrap_or_else(PoisonError::into_inner);
        slots.values().filter(|s| s.is_live()).count()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    fn evict_dead(slots: &mut HashMap<String, CacheSlot>) -> usize {
        let before = slots.len();
        slots.retain(|_, slot| slot.is_live());
        let evicted = before - slots.len();
        if evicted > 0 {
            debug!("walker cache: evicted {} unreferenced roots", evicted);
        }
        evicted
    }
}
