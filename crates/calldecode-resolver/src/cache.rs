//! TTL cache of registry answers.
//!
//! Found and not-found answers are cached with separate lifetimes. Failed
//! lookups are never stored here.

use calldecode_core::Selector;
use std::{collections::HashMap, time::Duration};
use tokio::{sync::RwLock, time::Instant};

/// A registry answer as stored in the cache.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CachedLookup {
    Found(Vec<String>),
    NotFound,
}

impl From<Vec<String>> for CachedLookup {
    fn from(signatures: Vec<String>) -> Self {
        if signatures.is_empty() {
            Self::NotFound
        } else {
            Self::Found(signatures)
        }
    }
}

#[derive(Debug)]
struct Entry {
    lookup: CachedLookup,
    expires_at: Instant,
}

#[derive(Debug)]
pub struct SelectorCache {
    entries: RwLock<HashMap<Selector, Entry>>,
    positive_ttl: Duration,
    negative_ttl: Duration,
}

impl SelectorCache {
    pub fn new(positive_ttl: Duration, negative_ttl: Duration) -> Self {
        Self {
            entries: RwLock::new(HashMap::new()),
            positive_ttl,
            negative_ttl,
        }
    }

    /// The cached answer for `selector`, unless absent or expired.
    pub async fn get(&self, selector: Selector) -> Option<CachedLookup> {
        let entries = self.entries.read().await;
        entries
            .get(&selector)
            .filter(|entry| Instant::now() < entry.expires_at)
            .map(|entry| entry.lookup.clone())
    }

    /// Store an answer. A zero TTL for its kind disables caching it.
    pub async fn insert(&self, selector: Selector, lookup: CachedLookup) {
        let ttl = match lookup {
            CachedLookup::Found(_) => self.positive_ttl,
            CachedLookup::NotFound => self.negative_ttl,
        };
        let mut entries = self.entries.write().await;
        if ttl.is_zero() {
            entries.remove(&selector);
            return;
        }
        let now = Instant::now();
        entries.retain(|_, entry| now < entry.expires_at);
        entries.insert(
            selector,
            Entry {
                lookup,
                expires_at: now + ttl,
            },
        );
    }

    pub async fn invalidate(&self, selector: Selector) -> bool {
        self.entries.write().await.remove(&selector).is_some()
    }

    pub async fn clear(&self) {
        self.entries.write().await.clear();
    }

    /// Number of stored entries, expired ones included until the next
    /// insert sweeps them.
    pub async fn len(&self) -> usize {
        self.entries.read().await.len()
    }
}
