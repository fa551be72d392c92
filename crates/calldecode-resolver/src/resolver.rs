//! `SelectorResolver`: registry lookups behind a TTL cache, with retry and
//! per-selector request coalescing.
//!
//! # Concurrency
//! The cache map sits behind a `tokio::sync::RwLock`. Misses for the same
//! selector are serialised by a per-key async mutex, so concurrent callers
//! share one registry round-trip: the first caller fetches and fills the
//! cache, the others wake up and read it.
//!
//! Dropping a `resolve` future cancels the in-flight request. Nothing is
//! cached and the key lock is released.

use calldecode_core::{RegistryError, ResolveError, Selector};
use std::{
    collections::HashMap,
    sync::{Arc, Mutex, PoisonError},
    time::Duration,
};
use tracing::{debug, error, warn};

use crate::{
    cache::{CachedLookup, SelectorCache},
    config::ResolverConfig,
    registry::SignatureRegistry,
    retry::RetryPolicy,
};

type KeyLocks = Mutex<HashMap<Selector, Arc<tokio::sync::Mutex<()>>>>;

pub struct SelectorResolver {
    registry: Arc<dyn SignatureRegistry>,
    cache: SelectorCache,
    retry: RetryPolicy,
    request_timeout: Duration,
    in_flight: KeyLocks,
}

impl SelectorResolver {
    /// Resolver over an explicit registry, configured by `config` (the
    /// `source` and `base_url` fields are ignored).
    pub fn new(registry: Arc<dyn SignatureRegistry>, config: &ResolverConfig) -> Self {
        Self {
            registry,
            cache: SelectorCache::new(config.positive_ttl(), config.negative_ttl()),
            retry: RetryPolicy::new(config.retry.clone()),
            request_timeout: config.request_timeout(),
            in_flight: Mutex::new(HashMap::new()),
        }
    }

    /// Resolver over the HTTP registry `config` selects.
    pub fn from_config(config: &ResolverConfig) -> Result<Self, RegistryError> {
        Ok(Self::new(config.build_registry()?, config))
    }

    pub fn registry_name(&self) -> &str {
        self.registry.name()
    }

    /// All signature texts registered for `selector`, in registry order.
    ///
    /// The list is never empty: an unknown selector is
    /// `ResolveError::NotFound`. Network failures are returned after the
    /// retry budget is spent and are not cached.
    pub async fn resolve(&self, selector: Selector) -> Result<Vec<String>, ResolveError> {
        if let Some(hit) = self.cache.get(selector).await {
            debug!(%selector, "selector cache hit");
            return into_result(selector, hit);
        }

        let key = self.key_lock(selector);
        let _held = key.lock.lock().await;

        // Another caller may have filled the entry while we waited.
        if let Some(hit) = self.cache.get(selector).await {
            debug!(%selector, "selector cache filled by concurrent lookup");
            return into_result(selector, hit);
        }

        debug!(%selector, registry = self.registry.name(), "selector cache miss");
        let lookup = CachedLookup::from(normalize(self.fetch(selector).await?));
        self.cache.insert(selector, lookup.clone()).await;
        into_result(selector, lookup)
    }

    /// Drop the cached answer for `selector`. Returns whether one existed.
    pub async fn invalidate(&self, selector: Selector) -> bool {
        self.cache.invalidate(selector).await
    }

    pub async fn clear(&self) {
        self.cache.clear().await;
    }

    pub async fn cache_len(&self) -> usize {
        self.cache.len().await
    }

    /// One logical lookup: a registry round-trip bounded by the request
    /// timeout, retried with backoff while the failure is transient.
    async fn fetch(&self, selector: Selector) -> Result<Vec<String>, ResolveError> {
        let mut attempt = 0u32;
        loop {
            attempt += 1;
            let outcome =
                match tokio::time::timeout(self.request_timeout, self.registry.lookup(selector))
                    .await
                {
                    Ok(outcome) => outcome,
                    Err(_) => Err(RegistryError::Timeout {
                        ms: u64::try_from(self.request_timeout.as_millis()).unwrap_or(u64::MAX),
                    }),
                };

            let e = match outcome {
                Ok(signatures) => return Ok(signatures),
                Err(e) => e,
            };

            let delay = if e.is_retryable() {
                self.retry.next_delay(attempt)
            } else {
                None
            };
            match delay {
                Some(delay) => {
                    warn!(
                        %selector,
                        attempt,
                        delay_ms = delay.as_millis(),
                        error = %e,
                        registry = self.registry.name(),
                        "retrying signature lookup"
                    );
                    tokio::time::sleep(delay).await;
                }
                None => {
                    error!(
                        %selector,
                        attempt,
                        error = %e,
                        registry = self.registry.name(),
                        "signature lookup failed"
                    );
                    return Err(ResolveError::Network {
                        selector,
                        attempts: attempt,
                        source: e,
                    });
                }
            }
        }
    }

    fn key_lock(&self, selector: Selector) -> KeyLock<'_> {
        let mut locks = self.in_flight.lock().unwrap_or_else(PoisonError::into_inner);
        let lock = locks.entry(selector).or_default().clone();
        KeyLock {
            locks: &self.in_flight,
            selector,
            lock,
        }
    }
}

/// A handle on one selector's lock; removes the map entry when the last
/// handle goes away.
struct KeyLock<'a> {
    locks: &'a KeyLocks,
    selector: Selector,
    lock: Arc<tokio::sync::Mutex<()>>,
}

impl Drop for KeyLock<'_> {
    fn drop(&mut self) {
        let mut locks = self.locks.lock().unwrap_or_else(PoisonError::into_inner);
        // map + this handle
        if Arc::strong_count(&self.lock) == 2 {
            locks.remove(&self.selector);
        }
    }
}

fn into_result(selector: Selector, lookup: CachedLookup) -> Result<Vec<String>, ResolveError> {
    match lookup {
        CachedLookup::Found(signatures) => Ok(signatures),
        CachedLookup::NotFound => Err(ResolveError::NotFound { selector }),
    }
}

/// Trim entries and drop blanks and duplicates, keeping first occurrences.
fn normalize(signatures: Vec<String>) -> Vec<String> {
    let mut out: Vec<String> = Vec::with_capacity(signatures.len());
    for s in signatures {
        let s = s.trim();
        if !s.is_empty() && !out.iter().any(|seen| seen == s) {
            out.push(s.to_string());
        }
    }
    out
}
