//! The `SignatureRegistry` trait and an in-process implementation.

use async_trait::async_trait;
use calldecode_core::{signature, RegistryError, Selector, SyntaxError};
use std::{
    collections::HashMap,
    sync::{PoisonError, RwLock},
};

/// A source of human-readable signatures keyed by selector.
///
/// One call is one round-trip: implementations do not retry or cache,
/// [`crate::SelectorResolver`] does both.
#[async_trait]
pub trait SignatureRegistry: Send + Sync {
    /// Every signature text registered for `selector`, in registry order.
    /// An empty vector means the registry does not know the selector.
    async fn lookup(&self, selector: Selector) -> Result<Vec<String>, RegistryError>;

    /// Short label for logs.
    fn name(&self) -> &str;
}

/// Static selector table held in memory.
///
/// Useful for tests and for running offline with a known set of ABIs.
#[derive(Debug, Default)]
pub struct MemoryRegistry {
    entries: RwLock<HashMap<Selector, Vec<String>>>,
}

impl MemoryRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Build a registry from signature texts, computing each selector.
    pub fn from_signatures<'a>(
        texts: impl IntoIterator<Item = &'a str>,
    ) -> Result<Self, SyntaxError> {
        let registry = Self::new();
        for text in texts {
            registry.insert(text)?;
        }
        Ok(registry)
    }

    /// Register `text` under the selector of its canonical form.
    pub fn insert(&self, text: &str) -> Result<Selector, SyntaxError> {
        let selector = signature::parse(text)?.selector();
        self.insert_at(selector, text);
        Ok(selector)
    }

    /// Register `text` under an explicit selector, whether or not it hashes
    /// to it. Registries in the wild do hold such entries.
    pub fn insert_at(&self, selector: Selector, text: impl Into<String>) {
        let mut entries = self.entries.write().unwrap_or_else(PoisonError::into_inner);
        let texts = entries.entry(selector).or_default();
        let text = text.into();
        if !texts.contains(&text) {
            texts.push(text);
        }
    }

    pub fn len(&self) -> usize {
        self.entries.read().unwrap_or_else(PoisonError::into_inner).len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

#[async_trait]
impl SignatureRegistry for MemoryRegistry {
    async fn lookup(&self, selector: Selector) -> Result<Vec<String>, RegistryError> {
        let entries = self.entries.read().unwrap_or_else(PoisonError::into_inner);
        Ok(entries.get(&selector).cloned().unwrap_or_default())
    }

    fn name(&self) -> &str {
        "memory"
    }
}

/// Split a `;`-separated signature list, trimming entries and dropping
/// empty ones.
pub(crate) fn split_signature_list(body: &str) -> Vec<String> {
    body.split(';')
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(String::from)
        .collect()
}
