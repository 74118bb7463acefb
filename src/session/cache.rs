//! Single-slot memo of the last translation.
//!
//! Matching is exact string equality on the source text: no trimming, no
//! case folding.  Only the orchestrator's critical section touches the cache,
//! and only with a primary race winner or a cache hit.

/// The last source/translation/provider triple.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CacheEntry {
    pub source_text: String,
    pub translated_text: String,
    pub provider_name: String,
}

#[derive(Debug, Default)]
pub struct TranslationCache {
    entry: Option<CacheEntry>,
}

impl TranslationCache {
    pub fn new() -> Self {
        Self::default()
    }

    /// The cached entry if its source is exactly `source_text`.
    pub fn lookup(&self, source_text: &str) -> Option<&CacheEntry> {
        self.entry
            .as_ref()
            .filter(|entry| entry.source_text == source_text)
    }

    /// Replace whatever was cached.
    pub fn store(&mut self, entry: CacheEntry) {
        self.entry = Some(entry);
    }

    pub fn current(&self) -> Option<&CacheEntry> {
        self.entry.as_ref()
    }
}
