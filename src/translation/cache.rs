/*!
 * Translation caching.
 *
 * The same party often appears in several entries of one certificate. The
 * cache keeps provider answers for the duration of one upload so each
 * distinct (field, text) pair is requested once. Callers that want answers
 * reused across uploads hand the same cache to each run. Only successful translations are
 * stored; fallbacks are recomputed, they are cheap.
 */

use log::debug;
use parking_lot::RwLock;
use std::collections::HashMap;
use std::sync::Arc;

use crate::transaction::TamilField;

/// Cache key combining the field kind and the Tamil source text
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
struct CacheKey {
    field: TamilField,
    source_text: String,
}

impl CacheKey {
    fn new(field: TamilField, source_text: &str) -> Self {
        Self {
            field,
            source_text: source_text.to_string(),
        }
    }
}

/// Hit and miss counts of a cache
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct CacheStats {
    pub hits: usize,
    pub misses: usize,
}

impl CacheStats {
    pub fn hit_rate(&self) -> f64 {
        let total = self.hits + self.misses;
        if total > 0 { self.hits as f64 / total as f64 } else { 0.0 }
    }
}

/// Translation cache shared by the concurrent requests of one run.
///
/// Clones share the same storage.
#[derive(Debug, Clone)]
pub struct TranslationCache {
    cache: Arc<RwLock<HashMap<CacheKey, String>>>,
    stats: Arc<RwLock<CacheStats>>,
    enabled: bool,
}

impl TranslationCache {
    pub fn new(enabled: bool) -> Self {
        Self {
            cache: Arc::new(RwLock::new(HashMap::new())),
            stats: Arc::new(RwLock::new(CacheStats::default())),
            enabled,
        }
    }

    /// Look up a translation
    pub fn get(&self, field: TamilField, source_text: &str) -> Option<String> {
        if !self.enabled {
            return None;
        }

        let found = self.cache.read().get(&CacheKey::new(field, source_text)).cloned();
        let mut stats = self.stats.write();
        match found {
            Some(_) => {
                stats.hits += 1;
                debug!("Cache hit for {} '{}'", field, truncate_text(source_text, 30));
            }
            None => stats.misses += 1,
        }
        found
    }

    /// Store a successful translation
    pub fn store(&self, field: TamilField, source_text: &str, translation: &str) {
        if !self.enabled {
            return;
        }
        self.cache
            .write()
            .insert(CacheKey::new(field, source_text), translation.to_string());
    }

    pub fn stats(&self) -> CacheStats {
        *self.stats.read()
    }

    pub fn len(&self) -> usize {
        self.cache.read().len()
    }

    pub fn is_empty(&self) -> bool {
        self.cache.read().is_empty()
    }
}

impl Default for TranslationCache {
    fn default() -> Self {
        Self::new(true)
    }
}

/// Truncate text to a number of characters with an ellipsis
fn truncate_text(text: &str, max_chars: usize) -> String {
    if text.chars().count() <= max_chars {
        text.to_string()
    } else {
        let head: String = text.chars().take(max_chars).collect();
        format!("{}...", head)
    }
}
