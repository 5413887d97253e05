/*!
 * Translation augmentation of extracted records.
 *
 * For every record the Tamil-bearing fields are sent to the configured
 * translator. A provider failure only ever affects the one field: names fall
 * back to transliteration (or stay unset), place fields keep their Tamil
 * source. Output order always matches input order.
 *
 * Each call starts from an empty translation cache unless a shared one was
 * supplied with `with_cache`.
 *
 * Requests are paced either one record at a time or in small parallel
 * batches, with a delay after each unit. Cancellation is checked before each
 * unit; a cancelled run returns the records completed so far.
 */

use futures::future::join_all;
use log::{debug, warn};
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::time::Duration;

use super::cache::TranslationCache;
use super::transliteration::transliterate;
use crate::app_config::{FallbackPolicy, PacingMode, TranslationConfig};
use crate::errors::ProviderError;
use crate::extraction::script::contains_tamil;
use crate::providers::Translator;
use crate::transaction::{RawTransaction, TamilField, TranslatedTransaction};

/// Shared flag telling a running pipeline to stop before its next unit of work
#[derive(Debug, Clone, Default)]
pub struct CancellationFlag(Arc<AtomicBool>);

impl CancellationFlag {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn cancel(&self) {
        self.0.store(true, Ordering::SeqCst);
    }

    pub fn is_cancelled(&self) -> bool {
        self.0.load(Ordering::SeqCst)
    }
}

/// Request pacing toward the provider
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Pacing {
    /// One record in flight, delay after each record
    Sequential { delay: Duration },
    /// Up to `batch_size` records in flight, delay after each batch
    Batched { batch_size: usize, delay: Duration },
}

/// Augmenter settings
#[derive(Debug, Clone)]
pub struct AugmentOptions {
    pub pacing: Pacing,
    pub fallback: FallbackPolicy,
    pub translate_place_fields: bool,
    /// Upper bound for a single provider call
    pub request_timeout: Duration,
}

impl Default for AugmentOptions {
    fn default() -> Self {
        Self::from_config(&TranslationConfig::default())
    }
}

impl AugmentOptions {
    pub fn from_config(config: &TranslationConfig) -> Self {
        let common = &config.common;
        let delay = Duration::from_millis(common.delay_ms);
        let pacing = match common.pacing {
            PacingMode::Sequential => Pacing::Sequential { delay },
            PacingMode::Batched => Pacing::Batched {
                batch_size: common.batch_size.max(1),
                delay,
            },
        };
        Self {
            pacing,
            fallback: common.fallback,
            translate_place_fields: common.translate_place_fields,
            request_timeout: config.get_timeout(),
        }
    }

    pub fn with_pacing(mut self, pacing: Pacing) -> Self {
        self.pacing = pacing;
        self
    }

    pub fn with_fallback(mut self, fallback: FallbackPolicy) -> Self {
        self.fallback = fallback;
        self
    }

    pub fn with_request_timeout(mut self, timeout: Duration) -> Self {
        self.request_timeout = timeout;
        self
    }

    pub fn with_place_fields(mut self, enabled: bool) -> Self {
        self.translate_place_fields = enabled;
        self
    }
}

/// Counters of one augmentation run
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct AugmentStats {
    /// Provider calls issued
    pub provider_calls: usize,
    /// Provider calls that failed, timed out or came back empty
    pub provider_failures: usize,
    /// Names filled from transliteration
    pub transliterated: usize,
    /// Fields answered from the cache
    pub cache_hits: usize,
}

#[derive(Default)]
struct RunCounters {
    provider_calls: AtomicUsize,
    provider_failures: AtomicUsize,
    transliterated: AtomicUsize,
    cache_hits: AtomicUsize,
}

impl RunCounters {
    fn bump(counter: &AtomicUsize) {
        counter.fetch_add(1, Ordering::Relaxed);
    }

    fn snapshot(&self) -> AugmentStats {
        AugmentStats {
            provider_calls: self.provider_calls.load(Ordering::Relaxed),
            provider_failures: self.provider_failures.load(Ordering::Relaxed),
            transliterated: self.transliterated.load(Ordering::Relaxed),
            cache_hits: self.cache_hits.load(Ordering::Relaxed),
        }
    }
}

/// Result of an augmentation run
#[derive(Debug, Clone)]
pub struct AugmentOutcome {
    /// Translated records, in input order
    pub records: Vec<TranslatedTransaction>,
    /// Whether the run stopped early; `records` then holds the completed prefix
    pub cancelled: bool,
    pub stats: AugmentStats,
}

/// Adds English renderings of Tamil fields to raw records
#[derive(Debug, Clone)]
pub struct Augmenter {
    translator: Arc<dyn Translator>,
    shared_cache: Option<TranslationCache>,
    options: AugmentOptions,
}

impl Augmenter {
    pub fn new(translator: Arc<dyn Translator>, options: AugmentOptions) -> Self {
        Self {
            translator,
            shared_cache: None,
            options,
        }
    }

    /// Use a caller-provided cache, for sharing across uploads
    pub fn with_cache(mut self, cache: TranslationCache) -> Self {
        self.shared_cache = Some(cache);
        self
    }

    pub fn options(&self) -> &AugmentOptions {
        &self.options
    }

    /// Translate all records
    pub async fn augment(&self, records: Vec<RawTransaction>, cancel: &CancellationFlag) -> AugmentOutcome {
        self.augment_with_progress(records, cancel, |_, _| {}).await
    }

    /// Translate all records, reporting `(completed, total)` after each unit
    pub async fn augment_with_progress(
        &self,
        records: Vec<RawTransaction>,
        cancel: &CancellationFlag,
        progress: impl Fn(usize, usize) + Send + Sync,
    ) -> AugmentOutcome {
        let total = records.len();
        let counters = RunCounters::default();
        let cache = self.shared_cache.clone().unwrap_or_default();
        let mut translated: Vec<TranslatedTransaction> = Vec::with_capacity(total);
        let mut cancelled = false;

        let (unit_size, delay) = match self.options.pacing {
            Pacing::Sequential { delay } => (1, delay),
            Pacing::Batched { batch_size, delay } => (batch_size.max(1), delay),
        };

        let units: Vec<&[RawTransaction]> = records.chunks(unit_size).collect();
        let unit_count = units.len();

        for (idx, unit) in units.into_iter().enumerate() {
            if cancel.is_cancelled() {
                debug!("Augmentation cancelled after {} of {} records", translated.len(), total);
                cancelled = true;
                break;
            }

            let results = join_all(unit.iter().map(|record| self.translate_record(record, &cache, &counters))).await;
            translated.extend(results);
            progress(translated.len(), total);

            if idx + 1 < unit_count && !delay.is_zero() {
                tokio::time::sleep(delay).await;
            }
        }

        let cache_stats = cache.stats();
        debug!(
            "Translation cache: {} entries, {} hits, {} misses ({:.1}% hit rate)",
            cache.len(),
            cache_stats.hits,
            cache_stats.misses,
            cache_stats.hit_rate() * 100.0
        );

        AugmentOutcome {
            records: translated,
            cancelled,
            stats: counters.snapshot(),
        }
    }

    /// Translate the Tamil-bearing fields of one record
    async fn translate_record(
        &self,
        raw: &RawTransaction,
        cache: &TranslationCache,
        counters: &RunCounters,
    ) -> TranslatedTransaction {
        let mut translated = TranslatedTransaction::untranslated(raw.clone());

        for field in TamilField::NAMES {
            let value = self.resolve_field(raw, field, cache, counters).await;
            translated.set_resolved(field, value);
        }

        if self.options.translate_place_fields {
            for field in TamilField::PLACE_FIELDS {
                let value = self.resolve_field(raw, field, cache, counters).await;
                translated.set_resolved(field, value);
            }
        }

        translated
    }

    /// English value of one field, never fabricated when the source is absent
    async fn resolve_field(
        &self,
        raw: &RawTransaction,
        field: TamilField,
        cache: &TranslationCache,
        counters: &RunCounters,
    ) -> Option<String> {
        let source = raw.tamil_source(field)?;

        if source.trim().is_empty() || !contains_tamil(source) {
            return Some(source.to_string());
        }

        if let Some(hit) = cache.get(field, source) {
            RunCounters::bump(&counters.cache_hits);
            return Some(hit);
        }

        RunCounters::bump(&counters.provider_calls);
        match self.call_provider(source, field).await {
            Ok(english) => {
                cache.store(field, source, &english);
                Some(english)
            }
            Err(e) => {
                RunCounters::bump(&counters.provider_failures);
                warn!(
                    "Translation of {} for {} via {} failed: {}",
                    field,
                    raw,
                    self.translator.name(),
                    e
                );
                self.fallback(source, field, counters)
            }
        }
    }

    async fn call_provider(&self, text: &str, field: TamilField) -> Result<String, ProviderError> {
        let timeout = self.options.request_timeout;
        match tokio::time::timeout(timeout, self.translator.translate(text, field)).await {
            Ok(Ok(english)) if !english.trim().is_empty() => Ok(english.trim().to_string()),
            Ok(Ok(_)) => Err(ProviderError::EmptyResponse),
            Ok(Err(e)) => Err(e),
            Err(_) => Err(ProviderError::Timeout(timeout.as_millis() as u64)),
        }
    }

    fn fallback(&self, source: &str, field: TamilField, counters: &RunCounters) -> Option<String> {
        if !field.is_name() {
            return Some(source.to_string());
        }

        match self.options.fallback {
            FallbackPolicy::LeaveUnset => None,
            FallbackPolicy::Transliterate => {
                let romanized = transliterate(source);
                if romanized.is_some() {
                    RunCounters::bump(&counters.transliterated);
                }
                romanized
            }
        }
    }
}
