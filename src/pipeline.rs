/*!
 * End-to-end processing of one uploaded certificate.
 *
 * Segmenter, field extractor, augmenter and assembler run strictly in that
 * order. Only malformed input rejects an upload; every other problem
 * degrades to fewer fields or fewer records.
 */

use log::{debug, info};
use std::sync::Arc;

use crate::app_config::Config;
use crate::assembler::{NewTransactionRecord, assemble_all};
use crate::errors::PipelineError;
use crate::extraction::fields::FieldExtractor;
use crate::extraction::script::malformed_reason;
use crate::extraction::segmenter::{Segmenter, scan_identity_records};
use crate::providers::Translator;
use crate::transaction::RawTransaction;
use crate::translation::augmenter::{AugmentOptions, AugmentStats, Augmenter, CancellationFlag};
use crate::translation::cache::TranslationCache;

/// Records extracted from one text, before translation
#[derive(Debug, Clone, Default)]
pub struct Extraction {
    pub records: Vec<RawTransaction>,
    /// Blocks produced by the segmenter
    pub blocks: usize,
    /// Whether the identity-only scan supplied the records
    pub fallback_used: bool,
}

/// Outcome of processing one upload
#[derive(Debug, Clone)]
pub struct PipelineReport {
    pub source_file: String,
    /// Assembled records in document order
    pub records: Vec<NewTransactionRecord>,
    pub blocks: usize,
    pub fallback_used: bool,
    /// Set when the run stopped early; `records` then holds the completed prefix
    pub cancelled: bool,
    pub stats: AugmentStats,
}

impl PipelineReport {
    pub fn record_count(&self) -> usize {
        self.records.len()
    }
}

/// The extraction and translation pipeline
pub struct Pipeline {
    segmenter: Box<dyn Segmenter>,
    extractor: FieldExtractor,
    augmenter: Augmenter,
    scan_fallback: bool,
}

impl Pipeline {
    /// Build a pipeline from configuration around the given translator
    pub fn new(config: &Config, translator: Arc<dyn Translator>) -> Self {
        let extraction = &config.extraction;
        let segmenter = extraction.segmentation.build(extraction.min_block_chars);
        let extractor = FieldExtractor::new(extraction.party_resolver, extraction.known_villages.clone());
        let augmenter = Augmenter::new(translator, AugmentOptions::from_config(&config.translation));

        Self::with_components(segmenter, extractor, augmenter, extraction.scan_fallback)
    }

    pub fn with_components(
        segmenter: Box<dyn Segmenter>,
        extractor: FieldExtractor,
        augmenter: Augmenter,
        scan_fallback: bool,
    ) -> Self {
        Self {
            segmenter,
            extractor,
            augmenter,
            scan_fallback,
        }
    }

    /// Share one translation cache across several uploads
    pub fn with_cache(mut self, cache: TranslationCache) -> Self {
        self.augmenter = self.augmenter.with_cache(cache);
        self
    }

    pub fn augmenter(&self) -> &Augmenter {
        &self.augmenter
    }

    /// Validate, segment and extract without touching the provider
    pub fn extract(&self, text: &str) -> Result<Extraction, PipelineError> {
        if let Some(reason) = malformed_reason(text) {
            return Err(PipelineError::MalformedInput(reason));
        }

        let blocks = self.segmenter.segment(text);
        let mut records: Vec<RawTransaction> = blocks
            .iter()
            .filter_map(|block| self.extractor.extract_block(block))
            .collect();

        let mut fallback_used = false;
        if records.is_empty() && self.scan_fallback {
            records = scan_identity_records(text);
            fallback_used = !records.is_empty();
            if fallback_used {
                debug!(
                    "{} segmentation found no entries, identity scan found {}",
                    self.segmenter.name(),
                    records.len()
                );
            }
        }

        Ok(Extraction {
            records,
            blocks: blocks.len(),
            fallback_used,
        })
    }

    /// Process raw upload bytes, rejecting anything that is not UTF-8 text
    pub async fn process_bytes(
        &self,
        bytes: &[u8],
        file_name: &str,
        cancel: &CancellationFlag,
    ) -> Result<PipelineReport, PipelineError> {
        let text = Self::decode(bytes)?;
        self.process(text, file_name, cancel).await
    }

    /// View upload bytes as text
    pub fn decode(bytes: &[u8]) -> Result<&str, PipelineError> {
        std::str::from_utf8(bytes)
            .map_err(|e| PipelineError::MalformedInput(format!("input is not valid UTF-8: {}", e)))
    }

    /// Process the extracted text of one upload
    pub async fn process(
        &self,
        text: &str,
        file_name: &str,
        cancel: &CancellationFlag,
    ) -> Result<PipelineReport, PipelineError> {
        self.process_with_progress(text, file_name, cancel, |_, _| {}).await
    }

    /// Process one upload, reporting `(translated, total)` records as translation advances
    pub async fn process_with_progress(
        &self,
        text: &str,
        file_name: &str,
        cancel: &CancellationFlag,
        progress: impl Fn(usize, usize) + Send + Sync,
    ) -> Result<PipelineReport, PipelineError> {
        let extraction = self.extract(text)?;
        let outcome = self
            .augmenter
            .augment_with_progress(extraction.records, cancel, progress)
            .await;
        let records = assemble_all(outcome.records, file_name);

        info!(
            "{}: {} records from {} blocks{}{}; provider calls {}, failures {}, transliterated {}, cache hits {}",
            file_name,
            records.len(),
            extraction.blocks,
            if extraction.fallback_used { " (identity scan)" } else { "" },
            if outcome.cancelled { " (cancelled)" } else { "" },
            outcome.stats.provider_calls,
            outcome.stats.provider_failures,
            outcome.stats.transliterated,
            outcome.stats.cache_hits
        );

        Ok(PipelineReport {
            source_file: file_name.to_string(),
            records,
            blocks: extraction.blocks,
            fallback_used: extraction.fallback_used,
            cancelled: outcome.cancelled,
            stats: outcome.stats,
        })
    }
}
