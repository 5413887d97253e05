/*!
 * Splitting certificate text into per-entry blocks.
 *
 * An entry starts at a document reference such as `200/2013`. Two strategies
 * are offered because they disagree on ambiguous layouts:
 *
 * - [`WholeBlockSegmenter`] cuts before every line that begins with a
 *   reference. Text before the first reference becomes a block of its own and
 *   is usually dropped later for lacking a reference.
 * - [`LineScanSegmenter`] keeps one open entry and only opens a new one when a
 *   line holding a reference follows a blank line or names a document type.
 *   Reference-bearing lines inside an entry (previous document numbers, for
 *   instance) no longer split it, at the cost of merging entries whose
 *   separating blank line was lost.
 *
 * Neither result is "the correct one"; pick per document source.
 */

use log::debug;
use once_cell::sync::Lazy;
use regex::Regex;
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::fmt;

use super::vocabulary::has_classification_keyword;
use crate::transaction::RawTransaction;

static DOCUMENT_REF_REGEX: Lazy<Regex> = Lazy::new(|| Regex::new(r"(\d+)/(\d{4})").unwrap());

/// A `number/year` document reference found in text
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DocumentRef {
    pub number: String,
    pub year: String,
    /// Byte offset of the reference start
    pub start: usize,
}

impl DocumentRef {
    /// Natural key `number/year`
    pub fn key(&self) -> String {
        format!("{}/{}", self.number, self.year)
    }
}

/// Every standalone document reference, in order of appearance.
///
/// A match glued to a further `/` or digit is part of something else, most
/// often the `MM/YYYY` tail of a `DD/MM/YYYY` date, and is skipped.
pub fn find_document_refs(text: &str) -> Vec<DocumentRef> {
    DOCUMENT_REF_REGEX
        .captures_iter(text)
        .filter_map(|caps| {
            let whole = caps.get(0)?;
            let before = text[..whole.start()].chars().next_back();
            let after = text[whole.end()..].chars().next();
            let glued = |c: Option<char>| matches!(c, Some(c) if c == '/' || c.is_ascii_digit());
            if glued(before) || glued(after) {
                return None;
            }
            Some(DocumentRef {
                number: caps.get(1)?.as_str().to_string(),
                year: caps.get(2)?.as_str().to_string(),
                start: whole.start(),
            })
        })
        .collect()
}

/// First standalone document reference, if any
pub fn first_document_ref(text: &str) -> Option<DocumentRef> {
    find_document_refs(text).into_iter().next()
}

/// Whether the line, ignoring leading blanks, begins with a document reference
pub fn starts_with_document_ref(line: &str) -> bool {
    let trimmed = line.trim_start();
    find_document_refs(trimmed)
        .first()
        .is_some_and(|reference| reference.start == 0)
}

/// Unify line endings and turn page breaks into line breaks
pub fn normalize_line_endings(text: &str) -> String {
    text.replace("\r\n", "\n").replace(['\r', '\u{000C}'], "\n")
}

/// A span of text believed to hold one registration entry
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Block {
    /// Position among the blocks that survived filtering
    pub ordinal: usize,
    /// Zero-based line number where the block starts in the normalized text
    pub first_line: usize,
    pub text: String,
}

/// Strategy interface for entry segmentation
pub trait Segmenter: Send + Sync {
    /// Strategy name used in logs
    fn name(&self) -> &'static str;

    /// Split the full text of one upload into ordered, disjoint blocks
    fn segment(&self, text: &str) -> Vec<Block>;
}

/// Available segmentation strategies
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SegmentationStrategy {
    #[default]
    WholeBlock,
    LineScan,
}

impl SegmentationStrategy {
    /// Build the segmenter for this strategy
    pub fn build(self, min_block_chars: usize) -> Box<dyn Segmenter> {
        match self {
            Self::WholeBlock => Box::new(WholeBlockSegmenter::new(min_block_chars)),
            Self::LineScan => Box::new(LineScanSegmenter::new(min_block_chars)),
        }
    }
}

impl fmt::Display for SegmentationStrategy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::WholeBlock => f.write_str("whole_block"),
            Self::LineScan => f.write_str("line_scan"),
        }
    }
}

impl std::str::FromStr for SegmentationStrategy {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().replace('-', "_").as_str() {
            "whole_block" => Ok(Self::WholeBlock),
            "line_scan" => Ok(Self::LineScan),
            _ => Err(anyhow::anyhow!("Invalid segmentation strategy: {}", s)),
        }
    }
}

/// Keep candidates longer than the threshold and number them
fn finish_blocks(candidates: Vec<(usize, String)>, min_block_chars: usize, strategy: &str) -> Vec<Block> {
    let total = candidates.len();
    let blocks: Vec<Block> = candidates
        .into_iter()
        .map(|(first_line, text)| (first_line, text.trim().to_string()))
        .filter(|(_, text)| text.chars().count() > min_block_chars)
        .enumerate()
        .map(|(ordinal, (first_line, text))| Block { ordinal, first_line, text })
        .collect();

    debug!(
        "{} segmentation kept {} of {} candidate blocks",
        strategy,
        blocks.len(),
        total
    );
    blocks
}

/// Splits before every line that begins with a document reference
#[derive(Debug, Clone)]
pub struct WholeBlockSegmenter {
    min_block_chars: usize,
}

impl WholeBlockSegmenter {
    pub fn new(min_block_chars: usize) -> Self {
        Self { min_block_chars }
    }
}

impl Segmenter for WholeBlockSegmenter {
    fn name(&self) -> &'static str {
        "whole_block"
    }

    fn segment(&self, text: &str) -> Vec<Block> {
        let normalized = normalize_line_endings(text);
        let mut candidates: Vec<(usize, String)> = Vec::new();
        let mut current: Vec<&str> = Vec::new();
        let mut first_line = 0;

        for (idx, line) in normalized.split('\n').enumerate() {
            if idx > 0 && starts_with_document_ref(line) {
                candidates.push((first_line, current.join("\n")));
                current.clear();
                first_line = idx;
            }
            current.push(line);
        }
        candidates.push((first_line, current.join("\n")));

        finish_blocks(candidates, self.min_block_chars, self.name())
    }
}

/// Walks lines keeping one open entry at a time
#[derive(Debug, Clone)]
pub struct LineScanSegmenter {
    min_block_chars: usize,
}

impl LineScanSegmenter {
    pub fn new(min_block_chars: usize) -> Self {
        Self { min_block_chars }
    }

    fn opens_entry(line: &str, previous_blank: bool) -> bool {
        !find_document_refs(line).is_empty() && (previous_blank || has_classification_keyword(line))
    }
}

impl Segmenter for LineScanSegmenter {
    fn name(&self) -> &'static str {
        "line_scan"
    }

    fn segment(&self, text: &str) -> Vec<Block> {
        let normalized = normalize_line_endings(text);
        let mut candidates: Vec<(usize, String)> = Vec::new();
        let mut open: Option<(usize, Vec<&str>)> = None;
        // The start of the text counts as following a blank line
        let mut previous_blank = true;

        for (idx, raw_line) in normalized.split('\n').enumerate() {
            let line = raw_line.trim();

            if line.is_empty() {
                previous_blank = true;
                if let Some((_, lines)) = open.as_mut() {
                    lines.push(line);
                }
                continue;
            }

            if Self::opens_entry(line, previous_blank) {
                if let Some((start, lines)) = open.take() {
                    candidates.push((start, lines.join("\n")));
                }
                open = Some((idx, Vec::new()));
            }

            if let Some((_, lines)) = open.as_mut() {
                lines.push(line);
            }
            previous_blank = false;
        }

        if let Some((start, lines)) = open {
            candidates.push((start, lines.join("\n")));
        }

        finish_blocks(candidates, self.min_block_chars, self.name())
    }
}

/// Identity-only records for every distinct reference in the text.
///
/// Used when segmentation leaves nothing usable, so badly laid out input still
/// yields the document numbers it mentions.
pub fn scan_identity_records(text: &str) -> Vec<RawTransaction> {
    let mut seen = HashSet::new();
    find_document_refs(text)
        .into_iter()
        .filter(|reference| seen.insert(reference.key()))
        .map(|reference| RawTransaction::with_identity(reference.number, reference.year))
        .collect()
}
