/*!
 * Party-name resolution.
 *
 * Certificates rarely label who sold and who bought in a form that survives
 * PDF text extraction. The positional resolver keeps the long-standing
 * convention (first Tamil run is the seller, second the buyer) that stored
 * records were built with. The label-proximity resolver looks for the
 * executant and claimant labels first and falls back to the convention for
 * whichever side it cannot place.
 */

use once_cell::sync::Lazy;
use regex::Regex;
use serde::{Deserialize, Serialize};
use std::fmt;

use super::script::collapse_whitespace;
use super::vocabulary::{CLAIMANT_LABELS, EXECUTANT_LABELS, contains_any};

/// Runs of Tamil letters on one line, allowing inner spaces and initials dots
static TAMIL_RUN_REGEX: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"[\x{0B80}-\x{0BFF}][\x{0B80}-\x{0BFF} \t.]{2,}").unwrap());

/// Lines after a label line that may still hold the name
const LABEL_LOOKAHEAD_LINES: usize = 2;

/// Seller and buyer names as found in the block, still in Tamil script
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PartyNames {
    pub seller: Option<String>,
    pub buyer: Option<String>,
}

/// Strategy interface for deciding who is seller and who is buyer
pub trait PartyNameResolver: Send + Sync + fmt::Debug {
    fn resolve(&self, block: &str) -> PartyNames;
}

/// Available resolver strategies
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PartyResolverKind {
    #[default]
    Positional,
    LabelProximity,
}

impl PartyResolverKind {
    pub fn build(self) -> Box<dyn PartyNameResolver> {
        match self {
            Self::Positional => Box::new(PositionalResolver),
            Self::LabelProximity => Box::new(LabelProximityResolver),
        }
    }
}

impl fmt::Display for PartyResolverKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Positional => f.write_str("positional"),
            Self::LabelProximity => f.write_str("label_proximity"),
        }
    }
}

/// Distinct Tamil runs longer than three characters, in order of appearance.
///
/// Dots are stripped and inner whitespace collapsed before comparing, so
/// `மு. கண்ணன்` and `மு கண்ணன்` count as the same run.
pub fn tamil_runs(text: &str) -> Vec<String> {
    let mut runs: Vec<String> = Vec::new();
    for found in TAMIL_RUN_REGEX.find_iter(text) {
        let cleaned = collapse_whitespace(&found.as_str().replace('.', " "));
        if cleaned.chars().count() <= 3 || runs.contains(&cleaned) {
            continue;
        }
        runs.push(cleaned);
    }
    runs
}

/// First distinct run is the seller, second the buyer
#[derive(Debug, Clone, Copy, Default)]
pub struct PositionalResolver;

impl PartyNameResolver for PositionalResolver {
    fn resolve(&self, block: &str) -> PartyNames {
        let mut runs = tamil_runs(block).into_iter();
        PartyNames {
            seller: runs.next(),
            buyer: runs.next(),
        }
    }
}

/// Reads names next to the executant and claimant labels
#[derive(Debug, Clone, Copy, Default)]
pub struct LabelProximityResolver;

impl LabelProximityResolver {
    /// First Tamil run on the label line or the few non-empty lines after it,
    /// skipping the label words themselves
    fn name_near(lines: &[&str], labels: &[&str]) -> Option<String> {
        let label_idx = lines.iter().position(|line| contains_any(line, labels))?;

        let window = lines[label_idx..]
            .iter()
            .filter(|line| !line.trim().is_empty())
            .take(LABEL_LOOKAHEAD_LINES + 1);

        for line in window {
            let mut stripped = line.to_string();
            for label in EXECUTANT_LABELS.iter().chain(CLAIMANT_LABELS) {
                stripped = stripped.replace(label, " ");
            }
            if let Some(run) = tamil_runs(&stripped).into_iter().next() {
                return Some(run);
            }
        }
        None
    }
}

impl PartyNameResolver for LabelProximityResolver {
    fn resolve(&self, block: &str) -> PartyNames {
        let lines: Vec<&str> = block.lines().collect();
        let seller = Self::name_near(&lines, EXECUTANT_LABELS);
        let buyer = Self::name_near(&lines, CLAIMANT_LABELS);

        if seller.is_some() && buyer.is_some() {
            return PartyNames { seller, buyer };
        }

        let positional = PositionalResolver.resolve(block);
        PartyNames {
            seller: seller.or(positional.seller),
            buyer: buyer.or(positional.buyer),
        }
    }
}
