/*!
 * Field recognition for a single block.
 *
 * Each field has its own recognizer and the first match inside the block
 * wins. Recognizers never invent values: a field that is not found stays
 * `None`. Extraction is pure, so running it twice on the same block yields
 * the same record.
 */

use once_cell::sync::Lazy;
use regex::Regex;
use serde::{Deserialize, Serialize};

use super::amounts::consideration_and_market;
use super::dates::find_dates;
use super::parties::{PartyNameResolver, PartyResolverKind};
use super::script::collapse_whitespace;
use super::segmenter::{Block, first_document_ref};
use super::vocabulary::{NATURE_OF_DOCUMENT, PROPERTY_TYPE, classify};
use crate::transaction::RawTransaction;

static SURVEY_REGEX: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(?i)(?:Survey\s*No\.?|\bS\.\s*No\.?|புல\s*எண்|சர்வே\s*எண்)[ \t]*[:\-]?[ \t]*(\d+(?:/\d+[A-Za-z]?)?)").unwrap()
});

static PLOT_REGEX: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(?i)(?:\bPlot|\bLot|மனை\s*எண்|மைன\s*எண்)[ \t]*(?:No\.?)?[ \t]*[:\-]?[ \t]*(\d+[A-Za-z]?(?:/\d+)?)").unwrap()
});

static HOUSE_REGEX: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(?i)(?:Door\s*No|House\s*No|கதவு\s*எண்)\.?[ \t]*[:\-]?[ \t]*(\d[0-9A-Za-z/\-]*)").unwrap()
});

static STREET_REGEX: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(?i)(?:Street(?:\s*Name)?|தெரு)[ \t]*[:\-][ \t]*([^\n,;]+)").unwrap()
});

static EXTENT_REGEX: Lazy<Regex> = Lazy::new(|| {
    Regex::new(concat!(
        r"(?i)\d+(?:\.\d+)?\s*(?:",
        r"Sq\.?\s*(?:Feet|Ft|Mtrs?|Metres?|Meters?|M)\b\.?",
        r"|Acres?\b|Cents?\b|Hectares?\b",
        r"|ச\.?\s*மீ(?:ட்டர்)?|சதுர\s*(?:அடி|மீட்டர்)",
        r")"
    ))
    .unwrap()
});

static VILLAGE_LABEL_REGEX: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(?i)(?:Village(?:\s*Name)?|கிராமம்)[ \t]*[:\-][ \t]*([^\n,;]+)").unwrap()
});

static VILLAGE_SUFFIX_REGEX: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"([\x{0B80}-\x{0BFF}]+)[ \t]*கிராமம்").unwrap());

static VOLUME_REGEX: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?i)\bVol(?:ume)?\.?[ \t]*(?:No\.?)?[ \t]*[:\-]?[ \t]*(\d+)").unwrap());

static PAGE_REGEX: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(?i)\bPage[ \t]*(?:No\.?)?[ \t]*[:\-]?[ \t]*(\d+)([ \t]*of[ \t]*\d+)?").unwrap()
});

static DOCUMENT_REMARKS_REGEX: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(?i)(?:Document\s*Remarks|Doc\.?\s*Remarks|ஆவணக்?\s*குறிப்பு)[ \t]*[:\-][ \t]*([^\n]+)").unwrap()
});

static PREVIOUS_DOCUMENT_REGEX: Lazy<Regex> = Lazy::new(|| {
    Regex::new(
        r"(?i)(?:Previous\s*(?:Document|Doc\.?)\s*(?:No\.?|Number)?|Prev\.?\s*Doc\.?\s*No\.?|முந்தைய\s*ஆவண\s*எண்)[ \t]*[:\-]?[ \t]*(\d+)\s*/\s*(\d{4})",
    )
    .unwrap()
});

static PRESENTATION_LABEL_REGEX: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?i)Presentation(?:\s*Date)?|Presented\s*on|தாக்கல்\s*தேதி").unwrap());

const BOUNDARY_MARKERS: &[&str] = &["Boundar", "boundar", "BOUNDAR", "எல்லை"];
const SCHEDULE_MARKERS: &[&str] = &["Schedule", "schedule", "SCHEDULE", "பட்டா"];

/// A village the extractor recognizes by name even without a label
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct KnownVillage {
    /// English name stored in the record
    pub name: String,
    /// Spellings, usually Tamil, that mean the same village
    #[serde(default)]
    pub aliases: Vec<String>,
}

impl KnownVillage {
    pub fn new(name: impl Into<String>, aliases: &[&str]) -> Self {
        Self {
            name: name.into(),
            aliases: aliases.iter().map(|alias| alias.to_string()).collect(),
        }
    }

    fn spellings(&self) -> impl Iterator<Item = &str> {
        std::iter::once(self.name.as_str()).chain(self.aliases.iter().map(String::as_str))
    }

    fn is_named(&self, candidate: &str) -> bool {
        self.spellings().any(|spelling| spelling.eq_ignore_ascii_case(candidate))
    }

    fn appears_in(&self, text: &str) -> bool {
        self.spellings().any(|spelling| !spelling.is_empty() && text.contains(spelling))
    }
}

/// Villages known out of the box
pub fn default_known_villages() -> Vec<KnownVillage> {
    vec![KnownVillage::new("Thiruvennainallur", &["திருவெண்ணைநல்லூர்", "திருவெண்ணெய்நல்லூர்"])]
}

fn first_capture(regex: &Regex, text: &str) -> Option<String> {
    let value = collapse_whitespace(regex.captures(text)?.get(1)?.as_str());
    if value.is_empty() { None } else { Some(value) }
}

fn first_line_with(text: &str, markers: &[&str]) -> Option<String> {
    text.lines()
        .find(|line| markers.iter().any(|marker| line.contains(marker)))
        .map(collapse_whitespace)
        .filter(|line| !line.is_empty())
}

/// Recognizes every supported field in a block of certificate text
#[derive(Debug)]
pub struct FieldExtractor {
    resolver: Box<dyn PartyNameResolver>,
    known_villages: Vec<KnownVillage>,
}

impl Default for FieldExtractor {
    fn default() -> Self {
        Self::new(PartyResolverKind::default(), default_known_villages())
    }
}

impl FieldExtractor {
    pub fn new(resolver: PartyResolverKind, known_villages: Vec<KnownVillage>) -> Self {
        Self::with_resolver(resolver.build(), known_villages)
    }

    /// Use a custom party-name resolver
    pub fn with_resolver(resolver: Box<dyn PartyNameResolver>, known_villages: Vec<KnownVillage>) -> Self {
        Self {
            resolver,
            known_villages,
        }
    }

    /// Extract a record from a segmented block
    pub fn extract_block(&self, block: &Block) -> Option<RawTransaction> {
        self.extract(&block.text)
    }

    /// Extract a record from block text.
    ///
    /// Returns `None` when the block has no document reference; such blocks
    /// are dropped rather than emitted empty.
    pub fn extract(&self, text: &str) -> Option<RawTransaction> {
        let reference = first_document_ref(text)?;
        let mut record = RawTransaction::with_identity(reference.number, reference.year);

        let dates = find_dates(text);
        let mut positional_dates = dates.iter();
        record.document_date = positional_dates.next().map(|token| token.iso());
        record.execution_date = positional_dates.next().map(|token| token.iso());
        record.presentation_date = Self::presentation_date(text);

        record.nature_of_document = classify(NATURE_OF_DOCUMENT, text).map(str::to_string);
        record.property_type = classify(PROPERTY_TYPE, text).map(str::to_string);

        let parties = self.resolver.resolve(text);
        record.seller_name_tamil = parties.seller;
        record.buyer_name_tamil = parties.buyer;

        record.house_number = first_capture(&HOUSE_REGEX, text);
        record.survey_number = first_capture(&SURVEY_REGEX, text);
        record.plot_number = first_capture(&PLOT_REGEX, text);
        record.property_extent = EXTENT_REGEX
            .find(text)
            .map(|found| collapse_whitespace(found.as_str()));
        record.village = self.village(text);
        record.street = first_capture(&STREET_REGEX, text);

        let (consideration, market) = consideration_and_market(text);
        record.consideration_value = consideration;
        record.market_value = market;

        record.volume_number = first_capture(&VOLUME_REGEX, text);
        record.page_number = Self::page_number(text);
        record.boundary_details = first_line_with(text, BOUNDARY_MARKERS);
        record.schedule_remarks = first_line_with(text, SCHEDULE_MARKERS);
        record.document_remarks = first_capture(&DOCUMENT_REMARKS_REGEX, text);
        record.previous_document_number = PREVIOUS_DOCUMENT_REGEX
            .captures(text)
            .and_then(|caps| Some(format!("{}/{}", caps.get(1)?.as_str(), caps.get(2)?.as_str())));

        Some(record)
    }

    /// A date token on the same or the next line after a presentation label
    fn presentation_date(text: &str) -> Option<String> {
        let label = PRESENTATION_LABEL_REGEX.find(text)?;
        let rest = &text[label.end()..];
        let window_end = rest
            .match_indices('\n')
            .nth(1)
            .map(|(idx, _)| idx)
            .unwrap_or(rest.len());
        find_dates(&rest[..window_end]).first().map(|token| token.iso())
    }

    /// Page number, skipping `Page N of M` footers
    fn page_number(text: &str) -> Option<String> {
        PAGE_REGEX
            .captures_iter(text)
            .find(|caps| caps.get(2).is_none())
            .and_then(|caps| caps.get(1))
            .map(|page| page.as_str().to_string())
    }

    /// Labeled village first, then a known village named anywhere, then a
    /// Tamil name written before the Tamil word for village
    fn village(&self, text: &str) -> Option<String> {
        if let Some(labeled) = first_capture(&VILLAGE_LABEL_REGEX, text) {
            let canonical = self
                .known_villages
                .iter()
                .find(|village| village.is_named(&labeled))
                .map(|village| village.name.clone());
            return Some(canonical.unwrap_or(labeled));
        }

        if let Some(known) = self.known_villages.iter().find(|village| village.appears_in(text)) {
            return Some(known.name.clone());
        }

        first_capture(&VILLAGE_SUFFIX_REGEX, text)
    }
}
