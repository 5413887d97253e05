/*!
 * Static keyword tables shared by the segmenter and the field recognizers.
 *
 * Table order is priority order: the first entry whose keyword appears in a
 * block decides the value.
 */

/// A canonical English value and the literal keywords that imply it
#[derive(Debug, Clone, Copy)]
pub struct KeywordEntry {
    pub value: &'static str,
    pub keywords: &'static [&'static str],
}

impl KeywordEntry {
    fn matches(&self, text: &str) -> bool {
        self.keywords.iter().any(|keyword| text.contains(keyword))
    }
}

/// Nature-of-document classification
pub const NATURE_OF_DOCUMENT: &[KeywordEntry] = &[
    KeywordEntry { value: "Conveyance", keywords: &["Conveyance", "Sale Deed", "கிரையம்"] },
    KeywordEntry { value: "Mortgage", keywords: &["Mortgage", "அடமானம்"] },
    KeywordEntry { value: "Settlement", keywords: &["Settlement", "செட்டில்மெண்ட்"] },
    KeywordEntry { value: "Release", keywords: &["Release", "விடுதலை"] },
    KeywordEntry { value: "Partition", keywords: &["Partition", "பாகப்பிரிவினை"] },
    KeywordEntry { value: "Gift", keywords: &["Gift Deed", "தானம்"] },
];

/// Property type classification
pub const PROPERTY_TYPE: &[KeywordEntry] = &[
    KeywordEntry { value: "House Site", keywords: &["House Site", "வீட்டுமனை"] },
    KeywordEntry { value: "Agricultural Land", keywords: &["Agricultural Land", "விவசாய நிலம்"] },
    KeywordEntry { value: "Building", keywords: &["Building", "கட்டிடம்"] },
    KeywordEntry { value: "Vacant Land", keywords: &["Vacant Land", "காலி மனை"] },
];

/// Labels that mark the executant (seller) line
pub const EXECUTANT_LABELS: &[&str] = &["Executant", "எழுதிக்கொடுத்தவர்"];

/// Labels that mark the claimant (buyer) line
pub const CLAIMANT_LABELS: &[&str] = &["Claimant", "எழுதி வாங்கியவர்", "எழுதிவாங்கியவர்"];

/// First table value whose keywords occur in the text
pub fn classify(table: &[KeywordEntry], text: &str) -> Option<&'static str> {
    table.iter().find(|entry| entry.matches(text)).map(|entry| entry.value)
}

/// Whether the text mentions any nature-of-document keyword
pub fn has_classification_keyword(text: &str) -> bool {
    classify(NATURE_OF_DOCUMENT, text).is_some()
}

/// Whether any of the labels occurs in the text
pub fn contains_any(text: &str, labels: &[&str]) -> bool {
    labels.iter().any(|label| text.contains(label))
}
