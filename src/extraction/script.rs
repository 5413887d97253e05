/*!
 * Script detection helpers.
 *
 * Tamil detection works on the Unicode Tamil block (U+0B80..U+0BFF). The
 * malformed-input check is deliberately coarse: it only has to tell extracted
 * PDF text (noisy but textual) apart from binary data fed in by mistake.
 */

/// First code point of the Tamil block
pub const TAMIL_START: char = '\u{0B80}';

/// Last code point of the Tamil block
pub const TAMIL_END: char = '\u{0BFF}';

/// Share of suspicious characters above which text is considered binary
const MAX_SUSPICIOUS_RATIO: f64 = 0.10;

/// Whether a character belongs to the Tamil block
pub fn is_tamil(c: char) -> bool {
    (TAMIL_START..=TAMIL_END).contains(&c)
}

/// Whether the text has at least one Tamil code point
pub fn contains_tamil(text: &str) -> bool {
    text.chars().any(is_tamil)
}

/// Collapse every whitespace run to a single space and trim the ends
pub fn collapse_whitespace(text: &str) -> String {
    text.split_whitespace().collect::<Vec<_>>().join(" ")
}

/// Explain why the text cannot be treated as document text, if it cannot.
///
/// NUL bytes are rejected outright. Otherwise the text is rejected when more
/// than a tenth of its characters are control characters (other than the
/// usual line, tab and page-break characters) or U+FFFD replacement marks
/// left behind by a lossy decode.
pub fn malformed_reason(text: &str) -> Option<String> {
    if text.contains('\0') {
        return Some("input contains NUL bytes".to_string());
    }

    let mut total = 0usize;
    let mut suspicious = 0usize;
    for c in text.chars() {
        total += 1;
        let allowed_control = matches!(c, '\n' | '\r' | '\t' | '\u{000C}');
        if (c.is_control() && !allowed_control) || c == char::REPLACEMENT_CHARACTER {
            suspicious += 1;
        }
    }

    if total == 0 {
        return None;
    }

    let ratio = suspicious as f64 / total as f64;
    if ratio > MAX_SUSPICIOUS_RATIO {
        Some(format!(
            "{} of {} characters are control or replacement characters",
            suspicious, total
        ))
    } else {
        None
    }
}
