/*!
 * Currency amount recognition.
 *
 * Amounts appear as `ரூ. 3,14,068/-`, `₹ 25000`, `Rs. 1,00,000` or in lakhs
 * (`3.14 Lakhs`). Indian digit grouping is ignored; only the integer part is
 * kept. A zero or unreadable amount is reported as `None`, never as 0.
 */

use once_cell::sync::Lazy;
use regex::Regex;

static POSITIONAL_AMOUNT_REGEX: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(?i)(?:ரூ\.?|₹|\bRs\.?)\s*(\d[\d,]*(?:\.\d+)?)(\s*Lakhs?\b)?|(\d+(?:\.\d+)?)\s*Lakhs?\b").unwrap()
});

static CONSIDERATION_LABEL_REGEX: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(?i)Consideration\s*Value[\s\S]{0,200}?(?:ரூ\.?|₹|\bRs\.?)\s*(\d[\d,]*(?:\.\d+)?)(\s*Lakhs?\b)?").unwrap()
});

static MARKET_LABEL_REGEX: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(?i)Market\s*Value[\s\S]{0,200}?(?:ரூ\.?|₹|\bRs\.?)\s*(\d[\d,]*(?:\.\d+)?)(\s*Lakhs?\b)?").unwrap()
});

const LAKH: f64 = 100_000.0;

/// One amount token found in a block
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AmountToken {
    /// Byte offset of the digits
    pub start: usize,
    /// Byte offset just past the amount, including a lakh suffix
    pub end: usize,
    pub value: Option<u64>,
}

/// Parse a grouped amount like `3,14,068` or `25000.50` into whole units
pub fn parse_amount(digits: &str) -> Option<u64> {
    let cleaned: String = digits.chars().filter(|c| *c != ',').collect();
    let integer_part = cleaned.split('.').next()?;
    match integer_part.parse::<u64>() {
        Ok(0) | Err(_) => None,
        Ok(value) => Some(value),
    }
}

/// Parse a lakh count like `3.14` into whole units
pub fn parse_lakhs(count: &str) -> Option<u64> {
    let lakhs: f64 = count.parse().ok()?;
    let value = (lakhs * LAKH).round();
    if !value.is_finite() || value < 1.0 || value > u64::MAX as f64 {
        return None;
    }
    Some(value as u64)
}

/// Every currency-marked or lakh amount, in order of appearance
pub fn positional_amounts(text: &str) -> Vec<AmountToken> {
    POSITIONAL_AMOUNT_REGEX
        .captures_iter(text)
        .filter_map(|caps| {
            let whole = caps.get(0)?;
            if let Some(digits) = caps.get(1) {
                Some(AmountToken {
                    start: digits.start(),
                    end: whole.end(),
                    value: marked_value(digits.as_str(), caps.get(2).is_some()),
                })
            } else {
                let count = caps.get(3)?;
                Some(AmountToken {
                    start: count.start(),
                    end: whole.end(),
                    value: parse_lakhs(count.as_str()),
                })
            }
        })
        .collect()
}

/// Value of a currency-marked amount, scaled when a lakh suffix follows
fn marked_value(digits: &str, in_lakhs: bool) -> Option<u64> {
    if in_lakhs {
        let count: String = digits.chars().filter(|c| *c != ',').collect();
        parse_lakhs(&count)
    } else {
        parse_amount(digits)
    }
}

fn labeled_amount(regex: &Regex, text: &str) -> Option<AmountToken> {
    let caps = regex.captures(text)?;
    let digits = caps.get(1)?;
    let whole = caps.get(0)?;
    Some(AmountToken {
        start: digits.start(),
        end: whole.end(),
        value: marked_value(digits.as_str(), caps.get(2).is_some()),
    })
}

/// Consideration and market value of one block.
///
/// Labeled amounts win. Without labels the first positional amount is the
/// consideration and the next one after it is the market value. When both
/// labels head one row of values, the market label reaches the consideration
/// amount first; the market value is then the next amount after it.
pub fn consideration_and_market(text: &str) -> (Option<u64>, Option<u64>) {
    let positional = positional_amounts(text);

    let consideration = labeled_amount(&CONSIDERATION_LABEL_REGEX, text).or_else(|| positional.first().copied());
    let next_after = |taken: AmountToken| positional.iter().find(|amount| amount.start >= taken.end).copied();

    let market = match (labeled_amount(&MARKET_LABEL_REGEX, text), consideration) {
        (Some(labeled), Some(taken)) if labeled.start == taken.start => next_after(taken),
        (Some(labeled), _) => Some(labeled),
        (None, taken) => taken.and_then(next_after),
    };

    (
        consideration.and_then(|amount| amount.value),
        market.and_then(|amount| amount.value),
    )
}
