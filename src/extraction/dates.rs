/*!
 * Date token recognition.
 *
 * Certificates print dates as `06-Feb-2013` or `06/02/2013`. Tokens that do
 * not form a real calendar date are skipped rather than guessed.
 */

use chrono::NaiveDate;
use once_cell::sync::Lazy;
use regex::Regex;

static DATE_TOKEN_REGEX: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"\b(\d{1,2})-([A-Za-z]{3})-(\d{4})\b|\b(\d{1,2})/(\d{1,2})/(\d{4})\b").unwrap()
});

/// A recognized date and where it sits in the source text
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DateToken {
    /// Byte offset of the token start
    pub start: usize,
    /// Byte offset just past the token
    pub end: usize,
    pub date: NaiveDate,
}

impl DateToken {
    /// ISO `YYYY-MM-DD` rendering
    pub fn iso(&self) -> String {
        self.date.format("%Y-%m-%d").to_string()
    }
}

/// All valid date tokens in order of appearance
pub fn find_dates(text: &str) -> Vec<DateToken> {
    DATE_TOKEN_REGEX
        .captures_iter(text)
        .filter_map(|caps| {
            let whole = caps.get(0)?;
            let date = if let (Some(day), Some(month), Some(year)) = (caps.get(1), caps.get(2), caps.get(3)) {
                let token = format!("{}-{}-{}", day.as_str(), month.as_str(), year.as_str());
                NaiveDate::parse_from_str(&token, "%d-%b-%Y").ok()?
            } else {
                let day: u32 = caps.get(4)?.as_str().parse().ok()?;
                let month: u32 = caps.get(5)?.as_str().parse().ok()?;
                let year: i32 = caps.get(6)?.as_str().parse().ok()?;
                NaiveDate::from_ymd_opt(year, month, day)?
            };
            Some(DateToken {
                start: whole.start(),
                end: whole.end(),
                date,
            })
        })
        .collect()
}
