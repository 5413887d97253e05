/*!
 * Tamil to Latin transliteration.
 *
 * Used as the fallback when a translation provider fails on a name. The
 * result is a romanized approximation, not a translation: consonants carry
 * an inherent `a` unless a vowel sign or the pulli (virama) follows.
 *
 * The tables are read-only statics, safe to share across concurrent runs.
 */

use once_cell::sync::Lazy;
use std::collections::HashMap;

use crate::extraction::script::{collapse_whitespace, is_tamil};

const PULLI: char = '\u{0BCD}';

const CONSONANTS: &[(char, &str)] = &[
    ('க', "k"),
    ('ங', "ng"),
    ('ச', "s"),
    ('ஞ', "ny"),
    ('ட', "t"),
    ('ண', "n"),
    ('த', "th"),
    ('ந', "n"),
    ('ப', "p"),
    ('ம', "m"),
    ('ய', "y"),
    ('ர', "r"),
    ('ல', "l"),
    ('வ', "v"),
    ('ழ', "zh"),
    ('ள', "l"),
    ('ற', "r"),
    ('ன', "n"),
    ('ஜ', "j"),
    ('ஶ', "sh"),
    ('ஷ', "sh"),
    ('ஸ', "s"),
    ('ஹ', "h"),
];

const VOWELS: &[(char, &str)] = &[
    ('அ', "a"),
    ('ஆ', "aa"),
    ('இ', "i"),
    ('ஈ', "ee"),
    ('உ', "u"),
    ('ஊ', "oo"),
    ('எ', "e"),
    ('ஏ', "ae"),
    ('ஐ', "ai"),
    ('ஒ', "o"),
    ('ஓ', "oo"),
    ('ஔ', "au"),
    ('ஃ', "h"),
];

const VOWEL_SIGNS: &[(char, &str)] = &[
    ('ா', "a"),
    ('ி', "i"),
    ('ீ', "ee"),
    ('ு', "u"),
    ('ூ', "oo"),
    ('ெ', "e"),
    ('ே', "ae"),
    ('ை', "ai"),
    ('ொ', "o"),
    ('ோ', "oo"),
    ('ௌ', "au"),
];

static CONSONANT_MAP: Lazy<HashMap<char, &'static str>> = Lazy::new(|| CONSONANTS.iter().copied().collect());
static VOWEL_MAP: Lazy<HashMap<char, &'static str>> = Lazy::new(|| VOWELS.iter().copied().collect());
static VOWEL_SIGN_MAP: Lazy<HashMap<char, &'static str>> = Lazy::new(|| VOWEL_SIGNS.iter().copied().collect());

fn tamil_digit(c: char) -> Option<char> {
    let offset = (c as u32).checked_sub('௦' as u32)?;
    if offset <= 9 { char::from_digit(offset, 10) } else { None }
}

/// Romanize Tamil text without title-casing.
///
/// Characters outside the Tamil block are kept; Tamil characters with no
/// mapping are dropped.
pub fn romanize(text: &str) -> String {
    let mut out = String::with_capacity(text.len() * 2);
    let mut chars = text.chars().peekable();

    while let Some(c) = chars.next() {
        if let Some(base) = CONSONANT_MAP.get(&c) {
            out.push_str(base);
            match chars.peek().copied() {
                Some(PULLI) => {
                    chars.next();
                }
                Some(next) => match VOWEL_SIGN_MAP.get(&next) {
                    Some(sign) => {
                        out.push_str(sign);
                        chars.next();
                    }
                    None => out.push('a'),
                },
                None => out.push('a'),
            }
        } else if let Some(vowel) = VOWEL_MAP.get(&c) {
            out.push_str(vowel);
        } else if let Some(digit) = tamil_digit(c) {
            out.push(digit);
        } else if !is_tamil(c) {
            out.push(c);
        }
    }

    out
}

fn capitalize_word(word: &str) -> String {
    let mut chars = word.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => String::new(),
    }
}

/// Transliterate a Tamil name into a capitalized Latin approximation.
///
/// Returns `None` when nothing readable is left.
pub fn transliterate(text: &str) -> Option<String> {
    let romanized = collapse_whitespace(&romanize(text));
    if romanized.is_empty() {
        return None;
    }
    Some(
        romanized
            .split(' ')
            .map(capitalize_word)
            .collect::<Vec<_>>()
            .join(" "),
    )
}
