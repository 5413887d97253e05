/*!
 * Translation of Tamil field values.
 *
 * - `augmenter`: per-record translation with pacing, fallback and cancellation
 * - `cache`: per-run cache of provider answers
 * - `transliteration`: the local romanization fallback
 */

pub mod augmenter;
pub mod cache;
pub mod transliteration;

pub use self::augmenter::{AugmentOptions, AugmentOutcome, AugmentStats, Augmenter, CancellationFlag, Pacing};
pub use self::cache::{CacheStats, TranslationCache};
pub use self::transliteration::transliterate;
