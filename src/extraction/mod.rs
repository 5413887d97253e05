/*!
 * Turning certificate text into raw transaction records.
 *
 * - `segmenter`: entry boundaries and the identity-only fallback scan
 * - `fields`: per-field recognizers for one block
 * - `parties`: seller/buyer name resolution strategies
 * - `amounts`, `dates`: value recognizers shared by the field extractor
 * - `script`: Tamil detection and malformed-input checks
 * - `vocabulary`: classification keyword tables
 */

pub mod amounts;
pub mod dates;
pub mod fields;
pub mod parties;
pub mod script;
pub mod segmenter;
pub mod vocabulary;

pub use fields::{FieldExtractor, KnownVillage, default_known_villages};
pub use parties::{LabelProximityResolver, PartyNameResolver, PartyNames, PartyResolverKind, PositionalResolver};
pub use segmenter::{
    Block, LineScanSegmenter, SegmentationStrategy, Segmenter, WholeBlockSegmenter, scan_identity_records,
};
