/*!
 * # ectrans - Encumbrance Certificate Translator
 *
 * A Rust library that turns the extracted text of Tamil Nadu encumbrance
 * certificates into structured, partly English transaction records.
 *
 * ## Features
 *
 * - Split a certificate into one block per registration entry
 * - Recognize document numbers, dates, parties, property details and amounts
 * - Translate Tamil party and place names using various providers:
 *   - Google Cloud Translation
 *   - OpenAI API
 *   - Anthropic API
 *   - Offline transliteration
 * - Fall back to transliteration when a provider fails
 * - Store and search records in SQLite
 *
 * ## Architecture
 *
 * The library is organized in these main modules:
 * - `transaction`: raw and translated transaction records
 * - `extraction`: segmentation and field recognition:
 *   - `extraction::segmenter`: entry boundaries and the identity-only scan
 *   - `extraction::fields`: per-field recognizers
 *   - `extraction::parties`: seller/buyer name resolution
 * - `translation`: augmentation of Tamil fields:
 *   - `translation::augmenter`: pacing, fallback and cancellation
 *   - `translation::cache`: per-run answer cache
 *   - `translation::transliteration`: Tamil to Latin fallback table
 * - `providers`: translation provider clients
 * - `assembler`: reshaping into storage records
 * - `pipeline`: the end-to-end run for one upload
 * - `database`: SQLite storage and search
 * - `app_config`: configuration management
 * - `app_controller`: file and folder driver used by the CLI
 * - `file_utils`: file system operations
 * - `errors`: custom error types for the application
 */

// Global lints configuration
#![allow(clippy::uninlined_format_args)]
#![allow(clippy::redundant_closure_for_method_calls)]

// Public modules
pub mod app_config;
pub mod app_controller;
pub mod assembler;
pub mod database;
pub mod errors;
pub mod extraction;
pub mod file_utils;
pub mod pipeline;
pub mod providers;
pub mod transaction;
pub mod translation;

// Re-export main types for easier usage
pub use app_config::Config;
pub use assembler::NewTransactionRecord;
pub use errors::{AppError, PipelineError, ProviderError};
pub use pipeline::{Pipeline, PipelineReport};
pub use providers::Translator;
pub use transaction::{RawTransaction, TamilField, TranslatedTransaction};
pub use translation::{Augmenter, CancellationFlag};
