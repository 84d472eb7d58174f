/*!
 * # chapterglot - consistent names for machine-translated web novels
 *
 * A Rust library that translates Chinese web novel chapters to English
 * with Gemini while keeping proper nouns consistent across chapters
 * translated independently and out of order.
 *
 * ## Features
 *
 * - Durable glossary of local (per novel) and global names
 * - Known names substituted before translation, longest first
 * - New names extracted from every translated chapter
 * - Parent, child and similar name inference for human review
 * - Large Chinese numerals rewritten as English magnitude words
 * - Retries through busy and quota answers from the Gemini API
 * - Ingestion queue feeding a per-novel content log for context search
 *
 * ## Architecture
 *
 * The library is organized in these main modules:
 * - `app_config`: Configuration management
 * - `storage`: Key-value persistence (SQLite or memory)
 * - `glossary`: Name entries, relationships and context search
 * - `translation`: Chapter pipeline:
 *   - `translation::pipeline`: Translation and name extraction passes
 *   - `translation::render`: Colored name spans and error panels
 *   - `translation::numerals`: Numeral normalization
 * - `providers`: Translator implementations:
 *   - `providers::gemini`: Gemini API client
 *   - `providers::mock`: Scripted translator
 * - `review`: Human review operations
 * - `ingestion`: Chapter link queue and content log
 * - `credentials`: API key resolution
 * - `prompter`: Operator prompts
 * - `errors`: Custom error types for the application
 *
 * ## License
 *
 * This project is licensed under the MIT License
 */

// Global lints configuration
// These lints will be allowed but not auto-fixed
#![allow(clippy::uninlined_format_args)]
#![allow(clippy::redundant_closure_for_method_calls)]

// Public modules
pub mod app_config;
pub mod credentials;
pub mod errors;
pub mod glossary;
pub mod ingestion;
pub mod prompter;
pub mod providers;
pub mod review;
pub mod storage;
pub mod translation;

// Re-export main types for easier usage
pub use app_config::Config;
pub use errors::{AppError, ExtractionError, GlossaryError, ProviderError};
pub use glossary::{Glossary, NameCandidate, NameEntry, Scope};
pub use ingestion::{ChapterFetcher, HttpChapterFetcher, IngestionQueue};
pub use providers::{Gemini, Translator};
pub use review::ReviewSession;
pub use storage::{KeyValueStore, MemoryStore, SqliteStore};
pub use translation::{Chapter, ChapterOutcome, ChapterPipeline, ChapterView};
