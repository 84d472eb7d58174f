/*!
 * Chapter translation with consistent names.
 *
 * This module contains everything between a raw chapter and its rendered
 * translation. It is split into several submodules:
 *
 * - `chapter`: the chapter value and its states
 * - `pipeline`: translation and name extraction passes
 * - `novel`: title and synopsis translation
 * - `render`: colored name spans and error panels
 * - `prompts`: instructions and sentinel replies
 * - `numerals`: large numeral rewriting
 * - `text`: literal replacement and HTML escaping
 */

// Re-export main types for easier usage
pub use self::chapter::{Chapter, ChapterState};
pub use self::novel::{translate_header, HeaderTranslation};
pub use self::numerals::normalize_numerals;
pub use self::pipeline::{ChapterOutcome, ChapterPipeline, ChapterView};
pub use self::render::{ErrorPanel, NameColor};

// Submodules
pub mod chapter;
pub mod novel;
pub mod numerals;
pub mod pipeline;
pub mod prompts;
pub mod render;
pub mod text;
