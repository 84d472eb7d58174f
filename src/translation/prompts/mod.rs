/*!
 * Prompt engineering for chapter translation.
 *
 * This module provides:
 * - System instructions for chapters, titles and synopses
 * - The name extraction instruction and its input layout
 * - Sentinel replies the model uses to refuse a task
 */

pub mod templates;

// Re-export main types
pub use templates::{
    extraction_input, is_untranslatable, InstructionKind, EXTRACTION_ERROR_SENTINEL,
    NAME_EXTRACTION_INSTRUCTION, UNTRANSLATABLE_SENTINEL,
};
