/*!
 * Instruction templates for chapter translation and name extraction.
 *
 * Every instruction asks for bare output and names a sentinel the model
 * answers with when it cannot do the task.
 */

/// Reply meaning the model could not translate its input
pub const UNTRANSLATABLE_SENTINEL: &str = "[UNTRANSLATABLE]";

/// Reply meaning the model could not extract names
pub const EXTRACTION_ERROR_SENTINEL: &str = "[ERROR]";

const TRANSLATOR_ROLE: &str = "You are a professional literary translator specializing in Chinese-to-English translations of web novels.";

const KEEP_ENGLISH_NAMES: &str = "If an English name is already present in the Chinese chapter, do not change it.";

const BARE_OUTPUT: &str = "Do not include any explanations, commentary, or additional text. If you cannot translate, respond with [UNTRANSLATABLE] and nothing else.";

/// What a translation instruction is for
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InstructionKind {
    /// A full chapter, title line included
    Chapter,
    /// The novel title
    Title,
    /// The novel synopsis
    Synopsis,
}

impl InstructionKind {
    /// The system instruction for this kind of text
    pub fn instruction(self) -> String {
        match self {
            Self::Chapter => format!(
                "{} Your task is to translate the Chinese novel chapter into English. {} Put proper spacing between each paragraphs. Only output the translated chapter, do not remove the chapter title. {}",
                TRANSLATOR_ROLE, KEEP_ENGLISH_NAMES, BARE_OUTPUT
            ),
            Self::Title => format!(
                "{} Your task is to translate the Chinese novel title into English. {} Only output the translated title. {}",
                TRANSLATOR_ROLE, KEEP_ENGLISH_NAMES, BARE_OUTPUT
            ),
            Self::Synopsis => format!(
                "{} Your task is to translate the Chinese novel synopsis into English. {} Only output the translated synopsis. {}",
                TRANSLATOR_ROLE, KEEP_ENGLISH_NAMES, BARE_OUTPUT
            ),
        }
    }
}

/// Instruction for pulling name pairs out of a translated chapter
pub const NAME_EXTRACTION_INSTRUCTION: &str = r#"You are a bilingual data extraction expert specializing in identifying and mapping proper nouns in Chinese-English novel texts. Your task is to extract all proper nouns from the Chinese and English chapter. Create a JSON array following this pattern: [{"original":"Chinese name","translated":"English name"}]. Only output the JSON array. Do not include any explanations, commentary, or additional text. If you cannot execute this task, respond with [ERROR] and nothing else."#;

/// Input for the name extraction request
pub fn extraction_input(raw: &str, translated: &str) -> String {
    format!("Chinese chapter:\n{}\n\nEnglish chapter:\n{}", raw, translated)
}

/// Whether a reply is the bare untranslatable sentinel
pub fn is_untranslatable(reply: &str) -> bool {
    reply.trim() == UNTRANSLATABLE_SENTINEL
}
