//! Key names for persisted state.

/// Global names shared by every novel
pub const GLOBAL_NAMES: &str = "names";

/// Template used when copying a review packet
pub const COPY_MESSAGE: &str = "copyMessage";

/// Gemini API key
pub const API_KEY: &str = "apiKey";

/// Local names of one novel
pub fn local_names(novel_id: &str) -> String {
    format!("names:{}", novel_id)
}

/// Pending chapter URLs of one novel
pub fn links(novel_id: &str) -> String {
    format!("links:{}", novel_id)
}

/// Ingested raw chapter texts of one novel
pub fn contents(novel_id: &str) -> String {
    format!("contents:{}", novel_id)
}
