/*!
 * Error types for the chapterglot application.
 *
 * Provider, glossary and ingestion failures each get their own enum;
 * `AppError` is what the CLI reports.
 *
 * Transient API conditions (server busy, quota reached) never show up here:
 * the Gemini client retries them until they clear.
 */

use thiserror::Error;

/// Marker the API uses when a request is blocked by its content policy
pub const CONTENT_POLICY_MARKER: &str = "PROHIBITED_CONTENT";

/// Failures of a translation provider call that survived the retry loop
#[derive(Error, Debug)]
pub enum ProviderError {
    /// The request could not be sent or its body could not be read
    #[error("API request failed: {0}")]
    RequestFailed(String),

    /// The API answered with success but not with the expected text payload
    #[error("Malformed API response: {reason}\n{raw}")]
    MalformedResponse {
        /// What was missing or invalid
        reason: String,
        /// Raw response body
        raw: String,
    },

    /// Error returned by the API itself
    #[error("API responded with error: {status_code} - {message}")]
    ApiError {
        /// HTTP status code
        status_code: u16,
        /// Error message from the API
        message: String,
    },

    /// No API key was configured, stored, or entered
    #[error("Missing Gemini API key")]
    MissingCredential,
}

impl ProviderError {
    /// Whether the API refused the request on content-policy grounds
    pub fn is_content_policy_rejection(&self) -> bool {
        self.to_string().contains(CONTENT_POLICY_MARKER)
    }
}

/// Soft failures of the name-extraction step.
///
/// None of these stop a translated chapter from being rendered.
#[derive(Error, Debug)]
pub enum ExtractionError {
    /// The model answered with the `[ERROR]` sentinel
    #[error("Model refused to extract names")]
    Sentinel,

    /// The reply was not a JSON array of name pairs
    #[error("Bad JSON: {0}")]
    InvalidJson(String),

    /// The extraction request itself failed
    #[error("Provider error: {0}")]
    Provider(#[from] ProviderError),
}

/// Errors raised by glossary mutations
#[derive(Error, Debug)]
pub enum GlossaryError {
    /// No entry with the given original name exists
    #[error("Unknown name: {0}")]
    UnknownName(String),

    /// Persisting or loading the glossary failed
    #[error("Storage error: {0}")]
    Storage(#[from] anyhow::Error),
}

/// Top-level error reported by the CLI
#[derive(Error, Debug)]
pub enum AppError {
    /// Error from a file operation
    #[error("File error: {0}")]
    File(String),

    /// Error from a provider
    #[error("Provider error: {0}")]
    Provider(#[from] ProviderError),

    /// Error from the glossary
    #[error("Glossary error: {0}")]
    Glossary(#[from] GlossaryError),

    /// Any other error
    #[error("Unknown error: {0}")]
    Unknown(String),
}

impl From<anyhow::Error> for AppError {
    fn from(error: anyhow::Error) -> Self {
        Self::Unknown(error.to_string())
    }
}

impl From<std::io::Error> for AppError {
    fn from(error: std::io::Error) -> Self {
        Self::File(error.to_string())
    }
}
