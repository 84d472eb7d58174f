/*!
 * API key resolution.
 *
 * The key comes from, in order: the configured value (config file, CLI
 * flag or `GEMINI_API_KEY`), the key persisted under `apiKey`, or the
 * operator. A key entered by the operator is persisted for later sessions.
 */

use log::{debug, info};

use crate::errors::{AppError, ProviderError};
use crate::prompter::Prompter;
use crate::storage::{self, keys, KeyValueStore};

/// Prompt shown when no key is configured or stored
pub const API_KEY_PROMPT: &str = "Enter your Gemini API key";

/// Find the Gemini API key, asking the operator as a last resort
pub async fn resolve_api_key(
    configured: Option<&str>,
    store: &dyn KeyValueStore,
    prompter: &dyn Prompter,
) -> Result<String, AppError> {
    if let Some(key) = configured.map(str::trim).filter(|k| !k.is_empty()) {
        debug!("Using configured Gemini API key");
        return Ok(key.to_string());
    }

    let stored: Option<String> = storage::load_or_default(store, keys::API_KEY).await?;
    if let Some(key) = stored.map(|k| k.trim().to_string()).filter(|k| !k.is_empty()) {
        debug!("Using stored Gemini API key");
        return Ok(key);
    }

    let entered = prompter
        .prompt(API_KEY_PROMPT, None)
        .map(|k| k.trim().to_string())
        .filter(|k| !k.is_empty())
        .ok_or(ProviderError::MissingCredential)?;

    storage::save(store, keys::API_KEY, &entered).await?;
    info!("Stored Gemini API key for later sessions");

    Ok(entered)
}
