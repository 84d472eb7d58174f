/*!
 * Name extraction pass.
 *
 * After a chapter is translated, the model is shown both texts and asked
 * for the proper nouns it mapped. The reply is a JSON array of
 * `{"original", "translated"}` pairs, possibly wrapped in a code fence.
 * Failures here never stop the chapter from rendering.
 */

use log::{debug, warn};
use serde_json::Value;

use crate::errors::{ExtractionError, CONTENT_POLICY_MARKER};
use crate::glossary::NameCandidate;
use crate::providers::Translator;
use crate::translation::prompts::{extraction_input, EXTRACTION_ERROR_SENTINEL, NAME_EXTRACTION_INSTRUCTION};

/// Remove Markdown code fences around a JSON reply
pub fn strip_code_fences(reply: &str) -> String {
    if !reply.contains("```") {
        return reply.to_string();
    }

    reply.replace("```json", "").replace("```", "")
}

/// Parse an extraction reply into name candidates.
///
/// The reply must be a JSON array; elements that are not name objects are
/// skipped. A content-policy marker yields no names.
pub fn parse_name_candidates(reply: &str) -> Result<Vec<NameCandidate>, ExtractionError> {
    if reply.contains(CONTENT_POLICY_MARKER) {
        debug!("Extraction blocked by content policy, no names");
        return Ok(Vec::new());
    }

    let cleaned = strip_code_fences(reply);
    let cleaned = cleaned.trim();

    if cleaned == EXTRACTION_ERROR_SENTINEL {
        return Err(ExtractionError::Sentinel);
    }

    let values: Vec<Value> =
        serde_json::from_str(cleaned).map_err(|_| ExtractionError::InvalidJson(cleaned.to_string()))?;

    Ok(values
        .into_iter()
        .filter_map(|value| serde_json::from_value::<NameCandidate>(value).ok())
        .collect())
}

/// Ask the model for the names mapped between `raw` and `translated`
pub async fn extract_names(
    translator: &dyn Translator,
    raw: &str,
    translated: &str,
) -> Result<Vec<NameCandidate>, ExtractionError> {
    let input = extraction_input(raw, translated);

    match translator.translate(NAME_EXTRACTION_INSTRUCTION, &input).await {
        Ok(reply) => parse_name_candidates(&reply),
        Err(e) if e.is_content_policy_rejection() => {
            debug!("Extraction request blocked by content policy, no names");
            Ok(Vec::new())
        }
        Err(e) => {
            warn!("Name extraction request failed: {}", e);
            Err(ExtractionError::Provider(e))
        }
    }
}
