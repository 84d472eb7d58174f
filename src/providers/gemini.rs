use async_trait::async_trait;
use log::{debug, error};
use reqwest::{Client, StatusCode};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use std::time::Duration;
use url::Url;

use crate::app_config::{GeminiConfig, RetryConfig};
use crate::errors::ProviderError;
use crate::providers::{LogNotifier, Notifier, Sleeper, TokioSleeper, Translator};

/// Gemini client for the `generateContent` API
///
/// Busy (503) and quota (429) answers are retried until they clear, with a
/// notice before every wait. Everything else is final.
pub struct Gemini {
    /// HTTP client for making requests
    client: Client,
    /// API key sent as the `key` query parameter
    api_key: String,
    /// Base URL of the API
    endpoint: String,
    /// Model name
    model: String,
    /// Retry delays
    retry: RetryPolicy,
    /// Receiver of busy/quota notices
    notifier: Arc<dyn Notifier>,
    /// Waits between attempts
    sleeper: Arc<dyn Sleeper>,
}

/// Delays applied to transient API answers
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RetryPolicy {
    /// Wait after HTTP 503
    pub busy_delay: Duration,
    /// Wait after HTTP 429 when the body carries no usable `retryDelay`
    pub default_quota_delay: Duration,
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self {
            busy_delay: Duration::from_millis(5000),
            default_quota_delay: Duration::from_millis(5000),
        }
    }
}

impl From<&RetryConfig> for RetryPolicy {
    fn from(config: &RetryConfig) -> Self {
        Self {
            busy_delay: Duration::from_millis(config.busy_delay_ms),
            default_quota_delay: Duration::from_millis(config.default_quota_delay_ms),
        }
    }
}

/// Text part of a content block
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Part {
    /// Text of the part
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub text: Option<String>,
}

/// Content block made of parts
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Content {
    /// Parts of the content
    #[serde(default)]
    pub parts: Vec<Part>,
}

impl Content {
    fn text(text: impl Into<String>) -> Self {
        Self {
            parts: vec![Part {
                text: Some(text.into()),
            }],
        }
    }
}

/// Request body for `generateContent`
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct GenerateContentRequest {
    /// System instruction for the model
    pub system_instruction: Content,
    /// User contents
    pub contents: Vec<Content>,
}

impl GenerateContentRequest {
    /// Create a request from an instruction and one input text
    pub fn new(instruction: impl Into<String>, input: impl Into<String>) -> Self {
        Self {
            system_instruction: Content::text(instruction),
            contents: vec![Content::text(input)],
        }
    }
}

/// One generated candidate
#[derive(Debug, Clone, Default, Deserialize)]
pub struct Candidate {
    /// Generated content
    #[serde(default)]
    pub content: Option<Content>,
}

/// Response body of `generateContent`
#[derive(Debug, Clone, Default, Deserialize)]
pub struct GenerateContentResponse {
    /// Generated candidates
    #[serde(default)]
    pub candidates: Vec<Candidate>,
}

impl GenerateContentResponse {
    /// Text of the first part of the first candidate, when non-empty
    pub fn first_text(&self) -> Option<&str> {
        self.candidates
            .first()?
            .content
            .as_ref()?
            .parts
            .first()?
            .text
            .as_deref()
            .filter(|t| !t.is_empty())
    }
}

/// Error body returned with non-success statuses
#[derive(Debug, Clone, Default, Deserialize)]
struct ErrorEnvelope {
    #[serde(default)]
    error: ErrorBody,
}

#[derive(Debug, Clone, Default, Deserialize)]
struct ErrorBody {
    #[serde(default)]
    details: Vec<serde_json::Value>,
}

/// Retry delay announced in a 429 body, e.g. `"3s"` or `"2.5s"`
///
/// Every entry of `error.details` is searched; the first parseable
/// `retryDelay` wins.
pub fn parse_retry_delay(body: &str) -> Option<Duration> {
    let envelope: ErrorEnvelope = serde_json::from_str(body).ok()?;

    envelope
        .error
        .details
        .iter()
        .filter_map(|detail| detail.get("retryDelay")?.as_str())
        .find_map(parse_seconds)
}

fn parse_seconds(value: &str) -> Option<Duration> {
    let seconds: f64 = value.trim().trim_end_matches('s').parse().ok()?;
    if !seconds.is_finite() || seconds < 0.0 {
        return None;
    }
    Some(Duration::from_millis((seconds * 1000.0).round() as u64))
}

fn format_seconds(delay: Duration) -> String {
    format!("Retry again in {} s", delay.as_millis() as f64 / 1000.0)
}

impl Gemini {
    /// Create a new Gemini client
    pub fn new(
        api_key: impl Into<String>,
        endpoint: impl Into<String>,
        model: impl Into<String>,
    ) -> Self {
        Self {
            client: Client::builder()
                .timeout(Duration::from_secs(120))
                .build()
                .unwrap_or_default(),
            api_key: api_key.into(),
            endpoint: endpoint.into(),
            model: model.into(),
            retry: RetryPolicy::default(),
            notifier: Arc::new(LogNotifier),
            sleeper: Arc::new(TokioSleeper),
        }
    }

    /// Create a Gemini client from configuration and a resolved key
    pub fn from_config(config: &GeminiConfig, retry: &RetryConfig, api_key: impl Into<String>) -> Self {
        Self::new(api_key, config.endpoint.clone(), config.model.clone())
            .with_timeout(Duration::from_secs(config.timeout_secs))
            .with_retry_policy(RetryPolicy::from(retry))
    }

    /// Replace the request timeout
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.client = Client::builder()
            .timeout(timeout)
            .build()
            .unwrap_or_default();
        self
    }

    /// Replace the retry delays
    pub fn with_retry_policy(mut self, retry: RetryPolicy) -> Self {
        self.retry = retry;
        self
    }

    /// Replace the notice receiver
    pub fn with_notifier(mut self, notifier: Arc<dyn Notifier>) -> Self {
        self.notifier = notifier;
        self
    }

    /// Replace the retry timer
    pub fn with_sleeper(mut self, sleeper: Arc<dyn Sleeper>) -> Self {
        self.sleeper = sleeper;
        self
    }

    /// Model this client talks to
    pub fn model(&self) -> &str {
        &self.model
    }

    fn request_url(&self) -> Result<Url, ProviderError> {
        let base = format!(
            "{}/v1beta/models/{}:generateContent",
            self.endpoint.trim_end_matches('/'),
            self.model
        );

        let mut url = Url::parse(&base)
            .map_err(|e| ProviderError::RequestFailed(format!("Invalid endpoint '{}': {}", base, e)))?;
        url.query_pairs_mut().append_pair("key", &self.api_key);

        Ok(url)
    }

    /// Send one `generateContent` request, retrying busy and quota answers
    pub async fn generate(&self, request: &GenerateContentRequest) -> Result<String, ProviderError> {
        if self.api_key.trim().is_empty() {
            return Err(ProviderError::MissingCredential);
        }

        let url = self.request_url()?;

        loop {
            let response = self
                .client
                .post(url.clone())
                .json(request)
                .send()
                .await
                .map_err(|e| ProviderError::RequestFailed(format!("Failed to send request to Gemini API: {}", e)))?;

            let status = response.status();
            let body = response
                .text()
                .await
                .map_err(|e| ProviderError::RequestFailed(format!("Failed to read Gemini API response: {}", e)))?;

            if status == StatusCode::SERVICE_UNAVAILABLE {
                let delay = self.retry.busy_delay;
                self.notifier.notice("Gemini server is busy", &format_seconds(delay));
                self.sleeper.sleep(delay).await;
                continue;
            }

            if status == StatusCode::TOO_MANY_REQUESTS {
                let delay = parse_retry_delay(&body).unwrap_or(self.retry.default_quota_delay);
                self.notifier.notice("Gemini quota is reached", &format_seconds(delay));
                self.sleeper.sleep(delay).await;
                continue;
            }

            if !status.is_success() {
                error!("Gemini API error ({}): {}", status, body);
                return Err(ProviderError::ApiError {
                    status_code: status.as_u16(),
                    message: body,
                });
            }

            let parsed: GenerateContentResponse = serde_json::from_str(&body).map_err(|e| {
                ProviderError::MalformedResponse {
                    reason: format!("Failed to parse Gemini API response: {}", e),
                    raw: body.clone(),
                }
            })?;

            return match parsed.first_text() {
                Some(text) => {
                    debug!("Gemini answered with {} characters", text.chars().count());
                    Ok(text.to_string())
                }
                None => Err(ProviderError::MalformedResponse {
                    reason: "missing candidates[0].content.parts[0].text".to_string(),
                    raw: body,
                }),
            };
        }
    }
}

#[async_trait]
impl Translator for Gemini {
    async fn translate(&self, instruction: &str, input: &str) -> Result<String, ProviderError> {
        self.generate(&GenerateContentRequest::new(instruction, input)).await
    }
}
