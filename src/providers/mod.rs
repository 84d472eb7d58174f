/*!
 * Provider implementations for translation services.
 *
 * This module contains the client seams used by the chapter pipeline:
 * - Gemini: Google Gemini `generateContent` API
 * - Mock: scripted translator for tests and dry runs
 */

use async_trait::async_trait;
use log::warn;
use std::time::Duration;

use crate::errors::ProviderError;

/// Common trait for all translation backends
///
/// The pipeline only needs one operation: send a system instruction plus an
/// input text and get the model's text back. Transient conditions are the
/// implementation's business; an error here is final.
#[async_trait]
pub trait Translator: Send + Sync {
    /// Run `input` through the model under `instruction`
    ///
    /// # Arguments
    /// * `instruction` - System instruction for the model
    /// * `input` - Text to process
    ///
    /// # Returns
    /// * `Result<String, ProviderError>` - The model's text reply or an error
    async fn translate(&self, instruction: &str, input: &str) -> Result<String, ProviderError>;
}

/// Receiver of non-blocking operator notices (server busy, quota reached)
pub trait Notifier: Send + Sync {
    /// Report a transient condition
    fn notice(&self, reason: &str, detail: &str);
}

/// Notifier that writes notices to the log
#[derive(Debug, Default, Clone, Copy)]
pub struct LogNotifier;

impl Notifier for LogNotifier {
    fn notice(&self, reason: &str, detail: &str) {
        warn!("{}. {}", reason, detail);
    }
}

/// Waits between retries
#[async_trait]
pub trait Sleeper: Send + Sync {
    /// Suspend the current task for `duration`
    async fn sleep(&self, duration: Duration);
}

/// Sleeper backed by the tokio timer
#[derive(Debug, Default, Clone, Copy)]
pub struct TokioSleeper;

#[async_trait]
impl Sleeper for TokioSleeper {
    async fn sleep(&self, duration: Duration) {
        tokio::time::sleep(duration).await;
    }
}

pub mod gemini;
pub mod mock;

pub use gemini::{Gemini, RetryPolicy};
pub use mock::{MockBehavior, MockTranslator};
