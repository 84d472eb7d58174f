/*!
 * Mock translator implementations for testing.
 *
 * This module provides mock translators that simulate different behaviors:
 * - `MockTranslator::echo()` - Answers with the input text
 * - `MockTranslator::scripted(..)` - Answers with queued replies in order
 * - `MockTranslator::failing()` - Always fails with an error
 *
 * Every call is recorded so tests can inspect what the pipeline sent.
 */

use async_trait::async_trait;
use parking_lot::Mutex;
use std::collections::VecDeque;
use std::sync::Arc;

use crate::errors::ProviderError;
use crate::providers::Translator;

/// One recorded request
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MockCall {
    /// System instruction sent
    pub instruction: String,
    /// Input text sent
    pub input: String,
}

/// Behavior mode for the mock translator
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MockBehavior {
    /// Echo the input back
    Echo,
    /// Pop the next queued reply; echo when the queue is empty
    Scripted,
    /// Always fail with an API error
    Failing,
}

/// Mock translator for testing pipeline behavior
#[derive(Debug, Clone)]
pub struct MockTranslator {
    behavior: MockBehavior,
    replies: Arc<Mutex<VecDeque<Result<String, ProviderError>>>>,
    calls: Arc<Mutex<Vec<MockCall>>>,
}

impl MockTranslator {
    /// Create a new mock translator with the specified behavior
    pub fn new(behavior: MockBehavior) -> Self {
        Self {
            behavior,
            replies: Arc::new(Mutex::new(VecDeque::new())),
            calls: Arc::new(Mutex::new(Vec::new())),
        }
    }

    /// Translator that answers with its input
    pub fn echo() -> Self {
        Self::new(MockBehavior::Echo)
    }

    /// Translator that answers with `replies` in order
    pub fn scripted<I>(replies: I) -> Self
    where
        I: IntoIterator<Item = Result<String, ProviderError>>,
    {
        let translator = Self::new(MockBehavior::Scripted);
        translator.replies.lock().extend(replies);
        translator
    }

    /// Translator that always errors
    pub fn failing() -> Self {
        Self::new(MockBehavior::Failing)
    }

    /// Queue one more reply
    pub fn push_reply(&self, reply: Result<String, ProviderError>) {
        self.replies.lock().push_back(reply);
    }

    /// Every request received so far
    pub fn calls(&self) -> Vec<MockCall> {
        self.calls.lock().clone()
    }

    /// Number of requests received so far
    pub fn call_count(&self) -> usize {
        self.calls.lock().len()
    }
}

#[async_trait]
impl Translator for MockTranslator {
    async fn translate(&self, instruction: &str, input: &str) -> Result<String, ProviderError> {
        self.calls.lock().push(MockCall {
            instruction: instruction.to_string(),
            input: input.to_string(),
        });

        match self.behavior {
            MockBehavior::Echo => Ok(input.to_string()),
            MockBehavior::Scripted => {
                let next = self.replies.lock().pop_front();
                next.unwrap_or_else(|| Ok(input.to_string()))
            }
            MockBehavior::Failing => Err(ProviderError::ApiError {
                message: "Simulated provider failure".to_string(),
                status_code: 500,
            }),
        }
    }
}
