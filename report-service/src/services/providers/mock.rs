//! Mock provider implementation for testing.

use super::{GenerationParams, ProviderError, TextProvider};
use async_trait::async_trait;
use std::sync::Mutex;
use std::time::Duration;

/// A prompt the mock received.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RecordedCall {
    pub system: Option<String>,
    pub prompt: String,
}

#[derive(Debug, Clone)]
enum Behavior {
    Reply(String),
    Fail(ProviderError),
    Stall(Duration),
}

/// Mock text provider for testing.
pub struct MockTextProvider {
    configured: bool,
    behavior: Behavior,
    calls: Mutex<Vec<RecordedCall>>,
}

impl MockTextProvider {
    fn with_behavior(behavior: Behavior) -> Self {
        Self {
            configured: true,
            behavior,
            calls: Mutex::new(Vec::new()),
        }
    }

    /// Answers every call with `text`.
    pub fn replying(text: impl Into<String>) -> Self {
        Self::with_behavior(Behavior::Reply(text.into()))
    }

    /// Fails every call with `error`.
    pub fn failing(error: ProviderError) -> Self {
        Self::with_behavior(Behavior::Fail(error))
    }

    /// Sleeps for `delay` before answering.
    pub fn stalling(delay: Duration) -> Self {
        Self::with_behavior(Behavior::Stall(delay))
    }

    /// A provider whose credentials are missing.
    pub fn unconfigured() -> Self {
        Self {
            configured: false,
            ..Self::replying("")
        }
    }

    /// Prompts received so far.
    pub fn calls(&self) -> Vec<RecordedCall> {
        self.calls
            .lock()
            .map(|calls| calls.clone())
            .unwrap_or_default()
    }
}

#[async_trait]
impl TextProvider for MockTextProvider {
    fn name(&self) -> &'static str {
        "Mock"
    }

    fn model(&self) -> &str {
        "mock-model"
    }

    fn ensure_configured(&self) -> Result<(), ProviderError> {
        if self.configured {
            Ok(())
        } else {
            Err(ProviderError::NotConfigured(
                "Mock text provider not enabled".to_string(),
            ))
        }
    }

    async fn generate(
        &self,
        system: Option<&str>,
        prompt: &str,
        _params: &GenerationParams,
    ) -> Result<String, ProviderError> {
        self.ensure_configured()?;

        if let Ok(mut calls) = self.calls.lock() {
            calls.push(RecordedCall {
                system: system.map(str::to_string),
                prompt: prompt.to_string(),
            });
        }

        match &self.behavior {
            Behavior::Reply(text) => Ok(text.clone()),
            Behavior::Fail(error) => Err(error.clone()),
            Behavior::Stall(delay) => {
                tokio::time::sleep(*delay).await;
                Ok("Mock response after delay".to_string())
            }
        }
    }
}
