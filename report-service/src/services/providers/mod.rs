//! Text generation provider abstractions and implementations.
//!
//! The gateway talks to a single [`TextProvider`] so OpenAI-style and
//! Gemini-style backends (and the test mock) are interchangeable.

pub mod gemini;
pub mod mock;
pub mod openai;

use async_trait::async_trait;
use std::time::Duration;
use thiserror::Error;

/// Longest provider error body carried into a diagnostic, in characters.
pub const MAX_DIAGNOSTIC_CHARS: usize = 200;

/// Error type for provider operations.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ProviderError {
    #[error("Provider not configured: {0}")]
    NotConfigured(String),

    #[error("Request timed out")]
    Timeout,

    #[error("Network error: {0}")]
    Network(String),

    /// The provider answered with a non-success status.
    #[error("HTTP {status}: {message}")]
    Http { status: u16, message: String },

    /// The provider answered 2xx but the generated text was not where expected.
    #[error("Malformed response: {0}")]
    MalformedResponse(String),
}

impl ProviderError {
    pub(crate) fn from_reqwest(err: reqwest::Error) -> Self {
        if err.is_timeout() {
            ProviderError::Timeout
        } else {
            ProviderError::Network(err.to_string())
        }
    }

    /// Build an `Http` error from a failed response, keeping at most
    /// [`MAX_DIAGNOSTIC_CHARS`] of its body.
    pub(crate) async fn from_response(response: reqwest::Response) -> Self {
        let status = response.status();
        let body = response.text().await.unwrap_or_default();
        let message = format!(
            "{} {}",
            status.canonical_reason().unwrap_or_default(),
            truncate_chars(body.trim(), MAX_DIAGNOSTIC_CHARS)
        );
        ProviderError::Http {
            status: status.as_u16(),
            message: message.trim().to_string(),
        }
    }
}

/// First `max` characters of `text`, never splitting a code point.
pub fn truncate_chars(text: &str, max: usize) -> &str {
    match text.char_indices().nth(max) {
        Some((idx, _)) => &text[..idx],
        None => text,
    }
}

/// Generation parameters for a provider call.
#[derive(Debug, Clone, Default)]
pub struct GenerationParams {
    /// Temperature (0.0 - 2.0). Provider default when unset.
    pub temperature: Option<f32>,
}

/// Connection settings shared by the HTTP adapters.
#[derive(Debug, Clone)]
pub struct ProviderConfig {
    /// `None` or blank means the provider is not configured.
    pub api_key: Option<String>,
    pub model: String,
    pub api_base: String,
    pub timeout: Duration,
}

impl ProviderConfig {
    fn api_key(&self) -> Option<&str> {
        self.api_key
            .as_deref()
            .map(str::trim)
            .filter(|k| !k.is_empty())
    }

    fn client(&self) -> reqwest::Client {
        reqwest::Client::builder()
            .timeout(self.timeout)
            .build()
            .unwrap_or_else(|e| {
                tracing::warn!(error = %e, "Falling back to default HTTP client");
                reqwest::Client::new()
            })
    }
}

/// A text generation backend.
#[async_trait]
pub trait TextProvider: Send + Sync {
    /// Short provider name used in logs and diagnostics.
    fn name(&self) -> &'static str;

    /// Model identifier sent with every request.
    fn model(&self) -> &str;

    /// Fails when the provider lacks the credentials it needs.
    fn ensure_configured(&self) -> Result<(), ProviderError>;

    /// Generate text for `prompt`, optionally steered by a `system` instruction.
    async fn generate(
        &self,
        system: Option<&str>,
        prompt: &str,
        params: &GenerationParams,
    ) -> Result<String, ProviderError>;
}
