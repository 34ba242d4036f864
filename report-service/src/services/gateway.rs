//! Report generation gateway.
//!
//! Owns one request's lifecycle: configuration check, prompt build, a single
//! bounded provider call, and classification of the outcome.

use std::sync::Arc;
use std::time::Duration;

use crate::error::ReportError;
use crate::models::{NumericField, SessionInput};
use crate::services::prompt::{build_prompt, Clock, KstClock, PromptOptions};
use crate::services::providers::{GenerationParams, TextProvider};

/// Reference upper bound for a provider call.
pub const DEFAULT_UPSTREAM_TIMEOUT: Duration = Duration::from_secs(30);

/// Generated report text or the classified failure.
pub type GenerationResult = Result<String, ReportError>;

pub struct ReportGateway {
    provider: Arc<dyn TextProvider>,
    options: PromptOptions,
    params: GenerationParams,
    timeout: Duration,
    clock: Arc<dyn Clock>,
}

impl ReportGateway {
    pub fn new(provider: Arc<dyn TextProvider>, options: PromptOptions) -> Self {
        Self {
            provider,
            options,
            params: GenerationParams::default(),
            timeout: DEFAULT_UPSTREAM_TIMEOUT,
            clock: Arc::new(KstClock),
        }
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    pub fn with_params(mut self, params: GenerationParams) -> Self {
        self.params = params;
        self
    }

    pub fn with_clock(mut self, clock: Arc<dyn Clock>) -> Self {
        self.clock = clock;
        self
    }

    pub fn provider_name(&self) -> &'static str {
        self.provider.name()
    }

    pub fn provider_configured(&self) -> bool {
        self.provider.ensure_configured().is_ok()
    }

    /// Produce the report for one session. Never retries.
    pub async fn generate_report(&self, input: &SessionInput) -> GenerationResult {
        let provider = self.provider.name();

        self.provider.ensure_configured().map_err(|e| {
            tracing::error!(provider, error = %e, "Generation provider is not configured");
            ReportError::from_provider(provider, e)
        })?;

        warn_unparsed("score", input.score.as_ref());
        warn_unparsed("base", input.base.as_ref());
        warn_unparsed("weakScore", input.weak_score.as_ref());

        let bundle = build_prompt(input, &self.options, self.clock.today()).map_err(|e| {
            tracing::warn!(error = %e, "Rejected session input");
            ReportError::from(e)
        })?;

        tracing::info!(
            provider,
            model = %self.provider.model(),
            test_taken = bundle.test_taken,
            "Requesting report generation"
        );

        let call = self
            .provider
            .generate(bundle.system.as_deref(), &bundle.user, &self.params);

        let outcome = match tokio::time::timeout(self.timeout, call).await {
            Ok(result) => result.map_err(|e| ReportError::from_provider(provider, e)),
            Err(_) => Err(ReportError::UpstreamTimeout),
        };

        match &outcome {
            Ok(report) => {
                tracing::info!(provider, report_len = report.len(), "Report generated");
            }
            Err(e) => {
                tracing::error!(
                    provider,
                    status = e.status_code().as_u16(),
                    kind = e.code(),
                    error = %e,
                    "Report generation failed"
                );
            }
        }

        outcome
    }
}

fn warn_unparsed(field: &'static str, value: Option<&NumericField>) {
    if let Some(value) = value {
        if !value.is_blank() && value.value().is_none() {
            tracing::warn!(field, value = ?value, "Ignoring non-numeric value");
        }
    }
}
