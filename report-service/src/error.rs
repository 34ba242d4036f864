//! Request-level errors and their HTTP mapping.

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use thiserror::Error;

use crate::models::ReportResponse;
use crate::services::prompt::PromptError;
use crate::services::providers::ProviderError;

/// Prefix on every error report shown to callers.
pub const WARNING_MARKER: &str = "⚠️";

/// Why a `/generate` request did not produce a report.
#[derive(Debug, Error)]
pub enum ReportError {
    #[error("입력 오류: {0}")]
    Validation(String),

    #[error("서버 설정 오류: {0}")]
    Configuration(String),

    #[error("서버 내부 오류: 요청 시간 초과")]
    UpstreamTimeout,

    #[error("서버 내부 오류: {0}")]
    Upstream(String),

    #[error("{provider} 호출 실패: HTTP {status} {message}")]
    UpstreamHttp {
        provider: &'static str,
        status: u16,
        message: String,
    },

    #[error("{provider} 응답 형식 오류")]
    UpstreamMalformed {
        provider: &'static str,
        detail: String,
    },
}

impl ReportError {
    /// Classify a provider failure.
    pub fn from_provider(provider: &'static str, err: ProviderError) -> Self {
        match err {
            ProviderError::NotConfigured(msg) => ReportError::Configuration(msg),
            ProviderError::Timeout => ReportError::UpstreamTimeout,
            ProviderError::Network(msg) => ReportError::Upstream(msg),
            ProviderError::Http { status, message } => ReportError::UpstreamHttp {
                provider,
                status,
                message,
            },
            ProviderError::MalformedResponse(detail) => {
                ReportError::UpstreamMalformed { provider, detail }
            }
        }
    }

    pub fn status_code(&self) -> StatusCode {
        match self {
            ReportError::Validation(_) => StatusCode::BAD_REQUEST,
            ReportError::UpstreamHttp { status, .. } => StatusCode::from_u16(*status)
                .ok()
                .filter(|s| s.is_client_error() || s.is_server_error())
                .unwrap_or(StatusCode::BAD_GATEWAY),
            ReportError::Configuration(_)
            | ReportError::UpstreamTimeout
            | ReportError::Upstream(_)
            | ReportError::UpstreamMalformed { .. } => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    /// Machine-readable kind carried in the `error` field.
    pub fn code(&self) -> &'static str {
        match self {
            ReportError::Validation(_) => "validation_error",
            ReportError::Configuration(_) => "configuration_error",
            ReportError::UpstreamTimeout => "upstream_timeout",
            ReportError::Upstream(_) => "upstream_error",
            ReportError::UpstreamHttp { .. } => "upstream_http_error",
            ReportError::UpstreamMalformed { .. } => "upstream_malformed_response",
        }
    }

    /// Caller-facing text, prefixed with the warning marker.
    pub fn report(&self) -> String {
        format!("{} {}", WARNING_MARKER, self)
    }
}

impl From<PromptError> for ReportError {
    fn from(err: PromptError) -> Self {
        ReportError::Validation(err.to_string())
    }
}

impl IntoResponse for ReportError {
    fn into_response(self) -> Response {
        let status = self.status_code();
        let body = ReportResponse {
            report: self.report(),
            error: Some(self.code().to_string()),
        };
        (status, Json(body)).into_response()
    }
}
