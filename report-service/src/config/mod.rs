use service_core::config as core_config;
use service_core::error::AppError;
use std::env;
use std::str::FromStr;
use std::time::Duration;

use crate::services::prompt::{PromptLayout, PromptOptions};
use crate::services::providers::gemini::{DEFAULT_GEMINI_MODEL, GEMINI_API_BASE};
use crate::services::providers::openai::{DEFAULT_OPENAI_MODEL, OPENAI_API_BASE};
use crate::services::providers::ProviderConfig;

/// Upstream timeout in seconds when `UPSTREAM_TIMEOUT_SECS` is unset.
const DEFAULT_UPSTREAM_TIMEOUT_SECS: u64 = 30;

#[derive(Debug, Clone)]
pub struct ReportConfig {
    pub common: core_config::Config,
    pub log_level: String,
    pub otlp_endpoint: Option<String>,
    pub provider: ProviderKind,
    pub openai: ProviderConfig,
    pub gemini: ProviderConfig,
    pub temperature: Option<f32>,
    pub prompt: PromptOptions,
    pub max_concurrent_requests: Option<usize>,
}

/// Which backend generates reports.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum ProviderKind {
    #[default]
    OpenAi,
    Gemini,
}

impl FromStr for ProviderKind {
    type Err = AppError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "openai" | "gpt" => Ok(ProviderKind::OpenAi),
            "gemini" | "google" => Ok(ProviderKind::Gemini),
            other => Err(AppError::config(format!(
                "REPORT_PROVIDER must be 'openai' or 'gemini', got '{}'",
                other
            ))),
        }
    }
}

fn parse_layout(value: &str) -> Result<PromptLayout, AppError> {
    match value.trim().to_ascii_lowercase().as_str() {
        "split" => Ok(PromptLayout::Split),
        "combined" => Ok(PromptLayout::Combined),
        other => Err(AppError::config(format!(
            "REPORT_PROMPT_LAYOUT must be 'split' or 'combined', got '{}'",
            other
        ))),
    }
}

impl ReportConfig {
    pub fn load() -> Result<Self, AppError> {
        let common = core_config::Config::load()?;
        Self::from_lookup(common, |key| env::var(key).ok())
    }

    /// Build the service settings from an arbitrary variable source.
    pub fn from_lookup<F>(common: core_config::Config, lookup: F) -> Result<Self, AppError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let get = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());
        let get_or = |key: &str, default: &str| get(key).unwrap_or_else(|| default.to_string());

        let timeout_secs: u64 = parse_opt(&get, "UPSTREAM_TIMEOUT_SECS")?
            .unwrap_or(DEFAULT_UPSTREAM_TIMEOUT_SECS);
        if timeout_secs == 0 {
            return Err(AppError::config("UPSTREAM_TIMEOUT_SECS must be positive"));
        }
        let timeout = Duration::from_secs(timeout_secs);

        let provider = get("REPORT_PROVIDER")
            .map(|v| v.parse::<ProviderKind>())
            .transpose()?
            .unwrap_or_default();

        let layout = get("REPORT_PROMPT_LAYOUT")
            .map(|v| parse_layout(&v))
            .transpose()?
            .unwrap_or_default();

        let defaults = PromptOptions::default();

        Ok(ReportConfig {
            common,
            log_level: get_or("LOG_LEVEL", "info"),
            otlp_endpoint: get("OTLP_ENDPOINT"),
            provider,
            openai: ProviderConfig {
                api_key: get("OPENAI_API_KEY"),
                model: get_or("OPENAI_MODEL", DEFAULT_OPENAI_MODEL),
                api_base: get_or("OPENAI_API_BASE", OPENAI_API_BASE),
                timeout,
            },
            gemini: ProviderConfig {
                api_key: get("GEMINI_API_KEY"),
                model: get_or("GEMINI_MODEL", DEFAULT_GEMINI_MODEL),
                api_base: get_or("GEMINI_API_BASE", GEMINI_API_BASE),
                timeout,
            },
            temperature: parse_opt(&get, "REPORT_TEMPERATURE")?,
            prompt: PromptOptions {
                academy_name: get("ACADEMY_NAME").unwrap_or(defaults.academy_name),
                academy_location: get("ACADEMY_LOCATION").unwrap_or(defaults.academy_location),
                layout,
            },
            max_concurrent_requests: parse_opt(&get, "MAX_CONCURRENT_REQUESTS")?
                .filter(|limit: &usize| *limit > 0),
        })
    }

    /// Settings of the provider selected by `REPORT_PROVIDER`.
    pub fn active_provider(&self) -> &ProviderConfig {
        match self.provider {
            ProviderKind::OpenAi => &self.openai,
            ProviderKind::Gemini => &self.gemini,
        }
    }

    pub fn upstream_timeout(&self) -> Duration {
        self.active_provider().timeout
    }
}

fn parse_opt<T, G>(get: &G, key: &str) -> Result<Option<T>, AppError>
where
    T: FromStr,
    T::Err: std::fmt::Display,
    G: Fn(&str) -> Option<String>,
{
    get(key)
        .map(|raw| {
            raw.trim()
                .parse::<T>()
                .map_err(|e| AppError::config(format!("{} is invalid ('{}'): {}", key, raw, e)))
        })
        .transpose()
}
