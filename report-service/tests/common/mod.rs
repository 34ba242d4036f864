//! Test helpers for report-service integration tests.

#![allow(dead_code)]

use report_service::config::ReportConfig;
use report_service::services::providers::TextProvider;
use report_service::startup::Application;
use service_core::config::Config;
use std::collections::HashMap;
use std::sync::Arc;
use std::time::Duration;

/// Service settings with a random port and the given variables.
pub fn test_config(vars: &[(&str, &str)]) -> ReportConfig {
    let vars: HashMap<String, String> = vars
        .iter()
        .map(|(k, v)| (k.to_string(), v.to_string()))
        .collect();
    ReportConfig::from_lookup(Config { port: 0 }, |key| vars.get(key).cloned())
        .expect("Failed to build test config")
}

pub struct TestApp {
    pub address: String,
    client: reqwest::Client,
}

impl TestApp {
    /// Spawn the application around `provider` and return its address.
    pub async fn spawn(provider: Arc<dyn TextProvider>) -> Self {
        Self::spawn_with_config(test_config(&[]), provider).await
    }

    pub async fn spawn_with_config(config: ReportConfig, provider: Arc<dyn TextProvider>) -> Self {
        let app = Application::build_with_provider(config, provider)
            .await
            .expect("Failed to build application");
        let address = format!("http://127.0.0.1:{}", app.port());

        tokio::spawn(async move {
            let _ = app.run_until_stopped().await;
        });

        // Wait for server to start
        tokio::time::sleep(Duration::from_millis(50)).await;

        Self {
            address,
            client: reqwest::Client::new(),
        }
    }

    pub fn client(&self) -> &reqwest::Client {
        &self.client
    }

    pub async fn post_generate(&self, body: &serde_json::Value) -> reqwest::Response {
        self.client
            .post(format!("{}/generate", self.address))
            .json(body)
            .timeout(Duration::from_secs(5))
            .send()
            .await
            .expect("Failed to execute request")
    }
}
