use report_service::config::ReportConfig;
use report_service::startup::Application;
use service_core::observability::{init_tracing, TracingOptions};

#[tokio::main]
async fn main() -> std::io::Result<()> {
    let config = ReportConfig::load().map_err(|e| {
        eprintln!("Failed to load configuration: {}", e);
        std::io::Error::other(format!("Configuration error: {}", e))
    })?;

    init_tracing(TracingOptions {
        service_name: "report-service",
        log_level: &config.log_level,
        otlp_endpoint: config.otlp_endpoint.as_deref(),
    });

    let app = Application::build(config).await.map_err(|e| {
        tracing::error!("Failed to build application: {}", e);
        std::io::Error::other(format!("Startup error: {}", e))
    })?;

    app.run_until_stopped().await
}
