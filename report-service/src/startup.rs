//! Application startup and lifecycle management.

use crate::config::{ProviderKind, ReportConfig};
use crate::handlers;
use crate::services::providers::gemini::GeminiTextProvider;
use crate::services::providers::openai::OpenAiTextProvider;
use crate::services::providers::{GenerationParams, TextProvider};
use crate::services::ReportGateway;
use axum::{
    http::{header, Method},
    middleware::from_fn,
    routing::{get, post},
    Router,
};
use service_core::error::AppError;
use service_core::middleware::{
    security_headers::security_headers_middleware,
    tracing::{request_id_middleware, REQUEST_ID_HEADER},
};
use std::net::SocketAddr;
use std::sync::Arc;
use tokio::net::TcpListener;
use tokio::signal;
use tower::limit::ConcurrencyLimitLayer;
use tower_http::{
    cors::{Any, CorsLayer},
    trace::TraceLayer,
};

/// Shared application state.
#[derive(Clone)]
pub struct AppState {
    pub config: Arc<ReportConfig>,
    pub gateway: Arc<ReportGateway>,
}

impl AppState {
    /// Wire the gateway around `provider` using the service settings.
    pub fn new(config: ReportConfig, provider: Arc<dyn TextProvider>) -> Self {
        let gateway = ReportGateway::new(provider, config.prompt.clone())
            .with_timeout(config.upstream_timeout())
            .with_params(GenerationParams {
                temperature: config.temperature,
            });

        Self {
            config: Arc::new(config),
            gateway: Arc::new(gateway),
        }
    }
}

/// Construct the provider selected by `REPORT_PROVIDER`.
///
/// A missing API key does not fail here; requests report it instead.
pub fn provider_from_config(config: &ReportConfig) -> Arc<dyn TextProvider> {
    match config.provider {
        ProviderKind::OpenAi => Arc::new(OpenAiTextProvider::new(config.openai.clone())),
        ProviderKind::Gemini => Arc::new(GeminiTextProvider::new(config.gemini.clone())),
    }
}

fn cors_layer() -> CorsLayer {
    CorsLayer::new()
        .allow_origin(Any)
        .allow_methods([Method::GET, Method::POST, Method::OPTIONS])
        .allow_headers([header::CONTENT_TYPE, header::AUTHORIZATION])
}

pub fn build_router(state: AppState) -> Router {
    let concurrency_limit = state.config.max_concurrent_requests;

    let mut app = Router::new()
        .route("/health", get(handlers::health_check))
        .route("/generate", post(handlers::generate_report))
        .with_state(state);

    if let Some(limit) = concurrency_limit {
        tracing::info!(limit, "Limiting concurrent requests");
        app = app.layer(ConcurrencyLimitLayer::new(limit));
    }

    app
        // Add tracing layer
        .layer(
            TraceLayer::new_for_http().make_span_with(|request: &axum::http::Request<_>| {
                let request_id = request
                    .headers()
                    .get(REQUEST_ID_HEADER)
                    .and_then(|value| value.to_str().ok())
                    .unwrap_or("-");

                tracing::info_span!(
                    "http_request",
                    request_id = %request_id,
                    method = %request.method(),
                    uri = %request.uri(),
                    version = ?request.version(),
                )
            }),
        )
        .layer(from_fn(request_id_middleware))
        .layer(from_fn(security_headers_middleware))
        .layer(cors_layer())
}

async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = signal::ctrl_c().await {
            tracing::error!("Failed to install Ctrl+C handler: {}", e);
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match signal::unix::signal(signal::unix::SignalKind::terminate()) {
            Ok(mut sigterm) => {
                sigterm.recv().await;
            }
            Err(e) => {
                tracing::error!("Failed to install SIGTERM handler: {}", e);
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {},
        _ = terminate => {},
    }

    tracing::info!("Shutdown signal received");
}

/// Application container for managing server lifecycle.
pub struct Application {
    port: u16,
    listener: TcpListener,
    router: Router,
}

impl Application {
    /// Build the application with the provider named in the configuration.
    pub async fn build(config: ReportConfig) -> Result<Self, AppError> {
        let provider = provider_from_config(&config);

        match provider.ensure_configured() {
            Ok(()) => tracing::info!(
                provider = provider.name(),
                model = %provider.model(),
                "Initialized text provider"
            ),
            Err(e) => tracing::warn!(
                provider = provider.name(),
                error = %e,
                "Text provider has no credential; /generate will fail until it is set"
            ),
        }

        Self::build_with_provider(config, provider).await
    }

    /// Build the application around an explicit provider.
    pub async fn build_with_provider(
        config: ReportConfig,
        provider: Arc<dyn TextProvider>,
    ) -> Result<Self, AppError> {
        // Port 0 = random port for testing
        let addr = SocketAddr::from(([0, 0, 0, 0], config.common.port));
        let listener = TcpListener::bind(addr).await.map_err(|e| {
            tracing::error!("Failed to bind HTTP listener to {}: {}", addr, e);
            AppError::from(e)
        })?;
        let port = listener.local_addr()?.port();

        tracing::info!("Report service listening on port {}", port);

        let router = build_router(AppState::new(config, provider));

        Ok(Self {
            port,
            listener,
            router,
        })
    }

    /// Get the port the server is listening on.
    pub fn port(&self) -> u16 {
        self.port
    }

    /// Run the application until a shutdown signal arrives.
    pub async fn run_until_stopped(self) -> std::io::Result<()> {
        axum::serve(self.listener, self.router)
            .with_graceful_shutdown(shutdown_signal())
            .await
            .map_err(|e| {
                tracing::error!("HTTP server error: {}", e);
                e
            })
    }
}
