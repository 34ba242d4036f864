use axum::{extract::State, Json};
use serde_json::{json, Value};

use crate::startup::AppState;

/// Liveness probe. Also reports whether the provider credential is present.
pub async fn health_check(State(state): State<AppState>) -> Json<Value> {
    Json(json!({
        "status": "ok",
        "service": "report-service",
        "version": env!("CARGO_PKG_VERSION"),
        "provider": state.gateway.provider_name(),
        "providerConfigured": state.gateway.provider_configured(),
    }))
}
