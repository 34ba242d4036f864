use axum::{extract::State, Json};

use crate::error::ReportError;
use crate::handlers::ReportJson;
use crate::models::{ReportResponse, SessionInput};
use crate::startup::AppState;

/// `POST /generate`: build the session prompt and relay it to the provider.
pub async fn generate_report(
    State(state): State<AppState>,
    ReportJson(input): ReportJson<SessionInput>,
) -> Result<Json<ReportResponse>, ReportError> {
    let report = state.gateway.generate_report(&input).await?;
    Ok(Json(ReportResponse::success(report)))
}
