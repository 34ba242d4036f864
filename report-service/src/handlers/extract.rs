use axum::{
    async_trait,
    extract::{rejection::JsonRejection, FromRequest, Request},
    Json,
};
use serde::de::DeserializeOwned;

use crate::error::ReportError;

/// JSON body extractor whose rejections use the report error shape.
pub struct ReportJson<T>(pub T);

#[async_trait]
impl<T, S> FromRequest<S> for ReportJson<T>
where
    T: DeserializeOwned + 'static,
    S: Send + Sync,
{
    type Rejection = ReportError;

    async fn from_request(req: Request, state: &S) -> Result<Self, Self::Rejection> {
        let Json(value) = Json::<T>::from_request(req, state)
            .await
            .map_err(|e: JsonRejection| {
                tracing::warn!(error = %e.body_text(), "Rejected request body");
                ReportError::Validation(format!("JSON 형식 오류: {}", e.body_text()))
            })?;

        Ok(ReportJson(value))
    }
}
