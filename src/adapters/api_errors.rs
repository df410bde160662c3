use crate::domain::error::PipelineError;
use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};

/// Newtype over the domain error so the HTTP mapping lives in the adapter
/// layer.
pub struct ApiError(pub PipelineError);

impl From<PipelineError> for ApiError {
    fn from(err: PipelineError) -> Self {
        Self(err)
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, error_code, message) = match &self.0 {
            PipelineError::Validation(msg) => {
                (StatusCode::BAD_REQUEST, "validation_error", msg.clone())
            }
            PipelineError::NotFound(msg) => (StatusCode::NOT_FOUND, "not_found", msg.clone()),
            PipelineError::WebhookSignature(_) => (
                StatusCode::BAD_REQUEST,
                "webhook_error",
                "invalid webhook signature".to_string(),
            ),
            PipelineError::Config(msg) => {
                tracing::error!("configuration error: {msg}");
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "configuration_error",
                    "server misconfigured".to_string(),
                )
            }
            PipelineError::Provider(err) => {
                tracing::error!("provider error: {err}");
                (
                    StatusCode::BAD_GATEWAY,
                    "provider_error",
                    "payment provider error".to_string(),
                )
            }
            PipelineError::Email(err) => {
                tracing::error!("email error: {err}");
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "email_error",
                    "email provider error".to_string(),
                )
            }
            PipelineError::Database(err) => {
                tracing::error!("database error: {err}");
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "internal_error",
                    "internal error".to_string(),
                )
            }
        };

        let body = serde_json::json!({
            "error_code": error_code,
            "message": message,
        });

        (status, Json(body)).into_response()
    }
}
