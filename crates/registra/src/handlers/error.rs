use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use registra_core::storage::{
    repository_error_kind, repository_error_to_status_code, RepositoryError,
};

/// Handler-boundary error wrapper.
///
/// Every failure surfaces as a structured `{ "error": <kind>, "details":
/// <human detail> }` body with the status the taxonomy mapping assigns;
/// anything that isn't a [`RepositoryError`] is a 500.
pub struct AppError(pub anyhow::Error);

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status_code, kind) =
            if let Some(repo_error) = self.0.downcast_ref::<RepositoryError>() {
                let code = repository_error_to_status_code(repo_error);
                (
                    StatusCode::from_u16(code).unwrap_or(StatusCode::INTERNAL_SERVER_ERROR),
                    repository_error_kind(repo_error),
                )
            } else {
                (StatusCode::INTERNAL_SERVER_ERROR, "internal")
            };

        tracing::warn!(status = %status_code, error = kind, details = %self.0, "Request failed");

        let body = Json(serde_json::json!({
            "error": kind,
            "details": self.0.to_string(),
        }));
        (status_code, body).into_response()
    }
}

impl<E> From<E> for AppError
where
    E: Into<anyhow::Error>,
{
    fn from(err: E) -> Self {
        Self(err.into())
    }
}
