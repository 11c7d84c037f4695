pub mod codes;
pub mod fault;
pub mod handlers;
pub mod responses;

pub use codes::ErrorCode;
pub use fault::{FaultMessage, ProblemDetails, panic_to_fault, unhandled_fault_middleware};

use axum::{
    Json,
    extract::rejection::JsonRejection,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde::{Deserialize, Serialize};
use thiserror::Error;
use utoipa::ToSchema;
use validator::ValidationErrors;

/// Body of every 4xx response.
///
/// ```json
/// {
///   "code": 1001,
///   "error": "VALIDATION_ERROR",
///   "message": "Request validation failed",
///   "details": { "name": [{ "code": "required", "message": "name required", "params": {} }] }
/// }
/// ```
///
/// 500 responses are rewritten into [`ProblemDetails`] by [`unhandled_fault_middleware`].
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct ErrorResponse {
    /// Integer error code for logging and monitoring
    pub code: i32,
    /// Machine-readable error identifier
    pub error: String,
    pub message: String,
    /// Per-field validation messages, when applicable
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub details: Option<serde_json::Value>,
}

impl ErrorResponse {
    pub fn new(code: ErrorCode, message: impl Into<String>) -> Self {
        Self {
            code: code.code(),
            error: code.as_str().to_string(),
            message: message.into(),
            details: None,
        }
    }

    pub fn with_details(mut self, details: serde_json::Value) -> Self {
        self.details = Some(details);
        self
    }
}

/// Application error type that can be converted to HTTP responses.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum AppError {
    #[error("JSON extraction error: {0}")]
    JsonExtractorRejection(#[from] JsonRejection),

    #[error("Validation error: {0}")]
    ValidationError(#[from] ValidationErrors),

    #[error("Invalid UUID: {0}")]
    InvalidUuid(String),

    #[error("Not Found: {0}")]
    NotFound(String),

    #[error("Internal Server Error: {0}")]
    InternalServerError(String),
}

/// `{field: [{code, message, params}]}`, every violation of every field
pub fn validation_details(errors: &ValidationErrors) -> serde_json::Value {
    let fields = errors
        .field_errors()
        .iter()
        .map(|(field, errs)| {
            let entries: Vec<serde_json::Value> = errs
                .iter()
                .map(|err| {
                    serde_json::json!({
                        "code": err.code,
                        "message": err.message,
                        "params": err.params,
                    })
                })
                .collect();
            (field.to_string(), serde_json::Value::Array(entries))
        })
        .collect::<serde_json::Map<_, _>>();

    serde_json::Value::Object(fields)
}

/// Unreadable or mistyped bodies are plain 400s; only a wrong content type keeps its own status.
fn json_rejection_status(rejection: &JsonRejection) -> StatusCode {
    match rejection {
        JsonRejection::JsonDataError(_) | JsonRejection::JsonSyntaxError(_) => StatusCode::BAD_REQUEST,
        other => other.status(),
    }
}

fn client_error(status: StatusCode, body: ErrorResponse) -> Response {
    (status, Json(body)).into_response()
}

/// 500 whose raw message travels as an extension for the fault middleware to render
fn server_fault(code: ErrorCode, message: String) -> Response {
    tracing::error!(error_code = code.code(), error = %message, "Request failed with a server fault");

    let mut response = client_error(
        StatusCode::INTERNAL_SERVER_ERROR,
        ErrorResponse::new(code, code.default_message()),
    );
    response.extensions_mut().insert(FaultMessage(message));
    response
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        match self {
            AppError::JsonExtractorRejection(e) => {
                tracing::warn!(error_code = ErrorCode::JsonExtraction.code(), "JSON extraction error: {}", e);
                client_error(
                    json_rejection_status(&e),
                    ErrorResponse::new(ErrorCode::JsonExtraction, e.body_text()),
                )
            }
            AppError::ValidationError(e) => {
                tracing::info!(error_code = ErrorCode::ValidationError.code(), "Validation error: {}", e);
                client_error(
                    StatusCode::BAD_REQUEST,
                    ErrorResponse::new(ErrorCode::ValidationError, ErrorCode::ValidationError.default_message())
                        .with_details(validation_details(&e)),
                )
            }
            AppError::InvalidUuid(raw) => {
                tracing::info!(error_code = ErrorCode::InvalidUuid.code(), value = %raw, "Invalid UUID");
                client_error(
                    StatusCode::BAD_REQUEST,
                    ErrorResponse::new(ErrorCode::InvalidUuid, format!("Invalid UUID: {}", raw)),
                )
            }
            AppError::NotFound(msg) => {
                tracing::info!(error_code = ErrorCode::NotFound.code(), "Not found: {}", msg);
                client_error(StatusCode::NOT_FOUND, ErrorResponse::new(ErrorCode::NotFound, msg))
            }
            AppError::InternalServerError(msg) => server_fault(ErrorCode::InternalError, msg),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use http_body_util::BodyExt;
    use validator::ValidationError;

    async fn body_json(response: Response) -> serde_json::Value {
        let bytes = response.into_body().collect().await.unwrap().to_bytes();
        serde_json::from_slice(&bytes).unwrap()
    }

    #[tokio::test]
    async fn test_validation_error_lists_every_field() {
        let mut errors = ValidationErrors::new();
        errors.add("name", ValidationError::new("required").with_message("name required".into()));
        errors.add("price", ValidationError::new("range").with_message("price must be positive".into()));

        let response = AppError::ValidationError(errors).into_response();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);

        let body = body_json(response).await;
        assert_eq!(body["error"], "VALIDATION_ERROR");
        assert_eq!(body["details"]["name"][0]["message"], "name required");
        assert_eq!(body["details"]["price"][0]["message"], "price must be positive");
    }

    #[tokio::test]
    async fn test_not_found_body() {
        let response = AppError::NotFound("Product 42 not found".into()).into_response();
        assert_eq!(response.status(), StatusCode::NOT_FOUND);

        let body = body_json(response).await;
        assert_eq!(body["code"], 1004);
        assert_eq!(body["message"], "Product 42 not found");
        assert!(body.get("details").is_none());
    }

    #[test]
    fn test_server_fault_carries_raw_message() {
        let response = AppError::InternalServerError("connection reset".into()).into_response();

        assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
        let fault = response.extensions().get::<FaultMessage>().unwrap();
        assert_eq!(fault.0, "connection reset");
    }
}
