//! Reusable OpenAPI responses shared by every router.

use super::{ErrorResponse, ProblemDetails};
#[allow(unused_imports)]
use serde_json::json;
use utoipa::ToResponse;

#[derive(ToResponse)]
#[response(
    description = "Bad Request - Validation Error",
    content_type = "application/json",
    example = json!({
        "code": 1001,
        "error": "VALIDATION_ERROR",
        "message": "Request validation failed",
        "details": {
            "name": [{
                "code": "required",
                "message": "name required",
                "params": {"value": ""}
            }],
            "price": [{
                "code": "range",
                "message": "price must be positive",
                "params": {"value": 0.0}
            }]
        }
    })
)]
pub struct BadRequestValidationResponse(pub ErrorResponse);

#[derive(ToResponse)]
#[response(
    description = "Bad Request - Invalid UUID",
    content_type = "application/json",
    example = json!({
        "code": 1002,
        "error": "INVALID_UUID",
        "message": "Invalid UUID: not-a-uuid"
    })
)]
pub struct BadRequestUuidResponse(pub ErrorResponse);

#[derive(ToResponse)]
#[response(
    description = "Resource not found",
    content_type = "application/json",
    example = json!({
        "code": 1004,
        "error": "NOT_FOUND",
        "message": "Product 0191f5a2-7c3e-7d11-9a4e-3f1c2b5d6e7f not found"
    })
)]
pub struct NotFoundResponse(pub ErrorResponse);

/// 500 body; `detail` is sanitized outside development
#[derive(ToResponse)]
#[response(
    description = "Unexpected server fault",
    content_type = "application/json",
    example = json!({
        "status": 500,
        "title": "An unexpected error occurred on the server.",
        "detail": "Please contact support."
    })
)]
pub struct ServerFaultResponse(pub ProblemDetails);
