//! Last-resort rendering of server faults.
//!
//! Every 500 leaving the router is rewritten into a [`ProblemDetails`] body.
//! The raw error text reaches the client only in development; production
//! callers get a fixed sanitized detail.
//!
//! ```ignore
//! use axum::middleware::from_fn_with_state;
//! use tower_http::catch_panic::CatchPanicLayer;
//!
//! let app = routes
//!     .layer(CatchPanicLayer::custom(panic_to_fault))
//!     .layer(from_fn_with_state(Environment::from_env(), unhandled_fault_middleware));
//! ```

use axum::{
    Json,
    body::{Body, to_bytes},
    extract::{Request, State},
    http::StatusCode,
    middleware::Next,
    response::{IntoResponse, Response},
};
use core_config::Environment;
use serde::{Deserialize, Serialize};
use std::any::Any;
use tracing::error;
use utoipa::ToSchema;

pub const FAULT_TITLE: &str = "An unexpected error occurred on the server.";
pub const SANITIZED_DETAIL: &str = "Please contact support.";

/// Cap on how much of an unlabelled 500 body is read back as its message
const MAX_FAULT_BODY_BYTES: usize = 16 * 1024;

/// Raw error text of a server fault, attached to the response as an extension.
///
/// Set by [`AppError`](super::AppError) and [`panic_to_fault`]; both log the
/// fault themselves, so the middleware only logs 500s that arrive without it.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct FaultMessage(pub String);

/// Body of every 500 response
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub struct ProblemDetails {
    pub status: u16,
    pub title: String,
    pub detail: String,
}

impl ProblemDetails {
    pub fn server_fault(environment: Environment, raw_message: &str) -> Self {
        let detail = if environment.is_development() {
            raw_message.to_string()
        } else {
            SANITIZED_DETAIL.to_string()
        };

        Self {
            status: StatusCode::INTERNAL_SERVER_ERROR.as_u16(),
            title: FAULT_TITLE.to_string(),
            detail,
        }
    }
}

impl IntoResponse for ProblemDetails {
    fn into_response(self) -> Response {
        let status = StatusCode::from_u16(self.status).unwrap_or(StatusCode::INTERNAL_SERVER_ERROR);
        (status, Json(self)).into_response()
    }
}

/// Rewrite any 500 produced further down the stack into [`ProblemDetails`].
pub async fn unhandled_fault_middleware(
    State(environment): State<Environment>,
    request: Request,
    next: Next,
) -> Response {
    let response = next.run(request).await;
    if response.status() != StatusCode::INTERNAL_SERVER_ERROR {
        return response;
    }

    let (parts, body) = response.into_parts();
    let message = match parts.extensions.get::<FaultMessage>() {
        Some(FaultMessage(message)) => message.clone(),
        None => {
            let message = unlabelled_fault_message(body).await;
            error!(error = %message, "Unhandled server fault");
            message
        }
    };

    ProblemDetails::server_fault(environment, &message).into_response()
}

async fn unlabelled_fault_message(body: Body) -> String {
    match to_bytes(body, MAX_FAULT_BODY_BYTES).await {
        Ok(bytes) if !bytes.is_empty() => String::from_utf8_lossy(&bytes).into_owned(),
        _ => StatusCode::INTERNAL_SERVER_ERROR.to_string(),
    }
}

/// Panic handler for `tower_http::catch_panic::CatchPanicLayer::custom`.
///
/// Produces a bare 500 carrying the panic payload as a [`FaultMessage`], which
/// [`unhandled_fault_middleware`] then renders. The catch layer must sit inside
/// the middleware.
pub fn panic_to_fault(payload: Box<dyn Any + Send + 'static>) -> Response {
    let message = if let Some(s) = payload.downcast_ref::<String>() {
        s.clone()
    } else if let Some(s) = payload.downcast_ref::<&str>() {
        s.to_string()
    } else {
        "handler panicked".to_string()
    };

    error!(panic = %message, "Request handler panicked");

    let mut response = StatusCode::INTERNAL_SERVER_ERROR.into_response();
    response.extensions_mut().insert(FaultMessage(message));
    response
}
