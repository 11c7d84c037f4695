//! # Axum Helpers
//!
//! Shared HTTP plumbing for the catalog services.
//!
//! - **[`server`]**: router assembly with API docs, health endpoints, graceful shutdown
//! - **[`http`]**: CORS and security headers
//! - **[`errors`]**: `AppError`, the standard 4xx body, problem details for 500s
//! - **[`extractors`]**: `UuidPath` and `ValidatedJson`
//! - **[`audit`]**: audit events for data modifications
//!
//! ## Quick Start
//!
//! ```ignore
//! use axum_helpers::server::{create_production_app, create_router};
//! use core_config::{Environment, server::ServerConfig};
//!
//! let router = create_router::<ApiDoc>(api_routes, Environment::from_env())?;
//! create_production_app(router, &ServerConfig::default(), async {}).await?;
//! ```

pub mod audit;
pub mod errors;
pub mod extractors;
pub mod http;
pub mod server;

pub use server::{
    HealthCheckFuture, HealthResponse, ShutdownCoordinator, close_postgres,
    create_production_app, create_router, health_router, run_health_checks, shutdown_signal,
};

pub use http::{cors_layer, cors_layer_from_env, security_headers};

pub use errors::{
    AppError, ErrorCode, ErrorResponse, FaultMessage, ProblemDetails, panic_to_fault,
    unhandled_fault_middleware,
};

pub use extractors::{UuidPath, ValidatedJson};

pub use audit::{AuditEvent, AuditOutcome, extract_ip_from_headers, extract_user_agent};
