//! Server bootstrap: router assembly, health endpoints, graceful shutdown.
//!
//! ```ignore
//! use axum_helpers::server::{create_production_app, create_router, health_router};
//! use core_config::{Environment, app_info, server::ServerConfig};
//!
//! let router = create_router::<ApiDoc>(api_routes, Environment::from_env())?
//!     .merge(health_router(app_info!()));
//!
//! create_production_app(router, &ServerConfig::from_env()?, async move {
//!     close_postgres(db, "catalog").await;
//! })
//! .await?;
//! ```

pub mod app;
pub mod cleanup;
pub mod health;
pub mod shutdown;

pub use app::{create_production_app, create_router};
pub use cleanup::close_postgres;
pub use health::{HealthCheckFuture, HealthResponse, ReadinessReport, health_router, run_health_checks};
pub use shutdown::{ShutdownCoordinator, shutdown_signal};
