//! PostgreSQL connectivity shared by the catalog services.
//!
//! - [`postgres`]: pool configuration, connecting with retry, running migrations, health checks
//! - [`common`]: the unified [`DatabaseError`] and retry/backoff helpers
//!
//! # Example
//!
//! ```ignore
//! use database::common::RetryConfig;
//! use database::postgres::{self, PostgresConfig};
//! use migration::Migrator;
//!
//! let db = postgres::connect_from_config_with_retry(PostgresConfig::new(url), RetryConfig::new()).await?;
//! postgres::run_migrations::<Migrator>(&db, "catalog_api").await?;
//! ```
//!
//! Enable the `config` feature to load [`postgres::PostgresConfig`] through
//! `core_config::FromEnv`.

pub mod common;
pub mod postgres;

pub use common::{DatabaseError, DatabaseResult};
