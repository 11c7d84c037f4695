//! Products Domain
//!
//! The product catalog: entity, DTOs and validation, the unit-of-work
//! repository, the application service and its HTTP handlers.
//!
//! # Architecture
//!
//! ```text
//! ┌─────────────┐
//! │  Handlers   │  ← HTTP endpoints, one repository per request
//! └──────┬──────┘
//!        │
//! ┌──────▼──────┐
//! │   Service   │  ← Use cases, one commit per mutation
//! └──────┬──────┘
//!        │
//! ┌──────▼──────┐
//! │ Repository  │  ← Staged writes + commit (in-memory, PostgreSQL)
//! └──────┬──────┘
//!        │
//! ┌──────▼──────┐
//! │   Models    │  ← Product entity, DTOs, mapping
//! └─────────────┘
//! ```
//!
//! # Usage
//!
//! ```rust,no_run
//! use domain_products::{InMemoryProductStore, handlers};
//!
//! let router = handlers::router(InMemoryProductStore::new());
//! ```

pub mod entity;
pub mod error;
pub mod handlers;
pub mod mapping;
pub mod models;
pub mod postgres;
pub mod repository;
pub mod service;

pub use error::{ProductError, ProductResult};
pub use models::{CreateProduct, Product, ProductView, UpdateProduct};
pub use postgres::{PgProductRepository, PgProductStore};
pub use repository::{
    InMemoryProductRepository, InMemoryProductStore, ProductRepository, ProductStore, StagedChange,
};
pub use service::ProductService;
