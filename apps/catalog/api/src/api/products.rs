use axum::Router;
use domain_products::{PgProductStore, handlers};

use crate::state::AppState;

/// Products CRUD backed by the shared PostgreSQL pool
pub fn router(state: &AppState) -> Router {
    handlers::router(PgProductStore::new(state.db.clone()))
}
