//! Readiness endpoint

use axum::{Router, extract::State, routing::get};
use axum_helpers::server::{HealthCheckFuture, ReadinessReport, run_health_checks};
use database::postgres::check_health;

use crate::state::AppState;

async fn ready(State(state): State<AppState>) -> ReadinessReport {
    let checks: Vec<(&str, HealthCheckFuture)> = vec![(
        "database",
        Box::pin(async { check_health(&state.db).await.map_err(|e| e.to_string()) }),
    )];

    run_health_checks(checks).await
}

/// `/ready`: 200 while the database answers, 503 otherwise
pub fn router(state: AppState) -> Router {
    Router::new().route("/ready", get(ready)).with_state(state)
}
