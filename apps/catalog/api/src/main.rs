//! Catalog API - product CRUD over REST

use axum_helpers::server::{close_postgres, create_production_app, create_router, health_router};
use core_config::tracing::{init_tracing, install_color_eyre};
use database::common::RetryConfig;
use database::postgres;
use eyre::WrapErr;
use migration::Migrator;
use tracing::info;

mod api;
mod config;
mod openapi;
mod state;

use config::Config;
use state::AppState;

#[tokio::main]
async fn main() -> eyre::Result<()> {
    install_color_eyre();

    let config = Config::from_env()?;
    init_tracing(&config.environment);

    info!(
        app = config.app.name,
        version = config.app.version,
        environment = ?config.environment,
        "Starting catalog API"
    );

    let retry = RetryConfig::new().with_max_retries(config.db_connect_retries);
    let db = postgres::connect_from_config_with_retry(config.database.clone(), retry)
        .await
        .wrap_err("Failed to connect to PostgreSQL")?;

    if config.run_migrations {
        postgres::run_migrations::<Migrator>(&db, config.app.name)
            .await
            .wrap_err("Failed to run database migrations")?;
    } else {
        info!("Skipping migrations (RUN_MIGRATIONS=false)");
    }

    let state = AppState::new(config, db);

    let router = create_router::<openapi::ApiDoc>(api::routes(&state), state.config.environment)?;
    let app = router
        .merge(health_router(state.config.app))
        .merge(api::health::router(state.clone()));

    info!("Listening on {}", state.config.server.address());

    let db = state.db.clone();
    create_production_app(app, &state.config.server, async move {
        close_postgres(db, "catalog").await;
    })
    .await
    .wrap_err("Server error")?;

    info!("Catalog API shutdown complete");
    Ok(())
}
