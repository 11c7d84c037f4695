use super::shutdown::ShutdownCoordinator;
use crate::errors::{handlers::not_found, panic_to_fault, unhandled_fault_middleware};
use crate::http::{cors_layer_from_env, security_headers};
use axum::{Router, middleware};
use core_config::{Environment, server::ServerConfig};
use std::io;
use tower_http::catch_panic::CatchPanicLayer;
use tower_http::compression::CompressionLayer;
use tower_http::cors::CorsLayer;
use tower_http::trace::{DefaultMakeSpan, DefaultOnResponse, TraceLayer};
use tracing::{Level, info};
use utoipa::OpenApi;

/// Wrap the API routes with docs, fallback and the cross-cutting layers.
///
/// - `apis` is nested under `/api` and must already carry its state.
/// - Swagger UI, ReDoc, RapiDoc and Scalar are mounted in development only.
/// - Unknown paths get the standard 404 body.
/// - Every 500, including handler panics, is rendered as problem details.
///
/// # Errors
/// `CORS_ALLOWED_ORIGIN` is missing, empty or holds an invalid origin.
pub fn create_router<T>(apis: Router, environment: Environment) -> io::Result<Router>
where
    T: OpenApi + 'static,
{
    Ok(build_router::<T>(apis, environment, cors_layer_from_env()?))
}

/// [`create_router`] with an explicit CORS layer.
pub fn build_router<T>(apis: Router, environment: Environment, cors: CorsLayer) -> Router
where
    T: OpenApi + 'static,
{
    let router = if environment.is_development() {
        api_docs::<T>()
    } else {
        Router::new()
    };

    router
        .nest("/api", apis)
        .fallback(not_found)
        .layer(CatchPanicLayer::custom(panic_to_fault))
        .layer(middleware::from_fn_with_state(environment, unhandled_fault_middleware))
        .layer(
            TraceLayer::new_for_http()
                .make_span_with(DefaultMakeSpan::new().level(Level::INFO))
                .on_response(DefaultOnResponse::new().level(Level::INFO)),
        )
        .layer(middleware::from_fn(security_headers))
        .layer(cors)
        .layer(CompressionLayer::new())
}

fn api_docs<T: OpenApi + 'static>() -> Router {
    use utoipa_rapidoc::RapiDoc;
    use utoipa_redoc::{Redoc, Servable as RedocServable};
    use utoipa_scalar::{Scalar, Servable as ScalarServable};
    use utoipa_swagger_ui::SwaggerUi;

    Router::new()
        .merge(SwaggerUi::new("/swagger-ui").url("/api-docs/openapi.json", T::openapi()))
        .merge(Redoc::with_url("/redoc", T::openapi()))
        .merge(RapiDoc::new("/api-docs/openapi.json").path("/rapidoc"))
        .merge(Scalar::with_url("/scalar", T::openapi()))
}

/// Serve `router` until SIGINT/SIGTERM, then run `cleanup`.
///
/// In-flight requests drain first. Cleanup is bounded by
/// `server_config.shutdown_timeout`; past that it is abandoned with a warning.
pub async fn create_production_app<F>(
    router: Router,
    server_config: &ServerConfig,
    cleanup: F,
) -> io::Result<()>
where
    F: std::future::Future<Output = ()> + Send + 'static,
{
    let (coordinator, mut shutdown_rx) = ShutdownCoordinator::new();
    let shutdown_timeout = server_config.shutdown_timeout;

    let listener = tokio::net::TcpListener::bind(server_config.address()).await?;
    info!("Server starting on {}", listener.local_addr()?);

    let cleanup_handle = tokio::spawn(async move {
        if shutdown_rx.recv().await.is_err() {
            return;
        }

        info!("Starting cleanup tasks (timeout: {:?})", shutdown_timeout);
        match tokio::time::timeout(shutdown_timeout, cleanup).await {
            Ok(()) => info!("Cleanup completed successfully"),
            Err(_) => tracing::warn!(
                "Cleanup exceeded timeout of {:?}, forcing shutdown",
                shutdown_timeout
            ),
        }
    });

    let signal = coordinator.clone();
    let serve_result = axum::serve(listener, router.into_make_service())
        .with_graceful_shutdown(async move { signal.wait_for_signal().await })
        .await
        .inspect_err(|e| tracing::error!("Server encountered an error: {:?}", e));

    // Also release cleanup when the server stopped on its own
    coordinator.shutdown();
    cleanup_handle.await.ok();

    serve_result
}
