//! HTTP handlers for the Products API

use axum::{
    Json, Router,
    extract::{State, rejection::JsonRejection},
    http::{HeaderMap, StatusCode},
    response::IntoResponse,
    routing::get,
};
use axum_helpers::{
    AppError, AuditEvent, AuditOutcome, UuidPath, ValidatedJson,
    errors::responses::{
        BadRequestUuidResponse, BadRequestValidationResponse, NotFoundResponse, ServerFaultResponse,
    },
    extract_ip_from_headers, extract_user_agent,
};
use serde_json::json;
use std::sync::Arc;
use utoipa::OpenApi;
use uuid::Uuid;

use crate::error::{ProductError, ProductResult};
use crate::models::{CreateProduct, ProductView, UpdateProduct};
use crate::repository::ProductStore;
use crate::service::ProductService;

/// OpenAPI tag shared by every product endpoint
pub const TAG: &str = "products";

/// OpenAPI documentation for Products API
#[derive(OpenApi)]
#[openapi(
    paths(list_products, create_product, get_product, update_product, delete_product),
    components(
        schemas(ProductView, CreateProduct, UpdateProduct),
        responses(
            NotFoundResponse,
            BadRequestValidationResponse,
            BadRequestUuidResponse,
            ServerFaultResponse
        )
    ),
    tags(
        (name = TAG, description = "Product catalog endpoints")
    )
)]
pub struct ApiDoc;

/// Product routes, relative to where the caller nests them.
///
/// Every request opens its own repository from `store`, so staged changes
/// never leak between requests.
pub fn router<S: ProductStore>(store: S) -> Router {
    Router::new()
        .route("/", get(list_products::<S>).post(create_product::<S>))
        .route(
            "/{id}",
            get(get_product::<S>)
                .put(update_product::<S>)
                .delete(delete_product::<S>),
        )
        .with_state(Arc::new(store))
}

fn service<S: ProductStore>(store: &S) -> ProductService<S::Repository> {
    ProductService::new(store.open())
}

fn audit(action: &str, id: Uuid, headers: &HeaderMap) -> AuditEvent {
    AuditEvent::new(action, Some(format!("product:{}", id)), AuditOutcome::Success)
        .with_ip(extract_ip_from_headers(headers))
        .with_user_agent(extract_user_agent(headers))
}

/// List all products
#[utoipa::path(
    get,
    path = "",
    tag = TAG,
    responses(
        (status = 200, description = "All products", body = Vec<ProductView>),
        (status = 500, response = ServerFaultResponse)
    )
)]
async fn list_products<S: ProductStore>(
    State(store): State<Arc<S>>,
) -> ProductResult<Json<Vec<ProductView>>> {
    let products = service(store.as_ref()).list_products().await?;
    Ok(Json(products))
}

/// Create a new product
#[utoipa::path(
    post,
    path = "",
    tag = TAG,
    request_body = CreateProduct,
    responses(
        (status = 201, description = "Product created", body = ProductView),
        (status = 400, response = BadRequestValidationResponse),
        (status = 500, response = ServerFaultResponse)
    )
)]
async fn create_product<S: ProductStore>(
    State(store): State<Arc<S>>,
    headers: HeaderMap,
    ValidatedJson(input): ValidatedJson<CreateProduct>,
) -> ProductResult<impl IntoResponse> {
    let product = service(store.as_ref()).create_product(input).await?;

    audit("product.create", product.id, &headers)
        .with_details(json!({
            "name": product.name,
            "price": product.price.to_string(),
            "stock": product.stock,
        }))
        .log();

    Ok((StatusCode::CREATED, Json(product)))
}

/// Get a product by ID
#[utoipa::path(
    get,
    path = "/{id}",
    tag = TAG,
    params(
        ("id" = Uuid, Path, description = "Product ID")
    ),
    responses(
        (status = 200, description = "Product found", body = ProductView),
        (status = 400, response = BadRequestUuidResponse),
        (status = 404, response = NotFoundResponse),
        (status = 500, response = ServerFaultResponse)
    )
)]
async fn get_product<S: ProductStore>(
    State(store): State<Arc<S>>,
    UuidPath(id): UuidPath,
) -> ProductResult<Json<ProductView>> {
    service(store.as_ref())
        .get_product(id)
        .await?
        .map(Json)
        .ok_or(ProductError::NotFound(id))
}

/// Replace a product's attributes
///
/// The body is stored as sent. Succeeds whether or not the product exists.
#[utoipa::path(
    put,
    path = "/{id}",
    tag = TAG,
    params(
        ("id" = Uuid, Path, description = "Product ID")
    ),
    request_body = UpdateProduct,
    responses(
        (status = 204, description = "Product updated, or no such product"),
        (status = 400, response = BadRequestUuidResponse),
        (status = 500, response = ServerFaultResponse)
    )
)]
async fn update_product<S: ProductStore>(
    State(store): State<Arc<S>>,
    headers: HeaderMap,
    UuidPath(id): UuidPath,
    body: Result<Json<UpdateProduct>, JsonRejection>,
) -> Result<StatusCode, AppError> {
    let Json(input) = body?;
    service(store.as_ref()).update_product(id, input).await?;

    audit("product.update", id, &headers).log();

    Ok(StatusCode::NO_CONTENT)
}

/// Delete a product
///
/// Succeeds whether or not the product exists.
#[utoipa::path(
    delete,
    path = "/{id}",
    tag = TAG,
    params(
        ("id" = Uuid, Path, description = "Product ID")
    ),
    responses(
        (status = 204, description = "Product deleted, or no such product"),
        (status = 400, response = BadRequestUuidResponse),
        (status = 500, response = ServerFaultResponse)
    )
)]
async fn delete_product<S: ProductStore>(
    State(store): State<Arc<S>>,
    headers: HeaderMap,
    UuidPath(id): UuidPath,
) -> ProductResult<StatusCode> {
    service(store.as_ref()).delete_product(id).await?;

    audit("product.delete", id, &headers).log();

    Ok(StatusCode::NO_CONTENT)
}
