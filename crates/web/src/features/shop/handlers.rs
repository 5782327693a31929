use axum::{
    Json,
    extract::{Path, Query, State},
    http::StatusCode,
    response::{IntoResponse, Response},
};
use storage::{
    Database,
    dto::{
        common::{PaginatedResponse, PaginationParams},
        shop::{
            CheckoutResponse, CreateOrderRequest, CreateProductRequest, OrderResponse,
            UpdateProductRequest,
        },
    },
    models::{Order, Product},
};
use uuid::Uuid;
use validator::Validate;

use super::services;
use crate::error::WebError;
use crate::middleware::session::CurrentUser;
use crate::state::AppState;

#[utoipa::path(
    get,
    path = "/api/products",
    params(PaginationParams),
    responses(
        (status = 200, description = "Active products", body = PaginatedResponse<Product>),
        (status = 400, description = "Invalid pagination")
    ),
    tag = "shop"
)]
pub async fn list_products(
    State(db): State<Database>,
    Query(pagination): Query<PaginationParams>,
) -> Result<Response, WebError> {
    pagination.validate().map_err(WebError::BadRequest)?;

    let (products, total) = services::list_products(db.pool(), false, &pagination).await?;

    Ok(Json(PaginatedResponse::from_params(products, &pagination, total)).into_response())
}

#[utoipa::path(
    get,
    path = "/api/products/{id}",
    params(("id" = Uuid, Path, description = "Product id")),
    responses(
        (status = 200, description = "Product", body = Product),
        (status = 404, description = "Product not found or inactive")
    ),
    tag = "shop"
)]
pub async fn get_product(
    State(db): State<Database>,
    Path(id): Path<Uuid>,
) -> Result<Response, WebError> {
    let product = services::get_product(db.pool(), id).await?;

    Ok(Json(product).into_response())
}

#[utoipa::path(
    post,
    path = "/api/orders",
    request_body = CreateOrderRequest,
    security(("bearer_auth" = [])),
    responses(
        (status = 201, description = "Pending order with reserved stock", body = OrderResponse),
        (status = 400, description = "Validation error or mixed currencies"),
        (status = 401, description = "Unauthorized"),
        (status = 404, description = "Product not found"),
        (status = 409, description = "Insufficient stock")
    ),
    tag = "shop"
)]
pub async fn create_order(
    State(db): State<Database>,
    current: CurrentUser,
    Json(req): Json<CreateOrderRequest>,
) -> Result<Response, WebError> {
    req.validate()?;

    let order = services::place_order(db.pool(), current.id(), &req).await?;

    Ok((StatusCode::CREATED, Json(order)).into_response())
}

#[utoipa::path(
    get,
    path = "/api/orders",
    params(PaginationParams),
    security(("bearer_auth" = [])),
    responses(
        (status = 200, description = "Own orders, newest first", body = PaginatedResponse<Order>),
        (status = 401, description = "Unauthorized")
    ),
    tag = "shop"
)]
pub async fn list_orders(
    State(db): State<Database>,
    current: CurrentUser,
    Query(pagination): Query<PaginationParams>,
) -> Result<Response, WebError> {
    pagination.validate().map_err(WebError::BadRequest)?;

    let (orders, total) = services::list_orders(db.pool(), current.id(), &pagination).await?;

    Ok(Json(PaginatedResponse::from_params(orders, &pagination, total)).into_response())
}

#[utoipa::path(
    get,
    path = "/api/orders/{id}",
    params(("id" = Uuid, Path, description = "Order id")),
    security(("bearer_auth" = [])),
    responses(
        (status = 200, description = "Order with line items", body = OrderResponse),
        (status = 401, description = "Unauthorized"),
        (status = 404, description = "Order not found")
    ),
    tag = "shop"
)]
pub async fn get_order(
    State(db): State<Database>,
    current: CurrentUser,
    Path(id): Path<Uuid>,
) -> Result<Response, WebError> {
    let order = services::get_order(db.pool(), id, current.id()).await?;

    Ok(Json(order).into_response())
}

#[utoipa::path(
    post,
    path = "/api/orders/{id}/checkout",
    params(("id" = Uuid, Path, description = "Order id")),
    security(("bearer_auth" = [])),
    responses(
        (status = 200, description = "Payment opened", body = CheckoutResponse),
        (status = 401, description = "Unauthorized"),
        (status = 404, description = "Order not found"),
        (status = 409, description = "Order is not pending")
    ),
    tag = "shop"
)]
pub async fn checkout(
    State(state): State<AppState>,
    current: CurrentUser,
    Path(id): Path<Uuid>,
) -> Result<Response, WebError> {
    let checkout = services::checkout(&state, id, current.id()).await?;

    Ok(Json(checkout).into_response())
}

#[utoipa::path(
    post,
    path = "/api/orders/{id}/cancel",
    params(("id" = Uuid, Path, description = "Order id")),
    security(("bearer_auth" = [])),
    responses(
        (status = 200, description = "Order cancelled and stock restored", body = Order),
        (status = 401, description = "Unauthorized"),
        (status = 404, description = "Order not found"),
        (status = 409, description = "Order is not pending")
    ),
    tag = "shop"
)]
pub async fn cancel_order(
    State(db): State<Database>,
    current: CurrentUser,
    Path(id): Path<Uuid>,
) -> Result<Response, WebError> {
    let order = services::cancel_order(db.pool(), id, current.id()).await?;

    Ok(Json(order).into_response())
}

#[utoipa::path(
    get,
    path = "/api/admin/products",
    params(PaginationParams),
    security(("api_key" = [])),
    responses(
        (status = 200, description = "Every product, inactive included", body = PaginatedResponse<Product>),
        (status = 401, description = "Invalid admin key")
    ),
    tag = "admin"
)]
pub async fn admin_list_products(
    State(db): State<Database>,
    Query(pagination): Query<PaginationParams>,
) -> Result<Response, WebError> {
    pagination.validate().map_err(WebError::BadRequest)?;

    let (products, total) = services::list_products(db.pool(), true, &pagination).await?;

    Ok(Json(PaginatedResponse::from_params(products, &pagination, total)).into_response())
}

#[utoipa::path(
    post,
    path = "/api/admin/products",
    request_body = CreateProductRequest,
    security(("api_key" = [])),
    responses(
        (status = 201, description = "Product created", body = Product),
        (status = 400, description = "Validation error"),
        (status = 401, description = "Invalid admin key")
    ),
    tag = "admin"
)]
pub async fn create_product(
    State(db): State<Database>,
    Json(req): Json<CreateProductRequest>,
) -> Result<Response, WebError> {
    req.validate()?;

    let product = services::create_product(db.pool(), &req).await?;

    Ok((StatusCode::CREATED, Json(product)).into_response())
}

#[utoipa::path(
    put,
    path = "/api/admin/products/{id}",
    params(("id" = Uuid, Path, description = "Product id")),
    request_body = UpdateProductRequest,
    security(("api_key" = [])),
    responses(
        (status = 200, description = "Product updated", body = Product),
        (status = 400, description = "Validation error"),
        (status = 401, description = "Invalid admin key"),
        (status = 404, description = "Product not found")
    ),
    tag = "admin"
)]
pub async fn update_product(
    State(db): State<Database>,
    Path(id): Path<Uuid>,
    Json(req): Json<UpdateProductRequest>,
) -> Result<Response, WebError> {
    req.validate()?;

    let product = services::update_product(db.pool(), id, &req).await?;

    Ok(Json(product).into_response())
}

#[utoipa::path(
    delete,
    path = "/api/admin/products/{id}",
    params(("id" = Uuid, Path, description = "Product id")),
    security(("api_key" = [])),
    responses(
        (status = 204, description = "Product deleted, or deactivated when already ordered"),
        (status = 401, description = "Invalid admin key"),
        (status = 404, description = "Product not found")
    ),
    tag = "admin"
)]
pub async fn delete_product(
    State(db): State<Database>,
    Path(id): Path<Uuid>,
) -> Result<Response, WebError> {
    services::delete_product(db.pool(), id).await?;

    Ok(StatusCode::NO_CONTENT.into_response())
}

#[utoipa::path(
    post,
    path = "/api/admin/payments/{reference}/confirm",
    params(("reference" = String, Path, description = "Gateway payment reference")),
    security(("api_key" = [])),
    responses(
        (status = 200, description = "Order marked paid", body = Order),
        (status = 401, description = "Invalid admin key"),
        (status = 404, description = "Unknown reference"),
        (status = 409, description = "Order is not pending")
    ),
    tag = "admin"
)]
pub async fn confirm_payment(
    State(state): State<AppState>,
    Path(reference): Path<String>,
) -> Result<Response, WebError> {
    let order = services::confirm_payment(&state, &reference).await?;

    Ok(Json(order).into_response())
}
