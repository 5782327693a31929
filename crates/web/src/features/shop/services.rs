use sqlx::PgPool;
use storage::{
    dto::{
        common::PaginationParams,
        shop::{
            CheckoutResponse, CreateOrderRequest, CreateProductRequest, OrderResponse,
            UpdateProductRequest,
        },
    },
    error::{Result, StorageError},
    models::{NotificationKind, Order, OrderStatus, Product},
    repository::shop::ShopRepository,
};
use tracing::{error, info};
use uuid::Uuid;

use crate::error::{WebError, WebResult};
use crate::features::notifications::services::notify_quietly;
use crate::state::AppState;

/// Loads an order the caller placed. Other users' orders look missing.
async fn owned_order(pool: &PgPool, order_id: Uuid, user_id: Uuid) -> WebResult<Order> {
    let order = ShopRepository::new(pool).find_order(order_id).await?;
    if order.user_id != user_id {
        return Err(StorageError::NotFound.into());
    }
    Ok(order)
}

pub async fn list_products(
    pool: &PgPool,
    include_inactive: bool,
    pagination: &PaginationParams,
) -> Result<(Vec<Product>, i64)> {
    ShopRepository::new(pool)
        .list_products(include_inactive, pagination)
        .await
}

pub async fn get_product(pool: &PgPool, product_id: Uuid) -> Result<Product> {
    ShopRepository::new(pool).find_product(product_id, false).await
}

pub async fn create_product(pool: &PgPool, request: &CreateProductRequest) -> Result<Product> {
    let product = ShopRepository::new(pool).create_product(request).await?;
    info!(product_id = %product.product_id, name = %product.name, "Product created");
    Ok(product)
}

pub async fn update_product(
    pool: &PgPool,
    product_id: Uuid,
    request: &UpdateProductRequest,
) -> Result<Product> {
    ShopRepository::new(pool)
        .update_product(product_id, request)
        .await
}

pub async fn delete_product(pool: &PgPool, product_id: Uuid) -> Result<()> {
    ShopRepository::new(pool).delete_product(product_id).await
}

pub async fn place_order(
    pool: &PgPool,
    user_id: Uuid,
    request: &CreateOrderRequest,
) -> Result<OrderResponse> {
    let order = ShopRepository::new(pool).create_order(user_id, request).await?;
    info!(
        order_id = %order.order.order_id,
        total = %order.order.total,
        currency = %order.order.currency,
        "Order placed"
    );
    Ok(order)
}

pub async fn list_orders(
    pool: &PgPool,
    user_id: Uuid,
    pagination: &PaginationParams,
) -> Result<(Vec<Order>, i64)> {
    ShopRepository::new(pool).list_orders(user_id, pagination).await
}

pub async fn get_order(pool: &PgPool, order_id: Uuid, user_id: Uuid) -> WebResult<OrderResponse> {
    owned_order(pool, order_id, user_id).await?;

    let detail = ShopRepository::new(pool).order_detail(order_id).await?;
    Ok(detail)
}

/// Opens a payment at the gateway and stores its reference on the order.
pub async fn checkout(state: &AppState, order_id: Uuid, user_id: Uuid) -> WebResult<CheckoutResponse> {
    let pool = state.db.pool();
    let order = owned_order(pool, order_id, user_id).await?;

    if order.status != OrderStatus::Pending.as_str() {
        return Err(StorageError::InvalidState(format!(
            "Order is already {}",
            order.status
        ))
        .into());
    }

    let intent = state.payments.create_payment(&order).await.map_err(|e| {
        error!(%order_id, gateway = state.payments.name(), error = %e, "Payment gateway failed");
        WebError::InternalServerError(format!("Payment gateway error: {}", e))
    })?;

    let order = ShopRepository::new(pool)
        .set_payment_reference(order_id, &intent.reference)
        .await?;

    Ok(CheckoutResponse {
        order_id: order.order_id,
        payment_reference: intent.reference,
        amount: order.total,
        currency: order.currency,
        created_at: order.created_at,
    })
}

pub async fn cancel_order(pool: &PgPool, order_id: Uuid, user_id: Uuid) -> WebResult<Order> {
    owned_order(pool, order_id, user_id).await?;

    let order = ShopRepository::new(pool).cancel_order(order_id).await?;
    Ok(order)
}

/// Marks the order paid and tells the buyer.
pub async fn confirm_payment(state: &AppState, reference: &str) -> Result<Order> {
    let order = ShopRepository::new(state.db.pool())
        .confirm_payment(reference)
        .await?;

    notify_quietly(
        state,
        order.user_id,
        None,
        NotificationKind::Order,
        format!("Payment received for your order of {} {}", order.total, order.currency),
        Some(order.order_id),
    )
    .await;

    Ok(order)
}
