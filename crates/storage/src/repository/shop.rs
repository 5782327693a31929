use std::collections::BTreeMap;

use sqlx::{PgConnection, PgPool};
use tracing::info;
use uuid::Uuid;

use crate::dto::common::PaginationParams;
use crate::dto::shop::{
    CreateOrderRequest, CreateProductRequest, OrderLineResponse, OrderResponse,
    UpdateProductRequest, order_total,
};
use crate::error::{Result, StorageError};
use crate::models::{Order, OrderStatus, Product};

const PRODUCT_COLUMNS: &str =
    "product_id, name, description, price, currency, stock, active, created_at";
const ORDER_COLUMNS: &str =
    "order_id, user_id, status, total, currency, payment_reference, created_at, paid_at";

pub struct ShopRepository<'a> {
    pool: &'a PgPool,
}

impl<'a> ShopRepository<'a> {
    pub fn new(pool: &'a PgPool) -> Self {
        Self { pool }
    }

    pub async fn list_products(
        &self,
        include_inactive: bool,
        pagination: &PaginationParams,
    ) -> Result<(Vec<Product>, i64)> {
        let total = sqlx::query_scalar::<_, i64>(
            "SELECT COUNT(*) FROM products WHERE active OR $1",
        )
        .bind(include_inactive)
        .fetch_one(self.pool)
        .await?;

        let products = sqlx::query_as::<_, Product>(&format!(
            r#"
            SELECT {PRODUCT_COLUMNS} FROM products
            WHERE active OR $1
            ORDER BY name ASC
            LIMIT $2 OFFSET $3
            "#
        ))
        .bind(include_inactive)
        .bind(pagination.limit())
        .bind(pagination.offset())
        .fetch_all(self.pool)
        .await?;

        Ok((products, total))
    }

    pub async fn find_product(&self, product_id: Uuid, include_inactive: bool) -> Result<Product> {
        sqlx::query_as::<_, Product>(&format!(
            "SELECT {PRODUCT_COLUMNS} FROM products WHERE product_id = $1 AND (active OR $2)"
        ))
        .bind(product_id)
        .bind(include_inactive)
        .fetch_optional(self.pool)
        .await?
        .ok_or(StorageError::NotFound)
    }

    pub async fn create_product(&self, request: &CreateProductRequest) -> Result<Product> {
        let product = sqlx::query_as::<_, Product>(&format!(
            r#"
            INSERT INTO products (name, description, price, currency, stock)
            VALUES ($1, $2, $3, $4, $5)
            RETURNING {PRODUCT_COLUMNS}
            "#
        ))
        .bind(&request.name)
        .bind(&request.description)
        .bind(request.price)
        .bind(request.currency.to_uppercase())
        .bind(request.stock)
        .fetch_one(self.pool)
        .await?;

        info!(product_id = %product.product_id, "Created product");
        Ok(product)
    }

    pub async fn update_product(
        &self,
        product_id: Uuid,
        request: &UpdateProductRequest,
    ) -> Result<Product> {
        sqlx::query_as::<_, Product>(&format!(
            r#"
            UPDATE products SET
                name = COALESCE($2, name),
                description = COALESCE($3, description),
                price = COALESCE($4, price),
                stock = COALESCE($5, stock),
                active = COALESCE($6, active)
            WHERE product_id = $1
            RETURNING {PRODUCT_COLUMNS}
            "#
        ))
        .bind(product_id)
        .bind(&request.name)
        .bind(&request.description)
        .bind(request.price)
        .bind(request.stock)
        .bind(request.active)
        .fetch_optional(self.pool)
        .await?
        .ok_or(StorageError::NotFound)
    }

    /// Products referenced by orders are deactivated instead of removed.
    pub async fn delete_product(&self, product_id: Uuid) -> Result<()> {
        let result = sqlx::query("DELETE FROM products WHERE product_id = $1")
            .bind(product_id)
            .execute(self.pool)
            .await;

        let affected = match result {
            Ok(done) => done.rows_affected(),
            Err(e) => {
                let err = StorageError::from(e);
                if !err.is_foreign_key_violation() {
                    return Err(err);
                }
                sqlx::query("UPDATE products SET active = FALSE WHERE product_id = $1")
                    .bind(product_id)
                    .execute(self.pool)
                    .await?
                    .rows_affected()
            }
        };

        if affected == 0 {
            return Err(StorageError::NotFound);
        }
        Ok(())
    }

    /// Places a pending order priced at current prices and reserves stock.
    pub async fn create_order(
        &self,
        user_id: Uuid,
        request: &CreateOrderRequest,
    ) -> Result<OrderResponse> {
        // Repeated lines for one product collapse into one.
        let mut quantities: BTreeMap<Uuid, i32> = BTreeMap::new();
        for item in &request.items {
            *quantities.entry(item.product_id).or_insert(0) += item.quantity;
        }
        let product_ids: Vec<Uuid> = quantities.keys().copied().collect();

        let mut tx = self.pool.begin().await?;

        let products = sqlx::query_as::<_, Product>(&format!(
            r#"
            SELECT {PRODUCT_COLUMNS} FROM products
            WHERE product_id = ANY($1) AND active
            ORDER BY product_id
            FOR UPDATE
            "#
        ))
        .bind(&product_ids)
        .fetch_all(&mut *tx)
        .await?;

        if products.len() != product_ids.len() {
            return Err(StorageError::NotFound);
        }

        let currency = products[0].currency.clone();
        if products.iter().any(|p| p.currency != currency) {
            return Err(StorageError::InvalidInput(
                "All items in an order must share one currency".to_string(),
            ));
        }

        for product in &products {
            let wanted = quantities[&product.product_id];
            if product.stock < wanted {
                return Err(StorageError::InvalidState(format!(
                    "Insufficient stock for '{}': {} left",
                    product.name, product.stock
                )));
            }
        }

        let total = order_total(
            products
                .iter()
                .map(|p| (&p.price, quantities[&p.product_id])),
        );

        let order = sqlx::query_as::<_, Order>(&format!(
            r#"
            INSERT INTO orders (user_id, status, total, currency)
            VALUES ($1, $2, $3, $4)
            RETURNING {ORDER_COLUMNS}
            "#
        ))
        .bind(user_id)
        .bind(OrderStatus::Pending.as_str())
        .bind(total)
        .bind(&currency)
        .fetch_one(&mut *tx)
        .await?;

        for product in &products {
            let quantity = quantities[&product.product_id];

            sqlx::query(
                r#"
                INSERT INTO order_items (order_id, product_id, quantity, unit_price)
                VALUES ($1, $2, $3, $4)
                "#,
            )
            .bind(order.order_id)
            .bind(product.product_id)
            .bind(quantity)
            .bind(product.price)
            .execute(&mut *tx)
            .await?;

            sqlx::query("UPDATE products SET stock = stock - $2 WHERE product_id = $1")
                .bind(product.product_id)
                .bind(quantity)
                .execute(&mut *tx)
                .await?;
        }

        let items = fetch_lines(&mut tx, order.order_id).await?;
        tx.commit().await?;

        info!(order_id = %order.order_id, %total, "Placed order");
        Ok(OrderResponse { order, items })
    }

    pub async fn find_order(&self, order_id: Uuid) -> Result<Order> {
        sqlx::query_as::<_, Order>(&format!(
            "SELECT {ORDER_COLUMNS} FROM orders WHERE order_id = $1"
        ))
        .bind(order_id)
        .fetch_optional(self.pool)
        .await?
        .ok_or(StorageError::NotFound)
    }

    pub async fn order_detail(&self, order_id: Uuid) -> Result<OrderResponse> {
        let order = self.find_order(order_id).await?;
        let mut conn = self.pool.acquire().await?;
        let items = fetch_lines(&mut conn, order_id).await?;

        Ok(OrderResponse { order, items })
    }

    pub async fn list_orders(
        &self,
        user_id: Uuid,
        pagination: &PaginationParams,
    ) -> Result<(Vec<Order>, i64)> {
        let total = sqlx::query_scalar::<_, i64>("SELECT COUNT(*) FROM orders WHERE user_id = $1")
            .bind(user_id)
            .fetch_one(self.pool)
            .await?;

        let orders = sqlx::query_as::<_, Order>(&format!(
            r#"
            SELECT {ORDER_COLUMNS} FROM orders
            WHERE user_id = $1
            ORDER BY created_at DESC
            LIMIT $2 OFFSET $3
            "#
        ))
        .bind(user_id)
        .bind(pagination.limit())
        .bind(pagination.offset())
        .fetch_all(self.pool)
        .await?;

        Ok((orders, total))
    }

    /// Attaches the gateway's payment reference to a pending order.
    pub async fn set_payment_reference(&self, order_id: Uuid, reference: &str) -> Result<Order> {
        sqlx::query_as::<_, Order>(&format!(
            r#"
            UPDATE orders SET payment_reference = $2
            WHERE order_id = $1 AND status = 'pending'
            RETURNING {ORDER_COLUMNS}
            "#
        ))
        .bind(order_id)
        .bind(reference)
        .fetch_optional(self.pool)
        .await
        .map_err(|e| StorageError::from(e).on_conflict("Payment reference already used"))?
        .ok_or_else(|| StorageError::InvalidState("Only pending orders can be paid".to_string()))
    }

    pub async fn confirm_payment(&self, reference: &str) -> Result<Order> {
        let order = sqlx::query_as::<_, Order>(&format!(
            "SELECT {ORDER_COLUMNS} FROM orders WHERE payment_reference = $1"
        ))
        .bind(reference)
        .fetch_optional(self.pool)
        .await?
        .ok_or(StorageError::NotFound)?;

        if order.status != OrderStatus::Pending.as_str() {
            return Err(StorageError::InvalidState(format!(
                "Order is already {}",
                order.status
            )));
        }

        let paid = sqlx::query_as::<_, Order>(&format!(
            r#"
            UPDATE orders SET status = $2, paid_at = NOW()
            WHERE order_id = $1 AND status = 'pending'
            RETURNING {ORDER_COLUMNS}
            "#
        ))
        .bind(order.order_id)
        .bind(OrderStatus::Paid.as_str())
        .fetch_optional(self.pool)
        .await?
        .ok_or_else(|| StorageError::InvalidState("Order is no longer pending".to_string()))?;

        info!(order_id = %paid.order_id, "Payment confirmed");
        Ok(paid)
    }

    /// Cancels a pending order and puts its items back in stock.
    pub async fn cancel_order(&self, order_id: Uuid) -> Result<Order> {
        let mut tx = self.pool.begin().await?;

        let cancelled = sqlx::query_as::<_, Order>(&format!(
            r#"
            UPDATE orders SET status = $2
            WHERE order_id = $1 AND status = 'pending'
            RETURNING {ORDER_COLUMNS}
            "#
        ))
        .bind(order_id)
        .bind(OrderStatus::Cancelled.as_str())
        .fetch_optional(&mut *tx)
        .await?
        .ok_or_else(|| {
            StorageError::InvalidState("Only pending orders can be cancelled".to_string())
        })?;

        sqlx::query(
            r#"
            UPDATE products p SET stock = p.stock + oi.quantity
            FROM order_items oi
            WHERE oi.order_id = $1 AND oi.product_id = p.product_id
            "#,
        )
        .bind(order_id)
        .execute(&mut *tx)
        .await?;

        tx.commit().await?;

        info!(%order_id, "Cancelled order");
        Ok(cancelled)
    }
}

async fn fetch_lines(conn: &mut PgConnection, order_id: Uuid) -> Result<Vec<OrderLineResponse>> {
    let lines = sqlx::query_as::<_, OrderLineResponse>(
        r#"
        SELECT oi.product_id, p.name AS product_name, oi.quantity, oi.unit_price,
               oi.unit_price * oi.quantity AS line_total
        FROM order_items oi
        JOIN products p ON p.product_id = oi.product_id
        WHERE oi.order_id = $1
        ORDER BY p.name
        "#,
    )
    .bind(order_id)
    .fetch_all(conn)
    .await?;

    Ok(lines)
}
