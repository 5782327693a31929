use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use utoipa::ToSchema;
use uuid::Uuid;
use validator::{Validate, ValidationError};

use super::validation::validate_currency;
use crate::models::Order;

#[derive(Debug, Clone, Deserialize, Validate, ToSchema)]
pub struct CreateProductRequest {
    #[validate(length(min = 1, max = 255))]
    pub name: String,

    #[validate(length(max = 5000))]
    pub description: Option<String>,

    #[validate(custom(function = "validate_price"))]
    pub price: Decimal,

    #[validate(custom(function = "validate_currency"))]
    pub currency: String,

    #[validate(range(min = 0))]
    pub stock: i32,
}

#[derive(Debug, Clone, Deserialize, Validate, ToSchema)]
pub struct UpdateProductRequest {
    #[validate(length(min = 1, max = 255))]
    pub name: Option<String>,

    #[validate(length(max = 5000))]
    pub description: Option<String>,

    #[validate(custom(function = "validate_price"))]
    pub price: Option<Decimal>,

    #[validate(range(min = 0))]
    pub stock: Option<i32>,

    pub active: Option<bool>,
}

fn validate_price(price: &Decimal) -> Result<(), ValidationError> {
    if price.is_sign_positive() && !price.is_zero() && price.scale() <= 2 {
        Ok(())
    } else {
        Err(ValidationError::new("invalid_price")
            .with_message("Price must be positive with at most two decimals".into()))
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, Validate, ToSchema)]
pub struct OrderItemRequest {
    pub product_id: Uuid,

    #[validate(range(min = 1, max = 100, message = "Quantity must be between 1 and 100"))]
    pub quantity: i32,
}

#[derive(Debug, Clone, Deserialize, Validate, ToSchema)]
pub struct CreateOrderRequest {
    #[validate(length(min = 1, max = 50, message = "An order needs 1 to 50 items"))]
    #[validate(nested)]
    pub items: Vec<OrderItemRequest>,
}

#[derive(Debug, Clone, Serialize, Deserialize, FromRow, ToSchema)]
pub struct OrderLineResponse {
    pub product_id: Uuid,
    pub product_name: String,
    pub quantity: i32,
    pub unit_price: Decimal,
    pub line_total: Decimal,
}

#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct OrderResponse {
    #[serde(flatten)]
    pub order: Order,
    pub items: Vec<OrderLineResponse>,
}

#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct CheckoutResponse {
    pub order_id: Uuid,
    pub payment_reference: String,
    pub amount: Decimal,
    pub currency: String,
    pub created_at: DateTime<Utc>,
}

/// Sum of `unit_price * quantity` over every line.
pub fn order_total<'a>(lines: impl IntoIterator<Item = (&'a Decimal, i32)>) -> Decimal {
    lines
        .into_iter()
        .map(|(price, quantity)| *price * Decimal::from(quantity))
        .sum()
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::str::FromStr;

    #[test]
    fn totals_multiply_quantities() {
        let shirt = Decimal::from_str("59.90").unwrap();
        let socks = Decimal::from_str("7.50").unwrap();
        let total = order_total([(&shirt, 2), (&socks, 3)]);
        assert_eq!(total, Decimal::from_str("142.30").unwrap());
    }

    #[test]
    fn price_must_be_positive_cents() {
        assert!(validate_price(&Decimal::from_str("10.00").unwrap()).is_ok());
        assert!(validate_price(&Decimal::ZERO).is_err());
        assert!(validate_price(&Decimal::from_str("-1").unwrap()).is_err());
        assert!(validate_price(&Decimal::from_str("1.999").unwrap()).is_err());
    }

    #[test]
    fn order_items_are_validated() {
        let order = CreateOrderRequest {
            items: vec![OrderItemRequest {
                product_id: Uuid::new_v4(),
                quantity: 0,
            }],
        };
        assert!(order.validate().is_err());

        let empty = CreateOrderRequest { items: vec![] };
        assert!(empty.validate().is_err());
    }
}
