use async_trait::async_trait;
use storage::models::Order;
use uuid::Uuid;

/// Payment created at the provider for one order.
#[derive(Debug, Clone)]
pub struct PaymentIntent {
    pub reference: String,
}

/// Seam for the card processor. Capture is confirmed out of band through
/// the admin payment confirmation endpoint.
#[async_trait]
pub trait PaymentGateway: Send + Sync {
    fn name(&self) -> &'static str;

    async fn create_payment(&self, order: &Order) -> anyhow::Result<PaymentIntent>;
}

/// Issues local references; an operator confirms the payment by hand.
#[derive(Debug, Clone, Copy, Default)]
pub struct ManualGateway;

#[async_trait]
impl PaymentGateway for ManualGateway {
    fn name(&self) -> &'static str {
        "manual"
    }

    async fn create_payment(&self, order: &Order) -> anyhow::Result<PaymentIntent> {
        tracing::debug!(order_id = %order.order_id, total = %order.total, "Creating manual payment");
        Ok(PaymentIntent {
            reference: format!("manual_{}", Uuid::new_v4().simple()),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;
    use rust_decimal::Decimal;

    #[tokio::test]
    async fn manual_references_are_unique() {
        let order = Order {
            order_id: Uuid::new_v4(),
            user_id: Uuid::new_v4(),
            status: "pending".to_string(),
            total: Decimal::new(4999, 2),
            currency: "EUR".to_string(),
            payment_reference: None,
            created_at: Utc::now(),
            paid_at: None,
        };

        let gateway = ManualGateway;
        let first = gateway.create_payment(&order).await.unwrap();
        let second = gateway.create_payment(&order).await.unwrap();

        assert!(first.reference.starts_with("manual_"));
        assert_ne!(first.reference, second.reference);
    }
}
