use super::cart::CartItem;
use super::currency::Currency;
use crate::error::Result;
use async_trait::async_trait;
use std::sync::Arc;

/// Source of the current cart contents.
#[async_trait]
pub trait CartService: Send + Sync {
    async fn fetch_cart_items(&self) -> Result<Vec<CartItem>>;
}

/// Source of the currencies accepted for payment.
#[async_trait]
pub trait CurrencyService: Send + Sync {
    async fn fetch_currencies(&self) -> Result<Vec<Currency>>;
}

/// Submits payment for the current order.
#[async_trait]
pub trait PaymentService: Send + Sync {
    async fn submit_payment(&self, currency_id: &str) -> Result<()>;
}

pub type CartServiceArc = Arc<dyn CartService>;
pub type CurrencyServiceArc = Arc<dyn CurrencyService>;
pub type PaymentServiceArc = Arc<dyn PaymentService>;
