use crate::domain::cart::CartItem;
use crate::domain::currency::{self, Currency};
use crate::domain::ports::{CartService, CurrencyService, PaymentService};
use crate::error::{CartError, Result};
use async_trait::async_trait;
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::time::Duration;
use tokio::sync::RwLock;
use tracing::debug;

#[derive(Default)]
struct Failures {
    cart: AtomicBool,
    currencies: AtomicBool,
    payment: AtomicBool,
}

/// An in-memory stand-in for the marketplace backend.
///
/// Serves a fixed cart and currency list, records accepted payments, and can be
/// told to fail any operation or to answer after a delay. Failure switches can
/// be flipped between calls. `Clone` shares the underlying state.
#[derive(Default, Clone)]
pub struct InMemoryNftService {
    items: Arc<RwLock<Vec<CartItem>>>,
    currencies: Arc<RwLock<Vec<Currency>>>,
    accepted: Arc<RwLock<Vec<String>>>,
    attempts: Arc<AtomicUsize>,
    failures: Arc<Failures>,
    latency: Duration,
}

impl InMemoryNftService {
    pub fn new(items: Vec<CartItem>, currencies: Vec<Currency>) -> Self {
        Self {
            items: Arc::new(RwLock::new(items)),
            currencies: Arc::new(RwLock::new(currencies)),
            ..Self::default()
        }
    }

    /// Delays every response by `latency`.
    pub fn with_latency(mut self, latency: Duration) -> Self {
        self.latency = latency;
        self
    }

    pub fn fail_cart(&self, fail: bool) {
        self.failures.cart.store(fail, Ordering::SeqCst);
    }

    pub fn fail_currencies(&self, fail: bool) {
        self.failures.currencies.store(fail, Ordering::SeqCst);
    }

    pub fn fail_payment(&self, fail: bool) {
        self.failures.payment.store(fail, Ordering::SeqCst);
    }

    pub async fn set_items(&self, items: Vec<CartItem>) {
        *self.items.write().await = items;
    }

    /// Currency ids of every payment that went through, in order.
    pub async fn accepted_payments(&self) -> Vec<String> {
        self.accepted.read().await.clone()
    }

    /// Number of payment submissions received, successful or not.
    pub fn payment_attempts(&self) -> usize {
        self.attempts.load(Ordering::SeqCst)
    }

    async fn respond(&self) {
        if !self.latency.is_zero() {
            tokio::time::sleep(self.latency).await;
        }
    }
}

#[async_trait]
impl CartService for InMemoryNftService {
    async fn fetch_cart_items(&self) -> Result<Vec<CartItem>> {
        self.respond().await;
        if self.failures.cart.load(Ordering::SeqCst) {
            return Err(CartError::Network("cart request failed".to_string()));
        }
        let items = self.items.read().await;
        debug!(count = items.len(), "Serving cart items");
        Ok(items.clone())
    }
}

#[async_trait]
impl CurrencyService for InMemoryNftService {
    async fn fetch_currencies(&self) -> Result<Vec<Currency>> {
        self.respond().await;
        if self.failures.currencies.load(Ordering::SeqCst) {
            return Err(CartError::Network("currency request failed".to_string()));
        }
        Ok(self.currencies.read().await.clone())
    }
}

#[async_trait]
impl PaymentService for InMemoryNftService {
    async fn submit_payment(&self, currency_id: &str) -> Result<()> {
        self.attempts.fetch_add(1, Ordering::SeqCst);
        self.respond().await;
        if self.failures.payment.load(Ordering::SeqCst) {
            return Err(CartError::Network("payment request failed".to_string()));
        }
        if currency::find(&self.currencies.read().await, currency_id).is_none() {
            return Err(CartError::Network(format!(
                "payment rejected: unknown currency {currency_id}"
            )));
        }
        self.accepted.write().await.push(currency_id.to_string());
        Ok(())
    }
}
