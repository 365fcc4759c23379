mod common;

use async_trait::async_trait;
use common::{currencies, item};
use nftcart::application::{CartViewModel, Completion, PaymentViewModel, UpdateContext};
use nftcart::domain::cart::CartItem;
use nftcart::domain::currency::Currency;
use nftcart::domain::ports::{CartService, CurrencyService, PaymentService};
use nftcart::error::{CartError, Result};
use parking_lot::Mutex;
use rust_decimal_macros::dec;
use std::collections::VecDeque;
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};
use tokio::sync::oneshot;
use tokio::task::JoinHandle;

/// Holds each request until the test opens the gate queued for it.
/// Requests with no gate queued answer right away.
#[derive(Default)]
struct GatedBackend {
    cart_gates: Mutex<VecDeque<oneshot::Receiver<()>>>,
    currency_gates: Mutex<VecDeque<oneshot::Receiver<()>>>,
    reject_payments: AtomicBool,
}

impl GatedBackend {
    fn gate(queue: &Mutex<VecDeque<oneshot::Receiver<()>>>) -> oneshot::Sender<()> {
        let (open, gate) = oneshot::channel();
        queue.lock().push_back(gate);
        open
    }

    async fn pass(queue: &Mutex<VecDeque<oneshot::Receiver<()>>>) {
        let gate = queue.lock().pop_front();
        if let Some(gate) = gate {
            let _ = gate.await;
        }
    }
}

#[async_trait]
impl CartService for GatedBackend {
    async fn fetch_cart_items(&self) -> Result<Vec<CartItem>> {
        Self::pass(&self.cart_gates).await;
        Ok(vec![item("1", dec!(2.5))])
    }
}

#[async_trait]
impl CurrencyService for GatedBackend {
    async fn fetch_currencies(&self) -> Result<Vec<Currency>> {
        Self::pass(&self.currency_gates).await;
        Ok(currencies())
    }
}

#[async_trait]
impl PaymentService for GatedBackend {
    async fn submit_payment(&self, _currency_id: &str) -> Result<()> {
        if self.reject_payments.load(Ordering::SeqCst) {
            Err(CartError::Network("declined".to_string()))
        } else {
            Ok(())
        }
    }
}

async fn until_either_finished<T>(a: &JoinHandle<T>, b: &JoinHandle<T>) {
    while !a.is_finished() && !b.is_finished() {
        tokio::task::yield_now().await;
    }
}

fn payment_view_model(backend: &Arc<GatedBackend>) -> PaymentViewModel {
    PaymentViewModel::new(backend.clone(), backend.clone(), UpdateContext::immediate())
}

#[tokio::test]
async fn test_overlapping_currency_loads_keep_loading_until_both_finish() {
    let backend = Arc::new(GatedBackend::default());
    let vm = payment_view_model(&backend);
    let first_gate = GatedBackend::gate(&backend.currency_gates);
    let second_gate = GatedBackend::gate(&backend.currency_gates);

    let first = vm.on_screen_appear();
    let second = vm.on_screen_appear();
    assert!(vm.is_loading().get());

    first_gate.send(()).unwrap();
    until_either_finished(&first, &second).await;
    assert!(vm.is_loading().get(), "one load is still in flight");

    second_gate.send(()).unwrap();
    assert_eq!(first.await.unwrap(), Completion::Succeeded);
    assert_eq!(second.await.unwrap(), Completion::Succeeded);
    assert!(!vm.is_loading().get());
    assert_eq!(vm.currencies().get().len(), 2);
}

#[tokio::test]
async fn test_overlapping_cart_loads_keep_loading_until_both_finish() {
    let backend = Arc::new(GatedBackend::default());
    let vm = CartViewModel::new(backend.clone(), UpdateContext::immediate());
    let first_gate = GatedBackend::gate(&backend.cart_gates);
    let second_gate = GatedBackend::gate(&backend.cart_gates);

    let first = vm.on_screen_load();
    let second = vm.on_screen_load();

    first_gate.send(()).unwrap();
    until_either_finished(&first, &second).await;
    assert!(vm.is_loading().get(), "one load is still in flight");
    assert_eq!(vm.count(), 1);

    second_gate.send(()).unwrap();
    first.await.unwrap();
    second.await.unwrap();
    assert!(!vm.is_loading().get());
}

#[tokio::test]
async fn test_failed_payment_does_not_clear_loading_of_pending_reload() {
    let backend = Arc::new(GatedBackend::default());
    backend.reject_payments.store(true, Ordering::SeqCst);
    let vm = payment_view_model(&backend);
    vm.on_screen_appear().await.unwrap();
    assert!(vm.select_currency("eth"));

    let reload_gate = GatedBackend::gate(&backend.currency_gates);
    let reload = vm.on_screen_appear();
    let payment = vm.submit_payment().unwrap();

    assert_eq!(payment.await.unwrap(), Completion::Failed);
    assert!(vm.is_loading().get(), "currency reload is still in flight");

    reload_gate.send(()).unwrap();
    assert_eq!(reload.await.unwrap(), Completion::Succeeded);
    assert!(!vm.is_loading().get());
}
