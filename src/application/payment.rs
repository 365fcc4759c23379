use super::context::{Completion, UpdateContext};
use super::loading::LoadingFlag;
use crate::domain::currency::{self, Currency};
use crate::domain::payment::PaymentStatus;
use crate::domain::ports::{CurrencyServiceArc, PaymentServiceArc};
use crate::observable::Observable;
use parking_lot::Mutex;
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};
use tokio::task::JoinHandle;
use tracing::{debug, info, warn};

struct PaymentState {
    currencies: Observable<Vec<Currency>>,
    loading: LoadingFlag,
    payment_status: Observable<PaymentStatus>,
    selected_currency_id: Mutex<Option<String>>,
    submitting: AtomicBool,
}

/// State and rules of the payment screen.
///
/// `payment_status` only ever moves from `NotPaid` to `Paid`. A failed payment
/// clears the selected currency, so the user has to pick one again before
/// retrying.
pub struct PaymentViewModel {
    state: Arc<PaymentState>,
    currency_service: CurrencyServiceArc,
    payment_service: PaymentServiceArc,
    context: UpdateContext,
}

impl PaymentViewModel {
    pub fn new(
        currency_service: CurrencyServiceArc,
        payment_service: PaymentServiceArc,
        context: UpdateContext,
    ) -> Self {
        Self {
            state: Arc::new(PaymentState {
                currencies: Observable::new(Vec::new()),
                loading: LoadingFlag::new(),
                payment_status: Observable::new(PaymentStatus::NotPaid),
                selected_currency_id: Mutex::new(None),
                submitting: AtomicBool::new(false),
            }),
            currency_service,
            payment_service,
            context,
        }
    }

    pub fn currencies(&self) -> &Observable<Vec<Currency>> {
        &self.state.currencies
    }

    pub fn is_loading(&self) -> &Observable<bool> {
        self.state.loading.observable()
    }

    pub fn payment_status(&self) -> &Observable<PaymentStatus> {
        &self.state.payment_status
    }

    pub fn selected_currency_id(&self) -> Option<String> {
        self.state.selected_currency_id.lock().clone()
    }

    /// Loads the accepted currencies.
    ///
    /// `is_loading` stays true until the result of every overlapping request
    /// has been applied. On failure the previous list is kept and the caller
    /// can simply call this again.
    pub fn on_screen_appear(&self) -> JoinHandle<Completion> {
        self.state.loading.begin();

        let service = Arc::clone(&self.currency_service);
        let context = self.context.clone();
        let state = Arc::downgrade(&self.state);

        tokio::spawn(async move {
            let result = service.fetch_currencies().await;
            let completion = if result.is_ok() {
                Completion::Succeeded
            } else {
                Completion::Failed
            };

            if state.strong_count() == 0 {
                debug!("Payment screen closed before currencies arrived");
                return Completion::Discarded;
            }

            context.apply(move || {
                let Some(state) = state.upgrade() else {
                    return;
                };
                match result {
                    Ok(currencies) => {
                        debug!(count = currencies.len(), "Currencies loaded");
                        state.currencies.set(currencies);
                    }
                    Err(e) => warn!(error = %e, "Failed to load currencies"),
                }
                state.loading.finish();
            });

            completion
        })
    }

    /// Selects the currency to pay with. Unknown ids leave the selection as
    /// it was. Returns whether `id` is now selected.
    pub fn select_currency(&self, id: &str) -> bool {
        let known = self
            .state
            .currencies
            .with(|currencies| currency::find(currencies, id).is_some());
        if known {
            *self.state.selected_currency_id.lock() = Some(id.to_string());
            debug!(currency = id, "Currency selected");
        } else {
            debug!(currency = id, "Ignoring selection of unknown currency");
        }
        known
    }

    /// Pays with the selected currency.
    ///
    /// Returns `None` without touching any state when no currency is selected,
    /// when a submission is already in flight, or when the order is already
    /// paid.
    pub fn submit_payment(&self) -> Option<JoinHandle<Completion>> {
        let Some(currency_id) = self.selected_currency_id() else {
            debug!("No currency selected, payment not submitted");
            return None;
        };
        if self.state.payment_status.get().is_paid() {
            debug!("Order already paid");
            return None;
        }
        if self.state.submitting.swap(true, Ordering::AcqRel) {
            debug!("Payment already in flight");
            return None;
        }

        self.state.loading.begin();

        let service = Arc::clone(&self.payment_service);
        let context = self.context.clone();
        let state = Arc::downgrade(&self.state);

        Some(tokio::spawn(async move {
            let result = service.submit_payment(&currency_id).await;
            let completion = if result.is_ok() {
                Completion::Succeeded
            } else {
                Completion::Failed
            };

            if state.strong_count() == 0 {
                debug!("Payment screen closed before payment completed");
                return Completion::Discarded;
            }

            context.apply(move || {
                let Some(state) = state.upgrade() else {
                    return;
                };
                state.submitting.store(false, Ordering::Release);
                match result {
                    Ok(()) => {
                        info!(currency = %currency_id, "Payment accepted");
                        state.loading.finish_quietly();
                        state.payment_status.set(PaymentStatus::Paid);
                    }
                    Err(e) => {
                        warn!(currency = %currency_id, error = %e, "Payment failed");
                        *state.selected_currency_id.lock() = None;
                        state.loading.finish();
                        state.payment_status.set(PaymentStatus::NotPaid);
                    }
                }
            });

            completion
        }))
    }
}
