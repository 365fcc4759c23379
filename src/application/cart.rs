use super::context::{Completion, UpdateContext};
use super::loading::LoadingFlag;
use crate::domain::cart::{self, CartItem, Price};
use crate::domain::ports::CartServiceArc;
use crate::error::Result;
use crate::observable::Observable;
use std::sync::Arc;
use tokio::task::JoinHandle;
use tracing::{debug, warn};

struct CartState {
    items: Observable<Vec<CartItem>>,
    loading: LoadingFlag,
}

/// State and rules of the cart screen.
///
/// Item count and total price are derived from `items` on every call and are
/// never stored, so they cannot drift from the list the UI is showing.
pub struct CartViewModel {
    state: Arc<CartState>,
    service: CartServiceArc,
    context: UpdateContext,
}

impl CartViewModel {
    pub fn new(service: CartServiceArc, context: UpdateContext) -> Self {
        Self {
            state: Arc::new(CartState {
                items: Observable::new(Vec::new()),
                loading: LoadingFlag::new(),
            }),
            service,
            context,
        }
    }

    pub fn items(&self) -> &Observable<Vec<CartItem>> {
        &self.state.items
    }

    pub fn is_loading(&self) -> &Observable<bool> {
        self.state.loading.observable()
    }

    /// Fetches the cart and replaces `items` with the result.
    ///
    /// On failure `items` keeps its previous value. `is_loading` is true until
    /// the result of every overlapping load has been applied. Must be called
    /// inside a tokio runtime.
    pub fn on_screen_load(&self) -> JoinHandle<Completion> {
        self.state.loading.begin();

        let service = Arc::clone(&self.service);
        let context = self.context.clone();
        let state = Arc::downgrade(&self.state);

        tokio::spawn(async move {
            let result = service.fetch_cart_items().await;
            let completion = if result.is_ok() {
                Completion::Succeeded
            } else {
                Completion::Failed
            };

            if state.strong_count() == 0 {
                debug!("Cart screen closed before load completed");
                return Completion::Discarded;
            }

            context.apply(move || {
                let Some(state) = state.upgrade() else {
                    return;
                };
                match result {
                    Ok(items) => {
                        debug!(count = items.len(), "Cart loaded");
                        state.items.set(items);
                    }
                    Err(e) => warn!(error = %e, "Failed to load cart"),
                }
                state.loading.finish();
            });

            completion
        })
    }

    /// Removes every entry with the given id and republishes the list.
    ///
    /// Returns `false`, without notifying, when no entry matched.
    pub fn remove_item(&self, id: &str) -> bool {
        let present = self
            .state
            .items
            .with(|items| items.iter().any(|item| item.id == id));
        if !present {
            return false;
        }

        self.state
            .items
            .update(|items| items.retain(|item| item.id != id));
        debug!(id, "Removed item from cart");
        true
    }

    /// Removes the entry at `index`, if there is one.
    pub fn remove_at(&self, index: usize) -> Option<CartItem> {
        if index >= self.count() {
            return None;
        }

        let mut removed = None;
        self.state.items.update(|items| {
            if index < items.len() {
                removed = Some(items.remove(index));
            }
        });
        removed
    }

    pub fn count(&self) -> usize {
        self.state.items.with(Vec::len)
    }

    /// Fails only if the sum does not fit in a `Decimal`.
    pub fn total_price(&self) -> Result<Price> {
        self.state.items.with(|items| cart::total_price(items))
    }
}
