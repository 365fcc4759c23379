//! Application layer: the screen view-models and the update context their
//! asynchronous completions are applied on.
//!
//! Every operation that talks to the network spawns a `tokio` task and
//! returns its `JoinHandle<Completion>`. The UI may await the handle to learn
//! whether a retry should be offered, or drop it and rely on the observables.
//! Completions carry the network result; the observables are the source of
//! truth for what has actually been applied.

pub mod cart;
pub mod context;
mod loading;
pub mod payment;

pub use cart::CartViewModel;
pub use context::{Completion, UpdateContext, UpdateLoop};
pub use payment::PaymentViewModel;
