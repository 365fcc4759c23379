//! A single-value reactive cell.
//!
//! `Observable<T>` holds one value and an ordered list of subscribers. Every
//! write is delivered to every subscriber, in registration order, including
//! writes of a value equal to the previous one.
//!
//! Writes issued while a notification pass is already running (from inside a
//! subscriber, or from another thread) are queued: the value is stored right
//! away, and its notification pass runs after the current one completes. The
//! first call a new subscriber receives goes through the same queue, so a
//! write made during that call still reaches it. No callback is ever invoked
//! while the internal lock is held.

use parking_lot::Mutex;
use std::collections::VecDeque;
use std::fmt;
use std::sync::Arc;

type Callback<T> = Arc<dyn Fn(&T) + Send + Sync>;

/// Handle returned by [`Observable::subscribe`], used to unsubscribe.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct SubscriptionId(u64);

struct Subscriber<T> {
    id: SubscriptionId,
    callback: Callback<T>,
    /// Number of writes made before this subscriber registered.
    since: u64,
}

enum Delivery<T> {
    /// Write number `seq`, for everyone registered before it.
    Write { seq: u64, value: T },
    /// First call of a single subscriber.
    Initial { id: SubscriptionId, value: T },
}

struct State<T> {
    value: T,
    subscribers: Vec<Subscriber<T>>,
    next_id: u64,
    writes: u64,
    notifying: bool,
    pending: VecDeque<Delivery<T>>,
}

impl<T: Clone> State<T> {
    /// Queues a write of the current value. Returns whether the caller has
    /// to run the notification pass.
    fn push_write(&mut self) -> bool {
        self.writes += 1;
        let delivery = Delivery::Write {
            seq: self.writes,
            value: self.value.clone(),
        };
        self.pending.push_back(delivery);
        !std::mem::replace(&mut self.notifying, true)
    }

    fn next_delivery(&mut self) -> Option<(T, Vec<Callback<T>>)> {
        let delivery = self.pending.pop_front()?;
        Some(match delivery {
            Delivery::Write { seq, value } => {
                let callbacks = self
                    .subscribers
                    .iter()
                    .filter(|s| s.since < seq)
                    .map(|s| Arc::clone(&s.callback))
                    .collect();
                (value, callbacks)
            }
            Delivery::Initial { id, value } => {
                let callbacks = self
                    .subscribers
                    .iter()
                    .filter(|s| s.id == id)
                    .map(|s| Arc::clone(&s.callback))
                    .collect();
                (value, callbacks)
            }
        })
    }
}

/// Resets the notifying flag if a subscriber panics mid-pass, so later writes
/// start a fresh pass instead of queueing forever. Deliveries still pending
/// go out with the next write.
struct FlushGuard<'a, T> {
    state: &'a Mutex<State<T>>,
}

impl<T> Drop for FlushGuard<'_, T> {
    fn drop(&mut self) {
        if std::thread::panicking() {
            self.state.lock().notifying = false;
        }
    }
}

/// Shared reactive value. Cloning yields another handle to the same cell.
pub struct Observable<T> {
    state: Arc<Mutex<State<T>>>,
}

impl<T> Clone for Observable<T> {
    fn clone(&self) -> Self {
        Self {
            state: Arc::clone(&self.state),
        }
    }
}

impl<T: Clone> Observable<T> {
    pub fn new(value: T) -> Self {
        Self {
            state: Arc::new(Mutex::new(State {
                value,
                subscribers: Vec::new(),
                next_id: 0,
                writes: 0,
                notifying: false,
                pending: VecDeque::new(),
            })),
        }
    }

    /// Returns a copy of the current value.
    pub fn get(&self) -> T {
        self.state.lock().value.clone()
    }

    /// Borrows the current value without cloning it.
    ///
    /// `f` runs under the cell's lock and must not write to this observable.
    pub fn with<R>(&self, f: impl FnOnce(&T) -> R) -> R {
        let state = self.state.lock();
        f(&state.value)
    }

    /// Replaces the value and notifies every subscriber with it.
    pub fn set(&self, value: T) {
        let start = {
            let mut state = self.state.lock();
            state.value = value;
            state.push_write()
        };
        if start {
            self.flush();
        }
    }

    /// Mutates the value in place, then notifies like [`Observable::set`].
    pub fn update(&self, f: impl FnOnce(&mut T)) {
        let start = {
            let mut state = self.state.lock();
            f(&mut state.value);
            state.push_write()
        };
        if start {
            self.flush();
        }
    }

    /// Registers `callback` and gives it the current value.
    ///
    /// Outside a notification pass the first call happens before this
    /// returns. Inside one (a subscriber subscribing), it runs right after the
    /// pass. Either way the callback then receives every later write.
    pub fn subscribe<F>(&self, callback: F) -> SubscriptionId
    where
        F: Fn(&T) + Send + Sync + 'static,
    {
        let (id, start) = {
            let mut state = self.state.lock();
            let id = SubscriptionId(state.next_id);
            state.next_id += 1;
            let since = state.writes;
            state.subscribers.push(Subscriber {
                id,
                callback: Arc::new(callback),
                since,
            });
            let value = state.value.clone();
            state.pending.push_back(Delivery::Initial { id, value });
            (id, !std::mem::replace(&mut state.notifying, true))
        };
        if start {
            self.flush();
        }
        id
    }

    /// Removes a subscriber. Returns `false` if it was already gone.
    ///
    /// A pass that is already running still reaches the removed subscriber.
    pub fn unsubscribe(&self, id: SubscriptionId) -> bool {
        let mut state = self.state.lock();
        let before = state.subscribers.len();
        state.subscribers.retain(|s| s.id != id);
        state.subscribers.len() != before
    }

    pub fn subscriber_count(&self) -> usize {
        self.state.lock().subscribers.len()
    }

    fn flush(&self) {
        let _guard = FlushGuard { state: &self.state };
        loop {
            let next = {
                let mut state = self.state.lock();
                let next = state.next_delivery();
                if next.is_none() {
                    state.notifying = false;
                }
                next
            };
            let Some((value, callbacks)) = next else {
                return;
            };

            for callback in &callbacks {
                callback(&value);
            }
        }
    }
}

impl<T: Clone + Default> Default for Observable<T> {
    fn default() -> Self {
        Self::new(T::default())
    }
}

impl<T: fmt::Debug> fmt::Debug for Observable<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let state = self.state.lock();
        f.debug_struct("Observable")
            .field("value", &state.value)
            .field("subscribers", &state.subscribers.len())
            .finish()
    }
}
