use tokio::sync::mpsc;
use tracing::warn;

/// A state mutation waiting to run on the update context.
pub type UpdateJob = Box<dyn FnOnce() + Send + 'static>;

/// Network outcome of an asynchronous view-model operation.
///
/// It reports what the service answered, not whether the state update has
/// run: with a queued context the update is only applied once the loop gets
/// to it, and it is skipped if the view-model is dropped in between. Failures
/// are opaque: the error itself is logged where it happens and never
/// interpreted by callers.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Completion {
    Succeeded,
    Failed,
    /// The view-model was already dropped when the answer arrived, so no
    /// update was scheduled.
    Discarded,
}

#[derive(Clone)]
enum Mode {
    Immediate,
    Queued(mpsc::UnboundedSender<UpdateJob>),
}

/// The single place where observable state is allowed to change.
///
/// Network completions call [`UpdateContext::apply`] instead of touching
/// observables directly.
#[derive(Clone)]
pub struct UpdateContext {
    mode: Mode,
}

impl UpdateContext {
    /// Runs updates directly on whichever task completes.
    ///
    /// Suitable for single-threaded hosts and tests.
    pub fn immediate() -> Self {
        Self {
            mode: Mode::Immediate,
        }
    }

    /// Sends updates to an [`UpdateLoop`] that the host drives on its main
    /// context.
    pub fn queued() -> (Self, UpdateLoop) {
        let (sender, receiver) = mpsc::unbounded_channel();
        (
            Self {
                mode: Mode::Queued(sender),
            },
            UpdateLoop { receiver },
        )
    }

    pub fn apply<F>(&self, update: F)
    where
        F: FnOnce() + Send + 'static,
    {
        match &self.mode {
            Mode::Immediate => update(),
            Mode::Queued(sender) => {
                if sender.send(Box::new(update)).is_err() {
                    warn!("Update loop is gone, dropping state update");
                }
            }
        }
    }
}

impl Default for UpdateContext {
    fn default() -> Self {
        Self::immediate()
    }
}

/// Receiving end of a queued [`UpdateContext`].
pub struct UpdateLoop {
    receiver: mpsc::UnboundedReceiver<UpdateJob>,
}

impl UpdateLoop {
    /// Applies updates until every sender has been dropped.
    pub async fn run(mut self) {
        while let Some(update) = self.receiver.recv().await {
            update();
        }
    }

    /// Waits for the next update and applies it. Returns `false` once every
    /// sender has been dropped.
    pub async fn apply_next(&mut self) -> bool {
        match self.receiver.recv().await {
            Some(update) => {
                update();
                true
            }
            None => false,
        }
    }

    /// Applies everything already queued without waiting. Returns how many
    /// updates ran.
    pub fn drain(&mut self) -> usize {
        let mut applied = 0;
        while let Ok(update) = self.receiver.try_recv() {
            update();
            applied += 1;
        }
        applied
    }
}
