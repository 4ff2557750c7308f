use std::sync::{Arc, Mutex};

use tokio::sync::oneshot;
use tracing::debug;

use crate::error::SqlBridgeError;

type Outcome<T> = Result<T, SqlBridgeError>;
type Slot<T> = Arc<Mutex<Option<oneshot::Sender<Outcome<T>>>>>;

/// Producer half of a bridged future.
///
/// Cloneable so a driver can hand the same completion to both its success
/// and failure callbacks; whichever fires first wins, and every later
/// resolution attempt is dropped. Resolution is safe from any thread: the
/// underlying oneshot send wakes the awaiting task on its own scheduler,
/// so scheduler-owned state is never touched from a foreign thread.
pub struct Completion<T> {
    slot: Slot<T>,
}

impl<T> Clone for Completion<T> {
    fn clone(&self) -> Self {
        Self {
            slot: Arc::clone(&self.slot),
        }
    }
}

impl<T> Completion<T> {
    pub(crate) fn new(sender: oneshot::Sender<Outcome<T>>) -> Self {
        Self {
            slot: Arc::new(Mutex::new(Some(sender))),
        }
    }

    /// Resolve with a success value.
    pub fn succeed(&self, value: T) {
        self.resolve(Ok(value));
    }

    /// Resolve with an error. The error reaches the awaiting task unmodified.
    pub fn fail(&self, error: SqlBridgeError) {
        self.resolve(Err(error));
    }

    /// Deliver an outcome. Only the first resolution is honored.
    pub fn resolve(&self, outcome: Outcome<T>) {
        let sender = match self.slot.lock() {
            Ok(mut guard) => guard.take(),
            Err(poisoned) => poisoned.into_inner().take(),
        };
        match sender {
            Some(sender) => {
                if sender.send(outcome).is_err() {
                    // The awaiting task was cancelled; the result has nowhere to go.
                    debug!("bridged future dropped before completion, result discarded");
                }
            }
            None => debug!("duplicate completion dropped"),
        }
    }

    /// Whether a resolution has already been delivered.
    #[must_use]
    pub fn is_resolved(&self) -> bool {
        match self.slot.lock() {
            Ok(guard) => guard.is_none(),
            Err(poisoned) => poisoned.into_inner().is_none(),
        }
    }
}
