use std::sync::{Arc, Mutex};

use tracing::debug;

use crate::bridge::{Completion, DriverHandle};
use crate::error::SqlBridgeError;
use crate::results::ResultSet;

type Outcome = Result<ResultSet, SqlBridgeError>;

enum Slot {
    /// Neither completed nor registered yet.
    Pending,
    /// Completed before a completion was registered; outcome is buffered.
    Ready(Outcome),
    /// Registered before completion; fires when the driver finishes.
    Registered(Completion<ResultSet>),
    /// Outcome already handed to a completion.
    Finished,
}

/// Completion token for one in-flight `SQLite` statement.
///
/// Created by the submission call, completed exactly once by the driver
/// thread. Completion and registration can happen in either order: an
/// outcome that arrives first is buffered and delivered at registration.
pub struct SqliteHandle {
    slot: Arc<Mutex<Slot>>,
}

/// Driver-side writer for a [`SqliteHandle`].
pub(crate) struct HandleCompleter {
    slot: Arc<Mutex<Slot>>,
}

impl SqliteHandle {
    pub(crate) fn new() -> (SqliteHandle, HandleCompleter) {
        let slot = Arc::new(Mutex::new(Slot::Pending));
        (
            SqliteHandle {
                slot: Arc::clone(&slot),
            },
            HandleCompleter { slot },
        )
    }
}

impl DriverHandle for SqliteHandle {
    type Output = ResultSet;

    fn register(self, completion: Completion<ResultSet>) {
        let mut slot = match self.slot.lock() {
            Ok(guard) => guard,
            Err(poisoned) => poisoned.into_inner(),
        };
        match std::mem::replace(&mut *slot, Slot::Finished) {
            Slot::Ready(outcome) => completion.resolve(outcome),
            Slot::Pending => *slot = Slot::Registered(completion),
            Slot::Registered(_) | Slot::Finished => {
                debug!("sqlite handle registered more than once, registration dropped");
            }
        }
    }
}

impl HandleCompleter {
    /// Deliver the statement outcome. Only the first delivery is honored.
    pub(crate) fn complete(self, outcome: Outcome) {
        let mut slot = match self.slot.lock() {
            Ok(guard) => guard,
            Err(poisoned) => poisoned.into_inner(),
        };
        match std::mem::replace(&mut *slot, Slot::Finished) {
            Slot::Registered(completion) => completion.resolve(outcome),
            Slot::Pending => *slot = Slot::Ready(outcome),
            Slot::Ready(previous) => {
                *slot = Slot::Ready(previous);
                debug!("duplicate sqlite completion dropped");
            }
            Slot::Finished => debug!("duplicate sqlite completion dropped"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::bridge::pair;

    fn runtime() -> tokio::runtime::Runtime {
        tokio::runtime::Builder::new_current_thread()
            .build()
            .expect("runtime")
    }

    #[test]
    fn completion_before_registration_is_buffered() {
        let (handle, completer) = SqliteHandle::new();
        completer.complete(Ok(ResultSet::from_rows_affected(3)));

        let (completion, future) = pair();
        handle.register(completion);

        let result = runtime().block_on(future).expect("buffered outcome");
        assert_eq!(result.rows_affected, 3);
    }

    #[test]
    fn registration_before_completion_fires_on_complete() {
        let (handle, completer) = SqliteHandle::new();
        let (completion, future) = pair();
        handle.register(completion);

        completer.complete(Err(SqlBridgeError::ExecutionError("boom".into())));

        let err = runtime().block_on(future).expect_err("buffered error");
        assert!(matches!(err, SqlBridgeError::ExecutionError(msg) if msg == "boom"));
    }
}
