use std::future::Future;
use std::pin::Pin;
use std::task::{Context, Poll};

use tokio::sync::oneshot;

use crate::error::SqlBridgeError;

use super::completion::Completion;

/// Consumer half of a bridged operation: a single awaitable value.
///
/// Resolves exactly once with whatever the producing [`Completion`]
/// delivered first. Dropping the future abandons the wait but does not
/// cancel the in-flight driver request or worker-pool job; the producer
/// notices the closed channel and discards the result.
#[derive(Debug)]
pub struct BridgedFuture<T> {
    receiver: oneshot::Receiver<Result<T, SqlBridgeError>>,
}

impl<T> Future for BridgedFuture<T> {
    type Output = Result<T, SqlBridgeError>;

    fn poll(mut self: Pin<&mut Self>, cx: &mut Context<'_>) -> Poll<Self::Output> {
        match Pin::new(&mut self.receiver).poll(cx) {
            Poll::Ready(Ok(outcome)) => Poll::Ready(outcome),
            Poll::Ready(Err(_)) => Poll::Ready(Err(SqlBridgeError::ConnectionError(
                "completion dropped before resolving".into(),
            ))),
            Poll::Pending => Poll::Pending,
        }
    }
}

/// Create a linked producer/consumer pair.
///
/// The completion may be resolved from any thread; the future must be
/// awaited by exactly one task.
#[must_use]
pub fn pair<T>() -> (Completion<T>, BridgedFuture<T>) {
    let (sender, receiver) = oneshot::channel();
    (Completion::new(sender), BridgedFuture { receiver })
}
