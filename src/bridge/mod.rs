//! Future bridge: converts driver-native completion tokens into awaitables.
//!
//! The bridge is a single-producer/single-consumer promise. [`pair`] creates
//! the two halves; the producing [`Completion`] is handed to whatever thread
//! finishes the work, and the consuming [`BridgedFuture`] is awaited by
//! exactly one task. [`bridge`] wires the pair onto a [`DriverHandle`], the
//! driver's own callback-registration surface.

mod completion;
mod future;
mod paginate;

pub use completion::Completion;
pub use future::{BridgedFuture, pair};
pub use paginate::{PageSink, Paginator};

/// A driver-native completion token for one in-flight operation.
///
/// The handle is created by a blocking submission call and completed exactly
/// once, from a thread the driver owns. Registration hands the driver both
/// the success and failure callback in the form of one [`Completion`]; a
/// handle that completed before registration must fire the completion
/// immediately on registration.
pub trait DriverHandle {
    type Output;

    /// Attach the completion this handle resolves when the operation
    /// finishes.
    fn register(self, completion: Completion<Self::Output>);
}

/// Convert a driver-native handle into a single awaitable value.
///
/// The returned future resolves exactly once, with the value or error of the
/// first completion the driver delivers. Dropping it does not cancel the
/// underlying driver request.
pub fn bridge<H: DriverHandle>(handle: H) -> BridgedFuture<H::Output> {
    let (completion, future) = pair();
    handle.register(completion);
    future
}
