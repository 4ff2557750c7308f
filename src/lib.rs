//! Bridge blocking SQL driver sessions onto tokio.
//!
//! Three layers, leaves first:
//!
//! - [`bridge`] converts a driver-native completion token into a single
//!   awaitable value, crossing the thread boundary exactly once.
//! - [`session`] wraps a blocking driver session so every execution entry
//!   point returns a bridged awaitable instead of blocking the scheduler.
//! - [`mirror`] installs non-blocking mirror operations onto declarative
//!   model types by dispatching the original blocking operations to a
//!   bounded worker pool.
//!
//! The scheduler is always injected explicitly (a `tokio::runtime::Handle`
//! at pool construction); nothing in this crate discovers an ambient
//! runtime. Cancelling an awaiting task never cancels the in-flight driver
//! request — the driver exposes no cancellation to bridge against, so the
//! result is simply discarded when it arrives.

pub mod bridge;
pub mod error;
pub mod executor;
pub mod mirror;
pub mod prelude;
pub mod results;
pub mod session;
pub mod types;

#[cfg(feature = "sqlite")]
pub mod sqlite;

pub use bridge::{BridgedFuture, Completion, DriverHandle, PageSink, Paginator};
pub use error::SqlBridgeError;
pub use executor::WorkerPool;
pub use mirror::{Filter, Installer, Mirror, MirrorQuery, ModelOps, Operation, OperationRegistry};
pub use results::{DbRow, ResultSet};
pub use session::{AsyncExecutor, BlockingSession, SessionAdapter};
pub use types::RowValues;
