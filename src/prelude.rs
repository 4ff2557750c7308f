//! Convenient imports for common functionality.

pub use crate::bridge::{BridgedFuture, Completion, DriverHandle, Paginator, bridge, pair};
pub use crate::error::SqlBridgeError;
pub use crate::executor::WorkerPool;
pub use crate::mirror::{
    Filter, FilteredMirror, Installer, Mirror, MirrorQuery, ModelOps, Operation,
    OperationRegistry, Surface,
};
pub use crate::results::{DbRow, ResultSet};
pub use crate::session::{AsyncExecutor, BlockingSession, SessionAdapter};
pub use crate::types::RowValues;

#[cfg(feature = "sqlite")]
pub use crate::sqlite::{SqliteOptions, SqlitePrepared, SqliteSession};
