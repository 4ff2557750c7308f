// SQLite reference driver
//
// Split into sub-modules:
// - config: session options and builder
// - params: parameter conversion between bridge and SQLite types
// - query: result extraction and statement execution
// - handle: the driver-native completion token
// - worker: command channel and the dedicated driver thread
// - session: the blocking session surface

pub mod config;
mod handle;
pub mod params;
pub mod query;
mod session;
mod worker;

pub use config::{SqliteOptions, SqliteOptionsBuilder};
pub use handle::SqliteHandle;
pub use query::build_result_set;
pub use session::{SqlitePrepared, SqliteSession};

pub(crate) fn open_connection(
    options: &SqliteOptions,
) -> Result<rusqlite::Connection, crate::error::SqlBridgeError> {
    let conn = if options.is_memory() {
        rusqlite::Connection::open_in_memory()?
    } else {
        rusqlite::Connection::open(&options.db_path)?
    };
    if let Some(millis) = options.busy_timeout_ms {
        conn.busy_timeout(std::time::Duration::from_millis(millis))?;
    }
    Ok(conn)
}
