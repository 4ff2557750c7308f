use std::sync::Arc;
use std::sync::atomic::{AtomicBool, AtomicU64, Ordering};
use std::sync::mpsc::{self, Sender};
use std::thread;

use crate::bridge::PageSink;
use crate::error::SqlBridgeError;
use crate::results::ResultSet;
use crate::session::BlockingSession;
use crate::types::RowValues;

use super::config::SqliteOptions;
use super::handle::SqliteHandle;
use super::open_connection;
use super::params::convert_params;
use super::worker::channel::Command;
use super::worker::dispatcher::run_driver;

static SESSION_ID: AtomicU64 = AtomicU64::new(0);

/// A prepared statement, validated by the driver and executable by text
/// through the driver's statement cache.
#[derive(Debug, Clone)]
pub struct SqlitePrepared {
    query: Arc<String>,
}

impl SqlitePrepared {
    #[must_use]
    pub fn query(&self) -> &str {
        &self.query
    }
}

/// Blocking `SQLite` session backed by a dedicated driver thread.
///
/// The thread owns the only connection; callers talk to it over a command
/// channel. Blocking calls wait on a per-call response channel; bridged
/// calls receive a [`SqliteHandle`] completed from the driver thread.
pub struct SqliteSession {
    sender: Sender<Command>,
    closed: AtomicBool,
}

impl SqliteSession {
    /// Open a session. The connection is opened on the driver thread so
    /// `:memory:` databases live and die with it.
    ///
    /// # Errors
    ///
    /// Returns `ConnectionError` if the thread cannot be spawned or the
    /// database cannot be opened.
    pub fn connect(options: SqliteOptions) -> Result<Self, SqlBridgeError> {
        let (sender, receiver) = mpsc::channel::<Command>();
        let (ready_tx, ready_rx) = mpsc::channel::<Result<(), SqlBridgeError>>();
        let session_id = SESSION_ID.fetch_add(1, Ordering::Relaxed);

        thread::Builder::new()
            .name(format!("sqlite-driver-{session_id}"))
            .spawn(move || {
                let conn = match open_connection(&options) {
                    Ok(conn) => {
                        let _ = ready_tx.send(Ok(()));
                        conn
                    }
                    Err(err) => {
                        let _ = ready_tx.send(Err(err));
                        return;
                    }
                };
                run_driver(conn, &receiver);
            })
            .map_err(|err| {
                SqlBridgeError::ConnectionError(format!(
                    "failed to spawn sqlite driver thread: {err}"
                ))
            })?;

        ready_rx.recv().map_err(|_| {
            SqlBridgeError::ConnectionError("sqlite driver thread exited during open".into())
        })??;

        Ok(Self {
            sender,
            closed: AtomicBool::new(false),
        })
    }

    /// Close the session. In-flight commands still run; later submissions
    /// fail synchronously.
    pub fn close(&self) {
        if !self.closed.swap(true, Ordering::SeqCst) {
            let _ = self.sender.send(Command::Shutdown);
        }
    }

    #[must_use]
    pub fn is_closed(&self) -> bool {
        self.closed.load(Ordering::SeqCst)
    }

    fn submit(&self, command: Command) -> Result<(), SqlBridgeError> {
        if self.is_closed() {
            return Err(SqlBridgeError::SubmissionError("session is closed".into()));
        }
        self.sender
            .send(command)
            .map_err(|_| SqlBridgeError::SubmissionError("session is closed".into()))
    }

    /// Pre-submission statement validation; failures here never reach the
    /// driver thread.
    fn validate_statement(query: &str) -> Result<(), SqlBridgeError> {
        if query.trim().is_empty() {
            return Err(SqlBridgeError::SubmissionError(
                "statement is empty".into(),
            ));
        }
        Ok(())
    }
}

impl Drop for SqliteSession {
    fn drop(&mut self) {
        self.close();
    }
}

impl BlockingSession for SqliteSession {
    type Handle = SqliteHandle;
    type Prepared = SqlitePrepared;

    fn execute(&self, query: &str, params: &[RowValues]) -> Result<ResultSet, SqlBridgeError> {
        Self::validate_statement(query)?;
        let (respond_to, response) = mpsc::channel();
        self.submit(Command::ExecuteBlocking {
            query: query.to_owned(),
            params: convert_params(params),
            respond_to,
        })?;
        response.recv().map_err(|_| {
            SqlBridgeError::ConnectionError("sqlite driver thread terminated".into())
        })?
    }

    fn execute_batch(&self, query: &str) -> Result<(), SqlBridgeError> {
        Self::validate_statement(query)?;
        let (respond_to, response) = mpsc::channel();
        self.submit(Command::ExecuteBatch {
            query: query.to_owned(),
            respond_to,
        })?;
        response.recv().map_err(|_| {
            SqlBridgeError::ConnectionError("sqlite driver thread terminated".into())
        })?
    }

    fn execute_handle(
        &self,
        query: &str,
        params: &[RowValues],
    ) -> Result<Self::Handle, SqlBridgeError> {
        Self::validate_statement(query)?;
        let (handle, completer) = SqliteHandle::new();
        self.submit(Command::Execute {
            query: query.to_owned(),
            params: convert_params(params),
            completer,
        })?;
        Ok(handle)
    }

    fn prepare(&self, query: &str) -> Result<Self::Prepared, SqlBridgeError> {
        Self::validate_statement(query)?;
        let query = Arc::new(query.to_owned());
        let (respond_to, response) = mpsc::channel();
        self.submit(Command::Prepare {
            query: Arc::clone(&query),
            respond_to,
        })?;
        response
            .recv()
            .map_err(|_| {
                SqlBridgeError::ConnectionError("sqlite driver thread terminated".into())
            })??;
        Ok(SqlitePrepared { query })
    }

    fn execute_prepared_handle(
        &self,
        prepared: &Self::Prepared,
        params: &[RowValues],
    ) -> Result<Self::Handle, SqlBridgeError> {
        let (handle, completer) = SqliteHandle::new();
        self.submit(Command::ExecutePrepared {
            query: Arc::clone(&prepared.query),
            params: convert_params(params),
            completer,
        })?;
        Ok(handle)
    }

    fn execute_paged(
        &self,
        query: &str,
        params: &[RowValues],
        page_size: usize,
        sink: PageSink,
    ) -> Result<(), SqlBridgeError> {
        Self::validate_statement(query)?;
        self.submit(Command::ExecutePaged {
            query: query.to_owned(),
            params: convert_params(params),
            page_size,
            sink,
        })
    }
}
