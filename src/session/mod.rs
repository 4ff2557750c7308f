//! Session adapter: the bridged entry points over a blocking driver session.

use std::ops::Deref;
use std::sync::Arc;

use async_trait::async_trait;

use crate::bridge::{BridgedFuture, DriverHandle, PageSink, Paginator, bridge};
use crate::error::SqlBridgeError;
use crate::executor::WorkerPool;
use crate::results::ResultSet;
use crate::types::RowValues;

/// Channel depth for paged queries; the driver stays at most this many
/// pages ahead of the consumer.
const PAGE_CHANNEL_DEPTH: usize = 2;

/// The narrow interface this crate consumes from a blocking driver session.
///
/// Everything else the driver does (connection management, retries, wire
/// protocol) stays behind this trait. Submission failures are returned
/// synchronously from every method; I/O failures travel through the handle
/// or sink.
pub trait BlockingSession: Send + Sync + 'static {
    /// Completion token for one in-flight statement.
    type Handle: DriverHandle<Output = ResultSet> + Send + 'static;
    /// Driver-native prepared statement.
    type Prepared: Send + 'static;

    /// Execute a statement and block until the result is available.
    fn execute(&self, query: &str, params: &[RowValues]) -> Result<ResultSet, SqlBridgeError>;

    /// Run a batch of statements (DDL or seed data) transactionally.
    fn execute_batch(&self, query: &str) -> Result<(), SqlBridgeError>;

    /// Submit a statement; completion is delivered through the returned
    /// handle from a driver-owned thread.
    fn execute_handle(
        &self,
        query: &str,
        params: &[RowValues],
    ) -> Result<Self::Handle, SqlBridgeError>;

    /// Prepare a statement, blocking until the driver has validated it.
    fn prepare(&self, query: &str) -> Result<Self::Prepared, SqlBridgeError>;

    /// Submit a prepared statement for execution.
    fn execute_prepared_handle(
        &self,
        prepared: &Self::Prepared,
        params: &[RowValues],
    ) -> Result<Self::Handle, SqlBridgeError>;

    /// Begin a paged execution. Pages are delivered to `sink` from a
    /// driver-owned thread until the statement is exhausted or the sink
    /// reports the consumer has gone away.
    fn execute_paged(
        &self,
        query: &str,
        params: &[RowValues],
        page_size: usize,
        sink: PageSink,
    ) -> Result<(), SqlBridgeError>;
}

/// Wraps a blocking session with bridged, non-blocking entry points.
///
/// The adapter holds a non-owning reference to the session (it never shuts
/// the session down) and the worker pool used for operations that have no
/// driver-native handle. Every synchronous session method remains reachable
/// through `Deref`, unmodified.
pub struct SessionAdapter<S: BlockingSession> {
    session: Arc<S>,
    pool: Arc<WorkerPool>,
}

impl<S: BlockingSession> Clone for SessionAdapter<S> {
    fn clone(&self) -> Self {
        Self {
            session: Arc::clone(&self.session),
            pool: Arc::clone(&self.pool),
        }
    }
}

impl<S: BlockingSession> SessionAdapter<S> {
    #[must_use]
    pub fn new(session: Arc<S>, pool: Arc<WorkerPool>) -> Self {
        Self { session, pool }
    }

    /// Construct from a session and an explicit scheduler handle, spawning
    /// a private worker pool of `workers` threads.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError` for a zero-sized pool and `ConnectionError` if
    /// worker threads cannot be spawned.
    pub fn with_scheduler(
        session: Arc<S>,
        scheduler: tokio::runtime::Handle,
        workers: usize,
    ) -> Result<Self, SqlBridgeError> {
        Ok(Self::new(
            session,
            Arc::new(WorkerPool::new(workers, scheduler)?),
        ))
    }

    /// The wrapped session.
    #[must_use]
    pub fn session(&self) -> &Arc<S> {
        &self.session
    }

    /// The worker pool blocking calls are dispatched to.
    #[must_use]
    pub fn pool(&self) -> &Arc<WorkerPool> {
        &self.pool
    }

    /// Submit a statement and return an awaitable for its result.
    ///
    /// # Errors
    ///
    /// Submission failures (closed session, statement rejected before the
    /// driver accepts it) are returned here, synchronously. I/O failures are
    /// delivered by awaiting the returned future, unmodified.
    pub fn execute_async(
        &self,
        query: &str,
        params: &[RowValues],
    ) -> Result<BridgedFuture<ResultSet>, SqlBridgeError> {
        let handle = self.session.execute_handle(query, params)?;
        Ok(bridge(handle))
    }

    /// Prepare a statement on a worker thread.
    ///
    /// # Errors
    ///
    /// Returns `SubmissionError` synchronously if the pool is shut down;
    /// driver-side preparation failures come through the future.
    pub fn prepare_async(
        &self,
        query: &str,
    ) -> Result<BridgedFuture<S::Prepared>, SqlBridgeError> {
        let session = Arc::clone(&self.session);
        let query = query.to_owned();
        self.pool.submit(move || session.prepare(&query))
    }

    /// Submit a prepared statement and return an awaitable for its result.
    ///
    /// # Errors
    ///
    /// Same split as [`execute_async`](Self::execute_async).
    pub fn execute_prepared_async(
        &self,
        prepared: &S::Prepared,
        params: &[RowValues],
    ) -> Result<BridgedFuture<ResultSet>, SqlBridgeError> {
        let handle = self.session.execute_prepared_handle(prepared, params)?;
        Ok(bridge(handle))
    }

    /// Start a paged query and return the page stream.
    ///
    /// Dropping the paginator stops the driver from fetching further pages;
    /// the page in flight, if any, is discarded.
    ///
    /// # Errors
    ///
    /// Submission failures are returned synchronously.
    pub fn execute_paged(
        &self,
        query: &str,
        params: &[RowValues],
        page_size: usize,
    ) -> Result<Paginator, SqlBridgeError> {
        if page_size == 0 {
            return Err(SqlBridgeError::ConfigError(
                "page size must be at least 1".into(),
            ));
        }
        let (sink, paginator) = Paginator::channel(PAGE_CHANNEL_DEPTH);
        self.session
            .execute_paged(query, params, page_size, sink)?;
        Ok(paginator)
    }
}

impl<S: BlockingSession> Deref for SessionAdapter<S> {
    type Target = S;

    fn deref(&self) -> &Self::Target {
        &self.session
    }
}

/// Object-safe async execution surface for generic callers.
#[async_trait]
pub trait AsyncExecutor {
    /// Execute a single statement without blocking the scheduler thread.
    async fn execute(
        &self,
        query: &str,
        params: &[RowValues],
    ) -> Result<ResultSet, SqlBridgeError>;

    /// Run a batch of statements (no parameters) without blocking the
    /// scheduler thread.
    async fn execute_batch(&self, query: &str) -> Result<(), SqlBridgeError>;
}

#[async_trait]
impl<S: BlockingSession> AsyncExecutor for SessionAdapter<S> {
    async fn execute(
        &self,
        query: &str,
        params: &[RowValues],
    ) -> Result<ResultSet, SqlBridgeError> {
        self.execute_async(query, params)?.await
    }

    async fn execute_batch(&self, query: &str) -> Result<(), SqlBridgeError> {
        let session = Arc::clone(&self.session);
        let query = query.to_owned();
        self.pool.submit(move || session.execute_batch(&query))?.await
    }
}
