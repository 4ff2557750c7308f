use std::marker::PhantomData;
use std::sync::Arc;

use crate::error::SqlBridgeError;
use crate::executor::WorkerPool;

use super::ops::{Filter, ModelOps, Operation};
use super::registry::{OperationRegistry, Surface};

/// Operations installable on the model surface.
const MODEL_SURFACE: &[Operation] = &[
    Operation::Create,
    Operation::All,
    Operation::Get,
    Operation::Delete,
    Operation::Save,
];

/// Operations installable on the query-set surface.
const QUERY_SURFACE: &[Operation] = &[
    Operation::All,
    Operation::Filter,
    Operation::Get,
    Operation::Update,
    Operation::Delete,
];

/// Installs non-blocking mirror operations for models mapped against one
/// blocking session.
///
/// The installer owns the [`OperationRegistry`]; installation is an explicit
/// registration step per model type (see [`install_mirrors!`]), and the
/// resulting wrapper types carry the mirrors. Re-installing a type is a
/// no-op.
///
/// [`install_mirrors!`]: crate::install_mirrors
pub struct Installer<S> {
    session: Arc<S>,
    pool: Arc<WorkerPool>,
    registry: Arc<OperationRegistry>,
}

impl<S> Clone for Installer<S> {
    fn clone(&self) -> Self {
        Self {
            session: Arc::clone(&self.session),
            pool: Arc::clone(&self.pool),
            registry: Arc::clone(&self.registry),
        }
    }
}

impl<S: Send + Sync + 'static> Installer<S> {
    #[must_use]
    pub fn new(session: Arc<S>, pool: Arc<WorkerPool>) -> Self {
        Self {
            session,
            pool,
            registry: Arc::new(OperationRegistry::new()),
        }
    }

    /// The registry tracking what has been installed.
    #[must_use]
    pub fn registry(&self) -> &Arc<OperationRegistry> {
        &self.registry
    }

    /// The blocking session mirrors run against.
    #[must_use]
    pub fn session(&self) -> &Arc<S> {
        &self.session
    }

    /// The worker pool mirror operations are dispatched to.
    #[must_use]
    pub fn pool(&self) -> &Arc<WorkerPool> {
        &self.pool
    }

    /// Install the model-surface mirrors for every operation `M` declares.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError` if `M` declares an operation set that cannot
    /// be validated.
    pub fn install<M>(&self) -> Result<Mirror<M>, SqlBridgeError>
    where
        M: ModelOps<Session = S>,
    {
        let declared: Vec<Operation> = M::operations()
            .iter()
            .copied()
            .filter(|op| MODEL_SURFACE.contains(op))
            .collect();
        self.install_with::<M>(&declared)
    }

    /// Install model-surface mirrors for an explicit operation list.
    ///
    /// # Errors
    ///
    /// Fails fast with `ConfigError` if any requested operation is not
    /// declared by `M::operations()`. A repeated install is a no-op.
    pub fn install_with<M>(&self, operations: &[Operation]) -> Result<Mirror<M>, SqlBridgeError>
    where
        M: ModelOps<Session = S>,
    {
        self.registry.install::<M>(Surface::Model, operations)?;
        Ok(Mirror {
            session: Arc::clone(&self.session),
            pool: Arc::clone(&self.pool),
            _model: PhantomData,
        })
    }

    /// Install the query-set-surface mirrors for every operation `M`
    /// declares.
    ///
    /// # Errors
    ///
    /// Same failure modes as [`install_with`](Self::install_with).
    pub fn install_query<M>(&self) -> Result<MirrorQuery<M>, SqlBridgeError>
    where
        M: ModelOps<Session = S>,
    {
        let declared: Vec<Operation> = M::operations()
            .iter()
            .copied()
            .filter(|op| QUERY_SURFACE.contains(op))
            .collect();
        self.registry.install::<M>(Surface::QuerySet, &declared)?;
        Ok(MirrorQuery {
            session: Arc::clone(&self.session),
            pool: Arc::clone(&self.pool),
            _model: PhantomData,
        })
    }

    /// Install both the model surface and its associated query-set surface
    /// in one call.
    ///
    /// # Errors
    ///
    /// Same failure modes as [`install_with`](Self::install_with).
    pub fn install_full<M>(&self) -> Result<(Mirror<M>, MirrorQuery<M>), SqlBridgeError>
    where
        M: ModelOps<Session = S>,
    {
        let mirror = self.install::<M>()?;
        let query = self.install_query::<M>()?;
        Ok((mirror, query))
    }

    /// Retrieve the model-surface mirror for an installed type.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError` if `M` has not been installed.
    pub fn mirror<M>(&self) -> Result<Mirror<M>, SqlBridgeError>
    where
        M: ModelOps<Session = S>,
    {
        if !self.registry.is_installed::<M>(Surface::Model) {
            return Err(SqlBridgeError::ConfigError(format!(
                "{} has no installed mirror operations",
                std::any::type_name::<M>()
            )));
        }
        Ok(Mirror {
            session: Arc::clone(&self.session),
            pool: Arc::clone(&self.pool),
            _model: PhantomData,
        })
    }

    /// Retrieve the query-set mirror for an installed type.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError` if `M`'s query-set surface has not been
    /// installed.
    pub fn query<M>(&self) -> Result<MirrorQuery<M>, SqlBridgeError>
    where
        M: ModelOps<Session = S>,
    {
        if !self.registry.is_installed::<M>(Surface::QuerySet) {
            return Err(SqlBridgeError::ConfigError(format!(
                "{} has no installed query-set mirror operations",
                std::any::type_name::<M>()
            )));
        }
        Ok(MirrorQuery {
            session: Arc::clone(&self.session),
            pool: Arc::clone(&self.pool),
            _model: PhantomData,
        })
    }
}

/// Non-blocking mirror of a model's data-access surface.
///
/// Each method captures its arguments, submits the original blocking
/// operation to the worker pool, and awaits the bridged completion. The
/// value or error is exactly what the blocking call produces.
pub struct Mirror<M: ModelOps> {
    session: Arc<M::Session>,
    pool: Arc<WorkerPool>,
    _model: PhantomData<fn() -> M>,
}

impl<M: ModelOps> Clone for Mirror<M> {
    fn clone(&self) -> Self {
        Self {
            session: Arc::clone(&self.session),
            pool: Arc::clone(&self.pool),
            _model: PhantomData,
        }
    }
}

impl<M: ModelOps> std::fmt::Debug for Mirror<M> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Mirror").field("pool", &self.pool).finish()
    }
}

impl<M: ModelOps> Mirror<M> {
    /// Insert `row`; resolves with the row once the driver confirms it.
    ///
    /// # Errors
    ///
    /// `SubmissionError` synchronously when the pool is shut down; the
    /// blocking operation's own error otherwise, unmodified.
    pub async fn create(&self, row: M) -> Result<M, SqlBridgeError> {
        let session = Arc::clone(&self.session);
        self.pool
            .submit(move || {
                M::insert(&session, &row)?;
                Ok(row)
            })?
            .await
    }

    /// Fetch every row.
    ///
    /// # Errors
    ///
    /// Same split as [`create`](Self::create).
    pub async fn all(&self) -> Result<Vec<M>, SqlBridgeError> {
        let session = Arc::clone(&self.session);
        self.pool.submit(move || M::fetch_all(&session))?.await
    }

    /// Fetch the single row identified by `key`.
    ///
    /// # Errors
    ///
    /// Same split as [`create`](Self::create).
    pub async fn get(&self, key: M::Key) -> Result<M, SqlBridgeError> {
        let session = Arc::clone(&self.session);
        self.pool
            .submit(move || M::fetch_one(&session, &key))?
            .await
    }

    /// Persist `row`, inserting or replacing; resolves with the row.
    ///
    /// # Errors
    ///
    /// Same split as [`create`](Self::create).
    pub async fn save(&self, row: M) -> Result<M, SqlBridgeError> {
        let session = Arc::clone(&self.session);
        self.pool
            .submit(move || {
                M::save(&session, &row)?;
                Ok(row)
            })?
            .await
    }

    /// Delete the row identified by `key`.
    ///
    /// # Errors
    ///
    /// Same split as [`create`](Self::create).
    pub async fn delete(&self, key: M::Key) -> Result<(), SqlBridgeError> {
        let session = Arc::clone(&self.session);
        self.pool.submit(move || M::remove(&session, &key))?.await
    }
}

/// Non-blocking mirror of a model's query-set surface.
pub struct MirrorQuery<M: ModelOps> {
    session: Arc<M::Session>,
    pool: Arc<WorkerPool>,
    _model: PhantomData<fn() -> M>,
}

impl<M: ModelOps> Clone for MirrorQuery<M> {
    fn clone(&self) -> Self {
        Self {
            session: Arc::clone(&self.session),
            pool: Arc::clone(&self.pool),
            _model: PhantomData,
        }
    }
}

impl<M: ModelOps> MirrorQuery<M> {
    /// Fetch every row.
    ///
    /// # Errors
    ///
    /// `SubmissionError` synchronously when the pool is shut down; the
    /// blocking operation's own error otherwise, unmodified.
    pub async fn all(&self) -> Result<Vec<M>, SqlBridgeError> {
        let session = Arc::clone(&self.session);
        self.pool.submit(move || M::fetch_all(&session))?.await
    }

    /// Narrow the query set. Filter construction is synchronous and never
    /// suspends; only the terminal methods perform I/O.
    #[must_use]
    pub fn filter(&self, filter: Filter) -> FilteredMirror<M> {
        FilteredMirror {
            session: Arc::clone(&self.session),
            pool: Arc::clone(&self.pool),
            filter,
            _model: PhantomData,
        }
    }
}

/// A filtered query-set mirror; terminal methods run the blocking
/// operation on the worker pool.
pub struct FilteredMirror<M: ModelOps> {
    session: Arc<M::Session>,
    pool: Arc<WorkerPool>,
    filter: Filter,
    _model: PhantomData<fn() -> M>,
}

impl<M: ModelOps> FilteredMirror<M> {
    /// Fetch the matching rows.
    ///
    /// # Errors
    ///
    /// `SubmissionError` synchronously when the pool is shut down; the
    /// blocking operation's own error otherwise, unmodified.
    pub async fn all(&self) -> Result<Vec<M>, SqlBridgeError> {
        let session = Arc::clone(&self.session);
        let filter = self.filter.clone();
        self.pool
            .submit(move || M::fetch_filtered(&session, &filter))?
            .await
    }

    /// Fetch exactly one matching row.
    ///
    /// # Errors
    ///
    /// `ExecutionError` if zero or more than one row matches, in addition
    /// to the split described on [`all`](Self::all).
    pub async fn get(&self) -> Result<M, SqlBridgeError> {
        let session = Arc::clone(&self.session);
        let filter = self.filter.clone();
        self.pool
            .submit(move || {
                let mut rows = M::fetch_filtered(&session, &filter)?;
                match rows.len() {
                    1 => Ok(rows.remove(0)),
                    0 => Err(SqlBridgeError::ExecutionError(
                        "get matched no rows".into(),
                    )),
                    n => Err(SqlBridgeError::ExecutionError(format!(
                        "get matched {n} rows"
                    ))),
                }
            })?
            .await
    }

    /// Apply `patch` to the matching rows; resolves with the change count.
    ///
    /// # Errors
    ///
    /// Same split as [`all`](Self::all).
    pub async fn update(&self, patch: M::Patch) -> Result<usize, SqlBridgeError> {
        let session = Arc::clone(&self.session);
        let filter = self.filter.clone();
        self.pool
            .submit(move || M::apply_update(&session, &filter, &patch))?
            .await
    }

    /// Delete the matching rows; resolves with the removal count.
    ///
    /// # Errors
    ///
    /// Same split as [`all`](Self::all).
    pub async fn delete(&self) -> Result<usize, SqlBridgeError> {
        let session = Arc::clone(&self.session);
        let filter = self.filter.clone();
        self.pool
            .submit(move || M::remove_filtered(&session, &filter))?
            .await
    }
}

/// Register mirror operations for a list of model types in one step.
///
/// This is the explicit, compile-time counterpart to discovering concrete
/// models at runtime: each listed type gets both its model-surface and
/// query-set-surface mirrors installed. Evaluates to
/// `Result<(), SqlBridgeError>`.
///
/// ```rust,ignore
/// install_mirrors!(installer, User, Post)?;
/// let users = installer.mirror::<User>()?;
/// ```
#[macro_export]
macro_rules! install_mirrors {
    ($installer:expr, $($model:ty),+ $(,)?) => {{
        let installer = &$installer;
        let result: Result<(), $crate::SqlBridgeError> = (|| {
            $(
                let _ = installer.install_full::<$model>()?;
            )+
            Ok(())
        })();
        result
    }};
}
