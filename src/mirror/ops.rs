use std::fmt;

use crate::error::SqlBridgeError;
use crate::types::RowValues;

/// The data-mutating and data-fetching operations a model surface can
/// declare. Only these can be mirrored; non-I/O concerns (field access,
/// filter building) never appear here.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Operation {
    /// Insert a new row.
    Create,
    /// Fetch every row.
    All,
    /// Fetch rows matching a filter.
    Filter,
    /// Fetch a single row by key.
    Get,
    /// Apply a patch to rows matching a filter.
    Update,
    /// Delete by key or filter.
    Delete,
    /// Persist one instance (insert-or-replace).
    Save,
}

impl Operation {
    /// Every operation, in declaration order.
    pub const ALL: &'static [Operation] = &[
        Operation::Create,
        Operation::All,
        Operation::Filter,
        Operation::Get,
        Operation::Update,
        Operation::Delete,
        Operation::Save,
    ];

    #[must_use]
    pub fn name(self) -> &'static str {
        match self {
            Operation::Create => "create",
            Operation::All => "all",
            Operation::Filter => "filter",
            Operation::Get => "get",
            Operation::Update => "update",
            Operation::Delete => "delete",
            Operation::Save => "save",
        }
    }
}

impl fmt::Display for Operation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Equality-conjunction filter handed to the blocking query-set operations.
///
/// Built synchronously; constructing a filter never touches the database.
/// Anything richer belongs to the mapping layer's own query DSL.
#[derive(Debug, Clone, Default)]
pub struct Filter {
    conditions: Vec<(String, RowValues)>,
}

impl Filter {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a `column = value` condition.
    #[must_use]
    pub fn eq(mut self, column: impl Into<String>, value: RowValues) -> Self {
        self.conditions.push((column.into(), value));
        self
    }

    #[must_use]
    pub fn conditions(&self) -> &[(String, RowValues)] {
        &self.conditions
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.conditions.is_empty()
    }
}

fn unsupported<T>(type_name: &str, operation: Operation) -> Result<T, SqlBridgeError> {
    Err(SqlBridgeError::Unsupported(format!(
        "{type_name} does not implement `{operation}`"
    )))
}

/// The blocking data-access surface of a mapped model, as consumed by the
/// capability injector.
///
/// This is the narrow interface onto the mapping layer: each method performs
/// exactly one blocking call against the session. `operations()` declares
/// which methods the concrete model actually backs; undeclared methods keep
/// the `Unsupported` defaults and installation of their mirrors fails fast.
pub trait ModelOps: Sized + Send + 'static {
    /// The blocking driver session these operations run against.
    type Session: Send + Sync + 'static;
    /// Primary-key type for single-row operations.
    type Key: Send + 'static;
    /// Patch payload applied by `update`.
    type Patch: Send + 'static;

    /// The operations this model's blocking surface actually implements.
    fn operations() -> &'static [Operation];

    /// Insert `row`.
    fn insert(session: &Self::Session, row: &Self) -> Result<(), SqlBridgeError> {
        let _ = (session, row);
        unsupported(std::any::type_name::<Self>(), Operation::Create)
    }

    /// Fetch every row.
    fn fetch_all(session: &Self::Session) -> Result<Vec<Self>, SqlBridgeError> {
        let _ = session;
        unsupported(std::any::type_name::<Self>(), Operation::All)
    }

    /// Fetch rows matching `filter`.
    fn fetch_filtered(
        session: &Self::Session,
        filter: &Filter,
    ) -> Result<Vec<Self>, SqlBridgeError> {
        let _ = (session, filter);
        unsupported(std::any::type_name::<Self>(), Operation::Filter)
    }

    /// Fetch the single row identified by `key`.
    fn fetch_one(session: &Self::Session, key: &Self::Key) -> Result<Self, SqlBridgeError> {
        let _ = (session, key);
        unsupported(std::any::type_name::<Self>(), Operation::Get)
    }

    /// Apply `patch` to rows matching `filter`; returns the rows changed.
    fn apply_update(
        session: &Self::Session,
        filter: &Filter,
        patch: &Self::Patch,
    ) -> Result<usize, SqlBridgeError> {
        let _ = (session, filter, patch);
        unsupported(std::any::type_name::<Self>(), Operation::Update)
    }

    /// Delete the row identified by `key`.
    fn remove(session: &Self::Session, key: &Self::Key) -> Result<(), SqlBridgeError> {
        let _ = (session, key);
        unsupported(std::any::type_name::<Self>(), Operation::Delete)
    }

    /// Delete rows matching `filter`; returns the rows removed.
    fn remove_filtered(
        session: &Self::Session,
        filter: &Filter,
    ) -> Result<usize, SqlBridgeError> {
        let _ = (session, filter);
        unsupported(std::any::type_name::<Self>(), Operation::Delete)
    }

    /// Persist `row`, inserting or replacing.
    fn save(session: &Self::Session, row: &Self) -> Result<(), SqlBridgeError> {
        let _ = (session, row);
        unsupported(std::any::type_name::<Self>(), Operation::Save)
    }
}
