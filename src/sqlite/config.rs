use serde::{Deserialize, Serialize};

/// Options for opening a `SQLite` session.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SqliteOptions {
    /// Database path, or `:memory:` for an in-memory database.
    pub db_path: String,
    /// Optional busy timeout applied at open.
    #[serde(default)]
    pub busy_timeout_ms: Option<u64>,
}

impl SqliteOptions {
    #[must_use]
    pub fn new(db_path: impl Into<String>) -> Self {
        Self {
            db_path: db_path.into(),
            busy_timeout_ms: None,
        }
    }

    /// In-memory database, private to this session's connection.
    #[must_use]
    pub fn memory() -> Self {
        Self::new(":memory:")
    }

    #[must_use]
    pub fn is_memory(&self) -> bool {
        self.db_path == ":memory:"
    }
}

/// Fluent builder for `SQLite` options.
#[derive(Debug, Clone)]
pub struct SqliteOptionsBuilder {
    opts: SqliteOptions,
}

impl SqliteOptionsBuilder {
    #[must_use]
    pub fn new(db_path: impl Into<String>) -> Self {
        Self {
            opts: SqliteOptions::new(db_path),
        }
    }

    #[must_use]
    pub fn busy_timeout_ms(mut self, millis: u64) -> Self {
        self.opts.busy_timeout_ms = Some(millis);
        self
    }

    #[must_use]
    pub fn finish(self) -> SqliteOptions {
        self.opts
    }
}

impl SqliteOptions {
    #[must_use]
    pub fn builder(db_path: impl Into<String>) -> SqliteOptionsBuilder {
        SqliteOptionsBuilder::new(db_path)
    }
}
