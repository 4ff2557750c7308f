use std::sync::Arc;

use crate::types::RowValues;

/// A single row from a query result.
///
/// Column names are shared across all rows of a result set.
#[derive(Debug, Clone, PartialEq)]
pub struct DbRow {
    pub(crate) column_names: Arc<Vec<String>>,
    pub(crate) values: Vec<RowValues>,
}

impl DbRow {
    #[must_use]
    pub fn new(column_names: Arc<Vec<String>>, values: Vec<RowValues>) -> Self {
        Self {
            column_names,
            values,
        }
    }

    /// Look up the index of a column by name.
    #[must_use]
    pub fn column_index(&self, column_name: &str) -> Option<usize> {
        self.column_names
            .iter()
            .position(|name| name == column_name)
    }

    /// Get a value by column name.
    #[must_use]
    pub fn get(&self, column_name: &str) -> Option<&RowValues> {
        self.column_index(column_name)
            .and_then(|idx| self.values.get(idx))
    }

    /// Get a value by column position.
    #[must_use]
    pub fn get_at(&self, index: usize) -> Option<&RowValues> {
        self.values.get(index)
    }

    /// The column names of this row.
    #[must_use]
    pub fn column_names(&self) -> &[String] {
        &self.column_names
    }

    /// The values of this row, in column order.
    #[must_use]
    pub fn values(&self) -> &[RowValues] {
        &self.values
    }
}
