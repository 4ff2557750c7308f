use std::sync::Arc;

use rusqlite::Statement;
use rusqlite::types::Value;

use crate::error::SqlBridgeError;
use crate::results::ResultSet;
use crate::types::RowValues;

use super::params::values_as_tosql;

/// Extract a [`RowValues`] from a `SQLite` row.
///
/// # Errors
///
/// Returns the driver error if the value cannot be read.
pub fn extract_value(row: &rusqlite::Row, idx: usize) -> Result<RowValues, SqlBridgeError> {
    let value: Value = row.get(idx).map_err(SqlBridgeError::SqliteError)?;
    Ok(match value {
        Value::Null => RowValues::Null,
        Value::Integer(i) => RowValues::Int(i),
        Value::Real(f) => RowValues::Float(f),
        Value::Text(s) => RowValues::Text(s),
        Value::Blob(b) => RowValues::Blob(b),
    })
}

/// Run a statement that produces rows and materialize the result set.
///
/// # Errors
///
/// Returns the driver error if execution or row extraction fails.
pub fn build_result_set(
    stmt: &mut Statement,
    params: &[Value],
) -> Result<ResultSet, SqlBridgeError> {
    let param_refs = values_as_tosql(params);
    let column_names: Vec<String> = stmt
        .column_names()
        .iter()
        .map(std::string::ToString::to_string)
        .collect();
    let column_count = column_names.len();
    let column_names = Arc::new(column_names);

    let mut rows_iter = stmt.query(&param_refs[..])?;
    let mut result_set = ResultSet::with_capacity(16);
    result_set.set_column_names(column_names);

    while let Some(row) = rows_iter.next()? {
        let mut row_values = Vec::with_capacity(column_count);
        for i in 0..column_count {
            row_values.push(extract_value(row, i)?);
        }
        result_set.add_row_values(row_values);
    }

    Ok(result_set)
}

/// Run any single statement: rows for selects, a change count for DML.
///
/// A statement with no result columns is executed for its side effect and
/// reported through `rows_affected`, so one entry point serves both reads
/// and writes.
///
/// # Errors
///
/// Returns the driver error if execution fails.
pub fn run_statement(
    conn: &mut rusqlite::Connection,
    query: &str,
    params: &[Value],
) -> Result<ResultSet, SqlBridgeError> {
    let mut stmt = conn.prepare(query)?;
    if stmt.column_count() == 0 {
        let param_refs = values_as_tosql(params);
        let rows_affected = stmt.execute(&param_refs[..])?;
        return Ok(ResultSet::from_rows_affected(rows_affected));
    }
    build_result_set(&mut stmt, params)
}

/// Run a cached prepared statement by text.
///
/// # Errors
///
/// Returns the driver error if execution fails.
pub fn run_prepared(
    conn: &mut rusqlite::Connection,
    query: &str,
    params: &[Value],
) -> Result<ResultSet, SqlBridgeError> {
    let mut stmt = conn.prepare_cached(query)?;
    if stmt.column_count() == 0 {
        let param_refs = values_as_tosql(params);
        let rows_affected = stmt.execute(&param_refs[..])?;
        return Ok(ResultSet::from_rows_affected(rows_affected));
    }
    build_result_set(&mut stmt, params)
}

/// Run a batch of statements inside a transaction.
///
/// # Errors
///
/// Returns the driver error if any statement in the batch fails.
pub fn execute_batch(
    conn: &mut rusqlite::Connection,
    query: &str,
) -> Result<(), SqlBridgeError> {
    let tx = conn.transaction()?;
    tx.execute_batch(query)?;
    tx.commit()?;
    Ok(())
}
