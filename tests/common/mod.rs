#![allow(dead_code)]

use std::sync::Arc;

use sql_bridge::prelude::*;
use tokio::runtime::Handle;

/// Fixture model used across the integration tests.
#[derive(Debug, Clone, PartialEq)]
pub struct User {
    pub id: i64,
    pub username: String,
}

/// Patch payload for query-set updates.
#[derive(Debug, Clone)]
pub struct UserPatch {
    pub username: Option<String>,
}

fn user_from_row(row: &DbRow) -> Result<User, SqlBridgeError> {
    let id = row
        .get("id")
        .and_then(|v| v.as_int())
        .copied()
        .ok_or_else(|| SqlBridgeError::ExecutionError("users row missing id".into()))?;
    let username = row
        .get("username")
        .and_then(|v| v.as_text())
        .ok_or_else(|| SqlBridgeError::ExecutionError("users row missing username".into()))?
        .to_owned();
    Ok(User { id, username })
}

fn where_clause(filter: &Filter, first_placeholder: usize) -> (String, Vec<RowValues>) {
    if filter.is_empty() {
        return (String::new(), Vec::new());
    }
    let mut clauses = Vec::new();
    let mut params = Vec::new();
    for (i, (column, value)) in filter.conditions().iter().enumerate() {
        clauses.push(format!("{column} = ?{}", first_placeholder + i));
        params.push(value.clone());
    }
    (format!(" WHERE {}", clauses.join(" AND ")), params)
}

impl ModelOps for User {
    type Session = SqliteSession;
    type Key = i64;
    type Patch = UserPatch;

    fn operations() -> &'static [Operation] {
        Operation::ALL
    }

    fn insert(session: &SqliteSession, row: &Self) -> Result<(), SqlBridgeError> {
        session.execute(
            "INSERT INTO users (id, username) VALUES (?1, ?2)",
            &[RowValues::Int(row.id), RowValues::Text(row.username.clone())],
        )?;
        Ok(())
    }

    fn fetch_all(session: &SqliteSession) -> Result<Vec<Self>, SqlBridgeError> {
        let rs = session.execute("SELECT id, username FROM users ORDER BY id", &[])?;
        rs.rows.iter().map(user_from_row).collect()
    }

    fn fetch_filtered(
        session: &SqliteSession,
        filter: &Filter,
    ) -> Result<Vec<Self>, SqlBridgeError> {
        let (clause, params) = where_clause(filter, 1);
        let rs = session.execute(
            &format!("SELECT id, username FROM users{clause} ORDER BY id"),
            &params,
        )?;
        rs.rows.iter().map(user_from_row).collect()
    }

    fn fetch_one(session: &SqliteSession, key: &i64) -> Result<Self, SqlBridgeError> {
        let rs = session.execute(
            "SELECT id, username FROM users WHERE id = ?1",
            &[RowValues::Int(*key)],
        )?;
        let row = rs
            .rows
            .first()
            .ok_or_else(|| SqlBridgeError::ExecutionError(format!("no user with id {key}")))?;
        user_from_row(row)
    }

    fn apply_update(
        session: &SqliteSession,
        filter: &Filter,
        patch: &UserPatch,
    ) -> Result<usize, SqlBridgeError> {
        let Some(username) = &patch.username else {
            return Ok(0);
        };
        let (clause, where_params) = where_clause(filter, 2);
        let mut params = vec![RowValues::Text(username.clone())];
        params.extend(where_params);
        let rs = session.execute(&format!("UPDATE users SET username = ?1{clause}"), &params)?;
        Ok(rs.rows_affected)
    }

    fn remove(session: &SqliteSession, key: &i64) -> Result<(), SqlBridgeError> {
        session.execute("DELETE FROM users WHERE id = ?1", &[RowValues::Int(*key)])?;
        Ok(())
    }

    fn remove_filtered(
        session: &SqliteSession,
        filter: &Filter,
    ) -> Result<usize, SqlBridgeError> {
        let (clause, params) = where_clause(filter, 1);
        let rs = session.execute(&format!("DELETE FROM users{clause}"), &params)?;
        Ok(rs.rows_affected)
    }

    fn save(session: &SqliteSession, row: &Self) -> Result<(), SqlBridgeError> {
        session.execute(
            "INSERT OR REPLACE INTO users (id, username) VALUES (?1, ?2)",
            &[RowValues::Int(row.id), RowValues::Text(row.username.clone())],
        )?;
        Ok(())
    }
}

/// A model whose blocking surface only backs creation and full retrieval;
/// used to exercise fail-fast installation and `Unsupported` defaults.
#[derive(Debug, Clone)]
pub struct AuditLog {
    pub id: i64,
    pub message: String,
}

impl ModelOps for AuditLog {
    type Session = SqliteSession;
    type Key = i64;
    type Patch = ();

    fn operations() -> &'static [Operation] {
        &[Operation::Create, Operation::All]
    }

    fn insert(session: &SqliteSession, row: &Self) -> Result<(), SqlBridgeError> {
        session.execute(
            "INSERT INTO audit_log (id, message) VALUES (?1, ?2)",
            &[RowValues::Int(row.id), RowValues::Text(row.message.clone())],
        )?;
        Ok(())
    }

    fn fetch_all(session: &SqliteSession) -> Result<Vec<Self>, SqlBridgeError> {
        let rs = session.execute("SELECT id, message FROM audit_log ORDER BY id", &[])?;
        rs.rows
            .iter()
            .map(|row| {
                Ok(AuditLog {
                    id: row
                        .get("id")
                        .and_then(|v| v.as_int())
                        .copied()
                        .ok_or_else(|| {
                            SqlBridgeError::ExecutionError("audit_log row missing id".into())
                        })?,
                    message: row
                        .get("message")
                        .and_then(|v| v.as_text())
                        .ok_or_else(|| {
                            SqlBridgeError::ExecutionError("audit_log row missing message".into())
                        })?
                        .to_owned(),
                })
            })
            .collect()
    }
}

/// Open an in-memory session plus a small worker pool bound to the current
/// runtime.
pub fn session_and_pool() -> Result<(Arc<SqliteSession>, Arc<WorkerPool>), SqlBridgeError> {
    let session = Arc::new(SqliteSession::connect(SqliteOptions::memory())?);
    let pool = Arc::new(WorkerPool::new(2, Handle::current())?);
    Ok((session, pool))
}

/// Create the `users` fixture table.
pub fn create_users_table(session: &SqliteSession) -> Result<(), SqlBridgeError> {
    session.execute_batch(
        "CREATE TABLE users (id INTEGER PRIMARY KEY, username TEXT NOT NULL);",
    )
}
