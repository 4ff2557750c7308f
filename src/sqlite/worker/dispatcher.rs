use std::sync::Arc;
use std::sync::mpsc::Receiver;

use rusqlite::Connection;
use rusqlite::types::Value;

use crate::bridge::PageSink;
use crate::error::SqlBridgeError;
use crate::results::ResultSet;

use super::super::params::values_as_tosql;
use super::super::query::{execute_batch, extract_value, run_prepared, run_statement};
use super::channel::Command;

/// Command loop run on the dedicated driver thread that owns the connection.
pub(crate) fn run_driver(mut conn: Connection, receiver: &Receiver<Command>) {
    while let Ok(command) = receiver.recv() {
        match command {
            Command::Shutdown => break,
            Command::Execute {
                query,
                params,
                completer,
            } => completer.complete(run_statement(&mut conn, &query, &params)),
            Command::ExecutePrepared {
                query,
                params,
                completer,
            } => completer.complete(run_prepared(&mut conn, query.as_ref(), &params)),
            Command::ExecuteBlocking {
                query,
                params,
                respond_to,
            } => {
                let _ = respond_to.send(run_statement(&mut conn, &query, &params));
            }
            Command::ExecuteBatch { query, respond_to } => {
                let _ = respond_to.send(execute_batch(&mut conn, &query));
            }
            Command::Prepare { query, respond_to } => {
                let _ = respond_to.send(prepare_statement(&conn, query.as_ref()));
            }
            Command::ExecutePaged {
                query,
                params,
                page_size,
                sink,
            } => run_paged(&mut conn, &query, &params, page_size, &sink),
        }
    }
}

fn prepare_statement(conn: &Connection, query: &str) -> Result<(), SqlBridgeError> {
    let _ = conn.prepare_cached(query)?;
    Ok(())
}

/// Step a statement in `page_size` batches, delivering each page to the
/// sink as it fills. The bounded sink blocks this thread when the consumer
/// falls behind; a closed sink stops fetching early.
fn run_paged(
    conn: &mut Connection,
    query: &str,
    params: &[Value],
    page_size: usize,
    sink: &PageSink,
) {
    if let Err(err) = stream_pages(conn, query, params, page_size, sink) {
        sink.fail(err);
    }
}

fn stream_pages(
    conn: &mut Connection,
    query: &str,
    params: &[Value],
    page_size: usize,
    sink: &PageSink,
) -> Result<(), SqlBridgeError> {
    let mut stmt = conn.prepare(query)?;
    let column_names: Arc<Vec<String>> = Arc::new(
        stmt.column_names()
            .iter()
            .map(std::string::ToString::to_string)
            .collect(),
    );
    let column_count = column_names.len();

    let new_page = |capacity: usize| {
        let mut page = ResultSet::with_capacity(capacity);
        page.set_column_names(Arc::clone(&column_names));
        page
    };

    let param_refs = values_as_tosql(params);
    let mut rows_iter = stmt.query(&param_refs[..])?;
    let mut page = new_page(page_size);

    while let Some(row) = rows_iter.next()? {
        let mut row_values = Vec::with_capacity(column_count);
        for i in 0..column_count {
            row_values.push(extract_value(row, i)?);
        }
        page.add_row_values(row_values);

        if page.len() >= page_size {
            let complete = std::mem::replace(&mut page, new_page(page_size));
            if !sink.deliver(complete) {
                return Ok(());
            }
        }
    }

    if !page.is_empty() {
        let _ = sink.deliver(page);
    }
    Ok(())
}
