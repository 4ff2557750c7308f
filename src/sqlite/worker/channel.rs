use std::sync::Arc;
use std::sync::mpsc::Sender;

use rusqlite::types::Value;

use crate::bridge::PageSink;
use crate::error::SqlBridgeError;
use crate::results::ResultSet;

use super::super::handle::HandleCompleter;

/// Commands routed to the driver thread.
///
/// Blocking calls carry a `respond_to` sender the caller waits on; bridged
/// calls carry a [`HandleCompleter`] the driver fires when the statement
/// finishes.
pub(crate) enum Command {
    Execute {
        query: String,
        params: Vec<Value>,
        completer: HandleCompleter,
    },
    ExecutePrepared {
        query: Arc<String>,
        params: Vec<Value>,
        completer: HandleCompleter,
    },
    ExecuteBlocking {
        query: String,
        params: Vec<Value>,
        respond_to: Sender<Result<ResultSet, SqlBridgeError>>,
    },
    ExecuteBatch {
        query: String,
        respond_to: Sender<Result<(), SqlBridgeError>>,
    },
    Prepare {
        query: Arc<String>,
        respond_to: Sender<Result<(), SqlBridgeError>>,
    },
    ExecutePaged {
        query: String,
        params: Vec<Value>,
        page_size: usize,
        sink: PageSink,
    },
    Shutdown,
}
