use std::pin::Pin;
use std::task::{Context, Poll};

use futures_util::Stream;
use tokio::sync::mpsc;
use tracing::debug;

use crate::error::SqlBridgeError;
use crate::results::ResultSet;

type PageResult = Result<ResultSet, SqlBridgeError>;

/// Producer side of a paged query, held by the driver.
///
/// Pages are delivered from whatever thread the driver runs on; the bounded
/// channel provides backpressure so the driver never races far ahead of the
/// consumer.
pub struct PageSink {
    sender: mpsc::Sender<PageResult>,
}

impl PageSink {
    /// Deliver one page. Returns `false` once the paginator is closed, in
    /// which case the driver should stop fetching further pages.
    pub fn deliver(&self, page: ResultSet) -> bool {
        match self.sender.blocking_send(Ok(page)) {
            Ok(()) => true,
            Err(dropped) => {
                if let Ok(page) = dropped.0 {
                    debug!(rows = page.len(), "paginator closed, dropping page");
                }
                false
            }
        }
    }

    /// Deliver a failure and stop. The error reaches the consumer unmodified.
    pub fn fail(&self, error: SqlBridgeError) {
        let _ = self.sender.blocking_send(Err(error));
    }
}

/// Consumer side of a paged query.
///
/// Yields pages in driver order until the statement is exhausted or an error
/// is delivered. Dropping the paginator closes the channel, which makes the
/// driver abandon remaining pages; the in-flight page, if any, is discarded.
#[derive(Debug)]
pub struct Paginator {
    receiver: mpsc::Receiver<PageResult>,
}

impl Paginator {
    /// Create a sink/paginator pair with the given channel depth.
    #[must_use]
    pub(crate) fn channel(depth: usize) -> (PageSink, Paginator) {
        let (sender, receiver) = mpsc::channel(depth.max(1));
        (PageSink { sender }, Paginator { receiver })
    }

    /// Await the next page. `None` once the driver has finished.
    pub async fn next_page(&mut self) -> Option<PageResult> {
        self.receiver.recv().await
    }

    /// Stop consuming; the driver stops fetching once it notices.
    pub fn close(&mut self) {
        self.receiver.close();
    }
}

impl Stream for Paginator {
    type Item = PageResult;

    fn poll_next(mut self: Pin<&mut Self>, cx: &mut Context<'_>) -> Poll<Option<Self::Item>> {
        self.receiver.poll_recv(cx)
    }
}
