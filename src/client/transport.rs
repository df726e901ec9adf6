//! Index client boundary
//!
//! Connection management, retries and timeouts live behind this trait. The
//! scan operator sees a single blocking call per execution.

use std::cell::{Cell, RefCell};
use std::sync::Arc;

use serde_json::Value;

use super::errors::{ClientError, ClientResult};
use super::response::{SearchRequest, SearchResponse};

/// Executes search requests against the index
pub trait SearchClient {
    /// Sends one request and waits for the full reply
    fn search(&self, request: &SearchRequest) -> ClientResult<SearchResponse>;

    /// Releases server-side state held for a request (cursors, contexts)
    fn cleanup(&self, request: &SearchRequest) -> ClientResult<()>;
}

impl<C: SearchClient + ?Sized> SearchClient for &C {
    fn search(&self, request: &SearchRequest) -> ClientResult<SearchResponse> {
        (**self).search(request)
    }

    fn cleanup(&self, request: &SearchRequest) -> ClientResult<()> {
        (**self).cleanup(request)
    }
}

impl<C: SearchClient + ?Sized> SearchClient for Arc<C> {
    fn search(&self, request: &SearchRequest) -> ClientResult<SearchResponse> {
        (**self).search(request)
    }

    fn cleanup(&self, request: &SearchRequest) -> ClientResult<()> {
        (**self).cleanup(request)
    }
}

/// Client that answers every search with the same recorded reply.
///
/// Keeps every request it received and counts cleanups, so callers can
/// inspect exactly what a scan sent.
#[derive(Debug)]
pub struct ReplayClient {
    reply: ClientResult<SearchResponse>,
    requests: RefCell<Vec<SearchRequest>>,
    cleanups: Cell<usize>,
}

impl ReplayClient {
    pub fn new(reply: SearchResponse) -> Self {
        Self::with_result(Ok(reply))
    }

    /// Client whose every search fails with `error`
    pub fn failing(error: ClientError) -> Self {
        Self::with_result(Err(error))
    }

    /// Client replaying a raw JSON search reply
    pub fn from_json(reply: &Value) -> ClientResult<Self> {
        Ok(Self::new(SearchResponse::from_json(reply)?))
    }

    fn with_result(reply: ClientResult<SearchResponse>) -> Self {
        Self {
            reply,
            requests: RefCell::new(Vec::new()),
            cleanups: Cell::new(0),
        }
    }

    /// Requests received so far
    pub fn requests(&self) -> Vec<SearchRequest> {
        self.requests.borrow().clone()
    }

    pub fn cleanup_count(&self) -> usize {
        self.cleanups.get()
    }
}

impl SearchClient for ReplayClient {
    fn search(&self, request: &SearchRequest) -> ClientResult<SearchResponse> {
        self.requests.borrow_mut().push(request.clone());
        self.reply.clone()
    }

    fn cleanup(&self, _request: &SearchRequest) -> ClientResult<()> {
        self.cleanups.set(self.cleanups.get() + 1);
        Ok(())
    }
}
