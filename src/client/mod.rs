//! Index client boundary
//!
//! The transport itself is an external collaborator. This module defines the
//! request/reply types that cross it and a replaying client for offline runs.

mod errors;
mod response;
mod transport;

pub use errors::{ClientError, ClientResult};
pub use response::{SearchHit, SearchRequest, SearchResponse};
pub use transport::{ReplayClient, SearchClient};
