//! Search request and reply types exchanged with the index client

use serde_json::Value;
use uuid::Uuid;

use super::errors::{ClientError, ClientResult};

/// A fully rendered request, ready to send
#[derive(Debug, Clone, PartialEq)]
pub struct SearchRequest {
    /// Identifies the scan that issued the request
    pub request_id: Uuid,
    /// Target index name
    pub index: String,
    /// Search body (query, aggs, sort, size, from, _source)
    pub source: Value,
}

/// One matching document
#[derive(Debug, Clone, PartialEq)]
pub struct SearchHit {
    pub id: Option<String>,
    pub source: Value,
}

/// Reply from the index
#[derive(Debug, Clone, Default, PartialEq)]
pub struct SearchResponse {
    /// Matching documents in reply order
    pub hits: Vec<SearchHit>,
    /// The `aggregations` section, if the reply had one
    pub aggregations: Option<Value>,
}

impl SearchResponse {
    /// Reads a raw search reply.
    ///
    /// `hits.hits` may be absent (aggregation-only replies); when present it
    /// must be an array of objects carrying `_source`.
    pub fn from_json(reply: &Value) -> ClientResult<Self> {
        let root = reply
            .as_object()
            .ok_or_else(|| ClientError::MalformedResponse("reply is not an object".into()))?;

        let mut hits = Vec::new();
        if let Some(raw_hits) = root.get("hits").and_then(|h| h.get("hits")) {
            let raw_hits = raw_hits
                .as_array()
                .ok_or_else(|| ClientError::MalformedResponse("hits.hits is not an array".into()))?;
            for raw in raw_hits {
                let source = raw.get("_source").cloned().ok_or_else(|| {
                    ClientError::MalformedResponse(format!("hit without _source: {}", raw))
                })?;
                hits.push(SearchHit {
                    id: raw.get("_id").and_then(Value::as_str).map(str::to_string),
                    source,
                });
            }
        }

        Ok(Self {
            hits,
            aggregations: root.get("aggregations").cloned(),
        })
    }

    /// Builds an aggregation-only reply
    pub fn with_aggregations(aggregations: Value) -> Self {
        Self {
            hits: Vec::new(),
            aggregations: Some(aggregations),
        }
    }

    /// Builds a reply from document sources
    pub fn with_documents(sources: impl IntoIterator<Item = Value>) -> Self {
        Self {
            hits: sources
                .into_iter()
                .map(|source| SearchHit { id: None, source })
                .collect(),
            aggregations: None,
        }
    }
}
