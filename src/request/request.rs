//! Scan request accumulator
//!
//! Collects every pushdown decision for one scan and renders them into a
//! single search body. Only the owning scan mutates it, and only before the
//! request has been sent.

use std::collections::BTreeSet;

use serde_json::{json, Map, Value};
use uuid::Uuid;

use crate::aggregation::CompiledAggregations;
use crate::client::SearchRequest;
use crate::response::AggregationResponseParser;
use crate::value::TypeMapping;

use super::sort::SortKey;

#[derive(Debug, Clone)]
pub struct ScanRequest {
    request_id: Uuid,
    index: String,
    /// Row-limit hint; forced to zero once aggregation is attached
    size: u32,
    from: Option<u32>,
    /// Filter clauses, ANDed together
    filters: Vec<Value>,
    sorts: Vec<SortKey>,
    projects: BTreeSet<String>,
    type_mapping: TypeMapping,
    aggregations: Option<CompiledAggregations>,
}

impl ScanRequest {
    /// Creates an empty request whose row-limit hint is `size_limit`
    pub fn new(index: impl Into<String>, size_limit: u32) -> Self {
        Self {
            request_id: Uuid::new_v4(),
            index: index.into(),
            size: size_limit,
            from: None,
            filters: Vec::new(),
            sorts: Vec::new(),
            projects: BTreeSet::new(),
            type_mapping: TypeMapping::new(),
            aggregations: None,
        }
    }

    pub fn request_id(&self) -> Uuid {
        self.request_id
    }

    pub fn index(&self) -> &str {
        &self.index
    }

    /// ANDs a native filter onto the current one
    pub fn push_filter(&mut self, filter: Value) {
        self.filters.push(filter);
    }

    pub fn push_sorts(&mut self, keys: impl IntoIterator<Item = SortKey>) {
        self.sorts.extend(keys);
    }

    pub fn set_window(&mut self, limit: u32, offset: u32) {
        self.size = limit;
        self.from = Some(offset);
    }

    pub fn set_projects(&mut self, fields: impl IntoIterator<Item = String>) {
        self.projects = fields.into_iter().collect();
    }

    pub fn set_type_mapping(&mut self, mapping: TypeMapping) {
        self.type_mapping = mapping;
    }

    pub fn set_aggregations(&mut self, aggregations: CompiledAggregations) {
        self.size = 0;
        self.aggregations = Some(aggregations);
    }

    pub fn has_aggregations(&self) -> bool {
        self.aggregations.is_some()
    }

    pub fn has_explicit_sort(&self) -> bool {
        !self.sorts.is_empty()
    }

    pub fn type_mapping(&self) -> &TypeMapping {
        &self.type_mapping
    }

    pub fn aggregations(&self) -> Option<&CompiledAggregations> {
        self.aggregations.as_ref()
    }

    pub fn response_parser(&self) -> Option<AggregationResponseParser> {
        self.aggregations.as_ref().map(CompiledAggregations::response_parser)
    }

    /// Row limit actually sent to the index
    pub fn effective_size(&self) -> u32 {
        if self.has_aggregations() {
            0
        } else {
            self.size
        }
    }

    /// Sort clauses actually sent, including the document-order tie-break
    pub fn effective_sorts(&self) -> Vec<SortKey> {
        if self.sorts.is_empty() {
            vec![SortKey::doc_order()]
        } else {
            self.sorts.clone()
        }
    }

    /// Combined filter: one clause bare, several inside `bool.filter`
    pub fn query(&self) -> Option<Value> {
        match self.filters.as_slice() {
            [] => None,
            [single] => Some(single.clone()),
            many => Some(json!({"bool": {"filter": many}})),
        }
    }

    /// Renders the search body
    pub fn source(&self) -> Value {
        let mut source = Map::new();

        if let Some(query) = self.query() {
            source.insert("query".into(), query);
        }
        if let (Some(from), false) = (self.from, self.has_aggregations()) {
            source.insert("from".into(), json!(from));
        }
        source.insert("size".into(), json!(self.effective_size()));
        source.insert(
            "sort".into(),
            Value::Array(self.effective_sorts().iter().map(SortKey::to_json).collect()),
        );
        if !self.projects.is_empty() && !self.has_aggregations() {
            source.insert(
                "_source".into(),
                json!({"includes": self.projects, "excludes": []}),
            );
        }
        if let Some(aggregations) = &self.aggregations {
            source.insert("aggregations".into(), aggregations.request().to_json());
        }

        Value::Object(source)
    }

    pub fn to_search_request(&self) -> SearchRequest {
        SearchRequest {
            request_id: self.request_id,
            index: self.index.clone(),
            source: self.source(),
        }
    }
}
