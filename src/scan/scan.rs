//! Index scan operator
//!
//! Owns one search request for its whole lifetime:
//!
//! 1. Pushdown calls accumulate into the request (CREATED only)
//! 2. `open` sends it once and buffers every decoded row
//! 3. `has_next` / `next_row` hand rows out in reply order
//! 4. `close` releases server-side state; safe to repeat

use std::collections::VecDeque;
use std::sync::Arc;

use crate::aggregation::{MetricAggregationBuilder, NamedAggregate};
use crate::client::{SearchClient, SearchRequest, SearchResponse};
use crate::config::ScanSettings;
use crate::expression::{ExpressionSerializer, JsonExpressionSerializer, ScalarExpr};
use crate::filter::{FilterCompiler, FilterQueryBuilder};
use crate::observability::{Event, Logger};
use crate::request::{ScanRequest, SortKey};
use crate::value::{JsonValueFactory, ResultRow, TypeMapping, ValueFactory};

use super::errors::{ScanError, ScanResult};
use super::explain::ExplainScan;
use super::state::ScanState;

pub struct IndexScan<C: SearchClient> {
    client: C,
    filter: Arc<dyn FilterCompiler>,
    aggregations: MetricAggregationBuilder,
    value_factory: Arc<dyn ValueFactory>,
    request: ScanRequest,
    state: ScanState,
    /// The request the index accepted; cleanup targets exactly this one
    sent: Option<SearchRequest>,
    rows: VecDeque<ResultRow>,
}

impl<C: SearchClient> IndexScan<C> {
    /// Creates a scan over `index` with injected collaborators
    pub fn new(
        client: C,
        settings: &ScanSettings,
        index: impl Into<String>,
        serializer: Arc<dyn ExpressionSerializer>,
        value_factory: Arc<dyn ValueFactory>,
    ) -> Self {
        let filter: Arc<dyn FilterCompiler> =
            Arc::new(FilterQueryBuilder::new(serializer.clone()));
        let aggregations =
            MetricAggregationBuilder::with_filter_compiler(serializer, filter.clone());
        let request = ScanRequest::new(index, settings.query_size_limit);

        Logger::info(
            Event::ScanCreated,
            &[
                ("index", request.index()),
                ("request_id", &request.request_id().to_string()),
            ],
        );

        Self {
            client,
            filter,
            aggregations,
            value_factory,
            request,
            state: ScanState::Created,
            sent: None,
            rows: VecDeque::new(),
        }
    }

    /// Creates a scan using the JSON serializer and value factory
    pub fn with_defaults(client: C, settings: &ScanSettings, index: impl Into<String>) -> Self {
        Self::new(
            client,
            settings,
            index,
            Arc::new(JsonExpressionSerializer::with_lang(settings.script_lang.clone())),
            Arc::new(JsonValueFactory::new()),
        )
    }

    pub fn state(&self) -> ScanState {
        self.state
    }

    pub fn request(&self) -> &ScanRequest {
        &self.request
    }

    /// ANDs a condition onto the request filter
    pub fn push_down_filter(&mut self, condition: &ScalarExpr) -> ScanResult<()> {
        self.ensure_created("push_down_filter")?;
        let query = self.filter.compile(condition)?;
        self.request.push_filter(query);

        Logger::info(
            Event::ScanFilterPushed,
            &[
                ("condition", &condition.to_string()),
                ("request_id", &self.request_id()),
            ],
        );
        Ok(())
    }

    /// Compiles and attaches the aggregations. Allowed once.
    pub fn push_down_aggregation(&mut self, aggregates: &[NamedAggregate]) -> ScanResult<()> {
        self.ensure_created("push_down_aggregation")?;
        if self.request.has_aggregations() {
            return Err(self.violation("push_down_aggregation (second call)"));
        }

        let compiled = self.aggregations.build(aggregates)?;
        let names: Vec<&str> = aggregates.iter().map(|a| a.name.as_str()).collect();
        Logger::info(
            Event::ScanAggregationPushed,
            &[
                ("aggregations", &names.join(",")),
                ("request_id", &self.request_id()),
            ],
        );

        self.request.set_aggregations(compiled);
        Ok(())
    }

    pub fn push_down_sort(&mut self, keys: Vec<SortKey>) -> ScanResult<()> {
        self.ensure_created("push_down_sort")?;
        self.request.push_sorts(keys);
        Ok(())
    }

    /// Sets the row window. Aggregated scans ignore both values.
    pub fn push_down_limit(&mut self, limit: u32, offset: u32) -> ScanResult<()> {
        self.ensure_created("push_down_limit")?;
        self.request.set_window(limit, offset);
        Ok(())
    }

    /// Restricts the materialized document fields
    pub fn push_down_projects<I, S>(&mut self, fields: I) -> ScanResult<()>
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.ensure_created("push_down_projects")?;
        self.request.set_projects(fields.into_iter().map(Into::into));
        Ok(())
    }

    pub fn push_type_mapping(&mut self, mapping: TypeMapping) -> ScanResult<()> {
        self.ensure_created("push_type_mapping")?;
        self.request.set_type_mapping(mapping);
        Ok(())
    }

    /// Sends the request and buffers the decoded result.
    ///
    /// A failed remote call leaves the scan in CREATED so it can be retried.
    /// A reply that cannot be decoded moves it to FAILED: the request has
    /// run and can no longer change. Neither failure exposes any rows.
    pub fn open(&mut self) -> ScanResult<()> {
        self.ensure_created("open")?;
        let request_id = self.request_id();

        if !self.request.has_explicit_sort() {
            Logger::trace(Event::ScanDefaultSort, &[("request_id", &request_id)]);
        }

        let search = self.request.to_search_request();
        Logger::trace(
            Event::ScanOpen,
            &[("request_id", &request_id), ("source", &search.source.to_string())],
        );

        let response = match self.client.search(&search) {
            Ok(response) => response,
            Err(err) => {
                Logger::error(
                    Event::ScanOpenFailed,
                    &[("error", &err.to_string()), ("request_id", &request_id)],
                );
                return Err(ScanError::remote_execution(&err));
            }
        };
        self.sent = Some(search);

        let rows = match self.decode(&response) {
            Ok(rows) => rows,
            Err(err) => {
                Logger::error(
                    Event::ScanOpenFailed,
                    &[("error", err.message()), ("request_id", &request_id)],
                );
                self.state = ScanState::Failed;
                return Err(err);
            }
        };

        Logger::info(
            Event::ScanOpen,
            &[
                ("index", self.request.index()),
                ("request_id", &request_id),
                ("rows", &rows.len().to_string()),
            ],
        );

        self.state = if rows.is_empty() {
            ScanState::Exhausted
        } else {
            ScanState::Opened
        };
        self.rows = rows.into();
        Ok(())
    }

    pub fn has_next(&self) -> bool {
        self.state == ScanState::Opened && !self.rows.is_empty()
    }

    /// Hands out the next buffered row.
    ///
    /// Calling past the last row is a sequencing violation, not an empty row.
    pub fn next_row(&mut self) -> ScanResult<ResultRow> {
        match self.state {
            ScanState::Opened => {
                let row = self.rows.pop_front().ok_or_else(ScanError::exhausted)?;
                if self.rows.is_empty() {
                    self.state = ScanState::Exhausted;
                }
                Ok(row)
            }
            ScanState::Exhausted => Err(ScanError::exhausted()),
            _ => Err(self.violation("next_row")),
        }
    }

    /// Releases server-side state and moves to CLOSED. Never fails.
    pub fn close(&mut self) {
        if self.state == ScanState::Closed {
            return;
        }

        let request_id = self.request_id();
        if let Some(sent) = self.sent.take() {
            if let Err(err) = self.client.cleanup(&sent) {
                Logger::warn(
                    Event::ScanCleanupFailed,
                    &[("error", &err.to_string()), ("request_id", &request_id)],
                );
            }
        }

        self.rows.clear();
        self.state = ScanState::Closed;
        Logger::info(Event::ScanClosed, &[("request_id", &request_id)]);
    }

    /// Human-readable rendering of the pushed-down request
    pub fn explain(&self) -> String {
        ExplainScan::from_request(&self.request).to_string()
    }

    fn decode(&self, response: &SearchResponse) -> ScanResult<Vec<ResultRow>> {
        match self.request.response_parser() {
            Some(parser) => Ok(vec![parser.parse(response.aggregations.as_ref())?]),
            None => response
                .hits
                .iter()
                .map(|hit| {
                    self.value_factory
                        .construct_row(&hit.source, self.request.type_mapping())
                        .map_err(ScanError::from)
                })
                .collect(),
        }
    }

    fn ensure_created(&self, operation: &str) -> ScanResult<()> {
        if self.state.accepts_pushdown() {
            Ok(())
        } else {
            Err(self.violation(operation))
        }
    }

    fn violation(&self, operation: &str) -> ScanError {
        Logger::error(
            Event::ScanSequencingViolation,
            &[
                ("operation", operation),
                ("request_id", &self.request_id()),
                ("state", self.state.as_str()),
            ],
        );
        ScanError::sequencing(operation, self.state)
    }

    fn request_id(&self) -> String {
        self.request.request_id().to_string()
    }
}

impl<C: SearchClient> Drop for IndexScan<C> {
    fn drop(&mut self) {
        self.close();
    }
}
