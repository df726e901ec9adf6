//! Plan files
//!
//! A plan file describes one scan: the index, the pushdowns to apply, and the
//! declared field types. Expressions use the tagged `ScalarExpr` form:
//!
//! ```json
//! {
//!   "index": "accounts",
//!   "filter": {"kind": "function", "name": ">", "args": [
//!     {"kind": "reference", "attr": "age", "type": "INTEGER"},
//!     {"kind": "literal", "value": 30}
//!   ]},
//!   "aggregations": [{"name": "avg(age)", "function": "avg", "arguments": [
//!     {"kind": "reference", "attr": "age", "type": "INTEGER"}
//!   ]}]
//! }
//! ```

use std::path::Path;

use serde::Deserialize;

use crate::aggregation::{AggregationResult, NamedAggregate};
use crate::client::SearchClient;
use crate::config::ScanSettings;
use crate::expression::ScalarExpr;
use crate::request::SortKey;
use crate::scan::IndexScan;
use crate::value::TypeMapping;

use super::errors::{CliError, CliResult};
use super::io::read_json_file;

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct PlanFile {
    pub index: String,
    #[serde(default)]
    pub filter: Option<ScalarExpr>,
    #[serde(default)]
    pub aggregations: Vec<PlanAggregate>,
    #[serde(default)]
    pub sort: Vec<SortKey>,
    #[serde(default)]
    pub limit: Option<u32>,
    #[serde(default)]
    pub offset: Option<u32>,
    #[serde(default)]
    pub projects: Vec<String>,
    #[serde(default)]
    pub type_mapping: TypeMapping,
}

/// One aggregate as written in a plan file
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct PlanAggregate {
    pub name: String,
    /// Function name, matched case-insensitively
    pub function: String,
    #[serde(default)]
    pub arguments: Vec<ScalarExpr>,
    #[serde(default)]
    pub condition: Option<ScalarExpr>,
}

impl PlanAggregate {
    pub fn to_named(&self) -> AggregationResult<NamedAggregate> {
        let named = NamedAggregate::from_function_name(
            self.name.clone(),
            &self.function,
            self.arguments.clone(),
        )?;
        Ok(match &self.condition {
            Some(condition) => named.with_condition(condition.clone()),
            None => named,
        })
    }
}

impl PlanFile {
    pub fn load(path: &Path) -> CliResult<Self> {
        let raw = read_json_file(path)?;
        serde_json::from_value(raw)
            .map_err(|e| CliError::plan_error(format!("{}: {}", path.display(), e)))
    }

    pub fn from_json_str(content: &str) -> CliResult<Self> {
        serde_json::from_str(content).map_err(|e| CliError::plan_error(e.to_string()))
    }

    /// Creates a scan and applies every pushdown the plan names
    pub fn build_scan<C: SearchClient>(
        &self,
        client: C,
        settings: &ScanSettings,
    ) -> CliResult<IndexScan<C>> {
        let aggregates = self
            .aggregations
            .iter()
            .map(PlanAggregate::to_named)
            .collect::<AggregationResult<Vec<_>>>()?;

        let mut scan = IndexScan::with_defaults(client, settings, self.index.as_str());
        scan.push_type_mapping(self.type_mapping.clone())?;

        if let Some(filter) = &self.filter {
            scan.push_down_filter(filter)?;
        }
        if !aggregates.is_empty() {
            scan.push_down_aggregation(&aggregates)?;
        }
        if !self.sort.is_empty() {
            scan.push_down_sort(self.sort.clone())?;
        }
        if let Some(limit) = self.limit {
            scan.push_down_limit(limit, self.offset.unwrap_or(0))?;
        }
        if !self.projects.is_empty() {
            scan.push_down_projects(self.projects.iter().cloned())?;
        }

        Ok(scan)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::aggregation::{AggregateFunctionKind, AggregationError};
    use crate::client::{ReplayClient, SearchResponse};
    use crate::cli::errors::CliErrorCode;
    use crate::value::ExprType;
    use serde_json::json;

    const PLAN: &str = r#"{
        "index": "accounts",
        "filter": {"kind": "function", "name": ">", "args": [
            {"kind": "reference", "attr": "age", "type": "INTEGER"},
            {"kind": "literal", "value": 30}
        ]},
        "aggregations": [
            {"name": "AVG(age)", "function": "AVG", "arguments": [
                {"kind": "reference", "attr": "age", "type": "INTEGER"}
            ]},
            {"name": "count(*)", "function": "count", "arguments": [
                {"kind": "literal", "value": "*"}
            ]}
        ]
    }"#;

    #[test]
    fn test_plan_parses() {
        let plan = PlanFile::from_json_str(PLAN).unwrap();
        assert_eq!(plan.index, "accounts");
        assert_eq!(plan.aggregations.len(), 2);

        let named = plan.aggregations[0].to_named().unwrap();
        assert_eq!(named.function, AggregateFunctionKind::Avg);
        assert_eq!(
            named.arguments,
            vec![ScalarExpr::reference("age", ExprType::Integer)]
        );
    }

    #[test]
    fn test_unknown_function_is_reported() {
        let aggregate = PlanAggregate {
            name: "median(age)".into(),
            function: "median".into(),
            arguments: vec![],
            condition: None,
        };
        assert_eq!(
            aggregate.to_named().unwrap_err(),
            AggregationError::UnsupportedAggregateFunction("median".into())
        );
    }

    #[test]
    fn test_unknown_plan_field_rejected() {
        let err = PlanFile::from_json_str(r#"{"index": "a", "having": 1}"#).unwrap_err();
        assert_eq!(err.code(), &CliErrorCode::PlanError);
    }

    #[test]
    fn test_build_scan_applies_pushdowns() {
        let plan = PlanFile::from_json_str(PLAN).unwrap();
        let client = ReplayClient::new(SearchResponse::default());
        let scan = plan.build_scan(&client, &ScanSettings::default()).unwrap();

        let source = scan.request().source();
        assert_eq!(source["query"], json!({"range": {"age": {"gt": 30}}}));
        assert_eq!(source["size"], 0);
        assert_eq!(
            source["aggregations"]["count(*)"],
            json!({"value_count": {"field": "_index"}})
        );
    }

    #[test]
    fn test_load_from_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("plan.json");
        std::fs::write(&path, r#"{"index": "logs", "limit": 5, "offset": 10}"#).unwrap();

        let plan = PlanFile::load(&path).unwrap();
        assert_eq!(plan.limit, Some(5));
        assert_eq!(plan.offset, Some(10));
    }
}
