//! Explain output for a scan request
//!
//! Renders exactly the body `open` would send, so explain and execution
//! cannot disagree.

use std::fmt;

use serde_json::Value;

use crate::request::ScanRequest;

#[derive(Debug, Clone)]
pub struct ExplainScan {
    pub index: String,
    /// Rendered search body
    pub source: Value,
    /// Whether the reply is decoded as a single aggregated row
    pub aggregated: bool,
    /// Parsers in output column order
    pub parsers: Vec<String>,
}

impl ExplainScan {
    pub fn from_request(request: &ScanRequest) -> Self {
        let parsers = request
            .response_parser()
            .map(|parser| parser.parsers().iter().map(ToString::to_string).collect())
            .unwrap_or_default();

        Self {
            index: request.index().to_string(),
            source: request.source(),
            aggregated: request.has_aggregations(),
            parsers,
        }
    }
}

impl fmt::Display for ExplainScan {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "=== EXPLAIN SCAN ===")?;
        writeln!(f, "Index: {}", self.index)?;
        writeln!(
            f,
            "Output: {}",
            if self.aggregated { "AGGREGATED ROW" } else { "DOCUMENTS" }
        )?;
        writeln!(f, "Request: {}", self.source)?;
        if !self.parsers.is_empty() {
            writeln!(f, "Parsers:")?;
            for parser in &self.parsers {
                writeln!(f, "  - {}", parser)?;
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::aggregation::{AggregateFunctionKind, MetricAggregationBuilder, NamedAggregate};
    use crate::expression::{JsonExpressionSerializer, ScalarExpr};
    use crate::value::ExprType;
    use std::sync::Arc;

    fn aggregated_request() -> ScanRequest {
        let builder = MetricAggregationBuilder::new(Arc::new(JsonExpressionSerializer::new()));
        let compiled = builder
            .build(&[NamedAggregate::new(
                "avg(age)",
                AggregateFunctionKind::Avg,
                vec![ScalarExpr::reference("age", ExprType::Integer)],
            )])
            .unwrap();

        let mut request = ScanRequest::new("accounts", 200);
        request.set_aggregations(compiled);
        request
    }

    #[test]
    fn test_explain_matches_sent_body() {
        let request = aggregated_request();
        let explain = ExplainScan::from_request(&request);

        assert_eq!(explain.source, request.to_search_request().source);
        assert!(explain.aggregated);
        assert_eq!(explain.parsers.len(), 1);
    }

    #[test]
    fn test_explain_output() {
        let output = ExplainScan::from_request(&aggregated_request()).to_string();

        assert!(output.starts_with("=== EXPLAIN SCAN ==="));
        assert!(output.contains("Index: accounts"));
        assert!(output.contains("AGGREGATED ROW"));
        assert!(output.contains(r#""size":0"#));
        assert!(output.contains("avg(age)"));
    }

    #[test]
    fn test_explain_deterministic() {
        let request = aggregated_request();
        assert_eq!(
            ExplainScan::from_request(&request).to_string(),
            ExplainScan::from_request(&request).to_string()
        );
    }

    #[test]
    fn test_document_scan_has_no_parsers() {
        let output = ExplainScan::from_request(&ScanRequest::new("accounts", 50)).to_string();
        assert!(output.contains("DOCUMENTS"));
        assert!(!output.contains("Parsers:"));
    }
}
