//! Native aggregation request nodes
//!
//! Rendered as the `aggs` section of an OpenSearch-style search body:
//! `{"<name>": {"<kind>": {"field": "<path>"}}}`.

use serde_json::{json, Map, Value};

/// Spread multiplier requested from extended statistics buckets
pub const EXTENDED_STATS_SIGMA: f64 = 2.0;

/// Native metric aggregation type
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum MetricKind {
    Avg,
    Sum,
    ValueCount,
    Min,
    Max,
    ExtendedStats { sigma: f64 },
}

impl MetricKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            MetricKind::Avg => "avg",
            MetricKind::Sum => "sum",
            MetricKind::ValueCount => "value_count",
            MetricKind::Min => "min",
            MetricKind::Max => "max",
            MetricKind::ExtendedStats { .. } => "extended_stats",
        }
    }
}

/// Where a metric reads its per-document value from
#[derive(Debug, Clone, PartialEq)]
pub enum MetricSource {
    Field(String),
    Script(Value),
}

/// Single metric over one field or script
#[derive(Debug, Clone, PartialEq)]
pub struct MetricAggregation {
    pub name: String,
    pub kind: MetricKind,
    pub source: MetricSource,
}

impl MetricAggregation {
    pub fn body(&self) -> Value {
        let mut params = Map::new();
        match &self.source {
            MetricSource::Field(path) => params.insert("field".into(), json!(path)),
            MetricSource::Script(script) => params.insert("script".into(), script.clone()),
        };
        if let MetricKind::ExtendedStats { sigma } = self.kind {
            params.insert("sigma".into(), json!(sigma));
        }

        let mut body = Map::new();
        body.insert(self.kind.as_str().into(), Value::Object(params));
        Value::Object(body)
    }
}

/// Filter bucket holding exactly one metric
#[derive(Debug, Clone, PartialEq)]
pub struct FilterAggregation {
    pub name: String,
    pub filter: Value,
    pub metric: MetricAggregation,
}

impl FilterAggregation {
    pub fn body(&self) -> Value {
        let mut aggs = Map::new();
        aggs.insert(self.metric.name.clone(), self.metric.body());
        json!({
            "filter": self.filter,
            "aggs": aggs,
        })
    }
}

/// One top-level aggregation of the request
#[derive(Debug, Clone, PartialEq)]
pub enum AggregationNode {
    Metric(MetricAggregation),
    Filter(FilterAggregation),
}

impl AggregationNode {
    pub fn name(&self) -> &str {
        match self {
            AggregationNode::Metric(m) => &m.name,
            AggregationNode::Filter(f) => &f.name,
        }
    }

    /// Request body for this node, without its name key
    pub fn body(&self) -> Value {
        match self {
            AggregationNode::Metric(m) => m.body(),
            AggregationNode::Filter(f) => f.body(),
        }
    }

    /// The metric doing the actual computation
    pub fn metric(&self) -> &MetricAggregation {
        match self {
            AggregationNode::Metric(m) => m,
            AggregationNode::Filter(f) => &f.metric,
        }
    }
}

/// Full aggregation section of a request, in declaration order
#[derive(Debug, Clone, Default, PartialEq)]
pub struct AggregationRequest {
    nodes: Vec<AggregationNode>,
}

impl AggregationRequest {
    pub fn new(nodes: Vec<AggregationNode>) -> Self {
        Self { nodes }
    }

    pub fn nodes(&self) -> &[AggregationNode] {
        &self.nodes
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    pub fn to_json(&self) -> Value {
        let mut aggs = Map::new();
        for node in &self.nodes {
            aggs.insert(node.name().to_string(), node.body());
        }
        Value::Object(aggs)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn metric(kind: MetricKind) -> MetricAggregation {
        MetricAggregation {
            name: "m".into(),
            kind,
            source: MetricSource::Field("age".into()),
        }
    }

    #[test]
    fn test_extended_stats_carries_sigma() {
        let body = metric(MetricKind::ExtendedStats { sigma: EXTENDED_STATS_SIGMA }).body();
        assert_eq!(
            serde_json::to_string(&body).unwrap(),
            r#"{"extended_stats":{"field":"age","sigma":2.0}}"#
        );
    }

    #[test]
    fn test_filter_bucket_nests_metric_by_name() {
        let node = AggregationNode::Filter(FilterAggregation {
            name: "m".into(),
            filter: json!({"range": {"age": {"gt": 30}}}),
            metric: metric(MetricKind::Avg),
        });

        assert_eq!(
            AggregationRequest::new(vec![node]).to_json(),
            json!({"m": {
                "filter": {"range": {"age": {"gt": 30}}},
                "aggs": {"m": {"avg": {"field": "age"}}}
            }})
        );
    }

    #[test]
    fn test_request_preserves_declaration_order() {
        let mut second = metric(MetricKind::Max);
        second.name = "a".into();
        let mut first = metric(MetricKind::Min);
        first.name = "z".into();

        let request = AggregationRequest::new(vec![
            AggregationNode::Metric(first),
            AggregationNode::Metric(second),
        ]);
        let rendered = serde_json::to_string(&request.to_json()).unwrap();
        assert!(rendered.find("\"z\"").unwrap() < rendered.find("\"a\"").unwrap());
    }
}
