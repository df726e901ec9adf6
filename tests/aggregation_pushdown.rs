//! Aggregation Pushdown Tests
//!
//! Tests for the aggregation compiler and its parsers:
//! - Every function kind maps to one native node and one parser
//! - COUNT over a literal counts documents
//! - Filter-guarded aggregates decode what they request
//! - Unsupported functions and expressions fail before execution

use std::sync::Arc;

use docscan::aggregation::{
    AggregateFunctionKind, AggregationError, AggregationNode, MetricAggregationBuilder, MetricKind,
    NamedAggregate,
};
use docscan::expression::{JsonExpressionSerializer, ScalarExpr};
use docscan::response::AggregationResponseParser;
use docscan::value::{ExprType, ExprValue};
use serde_json::{json, Map, Value};

// =============================================================================
// Helper Functions
// =============================================================================

fn builder() -> MetricAggregationBuilder {
    MetricAggregationBuilder::new(Arc::new(JsonExpressionSerializer::new()))
}

fn age() -> ScalarExpr {
    ScalarExpr::reference("age", ExprType::Integer)
}

/// Renders the bucket an index would answer a node with, every metric
/// field set to `value`.
fn render_sample(node: &AggregationNode, value: &Value) -> Value {
    match node {
        AggregationNode::Metric(metric) => match metric.kind {
            MetricKind::ExtendedStats { .. } => json!({
                "count": 4,
                "variance_population": value,
                "variance_sampling": value,
                "std_deviation_population": value,
                "std_deviation_sampling": value,
            }),
            _ => json!({ "value": value }),
        },
        AggregationNode::Filter(filter) => {
            let mut bucket = Map::new();
            bucket.insert("doc_count".into(), json!(4));
            bucket.insert(
                filter.name.clone(),
                render_sample(&AggregationNode::Metric(filter.metric.clone()), value),
            );
            Value::Object(bucket)
        }
    }
}

fn round_trip(aggregate: NamedAggregate, value: Value) -> ExprValue {
    let compiled = builder().compile(&aggregate).unwrap();
    let mut reply = Map::new();
    reply.insert(aggregate.name.clone(), render_sample(&compiled.node, &value));

    let parser = AggregationResponseParser::new(vec![compiled.parser]);
    let row = parser.parse(Some(&Value::Object(reply))).unwrap();
    row.get(&aggregate.name).cloned().unwrap()
}

// =============================================================================
// Native Node Tests
// =============================================================================

/// Each function kind renders its native node.
#[test]
fn test_node_per_function_kind() {
    let cases = [
        (AggregateFunctionKind::Avg, json!({"avg": {"field": "age"}})),
        (AggregateFunctionKind::Sum, json!({"sum": {"field": "age"}})),
        (AggregateFunctionKind::Count, json!({"value_count": {"field": "age"}})),
        (AggregateFunctionKind::Min, json!({"min": {"field": "age"}})),
        (AggregateFunctionKind::Max, json!({"max": {"field": "age"}})),
        (
            AggregateFunctionKind::VarPop,
            json!({"extended_stats": {"field": "age", "sigma": 2.0}}),
        ),
        (
            AggregateFunctionKind::VarSamp,
            json!({"extended_stats": {"field": "age", "sigma": 2.0}}),
        ),
        (
            AggregateFunctionKind::StddevPop,
            json!({"extended_stats": {"field": "age", "sigma": 2.0}}),
        ),
        (
            AggregateFunctionKind::StddevSamp,
            json!({"extended_stats": {"field": "age", "sigma": 2.0}}),
        ),
    ];

    for (function, expected) in cases {
        let compiled = builder()
            .compile(&NamedAggregate::new("agg", function, vec![age()]))
            .unwrap();
        assert_eq!(compiled.node.body(), expected, "{}", function.as_str());
    }
}

/// TEXT fields aggregate over their keyword sub-field.
#[test]
fn test_text_field_uses_keyword() {
    let compiled = builder()
        .compile(&NamedAggregate::new(
            "count(name)",
            AggregateFunctionKind::Count,
            vec![ScalarExpr::reference("name", ExprType::Text)],
        ))
        .unwrap();
    assert_eq!(
        compiled.node.body(),
        json!({"value_count": {"field": "name.keyword"}})
    );
}

/// COUNT(*) and COUNT(1) compile exactly like COUNT(_index).
#[test]
fn test_count_literal_counts_documents() {
    let render = |argument: ScalarExpr| {
        builder()
            .build(&[NamedAggregate::new(
                "count",
                AggregateFunctionKind::Count,
                vec![argument],
            )])
            .unwrap()
            .request()
            .to_json()
    };

    let identity = render(ScalarExpr::reference("_index", ExprType::Integer));
    assert_eq!(render(ScalarExpr::literal("*")), identity);
    assert_eq!(render(ScalarExpr::literal(1)), identity);
}

/// Node order and parser order follow declaration order.
#[test]
fn test_declaration_order_preserved() {
    let compiled = builder()
        .build(&[
            NamedAggregate::new("max(age)", AggregateFunctionKind::Max, vec![age()]),
            NamedAggregate::new("avg(age)", AggregateFunctionKind::Avg, vec![age()]),
            NamedAggregate::new(
                "count(*)",
                AggregateFunctionKind::Count,
                vec![ScalarExpr::literal("*")],
            ),
        ])
        .unwrap();

    let rendered = compiled.request().to_json();
    let keys: Vec<_> = rendered.as_object().unwrap().keys().cloned().collect();
    assert_eq!(keys, vec!["max(age)", "avg(age)", "count(*)"]);

    let row = compiled
        .response_parser()
        .parse(Some(&json!({
            "count(*)": {"value": 9},
            "avg(age)": {"value": 30.5},
            "max(age)": {"value": 61},
        })))
        .unwrap();
    assert_eq!(row.names().collect::<Vec<_>>(), keys);
}

// =============================================================================
// Round Trip Tests
// =============================================================================

/// Single-value and stats parsers read back what the node asks for.
#[test]
fn test_round_trip_per_kind() {
    for function in AggregateFunctionKind::ALL {
        let value = round_trip(NamedAggregate::new("agg", function, vec![age()]), json!(12.25));
        assert_eq!(value, ExprValue::Double(12.25), "{}", function.as_str());
    }
}

/// Filter-guarded aggregates decode through the nested bucket.
#[test]
fn test_filter_guarded_round_trip() {
    for function in AggregateFunctionKind::ALL {
        let aggregate = NamedAggregate::new("guarded", function, vec![age()])
            .with_condition(ScalarExpr::gte(age(), ScalarExpr::literal(18)));
        assert_eq!(round_trip(aggregate, json!(7)), ExprValue::Long(7));
    }
}

/// A missing bucket decodes to null rather than failing.
#[test]
fn test_missing_bucket_is_null() {
    let compiled = builder()
        .build(&[NamedAggregate::new("avg(age)", AggregateFunctionKind::Avg, vec![age()])])
        .unwrap();

    let row = compiled.response_parser().parse(Some(&json!({}))).unwrap();
    assert_eq!(row.get("avg(age)"), Some(&ExprValue::Null));
}

/// A reply without an aggregations section is a decode failure.
#[test]
fn test_absent_aggregations_fails() {
    let compiled = builder()
        .build(&[NamedAggregate::new("avg(age)", AggregateFunctionKind::Avg, vec![age()])])
        .unwrap();

    assert!(compiled.response_parser().parse(None).is_err());
}

// =============================================================================
// Rejection Tests
// =============================================================================

/// Unknown function names are rejected by name.
#[test]
fn test_unknown_function_rejected() {
    let err = NamedAggregate::from_function_name("median(age)", "median", vec![age()]).unwrap_err();
    assert_eq!(
        err,
        AggregationError::UnsupportedAggregateFunction("median".into())
    );
    assert!(err.to_string().contains("unsupported aggregator median"));
}

/// COUNT over an aliased expression has no native form.
#[test]
fn test_count_over_named_expression_rejected() {
    let err = builder()
        .compile(&NamedAggregate::new(
            "count(a)",
            AggregateFunctionKind::Count,
            vec![ScalarExpr::named("a", age())],
        ))
        .unwrap_err();

    assert!(matches!(err, AggregationError::UnsupportedExpressionInMetric(_)));
    assert!(err
        .to_string()
        .starts_with("metric aggregation doesn't support expression"));
}
