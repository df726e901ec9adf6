//! Metric aggregation compiler
//!
//! Compiles each named aggregate into a request node and the parser that
//! reads its result back. Both halves come out of one function call so the
//! two trees cannot drift apart.
//!
//! | function                               | native node      | parser        |
//! |----------------------------------------|------------------|---------------|
//! | avg / sum / min / max                  | same-named metric| single value  |
//! | count                                  | value_count      | single value  |
//! | var_pop / var_samp / stddev_pop / _samp| extended_stats   | stats field   |

use std::sync::Arc;

use crate::expression::{ExpressionSerializer, ScalarExpr};
use crate::filter::{FilterCompiler, FilterQueryBuilder};
use crate::response::{AggregationResponseParser, MetricParser, StatsSelector};
use crate::value::ExprType;

use super::errors::AggregationResult;
use super::helper::AggregationBuilderHelper;
use super::named::{AggregateFunctionKind, NamedAggregate};
use super::node::{
    AggregationNode, AggregationRequest, FilterAggregation, MetricAggregation, MetricKind,
    EXTENDED_STATS_SIGMA,
};

/// Metadata field present on every document; counting it counts matches.
pub const DOCUMENT_IDENTITY_FIELD: &str = "_index";

/// A request node together with the parser that decodes it
#[derive(Debug, Clone, PartialEq)]
pub struct CompiledAggregation {
    pub node: AggregationNode,
    pub parser: MetricParser,
}

/// Compiled aggregates in declaration order
#[derive(Debug, Clone, Default, PartialEq)]
pub struct CompiledAggregations {
    aggregations: Vec<CompiledAggregation>,
}

impl CompiledAggregations {
    pub fn iter(&self) -> impl Iterator<Item = &CompiledAggregation> {
        self.aggregations.iter()
    }

    pub fn len(&self) -> usize {
        self.aggregations.len()
    }

    pub fn is_empty(&self) -> bool {
        self.aggregations.is_empty()
    }

    pub fn request(&self) -> AggregationRequest {
        AggregationRequest::new(self.aggregations.iter().map(|a| a.node.clone()).collect())
    }

    pub fn response_parser(&self) -> AggregationResponseParser {
        AggregationResponseParser::new(self.aggregations.iter().map(|a| a.parser.clone()).collect())
    }

    pub fn into_parts(self) -> (AggregationRequest, AggregationResponseParser) {
        let (nodes, parsers) = self
            .aggregations
            .into_iter()
            .map(|a| (a.node, a.parser))
            .unzip();
        (
            AggregationRequest::new(nodes),
            AggregationResponseParser::new(parsers),
        )
    }
}

/// Builds native metric aggregations from named aggregates
#[derive(Clone)]
pub struct MetricAggregationBuilder {
    helper: AggregationBuilderHelper,
    filter: Arc<dyn FilterCompiler>,
}

impl MetricAggregationBuilder {
    /// Creates a builder using the default filter compiler
    pub fn new(serializer: Arc<dyn ExpressionSerializer>) -> Self {
        let filter = Arc::new(FilterQueryBuilder::new(serializer.clone()));
        Self::with_filter_compiler(serializer, filter)
    }

    pub fn with_filter_compiler(
        serializer: Arc<dyn ExpressionSerializer>,
        filter: Arc<dyn FilterCompiler>,
    ) -> Self {
        Self {
            helper: AggregationBuilderHelper::new(serializer),
            filter,
        }
    }

    /// Compiles all aggregates, stopping at the first failure.
    pub fn build(&self, aggregates: &[NamedAggregate]) -> AggregationResult<CompiledAggregations> {
        let aggregations = aggregates
            .iter()
            .map(|agg| self.compile(agg))
            .collect::<AggregationResult<Vec<_>>>()?;
        Ok(CompiledAggregations { aggregations })
    }

    /// Compiles one aggregate into its node and parser.
    pub fn compile(&self, aggregate: &NamedAggregate) -> AggregationResult<CompiledAggregation> {
        let name = aggregate.name.as_str();
        let argument = aggregate.argument()?;

        let single = |kind| (kind, argument.clone(), MetricParser::single_value(name));
        let (kind, argument, parser) = match aggregate.function {
            AggregateFunctionKind::Avg => single(MetricKind::Avg),
            AggregateFunctionKind::Sum => single(MetricKind::Sum),
            AggregateFunctionKind::Min => single(MetricKind::Min),
            AggregateFunctionKind::Max => single(MetricKind::Max),
            AggregateFunctionKind::Count => (
                MetricKind::ValueCount,
                replace_star_or_literal(argument),
                MetricParser::single_value(name),
            ),
            AggregateFunctionKind::VarPop => {
                Self::stats(name, argument, StatsSelector::VariancePopulation)
            }
            AggregateFunctionKind::VarSamp => {
                Self::stats(name, argument, StatsSelector::VarianceSampling)
            }
            AggregateFunctionKind::StddevPop => {
                Self::stats(name, argument, StatsSelector::StdDeviationPopulation)
            }
            AggregateFunctionKind::StddevSamp => {
                Self::stats(name, argument, StatsSelector::StdDeviationSampling)
            }
        };

        let metric = MetricAggregation {
            name: name.to_string(),
            kind,
            source: self.helper.build(&argument)?,
        };

        match &aggregate.condition {
            None => Ok(CompiledAggregation {
                node: AggregationNode::Metric(metric),
                parser,
            }),
            Some(condition) => Ok(CompiledAggregation {
                node: AggregationNode::Filter(FilterAggregation {
                    name: name.to_string(),
                    filter: self.filter.compile(condition)?,
                    metric,
                }),
                parser: MetricParser::filter(name, parser),
            }),
        }
    }

    fn stats(
        name: &str,
        argument: &ScalarExpr,
        selector: StatsSelector,
    ) -> (MetricKind, ScalarExpr, MetricParser) {
        (
            MetricKind::ExtendedStats {
                sigma: EXTENDED_STATS_SIGMA,
            },
            argument.clone(),
            MetricParser::stats(name, selector),
        )
    }
}

/// COUNT over any literal, `*` included, counts documents: value_count over
/// the identity field matches every document that passed the filter.
fn replace_star_or_literal(argument: &ScalarExpr) -> ScalarExpr {
    if argument.is_literal() {
        ScalarExpr::reference(DOCUMENT_IDENTITY_FIELD, ExprType::Integer)
    } else {
        argument.clone()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::aggregation::AggregationError;
    use crate::expression::JsonExpressionSerializer;
    use serde_json::{json, Value};

    fn builder() -> MetricAggregationBuilder {
        MetricAggregationBuilder::new(Arc::new(JsonExpressionSerializer::new()))
    }

    fn age() -> ScalarExpr {
        ScalarExpr::reference("age", ExprType::Integer)
    }

    fn render(aggregates: Vec<NamedAggregate>) -> Value {
        builder().build(&aggregates).unwrap().request().to_json()
    }

    #[test]
    fn test_avg() {
        assert_eq!(
            render(vec![NamedAggregate::new(
                "avg(age)",
                AggregateFunctionKind::Avg,
                vec![age()]
            )]),
            json!({"avg(age)": {"avg": {"field": "age"}}})
        );
    }

    #[test]
    fn test_count_over_field_keeps_field() {
        assert_eq!(
            render(vec![NamedAggregate::new(
                "count(age)",
                AggregateFunctionKind::Count,
                vec![age()]
            )]),
            json!({"count(age)": {"value_count": {"field": "age"}}})
        );
    }

    #[test]
    fn test_count_star_counts_identity_field() {
        assert_eq!(
            render(vec![NamedAggregate::new(
                "count(*)",
                AggregateFunctionKind::Count,
                vec![ScalarExpr::literal("*")]
            )]),
            json!({"count(*)": {"value_count": {"field": "_index"}}})
        );
    }

    #[test]
    fn test_variance_kinds_share_extended_stats() {
        for (function, name) in [
            (AggregateFunctionKind::VarPop, "var_pop(age)"),
            (AggregateFunctionKind::VarSamp, "var_samp(age)"),
            (AggregateFunctionKind::StddevPop, "stddev_pop(age)"),
            (AggregateFunctionKind::StddevSamp, "stddev_samp(age)"),
        ] {
            let rendered = render(vec![NamedAggregate::new(name, function, vec![age()])]);
            assert_eq!(
                serde_json::to_string(&rendered[name]).unwrap(),
                r#"{"extended_stats":{"field":"age","sigma":2.0}}"#
            );
        }
    }

    #[test]
    fn test_filter_condition_wraps_node_and_parser() {
        let compiled = builder()
            .compile(
                &NamedAggregate::new("avg(age)", AggregateFunctionKind::Avg, vec![age()])
                    .with_condition(ScalarExpr::gt(age(), ScalarExpr::literal(30))),
            )
            .unwrap();

        assert_eq!(
            compiled.node.body(),
            json!({
                "filter": {"range": {"age": {"gt": 30}}},
                "aggs": {"avg(age)": {"avg": {"field": "age"}}}
            })
        );
        assert_eq!(
            compiled.parser,
            MetricParser::filter("avg(age)", MetricParser::single_value("avg(age)"))
        );
    }

    #[test]
    fn test_function_argument_becomes_script() {
        let compiled = builder()
            .compile(&NamedAggregate::new(
                "sum(abs(age))",
                AggregateFunctionKind::Sum,
                vec![ScalarExpr::function("abs", vec![age()])],
            ))
            .unwrap();

        let body = compiled.node.body();
        assert!(body["sum"].get("field").is_none());
        assert_eq!(body["sum"]["script"]["lang"], "opensearch_query_expression");
    }

    #[test]
    fn test_first_failure_stops_build() {
        let err = builder()
            .build(&[
                NamedAggregate::new("avg(age)", AggregateFunctionKind::Avg, vec![age()]),
                NamedAggregate::new(
                    "max(1)",
                    AggregateFunctionKind::Max,
                    vec![ScalarExpr::literal(1)],
                ),
            ])
            .unwrap_err();
        assert_eq!(err, AggregationError::UnsupportedExpressionInMetric("1".into()));
    }

    #[test]
    fn test_into_parts_keeps_pairs_aligned() {
        let compiled = builder()
            .build(&[
                NamedAggregate::new("min(age)", AggregateFunctionKind::Min, vec![age()]),
                NamedAggregate::new(
                    "stddev_pop(age)",
                    AggregateFunctionKind::StddevPop,
                    vec![age()],
                ),
            ])
            .unwrap();
        let (request, parser) = compiled.into_parts();

        let node_names: Vec<_> = request.nodes().iter().map(|n| n.name()).collect();
        let parser_names: Vec<_> = parser.parsers().iter().map(|p| p.name()).collect();
        assert_eq!(node_names, parser_names);
    }
}
