//! Native filter query builder
//!
//! Comparisons between a field reference and a literal become `term` and
//! `range` queries; boolean connectives become `bool` clauses. Any other
//! boolean expression is shipped as a script query.

use std::sync::Arc;

use serde_json::{json, Value};

use crate::expression::{ExpressionSerializer, ScalarExpr};
use crate::value::ExprType;

use super::errors::{FilterError, FilterResult};

/// Compiles a boolean condition into a native filter predicate
pub trait FilterCompiler {
    fn compile(&self, condition: &ScalarExpr) -> FilterResult<Value>;
}

/// Path used for exact-value operations on a field.
///
/// Analysed text fields are matched through their `.keyword` subfield.
pub(crate) fn exact_field_path(attr: &str, ty: ExprType) -> String {
    match ty {
        ExprType::Text => format!("{}.keyword", attr),
        _ => attr.to_string(),
    }
}

/// Default filter compiler
#[derive(Clone)]
pub struct FilterQueryBuilder {
    serializer: Arc<dyn ExpressionSerializer>,
}

impl FilterQueryBuilder {
    pub fn new(serializer: Arc<dyn ExpressionSerializer>) -> Self {
        Self { serializer }
    }

    fn build(&self, condition: &ScalarExpr) -> FilterResult<Value> {
        let (name, args) = match condition {
            ScalarExpr::Function { name, args } => (name.as_str(), args.as_slice()),
            other => return Err(FilterError::UnsupportedCondition(other.to_string())),
        };

        match (name, args) {
            ("and", [l, r]) => Ok(json!({"bool": {"filter": [self.build(l)?, self.build(r)?]}})),
            ("or", [l, r]) => Ok(json!({
                "bool": {"should": [self.build(l)?, self.build(r)?], "minimum_should_match": 1}
            })),
            ("not", [inner]) => Ok(json!({"bool": {"must_not": [self.build(inner)?]}})),
            (op, [l, r]) => match Self::comparison(op, l, r) {
                Some(query) => Ok(query),
                None => self.script_query(condition),
            },
            _ => self.script_query(condition),
        }
    }

    /// Native query for `reference <op> literal`, in either operand order.
    fn comparison(op: &str, left: &ScalarExpr, right: &ScalarExpr) -> Option<Value> {
        let (attr, ty, value, op) = match (left, right) {
            (ScalarExpr::Reference { attr, ty }, ScalarExpr::Literal { value }) => {
                (attr, *ty, value, op)
            }
            (ScalarExpr::Literal { value }, ScalarExpr::Reference { attr, ty }) => {
                (attr, *ty, value, Self::flip(op)?)
            }
            _ => return None,
        };

        let range_path = attr.as_str();
        let term = || json!({"term": {exact_field_path(attr, ty): {"value": value}}});

        match op {
            "=" => Some(term()),
            "!=" => Some(json!({"bool": {"must_not": [term()]}})),
            ">" => Some(json!({"range": {range_path: {"gt": value}}})),
            ">=" => Some(json!({"range": {range_path: {"gte": value}}})),
            "<" => Some(json!({"range": {range_path: {"lt": value}}})),
            "<=" => Some(json!({"range": {range_path: {"lte": value}}})),
            _ => None,
        }
    }

    fn flip(op: &str) -> Option<&'static str> {
        match op {
            "=" => Some("="),
            "!=" => Some("!="),
            ">" => Some("<"),
            ">=" => Some("<="),
            "<" => Some(">"),
            "<=" => Some(">="),
            _ => None,
        }
    }

    fn script_query(&self, condition: &ScalarExpr) -> FilterResult<Value> {
        let script = self.serializer.script(condition)?;
        Ok(json!({"script": {"script": script}}))
    }
}

impl FilterCompiler for FilterQueryBuilder {
    fn compile(&self, condition: &ScalarExpr) -> FilterResult<Value> {
        self.build(condition)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::expression::JsonExpressionSerializer;

    fn builder() -> FilterQueryBuilder {
        FilterQueryBuilder::new(Arc::new(JsonExpressionSerializer::new()))
    }

    fn age() -> ScalarExpr {
        ScalarExpr::reference("age", ExprType::Integer)
    }

    #[test]
    fn test_range_query() {
        let query = builder()
            .compile(&ScalarExpr::gt(age(), ScalarExpr::literal(30)))
            .unwrap();
        assert_eq!(query, json!({"range": {"age": {"gt": 30}}}));
    }

    #[test]
    fn test_literal_on_left_flips_operator() {
        let query = builder()
            .compile(&ScalarExpr::lt(ScalarExpr::literal(30), age()))
            .unwrap();
        assert_eq!(query, json!({"range": {"age": {"gt": 30}}}));
    }

    #[test]
    fn test_term_on_text_uses_keyword() {
        let name = ScalarExpr::reference("name", ExprType::Text);
        let query = builder()
            .compile(&ScalarExpr::eq(name, ScalarExpr::literal("Amber")))
            .unwrap();
        assert_eq!(query, json!({"term": {"name.keyword": {"value": "Amber"}}}));
    }

    #[test]
    fn test_boolean_connectives() {
        let cond = ScalarExpr::or(
            ScalarExpr::ne(age(), ScalarExpr::literal(1)),
            ScalarExpr::not(ScalarExpr::lte(age(), ScalarExpr::literal(5))),
        );
        let query = builder().compile(&cond).unwrap();
        assert_eq!(
            query,
            json!({"bool": {
                "should": [
                    {"bool": {"must_not": [{"term": {"age": {"value": 1}}}]}},
                    {"bool": {"must_not": [{"range": {"age": {"lte": 5}}}]}}
                ],
                "minimum_should_match": 1
            }})
        );
    }

    #[test]
    fn test_non_native_condition_becomes_script() {
        let cond = ScalarExpr::gt(
            ScalarExpr::function("abs", vec![age()]),
            ScalarExpr::literal(3),
        );
        let query = builder().compile(&cond).unwrap();

        let script = &query["script"]["script"];
        assert_eq!(script["lang"], "opensearch_query_expression");
        let restored = JsonExpressionSerializer::new()
            .deserialize(script["source"].as_str().unwrap())
            .unwrap();
        assert_eq!(restored, cond);
    }

    #[test]
    fn test_bare_reference_rejected() {
        let err = builder().compile(&age()).unwrap_err();
        assert_eq!(err, FilterError::UnsupportedCondition("age".into()));
    }
}
