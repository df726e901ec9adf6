//! Named aggregate expressions

use std::fmt;
use std::str::FromStr;

use crate::expression::ScalarExpr;

use super::errors::AggregationError;

/// Closed set of aggregate functions the compiler can push down
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum AggregateFunctionKind {
    Avg,
    Sum,
    Count,
    Min,
    Max,
    VarSamp,
    VarPop,
    StddevSamp,
    StddevPop,
}

impl AggregateFunctionKind {
    pub const ALL: [AggregateFunctionKind; 9] = [
        AggregateFunctionKind::Avg,
        AggregateFunctionKind::Sum,
        AggregateFunctionKind::Count,
        AggregateFunctionKind::Min,
        AggregateFunctionKind::Max,
        AggregateFunctionKind::VarSamp,
        AggregateFunctionKind::VarPop,
        AggregateFunctionKind::StddevSamp,
        AggregateFunctionKind::StddevPop,
    ];

    /// Function name as written in queries
    pub fn as_str(&self) -> &'static str {
        match self {
            AggregateFunctionKind::Avg => "avg",
            AggregateFunctionKind::Sum => "sum",
            AggregateFunctionKind::Count => "count",
            AggregateFunctionKind::Min => "min",
            AggregateFunctionKind::Max => "max",
            AggregateFunctionKind::VarSamp => "var_samp",
            AggregateFunctionKind::VarPop => "var_pop",
            AggregateFunctionKind::StddevSamp => "stddev_samp",
            AggregateFunctionKind::StddevPop => "stddev_pop",
        }
    }
}

impl fmt::Display for AggregateFunctionKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl FromStr for AggregateFunctionKind {
    type Err = AggregationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let lowered = s.to_ascii_lowercase();
        Self::ALL
            .into_iter()
            .find(|kind| kind.as_str() == lowered)
            .ok_or_else(|| AggregationError::UnsupportedAggregateFunction(s.to_string()))
    }
}

/// One aggregate in the output, keyed by its unique name
#[derive(Debug, Clone, PartialEq)]
pub struct NamedAggregate {
    /// Output key; callers keep it unique within one request
    pub name: String,
    pub function: AggregateFunctionKind,
    pub arguments: Vec<ScalarExpr>,
    /// Per-aggregate FILTER clause
    pub condition: Option<ScalarExpr>,
}

impl NamedAggregate {
    pub fn new(
        name: impl Into<String>,
        function: AggregateFunctionKind,
        arguments: Vec<ScalarExpr>,
    ) -> Self {
        Self {
            name: name.into(),
            function,
            arguments,
            condition: None,
        }
    }

    /// Builds an aggregate from a function name, rejecting unknown functions.
    pub fn from_function_name(
        name: impl Into<String>,
        function: &str,
        arguments: Vec<ScalarExpr>,
    ) -> Result<Self, AggregationError> {
        Ok(Self::new(name, function.parse()?, arguments))
    }

    pub fn with_condition(mut self, condition: ScalarExpr) -> Self {
        self.condition = Some(condition);
        self
    }

    /// First argument, which every supported function aggregates over
    pub fn argument(&self) -> Result<&ScalarExpr, AggregationError> {
        self.arguments
            .first()
            .ok_or_else(|| AggregationError::MissingAggregateArgument(self.name.clone()))
    }
}
