//! Sort keys pushed down to the index

use serde::{Deserialize, Serialize};
use serde_json::{json, Map, Value};

use crate::filter::exact_field_path;
use crate::value::ExprType;

/// Field used for the tie-break sort when none was pushed down
pub const DOC_ORDER_FIELD: &str = "_doc";

/// Sort direction
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SortDirection {
    #[default]
    Asc,
    Desc,
}

impl SortDirection {
    pub fn as_str(&self) -> &'static str {
        match self {
            SortDirection::Asc => "asc",
            SortDirection::Desc => "desc",
        }
    }
}

/// Placement of documents missing the sort field
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum NullOrder {
    First,
    Last,
}

impl NullOrder {
    pub fn as_str(&self) -> &'static str {
        match self {
            NullOrder::First => "_first",
            NullOrder::Last => "_last",
        }
    }
}

/// One sort clause
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SortKey {
    pub field: String,
    #[serde(default)]
    pub direction: SortDirection,
    #[serde(default)]
    pub missing: Option<NullOrder>,
    /// Declared field type; TEXT sorts on the keyword subfield
    #[serde(rename = "type", default = "unknown_type")]
    pub ty: ExprType,
}

fn unknown_type() -> ExprType {
    ExprType::Unknown
}

impl SortKey {
    pub fn asc(field: impl Into<String>) -> Self {
        Self {
            field: field.into(),
            direction: SortDirection::Asc,
            missing: None,
            ty: ExprType::Unknown,
        }
    }

    pub fn desc(field: impl Into<String>) -> Self {
        Self {
            field: field.into(),
            direction: SortDirection::Desc,
            missing: None,
            ty: ExprType::Unknown,
        }
    }

    pub fn with_missing(mut self, missing: NullOrder) -> Self {
        self.missing = Some(missing);
        self
    }

    pub fn with_type(mut self, ty: ExprType) -> Self {
        self.ty = ty;
        self
    }

    /// Stable document-order key
    pub fn doc_order() -> Self {
        Self::asc(DOC_ORDER_FIELD)
    }

    /// Native sort clause: `{"<field>": {"order": .., "missing": ..}}`
    pub fn to_json(&self) -> Value {
        let mut options = Map::new();
        options.insert("order".into(), json!(self.direction.as_str()));
        if let Some(missing) = self.missing {
            options.insert("missing".into(), json!(missing.as_str()));
        }
        let mut clause = Map::new();
        clause.insert(exact_field_path(&self.field, self.ty), Value::Object(options));
        Value::Object(clause)
    }
}
