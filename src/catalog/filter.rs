//! Filter expression builder
//!
//! v3 collections take a `_filters` query parameter holding a JSON array of
//! `[field, operator, value]` triples.

use serde_json::Value;
use std::fmt;

/// Query parameter carrying the filter expression
pub const FILTER_PARAM: &str = "_filters";

/// Comparison operators used by a filter
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OperatorStyle {
    /// `>=` and `<=`
    Plain,
    /// `D>=` and `D<=`, the date-aware comparison tickets require
    Date,
}

impl OperatorStyle {
    fn operators(self) -> (&'static str, &'static str) {
        match self {
            OperatorStyle::Plain => (">=", "<="),
            OperatorStyle::Date => ("D>=", "D<="),
        }
    }
}

/// Inclusive date range filter over one field
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FilterExpression {
    field: String,
    from: String,
    until: String,
    style: OperatorStyle,
}

impl FilterExpression {
    pub fn new(
        field: impl Into<String>,
        from: impl Into<String>,
        until: impl Into<String>,
        style: OperatorStyle,
    ) -> Self {
        Self {
            field: field.into(),
            from: from.into(),
            until: until.into(),
            style,
        }
    }

    pub fn field(&self) -> &str {
        &self.field
    }

    /// Render the compact JSON text sent to the API
    pub fn render(&self) -> String {
        let (lower, upper) = self.style.operators();
        let triples = Value::Array(vec![
            triple(&self.field, lower, &self.from),
            triple(&self.field, upper, &self.until),
        ]);
        triples.to_string()
    }
}

fn triple(field: &str, op: &str, value: &str) -> Value {
    Value::Array(vec![
        Value::String(field.to_string()),
        Value::String(op.to_string()),
        Value::String(value.to_string()),
    ])
}

impl fmt::Display for FilterExpression {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.render())
    }
}
