//! Scalar values and metric cells.
//!
//! A metric is a single named scalar whose kind (integer, float, or text) is
//! fixed at registration time. Values render to the textual form that ends
//! up in log lines: decimal integers, fixed 6-decimal floats, quoted text.

use std::fmt;

use serde::Deserialize;

/// Scalar kind of a metric, fixed at registration time.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ScalarKind {
    Int,
    Float,
    Text,
}

impl ScalarKind {
    /// String representation used in error messages and config files.
    pub fn as_str(self) -> &'static str {
        match self {
            ScalarKind::Int => "int",
            ScalarKind::Float => "float",
            ScalarKind::Text => "text",
        }
    }
}

impl fmt::Display for ScalarKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A scalar metric value.
///
/// Deserializes untagged so config defaults read naturally
/// (`default: 0`, `default: 0.5`, `default: "/"`).
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(untagged)]
pub enum Value {
    Int(i64),
    Float(f64),
    Text(String),
}

impl Value {
    /// The kind of this value.
    pub fn kind(&self) -> ScalarKind {
        match self {
            Value::Int(_) => ScalarKind::Int,
            Value::Float(_) => ScalarKind::Float,
            Value::Text(_) => ScalarKind::Text,
        }
    }

    /// Render the value for a log line.
    ///
    /// Integers are plain decimal, floats use a fixed 6-decimal format
    /// (`0.750000`), text is wrapped in double quotes. Embedded quotes in
    /// text are not escaped; callers own their metric contents.
    pub fn render(&self) -> String {
        match self {
            Value::Int(v) => v.to_string(),
            Value::Float(v) => format!("{v:.6}"),
            Value::Text(v) => format!("\"{v}\""),
        }
    }
}

impl From<i64> for Value {
    fn from(v: i64) -> Self {
        Value::Int(v)
    }
}

impl From<f64> for Value {
    fn from(v: f64) -> Self {
        Value::Float(v)
    }
}

impl From<&str> for Value {
    fn from(v: &str) -> Self {
        Value::Text(v.to_string())
    }
}

impl From<String> for Value {
    fn from(v: String) -> Self {
        Value::Text(v)
    }
}

/// A single named value cell.
///
/// Holds the current value and the default it resets to after each snapshot.
/// The kind of `value` always equals the kind of `default`; the registry
/// enforces this on every update.
#[derive(Debug, Clone)]
pub struct Metric {
    name: String,
    value: Value,
    default: Value,
}

impl Metric {
    /// Create a metric initialized to its default.
    pub fn new(name: impl Into<String>, default: Value) -> Self {
        Self {
            name: name.into(),
            value: default.clone(),
            default,
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    /// Registered kind, fixed for the lifetime of the metric.
    pub fn kind(&self) -> ScalarKind {
        self.default.kind()
    }

    pub fn value(&self) -> &Value {
        &self.value
    }

    /// Replace the stored value. The caller must have checked the kind.
    pub(crate) fn set(&mut self, value: Value) {
        self.value = value;
    }

    /// Render the current value.
    pub fn render(&self) -> String {
        self.value.render()
    }

    /// Revert to the registered default.
    pub fn reset(&mut self) {
        self.value = self.default.clone();
    }
}
