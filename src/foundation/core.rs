use std::collections::BTreeMap;

use crate::foundation::error::{FuError, FuResult};

#[derive(
    Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, serde::Serialize, serde::Deserialize,
)]
#[serde(transparent)]
/// Opaque identifier of one object living inside the remote host.
pub struct HandleId(pub u64);

impl std::fmt::Display for HandleId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// Attribute dictionary as reported by the host (`GetAttrs`).
pub type Attrs = BTreeMap<String, Value>;

#[derive(Clone, Debug, PartialEq, Default, serde::Serialize, serde::Deserialize)]
#[serde(from = "ValueRepr", into = "ValueRepr")]
/// Dynamically typed value crossing the remote scripting boundary.
///
/// Host "arrays" are tables keyed by 1-based decimal strings; see [`Value::list`].
pub enum Value {
    /// Absent value (`nil`/`None` on the host side).
    #[default]
    Nil,
    /// Boolean.
    Bool(bool),
    /// Any host number (the host does not distinguish ints and floats).
    Number(f64),
    /// UTF-8 string.
    Text(String),
    /// String-keyed table.
    Table(BTreeMap<String, Value>),
    /// Reference to another remote object.
    Handle(HandleId),
}

impl Value {
    /// Build a 1-based host array.
    pub fn list(items: impl IntoIterator<Item = Value>) -> Self {
        Self::Table(
            items
                .into_iter()
                .enumerate()
                .map(|(i, v)| ((i + 1).to_string(), v))
                .collect(),
        )
    }

    /// Build a table from key/value pairs.
    pub fn table<K: Into<String>>(pairs: impl IntoIterator<Item = (K, Value)>) -> Self {
        Self::Table(pairs.into_iter().map(|(k, v)| (k.into(), v)).collect())
    }

    /// Short name of the value's dynamic type, used in diagnostics.
    pub fn type_name(&self) -> &'static str {
        match self {
            Self::Nil => "nil",
            Self::Bool(_) => "bool",
            Self::Number(_) => "number",
            Self::Text(_) => "text",
            Self::Table(_) => "table",
            Self::Handle(_) => "handle",
        }
    }

    /// `true` for [`Value::Nil`].
    pub fn is_nil(&self) -> bool {
        matches!(self, Self::Nil)
    }

    /// Host truthiness: `nil`, `false` and empty tables are falsy.
    pub fn is_truthy(&self) -> bool {
        match self {
            Self::Nil => false,
            Self::Bool(b) => *b,
            Self::Table(t) => !t.is_empty(),
            _ => true,
        }
    }

    pub fn as_f64(&self) -> Option<f64> {
        match self {
            Self::Number(n) => Some(*n),
            _ => None,
        }
    }

    pub fn as_bool(&self) -> Option<bool> {
        match self {
            Self::Bool(b) => Some(*b),
            Self::Number(n) => Some(*n != 0.0),
            _ => None,
        }
    }

    pub fn as_str(&self) -> Option<&str> {
        match self {
            Self::Text(s) => Some(s.as_str()),
            _ => None,
        }
    }

    pub fn as_table(&self) -> Option<&BTreeMap<String, Value>> {
        match self {
            Self::Table(t) => Some(t),
            _ => None,
        }
    }

    pub fn as_handle(&self) -> Option<HandleId> {
        match self {
            Self::Handle(h) => Some(*h),
            _ => None,
        }
    }

    /// Table values ordered by numeric key when keys are numbers, otherwise by key.
    ///
    /// Non-table values yield an empty list.
    pub fn seq_values(&self) -> Vec<&Value> {
        let Some(table) = self.as_table() else {
            return Vec::new();
        };
        let mut entries: Vec<(&String, &Value)> = table.iter().collect();
        entries.sort_by(|(a, _), (b, _)| match (a.parse::<f64>(), b.parse::<f64>()) {
            (Ok(x), Ok(y)) => x.total_cmp(&y),
            _ => a.cmp(b),
        });
        entries.into_iter().map(|(_, v)| v).collect()
    }

    /// Numbers of a host array, failing on any non-number entry.
    pub fn number_seq(&self, what: &str) -> FuResult<Vec<f64>> {
        self.seq_values()
            .into_iter()
            .map(|v| {
                v.as_f64().ok_or_else(|| {
                    FuError::remote(format!("{what}: expected number, got {}", v.type_name()))
                })
            })
            .collect()
    }

    /// Number or a descriptive remote error.
    pub fn expect_f64(&self, what: &str) -> FuResult<f64> {
        self.as_f64().ok_or_else(|| {
            FuError::remote(format!("{what}: expected number, got {}", self.type_name()))
        })
    }

    /// Boolean (numbers accepted) or a descriptive remote error.
    pub fn expect_bool(&self, what: &str) -> FuResult<bool> {
        self.as_bool().ok_or_else(|| {
            FuError::remote(format!("{what}: expected bool, got {}", self.type_name()))
        })
    }

    /// String or a descriptive remote error.
    pub fn expect_text(&self, what: &str) -> FuResult<String> {
        self.as_str().map(str::to_owned).ok_or_else(|| {
            FuError::remote(format!("{what}: expected text, got {}", self.type_name()))
        })
    }
}

impl From<bool> for Value {
    fn from(v: bool) -> Self {
        Self::Bool(v)
    }
}

impl From<f64> for Value {
    fn from(v: f64) -> Self {
        Self::Number(v)
    }
}

impl From<i32> for Value {
    fn from(v: i32) -> Self {
        Self::Number(f64::from(v))
    }
}

impl From<u32> for Value {
    fn from(v: u32) -> Self {
        Self::Number(f64::from(v))
    }
}

impl From<&str> for Value {
    fn from(v: &str) -> Self {
        Self::Text(v.to_owned())
    }
}

impl From<String> for Value {
    fn from(v: String) -> Self {
        Self::Text(v)
    }
}

impl From<HandleId> for Value {
    fn from(v: HandleId) -> Self {
        Self::Handle(v)
    }
}

impl From<Attrs> for Value {
    fn from(v: Attrs) -> Self {
        Self::Table(v)
    }
}

impl<T: Into<Value>> From<Option<T>> for Value {
    fn from(v: Option<T>) -> Self {
        v.map_or(Self::Nil, Into::into)
    }
}

// JSON shape: plain scalars/objects, with handles spelled `{"$handle": id}`.
#[derive(Clone, serde::Serialize, serde::Deserialize)]
#[serde(untagged)]
enum ValueRepr {
    Nil,
    Bool(bool),
    Number(f64),
    Text(String),
    Handle(HandleRef),
    Table(BTreeMap<String, ValueRepr>),
}

#[derive(Clone, serde::Serialize, serde::Deserialize)]
#[serde(deny_unknown_fields)]
struct HandleRef {
    #[serde(rename = "$handle")]
    handle: HandleId,
}

impl From<ValueRepr> for Value {
    fn from(r: ValueRepr) -> Self {
        match r {
            ValueRepr::Nil => Self::Nil,
            ValueRepr::Bool(b) => Self::Bool(b),
            ValueRepr::Number(n) => Self::Number(n),
            ValueRepr::Text(s) => Self::Text(s),
            ValueRepr::Handle(h) => Self::Handle(h.handle),
            ValueRepr::Table(t) => Self::Table(t.into_iter().map(|(k, v)| (k, v.into())).collect()),
        }
    }
}

impl From<Value> for ValueRepr {
    fn from(v: Value) -> Self {
        match v {
            Value::Nil => Self::Nil,
            Value::Bool(b) => Self::Bool(b),
            Value::Number(n) => Self::Number(n),
            Value::Text(s) => Self::Text(s),
            Value::Handle(handle) => Self::Handle(HandleRef { handle }),
            Value::Table(t) => Self::Table(t.into_iter().map(|(k, v)| (k, v.into())).collect()),
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Default, serde::Serialize, serde::Deserialize)]
/// RGB color with channels in `[0, 1]`, as used for tool tile/text colors.
pub struct Color {
    /// Red channel.
    pub r: f64,
    /// Green channel.
    pub g: f64,
    /// Blue channel.
    pub b: f64,
}

impl Color {
    pub fn new(r: f64, g: f64, b: f64) -> Self {
        Self { r, g, b }
    }

    /// Host table form `{R, G, B}`.
    pub fn to_value(self) -> Value {
        Value::table([
            ("R", Value::Number(self.r)),
            ("G", Value::Number(self.g)),
            ("B", Value::Number(self.b)),
        ])
    }

    /// Parse the host table form; `nil` means "no custom color".
    pub fn from_value(v: &Value) -> FuResult<Option<Self>> {
        if v.is_nil() {
            return Ok(None);
        }
        let t = v
            .as_table()
            .ok_or_else(|| FuError::remote(format!("color: expected table, got {}", v.type_name())))?;
        let channel = |key: &str| -> FuResult<f64> {
            t.get(key)
                .unwrap_or(&Value::Nil)
                .expect_f64(&format!("color channel '{key}'"))
        };
        Ok(Some(Self {
            r: channel("R")?,
            g: channel("G")?,
            b: channel("B")?,
        }))
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Default, serde::Serialize, serde::Deserialize)]
/// Tile position in flow-view coordinates.
pub struct FlowPos {
    /// Horizontal coordinate.
    pub x: f64,
    /// Vertical coordinate.
    pub y: f64,
}

impl FlowPos {
    pub fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }

    /// Parse a host array `{x, y}` (extra entries such as z are ignored).
    pub fn from_value(v: &Value) -> FuResult<Self> {
        let nums = v.number_seq("flow position")?;
        match nums.as_slice() {
            [x, y, ..] => Ok(Self { x: *x, y: *y }),
            _ => Err(FuError::remote(format!(
                "flow position: expected 2 numbers, got {}",
                nums.len()
            ))),
        }
    }
}

#[cfg(test)]
#[path = "../../tests/unit/foundation/core.rs"]
mod tests;
