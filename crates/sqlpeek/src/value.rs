//! Parameter values supplied to a render.

use std::collections::BTreeMap;
use std::fmt;

use serde::{Deserialize, Serialize};

use crate::error::{PeekError, PeekResult};
use crate::placeholder::is_param_name;

/// A single parameter value.
///
/// The engine only ever looks at a value's string form (see
/// [`ParamValue::to_text`]); the variants exist so lists and composite
/// items can drive `<foreach>` without being flattened first.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(untagged)]
pub enum ParamValue {
    #[default]
    Null,
    Bool(bool),
    Int(i64),
    Float(f64),
    Text(String),
    List(Vec<ParamValue>),
    Record(BTreeMap<String, ParamValue>),
}

impl ParamValue {
    /// Build a record (structural list element) from field pairs.
    pub fn record<K, V>(fields: impl IntoIterator<Item = (K, V)>) -> Self
    where
        K: Into<String>,
        V: Into<ParamValue>,
    {
        ParamValue::Record(
            fields
                .into_iter()
                .map(|(k, v)| (k.into(), v.into()))
                .collect(),
        )
    }

    /// The string form used for conditions, quoting, and substitution.
    ///
    /// Lists and records join their members with `,`.
    pub fn to_text(&self) -> String {
        match self {
            ParamValue::Null => String::new(),
            ParamValue::Bool(b) => b.to_string(),
            ParamValue::Int(n) => n.to_string(),
            ParamValue::Float(f) => f.to_string(),
            ParamValue::Text(s) => s.clone(),
            ParamValue::List(items) => join_texts(items.iter()),
            ParamValue::Record(fields) => join_texts(fields.values()),
        }
    }

    /// Returns `true` if the string form is empty after trimming.
    pub fn is_blank(&self) -> bool {
        match self {
            ParamValue::Null => true,
            ParamValue::Text(s) => s.trim().is_empty(),
            ParamValue::Bool(_) | ParamValue::Int(_) | ParamValue::Float(_) => false,
            ParamValue::List(_) | ParamValue::Record(_) => self.to_text().trim().is_empty(),
        }
    }

    /// Look up a field of a record. Other variants have no fields.
    pub fn field(&self, name: &str) -> Option<&ParamValue> {
        match self {
            ParamValue::Record(fields) => fields.get(name),
            _ => None,
        }
    }
}

fn join_texts<'a>(items: impl Iterator<Item = &'a ParamValue>) -> String {
    items.map(ParamValue::to_text).collect::<Vec<_>>().join(",")
}

impl fmt::Display for ParamValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.to_text())
    }
}

impl From<&str> for ParamValue {
    fn from(s: &str) -> Self {
        ParamValue::Text(s.to_string())
    }
}

impl From<String> for ParamValue {
    fn from(s: String) -> Self {
        ParamValue::Text(s)
    }
}

impl From<bool> for ParamValue {
    fn from(b: bool) -> Self {
        ParamValue::Bool(b)
    }
}

impl From<i32> for ParamValue {
    fn from(n: i32) -> Self {
        ParamValue::Int(i64::from(n))
    }
}

impl From<i64> for ParamValue {
    fn from(n: i64) -> Self {
        ParamValue::Int(n)
    }
}

impl From<f64> for ParamValue {
    fn from(f: f64) -> Self {
        ParamValue::Float(f)
    }
}

impl<T: Into<ParamValue>> From<Option<T>> for ParamValue {
    fn from(v: Option<T>) -> Self {
        v.map_or(ParamValue::Null, Into::into)
    }
}

impl<T: Into<ParamValue>> From<Vec<T>> for ParamValue {
    fn from(items: Vec<T>) -> Self {
        ParamValue::List(items.into_iter().map(Into::into).collect())
    }
}

impl From<BTreeMap<String, ParamValue>> for ParamValue {
    fn from(fields: BTreeMap<String, ParamValue>) -> Self {
        ParamValue::Record(fields)
    }
}

/// Name → value mapping handed to the renderer.
///
/// Any name not present is treated as absent, which renders the same as a
/// blank value.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Params {
    values: BTreeMap<String, ParamValue>,
}

impl Params {
    pub fn new() -> Self {
        Self::default()
    }

    /// Builder-style insert.
    pub fn with(mut self, name: impl Into<String>, value: impl Into<ParamValue>) -> Self {
        self.insert(name, value);
        self
    }

    pub fn insert(&mut self, name: impl Into<String>, value: impl Into<ParamValue>) {
        self.values.insert(name.into(), value.into());
    }

    pub fn get(&self, name: &str) -> Option<&ParamValue> {
        self.values.get(name)
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &ParamValue)> {
        self.values.iter().map(|(k, v)| (k.as_str(), v))
    }

    /// Build from `(name, value)` pairs, e.g. the text fields of a prompt.
    pub fn from_pairs<K, V>(pairs: impl IntoIterator<Item = (K, V)>) -> Self
    where
        K: Into<String>,
        V: Into<ParamValue>,
    {
        let mut params = Self::new();
        for (k, v) in pairs {
            params.insert(k, v);
        }
        params
    }

    /// Copy every entry of `other` into `self`; `other` wins on conflicts.
    pub fn merge(&mut self, other: Params) {
        self.values.extend(other.values);
    }

    /// Parse a `name=value` assignment into a name and a text value.
    ///
    /// Everything after the first `=` is the value, verbatim.
    pub fn parse_assignment(input: &str) -> PeekResult<(String, ParamValue)> {
        let Some((name, value)) = input.split_once('=') else {
            return Err(PeekError::invalid_param(input, "expected name=value"));
        };
        let name = name.trim();
        if !is_param_name(name) {
            return Err(PeekError::invalid_param(
                input,
                format!("'{name}' is not a valid parameter name"),
            ));
        }
        Ok((name.to_string(), ParamValue::Text(value.to_string())))
    }

    /// Decode a JSON object of parameters.
    pub fn from_json_str(s: &str) -> PeekResult<Self> {
        Ok(serde_json::from_str(s)?)
    }

    /// Decode a TOML table of parameters.
    pub fn from_toml_str(s: &str) -> PeekResult<Self> {
        Ok(toml::from_str(s)?)
    }
}

impl<K: Into<String>, V: Into<ParamValue>> FromIterator<(K, V)> for Params {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        Self::from_pairs(iter)
    }
}

impl From<BTreeMap<String, ParamValue>> for Params {
    fn from(values: BTreeMap<String, ParamValue>) -> Self {
        Self { values }
    }
}
