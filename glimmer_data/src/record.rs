// Copyright 2025 the Glimmer Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Record model: keys, scalars, raw per-source records and joined entities.

use std::collections::BTreeMap;
use std::fmt;
use std::sync::Arc;

use kurbo::BezPath;
use serde_json::Value;

/// Identity key shared across sources.
///
/// Integral JSON numbers and strings with the same digits produce equal keys,
/// so a numeric `fips` matches a numeric geometry `id`.
#[derive(Clone, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Key(Arc<str>);

impl Key {
    /// Create a key from any string-like value.
    pub fn new(s: impl AsRef<str>) -> Self {
        Self(Arc::from(s.as_ref()))
    }

    /// Key text.
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Key for a JSON scalar; `None` for null, arrays, objects and non-integral numbers.
    pub fn from_json(value: &Value) -> Option<Self> {
        match value {
            Value::String(s) => Some(Self::new(s)),
            Value::Number(n) => {
                if let Some(i) = n.as_i64() {
                    Some(Self::new(i.to_string()))
                } else if let Some(u) = n.as_u64() {
                    Some(Self::new(u.to_string()))
                } else {
                    None
                }
            }
            _ => None,
        }
    }
}

impl fmt::Display for Key {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for Key {
    fn from(s: &str) -> Self {
        Self::new(s)
    }
}

impl From<String> for Key {
    fn from(s: String) -> Self {
        Self(Arc::from(s))
    }
}

impl From<i64> for Key {
    fn from(i: i64) -> Self {
        Self::new(i.to_string())
    }
}

impl AsRef<str> for Key {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

/// A field value: number or string.
#[derive(Clone, Debug, PartialEq)]
pub enum Scalar {
    /// Numeric field.
    Number(f64),
    /// Text field.
    Text(String),
}

impl Scalar {
    /// Convert a JSON value; `None` for null, arrays and objects.
    pub fn from_json(value: &Value) -> Option<Self> {
        match value {
            Value::Number(n) => n.as_f64().map(Self::Number),
            Value::String(s) => Some(Self::Text(s.clone())),
            Value::Bool(b) => Some(Self::Text(b.to_string())),
            _ => None,
        }
    }

    /// Numeric value, if this is a number.
    pub fn as_number(&self) -> Option<f64> {
        match self {
            Self::Number(n) => Some(*n),
            Self::Text(_) => None,
        }
    }

    /// Text value, if this is a string.
    pub fn as_text(&self) -> Option<&str> {
        match self {
            Self::Text(s) => Some(s),
            Self::Number(_) => None,
        }
    }
}

impl fmt::Display for Scalar {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Number(n) => write!(f, "{n}"),
            Self::Text(s) => f.write_str(s),
        }
    }
}

impl From<f64> for Scalar {
    fn from(n: f64) -> Self {
        Self::Number(n)
    }
}

impl From<&str> for Scalar {
    fn from(s: &str) -> Self {
        Self::Text(s.to_string())
    }
}

/// One entity as produced by a single source's extractor.
#[derive(Clone, Debug, PartialEq)]
pub struct RawRecord {
    /// Identity key.
    pub key: Key,
    /// Encoded value, if this source carries one.
    pub value: Option<f64>,
    /// Remaining fields.
    pub fields: BTreeMap<String, Scalar>,
    /// Drawable region, if this is a geometry source.
    pub geometry: Option<BezPath>,
}

impl RawRecord {
    /// Record with only a key.
    pub fn new(key: impl Into<Key>) -> Self {
        Self {
            key: key.into(),
            value: None,
            fields: BTreeMap::new(),
            geometry: None,
        }
    }

    /// Set the encoded value.
    #[must_use]
    pub fn with_value(mut self, value: f64) -> Self {
        self.value = Some(value);
        self
    }

    /// Add a field.
    #[must_use]
    pub fn with_field(mut self, name: impl Into<String>, value: impl Into<Scalar>) -> Self {
        self.fields.insert(name.into(), value.into());
        self
    }

    /// Attach geometry.
    #[must_use]
    pub fn with_geometry(mut self, path: BezPath) -> Self {
        self.geometry = Some(path);
        self
    }
}

/// An entity after joining every source on its key.
#[derive(Clone, Debug, PartialEq)]
pub struct JoinedEntity {
    /// Identity key, unique within a joined set.
    pub key: Key,
    /// Drawable region, if any source supplied one.
    pub geometry: Option<BezPath>,
    /// Encoded value. NaN when `no_data` is set.
    pub value: f64,
    /// Merged fields from every matched source.
    pub attributes: BTreeMap<String, Scalar>,
    /// Set when an attribute match was missing and the join kept the entity anyway.
    pub no_data: bool,
}

impl JoinedEntity {
    /// Entity with a key and value and nothing else; what a local dataset produces.
    pub fn new(key: impl Into<Key>, value: f64) -> Self {
        Self {
            key: key.into(),
            geometry: None,
            value,
            attributes: BTreeMap::new(),
            no_data: false,
        }
    }

    /// Add an attribute.
    #[must_use]
    pub fn with_attribute(mut self, name: impl Into<String>, value: impl Into<Scalar>) -> Self {
        self.attributes.insert(name.into(), value.into());
        self
    }

    /// Attribute by name.
    pub fn attribute(&self, name: &str) -> Option<&Scalar> {
        self.attributes.get(name)
    }

    /// Text attribute by name.
    pub fn text(&self, name: &str) -> Option<&str> {
        self.attribute(name).and_then(Scalar::as_text)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn numeric_and_string_ids_agree() {
        assert_eq!(Key::from_json(&json!(1001)), Some(Key::from("1001")));
        assert_eq!(Key::from_json(&json!("1001")), Some(Key::from(1001_i64)));
        assert_eq!(Key::from_json(&json!(1.5)), None);
        assert_eq!(Key::from_json(&json!(null)), None);
    }

    #[test]
    fn scalar_conversions() {
        assert_eq!(Scalar::from_json(&json!(21.9)), Some(Scalar::Number(21.9)));
        assert_eq!(
            Scalar::from_json(&json!("AL")).and_then(|s| s.as_text().map(str::to_owned)),
            Some("AL".to_string())
        );
        assert_eq!(Scalar::from_json(&json!([1])), None);
        assert_eq!(Scalar::Number(25.0).to_string(), "25");
    }

    #[test]
    fn entity_text_lookup() {
        let e = JoinedEntity::new("1001", 24.0).with_attribute("state", "AL");
        assert_eq!(e.text("state"), Some("AL"));
        assert_eq!(e.text("missing"), None);
    }
}
