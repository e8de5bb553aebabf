// Copyright 2025 the Glimmer Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

use core::fmt;

use serde_json::Value;

use crate::error::ExtractError;
use crate::record::RawRecord;

/// Turns one decoded JSON document into records.
pub type Extractor = Box<dyn Fn(&Value) -> Result<Vec<RawRecord>, ExtractError> + Send + Sync>;

/// A remote dataset: where to fetch it and how to read records out of it.
pub struct Source {
    uri: String,
    extract: Extractor,
}

impl Source {
    /// Create a source from a URI and an extractor, for example one from [`extract`].
    pub fn new<F>(uri: impl Into<String>, extract: F) -> Self
    where
        F: Fn(&Value) -> Result<Vec<RawRecord>, ExtractError> + Send + Sync + 'static,
    {
        Self {
            uri: uri.into(),
            extract: Box::new(extract),
        }
    }

    /// URI to fetch.
    pub fn uri(&self) -> &str {
        &self.uri
    }

    /// Run the extractor over a fetched document.
    pub fn extract(&self, document: &Value) -> Result<Vec<RawRecord>, ExtractError> {
        (self.extract)(document)
    }
}

impl fmt::Debug for Source {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Source")
            .field("uri", &self.uri)
            .finish_non_exhaustive()
    }
}

/// Ready-made extractors.
pub mod extract {
    use serde_json::Value;

    use crate::error::ExtractError;
    use crate::record::{Key, RawRecord, Scalar};
    use crate::topojson;

    /// Read an array of flat objects, keyed by `key_field`.
    ///
    /// `value_field` becomes the record value when it is numeric. Every scalar
    /// field, the key included, is copied into [`RawRecord::fields`].
    pub fn records(
        key_field: &str,
        value_field: &str,
    ) -> impl Fn(&Value) -> Result<Vec<RawRecord>, ExtractError> + Send + Sync + 'static {
        let key_field = key_field.to_string();
        let value_field = value_field.to_string();
        move |document| {
            let items = document.as_array().ok_or(ExtractError::NotAnArray)?;
            items
                .iter()
                .enumerate()
                .map(|(index, item)| {
                    let missing = || ExtractError::MissingField {
                        index,
                        field: key_field.clone(),
                    };
                    let object = item.as_object().ok_or_else(missing)?;
                    let key = object
                        .get(&key_field)
                        .and_then(Key::from_json)
                        .ok_or_else(missing)?;
                    let mut record = RawRecord::new(key);
                    record.value = object.get(&value_field).and_then(Value::as_f64);
                    record.fields = object
                        .iter()
                        .filter_map(|(k, v)| Scalar::from_json(v).map(|s| (k.clone(), s)))
                        .collect();
                    Ok(record)
                })
                .collect()
        }
    }

    /// Read polygon features from `objects[object]` of a TopoJSON topology.
    ///
    /// Geometries without an `id` cannot be joined and are skipped.
    pub fn topojson(
        object: &str,
    ) -> impl Fn(&Value) -> Result<Vec<RawRecord>, ExtractError> + Send + Sync + 'static {
        let object = object.to_string();
        move |document| {
            let features = topojson::features(document, &object)?;
            Ok(features
                .into_iter()
                .filter_map(|f| {
                    let key = f.id?;
                    let mut record = RawRecord::new(key).with_geometry(f.path);
                    record.fields = f.properties;
                    Some(record)
                })
                .collect())
        }
    }
}
