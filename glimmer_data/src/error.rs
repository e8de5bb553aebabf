// Copyright 2025 the Glimmer Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Error types for loading and joining.

use thiserror::Error;

use crate::record::Key;

/// Boxed transport error carried by [`DataError::Network`].
pub type BoxError = Box<dyn std::error::Error + Send + Sync + 'static>;

/// Errors returned by [`DataLoader::load`](crate::DataLoader::load) and [`join`](crate::join).
#[derive(Error, Debug)]
pub enum DataError {
    /// The fetch itself failed: connection, timeout or non-success status.
    #[error("fetching {uri} failed: {source}")]
    Network {
        /// Source URI.
        uri: String,
        /// Underlying transport error.
        #[source]
        source: BoxError,
    },

    /// The response body is not valid JSON.
    #[error("payload from {uri} is not valid JSON: {reason}")]
    Parse {
        /// Source URI.
        uri: String,
        /// Decoder message.
        reason: String,
    },

    /// The JSON decoded but the extractor could not turn it into records.
    #[error("payload from {uri} has an unexpected shape: {source}")]
    Extract {
        /// Source URI.
        uri: String,
        /// Extractor failure.
        #[source]
        source: ExtractError,
    },

    /// A primary record has no attribute match and the join policy is strict.
    #[error("no attribute record matches key `{key}`")]
    Join {
        /// The unmatched primary key.
        key: Key,
    },
}

impl DataError {
    /// Build a [`DataError::Network`] from any transport error.
    pub fn network(uri: impl Into<String>, source: impl Into<BoxError>) -> Self {
        Self::Network {
            uri: uri.into(),
            source: source.into(),
        }
    }

    /// True for transport failures.
    pub fn is_network(&self) -> bool {
        matches!(self, Self::Network { .. })
    }

    /// True for undecodable payloads, either invalid JSON or an unexpected shape.
    pub fn is_parse(&self) -> bool {
        matches!(self, Self::Parse { .. } | Self::Extract { .. })
    }

    /// True for strict-join failures.
    pub fn is_join(&self) -> bool {
        matches!(self, Self::Join { .. })
    }
}

/// Errors turning a decoded JSON document into records.
#[derive(Error, Clone, Debug, PartialEq, Eq)]
pub enum ExtractError {
    /// Expected a JSON array of records.
    #[error("expected an array of records")]
    NotAnArray,

    /// A record lacks a required field or it has the wrong type.
    #[error("record {index} has no usable `{field}` field")]
    MissingField {
        /// Position of the record in the array.
        index: usize,
        /// Required field name.
        field: String,
    },

    /// The topology could not be decoded.
    #[error(transparent)]
    Topology(#[from] TopologyError),
}

/// Errors decoding a TopoJSON topology.
#[derive(Error, Clone, Debug, PartialEq, Eq)]
pub enum TopologyError {
    /// The document does not match the TopoJSON layout.
    #[error("invalid topology: {0}")]
    Decode(String),

    /// The named object is not present under `objects`.
    #[error("topology has no object named `{0}`")]
    MissingObject(String),

    /// A geometry references an arc that does not exist.
    #[error("arc index {0} is out of range")]
    ArcIndex(i64),
}
