// Copyright 2025 the Glimmer Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! The network boundary: fetching one JSON document per URI.

use std::collections::HashMap;
use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};

use async_trait::async_trait;
use serde_json::Value;

use crate::error::DataError;

/// Fetches and decodes a JSON document.
///
/// Implementations report transport failures as [`DataError::Network`] and
/// undecodable bodies as [`DataError::Parse`].
#[async_trait]
pub trait Fetch: Send + Sync {
    /// GET `uri` and decode the body as JSON.
    async fn fetch_json(&self, uri: &str) -> Result<Value, DataError>;
}

#[async_trait]
impl<F: Fetch + ?Sized> Fetch for Arc<F> {
    async fn fetch_json(&self, uri: &str) -> Result<Value, DataError> {
        (**self).fetch_json(uri).await
    }
}

/// Serves fixed documents from memory. Unknown URIs fail with a network error.
#[derive(Debug, Default)]
pub struct MemoryFetcher {
    documents: HashMap<String, Value>,
    raw: HashMap<String, String>,
    requests: AtomicUsize,
}

impl MemoryFetcher {
    /// Empty fetcher.
    pub fn new() -> Self {
        Self::default()
    }

    /// Serve `document` at `uri`.
    #[must_use]
    pub fn with(mut self, uri: impl Into<String>, document: Value) -> Self {
        self.documents.insert(uri.into(), document);
        self
    }

    /// Serve an unparsed body at `uri`; it is decoded on every fetch.
    #[must_use]
    pub fn with_body(mut self, uri: impl Into<String>, body: impl Into<String>) -> Self {
        self.raw.insert(uri.into(), body.into());
        self
    }

    /// Number of fetches issued so far.
    pub fn requests(&self) -> usize {
        self.requests.load(Ordering::Relaxed)
    }
}

#[async_trait]
impl Fetch for MemoryFetcher {
    async fn fetch_json(&self, uri: &str) -> Result<Value, DataError> {
        self.requests.fetch_add(1, Ordering::Relaxed);
        if let Some(doc) = self.documents.get(uri) {
            return Ok(doc.clone());
        }
        if let Some(body) = self.raw.get(uri) {
            return serde_json::from_str(body).map_err(|e| DataError::Parse {
                uri: uri.to_string(),
                reason: e.to_string(),
            });
        }
        Err(DataError::network(uri, format!("no document registered for {uri}")))
    }
}

#[cfg(feature = "http")]
pub use http::HttpFetcher;

#[cfg(feature = "http")]
mod http {
    use std::time::Duration;

    use async_trait::async_trait;
    use reqwest::Client;
    use serde_json::Value;
    use tracing::debug;

    use super::Fetch;
    use crate::error::DataError;

    const CONNECT_TIMEOUT_SECS: u64 = 8;
    const REQUEST_TIMEOUT_SECS: u64 = 30;

    /// Fetches JSON over HTTP(S) with reqwest.
    #[derive(Clone, Debug)]
    pub struct HttpFetcher {
        http: Client,
    }

    impl HttpFetcher {
        /// Client with default connect and request timeouts.
        pub fn new() -> Result<Self, reqwest::Error> {
            let http = Client::builder()
                .timeout(Duration::from_secs(REQUEST_TIMEOUT_SECS))
                .connect_timeout(Duration::from_secs(CONNECT_TIMEOUT_SECS))
                .build()?;
            Ok(Self { http })
        }

        /// Wrap an existing client.
        pub fn with_client(http: Client) -> Self {
            Self { http }
        }
    }

    #[async_trait]
    impl Fetch for HttpFetcher {
        async fn fetch_json(&self, uri: &str) -> Result<Value, DataError> {
            debug!(uri, "fetching");
            let response = self
                .http
                .get(uri)
                .send()
                .await
                .and_then(reqwest::Response::error_for_status)
                .map_err(|e| DataError::network(uri, e))?;
            let body = response
                .bytes()
                .await
                .map_err(|e| DataError::network(uri, e))?;
            serde_json::from_slice(&body).map_err(|e| DataError::Parse {
                uri: uri.to_string(),
                reason: e.to_string(),
            })
        }
    }
}
