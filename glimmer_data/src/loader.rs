// Copyright 2025 the Glimmer Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

use futures::future::try_join_all;
use tracing::{debug, error, info};

use crate::error::DataError;
use crate::fetch::Fetch;
use crate::join::{JoinPolicy, join};
use crate::record::JoinedEntity;
use crate::source::Source;

/// Fetches sources concurrently and joins them into one entity list.
///
/// The first source is the primary set: it decides which keys exist and in
/// what order. Every later source is an attribute set joined on key.
#[derive(Debug)]
pub struct DataLoader<F> {
    fetcher: F,
    policy: JoinPolicy,
}

impl<F: Fetch> DataLoader<F> {
    /// Loader with the default [`JoinPolicy`].
    pub fn new(fetcher: F) -> Self {
        Self {
            fetcher,
            policy: JoinPolicy::default(),
        }
    }

    /// Replace the missing-match policy.
    #[must_use]
    pub fn with_policy(mut self, policy: JoinPolicy) -> Self {
        self.policy = policy;
        self
    }

    /// Active missing-match policy.
    pub fn policy(&self) -> JoinPolicy {
        self.policy
    }

    /// Underlying fetcher.
    pub fn fetcher(&self) -> &F {
        &self.fetcher
    }

    /// Fetch every source, wait for all of them, then extract and join.
    ///
    /// The first failure aborts the load; documents already fetched are discarded.
    pub async fn load(&self, sources: &[Source]) -> Result<Vec<JoinedEntity>, DataError> {
        let Some((primary, rest)) = sources.split_first() else {
            return Ok(Vec::new());
        };
        debug!(sources = sources.len(), "loading");
        let documents = try_join_all(sources.iter().map(|s| self.fetcher.fetch_json(s.uri())))
            .await
            .inspect_err(|e| error!(error = %e, "load failed"))?;

        let mut sets = sources
            .iter()
            .zip(&documents)
            .map(|(source, doc)| {
                source.extract(doc).map_err(|e| DataError::Extract {
                    uri: source.uri().to_string(),
                    source: e,
                })
            })
            .collect::<Result<Vec<_>, _>>()
            .inspect_err(|e| error!(error = %e, "load failed"))?;
        let primary_records = sets.remove(0);
        debug!(
            primary = primary.uri(),
            records = primary_records.len(),
            attribute_sets = rest.len(),
            "extracted"
        );

        let entities = join(primary_records, sets, self.policy)?;
        info!(entities = entities.len(), "load complete");
        Ok(entities)
    }
}
