// Copyright 2025 the Glimmer Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Glimmer Data: concurrent source loading and keyed joins.
//!
//! A visualization describes its data as a list of [`Source`]s, each a URI plus
//! an extractor turning the fetched JSON into [`RawRecord`]s. [`DataLoader::load`]
//! fetches every source concurrently and waits for all of them. If any fetch
//! or extraction fails the whole load fails, so callers never see a partial
//! entity list.
//!
//! The first source is the primary set (for a choropleth, the geometry). Every
//! later source is joined onto it by [`Key`], producing [`JoinedEntity`]s in
//! primary order. Primary records without a match are handled by the
//! [`JoinPolicy`].
//!
//! Fetching goes through the [`Fetch`] trait. With the default `http` feature a
//! reqwest-backed `HttpFetcher` is available; [`MemoryFetcher`] serves fixed
//! documents for tests and offline demos.
//!
//! ## Example
//!
//! ```
//! use glimmer_data::{DataLoader, JoinPolicy, MemoryFetcher, Source, extract};
//! use serde_json::json;
//!
//! let fetcher = MemoryFetcher::new()
//!     .with("mem://shapes", json!([{ "id": 1, "v": 4.0 }, { "id": 2 }]))
//!     .with("mem://names", json!([{ "id": 1, "name": "one" }, { "id": 2, "name": "two" }]));
//! let sources = [
//!     Source::new("mem://shapes", extract::records("id", "v")),
//!     Source::new("mem://names", extract::records("id", "v")),
//! ];
//!
//! let loader = DataLoader::new(fetcher).with_policy(JoinPolicy::MarkNoData);
//! let entities = futures::executor::block_on(loader.load(&sources)).unwrap();
//! assert_eq!(entities.len(), 2);
//! assert_eq!(entities[0].text("name"), Some("one"));
//! assert!(entities[1].no_data);
//! ```

mod error;
mod fetch;
mod join;
mod loader;
mod record;
mod source;
pub mod topojson;

pub use error::{BoxError, DataError, ExtractError, TopologyError};
#[cfg(feature = "http")]
pub use fetch::HttpFetcher;
pub use fetch::{Fetch, MemoryFetcher};
pub use join::{JoinPolicy, join};
pub use loader::DataLoader;
pub use record::{JoinedEntity, Key, RawRecord, Scalar};
pub use source::{Extractor, Source, extract};

/// Re-export of the geometry path type used by records.
pub use kurbo::BezPath;
