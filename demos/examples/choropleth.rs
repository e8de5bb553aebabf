// Copyright 2025 the Glimmer Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! US county map of educational attainment.
//!
//! Fetches the county topology and the education table concurrently over
//! HTTP, joins them by FIPS code and writes the map as SVG. Set `RUST_LOG=debug`
//! to see join diagnostics.
//!
//! Run:
//! - `cargo run -p glimmer_demos --example choropleth [out.svg]`

use std::error::Error;
use std::sync::Arc;

use glimmer_charts::{Choropleth, ChoroplethConfig, Handle, ListenerRegistry};
use glimmer_data::HttpFetcher;
use glimmer_scene::Surface;
use glimmer_transition::SystemClock;
use kurbo::Size;
use tracing::{error, info};
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> Result<(), Box<dyn Error>> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();
    let out = std::env::args()
        .nth(1)
        .unwrap_or_else(|| "choropleth.svg".into());

    let size = Size::new(960.0, 700.0);
    let events = ListenerRegistry::new();
    let mut handle = Handle::init(
        Choropleth::new(ChoroplethConfig::default())?,
        Surface::new(),
        Arc::new(SystemClock::new()),
        &events,
        size,
    )?;

    let ticket = handle.begin_load();
    let loaded = ticket.run(HttpFetcher::new()?).await;
    match handle.finish_load(loaded) {
        Ok(_) => info!(counties = handle.entities().len(), "map ready"),
        // The error label is drawn; still write the frame.
        Err(e) => error!(error = %e, "map unavailable"),
    }
    let _ = handle.tick();

    let surface = handle.teardown();
    std::fs::write(&out, surface.to_svg(size))?;
    info!(path = %out, "wrote map");
    Ok(())
}
