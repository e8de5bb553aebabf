// Copyright 2025 the Glimmer Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Animated bar chart with a data change mid-transition.
//!
//! Steps a manual clock through the enter transition, swaps in new values
//! halfway, lets everything settle and writes the final frame as SVG.
//!
//! Run:
//! - `cargo run -p glimmer_demos --example bar_chart [out.svg]`

use std::error::Error;
use std::sync::Arc;
use std::time::Duration;

use glimmer_charts::{BarChart, BarChartConfig, Handle, ListenerRegistry};
use glimmer_scene::Surface;
use glimmer_transition::ManualClock;
use kurbo::Size;
use tracing::info;
use tracing_subscriber::EnvFilter;

const FRAME: Duration = Duration::from_millis(100);

fn main() -> Result<(), Box<dyn Error>> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();
    let out = std::env::args().nth(1).unwrap_or_else(|| "bar_chart.svg".into());

    let size = Size::new(560.0, 300.0);
    let clock = ManualClock::new();
    let events = ListenerRegistry::new();
    let mut handle = Handle::init(
        BarChart::new(BarChartConfig::default())?,
        Surface::new(),
        Arc::new(clock.clone()),
        &events,
        size,
    )?;

    handle.update(BarChart::entities([
        ("Category 1", 10.0),
        ("Category 2", 20.0),
        ("Category 3", 15.0),
        ("Category 4", 25.0),
        ("Category 5", 18.0),
    ]))?;
    for frame in 0..5 {
        clock.advance(FRAME);
        let damage = handle.tick();
        info!(frame, dirty = damage.dirty_rects.len(), "enter");
    }

    // Category 1 leaves, Category 6 arrives, the rest retarget from where they are.
    handle.update(BarChart::entities([
        ("Category 2", 8.0),
        ("Category 3", 30.0),
        ("Category 4", 12.0),
        ("Category 5", 22.0),
        ("Category 6", 16.0),
    ]))?;
    let mut frame = 0;
    while handle.is_animating() {
        clock.advance(FRAME);
        let damage = handle.tick();
        info!(frame, dirty = damage.dirty_rects.len(), "update");
        frame += 1;
    }

    let surface = handle.teardown();
    std::fs::write(&out, surface.to_svg(size))?;
    info!(path = %out, elements = surface.element_count(), "wrote final frame");
    Ok(())
}
