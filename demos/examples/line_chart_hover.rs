// Copyright 2025 the Glimmer Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Line chart with hover tooltips driven by host pointer events.
//!
//! The demo plays the host: it emits pointer events into the listener
//! registry and ticks the chart, printing the tooltip after each frame.
//!
//! Run:
//! - `cargo run -p glimmer_demos --example line_chart_hover [out.svg]`

use std::error::Error;
use std::sync::Arc;
use std::time::Duration;

use glimmer_charts::{Handle, HostEvent, LineChart, LineChartConfig, ListenerRegistry};
use glimmer_scene::Surface;
use glimmer_transition::ManualClock;
use kurbo::{Point, Size};
use tracing::info;
use tracing_subscriber::EnvFilter;

fn main() -> Result<(), Box<dyn Error>> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();
    let out = std::env::args()
        .nth(1)
        .unwrap_or_else(|| "line_chart.svg".into());

    let config = LineChartConfig::default();
    let m = config.margins;
    let size = Size::new(
        config.width + m.left + m.right,
        config.height + m.top + m.bottom,
    );
    let clock = ManualClock::new();
    let events = ListenerRegistry::new();
    let mut handle = Handle::init(
        LineChart::new(config),
        Surface::new(),
        Arc::new(clock.clone()),
        &events,
        size,
    )?;
    handle.update(LineChart::entities(&[25.0, 30.0, 45.0, 60.0, 20.0, 65.0, 75.0]))?;
    clock.advance(Duration::from_secs(1));
    let _ = handle.tick();

    // Over the fourth dot (value 60), then the fifth, then off the chart.
    let pointer = [
        HostEvent::PointerMove(Point::new(m.left + 150.0, m.top + 90.0)),
        HostEvent::PointerMove(Point::new(m.left + 200.0, m.top + 130.0)),
        HostEvent::PointerLeave,
    ];
    for event in pointer {
        events.emit(&event);
        clock.advance(Duration::from_millis(300));
        let _ = handle.tick();
        if let Some(tooltip) = handle.tooltip() {
            info!(
                ?event,
                visible = tooltip.visible,
                content = %tooltip.content,
                x = tooltip.anchor.x,
                y = tooltip.anchor.y,
                "tooltip"
            );
        }
    }

    let surface = handle.teardown();
    std::fs::write(&out, surface.to_svg(size))?;
    info!(path = %out, "wrote final frame");
    Ok(())
}
