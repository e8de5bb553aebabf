// Copyright 2025 the Glimmer Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Glimmer Charts: concrete visualizations on the Glimmer pipeline.
//!
//! A chart is a [`View`]: a pure function from joined entities and a surface
//! size to marks and decorations. [`BarChart`], [`LineChart`] and
//! [`Choropleth`] are provided. A [`Handle`] mounts a view on a
//! [`RenderTarget`](glimmer_scene::RenderTarget) and drives the rest of the
//! pipeline for it:
//!
//! - [`Handle::update`] and [`Handle::resize`] reconcile new marks by key and
//!   schedule their transitions.
//! - [`Handle::begin_load`] and [`Handle::finish_load`] fetch and join remote
//!   sources through a [`LoadTicket`] that runs on any executor. Newer loads and
//!   teardown abort older ones.
//! - [`Handle::tick`] processes host events, advances transitions, removes
//!   finished exits and commits the target.
//! - [`Handle::teardown`] unregisters the host listener and aborts in-flight
//!   loads.
//!
//! Host input is delivered through a [`ListenerRegistry`]; each handle holds a
//! scoped [`Subscription`] to it.
//!
//! ## Example
//!
//! ```
//! use std::sync::Arc;
//! use std::time::Duration;
//!
//! use glimmer_charts::{BarChart, BarChartConfig, Handle, ListenerRegistry};
//! use glimmer_scene::Surface;
//! use glimmer_transition::ManualClock;
//! use kurbo::Size;
//!
//! let clock = ManualClock::new();
//! let events = ListenerRegistry::new();
//! let chart = BarChart::new(BarChartConfig::default())?;
//! let mut handle = Handle::init(
//!     chart,
//!     Surface::new(),
//!     Arc::new(clock.clone()),
//!     &events,
//!     Size::new(560.0, 300.0),
//! )?;
//! handle.update(BarChart::entities([("Category 1", 10.0), ("Category 2", 20.0)]))?;
//!
//! clock.advance(Duration::from_secs(1));
//! let damage = handle.tick();
//! assert!(!damage.is_empty());
//!
//! let surface = handle.teardown();
//! assert!(events.is_empty());
//! assert!(surface.to_svg(Size::new(560.0, 300.0)).contains("<rect"));
//! # Ok::<(), glimmer_charts::ChartError>(())
//! ```

mod bar;
mod choropleth;
mod config;
mod error;
mod events;
mod handle;
mod line;
mod view;

pub use bar::BarChart;
pub use choropleth::Choropleth;
pub use config::{
    BarChartConfig, ChoroplethConfig, LegendConfig, LineChartConfig, Margins, ThresholdFill,
    TooltipConfig,
};
pub use error::{ChartError, Result};
pub use events::{HostEvent, ListenerRegistry, Subscription};
pub use handle::{Handle, LoadResult, LoadStatus, LoadTicket};
pub use line::{LineChart, cardinal};
pub use view::{Layout, MARKS_LAYER, STATUS_LAYER, TOOLTIP_KEY, TOOLTIP_LAYER, TooltipText, View};
