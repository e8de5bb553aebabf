// Copyright 2025 the Glimmer Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Glimmer Scale: pure functions from a data domain to a visual range.
//!
//! ## Overview
//!
//! Three scale families cover the bar chart, line chart and choropleth:
//!
//! - [`Linear`]: affine interpolation between a numeric domain and a numeric range.
//!   Out-of-domain input extrapolates; nothing is clamped.
//! - [`Band`]: evenly spaced slots for an ordered list of categories, each slot
//!   shrunk by a padding fraction.
//! - [`Threshold`]: a stepwise mapping from a value to one of `N + 1` outputs
//!   through `N` strictly ascending breakpoints.
//!
//! [`Scale`] is the tagged union used where a caller needs to treat scales
//! uniformly, for example when drawing an axis.
//!
//! Construction validates configuration. Empty band domains fail with a
//! domain error and malformed thresholds fail with a config error, so bad
//! configuration is caught before anything is rendered
//! (see [`ScaleError::kind`]).
//!
//! ## Example
//!
//! ```
//! use glimmer_scale::{Band, Linear, Threshold};
//!
//! let y = Linear::new([0.0, 94.0], [400.0, 0.0]);
//! assert_eq!(y.apply(47.0), 200.0);
//!
//! let x = Band::new(["a", "b"], [0.0, 100.0], 0.0).unwrap();
//! assert_eq!(x.slot("b").unwrap().start, 50.0);
//!
//! let t = Threshold::new(vec![5.0, 10.0], vec!["low", "mid", "high"]).unwrap();
//! assert_eq!(t.apply(5.0), Some(&"mid"));
//! ```

mod band;
mod color;
mod error;
mod linear;
mod scale;
mod threshold;

pub use band::{Band, BandSlot};
pub use color::{Color, ParseColorError};
pub use error::{ErrorKind, ScaleError};
pub use linear::{Linear, max_value, tick_step};
pub use scale::Scale;
pub use threshold::{Bucket, Threshold};
