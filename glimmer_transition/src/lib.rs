// Copyright 2025 the Glimmer Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Glimmer Transition: attribute animation with interrupt-and-resume.
//!
//! A [`TransitionScheduler`] owns at most one transition per `(element key,
//! attribute)` pair. Scheduling a new transition on a pair that is already
//! animating captures the in-flight value and continues from there at once,
//! so fast data changes never snap an element back to an old start value.
//!
//! The scheduler has no notion of wall time. Callers read a [`Clock`] and pass
//! `now` into [`TransitionScheduler::animate`] and [`TransitionScheduler::tick`];
//! tests use a [`ManualClock`] for deterministic frames.
//!
//! ## Example
//!
//! ```
//! use std::time::Duration;
//! use glimmer_scene::Attr;
//! use glimmer_transition::{Clock, Easing, ManualClock, TransitionScheduler, TransitionSpec};
//!
//! let clock = ManualClock::new();
//! let mut scheduler = TransitionScheduler::new();
//! let spec = TransitionSpec::new("bar", Attr::Height, 100.0)
//!     .duration(Duration::from_millis(1000))
//!     .easing(Easing::Linear);
//! scheduler.animate(clock.now(), spec, 0.0.into());
//!
//! clock.advance(Duration::from_millis(500));
//! let frame = scheduler.tick(clock.now());
//! assert_eq!(frame.writes.len(), 1);
//! assert!(frame.completed.is_empty());
//! ```

mod clock;
mod easing;
mod scheduler;

pub use clock::{Clock, ManualClock, SystemClock};
pub use easing::Easing;
pub use scheduler::{DEFAULT_DURATION, Frame, Scheduled, TransitionScheduler, TransitionSpec};
