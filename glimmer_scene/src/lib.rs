// Copyright 2025 the Glimmer Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Glimmer Scene: keyed visual elements and the surface they are drawn on.
//!
//! - [`VisualElement`]: a rendered primitive with animatable attributes ([`Attr`]).
//! - [`SceneReconciler`]: diffs a new list of [`Mark`]s against what is rendered and
//!   produces creations, attribute [`Tween`]s and exit fades.
//! - [`RenderTarget`]: the boundary a renderer implements. It only displays what
//!   it is told through [`SceneCommand`]s and answers hit tests.
//! - [`Surface`]: a retained, grid-indexed [`RenderTarget`] with SVG output.
//! - [`Axis`]: tick and label primitives for a positional scale.
//!
//! Identity flows through [`Key`]: an entity, its mark and its element share one
//! key, and reconciliation matches by key alone.
//!
//! ## Surface model
//!
//! A [`Surface`] holds layers, each with a transform and z-order, and elements
//! inside layers. Mutations are applied immediately to element state while the
//! world-space bounds and spatial index are synchronized by
//! [`RenderTarget::commit`], which reports coarse [`Damage`].
//! Hit testing filters by element flags and precise shape containment, and
//! returns the topmost match as a `[layer, element]` key path.
//!
//! ## Example
//!
//! ```
//! use glimmer_scene::{Key, Mark, RenderTarget, SceneCommand, SceneReconciler, Surface, Timing, VisualElement};
//! use kurbo::{Affine, Point, Rect};
//!
//! let mut surface = Surface::new();
//! surface.apply(SceneCommand::Layer { key: "marks".into(), transform: Affine::IDENTITY, z: 0 });
//!
//! let mut reconciler = SceneReconciler::new("marks");
//! let bar = VisualElement::rect("a", Rect::new(0.0, 0.0, 10.0, 50.0));
//! let plan = reconciler.plan(&[Mark::new(bar)], Timing::default());
//! surface.apply_all(plan.commands);
//! let _ = surface.commit();
//!
//! let hit = surface.hit_test(Point::new(5.0, 25.0)).unwrap();
//! assert_eq!(hit, vec![Key::from("marks"), Key::from("a")]);
//! ```

mod axis;
mod element;
mod grid;
mod reconcile;
mod surface;
mod target;

pub use axis::{Axis, Orient};
pub use element::{Attr, AttrValue, ElementFlags, Shape, TextAnchor, VisualElement};
pub use reconcile::{Keyed, Mark, Partition, Plan, SceneReconciler, Timing, Tween, reconcile};
pub use surface::Surface;
pub use target::{Damage, RenderTarget, SceneCommand};

pub use glimmer_data::Key;
