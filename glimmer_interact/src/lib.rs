// Copyright 2025 the Glimmer Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Glimmer Interact: hover tracking and tooltips for rendered entities.
//!
//! [`InteractionLayer`] hit tests pointer positions against a
//! [`RenderTarget`](glimmer_scene::RenderTarget), follows the hovered
//! `[layer, element]` path with a [`HoverState`], and keeps exactly one
//! [`TooltipState`] whose content comes from the [`JoinedEntity`](glimmer_data::JoinedEntity)
//! behind the hovered element. Every pointer event yields a single
//! [`TooltipChange`], so a caller can animate show/hide and never observes an
//! intermediate hidden state when the pointer moves between elements.
//!
//! ## Example
//!
//! ```
//! use glimmer_data::JoinedEntity;
//! use glimmer_interact::{InteractionLayer, TooltipChange};
//! use kurbo::{Point, Vec2};
//!
//! let data = vec![JoinedEntity::new("a", 25.0)];
//! let mut layer = InteractionLayer::new(|e: &JoinedEntity| format!("Value: {}", e.value))
//!     .with_offset(Vec2::new(0.0, -28.0));
//! let change = layer.on_pointer_enter(&"a".into(), Point::new(10.0, 40.0), &data);
//! assert_eq!(change, TooltipChange::Shown);
//! assert_eq!(layer.tooltip().content, "Value: 25");
//! assert_eq!(layer.on_pointer_leave(), TooltipChange::Hidden);
//! ```

mod hover;
mod layer;
mod tooltip;

pub use hover::{HoverEvent, HoverState};
pub use layer::InteractionLayer;
pub use tooltip::{EntityIndex, EntityLookup, TooltipChange, TooltipFormat, TooltipState};
