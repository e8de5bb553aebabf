// Copyright 2025 the Glimmer Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

use glimmer_data::Key;
use glimmer_scene::RenderTarget;
use kurbo::{Point, Vec2};
use tracing::trace;

use crate::hover::{HoverEvent, HoverState};
use crate::tooltip::{EntityLookup, TooltipChange, TooltipFormat, TooltipState};

/// Resolves pointer input against a render target and maintains one tooltip.
///
/// Each visualization owns its own layer, so tooltips never leak between
/// instances. Moving from one element straight onto another replaces the
/// content in a single [`TooltipChange::Replaced`] step.
#[derive(Clone, Debug)]
pub struct InteractionLayer<F> {
    format: F,
    offset: Vec2,
    layer: Option<Key>,
    hover: HoverState<Key>,
    tooltip: TooltipState,
}

impl<F: TooltipFormat> InteractionLayer<F> {
    /// Layer formatting tooltips with `format`, anchored at the pointer.
    pub fn new(format: F) -> Self {
        Self {
            format,
            offset: Vec2::ZERO,
            layer: None,
            hover: HoverState::new(),
            tooltip: TooltipState::default(),
        }
    }

    /// Offset the tooltip anchor from the pointer.
    #[must_use]
    pub fn with_offset(mut self, offset: Vec2) -> Self {
        self.offset = offset;
        self
    }

    /// Only react to elements of `layer`.
    #[must_use]
    pub fn for_layer(mut self, layer: impl Into<Key>) -> Self {
        self.layer = Some(layer.into());
        self
    }

    /// Current tooltip state.
    pub fn tooltip(&self) -> &TooltipState {
        &self.tooltip
    }

    /// Tooltip anchor offset.
    pub fn offset(&self) -> Vec2 {
        self.offset
    }

    /// Hovered element, if any.
    pub fn hovered(&self) -> Option<&Key> {
        self.hover.target()
    }

    /// Hit test `point` on `target` and update the tooltip.
    pub fn on_pointer_move<T, L>(&mut self, target: &T, point: Point, entities: &L) -> TooltipChange
    where
        T: RenderTarget + ?Sized,
        L: EntityLookup + ?Sized,
    {
        let path = target.hit_test(point).unwrap_or_default();
        self.on_hover_path(&path, point, entities)
    }

    /// Update from an already resolved `[layer, element]` hit path.
    ///
    /// Paths outside the configured layer count as hovering nothing.
    pub fn on_hover_path<L>(&mut self, path: &[Key], point: Point, entities: &L) -> TooltipChange
    where
        L: EntityLookup + ?Sized,
    {
        let accepted = match &self.layer {
            Some(layer) => path.first() == Some(layer),
            None => true,
        };
        let path = if accepted { path } else { &[] };
        let events = self.hover.update_path(path);
        trace!(
            entered = events.iter().filter(|e| matches!(e, HoverEvent::Enter(_))).count(),
            left = events.iter().filter(|e| matches!(e, HoverEvent::Leave(_))).count(),
            "hover"
        );
        match path.last() {
            Some(key) => self.show(key, point, entities),
            None => self.hide(),
        }
    }

    /// The host reported the pointer entering `key` directly.
    pub fn on_pointer_enter<L>(&mut self, key: &Key, point: Point, entities: &L) -> TooltipChange
    where
        L: EntityLookup + ?Sized,
    {
        let _ = self.hover.update_path(core::slice::from_ref(key));
        self.show(key, point, entities)
    }

    /// The pointer left the hovered element or the surface.
    pub fn on_pointer_leave(&mut self) -> TooltipChange {
        let _ = self.hover.clear();
        self.hide()
    }

    /// Drop hover and tooltip state without reporting a change, for example
    /// after the data was replaced.
    pub fn reset(&mut self) {
        let _ = self.hover.clear();
        self.tooltip = TooltipState::default();
    }

    fn show<L>(&mut self, key: &Key, point: Point, entities: &L) -> TooltipChange
    where
        L: EntityLookup + ?Sized,
    {
        let anchor = point + self.offset;
        if self.tooltip.visible && self.tooltip.source.as_ref() == Some(key) {
            if self.tooltip.anchor == anchor {
                return TooltipChange::Unchanged;
            }
            self.tooltip.anchor = anchor;
            return TooltipChange::Moved;
        }
        let Some(entity) = entities.entity(key) else {
            return self.hide();
        };
        let was_visible = self.tooltip.visible;
        self.tooltip = TooltipState {
            visible: true,
            content: self.format.format(entity),
            anchor,
            source: Some(key.clone()),
        };
        if was_visible {
            TooltipChange::Replaced
        } else {
            TooltipChange::Shown
        }
    }

    fn hide(&mut self) -> TooltipChange {
        if !self.tooltip.visible {
            return TooltipChange::Unchanged;
        }
        // Content is kept so a fade-out can still draw it.
        self.tooltip.visible = false;
        self.tooltip.source = None;
        TooltipChange::Hidden
    }
}
