// Copyright 2025 the Glimmer Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Scene commands and the render target boundary.

use glimmer_data::Key;
use kurbo::{Affine, Point, Rect};

use crate::element::{Attr, AttrValue, Shape, VisualElement};

/// One mutation of a render target.
///
/// Commands are produced by the reconciler, the scheduler and chart
/// decorations, and applied in order.
#[derive(Clone, Debug, PartialEq)]
pub enum SceneCommand {
    /// Create a layer, or update its transform and z-order if it exists.
    Layer {
        /// Layer key.
        key: Key,
        /// Layer-to-surface transform.
        transform: Affine,
        /// Stacking order among layers. Higher draws on top.
        z: i32,
    },
    /// Remove every element of a layer, keeping the layer.
    ClearLayer {
        /// Layer key.
        key: Key,
    },
    /// Create an element in a layer, replacing any element with the same key.
    Create {
        /// Owning layer.
        layer: Key,
        /// Initial state.
        element: VisualElement,
    },
    /// Overwrite one attribute.
    SetAttr {
        /// Element key.
        key: Key,
        /// Attribute.
        attr: Attr,
        /// New value.
        value: AttrValue,
    },
    /// Replace an element's primitive (path data or text content).
    SetShape {
        /// Element key.
        key: Key,
        /// New primitive.
        shape: Shape,
    },
    /// Remove an element or a whole layer.
    Remove {
        /// Element or layer key.
        key: Key,
    },
}

/// A batched set of changes derived from [`RenderTarget::commit`].
#[derive(Clone, Debug, Default, PartialEq)]
pub struct Damage {
    /// Surface-space rectangles that should be repainted.
    pub dirty_rects: Vec<Rect>,
}

impl Damage {
    /// True if nothing needs repainting.
    pub fn is_empty(&self) -> bool {
        self.dirty_rects.is_empty()
    }

    /// Returns the union of all damage rects.
    pub fn union_rect(&self) -> Option<Rect> {
        let mut it = self.dirty_rects.iter().copied();
        let first = it.next()?;
        Some(it.fold(first, |acc, r| acc.union(r)))
    }

    /// Merge another damage set into this one.
    pub fn extend(&mut self, other: Self) {
        self.dirty_rects.extend(other.dirty_rects);
    }
}

/// A drawing surface the pipeline mutates.
///
/// The target displays what it is told; it never originates elements.
pub trait RenderTarget {
    /// Apply one command. Commands naming unknown keys are ignored.
    fn apply(&mut self, command: SceneCommand);

    /// Apply commands in order.
    fn apply_all(&mut self, commands: Vec<SceneCommand>) {
        for c in commands {
            self.apply(c);
        }
    }

    /// Current value of an element attribute, if the element exists.
    fn attr(&self, key: &Key, attr: Attr) -> Option<AttrValue>;

    /// True if an element or layer with this key exists.
    fn contains(&self, key: &Key) -> bool;

    /// Topmost pickable element under a surface-space point, as a root to target
    /// key path (layer first).
    fn hit_test(&self, point: Point) -> Option<Vec<Key>>;

    /// Synchronize derived state and report what changed since the last commit.
    fn commit(&mut self) -> Damage;
}
