// Copyright 2025 the Glimmer Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

use glimmer_data::{JoinPolicy, JoinedEntity, Key, Source};
use glimmer_scene::{Mark, SceneCommand, Timing};
use kurbo::{Affine, Size};

use crate::config::TooltipConfig;
use crate::error::Result;

/// Layer holding the data-driven marks.
pub const MARKS_LAYER: &str = "marks";
/// Layer for the loading and error labels.
pub const STATUS_LAYER: &str = "status";
/// Layer holding the tooltip label.
pub const TOOLTIP_LAYER: &str = "tooltip";
/// Key of the tooltip label element.
pub const TOOLTIP_KEY: &str = "tooltip/label";

pub(crate) const MARKS_Z: i32 = 10;
pub(crate) const STATUS_Z: i32 = 50;
pub(crate) const TOOLTIP_Z: i32 = 100;

/// Formats tooltip text for a hovered entity.
pub type TooltipText = Box<dyn Fn(&JoinedEntity) -> String>;

/// Everything a chart draws for one data version at one size.
#[derive(Clone, Debug, Default)]
pub struct Layout {
    /// Transform of the marks layer.
    pub marks_transform: Affine,
    /// Desired marks, reconciled by key against what is on screen.
    pub marks: Vec<Mark>,
    /// Axes, legends and other non-reconciled primitives. Each decoration
    /// redraws its own layer completely.
    pub decorations: Vec<SceneCommand>,
    /// Transition lengths for the marks.
    pub timing: Timing,
}

/// A chart type: turns joined entities into marks and decorations.
///
/// Views are pure; all state lives in the [`Handle`](crate::Handle).
pub trait View {
    /// Lay out `entities` for a surface of `size`.
    fn layout(&self, entities: &[JoinedEntity], size: Size) -> Result<Layout>;

    /// Remote sources to load, primary first. Empty for static data.
    fn sources(&self) -> Vec<Source> {
        Vec::new()
    }

    /// Handling of primary records without attributes.
    fn join_policy(&self) -> JoinPolicy {
        JoinPolicy::default()
    }

    /// Tooltip formatter and behavior, if the chart shows tooltips.
    fn tooltip(&self) -> Option<(TooltipText, TooltipConfig)> {
        None
    }

    /// Layer the tooltip reacts to.
    fn interactive_layer(&self) -> Key {
        Key::from(MARKS_LAYER)
    }
}

/// Create a layer or move an existing one.
pub(crate) fn layer(key: &str, transform: Affine, z: i32) -> SceneCommand {
    SceneCommand::Layer {
        key: Key::from(key),
        transform,
        z,
    }
}

/// Commands that place a decoration layer and clear its contents.
pub(crate) fn decoration_layer(key: &str, transform: Affine, z: i32) -> [SceneCommand; 2] {
    [
        layer(key, transform, z),
        SceneCommand::ClearLayer {
            key: Key::from(key),
        },
    ]
}

/// Duration from milliseconds, scaled for staggering.
pub(crate) fn stagger(index: usize, step_ms: u64) -> std::time::Duration {
    let index = u64::try_from(index).unwrap_or(u64::MAX);
    std::time::Duration::from_millis(index.saturating_mul(step_ms))
}
