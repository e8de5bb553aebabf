// Copyright 2025 the Glimmer Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Axis primitive: a domain line, tick marks and labels for a positional scale.

use core::fmt;

use glimmer_data::Key;
use glimmer_scale::{Scale, tick_step};
use kurbo::{BezPath, Point};

use crate::element::{TextAnchor, VisualElement};
use crate::target::SceneCommand;

const TICK_SIZE: f64 = 6.0;
const TICK_PADDING: f64 = 3.0;
const FONT_SIZE: f64 = 10.0;

/// Side of the plot an axis is drawn on; labels face away from the plot.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum Orient {
    /// Horizontal axis, labels above.
    Top,
    /// Vertical axis, labels to the right.
    Right,
    /// Horizontal axis, labels below.
    Bottom,
    /// Vertical axis, labels to the left.
    Left,
}

/// Builds the primitives of an axis for a [`Scale::Linear`] or [`Scale::Band`].
///
/// Geometry is in the axis layer's space with the axis line at zero on the
/// cross axis, so the caller positions it with the layer transform.
pub struct Axis {
    orient: Orient,
    scale: Scale,
    tick_count: usize,
    tick_values: Option<Vec<f64>>,
    tick_format: Option<Box<dyn Fn(f64) -> String>>,
}

impl fmt::Debug for Axis {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Axis")
            .field("orient", &self.orient)
            .field("scale", &self.scale)
            .field("tick_count", &self.tick_count)
            .field("tick_values", &self.tick_values)
            .finish_non_exhaustive()
    }
}

impl Axis {
    fn new(orient: Orient, scale: impl Into<Scale>) -> Self {
        Self {
            orient,
            scale: scale.into(),
            tick_count: 10,
            tick_values: None,
            tick_format: None,
        }
    }

    /// Axis along the top edge.
    pub fn top(scale: impl Into<Scale>) -> Self {
        Self::new(Orient::Top, scale)
    }

    /// Axis along the right edge.
    pub fn right(scale: impl Into<Scale>) -> Self {
        Self::new(Orient::Right, scale)
    }

    /// Axis along the bottom edge.
    pub fn bottom(scale: impl Into<Scale>) -> Self {
        Self::new(Orient::Bottom, scale)
    }

    /// Axis along the left edge.
    pub fn left(scale: impl Into<Scale>) -> Self {
        Self::new(Orient::Left, scale)
    }

    /// Approximate number of ticks for linear scales.
    #[must_use]
    pub fn tick_count(mut self, count: usize) -> Self {
        self.tick_count = count;
        self
    }

    /// Explicit tick values for linear scales.
    #[must_use]
    pub fn tick_values(mut self, values: Vec<f64>) -> Self {
        self.tick_values = Some(values);
        self
    }

    /// Label formatter for linear ticks.
    #[must_use]
    pub fn tick_format(mut self, format: impl Fn(f64) -> String + 'static) -> Self {
        self.tick_format = Some(Box::new(format));
        self
    }

    /// Tick positions along the axis with their labels.
    pub fn ticks(&self) -> Vec<(f64, String)> {
        match &self.scale {
            Scale::Band(band) => band
                .categories()
                .iter()
                .enumerate()
                .filter_map(|(i, c)| Some((band.slot_at(i)?.center(), c.clone())))
                .collect(),
            Scale::Linear(linear) => {
                let values = self
                    .tick_values
                    .clone()
                    .unwrap_or_else(|| linear.ticks(self.tick_count));
                let [d0, d1] = linear.domain();
                let step = tick_step(d0, d1, self.tick_count).abs();
                values
                    .into_iter()
                    .map(|v| {
                        let label = match &self.tick_format {
                            Some(f) => f(v),
                            None => default_format(v, step),
                        };
                        (linear.apply(v), label)
                    })
                    .collect()
            }
            Scale::Threshold(_) => Vec::new(),
        }
    }

    /// Axis primitives, keyed `{prefix}/domain`, `{prefix}/tick/{i}` and `{prefix}/label/{i}`.
    pub fn elements(&self, prefix: &str) -> Vec<VisualElement> {
        let Some([r0, r1]) = self.scale.range() else {
            return Vec::new();
        };
        // Outward direction for ticks and labels.
        let k = match self.orient {
            Orient::Top | Orient::Left => -1.0,
            Orient::Right | Orient::Bottom => 1.0,
        };
        let horizontal = matches!(self.orient, Orient::Top | Orient::Bottom);
        let at = |along: f64, across: f64| {
            if horizontal {
                Point::new(along, across)
            } else {
                Point::new(across, along)
            }
        };

        let mut out = Vec::new();
        let mut domain = BezPath::new();
        domain.move_to(at(r0, k * TICK_SIZE));
        domain.line_to(at(r0, 0.0));
        domain.line_to(at(r1, 0.0));
        domain.line_to(at(r1, k * TICK_SIZE));
        out.push(VisualElement::path(format!("{prefix}/domain"), domain).non_pickable());

        let label_offset = k * (TICK_SIZE + TICK_PADDING);
        for (i, (pos, label)) in self.ticks().into_iter().enumerate() {
            let mut tick = BezPath::new();
            tick.move_to(at(pos, 0.0));
            tick.line_to(at(pos, k * TICK_SIZE));
            out.push(VisualElement::path(format!("{prefix}/tick/{i}"), tick).non_pickable());

            let (anchor_pt, anchor) = match self.orient {
                Orient::Bottom => (at(pos, label_offset + FONT_SIZE * 0.71), TextAnchor::Middle),
                Orient::Top => (at(pos, label_offset), TextAnchor::Middle),
                Orient::Left => (at(pos + FONT_SIZE * 0.32, label_offset), TextAnchor::End),
                Orient::Right => (at(pos + FONT_SIZE * 0.32, label_offset), TextAnchor::Start),
            };
            out.push(
                VisualElement::text(format!("{prefix}/label/{i}"), label, anchor_pt)
                    .font(FONT_SIZE, anchor),
            );
        }
        out
    }

    /// Commands that redraw the axis into `layer`, replacing its previous contents.
    pub fn commands(&self, layer: &Key) -> Vec<SceneCommand> {
        let mut cmds = vec![SceneCommand::ClearLayer { key: layer.clone() }];
        cmds.extend(
            self.elements(layer.as_str())
                .into_iter()
                .map(|element| SceneCommand::Create {
                    layer: layer.clone(),
                    element,
                }),
        );
        cmds
    }
}

/// Fixed-point label with just enough decimals for the tick step.
fn default_format(value: f64, step: f64) -> String {
    let decimals = if step > 0.0 && step < 1.0 {
        #[allow(
            clippy::cast_possible_truncation,
            clippy::cast_sign_loss,
            reason = "Decimal count is a small positive integer."
        )]
        let d = (-step.log10()).ceil() as usize;
        d
    } else {
        0
    };
    let v = if value == 0.0 { 0.0 } else { value };
    format!("{v:.decimals$}")
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::element::Shape;
    use glimmer_scale::{Band, Linear};

    fn labels(axis: &Axis) -> Vec<String> {
        axis.ticks().into_iter().map(|(_, l)| l).collect()
    }

    #[test]
    fn band_axis_labels_categories_at_centers() {
        let band = Band::new(["a", "b"], [0.0, 100.0], 0.0).unwrap();
        let axis = Axis::bottom(band);
        let ticks = axis.ticks();
        assert_eq!(ticks, vec![(25.0, "a".to_string()), (75.0, "b".to_string())]);
    }

    #[test]
    fn linear_axis_default_labels() {
        let axis = Axis::left(Linear::new([0.0, 26.0], [250.0, 0.0]));
        assert_eq!(
            labels(&axis),
            ["0", "2", "4", "6", "8", "10", "12", "14", "16", "18", "20", "22", "24", "26"]
        );
        let axis = Axis::left(Linear::new([0.0, 1.0], [1.0, 0.0])).tick_count(5);
        assert_eq!(labels(&axis), ["0.0", "0.2", "0.4", "0.6", "0.8", "1.0"]);
    }

    #[test]
    fn custom_values_and_format() {
        let axis = Axis::bottom(Linear::new([0.0, 60.0], [0.0, 580.0]))
            .tick_values(vec![5.0, 60.0])
            .tick_format(|v| format!("{v}%"));
        let ticks = axis.ticks();
        assert_eq!(ticks[0].1, "5%");
        assert!((ticks[1].0 - 580.0).abs() < 1e-9);
    }

    #[test]
    fn element_layout_by_orientation() {
        let axis = Axis::right(Linear::new([0.0, 150.0], [150.0, 0.0])).tick_count(2);
        let els = axis.elements("y");
        assert_eq!(els[0].key.as_str(), "y/domain");
        let label = els
            .iter()
            .find(|e| matches!(e.shape, Shape::Text(_)))
            .unwrap();
        assert_eq!(label.position.x, TICK_SIZE + TICK_PADDING);
        assert_eq!(label.anchor, TextAnchor::Start);
    }

    #[test]
    fn commands_clear_then_create() {
        let axis = Axis::bottom(Band::new(["a"], [0.0, 10.0], 0.1).unwrap());
        let cmds = axis.commands(&Key::from("x-axis"));
        assert!(matches!(cmds[0], SceneCommand::ClearLayer { .. }));
        // domain + one tick + one label
        assert_eq!(cmds.len(), 4);
    }
}
