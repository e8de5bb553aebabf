// Copyright 2025 the Glimmer Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Line chart with hoverable dots.

use std::time::Duration;

use glimmer_data::{JoinedEntity, Key};
use glimmer_scale::Linear;
use glimmer_scene::{Axis, Mark, SceneCommand, Timing, VisualElement};
use kurbo::{Affine, BezPath, Point, Size};

use crate::config::{LineChartConfig, TooltipConfig};
use crate::error::Result;
use crate::view::{Layout, MARKS_Z, TooltipText, View, decoration_layer, layer, stagger};

const LINE_LAYER: &str = "line";
const X_AXIS: &str = "x-axis";
const Y_AXIS: &str = "y-axis";
const AXIS_Z: i32 = 5;

/// A cardinal spline through the points, with one dot per value.
///
/// Dots rise from the zero line to their value when they enter.
#[derive(Clone, Debug, Default)]
pub struct LineChart {
    config: LineChartConfig,
}

impl LineChart {
    /// Chart with `config`.
    pub fn new(config: LineChartConfig) -> Self {
        Self { config }
    }

    /// Entities for a series, keyed by index.
    pub fn entities(values: &[f64]) -> Vec<JoinedEntity> {
        values
            .iter()
            .enumerate()
            .map(|(i, v)| JoinedEntity::new(i.to_string(), *v))
            .collect()
    }

    /// Active configuration.
    pub fn config(&self) -> &LineChartConfig {
        &self.config
    }
}

impl View for LineChart {
    fn layout(&self, entities: &[JoinedEntity], _size: Size) -> Result<Layout> {
        let c = &self.config;
        let m = c.margins;
        let origin = Affine::translate((m.left, m.top));
        let mut layout = Layout {
            marks_transform: origin,
            timing: Timing {
                duration: Duration::from_millis(c.duration_ms),
                exit: Duration::ZERO,
            },
            ..Layout::default()
        };

        #[allow(
            clippy::cast_precision_loss,
            reason = "Series lengths are far below 2^52."
        )]
        let last = entities.len().saturating_sub(1) as f64;
        let x = Linear::try_new([0.0, last], [0.0, c.width])?;
        let y = Linear::try_new(c.y_domain, [c.height, 0.0])?;

        let mut points = Vec::with_capacity(entities.len());
        for (i, e) in entities.iter().enumerate() {
            #[allow(
                clippy::cast_precision_loss,
                reason = "Series lengths are far below 2^52."
            )]
            let cx = x.apply(i as f64);
            let center = Point::new(cx, y.apply(e.value));
            points.push(center);
            let target = VisualElement::circle(e.key.clone(), center, c.radius).fill(c.color);
            let baseline = VisualElement::circle(e.key.clone(), Point::new(cx, y.apply(0.0)), c.radius)
                .fill(c.color);
            layout.marks.push(
                Mark::new(target)
                    .entering_from(baseline)
                    .delayed(stagger(i, c.stagger_ms)),
            );
        }

        layout
            .decorations
            .extend(decoration_layer(LINE_LAYER, origin, MARKS_Z - 1));
        if points.len() > 1 {
            let line = VisualElement::path("line/path", cardinal(&points, 0.0))
                .stroke(c.color, 1.0)
                .non_pickable();
            layout.decorations.push(SceneCommand::Create {
                layer: Key::from(LINE_LAYER),
                element: line,
            });
        }

        let count = entities.len();
        layout.decorations.push(layer(
            X_AXIS,
            Affine::translate((m.left, m.top + c.height)),
            AXIS_Z,
        ));
        if count > 0 {
            let x_axis = Axis::bottom(x)
                .tick_count(count)
                .tick_format(|index| format!("{}", index + 1.0));
            layout.decorations.extend(x_axis.commands(&Key::from(X_AXIS)));
        } else {
            layout.decorations.push(SceneCommand::ClearLayer {
                key: Key::from(X_AXIS),
            });
        }
        layout.decorations.push(layer(
            Y_AXIS,
            Affine::translate((m.left + c.width, m.top)),
            AXIS_Z,
        ));
        layout
            .decorations
            .extend(Axis::right(y).commands(&Key::from(Y_AXIS)));
        Ok(layout)
    }

    fn tooltip(&self) -> Option<(TooltipText, TooltipConfig)> {
        let text: TooltipText = Box::new(|e: &JoinedEntity| format!("Value: {}", e.value));
        Some((text, self.config.tooltip))
    }
}

/// Cardinal spline through `points`; tension 0 is a Catmull-Rom curve.
///
/// Endpoints are duplicated so the curve starts and ends on the first and
/// last point.
pub fn cardinal(points: &[Point], tension: f64) -> BezPath {
    let mut path = BezPath::new();
    let Some(&first) = points.first() else {
        return path;
    };
    path.move_to(first);
    if points.len() == 2 {
        path.line_to(points[1]);
        return path;
    }
    let k = (1.0 - tension) / 6.0;
    for i in 0..points.len().saturating_sub(1) {
        let p1 = points[i];
        let p2 = points[i + 1];
        let p0 = if i == 0 { p1 } else { points[i - 1] };
        let p3 = points.get(i + 2).copied().unwrap_or(p2);
        let c1 = p1 + (p2 - p0) * k;
        let c2 = p2 - (p3 - p1) * k;
        path.curve_to(c1, c2, p2);
    }
    path
}
