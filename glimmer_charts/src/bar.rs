// Copyright 2025 the Glimmer Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Vertical bar chart over categorical data.

use std::time::Duration;

use glimmer_data::{JoinedEntity, Key};
use glimmer_scale::{Band, Color, Linear, Threshold, max_value};
use glimmer_scene::{Axis, Mark, Timing, VisualElement};
use kurbo::{Affine, Rect, Size};

use crate::config::BarChartConfig;
use crate::error::Result;
use crate::view::{Layout, View, decoration_layer, layer, stagger};

const X_AXIS: &str = "x-axis";
const Y_AXIS: &str = "y-axis";
const AXIS_Z: i32 = 5;

/// One bar per entity, in entity order, growing up from the baseline.
///
/// The band axis spans the surface width minus margins; the height is fixed
/// by the config. Bars enter at zero height on the baseline.
#[derive(Clone, Debug)]
pub struct BarChart {
    config: BarChartConfig,
    threshold: Option<Threshold<Color>>,
}

impl BarChart {
    /// Validate `config` and build the chart.
    pub fn new(config: BarChartConfig) -> Result<Self> {
        let threshold = config
            .threshold
            .as_ref()
            .map(|t| t.scale())
            .transpose()?;
        Ok(Self { config, threshold })
    }

    /// Entities for `(label, value)` pairs, keyed by label.
    pub fn entities<'a>(data: impl IntoIterator<Item = (&'a str, f64)>) -> Vec<JoinedEntity> {
        data.into_iter()
            .map(|(label, value)| JoinedEntity::new(label, value).with_attribute("label", label))
            .collect()
    }

    /// Active configuration.
    pub fn config(&self) -> &BarChartConfig {
        &self.config
    }

    fn fill(&self, value: f64) -> Color {
        self.threshold
            .as_ref()
            .and_then(|t| t.apply(value))
            .copied()
            .unwrap_or(self.config.fill)
    }
}

impl View for BarChart {
    fn layout(&self, entities: &[JoinedEntity], size: Size) -> Result<Layout> {
        let c = &self.config;
        let m = c.margins;
        let inner_w = (size.width - m.left - m.right).max(0.0);
        let inner_h = (c.height - m.top - m.bottom).max(0.0);
        let mut layout = Layout {
            marks_transform: Affine::translate((m.left, m.top)),
            timing: Timing {
                duration: Duration::from_millis(c.duration_ms),
                exit: Duration::from_millis(c.exit_ms),
            },
            ..Layout::default()
        };

        let x_axis = Affine::translate((m.left, m.top + inner_h));
        let y_axis = Affine::translate((m.left, m.top));
        let drawn: Vec<&JoinedEntity> = entities.iter().filter(|e| e.value.is_finite()).collect();
        if drawn.is_empty() {
            layout.decorations.extend(decoration_layer(X_AXIS, x_axis, AXIS_Z));
            layout.decorations.extend(decoration_layer(Y_AXIS, y_axis, AXIS_Z));
            return Ok(layout);
        }

        let x = Band::new(drawn.iter().map(|e| e.key.as_str()), [0.0, inner_w], c.padding)?;
        let max = max_value(drawn.iter().map(|e| e.value)).unwrap_or(0.0).max(0.0);
        let mut y = Linear::try_new([0.0, max], [inner_h, 0.0])?;
        if c.nice {
            y = y.nice(10);
        }

        for (i, e) in drawn.iter().enumerate() {
            let Some(slot) = x.slot(e.key.as_str()) else {
                continue;
            };
            let x0 = slot.start;
            let x1 = slot.start + slot.bandwidth;
            let fill = self.fill(e.value);
            let target = VisualElement::rect(e.key.clone(), Rect::new(x0, y.apply(e.value), x1, inner_h))
                .fill(fill);
            let baseline =
                VisualElement::rect(e.key.clone(), Rect::new(x0, inner_h, x1, inner_h)).fill(fill);
            layout.marks.push(
                Mark::new(target)
                    .entering_from(baseline)
                    .delayed(stagger(i, c.stagger_ms)),
            );
        }

        layout.decorations.push(layer(X_AXIS, x_axis, AXIS_Z));
        layout
            .decorations
            .extend(Axis::bottom(x).commands(&Key::from(X_AXIS)));
        layout.decorations.push(layer(Y_AXIS, y_axis, AXIS_Z));
        layout
            .decorations
            .extend(Axis::left(y).commands(&Key::from(Y_AXIS)));
        Ok(layout)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::ThresholdFill;
    use glimmer_scene::SceneCommand;

    fn sample() -> Vec<JoinedEntity> {
        BarChart::entities([
            ("Category 1", 10.0),
            ("Category 2", 20.0),
            ("Category 3", 15.0),
            ("Category 4", 25.0),
            ("Category 5", 18.0),
        ])
    }

    #[test]
    fn bars_fill_the_band_and_grow_from_the_baseline() {
        let chart = BarChart::new(BarChartConfig::default()).unwrap();
        let layout = chart.layout(&sample(), Size::new(560.0, 300.0)).unwrap();
        assert_eq!(layout.marks.len(), 5);
        assert_eq!(layout.marks_transform, Affine::translate((40.0, 20.0)));

        let inner_h = 250.0;
        for mark in &layout.marks {
            let t = &mark.target;
            assert!(t.position.x >= 0.0 && t.position.x + t.size.width <= 500.0 + 1e-9);
            assert!((t.position.y + t.size.height - inner_h).abs() < 1e-9, "bars sit on the baseline");
            assert_eq!(mark.baseline.size.height, 0.0);
            assert_eq!(mark.baseline.position.y, inner_h);
            assert_eq!(t.fill, Color::STEELBLUE);
        }
        // The value axis is niced from [0, 25] to [0, 26].
        let values = [10.0, 20.0, 15.0, 25.0, 18.0];
        for (mark, v) in layout.marks.iter().zip(values) {
            let expected = v * inner_h / 26.0;
            assert!((mark.target.size.height - expected).abs() < 1e-9, "height for {v}");
        }
    }

    #[test]
    fn axes_are_drawn_as_decorations() {
        let chart = BarChart::new(BarChartConfig::default()).unwrap();
        let layout = chart.layout(&sample(), Size::new(560.0, 300.0)).unwrap();
        let labels = layout
            .decorations
            .iter()
            .filter(|c| matches!(c, SceneCommand::Create { layer, element }
                if layer.as_str() == X_AXIS && element.key.as_str().contains("/label/")))
            .count();
        assert_eq!(labels, 5);
        assert!(layout.decorations.iter().any(|c| matches!(
            c,
            SceneCommand::Layer { key, transform, .. }
                if key.as_str() == X_AXIS && *transform == Affine::translate((40.0, 270.0))
        )));
    }

    #[test]
    fn threshold_fill_colors_by_bucket() {
        let config = BarChartConfig {
            threshold: Some(ThresholdFill {
                breakpoints: vec![15.0, 20.0],
                colors: vec![Color::WHITE, Color::BLUE, Color::BLACK],
            }),
            ..BarChartConfig::default()
        };
        let chart = BarChart::new(config).unwrap();
        let layout = chart.layout(&sample(), Size::new(560.0, 300.0)).unwrap();
        let fills: Vec<Color> = layout.marks.iter().map(|m| m.target.fill).collect();
        assert_eq!(
            fills,
            [Color::WHITE, Color::BLACK, Color::BLUE, Color::BLACK, Color::BLUE]
        );
    }

    #[test]
    fn stagger_delays_by_index() {
        let config = BarChartConfig {
            stagger_ms: 50,
            ..BarChartConfig::default()
        };
        let layout = BarChart::new(config)
            .unwrap()
            .layout(&sample(), Size::new(560.0, 300.0))
            .unwrap();
        assert_eq!(layout.marks[2].delay, Duration::from_millis(100));
    }

    #[test]
    fn empty_data_clears_axes() {
        let chart = BarChart::new(BarChartConfig::default()).unwrap();
        let layout = chart.layout(&[], Size::new(560.0, 300.0)).unwrap();
        assert!(layout.marks.is_empty());
        assert_eq!(
            layout
                .decorations
                .iter()
                .filter(|c| matches!(c, SceneCommand::ClearLayer { .. }))
                .count(),
            2
        );
    }

    #[test]
    fn invalid_threshold_fails_at_construction() {
        let config = BarChartConfig {
            threshold: Some(ThresholdFill {
                breakpoints: vec![20.0, 10.0],
                colors: vec![Color::WHITE, Color::BLUE, Color::BLACK],
            }),
            ..BarChartConfig::default()
        };
        assert!(BarChart::new(config).is_err());
    }
}
