// Copyright 2025 the Glimmer Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Region map colored by a threshold scale, with a swatch legend.

use std::time::Duration;

use glimmer_data::{JoinPolicy, JoinedEntity, Key, Source, extract};
use glimmer_scale::{Color, Linear, Threshold};
use glimmer_scene::{Axis, Mark, SceneCommand, Timing, VisualElement};
use kurbo::{Affine, Point, Rect, Size};

use crate::config::{ChoroplethConfig, TooltipConfig};
use crate::error::Result;
use crate::view::{Layout, TooltipText, View, decoration_layer, layer};

const LEGEND_LAYER: &str = "legend";
const LEGEND_AXIS: &str = "legend-axis";
const LEGEND_Z: i32 = 20;
const BACKDROP_INSET: f64 = 10.0;

/// One filled path per region with geometry.
///
/// Geometry comes from the primary source, so regions are drawn in topology
/// order. Regions marked as having no data use the `no_data` color.
#[derive(Clone, Debug)]
pub struct Choropleth {
    config: ChoroplethConfig,
    fill: Threshold<Color>,
    legend_scale: Linear,
}

impl Choropleth {
    /// Validate `config` and build the chart.
    ///
    /// Fails with a configuration error when the fill thresholds are
    /// malformed, before anything is loaded.
    pub fn new(config: ChoroplethConfig) -> Result<Self> {
        let fill = config.fill.scale()?;
        let legend_scale = Linear::try_new(config.legend.domain, [0.0, config.legend.width])?;
        Ok(Self {
            config,
            fill,
            legend_scale,
        })
    }

    /// Active configuration.
    pub fn config(&self) -> &ChoroplethConfig {
        &self.config
    }

    /// Fill color for an entity.
    pub fn color_of(&self, entity: &JoinedEntity) -> Color {
        if entity.no_data {
            return self.config.no_data;
        }
        self.fill
            .apply(entity.value)
            .copied()
            .unwrap_or(self.config.no_data)
    }

    fn legend(&self) -> Vec<SceneCommand> {
        let l = &self.config.legend;
        let [x, y] = l.origin;
        let p = l.padding;
        let layer_key = Key::from(LEGEND_LAYER);
        let mut elements = vec![
            VisualElement::rect(
                "legend/backdrop",
                Rect::new(
                    -BACKDROP_INSET,
                    -BACKDROP_INSET,
                    l.width + 2.0 * p - BACKDROP_INSET,
                    l.height + 2.0 * p - BACKDROP_INSET,
                ),
            )
            .fill(Color::WHITE)
            .opacity(0.8)
            .non_pickable(),
        ];

        let [d0, d1] = l.domain;
        for (i, bucket) in self.fill.buckets().enumerate() {
            let lower = bucket.lower.unwrap_or(d0).max(d0);
            let upper = bucket.upper.unwrap_or(d1).min(d1);
            if upper <= lower {
                continue;
            }
            let x0 = p + self.legend_scale.apply(lower);
            let x1 = p + self.legend_scale.apply(upper);
            elements.push(
                VisualElement::rect(
                    format!("legend/swatch/{i}"),
                    Rect::new(x0, p, x1, p + l.height),
                )
                .fill(*bucket.output)
                .non_pickable(),
            );
        }

        let label_y = l.height + 2.0 * p;
        elements.push(
            VisualElement::text("legend/min", percent(d0), Point::new(p, label_y))
                .fill(Color::BLACK),
        );
        elements.push(
            VisualElement::text(
                "legend/max",
                percent(d1),
                Point::new(l.width + 2.0 * p, label_y),
            )
            .fill(Color::BLACK),
        );

        let mut cmds: Vec<SceneCommand> =
            decoration_layer(LEGEND_LAYER, Affine::translate((x, y)), LEGEND_Z).into();
        cmds.extend(elements.into_iter().map(|element| SceneCommand::Create {
            layer: layer_key.clone(),
            element,
        }));

        cmds.push(layer(
            LEGEND_AXIS,
            Affine::translate((x + p, y + l.height)),
            LEGEND_Z + 1,
        ));
        let axis = Axis::bottom(self.legend_scale)
            .tick_values(l.ticks.clone())
            .tick_format(percent);
        cmds.extend(axis.commands(&Key::from(LEGEND_AXIS)));
        cmds
    }
}

fn percent(v: f64) -> String {
    format!("{v}%")
}

impl View for Choropleth {
    fn layout(&self, entities: &[JoinedEntity], _size: Size) -> Result<Layout> {
        let fade = Duration::from_millis(self.config.fade_in_ms);
        let marks = entities
            .iter()
            .filter_map(|e| {
                let geometry = e.geometry.clone()?;
                let target = VisualElement::path(e.key.clone(), geometry)
                    .fill(self.color_of(e))
                    .stroke(Color::TRANSPARENT, 0.0);
                let baseline = if fade.is_zero() {
                    target.clone()
                } else {
                    target.clone().opacity(0.0)
                };
                Some(Mark::new(target).entering_from(baseline))
            })
            .collect();
        Ok(Layout {
            marks_transform: Affine::IDENTITY,
            marks,
            decorations: self.legend(),
            timing: Timing {
                duration: fade,
                exit: Duration::ZERO,
            },
        })
    }

    fn sources(&self) -> Vec<Source> {
        let c = &self.config;
        vec![
            Source::new(&c.geometry_url, extract::topojson(&c.geometry_object)),
            Source::new(
                &c.attributes_url,
                extract::records(&c.key_field, &c.value_field),
            ),
        ]
    }

    fn join_policy(&self) -> JoinPolicy {
        self.config.join_policy
    }

    fn tooltip(&self) -> Option<(TooltipText, TooltipConfig)> {
        let name_field = self.config.name_field.clone();
        let group_field = self.config.group_field.clone();
        let text: TooltipText = Box::new(move |e: &JoinedEntity| {
            let name = e.text(&name_field).unwrap_or(e.key.as_str());
            let header = match e.text(&group_field) {
                Some(group) => format!("{name}, {group}"),
                None => name.to_string(),
            };
            if e.no_data {
                format!("{header}\nNo data")
            } else {
                format!("{header}\n{}%", e.value)
            }
        });
        Some((text, self.config.tooltip))
    }
}
