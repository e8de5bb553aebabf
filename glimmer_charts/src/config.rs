// Copyright 2025 the Glimmer Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Chart configuration.
//!
//! Every struct deserializes with `#[serde(default)]`, so a host can override
//! a subset of fields from JSON and keep the defaults for the rest.

use std::time::Duration;

use glimmer_data::JoinPolicy;
use glimmer_scale::{Color, ScaleError, Threshold};
use kurbo::Vec2;
use serde::{Deserialize, Serialize};

/// Space around the plot area.
#[derive(Copy, Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Margins {
    /// Top margin.
    pub top: f64,
    /// Right margin.
    pub right: f64,
    /// Bottom margin.
    pub bottom: f64,
    /// Left margin.
    pub left: f64,
}

impl Default for Margins {
    fn default() -> Self {
        Self {
            top: 20.0,
            right: 20.0,
            bottom: 30.0,
            left: 40.0,
        }
    }
}

/// Ordered breakpoints and colors for a threshold fill.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct ThresholdFill {
    /// Strictly ascending breakpoints.
    pub breakpoints: Vec<f64>,
    /// One more color than breakpoints.
    pub colors: Vec<Color>,
}

impl ThresholdFill {
    /// Validated scale.
    pub fn scale(&self) -> Result<Threshold<Color>, ScaleError> {
        Threshold::new(self.breakpoints.clone(), self.colors.clone())
    }
}

/// Tooltip placement and fades.
#[derive(Copy, Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TooltipConfig {
    /// Anchor offset from the pointer, `[dx, dy]`.
    pub offset: [f64; 2],
    /// Opacity when shown.
    pub opacity: f64,
    /// Fade-in length in milliseconds.
    pub fade_in_ms: u64,
    /// Fade-out length in milliseconds.
    pub fade_out_ms: u64,
}

impl TooltipConfig {
    /// Offset as a vector.
    pub fn offset(&self) -> Vec2 {
        Vec2::new(self.offset[0], self.offset[1])
    }

    /// Fade-in length.
    pub fn fade_in(&self) -> Duration {
        Duration::from_millis(self.fade_in_ms)
    }

    /// Fade-out length.
    pub fn fade_out(&self) -> Duration {
        Duration::from_millis(self.fade_out_ms)
    }
}

impl Default for TooltipConfig {
    fn default() -> Self {
        Self {
            offset: [0.0, -28.0],
            opacity: 1.0,
            fade_in_ms: 250,
            fade_out_ms: 250,
        }
    }
}

/// Bar chart settings.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct BarChartConfig {
    /// Total height; the width comes from the surface size.
    pub height: f64,
    /// Plot margins.
    pub margins: Margins,
    /// Band padding fraction in `[0, 1)`.
    pub padding: f64,
    /// Flat bar color.
    pub fill: Color,
    /// Color by value instead of `fill`.
    pub threshold: Option<ThresholdFill>,
    /// Enter and update length in milliseconds.
    pub duration_ms: u64,
    /// Exit fade length in milliseconds.
    pub exit_ms: u64,
    /// Per-bar delay in milliseconds, multiplied by the bar index.
    pub stagger_ms: u64,
    /// Round the value axis outward to nice numbers.
    pub nice: bool,
}

impl Default for BarChartConfig {
    fn default() -> Self {
        Self {
            height: 300.0,
            margins: Margins::default(),
            padding: 0.1,
            fill: Color::STEELBLUE,
            threshold: None,
            duration_ms: 1000,
            exit_ms: 0,
            stagger_ms: 0,
            nice: true,
        }
    }
}

/// Line chart settings.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LineChartConfig {
    /// Plot width.
    pub width: f64,
    /// Plot height.
    pub height: f64,
    /// Space kept around the plot for the axes.
    pub margins: Margins,
    /// Value axis domain.
    pub y_domain: [f64; 2],
    /// Dot radius.
    pub radius: f64,
    /// Dot fill and line stroke.
    pub color: Color,
    /// Dot reveal length in milliseconds.
    pub duration_ms: u64,
    /// Per-dot delay in milliseconds, multiplied by the dot index.
    pub stagger_ms: u64,
    /// Tooltip behavior.
    pub tooltip: TooltipConfig,
}

impl Default for LineChartConfig {
    fn default() -> Self {
        Self {
            width: 300.0,
            height: 150.0,
            margins: Margins {
                top: 10.0,
                right: 40.0,
                bottom: 30.0,
                left: 20.0,
            },
            y_domain: [0.0, 150.0],
            radius: 5.0,
            color: Color::BLUE,
            duration_ms: 1000,
            stagger_ms: 0,
            tooltip: TooltipConfig::default(),
        }
    }
}

/// Choropleth legend settings.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LegendConfig {
    /// Legend layer origin on the surface, `[x, y]`.
    pub origin: [f64; 2],
    /// Swatch strip width.
    pub width: f64,
    /// Swatch strip height.
    pub height: f64,
    /// Inset of the strip inside the backdrop.
    pub padding: f64,
    /// Value range covered by the strip.
    pub domain: [f64; 2],
    /// Axis tick values, labelled `N%`.
    pub ticks: Vec<f64>,
}

impl Default for LegendConfig {
    fn default() -> Self {
        Self {
            origin: [20.0, 630.0],
            width: 580.0,
            height: 30.0,
            padding: 2.0,
            domain: [0.0, 60.0],
            ticks: (1..=12).map(|i| f64::from(i) * 5.0).collect(),
        }
    }
}

/// Education attainment choropleth settings.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ChoroplethConfig {
    /// TopoJSON topology with the county geometries.
    pub geometry_url: String,
    /// Name of the geometry collection in the topology.
    pub geometry_object: String,
    /// Attribute records.
    pub attributes_url: String,
    /// Attribute field matching the geometry id.
    pub key_field: String,
    /// Attribute field with the percentage.
    pub value_field: String,
    /// Region name field.
    pub name_field: String,
    /// Group (state) field.
    pub group_field: String,
    /// Region colors by value.
    pub fill: ThresholdFill,
    /// Color of regions without a matching record.
    pub no_data: Color,
    /// Handling of regions without a matching record.
    pub join_policy: JoinPolicy,
    /// Region enter fade in milliseconds.
    pub fade_in_ms: u64,
    /// Tooltip behavior.
    pub tooltip: TooltipConfig,
    /// Legend layout.
    pub legend: LegendConfig,
}

const EDUCATION_COLORS: [Color; 12] = [
    Color::rgb(0xff, 0xff, 0xcc),
    Color::rgb(0xd9, 0xf0, 0xa3),
    Color::rgb(0xad, 0xdd, 0x8e),
    Color::rgb(0x78, 0xc6, 0x79),
    Color::rgb(0x41, 0xab, 0x5d),
    Color::rgb(0x23, 0x84, 0x43),
    Color::rgb(0x00, 0x68, 0x37),
    Color::rgb(0x00, 0x45, 0x29),
    Color::rgb(0x00, 0x2c, 0x1c),
    Color::rgb(0x00, 0x15, 0x14),
    Color::rgb(0x00, 0x0a, 0x0d),
    Color::rgb(0x00, 0x00, 0x00),
];

impl Default for ChoroplethConfig {
    fn default() -> Self {
        const BASE: &str = "https://cdn.freecodecamp.org/testable-projects-fcc/data/choropleth_map";
        Self {
            geometry_url: format!("{BASE}/counties.json"),
            geometry_object: "counties".into(),
            attributes_url: format!("{BASE}/for_user_education.json"),
            key_field: "fips".into(),
            value_field: "bachelorsOrHigher".into(),
            name_field: "area_name".into(),
            group_field: "state".into(),
            fill: ThresholdFill {
                breakpoints: (1..=11).map(|i| f64::from(i) * 5.0).collect(),
                colors: EDUCATION_COLORS.to_vec(),
            },
            no_data: Color::LIGHTGRAY,
            join_policy: JoinPolicy::MarkNoData,
            fade_in_ms: 0,
            tooltip: TooltipConfig {
                offset: [10.0, -30.0],
                opacity: 0.9,
                fade_in_ms: 200,
                fade_out_ms: 200,
            },
            legend: LegendConfig::default(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn partial_json_keeps_defaults() {
        let cfg: BarChartConfig =
            serde_json::from_str(r##"{ "height": 200, "fill": "#ff0000" }"##).unwrap();
        assert_eq!(cfg.height, 200.0);
        assert_eq!(cfg.fill, Color::rgb(255, 0, 0));
        assert_eq!(cfg.margins, Margins::default());
        assert_eq!(cfg.duration_ms, 1000);
    }

    #[test]
    fn default_choropleth_fill_is_well_formed() {
        let cfg = ChoroplethConfig::default();
        let scale = cfg.fill.scale().unwrap();
        assert_eq!(scale.apply(3.0), Some(&EDUCATION_COLORS[0]));
        assert_eq!(scale.apply(5.0), Some(&EDUCATION_COLORS[1]));
        assert_eq!(scale.apply(61.0), Some(&EDUCATION_COLORS[11]));
        assert_eq!(cfg.legend.ticks.len(), 12);
    }

    #[test]
    fn mismatched_threshold_is_a_config_error() {
        let fill = ThresholdFill {
            breakpoints: vec![1.0, 2.0],
            colors: vec![Color::BLACK],
        };
        let err = fill.scale().unwrap_err();
        assert_eq!(err.kind(), glimmer_scale::ErrorKind::Config);
    }
}
