//! Chart geometry and layout configuration.
//!
//! Nested objects in a chart config are patches: a field left out keeps the
//! chart's default, which is not always the default of the nested type (the
//! chart pulls sideways with strength 0.1, tooltips sit 30px off vertically).

use serde::{Deserialize, Deserializer};

use crate::error::{LayoutError, Result};
use crate::layout::LayoutParams;

/// Space reserved around the plot area.
#[derive(Debug, Clone, Copy, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct Margin {
    pub top: f64,
    pub right: f64,
    pub bottom: f64,
    pub left: f64,
}

impl Default for Margin {
    fn default() -> Self {
        Self {
            top: 40.0,
            right: 40.0,
            bottom: 100.0,
            left: 50.0,
        }
    }
}

/// Callout offset from the annotated circle, in pixels.
#[derive(Debug, Clone, Copy, PartialEq, Deserialize)]
pub struct Offset {
    pub dx: f64,
    pub dy: f64,
}

/// Configuration for a pay beeswarm chart.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct ChartConfig {
    /// Canvas width including margins (default: 600).
    pub width: f64,
    /// Canvas height including margins (default: 800).
    pub height: f64,
    pub margin: Margin,
    /// Circle radius (default: 4.0).
    pub circle_radius: f64,
    /// Clearance kept around each circle (default: 0.5).
    pub circle_padding: f64,
    /// The value domain is widened to multiples of this step (default: 10000).
    pub domain_step: f64,
    /// Offset of the callouts on the two extremes (default: 50, 20).
    #[serde(deserialize_with = "callout_offset")]
    pub callout_offset: Offset,
    /// Offset magnitude of hover tooltips; the sign follows the quadrant
    /// (default: 50, 30).
    #[serde(deserialize_with = "tooltip_offset")]
    pub tooltip_offset: Offset,
    /// Simulation settings. `min_separation` is derived from the circle
    /// radius and padding; `strength_x` defaults to 0.1 so the swarm spreads.
    #[serde(deserialize_with = "chart_layout")]
    pub layout: LayoutParams,
}

impl Default for ChartConfig {
    fn default() -> Self {
        Self {
            width: 600.0,
            height: 800.0,
            margin: Margin::default(),
            circle_radius: 4.0,
            circle_padding: 0.5,
            domain_step: 10_000.0,
            callout_offset: CALLOUT_OFFSET,
            tooltip_offset: TOOLTIP_OFFSET,
            layout: LayoutParams {
                strength_x: 0.1,
                ..LayoutParams::default()
            },
        }
    }
}

const CALLOUT_OFFSET: Offset = Offset { dx: 50.0, dy: 20.0 };
const TOOLTIP_OFFSET: Offset = Offset { dx: 50.0, dy: 30.0 };

#[derive(Default, Deserialize)]
#[serde(default)]
struct OffsetPatch {
    dx: Option<f64>,
    dy: Option<f64>,
}

impl OffsetPatch {
    fn apply(self, base: Offset) -> Offset {
        Offset {
            dx: self.dx.unwrap_or(base.dx),
            dy: self.dy.unwrap_or(base.dy),
        }
    }
}

#[derive(Default, Deserialize)]
#[serde(rename_all = "camelCase", default)]
struct LayoutPatch {
    strength_x: Option<f64>,
    strength_y: Option<f64>,
    min_separation: Option<f64>,
    collision_iterations: Option<u32>,
    tick_count: Option<u32>,
    max_settle_passes: Option<u32>,
    velocity_decay: Option<f64>,
    alpha: Option<f64>,
    alpha_min: Option<f64>,
    alpha_decay: Option<f64>,
    alpha_target: Option<f64>,
}

impl LayoutPatch {
    fn apply(self, base: LayoutParams) -> LayoutParams {
        LayoutParams {
            strength_x: self.strength_x.unwrap_or(base.strength_x),
            strength_y: self.strength_y.unwrap_or(base.strength_y),
            min_separation: self.min_separation.unwrap_or(base.min_separation),
            collision_iterations: self.collision_iterations.unwrap_or(base.collision_iterations),
            tick_count: self.tick_count.unwrap_or(base.tick_count),
            max_settle_passes: self.max_settle_passes.unwrap_or(base.max_settle_passes),
            velocity_decay: self.velocity_decay.unwrap_or(base.velocity_decay),
            alpha: self.alpha.unwrap_or(base.alpha),
            alpha_min: self.alpha_min.unwrap_or(base.alpha_min),
            alpha_decay: self.alpha_decay.unwrap_or(base.alpha_decay),
            alpha_target: self.alpha_target.unwrap_or(base.alpha_target),
        }
    }
}

fn callout_offset<'de, D: Deserializer<'de>>(
    deserializer: D,
) -> std::result::Result<Offset, D::Error> {
    Ok(OffsetPatch::deserialize(deserializer)?.apply(CALLOUT_OFFSET))
}

fn tooltip_offset<'de, D: Deserializer<'de>>(
    deserializer: D,
) -> std::result::Result<Offset, D::Error> {
    Ok(OffsetPatch::deserialize(deserializer)?.apply(TOOLTIP_OFFSET))
}

fn chart_layout<'de, D: Deserializer<'de>>(
    deserializer: D,
) -> std::result::Result<LayoutParams, D::Error> {
    Ok(LayoutPatch::deserialize(deserializer)?.apply(ChartConfig::default().layout))
}

impl ChartConfig {
    /// Width of the area circles are drawn in.
    pub fn plot_width(&self) -> f64 {
        self.width - self.margin.left - self.margin.right
    }

    /// Height of the area circles are drawn in.
    pub fn plot_height(&self) -> f64 {
        self.height - self.margin.top - self.margin.bottom
    }

    /// Region (in plot coordinates) in which hovering resolves to a point:
    /// the plot area grown by the margins, as (min_x, min_y, max_x, max_y).
    pub fn hover_extent(&self) -> (f64, f64, f64, f64) {
        (
            -self.margin.left,
            -self.margin.top,
            self.plot_width() + self.margin.right,
            self.plot_height() + self.margin.top,
        )
    }

    /// Layout parameters with the separation implied by the circle size.
    pub fn layout_params(&self) -> LayoutParams {
        LayoutParams {
            min_separation: 2.0 * (self.circle_radius + self.circle_padding),
            ..self.layout.clone()
        }
    }

    pub fn validate(&self) -> Result<()> {
        positive("plot_width", self.plot_width())?;
        positive("plot_height", self.plot_height())?;
        positive("domain_step", self.domain_step)?;
        if !(self.circle_radius >= 0.0 && self.circle_radius.is_finite()) {
            return Err(LayoutError::InvalidParameter {
                name: "circle_radius",
                value: self.circle_radius,
            });
        }
        if !self.circle_padding.is_finite() {
            return Err(LayoutError::InvalidParameter {
                name: "circle_padding",
                value: self.circle_padding,
            });
        }
        self.layout_params().validate()
    }
}

fn positive(name: &'static str, value: f64) -> Result<()> {
    if value > 0.0 && value.is_finite() {
        Ok(())
    } else {
        Err(LayoutError::InvalidParameter { name, value })
    }
}
