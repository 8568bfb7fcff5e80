//! Constraint parameters for the swarm simulation.

use serde::Deserialize;

use crate::error::{LayoutError, Result};

/// Configuration for a layout run.
///
/// Deserializes from a camelCase JS object; any missing field falls back to
/// its default.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct LayoutParams {
    /// Pull toward the shared x target, in [0, 1] (default: 1.0).
    pub strength_x: f64,
    /// Pull toward each point's y target, in [0, 1] (default: 1.0).
    pub strength_y: f64,
    /// Required centre-to-centre distance (default: 9.0).
    /// Zero or negative disables collision handling.
    pub min_separation: f64,
    /// Collision sub-passes per tick (default: 5).
    pub collision_iterations: u32,
    /// Number of ticks to run (default: 120).
    pub tick_count: u32,
    /// Upper bound on collision-only passes after the last tick, run until
    /// no pair is closer than `min_separation` (default: 1000). Zero skips
    /// settling.
    pub max_settle_passes: u32,
    /// Fraction of velocity lost per tick, in [0, 1] (default: 0.4).
    pub velocity_decay: f64,
    /// Starting cooling factor (default: 1.0).
    pub alpha: f64,
    /// Cooling floor (default: 0.001).
    pub alpha_min: f64,
    /// Per-tick cooling rate (default: `1 - alpha_min^(1/300)`).
    pub alpha_decay: f64,
    /// Value alpha cools toward (default: 0.0).
    pub alpha_target: f64,
}

/// Ticks over which alpha would cool from 1 to `alpha_min`.
const COOLING_TICKS: f64 = 300.0;

/// Relative slack on `min_separation` when settling.
const SETTLE_TOLERANCE: f64 = 1e-4;

impl Default for LayoutParams {
    fn default() -> Self {
        let alpha_min = 0.001;
        Self {
            strength_x: 1.0,
            strength_y: 1.0,
            min_separation: 9.0,
            collision_iterations: 5,
            tick_count: 120,
            max_settle_passes: 1000,
            velocity_decay: 0.4,
            alpha: 1.0,
            alpha_min,
            alpha_decay: cooling_rate(alpha_min),
            alpha_target: 0.0,
        }
    }
}

/// Decay rate that takes alpha from 1 to `alpha_min` in `COOLING_TICKS` ticks.
pub fn cooling_rate(alpha_min: f64) -> f64 {
    1.0 - alpha_min.powf(1.0 / COOLING_TICKS)
}

impl LayoutParams {
    /// Parameters for circles of `radius` that each keep `padding` clearance.
    ///
    /// Two such circles touch when their centres are `2 * (radius + padding)`
    /// apart.
    pub fn for_circles(radius: f64, padding: f64) -> Self {
        Self {
            min_separation: 2.0 * (radius + padding),
            ..Default::default()
        }
    }

    /// Whether the collision pass does any work.
    #[inline]
    pub fn collisions_enabled(&self) -> bool {
        self.min_separation > 0.0 && self.collision_iterations > 0
    }

    /// Shortfall below `min_separation` that settling accepts as touching.
    #[inline]
    pub fn settle_tolerance(&self) -> f64 {
        self.min_separation * SETTLE_TOLERANCE
    }

    /// Check every numeric field before a run.
    pub fn validate(&self) -> Result<()> {
        unit_interval("strength_x", self.strength_x)?;
        unit_interval("strength_y", self.strength_y)?;
        unit_interval("velocity_decay", self.velocity_decay)?;
        unit_interval("alpha_decay", self.alpha_decay)?;
        finite("min_separation", self.min_separation)?;
        finite("alpha", self.alpha)?;
        finite("alpha_min", self.alpha_min)?;
        finite("alpha_target", self.alpha_target)?;
        Ok(())
    }
}

fn finite(name: &'static str, value: f64) -> Result<()> {
    if value.is_finite() {
        Ok(())
    } else {
        Err(LayoutError::InvalidParameter { name, value })
    }
}

fn unit_interval(name: &'static str, value: f64) -> Result<()> {
    if (0.0..=1.0).contains(&value) {
        Ok(())
    } else {
        Err(LayoutError::InvalidParameter { name, value })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let params = LayoutParams::default();
        assert_eq!(params.strength_x, 1.0);
        assert_eq!(params.strength_y, 1.0);
        assert_eq!(params.collision_iterations, 5);
        assert_eq!(params.tick_count, 120);
        assert_eq!(params.max_settle_passes, 1000);
        assert!((params.settle_tolerance() - 9e-4).abs() < 1e-12);
        assert!((params.alpha_decay - 0.022_762_779).abs() < 1e-9);
        assert!(params.validate().is_ok());
    }

    #[test]
    fn test_for_circles() {
        let params = LayoutParams::for_circles(4.0, 0.5);
        assert_eq!(params.min_separation, 9.0);
        assert!(params.collisions_enabled());
    }

    #[test]
    fn test_collisions_disabled() {
        let mut params = LayoutParams {
            min_separation: 0.0,
            ..Default::default()
        };
        assert!(!params.collisions_enabled());

        params.min_separation = -3.0;
        assert!(!params.collisions_enabled());
        assert!(params.validate().is_ok());

        params.min_separation = 5.0;
        params.collision_iterations = 0;
        assert!(!params.collisions_enabled());
    }

    #[test]
    fn test_rejects_out_of_range_strength() {
        let params = LayoutParams {
            strength_y: 1.5,
            ..Default::default()
        };
        assert_eq!(
            params.validate(),
            Err(LayoutError::InvalidParameter {
                name: "strength_y",
                value: 1.5
            })
        );

        let params = LayoutParams {
            strength_x: f64::NAN,
            ..Default::default()
        };
        assert!(params.validate().is_err());
    }

    #[test]
    fn test_rejects_non_finite_separation() {
        let params = LayoutParams {
            min_separation: f64::INFINITY,
            ..Default::default()
        };
        assert!(matches!(
            params.validate(),
            Err(LayoutError::InvalidParameter {
                name: "min_separation",
                ..
            })
        ));
    }

    #[test]
    fn test_deserialize_partial() {
        let params: LayoutParams =
            serde_json::from_str(r#"{"minSeparation": 5, "tickCount": 200}"#).unwrap();
        assert_eq!(params.min_separation, 5.0);
        assert_eq!(params.tick_count, 200);
        assert_eq!(params.collision_iterations, 5);
        assert_eq!(params.strength_x, 1.0);
    }

    #[test]
    fn test_deserialize_rejects_negative_ticks() {
        let result: std::result::Result<LayoutParams, _> =
            serde_json::from_str(r#"{"tickCount": -1}"#);
        assert!(result.is_err());
    }
}
