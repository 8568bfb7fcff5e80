//! Callout placement for annotated circles.

use serde::Serialize;

use super::config::{ChartConfig, Offset};
use super::record::PayRecord;
use crate::swarm::Point;

/// A circle-subject callout: a note at `(x + dx, y + dy)` connected to the
/// circle at `(x, y)`.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Callout {
    /// Index of the annotated occupation in sorted order.
    pub index: usize,
    pub x: f64,
    pub y: f64,
    pub dx: f64,
    pub dy: f64,
    pub title: String,
    pub label: String,
    pub radius: f64,
    pub radius_padding: f64,
}

impl Callout {
    fn new(
        index: usize,
        point: &Point,
        record: &PayRecord,
        offset: Offset,
        config: &ChartConfig,
    ) -> Self {
        Self {
            index,
            x: point.x,
            y: point.y,
            dx: offset.dx,
            dy: offset.dy,
            title: record.title.clone(),
            label: record.label.clone(),
            radius: config.circle_radius,
            radius_padding: config.circle_padding,
        }
    }

    /// Fixed-offset callout, used for the two extremes.
    pub fn fixed(index: usize, point: &Point, record: &PayRecord, config: &ChartConfig) -> Self {
        Self::new(index, point, record, config.callout_offset, config)
    }

    /// Hover callout offset by quadrant: to the right on the right half of
    /// the plot, upward on the lower half.
    pub fn tooltip(index: usize, point: &Point, record: &PayRecord, config: &ChartConfig) -> Self {
        let Offset { dx, dy } = config.tooltip_offset;
        let offset = Offset {
            dx: if point.x > config.plot_width() / 2.0 { dx } else { -dx },
            dy: if point.y > config.plot_height() / 2.0 { -dy } else { dy },
        };
        Self::new(index, point, record, offset, config)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn placed(x: f64, y: f64) -> Point {
        Point::new(x, y)
    }

    #[test]
    fn test_fixed_callout() {
        let config = ChartConfig::default();
        let record = PayRecord::new(84500.0, "Managers", "Chief executives");
        let callout = Callout::fixed(0, &placed(255.0, 12.0), &record, &config);

        assert_eq!((callout.dx, callout.dy), (50.0, 20.0));
        assert_eq!(callout.title, "Managers");
        assert_eq!(callout.label, "Chief executives");
        assert_eq!((callout.radius, callout.radius_padding), (4.0, 0.5));
    }

    #[test]
    fn test_tooltip_quadrants() {
        // plot is 510 x 660
        let config = ChartConfig::default();
        let record = PayRecord::new(1.0, "", "");

        let top_left = Callout::tooltip(1, &placed(100.0, 100.0), &record, &config);
        assert_eq!((top_left.dx, top_left.dy), (-50.0, 30.0));

        let bottom_right = Callout::tooltip(1, &placed(300.0, 500.0), &record, &config);
        assert_eq!((bottom_right.dx, bottom_right.dy), (50.0, -30.0));

        // Exactly on the centre lines counts as left/top.
        let centre = Callout::tooltip(1, &placed(255.0, 330.0), &record, &config);
        assert_eq!((centre.dx, centre.dy), (-50.0, 30.0));
    }

    #[test]
    fn test_serializes_camel_case() {
        let config = ChartConfig::default();
        let record = PayRecord::new(1.0, "t", "l");
        let callout = Callout::fixed(3, &placed(1.0, 2.0), &record, &config);
        let json = serde_json::to_value(&callout).unwrap();
        assert_eq!(json["radiusPadding"], 0.5);
        assert_eq!(json["index"], 3);
    }
}
