//! Pay beeswarm chart model.
//!
//! Turns a pay dataset into laid-out circles plus everything a renderer needs
//! around them: the y-scale, the reference line for all employees, callouts
//! on the highest and lowest paid occupations, and hover resolution.
//!
//! # Build Steps
//!
//! 1. Split off the reference row and sort occupations by median, highest first.
//! 2. Build a y-scale over the medians, widened to whole `domain_step`s and
//!    mapped onto `(plot_height, 0)` so pay grows upward.
//! 3. Create one point per occupation at `(plot_width / 2, scale(median))`
//!    and run the swarm layout.
//! 4. Index the final positions for hover lookups.

use log::debug;
use serde::Serialize;

use super::annotation::Callout;
use super::config::ChartConfig;
use super::record::{Dataset, PayRecord};
use super::scale::LinearScale;
use crate::error::Result;
use crate::layout::compute_layout;
use crate::spatial::SpatialIndex;
use crate::swarm::{Point, PointId};

/// A fully laid-out chart.
pub struct BeeswarmChart {
    config: ChartConfig,
    scale: LinearScale,
    reference: PayRecord,
    /// Occupations, highest median first. Index-aligned with `points`.
    occupations: Vec<PayRecord>,
    points: Vec<Point>,
    callouts: Vec<Callout>,
    spatial: SpatialIndex,
}

/// Serializable snapshot handed to the renderer.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ChartView {
    pub plot_width: f64,
    pub plot_height: f64,
    pub domain: (f64, f64),
    /// Axis tick values, one per domain step.
    pub ticks: Vec<f64>,
    pub reference: PayRecord,
    pub reference_y: f64,
    /// `[x0, y0, x1, y1, ...]` in occupation order.
    pub positions: Vec<f64>,
    pub occupations: Vec<PayRecord>,
    pub callouts: Vec<Callout>,
}

impl BeeswarmChart {
    /// Lay out a dataset whose first record is the all-employees reference.
    pub fn build(records: Vec<PayRecord>, config: ChartConfig) -> Result<Self> {
        config.validate()?;

        let mut dataset = Dataset::split(records)?;
        dataset.sort_descending();

        let (lo, hi) = dataset
            .median_extent()
            .unwrap_or((dataset.reference.median, dataset.reference.median));
        let scale = LinearScale::rounded(lo, hi, config.domain_step, (config.plot_height(), 0.0));

        let target_x = config.plot_width() / 2.0;
        let mut points: Vec<Point> = dataset
            .occupations
            .iter()
            .map(|record| Point::new(target_x, scale.map(record.median)))
            .collect();

        compute_layout(&mut points, &config.layout_params())?;

        let indexed: Vec<_> = points
            .iter()
            .enumerate()
            .map(|(i, p)| (PointId(i as u32), p.x, p.y))
            .collect();
        let spatial = SpatialIndex::from_points(&indexed);

        let callouts = extreme_indices(points.len())
            .into_iter()
            .map(|i| Callout::fixed(i, &points[i], &dataset.occupations[i], &config))
            .collect();

        debug!(
            "built beeswarm: {} occupations, domain {:?}",
            points.len(),
            scale.domain
        );

        Ok(Self {
            config,
            scale,
            reference: dataset.reference,
            occupations: dataset.occupations,
            points,
            callouts,
            spatial,
        })
    }

    pub fn config(&self) -> &ChartConfig {
        &self.config
    }

    pub fn scale(&self) -> &LinearScale {
        &self.scale
    }

    pub fn points(&self) -> &[Point] {
        &self.points
    }

    pub fn occupations(&self) -> &[PayRecord] {
        &self.occupations
    }

    pub fn reference(&self) -> &PayRecord {
        &self.reference
    }

    /// Vertical position of the all-employees median line.
    pub fn reference_y(&self) -> f64 {
        self.scale.map(self.reference.median)
    }

    /// Callouts on the highest and lowest paid occupations.
    pub fn callouts(&self) -> &[Callout] {
        &self.callouts
    }

    /// Occupation under the cursor: the nearest circle, as long as the cursor
    /// is inside the hover extent. Coordinates are relative to the plot area.
    pub fn hover(&self, x: f64, y: f64) -> Option<usize> {
        let (min_x, min_y, max_x, max_y) = self.config.hover_extent();
        if !(min_x..=max_x).contains(&x) || !(min_y..=max_y).contains(&y) {
            return None;
        }
        self.spatial.nearest(x, y).map(PointId::index)
    }

    /// Hover callout for an occupation. Occupations sharing a median with
    /// either extreme already carry a fixed callout and get none.
    pub fn tooltip(&self, index: usize) -> Option<Callout> {
        let record = self.occupations.get(index)?;
        let is_extreme = self
            .callouts
            .iter()
            .any(|c| self.occupations[c.index].median == record.median);
        if is_extreme {
            return None;
        }
        Some(Callout::tooltip(index, &self.points[index], record, &self.config))
    }

    pub fn view(&self) -> ChartView {
        let (d0, d1) = self.scale.domain;
        let steps = ((d1 - d0) / self.config.domain_step).round() as usize;
        ChartView {
            plot_width: self.config.plot_width(),
            plot_height: self.config.plot_height(),
            domain: self.scale.domain,
            ticks: self.scale.ticks(steps),
            reference: self.reference.clone(),
            reference_y: self.reference_y(),
            positions: self.points.iter().flat_map(|p| [p.x, p.y]).collect(),
            occupations: self.occupations.clone(),
            callouts: self.callouts.clone(),
        }
    }
}

/// First and last index, without repeating a lone occupation.
fn extreme_indices(len: usize) -> Vec<usize> {
    match len {
        0 => Vec::new(),
        1 => vec![0],
        n => vec![0, n - 1],
    }
}
