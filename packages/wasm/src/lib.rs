//! Pay Swarm - WASM Module
//!
//! This module lays out beeswarm charts of median pay by occupation: every
//! occupation becomes a circle pulled toward its pay level on the y axis and
//! toward a shared x position, while a collision pass keeps circles apart.
//! It is compiled to WebAssembly and exposes a JavaScript-friendly API via
//! wasm-bindgen.
//!
//! # Architecture
//!
//! - `swarm`: Point type and the engine that owns a point set
//! - `layout`: Force relaxation with pairwise collision resolution
//! - `spatial`: R-tree spatial indexing for O(log n) hit testing
//! - `chart`: Scale, records, callouts and chart assembly around the layout

use js_sys::Float64Array;
use serde::de::DeserializeOwned;
use wasm_bindgen::prelude::*;

pub mod chart;
pub mod error;
pub mod layout;
pub mod spatial;
pub mod swarm;

use chart::{BeeswarmChart, ChartConfig, PayRecord};
pub use error::LayoutError;
use layout::LayoutParams;
use swarm::{Point, PointId, SwarmEngine};

/// Initialize the WASM module.
#[wasm_bindgen(start)]
pub fn init() {
    console_error_panic_hook::set_once();
    console_log::init_with_level(log::Level::Info).ok();
    log::debug!("payswarm wasm module initialized");
}

/// Decode an optional JS object; `undefined`/`null` yield the defaults.
fn decode_or_default<T: DeserializeOwned + Default>(value: JsValue) -> error::Result<T> {
    if value.is_undefined() || value.is_null() {
        return Ok(T::default());
    }
    serde_wasm_bindgen::from_value(value).map_err(|e| LayoutError::Decode(e.to_string()))
}

/// Lay out one point per y target around a shared x target.
///
/// Returns a Float64Array of positions [x0, y0, x1, y1, ...].
///
/// # Arguments
///
/// * `targets_y` - Pixel y target per point, in collision-resolution order
/// * `target_x` - Shared pixel x target
/// * `params` - Optional layout parameters (camelCase, defaults when omitted)
#[wasm_bindgen(js_name = computeLayout)]
pub fn compute_layout_js(
    targets_y: &[f64],
    target_x: f64,
    params: JsValue,
) -> Result<Float64Array, JsError> {
    let params: LayoutParams = decode_or_default(params)?;
    let positions = layout_targets(targets_y, target_x, &params)?;
    Ok(Float64Array::from(&positions[..]))
}

/// Shared by `computeLayout` and the native tests.
fn layout_targets(
    targets_y: &[f64],
    target_x: f64,
    params: &LayoutParams,
) -> error::Result<Vec<f64>> {
    let mut points: Vec<Point> = targets_y.iter().map(|&y| Point::new(target_x, y)).collect();
    let points = layout::compute_layout(&mut points, params)?;
    Ok(points.iter().flat_map(|p| [p.x, p.y]).collect())
}

/// Main entry point for incremental use.
///
/// This struct wraps the internal SwarmEngine and provides the public API
/// exposed to JavaScript.
#[wasm_bindgen]
pub struct PaySwarmWasm {
    engine: SwarmEngine,
}

#[wasm_bindgen]
impl PaySwarmWasm {
    /// Create an empty engine with default layout parameters.
    #[wasm_bindgen(constructor)]
    pub fn new() -> Self {
        Self {
            engine: SwarmEngine::new(),
        }
    }

    /// Create an engine with the given layout parameters.
    #[wasm_bindgen(js_name = withParams)]
    pub fn with_params(params: JsValue) -> Result<PaySwarmWasm, JsError> {
        let params: LayoutParams = decode_or_default(params)?;
        params.validate()?;
        Ok(Self {
            engine: SwarmEngine::with_params(params),
        })
    }

    /// Replace the layout parameters used by the next `runLayout`.
    #[wasm_bindgen(js_name = setParams)]
    pub fn set_params(&mut self, params: JsValue) -> Result<(), JsError> {
        let params: LayoutParams = decode_or_default(params)?;
        params.validate()?;
        self.engine.set_params(params);
        Ok(())
    }

    // =========================================================================
    // Point Operations
    // =========================================================================

    /// Add a point at its target position. Returns the point ID.
    #[wasm_bindgen(js_name = addPoint)]
    pub fn add_point(&mut self, target_x: f64, target_y: f64) -> u32 {
        self.engine.add_point(target_x, target_y).raw()
    }

    /// Add one point per y target, all sharing `target_x`.
    /// Returns the number of points added.
    #[wasm_bindgen(js_name = addPointsFromTargets)]
    pub fn add_points_from_targets(&mut self, targets_y: &[f64], target_x: f64) -> u32 {
        self.engine.add_points_from_targets(targets_y, target_x)
    }

    #[wasm_bindgen(js_name = pointCount)]
    pub fn point_count(&self) -> u32 {
        self.engine.len() as u32
    }

    #[wasm_bindgen(js_name = getPointX)]
    pub fn get_point_x(&self, point_id: u32) -> Option<f64> {
        self.engine.point(PointId(point_id)).map(|p| p.x)
    }

    #[wasm_bindgen(js_name = getPointY)]
    pub fn get_point_y(&self, point_id: u32) -> Option<f64> {
        self.engine.point(PointId(point_id)).map(|p| p.y)
    }

    /// Remove all points.
    pub fn clear(&mut self) {
        self.engine.clear();
    }

    // =========================================================================
    // Layout
    // =========================================================================

    /// Reset all points to their targets and lay them out.
    #[wasm_bindgen(js_name = runLayout)]
    pub fn run_layout(&mut self) -> Result<(), JsError> {
        self.engine.run_layout()?;
        Ok(())
    }

    /// Positions as a Float64Array [x0, y0, x1, y1, ...].
    #[wasm_bindgen(js_name = getPositions)]
    pub fn get_positions(&self) -> Float64Array {
        Float64Array::from(&self.engine.positions()[..])
    }

    /// Sum of separation shortfalls across all pairs; 0 means no overlap.
    #[wasm_bindgen(js_name = totalOverlap)]
    pub fn total_overlap(&self) -> f64 {
        self.engine.total_overlap()
    }

    /// Bounding box as [min_x, min_y, max_x, max_y], or None when empty.
    #[wasm_bindgen(js_name = getBounds)]
    pub fn get_bounds(&self) -> Option<Vec<f64>> {
        self.engine
            .get_bounds()
            .map(|(min_x, min_y, max_x, max_y)| vec![min_x, min_y, max_x, max_y])
    }

    // =========================================================================
    // Spatial Queries
    // =========================================================================

    /// Find the point nearest to a location.
    #[wasm_bindgen(js_name = findNearestPoint)]
    pub fn find_nearest_point(&self, x: f64, y: f64) -> Option<u32> {
        self.engine.find_nearest(x, y).map(PointId::raw)
    }

    /// Find the nearest point within a maximum distance.
    #[wasm_bindgen(js_name = findNearestPointWithin)]
    pub fn find_nearest_point_within(&self, x: f64, y: f64, max_distance: f64) -> Option<u32> {
        self.engine
            .find_nearest_within(x, y, max_distance)
            .map(PointId::raw)
    }

    /// Find all points inside a rectangle. Returns a Uint32Array of IDs.
    #[wasm_bindgen(js_name = findPointsInRect)]
    pub fn find_points_in_rect(&self, min_x: f64, min_y: f64, max_x: f64, max_y: f64) -> Vec<u32> {
        self.engine
            .find_in_rect(min_x, min_y, max_x, max_y)
            .into_iter()
            .map(PointId::raw)
            .collect()
    }
}

impl Default for PaySwarmWasm {
    fn default() -> Self {
        Self::new()
    }
}

/// Lay out a pay chart in one call and return its view: positions, scale,
/// reference line and extreme callouts.
///
/// Use `PayChartWasm` instead when hover and tooltips are needed.
#[wasm_bindgen(js_name = buildChart)]
pub fn build_chart(records: JsValue, config: JsValue) -> Result<JsValue, JsError> {
    PayChartWasm::new(records, config)?.view()
}

/// A laid-out pay chart.
#[wasm_bindgen]
pub struct PayChartWasm {
    chart: BeeswarmChart,
}

#[wasm_bindgen]
impl PayChartWasm {
    /// Build a chart from the dataset array (first entry: all employees).
    ///
    /// # Arguments
    ///
    /// * `records` - Array of `{ median_4, description_2, description_4 }`
    /// * `config` - Optional chart configuration (camelCase)
    #[wasm_bindgen(constructor)]
    pub fn new(records: JsValue, config: JsValue) -> Result<PayChartWasm, JsError> {
        let records: Vec<PayRecord> = decode_or_default(records)?;
        let config: ChartConfig = decode_or_default(config)?;
        Ok(Self {
            chart: BeeswarmChart::build(records, config)?,
        })
    }

    /// Everything the renderer draws: positions, scale, reference line and
    /// extreme callouts.
    pub fn view(&self) -> Result<JsValue, JsError> {
        serde_wasm_bindgen::to_value(&self.chart.view()).map_err(|e| JsError::new(&e.to_string()))
    }

    /// Index of the occupation under the cursor, in plot coordinates.
    pub fn hover(&self, x: f64, y: f64) -> Option<u32> {
        self.chart.hover(x, y).map(|i| i as u32)
    }

    /// Tooltip callout for an occupation, or `undefined` for the extremes.
    pub fn tooltip(&self, index: u32) -> Result<JsValue, JsError> {
        match self.chart.tooltip(index as usize) {
            Some(callout) => serde_wasm_bindgen::to_value(&callout)
                .map_err(|e| JsError::new(&e.to_string())),
            None => Ok(JsValue::UNDEFINED),
        }
    }
}
