//! Linear value-to-pixel mapping.

use serde::Serialize;

/// Maps a continuous domain onto a pixel range.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct LinearScale {
    pub domain: (f64, f64),
    pub range: (f64, f64),
}

impl LinearScale {
    pub fn new(domain: (f64, f64), range: (f64, f64)) -> Self {
        Self { domain, range }
    }

    /// Scale whose domain is `[min, max]` widened outward to multiples of
    /// `step`, e.g. 21 500..87 200 with step 10 000 becomes 20 000..90 000.
    pub fn rounded(min: f64, max: f64, step: f64, range: (f64, f64)) -> Self {
        let lo = (min / step).floor() * step;
        let hi = (max / step).ceil() * step;
        Self::new((lo, hi), range)
    }

    /// Map a domain value to the range. A degenerate domain maps everything
    /// to the middle of the range.
    pub fn map(&self, value: f64) -> f64 {
        let (d0, d1) = self.domain;
        let (r0, r1) = self.range;
        if d1 == d0 {
            return (r0 + r1) / 2.0;
        }
        r0 + (value - d0) / (d1 - d0) * (r1 - r0)
    }

    /// Map a range value back to the domain.
    pub fn invert(&self, pixel: f64) -> f64 {
        let (d0, d1) = self.domain;
        let (r0, r1) = self.range;
        if r1 == r0 {
            return (d0 + d1) / 2.0;
        }
        d0 + (pixel - r0) / (r1 - r0) * (d1 - d0)
    }

    /// `count + 1` evenly spaced domain values from start to end, inclusive.
    pub fn ticks(&self, count: usize) -> Vec<f64> {
        let (d0, d1) = self.domain;
        if count == 0 {
            return vec![d0];
        }
        let step = (d1 - d0) / count as f64;
        (0..=count).map(|i| d0 + step * i as f64).collect()
    }
}
