use serde::Serialize;

/// Linear map from a value domain to a vertical pixel range, where larger
/// values sit higher (smaller pixel y).
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ValueScale {
    pub min: f64,
    pub max: f64,
    pub pixel_top: f64,
    pub pixel_bottom: f64,
}

impl ValueScale {
    pub fn new(min: f64, max: f64, pixel_top: f64, pixel_bottom: f64) -> Self {
        Self {
            min,
            max,
            pixel_top,
            pixel_bottom,
        }
    }

    /// A flat domain maps every value onto the bottom edge.
    pub fn is_degenerate(&self) -> bool {
        let span = self.max - self.min;
        !(span.is_finite() && span > 0.0)
    }

    pub fn scale(&self, value: f64) -> f64 {
        if self.is_degenerate() {
            return self.pixel_bottom;
        }
        let fraction = (value - self.min) / (self.max - self.min);
        self.pixel_bottom - fraction * (self.pixel_bottom - self.pixel_top)
    }
}

/// Spreads `count` evenly spaced indices across a horizontal pixel range.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct IndexScale {
    pub count: usize,
    pub pixel_left: f64,
    pub pixel_right: f64,
}

impl IndexScale {
    pub fn new(count: usize, pixel_left: f64, pixel_right: f64) -> Self {
        Self {
            count,
            pixel_left,
            pixel_right,
        }
    }

    /// A single point is pinned to the left edge.
    pub fn scale(&self, index: usize) -> f64 {
        if self.count <= 1 {
            return self.pixel_left;
        }
        let fraction = index as f64 / (self.count - 1) as f64;
        self.pixel_left + fraction * (self.pixel_right - self.pixel_left)
    }
}
