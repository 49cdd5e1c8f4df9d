//! Chart geometry: pure mappings from an ordered series to pixel-space paths,
//! markers and axis ticks. Nothing here knows which calculator produced the data.

mod area;
mod line;
mod path;
mod pie;
mod scale;
mod ticks;

use serde::Serialize;

pub use area::{PhaseGeometry, PhaseMarker, PhasedAreaChart};
pub use line::LineChart;
pub use path::{PathBuilder, area_path, line_path};
pub use pie::{PieDatum, PieSegment, arc_path, pie_segments};
pub use scale::{IndexScale, ValueScale};
pub use ticks::{AxisTick, TickDensity, index_ticks, value_ticks};

/// Number of evenly spaced value ticks on the y axis.
pub const Y_TICK_COUNT: usize = 5;

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct SeriesPoint {
    pub x: f64,
    pub y: f64,
}

/// Transient view model handed to the renderers; never mutated by them.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct ChartSeries {
    points: Vec<SeriesPoint>,
}

impl ChartSeries {
    pub fn new(points: Vec<SeriesPoint>) -> Self {
        Self { points }
    }

    pub fn points(&self) -> &[SeriesPoint] {
        &self.points
    }

    pub fn len(&self) -> usize {
        self.points.len()
    }

    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }

    /// Largest y value, floored at zero since financial charts start at zero.
    pub fn max_y(&self) -> f64 {
        self.points
            .iter()
            .map(|p| p.y)
            .filter(|y| y.is_finite())
            .fold(0.0, f64::max)
    }
}

impl FromIterator<(f64, f64)> for ChartSeries {
    fn from_iter<I: IntoIterator<Item = (f64, f64)>>(iter: I) -> Self {
        Self::new(iter.into_iter().map(|(x, y)| SeriesPoint { x, y }).collect())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct Point {
    pub x: f64,
    pub y: f64,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct Padding {
    pub top: f64,
    pub right: f64,
    pub bottom: f64,
    pub left: f64,
}

/// Outer size of a chart and the padding reserved for axes and labels.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct Frame {
    pub width: f64,
    pub height: f64,
    pub padding: Padding,
}

impl Default for Frame {
    fn default() -> Self {
        Self {
            width: 300.0,
            height: 200.0,
            padding: Padding {
                top: 20.0,
                right: 20.0,
                bottom: 30.0,
                left: 40.0,
            },
        }
    }
}

impl Frame {
    pub fn inner_width(&self) -> f64 {
        self.width - self.padding.left - self.padding.right
    }

    pub fn inner_height(&self) -> f64 {
        self.height - self.padding.top - self.padding.bottom
    }

    /// Pixel y of the zero line.
    pub fn baseline(&self) -> f64 {
        self.height - self.padding.bottom
    }

    pub fn value_scale(&self, max: f64) -> ValueScale {
        ValueScale::new(0.0, max, self.padding.top, self.baseline())
    }

    pub fn index_scale(&self, count: usize) -> IndexScale {
        IndexScale::new(count, self.padding.left, self.padding.left + self.inner_width())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_frame_matches_plot_area() {
        let frame = Frame::default();
        assert_eq!(frame.inner_width(), 240.0);
        assert_eq!(frame.inner_height(), 150.0);
        assert_eq!(frame.baseline(), 170.0);
    }

    #[test]
    fn max_y_ignores_non_finite_and_floors_at_zero() {
        let series: ChartSeries = [(0.0, -5.0), (1.0, f64::NAN)].into_iter().collect();
        assert_eq!(series.max_y(), 0.0);

        let series: ChartSeries = [(0.0, 3.0), (1.0, 12.5)].into_iter().collect();
        assert_eq!(series.max_y(), 12.5);
    }
}
