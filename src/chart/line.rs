use serde::Serialize;

use super::path::{area_path, line_path};
use super::ticks::{AxisTick, TickDensity, index_ticks, value_ticks};
use super::{ChartSeries, Frame, Point, Y_TICK_COUNT};
use crate::session::Currency;

/// Geometry for a single-series line chart with a shaded area underneath.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct LineChart {
    pub frame: Frame,
    pub line_path: String,
    pub area_path: String,
    pub markers: Vec<Point>,
    pub x_ticks: Vec<AxisTick>,
    pub y_ticks: Vec<AxisTick>,
}

impl LineChart {
    /// Returns `None` for an empty series, which callers show as "no data".
    pub fn build(series: &ChartSeries, frame: &Frame, currency: Currency) -> Option<Self> {
        if series.is_empty() {
            return None;
        }

        let max = series.max_y();
        let y_scale = frame.value_scale(max);
        let x_scale = frame.index_scale(series.len());

        let points: Vec<Point> = series
            .points()
            .iter()
            .enumerate()
            .map(|(idx, p)| Point {
                x: x_scale.scale(idx),
                y: y_scale.scale(p.y),
            })
            .collect();

        let tick_indices = index_ticks(series.len(), TickDensity::LINE);
        let markers = tick_indices.iter().map(|&idx| points[idx]).collect();
        let x_ticks = tick_indices
            .iter()
            .map(|&idx| {
                let value = series.points()[idx].x;
                AxisTick {
                    value,
                    position: points[idx].x,
                    label: value.to_string(),
                }
            })
            .collect();
        let y_ticks = value_ticks(0.0, max, Y_TICK_COUNT)
            .into_iter()
            .map(|value| AxisTick {
                value,
                position: y_scale.scale(value),
                label: currency.format_compact(value),
            })
            .collect();

        Some(Self {
            frame: *frame,
            line_path: line_path(&points),
            area_path: area_path(&points, frame.baseline()),
            markers,
            x_ticks,
            y_ticks,
        })
    }
}
