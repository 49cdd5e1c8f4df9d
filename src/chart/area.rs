use serde::Serialize;

use super::path::{area_path, line_path};
use super::ticks::{AxisTick, TickDensity, index_ticks, value_ticks};
use super::{ChartSeries, Frame, Point, Y_TICK_COUNT};
use crate::session::Currency;

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PhaseGeometry {
    /// Inclusive index range of the series covered by this phase.
    pub start_index: usize,
    pub end_index: usize,
    pub line_path: String,
    pub area_path: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PhaseMarker {
    pub point: Point,
    pub index: usize,
    pub second_phase: bool,
    /// The first point of the second phase.
    pub emphasized: bool,
}

/// Area chart whose series is split into two consecutive phases that share
/// the boundary point so the two lines join up.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PhasedAreaChart {
    pub frame: Frame,
    pub first: PhaseGeometry,
    pub second: Option<PhaseGeometry>,
    /// Pixel x of the vertical divider at the last point of the first phase.
    pub split_x: Option<f64>,
    pub markers: Vec<PhaseMarker>,
    pub x_ticks: Vec<AxisTick>,
    pub y_ticks: Vec<AxisTick>,
}

impl PhasedAreaChart {
    /// `split_at` is the index of the first point of the second phase. A split
    /// at 0 or past the end renders the whole series as the first phase.
    pub fn build(
        series: &ChartSeries,
        split_at: Option<usize>,
        frame: &Frame,
        currency: Currency,
    ) -> Option<Self> {
        if series.is_empty() {
            return None;
        }

        let len = series.len();
        let split_at = split_at.filter(|&idx| idx > 0 && idx < len);
        let max = series.max_y();
        let y_scale = frame.value_scale(max);
        let x_scale = frame.index_scale(len);
        let baseline = frame.baseline();

        let points: Vec<Point> = series
            .points()
            .iter()
            .enumerate()
            .map(|(idx, p)| Point {
                x: x_scale.scale(idx),
                y: y_scale.scale(p.y),
            })
            .collect();

        let phase = |start: usize, end: usize| PhaseGeometry {
            start_index: start,
            end_index: end,
            line_path: line_path(&points[start..=end]),
            area_path: area_path(&points[start..=end], baseline),
        };

        let (first, second) = match split_at {
            Some(split) => (phase(0, split - 1), Some(phase(split - 1, len - 1))),
            None => (phase(0, len - 1), None),
        };

        let interval = TickDensity::AREA.interval(len);
        let markers = (0..len)
            .filter(|&idx| {
                let at_boundary = split_at.is_some_and(|split| idx + 1 == split || idx == split);
                idx == 0 || idx + 1 == len || at_boundary || idx % interval == 0
            })
            .map(|idx| PhaseMarker {
                point: points[idx],
                index: idx,
                second_phase: split_at.is_some_and(|split| idx >= split),
                emphasized: split_at == Some(idx),
            })
            .collect();

        let x_ticks = index_ticks(len, TickDensity::AREA)
            .into_iter()
            .map(|idx| {
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
            first,
            second,
            split_x: split_at.map(|split| points[split - 1].x),
            markers,
            x_ticks,
            y_ticks,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ages(values: &[f64]) -> ChartSeries {
        values
            .iter()
            .enumerate()
            .map(|(idx, &v)| ((60 + idx) as f64, v))
            .collect()
    }

    #[test]
    fn phases_overlap_by_one_point() {
        let series = ages(&[100.0, 200.0, 300.0, 150.0, 0.0]);
        let chart = PhasedAreaChart::build(&series, Some(3), &Frame::default(), Currency::Usd)
            .expect("non-empty");

        assert_eq!((chart.first.start_index, chart.first.end_index), (0, 2));
        let second = chart.second.as_ref().expect("two phases");
        assert_eq!((second.start_index, second.end_index), (2, 4));
        assert_eq!(chart.first.line_path, "M 40 120 L 100 70 L 160 20");
        assert_eq!(second.line_path, "M 160 20 L 220 95 L 280 170");
        assert_eq!(
            second.area_path,
            "M 160 20 L 220 95 L 280 170 L 280 170 L 160 170 Z"
        );
        assert_eq!(chart.split_x, Some(160.0));
    }

    #[test]
    fn boundary_points_are_marked_and_first_distribution_point_emphasized() {
        let series = ages(&[100.0, 200.0, 300.0, 150.0, 50.0, 10.0]);
        let chart = PhasedAreaChart::build(&series, Some(3), &Frame::default(), Currency::Usd)
            .expect("non-empty");

        let indices: Vec<usize> = chart.markers.iter().map(|m| m.index).collect();
        assert_eq!(indices, vec![0, 2, 3, 4, 5]);
        let emphasized: Vec<usize> = chart
            .markers
            .iter()
            .filter(|m| m.emphasized)
            .map(|m| m.index)
            .collect();
        assert_eq!(emphasized, vec![3]);
        assert!(chart.markers.iter().filter(|m| m.second_phase).all(|m| m.index >= 3));
    }

    #[test]
    fn missing_or_leading_split_renders_one_phase() {
        let series = ages(&[1.0, 2.0, 3.0]);
        for split in [None, Some(0), Some(3), Some(10)] {
            let chart = PhasedAreaChart::build(&series, split, &Frame::default(), Currency::Usd)
                .expect("non-empty");
            assert!(chart.second.is_none());
            assert!(chart.split_x.is_none());
            assert_eq!((chart.first.start_index, chart.first.end_index), (0, 2));
        }
    }

    #[test]
    fn all_zero_series_does_not_divide_by_zero() {
        let series = ages(&[0.0, 0.0]);
        let chart = PhasedAreaChart::build(&series, Some(1), &Frame::default(), Currency::Usd)
            .expect("non-empty");
        assert_eq!(chart.first.line_path, "M 40 170");
        assert!(chart.y_ticks.iter().all(|t| t.position.is_finite()));
    }
}
