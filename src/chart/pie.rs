use serde::{Deserialize, Serialize};

use super::Point;
use super::path::PathBuilder;

/// Sweeps at or above this many degrees are drawn as a full circle.
const FULL_CIRCLE_DEGREES: f64 = 360.0 - 1e-9;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PieDatum {
    pub name: String,
    pub value: f64,
    pub color: String,
}

impl PieDatum {
    pub fn new(name: impl Into<String>, value: f64, color: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            value,
            color: color.into(),
        }
    }
}

/// Angles are degrees measured clockwise from twelve o'clock.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PieSegment {
    pub name: String,
    pub color: String,
    pub value: f64,
    pub percentage: f64,
    pub start_angle: f64,
    pub end_angle: f64,
    pub path: String,
}

/// Lays the data out around a circle of diameter `size`, in input order.
/// Negative and non-finite values count as zero.
pub fn pie_segments(data: &[PieDatum], size: f64) -> Vec<PieSegment> {
    let radius = size / 2.0;
    let clamp = |v: f64| if v.is_finite() { v.max(0.0) } else { 0.0 };
    let total: f64 = data.iter().map(|d| clamp(d.value)).sum();

    let mut start_angle = 0.0;
    data.iter()
        .map(|datum| {
            let value = clamp(datum.value);
            let percentage = if total > 0.0 {
                value / total * 100.0
            } else {
                0.0
            };
            let end_angle = start_angle + percentage / 100.0 * 360.0;
            let segment = PieSegment {
                name: datum.name.clone(),
                color: datum.color.clone(),
                value,
                percentage,
                start_angle,
                end_angle,
                path: arc_path(start_angle, end_angle, radius),
            };
            start_angle = end_angle;
            segment
        })
        .collect()
}

/// Wedge from the centre `(radius, radius)` between two angles.
pub fn arc_path(start_angle: f64, end_angle: f64, radius: f64) -> String {
    let center = Point {
        x: radius,
        y: radius,
    };
    let sweep = end_angle - start_angle;
    let from = polar(center, radius, start_angle);

    if sweep >= FULL_CIRCLE_DEGREES {
        let opposite = polar(center, radius, start_angle + 180.0);
        return PathBuilder::new()
            .move_to(from)
            .arc_to(radius, false, opposite)
            .arc_to(radius, false, from)
            .close()
            .finish();
    }

    PathBuilder::new()
        .move_to(center)
        .line_to(from)
        .arc_to(radius, sweep > 180.0, polar(center, radius, end_angle))
        .close()
        .finish()
}

fn polar(center: Point, radius: f64, angle: f64) -> Point {
    let radians = (angle - 90.0).to_radians();
    Point {
        x: tidy(center.x + radius * radians.cos()),
        y: tidy(center.y + radius * radians.sin()),
    }
}

/// Drops trigonometric noise such as `6.1e-15` so paths stay readable.
fn tidy(v: f64) -> f64 {
    (v * 1e6).round() / 1e6 + 0.0
}
