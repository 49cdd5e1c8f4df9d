use std::fmt::Write;

use super::Point;

/// Accumulates SVG path commands separated by single spaces.
#[derive(Debug, Clone, Default)]
pub struct PathBuilder {
    d: String,
}

impl PathBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    fn separator(&mut self) {
        if !self.d.is_empty() {
            self.d.push(' ');
        }
    }

    pub fn move_to(mut self, p: Point) -> Self {
        self.separator();
        let _ = write!(self.d, "M {} {}", p.x, p.y);
        self
    }

    pub fn line_to(mut self, p: Point) -> Self {
        self.separator();
        let _ = write!(self.d, "L {} {}", p.x, p.y);
        self
    }

    /// Elliptical arc with equal radii, always drawn clockwise.
    pub fn arc_to(mut self, radius: f64, large_arc: bool, p: Point) -> Self {
        self.separator();
        let _ = write!(
            self.d,
            "A {radius} {radius} 0 {} 1 {} {}",
            u8::from(large_arc),
            p.x,
            p.y
        );
        self
    }

    pub fn close(mut self) -> Self {
        self.separator();
        self.d.push('Z');
        self
    }

    pub fn finish(self) -> String {
        self.d
    }
}

/// Move to the first point, then a straight line through the rest.
pub fn line_path(points: &[Point]) -> String {
    trace_points(PathBuilder::new(), points).finish()
}

/// The line path closed down to `baseline` and back under the first point.
pub fn area_path(points: &[Point], baseline: f64) -> String {
    let (Some(first), Some(last)) = (points.first(), points.last()) else {
        return String::new();
    };
    trace_points(PathBuilder::new(), points)
        .line_to(Point {
            x: last.x,
            y: baseline,
        })
        .line_to(Point {
            x: first.x,
            y: baseline,
        })
        .close()
        .finish()
}

fn trace_points(builder: PathBuilder, points: &[Point]) -> PathBuilder {
    points
        .iter()
        .enumerate()
        .fold(builder, |builder, (idx, &p)| {
            if idx == 0 {
                builder.move_to(p)
            } else {
                builder.line_to(p)
            }
        })
}
