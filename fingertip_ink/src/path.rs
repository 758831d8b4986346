//! Vector paths: the drawing primitives issued against a surface.

use crate::geometry::Point;

#[derive(Clone, Copy, Debug, PartialEq)]
pub enum PathCommand {
    MoveTo(Point),
    LineTo(Point),
    /// Cubic Bézier from the current point through two control points.
    CurveTo { ctrl1: Point, ctrl2: Point, to: Point },
}

/// An ordered list of [`PathCommand`]s, built like a canvas path.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct Path {
    commands: Vec<PathCommand>,
}

impl Path {
    pub fn new() -> Self { Self::default() }

    pub fn move_to(&mut self, p: Point) -> &mut Self {
        self.commands.push(PathCommand::MoveTo(p));
        self
    }

    pub fn line_to(&mut self, p: Point) -> &mut Self {
        self.commands.push(PathCommand::LineTo(p));
        self
    }

    pub fn curve_to(&mut self, ctrl1: Point, ctrl2: Point, to: Point) -> &mut Self {
        self.commands.push(PathCommand::CurveTo { ctrl1, ctrl2, to });
        self
    }

    pub fn commands(&self) -> &[PathCommand] { &self.commands }
    pub fn len(&self) -> usize { self.commands.len() }
    pub fn is_empty(&self) -> bool { self.commands.is_empty() }

    /// Flatten into polylines, one per sub-path.
    ///
    /// Cubics are subdivided uniformly; the step count grows with the length
    /// of the control polygon so that consecutive samples are at most
    /// `tolerance` pixels apart along it. A drawing command with no preceding
    /// `MoveTo` starts a sub-path at its own end point.
    pub fn flatten(&self, tolerance: f32) -> Vec<Vec<Point>> {
        let tolerance = tolerance.max(0.05);
        let mut polylines: Vec<Vec<Point>> = Vec::new();
        let mut current: Vec<Point> = Vec::new();

        for cmd in &self.commands {
            match *cmd {
                PathCommand::MoveTo(p) => {
                    if !current.is_empty() {
                        polylines.push(std::mem::take(&mut current));
                    }
                    current.push(p);
                }
                PathCommand::LineTo(p) => current.push(p),
                PathCommand::CurveTo { ctrl1, ctrl2, to } => {
                    let Some(&from) = current.last() else {
                        current.push(to);
                        continue;
                    };
                    let hull = from.distance(ctrl1) + ctrl1.distance(ctrl2) + ctrl2.distance(to);
                    let steps = ((hull / tolerance).ceil() as usize).clamp(1, 256);
                    for i in 1..=steps {
                        current.push(cubic_point(from, ctrl1, ctrl2, to, i as f32 / steps as f32));
                    }
                }
            }
        }
        if !current.is_empty() {
            polylines.push(current);
        }
        polylines
    }
}

/// Evaluate a cubic Bézier at `t`.
pub fn cubic_point(p0: Point, p1: Point, p2: Point, p3: Point, t: f32) -> Point {
    let u = 1.0 - t;
    p0 * (u * u * u) + p1 * (3.0 * u * u * t) + p2 * (3.0 * u * t * t) + p3 * (t * t * t)
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_abs_diff_eq;
    use glam::vec2;

    #[test]
    fn builder_records_commands_in_order() {
        let mut path = Path::new();
        path.move_to(vec2(0.0, 0.0))
            .line_to(vec2(1.0, 0.0))
            .curve_to(vec2(2.0, 0.0), vec2(3.0, 1.0), vec2(4.0, 1.0));
        assert_eq!(path.len(), 3);
        assert_eq!(path.commands()[0], PathCommand::MoveTo(vec2(0.0, 0.0)));
        assert!(matches!(path.commands()[2], PathCommand::CurveTo { .. }));
    }

    #[test]
    fn cubic_endpoints() {
        let (a, b, c, d) = (vec2(0.0, 0.0), vec2(1.0, 2.0), vec2(3.0, 2.0), vec2(4.0, 0.0));
        assert_eq!(cubic_point(a, b, c, d, 0.0), a);
        assert_eq!(cubic_point(a, b, c, d, 1.0), d);
        let mid = cubic_point(a, b, c, d, 0.5);
        assert_abs_diff_eq!(mid.x, 2.0, epsilon = 1e-6);
        assert_abs_diff_eq!(mid.y, 1.5, epsilon = 1e-6);
    }

    #[test]
    fn flatten_splits_subpaths() {
        let mut path = Path::new();
        path.move_to(vec2(0.0, 0.0))
            .line_to(vec2(5.0, 0.0))
            .move_to(vec2(10.0, 10.0))
            .curve_to(vec2(12.0, 10.0), vec2(14.0, 10.0), vec2(16.0, 10.0));
        let lines = path.flatten(0.5);
        assert_eq!(lines.len(), 2);
        assert_eq!(lines[0], vec![vec2(0.0, 0.0), vec2(5.0, 0.0)]);
        // 6 px of control polygon at 0.5 px spacing.
        assert_eq!(lines[1].len(), 13);
        assert_eq!(*lines[1].last().unwrap(), vec2(16.0, 10.0));
    }

    #[test]
    fn flatten_empty_path() {
        assert!(Path::new().flatten(1.0).is_empty());
    }
}
