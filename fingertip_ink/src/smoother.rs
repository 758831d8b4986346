//! Curve smoothing: segments → interpolated history → cubic Bézier path.
//!
//! Each committed segment is resampled into evenly spaced points and appended
//! to a bounded [`PointHistory`]. The newest four points form a Catmull-Rom
//! window which is converted to cubic Béziers with
//!
//! ```text
//! cp1 = p1 + (p2 - p0) · k
//! cp2 = p2 - (p3 - p1) · k
//! ```
//!
//! where a missing neighbour at either end of the window is clamped to the
//! nearest endpoint.

use tracing::trace;

use crate::geometry::{interpolate, Point};
use crate::history::PointHistory;
use crate::path::Path;
use crate::tracker::Segment;

/// Points generated per segment, minus one.
pub const INTERPOLATION_STEPS: usize = 10;

/// Catmull-Rom tension used for the Bézier control points.
pub const SMOOTHING_FACTOR: f32 = 0.3;

/// Curve fitting needs this many history points; fewer yields a straight line.
pub const MIN_CURVE_POINTS: usize = 4;

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct CubicSegment {
    pub from:  Point,
    pub ctrl1: Point,
    pub ctrl2: Point,
    pub to:    Point,
}

/// Convert a Catmull-Rom spline through `points` into one cubic per
/// consecutive pair, clamping the missing neighbours at both ends.
pub fn catmull_rom_to_bezier(points: &[Point], k: f32) -> Vec<CubicSegment> {
    let n = points.len();
    if n < 2 {
        return Vec::new();
    }
    (0..n - 1)
        .map(|i| {
            let p0 = points[i.saturating_sub(1)];
            let p1 = points[i];
            let p2 = points[i + 1];
            let p3 = points[(i + 2).min(n - 1)];
            CubicSegment {
                from:  p1,
                ctrl1: p1 + (p2 - p0) * k,
                ctrl2: p2 - (p3 - p1) * k,
                to:    p2,
            }
        })
        .collect()
}

#[derive(Clone, Debug)]
pub struct CurveSmoother {
    history:   PointHistory,
    steps:     usize,
    smoothing: f32,
}

impl CurveSmoother {
    pub fn new() -> Self {
        CurveSmoother {
            history:   PointHistory::new(),
            steps:     INTERPOLATION_STEPS,
            smoothing: SMOOTHING_FACTOR,
        }
    }

    pub fn with_interpolation_steps(mut self, steps: usize) -> Self {
        self.steps = steps.max(1);
        self
    }

    pub fn with_smoothing(mut self, k: f32) -> Self {
        self.smoothing = k;
        self
    }

    pub fn with_history(mut self, history: PointHistory) -> Self {
        self.history = history;
        self
    }

    pub fn history(&self) -> &PointHistory { &self.history }
    pub fn smoothing(&self) -> f32 { self.smoothing }

    pub fn clear(&mut self) {
        self.history.clear();
    }

    /// Record `segment` in the history and build the path to stroke for it.
    pub fn smooth(&mut self, segment: Segment) -> Path {
        self.history.extend(interpolate(segment.start, segment.end, self.steps));

        let mut path = Path::new();
        let Some(window) = self.history.window::<MIN_CURVE_POINTS>() else {
            trace!(len = self.history.len(), "history too short for a curve");
            path.move_to(segment.start).line_to(segment.end);
            return path;
        };

        let cubics = catmull_rom_to_bezier(&window, self.smoothing);
        path.move_to(window[0]);
        for c in &cubics {
            path.curve_to(c.ctrl1, c.ctrl2, c.to);
        }
        path
    }
}

impl Default for CurveSmoother {
    fn default() -> Self { Self::new() }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::path::PathCommand;
    use approx::assert_abs_diff_eq;
    use glam::vec2;
    use proptest::prelude::*;

    fn assert_points_eq(a: Point, b: Point) {
        assert_abs_diff_eq!(a.x, b.x, epsilon = 1e-4);
        assert_abs_diff_eq!(a.y, b.y, epsilon = 1e-4);
    }

    #[test]
    fn short_history_draws_straight_segment() {
        // One step per segment appends only two points.
        let mut s = CurveSmoother::new().with_interpolation_steps(1);
        let seg = Segment::new(vec2(1.0, 2.0), vec2(5.0, 6.0));
        let path = s.smooth(seg);
        assert_eq!(
            path.commands(),
            &[PathCommand::MoveTo(seg.start), PathCommand::LineTo(seg.end)]
        );
        assert_eq!(s.history().len(), 2);
    }

    #[test]
    fn segment_adds_eleven_interpolated_points() {
        let mut s = CurveSmoother::new();
        s.smooth(Segment::new(vec2(0.0, 0.0), vec2(10.0, 0.0)));
        assert_eq!(s.history().len(), INTERPOLATION_STEPS + 1);
        for (i, p) in s.history().iter().enumerate() {
            assert_points_eq(*p, vec2(i as f32, 0.0));
        }
    }

    #[test]
    fn curve_follows_newest_window() {
        let mut s = CurveSmoother::new();
        let path = s.smooth(Segment::new(vec2(0.0, 0.0), vec2(10.0, 0.0)));
        // Window = last four interpolated points (7, 8, 9, 10).
        assert_eq!(path.len(), 1 + (MIN_CURVE_POINTS - 1));
        match path.commands()[0] {
            PathCommand::MoveTo(p) => assert_points_eq(p, vec2(7.0, 0.0)),
            other => panic!("unexpected {other:?}"),
        }
        match path.commands()[3] {
            PathCommand::CurveTo { to, .. } => assert_points_eq(to, vec2(10.0, 0.0)),
            other => panic!("unexpected {other:?}"),
        }
    }

    #[test]
    fn control_points_match_catmull_rom() {
        let (p0, p1, p2, p3) = (vec2(0.0, 0.0), vec2(4.0, 1.0), vec2(7.0, 5.0), vec2(8.0, 9.0));
        let cubics = catmull_rom_to_bezier(&[p0, p1, p2, p3], SMOOTHING_FACTOR);
        assert_eq!(cubics.len(), 3);
        let mid = cubics[1];
        assert_eq!(mid.from, p1);
        assert_eq!(mid.to, p2);
        assert_points_eq(mid.ctrl1, p1 + (p2 - p0) * 0.3);
        assert_points_eq(mid.ctrl2, p2 - (p3 - p1) * 0.3);
    }

    #[test]
    fn window_ends_are_clamped() {
        let (p0, p1, p2, p3) = (vec2(0.0, 0.0), vec2(2.0, 0.0), vec2(2.0, 2.0), vec2(0.0, 2.0));
        let cubics = catmull_rom_to_bezier(&[p0, p1, p2, p3], 0.3);
        // First cubic: missing left neighbour is p0 itself.
        assert_points_eq(cubics[0].ctrl1, p0 + (p1 - p0) * 0.3);
        // Last cubic: missing right neighbour is p3 itself.
        assert_points_eq(cubics[2].ctrl2, p3 - (p3 - p2) * 0.3);
    }

    #[test]
    fn clear_drops_history() {
        let mut s = CurveSmoother::new();
        s.smooth(Segment::new(vec2(0.0, 0.0), vec2(3.0, 3.0)));
        s.clear();
        assert!(s.history().is_empty());
    }

    #[test]
    fn history_stays_bounded_over_long_strokes() {
        let mut s = CurveSmoother::new();
        let mut prev = vec2(0.0, 0.0);
        for i in 1..50 {
            let next = vec2(i as f32 * 3.0, (i % 7) as f32);
            s.smooth(Segment::new(prev, next));
            prev = next;
        }
        assert_eq!(s.history().len(), crate::history::HISTORY_CAPACITY);
        assert_eq!(s.history().last(), Some(prev));
    }

    proptest! {
        #[test]
        fn window_control_points(
            xs in proptest::array::uniform4(-500.0f32..500.0),
            ys in proptest::array::uniform4(-500.0f32..500.0),
        ) {
            let pts = [0, 1, 2, 3].map(|i| vec2(xs[i], ys[i]));
            let mid = catmull_rom_to_bezier(&pts, SMOOTHING_FACTOR)[1];
            let cp1 = pts[1] + (pts[2] - pts[0]) * 0.3;
            let cp2 = pts[2] - (pts[3] - pts[1]) * 0.3;
            prop_assert!(mid.ctrl1.abs_diff_eq(cp1, 1e-3));
            prop_assert!(mid.ctrl2.abs_diff_eq(cp2, 1e-3));
        }

        #[test]
        fn straight_until_four_points(x0 in -100.0f32..100.0, y0 in -100.0f32..100.0, x1 in -100.0f32..100.0, y1 in -100.0f32..100.0) {
            let mut s = CurveSmoother::new()
                .with_interpolation_steps(1)
                .with_history(PointHistory::with_capacity(3));
            let seg = Segment::new(vec2(x0, y0), vec2(x1, y1));
            // A three-point history can never reach the curve threshold.
            for _ in 0..3 {
                let path = s.smooth(seg);
                prop_assert_eq!(
                    path.commands(),
                    &[PathCommand::MoveTo(seg.start), PathCommand::LineTo(seg.end)]
                );
            }
        }
    }
}
