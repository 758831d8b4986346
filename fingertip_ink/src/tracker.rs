//! Stroke state machine: raw per-frame points in, line segments out.

use tracing::{debug, trace};

use crate::geometry::Point;
use crate::source::Tracking;

/// Minimum fingertip movement, in canvas pixels, before a new segment is
/// committed.
pub const DEFAULT_MOVEMENT_THRESHOLD: f32 = 0.2;

#[derive(Clone, Copy, Debug, PartialEq)]
pub enum StrokeState {
    Idle,
    /// A stroke is live; new segments connect from `anchor`.
    Drawing { anchor: Point },
}

/// A line segment committed by the tracker.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Segment {
    pub start: Point,
    pub end:   Point,
}

impl Segment {
    pub fn new(start: Point, end: Point) -> Self {
        Segment { start, end }
    }

    pub fn length(&self) -> f32 {
        self.start.distance(self.end)
    }
}

/// Converts a sequence of tracking results into drawing/not-drawing
/// transitions, filtering out sub-threshold jitter.
///
/// | Input | State | Result |
/// |---|---|---|
/// | no hand | any | → `Idle`, nothing emitted |
/// | `P` | `Idle` | → `Drawing { anchor: P }`, nothing emitted |
/// | `P` | `Drawing { anchor: Q }`, `\|P-Q\| > threshold` | emit `(Q, P)`, anchor → `P` |
/// | `P` | `Drawing { anchor: Q }`, `\|P-Q\| <= threshold` | nothing, anchor stays `Q` |
#[derive(Clone, Debug)]
pub struct StrokeTracker {
    state:     StrokeState,
    threshold: f32,
}

impl StrokeTracker {
    pub fn new() -> Self {
        Self::with_threshold(DEFAULT_MOVEMENT_THRESHOLD)
    }

    /// Negative thresholds are treated as zero.
    pub fn with_threshold(threshold: f32) -> Self {
        StrokeTracker { state: StrokeState::Idle, threshold: threshold.max(0.0) }
    }

    pub fn state(&self) -> StrokeState { self.state }
    pub fn threshold(&self) -> f32 { self.threshold }

    pub fn is_drawing(&self) -> bool {
        matches!(self.state, StrokeState::Drawing { .. })
    }

    pub fn anchor(&self) -> Option<Point> {
        match self.state {
            StrokeState::Drawing { anchor } => Some(anchor),
            StrokeState::Idle => None,
        }
    }

    /// Feed one frame's tracking result; returns the segment to draw, if any.
    pub fn update(&mut self, tracking: Tracking) -> Option<Segment> {
        match (self.state, tracking) {
            (StrokeState::Drawing { .. }, Tracking::NotDetected) => {
                debug!("hand lost, stroke ended");
                self.state = StrokeState::Idle;
                None
            }
            (StrokeState::Idle, Tracking::NotDetected) => None,
            (StrokeState::Idle, Tracking::Detected(p)) => {
                debug!(x = p.x, y = p.y, "stroke anchored");
                self.state = StrokeState::Drawing { anchor: p };
                None
            }
            (StrokeState::Drawing { anchor }, Tracking::Detected(p)) => {
                let d = anchor.distance(p);
                if d > self.threshold {
                    self.state = StrokeState::Drawing { anchor: p };
                    Some(Segment::new(anchor, p))
                } else {
                    trace!(distance = d, "movement below threshold");
                    None
                }
            }
        }
    }

    pub fn reset(&mut self) {
        self.state = StrokeState::Idle;
    }
}

impl Default for StrokeTracker {
    fn default() -> Self { Self::new() }
}
