//! Where fingertip points come from.
//!
//! [`PointSource`] is what the render loop consumes: one query per frame,
//! answering with a canvas-space point or "no hand". Hand-pose models plug in
//! one level lower through [`PoseEstimator`], and [`FingertipSource`] turns
//! their predictions into canvas points.

use tracing::debug;

use crate::error::TrackingError;
use crate::geometry::Point;

// ════════════════════════════════════════════════════════════════════════════
// Tracking
// ════════════════════════════════════════════════════════════════════════════

#[derive(Clone, Copy, Debug, PartialEq)]
pub enum Tracking {
    Detected(Point),
    NotDetected,
}

impl Tracking {
    pub fn point(self) -> Option<Point> {
        match self {
            Tracking::Detected(p) => Some(p),
            Tracking::NotDetected => None,
        }
    }

    pub fn is_detected(self) -> bool {
        matches!(self, Tracking::Detected(_))
    }
}

impl From<Option<Point>> for Tracking {
    fn from(p: Option<Point>) -> Self {
        p.map_or(Tracking::NotDetected, Tracking::Detected)
    }
}

// ════════════════════════════════════════════════════════════════════════════
// PointSource
// ════════════════════════════════════════════════════════════════════════════

/// Supplies the current fingertip position on demand.
pub trait PointSource {
    /// Current fingertip in canvas coordinates.
    fn locate(&mut self) -> Result<Tracking, TrackingError>;

    /// Release any device or stream held by the source. Called once, on
    /// teardown.
    fn release(&mut self) {}
}

impl<S: PointSource + ?Sized> PointSource for Box<S> {
    fn locate(&mut self) -> Result<Tracking, TrackingError> { (**self).locate() }
    fn release(&mut self) { (**self).release() }
}

// ════════════════════════════════════════════════════════════════════════════
// Hand predictions
// ════════════════════════════════════════════════════════════════════════════

/// A model-space landmark `(x, y, z)`; `x`/`y` are video pixels.
pub type Landmark = glam::Vec3;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Finger {
    Thumb,
    IndexFinger,
    MiddleFinger,
    RingFinger,
    Pinky,
    PalmBase,
}

/// Landmarks grouped per finger, each ordered from the palm outwards.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct Annotations {
    pub thumb:         Vec<Landmark>,
    pub index_finger:  Vec<Landmark>,
    pub middle_finger: Vec<Landmark>,
    pub ring_finger:   Vec<Landmark>,
    pub pinky:         Vec<Landmark>,
    pub palm_base:     Vec<Landmark>,
}

impl Annotations {
    pub fn finger(&self, finger: Finger) -> &[Landmark] {
        match finger {
            Finger::Thumb        => &self.thumb,
            Finger::IndexFinger  => &self.index_finger,
            Finger::MiddleFinger => &self.middle_finger,
            Finger::RingFinger   => &self.ring_finger,
            Finger::Pinky        => &self.pinky,
            Finger::PalmBase     => &self.palm_base,
        }
    }
}

#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct BoundingBox {
    pub top_left:     glam::Vec2,
    pub bottom_right: glam::Vec2,
}

/// One detected hand.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct HandPrediction {
    pub hand_in_view_confidence: f32,
    pub bounding_box:            BoundingBox,
    pub landmarks:               Vec<Landmark>,
    pub annotations:             Annotations,
}

/// A hand-pose model looking at the current video frame.
pub trait PoseEstimator {
    /// Hands visible in the current frame, most confident first.
    fn estimate_hands(&mut self) -> Result<Vec<HandPrediction>, TrackingError>;

    /// `(width, height)` of the frames landmarks are expressed in.
    fn video_size(&self) -> (u32, u32);

    fn release(&mut self) {}
}

// ════════════════════════════════════════════════════════════════════════════
// FingertipSource
// ════════════════════════════════════════════════════════════════════════════

/// Index of the fingertip within the index-finger annotation.
pub const FINGERTIP_LANDMARK: usize = 3;

/// Video → canvas coordinate mapping, mirrored horizontally so the canvas
/// matches a front-facing camera shown as a mirror.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct CanvasMapping {
    pub canvas_width:  f32,
    pub canvas_height: f32,
    pub video_width:   f32,
    pub video_height:  f32,
}

impl CanvasMapping {
    pub fn new(canvas: (u32, u32), video: (u32, u32)) -> Result<Self, TrackingError> {
        if video.0 == 0 || video.1 == 0 {
            return Err(TrackingError::VideoNotReady { width: video.0, height: video.1 });
        }
        Ok(CanvasMapping {
            canvas_width:  canvas.0 as f32,
            canvas_height: canvas.1 as f32,
            video_width:   video.0 as f32,
            video_height:  video.1 as f32,
        })
    }

    pub fn to_canvas(&self, landmark: Landmark) -> Point {
        Point::new(
            self.canvas_width - landmark.x * (self.canvas_width / self.video_width),
            landmark.y * (self.canvas_height / self.video_height),
        )
    }
}

/// Adapts a [`PoseEstimator`] into a [`PointSource`] tracking the index
/// fingertip of the first detected hand.
#[derive(Debug)]
pub struct FingertipSource<E> {
    estimator:   E,
    canvas_size: (u32, u32),
}

impl<E: PoseEstimator> FingertipSource<E> {
    pub fn new(estimator: E, canvas_size: (u32, u32)) -> Self {
        FingertipSource { estimator, canvas_size }
    }

    pub fn estimator(&self) -> &E { &self.estimator }
}

impl<E: PoseEstimator> PointSource for FingertipSource<E> {
    fn locate(&mut self) -> Result<Tracking, TrackingError> {
        let hands = self.estimator.estimate_hands()?;
        let Some(hand) = hands.first() else {
            return Ok(Tracking::NotDetected);
        };
        let Some(&tip) = hand.annotations.index_finger.get(FINGERTIP_LANDMARK) else {
            debug!(
                landmarks = hand.annotations.index_finger.len(),
                "index finger annotation too short, ignoring hand"
            );
            return Ok(Tracking::NotDetected);
        };
        let mapping = CanvasMapping::new(self.canvas_size, self.estimator.video_size())?;
        Ok(Tracking::Detected(mapping.to_canvas(tip)))
    }

    fn release(&mut self) {
        self.estimator.release();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_abs_diff_eq;
    use glam::{vec2, vec3};

    struct FakeModel {
        video:    (u32, u32),
        frames:   Vec<Result<Vec<HandPrediction>, TrackingError>>,
        released: bool,
    }

    impl PoseEstimator for FakeModel {
        fn estimate_hands(&mut self) -> Result<Vec<HandPrediction>, TrackingError> {
            if self.frames.is_empty() {
                return Ok(Vec::new());
            }
            self.frames.remove(0)
        }
        fn video_size(&self) -> (u32, u32) { self.video }
        fn release(&mut self) { self.released = true; }
    }

    fn hand_with_tip(tip: Landmark) -> HandPrediction {
        HandPrediction {
            hand_in_view_confidence: 0.9,
            annotations: Annotations {
                index_finger: vec![vec3(0.0, 0.0, 0.0), vec3(1.0, 1.0, 0.0), vec3(2.0, 2.0, 0.0), tip],
                ..Default::default()
            },
            ..Default::default()
        }
    }

    #[test]
    fn mapping_mirrors_x_and_scales() {
        let m = CanvasMapping::new((640, 480), (320, 240)).unwrap();
        let p = m.to_canvas(vec3(100.0, 60.0, -5.0));
        assert_abs_diff_eq!(p.x, 640.0 - 200.0);
        assert_abs_diff_eq!(p.y, 120.0);
        // Left edge of the video lands on the right edge of the canvas.
        assert_eq!(m.to_canvas(vec3(0.0, 0.0, 0.0)), vec2(640.0, 0.0));
    }

    #[test]
    fn zero_sized_video_is_not_ready() {
        let err = CanvasMapping::new((640, 480), (0, 480)).unwrap_err();
        assert!(matches!(err, TrackingError::VideoNotReady { width: 0, height: 480 }));
    }

    #[test]
    fn first_hand_index_tip_is_tracked() {
        let model = FakeModel {
            video:    (640, 480),
            frames:   vec![Ok(vec![
                hand_with_tip(vec3(40.0, 50.0, 0.0)),
                hand_with_tip(vec3(400.0, 400.0, 0.0)),
            ])],
            released: false,
        };
        let mut src = FingertipSource::new(model, (640, 480));
        assert_eq!(src.locate().unwrap(), Tracking::Detected(vec2(600.0, 50.0)));
        // Script exhausted: no hands.
        assert_eq!(src.locate().unwrap(), Tracking::NotDetected);
    }

    #[test]
    fn short_annotation_counts_as_no_hand() {
        let mut hand = hand_with_tip(vec3(1.0, 1.0, 0.0));
        hand.annotations.index_finger.truncate(3);
        let model = FakeModel { video: (640, 480), frames: vec![Ok(vec![hand])], released: false };
        let mut src = FingertipSource::new(model, (640, 480));
        assert_eq!(src.locate().unwrap(), Tracking::NotDetected);
    }

    #[test]
    fn inference_errors_propagate() {
        let model = FakeModel {
            video:    (640, 480),
            frames:   vec![Err(TrackingError::Inference("boom".into()))],
            released: false,
        };
        let mut src = FingertipSource::new(model, (640, 480));
        assert!(matches!(src.locate(), Err(TrackingError::Inference(_))));
    }

    #[test]
    fn release_reaches_the_model() {
        let model = FakeModel { video: (640, 480), frames: vec![], released: false };
        let mut src = FingertipSource::new(model, (640, 480));
        src.release();
        assert!(src.estimator().released);
    }

    #[test]
    fn finger_lookup() {
        let hand = hand_with_tip(vec3(9.0, 9.0, 9.0));
        assert_eq!(hand.annotations.finger(Finger::IndexFinger).len(), 4);
        assert!(hand.annotations.finger(Finger::Pinky).is_empty());
    }

    #[test]
    fn tracking_from_option() {
        assert_eq!(Tracking::from(Some(vec2(1.0, 2.0))).point(), Some(vec2(1.0, 2.0)));
        assert!(!Tracking::from(None).is_detected());
    }
}
