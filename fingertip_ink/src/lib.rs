//! # fingertip_ink
//!
//! Turns a per-frame fingertip position into smoothed ink strokes.
//!
//! ## Pipeline
//!
//! | Stage | Type | Role |
//! |---|---|---|
//! | Point query | [`PointSource`] | Fingertip in canvas coordinates, or "no hand" |
//! | Gesture state | [`StrokeTracker`] | `Idle` / `Drawing`, anti-jitter threshold |
//! | Smoothing | [`CurveSmoother`] | Interpolated history → Catmull-Rom cubic path |
//! | Cursor | [`CursorRenderer`] | Glow + dot on a transient overlay |
//! | Scheduling | [`RenderLoop`] | One iteration per displayed frame, cancellable |
//!
//! Pose inference and the drawing backend stay outside this crate: pose
//! models plug in through [`PoseEstimator`] (wrapped by [`FingertipSource`]),
//! and anything that can stroke a [`Path`] implements [`DrawSurface`].

pub mod cursor;
pub mod error;
pub mod geometry;
pub mod history;
pub mod path;
pub mod render_loop;
pub mod smoother;
pub mod source;
pub mod style;
pub mod surface;
pub mod tracker;


pub use cursor::{CursorRenderer, CursorStyle};
pub use error::{StyleError, TrackingError};
pub use geometry::{Point, Rect};
pub use history::{PointHistory, HISTORY_CAPACITY};
pub use path::{Path, PathCommand};
pub use render_loop::{Frame, LoopHandle, RenderLoop, Schedule, Surfaces};
pub use smoother::{CubicSegment, CurveSmoother};
pub use source::{
    Annotations, BoundingBox, CanvasMapping, Finger, FingertipSource, HandPrediction, Landmark,
    PointSource, PoseEstimator, Tracking,
};
pub use style::{Color, GradientStop, LineCap, LineJoin, Paint, RadialGradient, Shadow, StrokeStyle};
pub use surface::DrawSurface;
pub use tracker::{Segment, StrokeState, StrokeTracker};
