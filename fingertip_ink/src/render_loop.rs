//! The per-frame driver.
//!
//! The host calls [`RenderLoop::tick`] once per displayed frame and keeps
//! calling while the returned [`Frame`] says [`Schedule::Continue`]. A tick
//! never overlaps another: the point query completes before the next one can
//! start.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use tracing::{debug, info, trace, warn};

use crate::cursor::CursorRenderer;
use crate::smoother::CurveSmoother;
use crate::source::{PointSource, Tracking};
use crate::style::StrokeStyle;
use crate::surface::DrawSurface;
use crate::tracker::{Segment, StrokeTracker};

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Schedule {
    Continue,
    Stop,
}

/// Outcome of one loop iteration.
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum Frame {
    /// Host view not visible; no work done.
    Hidden,
    Rendered { tracking: Tracking, segment: Option<Segment> },
    /// The loop was torn down; the source has been released.
    Cancelled,
}

impl Frame {
    pub fn schedule(&self) -> Schedule {
        match self {
            Frame::Cancelled => Schedule::Stop,
            Frame::Hidden | Frame::Rendered { .. } => Schedule::Continue,
        }
    }
}

/// The two layers a frame draws on. Either may be missing.
#[derive(Default)]
pub struct Surfaces<'a> {
    /// Persistent ink.
    pub drawing: Option<&'a mut dyn DrawSurface>,
    /// Transient cursor layer, repainted every frame.
    pub overlay: Option<&'a mut dyn DrawSurface>,
}

impl<'a> Surfaces<'a> {
    pub fn new(drawing: &'a mut dyn DrawSurface, overlay: &'a mut dyn DrawSurface) -> Self {
        Surfaces { drawing: Some(drawing), overlay: Some(overlay) }
    }

    pub fn none() -> Self { Self::default() }
}

/// Thread-safe cancellation flag for a [`RenderLoop`].
#[derive(Clone, Debug, Default)]
pub struct LoopHandle {
    cancelled: Arc<AtomicBool>,
}

impl LoopHandle {
    pub fn new() -> Self { Self::default() }

    pub fn cancel(&self) {
        self.cancelled.store(true, Ordering::SeqCst);
    }

    pub fn is_cancelled(&self) -> bool {
        self.cancelled.load(Ordering::SeqCst)
    }
}

pub struct RenderLoop<S: PointSource> {
    source:   S,
    tracker:  StrokeTracker,
    smoother: CurveSmoother,
    cursor:   CursorRenderer,
    style:    StrokeStyle,
    handle:   LoopHandle,
    released: bool,
    frames:   u64,
}

impl<S: PointSource> RenderLoop<S> {
    pub fn new(source: S) -> Self {
        RenderLoop {
            source,
            tracker:  StrokeTracker::new(),
            smoother: CurveSmoother::new(),
            cursor:   CursorRenderer::new(),
            style:    StrokeStyle::default(),
            handle:   LoopHandle::new(),
            released: false,
            frames:   0,
        }
    }

    pub fn with_tracker(mut self, tracker: StrokeTracker) -> Self {
        self.tracker = tracker;
        self
    }

    pub fn with_smoother(mut self, smoother: CurveSmoother) -> Self {
        self.smoother = smoother;
        self
    }

    pub fn with_cursor(mut self, cursor: CursorRenderer) -> Self {
        self.cursor = cursor;
        self
    }

    pub fn with_stroke_style(mut self, style: StrokeStyle) -> Self {
        self.style = style;
        self
    }

    /// A clone of the loop's cancellation handle.
    pub fn handle(&self) -> LoopHandle { self.handle.clone() }

    pub fn source(&self) -> &S { &self.source }
    pub fn source_mut(&mut self) -> &mut S { &mut self.source }
    pub fn tracker(&self) -> &StrokeTracker { &self.tracker }
    pub fn smoother(&self) -> &CurveSmoother { &self.smoother }
    pub fn stroke_style(&self) -> &StrokeStyle { &self.style }

    /// Frames rendered so far (hidden and cancelled frames excluded).
    pub fn frames(&self) -> u64 { self.frames }

    pub fn is_released(&self) -> bool { self.released }

    /// Run one iteration.
    pub fn tick(&mut self, visible: bool, surfaces: Surfaces<'_>) -> Frame {
        if self.handle.is_cancelled() {
            self.teardown();
            return Frame::Cancelled;
        }
        if !visible {
            trace!("view hidden, frame skipped");
            return Frame::Hidden;
        }

        let tracking = match self.source.locate() {
            Ok(t) => t,
            Err(e) => {
                warn!(error = %e, "fingertip query failed, treating frame as no hand");
                Tracking::NotDetected
            }
        };

        if self.handle.is_cancelled() {
            debug!("cancelled during query, result discarded");
            self.teardown();
            return Frame::Cancelled;
        }

        let Surfaces { drawing, overlay } = surfaces;

        match overlay {
            Some(overlay) => self.cursor.render(tracking, overlay),
            None => trace!("no overlay surface"),
        }

        let segment = self.tracker.update(tracking);
        if tracking == Tracking::NotDetected {
            self.smoother.clear();
        }

        if let Some(seg) = segment {
            match drawing {
                Some(drawing) => {
                    let path = self.smoother.smooth(seg);
                    drawing.stroke_path(&path, &self.style);
                }
                None => trace!("no drawing surface, segment dropped"),
            }
        }

        self.frames += 1;
        Frame::Rendered { tracking, segment }
    }

    /// Erase all ink and forget the smoothing history. The stroke in
    /// progress, if any, keeps its anchor.
    pub fn clear_canvas(&mut self, drawing: Option<&mut dyn DrawSurface>) {
        match drawing {
            Some(d) => d.clear(),
            None => trace!("no drawing surface to clear"),
        }
        self.smoother.clear();
        debug!(drawing = self.tracker.is_drawing(), "canvas cleared");
    }

    /// Release the source. Idempotent.
    pub fn teardown(&mut self) {
        self.handle.cancel();
        if !self.released {
            self.released = true;
            self.source.release();
            info!(frames = self.frames, "render loop stopped");
        }
    }
}

impl<S: PointSource> Drop for RenderLoop<S> {
    fn drop(&mut self) {
        self.teardown();
    }
}
