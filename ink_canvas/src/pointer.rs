//! Pointer simulation source.
//!
//! The viewport forwards raw pointer events over a channel; [`PointerSource`]
//! folds them into the current fingertip. A hand counts as present while the
//! primary button is held with the pointer over the canvas, so dragging the
//! mouse draws exactly like moving a tracked finger.

use std::sync::mpsc::{self, Receiver, Sender, TryRecvError};

use fingertip_ink::{Point, PointSource, Tracking, TrackingError};
use tracing::trace;

/// Raw input event from the window, in canvas pixels.
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum PointerInput {
    Moved { x: f32, y: f32 },
    Pressed,
    Released,
    /// Pointer left the canvas area.
    Left,
}

/// Create a connected sender / source pair.
pub fn pointer_channel() -> (Sender<PointerInput>, PointerSource) {
    let (tx, rx) = mpsc::channel();
    (tx, PointerSource::new(rx))
}

pub struct PointerSource {
    rx:       Receiver<PointerInput>,
    position: Option<Point>,
    pressed:  bool,
}

impl PointerSource {
    pub fn new(rx: Receiver<PointerInput>) -> Self {
        PointerSource { rx, position: None, pressed: false }
    }

    fn apply(&mut self, input: PointerInput) {
        match input {
            PointerInput::Moved { x, y } => self.position = Some(Point::new(x, y)),
            PointerInput::Pressed        => self.pressed = true,
            PointerInput::Released       => self.pressed = false,
            PointerInput::Left           => self.position = None,
        }
    }
}

impl PointSource for PointerSource {
    fn locate(&mut self) -> Result<Tracking, TrackingError> {
        loop {
            match self.rx.try_recv() {
                Ok(input) => self.apply(input),
                Err(TryRecvError::Empty) => break,
                Err(TryRecvError::Disconnected) => return Err(TrackingError::Disconnected),
            }
        }
        let tracking = match self.position {
            Some(p) if self.pressed => Tracking::Detected(p),
            _ => Tracking::NotDetected,
        };
        trace!(?tracking, "pointer sampled");
        Ok(tracking)
    }
}
