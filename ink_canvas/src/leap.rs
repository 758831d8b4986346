//! LeapMotion hand-pose model (feature `leap`).
//!
//! LeapC is polled on a background thread; each tracking frame is converted
//! into [`HandPrediction`]s in a virtual 640×480 "video" frame and handed to
//! the render thread over a channel. [`LeapPoseModel::estimate_hands`] drains
//! the channel without blocking and keeps the newest frame.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::mpsc::{self, Receiver, Sender, TryRecvError};
use std::sync::Arc;
use std::thread::{self, JoinHandle};
use std::time::Duration;

use fingertip_ink::{Annotations, HandPrediction, Landmark, PoseEstimator, TrackingError};
use glam::vec3;
use tracing::{debug, info, trace, warn};

use crate::error::AppError;

/// Virtual video frame the millimetre coordinates are projected into.
pub const VIDEO_W: u32 = 640;
pub const VIDEO_H: u32 = 480;

/// Interaction box above the controller, in millimetres.
const X_RANGE: (f32, f32) = (-200.0, 200.0);
const Y_RANGE: (f32, f32) = (100.0, 400.0);

const CONNECT_TIMEOUT: Duration = Duration::from_secs(5);

/// Project a LeapMotion position (mm, y up) into virtual video pixels.
///
/// The video is treated like a front camera frame: the canvas mapping mirrors
/// x, so x is flipped here to keep the hand's right on the canvas right.
pub fn project(x: f32, y: f32, z: f32) -> Landmark {
    let u = (x - X_RANGE.0) / (X_RANGE.1 - X_RANGE.0);
    let v = (y - Y_RANGE.0) / (Y_RANGE.1 - Y_RANGE.0);
    vec3((1.0 - u) * VIDEO_W as f32, (1.0 - v) * VIDEO_H as f32, z)
}

pub struct LeapPoseModel {
    frames: Receiver<Vec<HandPrediction>>,
    latest: Vec<HandPrediction>,
    stop:   Arc<AtomicBool>,
    worker: Option<JoinHandle<()>>,
}

impl LeapPoseModel {
    /// Open the LeapC connection on a polling thread and wait for it to come
    /// up.
    pub fn connect() -> Result<Self, AppError> {
        let (ready_tx, ready_rx) = mpsc::channel::<Result<(), String>>();
        let (frame_tx, frame_rx) = mpsc::channel();
        let stop = Arc::new(AtomicBool::new(false));

        let worker = {
            let stop = Arc::clone(&stop);
            thread::Builder::new()
                .name("leap-poll".into())
                .spawn(move || poll_loop(ready_tx, frame_tx, stop))
                .map_err(|e| AppError::TrackerInit(e.to_string()))?
        };

        match ready_rx.recv_timeout(CONNECT_TIMEOUT) {
            Ok(Ok(())) => info!("LeapMotion connection open"),
            Ok(Err(e)) => return Err(AppError::TrackerInit(e)),
            Err(_) => {
                stop.store(true, Ordering::SeqCst);
                return Err(AppError::TrackerInit("timed out waiting for LeapC".into()));
            }
        }

        Ok(LeapPoseModel { frames: frame_rx, latest: Vec::new(), stop, worker: Some(worker) })
    }
}

impl PoseEstimator for LeapPoseModel {
    fn estimate_hands(&mut self) -> Result<Vec<HandPrediction>, TrackingError> {
        loop {
            match self.frames.try_recv() {
                Ok(hands) => self.latest = hands,
                Err(TryRecvError::Empty) => break,
                Err(TryRecvError::Disconnected) => return Err(TrackingError::Disconnected),
            }
        }
        Ok(self.latest.clone())
    }

    fn video_size(&self) -> (u32, u32) { (VIDEO_W, VIDEO_H) }

    fn release(&mut self) {
        self.stop.store(true, Ordering::SeqCst);
        if let Some(worker) = self.worker.take() {
            if worker.join().is_err() {
                warn!("LeapMotion polling thread panicked");
            }
        }
        debug!("LeapMotion released");
    }
}

impl Drop for LeapPoseModel {
    fn drop(&mut self) {
        self.stop.store(true, Ordering::SeqCst);
    }
}

fn poll_loop(
    ready: Sender<Result<(), String>>,
    frames: Sender<Vec<HandPrediction>>,
    stop: Arc<AtomicBool>,
) {
    use leaprs::*;

    let mut connection = match Connection::create(ConnectionConfig::default()) {
        Ok(c) => c,
        Err(e) => {
            let _ = ready.send(Err(format!("failed to create LeapC connection: {e:?}")));
            return;
        }
    };
    if let Err(e) = connection.open() {
        let _ = ready.send(Err(format!("failed to open LeapMotion device: {e:?}")));
        return;
    }
    let _ = ready.send(Ok(()));

    while !stop.load(Ordering::SeqCst) {
        let msg = match connection.poll(100) {
            Ok(m)  => m,
            Err(_) => continue,
        };

        if let Event::Tracking(frame) = msg.event() {
            let hands: Vec<HandPrediction> = frame.hands().map(|h| hand_prediction(&h)).collect();
            trace!(hands = hands.len(), "leap frame");
            if frames.send(hands).is_err() {
                return;
            }
        }
    }
}

fn hand_prediction(hand: &leaprs::Hand) -> HandPrediction {
    let fingers: Vec<_> = hand.digits().collect();
    let chain = |i: usize| -> Vec<Landmark> {
        let Some(d) = fingers.get(i) else { return Vec::new() };
        [
            d.metacarpal().next_joint(),
            d.proximal().next_joint(),
            d.intermediate().next_joint(),
            d.distal().next_joint(),
        ]
        .iter()
        .map(|j| project(j.x, j.y, j.z))
        .collect()
    };
    let palm = hand.palm().position();
    let palm_base = vec![project(palm.x, palm.y, palm.z)];

    let annotations = Annotations {
        thumb:         chain(0),
        index_finger:  chain(1),
        middle_finger: chain(2),
        ring_finger:   chain(3),
        pinky:         chain(4),
        palm_base,
    };
    let landmarks: Vec<Landmark> = [
        &annotations.palm_base,
        &annotations.thumb,
        &annotations.index_finger,
        &annotations.middle_finger,
        &annotations.ring_finger,
        &annotations.pinky,
    ]
    .into_iter()
    .flatten()
    .copied()
    .collect();

    HandPrediction {
        // LeapC only reports hands it is tracking.
        hand_in_view_confidence: 1.0,
        landmarks,
        annotations,
        ..HandPrediction::default()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_abs_diff_eq;
    use fingertip_ink::CanvasMapping;

    #[test]
    fn interaction_box_corners() {
        let top_right = project(200.0, 400.0, 0.0);
        assert_abs_diff_eq!(top_right.x, 0.0);
        assert_abs_diff_eq!(top_right.y, 0.0);
        let bottom_left = project(-200.0, 100.0, 7.0);
        assert_abs_diff_eq!(bottom_left.x, 640.0);
        assert_abs_diff_eq!(bottom_left.y, 480.0);
        assert_eq!(bottom_left.z, 7.0);
    }

    #[test]
    fn hand_right_lands_canvas_right() {
        let m = CanvasMapping::new((640, 480), (VIDEO_W, VIDEO_H)).unwrap();
        let p = m.to_canvas(project(150.0, 250.0, 0.0));
        assert!(p.x > 320.0);
        assert_abs_diff_eq!(p.y, 240.0);
    }
}
