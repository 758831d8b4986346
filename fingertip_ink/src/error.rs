use thiserror::Error;

/// Failure while asking a point source for the current fingertip.
///
/// The render loop never propagates these: a failed query is logged and the
/// frame is treated as "no hand detected".
#[derive(Debug, Error)]
pub enum TrackingError {
    #[error("hand pose inference failed: {0}")]
    Inference(String),
    #[error("video frame not ready ({width}x{height})")]
    VideoNotReady { width: u32, height: u32 },
    #[error("tracking source disconnected")]
    Disconnected,
}

#[derive(Debug, Error)]
pub enum StyleError {
    #[error("invalid color {input:?}: {source}")]
    InvalidColor {
        input: String,
        #[source]
        source: csscolorparser::ParseColorError,
    },
    #[error("invalid {what}: {value} (must be positive)")]
    NonPositive { what: &'static str, value: f32 },
}
