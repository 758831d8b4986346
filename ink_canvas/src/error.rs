use fingertip_ink::StyleError;
use thiserror::Error;

/// Terminal start-up failures. Once the loop runs, nothing is fatal.
#[derive(Debug, Error)]
pub enum AppError {
    #[error("failed to open window: {0}")]
    Window(String),

    #[error(transparent)]
    Style(#[from] StyleError),

    #[error("failed to connect to the hand tracker: {0}")]
    TrackerInit(String),

    #[error("LeapMotion support not compiled in (rebuild with `--features leap`)")]
    LeapUnavailable,
}
