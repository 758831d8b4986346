//! # ink_canvas
//!
//! Draw with a fingertip. The `fingertip_ink` pipeline runs once per window
//! frame; ink accumulates on one raster layer while a cursor glow follows the
//! tracked point on a second.
//!
//! ## Point sources
//!
//! | Source | Selected by | Hand present when |
//! |---|---|---|
//! | Pointer simulation | `--source pointer` (default) | Left button held over the canvas |
//! | LeapMotion | `--source leap`, feature `leap` | Controller sees a hand; index fingertip is tracked |
//!
//! ## Keys
//!
//! | Key | Action |
//! |---|---|
//! | `C` | Clear canvas |
//! | `R` | Recognize drawing (not available yet) |
//! | `Q` / `Escape` | Quit |

pub mod app;
pub mod config;
pub mod error;
#[cfg(feature = "leap")]
pub mod leap;
pub mod pointer;
pub mod raster;
pub mod viewport;
