//! The 2D drawing-surface boundary.

use crate::geometry::{Point, Rect};
use crate::path::Path;
use crate::style::{Color, Paint, StrokeStyle};

/// A primitive vector-drawing surface.
///
/// Implementations own their pixels (or forward to a host canvas); the
/// pipeline only ever issues the calls below.
pub trait DrawSurface {
    /// `(width, height)` in pixels.
    fn size(&self) -> (u32, u32);

    /// Reset the covered area to fully transparent.
    fn clear_rect(&mut self, rect: Rect);

    fn clear(&mut self) {
        let (w, h) = self.size();
        self.clear_rect(Rect::from_size(w, h));
    }

    fn stroke_path(&mut self, path: &Path, style: &StrokeStyle);

    fn fill_circle(&mut self, center: Point, radius: f32, paint: &Paint);

    fn stroke_circle(&mut self, center: Point, radius: f32, color: Color, width: f32);
}
