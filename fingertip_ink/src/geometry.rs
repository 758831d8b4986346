//! Canvas-space geometry primitives.

/// A position in canvas pixel coordinates.
pub type Point = glam::Vec2;

/// Axis-aligned rectangle in canvas pixel coordinates.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct Rect {
    pub x:      f32,
    pub y:      f32,
    pub width:  f32,
    pub height: f32,
}

impl Rect {
    pub fn new(x: f32, y: f32, width: f32, height: f32) -> Self {
        Rect { x, y, width, height }
    }

    /// Rectangle anchored at the origin covering a whole `width × height` surface.
    pub fn from_size(width: u32, height: u32) -> Self {
        Rect::new(0.0, 0.0, width as f32, height as f32)
    }

    pub fn right(&self) -> f32 { self.x + self.width }
    pub fn bottom(&self) -> f32 { self.y + self.height }

    pub fn is_empty(&self) -> bool {
        self.width <= 0.0 || self.height <= 0.0
    }
}

/// `steps + 1` evenly spaced points from `start` to `end`, both inclusive.
pub fn interpolate(start: Point, end: Point, steps: usize) -> impl Iterator<Item = Point> {
    let steps = steps.max(1);
    (0..=steps).map(move |i| {
        if i == steps {
            end
        } else {
            start + (end - start) * (i as f32 / steps as f32)
        }
    })
}
