//! Cursor marker painted on the transient overlay every frame.

use crate::geometry::Point;
use crate::source::Tracking;
use crate::style::{Color, Paint, RadialGradient};
use crate::surface::DrawSurface;

#[derive(Clone, Debug, PartialEq)]
pub struct CursorStyle {
    pub color:         Color,
    pub outline:       Color,
    pub outline_width: f32,
    pub glow_radius:   f32,
    pub dot_radius:    f32,
}

impl Default for CursorStyle {
    fn default() -> Self {
        CursorStyle {
            color:         Color::RED,
            outline:       Color::WHITE,
            outline_width: 2.0,
            glow_radius:   15.0,
            dot_radius:    4.0,
        }
    }
}

impl CursorStyle {
    /// Glow fading from 30% to nothing across `glow_radius`.
    pub fn glow(&self, center: Point) -> RadialGradient {
        RadialGradient::new(center, 0.0, self.glow_radius)
            .with_stop(0.0, self.color.with_alpha(0.3))
            .with_stop(0.5, self.color.with_alpha(0.1))
            .with_stop(1.0, self.color.with_alpha(0.0))
    }
}

#[derive(Clone, Debug, Default)]
pub struct CursorRenderer {
    style: CursorStyle,
}

impl CursorRenderer {
    pub fn new() -> Self { Self::default() }

    pub fn with_style(style: CursorStyle) -> Self {
        CursorRenderer { style }
    }

    pub fn style(&self) -> &CursorStyle { &self.style }

    /// Repaint `overlay` for this frame's tracking result.
    pub fn render(&self, tracking: Tracking, overlay: &mut dyn DrawSurface) {
        overlay.clear();
        let Tracking::Detected(p) = tracking else { return };

        let s = &self.style;
        overlay.fill_circle(p, s.glow_radius, &Paint::Radial(s.glow(p)));
        overlay.fill_circle(p, s.dot_radius, &Paint::Solid(s.color));
        overlay.stroke_circle(p, s.dot_radius, s.outline, s.outline_width);
    }
}
