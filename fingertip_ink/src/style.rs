//! Colors, stroke styles and paints understood by every [`DrawSurface`].
//!
//! [`DrawSurface`]: crate::surface::DrawSurface

use crate::error::StyleError;
use crate::geometry::Point;

// ════════════════════════════════════════════════════════════════════════════
// Color
// ════════════════════════════════════════════════════════════════════════════

/// Straight (non-premultiplied) RGBA, each channel in `0.0..=1.0`.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Color {
    pub r: f32,
    pub g: f32,
    pub b: f32,
    pub a: f32,
}

impl Color {
    pub const TRANSPARENT: Color = Color { r: 0.0, g: 0.0, b: 0.0, a: 0.0 };
    pub const BLACK:       Color = Color { r: 0.0, g: 0.0, b: 0.0, a: 1.0 };
    pub const WHITE:       Color = Color { r: 1.0, g: 1.0, b: 1.0, a: 1.0 };
    pub const RED:         Color = Color { r: 1.0, g: 0.0, b: 0.0, a: 1.0 };

    pub fn from_rgba8(r: u8, g: u8, b: u8, a: u8) -> Self {
        Color {
            r: r as f32 / 255.0,
            g: g as f32 / 255.0,
            b: b as f32 / 255.0,
            a: a as f32 / 255.0,
        }
    }

    /// Parse any CSS color string (`#ff0000`, `rgba(255, 0, 0, 0.3)`, `white`, ...).
    pub fn parse(input: &str) -> Result<Self, StyleError> {
        csscolorparser::parse(input)
            .map(Color::from)
            .map_err(|source| StyleError::InvalidColor { input: input.to_string(), source })
    }

    pub fn with_alpha(self, a: f32) -> Self {
        Color { a: a.clamp(0.0, 1.0), ..self }
    }

    /// Component-wise linear interpolation, `t` clamped to `0.0..=1.0`.
    pub fn lerp(self, other: Color, t: f32) -> Color {
        let t = t.clamp(0.0, 1.0);
        let mix = |a: f32, b: f32| a + (b - a) * t;
        Color {
            r: mix(self.r, other.r),
            g: mix(self.g, other.g),
            b: mix(self.b, other.b),
            a: mix(self.a, other.a),
        }
    }

    /// Pack into `0xAARRGGBB`.
    pub fn to_argb(self) -> u32 {
        let q = |c: f32| (c.clamp(0.0, 1.0) * 255.0).round() as u32;
        (q(self.a) << 24) | (q(self.r) << 16) | (q(self.g) << 8) | q(self.b)
    }

    /// Unpack `0x??RRGGBB` as an opaque color.
    pub fn from_rgb_u32(rgb: u32) -> Color {
        Color::from_rgba8((rgb >> 16) as u8, (rgb >> 8) as u8, rgb as u8, 0xFF)
    }
}

impl From<csscolorparser::Color> for Color {
    fn from(c: csscolorparser::Color) -> Self {
        let [r, g, b, a] = c.to_rgba8();
        Color::from_rgba8(r, g, b, a)
    }
}

// ════════════════════════════════════════════════════════════════════════════
// StrokeStyle
// ════════════════════════════════════════════════════════════════════════════

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum LineJoin {
    #[default]
    Round,
    Bevel,
    Miter,
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum LineCap {
    Butt,
    #[default]
    Round,
    Square,
}

/// Soft halo drawn underneath a stroke.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Shadow {
    pub color: Color,
    /// Halo reach beyond the stroke edge, in pixels.
    pub blur:  f32,
}

#[derive(Clone, Debug, PartialEq)]
pub struct StrokeStyle {
    pub color:  Color,
    pub width:  f32,
    pub join:   LineJoin,
    pub cap:    LineCap,
    pub shadow: Option<Shadow>,
}

impl Default for StrokeStyle {
    /// Red ink, 3 px wide, round joins and caps, faint red halo.
    fn default() -> Self {
        StrokeStyle {
            color:  Color::RED,
            width:  3.0,
            join:   LineJoin::Round,
            cap:    LineCap::Round,
            shadow: Some(Shadow { color: Color::RED.with_alpha(0.3), blur: 5.0 }),
        }
    }
}

impl StrokeStyle {
    pub fn validate(&self) -> Result<(), StyleError> {
        if !(self.width > 0.0) {
            return Err(StyleError::NonPositive { what: "stroke width", value: self.width });
        }
        if let Some(shadow) = &self.shadow {
            if shadow.blur < 0.0 {
                return Err(StyleError::NonPositive { what: "shadow blur", value: shadow.blur });
            }
        }
        Ok(())
    }
}

// ════════════════════════════════════════════════════════════════════════════
// Paint
// ════════════════════════════════════════════════════════════════════════════

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct GradientStop {
    pub offset: f32,
    pub color:  Color,
}

/// Radial gradient between two concentric circles.
#[derive(Clone, Debug, PartialEq)]
pub struct RadialGradient {
    pub center:       Point,
    pub inner_radius: f32,
    pub outer_radius: f32,
    stops:            Vec<GradientStop>,
}

impl RadialGradient {
    pub fn new(center: Point, inner_radius: f32, outer_radius: f32) -> Self {
        RadialGradient { center, inner_radius, outer_radius, stops: Vec::new() }
    }

    /// Add a stop at `offset` (clamped to `0.0..=1.0`); stops stay sorted.
    pub fn add_color_stop(&mut self, offset: f32, color: Color) -> &mut Self {
        let offset = offset.clamp(0.0, 1.0);
        let at = self.stops.partition_point(|s| s.offset <= offset);
        self.stops.insert(at, GradientStop { offset, color });
        self
    }

    pub fn with_stop(mut self, offset: f32, color: Color) -> Self {
        self.add_color_stop(offset, color);
        self
    }

    pub fn stops(&self) -> &[GradientStop] { &self.stops }

    /// Color at a given point, by its distance from the center.
    pub fn color_at(&self, p: Point) -> Color {
        let span = self.outer_radius - self.inner_radius;
        let t = if span > 0.0 {
            (p.distance(self.center) - self.inner_radius) / span
        } else {
            1.0
        };
        self.sample(t)
    }

    /// Color at gradient offset `t`.
    pub fn sample(&self, t: f32) -> Color {
        let t = t.clamp(0.0, 1.0);
        let (first, last) = match (self.stops.first(), self.stops.last()) {
            (Some(f), Some(l)) => (f, l),
            _ => return Color::TRANSPARENT,
        };
        if t <= first.offset { return first.color; }
        if t >= last.offset  { return last.color;  }
        for pair in self.stops.windows(2) {
            let (a, b) = (pair[0], pair[1]);
            if t <= b.offset {
                let span = b.offset - a.offset;
                if span <= f32::EPSILON { return b.color; }
                return a.color.lerp(b.color, (t - a.offset) / span);
            }
        }
        last.color
    }
}

#[derive(Clone, Debug, PartialEq)]
pub enum Paint {
    Solid(Color),
    Radial(RadialGradient),
}

impl Paint {
    pub fn color_at(&self, p: Point) -> Color {
        match self {
            Paint::Solid(c)  => *c,
            Paint::Radial(g) => g.color_at(p),
        }
    }
}
