//! Software RGBA surface implementing [`DrawSurface`].
//!
//! Strokes are rasterised as a distance field: every pixel near a flattened
//! polyline takes its distance to the closest capsule (one per polyline
//! segment), converts that to coverage with a one-pixel ramp and is blended
//! once. Overlapping capsules therefore never double-blend.

use std::ops::Range;

use fingertip_ink::{Color, DrawSurface, LineCap, Paint, Path, Point, Rect, StrokeStyle};
use glam::Vec2;
use tracing::trace;

/// Max distance between flattened curve samples, in pixels.
const FLATTEN_TOLERANCE: f32 = 0.5;

#[derive(Clone, Debug)]
pub struct Raster {
    width:  u32,
    height: u32,
    pixels: Vec<Color>,
}

impl Raster {
    /// A fully transparent `width × height` raster.
    pub fn new(width: u32, height: u32) -> Self {
        Raster { width, height, pixels: vec![Color::TRANSPARENT; width as usize * height as usize] }
    }

    pub fn width(&self) -> u32 { self.width }
    pub fn height(&self) -> u32 { self.height }
    pub fn pixels(&self) -> &[Color] { &self.pixels }

    pub fn pixel(&self, x: u32, y: u32) -> Option<Color> {
        if x >= self.width || y >= self.height {
            return None;
        }
        self.pixels.get(y as usize * self.width as usize + x as usize).copied()
    }

    pub fn is_blank(&self) -> bool {
        self.pixels.iter().all(|c| c.a <= 0.0)
    }

    /// Source-over blend onto an opaque `0x??RRGGBB` framebuffer laid out with
    /// the same row width. Extra framebuffer rows are left untouched.
    pub fn composite_onto(&self, framebuffer: &mut [u32]) {
        let q = |c: f32| (c.clamp(0.0, 1.0) * 255.0).round() as u32;
        for (src, dst) in self.pixels.iter().zip(framebuffer.iter_mut()) {
            let a = src.a.clamp(0.0, 1.0);
            if a <= 0.0 {
                continue;
            }
            let under = Color::from_rgb_u32(*dst);
            let mix = |s: f32, d: f32| s * a + d * (1.0 - a);
            *dst = (*dst & 0xFF00_0000)
                | (q(mix(src.r, under.r)) << 16)
                | (q(mix(src.g, under.g)) << 8)
                | q(mix(src.b, under.b));
        }
    }

    // ── Internals ─────────────────────────────────────────────────────────

    /// Pixel ranges overlapping the box `min..max`, clipped to the raster.
    fn clip(&self, min: Point, max: Point) -> Option<(Range<usize>, Range<usize>)> {
        let x0 = min.x.floor().max(0.0);
        let y0 = min.y.floor().max(0.0);
        let x1 = max.x.ceil().min(self.width as f32);
        let y1 = max.y.ceil().min(self.height as f32);
        if !(x0 < x1 && y0 < y1) {
            return None;
        }
        Some((x0 as usize..x1 as usize, y0 as usize..y1 as usize))
    }

    fn blend(&mut self, x: usize, y: usize, src: Color, coverage: f32) {
        let sa = src.a * coverage.clamp(0.0, 1.0);
        if sa <= 0.0 {
            return;
        }
        let i = y * self.width as usize + x;
        let dst = self.pixels[i];
        let da = dst.a * (1.0 - sa);
        let out_a = sa + da;
        let mix = |s: f32, d: f32| (s * sa + d * da) / out_a;
        self.pixels[i] = Color {
            r: mix(src.r, dst.r),
            g: mix(src.g, dst.g),
            b: mix(src.b, dst.b),
            a: out_a,
        };
    }

    /// Blend `color` over every pixel in `min..max`, weighted by `coverage`
    /// evaluated at the pixel center.
    fn paint_region(
        &mut self,
        min: Point,
        max: Point,
        mut coverage: impl FnMut(Point) -> Option<(Color, f32)>,
    ) {
        let Some((xs, ys)) = self.clip(min, max) else { return };
        for y in ys {
            for x in xs.clone() {
                let center = Vec2::new(x as f32 + 0.5, y as f32 + 0.5);
                if let Some((color, cov)) = coverage(center) {
                    self.blend(x, y, color, cov);
                }
            }
        }
    }
}

/// One polyline segment widened into a capsule with per-end cap behavior.
#[derive(Clone, Copy, Debug)]
struct Capsule {
    start:       Point,
    dir:         Vec2,
    len:         f32,
    round_start: bool,
    round_end:   bool,
    ext_start:   f32,
    ext_end:     f32,
}

impl Capsule {
    /// Distance from `p` to the capsule's spine, adjusted so that flat ends
    /// sit `half` (the stroke half-width) away from their cut line.
    fn distance(&self, p: Point, half: f32) -> f32 {
        let t = (p - self.start).dot(self.dir);
        let lo = if self.round_start { 0.0 } else { f32::NEG_INFINITY };
        let hi = if self.round_end { self.len } else { f32::INFINITY };
        let mut d = p.distance(self.start + self.dir * t.clamp(lo, hi));
        if !self.round_start {
            d = d.max(half - self.ext_start - t);
        }
        if !self.round_end {
            d = d.max(half - self.ext_end - (self.len - t));
        }
        d
    }
}

fn capsules(polyline: &[Point], cap: LineCap, half: f32) -> Vec<Capsule> {
    let ext = if cap == LineCap::Square { half } else { 0.0 };
    let round = cap == LineCap::Round;

    let pairs: Vec<(Point, Point)> = match polyline {
        [] => return Vec::new(),
        [p] => vec![(*p, *p)],
        _ => polyline.windows(2).map(|w| (w[0], w[1])).collect(),
    };
    let last = pairs.len() - 1;

    pairs
        .into_iter()
        .enumerate()
        .map(|(i, (a, b))| {
            let len = a.distance(b);
            let dir = if len > 1e-6 { (b - a) / len } else { Vec2::X };
            Capsule {
                start:       a,
                dir,
                len,
                round_start: i > 0 || round,
                round_end:   i < last || round,
                ext_start:   if i == 0 { ext } else { 0.0 },
                ext_end:     if i == last { ext } else { 0.0 },
            }
        })
        .collect()
}

fn bounds(points: &[Point], reach: f32) -> Option<(Point, Point)> {
    let first = *points.first()?;
    let (min, max) = points.iter().fold((first, first), |(lo, hi), p| (lo.min(*p), hi.max(*p)));
    Some((min - Vec2::splat(reach), max + Vec2::splat(reach)))
}

impl DrawSurface for Raster {
    fn size(&self) -> (u32, u32) { (self.width, self.height) }

    fn clear_rect(&mut self, rect: Rect) {
        if rect.is_empty() {
            return;
        }
        let min = Vec2::new(rect.x, rect.y);
        let max = Vec2::new(rect.right(), rect.bottom());
        let Some((xs, ys)) = self.clip(min, max) else { return };
        let w = self.width as usize;
        for y in ys {
            self.pixels[y * w + xs.start..y * w + xs.end].fill(Color::TRANSPARENT);
        }
    }

    fn stroke_path(&mut self, path: &Path, style: &StrokeStyle) {
        let half = style.width / 2.0;
        let shadow = style.shadow.filter(|s| s.blur > 0.0);
        let reach = half * 2.0 + shadow.map_or(0.0, |s| s.blur) + 1.0;

        for polyline in path.flatten(FLATTEN_TOLERANCE) {
            let caps = capsules(&polyline, style.cap, half);
            let Some((min, max)) = bounds(&polyline, reach) else { continue };
            let nearest = |p: Point| caps.iter().map(|c| c.distance(p, half)).fold(f32::INFINITY, f32::min);

            if let Some(shadow) = shadow {
                self.paint_region(min, max, |p| {
                    let cov = (half + shadow.blur - nearest(p)) / shadow.blur;
                    (cov > 0.0).then_some((shadow.color, cov))
                });
            }
            self.paint_region(min, max, |p| {
                let cov = half + 0.5 - nearest(p);
                (cov > 0.0).then_some((style.color, cov))
            });
            trace!(points = polyline.len(), "polyline stroked");
        }
    }

    fn fill_circle(&mut self, center: Point, radius: f32, paint: &Paint) {
        let reach = Vec2::splat(radius + 1.0);
        self.paint_region(center - reach, center + reach, |p| {
            let cov = radius + 0.5 - p.distance(center);
            (cov > 0.0).then(|| (paint.color_at(p), cov))
        });
    }

    fn stroke_circle(&mut self, center: Point, radius: f32, color: Color, width: f32) {
        let half = width / 2.0;
        let reach = Vec2::splat(radius + half + 1.0);
        self.paint_region(center - reach, center + reach, |p| {
            let cov = half + 0.5 - (p.distance(center) - radius).abs();
            (cov > 0.0).then_some((color, cov))
        });
    }
}
