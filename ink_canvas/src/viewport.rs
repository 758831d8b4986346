//! Software-rendered viewport using `minifb`.
//!
//! Layout:
//!
//! ```text
//! ┌──────────────────────────────────────────┐
//! │                                          │
//! │  canvas: backdrop, ink layer, cursor     │
//! │  layer (canvas_width × canvas_height)    │
//! │                                          │
//! ├──────────────────────────────────────────┤
//! │  status line                             │  36 px
//! │  key legend                              │
//! └──────────────────────────────────────────┘
//! ```

use std::sync::mpsc::Sender;
use std::time::Duration;

use fingertip_ink::Color;
use minifb::{Key, KeyRepeat, MouseButton, MouseMode, Window, WindowOptions};
use tracing::{debug, warn};

use crate::app::UiAction;
use crate::error::AppError;
use crate::pointer::PointerInput;
use crate::raster::Raster;

// ════════════════════════════════════════════════════════════════════════════
// Layout constants
// ════════════════════════════════════════════════════════════════════════════

pub const STATUS_H:  usize = 36;
const STATUS_BG:     u32   = 0xFF0F3460;
const STATUS_FG:     u32   = 0xFFEEEEEE;
const LEGEND_FG:     u32   = 0xFF888888;
const LEGEND:        &str  = "C=clear  R=recognize  Q/Esc=quit";

// ════════════════════════════════════════════════════════════════════════════
// FrameBuffer
// ════════════════════════════════════════════════════════════════════════════

/// `0xAARRGGBB` pixel buffer with the primitive helpers the status bar needs.
pub struct FrameBuffer {
    width:  usize,
    height: usize,
    pixels: Vec<u32>,
}

impl FrameBuffer {
    pub fn new(width: usize, height: usize) -> Self {
        FrameBuffer { width, height, pixels: vec![0xFF000000; width * height] }
    }

    pub fn pixels(&self) -> &[u32] { &self.pixels }
    pub fn pixels_mut(&mut self) -> &mut [u32] { &mut self.pixels }

    pub fn fill(&mut self, color: u32) {
        self.pixels.fill(color);
    }

    pub fn fill_rect(&mut self, x: usize, y: usize, w: usize, h: usize, color: u32) {
        for row in y..(y + h).min(self.height) {
            for col in x..(x + w).min(self.width) {
                self.pixels[row * self.width + col] = color;
            }
        }
    }

    /// Draw `text` with the 3×5 bitmap font, each font pixel a
    /// `scale × scale` block.
    pub fn draw_label(&mut self, text: &str, x: usize, y: usize, color: u32, scale: usize) {
        let scale = scale.max(1);
        let advance = 4 * scale; // 3 wide + 1 gap
        let mut cx = x;
        for ch in text.chars() {
            if cx + advance > self.width { break; }
            for (row, &bits) in char_glyph(ch).iter().enumerate() {
                for col in 0..3usize {
                    if bits & (1 << (2 - col)) != 0 {
                        self.fill_rect(cx + col * scale, y + row * scale, scale, scale, color);
                    }
                }
            }
            cx += advance;
        }
    }
}

// ════════════════════════════════════════════════════════════════════════════
// Viewport
// ════════════════════════════════════════════════════════════════════════════

/// Pointer state seen by the window on one poll.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct PointerSnapshot {
    /// Position over the canvas area, if any.
    pub position:    Option<(f32, f32)>,
    pub button_down: bool,
}

/// Events needed to move a source from `prev` to `next`.
pub fn pointer_events(prev: PointerSnapshot, next: PointerSnapshot) -> Vec<PointerInput> {
    let mut events = Vec::new();
    if next.position != prev.position {
        events.push(match next.position {
            Some((x, y)) => PointerInput::Moved { x, y },
            None => PointerInput::Left,
        });
    }
    if next.button_down != prev.button_down {
        events.push(if next.button_down { PointerInput::Pressed } else { PointerInput::Released });
    }
    events
}

pub fn action_for_key(key: Key) -> Option<UiAction> {
    match key {
        Key::C => Some(UiAction::ClearCanvas),
        Key::R => Some(UiAction::RecognizeDrawing),
        Key::Q | Key::Escape => Some(UiAction::Quit),
        _ => None,
    }
}

pub struct Viewport {
    window:     Window,
    frame:      FrameBuffer,
    canvas_w:   usize,
    canvas_h:   usize,
    pointer_tx: Sender<PointerInput>,
    pointer:    PointerSnapshot,
}

impl Viewport {
    pub fn new(
        canvas_size: (u32, u32),
        target_fps: u32,
        pointer_tx: Sender<PointerInput>,
    ) -> Result<Self, AppError> {
        let canvas_w = canvas_size.0 as usize;
        let canvas_h = canvas_size.1 as usize;
        let (win_w, win_h) = (canvas_w, canvas_h + STATUS_H);

        let mut window = Window::new(
            "Ink Canvas",
            win_w, win_h,
            WindowOptions {
                resize: false,
                ..WindowOptions::default()
            },
        ).map_err(|e| AppError::Window(e.to_string()))?;

        let fps = u64::from(target_fps.max(1));
        window.limit_update_rate(Some(Duration::from_micros(1_000_000 / fps)));
        debug!(win_w, win_h, fps, "viewport opened");

        Ok(Viewport {
            window,
            frame: FrameBuffer::new(win_w, win_h),
            canvas_w,
            canvas_h,
            pointer_tx,
            pointer: PointerSnapshot::default(),
        })
    }

    pub fn is_open(&self) -> bool { self.window.is_open() }

    /// Open and focused.
    pub fn is_visible(&mut self) -> bool {
        self.window.is_open() && self.window.is_active()
    }

    /// Forward pointer changes to the pointer source and collect key actions.
    pub fn poll_input(&mut self) -> Vec<UiAction> {
        if !self.window.is_open() {
            return vec![UiAction::Quit];
        }

        let (cw, ch) = (self.canvas_w as f32, self.canvas_h as f32);
        let next = PointerSnapshot {
            position: self
                .window
                .get_mouse_pos(MouseMode::Discard)
                .filter(|&(x, y)| x >= 0.0 && y >= 0.0 && x < cw && y < ch),
            button_down: self.window.get_mouse_down(MouseButton::Left),
        };
        for event in pointer_events(self.pointer, next) {
            let _ = self.pointer_tx.send(event);
        }
        self.pointer = next;

        self.window
            .get_keys_pressed(KeyRepeat::No)
            .into_iter()
            .filter_map(action_for_key)
            .collect()
    }

    /// Compose backdrop, layers (bottom first) and status bar, then present.
    pub fn present(&mut self, backdrop: Color, layers: &[&Raster], status: &str) {
        let (cw, ch) = (self.canvas_w, self.canvas_h);

        self.frame.fill(0xFF000000 | backdrop.to_argb());
        for layer in layers {
            layer.composite_onto(self.frame.pixels_mut());
        }

        // ── Status bar ────────────────────────────────────────────────────
        self.frame.fill_rect(0, ch, cw, STATUS_H, STATUS_BG);
        self.frame.draw_label(status, 10, ch + 6, STATUS_FG, 2);
        self.frame.draw_label(LEGEND, 10, ch + STATUS_H - 10, LEGEND_FG, 1);

        if let Err(e) = self.window.update_with_buffer(self.frame.pixels(), cw, ch + STATUS_H) {
            warn!(error = %e, "failed to present frame");
        }
    }
}

// ────────────────────────────────────────────────────────────────────────────
// Minimal 3×5 bitmap font
// ────────────────────────────────────────────────────────────────────────────

fn char_glyph(c: char) -> [u8; 5] {
    match c {
        '0' => [0b111, 0b101, 0b101, 0b101, 0b111],
        '1' => [0b010, 0b110, 0b010, 0b010, 0b111],
        '2' => [0b111, 0b001, 0b111, 0b100, 0b111],
        '3' => [0b111, 0b001, 0b111, 0b001, 0b111],
        '4' => [0b101, 0b101, 0b111, 0b001, 0b001],
        '5' => [0b111, 0b100, 0b111, 0b001, 0b111],
        '6' => [0b111, 0b100, 0b111, 0b101, 0b111],
        '7' => [0b111, 0b001, 0b001, 0b001, 0b001],
        '8' => [0b111, 0b101, 0b111, 0b101, 0b111],
        '9' => [0b111, 0b101, 0b111, 0b001, 0b111],
        'a' | 'A' => [0b111, 0b101, 0b111, 0b101, 0b101],
        'b' | 'B' => [0b110, 0b101, 0b110, 0b101, 0b110],
        'c' | 'C' => [0b111, 0b100, 0b100, 0b100, 0b111],
        'd' | 'D' => [0b110, 0b101, 0b101, 0b101, 0b110],
        'e' | 'E' => [0b111, 0b100, 0b111, 0b100, 0b111],
        'f' | 'F' => [0b111, 0b100, 0b111, 0b100, 0b100],
        'g' | 'G' => [0b111, 0b100, 0b101, 0b101, 0b111],
        'h' | 'H' => [0b101, 0b101, 0b111, 0b101, 0b101],
        'i' | 'I' => [0b111, 0b010, 0b010, 0b010, 0b111],
        'j' | 'J' => [0b001, 0b001, 0b001, 0b101, 0b111],
        'k' | 'K' => [0b101, 0b101, 0b110, 0b101, 0b101],
        'l' | 'L' => [0b100, 0b100, 0b100, 0b100, 0b111],
        'm' | 'M' => [0b101, 0b111, 0b101, 0b101, 0b101],
        'n' | 'N' => [0b111, 0b101, 0b101, 0b101, 0b101],
        'o' | 'O' => [0b111, 0b101, 0b101, 0b101, 0b111],
        'p' | 'P' => [0b111, 0b101, 0b111, 0b100, 0b100],
        'q' | 'Q' => [0b111, 0b101, 0b101, 0b111, 0b001],
        'r' | 'R' => [0b110, 0b101, 0b110, 0b101, 0b101],
        's' | 'S' => [0b111, 0b100, 0b111, 0b001, 0b111],
        't' | 'T' => [0b111, 0b010, 0b010, 0b010, 0b010],
        'u' | 'U' => [0b101, 0b101, 0b101, 0b101, 0b111],
        'v' | 'V' => [0b101, 0b101, 0b101, 0b010, 0b010],
        'w' | 'W' => [0b101, 0b101, 0b101, 0b111, 0b101],
        'x' | 'X' => [0b101, 0b101, 0b010, 0b101, 0b101],
        'y' | 'Y' => [0b101, 0b101, 0b111, 0b010, 0b010],
        'z' | 'Z' => [0b111, 0b001, 0b010, 0b100, 0b111],
        '/' => [0b001, 0b001, 0b010, 0b100, 0b100],
        '-' => [0b000, 0b000, 0b111, 0b000, 0b000],
        '.' => [0b000, 0b000, 0b000, 0b000, 0b010],
        ',' => [0b000, 0b000, 0b000, 0b010, 0b100],
        ':' => [0b000, 0b010, 0b000, 0b010, 0b000],
        '=' => [0b000, 0b111, 0b000, 0b111, 0b000],
        '(' => [0b010, 0b100, 0b100, 0b100, 0b010],
        ')' => [0b010, 0b001, 0b001, 0b001, 0b010],
        '!' => [0b010, 0b010, 0b010, 0b000, 0b010],
        ' ' => [0b000, 0b000, 0b000, 0b000, 0b000],
        _   => [0b000, 0b000, 0b010, 0b000, 0b000], // fallback dot
    }
}
