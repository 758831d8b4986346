//! Application configuration.
//!
//! Every field has a default, so a TOML file only needs the keys it changes:
//!
//! ```toml
//! source = "pointer"
//!
//! [canvas]
//! width = 800
//!
//! [stroke]
//! color = "#00c8ff"
//! movement_threshold = 2.0
//! ```

use std::path::Path;
use std::time::Duration;

use anyhow::{Context, Result};
use fingertip_ink::smoother::{INTERPOLATION_STEPS, SMOOTHING_FACTOR};
use fingertip_ink::tracker::DEFAULT_MOVEMENT_THRESHOLD;
use fingertip_ink::{Color, CursorStyle, Shadow, StrokeStyle, StyleError};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize, clap::ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum SourceKind {
    /// Drag with the left mouse button to draw.
    #[default]
    Pointer,
    /// LeapMotion controller (needs the `leap` feature).
    Leap,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    pub canvas:               CanvasConfig,
    pub stroke:               StrokeConfig,
    pub cursor:               CursorConfig,
    pub source:               SourceKind,
    /// Skip tracking while the window is not focused.
    pub pause_when_unfocused: bool,
    pub target_fps:           u32,
}

impl Default for AppConfig {
    fn default() -> Self {
        AppConfig {
            canvas:               CanvasConfig::default(),
            stroke:               StrokeConfig::default(),
            cursor:               CursorConfig::default(),
            source:               SourceKind::Pointer,
            pause_when_unfocused: true,
            target_fps:           60,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CanvasConfig {
    pub width:    u32,
    pub height:   u32,
    pub backdrop: String,
}

impl Default for CanvasConfig {
    fn default() -> Self {
        CanvasConfig { width: 640, height: 480, backdrop: "#101018".to_string() }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct StrokeConfig {
    pub color:               String,
    pub width:               f32,
    pub shadow_color:        String,
    /// Zero disables the halo.
    pub shadow_blur:         f32,
    pub movement_threshold:  f32,
    pub interpolation_steps: usize,
    pub smoothing:           f32,
}

impl Default for StrokeConfig {
    fn default() -> Self {
        StrokeConfig {
            color:               "#ff0000".to_string(),
            width:               3.0,
            shadow_color:        "rgba(255, 0, 0, 0.3)".to_string(),
            shadow_blur:         5.0,
            movement_threshold:  DEFAULT_MOVEMENT_THRESHOLD,
            interpolation_steps: INTERPOLATION_STEPS,
            smoothing:           SMOOTHING_FACTOR,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CursorConfig {
    pub color:       String,
    pub outline:     String,
    pub glow_radius: f32,
    pub dot_radius:  f32,
}

impl Default for CursorConfig {
    fn default() -> Self {
        CursorConfig {
            color:       "#ff0000".to_string(),
            outline:     "#ffffff".to_string(),
            glow_radius: 15.0,
            dot_radius:  4.0,
        }
    }
}

impl AppConfig {
    /// Load and validate a TOML configuration file.
    pub fn load(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file: {}", path.display()))?;

        let config: AppConfig = toml::from_str(&content)
            .with_context(|| format!("Failed to parse config file: {}", path.display()))?;

        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<()> {
        if self.canvas.width == 0 || self.canvas.height == 0 {
            anyhow::bail!(
                "Canvas size must be positive, got {}x{}",
                self.canvas.width,
                self.canvas.height
            );
        }
        if self.target_fps == 0 {
            anyhow::bail!("target_fps must be positive");
        }
        if !(self.stroke.movement_threshold >= 0.0) {
            anyhow::bail!(
                "movement_threshold must be non-negative, got {}",
                self.stroke.movement_threshold
            );
        }
        if self.cursor.glow_radius < 0.0 || self.cursor.dot_radius < 0.0 {
            anyhow::bail!("Cursor radii must be non-negative");
        }

        self.backdrop().context("Invalid canvas backdrop")?;
        self.stroke_style().context("Invalid stroke style")?;
        self.cursor_style().context("Invalid cursor style")?;
        Ok(())
    }

    /// Apply command-line overrides on top of the file/default values.
    pub fn with_overrides(
        mut self,
        source: Option<SourceKind>,
        threshold: Option<f32>,
        width: Option<u32>,
        height: Option<u32>,
    ) -> Self {
        if let Some(source) = source {
            self.source = source;
        }
        if let Some(threshold) = threshold {
            self.stroke.movement_threshold = threshold;
        }
        if let Some(width) = width {
            self.canvas.width = width;
        }
        if let Some(height) = height {
            self.canvas.height = height;
        }
        self
    }

    pub fn canvas_size(&self) -> (u32, u32) {
        (self.canvas.width, self.canvas.height)
    }

    pub fn backdrop(&self) -> Result<Color, StyleError> {
        Color::parse(&self.canvas.backdrop)
    }

    pub fn stroke_style(&self) -> Result<StrokeStyle, StyleError> {
        let shadow = if self.stroke.shadow_blur > 0.0 {
            Some(Shadow {
                color: Color::parse(&self.stroke.shadow_color)?,
                blur:  self.stroke.shadow_blur,
            })
        } else {
            None
        };
        let style = StrokeStyle {
            color: Color::parse(&self.stroke.color)?,
            width: self.stroke.width,
            shadow,
            ..StrokeStyle::default()
        };
        style.validate()?;
        Ok(style)
    }

    pub fn cursor_style(&self) -> Result<CursorStyle, StyleError> {
        Ok(CursorStyle {
            color:       Color::parse(&self.cursor.color)?,
            outline:     Color::parse(&self.cursor.outline)?,
            glow_radius: self.cursor.glow_radius,
            dot_radius:  self.cursor.dot_radius,
            ..CursorStyle::default()
        })
    }

    /// Minimum time between presented frames.
    pub fn frame_interval(&self) -> Duration {
        Duration::from_secs_f64(1.0 / self.target_fps.max(1) as f64)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    fn write_config(contents: &str) -> tempfile::NamedTempFile {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        file.write_all(contents.as_bytes()).unwrap();
        file
    }

    #[test]
    fn defaults() {
        let cfg = AppConfig::default();
        assert_eq!(cfg.canvas_size(), (640, 480));
        assert_eq!(cfg.source, SourceKind::Pointer);
        assert!(cfg.pause_when_unfocused);
        assert_eq!(cfg.target_fps, 60);
        assert_eq!(cfg.stroke.movement_threshold, 0.2);
        assert_eq!(cfg.stroke.interpolation_steps, 10);
        assert!(cfg.validate().is_ok());

        let style = cfg.stroke_style().unwrap();
        assert_eq!(style.color, Color::RED);
        assert_eq!(style.width, 3.0);
        let shadow = style.shadow.unwrap();
        assert_eq!(shadow.blur, 5.0);
        approx::assert_abs_diff_eq!(shadow.color.a, 0.3, epsilon = 1.0 / 255.0);
        assert_eq!(cfg.cursor_style().unwrap(), CursorStyle::default());
    }

    #[test]
    fn partial_file_keeps_other_defaults() {
        let file = write_config(
            r##"
            source = "leap"
            target_fps = 30

            [canvas]
            width = 800

            [stroke]
            color = "#00c8ff"
            movement_threshold = 2.0
            "##,
        );
        let cfg = AppConfig::load(file.path()).unwrap();
        assert_eq!(cfg.source, SourceKind::Leap);
        assert_eq!(cfg.canvas_size(), (800, 480));
        assert_eq!(cfg.stroke.movement_threshold, 2.0);
        assert_eq!(cfg.stroke.width, 3.0);
        assert_eq!(cfg.stroke_style().unwrap().color, Color::from_rgba8(0, 200, 255, 255));
        assert_eq!(cfg.frame_interval(), Duration::from_secs_f64(1.0 / 30.0));
    }

    #[test]
    fn bad_color_is_rejected() {
        let file = write_config("[cursor]\ncolor = \"chartreuse-ish\"\n");
        let err = AppConfig::load(file.path()).unwrap_err();
        assert!(format!("{err:#}").contains("cursor"));
    }

    #[test]
    fn negative_threshold_is_rejected() {
        let cfg = AppConfig::default().with_overrides(None, Some(-1.0), None, None);
        assert!(cfg.validate().is_err());
    }

    #[test]
    fn zero_canvas_is_rejected() {
        let cfg = AppConfig::default().with_overrides(None, None, Some(0), None);
        assert!(cfg.validate().is_err());
    }

    #[test]
    fn missing_file_reports_path() {
        let err = AppConfig::load(Path::new("/nonexistent/ink.toml")).unwrap_err();
        assert!(err.to_string().contains("/nonexistent/ink.toml"));
    }

    #[test]
    fn overrides_win() {
        let cfg = AppConfig::default().with_overrides(
            Some(SourceKind::Leap),
            Some(1.5),
            Some(320),
            Some(240),
        );
        assert_eq!(cfg.source, SourceKind::Leap);
        assert_eq!(cfg.stroke.movement_threshold, 1.5);
        assert_eq!(cfg.canvas_size(), (320, 240));
    }

    #[test]
    fn zero_blur_drops_shadow() {
        let mut cfg = AppConfig::default();
        cfg.stroke.shadow_blur = 0.0;
        assert_eq!(cfg.stroke_style().unwrap().shadow, None);
    }
}
