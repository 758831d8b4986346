//! Top-level application state and run loop.
//!
//! `AppState` owns the render loop and both raster layers, turns UI actions
//! into pipeline calls and keeps the status line current. `run` wires it to
//! the viewport and the configured point source.

use fingertip_ink::{
    Color, CursorRenderer, CurveSmoother, Frame, PointSource, RenderLoop, Schedule,
    StrokeTracker, Surfaces, Tracking,
};
use tracing::{debug, info};

use crate::config::{AppConfig, SourceKind};
use crate::error::AppError;
use crate::pointer::{pointer_channel, PointerSource};
use crate::raster::Raster;
use crate::viewport::Viewport;

/// Rendered frames a UI notice stays on the status line.
pub const NOTICE_FRAMES: u32 = 90;

pub const STATUS_LOADING: &str = "Loading hand tracking model...";
pub const STATUS_READY:   &str = "Ready";

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum UiAction {
    ClearCanvas,
    RecognizeDrawing,
    Quit,
}

pub fn tracking_status(tracking: Tracking) -> String {
    match tracking {
        Tracking::Detected(p) => format!("Tracking ({:.0}, {:.0})", p.x, p.y),
        Tracking::NotDetected => "No hand detected".to_string(),
    }
}

// ════════════════════════════════════════════════════════════════════════════
// AppState
// ════════════════════════════════════════════════════════════════════════════

pub struct AppState<S: PointSource> {
    render:   RenderLoop<S>,
    drawing:  Raster,
    overlay:  Raster,
    backdrop: Color,
    status:   String,
    /// Frames left before tracking status replaces the current notice.
    notice:   u32,
}

impl<S: PointSource> AppState<S> {
    pub fn new(cfg: &AppConfig, source: S) -> Result<Self, AppError> {
        let (w, h) = cfg.canvas_size();
        let smoother = CurveSmoother::new()
            .with_interpolation_steps(cfg.stroke.interpolation_steps)
            .with_smoothing(cfg.stroke.smoothing);

        let render = RenderLoop::new(source)
            .with_tracker(StrokeTracker::with_threshold(cfg.stroke.movement_threshold))
            .with_smoother(smoother)
            .with_cursor(CursorRenderer::with_style(cfg.cursor_style()?))
            .with_stroke_style(cfg.stroke_style()?);

        Ok(AppState {
            render,
            drawing:  Raster::new(w, h),
            overlay:  Raster::new(w, h),
            backdrop: cfg.backdrop()?,
            status:   STATUS_READY.to_string(),
            notice:   0,
        })
    }

    pub fn handle_action(&mut self, action: UiAction) -> Schedule {
        match action {
            UiAction::ClearCanvas => {
                self.render.clear_canvas(Some(&mut self.drawing));
                self.notify("Canvas cleared");
                Schedule::Continue
            }
            UiAction::RecognizeDrawing => {
                info!("drawing recognition requested");
                self.notify("Recognition feature coming soon!");
                Schedule::Continue
            }
            UiAction::Quit => {
                info!("quit requested");
                self.render.teardown();
                Schedule::Stop
            }
        }
    }

    /// One frame of the pipeline.
    pub fn tick(&mut self, visible: bool) -> Frame {
        let frame = self
            .render
            .tick(visible, Surfaces::new(&mut self.drawing, &mut self.overlay));

        if let Frame::Rendered { tracking, .. } = frame {
            if self.notice > 0 {
                self.notice -= 1;
            } else {
                self.status = tracking_status(tracking);
            }
        }
        frame
    }

    pub fn shutdown(&mut self) {
        self.render.teardown();
    }

    fn notify(&mut self, message: &str) {
        debug!(message, "status notice");
        self.status = message.to_string();
        self.notice = NOTICE_FRAMES;
    }

    // ── Accessors for the render loop ─────────────────────────────────────

    pub fn status(&self)      -> &str             { &self.status }
    pub fn backdrop(&self)    -> Color            { self.backdrop }
    pub fn drawing(&self)     -> &Raster          { &self.drawing }
    pub fn overlay(&self)     -> &Raster          { &self.overlay }
    pub fn render_loop(&self) -> &RenderLoop<S>   { &self.render }

    /// Layers bottom first.
    pub fn layers(&self) -> [&Raster; 2] { [&self.drawing, &self.overlay] }
}

// ════════════════════════════════════════════════════════════════════════════
// run(): the main application loop
// ════════════════════════════════════════════════════════════════════════════

/// Build the configured point source. The pointer source is only used in
/// pointer mode.
pub fn open_source(
    cfg: &AppConfig,
    pointer: PointerSource,
) -> Result<Box<dyn PointSource>, AppError> {
    match cfg.source {
        SourceKind::Pointer => Ok(Box::new(pointer)),
        #[cfg(feature = "leap")]
        SourceKind::Leap => {
            let model = crate::leap::LeapPoseModel::connect()?;
            Ok(Box::new(fingertip_ink::FingertipSource::new(model, cfg.canvas_size())))
        }
        #[cfg(not(feature = "leap"))]
        SourceKind::Leap => Err(AppError::LeapUnavailable),
    }
}

/// Run the full application until the window closes or the user quits.
pub fn run(cfg: AppConfig) -> Result<(), AppError> {
    let (pointer_tx, pointer_source) = pointer_channel();
    let mut vp = Viewport::new(cfg.canvas_size(), cfg.target_fps, pointer_tx)?;

    let backdrop = cfg.backdrop()?;
    vp.present(backdrop, &[], STATUS_LOADING);

    let source = open_source(&cfg, pointer_source)?;
    let mut app = AppState::new(&cfg, source)?;
    info!(source = ?cfg.source, width = cfg.canvas.width, height = cfg.canvas.height, "ready");

    'frames: while vp.is_open() {
        for action in vp.poll_input() {
            if app.handle_action(action) == Schedule::Stop {
                break 'frames;
            }
        }

        let visible = !cfg.pause_when_unfocused || vp.is_visible();
        if app.tick(visible).schedule() == Schedule::Stop {
            break;
        }

        vp.present(app.backdrop(), &app.layers(), app.status());
    }

    app.shutdown();
    Ok(())
}

// ════════════════════════════════════════════════════════════════════════════
// Tests
// ════════════════════════════════════════════════════════════════════════════

#[cfg(test)]
mod tests {
    use super::*;
    use crate::pointer::PointerInput;
    use glam::vec2;
    use std::sync::mpsc::Sender;

    fn make_app() -> (Sender<PointerInput>, AppState<PointerSource>) {
        let (tx, src) = pointer_channel();
        let app = AppState::new(&AppConfig::default(), src).unwrap();
        (tx, app)
    }

    fn drag(tx: &Sender<PointerInput>, app: &mut AppState<PointerSource>, points: &[(f32, f32)]) {
        tx.send(PointerInput::Pressed).unwrap();
        for &(x, y) in points {
            tx.send(PointerInput::Moved { x, y }).unwrap();
            app.tick(true);
        }
    }

    #[test]
    fn starts_ready_with_blank_layers() {
        let (_tx, app) = make_app();
        assert_eq!(app.status(), STATUS_READY);
        assert_eq!(app.drawing().width(), 640);
        assert_eq!(app.overlay().height(), 480);
        assert!(app.drawing().is_blank());
        assert_eq!(app.backdrop(), Color::from_rgb_u32(0x101018));
    }

    #[test]
    fn dragging_draws_ink_and_cursor() {
        let (tx, mut app) = make_app();
        drag(&tx, &mut app, &[(100.0, 100.0)]);
        assert_eq!(app.status(), "Tracking (100, 100)");
        assert!(app.drawing().is_blank());
        assert!(!app.overlay().is_blank());

        drag(&tx, &mut app, &[(150.0, 100.0)]);
        assert!(!app.drawing().is_blank());
        assert!(app.drawing().pixel(150, 100).is_some_and(|c| c.a > 0.5));
    }

    #[test]
    fn release_clears_cursor_but_keeps_ink() {
        let (tx, mut app) = make_app();
        drag(&tx, &mut app, &[(100.0, 100.0), (150.0, 100.0)]);
        tx.send(PointerInput::Released).unwrap();
        app.tick(true);
        assert_eq!(app.status(), "No hand detected");
        assert!(app.overlay().is_blank());
        assert!(!app.drawing().is_blank());
    }

    #[test]
    fn clear_canvas_mid_stroke() {
        let (tx, mut app) = make_app();
        drag(&tx, &mut app, &[(100.0, 100.0), (150.0, 100.0)]);

        assert_eq!(app.handle_action(UiAction::ClearCanvas), Schedule::Continue);
        assert!(app.drawing().is_blank());
        assert_eq!(app.status(), "Canvas cleared");
        assert_eq!(app.render_loop().tracker().anchor(), Some(vec2(150.0, 100.0)));

        // The notice outlives a few frames of tracking.
        app.tick(true);
        assert_eq!(app.status(), "Canvas cleared");
    }

    #[test]
    fn notice_expires() {
        let (_tx, mut app) = make_app();
        app.handle_action(UiAction::RecognizeDrawing);
        assert_eq!(app.status(), "Recognition feature coming soon!");
        for _ in 0..NOTICE_FRAMES {
            app.tick(true);
        }
        assert_eq!(app.status(), "Recognition feature coming soon!");
        app.tick(true);
        assert_eq!(app.status(), "No hand detected");
    }

    #[test]
    fn hidden_frames_leave_status_alone() {
        let (tx, mut app) = make_app();
        tx.send(PointerInput::Pressed).unwrap();
        tx.send(PointerInput::Moved { x: 5.0, y: 5.0 }).unwrap();
        assert_eq!(app.tick(false), Frame::Hidden);
        assert_eq!(app.status(), STATUS_READY);
        assert!(app.overlay().is_blank());
    }

    #[test]
    fn quit_stops_the_loop() {
        let (_tx, mut app) = make_app();
        assert_eq!(app.handle_action(UiAction::Quit), Schedule::Stop);
        assert_eq!(app.tick(true), Frame::Cancelled);
        assert!(app.render_loop().is_released());
    }

    #[test]
    fn invalid_style_fails_startup() {
        let mut cfg = AppConfig::default();
        cfg.stroke.color = "nope".to_string();
        let (_tx, src) = pointer_channel();
        assert!(matches!(AppState::new(&cfg, src), Err(AppError::Style(_))));
    }

    #[test]
    fn status_formatting() {
        assert_eq!(tracking_status(Tracking::Detected(vec2(12.4, 7.6))), "Tracking (12, 8)");
        assert_eq!(tracking_status(Tracking::NotDetected), "No hand detected");
    }

    #[cfg(not(feature = "leap"))]
    #[test]
    fn leap_source_needs_the_feature() {
        let cfg = AppConfig { source: SourceKind::Leap, ..AppConfig::default() };
        let (_tx, src) = pointer_channel();
        assert!(matches!(open_source(&cfg, src), Err(AppError::LeapUnavailable)));
    }
}
