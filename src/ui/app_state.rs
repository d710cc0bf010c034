//! # Application State
//!
//! `AppState` owns the figure for the lifetime of the window and implements
//! `eframe::App`. Every frame the figure is redrawn from scratch (immediate
//! mode); the only state that changes between frames is the progress of the
//! optional image export.
//!
//! ## Image Export
//!
//! When an output path is set, a screenshot is requested once the figure has
//! been drawn at least once, so fonts and layout are settled. The screenshot
//! arrives as an input event in a later frame and is written to disk. A failed
//! write closes the window. Either way the outcome is kept in an
//! [`ExportReport`] shared with `show`, which turns an export that never
//! finished into an error once the window is gone.

use anyhow::anyhow;
use eframe::egui;
use std::cell::RefCell;
use std::path::{Path, PathBuf};
use std::rc::Rc;

use super::{export, figure_view};
use crate::chart::{ChartStyle, Figure};

/// Progress of the image export.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum ExportState {
    /// No output path was given.
    #[default]
    Disabled,
    /// Waiting for `frames_drawn` to reach the first complete frame.
    Pending { frames_drawn: u32 },
    /// Screenshot requested, waiting for the event.
    Requested,
    /// Image written (or the write failed).
    Finished,
}

/// Outcome of the image export, read by `show` after the window closes.
#[derive(Debug, Default)]
pub struct ExportReport {
    pub state: ExportState,
    pub error: Option<anyhow::Error>,
}

/// Export report shared between the window and its caller.
pub type SharedExportReport = Rc<RefCell<ExportReport>>;

impl ExportReport {
    /// Final result of the export for a run that asked for `output`.
    ///
    /// A save error wins; otherwise an export still waiting for its
    /// screenshot means the image was never written.
    pub fn into_result(self, output: Option<&Path>) -> anyhow::Result<()> {
        if let Some(e) = self.error {
            return Err(e);
        }
        match (self.state, output) {
            (ExportState::Pending { .. } | ExportState::Requested, Some(path)) => {
                Err(anyhow!("Window closed before the figure was saved to {}", path.display()))
            }
            _ => Ok(()),
        }
    }
}

/// Frames drawn before the screenshot is requested.
const FRAMES_BEFORE_SCREENSHOT: u32 = 1;

/// Window state for one figure.
pub struct AppState {
    /// Figure to draw; never changes after startup.
    pub figure: Figure,
    /// Rendering configuration; never changes after startup.
    pub style: ChartStyle,
    /// Where to save the figure, if anywhere.
    pub output: Option<PathBuf>,
    /// Export progress and error, shared with the caller.
    pub export: SharedExportReport,
}

impl AppState {
    pub fn new(cc: &eframe::CreationContext<'_>, figure: Figure, style: ChartStyle, output: Option<PathBuf>, export: SharedExportReport) -> Self {
        cc.egui_ctx.set_visuals(egui::Visuals::light());
        Self::with_report(figure, style, output, export)
    }

    /// Build the state without a window, resetting `export` to match `output`.
    pub fn with_report(figure: Figure, style: ChartStyle, output: Option<PathBuf>, export: SharedExportReport) -> Self {
        export.borrow_mut().state = if output.is_some() {
            ExportState::Pending { frames_drawn: 0 }
        } else {
            ExportState::Disabled
        };

        Self {
            figure,
            style,
            output,
            export,
        }
    }

    pub fn export_state(&self) -> ExportState {
        self.export.borrow().state
    }

    fn set_export_state(&self, state: ExportState) {
        self.export.borrow_mut().state = state;
    }

    /// Draw one frame and move the export along.
    pub fn draw_frame(&mut self, ctx: &egui::Context) {
        self.handle_screenshot_events(ctx);
        figure_view::render(ctx, &self.figure, &self.style);
        self.advance_export(ctx);
    }

    /// Write any screenshot that arrived since the last frame.
    fn handle_screenshot_events(&mut self, ctx: &egui::Context) {
        if self.export_state() != ExportState::Requested {
            return;
        }

        let screenshot = ctx.input(|i| {
            i.raw.events.iter().find_map(|event| match event {
                egui::Event::Screenshot { image, .. } => Some(image.clone()),
                _ => None,
            })
        });
        let Some(screenshot) = screenshot else {
            return;
        };
        let Some(path) = self.output.as_ref() else {
            return;
        };

        self.set_export_state(ExportState::Finished);
        match export::save_color_image(path, &screenshot) {
            Ok(()) => {
                let expected = export::expected_pixels(self.style.figure_size());
                if screenshot.size != expected {
                    log::warn!(
                        "Saved figure is {}x{} pixels, configured size is {}x{} (window scaled or clamped to the screen)",
                        screenshot.size[0],
                        screenshot.size[1],
                        expected[0],
                        expected[1]
                    );
                }
            }
            Err(e) => {
                log::error!("{:#}", e);
                self.export.borrow_mut().error = Some(e);
                ctx.send_viewport_cmd(egui::ViewportCommand::Close);
            }
        }
    }

    /// Advance the export after a frame has been drawn.
    fn advance_export(&mut self, ctx: &egui::Context) {
        match self.export_state() {
            ExportState::Pending { frames_drawn } if frames_drawn >= FRAMES_BEFORE_SCREENSHOT => {
                log::debug!("Requesting screenshot for export");
                ctx.send_viewport_cmd(egui::ViewportCommand::Screenshot(egui::UserData::default()));
                self.set_export_state(ExportState::Requested);
                ctx.request_repaint();
            }
            ExportState::Pending { frames_drawn } => {
                self.set_export_state(ExportState::Pending {
                    frames_drawn: frames_drawn + 1,
                });
                ctx.request_repaint();
            }
            ExportState::Requested => ctx.request_repaint(),
            ExportState::Disabled | ExportState::Finished => {}
        }
    }
}

impl eframe::App for AppState {
    fn update(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
        self.draw_frame(ctx);
    }
}
