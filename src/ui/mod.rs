// UI module for the training log plotter
//
// - `app_state`: window state, eframe integration and image export flow
// - `figure_view`: draws the figure with the egui painter
// - `export`: writes a captured frame to an image file

pub mod app_state;
pub mod export;
pub mod figure_view;

use anyhow::Result;
use eframe::egui;
use std::path::PathBuf;

pub use app_state::{AppState, SharedExportReport};

use crate::chart::{ChartStyle, Figure};

/// Open the chart window and block until the user closes it.
///
/// # Parameters
///
/// * `figure` - Figure to show
/// * `style` - Rendering configuration, also sizes the window
/// * `output` - Optional image path; the figure is saved once it is drawn
///
/// # Returns
///
/// `Err` if the window cannot be created, the image cannot be written, or
/// the window was closed before the image was saved.
pub fn show(figure: Figure, style: ChartStyle, output: Option<PathBuf>) -> Result<()> {
    let title = figure.title.clone();
    let native_options = eframe::NativeOptions {
        viewport: egui::ViewportBuilder::default().with_inner_size(style.figure_size()).with_title(title.clone()),
        ..Default::default()
    };

    let export = SharedExportReport::default();
    let app_export = export.clone();
    let app_output = output.clone();
    eframe::run_native(
        &title,
        native_options,
        Box::new(move |cc| Ok(Box::new(AppState::new(cc, figure, style, app_output, app_export)))),
    )
    .map_err(|e| anyhow::anyhow!("Failed to open chart window: {}", e))?;

    let report = export.take();
    report.into_result(output.as_deref())
}
