//! # Figure Rendering
//!
//! Draws a [`Figure`] into the central panel of the window:
//! - The figure title across the top
//! - One row per panel, stacked with equal heights
//! - Per panel: frame, grid, tick labels, axis labels, series lines and legend
//!
//! ## Coordinate Mapping
//!
//! Values are mapped into the plot rectangle of their panel with `egui::lerp`.
//! The x axis grows to the right, the y axis grows upwards, so the y range is
//! interpolated from the bottom edge to the top edge.

use eframe::egui;
use egui::{Align2, Color32, FontId, Pos2, Rect, Stroke};

use crate::chart::{AxisRange, ChartStyle, Figure, LegendCorner, Panel, format_tick, nice_step};

const BACKGROUND: Color32 = Color32::WHITE;
const TEXT_COLOR: Color32 = Color32::BLACK;
const FRAME_COLOR: Color32 = Color32::from_rgb(60, 60, 60);
const GRID_COLOR: Color32 = Color32::from_rgb(225, 225, 225);
const LEGEND_BORDER: Color32 = Color32::from_rgb(160, 160, 160);

/// Vertical space between two panels, in multiples of the font size.
const ROW_GAP: f32 = 0.5;

/// Render the whole figure into the central panel.
///
/// # Parameters
///
/// * `ctx` - egui context for rendering
/// * `figure` - Panels and series to draw
/// * `style` - Font sizes and line width
pub fn render(ctx: &egui::Context, figure: &Figure, style: &ChartStyle) {
    egui::CentralPanel::default()
        .frame(egui::Frame::new().fill(BACKGROUND).inner_margin(16.0))
        .show(ctx, |ui| {
            let rect = ui.available_rect_before_wrap();
            let painter = ui.painter_at(rect);

            let title_height = style.title_font_size * 2.0;
            painter.text(
                egui::pos2(rect.center().x, rect.top() + title_height / 2.0),
                Align2::CENTER_CENTER,
                &figure.title,
                FontId::proportional(style.title_font_size),
                TEXT_COLOR,
            );

            let body = Rect::from_min_max(egui::pos2(rect.left(), rect.top() + title_height), rect.max);
            let rows = split_rows(body, figure.panels.len(), style.font_size * ROW_GAP);
            for (panel, row) in figure.panels.iter().zip(rows) {
                draw_panel(&painter, row, panel, style);
            }
        });
}

/// Split `rect` into `count` rows of equal height separated by `gap`.
pub fn split_rows(rect: Rect, count: usize, gap: f32) -> Vec<Rect> {
    if count == 0 {
        return Vec::new();
    }
    let total_gap = gap * (count - 1) as f32;
    let row_height = ((rect.height() - total_gap) / count as f32).max(0.0);

    (0..count)
        .map(|i| {
            let top = rect.top() + i as f32 * (row_height + gap);
            Rect::from_min_size(egui::pos2(rect.left(), top), egui::vec2(rect.width(), row_height))
        })
        .collect()
}

/// Area inside a row left for the data once axis labels have their room.
fn plot_area(row: Rect, style: &ChartStyle) -> Rect {
    let font = style.font_size;
    Rect::from_min_max(
        egui::pos2(row.left() + font * 4.5, row.top() + font * 0.5),
        egui::pos2(row.right() - font, row.bottom() - font * 3.0),
    )
}

/// Map a data point into screen space.
fn to_screen(plot: Rect, x: &AxisRange, y: &AxisRange, point: [f64; 2]) -> Pos2 {
    let tx = x.normalize(point[0]) as f32;
    let ty = y.normalize(point[1]) as f32;
    egui::pos2(egui::lerp(plot.left()..=plot.right(), tx), egui::lerp(plot.bottom()..=plot.top(), ty))
}

/// Draw one panel: frame, grid, ticks, labels, series and legend.
fn draw_panel(painter: &egui::Painter, row: Rect, panel: &Panel, style: &ChartStyle) {
    let plot = plot_area(row, style);
    if plot.width() <= 0.0 || plot.height() <= 0.0 {
        log::debug!("Skipping panel '{}', no room left to draw it", panel.y_label);
        return;
    }

    let x_range = panel.x_range();
    let y_range = panel.y_range();

    draw_grid(painter, plot, &x_range, &y_range, style);
    draw_axis_labels(painter, row, plot, panel, style);

    let plot_painter = painter.with_clip_rect(plot);
    for series in &panel.series {
        let stroke = Stroke::new(style.line_width, series.color);
        // Non-finite values break the line instead of dragging it off screen.
        for run in series.points.split(|p| !p[0].is_finite() || !p[1].is_finite()) {
            let points: Vec<Pos2> = run.iter().map(|p| to_screen(plot, &x_range, &y_range, *p)).collect();
            if points.len() > 1 {
                plot_painter.add(egui::Shape::line(points, stroke));
            }
        }
    }

    painter.rect_stroke(plot, 0.0, Stroke::new(1.0, FRAME_COLOR), egui::StrokeKind::Outside);
    draw_legend(painter, plot, panel, style);
}

/// Draw grid lines and tick labels for both axes.
fn draw_grid(painter: &egui::Painter, plot: Rect, x_range: &AxisRange, y_range: &AxisRange, style: &ChartStyle) {
    let grid_stroke = Stroke::new(1.0, GRID_COLOR);
    let tick_font = FontId::proportional(style.font_size * 0.8);

    let max_x_ticks = ((plot.width() / (style.font_size * 6.0)) as usize).max(2);
    let x_step = nice_step(x_range.span(), max_x_ticks);
    for x in x_range.ticks(max_x_ticks) {
        let screen_x = egui::lerp(plot.left()..=plot.right(), x_range.normalize(x) as f32);
        painter.line_segment([egui::pos2(screen_x, plot.top()), egui::pos2(screen_x, plot.bottom())], grid_stroke);
        painter.text(
            egui::pos2(screen_x, plot.bottom() + 4.0),
            Align2::CENTER_TOP,
            format_tick(x, x_step),
            tick_font.clone(),
            TEXT_COLOR,
        );
    }

    let max_y_ticks = ((plot.height() / (style.font_size * 2.5)) as usize).max(2);
    let y_step = nice_step(y_range.span(), max_y_ticks);
    for y in y_range.ticks(max_y_ticks) {
        let screen_y = egui::lerp(plot.bottom()..=plot.top(), y_range.normalize(y) as f32);
        painter.line_segment([egui::pos2(plot.left(), screen_y), egui::pos2(plot.right(), screen_y)], grid_stroke);
        painter.text(
            egui::pos2(plot.left() - 6.0, screen_y),
            Align2::RIGHT_CENTER,
            format_tick(y, y_step),
            tick_font.clone(),
            TEXT_COLOR,
        );
    }
}

/// Draw the x label under the plot and the y label rotated along its left edge.
fn draw_axis_labels(painter: &egui::Painter, row: Rect, plot: Rect, panel: &Panel, style: &ChartStyle) {
    let font = FontId::proportional(style.font_size);

    painter.text(
        egui::pos2(plot.center().x, row.bottom()),
        Align2::CENTER_BOTTOM,
        panel.x_label,
        font.clone(),
        TEXT_COLOR,
    );

    // Rotated text turns around its anchor, so start at the bottom of where
    // the label should end up.
    let galley = painter.layout_no_wrap(panel.y_label.to_string(), font, TEXT_COLOR);
    let anchor = egui::pos2(row.left(), plot.center().y + galley.size().x / 2.0);
    painter.add(egui::epaint::TextShape::new(anchor, galley, TEXT_COLOR).with_angle(-std::f32::consts::FRAC_PI_2));
}

/// Draw the legend box in the panel's legend corner.
fn draw_legend(painter: &egui::Painter, plot: Rect, panel: &Panel, style: &ChartStyle) {
    if panel.series.is_empty() {
        return;
    }

    let font = FontId::monospace(style.legend_font_size);
    let galleys: Vec<_> = panel
        .series
        .iter()
        .map(|s| painter.layout_no_wrap(s.label.clone(), font.clone(), TEXT_COLOR))
        .collect();

    let padding = style.legend_font_size * 0.3;
    let sample_width = style.legend_font_size * 2.0;
    let row_height = galleys.iter().map(|g| g.size().y).fold(0.0, f32::max);
    let text_width = galleys.iter().map(|g| g.size().x).fold(0.0, f32::max);
    let size = egui::vec2(
        padding * 3.0 + sample_width + text_width,
        padding * 2.0 + row_height * galleys.len() as f32,
    );

    let inset = padding * 2.0;
    let min = match panel.legend {
        LegendCorner::UpperRight => egui::pos2(plot.right() - inset - size.x, plot.top() + inset),
        LegendCorner::LowerRight => egui::pos2(plot.right() - inset - size.x, plot.bottom() - inset - size.y),
    };
    let legend_rect = Rect::from_min_size(min, size);

    painter.rect_filled(legend_rect, 0.0, BACKGROUND);
    painter.rect_stroke(legend_rect, 0.0, Stroke::new(1.0, LEGEND_BORDER), egui::StrokeKind::Inside);

    for (i, (series, galley)) in panel.series.iter().zip(galleys).enumerate() {
        let top = legend_rect.top() + padding + i as f32 * row_height;
        let center_y = top + row_height / 2.0;
        let sample_left = legend_rect.left() + padding;
        painter.line_segment(
            [egui::pos2(sample_left, center_y), egui::pos2(sample_left + sample_width, center_y)],
            Stroke::new(style.line_width, series.color),
        );
        painter.galley(egui::pos2(sample_left + sample_width + padding, top), galley, TEXT_COLOR);
    }
}
