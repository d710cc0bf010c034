//! Figure layout: decides which panels are shown and which series they hold.
//!
//! Panels are stacked top to bottom in a fixed order:
//! 1. Loss (always): test loss if the log has one, then train loss
//! 2. Accuracy: only when the test pass reports an `accuracy` output
//! 3. Output: only when the caller asked for train or test outputs
//!
//! Colors come from the palette in plotting order, restarting in every panel.

use egui::Color32;
use std::fmt;
use std::path::Path;

use super::axis::AxisRange;
use super::palette::series_color;
use crate::parser::{MetricMap, ParsedLog};

/// Test output plotted in its own panel when present.
const ACCURACY: &str = "accuracy";
/// Test output plotted next to the training loss when present.
const LOSS: &str = "loss";
const X_LABEL: &str = "Iterations";

/// Error type for outputs requested on the command line but absent from the log.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LookupError {
    MissingTrainOutput(String),
    MissingTestOutput(String),
}

impl fmt::Display for LookupError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            LookupError::MissingTrainOutput(name) => write!(f, "train net output '{}' not found in log", name),
            LookupError::MissingTestOutput(name) => write!(f, "test net output '{}' not found in log", name),
        }
    }
}

impl std::error::Error for LookupError {}

/// Corner of a panel that holds its legend.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LegendCorner {
    UpperRight,
    LowerRight,
}

/// One line in a panel.
#[derive(Debug, Clone, PartialEq)]
pub struct Series {
    pub label: String,
    pub color: Color32,
    /// `[iteration, value]` pairs in file order.
    pub points: Vec<[f64; 2]>,
}

/// One subplot of the figure.
#[derive(Debug, Clone, PartialEq)]
pub struct Panel {
    pub x_label: &'static str,
    pub y_label: &'static str,
    pub legend: LegendCorner,
    pub series: Vec<Series>,
}

impl Panel {
    fn new(y_label: &'static str, legend: LegendCorner) -> Self {
        Self {
            x_label: X_LABEL,
            y_label,
            legend,
            series: Vec::new(),
        }
    }

    /// Append a series using the next palette color.
    fn plot(&mut self, label: String, iterations: &[u64], values: &[f64]) {
        let points = iterations.iter().zip(values).map(|(&x, &y)| [x as f64, y]).collect();
        self.series.push(Series {
            label,
            color: series_color(self.series.len()),
            points,
        });
    }

    /// Range of iterations covered by any series.
    pub fn x_range(&self) -> AxisRange {
        AxisRange::from_values(self.series.iter().flat_map(|s| s.points.iter().map(|p| p[0])))
    }

    /// Range of values covered by any series, with a little headroom.
    pub fn y_range(&self) -> AxisRange {
        AxisRange::from_values(self.series.iter().flat_map(|s| s.points.iter().map(|p| p[1]))).with_margin(0.05)
    }
}

/// Title plus the panels to draw, top to bottom.
#[derive(Debug, Clone, PartialEq)]
pub struct Figure {
    pub title: String,
    pub panels: Vec<Panel>,
}

/// Number of stacked panels for a log and a set of requested outputs.
pub fn row_count(test_outputs: &MetricMap, train_requested: &[String], test_requested: &[String]) -> usize {
    let mut rows = 1;
    if test_outputs.contains(ACCURACY) {
        rows += 1;
    }
    if !train_requested.is_empty() || !test_requested.is_empty() {
        rows += 1;
    }
    rows
}

/// Lay out the figure for a parsed log.
///
/// # Parameters
///
/// * `title` - Figure title, usually from [`figure_title`]
/// * `log` - Parsed train and test records
/// * `train_requested` - Train outputs to plot in the output panel, in order
/// * `test_requested` - Test outputs to plot in the output panel, in order
///
/// # Returns
///
/// The figure, or a `LookupError` naming the first requested output that the
/// log does not contain.
pub fn build_figure(title: String, log: &ParsedLog, train_requested: &[String], test_requested: &[String]) -> Result<Figure, LookupError> {
    let train = &log.train;
    let test = &log.test;
    let mut panels = Vec::with_capacity(row_count(&test.outputs, train_requested, test_requested));

    // Test loss goes first so it gets the first color and legend slot.
    let mut loss = Panel::new("Loss", LegendCorner::UpperRight);
    if let Some(values) = test.outputs.get(LOSS) {
        loss.plot("test loss".to_string(), &test.iterations, values);
    }
    loss.plot("train loss".to_string(), &train.iterations, &train.losses);
    panels.push(loss);

    if let Some(values) = test.outputs.get(ACCURACY) {
        let mut accuracy = Panel::new("Accuracy", LegendCorner::LowerRight);
        accuracy.plot("test accuracy".to_string(), &test.iterations, values);
        panels.push(accuracy);
    }

    if !train_requested.is_empty() || !test_requested.is_empty() {
        let mut output = Panel::new("Output", LegendCorner::LowerRight);
        for name in train_requested {
            let values = train.outputs.get(name).ok_or_else(|| LookupError::MissingTrainOutput(name.clone()))?;
            output.plot(format!("train {}", name), &train.iterations, values);
        }
        for name in test_requested {
            let values = test.outputs.get(name).ok_or_else(|| LookupError::MissingTestOutput(name.clone()))?;
            output.plot(format!("test {}", name), &test.iterations, values);
        }
        panels.push(output);
    }

    Ok(Figure { title, panels })
}

/// Title derived from a log path: the file stem with underscores turned into
/// spaces and every word capitalized (`lenet_solver.log` -> "Lenet Solver").
pub fn figure_title(path: &Path) -> String {
    let stem = path.file_stem().map(|s| s.to_string_lossy()).unwrap_or_default();
    title_case(&stem.replace('_', " "))
}

/// Uppercase the first letter of every run of letters, lowercase the rest.
fn title_case(text: &str) -> String {
    let mut result = String::with_capacity(text.len());
    let mut previous_is_letter = false;
    for c in text.chars() {
        if c.is_alphabetic() {
            if previous_is_letter {
                result.extend(c.to_lowercase());
            } else {
                result.extend(c.to_uppercase());
            }
            previous_is_letter = true;
        } else {
            result.push(c);
            previous_is_letter = false;
        }
    }
    result
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::chart::palette::PALETTE;
    use crate::parser::types::{TestRecord, TrainRecord};

    fn names(list: &[&str]) -> Vec<String> {
        list.iter().map(|s| s.to_string()).collect()
    }

    fn sample_log(with_test_loss: bool, with_accuracy: bool) -> ParsedLog {
        let mut train_outputs = MetricMap::new();
        for v in [0.9, 0.5, 0.3] {
            train_outputs.push("loss", v);
            train_outputs.push("top-5", 1.0 - v);
        }
        let mut test_outputs = MetricMap::new();
        for v in [0.8, 0.2] {
            if with_accuracy {
                test_outputs.push(ACCURACY, 1.0 - v);
            }
            if with_test_loss {
                test_outputs.push(LOSS, v);
            }
            test_outputs.push("top-5", 1.0 - v / 2.0);
        }

        ParsedLog {
            train: TrainRecord {
                iterations: vec![0, 100, 200],
                losses: vec![0.9, 0.5, 0.3],
                outputs: train_outputs,
            },
            test: TestRecord {
                iterations: vec![0, 200],
                outputs: test_outputs,
            },
        }
    }

    fn labels(panel: &Panel) -> Vec<&str> {
        panel.series.iter().map(|s| s.label.as_str()).collect()
    }

    #[test]
    fn test_row_count() {
        let log = sample_log(true, true);
        assert_eq!(row_count(&log.test.outputs, &[], &[]), 2);
        assert_eq!(row_count(&log.test.outputs, &names(&["loss"]), &[]), 3);
        assert_eq!(row_count(&log.test.outputs, &[], &names(&["top-5"])), 3);

        let log = sample_log(true, false);
        assert_eq!(row_count(&log.test.outputs, &[], &[]), 1);
    }

    #[test]
    fn test_loss_panel_only() {
        let log = sample_log(false, false);
        let figure = build_figure("Run".to_string(), &log, &[], &[]).unwrap();

        assert_eq!(figure.panels.len(), 1);
        let loss = &figure.panels[0];
        assert_eq!(loss.y_label, "Loss");
        assert_eq!(loss.x_label, "Iterations");
        assert_eq!(loss.legend, LegendCorner::UpperRight);
        assert_eq!(labels(loss), vec!["train loss"]);
        assert_eq!(loss.series[0].color, PALETTE[0]);
        assert_eq!(loss.series[0].points, vec![[0.0, 0.9], [100.0, 0.5], [200.0, 0.3]]);
    }

    #[test]
    fn test_test_loss_claims_first_color() {
        let log = sample_log(true, false);
        let figure = build_figure("Run".to_string(), &log, &[], &[]).unwrap();

        let loss = &figure.panels[0];
        assert_eq!(labels(loss), vec!["test loss", "train loss"]);
        assert_eq!(loss.series[0].color, PALETTE[0]);
        assert_eq!(loss.series[1].color, PALETTE[1]);
        assert_eq!(loss.series[0].points, vec![[0.0, 0.8], [200.0, 0.2]]);
    }

    #[test]
    fn test_accuracy_panel() {
        let log = sample_log(true, true);
        let figure = build_figure("Run".to_string(), &log, &[], &[]).unwrap();

        assert_eq!(figure.panels.len(), 2);
        let accuracy = &figure.panels[1];
        assert_eq!(accuracy.y_label, "Accuracy");
        assert_eq!(accuracy.legend, LegendCorner::LowerRight);
        assert_eq!(labels(accuracy), vec!["test accuracy"]);
        assert_eq!(accuracy.series[0].color, PALETTE[0]);
    }

    #[test]
    fn test_output_panel_order_and_colors() {
        let log = sample_log(true, true);
        let figure = build_figure("Run".to_string(), &log, &names(&["top-5", "loss"]), &names(&["top-5"])).unwrap();

        assert_eq!(figure.panels.len(), 3);
        let output = &figure.panels[2];
        assert_eq!(output.y_label, "Output");
        assert_eq!(labels(output), vec!["train top-5", "train loss", "test top-5"]);
        let colors: Vec<Color32> = output.series.iter().map(|s| s.color).collect();
        assert_eq!(colors, PALETTE[..3].to_vec());
        assert_eq!(output.series[2].points.len(), 2);
    }

    #[test]
    fn test_output_panel_without_accuracy_is_second() {
        let log = sample_log(false, false);
        let figure = build_figure("Run".to_string(), &log, &[], &names(&["top-5"])).unwrap();

        assert_eq!(figure.panels.len(), 2);
        assert_eq!(figure.panels[1].y_label, "Output");
    }

    #[test]
    fn test_missing_train_output() {
        let log = sample_log(true, true);
        let err = build_figure("Run".to_string(), &log, &names(&["top-1"]), &[]).unwrap_err();

        assert_eq!(err, LookupError::MissingTrainOutput("top-1".to_string()));
        assert_eq!(err.to_string(), "train net output 'top-1' not found in log");
    }

    #[test]
    fn test_missing_test_output() {
        let log = sample_log(false, false);
        let err = build_figure("Run".to_string(), &log, &[], &names(&["accuracy"])).unwrap_err();

        assert_eq!(err, LookupError::MissingTestOutput("accuracy".to_string()));
    }

    #[test]
    fn test_panel_ranges() {
        let log = sample_log(true, false);
        let figure = build_figure("Run".to_string(), &log, &[], &[]).unwrap();

        let loss = &figure.panels[0];
        assert_eq!(loss.x_range(), AxisRange { min: 0.0, max: 200.0 });
        let y = loss.y_range();
        assert!(y.min < 0.2 && y.max > 0.9);
    }

    #[test]
    fn test_figure_title() {
        assert_eq!(figure_title(Path::new("logs/lenet_train_log.txt")), "Lenet Train Log");
        assert_eq!(figure_title(Path::new("VGG16_run-2b.log")), "Vgg16 Run-2B");
        assert_eq!(figure_title(Path::new("plain")), "Plain");
    }
}
