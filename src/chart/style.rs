//! Rendering configuration for the chart window.
//!
//! The style is built once at startup and handed to the renderer by
//! reference. Defaults reproduce the classic look of the Caffe log viewer;
//! any field can be overridden from a TOML file:
//!
//! ```toml
//! line-width = 2.0
//! figure-width = 8.0
//! figure-height = 6.0
//! ```

use serde::Deserialize;
use std::fmt;
use std::path::Path;

/// Error type for style file loading failures.
#[derive(Debug)]
pub enum StyleLoadError {
    FileReadError(String),
    ParseError(String),
    ValidationError(String),
}

impl fmt::Display for StyleLoadError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            StyleLoadError::FileReadError(msg) => write!(f, "Failed to read style file: {}", msg),
            StyleLoadError::ParseError(msg) => write!(f, "Failed to parse style file: {}", msg),
            StyleLoadError::ValidationError(msg) => write!(f, "Invalid style: {}", msg),
        }
    }
}

impl std::error::Error for StyleLoadError {}

/// Immutable chart style shared by every panel of a figure.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default, rename_all = "kebab-case", deny_unknown_fields)]
pub struct ChartStyle {
    /// Stroke width of every series, in points.
    pub line_width: f32,
    /// Size of tick and axis labels.
    pub font_size: f32,
    /// Size of the figure title.
    pub title_font_size: f32,
    /// Size of legend entries (monospace).
    pub legend_font_size: f32,
    /// Figure width in inches.
    pub figure_width: f32,
    /// Figure height in inches.
    pub figure_height: f32,
    /// Points per inch used to size the window.
    pub dpi: f32,
}

impl Default for ChartStyle {
    fn default() -> Self {
        Self {
            line_width: 1.5,
            font_size: 16.0,
            title_font_size: 24.0,
            legend_font_size: 13.0,
            figure_width: 12.0,
            figure_height: 10.0,
            dpi: 120.0,
        }
    }
}

impl ChartStyle {
    /// Load a style from a TOML file. Missing keys keep their defaults.
    ///
    /// # Arguments
    /// * `path` - Path to the style file
    ///
    /// # Returns
    /// * `Ok(ChartStyle)` if the file was read, parsed and validated
    /// * `Err(StyleLoadError)` describing the first problem otherwise
    pub fn load(path: &Path) -> Result<Self, StyleLoadError> {
        let content = std::fs::read_to_string(path).map_err(|e| StyleLoadError::FileReadError(format!("{}: {}", path.display(), e)))?;
        let style = Self::from_toml(&content)?;
        log::debug!("Loaded chart style from {}: {:?}", path.display(), style);
        Ok(style)
    }

    /// Parse and validate a style from TOML text.
    pub fn from_toml(content: &str) -> Result<Self, StyleLoadError> {
        let style: ChartStyle = toml::from_str(content).map_err(|e| StyleLoadError::ParseError(e.to_string()))?;
        style.validate()?;
        Ok(style)
    }

    /// Reject sizes the renderer cannot lay out.
    fn validate(&self) -> Result<(), StyleLoadError> {
        let fields = [
            ("line-width", self.line_width),
            ("font-size", self.font_size),
            ("title-font-size", self.title_font_size),
            ("legend-font-size", self.legend_font_size),
            ("figure-width", self.figure_width),
            ("figure-height", self.figure_height),
            ("dpi", self.dpi),
        ];
        for (name, value) in fields {
            if !value.is_finite() || value <= 0.0 {
                return Err(StyleLoadError::ValidationError(format!("{} must be positive, got {}", name, value)));
            }
        }
        Ok(())
    }

    /// Window size in points: figure inches times `dpi`.
    pub fn figure_size(&self) -> [f32; 2] {
        [self.figure_width * self.dpi, self.figure_height * self.dpi]
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn test_default_figure_size() {
        let style = ChartStyle::default();
        assert_eq!(style.figure_size(), [1440.0, 1200.0]);
    }

    #[test]
    fn test_partial_toml_keeps_defaults() {
        let style = ChartStyle::from_toml("line-width = 2.5\nfigure-height = 5.0\n").unwrap();

        assert_eq!(style.line_width, 2.5);
        assert_eq!(style.figure_height, 5.0);
        assert_eq!(style.font_size, ChartStyle::default().font_size);
        assert_eq!(style.dpi, 120.0);
    }

    #[test]
    fn test_empty_toml_is_default() {
        assert_eq!(ChartStyle::from_toml("").unwrap(), ChartStyle::default());
    }

    #[test]
    fn test_unknown_key_is_rejected() {
        let err = ChartStyle::from_toml("line-colour = 3\n").unwrap_err();
        assert!(matches!(err, StyleLoadError::ParseError(_)));
    }

    #[test]
    fn test_non_positive_size_is_rejected() {
        let err = ChartStyle::from_toml("dpi = 0.0\n").unwrap_err();
        assert!(matches!(err, StyleLoadError::ValidationError(_)));
        assert_eq!(err.to_string(), "Invalid style: dpi must be positive, got 0");
    }

    #[test]
    fn test_load_from_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "font-size = 12.0").unwrap();

        let style = ChartStyle::load(file.path()).unwrap();
        assert_eq!(style.font_size, 12.0);
    }

    #[test]
    fn test_load_missing_file() {
        let dir = tempfile::tempdir().unwrap();
        let err = ChartStyle::load(&dir.path().join("style.toml")).unwrap_err();
        assert!(matches!(err, StyleLoadError::FileReadError(_)));
    }
}
