//! Axis ranges and tick placement.

/// Closed value range shown along one axis.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct AxisRange {
    pub min: f64,
    pub max: f64,
}

impl AxisRange {
    /// Smallest range containing every finite value.
    ///
    /// An empty input gives `0..1`; a single distinct value is widened so the
    /// range never has zero span.
    pub fn from_values(values: impl IntoIterator<Item = f64>) -> Self {
        let (min, max) = values
            .into_iter()
            .filter(|v| v.is_finite())
            .fold((f64::INFINITY, f64::NEG_INFINITY), |(lo, hi), v| (lo.min(v), hi.max(v)));

        if min > max {
            return Self { min: 0.0, max: 1.0 };
        }
        if min == max {
            let pad = if min == 0.0 { 0.5 } else { min.abs() * 0.05 };
            return Self {
                min: min - pad,
                max: max + pad,
            };
        }
        Self { min, max }
    }

    /// Grow the range by `fraction` of its span on both ends.
    pub fn with_margin(self, fraction: f64) -> Self {
        let pad = self.span() * fraction;
        Self {
            min: self.min - pad,
            max: self.max + pad,
        }
    }

    pub fn span(&self) -> f64 {
        self.max - self.min
    }

    /// Position of `value` inside the range, 0 at `min` and 1 at `max`.
    pub fn normalize(&self, value: f64) -> f64 {
        (value - self.min) / self.span()
    }

    /// Tick values inside the range on a 1/2/5 grid, at most about
    /// `max_ticks` of them. A range whose span is not finite has no ticks.
    pub fn ticks(&self, max_ticks: usize) -> Vec<f64> {
        if !self.span().is_finite() || self.span() <= 0.0 {
            return Vec::new();
        }
        let step = nice_step(self.span(), max_ticks);
        let first = (self.min / step).ceil() as i64;
        let last = (self.max / step + 1e-9).floor() as i64;

        (first..=last).map(|i| i as f64 * step).collect()
    }
}

/// Step between ticks: 1, 2 or 5 times a power of ten, chosen so that
/// `span / step` does not exceed `max_ticks`.
pub fn nice_step(span: f64, max_ticks: usize) -> f64 {
    let raw = span / max_ticks.max(1) as f64;
    if !raw.is_finite() || raw <= 0.0 {
        return 1.0;
    }

    let magnitude = 10f64.powf(raw.log10().floor());
    let normalized = raw / magnitude;
    let factor = if normalized <= 1.0 {
        1.0
    } else if normalized <= 2.0 {
        2.0
    } else if normalized <= 5.0 {
        5.0
    } else {
        10.0
    };
    factor * magnitude
}

/// Format a tick value with just enough decimals for `step`.
pub fn format_tick(value: f64, step: f64) -> String {
    let decimals = if step >= 1.0 { 0 } else { (-step.log10().floor()) as usize };
    let text = format!("{:.*}", decimals, value);
    // "-0", "-0.0" and friends
    if text.starts_with('-') && text[1..].chars().all(|c| c == '0' || c == '.') {
        text[1..].to_string()
    } else {
        text
    }
}
