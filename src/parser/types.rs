//! Type definitions for parsed training logs.

use std::fmt;

/// Which pass of the trainer a series belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Phase {
    /// Series reported by the training net.
    Train,
    /// Series reported by the testing net.
    Test,
}

impl fmt::Display for Phase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Phase::Train => write!(f, "train"),
            Phase::Test => write!(f, "test"),
        }
    }
}

/// One named metric and its values in file order.
#[derive(Debug, Clone, PartialEq)]
pub struct MetricSeries {
    pub name: String,
    pub values: Vec<f64>,
}

/// Ordered mapping from metric name to its values.
///
/// Names keep the order in which they first appeared in the log, so the
/// trim check and anything that lists metrics is deterministic.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct MetricMap {
    series: Vec<MetricSeries>,
}

impl MetricMap {
    pub fn new() -> Self {
        Self::default()
    }

    /// Return the values for `name`, inserting an empty series first if the
    /// name has not been seen yet.
    pub fn entry_or_insert(&mut self, name: &str) -> &mut Vec<f64> {
        let index = match self.series.iter().position(|s| s.name == name) {
            Some(index) => index,
            None => {
                self.series.push(MetricSeries {
                    name: name.to_string(),
                    values: Vec::new(),
                });
                self.series.len() - 1
            }
        };
        &mut self.series[index].values
    }

    /// Append one value to the series called `name`.
    pub fn push(&mut self, name: &str, value: f64) {
        self.entry_or_insert(name).push(value);
    }

    pub fn get(&self, name: &str) -> Option<&[f64]> {
        self.series.iter().find(|s| s.name == name).map(|s| s.values.as_slice())
    }

    pub fn contains(&self, name: &str) -> bool {
        self.get(name).is_some()
    }

    /// Iterate over the series in first-appearance order.
    pub fn iter(&self) -> impl Iterator<Item = &MetricSeries> {
        self.series.iter()
    }

    /// Metric names in first-appearance order.
    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.series.iter().map(|s| s.name.as_str())
    }

    pub fn len(&self) -> usize {
        self.series.len()
    }

    pub fn is_empty(&self) -> bool {
        self.series.is_empty()
    }
}

/// Everything extracted from the training pass of a log.
///
/// After parsing, `iterations`, `losses` and every output series have the
/// same length.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct TrainRecord {
    pub iterations: Vec<u64>,
    pub losses: Vec<f64>,
    pub outputs: MetricMap,
}

impl TrainRecord {
    pub fn len(&self) -> usize {
        self.iterations.len()
    }

    pub fn is_empty(&self) -> bool {
        self.iterations.is_empty()
    }
}

/// Everything extracted from the testing pass of a log.
///
/// Every output series has exactly one value per entry in `iterations`.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct TestRecord {
    pub iterations: Vec<u64>,
    pub outputs: MetricMap,
}

impl TestRecord {
    pub fn len(&self) -> usize {
        self.iterations.len()
    }

    pub fn is_empty(&self) -> bool {
        self.iterations.is_empty()
    }
}

/// Both records of a single log file.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ParsedLog {
    pub train: TrainRecord,
    pub test: TestRecord,
}
