//! Extract training and test series from a Caffe training log.
//!
//! Recognised line shapes (anywhere in a line, log prefixes are ignored):
//! - `Iteration <n>, loss = <float>`
//! - `Iteration <n>, Testing net (#<k>)`
//! - `Train net output #<k>: <name> = <float>`
//! - `Test net output #<k>: <name> = <float>`
//!
//! Each pattern is matched independently over the whole text. Sequence order
//! is the order of appearance in the file; lines are never joined.

use log::debug;
use regex::Regex;
use std::fmt;
use std::sync::LazyLock;

use super::types::{MetricMap, ParsedLog, Phase, TestRecord, TrainRecord};

/// Floating point literal as printed by the trainer.
const FLOAT: &str = r"[-+]?(?:\d+(?:\.\d*)?|\.\d+)(?:[eE][-+]?\d+)?";

static TRAIN_ITERATION: LazyLock<Regex> = LazyLock::new(|| compile(r"Iteration (\d+), loss = "));
static TRAIN_LOSS: LazyLock<Regex> = LazyLock::new(|| compile(&format!(r"Iteration \d+, loss = ({FLOAT})")));
static TRAIN_OUTPUT: LazyLock<Regex> = LazyLock::new(|| compile(&format!(r"Train net output #\d+: (.+?) = ({FLOAT})")));
static TEST_ITERATION: LazyLock<Regex> = LazyLock::new(|| compile(r"Iteration (\d+), Testing net"));
static TEST_OUTPUT: LazyLock<Regex> = LazyLock::new(|| compile(&format!(r"Test net output #\d+: (.+?) = ({FLOAT})")));

fn compile(pattern: &str) -> Regex {
    Regex::new(pattern).unwrap_or_else(|e| panic!("invalid log pattern {pattern:?}: {e}"))
}

/// Error type for logs whose series cannot be lined up.
#[derive(Debug, Clone, PartialEq)]
pub enum ParseError {
    /// The number of `Iteration <n>, loss = ` markers differs from the number
    /// of loss values that could be read after them.
    IterationLossMismatch { iterations: usize, losses: usize },
    /// A metric series does not have one value per iteration.
    SeriesLengthMismatch {
        phase: Phase,
        metric: String,
        iterations: usize,
        values: usize,
    },
    /// A matched number does not fit the target type.
    InvalidNumber(String),
}

impl fmt::Display for ParseError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ParseError::IterationLossMismatch { iterations, losses } => {
                write!(f, "found {} training iterations but {} loss values", iterations, losses)
            }
            ParseError::SeriesLengthMismatch {
                phase,
                metric,
                iterations,
                values,
            } => write!(
                f,
                "{} output '{}' has {} values for {} iterations",
                phase, metric, values, iterations
            ),
            ParseError::InvalidNumber(text) => write!(f, "invalid number in log: {}", text),
        }
    }
}

impl std::error::Error for ParseError {}

/// Parse the training pass of a log.
///
/// # Parameters
///
/// * `text` - Full log contents
///
/// # Returns
///
/// A `TrainRecord` whose iterations, losses and outputs all have the same
/// length, or a `ParseError` if the series cannot be lined up.
///
/// When a metric has exactly one value fewer than there are iterations, the
/// trainer is assumed to have reported a final loss after training ended
/// without an output block; the last iteration and loss are dropped.
pub fn parse_train(text: &str) -> Result<TrainRecord, ParseError> {
    let mut iterations = capture_iterations(&TRAIN_ITERATION, text)?;
    let mut losses = capture_floats(&TRAIN_LOSS, text)?;
    let outputs = capture_metrics(&TRAIN_OUTPUT, text)?;

    if iterations.len() != losses.len() {
        return Err(ParseError::IterationLossMismatch {
            iterations: iterations.len(),
            losses: losses.len(),
        });
    }

    for series in outputs.iter() {
        if iterations.len() == series.values.len() + 1 {
            debug!(
                "Dropping trailing iteration {:?} without train output '{}'",
                iterations.last(),
                series.name
            );
            iterations.pop();
            losses.pop();
        }
        if iterations.len() != series.values.len() {
            return Err(ParseError::SeriesLengthMismatch {
                phase: Phase::Train,
                metric: series.name.clone(),
                iterations: iterations.len(),
                values: series.values.len(),
            });
        }
    }

    Ok(TrainRecord {
        iterations,
        losses,
        outputs,
    })
}

/// Parse the testing pass of a log.
///
/// Every test output must have exactly one value per `Testing net` marker.
pub fn parse_test(text: &str) -> Result<TestRecord, ParseError> {
    let iterations = capture_iterations(&TEST_ITERATION, text)?;
    let outputs = capture_metrics(&TEST_OUTPUT, text)?;

    if let Some(series) = outputs.iter().find(|s| s.values.len() != iterations.len()) {
        return Err(ParseError::SeriesLengthMismatch {
            phase: Phase::Test,
            metric: series.name.clone(),
            iterations: iterations.len(),
            values: series.values.len(),
        });
    }

    Ok(TestRecord { iterations, outputs })
}

/// Parse both passes of a log.
pub fn parse_log(text: &str) -> Result<ParsedLog, ParseError> {
    let train = parse_train(text)?;
    let test = parse_test(text)?;

    debug!(
        "Parsed {} train iterations ({} outputs) and {} test iterations ({} outputs)",
        train.len(),
        train.outputs.len(),
        test.len(),
        test.outputs.len()
    );

    Ok(ParsedLog { train, test })
}

/// Collect the first capture group of every match as an iteration number.
fn capture_iterations(pattern: &Regex, text: &str) -> Result<Vec<u64>, ParseError> {
    pattern
        .captures_iter(text)
        .map(|caps| {
            let digits = &caps[1];
            digits.parse().map_err(|_| ParseError::InvalidNumber(digits.to_string()))
        })
        .collect()
}

/// Collect the first capture group of every match as a float.
fn capture_floats(pattern: &Regex, text: &str) -> Result<Vec<f64>, ParseError> {
    pattern.captures_iter(text).map(|caps| parse_float(&caps[1])).collect()
}

/// Group `(name, value)` captures by name, keeping file order.
fn capture_metrics(pattern: &Regex, text: &str) -> Result<MetricMap, ParseError> {
    let mut outputs = MetricMap::new();
    for caps in pattern.captures_iter(text) {
        let value = parse_float(&caps[2])?;
        outputs.push(&caps[1], value);
    }
    Ok(outputs)
}

fn parse_float(text: &str) -> Result<f64, ParseError> {
    text.parse().map_err(|_| ParseError::InvalidNumber(text.to_string()))
}
