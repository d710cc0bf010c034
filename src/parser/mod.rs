//! Parser module for Caffe training logs.
//!
//! - `log_loader`: reads a log file into memory
//! - `log_parser`: extracts train and test series with regular expressions
//! - `types`: records and the ordered metric map they are built from

pub mod log_loader;
pub mod log_parser;
pub mod types;

pub use log_loader::read_log;
pub use log_parser::parse_log;
pub use types::{MetricMap, ParsedLog};
