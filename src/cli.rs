//! Command line arguments.
//!
//! The log viewer has always accepted `-train` and `-test` with a single
//! dash. clap only knows single-character short flags, so those two spellings
//! are rewritten to their long forms before parsing.

use clap::Parser;
use std::ffi::OsString;
use std::path::PathBuf;

/// Show a Caffe training log.
///
/// By default the averaged training loss, test loss and test accuracy are
/// displayed. Other train net outputs and test net outputs are also displayed
/// if their names are given.
#[derive(Parser, Debug)]
#[command(name = "train-log-plotter", version, about)]
pub struct Cli {
    /// Caffe training log
    pub log: PathBuf,

    /// Save the figure as an image (format from the extension)
    #[arg(short, long, value_name = "PATH")]
    pub output: Option<PathBuf>,

    /// Names of train net outputs to be shown (also `-train`)
    #[arg(long = "train-output", value_name = "NAME", num_args = 0..)]
    pub train_output: Vec<String>,

    /// Names of test net outputs to be shown (also `-test`)
    #[arg(long = "test-output", value_name = "NAME", num_args = 0..)]
    pub test_output: Vec<String>,

    /// TOML file overriding the chart style
    #[arg(long, value_name = "PATH")]
    pub style: Option<PathBuf>,

    /// Log debug details of parsing and rendering
    #[arg(short, long)]
    pub verbose: bool,
}

impl Cli {
    /// Parse the process arguments, accepting the single-dash spellings.
    pub fn parse_args() -> Self {
        Self::parse_from(normalize_args(std::env::args_os()))
    }
}

/// Rewrite `-train` / `-test` to `--train-output` / `--test-output`.
///
/// Arguments after a literal `--` are left alone.
pub fn normalize_args<I>(args: I) -> Vec<OsString>
where
    I: IntoIterator<Item = OsString>,
{
    let mut passthrough = false;
    args.into_iter()
        .map(|arg| {
            if passthrough {
                return arg;
            }
            match arg.to_str() {
                Some("--") => {
                    passthrough = true;
                    arg
                }
                Some("-train") => OsString::from("--train-output"),
                Some("-test") => OsString::from("--test-output"),
                _ => arg,
            }
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse(args: &[&str]) -> Result<Cli, clap::Error> {
        Cli::try_parse_from(normalize_args(args.iter().map(OsString::from)))
    }

    #[test]
    fn test_log_only() {
        let cli = parse(&["plotter", "train.log"]).unwrap();

        assert_eq!(cli.log, PathBuf::from("train.log"));
        assert!(cli.output.is_none());
        assert!(cli.train_output.is_empty());
        assert!(cli.test_output.is_empty());
        assert!(cli.style.is_none());
        assert!(!cli.verbose);
    }

    #[test]
    fn test_single_dash_output_lists() {
        let cli = parse(&["plotter", "train.log", "-o", "out.png", "-train", "loss", "top-5", "-test", "top-5"]).unwrap();

        assert_eq!(cli.output, Some(PathBuf::from("out.png")));
        assert_eq!(cli.train_output, vec!["loss", "top-5"]);
        assert_eq!(cli.test_output, vec!["top-5"]);
    }

    #[test]
    fn test_long_flags() {
        let cli = parse(&[
            "plotter",
            "--output",
            "out.jpg",
            "--train-output",
            "loss",
            "--test-output",
            "accuracy",
            "--style",
            "style.toml",
            "-v",
            "train.log",
        ])
        .unwrap();

        assert_eq!(cli.log, PathBuf::from("train.log"));
        assert_eq!(cli.output, Some(PathBuf::from("out.jpg")));
        assert_eq!(cli.train_output, vec!["loss"]);
        assert_eq!(cli.test_output, vec!["accuracy"]);
        assert_eq!(cli.style, Some(PathBuf::from("style.toml")));
        assert!(cli.verbose);
    }

    #[test]
    fn test_empty_output_list() {
        let cli = parse(&["plotter", "train.log", "-train"]).unwrap();
        assert!(cli.train_output.is_empty());
    }

    #[test]
    fn test_missing_log_is_an_error() {
        assert!(parse(&["plotter", "-o", "out.png"]).is_err());
    }

    #[test]
    fn test_normalize_stops_at_double_dash() {
        let args = normalize_args(["plotter", "-train", "--", "-test"].into_iter().map(OsString::from));
        assert_eq!(args, vec!["plotter", "--train-output", "--", "-test"]);
    }
}
