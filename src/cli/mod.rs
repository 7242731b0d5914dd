use crate::domain::{SAMPLE_COUNT_LADDER, sample_count_for_width};
use crate::infra::{FetchKey, LoadSummaryError, load_capture_summary};
use std::io::{self, Write};
use std::path::PathBuf;
use thiserror::Error;

const DEFAULT_METRICS_WIDTH: f64 = 420.0;

#[derive(Clone, Debug, PartialEq)]
pub enum CliInvocation {
    PrintHelp,
    PrintVersion,
    Tui { path: Option<PathBuf> },
    Command(CliCommand),
}

#[derive(Clone, Debug, PartialEq)]
pub enum CliCommand {
    Info {
        capture: PathBuf,
    },
    Metrics {
        capture: PathBuf,
        width: f64,
        filter: Option<String>,
    },
}

#[derive(Debug, Error)]
pub enum CliParseError {
    #[error("unknown flag: {0}")]
    UnknownFlag(String),

    #[error("missing value for flag: {0}")]
    MissingFlagValue(String),

    #[error("invalid value for {flag}: {value}")]
    InvalidFlagValue { flag: String, value: String },

    #[error("missing capture path for subcommand: {0}")]
    MissingCapturePath(String),

    #[error("unexpected argument: {0}")]
    UnexpectedArgument(String),
}

pub fn parse_invocation(args: &[String]) -> Result<CliInvocation, CliParseError> {
    if args.iter().any(|arg| arg == "--help" || arg == "-h") {
        return Ok(CliInvocation::PrintHelp);
    }
    if args.iter().any(|arg| arg == "--version" || arg == "-V") {
        return Ok(CliInvocation::PrintVersion);
    }

    let mut iter = args.iter().skip(1).peekable();
    let Some(first) = iter.next() else {
        return Ok(CliInvocation::Tui { path: None });
    };

    match first.as_str() {
        "info" => {
            let capture = iter
                .next()
                .ok_or_else(|| CliParseError::MissingCapturePath("info".to_string()))?;
            if let Some(extra) = iter.next() {
                return Err(CliParseError::UnexpectedArgument(extra.clone()));
            }
            Ok(CliInvocation::Command(CliCommand::Info {
                capture: PathBuf::from(capture),
            }))
        }
        "metrics" => {
            let mut capture: Option<PathBuf> = None;
            let mut width = DEFAULT_METRICS_WIDTH;
            let mut filter: Option<String> = None;

            while let Some(arg) = iter.next() {
                match arg.as_str() {
                    "--width" | "-w" => {
                        let value = iter
                            .next()
                            .ok_or_else(|| CliParseError::MissingFlagValue("--width".to_string()))?;
                        width = value.parse::<f64>().map_err(|_| {
                            CliParseError::InvalidFlagValue {
                                flag: "--width".to_string(),
                                value: value.clone(),
                            }
                        })?;
                    }
                    "--filter" | "-f" => {
                        let value = iter.next().ok_or_else(|| {
                            CliParseError::MissingFlagValue("--filter".to_string())
                        })?;
                        filter = Some(value.clone());
                    }
                    flag if flag.starts_with('-') => {
                        return Err(CliParseError::UnknownFlag(flag.to_string()));
                    }
                    _ => {
                        if capture.is_some() {
                            return Err(CliParseError::UnexpectedArgument(arg.clone()));
                        }
                        capture = Some(PathBuf::from(arg));
                    }
                }
            }

            let capture =
                capture.ok_or_else(|| CliParseError::MissingCapturePath("metrics".to_string()))?;
            Ok(CliInvocation::Command(CliCommand::Metrics {
                capture,
                width,
                filter,
            }))
        }
        flag if flag.starts_with('-') => Err(CliParseError::UnknownFlag(flag.to_string())),
        path => {
            if let Some(extra) = iter.next() {
                return Err(CliParseError::UnexpectedArgument(extra.clone()));
            }
            Ok(CliInvocation::Tui {
                path: Some(PathBuf::from(path)),
            })
        }
    }
}

#[derive(Debug, Error)]
pub enum CliRunError {
    #[error(transparent)]
    LoadSummary(#[from] LoadSummaryError),

    #[error("output error: {0}")]
    Output(#[from] io::Error),
}

pub fn run(command: CliCommand) -> Result<(), CliRunError> {
    match command {
        CliCommand::Info { capture } => run_info(capture),
        CliCommand::Metrics {
            capture,
            width,
            filter,
        } => run_metrics(capture, width, filter),
    }
}

fn run_info(capture: PathBuf) -> Result<(), CliRunError> {
    let key = FetchKey {
        capture_path: capture,
        sample_count: SAMPLE_COUNT_LADDER[0],
        filter: None,
    };
    let summary = load_capture_summary(&key, None)?;

    let mut out = io::stdout().lock();
    writeln!(out, "from\t{}", summary.info.from_ns)?;
    writeln!(out, "to\t{}", summary.info.to_ns)?;
    writeln!(
        out,
        "duration_s\t{:.3}",
        summary.info.duration_ns() as f64 / 1e9
    )?;
    writeln!(out, "metrics\t{}", summary.metrics.len())?;
    for series in &summary.metrics {
        writeln!(out, "metric\t{}", series.name)?;
    }
    Ok(())
}

fn run_metrics(capture: PathBuf, width: f64, filter: Option<String>) -> Result<(), CliRunError> {
    let sample_count = sample_count_for_width(width);
    let key = FetchKey {
        capture_path: capture,
        sample_count: sample_count.max(SAMPLE_COUNT_LADDER[0]),
        filter,
    };
    let summary = load_capture_summary(&key, None)?;

    let mut out = io::stdout().lock();
    writeln!(out, "name\tsamples\tmin\tmean\tmax")?;
    for series in &summary.metrics {
        let values = series
            .time_series
            .iter()
            .map(|sample| sample.value)
            .collect::<Vec<_>>();
        let min = values.iter().copied().fold(f64::INFINITY, f64::min);
        let max = values.iter().copied().fold(f64::NEG_INFINITY, f64::max);
        let mean = if values.is_empty() {
            0.0
        } else {
            values.iter().sum::<f64>() / values.len() as f64
        };
        writeln!(
            out,
            "{}\t{}\t{:.3}\t{:.3}\t{:.3}",
            series.name,
            values.len(),
            if min.is_finite() { min } else { 0.0 },
            mean,
            if max.is_finite() { max } else { 0.0 },
        )?;
    }
    Ok(())
}
