use crate::domain::{CaptureSummary, MetricSample, MetricSeries};
use serde_json::from_reader;
use std::fs::File;
use std::io::BufReader;
use std::path::PathBuf;
use std::sync::mpsc::Sender;
use std::thread;
use thiserror::Error;

/// Identity of one summary fetch. A resolution is applied only while the
/// engine's current key still equals the key it was issued under.
#[derive(Clone, Debug, Eq, PartialEq, Hash)]
pub struct FetchKey {
    pub capture_path: PathBuf,
    pub sample_count: u32,
    pub filter: Option<String>,
}

#[derive(Debug)]
pub enum SummarySignal {
    Loaded {
        key: FetchKey,
        result: Result<CaptureSummary, String>,
    },
}

#[derive(Debug, Error)]
pub enum LoadSummaryError {
    #[error("failed to read capture summary: {0}")]
    Read(#[from] std::io::Error),

    #[error("failed to parse capture summary: {0}")]
    Parse(#[from] serde_json::Error),

    #[error("capture summary time window is empty")]
    EmptyWindow,
}

pub fn spawn_summary_fetch(
    key: FetchKey,
    bucket_size_hint_ns: Option<i64>,
    tx: Sender<SummarySignal>,
) {
    thread::spawn(move || {
        let result =
            load_capture_summary(&key, bucket_size_hint_ns).map_err(|error| error.to_string());
        let _ = tx.send(SummarySignal::Loaded { key, result });
    });
}

/// Reads a full-resolution capture summary and resamples every series to the
/// requested sample count.
///
/// The filter is part of the fetch identity but is not applied here: a real
/// backend filters events server-side before summarizing, and this local
/// transport only serves pre-digested summaries.
pub fn load_capture_summary(
    key: &FetchKey,
    bucket_size_hint_ns: Option<i64>,
) -> Result<CaptureSummary, LoadSummaryError> {
    let file = File::open(&key.capture_path)?;
    let raw: CaptureSummary = from_reader(BufReader::new(file))?;

    if raw.info.duration_ns() <= 0 {
        return Err(LoadSummaryError::EmptyWindow);
    }

    Ok(resample_summary(raw, key.sample_count, bucket_size_hint_ns))
}

/// Buckets every series into `sample_count` equal spans over the capture
/// window. Each output sample sits at its bucket start and carries the mean
/// of the raw values falling into the bucket, or 0 for an empty bucket.
pub fn resample_summary(
    raw: CaptureSummary,
    sample_count: u32,
    bucket_size_hint_ns: Option<i64>,
) -> CaptureSummary {
    if sample_count == 0 {
        return raw;
    }

    let info = raw.info;
    let bucket_ns = bucket_size_hint_ns
        .filter(|&hint| hint > 0)
        .unwrap_or_else(|| (info.duration_ns() / sample_count as i64).max(1));

    let metrics = raw
        .metrics
        .into_iter()
        .map(|series| resample_series(series, info.from_ns, bucket_ns, sample_count))
        .collect();

    CaptureSummary { info, metrics }
}

fn resample_series(
    series: MetricSeries,
    from_ns: i64,
    bucket_ns: i64,
    sample_count: u32,
) -> MetricSeries {
    let buckets = sample_count as usize;
    let mut sums = vec![0.0f64; buckets];
    let mut counts = vec![0usize; buckets];

    for sample in &series.time_series {
        let offset = sample.t_ns - from_ns;
        if offset < 0 {
            continue;
        }
        let index = ((offset / bucket_ns) as usize).min(buckets - 1);
        sums[index] += sample.value;
        counts[index] += 1;
    }

    let time_series = (0..buckets)
        .map(|index| {
            let value = if counts[index] > 0 {
                sums[index] / counts[index] as f64
            } else {
                0.0
            };
            MetricSample {
                t_ns: from_ns + bucket_ns * index as i64,
                value,
            }
        })
        .collect();

    MetricSeries {
        name: series.name,
        time_series,
    }
}
