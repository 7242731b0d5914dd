use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use std::time::SystemTime;

/// Inclusive time span, nanoseconds since the Unix epoch.
#[derive(Clone, Copy, Debug, Eq, PartialEq, Serialize, Deserialize)]
pub struct TimeWindow {
    #[serde(rename = "from")]
    pub from_ns: i64,
    #[serde(rename = "to")]
    pub to_ns: i64,
}

impl TimeWindow {
    pub fn new(from_ns: i64, to_ns: i64) -> Self {
        Self { from_ns, to_ns }
    }

    pub fn duration_ns(&self) -> i64 {
        self.to_ns - self.from_ns
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct MetricSample {
    #[serde(rename = "t")]
    pub t_ns: i64,
    #[serde(rename = "v")]
    pub value: f64,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct MetricSeries {
    pub name: String,
    #[serde(rename = "timeSeries")]
    pub time_series: Vec<MetricSample>,
}

impl MetricSeries {
    pub fn sample_at(&self, t_ns: i64) -> Option<MetricSample> {
        self.time_series
            .iter()
            .copied()
            .find(|sample| sample.t_ns == t_ns)
    }
}

/// Payload of one summary fetch: capture bounds plus the per-metric series
/// resampled to the requested sample count.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct CaptureSummary {
    pub info: TimeWindow,
    pub metrics: Vec<MetricSeries>,
}

impl CaptureSummary {
    pub fn series_by_name(&self, name: &str) -> Option<&MetricSeries> {
        self.metrics.iter().find(|series| series.name == name)
    }
}

#[derive(Clone, Debug, Eq, PartialEq)]
pub struct CaptureFileEntry {
    pub path: PathBuf,
    pub name: String,
    pub file_size_bytes: u64,
    pub file_modified: Option<SystemTime>,
}

/// An analytical view of the capture a drill-down can land on.
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct ViewDescriptor {
    pub view_id: &'static str,
    pub label: &'static str,
}

pub const CAPTURE_VIEWS: [ViewDescriptor; 5] = [
    ViewDescriptor {
        view_id: "overview",
        label: "Overview",
    },
    ViewDescriptor {
        view_id: "processes",
        label: "Processes",
    },
    ViewDescriptor {
        view_id: "files",
        label: "Files",
    },
    ViewDescriptor {
        view_id: "connections",
        label: "Connections",
    },
    ViewDescriptor {
        view_id: "spans",
        label: "Spans",
    },
];

/// Interaction events emitted after a navigation transition commits. They
/// never gate or reorder the transition itself.
#[derive(Clone, Debug, Eq, PartialEq)]
pub enum TrackingEvent {
    Select { target: Option<String> },
    DrillDown { target: Option<String> },
    ApplyFilter { is_set: bool },
    ResetTimelineSelection,
}

impl TrackingEvent {
    pub fn name(&self) -> &'static str {
        match self {
            Self::Select { .. } => "select view",
            Self::DrillDown { .. } => "drill down",
            Self::ApplyFilter { .. } => "apply filter",
            Self::ResetTimelineSelection => "reset timeline selection",
        }
    }
}
