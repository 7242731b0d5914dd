//! Projection of the requested metric names onto resolved series.
//!
//! Recomputed on every render pass, never persisted. A name with no resolved
//! series yields a placeholder track so the view can render a loading slot
//! without reflowing layout.

use crate::domain::{MetricSample, MetricSeries};
use ratatui::style::Color;

/// Color-provider category for timeline metrics.
pub const OVERVIEW_METRIC: &str = "overview-metric";

#[derive(Clone, Debug, PartialEq)]
pub struct TimelineTrack<'a> {
    pub name: &'a str,
    pub series: Option<&'a MetricSeries>,
    pub color: Color,
    /// Sample whose timestamp exactly equals the hover timestamp. No
    /// nearest-neighbor fallback.
    pub hover_sample: Option<MetricSample>,
}

impl TimelineTrack<'_> {
    pub fn is_resolved(&self) -> bool {
        self.series.is_some()
    }
}

pub fn build_tracks<'a>(
    requested: &'a [String],
    metrics: Option<&'a [MetricSeries]>,
    hover_ns: Option<i64>,
    mut get_color: impl FnMut(&str) -> Color,
) -> Vec<TimelineTrack<'a>> {
    requested
        .iter()
        .map(|name| {
            let series =
                metrics.and_then(|metrics| metrics.iter().find(|series| series.name == *name));
            let hover_sample = match (series, hover_ns) {
                (Some(series), Some(t_ns)) => series.sample_at(t_ns),
                _ => None,
            };

            TimelineTrack {
                name,
                series,
                color: get_color(name),
                hover_sample,
            }
        })
        .collect()
}

/// Elapsed nanoseconds between the hover position and the capture start, or 0
/// when either is unknown.
pub fn hover_relative_ns(hover_ns: Option<i64>, capture_from_ns: Option<i64>) -> i64 {
    match (hover_ns, capture_from_ns) {
        (Some(hover), Some(from)) => hover - from,
        _ => 0,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::MetricSample;

    fn series(name: &str, samples: &[(i64, f64)]) -> MetricSeries {
        MetricSeries {
            name: name.to_string(),
            time_series: samples
                .iter()
                .map(|&(t_ns, value)| MetricSample { t_ns, value })
                .collect(),
        }
    }

    #[test]
    fn unresolved_names_become_placeholders_in_order() {
        let requested = vec!["cpu".to_string(), "mem".to_string()];
        let metrics = vec![series("cpu", &[(10, 1.0), (20, 2.0)])];

        let tracks = build_tracks(&requested, Some(&metrics), None, |_| Color::Cyan);

        assert_eq!(tracks.len(), 2);
        assert_eq!(tracks[0].name, "cpu");
        assert!(tracks[0].is_resolved());
        assert_eq!(tracks[1].name, "mem");
        assert!(!tracks[1].is_resolved());
        assert_eq!(tracks[1].hover_sample, None);
    }

    #[test]
    fn no_resolved_metrics_yields_all_placeholders() {
        let requested = vec!["cpu".to_string(), "mem".to_string()];
        let tracks = build_tracks(&requested, None, Some(10), |_| Color::Cyan);
        assert!(tracks.iter().all(|track| !track.is_resolved()));
    }

    #[test]
    fn empty_request_yields_empty_track_list() {
        let metrics = vec![series("cpu", &[(10, 1.0)])];
        let tracks = build_tracks(&[], Some(&metrics), Some(10), |_| Color::Cyan);
        assert!(tracks.is_empty());
    }

    #[test]
    fn hover_sample_requires_exact_timestamp_match() {
        let requested = vec!["cpu".to_string()];
        let metrics = vec![series("cpu", &[(10, 1.0), (20, 2.0)])];

        let tracks = build_tracks(&requested, Some(&metrics), Some(20), |_| Color::Cyan);
        assert_eq!(
            tracks[0].hover_sample,
            Some(MetricSample { t_ns: 20, value: 2.0 })
        );

        let tracks = build_tracks(&requested, Some(&metrics), Some(15), |_| Color::Cyan);
        assert_eq!(tracks[0].hover_sample, None);
    }

    #[test]
    fn colors_are_assigned_per_name_including_placeholders() {
        let requested = vec!["cpu".to_string(), "mem".to_string()];
        let mut seen = Vec::new();
        build_tracks(&requested, None, None, |name| {
            seen.push(name.to_string());
            Color::Magenta
        });
        assert_eq!(seen, ["cpu", "mem"]);
    }

    #[test]
    fn hover_relative_is_zero_without_both_inputs() {
        assert_eq!(hover_relative_ns(None, Some(100)), 0);
        assert_eq!(hover_relative_ns(Some(100), None), 0);
        assert_eq!(hover_relative_ns(None, None), 0);
        assert_eq!(hover_relative_ns(Some(250), Some(100)), 150);
    }
}
