//! Timeline sampling and layout engine.
//!
//! Derives everything needed to render the timeline tracks from five
//! independent inputs: measured width, capture identity, active filter,
//! requested metric names, and hover position. Data arrives asynchronously;
//! every resolution carries the key it was issued under and is discarded when
//! that key no longer matches the engine's current derivation key.

use crate::domain::{
    self, CaptureSummary, MetricTimelines, TimeWindow, TimelineTrack, build_tracks,
    hover_relative_ns, sample_count_for_width,
};
use crate::infra::FetchKey;
use ratatui::style::Color;
use std::path::PathBuf;

#[derive(Clone, Copy, Debug, Eq, PartialEq)]
enum Lifecycle {
    Mounted,
    TornDown,
}

#[derive(Debug)]
pub struct TimelineEngine {
    capture_path: PathBuf,
    filter: Option<String>,
    requested: MetricTimelines,
    time_window: Option<TimeWindow>,

    content_width_px: f64,
    can_render: bool,

    hover_ns: Option<i64>,
    is_mouse_over: bool,

    lifecycle: Lifecycle,
    resolved: Option<(FetchKey, CaptureSummary)>,
    in_flight: Option<FetchKey>,
    failed: Option<FetchKey>,
}

impl TimelineEngine {
    pub fn new(capture_path: PathBuf) -> Self {
        Self {
            capture_path,
            filter: None,
            requested: MetricTimelines::new(),
            time_window: None,
            content_width_px: 0.0,
            can_render: false,
            hover_ns: None,
            is_mouse_over: false,
            lifecycle: Lifecycle::Mounted,
            resolved: None,
            in_flight: None,
            failed: None,
        }
    }

    pub fn is_mounted(&self) -> bool {
        self.lifecycle == Lifecycle::Mounted
    }

    /// After teardown every externally triggered entry point becomes a
    /// silent no-op.
    pub fn tear_down(&mut self) {
        self.lifecycle = Lifecycle::TornDown;
    }

    /// Layout-settled notification: the measured footprint minus the edge
    /// handles becomes the content width feeding sample-count derivation.
    pub fn set_measured_width(&mut self, measured_width_px: f64) {
        if !self.is_mounted() {
            return;
        }

        self.content_width_px = domain::content_width(measured_width_px);
        self.can_render = true;
    }

    /// Attribute update from the navigation layer.
    pub fn set_params(
        &mut self,
        requested: MetricTimelines,
        time_window: Option<TimeWindow>,
        filter: Option<String>,
    ) {
        if !self.is_mounted() {
            return;
        }

        self.requested = requested;
        self.time_window = time_window;
        self.filter = filter;
    }

    /// Drops resolved data so the next `wanted_fetch` re-issues the current
    /// key. Used when the capture file changes on disk.
    pub fn invalidate(&mut self) {
        if !self.is_mounted() {
            return;
        }

        self.resolved = None;
        self.in_flight = None;
        self.failed = None;
    }

    pub fn mouse_enter(&mut self) {
        if !self.is_mounted() {
            return;
        }
        self.is_mouse_over = true;
    }

    pub fn mouse_leave(&mut self) {
        if !self.is_mounted() {
            return;
        }
        self.is_mouse_over = false;
        self.hover_ns = None;
    }

    /// Position-to-time mapping is done by the caller; the engine only holds
    /// the resulting timestamp.
    pub fn set_hover_timestamp(&mut self, hover_ns: Option<i64>) {
        if !self.is_mounted() {
            return;
        }
        self.hover_ns = hover_ns;
    }

    pub fn is_mouse_over(&self) -> bool {
        self.is_mouse_over
    }

    pub fn hover_timestamp(&self) -> Option<i64> {
        self.hover_ns
    }

    pub fn can_render(&self) -> bool {
        self.can_render
    }

    pub fn capture_path(&self) -> &PathBuf {
        &self.capture_path
    }

    pub fn filter(&self) -> Option<&str> {
        self.filter.as_deref()
    }

    pub fn requested(&self) -> &MetricTimelines {
        &self.requested
    }

    pub fn sample_count(&self) -> u32 {
        sample_count_for_width(self.content_width_px)
    }

    /// Current derivation key; `None` while the width is not positive, which
    /// suppresses any fetch.
    pub fn current_key(&self) -> Option<FetchKey> {
        let sample_count = self.sample_count();
        if sample_count == 0 {
            return None;
        }

        Some(FetchKey {
            capture_path: self.capture_path.clone(),
            sample_count,
            filter: self.filter.clone(),
        })
    }

    /// Key to issue next, if any. Memoized: nothing is issued while the
    /// current key is already resolved, already in flight, or already failed,
    /// so at most one outstanding request is authoritative per key and a
    /// persistent failure is never retried internally.
    pub fn wanted_fetch(&mut self) -> Option<FetchKey> {
        if !self.is_mounted() {
            return None;
        }

        let key = self.current_key()?;
        if self.resolved.as_ref().is_some_and(|(resolved_key, _)| *resolved_key == key) {
            return None;
        }
        if self.in_flight.as_ref() == Some(&key) {
            return None;
        }
        match &self.failed {
            // A failed key stays in placeholder state until invalidated.
            Some(failed) if *failed == key => return None,
            // A key change re-arms the old key.
            Some(_) => self.failed = None,
            None => {}
        }

        self.in_flight = Some(key.clone());
        Some(key)
    }

    /// Applies a fetch resolution. A result whose key no longer matches the
    /// current derivation key is discarded; a failure leaves data absent and
    /// pins the key so it is not re-issued until `invalidate` or a key
    /// change.
    pub fn apply_summary(&mut self, key: FetchKey, result: Result<CaptureSummary, String>) {
        if !self.is_mounted() {
            return;
        }

        if self.in_flight.as_ref() == Some(&key) {
            self.in_flight = None;
        }

        if self.current_key().as_ref() != Some(&key) {
            return;
        }

        match result {
            Ok(summary) => {
                self.failed = None;
                self.resolved = Some((key, summary));
            }
            Err(_) => {
                self.failed = Some(key);
            }
        }
    }

    /// Resolved summary, visible only while its key still matches the
    /// current derivation key. Data for a superseded key is never served.
    pub fn summary(&self) -> Option<&CaptureSummary> {
        let (key, summary) = self.resolved.as_ref()?;
        if self.current_key().as_ref() == Some(key) {
            Some(summary)
        } else {
            None
        }
    }

    pub fn capture_time_window(&self) -> Option<TimeWindow> {
        self.summary().map(|summary| summary.info)
    }

    /// User selection if present, else the full capture window.
    pub fn selected_time_window(&self) -> Option<TimeWindow> {
        self.time_window.or_else(|| self.capture_time_window())
    }

    pub fn has_selection(&self) -> bool {
        match self.time_window {
            None => false,
            Some(window) => Some(window) != self.capture_time_window(),
        }
    }

    /// Timestamps of the first resolved series; the caller maps hover
    /// positions onto this axis.
    pub fn time_axis(&self) -> Option<Vec<i64>> {
        let summary = self.summary()?;
        let first = summary.metrics.first()?;
        Some(first.time_series.iter().map(|sample| sample.t_ns).collect())
    }

    pub fn tracks(&self, mut get_color: impl FnMut(&str) -> Color) -> Vec<TimelineTrack<'_>> {
        build_tracks(
            self.requested.names(),
            self.summary().map(|summary| summary.metrics.as_slice()),
            self.hover_ns,
            &mut get_color,
        )
    }

    pub fn hover_relative_ns(&self) -> i64 {
        hover_relative_ns(
            self.hover_ns,
            self.capture_time_window().map(|window| window.from_ns),
        )
    }

    pub fn overlay_height(&self) -> u32 {
        domain::overlay_height(self.requested.len())
    }

    pub fn overlay_width(&self) -> f64 {
        domain::overlay_width(self.content_width_px)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{MetricSample, MetricSeries, TIMELINE_HEIGHT};

    fn engine() -> TimelineEngine {
        TimelineEngine::new(PathBuf::from("/captures/web.capsum.json"))
    }

    fn summary(from_ns: i64, to_ns: i64, names: &[&str]) -> CaptureSummary {
        CaptureSummary {
            info: TimeWindow::new(from_ns, to_ns),
            metrics: names
                .iter()
                .map(|name| MetricSeries {
                    name: name.to_string(),
                    time_series: vec![
                        MetricSample { t_ns: from_ns, value: 1.0 },
                        MetricSample {
                            t_ns: from_ns + 100,
                            value: 2.0,
                        },
                    ],
                })
                .collect(),
        }
    }

    #[test]
    fn zero_width_suppresses_fetch() {
        let mut engine = engine();
        assert_eq!(engine.sample_count(), 0);
        assert_eq!(engine.wanted_fetch(), None);

        engine.set_measured_width(20.0);
        // 20 measured - 2 x 10 handles leaves no content width.
        assert_eq!(engine.sample_count(), 0);
        assert_eq!(engine.wanted_fetch(), None);
    }

    #[test]
    fn width_derives_key_and_fetch_is_issued_once() {
        let mut engine = engine();
        engine.set_measured_width(320.0);
        // content width 300 -> sample count 80.
        let key = engine.wanted_fetch().expect("fetch");
        assert_eq!(key.sample_count, 80);
        assert_eq!(key.filter, None);

        // Same key stays in flight; nothing else is issued.
        assert_eq!(engine.wanted_fetch(), None);
    }

    #[test]
    fn resolved_key_is_not_refetched() {
        let mut engine = engine();
        engine.set_measured_width(320.0);
        let key = engine.wanted_fetch().expect("fetch");
        engine.apply_summary(key, Ok(summary(0, 1_000, &["cpu"])));
        assert_eq!(engine.wanted_fetch(), None);
    }

    #[test]
    fn superseded_resolution_is_discarded() {
        let mut engine = engine();
        engine.set_measured_width(320.0);
        let key_a = engine.wanted_fetch().expect("fetch a");

        // Inputs change to key B before A resolves.
        engine.set_params(
            MetricTimelines::from_names(["cpu"]),
            None,
            Some("proc.name=nginx".to_string()),
        );
        let key_b = engine.wanted_fetch().expect("fetch b");
        assert_ne!(key_a, key_b);

        engine.apply_summary(key_a, Ok(summary(0, 1_000, &["cpu"])));
        assert_eq!(engine.summary(), None);
        assert_eq!(engine.capture_time_window(), None);

        engine.apply_summary(key_b.clone(), Ok(summary(0, 2_000, &["cpu"])));
        assert_eq!(engine.capture_time_window(), Some(TimeWindow::new(0, 2_000)));
    }

    #[test]
    fn resize_hides_data_for_the_old_key_until_refetch() {
        let mut engine = engine();
        engine.set_measured_width(320.0);
        let key = engine.wanted_fetch().expect("fetch");
        engine.apply_summary(key, Ok(summary(0, 1_000, &["cpu"])));
        assert!(engine.summary().is_some());

        engine.set_measured_width(1_000.0);
        assert_eq!(engine.summary(), None);

        let key = engine.wanted_fetch().expect("refetch");
        engine.apply_summary(key, Ok(summary(0, 1_000, &["cpu"])));
        assert!(engine.summary().is_some());
    }

    #[test]
    fn failed_fetch_leaves_placeholders_and_allows_retry_after_invalidate() {
        let mut engine = engine();
        engine.set_measured_width(320.0);
        engine.set_params(MetricTimelines::from_names(["cpu"]), None, None);

        let key = engine.wanted_fetch().expect("fetch");
        engine.apply_summary(key, Err("backend unavailable".to_string()));
        assert_eq!(engine.summary(), None);

        // No internal retry: the failed key is not re-issued.
        assert_eq!(engine.wanted_fetch(), None);
        assert_eq!(engine.wanted_fetch(), None);

        let tracks = engine.tracks(|_| Color::Cyan);
        assert_eq!(tracks.len(), 1);
        assert!(!tracks[0].is_resolved());

        engine.invalidate();
        assert!(engine.wanted_fetch().is_some());
    }

    #[test]
    fn key_change_after_failure_reissues_and_rearms_the_old_key() {
        let mut engine = engine();
        engine.set_measured_width(320.0);
        let key = engine.wanted_fetch().expect("fetch");
        engine.apply_summary(key.clone(), Err("backend unavailable".to_string()));
        assert_eq!(engine.wanted_fetch(), None);

        engine.set_params(
            MetricTimelines::new(),
            None,
            Some("proc.name=nginx".to_string()),
        );
        let other = engine.wanted_fetch().expect("fetch under new key");
        assert_ne!(other, key);

        engine.set_params(MetricTimelines::new(), None, None);
        assert_eq!(engine.wanted_fetch(), Some(key));
    }

    #[test]
    fn selected_window_falls_back_to_capture_window() {
        let mut engine = engine();
        engine.set_measured_width(320.0);
        let key = engine.wanted_fetch().expect("fetch");
        engine.apply_summary(key, Ok(summary(100, 900, &["cpu"])));

        assert_eq!(engine.selected_time_window(), Some(TimeWindow::new(100, 900)));
        assert!(!engine.has_selection());

        engine.set_params(
            MetricTimelines::new(),
            Some(TimeWindow::new(200, 400)),
            None,
        );
        assert_eq!(engine.selected_time_window(), Some(TimeWindow::new(200, 400)));
        assert!(engine.has_selection());

        // A selection equal to the capture window is not a selection.
        engine.set_params(
            MetricTimelines::new(),
            Some(TimeWindow::new(100, 900)),
            None,
        );
        assert!(!engine.has_selection());
    }

    #[test]
    fn tracks_pair_resolved_series_and_placeholders() {
        let mut engine = engine();
        engine.set_measured_width(320.0);
        engine.set_params(MetricTimelines::from_names(["cpu", "mem"]), None, None);

        let key = engine.wanted_fetch().expect("fetch");
        engine.apply_summary(key, Ok(summary(0, 1_000, &["cpu"])));

        let tracks = engine.tracks(|_| Color::Cyan);
        assert_eq!(tracks.len(), 2);
        assert!(tracks[0].is_resolved());
        assert_eq!(tracks[1].name, "mem");
        assert!(!tracks[1].is_resolved());
        assert_eq!(engine.overlay_height(), TIMELINE_HEIGHT * 3);
    }

    #[test]
    fn hover_state_follows_mouse_and_explicit_timestamps() {
        let mut engine = engine();
        engine.set_measured_width(320.0);
        let key = engine.wanted_fetch().expect("fetch");
        engine.apply_summary(key, Ok(summary(0, 1_000, &["cpu"])));

        engine.mouse_enter();
        assert!(engine.is_mouse_over());

        engine.set_hover_timestamp(Some(100));
        assert_eq!(engine.hover_relative_ns(), 100);
        engine.set_params(MetricTimelines::from_names(["cpu"]), None, None);
        let tracks = engine.tracks(|_| Color::Cyan);
        assert_eq!(
            tracks[0].hover_sample,
            Some(MetricSample { t_ns: 100, value: 2.0 })
        );

        engine.mouse_leave();
        assert!(!engine.is_mouse_over());
        assert_eq!(engine.hover_timestamp(), None);
        assert_eq!(engine.hover_relative_ns(), 0);
    }

    #[test]
    fn torn_down_engine_ignores_everything() {
        let mut engine = engine();
        engine.set_measured_width(320.0);
        let key = engine.wanted_fetch().expect("fetch");

        engine.tear_down();
        engine.apply_summary(key, Ok(summary(0, 1_000, &["cpu"])));
        assert_eq!(engine.summary(), None);

        engine.set_measured_width(2_000.0);
        assert_eq!(engine.sample_count(), 80);

        engine.mouse_enter();
        assert!(!engine.is_mouse_over());
        assert_eq!(engine.wanted_fetch(), None);
    }

    #[test]
    fn empty_request_list_keeps_one_track_slot_of_height() {
        let engine = engine();
        assert!(engine.tracks(|_| Color::Cyan).is_empty());
        assert_eq!(engine.overlay_height(), TIMELINE_HEIGHT);
    }

    #[test]
    fn overlay_width_restores_handle_allowance() {
        let mut engine = engine();
        engine.set_measured_width(320.0);
        assert_eq!(engine.overlay_width(), 320.0);
    }
}
