//! Navigation state transitions.
//!
//! Every user action is a pure total function from the current effective
//! parameter set to a new one, paired with a navigation mode (push creates a
//! history entry, replace refines the current one) and the tracking events to
//! emit after the transition commits. There is no invalid-action rejection:
//! an absent target simply propagates as an absent field.

use crate::domain::{MetricTimelines, TimeWindow, TrackingEvent};

#[derive(Clone, Debug, Default, Eq, PartialEq)]
pub struct NavigationParams {
    pub drilldown: Option<String>,
    pub metric_timelines: MetricTimelines,
    /// Both bounds or neither; a half-open selection is not a valid state.
    pub time_window: Option<TimeWindow>,
    pub filter: Option<String>,
    pub search_pattern: Option<String>,
}

#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum NavMode {
    Push,
    Replace,
}

#[derive(Clone, Debug, Eq, PartialEq)]
pub struct NavRequest {
    pub params: NavigationParams,
    pub mode: NavMode,
}

#[derive(Clone, Debug, Eq, PartialEq)]
pub struct DrilldownTarget {
    pub view_id: String,
    pub info: String,
}

pub fn select(
    current: &NavigationParams,
    target: Option<&DrilldownTarget>,
) -> (NavRequest, Vec<TrackingEvent>) {
    let mut params = current.clone();
    params.drilldown = target.map(|target| target.info.clone());

    (
        NavRequest {
            params,
            mode: NavMode::Push,
        },
        vec![TrackingEvent::Select {
            target: target.map(|target| target.view_id.clone()),
        }],
    )
}

/// Same field update as `select`; logged distinctly.
pub fn drill_down(
    current: &NavigationParams,
    target: Option<&DrilldownTarget>,
) -> (NavRequest, Vec<TrackingEvent>) {
    let mut params = current.clone();
    params.drilldown = target.map(|target| target.info.clone());

    (
        NavRequest {
            params,
            mode: NavMode::Push,
        },
        vec![TrackingEvent::DrillDown {
            target: target.map(|target| target.view_id.clone()),
        }],
    )
}

pub fn apply_filter(
    current: &NavigationParams,
    filter: &str,
) -> (NavRequest, Vec<TrackingEvent>) {
    let is_set = !filter.is_empty();
    let mut params = current.clone();
    params.filter = is_set.then(|| filter.to_string());

    (
        NavRequest {
            params,
            mode: NavMode::Push,
        },
        vec![TrackingEvent::ApplyFilter { is_set }],
    )
}

pub fn apply_search(
    current: &NavigationParams,
    pattern: &str,
) -> (NavRequest, Vec<TrackingEvent>) {
    let mut params = current.clone();
    params.search_pattern = (!pattern.is_empty()).then(|| pattern.to_string());

    (
        NavRequest {
            params,
            mode: NavMode::Push,
        },
        Vec::new(),
    )
}

/// Both bounds set the selection; either absent resets it to the full window.
/// A time-window drag refines the current view, so neither case creates a
/// history entry.
pub fn select_time_window(
    current: &NavigationParams,
    from_ns: Option<i64>,
    to_ns: Option<i64>,
) -> (NavRequest, Vec<TrackingEvent>) {
    let mut params = current.clone();

    match (from_ns, to_ns) {
        (Some(from_ns), Some(to_ns)) => {
            params.time_window = Some(TimeWindow::new(from_ns, to_ns));
            (
                NavRequest {
                    params,
                    mode: NavMode::Replace,
                },
                Vec::new(),
            )
        }
        _ => {
            params.time_window = None;
            (
                NavRequest {
                    params,
                    mode: NavMode::Replace,
                },
                vec![TrackingEvent::ResetTimelineSelection],
            )
        }
    }
}

pub fn toggle_metric_timeline(
    current: &NavigationParams,
    name: &str,
) -> (NavRequest, Vec<TrackingEvent>) {
    let mut params = current.clone();
    params.metric_timelines = current.metric_timelines.toggle(name);

    (
        NavRequest {
            params,
            mode: NavMode::Replace,
        },
        Vec::new(),
    )
}

pub fn remove_metric_timeline(
    current: &NavigationParams,
    name: &str,
) -> (NavRequest, Vec<TrackingEvent>) {
    let mut params = current.clone();
    params.metric_timelines = current.metric_timelines.remove(name);

    (
        NavRequest {
            params,
            mode: NavMode::Replace,
        },
        Vec::new(),
    )
}

/// In-process stand-in for the routing collaborator's history: enough to make
/// push/replace semantics observable.
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct NavHistory {
    entries: Vec<NavigationParams>,
}

impl NavHistory {
    pub fn new(initial: NavigationParams) -> Self {
        Self {
            entries: vec![initial],
        }
    }

    pub fn current(&self) -> &NavigationParams {
        // Invariant: `entries` is never empty.
        &self.entries[self.entries.len() - 1]
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn apply(&mut self, request: NavRequest) {
        match request.mode {
            NavMode::Push => self.entries.push(request.params),
            NavMode::Replace => {
                let last = self.entries.len() - 1;
                self.entries[last] = request.params;
            }
        }
    }

    /// Pops back to the previous entry; false when already at the oldest.
    pub fn back(&mut self) -> bool {
        if self.entries.len() > 1 {
            self.entries.pop();
            true
        } else {
            false
        }
    }
}
