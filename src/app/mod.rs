mod engine;
mod line_editor;
mod mouse;
mod navigation;

pub use engine::TimelineEngine;
pub use line_editor::LineEditor;
pub use navigation::*;

use crate::domain::{
    CAPTURE_VIEWS, CaptureFileEntry, TIMELINE_DRAGGABLE_HANDLE_WIDTH, TrackingEvent,
};
use crate::infra::{FetchKey, ScanWarningCount, SummarySignal};
use crossterm::event::{KeyCode, KeyEvent, KeyModifiers, MouseEvent};
use ratatui::layout::Rect;
use std::path::PathBuf;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum AppError {
    #[error("terminal I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error(transparent)]
    ResolveCapturesDir(#[from] crate::infra::ResolveCapturesDirError),
}

/// One terminal cell draws roughly one sample footprint (3 x 1.4 px), so the
/// quantization formula keeps its pixel terms while the TUI measures cells.
pub const TIMELINE_CELL_PIXELS: f64 = 4.2;

/// Rows each timeline track occupies: one label/readout row, two sparkline
/// rows.
pub const ROWS_PER_TRACK: u16 = 3;

const METRICS_PANEL_WIDTH: u16 = 28;

/// Measured footprint of the timeline component for a sparkline of the given
/// width; the engine reserves the drag handles out of this itself.
pub fn measured_timeline_width_px(sparkline_cols: u16) -> f64 {
    sparkline_cols as f64 * TIMELINE_CELL_PIXELS + (TIMELINE_DRAGGABLE_HANDLE_WIDTH * 2) as f64
}

#[derive(Debug)]
pub struct AppModel {
    pub captures_dir: PathBuf,
    pub captures: Vec<CaptureFileEntry>,
    pub warnings: ScanWarningCount,
    pub view: View,
    pub terminal_size: (u16, u16),
    pub notice: Option<String>,
}

impl AppModel {
    pub fn new(captures_dir: PathBuf, captures: Vec<CaptureFileEntry>) -> Self {
        Self {
            captures_dir,
            captures,
            warnings: ScanWarningCount::from(0usize),
            view: View::Captures(CapturesView { selected: 0 }),
            terminal_size: (0, 0),
            notice: None,
        }
    }

    pub fn with_notice(mut self, notice: Option<String>) -> Self {
        self.notice = notice;
        self
    }

    pub fn with_warnings(mut self, warnings: ScanWarningCount) -> Self {
        self.warnings = warnings;
        self
    }

    pub fn with_terminal_size(mut self, width: u16, height: u16) -> Self {
        self.terminal_size = (width, height);
        self
    }
}

#[derive(Debug)]
pub enum View {
    Captures(CapturesView),
    Capture(CaptureView),
}

#[derive(Clone, Debug, Eq, PartialEq)]
pub struct CapturesView {
    pub selected: usize,
}

#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum PromptKind {
    Filter,
    Search,
}

#[derive(Clone, Debug, Eq, PartialEq)]
pub struct Prompt {
    pub kind: PromptKind,
    pub editor: LineEditor,
}

#[derive(Debug)]
pub struct CaptureView {
    pub entry: CaptureFileEntry,
    pub history: NavHistory,
    pub engine: TimelineEngine,
    /// Cursor into `CAPTURE_VIEWS`, driven by the select action.
    pub view_index: usize,
    pub metric_cursor: usize,
    pub prompt: Option<Prompt>,
    /// Filter and search pattern as edited in the view. Navigation
    /// transitions re-read these at call time rather than trusting the last
    /// navigated params.
    pub live_filter: Option<String>,
    pub live_search: Option<String>,
}

impl CaptureView {
    pub fn new(entry: CaptureFileEntry) -> Self {
        let engine = TimelineEngine::new(entry.path.clone());
        Self {
            entry,
            history: NavHistory::new(NavigationParams::default()),
            engine,
            view_index: 0,
            metric_cursor: 0,
            prompt: None,
            live_filter: None,
            live_search: None,
        }
    }

    /// Current params with filter and search pattern re-read from live view
    /// state.
    pub fn effective_params(&self) -> NavigationParams {
        let mut params = self.history.current().clone();
        params.filter = self.live_filter.clone();
        params.search_pattern = self.live_search.clone();
        params
    }

    /// Metric names offered for toggling: the resolved summary's metrics, or
    /// the already requested names while nothing is resolved yet.
    pub fn available_metric_names(&self) -> Vec<String> {
        if let Some(summary) = self.engine.summary() {
            summary
                .metrics
                .iter()
                .map(|series| series.name.clone())
                .collect()
        } else {
            self.history.current().metric_timelines.names().to_vec()
        }
    }

    fn commit(&mut self, request: NavRequest, events: Vec<TrackingEvent>) -> AppCommand {
        self.history.apply(request);
        self.live_filter = self.history.current().filter.clone();
        self.live_search = self.history.current().search_pattern.clone();
        self.sync_engine();

        if events.is_empty() {
            AppCommand::None
        } else {
            AppCommand::Track { events }
        }
    }

    fn sync_engine(&mut self) {
        let params = self.history.current();
        self.engine.set_params(
            params.metric_timelines.clone(),
            params.time_window,
            params.filter.clone(),
        );
    }
}

#[derive(Clone, Debug)]
pub enum AppEvent {
    Key(KeyEvent),
    Mouse(MouseEvent),
}

#[derive(Clone, Debug, Eq, PartialEq)]
pub enum AppCommand {
    None,
    Quit,
    Rescan,
    OpenCapture { entry: CaptureFileEntry },
    Track { events: Vec<TrackingEvent> },
}

pub fn update(model: AppModel, event: AppEvent) -> (AppModel, AppCommand) {
    match event {
        AppEvent::Key(key) => update_on_key(model, key),
        AppEvent::Mouse(mouse) => mouse::update_on_mouse(model, mouse),
    }
}

fn update_on_key(model: AppModel, key: KeyEvent) -> (AppModel, AppCommand) {
    let mut model = model;
    model.notice = None;

    if key.modifiers.contains(KeyModifiers::CONTROL)
        && matches!(key.code, KeyCode::Char('c') | KeyCode::Char('q'))
    {
        return (model, AppCommand::Quit);
    }

    // Take the view out so it can be passed by value alongside the model;
    // every branch puts a view back before returning.
    let view = std::mem::replace(&mut model.view, View::Captures(CapturesView { selected: 0 }));
    match view {
        View::Captures(view) => update_captures(model, view, key),
        View::Capture(view) => update_capture(model, view, key),
    }
}

fn update_captures(
    mut model: AppModel,
    mut view: CapturesView,
    key: KeyEvent,
) -> (AppModel, AppCommand) {
    if key.modifiers.contains(KeyModifiers::CONTROL) && key.code == KeyCode::Char('r') {
        model.view = View::Captures(view);
        return (model, AppCommand::Rescan);
    }

    match key.code {
        KeyCode::Char('q') => {
            model.view = View::Captures(view);
            return (model, AppCommand::Quit);
        }
        KeyCode::Up => {
            view.selected = view.selected.saturating_sub(1);
        }
        KeyCode::Down => {
            if !model.captures.is_empty() {
                view.selected = (view.selected + 1).min(model.captures.len() - 1);
            }
        }
        KeyCode::Home => view.selected = 0,
        KeyCode::End => view.selected = model.captures.len().saturating_sub(1),
        KeyCode::Enter => {
            if let Some(entry) = model.captures.get(view.selected).cloned() {
                model.view = View::Captures(view);
                return (model, AppCommand::OpenCapture { entry });
            }
        }
        _ => {}
    }

    model.view = View::Captures(view);
    (model, AppCommand::None)
}

fn update_capture(
    mut model: AppModel,
    mut view: CaptureView,
    key: KeyEvent,
) -> (AppModel, AppCommand) {
    if let Some(prompt) = view.prompt.take() {
        return update_capture_prompt(model, view, prompt, key);
    }

    if key.modifiers.contains(KeyModifiers::CONTROL) && key.code == KeyCode::Char('r') {
        view.engine.invalidate();
        model.view = View::Capture(view);
        return (model, AppCommand::None);
    }

    match key.code {
        KeyCode::Esc | KeyCode::Backspace => {
            if view.engine.hover_timestamp().is_some() || view.engine.is_mouse_over() {
                view.engine.mouse_leave();
                model.view = View::Capture(view);
                return (model, AppCommand::None);
            }
            if view.history.back() {
                view.live_filter = view.history.current().filter.clone();
                view.live_search = view.history.current().search_pattern.clone();
                view.sync_engine();
                model.view = View::Capture(view);
                return (model, AppCommand::None);
            }
            view.engine.tear_down();
            model.view = View::Captures(CapturesView { selected: 0 });
            return (model, AppCommand::None);
        }
        KeyCode::Char('f') => {
            view.prompt = Some(Prompt {
                kind: PromptKind::Filter,
                editor: LineEditor::from_text(view.live_filter.clone().unwrap_or_default()),
            });
        }
        KeyCode::Char('/') => {
            view.prompt = Some(Prompt {
                kind: PromptKind::Search,
                editor: LineEditor::from_text(view.live_search.clone().unwrap_or_default()),
            });
        }
        KeyCode::Up => {
            view.metric_cursor = view.metric_cursor.saturating_sub(1);
        }
        KeyCode::Down => {
            let count = view.available_metric_names().len();
            if count > 0 {
                view.metric_cursor = (view.metric_cursor + 1).min(count - 1);
            }
        }
        KeyCode::Enter | KeyCode::Char(' ') => {
            if let Some(name) = view.available_metric_names().get(view.metric_cursor).cloned() {
                let (request, events) = toggle_metric_timeline(&view.effective_params(), &name);
                let command = view.commit(request, events);
                model.view = View::Capture(view);
                return (model, command);
            }
        }
        KeyCode::Delete | KeyCode::Char('x') => {
            if let Some(name) = view.available_metric_names().get(view.metric_cursor).cloned() {
                let (request, events) = remove_metric_timeline(&view.effective_params(), &name);
                let command = view.commit(request, events);
                model.view = View::Capture(view);
                return (model, command);
            }
        }
        KeyCode::Char('v') => {
            view.view_index = (view.view_index + 1) % CAPTURE_VIEWS.len();
            let descriptor = &CAPTURE_VIEWS[view.view_index];
            let target = DrilldownTarget {
                view_id: descriptor.view_id.to_string(),
                info: format!("view:{}", descriptor.view_id),
            };
            let (request, events) = select(&view.effective_params(), Some(&target));
            let command = view.commit(request, events);
            model.view = View::Capture(view);
            return (model, command);
        }
        KeyCode::Char('d') => {
            let descriptor = &CAPTURE_VIEWS[view.view_index];
            let info = match view.engine.selected_time_window() {
                Some(window) => {
                    format!("{}:{}-{}", descriptor.view_id, window.from_ns, window.to_ns)
                }
                None => format!("view:{}", descriptor.view_id),
            };
            let target = DrilldownTarget {
                view_id: descriptor.view_id.to_string(),
                info,
            };
            let (request, events) = drill_down(&view.effective_params(), Some(&target));
            let command = view.commit(request, events);
            model.view = View::Capture(view);
            return (model, command);
        }
        KeyCode::Left | KeyCode::Right => {
            move_hover(&mut view, key.code == KeyCode::Right);
        }
        KeyCode::Char('z') => {
            if let Some(window) = view.engine.selected_time_window() {
                let quarter = window.duration_ns() / 4;
                let (request, events) = select_time_window(
                    &view.effective_params(),
                    Some(window.from_ns + quarter),
                    Some(window.to_ns - quarter),
                );
                let command = view.commit(request, events);
                model.view = View::Capture(view);
                return (model, command);
            }
        }
        KeyCode::Char('r') => {
            let (request, events) = select_time_window(&view.effective_params(), None, None);
            let command = view.commit(request, events);
            model.view = View::Capture(view);
            return (model, command);
        }
        _ => {}
    }

    model.view = View::Capture(view);
    (model, AppCommand::None)
}

fn update_capture_prompt(
    mut model: AppModel,
    mut view: CaptureView,
    mut prompt: Prompt,
    key: KeyEvent,
) -> (AppModel, AppCommand) {
    match key.code {
        KeyCode::Esc => {
            model.view = View::Capture(view);
            return (model, AppCommand::None);
        }
        KeyCode::Enter => {
            let text = prompt.editor.text.clone();
            let command = match prompt.kind {
                PromptKind::Filter => {
                    view.live_filter = (!text.is_empty()).then(|| text.clone());
                    let (request, events) = apply_filter(&view.effective_params(), &text);
                    view.commit(request, events)
                }
                PromptKind::Search => {
                    view.live_search = (!text.is_empty()).then(|| text.clone());
                    let (request, events) = apply_search(&view.effective_params(), &text);
                    view.commit(request, events)
                }
            };
            model.view = View::Capture(view);
            return (model, command);
        }
        KeyCode::Backspace => prompt.editor.backspace(),
        KeyCode::Delete => prompt.editor.delete_forward(),
        KeyCode::Left => prompt.editor.move_left(),
        KeyCode::Right => prompt.editor.move_right(),
        KeyCode::Home => prompt.editor.move_home(),
        KeyCode::End => prompt.editor.move_end(),
        KeyCode::Char(ch) => prompt.editor.insert_char(ch),
        _ => {}
    }

    view.prompt = Some(prompt);
    model.view = View::Capture(view);
    (model, AppCommand::None)
}

fn move_hover(view: &mut CaptureView, forward: bool) {
    let Some(axis) = view.engine.time_axis() else {
        return;
    };
    if axis.is_empty() {
        return;
    }

    let current = view
        .engine
        .hover_timestamp()
        .and_then(|t_ns| axis.iter().position(|&axis_ns| axis_ns == t_ns));
    let next = match current {
        None => {
            if forward {
                0
            } else {
                axis.len() - 1
            }
        }
        Some(index) => {
            if forward {
                (index + 1).min(axis.len() - 1)
            } else {
                index.saturating_sub(1)
            }
        }
    };

    view.engine.mouse_enter();
    view.engine.set_hover_timestamp(Some(axis[next]));
}

/// Applies a resolved fetch. The engine itself discards superseded keys; the
/// model only surfaces failures that belong to the current key.
pub fn apply_summary_signal(model: &mut AppModel, signal: SummarySignal) {
    let SummarySignal::Loaded { key, result } = signal;

    let View::Capture(view) = &mut model.view else {
        return;
    };

    let is_current = view.engine.current_key().as_ref() == Some(&key);
    if let Err(error) = &result {
        if is_current {
            model.notice = Some(format!("Failed to load capture summary: {error}"));
        }
    }

    view.engine.apply_summary(key, result);

    let count = view.available_metric_names().len();
    if count > 0 {
        view.metric_cursor = view.metric_cursor.min(count - 1);
    } else {
        view.metric_cursor = 0;
    }
}

pub fn wanted_fetch(model: &mut AppModel) -> Option<FetchKey> {
    match &mut model.view {
        View::Capture(view) => view.engine.wanted_fetch(),
        View::Captures(_) => None,
    }
}

/// Recomputes the engine's measured width from the current terminal layout.
/// Called when the layout first becomes available and after every settled
/// resize burst.
pub fn relayout(model: &mut AppModel) {
    let (width, height) = model.terminal_size;
    let View::Capture(view) = &mut model.view else {
        return;
    };

    let layout = capture_layout(width, height);
    let sparkline_cols = layout.tracks.width.saturating_sub(2);
    view.engine
        .set_measured_width(measured_timeline_width_px(sparkline_cols));
}

#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub struct CaptureLayout {
    pub title: Rect,
    pub metrics: Rect,
    pub header: Rect,
    pub tracks: Rect,
    pub footer: Rect,
}

/// Shared by rendering and mouse handling so hover mapping agrees with what
/// is on screen.
pub fn capture_layout(width: u16, height: u16) -> CaptureLayout {
    let title = Rect::new(0, 0, width, height.min(1));
    let body_y = 1u16;
    let body_height = height.saturating_sub(2);
    let footer = Rect::new(0, height.saturating_sub(1), width, height.min(1));

    let metrics_width = METRICS_PANEL_WIDTH.min(width / 2);
    let metrics = Rect::new(0, body_y, metrics_width, body_height);

    let right_x = metrics_width;
    let right_width = width.saturating_sub(metrics_width);
    let header = Rect::new(right_x, body_y, right_width, 2.min(body_height));
    let tracks = Rect::new(
        right_x,
        body_y + header.height,
        right_width,
        body_height.saturating_sub(header.height),
    );

    CaptureLayout {
        title,
        metrics,
        header,
        tracks,
        footer,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{
        CaptureSummary, MetricSample, MetricSeries, MetricTimelines, TimeWindow,
    };

    fn entry(name: &str) -> CaptureFileEntry {
        CaptureFileEntry {
            path: PathBuf::from(format!("/captures/{name}.capsum.json")),
            name: name.to_string(),
            file_size_bytes: 1_024,
            file_modified: None,
        }
    }

    fn summary(names: &[&str]) -> CaptureSummary {
        CaptureSummary {
            info: TimeWindow::new(0, 1_000),
            metrics: names
                .iter()
                .map(|name| MetricSeries {
                    name: name.to_string(),
                    time_series: vec![
                        MetricSample { t_ns: 0, value: 1.0 },
                        MetricSample { t_ns: 500, value: 2.0 },
                    ],
                })
                .collect(),
        }
    }

    fn capture_model() -> AppModel {
        let mut view = CaptureView::new(entry("web"));
        view.engine.set_measured_width(320.0);
        let key = view.engine.wanted_fetch().expect("fetch");
        view.engine.apply_summary(key, Ok(summary(&["cpu", "mem", "net"])));

        let mut model = AppModel::new(PathBuf::from("/captures"), vec![entry("web")])
            .with_terminal_size(120, 40);
        model.view = View::Capture(view);
        model
    }

    fn key(code: KeyCode) -> AppEvent {
        AppEvent::Key(KeyEvent::new(code, KeyModifiers::NONE))
    }

    #[test]
    fn enter_on_picker_opens_selected_capture() {
        let model = AppModel::new(PathBuf::from("/captures"), vec![entry("web"), entry("db")]);
        let (model, _command) = update(model, key(KeyCode::Down));
        let (_model, command) = update(model, key(KeyCode::Enter));
        assert_eq!(
            command,
            AppCommand::OpenCapture { entry: entry("db") }
        );
    }

    #[test]
    fn toggle_metric_updates_history_top_without_new_entry() {
        let model = capture_model();
        let before_len = match &model.view {
            View::Capture(view) => view.history.len(),
            _ => unreachable!(),
        };

        let (model, command) = update(model, key(KeyCode::Char(' ')));
        assert_eq!(command, AppCommand::None);

        let View::Capture(view) = &model.view else {
            panic!("expected capture view");
        };
        assert_eq!(view.history.len(), before_len);
        assert_eq!(
            view.history.current().metric_timelines.names(),
            ["cpu"]
        );
        assert_eq!(view.engine.requested().names(), ["cpu"]);
    }

    #[test]
    fn filter_prompt_commit_pushes_and_tracks() {
        let (model, _command) = update(capture_model(), key(KeyCode::Char('f')));
        let (model, _command) = update(model, key(KeyCode::Char('a')));
        let (model, command) = update(model, key(KeyCode::Enter));

        assert_eq!(
            command,
            AppCommand::Track {
                events: vec![TrackingEvent::ApplyFilter { is_set: true }]
            }
        );

        let View::Capture(view) = &model.view else {
            panic!("expected capture view");
        };
        assert_eq!(view.history.len(), 2);
        assert_eq!(view.history.current().filter.as_deref(), Some("a"));
        assert_eq!(view.engine.filter(), Some("a"));
    }

    #[test]
    fn search_prompt_commit_does_not_track() {
        let (model, _command) = update(capture_model(), key(KeyCode::Char('/')));
        let (model, _command) = update(model, key(KeyCode::Char('x')));
        let (model, command) = update(model, key(KeyCode::Enter));
        assert_eq!(command, AppCommand::None);

        let View::Capture(view) = &model.view else {
            panic!("expected capture view");
        };
        assert_eq!(view.history.current().search_pattern.as_deref(), Some("x"));
    }

    #[test]
    fn reset_window_replaces_and_tracks_reset() {
        let model = capture_model();
        let (model, command) = update(model, key(KeyCode::Char('r')));
        assert_eq!(
            command,
            AppCommand::Track {
                events: vec![TrackingEvent::ResetTimelineSelection]
            }
        );

        let View::Capture(view) = &model.view else {
            panic!("expected capture view");
        };
        assert_eq!(view.history.len(), 1);
        assert_eq!(view.history.current().time_window, None);
    }

    #[test]
    fn zoom_narrows_selection_without_new_entry() {
        let model = capture_model();
        let (model, command) = update(model, key(KeyCode::Char('z')));
        assert_eq!(command, AppCommand::None);

        let View::Capture(view) = &model.view else {
            panic!("expected capture view");
        };
        assert_eq!(view.history.len(), 1);
        assert_eq!(
            view.history.current().time_window,
            Some(TimeWindow::new(250, 750))
        );
        assert!(view.engine.has_selection());
    }

    #[test]
    fn select_view_pushes_history_and_tracks() {
        let model = capture_model();
        let (model, command) = update(model, key(KeyCode::Char('v')));
        assert_eq!(
            command,
            AppCommand::Track {
                events: vec![TrackingEvent::Select {
                    target: Some("processes".to_string())
                }]
            }
        );

        let View::Capture(view) = &model.view else {
            panic!("expected capture view");
        };
        assert_eq!(view.history.len(), 2);
        assert_eq!(
            view.history.current().drilldown.as_deref(),
            Some("view:processes")
        );
    }

    #[test]
    fn transitions_read_live_filter_from_view_state() {
        let mut model = capture_model();
        if let View::Capture(view) = &mut model.view {
            view.live_filter = Some("proc.name=nginx".to_string());
        }

        let (model, _command) = update(model, key(KeyCode::Char('v')));
        let View::Capture(view) = &model.view else {
            panic!("expected capture view");
        };
        assert_eq!(
            view.history.current().filter.as_deref(),
            Some("proc.name=nginx")
        );
    }

    #[test]
    fn hover_moves_along_axis_and_esc_clears_it() {
        let model = capture_model();
        let (model, _command) = update(model, key(KeyCode::Right));
        let View::Capture(view) = &model.view else {
            panic!("expected capture view");
        };
        assert_eq!(view.engine.hover_timestamp(), Some(0));
        assert!(view.engine.is_mouse_over());

        let (model, _command) = update(model, key(KeyCode::Right));
        let View::Capture(view) = &model.view else {
            panic!("expected capture view");
        };
        assert_eq!(view.engine.hover_timestamp(), Some(500));

        let (model, _command) = update(model, key(KeyCode::Esc));
        let View::Capture(view) = &model.view else {
            panic!("expected capture view");
        };
        assert_eq!(view.engine.hover_timestamp(), None);
        assert!(!view.engine.is_mouse_over());
    }

    #[test]
    fn esc_without_hover_or_history_returns_to_picker() {
        let model = capture_model();
        let (model, _command) = update(model, key(KeyCode::Esc));
        assert!(matches!(model.view, View::Captures(_)));
    }

    #[test]
    fn failed_summary_for_current_key_sets_notice() {
        let mut view = CaptureView::new(entry("web"));
        view.engine.set_measured_width(320.0);
        let key = view.engine.wanted_fetch().expect("fetch");

        let mut model = AppModel::new(PathBuf::from("/captures"), vec![entry("web")]);
        model.view = View::Capture(view);

        apply_summary_signal(
            &mut model,
            SummarySignal::Loaded {
                key,
                result: Err("backend unavailable".to_string()),
            },
        );
        assert!(
            model
                .notice
                .as_deref()
                .is_some_and(|notice| notice.contains("backend unavailable"))
        );
    }

    #[test]
    fn failed_summary_for_superseded_key_is_silent() {
        let mut view = CaptureView::new(entry("web"));
        view.engine.set_measured_width(320.0);
        let stale = view.engine.wanted_fetch().expect("fetch");
        view.engine.set_measured_width(1_000.0);

        let mut model = AppModel::new(PathBuf::from("/captures"), vec![entry("web")]);
        model.view = View::Capture(view);

        apply_summary_signal(
            &mut model,
            SummarySignal::Loaded {
                key: stale,
                result: Err("backend unavailable".to_string()),
            },
        );
        assert_eq!(model.notice, None);
    }

    #[test]
    fn relayout_feeds_measured_width_into_engine() {
        let mut model = AppModel::new(PathBuf::from("/captures"), vec![entry("web")])
            .with_terminal_size(120, 40);
        model.view = View::Capture(CaptureView::new(entry("web")));

        relayout(&mut model);
        let View::Capture(view) = &mut model.view else {
            panic!("expected capture view");
        };
        assert!(view.engine.can_render());
        assert!(view.engine.sample_count() > 0);
        assert!(view.engine.wanted_fetch().is_some());
    }
}
