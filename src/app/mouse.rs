use super::{
    AppCommand, AppModel, CaptureView, CapturesView, View, capture_layout, toggle_metric_timeline,
};
use crossterm::event::{MouseButton, MouseEvent, MouseEventKind};
use ratatui::layout::Rect;

pub(super) fn update_on_mouse(model: AppModel, mouse: MouseEvent) -> (AppModel, AppCommand) {
    let mut model = model;
    if model.terminal_size.0 == 0 || model.terminal_size.1 == 0 {
        return (model, AppCommand::None);
    }

    let taken = std::mem::replace(&mut model.view, View::Captures(CapturesView { selected: 0 }));
    let mut view = match taken {
        View::Capture(view) => view,
        other => {
            model.view = other;
            return (model, AppCommand::None);
        }
    };

    let (width, height) = model.terminal_size;
    let layout = capture_layout(width, height);

    match mouse.kind {
        MouseEventKind::Moved => {
            apply_hover(&mut view, layout.tracks, mouse.column, mouse.row);
        }
        MouseEventKind::ScrollUp => {
            view.metric_cursor = view.metric_cursor.saturating_sub(1);
        }
        MouseEventKind::ScrollDown => {
            let count = view.available_metric_names().len();
            if count > 0 {
                view.metric_cursor = (view.metric_cursor + 1).min(count - 1);
            }
        }
        MouseEventKind::Down(MouseButton::Left) => {
            if contains(layout.metrics, mouse.column, mouse.row) {
                // First metric row sits below the panel border.
                let row_index = mouse.row.saturating_sub(layout.metrics.y + 1) as usize;
                let names = view.available_metric_names();
                if let Some(name) = names.get(row_index).cloned() {
                    view.metric_cursor = row_index;
                    let (request, events) = toggle_metric_timeline(&view.effective_params(), &name);
                    let command = view.commit(request, events);
                    model.view = View::Capture(view);
                    return (model, command);
                }
            }
        }
        _ => {}
    }

    model.view = View::Capture(view);
    (model, AppCommand::None)
}

/// Maps a pointer position onto the hover timestamp. The sparkline starts one
/// column inside the tracks block; each column is one sample on the time
/// axis.
fn apply_hover(view: &mut CaptureView, tracks: Rect, column: u16, row: u16) {
    if !contains(tracks, column, row) {
        if view.engine.is_mouse_over() {
            view.engine.mouse_leave();
        }
        return;
    }

    view.engine.mouse_enter();

    let Some(axis) = view.engine.time_axis() else {
        return;
    };
    if axis.is_empty() {
        return;
    }

    let offset = column.saturating_sub(tracks.x + 1) as usize;
    let index = offset.min(axis.len() - 1);
    view.engine.set_hover_timestamp(Some(axis[index]));
}

fn contains(rect: Rect, column: u16, row: u16) -> bool {
    column >= rect.x
        && column < rect.x + rect.width
        && row >= rect.y
        && row < rect.y + rect.height
}
