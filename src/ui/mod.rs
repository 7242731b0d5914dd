use crate::app::{
    AppModel, CaptureView, CapturesView, PromptKind, ROWS_PER_TRACK, View, capture_layout,
};
use crate::domain::{CAPTURE_VIEWS, OVERVIEW_METRIC, TimelineTrack};
use crate::infra::ColorProvider;
use humansize::{DECIMAL, format_size};
use ratatui::prelude::*;
use ratatui::widgets::*;
use std::time::SystemTime;
use time::OffsetDateTime;
use time::format_description::well_known::Rfc3339;
use unicode_width::UnicodeWidthStr;

pub fn render(frame: &mut Frame, model: &AppModel, colors: &mut ColorProvider) {
    let area = frame.area();
    if area.width == 0 || area.height == 0 {
        return;
    }

    match &model.view {
        View::Captures(view) => render_captures(frame, area, model, view),
        View::Capture(view) => render_capture(frame, area, model, view, colors),
    }
}

fn render_captures(frame: &mut Frame, area: Rect, model: &AppModel, view: &CapturesView) {
    render_title_bar(
        frame,
        area,
        &format!(" capscope  {} ", model.captures_dir.display()),
        model.notice.as_deref(),
    );

    let body = Rect {
        x: area.x,
        y: area.y.saturating_add(1),
        width: area.width,
        height: area.height.saturating_sub(2),
    };

    let items = model
        .captures
        .iter()
        .map(|entry| {
            let size = format_size(entry.file_size_bytes, DECIMAL);
            let modified = entry
                .file_modified
                .map(format_system_time)
                .unwrap_or_default();
            ListItem::new(Line::from(vec![
                Span::styled(entry.name.clone(), Style::default().fg(Color::White)),
                Span::raw("  "),
                Span::styled(size, Style::default().fg(Color::Gray)),
                Span::raw("  "),
                Span::styled(modified, Style::default().fg(Color::DarkGray)),
            ]))
        })
        .collect::<Vec<_>>();

    let mut state = ListState::default();
    if !model.captures.is_empty() {
        state.select(Some(view.selected.min(model.captures.len() - 1)));
    }

    let list = List::new(items)
        .block(
            Block::default()
                .borders(Borders::ALL)
                .title(format!(" Captures ({}) ", model.captures.len())),
        )
        .highlight_style(Style::default().bg(Color::DarkGray).fg(Color::White))
        .highlight_symbol("> ");
    frame.render_stateful_widget(list, body, &mut state);

    render_footer(
        frame,
        area,
        " Enter open   Ctrl+R rescan   q quit ",
    );
}

fn render_capture(
    frame: &mut Frame,
    area: Rect,
    model: &AppModel,
    view: &CaptureView,
    colors: &mut ColorProvider,
) {
    let layout = capture_layout(area.width, area.height);

    render_title_bar(
        frame,
        layout.title,
        &format!(" capscope  {} ", view.entry.name),
        model.notice.as_deref(),
    );
    render_metrics_panel(frame, layout.metrics, view);
    render_header(frame, layout.header, view);

    let tracks = view
        .engine
        .tracks(|name| colors.get_color(name, OVERVIEW_METRIC));
    render_tracks(frame, layout.tracks, &tracks);

    if let Some(prompt) = &view.prompt {
        let label = match prompt.kind {
            PromptKind::Filter => "filter",
            PromptKind::Search => "search",
        };
        render_footer(frame, area, &format!(" {label}> {}_", prompt.editor.text));
    } else {
        render_footer(
            frame,
            area,
            " Space toggle   x remove   f filter   / search   v view   d drill   z zoom   r reset   ←/→ hover   Esc back ",
        );
    }
}

fn render_metrics_panel(frame: &mut Frame, area: Rect, view: &CaptureView) {
    if area.width == 0 || area.height == 0 {
        return;
    }

    let requested = &view.history.current().metric_timelines;
    let names = view.available_metric_names();

    let items = names
        .iter()
        .map(|name| {
            let marker = if requested.contains(name) { "*" } else { " " };
            ListItem::new(format!("{marker} {name}"))
        })
        .collect::<Vec<_>>();

    let mut state = ListState::default();
    if !names.is_empty() {
        state.select(Some(view.metric_cursor.min(names.len() - 1)));
    }

    let list = List::new(items)
        .block(Block::default().borders(Borders::ALL).title(" Metrics "))
        .highlight_style(Style::default().bg(Color::DarkGray).fg(Color::White))
        .highlight_symbol("> ");
    frame.render_stateful_widget(list, area, &mut state);
}

fn render_header(frame: &mut Frame, area: Rect, view: &CaptureView) {
    if area.width == 0 || area.height == 0 {
        return;
    }

    let window_line = match (
        view.engine.capture_time_window(),
        view.engine.selected_time_window(),
    ) {
        (Some(capture), Some(selected)) if view.engine.has_selection() => format!(
            "window {}  selection {} – {}",
            format_duration_ns(capture.duration_ns()),
            format_duration_ns(selected.from_ns - capture.from_ns),
            format_duration_ns(selected.to_ns - capture.from_ns),
        ),
        (Some(capture), _) => format!(
            "window {} (full)",
            format_duration_ns(capture.duration_ns())
        ),
        _ => "window loading…".to_string(),
    };

    let params = view.history.current();
    let current_view = CAPTURE_VIEWS
        .get(view.view_index)
        .map(|descriptor| descriptor.label)
        .unwrap_or("Overview");
    let mut status_line = format!("view {current_view}");
    if let Some(filter) = &view.live_filter {
        status_line.push_str(&format!("  filter {filter}"));
    }
    if let Some(search) = &view.live_search {
        status_line.push_str(&format!("  search {search}"));
    }
    if let Some(drilldown) = &params.drilldown {
        status_line.push_str(&format!("  drilldown {drilldown}"));
    }
    if view.engine.hover_timestamp().is_some() {
        status_line.push_str(&format!(
            "  hover +{}",
            format_duration_ns(view.engine.hover_relative_ns())
        ));
    }

    let paragraph = Paragraph::new(vec![
        Line::from(Span::styled(window_line, Style::default().fg(Color::White))),
        Line::from(Span::styled(status_line, Style::default().fg(Color::Gray))),
    ]);
    frame.render_widget(paragraph, area);
}

fn render_tracks(frame: &mut Frame, area: Rect, tracks: &[TimelineTrack<'_>]) {
    if area.width == 0 || area.height == 0 {
        return;
    }

    let block = Block::default()
        .borders(Borders::ALL)
        .title(" Timelines ");
    let inner = block.inner(area);
    frame.render_widget(block, area);

    if tracks.is_empty() {
        let hint = Paragraph::new("No timelines. Space on a metric adds one.")
            .style(Style::default().fg(Color::DarkGray));
        frame.render_widget(hint, inner);
        return;
    }

    for (index, track) in tracks.iter().enumerate() {
        let y = inner.y + index as u16 * ROWS_PER_TRACK;
        if y >= inner.y + inner.height {
            break;
        }
        let label_area = Rect::new(inner.x, y, inner.width, 1);
        let spark_height = ROWS_PER_TRACK
            .saturating_sub(1)
            .min((inner.y + inner.height).saturating_sub(y + 1));
        let spark_area = Rect::new(inner.x, y + 1, inner.width, spark_height);

        let mut label_spans = vec![
            Span::styled("▌", Style::default().fg(track.color)),
            Span::styled(track.name.to_string(), Style::default().fg(Color::White)),
        ];
        match (&track.hover_sample, track.is_resolved()) {
            (Some(sample), _) => label_spans.push(Span::styled(
                format!("  {:.2}", sample.value),
                Style::default().fg(track.color),
            )),
            (None, false) => label_spans.push(Span::styled(
                "  loading…",
                Style::default().fg(Color::DarkGray),
            )),
            (None, true) => {}
        }
        frame.render_widget(Paragraph::new(Line::from(label_spans)), label_area);

        if spark_height == 0 {
            continue;
        }
        if let Some(series) = track.series {
            let data = scale_for_sparkline(series.time_series.iter().map(|sample| sample.value));
            let sparkline = Sparkline::default()
                .data(&data)
                .style(Style::default().fg(track.color));
            frame.render_widget(sparkline, spark_area);
        }
    }
}

fn render_title_bar(frame: &mut Frame, area: Rect, title: &str, notice: Option<&str>) {
    let bar = Rect {
        x: area.x,
        y: area.y,
        width: area.width,
        height: 1,
    };

    let base_style = Style::default().fg(Color::White).bg(Color::DarkGray);
    let mut spans = vec![Span::styled(
        title.to_string(),
        base_style.add_modifier(Modifier::BOLD),
    )];
    if let Some(notice) = notice {
        spans.push(Span::styled(
            format!(" {notice} "),
            Style::default().fg(Color::Yellow).bg(Color::DarkGray),
        ));
    }

    let used = spans
        .iter()
        .map(|span| UnicodeWidthStr::width(span.content.as_ref()))
        .sum::<usize>();
    let remaining = (bar.width as usize).saturating_sub(used);
    spans.push(Span::styled(" ".repeat(remaining), base_style));

    frame.render_widget(Paragraph::new(Line::from(spans)).style(base_style), bar);
}

fn render_footer(frame: &mut Frame, area: Rect, text: &str) {
    if area.height == 0 {
        return;
    }
    let footer = Rect {
        x: area.x,
        y: area.y + area.height - 1,
        width: area.width,
        height: 1,
    };
    frame.render_widget(
        Paragraph::new(text).style(Style::default().fg(Color::Gray).bg(Color::Black)),
        footer,
    );
}

/// Sparkline wants u64 buckets; scale the series into 0..=100 relative to its
/// own maximum.
fn scale_for_sparkline(values: impl Iterator<Item = f64>) -> Vec<u64> {
    let values = values.collect::<Vec<_>>();
    let max = values.iter().copied().fold(0.0f64, f64::max);
    if max <= 0.0 {
        return vec![0; values.len()];
    }
    values
        .iter()
        .map(|&value| ((value.max(0.0) / max) * 100.0).round() as u64)
        .collect()
}

fn format_system_time(time: SystemTime) -> String {
    let datetime = OffsetDateTime::from(time);
    datetime
        .format(&Rfc3339)
        .unwrap_or_else(|_| String::new())
}

/// "1.234s" style rendering of a nanosecond span.
pub fn format_duration_ns(duration_ns: i64) -> String {
    let seconds = duration_ns as f64 / 1e9;
    format!("{seconds:.3}s")
}
