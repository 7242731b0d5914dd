mod app;
mod cli;
mod domain;
mod infra;
mod ui;

use crate::app::{AppCommand, AppEvent, AppModel, CaptureView, View};
use crate::cli::CliInvocation;
use crate::infra::{
    CaptureFileWatcher, ColorProvider, ScanError, SettleDebounce, SummarySignal, UserTracking,
    WatchSignal, capture_entry_for_file, resolve_captures_dir, scan_captures_dir,
    spawn_summary_fetch, watch_capture_file,
};
use crossterm::event::{
    self, DisableMouseCapture, EnableMouseCapture, Event, KeyEventKind,
};
use crossterm::terminal::size as terminal_size;
use crossterm::terminal::{
    EnterAlternateScreen, LeaveAlternateScreen, disable_raw_mode, enable_raw_mode,
};
use crossterm::{ExecutableCommand, execute};
use ratatui::Terminal;
use ratatui::backend::CrosstermBackend;
use std::io::{self, Stdout, Write};
use std::path::PathBuf;
use std::sync::mpsc::channel;
use std::time::{Duration, Instant};
use thiserror::Error;

#[derive(Debug, Error)]
enum MainError {
    #[error(transparent)]
    App(#[from] crate::app::AppError),

    #[error(transparent)]
    Cli(#[from] crate::cli::CliRunError),
}

fn main() {
    if let Err(error) = run_main() {
        let mut err = io::stderr().lock();
        let _ = writeln!(err, "{error}");
        std::process::exit(1);
    }
}

fn run_main() -> Result<(), MainError> {
    let args = std::env::args().collect::<Vec<_>>();
    let invocation = match crate::cli::parse_invocation(&args) {
        Ok(invocation) => invocation,
        Err(error) => {
            let mut err = io::stderr().lock();
            let _ = writeln!(err, "{error}");
            let _ = writeln!(err);
            print_help();
            std::process::exit(2);
        }
    };

    match invocation {
        CliInvocation::PrintHelp => {
            print_help();
            Ok(())
        }
        CliInvocation::PrintVersion => {
            let mut out = io::stdout().lock();
            let _ = writeln!(out, "{}", env!("CARGO_PKG_VERSION"));
            Ok(())
        }
        CliInvocation::Tui { path } => Ok(run_tui(path)?),
        CliInvocation::Command(command) => {
            crate::cli::run(command)?;
            Ok(())
        }
    }
}

fn print_help() {
    let text = format!(
        "{name} — browse capture summaries as metric timelines\n\nUSAGE:\n  {name}                                  Start the TUI on the captures dir\n  {name} <capture.capsum.json>            Open one capture summary in the TUI\n  {name} info <capture.capsum.json>       Print the capture time window and metric names\n  {name} metrics <capture.capsum.json>    Print per-metric min/mean/max as TSV\n  {name} --help | --version\n\nMETRICS FLAGS:\n  --width N, -w N    Timeline width in pixels the sample count is derived from (default: 420)\n  --filter F, -f F   Event filter recorded with the fetch\n\nENV:\n  CAPSCOPE_CAPTURES_DIR  Override the captures dir (default: ~/.capscope/captures)\n",
        name = env!("CARGO_PKG_NAME")
    );
    let mut out = io::stdout().lock();
    let _ = write!(out, "{text}");
}

fn run_tui(path: Option<PathBuf>) -> Result<(), crate::app::AppError> {
    let captures_dir = resolve_captures_dir()?;
    let mut model = match scan_captures_dir(&captures_dir) {
        Ok(output) => {
            AppModel::new(captures_dir, output.captures).with_warnings(output.warnings)
        }
        Err(error @ ScanError::CapturesDirMissing(_)) => {
            AppModel::new(captures_dir, Vec::new()).with_notice(Some(error.to_string()))
        }
    };

    if let Some(path) = path {
        match capture_entry_for_file(&path) {
            Ok(entry) => {
                model.view = View::Capture(CaptureView::new(entry));
            }
            Err(error) => {
                model = model.with_notice(Some(format!(
                    "Failed to open {}: {error}",
                    path.display()
                )));
            }
        }
    }

    let mut terminal = setup_terminal()?;
    if let Ok((width, height)) = terminal_size() {
        model = model.with_terminal_size(width, height);
    }
    app::relayout(&mut model);
    let result = run(&mut terminal, model);
    restore_terminal(&mut terminal)?;
    result
}

fn setup_terminal() -> Result<Terminal<CrosstermBackend<Stdout>>, app::AppError> {
    enable_raw_mode()?;
    let mut stdout = io::stdout();
    stdout.execute(EnterAlternateScreen)?;
    let _ = stdout.execute(EnableMouseCapture);
    let backend = CrosstermBackend::new(stdout);
    Ok(Terminal::new(backend)?)
}

fn restore_terminal(
    terminal: &mut Terminal<CrosstermBackend<Stdout>>,
) -> Result<(), app::AppError> {
    disable_raw_mode()?;
    let _ = execute!(terminal.backend_mut(), DisableMouseCapture);
    execute!(terminal.backend_mut(), LeaveAlternateScreen)?;
    terminal.show_cursor()?;
    Ok(())
}

fn run(
    terminal: &mut Terminal<CrosstermBackend<Stdout>>,
    mut model: AppModel,
) -> Result<(), app::AppError> {
    let (summary_tx, summary_rx) = channel::<SummarySignal>();
    let mut colors = ColorProvider::new();
    let mut tracking = UserTracking::new();

    // Resize events arrive in bursts while the terminal is being dragged;
    // the engine only sees the width once a burst settles.
    let mut resize_debounce =
        SettleDebounce::new(Duration::from_millis(250), Duration::from_secs(2));

    let mut capture_watcher: Option<CaptureFileWatcher> = None;
    let mut capture_watcher_path: Option<PathBuf> = None;
    let mut refetch_debounce =
        SettleDebounce::new(Duration::from_millis(450), Duration::from_secs(3));

    loop {
        ensure_capture_watcher(&model, &mut capture_watcher, &mut capture_watcher_path);

        if let Some(watcher) = &capture_watcher {
            while let Some(signal) = watcher.try_recv() {
                match signal {
                    WatchSignal::Changed => {
                        refetch_debounce.note_change(Instant::now());
                    }
                    WatchSignal::Error(message) => {
                        model.notice = Some(format!("Capture watcher error: {message}"));
                    }
                }
            }
        }

        if refetch_debounce.take_settled(Instant::now()) {
            if let View::Capture(view) = &mut model.view {
                view.engine.invalidate();
                model.notice = Some("Capture file changed, reloading.".to_string());
            }
        }

        if resize_debounce.take_settled(Instant::now()) {
            app::relayout(&mut model);
        }

        while let Ok(signal) = summary_rx.try_recv() {
            app::apply_summary_signal(&mut model, signal);
        }

        if let Some(key) = app::wanted_fetch(&mut model) {
            spawn_summary_fetch(key, None, summary_tx.clone());
        }

        terminal.draw(|frame| ui::render(frame, &model, &mut colors))?;

        if event::poll(Duration::from_millis(50))? {
            match event::read()? {
                Event::Key(key) => {
                    if key.kind == KeyEventKind::Release {
                        continue;
                    }
                    let (next, command) = app::update(model, AppEvent::Key(key));
                    model = next;
                    match command {
                        AppCommand::None => {}
                        AppCommand::Quit => return Ok(()),
                        AppCommand::Rescan => {
                            match scan_captures_dir(&model.captures_dir) {
                                Ok(output) => {
                                    model.captures = output.captures;
                                    model.warnings = output.warnings;
                                    model.notice = Some("Rescanned.".to_string());
                                }
                                Err(error) => {
                                    model.notice = Some(error.to_string());
                                }
                            }
                        }
                        AppCommand::OpenCapture { entry } => {
                            model.view = View::Capture(CaptureView::new(entry));
                            app::relayout(&mut model);
                        }
                        AppCommand::Track { events } => {
                            for event in events {
                                tracking.action(event);
                            }
                        }
                    }
                }
                Event::Mouse(mouse) => {
                    let (next, command) = app::update(model, AppEvent::Mouse(mouse));
                    model = next;
                    match command {
                        AppCommand::Track { events } => {
                            for event in events {
                                tracking.action(event);
                            }
                        }
                        _ => {}
                    }
                }
                Event::Resize(width, height) => {
                    model = model.with_terminal_size(width, height);
                    resize_debounce.note_change(Instant::now());
                }
                _ => {}
            }
        }
    }
}

/// Keeps the file watcher pointed at the capture that is open, if any.
fn ensure_capture_watcher(
    model: &AppModel,
    watcher: &mut Option<CaptureFileWatcher>,
    watcher_path: &mut Option<PathBuf>,
) {
    let wanted = match &model.view {
        View::Capture(view) => Some(view.entry.path.clone()),
        View::Captures(_) => None,
    };

    if *watcher_path == wanted {
        return;
    }

    *watcher = None;
    *watcher_path = None;

    if let Some(path) = wanted {
        if let Ok(new_watcher) = watch_capture_file(&path) {
            *watcher = Some(new_watcher);
        }
        // Watch errors leave auto-refresh off; Ctrl+R still reloads.
        *watcher_path = Some(path);
    }
}
