use notify::event::EventKind;
use notify::{Config, RecommendedWatcher, RecursiveMode, Watcher};
use std::path::{Path, PathBuf};
use std::sync::mpsc::{Receiver, channel};
use thiserror::Error;

#[derive(Clone, Debug)]
pub enum WatchSignal {
    Changed,
    Error(String),
}

/// Watches the open capture summary file so the engine can refetch when the
/// backend rewrites it.
#[derive(Debug)]
pub struct CaptureFileWatcher {
    _watcher: RecommendedWatcher,
    rx: Receiver<WatchSignal>,
}

impl CaptureFileWatcher {
    pub fn try_recv(&self) -> Option<WatchSignal> {
        self.rx.try_recv().ok()
    }
}

#[derive(Debug, Error)]
pub enum WatchCaptureFileError {
    #[error("watch error: {0}")]
    Notify(#[from] notify::Error),

    #[error("capture file has no parent directory: {0}")]
    NoParentDir(String),
}

pub fn watch_capture_file(path: &Path) -> Result<CaptureFileWatcher, WatchCaptureFileError> {
    let Some(parent) = path.parent() else {
        return Err(WatchCaptureFileError::NoParentDir(
            path.display().to_string(),
        ));
    };

    let (tx, rx) = channel::<WatchSignal>();
    let watched: PathBuf = path.to_path_buf();

    let mut watcher = RecommendedWatcher::new(
        move |res: notify::Result<notify::Event>| match res {
            Ok(event) => {
                if should_trigger_refetch(&event, &watched) {
                    let _ = tx.send(WatchSignal::Changed);
                }
            }
            Err(error) => {
                let _ = tx.send(WatchSignal::Error(error.to_string()));
            }
        },
        Config::default(),
    )?;

    // Watch the parent: exporters typically replace the file rather than
    // writing it in place.
    watcher.watch(parent, RecursiveMode::NonRecursive)?;

    Ok(CaptureFileWatcher {
        _watcher: watcher,
        rx,
    })
}

fn should_trigger_refetch(event: &notify::Event, watched: &Path) -> bool {
    if matches!(event.kind, EventKind::Access(_)) {
        return false;
    }
    if event.paths.is_empty() {
        return true;
    }

    event.paths.iter().any(|path| path == watched)
}
