use crate::domain::CaptureFileEntry;
use dirs::home_dir;
use std::path::{Path, PathBuf};
use thiserror::Error;
use walkdir::WalkDir;

/// Capture summaries are pre-digested JSON files with this suffix.
pub const CAPTURE_SUMMARY_SUFFIX: &str = ".capsum.json";

#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub struct ScanWarningCount(usize);

impl From<usize> for ScanWarningCount {
    fn from(value: usize) -> Self {
        Self(value)
    }
}

impl ScanWarningCount {
    pub fn get(&self) -> usize {
        self.0
    }
}

#[derive(Debug, Error)]
pub enum ScanError {
    #[error("captures directory does not exist: {0}")]
    CapturesDirMissing(String),
}

#[derive(Debug, Error)]
pub enum ResolveCapturesDirError {
    #[error("home directory not found")]
    HomeDirNotFound,
}

pub fn resolve_captures_dir() -> Result<PathBuf, ResolveCapturesDirError> {
    if let Some(override_dir) = std::env::var_os("CAPSCOPE_CAPTURES_DIR") {
        return Ok(PathBuf::from(override_dir));
    }

    let Some(home) = home_dir() else {
        return Err(ResolveCapturesDirError::HomeDirNotFound);
    };

    Ok(home.join(".capscope").join("captures"))
}

#[derive(Clone, Debug)]
pub struct ScanOutput {
    pub captures: Vec<CaptureFileEntry>,
    pub warnings: ScanWarningCount,
}

/// Walks the captures directory and lists summary files, newest first.
pub fn scan_captures_dir(captures_dir: &Path) -> Result<ScanOutput, ScanError> {
    if !captures_dir.exists() {
        return Err(ScanError::CapturesDirMissing(
            captures_dir.display().to_string(),
        ));
    }

    let mut warnings = 0usize;
    let mut captures: Vec<CaptureFileEntry> = Vec::new();

    let walker = WalkDir::new(captures_dir).follow_links(false).into_iter();
    for entry in walker {
        let entry = match entry {
            Ok(entry) => entry,
            Err(_error) => {
                warnings += 1;
                continue;
            }
        };

        if !entry.file_type().is_file() {
            continue;
        }

        let Some(file_name) = entry.file_name().to_str() else {
            warnings += 1;
            continue;
        };
        if !file_name.ends_with(CAPTURE_SUMMARY_SUFFIX) {
            continue;
        }

        let metadata = match entry.metadata() {
            Ok(metadata) => metadata,
            Err(_error) => {
                warnings += 1;
                continue;
            }
        };

        let name = file_name
            .strip_suffix(CAPTURE_SUMMARY_SUFFIX)
            .unwrap_or(file_name)
            .to_string();

        captures.push(CaptureFileEntry {
            path: entry.path().to_path_buf(),
            name,
            file_size_bytes: metadata.len(),
            file_modified: metadata.modified().ok(),
        });
    }

    captures.sort_by(|a, b| {
        b.file_modified
            .cmp(&a.file_modified)
            .then_with(|| a.name.cmp(&b.name))
    });

    Ok(ScanOutput {
        captures,
        warnings: ScanWarningCount::from(warnings),
    })
}

pub fn capture_entry_for_file(path: &Path) -> std::io::Result<CaptureFileEntry> {
    let metadata = std::fs::metadata(path)?;
    let file_name = path
        .file_name()
        .and_then(|name| name.to_str())
        .unwrap_or("capture");
    let name = file_name
        .strip_suffix(CAPTURE_SUMMARY_SUFFIX)
        .unwrap_or(file_name)
        .to_string();

    Ok(CaptureFileEntry {
        path: path.to_path_buf(),
        name,
        file_size_bytes: metadata.len(),
        file_modified: metadata.modified().ok(),
    })
}
