//! Error and warning types for slicing and collapsing.

use std::path::PathBuf;

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Errors that can occur while slicing or collapsing.
#[derive(Debug, Error)]
pub enum CollapseError {
    /// A merge source or the collapse root does not exist.
    #[error("Path not found: {path}")]
    NotFound { path: PathBuf },

    /// The destination (or the collapse root) is not a directory.
    #[error("Not a directory: {path}")]
    NotADirectory { path: PathBuf },

    /// No directory name yielded an extractable date.
    #[error("No datestamped directories to collapse")]
    EmptyInput,

    /// A slice was constructed with `start` after `end`.
    #[error("Invalid slice: start {start} is after end {end}")]
    InvalidSlice { start: NaiveDate, end: NaiveDate },

    /// The slicer was asked for a range with `oldest` after `newest`.
    #[error("Invalid date range: oldest {oldest} is after newest {newest}")]
    InvalidRange { newest: NaiveDate, oldest: NaiveDate },

    /// The assignment walk left dated directories outside every slice.
    #[error("{unassigned} dated directories fell outside every slice")]
    SliceCoverage { unassigned: usize },

    /// Generic I/O error.
    #[error("I/O error at {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

impl CollapseError {
    /// Create an I/O error with path context.
    pub fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        let path = path.into();
        match source.kind() {
            std::io::ErrorKind::NotFound => Self::NotFound { path },
            _ => Self::Io { path, source },
        }
    }
}

/// Kind of collapse warning.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum WarningKind {
    /// Directory name carried zero or several datestamps.
    UndatedName,
    /// Entry dated later than the reference date under a fixed anchor.
    FutureDated,
    /// Same-named file at both source and destination; source entry skipped.
    EntryCollision,
}

/// Non-fatal, reportable condition met while planning or merging.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CollapseWarning {
    /// Path (or bare directory name) the warning concerns.
    pub path: PathBuf,
    /// Human-readable message.
    pub message: String,
    /// Kind of warning.
    pub kind: WarningKind,
}

impl CollapseWarning {
    /// Create a new collapse warning.
    pub fn new(path: impl Into<PathBuf>, message: impl Into<String>, kind: WarningKind) -> Self {
        Self {
            path: path.into(),
            message: message.into(),
            kind,
        }
    }

    /// Create an undated-name warning.
    pub fn undated_name(name: &str) -> Self {
        Self {
            path: PathBuf::from(name),
            message: format!("No unique datestamp in \"{name}\""),
            kind: WarningKind::UndatedName,
        }
    }

    /// Create a future-dated warning.
    pub fn future_dated(name: &str, date: NaiveDate) -> Self {
        Self {
            path: PathBuf::from(name),
            message: format!("\"{name}\" is dated {date}, after the reference date"),
            kind: WarningKind::FutureDated,
        }
    }

    /// Create an entry-collision warning.
    pub fn entry_collision(path: impl Into<PathBuf>) -> Self {
        let path = path.into();
        Self {
            message: format!("Skipped (exists at destination): {}", path.display()),
            path,
            kind: WarningKind::EntryCollision,
        }
    }
}
