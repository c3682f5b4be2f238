//! Collapse plans, merge actions and reports.

use std::fmt;
use std::path::PathBuf;

use compact_str::CompactString;
use serde::{Deserialize, Serialize};

use datefold_core::{CalendarSlice, CollapseWarning, WarningKind};

/// One destination directory and the sources that collapse into it.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SliceBucket {
    /// Destination directory name, the slice's end date as `YYYY-MM-DD`.
    pub destination: CompactString,
    /// The date range this bucket covers.
    pub slice: CalendarSlice,
    /// Source directory names inside the slice, newest first.
    pub members: Vec<CompactString>,
}

impl SliceBucket {
    /// Members that actually have to move (name differs from the destination).
    pub fn pending_members(&self) -> impl Iterator<Item = &CompactString> + '_ {
        self.members.iter().filter(|m| **m != self.destination)
    }
}

/// The full assignment: every dated directory mapped to exactly one bucket.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CollapsePlan {
    /// Non-empty buckets, newest first.
    pub buckets: Vec<SliceBucket>,
    /// Names dropped or flagged while planning.
    pub warnings: Vec<CollapseWarning>,
}

impl CollapsePlan {
    /// Number of directories that would move.
    pub fn move_count(&self) -> usize {
        self.buckets.iter().map(|b| b.pending_members().count()).sum()
    }

    /// True when every member already sits in its destination.
    pub fn is_noop(&self) -> bool {
        self.move_count() == 0
    }
}

/// A single observable filesystem mutation performed (or planned) by a merge.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum MergeAction {
    /// Atomically rename `source` to `destination`.
    Rename {
        source: PathBuf,
        destination: PathBuf,
    },
    /// Recursively remove an emptied source directory.
    RemoveDir { path: PathBuf },
    /// Remove a leftover source file.
    RemoveFile { path: PathBuf },
}

impl MergeAction {
    /// Create a rename action.
    pub fn rename(source: impl Into<PathBuf>, destination: impl Into<PathBuf>) -> Self {
        Self::Rename {
            source: source.into(),
            destination: destination.into(),
        }
    }

    /// Create a directory removal action.
    pub fn remove_dir(path: impl Into<PathBuf>) -> Self {
        Self::RemoveDir { path: path.into() }
    }

    /// Create a file removal action.
    pub fn remove_file(path: impl Into<PathBuf>) -> Self {
        Self::RemoveFile { path: path.into() }
    }
}

impl fmt::Display for MergeAction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Rename {
                source,
                destination,
            } => write!(f, "rename \"{}\" -> \"{}\"", source.display(), destination.display()),
            Self::RemoveDir { path } => write!(f, "remove directory \"{}\"", path.display()),
            Self::RemoveFile { path } => write!(f, "remove file \"{}\"", path.display()),
        }
    }
}

/// What a collapse run did, or in pretend mode would have done.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct MergeReport {
    /// Actions in execution order.
    pub actions: Vec<MergeAction>,
    /// Collisions and skipped names.
    pub warnings: Vec<CollapseWarning>,
    /// True when the filesystem was left untouched.
    pub pretend: bool,
}

impl MergeReport {
    /// Create an empty report.
    pub fn new(pretend: bool) -> Self {
        Self {
            pretend,
            ..Default::default()
        }
    }

    /// Number of renames performed or planned.
    pub fn renames(&self) -> usize {
        self.actions
            .iter()
            .filter(|a| matches!(a, MergeAction::Rename { .. }))
            .count()
    }

    /// Number of source removals performed or planned.
    pub fn removals(&self) -> usize {
        self.actions
            .iter()
            .filter(|a| matches!(a, MergeAction::RemoveDir { .. } | MergeAction::RemoveFile { .. }))
            .count()
    }

    /// Number of entries skipped because the destination already had them.
    pub fn skips(&self) -> usize {
        self.warnings
            .iter()
            .filter(|w| w.kind == WarningKind::EntryCollision)
            .count()
    }
}

#[cfg(test)]
mod tests {
    use chrono::NaiveDate;

    use super::*;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    fn bucket() -> SliceBucket {
        SliceBucket {
            destination: "2017-12-31".into(),
            slice: CalendarSlice::new(date(2017, 1, 1), date(2017, 12, 31)).unwrap(),
            members: vec!["2017-12-31".into(), "2017-12-04".into(), "2017-12-03".into()],
        }
    }

    #[test]
    fn test_pending_members_skip_the_destination() {
        let bucket = bucket();
        let pending: Vec<&str> = bucket.pending_members().map(|m| m.as_str()).collect();
        assert_eq!(pending, vec!["2017-12-04", "2017-12-03"]);
    }

    #[test]
    fn test_plan_move_count() {
        let plan = CollapsePlan {
            buckets: vec![bucket()],
            warnings: vec![],
        };
        assert_eq!(plan.move_count(), 2);
        assert!(!plan.is_noop());
    }

    #[test]
    fn test_action_display() {
        let action = MergeAction::rename("2017-12-04", "2017-12-31");
        assert_eq!(action.to_string(), "rename \"2017-12-04\" -> \"2017-12-31\"");
        let action = MergeAction::remove_dir("2017-12-03");
        assert_eq!(action.to_string(), "remove directory \"2017-12-03\"");
    }

    #[test]
    fn test_report_counters() {
        let mut report = MergeReport::new(false);
        report.actions.push(MergeAction::rename("a", "b"));
        report.actions.push(MergeAction::rename("c", "b"));
        report.actions.push(MergeAction::remove_dir("a"));
        report
            .warnings
            .push(CollapseWarning::entry_collision("a/x.txt"));

        assert_eq!(report.renames(), 2);
        assert_eq!(report.removals(), 1);
        assert_eq!(report.skips(), 1);
    }
}
