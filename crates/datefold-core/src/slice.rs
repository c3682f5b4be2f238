//! Contiguous inclusive date ranges.

use std::fmt;

use chrono::NaiveDate;
use compact_str::{CompactString, format_compact};
use serde::{Deserialize, Serialize};

use crate::error::CollapseError;

/// A contiguous inclusive date range assigned to exactly one granularity.
///
/// `start <= end` always holds; construction fails otherwise.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct CalendarSlice {
    start: NaiveDate,
    end: NaiveDate,
}

impl CalendarSlice {
    /// Create a slice covering `[start, end]`.
    pub fn new(start: NaiveDate, end: NaiveDate) -> Result<Self, CollapseError> {
        if start > end {
            return Err(CollapseError::InvalidSlice { start, end });
        }
        Ok(Self { start, end })
    }

    /// First date of the slice.
    pub fn start(&self) -> NaiveDate {
        self.start
    }

    /// Last date of the slice.
    pub fn end(&self) -> NaiveDate {
        self.end
    }

    /// True iff `start <= date <= end`.
    pub fn contains(&self, date: NaiveDate) -> bool {
        self.start <= date && date <= self.end
    }

    /// Days between start and end; zero for a single-day slice.
    pub fn days(&self) -> i64 {
        self.end.signed_duration_since(self.start).num_days()
    }

    /// Name of the destination directory absorbing this slice's members.
    pub fn destination_name(&self) -> CompactString {
        format_compact!("{}", self.end.format("%Y-%m-%d"))
    }
}

impl fmt::Display for CalendarSlice {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        // Spans of up to two days print as their start date only, the log
        // format the slicer tests speak.
        if self.days() < 2 {
            write!(f, "Slice({})", self.start.format("%Y-%m-%d"))
        } else {
            write!(
                f,
                "Slice({}, {})",
                self.start.format("%Y-%m-%d"),
                self.end.format("%Y-%m-%d")
            )
        }
    }
}
