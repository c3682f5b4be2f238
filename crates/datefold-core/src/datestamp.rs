//! Datestamp extraction from directory names.

use chrono::NaiveDate;
use compact_str::CompactString;
use regex::Regex;
use serde::{Deserialize, Serialize};

/// Year-month-day where the year is two or four digits and the month and day
/// are one or two.
const DATESTAMP_PATTERN: &str = r"(\d{4}|\d{2})-(\d{2}|\d)-(\d{2}|\d)";

/// Compiled datestamp matcher for directory names.
#[derive(Debug, Clone)]
pub struct DatePattern {
    regex: Regex,
}

impl DatePattern {
    /// Compile the datestamp pattern.
    pub fn new() -> Self {
        Self {
            regex: Regex::new(DATESTAMP_PATTERN).expect("datestamp pattern compiles"),
        }
    }

    /// The unique match of the datestamp pattern in `name`.
    ///
    /// Returns `None` when the pattern matches zero times or more than once:
    /// ambiguous names are excluded, not best-effort parsed.
    pub fn find_unique<'a>(&self, name: &'a str) -> Option<&'a str> {
        let mut matches = self.regex.find_iter(name);
        let first = matches.next()?;
        if matches.next().is_some() {
            return None;
        }
        Some(first.as_str())
    }

    /// Extract the embedded date from a directory name.
    ///
    /// A unique match that is not a real calendar date (month 13, day 40)
    /// counts as no match: the name is skipped, never fatal. Two-digit years
    /// parse as years 1 through 99.
    pub fn extract(&self, name: &str) -> Option<NaiveDate> {
        let text = self.find_unique(name)?;
        NaiveDate::parse_from_str(text, "%Y-%m-%d").ok()
    }
}

impl Default for DatePattern {
    fn default() -> Self {
        Self::new()
    }
}

/// A directory name paired with the date extracted from it.
///
/// Lives only as an intermediate value; the filesystem directory it names is
/// the real entity being moved.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DatedName {
    /// The extracted date.
    pub date: NaiveDate,
    /// The directory name the date came from.
    pub name: CompactString,
}

impl DatedName {
    /// Pair a name with its extracted date.
    pub fn new(date: NaiveDate, name: impl Into<CompactString>) -> Self {
        Self {
            date,
            name: name.into(),
        }
    }
}
