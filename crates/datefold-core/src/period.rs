//! Calendar granularities and their boundary predicates.

use chrono::{Datelike, NaiveDate, Weekday};
use serde::{Deserialize, Serialize};
use strum::{Display, EnumIter};

/// A slicing granularity, ordered from finest to coarsest.
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    PartialOrd,
    Ord,
    Hash,
    Display,
    EnumIter,
    Serialize,
    Deserialize,
)]
pub enum Period {
    /// A single calendar day.
    Day,
    /// A week ending on Saturday.
    Week,
    /// A calendar month.
    Month,
    /// A calendar year.
    Year,
}

impl Period {
    /// The next coarser granularity; `Year` is terminal.
    pub fn next(self) -> Period {
        match self {
            Period::Day => Period::Week,
            Period::Week => Period::Month,
            Period::Month => Period::Year,
            Period::Year => Period::Year,
        }
    }

    /// True iff `date` is the last day of the period instance containing it.
    pub fn is_largest_in_period(self, date: NaiveDate) -> bool {
        match self {
            Period::Day => true,
            Period::Week => date.weekday() == Weekday::Sat,
            Period::Month => is_last_day_of_month(date),
            Period::Year => date.month() == 12 && date.day() == 31,
        }
    }

    /// True iff `date` ends an instance of the next coarser period.
    ///
    /// Always false for `Year`: a year period never ends into anything coarser.
    pub fn is_start_of_next(self, date: NaiveDate) -> bool {
        if self == Period::Year {
            return false;
        }
        self.next().is_largest_in_period(date)
    }
}

/// True iff `date` is the last calendar day of its month.
pub fn is_last_day_of_month(date: NaiveDate) -> bool {
    date.succ_opt().map_or(true, |next| next.month() != date.month())
}
