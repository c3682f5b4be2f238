//! The calendar-slicing state machine.

use chrono::NaiveDate;
use derive_builder::Builder;
use itertools::Itertools;
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::error::CollapseError;
use crate::period::Period;
use crate::slice::CalendarSlice;

/// Minimum slice counts per granularity before the walk may coarsen.
#[derive(Debug, Clone, Builder, Serialize, Deserialize)]
#[builder(setter(into))]
pub struct SliceConfig {
    /// Daily slices to record before weekly slicing may begin.
    #[builder(default = "7")]
    #[serde(default = "default_min_days")]
    pub min_days: usize,

    /// Weekly slices to record before monthly slicing may begin.
    #[builder(default = "4")]
    #[serde(default = "default_min_weeks")]
    pub min_weeks: usize,

    /// Monthly slices to record before yearly slicing begins.
    #[builder(default = "12")]
    #[serde(default = "default_min_months")]
    pub min_months: usize,
}

fn default_min_days() -> usize {
    7
}

fn default_min_weeks() -> usize {
    4
}

fn default_min_months() -> usize {
    12
}

impl SliceConfig {
    /// Create a new slice config builder.
    pub fn builder() -> SliceConfigBuilder {
        SliceConfigBuilder::default()
    }

    /// Slices required at `period` before the walk may promote out of it.
    fn minimum_for(&self, period: Period) -> usize {
        match period {
            Period::Day => self.min_days,
            Period::Week => self.min_weeks,
            Period::Month => self.min_months,
            // Year is terminal and never promotes.
            Period::Year => usize::MAX,
        }
    }
}

impl Default for SliceConfig {
    fn default() -> Self {
        Self {
            min_days: default_min_days(),
            min_weeks: default_min_weeks(),
            min_months: default_min_months(),
        }
    }
}

/// Break `[oldest, newest]` into an ordered, gap-free sequence of slices,
/// newest first.
///
/// The walk starts with one slice per day, then widens to weekly, monthly
/// and finally yearly slices. A granularity only widens on a natural
/// boundary of the next coarser one (a Saturday, a month end, a year end)
/// and only once its configured minimum has been met, so the slice count at
/// each granularity rounds up to the next boundary but never falls short of
/// the minimum. Beyond `min_months` the output stays yearly indefinitely.
pub fn calendar_slices(
    newest: NaiveDate,
    oldest: NaiveDate,
    config: &SliceConfig,
) -> Result<Vec<CalendarSlice>, CollapseError> {
    if oldest > newest {
        return Err(CollapseError::InvalidRange { newest, oldest });
    }

    debug!(%newest, %oldest, ?config, "computing calendar slices");

    let mut boundaries: Vec<NaiveDate> = Vec::new();
    let mut period = Period::Day;
    let mut slices_in_period = 0usize;

    let mut cursor = Some(newest);
    while let Some(date) = cursor {
        if date < oldest {
            break;
        }

        let largest_in_period = period.is_largest_in_period(date);
        let starts_next = period.is_start_of_next(date);

        if largest_in_period || starts_next {
            boundaries.push(date);
            slices_in_period += 1;
        }

        if starts_next && slices_in_period >= config.minimum_for(period) {
            debug!(%date, from = %period, to = %period.next(), "widening granularity");
            period = period.next();
            slices_in_period = 0;
        }

        cursor = date.pred_opt();
    }

    // Sentinel closes the oldest date into the final slice even when no
    // natural boundary lands on it.
    boundaries.push(oldest.pred_opt().unwrap_or(NaiveDate::MIN));

    let mut slices = Vec::with_capacity(boundaries.len().saturating_sub(1));
    for (newer, older) in boundaries.iter().tuple_windows() {
        let start = older.succ_opt().unwrap_or(*older);
        let slice = CalendarSlice::new(start, *newer)?;
        debug!(%slice, "slice");
        slices.push(slice);
    }

    Ok(slices)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn test_config_defaults() {
        let config = SliceConfig::default();
        assert_eq!(config.min_days, 7);
        assert_eq!(config.min_weeks, 4);
        assert_eq!(config.min_months, 12);
    }

    #[test]
    fn test_config_builder() {
        let config = SliceConfig::builder()
            .min_days(3usize)
            .min_weeks(2usize)
            .build()
            .unwrap();
        assert_eq!(config.min_days, 3);
        assert_eq!(config.min_weeks, 2);
        assert_eq!(config.min_months, 12);
    }

    #[test]
    fn test_equal_dates_yield_one_single_day_slice() {
        let d = date(2021, 6, 23);
        let slices = calendar_slices(d, d, &SliceConfig::default()).unwrap();
        assert_eq!(slices.len(), 1);
        assert_eq!(slices[0].start(), d);
        assert_eq!(slices[0].end(), d);
    }

    #[test]
    fn test_backwards_range_is_rejected() {
        let err = calendar_slices(date(2021, 6, 1), date(2021, 6, 2), &SliceConfig::default())
            .unwrap_err();
        assert!(matches!(err, CollapseError::InvalidRange { .. }));
    }

    #[test]
    fn test_sub_week_range_stays_daily() {
        let newest = date(2021, 6, 23);
        let oldest = date(2021, 6, 19);
        let slices = calendar_slices(newest, oldest, &SliceConfig::default()).unwrap();
        assert_eq!(slices.len(), 5);
        for slice in &slices {
            assert_eq!(slice.start(), slice.end());
        }
        assert_eq!(slices[0].end(), newest);
        assert_eq!(slices[4].start(), oldest);
    }

    #[test]
    fn test_minimum_one_day_absorbs_newest_saturday_into_a_week() {
        // With min_days = 1 the walk widens at the first Saturday it sees;
        // a Saturday anchor therefore produces no daily slices at all.
        let config = SliceConfig::builder()
            .min_days(1usize)
            .min_weeks(1usize)
            .min_months(1usize)
            .build()
            .unwrap();
        let slices: Vec<String> = calendar_slices(date(2021, 6, 19), date(2021, 5, 1), &config)
            .unwrap()
            .iter()
            .map(|s| s.to_string())
            .collect();
        let expected = vec![
            "Slice(2021-06-13, 2021-06-19)",
            "Slice(2021-06-06, 2021-06-12)",
            "Slice(2021-06-01, 2021-06-05)",
            "Slice(2021-05-01, 2021-05-31)",
        ];
        assert_eq!(slices, expected);
    }
}
