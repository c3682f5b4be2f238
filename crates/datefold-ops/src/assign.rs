//! Assignment of dated directory names to calendar slices.

use tracing::debug;

use datefold_core::{
    AnchorPolicy, CollapseConfig, CollapseError, CollapseWarning, DatePattern, DatedName,
    calendar_slices,
};

use crate::plan::{CollapsePlan, SliceBucket};

/// Assign every datestamped name to exactly one calendar slice.
///
/// Names without a unique, valid datestamp are dropped with a warning.
/// Slices span from the oldest extracted date up to the anchor, which is the
/// configured reference date extended (or not, per [`AnchorPolicy`]) by
/// future-dated entries. The assignment itself is a single descending
/// merge-join pass: both the slices and the sorted names run newest to
/// oldest, so no slice is revisited and no name lands in two buckets.
pub fn assign<S: AsRef<str>>(
    names: &[S],
    pattern: &DatePattern,
    config: &CollapseConfig,
) -> Result<CollapsePlan, CollapseError> {
    let mut warnings = Vec::new();
    let mut dated: Vec<DatedName> = Vec::new();

    for name in names {
        let name = name.as_ref();
        match pattern.extract(name) {
            Some(date) => dated.push(DatedName::new(date, name)),
            None => {
                debug!(name, "no unique datestamp; skipping");
                warnings.push(CollapseWarning::undated_name(name));
            }
        }
    }

    let mut newest = config.reference_date;
    match config.anchor {
        AnchorPolicy::NewestEntry => {
            if let Some(max) = dated.iter().map(|d| d.date).max() {
                if max > newest {
                    debug!(%max, reference = %config.reference_date, "future-dated entry extends the anchor");
                    newest = max;
                }
            }
        }
        AnchorPolicy::ReferenceDate => {
            dated.retain(|d| {
                if d.date > newest {
                    warnings.push(CollapseWarning::future_dated(d.name.as_str(), d.date));
                    false
                } else {
                    true
                }
            });
        }
    }

    let oldest = match dated.iter().map(|d| d.date).min() {
        Some(date) => date,
        None => return Err(CollapseError::EmptyInput),
    };

    let slices = calendar_slices(newest, oldest, &config.slice)?;
    debug!(slices = slices.len(), directories = dated.len(), "assigning directories to slices");

    // Stable sort keeps input order for equal dates.
    dated.sort_by(|a, b| b.date.cmp(&a.date));

    let mut pairs = dated.into_iter().peekable();
    let mut buckets = Vec::new();
    for slice in &slices {
        let mut members: Vec<DatedName> = Vec::new();
        while let Some(dated_name) = pairs.next_if(|d| slice.contains(d.date)) {
            debug!(name = %dated_name.name, date = %dated_name.date, %slice, "assigned");
            members.push(dated_name);
        }
        if members.is_empty() {
            continue;
        }
        debug_assert!(
            members.windows(2).all(|w| w[0].date >= w[1].date),
            "bucket members must stay newest-first"
        );
        buckets.push(SliceBucket {
            destination: slice.destination_name(),
            slice: *slice,
            members: members.into_iter().map(|d| d.name).collect(),
        });
    }

    // Both sequences are monotonically descending and the anchor bounds the
    // newest date, so the cursor must drain.
    let unassigned = pairs.count();
    if unassigned > 0 {
        return Err(CollapseError::SliceCoverage { unassigned });
    }

    Ok(CollapsePlan { buckets, warnings })
}

#[cfg(test)]
mod tests {
    use chrono::NaiveDate;
    use datefold_core::WarningKind;

    use super::*;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    fn config(reference: NaiveDate) -> CollapseConfig {
        CollapseConfig::builder().reference_date(reference).build().unwrap()
    }

    fn flatten(plan: &CollapsePlan) -> Vec<String> {
        let mut out = Vec::new();
        for bucket in &plan.buckets {
            out.push(format!("Collapse in {}", bucket.destination));
            for member in &bucket.members {
                out.push(member.to_string());
            }
        }
        out
    }

    #[test]
    fn test_assignment_matches_reference_buckets() {
        let names = ["2021-06-23", "2021-6-22", "2017-12-04", "2017-12-03"];
        let plan = assign(&names, &DatePattern::new(), &config(date(2021, 6, 23))).unwrap();

        let expected = vec![
            "Collapse in 2021-06-23",
            "2021-06-23",
            "Collapse in 2021-06-22",
            "2021-6-22",
            "Collapse in 2017-12-31",
            "2017-12-04",
            "2017-12-03",
        ];
        assert_eq!(flatten(&plan), expected);
        assert!(plan.warnings.is_empty());
        assert_eq!(plan.move_count(), 3);
    }

    #[test]
    fn test_ambiguous_names_are_excluded_entirely() {
        let names = ["2021-2-4 2021-02-01", "2021-06-23", "notes"];
        let plan = assign(&names, &DatePattern::new(), &config(date(2021, 6, 23))).unwrap();

        assert_eq!(plan.buckets.len(), 1);
        assert_eq!(plan.buckets[0].members, vec!["2021-06-23"]);
        assert_eq!(plan.warnings.len(), 2);
        assert!(plan.warnings.iter().all(|w| w.kind == WarningKind::UndatedName));
    }

    #[test]
    fn test_future_dated_entry_extends_the_anchor() {
        let names = ["2021-06-25", "2021-06-20"];
        let plan = assign(&names, &DatePattern::new(), &config(date(2021, 6, 23))).unwrap();

        assert_eq!(plan.buckets.len(), 2);
        assert_eq!(plan.buckets[0].destination, "2021-06-25");
        assert_eq!(plan.buckets[1].destination, "2021-06-20");
        assert!(plan.warnings.is_empty());
    }

    #[test]
    fn test_fixed_anchor_drops_future_dated_entries() {
        let cfg = CollapseConfig::builder()
            .reference_date(date(2021, 6, 23))
            .anchor(AnchorPolicy::ReferenceDate)
            .build()
            .unwrap();
        let names = ["2021-06-25", "2021-06-20"];
        let plan = assign(&names, &DatePattern::new(), &cfg).unwrap();

        assert_eq!(plan.buckets.len(), 1);
        assert_eq!(plan.buckets[0].members, vec!["2021-06-20"]);
        assert_eq!(plan.warnings.len(), 1);
        assert_eq!(plan.warnings[0].kind, WarningKind::FutureDated);
    }

    #[test]
    fn test_no_dated_names_is_an_error() {
        let err = assign(&["notes", "latest"], &DatePattern::new(), &config(date(2021, 6, 23)))
            .unwrap_err();
        assert!(matches!(err, CollapseError::EmptyInput));

        let err = assign::<&str>(&[], &DatePattern::new(), &config(date(2021, 6, 23))).unwrap_err();
        assert!(matches!(err, CollapseError::EmptyInput));
    }

    #[test]
    fn test_same_date_names_share_a_bucket_in_input_order() {
        let names = ["a-2021-06-23", "b-2021-6-23"];
        let plan = assign(&names, &DatePattern::new(), &config(date(2021, 6, 23))).unwrap();

        assert_eq!(plan.buckets.len(), 1);
        assert_eq!(plan.buckets[0].members, vec!["a-2021-06-23", "b-2021-6-23"]);
    }

    #[test]
    fn test_already_collapsed_names_are_a_noop() {
        let names = ["2021-06-23", "2021-06-22", "2017-12-31"];
        let plan = assign(&names, &DatePattern::new(), &config(date(2021, 6, 23))).unwrap();
        assert!(plan.is_noop());
    }
}
