//! Property-based tests for the filter/sort/aggregate engine.

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use proptest::prelude::*;

    use crate::domain::{Campaign, CampaignStatus, SearchCriteria};
    use crate::filter::{FieldFilter, FilterSpec, Predicate, filter};
    use crate::record::{FieldKind, Summarize};
    use crate::sort::{SortDirection, SortKey, sort_records};
    use crate::time::parse_timestamp;

    fn campaign(index: usize, podcasts: u32, status: usize, day: i64) -> Campaign {
        let status = CampaignStatus::ALL_VARIANTS[status % CampaignStatus::ALL_VARIANTS.len()];
        Campaign {
            id: format!("c{index}"),
            name: format!("Campaign {index}"),
            search_criteria: SearchCriteria::default(),
            podcasts_found: podcasts,
            high_value_count: 0,
            outreach_sent: podcasts / 2,
            responses_received: 0,
            bookings_confirmed: podcasts / 4,
            status,
            created_at: Some(base() + chrono::Duration::days(day)),
        }
    }

    fn base() -> chrono::DateTime<chrono::Utc> {
        parse_timestamp("2025-01-01T00:00:00Z").unwrap()
    }

    fn campaigns() -> impl Strategy<Value = Vec<Campaign>> {
        prop::collection::vec((0u32..50, 0usize..4, 0i64..60), 0..40).prop_map(|rows| {
            rows.into_iter().enumerate().map(|(i, (p, s, d))| campaign(i, p, s, d)).collect()
        })
    }

    fn ids(records: &[&Campaign]) -> Vec<String> {
        records.iter().map(|c| c.id.clone()).collect()
    }

    proptest! {
        #[test]
        fn sentinel_spec_is_identity(records in campaigns()) {
            let spec = FilterSpec::new()
                .set("status", Predicate::Any)
                .set("podcasts_found", Predicate::Any);
            let kept = filter(&records, &spec);
            let expected: Vec<String> = records.iter().map(|c| c.id.clone()).collect();
            prop_assert_eq!(ids(&kept), expected);
        }

        #[test]
        fn threshold_partitions_records(records in campaigns(), threshold in 0u32..50) {
            let spec = FilterSpec::new().set("podcasts_found", Predicate::AtLeast(f64::from(threshold)));
            let kept = filter(&records, &spec);
            prop_assert!(kept.iter().all(|c| c.podcasts_found >= threshold));
            let dropped = records.iter().filter(|c| c.podcasts_found < threshold).count();
            prop_assert_eq!(kept.len() + dropped, records.len());
        }

        #[test]
        fn ceiling_partitions_records(records in campaigns(), ceiling in 0u32..50) {
            let spec = FilterSpec::new().set("podcasts_found", Predicate::AtMost(f64::from(ceiling)));
            let kept = filter(&records, &spec);
            prop_assert!(kept.iter().all(|c| c.podcasts_found <= ceiling));
            let dropped = records.iter().filter(|c| c.podcasts_found > ceiling).count();
            prop_assert_eq!(kept.len() + dropped, records.len());
        }

        #[test]
        fn range_equals_floor_and_ceiling(records in campaigns(), a in 0u32..50, b in 0u32..50) {
            let (low, high) = (a.min(b), a.max(b));
            let now = base();
            let selected = Predicate::from_selection(FieldKind::Number, "podcasts_found", &format!("{low}..{high}"), now)
                .unwrap();
            prop_assert_eq!(&selected, &Predicate::Between(f64::from(low), f64::from(high)));
            let ranged = filter(&records, &FilterSpec::new().set("podcasts_found", selected));
            let both = FilterSpec::new()
                .and(FieldFilter::new("podcasts_found", Predicate::AtLeast(f64::from(low))))
                .and(FieldFilter::new("podcasts_found", Predicate::AtMost(f64::from(high))));
            prop_assert_eq!(ids(&ranged), ids(&filter(&records, &both)));
        }

        #[test]
        fn absolute_date_range_keeps_exactly_the_days_inside(
            records in campaigns(),
            a in 0i64..60,
            b in 0i64..60,
        ) {
            let (first, last) = (a.min(b), a.max(b));
            let day = |n: i64| (base() + chrono::Duration::days(n)).format("%Y-%m-%d").to_string();
            let raw = format!("{}..{}", day(first), day(last));
            let predicate = Predicate::from_selection(FieldKind::Time, "created_at", &raw, base()).unwrap();
            let kept = filter(&records, &FilterSpec::new().set("created_at", predicate));
            let expected: Vec<String> = records
                .iter()
                .filter(|c| {
                    let offset = (c.created_at.unwrap() - base()).num_days();
                    (first..=last).contains(&offset)
                })
                .map(|c| c.id.clone())
                .collect();
            prop_assert_eq!(ids(&kept), expected);
        }

        #[test]
        fn ascending_sort_is_stable(records in campaigns()) {
            let mut sorted: Vec<&Campaign> = records.iter().collect();
            sort_records(&mut sorted, SortKey::Podcasts, SortDirection::Ascending);
            for pair in sorted.windows(2) {
                prop_assert!(pair[0].podcasts_found <= pair[1].podcasts_found);
                if pair[0].podcasts_found == pair[1].podcasts_found {
                    let a: usize = pair[0].id[1..].parse().unwrap();
                    let b: usize = pair[1].id[1..].parse().unwrap();
                    prop_assert!(a < b);
                }
            }
        }

        #[test]
        fn sort_is_idempotent(records in campaigns()) {
            let mut once: Vec<&Campaign> = records.iter().collect();
            sort_records(&mut once, SortKey::Podcasts, SortDirection::Descending);
            let mut twice = once.clone();
            sort_records(&mut twice, SortKey::Podcasts, SortDirection::Descending);
            prop_assert_eq!(ids(&once), ids(&twice));
        }

        #[test]
        fn sort_is_stable(records in campaigns()) {
            let mut sorted: Vec<&Campaign> = records.iter().collect();
            sort_records(&mut sorted, SortKey::Podcasts, SortDirection::Descending);
            for pair in sorted.windows(2) {
                prop_assert!(pair[0].podcasts_found >= pair[1].podcasts_found);
                if pair[0].podcasts_found == pair[1].podcasts_found {
                    let a: usize = pair[0].id[1..].parse().unwrap();
                    let b: usize = pair[1].id[1..].parse().unwrap();
                    prop_assert!(a < b);
                }
            }
        }

        #[test]
        fn filter_never_mutates_input(records in campaigns(), threshold in 0u32..50) {
            let before = records.clone();
            let spec = FilterSpec::new().set("podcasts_found", Predicate::AtLeast(f64::from(threshold)));
            let _ = filter(&records, &spec);
            prop_assert_eq!(before, records);
        }

        #[test]
        fn stats_counts_are_bounded(records in campaigns()) {
            let now = parse_timestamp("2025-06-01").unwrap();
            let stats = Campaign::aggregate(&records, now);
            prop_assert_eq!(stats.all, records.len());
            prop_assert!(stats.active + stats.paused + stats.completed <= stats.all);
            for c in &records {
                prop_assert!(c.booking_rate() <= 100);
            }
        }
    }
}
