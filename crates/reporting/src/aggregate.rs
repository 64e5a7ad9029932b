//! Grouped member counts for the report dashboards.

use member_audience::Predicate;
use member_core::MemberResult;
use member_registry::{GroupField, MemberStore, SelectOrder};
use serde::{Deserialize, Serialize};

/// The fixed demographic age bands, in report order. `Unknown` always
/// absorbs members without an age.
pub const AGE_BANDS: [&str; 7] = ["<20", "20-29", "30-39", "40-49", "50-59", "60+", "Unknown"];

/// One (label, count) pair in a grouped report.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AggregationBucket {
    pub label: String,
    pub count: u64,
}

/// Grouping dimension for an aggregation request.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum GroupBy {
    Region,
    IndustryType,
    Gender,
    Status,
    AgeBand,
}

impl GroupBy {
    /// Parse the wire value (`region`, `industryType`, ...).
    pub fn parse(raw: &str) -> Option<Self> {
        match raw {
            "region" => Some(GroupBy::Region),
            "industryType" => Some(GroupBy::IndustryType),
            "gender" => Some(GroupBy::Gender),
            "status" => Some(GroupBy::Status),
            "ageBand" => Some(GroupBy::AgeBand),
            _ => None,
        }
    }
}

/// Route an age into its band.
pub fn age_band(age: Option<u32>) -> &'static str {
    match age {
        None => "Unknown",
        Some(a) if a < 20 => "<20",
        Some(a) if a < 30 => "20-29",
        Some(a) if a < 40 => "30-39",
        Some(a) if a < 50 => "40-49",
        Some(a) if a < 60 => "50-59",
        Some(_) => "60+",
    }
}

/// Group members matching `pred` by the requested dimension.
///
/// Field grouping labels missing values `"Unknown"` and returns only
/// populated buckets; age-band grouping always returns all seven bands,
/// zero counts included. Callers fold any date range into the predicate
/// before calling.
pub fn aggregate(
    store: &dyn MemberStore,
    pred: &Predicate,
    group_by: GroupBy,
) -> MemberResult<Vec<AggregationBucket>> {
    let field = match group_by {
        GroupBy::Region => GroupField::Region,
        GroupBy::IndustryType => GroupField::IndustryType,
        GroupBy::Gender => GroupField::Gender,
        GroupBy::Status => GroupField::Status,
        GroupBy::AgeBand => return aggregate_age_bands(store, pred),
    };

    let rows = store.group_count(pred, field)?;
    Ok(rows
        .into_iter()
        .map(|row| AggregationBucket {
            label: row.value.unwrap_or_else(|| "Unknown".to_string()),
            count: row.count,
        })
        .collect())
}

/// Age bands need bucketing on our side: the band is derived, not a stored
/// field the store could group on.
fn aggregate_age_bands(
    store: &dyn MemberStore,
    pred: &Predicate,
) -> MemberResult<Vec<AggregationBucket>> {
    let members = store.select(pred, SelectOrder::IdAsc, 0, None)?;

    let mut counts = [0u64; AGE_BANDS.len()];
    for member in &members {
        let band = age_band(member.age);
        // Bands are exhaustive, so the lookup always hits.
        if let Some(idx) = AGE_BANDS.iter().position(|b| *b == band) {
            counts[idx] += 1;
        }
    }

    Ok(AGE_BANDS
        .iter()
        .zip(counts)
        .map(|(label, count)| AggregationBucket {
            label: (*label).to_string(),
            count,
        })
        .collect())
}

#[cfg(test)]
mod tests {
    use super::*;
    use member_registry::models::CreateMemberRequest;
    use member_registry::MemberRegistry;

    fn registry_with(rows: &[(Option<&str>, Option<u32>, &str)]) -> MemberRegistry {
        let registry = MemberRegistry::new();
        for (i, (region, age, status)) in rows.iter().enumerate() {
            registry.create_member(CreateMemberRequest {
                name: format!("Member {i}"),
                status: Some((*status).to_string()),
                gender: None,
                region: region.map(String::from),
                industry_type: None,
                age: *age,
                membership_date: None,
                national_id: None,
                company_license: None,
                email: None,
                phone: None,
            });
        }
        registry
    }

    #[test]
    fn region_grouping_buckets_missing_values_as_unknown() {
        let registry = registry_with(&[
            (Some("Kuching"), None, "ACTIVE"),
            (Some("Miri"), None, "INACTIVE"),
            (None, None, "ACTIVE"),
        ]);

        let mut buckets = aggregate(&registry, &Predicate::match_all(), GroupBy::Region).unwrap();
        buckets.sort_by(|a, b| a.label.cmp(&b.label));
        assert_eq!(
            buckets,
            vec![
                AggregationBucket { label: "Kuching".into(), count: 1 },
                AggregationBucket { label: "Miri".into(), count: 1 },
                AggregationBucket { label: "Unknown".into(), count: 1 },
            ]
        );
    }

    #[test]
    fn age_bands_are_always_complete_and_sum_to_total() {
        let registry = registry_with(&[
            (None, Some(19), "ACTIVE"),
            (None, Some(20), "ACTIVE"),
            (None, Some(29), "ACTIVE"),
            (None, Some(45), "ACTIVE"),
            (None, Some(60), "ACTIVE"),
            (None, None, "ACTIVE"),
        ]);

        let buckets = aggregate(&registry, &Predicate::match_all(), GroupBy::AgeBand).unwrap();
        assert_eq!(buckets.len(), 7);
        let labels: Vec<&str> = buckets.iter().map(|b| b.label.as_str()).collect();
        assert_eq!(labels, AGE_BANDS.to_vec());
        assert_eq!(buckets.iter().map(|b| b.count).sum::<u64>(), 6);
        assert_eq!(buckets[0].count, 1); // <20
        assert_eq!(buckets[1].count, 2); // 20-29
        assert_eq!(buckets[5].count, 1); // 60+
        assert_eq!(buckets[6].count, 1); // Unknown
    }

    #[test]
    fn age_bands_on_all_null_ages_route_to_unknown() {
        let registry = registry_with(&[(None, None, "ACTIVE"), (None, None, "ACTIVE")]);
        let buckets = aggregate(&registry, &Predicate::match_all(), GroupBy::AgeBand).unwrap();
        assert_eq!(buckets.len(), 7);
        assert_eq!(buckets[6].count, 2);
        assert!(buckets[..6].iter().all(|b| b.count == 0));
    }

    #[test]
    fn empty_match_set_is_not_an_error() {
        let registry = MemberRegistry::new();
        let empty = aggregate(&registry, &Predicate::match_all(), GroupBy::Gender).unwrap();
        assert!(empty.is_empty());

        let bands = aggregate(&registry, &Predicate::match_all(), GroupBy::AgeBand).unwrap();
        assert_eq!(bands.len(), 7);
        assert!(bands.iter().all(|b| b.count == 0));
    }

    #[test]
    fn status_grouping_uses_wire_labels() {
        let registry = registry_with(&[(None, None, "ACTIVE"), (None, None, "DECEASED")]);
        let mut buckets = aggregate(&registry, &Predicate::match_all(), GroupBy::Status).unwrap();
        buckets.sort_by(|a, b| a.label.cmp(&b.label));
        assert_eq!(buckets[0].label, "ACTIVE");
        assert_eq!(buckets[1].label, "DECEASED");
    }

    #[test]
    fn group_by_parses_wire_values() {
        assert_eq!(GroupBy::parse("industryType"), Some(GroupBy::IndustryType));
        assert_eq!(GroupBy::parse("ageBand"), Some(GroupBy::AgeBand));
        assert_eq!(GroupBy::parse("IndustryType"), None);
        assert_eq!(GroupBy::parse(""), None);
    }
}
