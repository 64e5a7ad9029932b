//! Predicate compilation and evaluation.
//!
//! `Predicate::build` is the validation edge: it trims and normalizes a
//! `FilterSpec`, dropping whatever does not parse instead of erroring, so a
//! stale query string can never take a report endpoint down.

use chrono::NaiveDate;
use member_core::types::{Member, MemberStatus};

use crate::filter::{parse_age_bound, FilterSpec};

/// The compiled, store-queryable form of a `FilterSpec`: a conjunction of
/// per-dimension constraints. Empty vectors and `None` bounds mean the
/// dimension is unconstrained; the empty conjunction matches everything.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Predicate {
    status: Vec<MemberStatus>,
    gender: Vec<String>,
    region: Vec<String>,
    industry_type: Vec<String>,
    age_min: Option<i64>,
    age_max: Option<i64>,
    joined: Option<(NaiveDate, NaiveDate)>,
}

fn trimmed_non_empty(values: Option<&Vec<String>>) -> Vec<String> {
    values
        .map(|vs| {
            vs.iter()
                .map(|v| v.trim().to_string())
                .filter(|v| !v.is_empty())
                .collect()
        })
        .unwrap_or_default()
}

impl Predicate {
    /// Compile a filter specification. Pure: identical input always yields a
    /// semantically identical predicate.
    pub fn build(spec: &FilterSpec) -> Self {
        // Status is the one enum-validated dimension; unrecognized values
        // are dropped, not rejected.
        let status = spec
            .status
            .iter()
            .flatten()
            .filter_map(|s| MemberStatus::parse(s))
            .collect();

        Self {
            status,
            gender: trimmed_non_empty(spec.gender.as_ref()),
            region: trimmed_non_empty(spec.region.as_ref()),
            industry_type: trimmed_non_empty(spec.industry_type.as_ref()),
            age_min: spec.age_min.as_ref().and_then(parse_age_bound),
            age_max: spec.age_max.as_ref().and_then(parse_age_bound),
            joined: None,
        }
    }

    /// The empty conjunction.
    pub fn match_all() -> Self {
        Self::default()
    }

    /// Constrain the membership date to `[from, to]` inclusive. Used by the
    /// reporting layer; members without a membership date fall outside any
    /// window.
    pub fn joined_between(mut self, from: NaiveDate, to: NaiveDate) -> Self {
        self.joined = Some((from, to));
        self
    }

    /// Evaluate the conjunction against one member record.
    pub fn matches(&self, member: &Member) -> bool {
        if !self.status.is_empty() && !self.status.contains(&member.status) {
            return false;
        }
        if !in_set(&self.gender, member.gender.as_deref()) {
            return false;
        }
        if !in_set(&self.region, member.region.as_deref()) {
            return false;
        }
        if !in_set(&self.industry_type, member.industry_type.as_deref()) {
            return false;
        }
        if self.age_min.is_some() || self.age_max.is_some() {
            let Some(age) = member.age else { return false };
            let age = i64::from(age);
            if self.age_min.is_some_and(|min| age < min) {
                return false;
            }
            if self.age_max.is_some_and(|max| age > max) {
                return false;
            }
        }
        if let Some((from, to)) = self.joined {
            let Some(joined) = member.membership_date else {
                return false;
            };
            if joined < from || joined > to {
                return false;
            }
        }
        true
    }
}

/// Set-membership test for a free-text dimension. An unconstrained set
/// passes everything; a constrained set excludes records with no value,
/// mirroring SQL `IN` null semantics.
fn in_set(set: &[String], value: Option<&str>) -> bool {
    if set.is_empty() {
        return true;
    }
    match value {
        Some(v) => set.iter().any(|s| s == v),
        None => false,
    }
}
