//! The member store contract consumed by reporting and blast.
//!
//! Deliberately narrow: conjunctive filtering, counts, grouped counts, and
//! ordered limited selection are the only capabilities the engines need.
//! The trait is the injection seam; production would back it with SQL,
//! tests and development use [`crate::MemberRegistry`].

use member_audience::Predicate;
use member_core::contact::ContactChannel;
use member_core::types::{Member, RecipientSummary};
use member_core::MemberResult;

/// Groupable member fields for field-value aggregation. Age-band grouping is
/// derived in the reporting layer, not here.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GroupField {
    Region,
    IndustryType,
    Gender,
    Status,
}

/// Orderings the store must support for row selection.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SelectOrder {
    /// Newest records first; used for samples and listings.
    CreatedDesc,
    /// Stable id order; used for full recipient resolution.
    IdAsc,
}

/// One grouped-count row. `value: None` covers members with no value (or an
/// empty one) in the grouped field.
#[derive(Debug, Clone, PartialEq)]
pub struct GroupRow {
    pub value: Option<String>,
    pub count: u64,
}

pub trait MemberStore: Send + Sync {
    /// Count members matching the predicate.
    fn count(&self, pred: &Predicate) -> MemberResult<u64>;

    /// Count matching members whose effective contact value carries the
    /// channel's heuristic signal. Contact fallback rules live behind the
    /// store so every caller counts the same way.
    fn count_contactable(&self, pred: &Predicate, channel: ContactChannel) -> MemberResult<u64>;

    /// Grouped counts over a member field. Row order must be stable for
    /// identical input; callers re-sort when they need a particular order.
    fn group_count(&self, pred: &Predicate, field: GroupField) -> MemberResult<Vec<GroupRow>>;

    /// Ordered, limited selection of matching members.
    fn select(
        &self,
        pred: &Predicate,
        order: SelectOrder,
        offset: usize,
        limit: Option<usize>,
    ) -> MemberResult<Vec<Member>>;

    /// Like [`MemberStore::select`], reduced to recipient shape with the
    /// contact fallback applied and missing values as empty strings.
    fn recipients(
        &self,
        pred: &Predicate,
        order: SelectOrder,
        offset: usize,
        limit: Option<usize>,
    ) -> MemberResult<Vec<RecipientSummary>>;
}
