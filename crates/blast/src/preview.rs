//! Audience sizing and recipient resolution.

use member_audience::Predicate;
use member_core::contact::ContactChannel;
use member_core::types::RecipientSummary;
use member_core::MemberResult;
use member_registry::{MemberStore, SelectOrder};
use serde::Serialize;

pub const DEFAULT_SAMPLE_SIZE: usize = 50;
pub const DEFAULT_RESOLVE_TAKE: usize = 1000;
pub const MAX_RESOLVE_TAKE: usize = 5000;

/// What a blast would reach: total matches, heuristic contactable counts,
/// and a capped sample of recipients.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct BlastPreview {
    pub total: u64,
    pub with_email: u64,
    pub with_whats_app: u64,
    pub sample: Vec<RecipientSummary>,
}

/// Size an audience before sending. Issues up to four independent store
/// reads; the store gives no transactional isolation across them, so counts
/// may drift slightly from the sample. That drift is benign and accepted.
pub fn preview(
    store: &dyn MemberStore,
    pred: &Predicate,
    sample_size: usize,
) -> MemberResult<BlastPreview> {
    let total = store.count(pred)?;
    let with_email = store.count_contactable(pred, ContactChannel::Email)?;
    let with_whats_app = store.count_contactable(pred, ContactChannel::WhatsApp)?;
    let sample = store.recipients(pred, SelectOrder::CreatedDesc, 0, Some(sample_size))?;

    Ok(BlastPreview {
        total,
        with_email,
        with_whats_app,
        sample,
    })
}

/// Resolve the full recipient list for dispatch, in stable id order.
/// `take` is clamped to [`MAX_RESOLVE_TAKE`].
pub fn resolve(
    store: &dyn MemberStore,
    pred: &Predicate,
    skip: usize,
    take: usize,
) -> MemberResult<Vec<RecipientSummary>> {
    let take = take.min(MAX_RESOLVE_TAKE);
    store.recipients(pred, SelectOrder::IdAsc, skip, Some(take))
}

#[cfg(test)]
mod tests {
    use super::*;
    use member_registry::models::CreateMemberRequest;
    use member_registry::MemberRegistry;

    fn add(registry: &MemberRegistry, name: &str, email: Option<&str>, phone: Option<&str>) {
        registry.create_member(CreateMemberRequest {
            name: name.into(),
            status: Some("ACTIVE".into()),
            gender: None,
            region: None,
            industry_type: None,
            age: None,
            membership_date: None,
            national_id: None,
            company_license: None,
            email: email.map(String::from),
            phone: phone.map(String::from),
        });
    }

    #[test]
    fn preview_counts_contact_signals_heuristically() {
        let registry = MemberRegistry::new();
        add(&registry, "both", Some("a@b.my"), Some("+60123334455"));
        add(&registry, "email only", Some("c@d.my"), Some("082-445566"));
        add(&registry, "phone only", Some("no email here"), Some("0199887766"));
        add(&registry, "neither", None, None);

        let p = preview(&registry, &Predicate::match_all(), DEFAULT_SAMPLE_SIZE).unwrap();
        assert_eq!(p.total, 4);
        assert_eq!(p.with_email, 2);
        assert_eq!(p.with_whats_app, 2);
        assert!(p.with_email <= p.total);
        assert!(p.with_whats_app <= p.total);
        assert_eq!(p.sample.len(), 4);
    }

    #[test]
    fn contactless_members_still_count_toward_total() {
        let registry = MemberRegistry::new();
        add(&registry, "ghost", None, None);

        let p = preview(&registry, &Predicate::match_all(), DEFAULT_SAMPLE_SIZE).unwrap();
        assert_eq!(p.total, 1);
        assert_eq!(p.with_email, 0);
        assert_eq!(p.with_whats_app, 0);
        assert_eq!(p.sample[0].email, "");
        assert_eq!(p.sample[0].phone, "");
    }

    #[test]
    fn sample_is_capped() {
        let registry = MemberRegistry::new();
        for i in 0..6 {
            add(&registry, &format!("m{i}"), None, None);
        }
        let p = preview(&registry, &Predicate::match_all(), 3).unwrap();
        assert_eq!(p.total, 6);
        assert_eq!(p.sample.len(), 3);
    }

    #[test]
    fn preview_serializes_expected_wire_keys() {
        let registry = MemberRegistry::new();
        let p = preview(&registry, &Predicate::match_all(), 1).unwrap();
        let json = serde_json::to_value(&p).unwrap();
        assert!(json.get("withEmail").is_some());
        assert!(json.get("withWhatsApp").is_some());
        assert!(json.get("sample").unwrap().is_array());
    }

    #[test]
    fn resolve_clamps_take_and_pages() {
        let registry = MemberRegistry::new();
        for i in 0..10 {
            add(&registry, &format!("m{i}"), None, None);
        }
        let all = resolve(&registry, &Predicate::match_all(), 0, usize::MAX).unwrap();
        assert_eq!(all.len(), 10);

        let page = resolve(&registry, &Predicate::match_all(), 8, 5).unwrap();
        assert_eq!(page.len(), 2);
        assert_eq!(page[0].id, all[8].id);
    }
}
