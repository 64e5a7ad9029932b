//! In-memory member registry backed by DashMap.
//!
//! Production: replace with PostgreSQL (sqlx) or similar ACID store. This
//! provides the same API surface for development and testing.

use chrono::{NaiveDate, Utc};
use dashmap::DashMap;
use member_audience::Predicate;
use member_core::contact::{self, ContactChannel};
use member_core::types::{Activity, Member, MemberStatus, RecipientSummary, Registration};
use member_core::MemberResult;
use tracing::info;
use uuid::Uuid;

use crate::models::{CreateMemberRequest, UpdateMemberRequest};
use crate::store::{GroupField, GroupRow, MemberStore, SelectOrder};

/// Thread-safe in-memory store for members, registrations, and activities.
pub struct MemberRegistry {
    pub(crate) members: DashMap<Uuid, Member>,
    pub(crate) registrations: DashMap<Uuid, Registration>,
    pub(crate) activities: DashMap<Uuid, Activity>,
}

impl MemberRegistry {
    /// An empty registry.
    pub fn new() -> Self {
        Self {
            members: DashMap::new(),
            registrations: DashMap::new(),
            activities: DashMap::new(),
        }
    }

    /// A registry pre-populated with demo members for development.
    pub fn with_demo_data() -> Self {
        let registry = Self::new();
        registry.seed_demo_data();
        info!(members = registry.members.len(), "Member registry seeded (in-memory, development mode)");
        registry
    }

    // ─── Members ───────────────────────────────────────────────────────────

    pub fn list_members(&self) -> Vec<Member> {
        let mut members: Vec<Member> = self.members.iter().map(|r| r.value().clone()).collect();
        members.sort_by(|a, b| b.created_at.cmp(&a.created_at).then(a.id.cmp(&b.id)));
        members
    }

    pub fn recent_members(&self, take: usize) -> Vec<Member> {
        let mut members = self.list_members();
        members.truncate(take);
        members
    }

    pub fn member_count(&self) -> u64 {
        self.members.len() as u64
    }

    pub fn get_member(&self, id: Uuid) -> Option<Member> {
        self.members.get(&id).map(|r| r.value().clone())
    }

    pub fn create_member(&self, req: CreateMemberRequest) -> Member {
        let now = Utc::now();
        let member = Member {
            id: Uuid::new_v4(),
            name: req.name,
            status: req
                .status
                .as_deref()
                .and_then(MemberStatus::parse)
                .unwrap_or(MemberStatus::Active),
            gender: req.gender,
            region: req.region,
            industry_type: req.industry_type,
            age: req.age,
            membership_date: req.membership_date,
            national_id: req.national_id,
            company_license: req.company_license,
            email: req.email,
            phone: req.phone,
            created_at: now,
            updated_at: now,
        };
        self.members.insert(member.id, member.clone());
        member
    }

    pub fn update_member(&self, id: Uuid, req: UpdateMemberRequest) -> Option<Member> {
        self.members.get_mut(&id).map(|mut entry| {
            let m = entry.value_mut();
            if let Some(name) = req.name {
                m.name = name;
            }
            if let Some(status) = req.status.as_deref().and_then(MemberStatus::parse) {
                m.status = status;
            }
            if let Some(gender) = req.gender {
                m.gender = Some(gender);
            }
            if let Some(region) = req.region {
                m.region = Some(region);
            }
            if let Some(industry) = req.industry_type {
                m.industry_type = Some(industry);
            }
            if let Some(age) = req.age {
                m.age = Some(age);
            }
            if let Some(date) = req.membership_date {
                m.membership_date = Some(date);
            }
            if let Some(national_id) = req.national_id {
                m.national_id = Some(national_id);
            }
            if let Some(license) = req.company_license {
                m.company_license = Some(license);
            }
            if let Some(email) = req.email {
                m.email = Some(email);
            }
            if let Some(phone) = req.phone {
                m.phone = Some(phone);
            }
            m.updated_at = Utc::now();
            m.clone()
        })
    }

    pub fn delete_member(&self, id: Uuid) -> bool {
        self.members.remove(&id).is_some()
    }

    /// Insert a fully formed member, used by the approval workflow.
    pub(crate) fn insert_member(&self, member: Member) {
        self.members.insert(member.id, member);
    }

    // ─── Contact fallback ──────────────────────────────────────────────────

    /// A member's effective email: its own field, else the email on a linked
    /// registration. Empty strings count as absent.
    fn effective_email(&self, member: &Member) -> Option<String> {
        non_empty(member.email.as_deref())
            .map(String::from)
            .or_else(|| {
                self.registration_for(member.id)
                    .and_then(|r| non_empty(r.email.as_deref()).map(String::from))
            })
    }

    /// A member's effective phone, with the same registration fallback.
    fn effective_phone(&self, member: &Member) -> Option<String> {
        non_empty(member.phone.as_deref())
            .map(String::from)
            .or_else(|| {
                self.registration_for(member.id)
                    .and_then(|r| non_empty(r.phone.as_deref()).map(String::from))
            })
    }

    fn registration_for(&self, member_id: Uuid) -> Option<Registration> {
        self.registrations
            .iter()
            .find(|r| r.value().member_id == Some(member_id))
            .map(|r| r.value().clone())
    }

    fn matching(&self, pred: &Predicate) -> Vec<Member> {
        self.members
            .iter()
            .filter(|r| pred.matches(r.value()))
            .map(|r| r.value().clone())
            .collect()
    }

    // ─── Demo data ─────────────────────────────────────────────────────────

    fn seed_demo_data(&self) {
        let rows: [(
            &str,
            MemberStatus,
            Option<&str>,
            Option<&str>,
            Option<&str>,
            Option<u32>,
            Option<(i32, u32, u32)>,
            Option<&str>,
            Option<&str>,
        ); 10] = [
            ("Wong Construction Sdn Bhd", MemberStatus::Active, Some("M"), Some("Kuching"), Some("Construction"), Some(45), Some((2019, 3, 12)), Some("wong@wongcon.my"), Some("+60128811223")),
            ("Lim Timber Works", MemberStatus::Active, Some("M"), Some("Sibu"), Some("Timber"), Some(52), Some((2020, 7, 1)), Some("lim@limtimber.my"), Some("0198822334")),
            ("Aina Engineering", MemberStatus::Active, Some("F"), Some("Miri"), Some("Oil & Gas"), Some(38), Some((2021, 1, 20)), Some("aina@ainaeng.my"), Some("+60135566778")),
            ("Borneo Earthworks", MemberStatus::Inactive, Some("M"), Some("Bintulu"), Some("Construction"), Some(61), Some((2018, 11, 5)), None, Some("086-334455")),
            ("Siti Interiors", MemberStatus::Active, Some("F"), Some("Kuching"), Some("Manufacturing"), Some(29), Some((2023, 5, 9)), Some("siti@sitiinteriors.my"), Some("0172233445")),
            ("Empire Piling", MemberStatus::Active, None, Some("Miri"), Some("Construction"), Some(47), Some((2022, 9, 30)), Some("admin empire dot my"), None),
            ("Rajang Dredging", MemberStatus::Deceased, Some("M"), Some("Sibu"), None, Some(74), Some((2015, 2, 14)), None, None),
            ("Hii & Sons", MemberStatus::Active, Some("M"), None, Some("Timber"), None, Some((2024, 4, 2)), Some("office@hiisons.my"), Some("+6084221100")),
            ("Dayang Services", MemberStatus::Inactive, Some("F"), Some("Bintulu"), Some("Oil & Gas"), Some(33), None, Some("dayang@dyservices.my"), Some("0111992233")),
            ("Santubong Builders", MemberStatus::Active, None, Some("Kuching"), Some("Construction"), Some(19), Some((2025, 1, 8)), None, Some("082-556677")),
        ];

        let now = Utc::now();
        for (i, (name, status, gender, region, industry, age, joined, email, phone)) in
            rows.into_iter().enumerate()
        {
            let member = Member {
                id: Uuid::new_v4(),
                name: name.to_string(),
                status,
                gender: gender.map(String::from),
                region: region.map(String::from),
                industry_type: industry.map(String::from),
                age,
                membership_date: joined.and_then(|(y, m, d)| NaiveDate::from_ymd_opt(y, m, d)),
                national_id: None,
                company_license: None,
                email: email.map(String::from),
                phone: phone.map(String::from),
                created_at: now - chrono::Duration::days(i as i64),
                updated_at: now,
            };
            self.members.insert(member.id, member);
        }
    }
}

fn non_empty(value: Option<&str>) -> Option<&str> {
    value.filter(|v| !v.trim().is_empty())
}

impl Default for MemberRegistry {
    fn default() -> Self {
        Self::new()
    }
}

// ─── MemberStore ────────────────────────────────────────────────────────────

impl MemberStore for MemberRegistry {
    fn count(&self, pred: &Predicate) -> MemberResult<u64> {
        Ok(self.members.iter().filter(|r| pred.matches(r.value())).count() as u64)
    }

    fn count_contactable(&self, pred: &Predicate, channel: ContactChannel) -> MemberResult<u64> {
        let count = self
            .matching(pred)
            .iter()
            .filter(|m| {
                let value = match channel {
                    ContactChannel::Email => self.effective_email(m),
                    ContactChannel::WhatsApp => self.effective_phone(m),
                };
                value.is_some_and(|v| contact::has_signal(&v, channel))
            })
            .count();
        Ok(count as u64)
    }

    fn group_count(&self, pred: &Predicate, field: GroupField) -> MemberResult<Vec<GroupRow>> {
        let mut counts: std::collections::HashMap<Option<String>, u64> =
            std::collections::HashMap::new();
        for member in self.matching(pred) {
            let value = match field {
                GroupField::Region => member.region.clone(),
                GroupField::IndustryType => member.industry_type.clone(),
                GroupField::Gender => member.gender.clone(),
                GroupField::Status => Some(member.status.as_str().to_string()),
            };
            // Empty strings group with missing values.
            let value = value.filter(|v| !v.is_empty());
            *counts.entry(value).or_insert(0) += 1;
        }

        let mut rows: Vec<GroupRow> = counts
            .into_iter()
            .map(|(value, count)| GroupRow { value, count })
            .collect();
        // Stable output for identical input: value order with the null
        // group last.
        rows.sort_by(|a, b| match (&a.value, &b.value) {
            (Some(x), Some(y)) => x.cmp(y),
            (Some(_), None) => std::cmp::Ordering::Less,
            (None, Some(_)) => std::cmp::Ordering::Greater,
            (None, None) => std::cmp::Ordering::Equal,
        });
        Ok(rows)
    }

    fn select(
        &self,
        pred: &Predicate,
        order: SelectOrder,
        offset: usize,
        limit: Option<usize>,
    ) -> MemberResult<Vec<Member>> {
        let mut rows = self.matching(pred);
        match order {
            SelectOrder::CreatedDesc => {
                rows.sort_by(|a, b| b.created_at.cmp(&a.created_at).then(a.id.cmp(&b.id)))
            }
            SelectOrder::IdAsc => rows.sort_by(|a, b| a.id.cmp(&b.id)),
        }
        let rows = rows
            .into_iter()
            .skip(offset)
            .take(limit.unwrap_or(usize::MAX))
            .collect();
        Ok(rows)
    }

    fn recipients(
        &self,
        pred: &Predicate,
        order: SelectOrder,
        offset: usize,
        limit: Option<usize>,
    ) -> MemberResult<Vec<RecipientSummary>> {
        let rows = self.select(pred, order, offset, limit)?;
        Ok(rows
            .into_iter()
            .map(|m| RecipientSummary {
                id: m.id,
                name: m.name.clone(),
                email: self.effective_email(&m).unwrap_or_default(),
                phone: self.effective_phone(&m).unwrap_or_default(),
            })
            .collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use member_core::types::RegistrationStatus;

    fn add_member(registry: &MemberRegistry, name: &str, region: Option<&str>) -> Member {
        registry.create_member(CreateMemberRequest {
            name: name.into(),
            status: Some("ACTIVE".into()),
            gender: None,
            region: region.map(String::from),
            industry_type: None,
            age: None,
            membership_date: None,
            national_id: None,
            company_license: None,
            email: None,
            phone: None,
        })
    }

    #[test]
    fn group_count_buckets_missing_values_together() {
        let registry = MemberRegistry::new();
        add_member(&registry, "a", Some("Kuching"));
        add_member(&registry, "b", Some("Miri"));
        add_member(&registry, "c", None);

        let rows = registry
            .group_count(&Predicate::match_all(), GroupField::Region)
            .unwrap();
        assert_eq!(rows.len(), 3);
        assert_eq!(rows[0].value.as_deref(), Some("Kuching"));
        assert_eq!(rows[1].value.as_deref(), Some("Miri"));
        assert_eq!(rows[2].value, None);
        assert!(rows.iter().all(|r| r.count == 1));
    }

    #[test]
    fn group_count_is_stable_across_calls() {
        let registry = MemberRegistry::with_demo_data();
        let first = registry
            .group_count(&Predicate::match_all(), GroupField::IndustryType)
            .unwrap();
        let second = registry
            .group_count(&Predicate::match_all(), GroupField::IndustryType)
            .unwrap();
        assert_eq!(first, second);
    }

    #[test]
    fn select_pages_in_order() {
        let registry = MemberRegistry::new();
        for i in 0..5 {
            add_member(&registry, &format!("m{i}"), None);
        }
        let all = registry
            .select(&Predicate::match_all(), SelectOrder::IdAsc, 0, None)
            .unwrap();
        let page = registry
            .select(&Predicate::match_all(), SelectOrder::IdAsc, 2, Some(2))
            .unwrap();
        assert_eq!(page.len(), 2);
        assert_eq!(page[0].id, all[2].id);
        assert_eq!(page[1].id, all[3].id);
    }

    #[test]
    fn recipients_fall_back_to_linked_registration_contacts() {
        let registry = MemberRegistry::new();
        let member = add_member(&registry, "No Contact Sdn Bhd", None);
        let now = Utc::now();
        let reg_id = Uuid::new_v4();
        registry.registrations.insert(
            reg_id,
            Registration {
                id: reg_id,
                company_name: "No Contact Sdn Bhd".into(),
                company_number: None,
                contact_person_name: None,
                national_id: None,
                date_of_birth: None,
                stated_age: None,
                gender: None,
                region: None,
                industry_type: None,
                email: Some("fallback@example.my".into()),
                phone: Some("0128899001".into()),
                licenses: None,
                status: RegistrationStatus::Approved,
                member_id: Some(member.id),
                rejected_reason: None,
                created_at: now,
                updated_at: now,
            },
        );

        let rows = registry
            .recipients(&Predicate::match_all(), SelectOrder::IdAsc, 0, None)
            .unwrap();
        assert_eq!(rows[0].email, "fallback@example.my");
        assert_eq!(rows[0].phone, "0128899001");

        let with_email = registry
            .count_contactable(&Predicate::match_all(), ContactChannel::Email)
            .unwrap();
        assert_eq!(with_email, 1);
    }

    #[test]
    fn empty_contact_fields_render_as_empty_strings() {
        let registry = MemberRegistry::new();
        add_member(&registry, "Silent Sdn Bhd", None);
        let rows = registry
            .recipients(&Predicate::match_all(), SelectOrder::IdAsc, 0, None)
            .unwrap();
        assert_eq!(rows[0].email, "");
        assert_eq!(rows[0].phone, "");
    }
}
