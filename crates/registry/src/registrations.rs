//! Registration workflow: submit, approve, reject.
//!
//! Approval derives a member record from the application form. The
//! derivations mirror the association's paper process: gender falls back to
//! the national-ID digit convention and age to the stated date of birth.

use chrono::{Datelike, NaiveDate, Utc};
use member_core::types::{Member, MemberStatus, Registration, RegistrationStatus};
use member_core::{MemberError, MemberResult};
use tracing::info;
use uuid::Uuid;

use crate::memory::MemberRegistry;
use crate::models::SubmitRegistrationRequest;

impl MemberRegistry {
    pub fn submit_registration(&self, req: SubmitRegistrationRequest) -> Registration {
        let now = Utc::now();
        let registration = Registration {
            id: Uuid::new_v4(),
            company_name: req.company_name,
            company_number: req.company_number,
            contact_person_name: req.contact_person_name,
            national_id: req.national_id,
            date_of_birth: req.date_of_birth,
            stated_age: req.stated_age,
            gender: req.gender,
            region: req.region,
            industry_type: req.industry_type,
            email: req.email,
            phone: req.phone,
            licenses: req.licenses,
            status: RegistrationStatus::Pending,
            member_id: None,
            rejected_reason: None,
            created_at: now,
            updated_at: now,
        };
        self.registrations
            .insert(registration.id, registration.clone());
        info!(registration_id = %registration.id, company = %registration.company_name, "Registration submitted");
        registration
    }

    pub fn list_registrations(&self, status: Option<RegistrationStatus>) -> Vec<Registration> {
        let mut rows: Vec<Registration> = self
            .registrations
            .iter()
            .filter(|r| status.is_none_or(|s| r.value().status == s))
            .map(|r| r.value().clone())
            .collect();
        rows.sort_by(|a, b| b.created_at.cmp(&a.created_at));
        rows
    }

    pub fn get_registration(&self, id: Uuid) -> Option<Registration> {
        self.registrations.get(&id).map(|r| r.value().clone())
    }

    /// Approve a pending registration: create an ACTIVE member derived from
    /// the form and link it back. Approving anything but PENDING is a
    /// client error.
    pub fn approve_registration(&self, id: Uuid) -> MemberResult<Member> {
        let registration = self
            .get_registration(id)
            .ok_or_else(|| MemberError::NotFound(format!("registration {id}")))?;
        if registration.status != RegistrationStatus::Pending {
            return Err(MemberError::Validation(format!(
                "cannot approve a {} registration",
                status_label(registration.status)
            )));
        }

        let today = Utc::now().date_naive();
        let gender = registration.gender.clone().or_else(|| {
            registration
                .national_id
                .as_deref()
                .and_then(infer_gender_from_national_id)
        });
        let age = derive_age(
            registration.date_of_birth,
            registration.stated_age.as_deref(),
            today,
        );

        let now = Utc::now();
        let member = Member {
            id: Uuid::new_v4(),
            name: registration
                .contact_person_name
                .clone()
                .unwrap_or_else(|| registration.company_name.clone()),
            status: MemberStatus::Active,
            gender,
            region: registration.region.clone(),
            industry_type: registration.industry_type.clone(),
            age,
            membership_date: Some(today),
            national_id: registration.national_id.clone(),
            company_license: registration
                .licenses
                .as_ref()
                .and_then(license_summary),
            email: registration.email.clone(),
            phone: registration.phone.clone(),
            created_at: now,
            updated_at: now,
        };
        self.insert_member(member.clone());

        if let Some(mut entry) = self.registrations.get_mut(&id) {
            let r = entry.value_mut();
            r.status = RegistrationStatus::Approved;
            r.member_id = Some(member.id);
            r.updated_at = now;
        }

        info!(registration_id = %id, member_id = %member.id, "Registration approved");
        Ok(member)
    }

    /// Reject a pending registration with an optional reason.
    pub fn reject_registration(
        &self,
        id: Uuid,
        reason: Option<String>,
    ) -> MemberResult<Registration> {
        let mut entry = self
            .registrations
            .get_mut(&id)
            .ok_or_else(|| MemberError::NotFound(format!("registration {id}")))?;
        let r = entry.value_mut();
        if r.status != RegistrationStatus::Pending {
            return Err(MemberError::Validation(format!(
                "cannot reject a {} registration",
                status_label(r.status)
            )));
        }
        r.status = RegistrationStatus::Rejected;
        r.rejected_reason = reason;
        r.updated_at = Utc::now();
        Ok(r.clone())
    }
}

fn status_label(status: RegistrationStatus) -> &'static str {
    match status {
        RegistrationStatus::Pending => "PENDING",
        RegistrationStatus::Approved => "APPROVED",
        RegistrationStatus::Rejected => "REJECTED",
    }
}

/// MyKad convention: odd final digit male, even female. A heuristic, not an
/// authority; an explicit gender on the form always wins.
fn infer_gender_from_national_id(national_id: &str) -> Option<String> {
    let last = national_id
        .chars()
        .filter(|c| c.is_ascii_digit())
        .next_back()?;
    let digit = last.to_digit(10)?;
    Some(if digit % 2 == 1 { "Male" } else { "Female" }.to_string())
}

/// Calendar-correct age from DOB, falling back to digits in the free-text
/// stated age.
fn derive_age(dob: Option<NaiveDate>, stated: Option<&str>, today: NaiveDate) -> Option<u32> {
    if let Some(dob) = dob {
        let mut age = today.year() - dob.year();
        if (today.month(), today.day()) < (dob.month(), dob.day()) {
            age -= 1;
        }
        if age >= 0 {
            return Some(age as u32);
        }
    }
    let digits: String = stated?.chars().filter(|c| c.is_ascii_digit()).collect();
    digits.parse().ok()
}

/// Collapse the structured licenses section into the display string stored
/// on the member record, e.g. `CIDB G5 (General) | UPKJ Class B | FFO`.
fn license_summary(licenses: &serde_json::Value) -> Option<String> {
    let obj = licenses.as_object()?;
    let text = |key: &str| obj.get(key).and_then(|v| v.as_str()).map(str::trim);
    let flag = |key: &str| obj.get(key).map(truthy).unwrap_or(false);

    let mut parts = Vec::new();
    if flag("cidb") {
        parts.push(graded("CIDB", text("cidbGrade"), text("cidbSubHeads")));
    }
    if flag("upkjStatus") {
        parts.push(graded("UPKJ", text("upkjClass"), text("upkjSubHeads")));
    }
    if flag("upkStatus") {
        parts.push(graded("UPK", text("upkClass"), text("upkSubHeads")));
    }
    if flag("ffo") {
        parts.push("FFO".to_string());
    }
    if flag("mof") {
        parts.push("MOF".to_string());
    }
    if flag("ePerolehan") {
        parts.push("e-Perolehan".to_string());
    }
    if let Some(other) = text("other").filter(|s| !s.is_empty()) {
        parts.push(other.to_string());
    }

    if parts.is_empty() {
        None
    } else {
        Some(parts.join(" | "))
    }
}

fn truthy(value: &serde_json::Value) -> bool {
    match value {
        serde_json::Value::Bool(b) => *b,
        serde_json::Value::String(s) => !s.trim().is_empty(),
        serde_json::Value::Number(n) => n.as_f64().is_some_and(|f| f != 0.0),
        _ => false,
    }
}

fn graded(name: &str, grade: Option<&str>, sub_heads: Option<&str>) -> String {
    let mut out = name.to_string();
    if let Some(g) = grade.filter(|g| !g.is_empty()) {
        out.push(' ');
        out.push_str(g);
    }
    if let Some(s) = sub_heads.filter(|s| !s.is_empty()) {
        out.push_str(&format!(" ({s})"));
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn submission(company: &str) -> SubmitRegistrationRequest {
        SubmitRegistrationRequest {
            company_name: company.into(),
            company_number: None,
            contact_person_name: Some("Chong Mei Lin".into()),
            national_id: Some("880214-13-5566".into()),
            date_of_birth: None,
            stated_age: Some("about 36 years".into()),
            gender: None,
            region: Some("Kuching".into()),
            industry_type: Some("Construction".into()),
            email: Some("meilin@example.my".into()),
            phone: Some("0128833441".into()),
            licenses: Some(json!({
                "cidb": true,
                "cidbGrade": "G5",
                "cidbSubHeads": "General",
                "ffo": true,
            })),
        }
    }

    #[test]
    fn approve_creates_linked_active_member() {
        let registry = MemberRegistry::new();
        let reg = registry.submit_registration(submission("Chong Builders"));
        let member = registry.approve_registration(reg.id).unwrap();

        assert_eq!(member.status, MemberStatus::Active);
        assert_eq!(member.name, "Chong Mei Lin");
        assert_eq!(member.region.as_deref(), Some("Kuching"));
        assert_eq!(
            member.company_license.as_deref(),
            Some("CIDB G5 (General) | FFO")
        );
        assert!(member.membership_date.is_some());

        let updated = registry.get_registration(reg.id).unwrap();
        assert_eq!(updated.status, RegistrationStatus::Approved);
        assert_eq!(updated.member_id, Some(member.id));
    }

    #[test]
    fn approve_is_pending_only() {
        let registry = MemberRegistry::new();
        let reg = registry.submit_registration(submission("Twice Sdn Bhd"));
        registry.approve_registration(reg.id).unwrap();

        let err = registry.approve_registration(reg.id).unwrap_err();
        assert!(matches!(err, MemberError::Validation(_)));
        assert!(matches!(
            registry.approve_registration(Uuid::new_v4()).unwrap_err(),
            MemberError::NotFound(_)
        ));
    }

    #[test]
    fn reject_records_reason() {
        let registry = MemberRegistry::new();
        let reg = registry.submit_registration(submission("Nope Sdn Bhd"));
        let rejected = registry
            .reject_registration(reg.id, Some("incomplete form".into()))
            .unwrap();
        assert_eq!(rejected.status, RegistrationStatus::Rejected);
        assert_eq!(rejected.rejected_reason.as_deref(), Some("incomplete form"));

        assert!(registry.reject_registration(reg.id, None).is_err());
    }

    #[test]
    fn gender_inferred_from_national_id_when_absent() {
        assert_eq!(
            infer_gender_from_national_id("880214-13-5566").as_deref(),
            Some("Female")
        );
        assert_eq!(
            infer_gender_from_national_id("880214-13-5567").as_deref(),
            Some("Male")
        );
        assert_eq!(infer_gender_from_national_id("no digits"), None);
    }

    #[test]
    fn age_derivation_prefers_dob_then_stated_text() {
        let today = NaiveDate::from_ymd_opt(2026, 8, 30).unwrap();
        let dob = NaiveDate::from_ymd_opt(1990, 9, 15).unwrap();
        // Birthday not yet reached this year.
        assert_eq!(derive_age(Some(dob), None, today), Some(35));
        assert_eq!(derive_age(None, Some("about 36 years"), today), Some(36));
        assert_eq!(derive_age(None, Some("unknown"), today), None);
        assert_eq!(derive_age(None, None, today), None);
    }

    #[test]
    fn list_filters_by_status() {
        let registry = MemberRegistry::new();
        let a = registry.submit_registration(submission("A"));
        let _b = registry.submit_registration(submission("B"));
        registry.approve_registration(a.id).unwrap();

        assert_eq!(
            registry
                .list_registrations(Some(RegistrationStatus::Pending))
                .len(),
            1
        );
        assert_eq!(registry.list_registrations(None).len(), 2);
    }
}
