use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Membership lifecycle status. The one closed enum in the member record;
/// everything else demographic is free text captured at the edge.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum MemberStatus {
    Active,
    Inactive,
    Deceased,
}

impl MemberStatus {
    /// Parse a raw input value, tolerating casing and surrounding
    /// whitespace. Returns `None` for anything outside the enum.
    pub fn parse(raw: &str) -> Option<Self> {
        match raw.trim().to_uppercase().as_str() {
            "ACTIVE" => Some(MemberStatus::Active),
            "INACTIVE" => Some(MemberStatus::Inactive),
            "DECEASED" => Some(MemberStatus::Deceased),
            _ => None,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            MemberStatus::Active => "ACTIVE",
            MemberStatus::Inactive => "INACTIVE",
            MemberStatus::Deceased => "DECEASED",
        }
    }
}

/// A member (contractor) record. Reporting-relevant fields are optional by
/// contract; consumers bucket missing values under "Unknown" instead of
/// rejecting the record.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Member {
    pub id: Uuid,
    pub name: String,
    pub status: MemberStatus,
    pub gender: Option<String>,
    pub region: Option<String>,
    pub industry_type: Option<String>,
    pub age: Option<u32>,
    pub membership_date: Option<NaiveDate>,
    pub national_id: Option<String>,
    pub company_license: Option<String>,
    pub email: Option<String>,
    pub phone: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Status of a membership application.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum RegistrationStatus {
    Pending,
    Approved,
    Rejected,
}

/// A submitted membership application. Kept as the applicant filled it in;
/// approval derives the member record from this snapshot.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Registration {
    pub id: Uuid,
    pub company_name: String,
    pub company_number: Option<String>,
    pub contact_person_name: Option<String>,
    pub national_id: Option<String>,
    pub date_of_birth: Option<NaiveDate>,
    /// Free-text age as stated on the form, used when no DOB was given.
    pub stated_age: Option<String>,
    pub gender: Option<String>,
    pub region: Option<String>,
    pub industry_type: Option<String>,
    pub email: Option<String>,
    pub phone: Option<String>,
    /// Raw licenses section of the form (CIDB/UPKJ/UPK flags and grades).
    pub licenses: Option<serde_json::Value>,
    pub status: RegistrationStatus,
    pub member_id: Option<Uuid>,
    pub rejected_reason: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// An association activity or event listing.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Activity {
    pub id: Uuid,
    pub title: String,
    pub description: Option<String>,
    pub location: Option<String>,
    pub starts_on: Option<NaiveDate>,
    pub created_at: DateTime<Utc>,
}

/// A member reduced to blast-recipient shape. Missing contact fields render
/// as empty strings, never null, per the preview wire contract.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RecipientSummary {
    pub id: Uuid,
    pub name: String,
    pub email: String,
    pub phone: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn status_parse_is_lenient_on_case_and_whitespace() {
        assert_eq!(MemberStatus::parse(" active "), Some(MemberStatus::Active));
        assert_eq!(MemberStatus::parse("DECEASED"), Some(MemberStatus::Deceased));
        assert_eq!(MemberStatus::parse("bogus"), None);
        assert_eq!(MemberStatus::parse(""), None);
    }

    #[test]
    fn status_serializes_screaming() {
        let json = serde_json::to_string(&MemberStatus::Inactive).unwrap();
        assert_eq!(json, "\"INACTIVE\"");
    }
}
