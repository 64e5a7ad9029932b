//! Request payloads for registry CRUD endpoints.

use chrono::NaiveDate;
use serde::Deserialize;

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateMemberRequest {
    pub name: String,
    /// Raw status text; parsed leniently, defaults to ACTIVE.
    pub status: Option<String>,
    pub gender: Option<String>,
    pub region: Option<String>,
    pub industry_type: Option<String>,
    pub age: Option<u32>,
    pub membership_date: Option<NaiveDate>,
    pub national_id: Option<String>,
    pub company_license: Option<String>,
    pub email: Option<String>,
    pub phone: Option<String>,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct UpdateMemberRequest {
    pub name: Option<String>,
    pub status: Option<String>,
    pub gender: Option<String>,
    pub region: Option<String>,
    pub industry_type: Option<String>,
    pub age: Option<u32>,
    pub membership_date: Option<NaiveDate>,
    pub national_id: Option<String>,
    pub company_license: Option<String>,
    pub email: Option<String>,
    pub phone: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SubmitRegistrationRequest {
    pub company_name: String,
    #[serde(default)]
    pub company_number: Option<String>,
    #[serde(default)]
    pub contact_person_name: Option<String>,
    #[serde(default)]
    pub national_id: Option<String>,
    #[serde(default)]
    pub date_of_birth: Option<NaiveDate>,
    #[serde(default)]
    pub stated_age: Option<String>,
    #[serde(default)]
    pub gender: Option<String>,
    #[serde(default)]
    pub region: Option<String>,
    #[serde(default)]
    pub industry_type: Option<String>,
    #[serde(default)]
    pub email: Option<String>,
    #[serde(default)]
    pub phone: Option<String>,
    /// Raw licenses section, stored as submitted.
    #[serde(default)]
    pub licenses: Option<serde_json::Value>,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct RejectRegistrationRequest {
    pub reason: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateActivityRequest {
    pub title: String,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub location: Option<String>,
    #[serde(default)]
    pub starts_on: Option<NaiveDate>,
}
