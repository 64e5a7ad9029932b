//! Member, registration, and activity endpoints.

use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use axum::Json;
use member_core::types::{Activity, Member, Registration, RegistrationStatus};
use member_registry::models::{
    CreateActivityRequest, CreateMemberRequest, RejectRegistrationRequest,
    SubmitRegistrationRequest, UpdateMemberRequest,
};
use serde::{Deserialize, Serialize};
use tracing::info;
use uuid::Uuid;

use crate::rest::{map_error, ApiError, AppState, DataEnvelope, ErrorResponse};

fn not_found(what: &str) -> ApiError {
    (
        StatusCode::NOT_FOUND,
        Json(ErrorResponse {
            error: "not_found".to_string(),
            message: format!("{what} not found"),
        }),
    )
}

// ─── Members ────────────────────────────────────────────────────────────────

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub struct MemberListQuery {
    pub take: Option<usize>,
}

pub async fn list_members(
    State(state): State<AppState>,
    Query(q): Query<MemberListQuery>,
) -> Json<DataEnvelope<Vec<Member>>> {
    let data = match q.take {
        Some(take) => state.registry.recent_members(take),
        None => state.registry.list_members(),
    };
    Json(DataEnvelope { data })
}

/// GET /api/v1/members/recent — the dashboard's newest-members card.
pub async fn recent_members(
    State(state): State<AppState>,
    Query(q): Query<MemberListQuery>,
) -> Json<DataEnvelope<Vec<Member>>> {
    Json(DataEnvelope {
        data: state.registry.recent_members(q.take.unwrap_or(5)),
    })
}

#[derive(Debug, Serialize)]
pub struct MemberCountResponse {
    pub count: u64,
}

pub async fn member_count(State(state): State<AppState>) -> Json<DataEnvelope<MemberCountResponse>> {
    Json(DataEnvelope {
        data: MemberCountResponse {
            count: state.registry.member_count(),
        },
    })
}

pub async fn get_member(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<Json<DataEnvelope<Member>>, ApiError> {
    state
        .registry
        .get_member(id)
        .map(|data| Json(DataEnvelope { data }))
        .ok_or_else(|| not_found("Member"))
}

pub async fn create_member(
    State(state): State<AppState>,
    Json(req): Json<CreateMemberRequest>,
) -> (StatusCode, Json<DataEnvelope<Member>>) {
    let member = state.registry.create_member(req);
    info!(member_id = %member.id, "Member created");
    metrics::counter!("members.created").increment(1);
    (StatusCode::CREATED, Json(DataEnvelope { data: member }))
}

pub async fn update_member(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    Json(req): Json<UpdateMemberRequest>,
) -> Result<Json<DataEnvelope<Member>>, ApiError> {
    state
        .registry
        .update_member(id, req)
        .map(|data| Json(DataEnvelope { data }))
        .ok_or_else(|| not_found("Member"))
}

pub async fn delete_member(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<StatusCode, ApiError> {
    if state.registry.delete_member(id) {
        Ok(StatusCode::NO_CONTENT)
    } else {
        Err(not_found("Member"))
    }
}

// ─── Registrations ──────────────────────────────────────────────────────────

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub struct RegistrationListQuery {
    pub status: Option<String>,
}

fn parse_registration_status(raw: &str) -> Option<RegistrationStatus> {
    match raw.trim().to_uppercase().as_str() {
        "PENDING" => Some(RegistrationStatus::Pending),
        "APPROVED" => Some(RegistrationStatus::Approved),
        "REJECTED" => Some(RegistrationStatus::Rejected),
        _ => None,
    }
}

/// GET /api/v1/registrations — an unrecognized status filter is ignored
/// rather than rejected.
pub async fn list_registrations(
    State(state): State<AppState>,
    Query(q): Query<RegistrationListQuery>,
) -> Json<DataEnvelope<Vec<Registration>>> {
    let status = q.status.as_deref().and_then(parse_registration_status);
    Json(DataEnvelope {
        data: state.registry.list_registrations(status),
    })
}

pub async fn submit_registration(
    State(state): State<AppState>,
    Json(req): Json<SubmitRegistrationRequest>,
) -> (StatusCode, Json<DataEnvelope<Registration>>) {
    let registration = state.registry.submit_registration(req);
    info!(registration_id = %registration.id, company = %registration.company_name, "Registration submitted");
    metrics::counter!("registrations.submitted").increment(1);
    (
        StatusCode::CREATED,
        Json(DataEnvelope { data: registration }),
    )
}

pub async fn get_registration(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<Json<DataEnvelope<Registration>>, ApiError> {
    state
        .registry
        .get_registration(id)
        .map(|data| Json(DataEnvelope { data }))
        .ok_or_else(|| not_found("Registration"))
}

/// POST /api/v1/registrations/:id/approve — creates the member record.
pub async fn approve_registration(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<Json<DataEnvelope<Member>>, ApiError> {
    let member = state.registry.approve_registration(id).map_err(map_error)?;
    info!(registration_id = %id, member_id = %member.id, "Registration approved");
    metrics::counter!("registrations.approved").increment(1);
    Ok(Json(DataEnvelope { data: member }))
}

pub async fn reject_registration(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    Json(req): Json<RejectRegistrationRequest>,
) -> Result<Json<DataEnvelope<Registration>>, ApiError> {
    let registration = state
        .registry
        .reject_registration(id, req.reason)
        .map_err(map_error)?;
    metrics::counter!("registrations.rejected").increment(1);
    Ok(Json(DataEnvelope { data: registration }))
}

// ─── Activities ─────────────────────────────────────────────────────────────

pub async fn list_activities(State(state): State<AppState>) -> Json<DataEnvelope<Vec<Activity>>> {
    Json(DataEnvelope {
        data: state.registry.list_activities(),
    })
}

pub async fn get_activity(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<Json<DataEnvelope<Activity>>, ApiError> {
    state
        .registry
        .get_activity(id)
        .map(|data| Json(DataEnvelope { data }))
        .ok_or_else(|| not_found("Activity"))
}

pub async fn create_activity(
    State(state): State<AppState>,
    Json(req): Json<CreateActivityRequest>,
) -> (StatusCode, Json<DataEnvelope<Activity>>) {
    let activity = state.registry.create_activity(req);
    (StatusCode::CREATED, Json(DataEnvelope { data: activity }))
}

pub async fn delete_activity(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<StatusCode, ApiError> {
    if state.registry.delete_activity(id) {
        Ok(StatusCode::NO_CONTENT)
    } else {
        Err(not_found("Activity"))
    }
}
