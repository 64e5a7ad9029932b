//! Blast endpoints: audience preview and resolution, saved audiences,
//! message templates, and the send queue.

use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use axum::Json;
use member_audience::{Audience, FilterSpec, Predicate};
use member_blast::{
    preview, resolve, BlastJob, BlastPreview, EnqueueJob, Template,
};
use member_core::types::{Member, RecipientSummary};
use member_registry::{MemberStore, SelectOrder};
use serde::{Deserialize, Serialize};
use tracing::info;
use uuid::Uuid;

use crate::rest::{bad_request, map_error, ApiError, AppState, DataEnvelope, ErrorResponse};

fn not_found(what: &str) -> ApiError {
    (
        StatusCode::NOT_FOUND,
        Json(ErrorResponse {
            error: "not_found".to_string(),
            message: format!("{what} not found"),
        }),
    )
}

// ─── Preview and resolve ────────────────────────────────────────────────────

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct PreviewRequest {
    pub filters: FilterSpec,
}

/// POST /api/v1/blast/preview
pub async fn handle_preview(
    State(state): State<AppState>,
    Json(req): Json<PreviewRequest>,
) -> Result<Json<DataEnvelope<BlastPreview>>, ApiError> {
    let pred = Predicate::build(&req.filters);
    let data = preview(&*state.registry, &pred, state.blast.preview_sample_size)
        .map_err(map_error)?;
    metrics::counter!("blast.preview.requests").increment(1);
    Ok(Json(DataEnvelope { data }))
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct ResolveRequest {
    pub filters: FilterSpec,
    pub take: Option<usize>,
    pub skip: Option<usize>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ResolveResponse {
    pub recipients: Vec<RecipientSummary>,
    pub total: u64,
    pub take: usize,
    pub skip: usize,
}

/// POST /api/v1/blast/resolve — page through the full recipient list in a
/// stable order.
pub async fn handle_resolve(
    State(state): State<AppState>,
    Json(req): Json<ResolveRequest>,
) -> Result<Json<DataEnvelope<ResolveResponse>>, ApiError> {
    let pred = Predicate::build(&req.filters);
    let take = req
        .take
        .unwrap_or(state.blast.resolve_default_take)
        .min(state.blast.resolve_max_take);
    let skip = req.skip.unwrap_or(0);

    let recipients = resolve(&*state.registry, &pred, skip, take).map_err(map_error)?;
    let total = state.registry.count(&pred).map_err(map_error)?;
    metrics::counter!("blast.resolve.requests").increment(1);

    Ok(Json(DataEnvelope {
        data: ResolveResponse {
            recipients,
            total,
            take,
            skip,
        },
    }))
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RecipientsPage {
    pub members: Vec<Member>,
    pub total: u64,
    pub take: usize,
    pub skip: usize,
}

/// POST /api/v1/blast/recipients — full member records for the targeting
/// table, newest first, unlike `/blast/resolve` which returns the reduced
/// recipient shape in id order.
pub async fn handle_recipients(
    State(state): State<AppState>,
    Json(req): Json<ResolveRequest>,
) -> Result<Json<DataEnvelope<RecipientsPage>>, ApiError> {
    let pred = Predicate::build(&req.filters);
    let take = req
        .take
        .unwrap_or(state.blast.resolve_default_take)
        .min(state.blast.resolve_max_take);
    let skip = req.skip.unwrap_or(0);

    let members = state
        .registry
        .select(&pred, SelectOrder::CreatedDesc, skip, Some(take))
        .map_err(map_error)?;
    let total = state.registry.count(&pred).map_err(map_error)?;
    metrics::counter!("blast.recipients.requests").increment(1);

    Ok(Json(DataEnvelope {
        data: RecipientsPage {
            members,
            total,
            take,
            skip,
        },
    }))
}

// ─── Saved audiences ────────────────────────────────────────────────────────

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SaveAudienceRequest {
    pub name: Option<String>,
    #[serde(default)]
    pub filters: Option<FilterSpec>,
}

pub async fn list_audiences(
    State(state): State<AppState>,
) -> Json<DataEnvelope<Vec<Audience>>> {
    Json(DataEnvelope {
        data: state.audiences.list(),
    })
}

pub async fn create_audience(
    State(state): State<AppState>,
    Json(req): Json<SaveAudienceRequest>,
) -> Result<Json<DataEnvelope<Audience>>, ApiError> {
    let name = req
        .name
        .as_deref()
        .map(str::trim)
        .filter(|n| !n.is_empty())
        .ok_or_else(|| bad_request("Audience name is required"))?;
    let audience = state
        .audiences
        .create(name.to_string(), req.filters.unwrap_or_default());
    Ok(Json(DataEnvelope { data: audience }))
}

pub async fn get_audience(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<Json<DataEnvelope<Audience>>, ApiError> {
    state
        .audiences
        .get(id)
        .map(|data| Json(DataEnvelope { data }))
        .ok_or_else(|| not_found("Audience"))
}

pub async fn update_audience(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    Json(req): Json<SaveAudienceRequest>,
) -> Result<Json<DataEnvelope<Audience>>, ApiError> {
    if let Some(name) = req.name.as_deref() {
        if name.trim().is_empty() {
            return Err(bad_request("Audience name cannot be empty"));
        }
    }
    state
        .audiences
        .update(id, req.name.map(|n| n.trim().to_string()), req.filters)
        .map(|data| Json(DataEnvelope { data }))
        .ok_or_else(|| not_found("Audience"))
}

pub async fn delete_audience(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<StatusCode, ApiError> {
    if state.audiences.delete(id) {
        Ok(StatusCode::NO_CONTENT)
    } else {
        Err(not_found("Audience"))
    }
}

// ─── Templates ──────────────────────────────────────────────────────────────

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SaveTemplateRequest {
    pub name: Option<String>,
    pub subject: Option<String>,
    pub email_body: Option<String>,
    pub wa_body: Option<String>,
}

pub async fn list_templates(
    State(state): State<AppState>,
) -> Json<DataEnvelope<Vec<Template>>> {
    Json(DataEnvelope {
        data: state.templates.list(),
    })
}

pub async fn create_template(
    State(state): State<AppState>,
    Json(req): Json<SaveTemplateRequest>,
) -> Result<Json<DataEnvelope<Template>>, ApiError> {
    let name = req
        .name
        .as_deref()
        .map(str::trim)
        .filter(|n| !n.is_empty())
        .ok_or_else(|| bad_request("Template name is required"))?;
    let template = state
        .templates
        .create(name.to_string(), req.subject, req.email_body, req.wa_body);
    Ok(Json(DataEnvelope { data: template }))
}

pub async fn get_template(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<Json<DataEnvelope<Template>>, ApiError> {
    state
        .templates
        .get(id)
        .map(|data| Json(DataEnvelope { data }))
        .ok_or_else(|| not_found("Template"))
}

pub async fn update_template(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    Json(req): Json<SaveTemplateRequest>,
) -> Result<Json<DataEnvelope<Template>>, ApiError> {
    state
        .templates
        .update(id, req.name, req.subject, req.email_body, req.wa_body)
        .map(|data| Json(DataEnvelope { data }))
        .ok_or_else(|| not_found("Template"))
}

pub async fn delete_template(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<StatusCode, ApiError> {
    if state.templates.delete(id) {
        Ok(StatusCode::NO_CONTENT)
    } else {
        Err(not_found("Template"))
    }
}

// ─── Send ───────────────────────────────────────────────────────────────────

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct SendChannels {
    pub email: bool,
    pub whatsapp: bool,
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct SendRequest {
    pub audience_id: Option<Uuid>,
    pub template_id: Option<Uuid>,
    pub channels: SendChannels,
    /// Ad-hoc filters, used when no saved audience is referenced.
    pub filters: Option<FilterSpec>,
    /// Inline message content, overriding the template where present.
    pub subject: Option<String>,
    pub email_body: Option<String>,
    pub wa_body: Option<String>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SendResponse {
    pub ok: bool,
    pub total: u64,
    pub job_id: Uuid,
}

/// POST /api/v1/blast/send — resolve the audience, snapshot the message, and
/// queue a job. Delivery happens downstream.
pub async fn handle_send(
    State(state): State<AppState>,
    Json(req): Json<SendRequest>,
) -> Result<(StatusCode, Json<DataEnvelope<SendResponse>>), ApiError> {
    if !req.channels.email && !req.channels.whatsapp {
        return Err(bad_request("At least one channel is required"));
    }

    // A referenced audience must exist; its filters win over the ad-hoc ones.
    let filters = match req.audience_id {
        Some(id) => state
            .audiences
            .get(id)
            .map(|a| a.filters)
            .ok_or_else(|| not_found("Audience"))?,
        None => req.filters.clone().unwrap_or_default(),
    };

    let template = match req.template_id {
        Some(id) => Some(state.templates.get(id).ok_or_else(|| not_found("Template"))?),
        None => None,
    };
    let subject = req
        .subject
        .or_else(|| template.as_ref().map(|t| t.subject.clone()))
        .unwrap_or_default();
    let email_body = req
        .email_body
        .or_else(|| template.as_ref().map(|t| t.email_body.clone()))
        .unwrap_or_default();
    let wa_body = req
        .wa_body
        .or_else(|| template.as_ref().map(|t| t.wa_body.clone()))
        .unwrap_or_default();

    let pred = Predicate::build(&filters);
    let total = state.registry.count(&pred).map_err(map_error)?;

    let job = state.jobs.enqueue(EnqueueJob {
        audience_id: req.audience_id,
        template_id: req.template_id,
        filters,
        subject,
        email_body,
        wa_body,
        channel_email: req.channels.email,
        channel_whatsapp: req.channels.whatsapp,
        total,
    });

    info!(job_id = %job.id, total, email = req.channels.email, whatsapp = req.channels.whatsapp, "Blast queued");
    metrics::counter!("blast.send.requests").increment(1);

    Ok((
        StatusCode::ACCEPTED,
        Json(DataEnvelope {
            data: SendResponse {
                ok: true,
                total,
                job_id: job.id,
            },
        }),
    ))
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub struct JobListQuery {
    pub take: Option<usize>,
}

/// GET /api/v1/blast/jobs
pub async fn list_jobs(
    State(state): State<AppState>,
    Query(q): Query<JobListQuery>,
) -> Json<DataEnvelope<Vec<BlastJob>>> {
    let mut rows = state.jobs.list();
    if let Some(take) = q.take {
        rows.truncate(take);
    }
    Json(DataEnvelope { data: rows })
}

pub async fn get_job(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<Json<DataEnvelope<BlastJob>>, ApiError> {
    state
        .jobs
        .get(id)
        .map(|data| Json(DataEnvelope { data }))
        .ok_or_else(|| not_found("Blast job"))
}
