//! Queued blast jobs.
//!
//! A job records what the operator asked to send and to whom. The external
//! webhook receiver owns delivery and reports status back out of band; this
//! store only captures the request.

use chrono::{DateTime, Utc};
use dashmap::DashMap;
use member_audience::FilterSpec;
use serde::{Deserialize, Serialize};
use tracing::info;
use uuid::Uuid;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum BlastJobStatus {
    Queued,
    Sent,
    Failed,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BlastJob {
    pub id: Uuid,
    pub audience_id: Option<Uuid>,
    pub template_id: Option<Uuid>,
    pub filters: FilterSpec,
    pub subject: String,
    pub email_body: String,
    pub wa_body: String,
    pub channel_email: bool,
    pub channel_whatsapp: bool,
    pub total: u64,
    pub status: BlastJobStatus,
    pub created_at: DateTime<Utc>,
}

pub struct BlastJobStore {
    jobs: DashMap<Uuid, BlastJob>,
}

pub struct EnqueueJob {
    pub audience_id: Option<Uuid>,
    pub template_id: Option<Uuid>,
    pub filters: FilterSpec,
    pub subject: String,
    pub email_body: String,
    pub wa_body: String,
    pub channel_email: bool,
    pub channel_whatsapp: bool,
    pub total: u64,
}

impl BlastJobStore {
    pub fn new() -> Self {
        Self {
            jobs: DashMap::new(),
        }
    }

    pub fn enqueue(&self, req: EnqueueJob) -> BlastJob {
        let job = BlastJob {
            id: Uuid::new_v4(),
            audience_id: req.audience_id,
            template_id: req.template_id,
            filters: req.filters,
            subject: req.subject,
            email_body: req.email_body,
            wa_body: req.wa_body,
            channel_email: req.channel_email,
            channel_whatsapp: req.channel_whatsapp,
            total: req.total,
            status: BlastJobStatus::Queued,
            created_at: Utc::now(),
        };
        self.jobs.insert(job.id, job.clone());
        info!(job_id = %job.id, total = job.total, "Blast job queued");
        job
    }

    pub fn list(&self) -> Vec<BlastJob> {
        let mut rows: Vec<BlastJob> = self.jobs.iter().map(|r| r.value().clone()).collect();
        rows.sort_by(|a, b| b.created_at.cmp(&a.created_at));
        rows
    }

    pub fn get(&self, id: Uuid) -> Option<BlastJob> {
        self.jobs.get(&id).map(|r| r.value().clone())
    }
}

impl Default for BlastJobStore {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn enqueue_records_a_queued_job() {
        let store = BlastJobStore::new();
        let job = store.enqueue(EnqueueJob {
            audience_id: None,
            template_id: None,
            filters: FilterSpec::default(),
            subject: "AGM".into(),
            email_body: "Dear member".into(),
            wa_body: "".into(),
            channel_email: true,
            channel_whatsapp: false,
            total: 42,
        });
        assert_eq!(job.status, BlastJobStatus::Queued);
        assert_eq!(store.get(job.id).unwrap().total, 42);
        assert_eq!(store.list().len(), 1);
    }
}
