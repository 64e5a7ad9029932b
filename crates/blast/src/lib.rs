//! Bulk communication ("blast") support: audience preview and resolution,
//! message templates, and queued blast jobs. Actual delivery belongs to the
//! external webhook receiver, not this crate.

pub mod jobs;
pub mod preview;
pub mod templates;

pub use jobs::{BlastJob, BlastJobStatus, BlastJobStore, EnqueueJob};
pub use preview::{
    preview, resolve, BlastPreview, DEFAULT_RESOLVE_TAKE, DEFAULT_SAMPLE_SIZE, MAX_RESOLVE_TAKE,
};
pub use templates::{Template, TemplateStore};
