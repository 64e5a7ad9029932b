//! API server — wires the stores into an HTTP REST router.

use crate::blast_rest;
use crate::members_rest;
use crate::reports_rest;
use crate::rest::{self, AppState};
use axum::routing::{get, post};
use axum::Router;
use member_audience::AudienceStore;
use member_blast::{BlastJobStore, TemplateStore};
use member_core::config::AppConfig;
use member_registry::MemberRegistry;
use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Instant;
use tower_http::compression::CompressionLayer;
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;
use tracing::info;

/// Main API server for the membership platform.
pub struct ApiServer {
    config: AppConfig,
    registry: Arc<MemberRegistry>,
    audiences: Arc<AudienceStore>,
    templates: Arc<TemplateStore>,
    jobs: Arc<BlastJobStore>,
}

impl ApiServer {
    pub fn new(config: AppConfig, registry: Arc<MemberRegistry>) -> Self {
        Self {
            config,
            registry,
            audiences: Arc::new(AudienceStore::new()),
            templates: Arc::new(TemplateStore::new()),
            jobs: Arc::new(BlastJobStore::new()),
        }
    }

    /// Start the HTTP REST server.
    pub async fn start_http(&self) -> anyhow::Result<()> {
        let state = AppState {
            registry: self.registry.clone(),
            audiences: self.audiences.clone(),
            templates: self.templates.clone(),
            jobs: self.jobs.clone(),
            blast: self.config.blast.clone(),
            node_id: self.config.node_id.clone(),
            start_time: Instant::now(),
        };

        let api = Router::new()
            // Members
            .route(
                "/members",
                get(members_rest::list_members).post(members_rest::create_member),
            )
            .route("/members/count", get(members_rest::member_count))
            .route("/members/recent", get(members_rest::recent_members))
            .route(
                "/members/:id",
                get(members_rest::get_member)
                    .put(members_rest::update_member)
                    .patch(members_rest::update_member)
                    .delete(members_rest::delete_member),
            )
            // Registrations
            .route(
                "/registrations",
                get(members_rest::list_registrations).post(members_rest::submit_registration),
            )
            .route("/registrations/:id", get(members_rest::get_registration))
            .route(
                "/registrations/:id/approve",
                post(members_rest::approve_registration),
            )
            .route(
                "/registrations/:id/reject",
                post(members_rest::reject_registration),
            )
            // Activities
            .route(
                "/activities",
                get(members_rest::list_activities).post(members_rest::create_activity),
            )
            .route(
                "/activities/:id",
                get(members_rest::get_activity).delete(members_rest::delete_activity),
            )
            // Reports
            .route("/reports/aggregate", get(reports_rest::handle_aggregate))
            .route("/reports/timeseries", get(reports_rest::handle_timeseries))
            .route("/reports/export", get(reports_rest::handle_export))
            // Blast
            .route("/blast/preview", post(blast_rest::handle_preview))
            .route("/blast/resolve", post(blast_rest::handle_resolve))
            .route("/blast/recipients", post(blast_rest::handle_recipients))
            .route("/blast/send", post(blast_rest::handle_send))
            .route("/blast/jobs", get(blast_rest::list_jobs))
            .route("/blast/jobs/:id", get(blast_rest::get_job))
            .route(
                "/blast/audiences",
                get(blast_rest::list_audiences).post(blast_rest::create_audience),
            )
            .route(
                "/blast/audiences/:id",
                get(blast_rest::get_audience)
                    .patch(blast_rest::update_audience)
                    .delete(blast_rest::delete_audience),
            )
            .route(
                "/blast/templates",
                get(blast_rest::list_templates).post(blast_rest::create_template),
            )
            .route(
                "/blast/templates/:id",
                get(blast_rest::get_template)
                    .patch(blast_rest::update_template)
                    .delete(blast_rest::delete_template),
            );

        let app = Router::new()
            .nest("/api/v1", api)
            // Operational endpoints
            .route("/health", get(rest::health_check))
            .route("/ready", get(rest::readiness))
            .route("/live", get(rest::liveness))
            // Middleware
            .layer(CompressionLayer::new())
            .layer(CorsLayer::permissive())
            .layer(TraceLayer::new_for_http())
            .with_state(state);

        let addr = SocketAddr::new(self.config.api.host.parse()?, self.config.api.http_port);

        info!(addr = %addr, "Starting HTTP server");

        let listener = tokio::net::TcpListener::bind(addr).await?;
        axum::serve(listener, app).await?;

        Ok(())
    }

    /// Start the metrics server on a separate port.
    pub async fn start_metrics(&self) -> anyhow::Result<()> {
        let builder = metrics_exporter_prometheus::PrometheusBuilder::new();
        let handle = builder
            .with_http_listener(SocketAddr::new(
                self.config.api.host.parse()?,
                self.config.metrics.port,
            ))
            .install_recorder()?;

        info!(port = self.config.metrics.port, "Metrics exporter started");

        // Keep the handle alive
        std::mem::forget(handle);
        Ok(())
    }
}
