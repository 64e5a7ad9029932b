//! Integration test for the full target-preview-queue blast flow.

#[cfg(test)]
mod tests {
    use member_audience::{FilterSpec, Predicate};
    use member_blast::{preview, BlastJobStatus, BlastJobStore, EnqueueJob, TemplateStore};
    use member_registry::MemberRegistry;
    use member_reporting::{aggregate, to_csv, GroupBy};
    use serde_json::json;

    fn kuching_actives() -> FilterSpec {
        serde_json::from_value(json!({
            "status": ["ACTIVE"],
            "region": ["Kuching"]
        }))
        .unwrap()
    }

    #[test]
    fn test_preview_counts_against_demo_registry() {
        let registry = MemberRegistry::with_demo_data();
        let pred = Predicate::build(&kuching_actives());

        let p = preview(&registry, &pred, 50).unwrap();
        assert!(p.total > 0);
        assert!(p.with_email <= p.total);
        assert!(p.with_whats_app <= p.total);
        assert_eq!(p.sample.len() as u64, p.total.min(50));
    }

    #[test]
    fn test_send_flow_queues_a_job_for_the_resolved_total() {
        let registry = MemberRegistry::with_demo_data();
        let templates = TemplateStore::new();
        let jobs = BlastJobStore::new();

        let filters = kuching_actives();
        let pred = Predicate::build(&filters);
        let total = preview(&registry, &pred, 50).unwrap().total;

        let template = templates.create(
            "Renewal notice".into(),
            Some("Membership renewal".into()),
            Some("Dear member, your renewal is due.".into()),
            None,
        );

        let job = jobs.enqueue(EnqueueJob {
            audience_id: None,
            template_id: Some(template.id),
            filters,
            subject: template.subject.clone(),
            email_body: template.email_body.clone(),
            wa_body: template.wa_body.clone(),
            channel_email: true,
            channel_whatsapp: false,
            total,
        });

        assert_eq!(job.status, BlastJobStatus::Queued);
        assert_eq!(job.total, total);
        assert_eq!(jobs.get(job.id).unwrap().subject, "Membership renewal");
    }

    #[test]
    fn test_report_export_covers_every_region() {
        let registry = MemberRegistry::with_demo_data();
        let pred = Predicate::build(&FilterSpec::default());

        let rows = aggregate(&registry, &pred, GroupBy::Region).unwrap();
        let total: u64 = rows.iter().map(|r| r.count).sum();
        assert_eq!(total, registry.member_count());

        let csv = to_csv(&rows);
        let lines: Vec<&str> = csv.split('\n').collect();
        assert_eq!(lines.len(), rows.len() + 1);
        assert_eq!(lines[0], "\"Label\",\"Count\"");
    }
}
