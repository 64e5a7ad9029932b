//! Activity and event listings.

use chrono::Utc;
use member_core::types::Activity;
use uuid::Uuid;

use crate::memory::MemberRegistry;
use crate::models::CreateActivityRequest;

impl MemberRegistry {
    pub fn list_activities(&self) -> Vec<Activity> {
        let mut rows: Vec<Activity> = self.activities.iter().map(|r| r.value().clone()).collect();
        // Upcoming-dated listings first, undated ones trailing by recency.
        rows.sort_by(|a, b| match (b.starts_on, a.starts_on) {
            (Some(x), Some(y)) => x.cmp(&y),
            (Some(_), None) => std::cmp::Ordering::Greater,
            (None, Some(_)) => std::cmp::Ordering::Less,
            (None, None) => b.created_at.cmp(&a.created_at),
        });
        rows
    }

    pub fn get_activity(&self, id: Uuid) -> Option<Activity> {
        self.activities.get(&id).map(|r| r.value().clone())
    }

    pub fn create_activity(&self, req: CreateActivityRequest) -> Activity {
        let activity = Activity {
            id: Uuid::new_v4(),
            title: req.title,
            description: req.description,
            location: req.location,
            starts_on: req.starts_on,
            created_at: Utc::now(),
        };
        self.activities.insert(activity.id, activity.clone());
        activity
    }

    pub fn delete_activity(&self, id: Uuid) -> bool {
        self.activities.remove(&id).is_some()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    #[test]
    fn listings_sort_dated_first_descending() {
        let registry = MemberRegistry::new();
        registry.create_activity(CreateActivityRequest {
            title: "AGM".into(),
            description: None,
            location: Some("Kuching".into()),
            starts_on: NaiveDate::from_ymd_opt(2026, 3, 1),
        });
        registry.create_activity(CreateActivityRequest {
            title: "Safety Briefing".into(),
            description: None,
            location: None,
            starts_on: NaiveDate::from_ymd_opt(2026, 6, 15),
        });
        registry.create_activity(CreateActivityRequest {
            title: "Undated".into(),
            description: None,
            location: None,
            starts_on: None,
        });

        let rows = registry.list_activities();
        assert_eq!(rows[0].title, "Safety Briefing");
        assert_eq!(rows[1].title, "AGM");
        assert_eq!(rows[2].title, "Undated");
    }

    #[test]
    fn delete_round_trip() {
        let registry = MemberRegistry::new();
        let a = registry.create_activity(CreateActivityRequest {
            title: "Gone".into(),
            description: None,
            location: None,
            starts_on: None,
        });
        assert!(registry.get_activity(a.id).is_some());
        assert!(registry.delete_activity(a.id));
        assert!(registry.get_activity(a.id).is_none());
    }
}
