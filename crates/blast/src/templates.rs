//! Blast message templates: a subject plus per-channel bodies.

use chrono::{DateTime, Utc};
use dashmap::DashMap;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Template {
    pub id: Uuid,
    pub name: String,
    pub subject: String,
    pub email_body: String,
    pub wa_body: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

pub struct TemplateStore {
    templates: DashMap<Uuid, Template>,
}

impl TemplateStore {
    pub fn new() -> Self {
        Self {
            templates: DashMap::new(),
        }
    }

    pub fn list(&self) -> Vec<Template> {
        let mut rows: Vec<Template> = self.templates.iter().map(|r| r.value().clone()).collect();
        rows.sort_by(|a, b| b.updated_at.cmp(&a.updated_at));
        rows
    }

    pub fn get(&self, id: Uuid) -> Option<Template> {
        self.templates.get(&id).map(|r| r.value().clone())
    }

    pub fn create(
        &self,
        name: String,
        subject: Option<String>,
        email_body: Option<String>,
        wa_body: Option<String>,
    ) -> Template {
        let now = Utc::now();
        let template = Template {
            id: Uuid::new_v4(),
            name,
            subject: subject.unwrap_or_default(),
            email_body: email_body.unwrap_or_default(),
            wa_body: wa_body.unwrap_or_default(),
            created_at: now,
            updated_at: now,
        };
        self.templates.insert(template.id, template.clone());
        template
    }

    pub fn update(
        &self,
        id: Uuid,
        name: Option<String>,
        subject: Option<String>,
        email_body: Option<String>,
        wa_body: Option<String>,
    ) -> Option<Template> {
        self.templates.get_mut(&id).map(|mut entry| {
            let t = entry.value_mut();
            if let Some(name) = name {
                t.name = name;
            }
            if let Some(subject) = subject {
                t.subject = subject;
            }
            if let Some(body) = email_body {
                t.email_body = body;
            }
            if let Some(body) = wa_body {
                t.wa_body = body;
            }
            t.updated_at = Utc::now();
            t.clone()
        })
    }

    pub fn delete(&self, id: Uuid) -> bool {
        self.templates.remove(&id).is_some()
    }
}

impl Default for TemplateStore {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn create_defaults_bodies_to_empty() {
        let store = TemplateStore::new();
        let t = store.create("Renewal notice".into(), None, None, None);
        assert_eq!(t.subject, "");
        assert_eq!(t.email_body, "");
        assert_eq!(t.wa_body, "");
    }

    #[test]
    fn partial_update_leaves_other_fields() {
        let store = TemplateStore::new();
        let t = store.create(
            "AGM".into(),
            Some("AGM 2026".into()),
            Some("Dear member".into()),
            None,
        );
        let updated = store
            .update(t.id, None, None, None, Some("Salam sejahtera".into()))
            .unwrap();
        assert_eq!(updated.subject, "AGM 2026");
        assert_eq!(updated.email_body, "Dear member");
        assert_eq!(updated.wa_body, "Salam sejahtera");
    }

    #[test]
    fn delete_round_trip() {
        let store = TemplateStore::new();
        let t = store.create("gone".into(), None, None, None);
        assert!(store.delete(t.id));
        assert!(store.get(t.id).is_none());
    }
}
