//! Persisted named audiences — a saved `FilterSpec` reusable across report
//! and blast requests.
//!
//! In-memory DashMap store (development); swap to a relational store for
//! production.

use chrono::{DateTime, Utc};
use dashmap::DashMap;
use serde::{Deserialize, Serialize};
use tracing::info;
use uuid::Uuid;

use crate::filter::FilterSpec;

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Audience {
    pub id: Uuid,
    pub name: String,
    pub filters: FilterSpec,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

pub struct AudienceStore {
    audiences: DashMap<Uuid, Audience>,
}

impl AudienceStore {
    pub fn new() -> Self {
        Self {
            audiences: DashMap::new(),
        }
    }

    /// List all audiences, most recently updated first.
    pub fn list(&self) -> Vec<Audience> {
        let mut rows: Vec<Audience> = self.audiences.iter().map(|r| r.value().clone()).collect();
        rows.sort_by(|a, b| b.updated_at.cmp(&a.updated_at));
        rows
    }

    pub fn get(&self, id: Uuid) -> Option<Audience> {
        self.audiences.get(&id).map(|r| r.value().clone())
    }

    pub fn create(&self, name: String, filters: FilterSpec) -> Audience {
        let now = Utc::now();
        let audience = Audience {
            id: Uuid::new_v4(),
            name,
            filters,
            created_at: now,
            updated_at: now,
        };
        self.audiences.insert(audience.id, audience.clone());
        info!(audience_id = %audience.id, name = %audience.name, "Audience saved");
        audience
    }

    pub fn update(
        &self,
        id: Uuid,
        name: Option<String>,
        filters: Option<FilterSpec>,
    ) -> Option<Audience> {
        self.audiences.get_mut(&id).map(|mut entry| {
            let a = entry.value_mut();
            if let Some(name) = name {
                a.name = name;
            }
            if let Some(filters) = filters {
                a.filters = filters;
            }
            a.updated_at = Utc::now();
            a.clone()
        })
    }

    pub fn delete(&self, id: Uuid) -> bool {
        self.audiences.remove(&id).is_some()
    }
}

impl Default for AudienceStore {
    fn default() -> Self {
        Self::new()
    }
}
