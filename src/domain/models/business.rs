use serde::{Deserialize, Serialize};
use chrono::{DateTime, Utc};
use sqlx::FromRow;
use uuid::Uuid;

#[derive(Debug, Serialize, Deserialize, FromRow, Clone)]
pub struct Business {
    pub id: String,
    pub name: String,
    pub slug: String,
    pub timezone: String,
    pub use_class_schedule: bool,
    pub created_at: DateTime<Utc>,
}

impl Business {
    pub fn new(name: String, slug: String, timezone: String, use_class_schedule: bool) -> Self {
        Self {
            id: Uuid::new_v4().to_string(),
            name,
            slug,
            timezone,
            use_class_schedule,
            created_at: Utc::now(),
        }
    }
}
