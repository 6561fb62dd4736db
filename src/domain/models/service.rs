use serde::{Deserialize, Serialize};
use chrono::{DateTime, Utc};
use sqlx::FromRow;
use uuid::Uuid;

#[derive(Debug, Serialize, Deserialize, FromRow, Clone)]
pub struct Service {
    pub id: String,
    pub business_id: String,
    pub slug: String,
    pub name: String,
    pub description: String,
    pub duration_min: i32,
    pub buffer_min: i32,
    pub slot_capacity: i32,
    pub active: bool,
    pub created_at: DateTime<Utc>,
}

pub struct NewServiceParams {
    pub business_id: String,
    pub slug: String,
    pub name: String,
    pub description: String,
    pub duration_min: i32,
    pub buffer_min: i32,
    pub slot_capacity: i32,
}

impl Service {
    pub fn new(params: NewServiceParams) -> Self {
        Self {
            id: Uuid::new_v4().to_string(),
            business_id: params.business_id,
            slug: params.slug,
            name: params.name,
            description: params.description,
            duration_min: params.duration_min,
            buffer_min: params.buffer_min,
            slot_capacity: params.slot_capacity,
            active: true,
            created_at: Utc::now(),
        }
    }
}
