use serde::{Deserialize, Serialize};
use chrono::{DateTime, Utc};
use sqlx::FromRow;
use uuid::Uuid;

#[derive(Debug, Serialize, Deserialize, FromRow, Clone)]
pub struct Location {
    pub id: String,
    pub business_id: String,
    pub name: String,
    pub address: Option<String>,
    pub created_at: DateTime<Utc>,
}

impl Location {
    pub fn new(business_id: String, name: String, address: Option<String>) -> Self {
        Self {
            id: Uuid::new_v4().to_string(),
            business_id,
            name,
            address,
            created_at: Utc::now(),
        }
    }
}
