use serde::{Deserialize, Serialize};
use chrono::{DateTime, NaiveDate, Utc};
use sqlx::types::Json;
use sqlx::FromRow;
use uuid::Uuid;

pub const JOB_CONFIRMATION: &str = "CONFIRMATION";
pub const JOB_RESCHEDULE_NOTICE: &str = "RESCHEDULE_NOTICE";

#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct JobPayload {
    pub appointment_id: String,
    pub business_id: String,
    #[serde(default)]
    pub reason: Option<String>,
    #[serde(default)]
    pub reschedule_deadline: Option<NaiveDate>,
}

#[derive(Debug, Serialize, Deserialize, FromRow, Clone)]
pub struct Job {
    pub id: String,
    pub job_type: String,
    pub payload: Json<JobPayload>,
    pub execute_at: DateTime<Utc>,
    pub status: String,
    pub error_message: Option<String>,
    pub created_at: DateTime<Utc>,
}

impl Job {
    pub fn new(job_type: &str, appointment_id: String, business_id: String, execute_at: DateTime<Utc>) -> Self {
        Self {
            id: Uuid::new_v4().to_string(),
            job_type: job_type.to_string(),
            payload: Json(JobPayload {
                appointment_id,
                business_id,
                reason: None,
                reschedule_deadline: None,
            }),
            execute_at,
            status: "PENDING".to_string(),
            error_message: None,
            created_at: Utc::now(),
        }
    }

    /// Cascade notification carrying the cancellation context the email
    /// template needs.
    pub fn reschedule_notice(
        appointment_id: String,
        business_id: String,
        reason: Option<String>,
        reschedule_deadline: Option<NaiveDate>,
    ) -> Self {
        Self {
            id: Uuid::new_v4().to_string(),
            job_type: JOB_RESCHEDULE_NOTICE.to_string(),
            payload: Json(JobPayload {
                appointment_id,
                business_id,
                reason,
                reschedule_deadline,
            }),
            execute_at: Utc::now(),
            status: "PENDING".to_string(),
            error_message: None,
            created_at: Utc::now(),
        }
    }
}
