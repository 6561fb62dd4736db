use serde::{Deserialize, Serialize};
use uuid::Uuid;
use chrono::{DateTime, Utc};
use sqlx::FromRow;
use rand::{distributions::Alphanumeric, Rng};

pub const STATUS_PENDING: &str = "PENDING";
pub const STATUS_CONFIRMED: &str = "CONFIRMED";
pub const STATUS_COMPLETED: &str = "COMPLETED";
pub const STATUS_CANCELLED: &str = "CANCELLED";

pub const ATTENDANCE_PRESENT: &str = "PRESENT";
pub const ATTENDANCE_NO_SHOW: &str = "NO_SHOW";

#[derive(Debug, Serialize, Deserialize, FromRow, Clone)]
pub struct Appointment {
    pub id: String,
    pub business_id: String,
    pub service_id: String,
    pub location_id: Option<String>,
    pub staff_id: Option<String>,
    pub customer_name: String,
    pub customer_email: Option<String>,
    pub customer_note: Option<String>,
    pub start_time: DateTime<Utc>,
    pub end_time: DateTime<Utc>,
    pub status: String,
    pub attendance_status: Option<String>,
    pub cancellation_reason: Option<String>,
    pub management_token: String,
    pub created_at: DateTime<Utc>,
}

pub struct NewAppointmentParams {
    pub business_id: String,
    pub service_id: String,
    pub location_id: Option<String>,
    pub staff_id: Option<String>,
    pub start: DateTime<Utc>,
    pub duration_min: i32,
    pub name: String,
    pub email: Option<String>,
    pub note: Option<String>,
}

impl Appointment {
    pub fn new(params: NewAppointmentParams) -> Self {
        let end_time = params.start + chrono::Duration::minutes(params.duration_min as i64);

        let token: String = rand::thread_rng()
            .sample_iter(&Alphanumeric)
            .take(48)
            .map(char::from)
            .collect();

        Self {
            id: Uuid::new_v4().to_string(),
            business_id: params.business_id,
            service_id: params.service_id,
            location_id: params.location_id,
            staff_id: params.staff_id,
            customer_name: params.name,
            customer_email: params.email,
            customer_note: params.note,
            start_time: params.start,
            end_time,
            status: STATUS_CONFIRMED.to_string(),
            attendance_status: None,
            cancellation_reason: None,
            management_token: token,
            created_at: Utc::now(),
        }
    }

    /// Statuses that occupy capacity in the conflict filter.
    pub fn occupies_slot(&self) -> bool {
        self.status != STATUS_CANCELLED
    }
}
