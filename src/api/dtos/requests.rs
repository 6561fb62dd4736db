use chrono::NaiveDate;
use serde::Deserialize;

#[derive(Deserialize)]
pub struct CreateBusinessRequest {
    pub name: String,
    pub slug: String,
    pub timezone: String,
    pub use_class_schedule: Option<bool>,
}

#[derive(Deserialize)]
pub struct UpdateBusinessRequest {
    pub name: Option<String>,
    pub timezone: Option<String>,
    pub use_class_schedule: Option<bool>,
}

#[derive(Deserialize)]
pub struct CreateLocationRequest {
    pub name: String,
    pub address: Option<String>,
}

#[derive(Deserialize)]
pub struct UpdateLocationRequest {
    pub name: Option<String>,
    pub address: Option<String>,
}

#[derive(Deserialize)]
pub struct CreateServiceRequest {
    pub slug: String,
    pub name: String,
    pub description: Option<String>,
    pub duration_min: i32,
    pub buffer_min: Option<i32>,
    pub slot_capacity: Option<i32>,
}

#[derive(Deserialize)]
pub struct UpdateServiceRequest {
    pub slug: Option<String>,
    pub name: Option<String>,
    pub description: Option<String>,
    pub duration_min: Option<i32>,
    pub buffer_min: Option<i32>,
    pub slot_capacity: Option<i32>,
    pub active: Option<bool>,
}

/// "HH:MM" pair as entered in the dashboard.
#[derive(Deserialize)]
pub struct TimeRangePayload {
    pub start: String,
    pub end: String,
}

#[derive(Deserialize)]
pub struct UpsertBusinessHoursRequest {
    pub location_id: Option<String>,
    pub day_of_week: i32,
    pub open_time: String,
    pub close_time: String,
    pub is_closed: Option<bool>,
    pub ranges: Option<Vec<TimeRangePayload>>,
}

#[derive(Deserialize)]
pub struct ReplaceServiceScheduleRequest {
    pub day_of_week: i32,
    /// Empty list clears the override for the day.
    pub ranges: Vec<TimeRangePayload>,
}

#[derive(Deserialize)]
pub struct CreateOffDayRequest {
    pub location_id: Option<String>,
    pub date: NaiveDate,
    pub reason: Option<String>,
}

#[derive(Deserialize)]
pub struct CreateSlotBlockRequest {
    pub date: NaiveDate,
    pub start_time: String,
}

#[derive(Deserialize)]
pub struct CreateClassRequest {
    pub location_id: String,
    pub facility: Option<String>,
    pub day_of_week: i32,
    pub start_time: String,
    pub service_slug: String,
    pub staff_id: Option<String>,
}

#[derive(Deserialize)]
pub struct CreateAppointmentRequest {
    pub date: String,
    pub time: String,
    pub name: String,
    pub email: Option<String>,
    pub notes: Option<String>,
    pub location_id: Option<String>,
    pub staff_id: Option<String>,
}

#[derive(Deserialize)]
pub struct CancelServiceRequest {
    pub effective_date: NaiveDate,
    pub reason: Option<String>,
    pub reschedule_deadline: Option<NaiveDate>,
}

#[derive(Deserialize)]
pub struct UpdateAppointmentStatusRequest {
    pub status: String,
}

#[derive(Deserialize)]
pub struct MarkAttendanceRequest {
    pub attendance_status: String,
}
