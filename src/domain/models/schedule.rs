use serde::{Deserialize, Serialize};
use chrono::{DateTime, NaiveDate, NaiveTime, Utc};
use sqlx::FromRow;
use uuid::Uuid;

/// Weekly opening hours for a business, optionally scoped to one location.
/// `location_id = None` is the default row used by locations without an
/// override. `day_of_week` is 0 = Monday .. 6 = Sunday.
#[derive(Debug, Serialize, Deserialize, FromRow, Clone)]
pub struct BusinessHours {
    pub id: String,
    pub business_id: String,
    pub location_id: Option<String>,
    pub day_of_week: i32,
    pub open_time: NaiveTime,
    pub close_time: NaiveTime,
    pub is_closed: bool,
    pub created_at: DateTime<Utc>,
}

impl BusinessHours {
    pub fn new(
        business_id: String,
        location_id: Option<String>,
        day_of_week: i32,
        open_time: NaiveTime,
        close_time: NaiveTime,
        is_closed: bool,
    ) -> Self {
        Self {
            id: Uuid::new_v4().to_string(),
            business_id,
            location_id,
            day_of_week,
            open_time,
            close_time,
            is_closed,
            created_at: Utc::now(),
        }
    }
}

/// Disjoint sub-window of a BusinessHours day (e.g. 09-13 and 15-19).
/// When any rows exist they replace the parent open/close pair.
#[derive(Debug, Serialize, Deserialize, FromRow, Clone)]
pub struct HourRange {
    pub id: String,
    pub business_hours_id: String,
    pub start_time: NaiveTime,
    pub end_time: NaiveTime,
    pub display_order: i32,
    pub created_at: DateTime<Utc>,
}

impl HourRange {
    pub fn new(business_hours_id: String, start_time: NaiveTime, end_time: NaiveTime, display_order: i32) -> Self {
        Self {
            id: Uuid::new_v4().to_string(),
            business_hours_id,
            start_time,
            end_time,
            display_order,
            created_at: Utc::now(),
        }
    }
}

/// Per-service weekday override. Presence of any row for a (service, day)
/// means business hours are ignored for that service on that day.
#[derive(Debug, Serialize, Deserialize, FromRow, Clone)]
pub struct ServiceScheduleRange {
    pub id: String,
    pub service_id: String,
    pub day_of_week: i32,
    pub start_time: NaiveTime,
    pub end_time: NaiveTime,
    pub display_order: i32,
    pub created_at: DateTime<Utc>,
}

impl ServiceScheduleRange {
    pub fn new(service_id: String, day_of_week: i32, start_time: NaiveTime, end_time: NaiveTime, display_order: i32) -> Self {
        Self {
            id: Uuid::new_v4().to_string(),
            service_id,
            day_of_week,
            start_time,
            end_time,
            display_order,
            created_at: Utc::now(),
        }
    }
}

/// A dated full-day closure. `location_id = None` closes every location of
/// the business; a non-null row closes only that location.
#[derive(Debug, Serialize, Deserialize, FromRow, Clone)]
pub struct OffDay {
    pub id: String,
    pub business_id: String,
    pub location_id: Option<String>,
    pub date: NaiveDate,
    pub reason: Option<String>,
    pub created_at: DateTime<Utc>,
}

impl OffDay {
    pub fn new(business_id: String, location_id: Option<String>, date: NaiveDate, reason: Option<String>) -> Self {
        Self {
            id: Uuid::new_v4().to_string(),
            business_id,
            location_id,
            date,
            reason,
            created_at: Utc::now(),
        }
    }
}

/// Removes the service-duration-sized window starting at `start_time` on
/// one date, regardless of hours.
#[derive(Debug, Serialize, Deserialize, FromRow, Clone)]
pub struct SlotBlock {
    pub id: String,
    pub business_id: String,
    pub service_id: String,
    pub date: NaiveDate,
    pub start_time: NaiveTime,
    pub created_at: DateTime<Utc>,
}

impl SlotBlock {
    pub fn new(business_id: String, service_id: String, date: NaiveDate, start_time: NaiveTime) -> Self {
        Self {
            id: Uuid::new_v4().to_string(),
            business_id,
            service_id,
            date,
            start_time,
            created_at: Utc::now(),
        }
    }
}

/// Recurring weekly class slot. Only consulted when the owning business has
/// `use_class_schedule` set; slots are then this fixed list instead of
/// sliced open intervals.
#[derive(Debug, Serialize, Deserialize, FromRow, Clone)]
pub struct ScheduledClass {
    pub id: String,
    pub business_id: String,
    pub location_id: String,
    pub facility: Option<String>,
    pub day_of_week: i32,
    pub start_time: NaiveTime,
    pub service_id: String,
    pub staff_id: Option<String>,
    pub created_at: DateTime<Utc>,
}

pub struct NewScheduledClassParams {
    pub business_id: String,
    pub location_id: String,
    pub facility: Option<String>,
    pub day_of_week: i32,
    pub start_time: NaiveTime,
    pub service_id: String,
    pub staff_id: Option<String>,
}

impl ScheduledClass {
    pub fn new(params: NewScheduledClassParams) -> Self {
        Self {
            id: Uuid::new_v4().to_string(),
            business_id: params.business_id,
            location_id: params.location_id,
            facility: params.facility,
            day_of_week: params.day_of_week,
            start_time: params.start_time,
            service_id: params.service_id,
            staff_id: params.staff_id,
            created_at: Utc::now(),
        }
    }
}

/// Raw schedule rows for one (business, location, service, date), exactly as
/// stored. The availability resolver owns all merging and precedence; this
/// bundle never interprets anything.
#[derive(Debug, Clone, Default)]
pub struct DaySources {
    pub off_day: Option<OffDay>,
    pub location_hours: Option<BusinessHours>,
    pub location_ranges: Vec<HourRange>,
    pub default_hours: Option<BusinessHours>,
    pub default_ranges: Vec<HourRange>,
    pub service_ranges: Vec<ServiceScheduleRange>,
    pub slot_blocks: Vec<SlotBlock>,
    pub classes: Vec<ScheduledClass>,
}
