use crate::domain::models::{
    appointment::Appointment,
    business::Business,
    job::Job,
    location::Location,
    schedule::{BusinessHours, DaySources, HourRange, OffDay, ScheduledClass, ServiceScheduleRange, SlotBlock},
    service::Service,
};
use crate::error::AppError;
use async_trait::async_trait;
use chrono::{DateTime, NaiveDate, Utc};

#[async_trait]
pub trait BusinessRepository: Send + Sync {
    async fn create(&self, business: &Business) -> Result<Business, AppError>;
    async fn find_by_id(&self, id: &str) -> Result<Option<Business>, AppError>;
    async fn find_by_slug(&self, slug: &str) -> Result<Option<Business>, AppError>;
    async fn update(&self, business: &Business) -> Result<Business, AppError>;
}

#[async_trait]
pub trait LocationRepository: Send + Sync {
    async fn create(&self, location: &Location) -> Result<Location, AppError>;
    async fn find_by_id(&self, business_id: &str, id: &str) -> Result<Option<Location>, AppError>;
    async fn list(&self, business_id: &str) -> Result<Vec<Location>, AppError>;
    async fn update(&self, location: &Location) -> Result<Location, AppError>;
    async fn delete(&self, business_id: &str, id: &str) -> Result<(), AppError>;
}

#[async_trait]
pub trait ServiceRepository: Send + Sync {
    async fn create(&self, service: &Service) -> Result<Service, AppError>;
    async fn find_by_id(&self, business_id: &str, id: &str) -> Result<Option<Service>, AppError>;
    async fn find_by_slug(&self, business_id: &str, slug: &str) -> Result<Option<Service>, AppError>;
    async fn list(&self, business_id: &str) -> Result<Vec<Service>, AppError>;
    async fn update(&self, service: &Service) -> Result<Service, AppError>;
    async fn delete(&self, business_id: &str, id: &str) -> Result<(), AppError>;
}

/// The schedule source store: raw reads over the five time-rule tables plus
/// class schedules. Absence of rows is an empty result, never an error; all
/// precedence logic lives in the availability resolver.
#[async_trait]
pub trait ScheduleRepository: Send + Sync {
    async fn upsert_business_hours(&self, hours: &BusinessHours, ranges: &[HourRange]) -> Result<BusinessHours, AppError>;
    async fn list_business_hours(&self, business_id: &str) -> Result<Vec<BusinessHours>, AppError>;
    async fn list_hour_ranges(&self, business_hours_id: &str) -> Result<Vec<HourRange>, AppError>;

    async fn replace_service_ranges(&self, service_id: &str, day_of_week: i32, ranges: &[ServiceScheduleRange]) -> Result<(), AppError>;
    async fn list_service_ranges(&self, service_id: &str) -> Result<Vec<ServiceScheduleRange>, AppError>;

    async fn create_off_day(&self, off_day: &OffDay) -> Result<OffDay, AppError>;
    async fn list_off_days(&self, business_id: &str) -> Result<Vec<OffDay>, AppError>;
    async fn delete_off_day(&self, business_id: &str, id: &str) -> Result<(), AppError>;

    async fn create_slot_block(&self, block: &SlotBlock) -> Result<SlotBlock, AppError>;
    async fn list_slot_blocks(&self, service_id: &str) -> Result<Vec<SlotBlock>, AppError>;
    async fn delete_slot_block(&self, business_id: &str, id: &str) -> Result<(), AppError>;

    async fn create_class(&self, class: &ScheduledClass) -> Result<ScheduledClass, AppError>;
    async fn list_classes(&self, business_id: &str) -> Result<Vec<ScheduledClass>, AppError>;
    async fn delete_class(&self, business_id: &str, id: &str) -> Result<(), AppError>;

    /// One bundle of raw rows scoped to (business, location?, service?, date).
    /// `day_of_week` is derived from `date` in the business timezone by the
    /// caller so the store itself stays timezone-agnostic.
    async fn load_day_sources(
        &self,
        business_id: &str,
        location_id: Option<&str>,
        service_id: Option<&str>,
        date: NaiveDate,
        day_of_week: i32,
    ) -> Result<DaySources, AppError>;
}

#[async_trait]
pub trait AppointmentRepository: Send + Sync {
    /// Inserts inside a transaction that re-counts overlapping active
    /// appointments first; a full slot is a Conflict, so concurrent bookings
    /// cannot oversubscribe. Notification jobs ride the same transaction.
    async fn create(&self, appointment: &Appointment, slot_capacity: i32, jobs: Vec<Job>) -> Result<Appointment, AppError>;
    async fn find_by_id(&self, business_id: &str, id: &str) -> Result<Option<Appointment>, AppError>;
    async fn find_by_token(&self, token: &str) -> Result<Option<Appointment>, AppError>;
    async fn list_by_service(&self, business_id: &str, service_id: &str) -> Result<Vec<Appointment>, AppError>;
    async fn list_by_business(&self, business_id: &str) -> Result<Vec<Appointment>, AppError>;
    /// Active (non-cancelled) appointments overlapping [start, end).
    async fn list_by_range(&self, service_id: &str, start: DateTime<Utc>, end: DateTime<Utc>) -> Result<Vec<Appointment>, AppError>;
    async fn update_status(&self, business_id: &str, id: &str, status: &str) -> Result<Appointment, AppError>;
    async fn mark_attendance(&self, business_id: &str, id: &str, attendance_status: &str) -> Result<Appointment, AppError>;
    async fn cancel(&self, appointment: &Appointment, reason: Option<&str>) -> Result<Appointment, AppError>;
    /// Bulk-cancels PENDING/CONFIRMED appointments of a service starting at
    /// or after `from`, returning the affected rows (pre-update status).
    async fn cancel_future_for_service(&self, service_id: &str, from: DateTime<Utc>, reason: Option<&str>) -> Result<Vec<Appointment>, AppError>;
}

#[async_trait]
pub trait JobRepository: Send + Sync {
    async fn create(&self, job: &Job) -> Result<Job, AppError>;
    async fn find_pending(&self, limit: i32) -> Result<Vec<Job>, AppError>;
    async fn list_by_business(&self, business_id: &str) -> Result<Vec<Job>, AppError>;
    async fn update_status(&self, id: &str, status: &str, error_message: Option<String>) -> Result<(), AppError>;
}

/// External notification dispatcher. The caller never blocks domain flow on
/// its result; failures are recorded per attempt.
#[async_trait]
pub trait NotificationDispatcher: Send + Sync {
    async fn send(
        &self,
        recipient: &str,
        subject: &str,
        html_body: &str,
        attachment_name: Option<&str>,
        attachment_data: Option<&[u8]>,
    ) -> Result<(), AppError>;
}
