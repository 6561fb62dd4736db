pub mod sqlite_appointment_repo;
pub mod sqlite_business_repo;
pub mod sqlite_job_repo;
pub mod sqlite_location_repo;
pub mod sqlite_schedule_repo;
pub mod sqlite_service_repo;

pub mod postgres_appointment_repo;
pub mod postgres_business_repo;
pub mod postgres_job_repo;
pub mod postgres_location_repo;
pub mod postgres_schedule_repo;
pub mod postgres_service_repo;
