use std::sync::Arc;
use crate::domain::ports::{
    AppointmentRepository, BusinessRepository, JobRepository, LocationRepository,
    NotificationDispatcher, ScheduleRepository, ServiceRepository,
};
use crate::config::Config;
use tera::Tera;

#[derive(Clone)]
pub struct AppState {
    pub config: Config,
    pub business_repo: Arc<dyn BusinessRepository>,
    pub location_repo: Arc<dyn LocationRepository>,
    pub service_repo: Arc<dyn ServiceRepository>,
    pub schedule_repo: Arc<dyn ScheduleRepository>,
    pub appointment_repo: Arc<dyn AppointmentRepository>,
    pub job_repo: Arc<dyn JobRepository>,
    pub dispatcher: Arc<dyn NotificationDispatcher>,
    pub templates: Arc<Tera>,
}
