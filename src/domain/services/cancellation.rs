use std::sync::Arc;

use chrono::NaiveDate;
use chrono_tz::Tz;
use serde::Serialize;
use tracing::{info, warn};

use crate::domain::models::business::Business;
use crate::domain::models::job::Job;
use crate::domain::models::service::Service;
use crate::domain::ports::{AppointmentRepository, JobRepository};
use crate::domain::services::availability::local_day_bounds;
use crate::error::AppError;

/// Outcome of one cascade run. Notification attempts are independent of the
/// status update; partial success is reported, never escalated.
#[derive(Debug, Serialize)]
pub struct CascadeReport {
    pub cancelled: usize,
    pub notifications_enqueued: usize,
    pub notifications_failed: usize,
    pub skipped_no_email: usize,
}

pub struct CancellationService {
    appointment_repo: Arc<dyn AppointmentRepository>,
    job_repo: Arc<dyn JobRepository>,
}

impl CancellationService {
    pub fn new(appointment_repo: Arc<dyn AppointmentRepository>, job_repo: Arc<dyn JobRepository>) -> Self {
        Self { appointment_repo, job_repo }
    }

    /// Cancels every pending/confirmed appointment of `service` starting on
    /// or after `effective` (business-local midnight) and enqueues one
    /// reschedule notification per affected appointment that left an email.
    pub async fn cancel_service(
        &self,
        business: &Business,
        service: &Service,
        effective: NaiveDate,
        reason: Option<String>,
        reschedule_deadline: Option<NaiveDate>,
    ) -> Result<CascadeReport, AppError> {
        let tz: Tz = business.timezone.parse().unwrap_or(chrono_tz::UTC);
        let (from_utc, _) = local_day_bounds(tz, effective);

        let affected = self
            .appointment_repo
            .cancel_future_for_service(&service.id, from_utc, reason.as_deref())
            .await?;

        info!(
            "Cancellation cascade for service {}: {} appointments affected from {}",
            service.id,
            affected.len(),
            from_utc
        );

        let mut enqueued = 0;
        let mut failed = 0;
        let mut skipped = 0;

        for appointment in &affected {
            if appointment.customer_email.is_none() {
                skipped += 1;
                continue;
            }

            let job = Job::reschedule_notice(
                appointment.id.clone(),
                business.id.clone(),
                reason.clone(),
                reschedule_deadline,
            );

            match self.job_repo.create(&job).await {
                Ok(_) => enqueued += 1,
                Err(e) => {
                    warn!("Failed to enqueue reschedule notice for {}: {:?}", appointment.id, e);
                    failed += 1;
                }
            }
        }

        Ok(CascadeReport {
            cancelled: affected.len(),
            notifications_enqueued: enqueued,
            notifications_failed: failed,
            skipped_no_email: skipped,
        })
    }
}
