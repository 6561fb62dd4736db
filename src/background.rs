use std::sync::Arc;
use std::time::Duration;
use tokio::time::sleep;
use tracing::{error, info, warn, info_span, Instrument};
use chrono_tz::Tz;

use crate::domain::models::job::{Job, JOB_CONFIRMATION, JOB_RESCHEDULE_NOTICE};
use crate::domain::services::calendar::generate_ics;
use crate::error::AppError;
use crate::state::AppState;

pub async fn start_background_worker(state: Arc<AppState>) {
    info!("Starting background notification worker...");

    loop {
        match state.job_repo.find_pending(10).await {
            Ok(jobs) => {
                for job in jobs {
                    let job_id = job.id.clone();
                    let job_type = job.job_type.clone();
                    let business_id = job.payload.business_id.clone();

                    let span = info_span!(
                        "background_job",
                        job_id = %job_id,
                        job_type = %job_type,
                        business_id = %business_id
                    );

                    let state = state.clone();

                    async move {
                        info!("Processing job: {}", job_type);
                        match process_job(&state, &job).await {
                            Ok(_) => {
                                info!("Job completed successfully");
                                if let Err(e) = state.job_repo.update_status(&job.id, "COMPLETED", None).await {
                                    error!("Failed to mark job as completed: {:?}", e);
                                }
                            },
                            Err(e) => {
                                let err_msg = format!("{}", e);
                                error!("Job failed with error: {}", err_msg);
                                if let Err(up_err) = state.job_repo.update_status(&job.id, "FAILED", Some(err_msg)).await {
                                    error!("Failed to mark job as failed: {:?}", up_err);
                                }
                            }
                        }
                    }
                        .instrument(span)
                        .await;
                }
            }
            Err(e) => error!("Failed to fetch pending jobs: {:?}", e),
        }
        sleep(Duration::from_secs(5)).await;
    }
}

async fn process_job(state: &Arc<AppState>, job: &Job) -> Result<(), AppError> {
    let appointment_id = &job.payload.appointment_id;
    let business_id = &job.payload.business_id;

    let business = state.business_repo.find_by_id(business_id).await?
        .ok_or(AppError::NotFound(format!("Business {} not found", business_id)))?;
    let appointment = state.appointment_repo.find_by_id(business_id, appointment_id).await?
        .ok_or(AppError::NotFound(format!("Appointment {} not found", appointment_id)))?;
    let service = state.service_repo.find_by_id(business_id, &appointment.service_id).await?
        .ok_or(AppError::NotFound(format!("Service {} not found", appointment.service_id)))?;

    let recipient = appointment.customer_email.clone()
        .ok_or(AppError::Validation("Appointment has no customer email".into()))?;

    let tz: Tz = business.timezone.parse().unwrap_or(chrono_tz::UTC);
    let local_start = appointment.start_time.with_timezone(&tz);

    let location_name = match &appointment.location_id {
        Some(loc_id) => state.location_repo.find_by_id(business_id, loc_id).await?.map(|l| l.name),
        None => None,
    };

    let base_url = &state.config.frontend_url;

    let mut context = tera::Context::new();
    context.insert("customer_name", &appointment.customer_name);
    context.insert("service_name", &service.name);
    context.insert("business_name", &business.name);
    context.insert("timezone", &business.timezone);
    context.insert("duration", &service.duration_min);
    context.insert("location", &location_name);

    match job.job_type.as_str() {
        JOB_CONFIRMATION => {
            context.insert("start_time", &local_start.format("%Y-%m-%d %H:%M").to_string());
            let manage_link = format!("{}/manage/{}", base_url, appointment.management_token);
            context.insert("manage_link", &manage_link);

            let html = state.templates.render("confirmation.html", &context)
                .map_err(|e| AppError::InternalWithMsg(format!("Template render error: {:?}", e)))?;
            let subject = format!("Appointment confirmed: {}", service.name);

            let ics = generate_ics(&business, &service, &appointment);

            info!("Sending confirmation email to {}", recipient);
            state.dispatcher.send(&recipient, &subject, &html, Some("invite.ics"), Some(ics.as_bytes())).await?;
        }
        JOB_RESCHEDULE_NOTICE => {
            context.insert("old_start_time", &local_start.format("%Y-%m-%d %H:%M").to_string());
            context.insert("reason", &job.payload.reason);
            context.insert("deadline", &job.payload.reschedule_deadline.map(|d| d.to_string()));
            let booking_link = format!("{}/book/{}/{}", base_url, business.slug, service.slug);
            context.insert("booking_link", &booking_link);

            let html = state.templates.render("reschedule.html", &context)
                .map_err(|e| AppError::InternalWithMsg(format!("Template render error: {:?}", e)))?;
            let subject = format!("Action needed: rebook your {} appointment", service.name);

            info!("Sending reschedule notice to {}", recipient);
            state.dispatcher.send(&recipient, &subject, &html, None, None).await?;
        }
        other => {
            warn!("Unknown job type {}, skipping", other);
        }
    }

    Ok(())
}
