use axum::{extract::{State, Path}, response::IntoResponse, Json};
use crate::state::AppState;
use crate::api::extractors::business::BusinessId;
use crate::api::dtos::requests::{CreateAppointmentRequest, MarkAttendanceRequest, UpdateAppointmentStatusRequest};
use crate::domain::models::appointment::{
    Appointment, NewAppointmentParams, ATTENDANCE_NO_SHOW, ATTENDANCE_PRESENT,
    STATUS_CANCELLED, STATUS_COMPLETED, STATUS_CONFIRMED, STATUS_PENDING,
};
use crate::domain::models::job::{Job, JOB_CONFIRMATION};
use crate::domain::services::availability::{calculate_slots, local_day_bounds};
use crate::error::AppError;
use std::sync::Arc;
use chrono::{Datelike, NaiveDate, NaiveTime, TimeZone, Utc};
use chrono_tz::Tz;
use tracing::{info, warn};

pub async fn create_appointment(
    State(state): State<Arc<AppState>>,
    BusinessId(business_id): BusinessId,
    Path((_, slug)): Path<(String, String)>,
    Json(payload): Json<CreateAppointmentRequest>,
) -> Result<impl IntoResponse, AppError> {
    info!("create_appointment: Starting for service {}", slug);

    let business = state.business_repo.find_by_id(&business_id).await?
        .ok_or(AppError::NotFound("Business not found".into()))?;
    let service = state.service_repo.find_by_slug(&business_id, &slug).await?
        .ok_or(AppError::NotFound("Service not found".into()))?;

    if !service.active {
        return Err(AppError::Forbidden("Service is not bookable".into()));
    }

    let tz: Tz = business.timezone.parse().unwrap_or(chrono_tz::UTC);

    let date = NaiveDate::parse_from_str(&payload.date, "%Y-%m-%d")
        .map_err(|_| AppError::Validation("Invalid date format".into()))?;

    let time = if payload.time.contains('T') {
        let dt = chrono::DateTime::parse_from_rfc3339(&payload.time)
            .map_err(|_| AppError::Validation("Invalid ISO time format".into()))?;
        dt.with_timezone(&tz).time()
    } else {
        NaiveTime::parse_from_str(&payload.time, "%H:%M")
            .map_err(|_| AppError::Validation("Invalid time format (HH:MM)".into()))?
    };

    let naive_dt = date.and_time(time);

    let start_time = tz.from_local_datetime(&naive_dt)
        .single()
        .ok_or(AppError::Validation("Invalid local time (ambiguous or skipped due to DST)".into()))?
        .with_timezone(&Utc);

    if start_time < Utc::now() {
        return Err(AppError::Validation("Cannot book in the past".into()));
    }

    info!("create_appointment: Checking availability for {} (UTC: {})", date, start_time);

    let day_of_week = date.weekday().num_days_from_monday() as i32;
    let sources = state.schedule_repo
        .load_day_sources(&business.id, payload.location_id.as_deref(), Some(&service.id), date, day_of_week)
        .await?;

    let (day_start, day_end) = local_day_bounds(tz, date);
    let existing = state.appointment_repo.list_by_range(&service.id, day_start, day_end).await?;

    let valid_slots = calculate_slots(&business, &service, date, &sources, &existing, Utc::now());

    let Some(slot) = valid_slots.iter().find(|s| s.start == start_time) else {
        warn!("Booking rejected: slot {} not available for service {}", start_time, slug);
        return Err(AppError::Conflict("Selected time slot is not available or valid".into()));
    };

    // class slots carry their own staff; explicit staff in the request wins
    let staff_id = payload.staff_id.or_else(|| slot.staff_id.clone());

    let appointment = Appointment::new(NewAppointmentParams {
        business_id: business_id.clone(),
        service_id: service.id.clone(),
        location_id: payload.location_id,
        staff_id,
        start: start_time,
        duration_min: service.duration_min,
        name: payload.name,
        email: payload.email,
        note: payload.notes,
    });

    let mut jobs = Vec::new();
    if appointment.customer_email.is_some() {
        jobs.push(Job::new(JOB_CONFIRMATION, appointment.id.clone(), business_id.clone(), Utc::now()));
    }

    info!("create_appointment: Inserting appointment into DB...");
    let created = state.appointment_repo.create(&appointment, service.slot_capacity, jobs).await?;
    info!("Appointment confirmed: {} for service {}", created.id, slug);

    Ok(Json(created))
}

pub async fn list_service_appointments(
    State(state): State<Arc<AppState>>,
    BusinessId(business_id): BusinessId,
    Path((_, slug)): Path<(String, String)>,
) -> Result<impl IntoResponse, AppError> {
    let service = state.service_repo.find_by_slug(&business_id, &slug).await?
        .ok_or(AppError::NotFound("Service not found".into()))?;

    let appointments = state.appointment_repo.list_by_service(&business_id, &service.id).await?;
    Ok(Json(appointments))
}

pub async fn list_all_appointments(
    State(state): State<Arc<AppState>>,
    BusinessId(business_id): BusinessId,
) -> Result<impl IntoResponse, AppError> {
    let appointments = state.appointment_repo.list_by_business(&business_id).await?;
    Ok(Json(appointments))
}

pub async fn get_appointment(
    State(state): State<Arc<AppState>>,
    BusinessId(business_id): BusinessId,
    Path((_, appointment_id)): Path<(String, String)>,
) -> Result<impl IntoResponse, AppError> {
    let appointment = state.appointment_repo.find_by_id(&business_id, &appointment_id).await?
        .ok_or(AppError::NotFound("Appointment not found".into()))?;
    Ok(Json(appointment))
}

pub async fn update_appointment_status(
    State(state): State<Arc<AppState>>,
    BusinessId(business_id): BusinessId,
    Path((_, appointment_id)): Path<(String, String)>,
    Json(payload): Json<UpdateAppointmentStatusRequest>,
) -> Result<impl IntoResponse, AppError> {
    match payload.status.as_str() {
        STATUS_PENDING | STATUS_CONFIRMED | STATUS_COMPLETED | STATUS_CANCELLED => {}
        _ => return Err(AppError::Validation("Invalid status".into())),
    }

    let updated = state.appointment_repo.update_status(&business_id, &appointment_id, &payload.status).await?;
    info!("Appointment {} status set to {}", appointment_id, payload.status);
    Ok(Json(updated))
}

pub async fn mark_attendance(
    State(state): State<Arc<AppState>>,
    BusinessId(business_id): BusinessId,
    Path((_, appointment_id)): Path<(String, String)>,
    Json(payload): Json<MarkAttendanceRequest>,
) -> Result<impl IntoResponse, AppError> {
    match payload.attendance_status.as_str() {
        ATTENDANCE_PRESENT | ATTENDANCE_NO_SHOW => {}
        _ => return Err(AppError::Validation("Invalid attendance status".into())),
    }

    let updated = state.appointment_repo.mark_attendance(&business_id, &appointment_id, &payload.attendance_status).await?;
    info!("Appointment {} attendance set to {}", appointment_id, payload.attendance_status);
    Ok(Json(updated))
}
