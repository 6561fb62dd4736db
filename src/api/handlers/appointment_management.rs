use axum::{extract::{State, Path}, response::IntoResponse, Json};
use crate::state::AppState;
use crate::domain::models::appointment::STATUS_CANCELLED;
use crate::error::AppError;
use std::sync::Arc;
use tracing::info;

pub async fn get_appointment_by_token(
    State(state): State<Arc<AppState>>,
    Path(token): Path<String>,
) -> Result<impl IntoResponse, AppError> {
    let appointment = state.appointment_repo.find_by_token(&token).await?
        .ok_or(AppError::NotFound("Appointment not found".into()))?;

    if appointment.status == STATUS_CANCELLED {
        return Err(AppError::Validation("Appointment is already cancelled".into()));
    }

    let service = state.service_repo.find_by_id(&appointment.business_id, &appointment.service_id).await?
        .ok_or(AppError::Internal)?;

    let response = serde_json::json!({
        "appointment": appointment,
        "service": service
    });

    Ok(Json(response))
}

pub async fn cancel_appointment(
    State(state): State<Arc<AppState>>,
    Path(token): Path<String>,
) -> Result<impl IntoResponse, AppError> {
    let appointment = state.appointment_repo.find_by_token(&token).await?
        .ok_or(AppError::NotFound("Appointment not found".into()))?;

    if appointment.status == STATUS_CANCELLED {
        return Ok(Json(appointment));
    }

    let cancelled = state.appointment_repo.cancel(&appointment, None).await?;
    info!("Appointment cancelled via management token: {}", appointment.id);

    Ok(Json(cancelled))
}
