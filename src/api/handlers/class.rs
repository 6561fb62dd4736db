use axum::{extract::{State, Path}, response::IntoResponse, Json};
use crate::state::AppState;
use crate::api::extractors::business::BusinessId;
use crate::api::dtos::requests::CreateClassRequest;
use crate::domain::models::schedule::{NewScheduledClassParams, ScheduledClass};
use crate::error::AppError;
use std::sync::Arc;
use chrono::NaiveTime;
use tracing::info;

pub async fn create_class(
    State(state): State<Arc<AppState>>,
    BusinessId(business_id): BusinessId,
    Json(payload): Json<CreateClassRequest>,
) -> Result<impl IntoResponse, AppError> {
    if !(0..=6).contains(&payload.day_of_week) {
        return Err(AppError::Validation("day_of_week must be 0 (Monday) to 6 (Sunday)".into()));
    }

    state.location_repo.find_by_id(&business_id, &payload.location_id).await?
        .ok_or(AppError::NotFound("Location not found".into()))?;
    let service = state.service_repo.find_by_slug(&business_id, &payload.service_slug).await?
        .ok_or(AppError::NotFound("Service not found".into()))?;

    let start_time = NaiveTime::parse_from_str(&payload.start_time, "%H:%M")
        .map_err(|_| AppError::Validation("Invalid start_time (HH:MM)".into()))?;

    let class = ScheduledClass::new(NewScheduledClassParams {
        business_id,
        location_id: payload.location_id,
        facility: payload.facility,
        day_of_week: payload.day_of_week,
        start_time,
        service_id: service.id,
        staff_id: payload.staff_id,
    });

    let created = state.schedule_repo.create_class(&class).await?;
    info!("Class created: {} (day {} at {})", created.id, created.day_of_week, created.start_time);
    Ok(Json(created))
}

pub async fn list_classes(
    State(state): State<Arc<AppState>>,
    BusinessId(business_id): BusinessId,
) -> Result<impl IntoResponse, AppError> {
    let classes = state.schedule_repo.list_classes(&business_id).await?;
    Ok(Json(classes))
}

pub async fn delete_class(
    State(state): State<Arc<AppState>>,
    BusinessId(business_id): BusinessId,
    Path((_, class_id)): Path<(String, String)>,
) -> Result<impl IntoResponse, AppError> {
    state.schedule_repo.delete_class(&business_id, &class_id).await?;
    info!("Class deleted: {}", class_id);
    Ok(Json(serde_json::json!({"status": "deleted"})))
}
