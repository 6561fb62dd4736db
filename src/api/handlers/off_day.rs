use axum::{extract::{State, Path}, response::IntoResponse, Json};
use crate::state::AppState;
use crate::api::extractors::business::BusinessId;
use crate::api::dtos::requests::CreateOffDayRequest;
use crate::domain::models::schedule::OffDay;
use crate::error::AppError;
use std::sync::Arc;
use tracing::info;

pub async fn create_off_day(
    State(state): State<Arc<AppState>>,
    BusinessId(business_id): BusinessId,
    Json(payload): Json<CreateOffDayRequest>,
) -> Result<impl IntoResponse, AppError> {
    if let Some(loc) = &payload.location_id {
        state.location_repo.find_by_id(&business_id, loc).await?
            .ok_or(AppError::NotFound("Location not found".into()))?;
    }

    let off_day = OffDay::new(business_id, payload.location_id, payload.date, payload.reason);
    let created = state.schedule_repo.create_off_day(&off_day).await?;
    info!("Off-day created: {} on {}", created.id, created.date);
    Ok(Json(created))
}

pub async fn list_off_days(
    State(state): State<Arc<AppState>>,
    BusinessId(business_id): BusinessId,
) -> Result<impl IntoResponse, AppError> {
    let off_days = state.schedule_repo.list_off_days(&business_id).await?;
    Ok(Json(off_days))
}

pub async fn delete_off_day(
    State(state): State<Arc<AppState>>,
    BusinessId(business_id): BusinessId,
    Path((_, off_day_id)): Path<(String, String)>,
) -> Result<impl IntoResponse, AppError> {
    state.schedule_repo.delete_off_day(&business_id, &off_day_id).await?;
    info!("Off-day deleted: {}", off_day_id);
    Ok(Json(serde_json::json!({"status": "deleted"})))
}
