use axum::{extract::{State, Path}, response::IntoResponse, Json};
use crate::state::AppState;
use crate::api::extractors::business::BusinessId;
use crate::api::dtos::requests::CreateSlotBlockRequest;
use crate::domain::models::schedule::SlotBlock;
use crate::error::AppError;
use std::sync::Arc;
use chrono::NaiveTime;
use tracing::info;

pub async fn create_slot_block(
    State(state): State<Arc<AppState>>,
    BusinessId(business_id): BusinessId,
    Path((_, slug)): Path<(String, String)>,
    Json(payload): Json<CreateSlotBlockRequest>,
) -> Result<impl IntoResponse, AppError> {
    let service = state.service_repo.find_by_slug(&business_id, &slug).await?
        .ok_or(AppError::NotFound("Service not found".into()))?;

    let start_time = NaiveTime::parse_from_str(&payload.start_time, "%H:%M")
        .map_err(|_| AppError::Validation("Invalid start_time (HH:MM)".into()))?;

    let block = SlotBlock::new(business_id, service.id, payload.date, start_time);
    let created = state.schedule_repo.create_slot_block(&block).await?;
    info!("Slot block created: {} on {} at {}", created.id, created.date, created.start_time);
    Ok(Json(created))
}

pub async fn list_slot_blocks(
    State(state): State<Arc<AppState>>,
    BusinessId(business_id): BusinessId,
    Path((_, slug)): Path<(String, String)>,
) -> Result<impl IntoResponse, AppError> {
    let service = state.service_repo.find_by_slug(&business_id, &slug).await?
        .ok_or(AppError::NotFound("Service not found".into()))?;

    let blocks = state.schedule_repo.list_slot_blocks(&service.id).await?;
    Ok(Json(blocks))
}

pub async fn delete_slot_block(
    State(state): State<Arc<AppState>>,
    BusinessId(business_id): BusinessId,
    Path((_, block_id)): Path<(String, String)>,
) -> Result<impl IntoResponse, AppError> {
    state.schedule_repo.delete_slot_block(&business_id, &block_id).await?;
    info!("Slot block deleted: {}", block_id);
    Ok(Json(serde_json::json!({"status": "deleted"})))
}
