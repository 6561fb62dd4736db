use axum::{extract::{State, Path}, response::IntoResponse, Json};
use crate::state::AppState;
use crate::api::extractors::business::BusinessId;
use crate::api::dtos::requests::{CreateLocationRequest, UpdateLocationRequest};
use crate::domain::models::location::Location;
use crate::error::AppError;
use std::sync::Arc;
use tracing::info;

pub async fn create_location(
    State(state): State<Arc<AppState>>,
    BusinessId(business_id): BusinessId,
    Json(payload): Json<CreateLocationRequest>,
) -> Result<impl IntoResponse, AppError> {
    if payload.name.trim().is_empty() {
        return Err(AppError::Validation("Location name must not be empty".into()));
    }

    let location = Location::new(business_id, payload.name, payload.address);
    let created = state.location_repo.create(&location).await?;
    info!("Location created: {}", created.id);
    Ok(Json(created))
}

pub async fn list_locations(
    State(state): State<Arc<AppState>>,
    BusinessId(business_id): BusinessId,
) -> Result<impl IntoResponse, AppError> {
    let locations = state.location_repo.list(&business_id).await?;
    Ok(Json(locations))
}

pub async fn update_location(
    State(state): State<Arc<AppState>>,
    BusinessId(business_id): BusinessId,
    Path((_, location_id)): Path<(String, String)>,
    Json(payload): Json<UpdateLocationRequest>,
) -> Result<impl IntoResponse, AppError> {
    let mut location = state.location_repo.find_by_id(&business_id, &location_id).await?
        .ok_or(AppError::NotFound("Location not found".into()))?;

    if let Some(val) = payload.name { location.name = val; }
    if let Some(val) = payload.address { location.address = Some(val); }

    let updated = state.location_repo.update(&location).await?;
    Ok(Json(updated))
}

pub async fn delete_location(
    State(state): State<Arc<AppState>>,
    BusinessId(business_id): BusinessId,
    Path((_, location_id)): Path<(String, String)>,
) -> Result<impl IntoResponse, AppError> {
    state.location_repo.delete(&business_id, &location_id).await?;
    info!("Location deleted: {}", location_id);
    Ok(Json(serde_json::json!({"status": "deleted"})))
}
