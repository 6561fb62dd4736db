use axum::{extract::{State, Path}, response::IntoResponse, Json};
use crate::state::AppState;
use crate::api::extractors::business::BusinessId;
use crate::api::dtos::{
    requests::{CreateBusinessRequest, UpdateBusinessRequest},
    responses::BusinessCreatedResponse,
};
use crate::domain::models::business::Business;
use crate::error::AppError;
use std::sync::Arc;
use chrono_tz::Tz;
use tracing::info;

pub async fn create_business(
    State(state): State<Arc<AppState>>,
    Json(payload): Json<CreateBusinessRequest>,
) -> Result<impl IntoResponse, AppError> {
    if payload.slug.trim().is_empty() {
        return Err(AppError::Validation("Slug must not be empty".into()));
    }
    if payload.timezone.parse::<Tz>().is_err() {
        return Err(AppError::Validation("Invalid timezone".into()));
    }

    let business = Business::new(
        payload.name,
        payload.slug,
        payload.timezone,
        payload.use_class_schedule.unwrap_or(false),
    );

    let created = state.business_repo.create(&business).await?;
    info!("Business created: {} ({})", created.slug, created.id);

    Ok(Json(BusinessCreatedResponse {
        business_id: created.id,
        slug: created.slug,
    }))
}

pub async fn get_business_by_slug(
    State(state): State<Arc<AppState>>,
    Path(slug): Path<String>,
) -> Result<impl IntoResponse, AppError> {
    let business = state.business_repo.find_by_slug(&slug).await?
        .ok_or(AppError::NotFound("Business not found".into()))?;
    Ok(Json(business))
}

pub async fn get_business(
    State(state): State<Arc<AppState>>,
    BusinessId(business_id): BusinessId,
) -> Result<impl IntoResponse, AppError> {
    let business = state.business_repo.find_by_id(&business_id).await?
        .ok_or(AppError::NotFound("Business not found".into()))?;
    Ok(Json(business))
}

pub async fn update_business(
    State(state): State<Arc<AppState>>,
    BusinessId(business_id): BusinessId,
    Json(payload): Json<UpdateBusinessRequest>,
) -> Result<impl IntoResponse, AppError> {
    let mut business = state.business_repo.find_by_id(&business_id).await?
        .ok_or(AppError::NotFound("Business not found".into()))?;

    if let Some(val) = payload.name { business.name = val; }
    if let Some(val) = payload.timezone {
        if val.parse::<Tz>().is_err() {
            return Err(AppError::Validation("Invalid timezone".into()));
        }
        business.timezone = val;
    }
    if let Some(val) = payload.use_class_schedule { business.use_class_schedule = val; }

    let updated = state.business_repo.update(&business).await?;
    info!("Business updated: {}", updated.id);
    Ok(Json(updated))
}
