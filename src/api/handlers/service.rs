use axum::{extract::{State, Path}, response::IntoResponse, Json};
use crate::state::AppState;
use crate::api::extractors::business::BusinessId;
use crate::api::dtos::requests::{CancelServiceRequest, CreateServiceRequest, UpdateServiceRequest};
use crate::domain::models::service::{NewServiceParams, Service};
use crate::domain::services::cancellation::CancellationService;
use crate::error::AppError;
use std::sync::Arc;
use tracing::info;

pub async fn create_service(
    State(state): State<Arc<AppState>>,
    BusinessId(business_id): BusinessId,
    Json(payload): Json<CreateServiceRequest>,
) -> Result<impl IntoResponse, AppError> {
    if payload.slug.trim().is_empty() {
        return Err(AppError::Validation("Slug must not be empty".into()));
    }
    if payload.duration_min <= 0 {
        return Err(AppError::Validation("Duration must be positive".into()));
    }
    if payload.buffer_min.is_some_and(|b| b < 0) {
        return Err(AppError::Validation("Buffer must not be negative".into()));
    }
    if payload.slot_capacity.is_some_and(|c| c <= 0) {
        return Err(AppError::Validation("Capacity must be positive".into()));
    }

    let service = Service::new(NewServiceParams {
        business_id,
        slug: payload.slug,
        name: payload.name,
        description: payload.description.unwrap_or_default(),
        duration_min: payload.duration_min,
        buffer_min: payload.buffer_min.unwrap_or(0),
        slot_capacity: payload.slot_capacity.unwrap_or(1),
    });

    let created = state.service_repo.create(&service).await?;
    info!("Service created: {} ({})", created.slug, created.id);
    Ok(Json(created))
}

pub async fn list_services(
    State(state): State<Arc<AppState>>,
    BusinessId(business_id): BusinessId,
) -> Result<impl IntoResponse, AppError> {
    let services = state.service_repo.list(&business_id).await?;
    Ok(Json(services))
}

pub async fn get_service(
    State(state): State<Arc<AppState>>,
    BusinessId(business_id): BusinessId,
    Path((_, slug)): Path<(String, String)>,
) -> Result<impl IntoResponse, AppError> {
    let service = state.service_repo.find_by_slug(&business_id, &slug).await?
        .ok_or_else(|| AppError::NotFound(format!("Service '{}' not found", slug)))?;
    Ok(Json(service))
}

pub async fn update_service(
    State(state): State<Arc<AppState>>,
    BusinessId(business_id): BusinessId,
    Path((_, slug)): Path<(String, String)>,
    Json(payload): Json<UpdateServiceRequest>,
) -> Result<impl IntoResponse, AppError> {
    let mut service = state.service_repo.find_by_slug(&business_id, &slug).await?
        .ok_or(AppError::NotFound("Service not found".into()))?;

    if let Some(val) = payload.slug { service.slug = val; }
    if let Some(val) = payload.name { service.name = val; }
    if let Some(val) = payload.description { service.description = val; }
    if let Some(val) = payload.duration_min {
        if val <= 0 {
            return Err(AppError::Validation("Duration must be positive".into()));
        }
        service.duration_min = val;
    }
    if let Some(val) = payload.buffer_min {
        if val < 0 {
            return Err(AppError::Validation("Buffer must not be negative".into()));
        }
        service.buffer_min = val;
    }
    if let Some(val) = payload.slot_capacity {
        if val <= 0 {
            return Err(AppError::Validation("Capacity must be positive".into()));
        }
        service.slot_capacity = val;
    }
    if let Some(val) = payload.active { service.active = val; }

    let updated = state.service_repo.update(&service).await?;
    info!("Service updated: {}", updated.id);
    Ok(Json(updated))
}

pub async fn delete_service(
    State(state): State<Arc<AppState>>,
    BusinessId(business_id): BusinessId,
    Path((_, slug)): Path<(String, String)>,
) -> Result<impl IntoResponse, AppError> {
    let service = state.service_repo.find_by_slug(&business_id, &slug).await?
        .ok_or(AppError::NotFound("Service not found".into()))?;

    state.service_repo.delete(&business_id, &service.id).await?;
    info!("Service deleted: {}", slug);
    Ok(Json(serde_json::json!({"status": "deleted"})))
}

/// Owner cancels the service effective a date: bulk-cancels future
/// appointments and fans out reschedule notifications. Notification
/// problems never fail the request; the report carries the counts.
pub async fn cancel_service(
    State(state): State<Arc<AppState>>,
    BusinessId(business_id): BusinessId,
    Path((_, slug)): Path<(String, String)>,
    Json(payload): Json<CancelServiceRequest>,
) -> Result<impl IntoResponse, AppError> {
    let business = state.business_repo.find_by_id(&business_id).await?
        .ok_or(AppError::NotFound("Business not found".into()))?;
    let service = state.service_repo.find_by_slug(&business_id, &slug).await?
        .ok_or(AppError::NotFound("Service not found".into()))?;

    let cascade = CancellationService::new(state.appointment_repo.clone(), state.job_repo.clone());
    let report = cascade
        .cancel_service(
            &business,
            &service,
            payload.effective_date,
            payload.reason,
            payload.reschedule_deadline,
        )
        .await?;

    info!(
        "Service {} cancelled effective {}: {} appointments, {} notifications",
        slug, payload.effective_date, report.cancelled, report.notifications_enqueued
    );
    Ok(Json(report))
}
