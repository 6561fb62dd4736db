use axum::{extract::{State, Path}, response::IntoResponse, Json};
use crate::state::AppState;
use crate::api::extractors::business::BusinessId;
use crate::api::dtos::requests::ReplaceServiceScheduleRequest;
use crate::domain::models::schedule::ServiceScheduleRange;
use crate::error::AppError;
use std::sync::Arc;
use chrono::NaiveTime;
use tracing::info;

const MAX_RANGES_PER_DAY: usize = 4;

pub async fn replace_service_schedule(
    State(state): State<Arc<AppState>>,
    BusinessId(business_id): BusinessId,
    Path((_, slug)): Path<(String, String)>,
    Json(payload): Json<ReplaceServiceScheduleRequest>,
) -> Result<impl IntoResponse, AppError> {
    let service = state.service_repo.find_by_slug(&business_id, &slug).await?
        .ok_or(AppError::NotFound("Service not found".into()))?;

    if !(0..=6).contains(&payload.day_of_week) {
        return Err(AppError::Validation("day_of_week must be 0 (Monday) to 6 (Sunday)".into()));
    }
    if payload.ranges.len() > MAX_RANGES_PER_DAY {
        return Err(AppError::Validation(format!("At most {} ranges per day", MAX_RANGES_PER_DAY)));
    }

    let mut parsed: Vec<(NaiveTime, NaiveTime)> = Vec::new();
    for window in &payload.ranges {
        let start = NaiveTime::parse_from_str(&window.start, "%H:%M")
            .map_err(|_| AppError::Validation("Invalid start time (HH:MM)".into()))?;
        let end = NaiveTime::parse_from_str(&window.end, "%H:%M")
            .map_err(|_| AppError::Validation("Invalid end time (HH:MM)".into()))?;
        if end <= start {
            return Err(AppError::Validation("Range end must be after start".into()));
        }
        parsed.push((start, end));
    }

    let mut sorted = parsed.clone();
    sorted.sort_by_key(|r| r.0);
    for pair in sorted.windows(2) {
        if pair[0].1 > pair[1].0 {
            return Err(AppError::Validation("Ranges must not overlap".into()));
        }
    }

    let ranges: Vec<ServiceScheduleRange> = parsed
        .into_iter()
        .enumerate()
        .map(|(order, (start, end))| {
            ServiceScheduleRange::new(service.id.clone(), payload.day_of_week, start, end, order as i32)
        })
        .collect();

    state.schedule_repo.replace_service_ranges(&service.id, payload.day_of_week, &ranges).await?;
    info!("Service schedule replaced for {} day {} ({} ranges)", slug, payload.day_of_week, ranges.len());
    Ok(Json(serde_json::json!({
        "service_id": service.id,
        "day_of_week": payload.day_of_week,
        "ranges": ranges.len(),
    })))
}

pub async fn list_service_schedule(
    State(state): State<Arc<AppState>>,
    BusinessId(business_id): BusinessId,
    Path((_, slug)): Path<(String, String)>,
) -> Result<impl IntoResponse, AppError> {
    let service = state.service_repo.find_by_slug(&business_id, &slug).await?
        .ok_or(AppError::NotFound("Service not found".into()))?;

    let ranges = state.schedule_repo.list_service_ranges(&service.id).await?;
    Ok(Json(ranges))
}
