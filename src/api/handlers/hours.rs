use axum::{extract::State, response::IntoResponse, Json};
use crate::state::AppState;
use crate::api::extractors::business::BusinessId;
use crate::api::dtos::{requests::UpsertBusinessHoursRequest, responses::HoursView};
use crate::domain::models::schedule::{BusinessHours, HourRange};
use crate::error::AppError;
use std::sync::Arc;
use chrono::NaiveTime;
use tracing::info;

fn parse_hhmm(value: &str) -> Result<NaiveTime, AppError> {
    NaiveTime::parse_from_str(value, "%H:%M")
        .map_err(|_| AppError::Validation(format!("Invalid time '{}', expected HH:MM", value)))
}

/// Invalid ranges are rejected here so the resolver never has to
/// re-validate stored rows.
fn check_disjoint(ranges: &[(NaiveTime, NaiveTime)]) -> Result<(), AppError> {
    let mut sorted = ranges.to_vec();
    sorted.sort_by_key(|r| r.0);
    for pair in sorted.windows(2) {
        if pair[0].1 > pair[1].0 {
            return Err(AppError::Validation("Ranges must not overlap".into()));
        }
    }
    Ok(())
}

pub async fn upsert_hours(
    State(state): State<Arc<AppState>>,
    BusinessId(business_id): BusinessId,
    Json(payload): Json<UpsertBusinessHoursRequest>,
) -> Result<impl IntoResponse, AppError> {
    if !(0..=6).contains(&payload.day_of_week) {
        return Err(AppError::Validation("day_of_week must be 0 (Monday) to 6 (Sunday)".into()));
    }

    if let Some(loc) = &payload.location_id {
        state.location_repo.find_by_id(&business_id, loc).await?
            .ok_or(AppError::NotFound("Location not found".into()))?;
    }

    let open_time = parse_hhmm(&payload.open_time)?;
    let close_time = parse_hhmm(&payload.close_time)?;
    let is_closed = payload.is_closed.unwrap_or(false);

    if !is_closed && close_time <= open_time {
        return Err(AppError::Validation("close_time must be after open_time".into()));
    }

    let hours = BusinessHours::new(
        business_id,
        payload.location_id,
        payload.day_of_week,
        open_time,
        close_time,
        is_closed,
    );

    let mut ranges = Vec::new();
    if let Some(windows) = payload.ranges {
        let mut parsed = Vec::new();
        for window in &windows {
            let start = parse_hhmm(&window.start)?;
            let end = parse_hhmm(&window.end)?;
            if end <= start {
                return Err(AppError::Validation("Range end must be after start".into()));
            }
            parsed.push((start, end));
        }
        check_disjoint(&parsed)?;

        for (order, (start, end)) in parsed.into_iter().enumerate() {
            ranges.push(HourRange::new(hours.id.clone(), start, end, order as i32));
        }
    }

    let created = state.schedule_repo.upsert_business_hours(&hours, &ranges).await?;
    info!("Business hours upserted for day {} ({} ranges)", created.day_of_week, ranges.len());
    Ok(Json(created))
}

pub async fn list_hours(
    State(state): State<Arc<AppState>>,
    BusinessId(business_id): BusinessId,
) -> Result<impl IntoResponse, AppError> {
    let all_hours = state.schedule_repo.list_business_hours(&business_id).await?;

    let mut views = Vec::with_capacity(all_hours.len());
    for hours in all_hours {
        let ranges = state.schedule_repo.list_hour_ranges(&hours.id).await?;
        views.push(HoursView { hours, ranges });
    }
    Ok(Json(views))
}
