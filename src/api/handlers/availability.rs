use axum::{extract::{State, Path, Query}, response::IntoResponse, Json};
use crate::state::AppState;
use crate::api::extractors::business::BusinessId;
use crate::api::dtos::responses::SlotsResponse;
use crate::domain::services::availability::{calculate_slots, local_day_bounds};
use crate::error::AppError;
use std::collections::HashMap;
use std::sync::Arc;
use chrono::{Datelike, Duration, NaiveDate, Utc};
use chrono_tz::Tz;

pub async fn get_slots(
    State(state): State<Arc<AppState>>,
    BusinessId(business_id): BusinessId,
    Path((_, slug)): Path<(String, String)>,
    Query(params): Query<HashMap<String, String>>,
) -> Result<impl IntoResponse, AppError> {
    let business = state.business_repo.find_by_id(&business_id).await?
        .ok_or(AppError::NotFound("Business not found".into()))?;
    let service = state.service_repo.find_by_slug(&business_id, &slug).await?
        .ok_or(AppError::NotFound("Service not found".into()))?;

    if !service.active {
        return Err(AppError::Forbidden("Service is not bookable".into()));
    }

    let date_str = params.get("date").ok_or(AppError::Validation("Date required".into()))?;
    let date = NaiveDate::parse_from_str(date_str, "%Y-%m-%d")
        .map_err(|_| AppError::Validation("Invalid date format".into()))?;
    let location_id = params.get("location_id").cloned();

    let tz: Tz = business.timezone.parse().unwrap_or(chrono_tz::UTC);
    let day_of_week = date.weekday().num_days_from_monday() as i32;

    let sources = state.schedule_repo
        .load_day_sources(&business.id, location_id.as_deref(), Some(&service.id), date, day_of_week)
        .await?;

    let (day_start, day_end) = local_day_bounds(tz, date);
    let existing = state.appointment_repo.list_by_range(&service.id, day_start, day_end).await?;

    let slots = calculate_slots(&business, &service, date, &sources, &existing, Utc::now());

    Ok(Json(SlotsResponse {
        date: date_str.to_string(),
        slots,
    }))
}

pub async fn get_available_dates(
    State(state): State<Arc<AppState>>,
    BusinessId(business_id): BusinessId,
    Path((_, slug)): Path<(String, String)>,
    Query(params): Query<HashMap<String, String>>,
) -> Result<impl IntoResponse, AppError> {
    let business = state.business_repo.find_by_id(&business_id).await?
        .ok_or(AppError::NotFound("Business not found".into()))?;
    let service = state.service_repo.find_by_slug(&business_id, &slug).await?
        .ok_or(AppError::NotFound("Service not found".into()))?;

    if !service.active {
        return Err(AppError::Forbidden("Service is not bookable".into()));
    }

    let start_str = params.get("start").ok_or(AppError::Validation("start required".into()))?;
    let end_str = params.get("end").ok_or(AppError::Validation("end required".into()))?;

    let start_date = NaiveDate::parse_from_str(start_str, "%Y-%m-%d").map_err(|_| AppError::Validation("Invalid start".into()))?;
    let end_date = NaiveDate::parse_from_str(end_str, "%Y-%m-%d").map_err(|_| AppError::Validation("Invalid end".into()))?;
    if end_date < start_date {
        return Err(AppError::Validation("end must not be before start".into()));
    }
    let location_id = params.get("location_id").cloned();

    let tz: Tz = business.timezone.parse().unwrap_or(chrono_tz::UTC);
    let now = Utc::now();

    let mut available_dates = Vec::new();
    let mut current_date = start_date;

    while current_date <= end_date {
        let day_of_week = current_date.weekday().num_days_from_monday() as i32;

        let sources = state.schedule_repo
            .load_day_sources(&business.id, location_id.as_deref(), Some(&service.id), current_date, day_of_week)
            .await?;

        let (day_start, day_end) = local_day_bounds(tz, current_date);
        let existing = state.appointment_repo.list_by_range(&service.id, day_start, day_end).await?;

        let slots = calculate_slots(&business, &service, current_date, &sources, &existing, now);
        if !slots.is_empty() {
            available_dates.push(current_date.to_string());
        }

        current_date += Duration::days(1);
    }

    Ok(Json(available_dates))
}
