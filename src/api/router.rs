use axum::{
    body::Body,
    extract::Request,
    routing::{get, post, put, delete},
    Router,
};
use std::sync::Arc;
use std::time::Duration;
use crate::state::AppState;
use crate::api::handlers::{
    appointment, appointment_management, availability, business, class, health, hours, job,
    location, off_day, service, service_schedule, slot_block,
};
use tower_http::{
    trace::TraceLayer,
    classify::ServerErrorsFailureClass,
};
use tracing::{info_span, Span, error, info};
use uuid::Uuid;

pub fn create_router(state: Arc<AppState>) -> Router {
    Router::new()
        .route("/health", get(health::health_check))

        // Business
        .route("/api/v1/businesses", post(business::create_business))
        .route("/api/v1/businesses/by-slug/{slug}", get(business::get_business_by_slug))
        .route("/api/v1/{business_id}", get(business::get_business).put(business::update_business))

        // Locations
        .route("/api/v1/{business_id}/locations", get(location::list_locations).post(location::create_location))
        .route("/api/v1/{business_id}/locations/{location_id}", put(location::update_location).delete(location::delete_location))

        // Services
        .route("/api/v1/{business_id}/services", get(service::list_services).post(service::create_service))
        .route("/api/v1/{business_id}/services/{slug}", get(service::get_service).put(service::update_service).delete(service::delete_service))

        // Operating hours & schedule sources
        .route("/api/v1/{business_id}/hours", get(hours::list_hours).put(hours::upsert_hours))
        .route("/api/v1/{business_id}/services/{slug}/schedule", get(service_schedule::list_service_schedule).put(service_schedule::replace_service_schedule))
        .route("/api/v1/{business_id}/off-days", get(off_day::list_off_days).post(off_day::create_off_day))
        .route("/api/v1/{business_id}/off-days/{off_day_id}", delete(off_day::delete_off_day))
        .route("/api/v1/{business_id}/services/{slug}/blocks", get(slot_block::list_slot_blocks).post(slot_block::create_slot_block))
        .route("/api/v1/{business_id}/blocks/{block_id}", delete(slot_block::delete_slot_block))
        .route("/api/v1/{business_id}/classes", get(class::list_classes).post(class::create_class))
        .route("/api/v1/{business_id}/classes/{class_id}", delete(class::delete_class))

        // Public Booking Flow
        .route("/api/v1/{business_id}/services/{slug}/dates", get(availability::get_available_dates))
        .route("/api/v1/{business_id}/services/{slug}/slots", get(availability::get_slots))
        .route("/api/v1/{business_id}/services/{slug}/book", post(appointment::create_appointment))

        // Owner cancellation cascade
        .route("/api/v1/{business_id}/services/{slug}/cancel", post(service::cancel_service))

        // Customer Appointment Management
        .route("/api/v1/appointments/manage/{token}", get(appointment_management::get_appointment_by_token))
        .route("/api/v1/appointments/manage/{token}/cancel", post(appointment_management::cancel_appointment))

        // Admin Appointment Management
        .route("/api/v1/{business_id}/services/{slug}/appointments", get(appointment::list_service_appointments))
        .route("/api/v1/{business_id}/appointments", get(appointment::list_all_appointments))
        .route("/api/v1/{business_id}/appointments/{appointment_id}", get(appointment::get_appointment))
        .route("/api/v1/{business_id}/appointments/{appointment_id}/status", put(appointment::update_appointment_status))
        .route("/api/v1/{business_id}/appointments/{appointment_id}/attendance", put(appointment::mark_attendance))

        // Jobs
        .route("/api/v1/{business_id}/jobs", get(job::list_jobs))

        .layer(
            TraceLayer::new_for_http()
                .make_span_with(|request: &Request<Body>| {
                    let request_id = Uuid::new_v4().to_string();
                    info_span!(
                        "http_request",
                        request_id = %request_id,
                        method = ?request.method(),
                        uri = ?request.uri(),
                        version = ?request.version(),
                        business_id = tracing::field::Empty,
                    )
                })
                .on_request(|request: &Request<Body>, _span: &Span| {
                    info!("started processing request: {} {}", request.method(), request.uri().path());
                })
                .on_response(|response: &axum::http::Response<Body>, latency: Duration, _span: &Span| {
                    info!(
                        status = response.status().as_u16(),
                        latency_ms = latency.as_millis(),
                        "finished processing request"
                    );
                })
                .on_failure(|error: ServerErrorsFailureClass, _latency: Duration, _span: &Span| {
                    error!("request failed: {:?}", error);
                })
        )
        .with_state(state)
}
