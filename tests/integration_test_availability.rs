mod common;

use axum::{
    body::Body,
    http::{Request, StatusCode},
};
use chrono::{Datelike, Duration, NaiveDate, Utc, Weekday};
use common::TestApp;
use serde_json::{json, Value};
use tower::ServiceExt;

async fn parse_body(response: axum::response::Response) -> Value {
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX).await.unwrap();
    serde_json::from_slice(&bytes).unwrap()
}

async fn create_business(app: &TestApp, suffix: &str) -> String {
    let res = app.router.clone().oneshot(
        Request::builder().method("POST").uri("/api/v1/businesses")
            .header("Content-Type", "application/json")
            .body(Body::from(json!({
                "name": format!("Avail Test {}", suffix),
                "slug": format!("avail-{}", suffix),
                "timezone": "UTC"
            }).to_string())).unwrap()
    ).await.unwrap();
    let data = parse_body(res).await;
    data["business_id"].as_str().unwrap().to_string()
}

async fn create_service(app: &TestApp, bid: &str, slug: &str, duration: i32, buffer: i32, capacity: i32) {
    let res = app.router.clone().oneshot(
        Request::builder().method("POST").uri(format!("/api/v1/{}/services", bid))
            .header("Content-Type", "application/json")
            .body(Body::from(json!({
                "slug": slug,
                "name": "Session",
                "duration_min": duration,
                "buffer_min": buffer,
                "slot_capacity": capacity
            }).to_string())).unwrap()
    ).await.unwrap();
    assert_eq!(res.status(), StatusCode::OK);
}

async fn set_hours(app: &TestApp, bid: &str, day: i32, open: &str, close: &str, is_closed: bool, ranges: Value) {
    let res = app.router.clone().oneshot(
        Request::builder().method("PUT").uri(format!("/api/v1/{}/hours", bid))
            .header("Content-Type", "application/json")
            .body(Body::from(json!({
                "day_of_week": day,
                "open_time": open,
                "close_time": close,
                "is_closed": is_closed,
                "ranges": ranges
            }).to_string())).unwrap()
    ).await.unwrap();
    assert_eq!(res.status(), StatusCode::OK);
}

async fn get_slots(app: &TestApp, bid: &str, slug: &str, date: &str) -> Vec<Value> {
    let res = app.router.clone().oneshot(
        Request::builder().method("GET")
            .uri(format!("/api/v1/{}/services/{}/slots?date={}", bid, slug, date))
            .body(Body::empty()).unwrap()
    ).await.unwrap();
    assert_eq!(res.status(), StatusCode::OK);
    let body = parse_body(res).await;
    body["slots"].as_array().unwrap().clone()
}

fn slot_starts(slots: &[Value]) -> Vec<String> {
    slots.iter().map(|s| s["start"].as_str().unwrap().to_string()).collect()
}

fn next_weekday(target: Weekday) -> NaiveDate {
    let mut date = Utc::now().date_naive() + Duration::days(1);
    while date.weekday() != target {
        date += Duration::days(1);
    }
    date
}

#[tokio::test]
async fn test_standard_availability() {
    let app = TestApp::new().await;
    let bid = create_business(&app, "std").await;
    create_service(&app, &bid, "cut", 60, 0, 1).await;
    set_hours(&app, &bid, 0, "09:00", "12:00", false, Value::Null).await;

    let date = next_weekday(Weekday::Mon).to_string();
    let slots = get_slots(&app, &bid, "cut", &date).await;

    assert_eq!(slots.len(), 3);
    let starts = slot_starts(&slots);
    assert!(starts[0].contains("T09:00:00"));
    assert!(starts[2].contains("T11:00:00"));
}

#[tokio::test]
async fn test_multi_range_day() {
    let app = TestApp::new().await;
    let bid = create_business(&app, "multi").await;
    create_service(&app, &bid, "cut", 60, 0, 1).await;
    set_hours(&app, &bid, 0, "09:00", "15:00", false, json!([
        {"start": "09:00", "end": "11:00"},
        {"start": "13:00", "end": "15:00"}
    ])).await;

    let date = next_weekday(Weekday::Mon).to_string();
    let slots = get_slots(&app, &bid, "cut", &date).await;
    let starts = slot_starts(&slots);

    assert_eq!(slots.len(), 4);
    assert!(starts.iter().any(|s| s.contains("T09:00:00")));
    assert!(starts.iter().any(|s| s.contains("T10:00:00")));
    assert!(starts.iter().any(|s| s.contains("T13:00:00")));
    assert!(starts.iter().any(|s| s.contains("T14:00:00")));
    // the 11-13 gap yields nothing
    assert!(!starts.iter().any(|s| s.contains("T11:00:00")));
    assert!(!starts.iter().any(|s| s.contains("T12:00:00")));
}

#[tokio::test]
async fn test_service_schedule_overrides_hours() {
    let app = TestApp::new().await;
    let bid = create_business(&app, "override").await;
    create_service(&app, &bid, "yoga", 60, 0, 1).await;
    set_hours(&app, &bid, 0, "09:00", "12:00", false, Value::Null).await;

    let res = app.router.clone().oneshot(
        Request::builder().method("PUT").uri(format!("/api/v1/{}/services/yoga/schedule", bid))
            .header("Content-Type", "application/json")
            .body(Body::from(json!({
                "day_of_week": 0,
                "ranges": [{"start": "14:00", "end": "16:00"}]
            }).to_string())).unwrap()
    ).await.unwrap();
    assert_eq!(res.status(), StatusCode::OK);

    let date = next_weekday(Weekday::Mon).to_string();
    let slots = get_slots(&app, &bid, "yoga", &date).await;
    let starts = slot_starts(&slots);

    assert_eq!(slots.len(), 2);
    assert!(starts[0].contains("T14:00:00"));
    assert!(starts[1].contains("T15:00:00"));
}

#[tokio::test]
async fn test_off_day_closes_everything() {
    let app = TestApp::new().await;
    let bid = create_business(&app, "offday").await;
    create_service(&app, &bid, "cut", 60, 0, 1).await;
    set_hours(&app, &bid, 0, "09:00", "12:00", false, Value::Null).await;

    // service override on the same weekday loses to the dated closure too
    let res = app.router.clone().oneshot(
        Request::builder().method("PUT").uri(format!("/api/v1/{}/services/cut/schedule", bid))
            .header("Content-Type", "application/json")
            .body(Body::from(json!({
                "day_of_week": 0,
                "ranges": [{"start": "14:00", "end": "16:00"}]
            }).to_string())).unwrap()
    ).await.unwrap();
    assert_eq!(res.status(), StatusCode::OK);

    let date = next_weekday(Weekday::Mon).to_string();
    let res = app.router.clone().oneshot(
        Request::builder().method("POST").uri(format!("/api/v1/{}/off-days", bid))
            .header("Content-Type", "application/json")
            .body(Body::from(json!({"date": date, "reason": "holiday"}).to_string())).unwrap()
    ).await.unwrap();
    assert_eq!(res.status(), StatusCode::OK);

    let slots = get_slots(&app, &bid, "cut", &date).await;
    assert!(slots.is_empty(), "Slots should be empty on an off-day");
}

#[tokio::test]
async fn test_closed_day_keeps_service_override() {
    let app = TestApp::new().await;
    let bid = create_business(&app, "closedov").await;
    create_service(&app, &bid, "yoga", 60, 0, 1).await;
    set_hours(&app, &bid, 0, "09:00", "12:00", true, Value::Null).await;

    let res = app.router.clone().oneshot(
        Request::builder().method("PUT").uri(format!("/api/v1/{}/services/yoga/schedule", bid))
            .header("Content-Type", "application/json")
            .body(Body::from(json!({
                "day_of_week": 0,
                "ranges": [{"start": "14:00", "end": "16:00"}]
            }).to_string())).unwrap()
    ).await.unwrap();
    assert_eq!(res.status(), StatusCode::OK);

    let date = next_weekday(Weekday::Mon).to_string();
    let slots = get_slots(&app, &bid, "yoga", &date).await;
    let starts = slot_starts(&slots);

    assert_eq!(slots.len(), 2);
    assert!(starts[0].contains("T14:00:00"));
}

#[tokio::test]
async fn test_slot_block_removes_single_slot() {
    let app = TestApp::new().await;
    let bid = create_business(&app, "block").await;
    create_service(&app, &bid, "cut", 60, 0, 1).await;
    set_hours(&app, &bid, 0, "09:00", "12:00", false, Value::Null).await;

    let date = next_weekday(Weekday::Mon).to_string();
    let res = app.router.clone().oneshot(
        Request::builder().method("POST").uri(format!("/api/v1/{}/services/cut/blocks", bid))
            .header("Content-Type", "application/json")
            .body(Body::from(json!({"date": date, "start_time": "10:00"}).to_string())).unwrap()
    ).await.unwrap();
    assert_eq!(res.status(), StatusCode::OK);

    let slots = get_slots(&app, &bid, "cut", &date).await;
    let starts = slot_starts(&slots);

    assert_eq!(slots.len(), 2);
    assert!(starts.iter().any(|s| s.contains("T09:00:00")));
    assert!(starts.iter().any(|s| s.contains("T11:00:00")));
    assert!(!starts.iter().any(|s| s.contains("T10:00:00")));
}

#[tokio::test]
async fn test_buffer_limits_slots() {
    let app = TestApp::new().await;
    let bid = create_business(&app, "buffer").await;
    create_service(&app, &bid, "massage", 30, 15, 1).await;
    set_hours(&app, &bid, 0, "09:00", "10:00", false, Value::Null).await;

    let date = next_weekday(Weekday::Mon).to_string();
    let slots = get_slots(&app, &bid, "massage", &date).await;
    let starts = slot_starts(&slots);

    // step is 45 min, so 09:45 + 30 would overrun the hour
    assert_eq!(slots.len(), 1);
    assert!(starts[0].contains("T09:00:00"));
}

#[tokio::test]
async fn test_location_hours_shadow_default() {
    let app = TestApp::new().await;
    let bid = create_business(&app, "loc").await;
    create_service(&app, &bid, "cut", 60, 0, 1).await;
    set_hours(&app, &bid, 0, "09:00", "12:00", false, Value::Null).await;

    let res = app.router.clone().oneshot(
        Request::builder().method("POST").uri(format!("/api/v1/{}/locations", bid))
            .header("Content-Type", "application/json")
            .body(Body::from(json!({"name": "Downtown"}).to_string())).unwrap()
    ).await.unwrap();
    let location_id = parse_body(res).await["id"].as_str().unwrap().to_string();

    let res = app.router.clone().oneshot(
        Request::builder().method("PUT").uri(format!("/api/v1/{}/hours", bid))
            .header("Content-Type", "application/json")
            .body(Body::from(json!({
                "location_id": location_id,
                "day_of_week": 0,
                "open_time": "13:00",
                "close_time": "15:00",
                "is_closed": false
            }).to_string())).unwrap()
    ).await.unwrap();
    assert_eq!(res.status(), StatusCode::OK);

    let date = next_weekday(Weekday::Mon).to_string();

    let res = app.router.clone().oneshot(
        Request::builder().method("GET")
            .uri(format!("/api/v1/{}/services/cut/slots?date={}&location_id={}", bid, date, location_id))
            .body(Body::empty()).unwrap()
    ).await.unwrap();
    assert_eq!(res.status(), StatusCode::OK);
    let body = parse_body(res).await;
    let loc_slots = body["slots"].as_array().unwrap();
    let loc_starts: Vec<&str> = loc_slots.iter().map(|s| s["start"].as_str().unwrap()).collect();
    assert_eq!(loc_slots.len(), 2);
    assert!(loc_starts[0].contains("T13:00:00"));

    let default_slots = get_slots(&app, &bid, "cut", &date).await;
    assert_eq!(default_slots.len(), 3);
    assert!(slot_starts(&default_slots)[0].contains("T09:00:00"));
}

#[tokio::test]
async fn test_available_dates_exclude_off_days() {
    let app = TestApp::new().await;
    let bid = create_business(&app, "dates").await;
    create_service(&app, &bid, "cut", 60, 0, 1).await;
    set_hours(&app, &bid, 0, "09:00", "12:00", false, Value::Null).await;

    let d1 = next_weekday(Weekday::Mon);
    let d2 = d1 + Duration::days(7);

    let res = app.router.clone().oneshot(
        Request::builder().method("POST").uri(format!("/api/v1/{}/off-days", bid))
            .header("Content-Type", "application/json")
            .body(Body::from(json!({"date": d1.to_string(), "reason": null}).to_string())).unwrap()
    ).await.unwrap();
    assert_eq!(res.status(), StatusCode::OK);

    let end_query = d1 + Duration::days(10);
    let res = app.router.clone().oneshot(
        Request::builder().method("GET")
            .uri(format!("/api/v1/{}/services/cut/dates?start={}&end={}", bid, d1, end_query))
            .body(Body::empty()).unwrap()
    ).await.unwrap();
    assert_eq!(res.status(), StatusCode::OK);

    let dates = parse_body(res).await;
    let dates = dates.as_array().unwrap();

    assert!(!dates.contains(&json!(d1.to_string())), "Off-day should not be available");
    assert!(dates.contains(&json!(d2.to_string())), "Following Monday should be available");
}
