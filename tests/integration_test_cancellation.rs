mod common;

use axum::{
    body::Body,
    http::{Request, StatusCode},
};
use chrono::{Duration, Utc};
use common::TestApp;
use serde_json::{json, Value};
use tower::ServiceExt;

async fn parse_body(response: axum::response::Response) -> Value {
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX).await.unwrap();
    serde_json::from_slice(&bytes).unwrap()
}

async fn setup(app: &TestApp, suffix: &str) -> String {
    let res = app.router.clone().oneshot(
        Request::builder().method("POST").uri("/api/v1/businesses")
            .header("Content-Type", "application/json")
            .body(Body::from(json!({
                "name": format!("Cascade Test {}", suffix),
                "slug": format!("cascade-{}", suffix),
                "timezone": "UTC"
            }).to_string())).unwrap()
    ).await.unwrap();
    let bid = parse_body(res).await["business_id"].as_str().unwrap().to_string();

    let res = app.router.clone().oneshot(
        Request::builder().method("POST").uri(format!("/api/v1/{}/services", bid))
            .header("Content-Type", "application/json")
            .body(Body::from(json!({
                "slug": "course",
                "name": "Course",
                "duration_min": 60,
                "slot_capacity": 3
            }).to_string())).unwrap()
    ).await.unwrap();
    assert_eq!(res.status(), StatusCode::OK);

    // open every weekday so bookings can land on arbitrary future dates
    for day in 0..7 {
        let res = app.router.clone().oneshot(
            Request::builder().method("PUT").uri(format!("/api/v1/{}/hours", bid))
                .header("Content-Type", "application/json")
                .body(Body::from(json!({
                    "day_of_week": day,
                    "open_time": "09:00",
                    "close_time": "17:00",
                    "is_closed": false
                }).to_string())).unwrap()
        ).await.unwrap();
        assert_eq!(res.status(), StatusCode::OK);
    }

    bid
}

async fn book(app: &TestApp, bid: &str, date: &str, time: &str, email: Option<&str>) -> Value {
    let res = app.router.clone().oneshot(
        Request::builder().method("POST").uri(format!("/api/v1/{}/services/course/book", bid))
            .header("Content-Type", "application/json")
            .body(Body::from(json!({
                "date": date,
                "time": time,
                "name": "T",
                "email": email
            }).to_string())).unwrap()
    ).await.unwrap();
    assert_eq!(res.status(), StatusCode::OK);
    parse_body(res).await
}

async fn list_appointments(app: &TestApp, bid: &str) -> Vec<Value> {
    let res = app.router.clone().oneshot(
        Request::builder().method("GET").uri(format!("/api/v1/{}/appointments", bid))
            .body(Body::empty()).unwrap()
    ).await.unwrap();
    assert_eq!(res.status(), StatusCode::OK);
    parse_body(res).await.as_array().unwrap().clone()
}

#[tokio::test]
async fn test_cancellation_cascade() {
    let app = TestApp::new().await;
    let bid = setup(&app, "main").await;

    let today = Utc::now().date_naive();
    let d1 = (today + Duration::days(2)).to_string();
    let d2 = (today + Duration::days(5)).to_string();
    let d3 = (today + Duration::days(9)).to_string();

    let before = book(&app, &bid, &d1, "10:00", Some("early@t.com")).await;
    let affected_with_email = book(&app, &bid, &d2, "10:00", Some("mid@t.com")).await;
    let affected_no_email = book(&app, &bid, &d3, "10:00", None).await;
    let completed = book(&app, &bid, &d2, "11:00", Some("done@t.com")).await;

    // already-delivered appointments keep their COMPLETED status
    let res = app.router.clone().oneshot(
        Request::builder().method("PUT")
            .uri(format!("/api/v1/{}/appointments/{}/status", bid, completed["id"].as_str().unwrap()))
            .header("Content-Type", "application/json")
            .body(Body::from(json!({"status": "COMPLETED"}).to_string())).unwrap()
    ).await.unwrap();
    assert_eq!(res.status(), StatusCode::OK);

    let res = app.router.clone().oneshot(
        Request::builder().method("POST").uri(format!("/api/v1/{}/services/course/cancel", bid))
            .header("Content-Type", "application/json")
            .body(Body::from(json!({
                "effective_date": d2,
                "reason": "Instructor left",
                "reschedule_deadline": (today + Duration::days(30)).to_string()
            }).to_string())).unwrap()
    ).await.unwrap();
    assert_eq!(res.status(), StatusCode::OK);
    let report = parse_body(res).await;

    assert_eq!(report["cancelled"].as_u64().unwrap(), 2);
    assert_eq!(report["notifications_enqueued"].as_u64().unwrap(), 1);
    assert_eq!(report["skipped_no_email"].as_u64().unwrap(), 1);
    assert_eq!(report["notifications_failed"].as_u64().unwrap(), 0);

    let appointments = list_appointments(&app, &bid).await;
    let status_of = |id: &Value| {
        appointments.iter()
            .find(|a| a["id"] == *id)
            .map(|a| a["status"].as_str().unwrap().to_string())
            .unwrap()
    };

    assert_eq!(status_of(&before["id"]), "CONFIRMED");
    assert_eq!(status_of(&affected_with_email["id"]), "CANCELLED");
    assert_eq!(status_of(&affected_no_email["id"]), "CANCELLED");
    assert_eq!(status_of(&completed["id"]), "COMPLETED");

    let cancelled_row = appointments.iter().find(|a| a["id"] == affected_with_email["id"]).unwrap();
    assert_eq!(cancelled_row["cancellation_reason"].as_str().unwrap(), "Instructor left");

    // one reschedule notice per affected appointment with an email
    let row: (i64,) = sqlx::query_as("SELECT COUNT(*) FROM jobs WHERE job_type = 'RESCHEDULE_NOTICE'")
        .fetch_one(&app.pool).await.unwrap();
    assert_eq!(row.0, 1);
}

#[tokio::test]
async fn test_cascade_with_no_matching_appointments() {
    let app = TestApp::new().await;
    let bid = setup(&app, "empty").await;

    let today = Utc::now().date_naive();
    let d1 = (today + Duration::days(2)).to_string();
    book(&app, &bid, &d1, "10:00", Some("keep@t.com")).await;

    // effective after every booking: nothing to cancel
    let res = app.router.clone().oneshot(
        Request::builder().method("POST").uri(format!("/api/v1/{}/services/course/cancel", bid))
            .header("Content-Type", "application/json")
            .body(Body::from(json!({
                "effective_date": (today + Duration::days(60)).to_string()
            }).to_string())).unwrap()
    ).await.unwrap();
    assert_eq!(res.status(), StatusCode::OK);
    let report = parse_body(res).await;

    assert_eq!(report["cancelled"].as_u64().unwrap(), 0);
    assert_eq!(report["notifications_enqueued"].as_u64().unwrap(), 0);

    let appointments = list_appointments(&app, &bid).await;
    assert!(appointments.iter().all(|a| a["status"] == "CONFIRMED"));
}

#[tokio::test]
async fn test_cascade_rerun_is_harmless() {
    let app = TestApp::new().await;
    let bid = setup(&app, "rerun").await;

    let today = Utc::now().date_naive();
    let d1 = (today + Duration::days(3)).to_string();
    book(&app, &bid, &d1, "10:00", Some("once@t.com")).await;

    let cancel = || async {
        let res = app.router.clone().oneshot(
            Request::builder().method("POST").uri(format!("/api/v1/{}/services/course/cancel", bid))
                .header("Content-Type", "application/json")
                .body(Body::from(json!({"effective_date": today.to_string()}).to_string())).unwrap()
        ).await.unwrap();
        assert_eq!(res.status(), StatusCode::OK);
        parse_body(res).await
    };

    let first = cancel().await;
    assert_eq!(first["cancelled"].as_u64().unwrap(), 1);

    // already-cancelled rows are not affected again, no duplicate notices
    let second = cancel().await;
    assert_eq!(second["cancelled"].as_u64().unwrap(), 0);
    assert_eq!(second["notifications_enqueued"].as_u64().unwrap(), 0);

    let row: (i64,) = sqlx::query_as("SELECT COUNT(*) FROM jobs WHERE job_type = 'RESCHEDULE_NOTICE'")
        .fetch_one(&app.pool).await.unwrap();
    assert_eq!(row.0, 1);
}
