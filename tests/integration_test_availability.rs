mod common;

use axum::http::StatusCode;
use common::{parse_body, TestApp};
use serde_json::json;

// 2026-09-07 is a Monday (weekday 1 with Sunday = 0).
const MONDAY: &str = "2026-09-07";

async fn add_rule(app: &TestApp, experience_id: &str, weekdays: &[u32], start: &str, end: &str) {
    let response = app
        .post_json(
            &format!("/api/v1/experiences/{}/recurring", experience_id),
            &json!({ "weekdays": weekdays, "start_time": start, "end_time": end }),
        )
        .await;
    assert!(response.status().is_success());
}

async fn fetch_day(app: &TestApp, experience_id: &str, date: &str) -> serde_json::Value {
    let response = app
        .get(&format!(
            "/api/v1/availability?experienceId={}&startDate={}&endDate={}",
            experience_id, date, date
        ))
        .await;
    assert_eq!(response.status(), StatusCode::OK);
    parse_body(response).await
}

#[tokio::test]
async fn missing_params_are_rejected() {
    let app = TestApp::new().await;

    let response = app.get("/api/v1/availability").await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    let body = parse_body(response).await;
    assert!(body["error"].as_str().unwrap().contains("experienceId"));

    let response = app
        .get("/api/v1/availability?experienceId=x&startDate=07.09.2026&endDate=2026-09-07")
        .await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn recurring_rule_produces_hourly_slots_with_fit_flags() {
    let app = TestApp::new().await;
    let id = app.create_experience("sunset-dinner", Some(2.0)).await;
    add_rule(&app, &id, &[1], "09:00", "12:00").await;

    let body = fetch_day(&app, &id, MONDAY).await;
    assert_eq!(body["durationHours"].as_f64().unwrap(), 2.0);

    let times = body["slots"][0]["times"].as_array().unwrap();
    assert_eq!(times.len(), 3);
    assert_eq!(times[0], json!({ "time": "09:00", "available": true }));
    assert_eq!(times[1], json!({ "time": "10:00", "available": true }));
    // 11:00 + 2h overruns the 12:00 window end.
    assert_eq!(times[2], json!({ "time": "11:00", "available": false }));
}

#[tokio::test]
async fn missing_duration_falls_back_to_two_hours() {
    let app = TestApp::new().await;
    let id = app.create_experience("no-duration", None).await;
    add_rule(&app, &id, &[1], "09:00", "11:00").await;

    let body = fetch_day(&app, &id, MONDAY).await;
    assert_eq!(body["durationHours"].as_f64().unwrap(), 2.0);

    let times = body["slots"][0]["times"].as_array().unwrap();
    assert_eq!(times[0]["available"], json!(true));
    assert_eq!(times[1]["available"], json!(false));
}

#[tokio::test]
async fn fractional_duration_uses_real_arithmetic() {
    let app = TestApp::new().await;
    let id = app.create_experience("half-hour", Some(2.5)).await;
    add_rule(&app, &id, &[1], "09:00", "12:00").await;

    let body = fetch_day(&app, &id, MONDAY).await;
    let times = body["slots"][0]["times"].as_array().unwrap();
    // 9 + 2.5 = 11.5 <= 12 fits; 10 + 2.5 = 12.5 does not.
    assert_eq!(times[0]["available"], json!(true));
    assert_eq!(times[1]["available"], json!(false));
    assert_eq!(times[2]["available"], json!(false));
}

#[tokio::test]
async fn blocked_override_empties_the_date() {
    let app = TestApp::new().await;
    let id = app.create_experience("blockable", Some(2.0)).await;
    add_rule(&app, &id, &[1], "09:00", "12:00").await;

    let response = app
        .post_json(
            &format!("/api/v1/experiences/{}/overrides", id),
            &json!({ "date": MONDAY, "is_blocked": true }),
        )
        .await;
    assert!(response.status().is_success());

    let body = fetch_day(&app, &id, MONDAY).await;
    assert!(body["slots"][0]["times"].as_array().unwrap().is_empty());
}

#[tokio::test]
async fn override_window_replaces_recurring_rules() {
    let app = TestApp::new().await;
    let id = app.create_experience("overridable", Some(2.0)).await;
    add_rule(&app, &id, &[1], "09:00", "12:00").await;

    let response = app
        .post_json(
            &format!("/api/v1/experiences/{}/overrides", id),
            &json!({ "date": MONDAY, "start_time": "14:00", "end_time": "17:00" }),
        )
        .await;
    assert!(response.status().is_success());

    let body = fetch_day(&app, &id, MONDAY).await;
    let times = body["slots"][0]["times"].as_array().unwrap();
    assert_eq!(times.len(), 3);
    assert_eq!(times[0]["time"], json!("14:00"));
    assert_eq!(times[2], json!({ "time": "16:00", "available": false }));
}

#[tokio::test]
async fn reservation_on_any_experience_claims_the_whole_date() {
    let app = TestApp::new().await;
    let queried = app.create_experience("queried", Some(2.0)).await;
    let other = app.create_experience("other", Some(2.0)).await;
    add_rule(&app, &queried, &[1], "09:00", "12:00").await;

    let response = app
        .post_json(
            "/api/v1/reservations",
            &json!({ "experience_id": other, "date": MONDAY, "time": "15:00" }),
        )
        .await;
    assert!(response.status().is_success());

    let body = fetch_day(&app, &queried, MONDAY).await;
    assert!(body["slots"][0]["times"].as_array().unwrap().is_empty());
}

#[tokio::test]
async fn range_returns_one_entry_per_date_in_order() {
    let app = TestApp::new().await;
    let id = app.create_experience("weekly", Some(2.0)).await;
    add_rule(&app, &id, &[1], "09:00", "12:00").await;

    let response = app
        .get(&format!(
            "/api/v1/availability?experienceId={}&startDate=2026-09-07&endDate=2026-09-13",
            id
        ))
        .await;
    assert_eq!(response.status(), StatusCode::OK);
    let body = parse_body(response).await;

    let slots = body["slots"].as_array().unwrap();
    assert_eq!(slots.len(), 7);
    assert_eq!(slots[0]["date"], json!("2026-09-07"));
    assert_eq!(slots[6]["date"], json!("2026-09-13"));

    // Only the Monday carries slots; the rest of the week resolves empty.
    assert_eq!(slots[0]["times"].as_array().unwrap().len(), 3);
    for day in &slots[1..] {
        assert!(day["times"].as_array().unwrap().is_empty());
    }
}

#[tokio::test]
async fn unknown_experience_still_resolves_with_default_duration() {
    let app = TestApp::new().await;

    let response = app
        .get("/api/v1/availability?experienceId=ghost&startDate=2026-09-07&endDate=2026-09-07")
        .await;
    assert_eq!(response.status(), StatusCode::OK);
    let body = parse_body(response).await;
    assert_eq!(body["durationHours"].as_f64().unwrap(), 2.0);
    assert!(body["slots"][0]["times"].as_array().unwrap().is_empty());
}
