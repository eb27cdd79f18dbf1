#![cfg(feature = "server")]

use axum::body::Body;
use axum::http::{header, HeaderMap, Request, StatusCode};
use axum::Router;
use serde_json::{json, Value};
use ssbg_dashboard::config::DashboardConfig;
use ssbg_dashboard::server::{build_router, AppState};
use ssbg_dashboard::DataStore;
use std::path::Path;
use tower::ServiceExt;

fn app() -> Router {
    let path = Path::new(env!("CARGO_MANIFEST_DIR")).join("tests/fixtures/ssbg_sample.csv");
    let store = DataStore::load(&path).unwrap();
    build_router(AppState::new(store, DashboardConfig::default()))
}

async fn get(uri: &str) -> (StatusCode, HeaderMap, Vec<u8>) {
    let response = app()
        .oneshot(Request::builder().uri(uri).body(Body::empty()).unwrap())
        .await
        .unwrap();
    let status = response.status();
    let headers = response.headers().clone();
    let body = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    (status, headers, body.to_vec())
}

async fn get_json(uri: &str) -> (StatusCode, Value) {
    let (status, _, body) = get(uri).await;
    (status, serde_json::from_slice(&body).unwrap())
}

fn component_keys(body: &Value) -> Vec<String> {
    let mut keys: Vec<String> = body["data"]["components"]
        .as_object()
        .unwrap()
        .keys()
        .cloned()
        .collect();
    keys.sort();
    keys
}

#[tokio::test]
async fn test_health() {
    let (status, body) = get_json("/api/health").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, json!({"success": true, "data": "OK"}));
}

#[tokio::test]
async fn test_options() {
    let (status, body) = get_json("/api/options").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["data"]["years"], json!([2021, 2022]));
    assert_eq!(body["data"]["states"], json!(["Alabama", "Guam", "New York"]));
    assert_eq!(body["data"]["default_year"], 2022);
    assert_eq!(body["data"]["default_metric"], "recipients");
    assert_eq!(body["data"]["default_state"], "Alabama");
}

#[tokio::test]
async fn test_national_defaults_to_latest_year() {
    let (status, body) = get_json("/api/national").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(component_keys(&body).len(), 7);

    let cards = &body["data"]["components"]["summary_cards"]["cards"];
    assert_eq!(cards[0]["title"], "Total SSBG Expenditures FY22");
    assert_eq!(cards[0]["value"], "$7,400");
    assert_eq!(
        body["data"]["components"]["map"]["figure"]["layout"]["title"]["text"],
        "SSBG Recipients by State FY22"
    );
}

#[tokio::test]
async fn test_national_category_filter() {
    let (_, body) = get_json("/api/national?year=all&categories=Child%20Care").await;
    let cards = &body["data"]["components"]["summary_cards"]["cards"];
    assert_eq!(cards[0]["title"], "Total SSBG Expenditures FY21-FY22");
    assert_eq!(cards[0]["value"], "$8,000");
    assert_eq!(
        body["data"]["components"]["data_table"]["table"]["rows"]
            .as_array()
            .unwrap()
            .len(),
        3
    );
}

#[tokio::test]
async fn test_national_update_renders_invalidated_components() {
    let (status, body) = get_json("/api/national/update/metric?metric=expenditures").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(component_keys(&body), vec!["map"]);

    let (_, body) = get_json("/api/national/update/range?range_min=2022").await;
    assert_eq!(
        component_keys(&body),
        vec!["expenditures_time_series", "recipients_time_series"]
    );
}

#[tokio::test]
async fn test_unknown_control_is_404() {
    let (status, body) = get_json("/api/national/update/zoom").await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["success"], false);
    assert!(body["error"].as_str().unwrap().contains("zoom"));

    let (status, _) = get_json("/api/national/update/state").await;
    assert_eq!(status, StatusCode::NOT_FOUND);

    let (status, _) = get_json("/api/state/Alabama/update/metric").await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_invalid_year_is_400() {
    let (status, body) = get_json("/api/national?year=soon").await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["success"], false);
}

#[tokio::test]
async fn test_state_report() {
    let (status, body) = get_json("/api/state/New%20York").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(
        body["data"]["components"]["title"]["text"],
        "SSBG Recipient Report: New York"
    );
    assert_eq!(component_keys(&body).len(), 7);

    let (_, body) = get_json("/api/state/Alabama/update/categories").await;
    assert_eq!(component_keys(&body), vec!["data_table", "summary_cards"]);
}

#[tokio::test]
async fn test_unknown_state_renders_empty() {
    let (status, body) = get_json("/api/state/Narnia").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(
        body["data"]["components"]["data_table"]["table"]["rows"],
        json!([])
    );
}

#[tokio::test]
async fn test_state_export() {
    let (status, headers, body) = get("/api/state/Alabama/export?year=all").await;
    assert_eq!(status, StatusCode::OK);
    assert!(headers[header::CONTENT_TYPE]
        .to_str()
        .unwrap()
        .starts_with("text/csv"));
    assert_eq!(
        headers[header::CONTENT_DISPOSITION],
        "attachment; filename=\"ssbg_Alabama_data_FY21-FY22.csv\""
    );

    let text = String::from_utf8(body).unwrap();
    assert_eq!(text.lines().count(), 4);
    assert!(text.starts_with("year,state_name,line_num,service_category,"));
}

#[tokio::test]
async fn test_state_export_uses_filters() {
    let (status, _, body) =
        get("/api/state/Alabama/export?year=2022&categories=Transportation").await;
    assert_eq!(status, StatusCode::OK);

    let text = String::from_utf8(body).unwrap();
    let lines: Vec<&str> = text.lines().collect();
    assert_eq!(lines.len(), 2);
    assert!(lines[1].starts_with("2022,Alabama,2,Transportation,"));

    // default year is the latest one
    let (_, _, body) = get("/api/state/Alabama/export").await;
    let text = String::from_utf8(body).unwrap();
    assert_eq!(text.lines().count(), 3);
    assert!(!text.contains("2021,Alabama"));

    let (status, _) = get_json("/api/state/Alabama/export?year=soon").await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_state_export_filename_is_header_safe() {
    let (status, headers, body) = get("/api/state/Ala%22bama%0A/export").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(
        headers[header::CONTENT_DISPOSITION],
        "attachment; filename=\"ssbg_Alabama_data_FY21-FY22.csv\""
    );
    // unknown state: header row only
    assert_eq!(String::from_utf8(body).unwrap().lines().count(), 1);
}

#[tokio::test]
async fn test_national_export_uses_filters() {
    let (status, headers, body) = get("/api/national/export?categories=Child%20Care").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(
        headers[header::CONTENT_DISPOSITION],
        "attachment; filename=\"ssbg_national_data.csv\""
    );

    let text = String::from_utf8(body).unwrap();
    let lines: Vec<&str> = text.lines().collect();
    assert_eq!(lines.len(), 3);
    assert!(lines[1].starts_with("2022,Alabama,1,Child Care,"));
    assert!(lines[2].starts_with("2022,New York,1,Child Care,"));
}

#[tokio::test]
async fn test_map_resolve() {
    let (status, body) = get_json("/api/map/resolve/ny").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["data"]["state_name"], "New York");
    assert_eq!(body["data"]["path"], "/state/New%20York");

    let (status, body) = get_json("/api/map/resolve/ZZ").await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["success"], false);
}

#[tokio::test]
async fn test_html_shells() {
    let (status, _, body) = get("/").await;
    assert_eq!(status, StatusCode::OK);
    assert!(String::from_utf8(body).unwrap().contains("National Overview"));

    let (status, _, body) = get("/state/Ohio").await;
    assert_eq!(status, StatusCode::OK);
    assert!(String::from_utf8(body).unwrap().contains("SSBG Recipient Report"));

    let (status, headers, _) = get("/state").await;
    assert_eq!(status, StatusCode::TEMPORARY_REDIRECT);
    assert_eq!(headers[header::LOCATION], "/state/Alabama");
}

#[tokio::test]
async fn test_static_table_renderer_escapes_and_pages() {
    let (status, _, body) = get("/static/dashboard.js").await;
    assert_eq!(status, StatusCode::OK);

    let js = String::from_utf8(body).unwrap();
    assert!(js.contains("insertCell().textContent = cell"));
    assert!(!js.contains("<td>${"));
    assert!(js.contains("Next ›"));
}
