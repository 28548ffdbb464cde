//! Integration tests for the REST API feature.

#![cfg(feature = "api")]

mod common;

use std::sync::Arc;

use axum::body::Body;
use axum::http::{Request, StatusCode};
use tower::util::ServiceExt;

use rlp_estimate::api::{AppState, router};
use rlp_estimate::config::Settings;
use rlp_estimate::profile::ProfileStore;

/// Load fixture tables from disk exactly as the binary does.
fn build_api_state(name: &str) -> Arc<AppState> {
    let dir = common::scratch_dir(name);
    let config_path = common::write_fixture_tables(&dir);
    let settings = Settings::from_toml_file(&config_path).expect("fixture config");
    let store = ProfileStore::load(&settings).expect("fixture tables");
    Arc::new(AppState {
        store,
        estimation: settings.estimation,
    })
}

async fn post_estimate(state: Arc<AppState>, body: &str) -> (StatusCode, serde_json::Value) {
    let req = Request::builder()
        .method("POST")
        .uri("/estimate")
        .header("content-type", "application/json")
        .body(Body::from(body.to_string()))
        .unwrap();
    let resp = router(state).oneshot(req).await.unwrap();
    let status = resp.status();
    let body = axum::body::to_bytes(resp.into_body(), usize::MAX)
        .await
        .unwrap();
    (status, serde_json::from_slice(&body).unwrap())
}

#[tokio::test]
async fn unknown_operator_falls_back_to_default() {
    let state = build_api_state("api-fallback");
    let (status, json) = post_estimate(
        state,
        r#"{
            "energy": "electricity",
            "operator": "Nowhere Grid",
            "start": {"date": "2022-03-01", "value": 100.0},
            "end": {"date": "2022-08-31", "value": 1300.0}
        }"#,
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(json["profile"], "ORES (Namur)");
    assert_eq!(json["days"], 183);
}

#[tokio::test]
async fn multi_year_gas_reports_segments() {
    let state = build_api_state("api-segments");
    let (status, json) = post_estimate(
        state,
        r#"{
            "energy": "gas",
            "unit": "kwh",
            "start": {"date": "2021-11-15", "value": 0.0},
            "end": {"date": "2023-02-14", "value": 20000.0}
        }"#,
    )
    .await;
    assert_eq!(status, StatusCode::OK);

    let segments = json["segments"].as_array().expect("segments array");
    let counts: Vec<u64> = segments
        .iter()
        .filter_map(|s| s["count"].as_u64())
        .collect();
    assert_eq!(counts, vec![2, 1, 2]);
    assert_eq!(segments[0]["start"], "2022-01-01");
    assert_eq!(segments[0]["end"], "2022-02-15");
    assert!(json["result"]["covered_fraction"].as_f64().unwrap() > 1.0);
    assert!(json["result"]["annual_m3"].as_f64().is_some());
}

#[tokio::test]
async fn electricity_in_m3_is_rejected() {
    let state = build_api_state("api-unit");
    let (status, json) = post_estimate(
        state,
        r#"{
            "energy": "electricity",
            "unit": "m3",
            "start": {"date": "2022-03-01", "value": 1.0},
            "end": {"date": "2022-08-31", "value": 2.0}
        }"#,
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(json["kind"], "validation");
}
