//! HTTP endpoint tests using axum-test

use axum::http::StatusCode;
use axum_test::TestServer;
use pretty_assertions::assert_eq;
use rental_core::{Catalog, EngineConfig};
use serde_json::{json, Value};
use std::io::Write;
use std::sync::Arc;

use crate::router;
use crate::state::AppState;

/// Create a test server over the builtin fleet
fn create_test_server() -> TestServer {
    let state = AppState::with_catalog(EngineConfig::default(), Catalog::builtin());
    TestServer::new(router(Arc::new(state))).unwrap()
}

#[tokio::test]
async fn test_health_reports_catalog() {
    let server = create_test_server();
    let response = server.get("/health").await;
    response.assert_status_ok();

    let json = response.json::<Value>();
    assert_eq!(json["status"], "ok");
    assert_eq!(json["cars"], 12);
    assert!(json["vocabulary"].as_u64().unwrap() > 0);
}

#[tokio::test]
async fn test_list_and_get_cars() {
    let server = create_test_server();

    let cars = server.get("/api/cars").await.json::<Vec<Value>>();
    assert_eq!(cars.len(), 12);
    assert_eq!(cars[0]["Brand"], "honda");
    assert!(cars[0].get("feature_text").is_none());

    let car = server.get("/api/cars/6").await.json::<Value>();
    assert_eq!(car["Model"], "xuv700");
    assert_eq!(car["Engine_CC"], 1999.0);
}

#[tokio::test]
async fn test_unknown_car_is_404() {
    let server = create_test_server();
    let response = server.get("/api/cars/nope").await;
    response.assert_status_not_found();

    let json = response.json::<Value>();
    assert_eq!(json["status"], 404);
}

#[tokio::test]
async fn test_recommend_returns_scored_rows() {
    let server = create_test_server();
    let response = server
        .post("/api/recommend")
        .json(&json!({
            "Brand": "Hyundai",
            "Body_Type": "Hatchback",
            "top_n": 3
        }))
        .await;
    response.assert_status_ok();

    let rows = response.json::<Vec<Value>>();
    assert_eq!(rows.len(), 3);
    assert_eq!(rows[0]["Brand"], "hyundai");
    assert_eq!(rows[0]["Model"], "i20");
    for row in &rows {
        for field in [
            "Car_ID",
            "Brand",
            "Model",
            "Fuel_Type",
            "Transmission",
            "Body_Type",
            "Mileage",
            "Engine_CC",
            "similarity_score",
        ] {
            assert!(row.get(field).is_some(), "missing {}", field);
        }
    }
}

#[tokio::test]
async fn test_recommend_empty_body_is_neutral() {
    let server = create_test_server();
    let rows = server.post("/api/recommend").await.json::<Vec<Value>>();
    assert_eq!(rows.len(), 5);
}

#[tokio::test]
async fn test_recommend_garbage_is_empty_list() {
    let server = create_test_server();

    let response = server.post("/api/recommend").text("not json at all").await;
    response.assert_status_ok();
    assert!(response.json::<Vec<Value>>().is_empty());

    let response = server.post("/api/recommend").json(&json!(["Toyota"])).await;
    response.assert_status_ok();
    assert!(response.json::<Vec<Value>>().is_empty());
}

#[tokio::test]
async fn test_recommend_impossible_bounds_fall_back() {
    let server = create_test_server();
    let rows = server
        .post("/api/recommend")
        .json(&json!({ "min_mileage": 500, "max_engine_cc": 10 }))
        .await
        .json::<Vec<Value>>();
    assert_eq!(rows.len(), 5);
}

#[tokio::test]
async fn test_book_and_history() {
    let server = create_test_server();

    let response = server
        .post("/api/book")
        .json(&json!({ "user_id": "u-1", "car_id": "1" }))
        .await;
    response.assert_status_ok();
    let booking = response.json::<Value>();
    assert_eq!(booking["car_id"], "1");
    assert_eq!(booking["event"], "booked");

    let bookings = server.get("/api/bookings/u-1").await.json::<Vec<Value>>();
    assert_eq!(bookings.len(), 1);

    // Honda City is a sedan: the other two sedans come back
    let cars = server
        .post("/api/recommend/history")
        .json(&json!({ "user_id": "u-1" }))
        .await
        .json::<Vec<Value>>();
    let models: Vec<&str> = cars.iter().filter_map(|c| c["Model"].as_str()).collect();
    assert_eq!(models, vec!["verna", "slavia"]);
}

#[tokio::test]
async fn test_book_unknown_car_is_404() {
    let server = create_test_server();
    let response = server
        .post("/api/book")
        .json(&json!({ "user_id": "u-1", "car_id": "404" }))
        .await;
    response.assert_status_not_found();
}

#[tokio::test]
async fn test_book_blank_user_is_400() {
    let server = create_test_server();
    let response = server
        .post("/api/book")
        .json(&json!({ "user_id": " ", "car_id": "1" }))
        .await;
    response.assert_status_bad_request();
}

#[tokio::test]
async fn test_reload_swaps_catalog() {
    let mut file = tempfile::Builder::new()
        .suffix(".csv")
        .tempfile()
        .expect("temp file");
    writeln!(
        file,
        "Car_ID,Brand,Model,Fuel_Type,Transmission,Body_Type,Mileage,Engine_CC"
    )
    .unwrap();
    writeln!(file, "a,Toyota,Innova,Diesel,Manual,MUV,12,2393").unwrap();
    file.flush().unwrap();

    let config = EngineConfig::default().with_catalog_path(file.path());
    let state = AppState::with_catalog(config, Catalog::builtin());
    let server = TestServer::new(router(Arc::new(state))).unwrap();

    let response = server.post("/api/catalog/reload").await;
    response.assert_status_ok();
    assert_eq!(response.json::<Value>()["cars"], 1);

    let rows = server
        .post("/api/recommend")
        .json(&json!({ "Brand": "Toyota" }))
        .await
        .json::<Vec<Value>>();
    assert_eq!(rows.len(), 1);
    assert_eq!(rows[0]["Car_ID"], "a");
}

#[tokio::test]
async fn test_failed_reload_keeps_old_catalog() {
    let config = EngineConfig::default().with_catalog_path("/missing/catalog.csv");
    let state = AppState::with_catalog(config, Catalog::builtin());
    let server = TestServer::new(router(Arc::new(state))).unwrap();

    let response = server.post("/api/catalog/reload").await;
    response.assert_status(StatusCode::INTERNAL_SERVER_ERROR);

    let cars = server.get("/api/cars").await.json::<Vec<Value>>();
    assert_eq!(cars.len(), 12);
}
