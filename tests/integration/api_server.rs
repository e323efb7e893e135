//! Integration tests for the API Server
//!
//! Tests HTTP endpoints, health checks, metrics, and the strategy lifecycle.


use serde_json::{json, Value};

use test_utils::TestApiServer;

#[tokio::test]
async fn health_endpoint_reports_healthy_status() {
    let app = TestApiServer::new().await;
    let response = app.server.get("/health").await;
    assert_eq!(response.status_code(), 200);

    let body: Value = response.json();
    assert_eq!(body["status"], "healthy");
    assert!(body["uptime_seconds"].as_u64().is_some());
    assert_eq!(body["service"], "stratforge-strategy-builder");
}

#[tokio::test]
async fn metrics_endpoint_exposes_prometheus_metrics() {
    let app = TestApiServer::new().await;
    let response = app.server.get("/metrics").await;
    assert_eq!(response.status_code(), 200);

    let body = response.text();
    assert!(
        body.contains("http_requests_total"),
        "Expected http_requests_total metric"
    );
    assert!(
        body.contains("http_request_duration_seconds"),
        "Expected http_request_duration_seconds metric"
    );
    assert!(
        body.contains("http_requests_in_flight"),
        "Expected http_requests_in_flight metric"
    );
}

#[tokio::test]
async fn indicators_endpoint_lists_the_catalog() {
    let app = TestApiServer::new().await;
    let response = app.server.get("/api/indicators").await;
    assert_eq!(response.status_code(), 200);

    let body: Value = response.json();
    let entries = body.as_array().expect("catalog array");
    assert!(entries.len() >= 15);

    let keys: Vec<&str> = entries
        .iter()
        .filter_map(|e| e["key"].as_str())
        .collect();
    assert!(keys.contains(&"rsi"));
    assert!(keys.contains(&"macd"));
    assert!(keys.contains(&"bollinger"));

    // Each entry exposes its logic options for the editor.
    let rsi = entries.iter().find(|e| e["key"] == "rsi").unwrap();
    assert!(rsi["logicOptions"].as_array().unwrap().len() >= 4);
}

#[tokio::test]
async fn strategy_crud_lifecycle() {
    let app = TestApiServer::new().await;

    // Create.
    let response = app
        .server
        .post("/api/strategies")
        .json(&json!({ "name": "Lifecycle", "description": "CRUD coverage" }))
        .await;
    assert_eq!(response.status_code(), 201);
    let created: Value = response.json();
    let id = created["id"].as_str().expect("strategy id").to_string();
    assert_eq!(created["name"], "Lifecycle");

    // List includes it.
    let response = app.server.get("/api/strategies").await;
    let listed: Value = response.json();
    assert_eq!(listed.as_array().unwrap().len(), 1);

    // Get it back.
    let response = app.server.get(&format!("/api/strategies/{}", id)).await;
    assert_eq!(response.status_code(), 200);
    let fetched: Value = response.json();
    assert_eq!(fetched["description"], "CRUD coverage");

    // Update: rename through full replace.
    let mut updated = fetched.clone();
    updated["name"] = json!("Lifecycle v2");
    let response = app
        .server
        .put(&format!("/api/strategies/{}", id))
        .json(&updated)
        .await;
    assert_eq!(response.status_code(), 200);
    let body: Value = response.json();
    assert_eq!(body["name"], "Lifecycle v2");

    // Delete.
    let response = app.server.delete(&format!("/api/strategies/{}", id)).await;
    assert_eq!(response.status_code(), 204);

    let response = app.server.get(&format!("/api/strategies/{}", id)).await;
    assert_eq!(response.status_code(), 404);
}

#[tokio::test]
async fn unknown_strategy_returns_not_found() {
    let app = TestApiServer::new().await;
    let response = app.server.get("/api/strategies/strategy-999999").await;
    assert_eq!(response.status_code(), 404);

    let response = app
        .server
        .get("/api/strategies/strategy-999999/generate/script")
        .await;
    assert_eq!(response.status_code(), 404);
}

#[tokio::test]
async fn script_generation_returns_pinescript() {
    let app = TestApiServer::new().await;

    let response = app
        .server
        .post("/api/strategies")
        .json(&json!({ "name": "Generated" }))
        .await;
    let created: Value = response.json();
    let id = created["id"].as_str().unwrap();

    let response = app
        .server
        .get(&format!("/api/strategies/{}/generate/script", id))
        .await;
    assert_eq!(response.status_code(), 200);

    let body: Value = response.json();
    assert_eq!(body["language"], "pinescript");
    let code = body["code"].as_str().unwrap();
    assert!(code.contains("//@version=5"));
    assert!(code.contains("strategy(\"Generated\""));
}

#[tokio::test]
async fn pseudocode_generation_returns_document() {
    let app = TestApiServer::new().await;

    let response = app
        .server
        .post("/api/strategies")
        .json(&json!({ "name": "Readable" }))
        .await;
    let created: Value = response.json();
    let id = created["id"].as_str().unwrap();

    let response = app
        .server
        .get(&format!("/api/strategies/{}/generate/pseudocode", id))
        .await;
    assert_eq!(response.status_code(), 200);

    let body: Value = response.json();
    assert_eq!(body["language"], "pseudocode");
    let code = body["code"].as_str().unwrap();
    assert!(code.contains("STRATEGY: Readable"));
    assert!(code.contains("RISK MANAGEMENT:"));
}

#[tokio::test]
async fn export_returns_filename_and_flattened_content() {
    let app = TestApiServer::new().await;

    let response = app
        .server
        .post("/api/strategies")
        .json(&json!({ "name": "Export Me" }))
        .await;
    let created: Value = response.json();
    let id = created["id"].as_str().unwrap();

    let response = app
        .server
        .get(&format!("/api/strategies/{}/export", id))
        .await;
    assert_eq!(response.status_code(), 200);

    let body: Value = response.json();
    assert_eq!(body["filename"], "Export_Me.json");
    assert_eq!(body["content"]["name"], "Export Me");
    assert_eq!(body["content"]["meta"]["totalConditions"], 0);
    assert_eq!(body["content"]["meta"]["hasSecondaryIndicators"], false);
}

#[tokio::test]
async fn backtest_acknowledges_existing_strategy() {
    let app = TestApiServer::new().await;

    let response = app
        .server
        .post("/api/strategies")
        .json(&json!({ "name": "Backtested" }))
        .await;
    let created: Value = response.json();
    let id = created["id"].as_str().unwrap();

    let response = app
        .server
        .post(&format!("/api/strategies/{}/backtest", id))
        .await;
    assert_eq!(response.status_code(), 200);

    let body: Value = response.json();
    assert_eq!(body["status"], "accepted");
    assert_eq!(body["strategyId"], id);
}

#[tokio::test]
async fn generation_counters_increment() {
    let app = TestApiServer::new().await;

    let response = app
        .server
        .post("/api/strategies")
        .json(&json!({ "name": "Counted" }))
        .await;
    let created: Value = response.json();
    let id = created["id"].as_str().unwrap();

    let _ = app
        .server
        .get(&format!("/api/strategies/{}/generate/script", id))
        .await;

    assert_eq!(app.metrics.scripts_generated_total.get(), 1);
}
