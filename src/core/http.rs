//! HTTP endpoint server using Axum

use axum::{
    extract::{Path, Request, State},
    http::StatusCode,
    middleware::Next,
    response::{Json, Response},
    routing::{delete, get, post, put},
    Router,
};
use serde::Deserialize;
use serde_json::{json, Value};
use std::sync::Arc;
use std::time::Instant;
use tokio::sync::RwLock;
use tower::ServiceBuilder;
use tower_http::{
    cors::CorsLayer,
    trace::{DefaultMakeSpan, DefaultOnRequest, DefaultOnResponse, TraceLayer},
};
use tracing::{error, info, Level};

use crate::catalog::Catalog;
use crate::codegen::{export, export_filename, PseudocodeGenerator, ScriptGenerator};
use crate::metrics::Metrics;
use crate::models::strategy::StrategyConfig;
use crate::store::{MemoryStore, StoreError, StrategyStore};

#[derive(Clone)]
pub struct AppState {
    pub health: Arc<RwLock<HealthStatus>>,
    pub metrics: Arc<Metrics>,
    pub start_time: Arc<Instant>,
    pub catalog: Arc<Catalog>,
    pub store: Arc<dyn StrategyStore>,
}

#[derive(Clone, Debug)]
pub struct HealthStatus {
    pub status: String,
}

impl Default for HealthStatus {
    fn default() -> Self {
        Self {
            status: "healthy".to_string(),
        }
    }
}

pub async fn health_check(State(state): State<AppState>) -> Result<Json<Value>, StatusCode> {
    let health = state.health.read().await;
    let uptime_seconds = state.start_time.elapsed().as_secs();
    Ok(Json(json!({
        "status": health.status,
        "uptime_seconds": uptime_seconds,
        "service": "stratforge-strategy-builder"
    })))
}

pub async fn metrics_handler(State(state): State<AppState>) -> Result<String, StatusCode> {
    state
        .metrics
        .export()
        .map_err(|_| StatusCode::INTERNAL_SERVER_ERROR)
}

/// Middleware to track HTTP request metrics
async fn metrics_middleware(
    State(state): State<AppState>,
    request: Request,
    next: Next,
) -> Response {
    let start = Instant::now();
    let method = request.method().clone();
    let path = request.uri().path().to_string();

    state.metrics.http_requests_in_flight.inc();

    let response = next.run(request).await;
    let status = response.status();
    let duration = start.elapsed();

    state.metrics.http_requests_in_flight.dec();
    state.metrics.http_requests_total.inc();
    state
        .metrics
        .http_request_duration_seconds
        .observe(duration.as_secs_f64());

    if status.is_server_error() {
        tracing::error!(
            method = %method,
            path = %path,
            status = %status,
            duration_ms = duration.as_millis(),
            "HTTP request error"
        );
    }

    response
}

fn store_status(err: StoreError) -> StatusCode {
    match err {
        StoreError::NotFound(_) => StatusCode::NOT_FOUND,
    }
}

/// List the full indicator catalog.
async fn list_indicators(State(state): State<AppState>) -> Json<Value> {
    Json(json!(state.catalog.entries()))
}

/// List all saved strategies
async fn list_strategies(State(state): State<AppState>) -> Result<Json<Value>, StatusCode> {
    let strategies = state.store.list().await.map_err(|e| {
        error!(error = %e, "Failed to load strategies");
        StatusCode::INTERNAL_SERVER_ERROR
    })?;
    Ok(Json(json!(strategies)))
}

/// Get a strategy by ID
async fn get_strategy(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<StrategyConfig>, StatusCode> {
    let strategy = state.store.get(&id).await.map_err(|e| {
        error!(error = %e, strategy_id = %id, "Failed to load strategy");
        store_status(e)
    })?;
    Ok(Json(strategy))
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct CreateStrategyRequest {
    name: String,
    #[serde(default)]
    description: String,
}

/// Create a new empty strategy
async fn create_strategy(
    State(state): State<AppState>,
    Json(request): Json<CreateStrategyRequest>,
) -> Result<(StatusCode, Json<StrategyConfig>), StatusCode> {
    let mut strategy = StrategyConfig::new(request.name);
    strategy.description = request.description;

    let created = state.store.create(strategy).await.map_err(|e| {
        error!(error = %e, "Failed to create strategy");
        StatusCode::INTERNAL_SERVER_ERROR
    })?;
    Ok((StatusCode::CREATED, Json(created)))
}

/// Replace a strategy
async fn update_strategy(
    State(state): State<AppState>,
    Path(id): Path<String>,
    Json(strategy): Json<StrategyConfig>,
) -> Result<Json<StrategyConfig>, StatusCode> {
    let updated = state.store.update(&id, strategy).await.map_err(|e| {
        error!(error = %e, strategy_id = %id, "Failed to update strategy");
        store_status(e)
    })?;
    Ok(Json(updated))
}

/// Delete a strategy
async fn delete_strategy(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<StatusCode, StatusCode> {
    state.store.delete(&id).await.map_err(|e| {
        error!(error = %e, strategy_id = %id, "Failed to delete strategy");
        store_status(e)
    })?;
    Ok(StatusCode::NO_CONTENT)
}

/// Generate the executable script for a strategy
async fn generate_script(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<Value>, StatusCode> {
    let strategy = state.store.get(&id).await.map_err(store_status)?;
    let generator = ScriptGenerator::new(&state.catalog);
    let code = generator.generate(&strategy);
    state.metrics.scripts_generated_total.inc();
    Ok(Json(json!({ "language": "pinescript", "code": code })))
}

/// Generate the pseudocode document for a strategy
async fn generate_pseudocode(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<Value>, StatusCode> {
    let strategy = state.store.get(&id).await.map_err(store_status)?;
    let generator = PseudocodeGenerator::new(&state.catalog);
    let text = generator.generate(&strategy);
    state.metrics.pseudocode_generated_total.inc();
    Ok(Json(json!({ "language": "pseudocode", "code": text })))
}

/// Export a strategy as a JSON download envelope
async fn export_strategy(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<Value>, StatusCode> {
    let strategy = state.store.get(&id).await.map_err(store_status)?;
    let envelope = export(&strategy, chrono::Utc::now());
    let filename = export_filename(&strategy);
    state.metrics.exports_total.inc();
    Ok(Json(json!({ "filename": filename, "content": envelope })))
}

/// Acknowledge a backtest request. Backtesting runs in a separate engine;
/// this surface only validates the strategy exists and echoes the request.
async fn run_backtest(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<Value>, StatusCode> {
    let strategy = state.store.get(&id).await.map_err(store_status)?;
    info!(strategy_id = %id, "Backtest requested");
    Ok(Json(json!({
        "status": "accepted",
        "strategyId": strategy.id,
        "totalConditions": strategy.total_conditions(),
    })))
}

pub fn create_router(state: AppState) -> Router {
    Router::new()
        .route("/health", get(health_check))
        .route("/metrics", get(metrics_handler))
        .route("/api/indicators", get(list_indicators))
        .route("/api/strategies", get(list_strategies))
        .route("/api/strategies", post(create_strategy))
        .route("/api/strategies/{id}", get(get_strategy))
        .route("/api/strategies/{id}", put(update_strategy))
        .route("/api/strategies/{id}", delete(delete_strategy))
        .route("/api/strategies/{id}/generate/script", get(generate_script))
        .route(
            "/api/strategies/{id}/generate/pseudocode",
            get(generate_pseudocode),
        )
        .route("/api/strategies/{id}/export", get(export_strategy))
        .route("/api/strategies/{id}/backtest", post(run_backtest))
        .layer(
            ServiceBuilder::new()
                .layer(
                    TraceLayer::new_for_http()
                        .make_span_with(DefaultMakeSpan::new().level(Level::DEBUG))
                        .on_request(DefaultOnRequest::new().level(Level::DEBUG))
                        .on_response(DefaultOnResponse::new().level(Level::DEBUG)),
                )
                .layer(axum::middleware::from_fn_with_state(
                    state.clone(),
                    metrics_middleware,
                ))
                .layer(CorsLayer::permissive()),
        )
        .with_state(state)
}

/// Default application state with the in-memory store.
pub fn default_state() -> Result<AppState, Box<dyn std::error::Error>> {
    Ok(AppState {
        health: Arc::new(RwLock::new(HealthStatus::default())),
        metrics: Arc::new(Metrics::new()?),
        start_time: Arc::new(Instant::now()),
        catalog: Arc::new(Catalog::new()),
        store: Arc::new(MemoryStore::new()),
    })
}

pub async fn start_server(port: u16) -> Result<(), Box<dyn std::error::Error>> {
    let state = default_state()?;
    let app = create_router(state);
    let listener = tokio::net::TcpListener::bind(format!("0.0.0.0:{}", port)).await?;

    info!(port = port, "HTTP server listening on port {}", port);
    info!(
        "Metrics endpoint available at http://0.0.0.0:{}/metrics",
        port
    );
    axum::serve(listener, app).await?;

    Ok(())
}
