//! Stand-in upstream for local development.
//!
//! Serves the same resources the proxy expects from its backend:
//! `GET /api/health`, `GET /api/data` and `POST /api/data`, plus the form
//! backend's `GET /health` and `POST /process`.

use axum::{
    body::Bytes,
    extract::ConnectInfo,
    http::{HeaderMap, StatusCode},
    response::IntoResponse,
    routing::{get, post},
    Json, Router,
};
use serde_json::{json, Value};
use std::net::SocketAddr;

use frontend_proxy::config::LogFormat;
use frontend_proxy::observability::logging::init_logging;

async fn home() -> Json<Value> {
    Json(json!({
        "message": "Flask Backend API",
        "status": "running",
        "version": "1.0.0"
    }))
}

async fn health() -> Json<Value> {
    Json(json!({
        "status": "healthy",
        "service": "flask-backend"
    }))
}

async fn get_data() -> Json<Value> {
    Json(json!({
        "data": [
            {"id": 1, "name": "Item 1", "description": "First item"},
            {"id": 2, "name": "Item 2", "description": "Second item"},
            {"id": 3, "name": "Item 3", "description": "Third item"}
        ]
    }))
}

async fn create_data(Json(data): Json<Value>) -> impl IntoResponse {
    (
        StatusCode::CREATED,
        Json(json!({
            "message": "Data created successfully",
            "data": data
        })),
    )
}

/// Whether a decoded payload counts as "no data".
fn is_empty_payload(data: &Value) -> bool {
    match data {
        Value::Null => true,
        Value::Bool(b) => !b,
        Value::Number(n) => n.as_f64() == Some(0.0),
        Value::String(s) => s.is_empty(),
        Value::Array(items) => items.is_empty(),
        Value::Object(fields) => fields.is_empty(),
    }
}

/// Summarise a submitted form for `client`.
fn process_form(body: &[u8], client: &str) -> Result<Value, (StatusCode, Value)> {
    let no_data = || (StatusCode::BAD_REQUEST, json!({"error": "No data received"}));

    if body.iter().all(u8::is_ascii_whitespace) {
        return Err(no_data());
    }
    let data: Value = serde_json::from_slice(body)
        .map_err(|e| (StatusCode::BAD_REQUEST, json!({"error": e.to_string()})))?;
    if is_empty_payload(&data) {
        return Err(no_data());
    }

    let Value::Object(fields) = &data else {
        return Err((
            StatusCode::BAD_REQUEST,
            json!({"error": "expected a JSON object"}),
        ));
    };
    let name = fields.get("name").and_then(Value::as_str).unwrap_or("Unknown");

    Ok(json!({
        "received": true,
        "timestamp": client,
        "form_data": data,
        "message": format!("Successfully processed data for {name}"),
        "data_count": fields.len()
    }))
}

async fn process(
    ConnectInfo(peer): ConnectInfo<SocketAddr>,
    headers: HeaderMap,
    body: Bytes,
) -> impl IntoResponse {
    let client = headers
        .get("x-forwarded-for")
        .and_then(|v| v.to_str().ok())
        .map(str::to_string)
        .unwrap_or_else(|| peer.ip().to_string());

    match process_form(&body, &client) {
        Ok(summary) => (StatusCode::OK, Json(summary)),
        Err((status, error)) => {
            tracing::warn!(client = %client, status = status.as_u16(), "Rejected form submission");
            (status, Json(error))
        }
    }
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    init_logging("info", LogFormat::Pretty)?;

    let port = match std::env::var("PORT") {
        Ok(value) if !value.trim().is_empty() => value.trim().parse::<u16>()?,
        _ => 5000,
    };

    let app = Router::new()
        .route("/", get(home))
        .route("/health", get(health))
        .route("/api/health", get(health))
        .route("/api/data", get(get_data).post(create_data))
        .route("/process", post(process));

    let addr = SocketAddr::from(([0, 0, 0, 0], port));
    let listener = tokio::net::TcpListener::bind(addr).await?;
    tracing::info!(address = %addr, "Mock upstream listening");

    axum::serve(
        listener,
        app.into_make_service_with_connect_info::<SocketAddr>(),
    )
    .await?;
    Ok(())
}
