use axum::{
    extract::State,
    http::{HeaderValue, Method, StatusCode},
    response::{IntoResponse, Response},
    routing::{get, post},
    Json, Router,
};
use serde::Deserialize;
use serde_json::json;
use std::sync::Arc;
use tower_http::cors::{Any, CorsLayer};
use tracing::{error, info, warn};

use crate::command::CommandRunner;
use crate::connection::StatusResult;
use crate::provisioner::NetworkProvisioner;
use crate::scan::ScanResult;

pub struct ServerConfig {
    pub host: String,
    pub port: u16,
    pub allowed_origins: Vec<String>,
}

#[derive(Debug, Deserialize)]
pub struct ConnectRequest {
    #[serde(default)]
    pub ssid: String,
    #[serde(default)]
    pub password: Option<String>,
}

type SharedProvisioner<R> = Arc<NetworkProvisioner<R>>;

pub async fn run_server<R: CommandRunner>(
    provisioner: NetworkProvisioner<R>,
    config: ServerConfig,
) -> anyhow::Result<()> {
    let app = router(Arc::new(provisioner), &config.allowed_origins);

    let addr = format!("{}:{}", config.host, config.port);
    let listener = tokio::net::TcpListener::bind(&addr).await?;
    info!(%addr, origins = ?config.allowed_origins, "HTTP server listening");

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    info!("HTTP server stopped");
    Ok(())
}

pub fn router<R: CommandRunner>(provisioner: SharedProvisioner<R>, allowed_origins: &[String]) -> Router {
    Router::new()
        .route("/", get(index_handler))
        .route("/api/wifi/networks", get(wifi_networks::<R>))
        .route("/api/wifi/status", get(wifi_status::<R>))
        .route("/api/wifi/connect", post(wifi_connect::<R>))
        .layer(cors_layer(allowed_origins))
        .with_state(provisioner)
}

fn cors_layer(allowed_origins: &[String]) -> CorsLayer {
    let origins: Vec<HeaderValue> = allowed_origins
        .iter()
        .filter_map(|origin| match origin.parse::<HeaderValue>() {
            Ok(value) => Some(value),
            Err(_) => {
                warn!(%origin, "ignoring invalid CORS origin");
                None
            }
        })
        .collect();

    CorsLayer::new()
        .allow_origin(origins)
        .allow_methods([Method::GET, Method::POST, Method::PUT, Method::DELETE])
        .allow_headers(Any)
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        error!("Failed to listen for Ctrl+C: {}", e);
        std::future::pending::<()>().await;
    }
    info!("Received Ctrl+C, shutting down");
}

async fn index_handler() -> impl IntoResponse {
    Json(json!({ "message": "WiFi provisioner is running." }))
}

async fn wifi_networks<R: CommandRunner>(
    State(provisioner): State<SharedProvisioner<R>>,
) -> Json<ScanResult> {
    Json(provisioner.scan().await)
}

async fn wifi_status<R: CommandRunner>(
    State(provisioner): State<SharedProvisioner<R>>,
) -> Json<StatusResult> {
    Json(provisioner.status().await)
}

async fn wifi_connect<R: CommandRunner>(
    State(provisioner): State<SharedProvisioner<R>>,
    Json(request): Json<ConnectRequest>,
) -> Response {
    let ssid = request.ssid.trim().to_string();
    if ssid.is_empty() {
        return error_response(StatusCode::BAD_REQUEST, "SSID is required");
    }
    let password = request.password.filter(|p| !p.trim().is_empty());

    // Detached so a dropped request cannot cut a profile install short.
    let task = tokio::spawn(async move { provisioner.connect(&ssid, password.as_deref()).await });

    match task.await {
        Ok(result) if result.success => {
            Json(json!({ "success": true, "ssid": result.ssid })).into_response()
        }
        Ok(result) => error_response(
            StatusCode::BAD_REQUEST,
            result.error.as_deref().unwrap_or("Connection failed"),
        ),
        Err(e) => {
            error!("Connect task failed: {}", e);
            error_response(StatusCode::INTERNAL_SERVER_ERROR, "Connection failed")
        }
    }
}

fn error_response(status: StatusCode, message: &str) -> Response {
    (status, Json(json!({ "error": message }))).into_response()
}
