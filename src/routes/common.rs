//! Operational routes served at the root regardless of the API prefix.

use crate::doc::ApiDoc;
use crate::error::StoreError;
use crate::handlers::root;
use crate::state::AppState;
use axum::{extract::State, http::StatusCode, routing::get, Json, Router};
use serde::Serialize;
use utoipa::{OpenApi, ToSchema};

/// Liveness and readiness report. `store` is only filled in by `/ready`.
#[derive(Debug, Serialize, ToSchema)]
pub struct ServiceStatus {
    pub status: &'static str,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub store: Option<&'static str>,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct BuildInfo {
    pub name: &'static str,
    pub version: &'static str,
}

const BUILD: BuildInfo = BuildInfo {
    name: env!("CARGO_PKG_NAME"),
    version: env!("CARGO_PKG_VERSION"),
};

fn readiness(ping: Result<(), StoreError>) -> (StatusCode, ServiceStatus) {
    match ping {
        Ok(()) => (
            StatusCode::OK,
            ServiceStatus {
                status: "ok",
                store: Some("ok"),
            },
        ),
        Err(e) => {
            tracing::warn!(error = %e, "document store did not answer ping");
            (
                StatusCode::SERVICE_UNAVAILABLE,
                ServiceStatus {
                    status: "degraded",
                    store: Some("unavailable"),
                },
            )
        }
    }
}

/// The process is up; the store is not consulted.
#[utoipa::path(get, path = "/health", tag = "health", responses((status = 200, body = ServiceStatus)))]
pub async fn health() -> Json<ServiceStatus> {
    Json(ServiceStatus {
        status: "ok",
        store: None,
    })
}

/// The document store answers a ping.
#[utoipa::path(
    get,
    path = "/ready",
    tag = "health",
    responses(
        (status = 200, description = "Store reachable", body = ServiceStatus),
        (status = 503, description = "Store unreachable", body = ServiceStatus)
    )
)]
pub async fn ready(State(state): State<AppState>) -> (StatusCode, Json<ServiceStatus>) {
    let (code, body) = readiness(state.store.ping().await);
    (code, Json(body))
}

#[utoipa::path(get, path = "/version", tag = "health", responses((status = 200, body = BuildInfo)))]
pub async fn version() -> Json<BuildInfo> {
    Json(BUILD)
}

async fn openapi() -> Json<utoipa::openapi::OpenApi> {
    Json(ApiDoc::openapi())
}

pub fn common_routes(state: AppState) -> Router {
    Router::new()
        .route("/", get(root))
        .route("/health", get(health))
        .route("/ready", get(ready))
        .route("/version", get(version))
        .route("/openapi.json", get(openapi))
        .with_state(state)
}
