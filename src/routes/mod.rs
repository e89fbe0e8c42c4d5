//! Router assembly: common routes at the root, CRUD routes under the configured prefix.

mod api;
pub(crate) mod common;

pub use api::api_routes;
pub use common::common_routes;

use crate::config::ServerConfig;
use crate::state::AppState;
use axum::Router;
use tower::ServiceBuilder;
use tower_http::classify::{ServerErrorsAsFailures, SharedClassifier};
use tower_http::limit::RequestBodyLimitLayer;
use tower_http::trace::{DefaultMakeSpan, DefaultOnRequest, DefaultOnResponse, TraceLayer};
use tracing::Level;

/// Full application router with request tracing and the body size limit applied.
pub fn app(state: AppState, config: &ServerConfig) -> Router {
    let api = api_routes(state.clone());
    let router = common_routes(state);
    let router = match config.api_prefix.as_deref() {
        Some(prefix) => router.nest(prefix, api),
        None => router.merge(api),
    };
    router.layer(
        ServiceBuilder::new()
            .layer(trace_layer())
            .layer(RequestBodyLimitLayer::new(config.body_limit_bytes)),
    )
}

type HttpTraceLayer =
    TraceLayer<SharedClassifier<ServerErrorsAsFailures>, DefaultMakeSpan, DefaultOnRequest, DefaultOnResponse>;

/// Request spans and response events at INFO, so the default filter shows them.
fn trace_layer() -> HttpTraceLayer {
    TraceLayer::new_for_http()
        .make_span_with(DefaultMakeSpan::new().level(Level::INFO))
        .on_response(DefaultOnResponse::new().level(Level::INFO))
}
