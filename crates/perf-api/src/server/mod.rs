use std::net::SocketAddr;
use std::sync::Arc;

use axum::extract::rejection::JsonRejection;
use axum::extract::{Path, Request, State};
use axum::http::header::{HeaderName, HeaderValue};
use axum::http::Method;
use axum::http::StatusCode;
use axum::middleware::{self, Next};
use axum::response::{IntoResponse, Response};
use axum::routing::{get, post};
use axum::{Json, Router};
use contracts::{
    ApiError, ComparisonRequest, ErrorCode, InitSummary, MetricsSource, ScenarioDomain,
    SolutionEntry,
};
use serde_json::{json, Value};
use thiserror::Error;
use tokio::net::TcpListener;
use tokio::sync::Mutex;
use tracing::{info, warn};

use crate::{ApiFailure, PerformanceApi, PersistenceError};

const METRICS_SOURCE_HEADER: &str = "x-metrics-source";

include!("error.rs");
include!("state.rs");
include!("routes/solutions.rs");
include!("routes/performance.rs");
include!("routes/admin.rs");
include!("util.rs");

/// Serves the HTTP API until ctrl-c, then closes the attached store.
pub async fn serve(addr: SocketAddr, api: PerformanceApi) -> Result<(), ServerError> {
    let state = AppState::new(api);
    let app = router(state.clone());

    let listener = TcpListener::bind(addr).await?;
    info!(addr = %listener.local_addr()?, "serving performance api");
    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    let mut api = state.inner.lock().await;
    api.detach_store()?;
    info!("server stopped");
    Ok(())
}

fn router(state: AppState) -> Router {
    Router::new()
        .route("/api/health", get(health))
        .route("/api/solutions", get(list_solutions))
        .route("/api/solutions/{id}", get(get_solution))
        .route("/api/scenarios", get(get_scenarios))
        .route("/api/performance/comparison", post(compare_performance))
        .route("/api/init", get(init_store).post(init_store))
        .fallback(not_found)
        .layer(middleware::from_fn(cors_middleware))
        .with_state(state)
}

async fn cors_middleware(request: Request, next: Next) -> Response {
    if request.method() == Method::OPTIONS {
        let mut response = Response::new(axum::body::Body::empty());
        *response.status_mut() = StatusCode::NO_CONTENT;
        apply_cors_headers(response.headers_mut());
        return response;
    }

    let mut response = next.run(request).await;
    apply_cors_headers(response.headers_mut());
    response
}

async fn shutdown_signal() {
    if let Err(err) = tokio::signal::ctrl_c().await {
        warn!(error = %err, "failed to listen for shutdown signal");
        std::future::pending::<()>().await;
    }
    info!("shutdown signal received");
}
