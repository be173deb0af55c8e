//! # pms-api: Axum API for the Patient Management System
//!
//! Serves the patient records file and exposes the `pms-core` validator
//! over HTTP.
//!
//! ## API Surface
//!
//! | Path                      | Module                  | Purpose                  |
//! |---------------------------|-------------------------|--------------------------|
//! | `/`, `/about`             | [`routes::info`]        | Service information      |
//! | `/view`, `/patient/{id}`  | [`routes::patients`]    | Stored records           |
//! | `/sort`                   | [`routes::patients`]    | Records sorted by column |
//! | `/v1/patients/validate`   | [`routes::validation`]  | Validate a new record    |
//! | `/health/*`               | this module             | Probes                   |
//!
//! ## OpenAPI
//!
//! Auto-generated OpenAPI 3.1 spec via utoipa derive macros at `/openapi.json`.

pub mod error;
pub mod extractors;
pub mod middleware;
pub mod openapi;
pub mod routes;
pub mod state;
pub mod store;

use axum::routing::get;
use axum::Router;

use crate::state::AppState;

/// Assemble the full application router with all routes and middleware.
pub fn app(state: AppState) -> Router {
    let api = Router::new()
        .merge(routes::info::router())
        .merge(routes::patients::router())
        .merge(routes::validation::router())
        .merge(openapi::router())
        .layer(middleware::tracing_layer::layer())
        .with_state(state);

    let health = Router::new()
        .route("/health/liveness", get(liveness))
        .route("/health/readiness", get(readiness));

    Router::new().merge(health).merge(api)
}

/// Liveness probe: always returns 200 if the process is running.
async fn liveness() -> &'static str {
    "ok"
}

/// Readiness probe: returns 200 when the application is ready to serve.
async fn readiness() -> &'static str {
    "ready"
}
