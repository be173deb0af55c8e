//! # Service Information
//!
//! - `GET /`: service banner
//! - `GET /about`: one-line description

use axum::routing::get;
use axum::{Json, Router};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use crate::state::AppState;

/// Single-message response.
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct MessageResponse {
    pub message: String,
}

impl MessageResponse {
    fn new(message: &str) -> Json<Self> {
        Json(Self {
            message: message.to_string(),
        })
    }
}

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/", get(home))
        .route("/about", get(about))
}

/// GET /: Service banner.
#[utoipa::path(
    get,
    path = "/",
    responses((status = 200, description = "Service banner", body = MessageResponse)),
    tag = "info"
)]
pub(crate) async fn home() -> Json<MessageResponse> {
    MessageResponse::new("Patient Management System API")
}

/// GET /about: Service description.
#[utoipa::path(
    get,
    path = "/about",
    responses((status = 200, description = "Service description", body = MessageResponse)),
    tag = "info"
)]
pub(crate) async fn about() -> Json<MessageResponse> {
    MessageResponse::new("A fully functional API to manage your patients' records")
}
