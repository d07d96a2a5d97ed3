//! HTTP surface for the feed tracker.
//!
//! Handlers speak a uniform JSON envelope: every response carries a
//! `success` flag plus either a payload or an `error` string. Validation
//! problems come back as 400, anything unexpected as a generic 500.

pub mod babies;
pub mod feeds;
pub mod notify;

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::routing::{delete, get, patch, post};
use axum::{Json, Router};
use serde::Serialize;
use sqlx::SqlitePool;

use crate::db::{BabyRepository, FeedRepository, FeedTypeRepository};
use notify::SlackNotifier;

/// Application state shared across handlers
#[derive(Clone)]
pub struct AppState {
    pub babies: BabyRepository,
    pub feed_types: FeedTypeRepository,
    pub feeds: FeedRepository,
    pub notifier: SlackNotifier,
}

impl AppState {
    pub fn new(pool: SqlitePool, notifier: SlackNotifier) -> Self {
        Self {
            babies: BabyRepository::new(pool.clone()),
            feed_types: FeedTypeRepository::new(pool.clone()),
            feeds: FeedRepository::new(pool),
            notifier,
        }
    }
}

/// Failure envelope shared by every endpoint
#[derive(Serialize)]
struct ErrorResponse {
    success: bool,
    error: String,
}

pub(crate) fn failure(status: StatusCode, message: &str) -> Response {
    (
        status,
        Json(ErrorResponse {
            success: false,
            error: message.to_string(),
        }),
    )
        .into_response()
}

/// Health check response
#[derive(Serialize)]
struct HealthResponse {
    status: &'static str,
    version: &'static str,
}

/// Health check endpoint
async fn health() -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "ok",
        version: env!("CARGO_PKG_VERSION"),
    })
}

/// Builds the API router. The caller layers tracing and the static
/// fallback on top.
pub fn router(state: AppState) -> Router {
    Router::new()
        .route("/health", get(health))
        .route(
            "/babies",
            get(babies::list_babies).post(babies::create_baby),
        )
        .route("/babies/update", patch(babies::update_baby))
        .route("/feeds/add", post(feeds::add_feed))
        .route("/feeds/delete", delete(feeds::delete_feed))
        .route("/feeds/today", get(feeds::feeds_today))
        .with_state(state)
}
