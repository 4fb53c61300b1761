//! API Module
//!
//! HTTP API layer for the service.
//! Each submodule handles endpoints for a specific domain.

pub mod error;
pub mod health;
pub mod report;

use axum::{
    Router,
    routing::{get, post},
};
use std::sync::Arc;
use tower_http::trace::TraceLayer;

use crate::repository::JobStore;
use crate::scheduler::JobQueue;

/// Shared state handed to every handler
#[derive(Clone)]
pub struct AppState {
    pub store: Arc<dyn JobStore>,
    pub queue: JobQueue,
}

impl AppState {
    pub fn new(store: Arc<dyn JobStore>, queue: JobQueue) -> Self {
        Self { store, queue }
    }
}

/// Create the main API router with all endpoints
pub fn create_router(state: AppState) -> Router {
    Router::new()
        // Health check
        .route("/health", get(health::health_check))
        // Report endpoints
        .route("/init-population-report/", post(report::init_report))
        .route("/population-report/{id}/", get(report::get_report))
        // Add state and middleware
        .with_state(state)
        .layer(TraceLayer::new_for_http())
}
