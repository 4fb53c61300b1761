//! Population Report Service
//!
//! Accepts a point and radius, computes a geodesic buffer around it and asks
//! an external statistics service for population figures inside it.
//!
//! Architecture:
//! - API: submission and polling endpoints
//! - Services: validation, submission, and job execution
//! - Repository: in-memory job registry
//! - Scheduler: bounded queue feeding a worker pool

use anyhow::{Context, Result};
use std::sync::Arc;
use tracing::{info, warn};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use crate::api::AppState;
use crate::config::Config;
use crate::repository::{InMemoryJobStore, JobStore};
use crate::scheduler::{WorkerPool, queue};
use crate::service::{ExecutionService, StandardExecutionService};
use popreport_client::{StatisticsClient, StatisticsService};

pub mod api;
pub mod config;
pub mod repository;
pub mod scheduler;
pub mod service;

#[tokio::main]
async fn main() -> Result<()> {
    // Initialize tracing
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "popreport_server=debug,tower_http=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    info!("Starting Population Report Service...");

    let config = load_config()?;
    info!(
        "Loaded configuration: statistics_api_url={}, max_parallel_jobs={}, queue_capacity={}",
        config.statistics_api_url, config.max_parallel_jobs, config.queue_capacity
    );

    let statistics: Arc<dyn StatisticsService> = Arc::new(
        StatisticsClient::with_timeout(
            config.statistics_api_url.clone(),
            config.statistics_timeout,
        )
        .context("Failed to create statistics client")?,
    );

    let store: Arc<dyn JobStore> = Arc::new(InMemoryJobStore::new());
    let (job_queue, receiver) = queue::channel(config.queue_capacity);

    let executor: Arc<dyn ExecutionService> = Arc::new(StandardExecutionService::new(statistics));
    let pool = WorkerPool::new(Arc::clone(&store), executor, config.max_parallel_jobs);
    tokio::spawn(pool.run(receiver));

    // Build router with all API endpoints
    let app = api::create_router(AppState::new(store, job_queue));

    info!("Listening on {}", config.bind_addr);

    let listener = tokio::net::TcpListener::bind(&config.bind_addr)
        .await
        .with_context(|| format!("Failed to bind to {}", config.bind_addr))?;

    axum::serve(listener, app)
        .await
        .context("Failed to start server")?;

    Ok(())
}

/// Loads configuration from environment with fallback to defaults
fn load_config() -> Result<Config> {
    match Config::from_env() {
        Ok(config) => {
            config.validate()?;
            Ok(config)
        }
        Err(e) => {
            warn!("Failed to load config from environment ({}), using defaults", e);
            let config = Config::default();
            config.validate()?;
            Ok(config)
        }
    }
}
