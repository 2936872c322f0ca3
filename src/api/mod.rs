//! REST API for simulation results.
//!
//! Provides three GET endpoints:
//! - `/summary`: parameters, derived quantities and summary report
//! - `/days`: per-day results with optional date range filtering
//! - `/sweep`: autonomy sweep table

mod handlers;
mod types;

use std::net::SocketAddr;
use std::sync::Arc;

use axum::Router;
use axum::routing::get;

use crate::sim::kpi::SummaryReport;
use crate::sim::sweep::SweepTable;
use crate::sim::types::{SimulationParameters, SimulationResult};

/// Immutable application state shared across all request handlers.
///
/// Constructed once after the simulation run completes and wrapped in
/// `Arc`; no locks needed since all data is read-only.
#[derive(Debug)]
pub struct AppState {
    /// Parameter set used for this run.
    pub parameters: SimulationParameters,
    /// Summary of the single-scenario run.
    pub summary: SummaryReport,
    /// Single-scenario result.
    pub result: SimulationResult,
    /// Sweep table, absent when the sweep was skipped.
    pub sweep: Option<SweepTable>,
}

/// Builds the axum router with all API routes.
pub fn router(state: Arc<AppState>) -> Router {
    Router::new()
        .route("/summary", get(handlers::get_summary))
        .route("/days", get(handlers::get_days))
        .route("/sweep", get(handlers::get_sweep))
        .with_state(state)
}

/// Binds to the given address and serves the API.
///
/// # Errors
///
/// Returns an `io::Error` if the listener cannot bind or the server fails.
pub async fn serve(state: Arc<AppState>, addr: SocketAddr) -> std::io::Result<()> {
    let app = router(state);
    let listener = tokio::net::TcpListener::bind(addr).await?;
    tracing::info!(%addr, "API server listening");
    axum::serve(listener, app).await
}
