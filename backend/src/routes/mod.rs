//! Route definitions for the MRP Requirements Consolidation Platform

use axum::{
    routing::{get, patch, post, put},
    Router,
};

use crate::{handlers, AppState};

/// Create API routes
pub fn api_routes() -> Router<AppState> {
    Router::new()
        // Health check
        .route("/health", get(handlers::health_check))
        // Requirement plan
        .nest("/plan", plan_routes())
        // Saved snapshots
        .nest("/snapshots", snapshot_routes())
}

/// Requirement plan routes
fn plan_routes() -> Router<AppState> {
    Router::new()
        .route("/", get(handlers::get_plan).delete(handlers::clear_plan))
        .route("/orders", get(handlers::list_orders))
        .route("/ingest", post(handlers::ingest_order))
        .route("/export", get(handlers::export_plan))
        .route("/rows/:row_id", patch(handlers::edit_row))
        .route("/rows/:row_id/rename", post(handlers::rename_row))
}

/// Snapshot save/restore routes
fn snapshot_routes() -> Router<AppState> {
    Router::new()
        .route(
            "/",
            get(handlers::list_snapshots).post(handlers::save_snapshot),
        )
        .route("/:snapshot_id", put(handlers::update_snapshot))
        .route("/:snapshot_id/restore", post(handlers::restore_snapshot))
}
