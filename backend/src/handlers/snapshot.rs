//! HTTP handlers for saving and restoring plan snapshots

use axum::{
    extract::{Path, State},
    Json,
};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use shared::{PlanSnapshot, SnapshotSummary, StatusMessage};

use crate::error::AppResult;
use crate::services::SnapshotService;
use crate::AppState;

/// List stored snapshots, newest first
pub async fn list_snapshots(
    State(state): State<AppState>,
) -> AppResult<Json<Vec<SnapshotSummary>>> {
    let service = SnapshotService::new(state.db);
    let snapshots = service.list().await?;
    Ok(Json(snapshots))
}

#[derive(Debug, Deserialize)]
pub struct SaveSnapshotRequest {
    pub name: String,
}

/// Save the working plan under a name
pub async fn save_snapshot(
    State(state): State<AppState>,
    Json(input): Json<SaveSnapshotRequest>,
) -> AppResult<Json<PlanSnapshot>> {
    let current = state.plan.current().await;
    let service = SnapshotService::new(state.db);
    let snapshot = service.add(&input.name, &current).await?;
    Ok(Json(snapshot))
}

/// Overwrite a stored snapshot with the working plan
pub async fn update_snapshot(
    State(state): State<AppState>,
    Path(snapshot_id): Path<Uuid>,
) -> AppResult<Json<PlanSnapshot>> {
    let current = state.plan.current().await;
    let service = SnapshotService::new(state.db);
    let snapshot = service.update(snapshot_id, &current).await?;
    Ok(Json(snapshot))
}

#[derive(Debug, Serialize)]
pub struct RestoreResponse {
    pub message: StatusMessage,
    pub rows: usize,
}

/// Replace the working plan with a stored snapshot
pub async fn restore_snapshot(
    State(state): State<AppState>,
    Path(snapshot_id): Path<Uuid>,
) -> AppResult<Json<RestoreResponse>> {
    let service = SnapshotService::new(state.db.clone());
    let snapshot = service.get(snapshot_id).await?;
    let rows = snapshot.rows.len();
    let name = snapshot.name.clone();
    state.plan.replace(snapshot.state()).await;
    Ok(Json(RestoreResponse {
        message: StatusMessage::info(format!("Plan \"{}\" restaurado", name)),
        rows,
    }))
}
