//! Snapshot persistence for saved plans

use chrono::{DateTime, Utc};
use sqlx::{FromRow, PgPool};
use uuid::Uuid;

use shared::{PlanSnapshot, PlanState, SnapshotSummary};

use crate::error::{AppError, AppResult};

/// Snapshot service backed by Postgres
#[derive(Clone)]
pub struct SnapshotService {
    db: PgPool,
}

/// Database row for a stored snapshot; ledger and images ride as JSONB
#[derive(Debug, FromRow)]
struct SnapshotRow {
    id: Uuid,
    name: String,
    rows: serde_json::Value,
    images: serde_json::Value,
    created_at: DateTime<Utc>,
}

impl SnapshotRow {
    fn into_snapshot(self) -> AppResult<PlanSnapshot> {
        let rows = serde_json::from_value(self.rows)
            .map_err(|e| AppError::Internal(format!("Corrupt snapshot rows: {}", e)))?;
        let images = serde_json::from_value(self.images)
            .map_err(|e| AppError::Internal(format!("Corrupt snapshot images: {}", e)))?;
        Ok(PlanSnapshot {
            id: self.id,
            name: self.name,
            rows,
            images,
            created_at: self.created_at,
        })
    }
}

#[derive(Debug, FromRow)]
struct SummaryRow {
    id: Uuid,
    name: String,
    created_at: DateTime<Utc>,
}

impl SnapshotService {
    pub fn new(db: PgPool) -> Self {
        Self { db }
    }

    /// Store the current plan under a name
    pub async fn add(&self, name: &str, state: &PlanState) -> AppResult<PlanSnapshot> {
        let name = name.trim();
        if name.is_empty() {
            return Err(AppError::Validation {
                field: "name".to_string(),
                message: "Snapshot name cannot be empty".to_string(),
                message_es: "El nombre del plan no puede estar vacío".to_string(),
            });
        }

        let rows = serde_json::to_value(&state.ledger)
            .map_err(|e| AppError::Internal(format!("Failed to encode rows: {}", e)))?;
        let images = serde_json::to_value(&state.images)
            .map_err(|e| AppError::Internal(format!("Failed to encode images: {}", e)))?;

        let row = sqlx::query_as::<_, SnapshotRow>(
            r#"
            INSERT INTO plan_snapshots (id, name, rows, images, created_at)
            VALUES ($1, $2, $3, $4, NOW())
            RETURNING id, name, rows, images, created_at
            "#,
        )
        .bind(Uuid::new_v4())
        .bind(name)
        .bind(rows)
        .bind(images)
        .fetch_one(&self.db)
        .await?;

        row.into_snapshot()
    }

    /// List stored snapshots, newest first
    pub async fn list(&self) -> AppResult<Vec<SnapshotSummary>> {
        let rows = sqlx::query_as::<_, SummaryRow>(
            r#"
            SELECT id, name, created_at
            FROM plan_snapshots
            ORDER BY created_at DESC
            "#,
        )
        .fetch_all(&self.db)
        .await?;

        Ok(rows
            .into_iter()
            .map(|r| SnapshotSummary {
                id: r.id,
                name: r.name,
                created_at: r.created_at,
            })
            .collect())
    }

    /// Overwrite a stored snapshot with the current plan
    pub async fn update(&self, id: Uuid, state: &PlanState) -> AppResult<PlanSnapshot> {
        let rows = serde_json::to_value(&state.ledger)
            .map_err(|e| AppError::Internal(format!("Failed to encode rows: {}", e)))?;
        let images = serde_json::to_value(&state.images)
            .map_err(|e| AppError::Internal(format!("Failed to encode images: {}", e)))?;

        let row = sqlx::query_as::<_, SnapshotRow>(
            r#"
            UPDATE plan_snapshots
            SET rows = $2, images = $3
            WHERE id = $1
            RETURNING id, name, rows, images, created_at
            "#,
        )
        .bind(id)
        .bind(rows)
        .bind(images)
        .fetch_optional(&self.db)
        .await?
        .ok_or_else(|| AppError::NotFound("Snapshot".to_string()))?;

        row.into_snapshot()
    }

    /// Fetch one stored snapshot in full, for restore
    pub async fn get(&self, id: Uuid) -> AppResult<PlanSnapshot> {
        let row = sqlx::query_as::<_, SnapshotRow>(
            r#"
            SELECT id, name, rows, images, created_at
            FROM plan_snapshots
            WHERE id = $1
            "#,
        )
        .bind(id)
        .fetch_optional(&self.db)
        .await?
        .ok_or_else(|| AppError::NotFound("Snapshot".to_string()))?;

        row.into_snapshot()
    }
}
