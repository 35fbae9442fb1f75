//! HTTP handlers for the requirement plan endpoints

use axum::{
    extract::{Path, Query, State},
    http::header,
    response::IntoResponse,
    Json,
};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use shared::{
    CategoryGroup, FieldEdit, IngestReport, OrderFilter, PurchaseRefFilter, RenameError,
    StatusMessage, ViewFilter,
};

use crate::error::{AppError, AppResult};
use crate::services::export;
use crate::AppState;

/// Query parameters for the coverage view; "TODAS" or absence means no filter
#[derive(Debug, Deserialize)]
pub struct PlanViewQuery {
    pub op: Option<String>,
    pub oc: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct PlanViewResponse {
    pub groups: Vec<CategoryGroup>,
    pub orders: Vec<String>,
}

/// Get the grouped coverage view under the active filters
pub async fn get_plan(
    State(state): State<AppState>,
    Query(query): Query<PlanViewQuery>,
) -> AppResult<Json<PlanViewResponse>> {
    let filter = ViewFilter {
        order: OrderFilter::parse(query.op.as_deref()),
        purchase_ref: PurchaseRefFilter::parse(query.oc.as_deref()),
    };
    let groups = state.plan.view_grouped(&filter).await;
    let orders = state.plan.order_ids().await;
    Ok(Json(PlanViewResponse { groups, orders }))
}

/// List the distinct source-order ids loaded into the plan
pub async fn list_orders(State(state): State<AppState>) -> AppResult<Json<Vec<String>>> {
    Ok(Json(state.plan.order_ids().await))
}

#[derive(Debug, Deserialize)]
pub struct IngestRequest {
    pub image: String,
}

#[derive(Debug, Serialize)]
pub struct IngestResponse {
    pub message: StatusMessage,
    pub report: IngestReport,
}

/// Run a scanned order image through extraction and merge it into the plan
pub async fn ingest_order(
    State(state): State<AppState>,
    Json(input): Json<IngestRequest>,
) -> AppResult<Json<IngestResponse>> {
    if input.image.trim().is_empty() {
        return Err(AppError::Validation {
            field: "image".to_string(),
            message: "An order image is required".to_string(),
            message_es: "Se requiere una imagen de la orden".to_string(),
        });
    }

    // Extraction runs outside the plan lock; only the merge itself holds it
    let order = state.extraction.extract_order(&input.image).await?;
    let policy = state.config.plan.stock_merge_policy;
    let report = state.plan.ingest(&order, input.image, policy).await;

    let message = if report.merged_items == 0 && !report.rejected.is_empty() {
        StatusMessage::error(format!(
            "OP {}: ningún insumo legible en la imagen",
            report.order_id
        ))
    } else {
        StatusMessage::info(format!(
            "OP {} agregada ({} insumos)",
            report.order_id, report.merged_items
        ))
    };

    Ok(Json(IngestResponse { message, report }))
}

/// Apply one manual field edit to a requirement row
pub async fn edit_row(
    State(state): State<AppState>,
    Path(row_id): Path<Uuid>,
    Json(edit): Json<FieldEdit>,
) -> AppResult<Json<()>> {
    if !state.plan.set_field(row_id, edit).await {
        return Err(AppError::NotFound("Requirement row".to_string()));
    }
    Ok(Json(()))
}

#[derive(Debug, Deserialize)]
pub struct RenameRequest {
    pub new_name: String,
}

/// Rename a requirement row, keeping its stable id
pub async fn rename_row(
    State(state): State<AppState>,
    Path(row_id): Path<Uuid>,
    Json(input): Json<RenameRequest>,
) -> AppResult<Json<()>> {
    match state.plan.rename(row_id, &input.new_name).await {
        Ok(()) => Ok(Json(())),
        Err(RenameError::NotFound) => Err(AppError::NotFound("Requirement row".to_string())),
        Err(RenameError::EmptyName) => Err(AppError::Validation {
            field: "new_name".to_string(),
            message: "Material name cannot be empty".to_string(),
            message_es: "El nombre del insumo no puede estar vacío".to_string(),
        }),
        Err(RenameError::Collision(name)) => Err(AppError::Conflict {
            resource: "requirement_row".to_string(),
            message: format!("A row named {} already exists", name),
            message_es: format!("Ya existe un insumo llamado {}", name),
        }),
    }
}

/// Drop every row and image from the working plan
pub async fn clear_plan(State(state): State<AppState>) -> AppResult<Json<()>> {
    state.plan.clear().await;
    Ok(Json(()))
}

/// Download the full plan as CSV
pub async fn export_plan(State(state): State<AppState>) -> AppResult<impl IntoResponse> {
    let current = state.plan.current().await;
    let csv = export::export_csv(&current.ledger)?;
    Ok((
        [
            (header::CONTENT_TYPE, "text/csv; charset=utf-8"),
            (
                header::CONTENT_DISPOSITION,
                "attachment; filename=\"plan_compras.csv\"",
            ),
        ],
        csv,
    ))
}
