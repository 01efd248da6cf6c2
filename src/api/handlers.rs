use std::sync::Arc;

use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    response::Html,
    Json,
};
use serde::Deserialize;
use serde_json::{json, Value};

use crate::models::{Indicator, ModelInfo, Sector};
use crate::store::{Catalog, ModelStore};
use crate::webapp::{self, SectorTable};

/// Log an internal error and return a sanitized response to the client.
/// The full error is logged server-side for debugging, but clients only
/// see a generic message to avoid leaking internal details.
fn internal_error(e: impl std::fmt::Display) -> (StatusCode, String) {
    tracing::error!("Internal error: {}", e);
    (
        StatusCode::INTERNAL_SERVER_ERROR,
        "Internal server error".to_string(),
    )
}

fn model_or_404<'a>(
    catalog: &'a Catalog,
    id: &str,
) -> Result<&'a ModelStore, (StatusCode, String)> {
    catalog
        .get(id)
        .ok_or((StatusCode::NOT_FOUND, format!("Model not found: {id}")))
}

// ============================================================
// Models
// ============================================================

pub async fn list_models(State(catalog): State<Arc<Catalog>>) -> Json<Vec<ModelInfo>> {
    Json(catalog.models())
}

// ============================================================
// Sectors and indicators
// ============================================================

pub async fn list_sectors(
    State(catalog): State<Arc<Catalog>>,
    Path(model): Path<String>,
) -> Result<Json<Vec<Sector>>, (StatusCode, String)> {
    let store = model_or_404(&catalog, &model)?;
    Ok(Json(store.sectors().to_vec()))
}

pub async fn list_indicators(
    State(catalog): State<Arc<Catalog>>,
    Path(model): Path<String>,
) -> Result<Json<Vec<Indicator>>, (StatusCode, String)> {
    let store = model_or_404(&catalog, &model)?;
    Ok(Json(store.indicators().to_vec()))
}

/// Sectors of the default model, sorted by name. This is the endpoint the
/// demand table is filled from.
pub async fn default_sectors(
    State(catalog): State<Arc<Catalog>>,
) -> Result<Json<Vec<Sector>>, (StatusCode, String)> {
    let store = catalog
        .default_model()
        .ok_or((StatusCode::NOT_FOUND, "No models loaded".to_string()))?;
    Ok(Json(store.sectors_by_name()))
}

// ============================================================
// Matrices
// ============================================================

/// Query parameters selecting a single column or row of a matrix.
#[derive(Debug, Deserialize)]
pub struct MatrixQuery {
    pub col: Option<String>,
    pub row: Option<String>,
}

/// Parse an index parameter. An absent or empty value means "not provided";
/// anything that is not an index below `size` is a 400.
fn index_param(
    value: Option<&str>,
    size: usize,
) -> Result<Option<usize>, (StatusCode, String)> {
    let Some(raw) = value else {
        return Ok(None);
    };
    if raw.is_empty() {
        return Ok(None);
    }
    let idx: usize = raw
        .parse()
        .map_err(|_| (StatusCode::BAD_REQUEST, format!("Invalid index: {raw}")))?;
    if idx >= size {
        return Err((
            StatusCode::BAD_REQUEST,
            format!("Index out of range: {idx}"),
        ));
    }
    Ok(Some(idx))
}

/// Serve a matrix, either whole (array of row arrays) or sliced to one
/// column or row. Numeric matrices (`A`..`U`) have float cells, data quality
/// matrices (`B_dqi`, `D_dqi`, `U_dqi`) have entry-string cells.
pub async fn get_matrix(
    State(catalog): State<Arc<Catalog>>,
    Path((model, name)): Path<(String, String)>,
    Query(query): Query<MatrixQuery>,
) -> Result<Json<Value>, (StatusCode, String)> {
    let store = model_or_404(&catalog, &model)?;

    if let Some(matrix) = store.matrix(&name).map_err(internal_error)? {
        if let Some(col) = index_param(query.col.as_deref(), matrix.cols())? {
            return Ok(Json(json!(matrix.col(col))));
        }
        if let Some(row) = index_param(query.row.as_deref(), matrix.rows())? {
            return Ok(Json(json!(matrix.row(row))));
        }
        return Ok(Json(json!(matrix.to_rows())));
    }

    if let Some(matrix) = store.dqi_matrix(&name).map_err(internal_error)? {
        if matrix.is_empty() {
            return Err((StatusCode::NOT_FOUND, format!("Matrix is empty: {name}")));
        }
        if let Some(col) = index_param(query.col.as_deref(), matrix.cols())? {
            return Ok(Json(json!(matrix.col(col))));
        }
        if let Some(row) = index_param(query.row.as_deref(), matrix.rows())? {
            return Ok(Json(json!(matrix.row(row))));
        }
        return Ok(Json(json!(matrix.to_rows())));
    }

    Err((StatusCode::NOT_FOUND, format!("Matrix not found: {name}")))
}

// ============================================================
// Demand page
// ============================================================

/// Serve the demand page with the table filled from the default model.
/// An empty catalog renders the page with an empty table.
pub async fn demand_page(State(catalog): State<Arc<Catalog>>) -> Html<String> {
    let mut table = SectorTable::new();
    if let Some(store) = catalog.default_model() {
        table.append(&store.sectors_by_name());
    }
    Html(webapp::render_page(&table))
}
