//! Raw table handlers.

use axum::{
    extract::{Path, State},
    Json,
};
use wildlife_core::{RawTable, Reported, Table};

use crate::{ApiError, AppState};

/// Names accepted by `GET /api/v1/tables/:table`.
pub async fn list_tables() -> Json<Vec<&'static str>> {
    Json(RawTable::ALL.iter().map(|t| t.table_name()).collect())
}

/// `SELECT *` of one table.
///
/// # Returns
/// - 200 OK with the rows (empty plus an error notice when the read failed)
/// - 404 Not Found for a table that is not browsable
pub async fn get_table(
    State(state): State<AppState>,
    Path(name): Path<String>,
) -> Result<Json<Reported<Table>>, ApiError> {
    let table = RawTable::parse(&name)
        .ok_or_else(|| ApiError::NotFound(format!("Unknown table '{}'", name)))?;
    Ok(Json(state.tables.table(table).await))
}
