//! Decoding of untyped MySQL rows into [`Table`]s.
//!
//! Raw tables and procedure result sets have no fixed shape, so every cell is
//! decoded by its column type into a JSON value.

use chrono::{NaiveDate, NaiveDateTime, NaiveTime};
use serde_json::Value as JsonValue;
use sqlx::mysql::MySqlRow;
use sqlx::types::BigDecimal;
use sqlx::{Column, Row, TypeInfo, ValueRef};
use tracing::trace;

use wildlife_core::Table;

/// Build a table from rows of one result set.
///
/// Column names come from the first row, so an empty result set yields a
/// table with no columns.
pub fn rows_to_table(rows: &[MySqlRow]) -> Table {
    let columns = rows
        .first()
        .map(|row| {
            row.columns()
                .iter()
                .map(|c| c.name().to_string())
                .collect()
        })
        .unwrap_or_default();

    Table::new(columns, rows.iter().map(row_values).collect())
}

fn row_values(row: &MySqlRow) -> Vec<JsonValue> {
    (0..row.columns().len()).map(|i| cell(row, i)).collect()
}

/// Decode one cell by its declared column type.
pub fn cell(row: &MySqlRow, idx: usize) -> JsonValue {
    match row.try_get_raw(idx) {
        Ok(raw) if raw.is_null() => return JsonValue::Null,
        Ok(_) => {}
        Err(_) => return JsonValue::Null,
    }

    let type_name = row.column(idx).type_info().name().to_string();
    let decoded = match type_name.as_str() {
        "BOOLEAN" => row.try_get::<bool, _>(idx).map(JsonValue::from),
        name if name.ends_with("UNSIGNED") => row.try_get::<u64, _>(idx).map(JsonValue::from),
        "TINYINT" | "SMALLINT" | "MEDIUMINT" | "INT" | "BIGINT" => {
            row.try_get::<i64, _>(idx).map(JsonValue::from)
        }
        "FLOAT" => row.try_get::<f32, _>(idx).map(|v| JsonValue::from(v as f64)),
        "DOUBLE" => row.try_get::<f64, _>(idx).map(JsonValue::from),
        "DECIMAL" => row
            .try_get::<BigDecimal, _>(idx)
            .map(|v| JsonValue::String(v.to_string())),
        "DATE" => row
            .try_get::<NaiveDate, _>(idx)
            .map(|v| JsonValue::String(v.to_string())),
        "DATETIME" | "TIMESTAMP" => row
            .try_get::<NaiveDateTime, _>(idx)
            .map(|v| JsonValue::String(v.format("%Y-%m-%d %H:%M:%S").to_string())),
        "TIME" => row
            .try_get::<NaiveTime, _>(idx)
            .map(|v| JsonValue::String(v.to_string())),
        "JSON" => row.try_get::<JsonValue, _>(idx),
        _ => row.try_get::<String, _>(idx).map(JsonValue::String),
    };

    decoded.unwrap_or_else(|e| {
        trace!(column = idx, type_name = %type_name, error = %e, "Falling back to raw bytes");
        row.try_get_unchecked::<Vec<u8>, _>(idx)
            .map(|bytes| JsonValue::String(String::from_utf8_lossy(&bytes).into_owned()))
            .unwrap_or(JsonValue::Null)
    })
}

/// Interpret a scalar cell as an integer; numeric strings are accepted.
pub fn json_i64(value: &JsonValue) -> Option<i64> {
    match value {
        JsonValue::Number(n) => n.as_i64().or_else(|| n.as_f64().map(|f| f as i64)),
        JsonValue::String(s) => s.trim().parse().ok(),
        _ => None,
    }
}

/// Interpret a scalar cell as a date (`YYYY-MM-DD`, time part ignored).
pub fn json_date(value: &JsonValue) -> Option<NaiveDate> {
    let text = value.as_str()?;
    let date_part = text.split_whitespace().next()?;
    NaiveDate::parse_from_str(date_part, "%Y-%m-%d").ok()
}
