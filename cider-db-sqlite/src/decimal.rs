//! Decimal columns are stored as REAL. SQLite may hand them back as INTEGER
//! when the value has no fraction, so reads accept both.

use cider_core::RepositoryError;
use rust_decimal::Decimal;
use rust_decimal::prelude::ToPrimitive;
use sqlx::sqlite::SqliteRow;
use sqlx::{Row, TypeInfo, ValueRef};

/// Reads a decimal column. NULL reads as zero.
pub fn get_decimal(
    row: &SqliteRow,
    column: &str,
) -> Result<Decimal, RepositoryError> {
    let value_ref = row
        .try_get_raw(column)
        .map_err(|e| RepositoryError::Database(format!("Column '{}' not found: {}", column, e)))?;

    let type_name = value_ref.type_info().name().to_string();
    match type_name.as_str() {
        "NULL" => Ok(Decimal::ZERO),
        "INTEGER" => row
            .try_get::<i64, _>(column)
            .map(Decimal::from)
            .map_err(|e| column_error(column, &type_name, e)),
        "REAL" => {
            let value: f64 = row
                .try_get(column)
                .map_err(|e| column_error(column, &type_name, e))?;
            Decimal::try_from(value).map_err(|e| {
                RepositoryError::Database(format!(
                    "Column '{}' holds {} which is not a decimal: {}",
                    column, value, e
                ))
            })
        }
        other => Err(RepositoryError::Database(format!(
            "Unexpected type '{}' for column '{}'",
            other, column
        ))),
    }
}

/// Reads a nullable decimal column, mapping NULL to `None`.
pub fn get_optional_decimal(
    row: &SqliteRow,
    column: &str,
) -> Result<Option<Decimal>, RepositoryError> {
    let value_ref = row
        .try_get_raw(column)
        .map_err(|e| RepositoryError::Database(format!("Column '{}' not found: {}", column, e)))?;

    if value_ref.is_null() {
        return Ok(None);
    }
    get_decimal(row, column).map(Some)
}

/// Converts for binding into a REAL column.
pub fn decimal_to_f64(d: Decimal) -> f64 {
    d.to_f64().unwrap_or(0.0)
}

fn column_error(
    column: &str,
    type_name: &str,
    err: sqlx::Error,
) -> RepositoryError {
    RepositoryError::Database(format!(
        "Failed to get {} from '{}': {}",
        type_name, column, err
    ))
}
