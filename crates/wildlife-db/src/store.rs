//! The MySQL-backed store.

use std::sync::Arc;
use std::time::Instant;

use async_trait::async_trait;
use chrono::NaiveDate;
use futures::TryStreamExt;
use serde_json::Value as JsonValue;
use sqlx::mysql::{MySqlConnection, MySqlPool, MySqlQueryResult, MySqlRow};
use sqlx::{Either, Executor};
use tracing::{debug, warn};

use wildlife_core::{Result, ScalarFunctions, Table, TabularSource};

use crate::classify::classify;
use crate::pool::{log_pool_metrics, ConnectionProvider};
use crate::queries;
use crate::rows::{cell, json_date, json_i64, rows_to_table};

/// MySQL implementation of every store trait.
///
/// Holds no connection of its own; each call borrows the provider's shared
/// handle, so the store is cheap to clone and the connection is only opened
/// when first needed.
#[derive(Debug, Clone)]
pub struct MySqlStore {
    provider: Arc<ConnectionProvider>,
}

impl MySqlStore {
    pub fn new(provider: Arc<ConnectionProvider>) -> Self {
        Self { provider }
    }

    pub fn provider(&self) -> &Arc<ConnectionProvider> {
        &self.provider
    }

    pub(crate) async fn pool(&self) -> Result<MySqlPool> {
        let pool = self.provider.get_connection().await?;
        log_pool_metrics(&pool);
        Ok(pool)
    }

    /// Run a scalar function call and return its single cell.
    async fn scalar(&self, sql: &'static str, routine: &str, arg: &str) -> Result<JsonValue> {
        let start = Instant::now();
        let pool = self.pool().await?;
        let row: MySqlRow = sqlx::query(sql)
            .bind(arg)
            .fetch_one(&pool)
            .await
            .map_err(classify)?;

        let value = cell(&row, 0);
        debug!(
            subsystem = "database",
            component = "reports",
            op = "scalar",
            routine,
            entity_id = arg,
            duration_ms = start.elapsed().as_millis() as u64,
            "Scalar function evaluated"
        );
        Ok(value)
    }
}

/// Split a procedure's output stream into result sets.
///
/// Every result set ends with a `Left`; a `CALL` additionally ends with a
/// status packet that carries no rows, which is dropped.
pub fn split_result_sets<L, R>(items: impl IntoIterator<Item = Either<L, R>>) -> Vec<Vec<R>> {
    let mut sets = Vec::new();
    let mut current = Vec::new();
    for item in items {
        match item {
            Either::Left(_) => sets.push(std::mem::take(&mut current)),
            Either::Right(row) => current.push(row),
        }
    }
    if !current.is_empty() {
        sets.push(current);
    } else if sets.last().map(Vec::is_empty).unwrap_or(false) {
        sets.pop();
    }
    sets
}

/// Execute a `CALL` and collect its result sets as tables.
pub(crate) async fn call_procedure<'q>(
    conn: &mut MySqlConnection,
    query: sqlx::query::Query<'q, sqlx::MySql, sqlx::mysql::MySqlArguments>,
) -> Result<Vec<Table>> {
    let items: Vec<Either<MySqlQueryResult, MySqlRow>> = (&mut *conn)
        .fetch_many(query)
        .try_collect()
        .await
        .map_err(classify)?;

    Ok(split_result_sets(items)
        .iter()
        .map(|rows| rows_to_table(rows))
        .collect())
}

#[async_trait]
impl TabularSource for MySqlStore {
    async fn fetch_table(&self, sql: &str) -> Result<Table> {
        let start = Instant::now();
        let pool = self.pool().await?;
        let rows = sqlx::query(sql)
            .fetch_all(&pool)
            .await
            .map_err(classify)?;
        let table = rows_to_table(&rows);

        debug!(
            subsystem = "database",
            component = "store",
            op = "fetch_table",
            query = sql,
            result_count = table.len(),
            duration_ms = start.elapsed().as_millis() as u64,
            "Query executed"
        );
        Ok(table)
    }

    async fn ping(&self) -> Result<()> {
        let pool = self.pool().await?;
        sqlx::query(queries::PING)
            .execute(&pool)
            .await
            .map_err(classify)?;
        Ok(())
    }
}

#[async_trait]
impl ScalarFunctions for MySqlStore {
    async fn project_duration_days(&self, proj_id: &str) -> Result<Option<i64>> {
        let value = self
            .scalar(queries::FN_PROJECT_DURATION, "fn_GetProjectDurationDays", proj_id)
            .await?;
        Ok(json_i64(&value))
    }

    async fn species_count_in_preserve(&self, p_id: &str) -> Result<Option<i64>> {
        let value = self
            .scalar(queries::FN_SPECIES_COUNT, "fn_GetSpeciesCountInPreserve", p_id)
            .await?;
        Ok(json_i64(&value))
    }

    async fn last_observation_date(&self, sp_id: &str) -> Result<Option<NaiveDate>> {
        let value = self
            .scalar(queries::FN_LAST_OBSERVATION, "fn_GetLastObservationDate", sp_id)
            .await?;
        let date = json_date(&value);
        if date.is_none() && !value.is_null() {
            warn!(
                subsystem = "database",
                component = "reports",
                routine = "fn_GetLastObservationDate",
                entity_id = sp_id,
                value = %value,
                "Unexpected date value"
            );
        }
        Ok(date)
    }
}
