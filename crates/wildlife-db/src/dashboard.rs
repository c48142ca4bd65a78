//! `sp_GetPreserveDashboard` access.

use std::time::Instant;

use async_trait::async_trait;
use tracing::debug;

use wildlife_core::{DashboardRepository, Result, Table};

use crate::classify::classify;
use crate::queries;
use crate::store::{call_procedure, MySqlStore};

#[async_trait]
impl DashboardRepository for MySqlStore {
    async fn dashboard_result_sets(&self, preserve_id: &str) -> Result<Vec<Table>> {
        let start = Instant::now();
        let pool = self.pool().await?;
        let mut conn = pool.acquire().await.map_err(classify)?;

        let query = sqlx::query(queries::CALL_PRESERVE_DASHBOARD).bind(preserve_id);
        let sets = call_procedure(&mut conn, query).await?;

        debug!(
            subsystem = "database",
            component = "dashboard",
            op = "call",
            routine = "sp_GetPreserveDashboard",
            preserve_id,
            result_sets = sets.len(),
            duration_ms = start.elapsed().as_millis() as u64,
            "Dashboard procedure returned"
        );
        Ok(sets)
    }
}
