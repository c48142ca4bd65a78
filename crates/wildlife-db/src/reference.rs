//! Reference data loader: the option lists behind every selection input.

use std::sync::Arc;

use tracing::warn;

use wildlife_core::{RefOption, Reported, Table};

use crate::query_cache::QueryCache;
use crate::queries;

/// Turn a two-column lookup table into options, skipping rows without an id.
pub fn options_from_table(table: &Table, id_column: &str, name_column: &str) -> Vec<RefOption> {
    (0..table.len())
        .filter_map(|row| {
            let id = table.text(row, id_column)?;
            let name = table.text(row, name_column).unwrap_or_default();
            Some(RefOption::new(id, name))
        })
        .collect()
}

/// Loads species, preserve and plan options through the query cache.
#[derive(Clone)]
pub struct ReferenceLoader {
    cache: Arc<QueryCache>,
}

impl ReferenceLoader {
    pub fn new(cache: Arc<QueryCache>) -> Self {
        Self { cache }
    }

    async fn load(&self, sql: &str, id_column: &str, name_column: &str) -> Reported<Vec<RefOption>> {
        let reported = self.cache.run_query(sql).await;
        reported.map(|table| {
            let options = options_from_table(&table, id_column, name_column);
            if options.len() < table.len() {
                warn!(
                    subsystem = "database",
                    component = "reference",
                    query = sql,
                    result_count = table.len(),
                    "Skipped rows without an identifier"
                );
            }
            options
        })
    }

    /// `{SP_ID, SP_NAME}` pairs.
    pub async fn species(&self) -> Reported<Vec<RefOption>> {
        self.load(queries::SPECIES_OPTIONS, "SP_ID", "SP_NAME").await
    }

    /// `{P_ID, PNAME}` pairs.
    pub async fn preserves(&self) -> Reported<Vec<RefOption>> {
        self.load(queries::PRESERVE_OPTIONS, "P_ID", "PNAME").await
    }

    /// `{PROJ_ID, PROJ_NAME}` pairs.
    pub async fn plans(&self) -> Reported<Vec<RefOption>> {
        self.load(queries::PLAN_OPTIONS, "PROJ_ID", "PROJ_NAME").await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_options_from_table() {
        let table = Table::new(
            vec!["P_ID".to_string(), "PNAME".to_string()],
            vec![
                vec![json!("P01"), json!("Serengeti Reserve")],
                vec![json!(null), json!("Orphan")],
                vec![json!("P02"), json!(null)],
            ],
        );
        let options = options_from_table(&table, "P_ID", "PNAME");
        assert_eq!(
            options,
            vec![
                RefOption::new("P01", "Serengeti Reserve"),
                RefOption::new("P02", ""),
            ]
        );
        assert_eq!(options[0].label(), "P01 - Serengeti Reserve");
    }

    #[test]
    fn test_options_from_empty_table() {
        assert!(options_from_table(&Table::empty(), "SP_ID", "SP_NAME").is_empty());
    }
}
