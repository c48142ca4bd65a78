//! Raw table browsing through the query cache.

use wildlife_core::{RawTable, Reported, Table};
use wildlife_db::{queries, Database};

#[derive(Clone)]
pub struct TableBrowser {
    db: Database,
}

impl TableBrowser {
    pub fn new(db: Database) -> Self {
        Self { db }
    }

    /// `SELECT *` of one table; a failed read is an empty table plus an error notice.
    pub async fn table(&self, table: RawTable) -> Reported<Table> {
        self.db
            .cache
            .run_query(&queries::select_all(table))
            .await
            .map(|t| (*t).clone())
    }
}
