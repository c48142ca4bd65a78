//! Report aggregator: one scalar function call per reference row.

use std::future::Future;
use std::time::Instant;

use chrono::NaiveDate;
use tracing::{debug, error};
use wildlife_core::{
    Notice, PreserveSpeciesCount, ProjectDuration, RefOption, Reported, Result,
    SpeciesLastObservation, Table,
};
use wildlife_db::{queries, Database};

pub const MSG_NO_PLANS: &str = "No conservation plans to report on.";
pub const MSG_NO_PRESERVES: &str = "No preserves to report on.";
pub const MSG_NO_SPECIES: &str = "No species to report on.";
pub const MSG_NO_ALERTS: &str = "No alerts have been triggered yet.";

#[derive(Clone)]
pub struct ReportAggregator {
    db: Database,
}

impl ReportAggregator {
    pub fn new(db: Database) -> Self {
        Self { db }
    }

    /// Every plan with `fn_GetProjectDurationDays`, in plan order.
    pub async fn project_durations(&self) -> Reported<Vec<ProjectDuration>> {
        let store = self.db.store.clone();
        self.aggregate(
            "project_durations",
            self.db.reference.plans().await,
            MSG_NO_PLANS,
            |id| {
                let store = store.clone();
                async move { store.project_duration_days(&id).await }
            },
            |plan, duration_days| ProjectDuration {
                proj_id: plan.id,
                proj_name: plan.name,
                duration_days,
            },
        )
        .await
    }

    /// Every preserve with `fn_GetSpeciesCountInPreserve`.
    pub async fn species_counts(&self) -> Reported<Vec<PreserveSpeciesCount>> {
        let store = self.db.store.clone();
        self.aggregate(
            "species_counts",
            self.db.reference.preserves().await,
            MSG_NO_PRESERVES,
            |id| {
                let store = store.clone();
                async move { store.species_count_in_preserve(&id).await }
            },
            |preserve, species_count| PreserveSpeciesCount {
                p_id: preserve.id,
                pname: preserve.name,
                species_count,
            },
        )
        .await
    }

    /// Every species with `fn_GetLastObservationDate`.
    pub async fn last_observations(&self) -> Reported<Vec<SpeciesLastObservation>> {
        let store = self.db.store.clone();
        self.aggregate(
            "last_observations",
            self.db.reference.species().await,
            MSG_NO_SPECIES,
            |id| {
                let store = store.clone();
                async move { store.last_observation_date(&id).await }
            },
            |species, last_observation: Option<NaiveDate>| SpeciesLastObservation {
                sp_id: species.id,
                sp_name: species.name,
                last_observation,
            },
        )
        .await
    }

    /// The alert log, newest first.
    pub async fn alerts(&self) -> Reported<Table> {
        let mut alerts = self.db.cache.run_query(queries::ALERTS).await.map(|t| (*t).clone());
        if alerts.value.is_empty() && !alerts.has_errors() {
            alerts.push(Notice::info(MSG_NO_ALERTS));
        }
        alerts
    }

    /// Call `scalar` once per option, in order. The first failure discards
    /// everything computed so far.
    async fn aggregate<V, R, F, Fut>(
        &self,
        report: &'static str,
        options: Reported<Vec<RefOption>>,
        empty_message: &str,
        scalar: F,
        build: impl Fn(RefOption, Option<V>) -> R,
    ) -> Reported<Vec<R>>
    where
        F: Fn(String) -> Fut,
        Fut: Future<Output = Result<Option<V>>>,
    {
        let start = Instant::now();
        let Reported {
            value: options,
            mut notices,
        } = options;

        if options.is_empty() {
            if notices.is_empty() {
                notices.push(Notice::info(empty_message));
            }
            return Reported {
                value: Vec::new(),
                notices,
            };
        }

        let mut rows = Vec::with_capacity(options.len());
        for option in options {
            match scalar(option.id.clone()).await {
                Ok(value) => rows.push(build(option, value)),
                Err(e) => {
                    error!(
                        subsystem = "api",
                        component = "reports",
                        report,
                        entity_id = %option.id,
                        error = %e,
                        "Report aborted"
                    );
                    notices.push(Notice::error(format!("An error occurred: {}", e)));
                    return Reported {
                        value: Vec::new(),
                        notices,
                    };
                }
            }
        }

        debug!(
            subsystem = "api",
            component = "reports",
            report,
            result_count = rows.len(),
            duration_ms = start.elapsed().as_millis() as u64,
            "Report built"
        );
        Reported {
            value: rows,
            notices,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;
    use std::time::Duration;
    use wildlife_core::NoticeLevel;
    use wildlife_db::{ConnectionProvider, MemoryStore, PoolConfig, QueryCache};

    fn reports(store: Arc<MemoryStore>) -> ReportAggregator {
        let provider = Arc::new(ConnectionProvider::new("mysql://unused", PoolConfig::default()));
        let cache = QueryCache::new(store.clone(), Duration::from_secs(60), 16);
        ReportAggregator::new(Database::with_store(provider, store, cache))
    }

    #[tokio::test]
    async fn test_project_durations_follow_plan_order() {
        let result = reports(Arc::new(MemoryStore::seeded()))
            .project_durations()
            .await;
        assert!(result.notices.is_empty());
        let ids: Vec<_> = result.value.iter().map(|r| r.proj_id.as_str()).collect();
        assert_eq!(ids, vec!["CP01", "CP02"]);
        assert_eq!(result.value[0].duration_days, Some(365));
        assert_eq!(result.value[1].duration_days, Some(365));
    }

    #[tokio::test]
    async fn test_species_counts_include_empty_preserve() {
        let result = reports(Arc::new(MemoryStore::seeded())).species_counts().await;
        let counts: Vec<_> = result
            .value
            .iter()
            .map(|r| (r.p_id.as_str(), r.species_count))
            .collect();
        assert_eq!(
            counts,
            vec![("P01", Some(2)), ("P02", Some(1)), ("P03", Some(0))]
        );
    }

    #[tokio::test]
    async fn test_last_observations() {
        let result = reports(Arc::new(MemoryStore::seeded()))
            .last_observations()
            .await;
        let lion = &result.value[0];
        assert_eq!(lion.sp_name, "Lion");
        assert_eq!(lion.last_observation, NaiveDate::from_ymd_opt(2024, 6, 11));
    }

    #[tokio::test]
    async fn test_scalar_failure_aborts_whole_report() {
        let store = Arc::new(MemoryStore::seeded());
        store.fail_scalar_for("CP02").await;
        let result = reports(store).project_durations().await;
        assert!(result.value.is_empty());
        assert_eq!(result.notices.len(), 1);
        assert_eq!(result.notices[0].level, NoticeLevel::Error);
        assert!(result.notices[0].message.starts_with("An error occurred: "));
    }

    #[tokio::test]
    async fn test_empty_reference_list_is_info() {
        let result = reports(Arc::new(MemoryStore::new())).project_durations().await;
        assert!(result.value.is_empty());
        assert_eq!(result.notices, vec![Notice::info(MSG_NO_PLANS)]);
    }

    #[tokio::test]
    async fn test_read_failure_is_not_reported_as_empty() {
        let store = Arc::new(MemoryStore::seeded());
        store.fail_query(queries::SPECIES_OPTIONS).await;
        let result = reports(store).last_observations().await;
        assert!(result.value.is_empty());
        assert_eq!(result.notices.len(), 1);
        assert_eq!(result.notices[0].level, NoticeLevel::Error);
    }

    #[tokio::test]
    async fn test_no_alerts_is_info() {
        let result = reports(Arc::new(MemoryStore::seeded())).alerts().await;
        assert!(result.value.is_empty());
        assert_eq!(result.notices, vec![Notice::info(MSG_NO_ALERTS)]);
    }
}
