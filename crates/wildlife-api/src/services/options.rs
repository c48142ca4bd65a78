//! Option lists behind every selection input, and which forms can be
//! submitted with them.

use serde::Serialize;
use wildlife_core::defaults::ASSIGNMENT_STATUS;
use wildlife_core::{ObservationType, RefOption, Reported};
use wildlife_db::Database;

/// Whether each form has the reference data it needs.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct SubmitFlags {
    pub species: bool,
    pub preserve: bool,
    pub observation: bool,
    pub plan: bool,
    pub assignment: bool,
    pub environmental: bool,
}

impl SubmitFlags {
    pub fn from_lists(species: &[RefOption], preserves: &[RefOption], plans: &[RefOption]) -> Self {
        let has_species = !species.is_empty();
        Self {
            species: true,
            preserve: has_species,
            observation: has_species,
            plan: has_species,
            assignment: has_species && !plans.is_empty(),
            environmental: !preserves.is_empty(),
        }
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct FormOptions {
    pub species: Vec<RefOption>,
    pub preserves: Vec<RefOption>,
    pub plans: Vec<RefOption>,
    pub observation_types: Vec<&'static str>,
    pub default_assignment_status: &'static str,
    pub submit: SubmitFlags,
}

pub async fn load_form_options(db: &Database) -> Reported<FormOptions> {
    let mut notices = Vec::new();
    let species = db.reference.species().await.drain_into(&mut notices);
    let preserves = db.reference.preserves().await.drain_into(&mut notices);
    let plans = db.reference.plans().await.drain_into(&mut notices);

    let submit = SubmitFlags::from_lists(&species, &preserves, &plans);
    Reported {
        value: FormOptions {
            species,
            preserves,
            plans,
            observation_types: ObservationType::ALL.iter().map(|t| t.as_str()).collect(),
            default_assignment_status: ASSIGNMENT_STATUS,
            submit,
        },
        notices,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;
    use std::time::Duration;
    use wildlife_db::{queries, ConnectionProvider, MemoryStore, PoolConfig, QueryCache};

    fn db(store: Arc<MemoryStore>) -> Database {
        let provider = Arc::new(ConnectionProvider::new("mysql://unused", PoolConfig::default()));
        let cache = QueryCache::new(store.clone(), Duration::from_secs(60), 16);
        Database::with_store(provider, store, cache)
    }

    #[test]
    fn test_empty_species_disables_dependent_forms() {
        let preserves = vec![RefOption::new("P01", "Serengeti Reserve")];
        let flags = SubmitFlags::from_lists(&[], &preserves, &[]);
        assert!(flags.species);
        assert!(!flags.observation);
        assert!(!flags.plan);
        assert!(!flags.preserve);
        assert!(!flags.assignment);
        assert!(flags.environmental);
    }

    #[tokio::test]
    async fn test_seeded_options_enable_everything() {
        let result = load_form_options(&db(Arc::new(MemoryStore::seeded()))).await;
        assert!(result.notices.is_empty());
        assert_eq!(result.value.species.len(), 3);
        assert_eq!(result.value.observation_types.len(), 8);
        assert_eq!(
            result.value.submit,
            SubmitFlags {
                species: true,
                preserve: true,
                observation: true,
                plan: true,
                assignment: true,
                environmental: true,
            }
        );
    }

    #[tokio::test]
    async fn test_failed_list_is_empty_with_error() {
        let store = Arc::new(MemoryStore::seeded());
        store.fail_query(queries::PLAN_OPTIONS).await;
        let result = load_form_options(&db(store)).await;
        assert!(result.value.plans.is_empty());
        assert!(!result.value.submit.assignment);
        assert_eq!(result.notices.len(), 1);
        assert!(result.notices[0].message.contains(queries::PLAN_OPTIONS));
    }
}
