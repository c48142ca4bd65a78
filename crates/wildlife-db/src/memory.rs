//! In-memory stand-in for `wild_db`.
//!
//! Emulates the tables, procedures, functions and triggers the workbench
//! relies on, closely enough to exercise every workflow without a MySQL
//! server: duplicate keys are rejected, the plan date trigger refuses
//! end-before-start, the environmental trigger appends to `Alerts`, and
//! `sp_GetPreserveDashboard` answers with four result sets.
//!
//! Every command runs against a copy of the state that replaces the original
//! only when the whole command succeeded, so a failure leaves nothing behind.

use std::collections::{BTreeMap, HashSet};
use std::str::FromStr;
use std::sync::atomic::{AtomicUsize, Ordering};

use async_trait::async_trait;
use chrono::{NaiveDate, Utc};
use serde_json::{json, Value as JsonValue};
use sqlx::types::BigDecimal;
use tokio::sync::Mutex;
use tracing::debug;

use wildlife_core::{
    Alert, Command, CommandDispatcher, ConservationPlan, DashboardRepository, DispatchOutcome,
    EnvironmentalReading, Error, Observation, ObservationCommand, ObservationType,
    PlanAssignment, Preserve, RawTable, Result, ScalarFunctions, Species, Table, TabularSource,
};

use crate::queries;

/// Message raised by the plan date trigger.
pub const END_DATE_TRIGGER_MESSAGE: &str = "END_DATE cannot be earlier than STRDATE.";

fn duplicate(id: &str, key: &str) -> Error {
    Error::DuplicateKey(format!("Duplicate entry '{}' for key '{}'", id, key))
}

fn columns(names: &[&str]) -> Vec<String> {
    names.iter().map(|n| n.to_string()).collect()
}

#[derive(Debug, Clone, Default)]
struct State {
    species: Vec<Species>,
    preserves: Vec<Preserve>,
    observations: Vec<Observation>,
    plans: Vec<ConservationPlan>,
    protected_by: Vec<PlanAssignment>,
    environmental: Vec<EnvironmentalReading>,
    alerts: Vec<Alert>,
}

impl State {
    fn insert_species(&mut self, s: &Species) -> Result<()> {
        if self.species.iter().any(|x| x.sp_id == s.sp_id) {
            return Err(duplicate(&s.sp_id, "species.PRIMARY"));
        }
        self.species.push(s.clone());
        Ok(())
    }

    fn insert_preserve(&mut self, p: &Preserve) -> Result<()> {
        if self.preserves.iter().any(|x| x.p_id == p.p_id) {
            return Err(duplicate(&p.p_id, "species_preserves.PRIMARY"));
        }
        self.preserves.push(p.clone());
        Ok(())
    }

    fn insert_plan(&mut self, p: &ConservationPlan) -> Result<()> {
        if self.plans.iter().any(|x| x.proj_id == p.proj_id) {
            return Err(duplicate(&p.proj_id, "conservation_plan.PRIMARY"));
        }
        if p.end_date < p.start_date {
            return Err(Error::Rejected(END_DATE_TRIGGER_MESSAGE.to_string()));
        }
        self.plans.push(p.clone());
        Ok(())
    }

    fn insert_environmental(&mut self, e: &EnvironmentalReading) -> Result<()> {
        if self.environmental.iter().any(|x| x.data_id == e.data_id) {
            return Err(duplicate(&e.data_id, "environmental_data.PRIMARY"));
        }
        self.environmental.push(e.clone());

        if e.expects_air_quality_alert() {
            self.push_alert(format!(
                "Critical air quality ({}) recorded at preserve {} (reading {}).",
                e.air_quality, e.p_id, e.data_id
            ));
        }
        if e.expects_water_condition_alert() {
            self.push_alert(format!(
                "Critical water condition ({}) recorded at preserve {} (reading {}).",
                e.water_condition, e.p_id, e.data_id
            ));
        }
        Ok(())
    }

    fn push_alert(&mut self, message: String) {
        let alert_id = self.alerts.iter().map(|a| a.alert_id).max().unwrap_or(0) + 1;
        self.alerts.push(Alert {
            alert_id,
            timestamp: Utc::now().naive_utc(),
            message,
        });
    }

    fn add_observation(&mut self, cmd: &ObservationCommand) -> Result<DispatchOutcome> {
        if let Some(species) = cmd.new_species() {
            self.insert_species(species)?;
        }
        let obs = cmd.observation();
        if self.observations.iter().any(|x| x.obs_id == obs.obs_id) {
            return Err(duplicate(&obs.obs_id, "observations.PRIMARY"));
        }
        self.observations.push(obs);
        Ok(DispatchOutcome::Procedure {
            messages: Vec::new(),
        })
    }

    fn assign_species(&mut self, a: &PlanAssignment) -> Result<DispatchOutcome> {
        let message = match self
            .protected_by
            .iter_mut()
            .find(|x| x.sp_id == a.sp_id && x.proj_id == a.proj_id)
        {
            Some(existing) => {
                existing.status = a.status.clone();
                format!(
                    "Species {} is already part of plan {}. Status updated to '{}'.",
                    a.sp_id, a.proj_id, a.status
                )
            }
            None => {
                self.protected_by.push(a.clone());
                format!(
                    "Species {} successfully assigned to plan {} with status '{}'.",
                    a.sp_id, a.proj_id, a.status
                )
            }
        };
        Ok(DispatchOutcome::Procedure {
            messages: vec![message],
        })
    }

    fn apply(&mut self, command: &Command) -> Result<DispatchOutcome> {
        match command {
            Command::Species(s) => self.insert_species(s).map(|_| DispatchOutcome::Inserted),
            Command::Preserve(p) => self.insert_preserve(p).map(|_| DispatchOutcome::Inserted),
            Command::Plan(p) => self.insert_plan(p).map(|_| DispatchOutcome::Inserted),
            Command::Environmental(e) => self
                .insert_environmental(e)
                .map(|_| DispatchOutcome::Inserted),
            Command::Observation(o) => self.add_observation(o),
            Command::Assignment(a) => self.assign_species(a),
        }
    }

    fn species_name(&self, sp_id: &str) -> Option<&str> {
        self.species
            .iter()
            .find(|s| s.sp_id == sp_id)
            .map(|s| s.sp_name.as_str())
    }

    // ─── tables ────────────────────────────────────────────────────────────

    fn species_table(&self) -> Table {
        Table::new(
            columns(&["SP_ID", "SP_NAME", "CLASSIFICATION"]),
            self.species
                .iter()
                .map(|s| vec![json!(s.sp_id), json!(s.sp_name), json!(s.classification)])
                .collect(),
        )
    }

    fn preserves_table(&self) -> Table {
        Table::new(
            columns(&["P_ID", "PLOC", "PNAME", "PECOSYSTEM", "SP_ID"]),
            self.preserves
                .iter()
                .map(|p| {
                    vec![
                        json!(p.p_id),
                        json!(p.ploc),
                        json!(p.pname),
                        json!(p.pecosystem),
                        json!(p.sp_id),
                    ]
                })
                .collect(),
        )
    }

    fn observations_table(&self) -> Table {
        Table::new(
            columns(&["OBS_ID", "SP_ID", "OBS_DATE", "OBS_TYPE", "OBS_LOCATION", "P_ID"]),
            self.observations
                .iter()
                .map(|o| {
                    vec![
                        json!(o.obs_id),
                        json!(o.sp_id),
                        json!(o.obs_date.to_string()),
                        json!(o.obs_type.as_str()),
                        json!(o.location),
                        json!(o.p_id),
                    ]
                })
                .collect(),
        )
    }

    fn plans_table(&self) -> Table {
        Table::new(
            columns(&["PROJ_ID", "PROJ_NAME", "STRDATE", "END_DATE", "SP_ID"]),
            self.plans
                .iter()
                .map(|p| {
                    vec![
                        json!(p.proj_id),
                        json!(p.proj_name),
                        json!(p.start_date.to_string()),
                        json!(p.end_date.to_string()),
                        json!(p.sp_id),
                    ]
                })
                .collect(),
        )
    }

    fn protected_by_table(&self) -> Table {
        Table::new(
            columns(&["SP_ID", "PROJ_ID", "STATUS"]),
            self.protected_by
                .iter()
                .map(|a| vec![json!(a.sp_id), json!(a.proj_id), json!(a.status)])
                .collect(),
        )
    }

    fn environmental_rows(
        &self,
        filter: impl Fn(&EnvironmentalReading) -> bool,
    ) -> Vec<Vec<JsonValue>> {
        self.environmental
            .iter()
            .filter(|e| filter(e))
            .map(|e| {
                vec![
                    json!(e.data_id),
                    json!(e.water_condition.to_string()),
                    json!(e.weather),
                    json!(e.soil_composition),
                    json!(e.air_quality.to_string()),
                    json!(e.p_id),
                ]
            })
            .collect()
    }

    fn environmental_table(&self) -> Table {
        Table::new(
            columns(&["DATA_ID", "WATER_COND", "WEATHERCOND", "SOIL_COMP", "AIRQUAL", "P_ID"]),
            self.environmental_rows(|_| true),
        )
    }

    fn alerts_table(&self) -> Table {
        let mut alerts: Vec<&Alert> = self.alerts.iter().collect();
        alerts.sort_by(|a, b| {
            b.timestamp
                .cmp(&a.timestamp)
                .then(b.alert_id.cmp(&a.alert_id))
        });
        Table::new(
            columns(&["ALERT_ID", "Timestamp", "Message"]),
            alerts
                .into_iter()
                .map(|a| {
                    vec![
                        json!(a.alert_id),
                        json!(a.timestamp.format("%Y-%m-%d %H:%M:%S").to_string()),
                        json!(a.message),
                    ]
                })
                .collect(),
        )
    }

    fn raw_table(&self, table: RawTable) -> Table {
        match table {
            RawTable::Species => self.species_table(),
            RawTable::Observations => self.observations_table(),
            RawTable::Preserves => self.preserves_table(),
            RawTable::ConservationPlans => self.plans_table(),
            RawTable::ProtectedBy => self.protected_by_table(),
            RawTable::EnvironmentalData => self.environmental_table(),
        }
    }

    fn option_table(&self, sql: &str) -> Option<Table> {
        let (cols, rows): (Vec<String>, Vec<Vec<JsonValue>>) = match sql {
            queries::SPECIES_OPTIONS => (
                columns(&["SP_ID", "SP_NAME"]),
                self.species
                    .iter()
                    .map(|s| vec![json!(s.sp_id), json!(s.sp_name)])
                    .collect(),
            ),
            queries::PRESERVE_OPTIONS => (
                columns(&["P_ID", "PNAME"]),
                self.preserves
                    .iter()
                    .map(|p| vec![json!(p.p_id), json!(p.pname)])
                    .collect(),
            ),
            queries::PLAN_OPTIONS => (
                columns(&["PROJ_ID", "PROJ_NAME"]),
                self.plans
                    .iter()
                    .map(|p| vec![json!(p.proj_id), json!(p.proj_name)])
                    .collect(),
            ),
            _ => return None,
        };
        Some(Table::new(cols, rows))
    }

    fn query(&self, sql: &str) -> Option<Table> {
        if let Some(table) = self.option_table(sql) {
            return Some(table);
        }
        if sql == queries::ALERTS {
            return Some(self.alerts_table());
        }
        RawTable::ALL
            .into_iter()
            .find(|t| queries::select_all(*t) == sql)
            .map(|t| self.raw_table(t))
    }

    // ─── dashboard ─────────────────────────────────────────────────────────

    fn dashboard(&self, preserve_id: &str) -> Vec<Table> {
        let details = Table::new(
            columns(&["P_ID", "PNAME", "PLOC", "PECOSYSTEM"]),
            self.preserves
                .iter()
                .filter(|p| p.p_id == preserve_id)
                .map(|p| {
                    vec![
                        json!(p.p_id),
                        json!(p.pname),
                        json!(p.ploc),
                        json!(p.pecosystem),
                    ]
                })
                .collect(),
        );

        let mut counts: BTreeMap<String, i64> = BTreeMap::new();
        let mut seen: Vec<String> = Vec::new();
        for obs in self
            .observations
            .iter()
            .filter(|o| o.p_id.as_deref() == Some(preserve_id))
        {
            *counts.entry(obs.sp_id.clone()).or_default() += 1;
            if !seen.contains(&obs.sp_id) {
                seen.push(obs.sp_id.clone());
            }
        }

        let species_observed = Table::new(
            columns(&["SP_ID", "SP_NAME", "CLASSIFICATION"]),
            seen.iter()
                .filter_map(|id| self.species.iter().find(|s| &s.sp_id == id))
                .map(|s| vec![json!(s.sp_id), json!(s.sp_name), json!(s.classification)])
                .collect(),
        );

        let environmental = Table::new(
            columns(&["DATA_ID", "WATER_COND", "WEATHERCOND", "SOIL_COMP", "AIRQUAL", "P_ID"]),
            self.environmental_rows(|e| e.p_id == preserve_id),
        );

        let mut top: Vec<(String, i64)> = counts
            .into_iter()
            .map(|(sp_id, n)| {
                let name = self.species_name(&sp_id).unwrap_or(sp_id.as_str()).to_string();
                (name, n)
            })
            .collect();
        top.sort_by(|a, b| b.1.cmp(&a.1).then(a.0.cmp(&b.0)));
        let top_species = Table::new(
            columns(&["SP_NAME", "ObservationCount"]),
            top.into_iter()
                .map(|(name, n)| vec![json!(name), json!(n)])
                .collect(),
        );

        vec![details, species_observed, environmental, top_species]
    }
}

/// In-memory implementation of every store trait.
#[derive(Debug, Default)]
pub struct MemoryStore {
    state: Mutex<State>,
    offline: std::sync::atomic::AtomicBool,
    failing_queries: Mutex<HashSet<String>>,
    failing_scalar_ids: Mutex<HashSet<String>>,
    dashboard_set_limit: Mutex<Option<usize>>,
    fetches: AtomicUsize,
    dispatches: AtomicUsize,
}

impl MemoryStore {
    /// An empty database.
    pub fn new() -> Self {
        Self::default()
    }

    /// A small, fixed data set: three species, three preserves (the third
    /// without observations), two plans, and one environmental reading.
    pub fn seeded() -> Self {
        let date = |y, m, d| NaiveDate::from_ymd_opt(y, m, d).unwrap_or(NaiveDate::MIN);
        let species = |id: &str, name: &str, class: &str| Species {
            sp_id: id.to_string(),
            sp_name: name.to_string(),
            classification: class.to_string(),
        };
        let preserve = |id: &str, name: &str, loc: &str, eco: &str, sp: &str| Preserve {
            p_id: id.to_string(),
            pname: name.to_string(),
            ploc: loc.to_string(),
            pecosystem: eco.to_string(),
            sp_id: sp.to_string(),
        };
        let observation = |id: &str, sp: &str, d: NaiveDate, loc: &str, p: &str| Observation {
            obs_id: id.to_string(),
            sp_id: sp.to_string(),
            obs_date: d,
            obs_type: ObservationType::CameraTrap,
            location: loc.to_string(),
            p_id: Some(p.to_string()),
        };

        let state = State {
            species: vec![
                species("S01", "Lion", "Mammal"),
                species("S02", "African Elephant", "Mammal"),
                species("S03", "Green Sea Turtle", "Reptile"),
            ],
            preserves: vec![
                preserve("P01", "Serengeti Reserve", "Tanzania", "Savanna", "S01"),
                preserve("P02", "Great Barrier Reef", "Australia", "Coral Reef", "S03"),
                preserve("P03", "Amazon Basin", "Brazil", "Rainforest", "S02"),
            ],
            observations: vec![
                observation("O01", "S01", date(2024, 5, 2), "Serengeti Reserve", "P01"),
                observation("O02", "S01", date(2024, 6, 11), "Serengeti Reserve", "P01"),
                observation("O03", "S02", date(2024, 7, 20), "Serengeti Reserve", "P01"),
                observation("O04", "S03", date(2024, 8, 3), "Great Barrier Reef", "P02"),
            ],
            plans: vec![
                ConservationPlan {
                    proj_id: "CP01".to_string(),
                    proj_name: "Lion Watch".to_string(),
                    start_date: date(2024, 1, 1),
                    end_date: date(2024, 12, 31),
                    sp_id: "S01".to_string(),
                },
                ConservationPlan {
                    proj_id: "CP02".to_string(),
                    proj_name: "Reef Revival".to_string(),
                    start_date: date(2024, 3, 1),
                    end_date: date(2025, 3, 1),
                    sp_id: "S03".to_string(),
                },
            ],
            protected_by: Vec::new(),
            environmental: vec![EnvironmentalReading {
                data_id: "D01".to_string(),
                p_id: "P01".to_string(),
                water_condition: BigDecimal::from_str("7.2").unwrap_or_default(),
                weather: "Clear".to_string(),
                soil_composition: "Loamy".to_string(),
                air_quality: BigDecimal::from(42),
            }],
            alerts: Vec::new(),
        };

        Self {
            state: Mutex::new(state),
            ..Self::default()
        }
    }

    // ─── fault injection ───────────────────────────────────────────────────

    /// Make every operation fail as if the server were unreachable.
    pub fn set_offline(&self, offline: bool) {
        self.offline.store(offline, Ordering::SeqCst);
    }

    /// Make one read query fail until cleared.
    pub async fn fail_query(&self, sql: &str) {
        self.failing_queries.lock().await.insert(sql.to_string());
    }

    pub async fn clear_failures(&self) {
        self.failing_queries.lock().await.clear();
        self.failing_scalar_ids.lock().await.clear();
        *self.dashboard_set_limit.lock().await = None;
    }

    /// Make every scalar function fail for this identifier.
    pub async fn fail_scalar_for(&self, id: &str) {
        self.failing_scalar_ids.lock().await.insert(id.to_string());
    }

    /// Return at most `n` dashboard result sets.
    pub async fn limit_dashboard_sets(&self, n: usize) {
        *self.dashboard_set_limit.lock().await = Some(n);
    }

    // ─── inspection ────────────────────────────────────────────────────────

    /// Number of `fetch_table` calls that reached the store.
    pub fn fetch_count(&self) -> usize {
        self.fetches.load(Ordering::SeqCst)
    }

    /// Number of `dispatch` calls that reached the store.
    pub fn dispatch_count(&self) -> usize {
        self.dispatches.load(Ordering::SeqCst)
    }

    pub async fn species(&self) -> Vec<Species> {
        self.state.lock().await.species.clone()
    }

    pub async fn preserves(&self) -> Vec<Preserve> {
        self.state.lock().await.preserves.clone()
    }

    pub async fn observations(&self) -> Vec<Observation> {
        self.state.lock().await.observations.clone()
    }

    pub async fn plans(&self) -> Vec<ConservationPlan> {
        self.state.lock().await.plans.clone()
    }

    pub async fn assignments(&self) -> Vec<PlanAssignment> {
        self.state.lock().await.protected_by.clone()
    }

    pub async fn environmental(&self) -> Vec<EnvironmentalReading> {
        self.state.lock().await.environmental.clone()
    }

    pub async fn alerts(&self) -> Vec<Alert> {
        self.state.lock().await.alerts.clone()
    }

    fn check_online(&self) -> Result<()> {
        if self.offline.load(Ordering::SeqCst) {
            return Err(Error::Unavailable(
                "Can't connect to MySQL server on 'localhost:3306'".to_string(),
            ));
        }
        Ok(())
    }

    async fn check_scalar(&self, routine: &str, id: &str) -> Result<()> {
        self.check_online()?;
        if self.failing_scalar_ids.lock().await.contains(id) {
            return Err(Error::Internal(format!("{}('{}') failed", routine, id)));
        }
        Ok(())
    }
}

#[async_trait]
impl TabularSource for MemoryStore {
    async fn fetch_table(&self, sql: &str) -> Result<Table> {
        self.fetches.fetch_add(1, Ordering::SeqCst);
        self.check_online()?;
        if self.failing_queries.lock().await.contains(sql) {
            return Err(Error::Internal(format!("Query '{}' failed", sql)));
        }
        self.state
            .lock()
            .await
            .query(sql)
            .ok_or_else(|| Error::NotFound(format!("No emulation for query '{}'", sql)))
    }

    async fn ping(&self) -> Result<()> {
        self.check_online()
    }
}

#[async_trait]
impl CommandDispatcher for MemoryStore {
    async fn dispatch(&self, command: &Command) -> Result<DispatchOutcome> {
        self.dispatches.fetch_add(1, Ordering::SeqCst);
        self.check_online()?;

        let mut state = self.state.lock().await;
        let mut working = state.clone();
        let outcome = working.apply(command)?;
        *state = working;

        debug!(
            subsystem = "database",
            component = "memory",
            op = "commit",
            command = command.kind(),
            entity_id = command.entity_id(),
            "Command committed"
        );
        Ok(outcome)
    }
}

#[async_trait]
impl DashboardRepository for MemoryStore {
    async fn dashboard_result_sets(&self, preserve_id: &str) -> Result<Vec<Table>> {
        self.check_online()?;
        let mut sets = self.state.lock().await.dashboard(preserve_id);
        if let Some(limit) = *self.dashboard_set_limit.lock().await {
            sets.truncate(limit);
        }
        Ok(sets)
    }
}

#[async_trait]
impl ScalarFunctions for MemoryStore {
    async fn project_duration_days(&self, proj_id: &str) -> Result<Option<i64>> {
        self.check_scalar("fn_GetProjectDurationDays", proj_id).await?;
        Ok(self
            .state
            .lock()
            .await
            .plans
            .iter()
            .find(|p| p.proj_id == proj_id)
            .map(|p| (p.end_date - p.start_date).num_days()))
    }

    async fn species_count_in_preserve(&self, p_id: &str) -> Result<Option<i64>> {
        self.check_scalar("fn_GetSpeciesCountInPreserve", p_id).await?;
        let state = self.state.lock().await;
        let distinct: HashSet<&str> = state
            .observations
            .iter()
            .filter(|o| o.p_id.as_deref() == Some(p_id))
            .map(|o| o.sp_id.as_str())
            .collect();
        Ok(Some(distinct.len() as i64))
    }

    async fn last_observation_date(&self, sp_id: &str) -> Result<Option<NaiveDate>> {
        self.check_scalar("fn_GetLastObservationDate", sp_id).await?;
        Ok(self
            .state
            .lock()
            .await
            .observations
            .iter()
            .filter(|o| o.sp_id == sp_id)
            .map(|o| o.obs_date)
            .max())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use wildlife_core::{ObservationLocation, RefOption, SpeciesChoice};

    fn plan(id: &str, start: NaiveDate, end: NaiveDate) -> Command {
        Command::Plan(ConservationPlan {
            proj_id: id.to_string(),
            proj_name: "Test Plan".to_string(),
            start_date: start,
            end_date: end,
            sp_id: "S01".to_string(),
        })
    }

    fn ymd(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[tokio::test]
    async fn test_end_date_trigger_rejects_plan() {
        let store = MemoryStore::seeded();
        let err = store
            .dispatch(&plan("CP09", ymd(2025, 6, 1), ymd(2025, 1, 1)))
            .await
            .unwrap_err();
        assert!(matches!(err, Error::Rejected(_)));
        assert!(store.plans().await.iter().all(|p| p.proj_id != "CP09"));
    }

    #[tokio::test]
    async fn test_failed_observation_rolls_back_new_species() {
        let store = MemoryStore::seeded();
        let cmd = Command::Observation(ObservationCommand {
            observation_id: "O01".to_string(),
            species: SpeciesChoice::New(Species {
                sp_id: "S09".to_string(),
                sp_name: "Snow Leopard".to_string(),
                classification: "Mammal".to_string(),
            }),
            date: ymd(2025, 1, 1),
            obs_type: ObservationType::Other,
            location: ObservationLocation::Preserve(RefOption::new("P01", "Serengeti Reserve")),
        });
        let err = store.dispatch(&cmd).await.unwrap_err();
        assert!(matches!(err, Error::DuplicateKey(_)));
        assert!(store.species().await.iter().all(|s| s.sp_id != "S09"));
    }

    #[tokio::test]
    async fn test_dashboard_has_four_sets() {
        let store = MemoryStore::seeded();
        let sets = store.dashboard_result_sets("P01").await.unwrap();
        assert_eq!(sets.len(), 4);
        assert_eq!(sets[3].text(0, "SP_NAME").as_deref(), Some("Lion"));
        assert_eq!(sets[3].text(0, "ObservationCount").as_deref(), Some("2"));

        let quiet = store.dashboard_result_sets("P03").await.unwrap();
        assert_eq!(quiet.len(), 4);
        assert!(quiet[3].is_empty());
    }

    #[tokio::test]
    async fn test_reassignment_updates_status() {
        let store = MemoryStore::seeded();
        let assign = |status: &str| {
            Command::Assignment(PlanAssignment {
                sp_id: "S02".to_string(),
                proj_id: "CP01".to_string(),
                status: status.to_string(),
            })
        };
        store.dispatch(&assign("Actively Monitored")).await.unwrap();
        let outcome = store.dispatch(&assign("Paused")).await.unwrap();
        match outcome {
            DispatchOutcome::Procedure { messages } => {
                assert_eq!(messages.len(), 1);
                assert!(messages[0].contains("Paused"));
            }
            other => panic!("unexpected outcome {other:?}"),
        }
        assert_eq!(store.assignments().await.len(), 1);
    }

    #[tokio::test]
    async fn test_offline_store_is_unavailable() {
        let store = MemoryStore::seeded();
        store.set_offline(true);
        assert!(store.ping().await.unwrap_err().is_connectivity());
        assert!(store
            .fetch_table(queries::SPECIES_OPTIONS)
            .await
            .unwrap_err()
            .is_connectivity());
    }

    #[tokio::test]
    async fn test_raw_tables_are_emulated() {
        let store = MemoryStore::seeded();
        for table in RawTable::ALL {
            let result = store.fetch_table(&queries::select_all(table)).await;
            assert!(result.is_ok(), "{table:?} not emulated");
        }
        assert!(store.fetch_table("SELECT * FROM poachers").await.is_err());
    }
}
