//! Persistence dispatcher: one command, one transaction.

use std::time::Instant;

use async_trait::async_trait;
use sqlx::mysql::MySqlConnection;
use tracing::{debug, info, warn};

use wildlife_core::{
    Command, CommandDispatcher, ConservationPlan, DispatchOutcome, EnvironmentalReading,
    ObservationCommand, PlanAssignment, Preserve, Result, Species, Table,
};

use crate::classify::classify;
use crate::queries;
use crate::store::{call_procedure, MySqlStore};

/// Column carrying a procedure's human-readable outcome.
pub const MESSAGE_COLUMN: &str = "message";

/// The first `message` of every result set that has one, in order.
pub fn procedure_messages(sets: &[Table]) -> Vec<String> {
    sets.iter()
        .filter_map(|set| set.text(0, MESSAGE_COLUMN))
        .collect()
}

async fn insert_species(conn: &mut MySqlConnection, s: &Species) -> Result<()> {
    sqlx::query(queries::INSERT_SPECIES)
        .bind(&s.sp_id)
        .bind(&s.sp_name)
        .bind(&s.classification)
        .execute(&mut *conn)
        .await
        .map_err(classify)?;
    Ok(())
}

async fn insert_preserve(conn: &mut MySqlConnection, p: &Preserve) -> Result<()> {
    sqlx::query(queries::INSERT_PRESERVE)
        .bind(&p.p_id)
        .bind(&p.ploc)
        .bind(&p.pname)
        .bind(&p.pecosystem)
        .bind(&p.sp_id)
        .execute(&mut *conn)
        .await
        .map_err(classify)?;
    Ok(())
}

async fn insert_plan(conn: &mut MySqlConnection, p: &ConservationPlan) -> Result<()> {
    sqlx::query(queries::INSERT_PLAN)
        .bind(&p.proj_id)
        .bind(&p.proj_name)
        .bind(p.start_date)
        .bind(p.end_date)
        .bind(&p.sp_id)
        .execute(&mut *conn)
        .await
        .map_err(classify)?;
    Ok(())
}

async fn insert_environmental(conn: &mut MySqlConnection, e: &EnvironmentalReading) -> Result<()> {
    sqlx::query(queries::INSERT_ENVIRONMENTAL)
        .bind(&e.data_id)
        .bind(&e.water_condition)
        .bind(&e.weather)
        .bind(&e.soil_composition)
        .bind(&e.air_quality)
        .bind(&e.p_id)
        .execute(&mut *conn)
        .await
        .map_err(classify)?;
    Ok(())
}

async fn add_observation(
    conn: &mut MySqlConnection,
    cmd: &ObservationCommand,
) -> Result<DispatchOutcome> {
    // The new species must exist before the procedure references it.
    if let Some(species) = cmd.new_species() {
        insert_species(conn, species).await?;
    }

    let obs = cmd.observation();
    let query = sqlx::query(queries::CALL_ADD_OBSERVATION)
        .bind(obs.obs_id)
        .bind(obs.sp_id)
        .bind(obs.obs_date)
        .bind(obs.obs_type.as_str())
        .bind(obs.location)
        .bind(obs.p_id);
    let sets = call_procedure(conn, query).await?;
    Ok(DispatchOutcome::Procedure {
        messages: procedure_messages(&sets),
    })
}

async fn assign_species(conn: &mut MySqlConnection, a: &PlanAssignment) -> Result<DispatchOutcome> {
    let query = sqlx::query(queries::CALL_ASSIGN_SPECIES)
        .bind(&a.sp_id)
        .bind(&a.proj_id)
        .bind(&a.status);
    let sets = call_procedure(conn, query).await?;
    Ok(DispatchOutcome::Procedure {
        messages: procedure_messages(&sets),
    })
}

async fn apply(conn: &mut MySqlConnection, command: &Command) -> Result<DispatchOutcome> {
    match command {
        Command::Species(s) => insert_species(conn, s)
            .await
            .map(|_| DispatchOutcome::Inserted),
        Command::Preserve(p) => insert_preserve(conn, p)
            .await
            .map(|_| DispatchOutcome::Inserted),
        Command::Plan(p) => insert_plan(conn, p)
            .await
            .map(|_| DispatchOutcome::Inserted),
        Command::Environmental(e) => insert_environmental(conn, e)
            .await
            .map(|_| DispatchOutcome::Inserted),
        Command::Observation(o) => add_observation(conn, o).await,
        Command::Assignment(a) => assign_species(conn, a).await,
    }
}

#[async_trait]
impl CommandDispatcher for MySqlStore {
    async fn dispatch(&self, command: &Command) -> Result<DispatchOutcome> {
        let start = Instant::now();
        let pool = self.pool().await?;
        let mut tx = pool.begin().await.map_err(classify)?;

        debug!(
            subsystem = "database",
            component = "dispatcher",
            op = "begin",
            command = command.kind(),
            entity_id = command.entity_id(),
            "Transaction started"
        );

        match apply(&mut tx, command).await {
            Ok(outcome) => {
                tx.commit().await.map_err(classify)?;
                info!(
                    subsystem = "database",
                    component = "dispatcher",
                    op = "commit",
                    command = command.kind(),
                    entity_id = command.entity_id(),
                    duration_ms = start.elapsed().as_millis() as u64,
                    "Command committed"
                );
                Ok(outcome)
            }
            Err(err) => {
                if let Err(rollback_err) = tx.rollback().await {
                    warn!(
                        subsystem = "database",
                        component = "dispatcher",
                        op = "rollback",
                        command = command.kind(),
                        error = %rollback_err,
                        "Rollback failed; the connection discards the transaction"
                    );
                }
                warn!(
                    subsystem = "database",
                    component = "dispatcher",
                    op = "rollback",
                    command = command.kind(),
                    entity_id = command.entity_id(),
                    error = %err,
                    duration_ms = start.elapsed().as_millis() as u64,
                    "Command rolled back"
                );
                Err(err)
            }
        }
    }
}
