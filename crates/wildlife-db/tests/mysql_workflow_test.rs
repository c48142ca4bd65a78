//! Live tests against a MySQL `wild_db` with its procedures, functions and
//! triggers installed. Skipped unless `DATABASE_URL` is set.

use chrono::NaiveDate;
use wildlife_db::test_fixtures::TestDatabase;
use wildlife_db::{
    Command, ConservationPlan, DispatchOutcome, Error, ObservationCommand, ObservationLocation,
    ObservationType, PlanAssignment, RefOption, Species, SpeciesChoice,
};

macro_rules! require_db {
    () => {{
        dotenvy::dotenv().ok();
        match TestDatabase::connect().await {
            Some(db) => db,
            None => {
                eprintln!("Skipping: DATABASE_URL not set or database not available");
                return;
            }
        }
    }};
}

fn ymd(y: i32, m: u32, d: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(y, m, d).unwrap()
}

#[tokio::test]
async fn test_reference_lists_load() {
    let test_db = require_db!();
    let species = test_db.db.reference.species().await;
    let preserves = test_db.db.reference.preserves().await;
    let plans = test_db.db.reference.plans().await;
    assert!(species.notices.is_empty(), "{:?}", species.notices);
    assert!(preserves.notices.is_empty(), "{:?}", preserves.notices);
    assert!(plans.notices.is_empty(), "{:?}", plans.notices);
    test_db.cleanup().await;
}

#[tokio::test]
async fn test_duplicate_species_is_rejected_and_first_row_kept() {
    let test_db = require_db!();
    let sp_id = test_db.unique_id("S");
    let first = Command::Species(Species {
        sp_id: sp_id.clone(),
        sp_name: "Fixture Ibis".to_string(),
        classification: "Bird".to_string(),
    });
    let second = Command::Species(Species {
        sp_id: sp_id.clone(),
        sp_name: "Overwritten".to_string(),
        classification: "Fish".to_string(),
    });

    let outcome = test_db.db.store.dispatch(&first).await.unwrap();
    test_db.track("species", "SP_ID", &sp_id);
    assert_eq!(outcome, DispatchOutcome::Inserted);

    let err = test_db.db.store.dispatch(&second).await.unwrap_err();
    assert!(matches!(err, Error::DuplicateKey(_)), "got {err:?}");

    let options = test_db.db.reference.species().await.value;
    let stored = options.iter().find(|o| o.id == sp_id).unwrap();
    assert_eq!(stored.name, "Fixture Ibis");
    test_db.cleanup().await;
}

#[tokio::test]
async fn test_plan_end_before_start_is_rejected_by_trigger() {
    let test_db = require_db!();
    let species = test_db.db.reference.species().await.value;
    let Some(sp) = species.first() else {
        eprintln!("Skipping: no species in database");
        return;
    };
    let proj_id = test_db.unique_id("CP");
    let cmd = Command::Plan(ConservationPlan {
        proj_id: proj_id.clone(),
        proj_name: "Backwards Plan".to_string(),
        start_date: ymd(2025, 6, 1),
        end_date: ymd(2024, 6, 1),
        sp_id: sp.id.clone(),
    });

    let err = test_db.db.store.dispatch(&cmd).await.unwrap_err();
    assert!(err.is_constraint(), "got {err:?}");
    let plans = test_db.db.reference.plans().await.value;
    assert!(plans.iter().all(|p| p.id != proj_id));
    test_db.cleanup().await;
}

#[tokio::test]
async fn test_observation_at_preserve_and_dashboard() {
    let test_db = require_db!();
    let species = test_db.db.reference.species().await.value;
    let preserves = test_db.db.reference.preserves().await.value;
    let (Some(sp), Some(preserve)) = (species.first(), preserves.first()) else {
        eprintln!("Skipping: no species or preserves in database");
        return;
    };

    let obs_id = test_db.unique_id("O");
    let cmd = Command::Observation(ObservationCommand {
        observation_id: obs_id.clone(),
        species: SpeciesChoice::Existing(sp.clone()),
        date: ymd(2025, 3, 14),
        obs_type: ObservationType::CameraTrap,
        location: ObservationLocation::Preserve(preserve.clone()),
    });
    test_db.db.store.dispatch(&cmd).await.unwrap();
    test_db.track("observations", "OBS_ID", &obs_id);

    let sets = test_db
        .db
        .store
        .dashboard_result_sets(&preserve.id)
        .await
        .unwrap();
    assert_eq!(sets.len(), 4);
    assert!(!sets[3].is_empty());
    test_db.cleanup().await;
}

#[tokio::test]
async fn test_assignment_returns_message() {
    let test_db = require_db!();
    let species = test_db.db.reference.species().await.value;
    let plans = test_db.db.reference.plans().await.value;
    let (Some(sp), Some(plan)) = (species.last(), plans.last()) else {
        eprintln!("Skipping: no species or plans in database");
        return;
    };
    let cmd = Command::Assignment(PlanAssignment {
        sp_id: sp.id.clone(),
        proj_id: plan.id.clone(),
        status: "Actively Monitored".to_string(),
    });
    match test_db.db.store.dispatch(&cmd).await.unwrap() {
        DispatchOutcome::Procedure { messages } => assert!(!messages.is_empty()),
        other => panic!("expected procedure outcome, got {other:?}"),
    }
    test_db.cleanup().await;
}

#[tokio::test]
async fn test_project_durations_follow_plan_order() {
    let test_db = require_db!();
    let plans: Vec<RefOption> = test_db.db.reference.plans().await.value;
    let mut durations = Vec::new();
    for plan in &plans {
        durations.push(
            test_db
                .db
                .store
                .project_duration_days(&plan.id)
                .await
                .unwrap(),
        );
    }
    assert_eq!(durations.len(), plans.len());
    test_db.cleanup().await;
}

#[tokio::test]
async fn test_dropped_fixture_deletes_tracked_rows() {
    let test_db = require_db!();
    let sp_id = test_db.unique_id("S");
    let cmd = Command::Species(Species {
        sp_id: sp_id.clone(),
        sp_name: "Fixture Heron".to_string(),
        classification: "Bird".to_string(),
    });
    test_db.db.store.dispatch(&cmd).await.unwrap();
    test_db.track("species", "SP_ID", &sp_id);
    assert_eq!(test_db.pending(), 1);
    drop(test_db);

    let check = require_db!();
    let species = check.db.reference.species().await.value;
    assert!(species.iter().all(|o| o.id != sp_id));
    check.cleanup().await;
}
