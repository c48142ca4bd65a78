//! Form validation driven from JSON payloads, the way the HTTP layer
//! receives them.

use chrono::NaiveDate;
use serde_json::json;
use wildlife_core::forms::{MSG_SEARCH_FIRST, MSG_UNKNOWN_LOCATION};
use wildlife_core::{
    Command, EnvironmentalForm, Error, ObservationForm, ObservationLocation, ObservationType,
    PlanForm, SpeciesChoice,
};

fn observation(payload: serde_json::Value) -> ObservationForm {
    serde_json::from_value(payload).unwrap()
}

#[test]
fn test_label_and_pair_selections_are_equivalent() {
    let by_label = observation(json!({
        "observation_id": "O30",
        "species": "S01 - Lion",
        "date": "2025-01-05",
        "type": "camera trap",
        "preserve": "P01 - Serengeti Reserve"
    }));
    let by_pair = observation(json!({
        "observation_id": "O30",
        "species": {"id": "S01", "name": "Lion"},
        "date": "2025-01-05",
        "type": "Camera Trap",
        "preserve": {"id": "P01", "name": "Serengeti Reserve"}
    }));
    assert_eq!(by_label.build(&[]).unwrap(), by_pair.build(&[]).unwrap());
}

#[test]
fn test_new_species_observation() {
    let cmd = observation(json!({
        "observation_id": "O31",
        "species_mode": "new",
        "new_species": {"species_id": "S10", "name": "Okapi", "classification": "Mammal"},
        "date": "2025-01-06",
        "type": "Physical Sighting",
        "preserve": "P03 - Amazon Basin"
    }))
    .build(&[])
    .unwrap();

    match cmd.species {
        SpeciesChoice::New(species) => assert_eq!(species.sp_id, "S10"),
        other => panic!("expected new species, got {:?}", other),
    }
    assert_eq!(cmd.obs_type, ObservationType::PhysicalSighting);
    assert_eq!(cmd.date, NaiveDate::from_ymd_opt(2025, 1, 6).unwrap());
}

#[test]
fn test_custom_location_needs_a_search_first() {
    let form = observation(json!({
        "observation_id": "O32",
        "species": "S01 - Lion",
        "date": "2025-01-07",
        "type": "Other",
        "location_mode": "custom",
        "address": "Arusha, Tanzania"
    }));

    match form.build(&[]) {
        Err(Error::InvalidInput(msg)) => assert_eq!(msg, MSG_SEARCH_FIRST),
        other => panic!("unexpected {:?}", other),
    }

    let candidates = vec!["Moshi, Tanzania".to_string()];
    match form.build(&candidates) {
        Err(Error::InvalidInput(msg)) => assert_eq!(msg, MSG_UNKNOWN_LOCATION),
        other => panic!("unexpected {:?}", other),
    }

    let candidates = vec!["Arusha, Tanzania".to_string()];
    let cmd = form.build(&candidates).unwrap();
    assert_eq!(
        cmd.location,
        ObservationLocation::Geocoded("Arusha, Tanzania".to_string())
    );
}

#[test]
fn test_backwards_plan_passes_validation() {
    let form: PlanForm = serde_json::from_value(json!({
        "plan_id": "CP20",
        "name": "Backwards",
        "start_date": "2025-06-01",
        "end_date": "2024-06-01",
        "species": "S02 - African Elephant"
    }))
    .unwrap();
    assert!(matches!(form.into_command(), Ok(Command::Plan(_))));
}

#[test]
fn test_environmental_numbers_as_text_or_number() {
    let form: EnvironmentalForm = serde_json::from_value(json!({
        "data_id": "D30",
        "preserve": "P02 - Great Barrier Reef",
        "water_condition": "5.5",
        "weather": "Rain",
        "soil_composition": "Sandy",
        "air_quality": 80
    }))
    .unwrap();
    let reading = form.build().unwrap();
    assert!(reading.expects_water_condition_alert());
    assert!(!reading.expects_air_quality_alert());

    let bad: EnvironmentalForm = serde_json::from_value(json!({
        "data_id": "D31",
        "preserve": "P02 - Great Barrier Reef",
        "water_condition": "murky",
        "weather": "Rain",
        "soil_composition": "Sandy",
        "air_quality": 80
    }))
    .unwrap();
    assert!(matches!(bad.build(), Err(Error::InvalidInput(_))));
}
