use std::io::Write;

use meetgrid::form::{validate_event, EventRequest};
use meetgrid::grid::{
    aggregate, filter_to_best, find_best, grid_summary, to_key, Availability, BestSlot, EventMode,
    Grid, GridSession, HeatBucket, Responses,
};
use meetgrid::parser::load_responses;
use meetgrid::store::EventStore;

fn two_day_grid() -> (meetgrid::grid::EventConfig, Grid) {
    let config = validate_event(&EventRequest {
        name: "Planning".into(),
        mode: EventMode::Specific,
        columns: vec!["2024-06-03".into(), "2024-06-04".into()],
        start: "09:00".into(),
        end: "10:00".into(),
    })
    .unwrap();
    let grid = Grid::from_config(&config).unwrap();
    (config, grid)
}

#[test]
fn test_alice_and_bob_scenario() {
    let (_, grid) = two_day_grid();
    assert_eq!(grid.time_slots(), &["09:00".to_string(), "09:30".to_string()]);

    let mut responses = Responses::new();
    let mut alice = Availability::new();
    alice.set("2024-06-03_09:00", true);
    let mut bob = Availability::new();
    bob.set("2024-06-03_09:00", true);
    bob.set("2024-06-03_09:30", true);
    responses.insert("Alice".into(), alice);
    responses.insert("Bob".into(), bob);

    let stats = aggregate(&responses, "2024-06-03", "09:00");
    assert_eq!(stats.count, 2);
    assert_eq!(stats.available_users, vec!["Alice", "Bob"]);

    let best = find_best(&grid, &responses);
    assert_eq!(
        best,
        vec![BestSlot { column: "2024-06-03".into(), time: "09:00".into(), count: 2 }]
    );

    let filtered = filter_to_best(&responses, &best);
    assert_eq!(filtered["Bob"].len(), 1);
    let cells = grid_summary(&grid, &filtered).unwrap();
    assert_eq!(cells.iter().filter(|c| c.bucket != HeatBucket::Empty).count(), 1);
}

#[test]
fn test_session_submit_then_store_then_aggregate() {
    let (config, grid) = two_day_grid();
    let store = EventStore::in_memory();
    let id = store.create(config).unwrap();

    let mut session = GridSession::new();
    session.begin_editing("Alice", None);
    session.pointer_down(&grid, "2024-06-04_09:30").unwrap();
    session.pointer_enter(&grid, "2024-06-03_09:00").unwrap();
    session.pointer_up(&grid).unwrap();
    let (name, availability) = session.submit().unwrap();
    store.upsert_response(&id, &name, availability).unwrap();

    // re-enter and resubmit with a single cell removed
    let previous = store.get(&id).unwrap().responses["Alice"].clone();
    session.begin_editing("Alice", Some(&previous));
    session.click(&grid, "2024-06-04_09:00").unwrap();
    let (name, availability) = session.submit().unwrap();
    store.upsert_response(&id, &name, availability).unwrap();

    let event = store.get(&id).unwrap();
    let best = find_best(&grid, &event.responses);
    assert_eq!(best.len(), 3);
    assert!(!best.iter().any(|b| to_key(&b.column, &b.time) == "2024-06-04_09:00"));
}

#[test]
fn test_csv_import_feeds_best_slots() {
    let (_, grid) = two_day_grid();
    let mut file = tempfile::NamedTempFile::new().unwrap();
    write!(
        file,
        "respondent,column,times\n\
         Alice,2024-06-03,09:30\n\
         Bob,2024-06-03,\"09:00, 09:30\"\n\
         Carol,2024-06-04,09:30\n"
    )
    .unwrap();
    file.flush().unwrap();

    let responses = load_responses(file.path(), &grid).unwrap();
    let best = find_best(&grid, &responses);
    assert_eq!(
        best,
        vec![BestSlot { column: "2024-06-03".into(), time: "09:30".into(), count: 2 }]
    );
}
