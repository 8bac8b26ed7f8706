#![forbid(unsafe_code)]
//! Persistance fichier et formats d'échange.

use cuadrante::{
    io, AssignmentMode, Calendar, Cell, JsonStorage, Person, PersonId, PersonRole, Route,
    Snapshot, Storage,
};
use serde_json::json;
use tempfile::tempdir;

#[test]
fn snapshot_roundtrip_through_json_storage() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("cuadrante.json");
    let storage = JsonStorage::open(&path).unwrap();

    let mut snapshot = Snapshot::default();
    let mut person = Person::new(1, "Ana", PersonRole::Driver);
    person.assigned_route = Some("R1".to_string());
    snapshot.people.push(person);
    snapshot.routes.push(Route::new("R1"));
    let mut calendar = Calendar::default();
    calendar.set(PersonId::new(1), 1, Cell::work("R1"));
    calendar.set(PersonId::new(1), 5, Cell::weekend());
    snapshot
        .calendars
        .insert(Snapshot::calendar_key(2025, 10), calendar);

    storage.save(&snapshot).unwrap();
    let loaded = storage.load().unwrap();

    assert_eq!(loaded.people, snapshot.people);
    assert_eq!(loaded.routes, snapshot.routes);
    assert_eq!(loaded.calendars, snapshot.calendars);
    assert_eq!(
        loaded.calendars["2025-10"]
            .cell(PersonId::new(1), 1)
            .unwrap()
            .value,
        "R1"
    );
}

#[test]
fn cell_serializes_with_type_and_value() {
    assert_eq!(
        serde_json::to_value(Cell::work("R1+R1.1")).unwrap(),
        json!({"type": "work", "value": "R1+R1.1"})
    );
    assert_eq!(
        serde_json::to_value(Cell::sick()).unwrap(),
        json!({"type": "sick", "value": "BAJA"})
    );
    assert_eq!(
        serde_json::to_value(Cell::weekend()).unwrap(),
        json!({"type": "weekend", "value": ""})
    );
}

#[test]
fn route_mode_serializes_tagged() {
    let route = Route {
        short_code: "R1".to_string(),
        mode: AssignmentMode::Alternating2x2 {
            primary_driver: PersonId::new(1),
            secondary_driver: PersonId::new(2),
            alternating_driver: PersonId::new(3),
            alternating_linked_route: Some("R2".to_string()),
        },
    };
    let value = serde_json::to_value(&route).unwrap();
    assert_eq!(value["short_code"], "R1");
    assert_eq!(value["assignment_mode"], "alternating_2x2");
    assert_eq!(value["primary_driver"], 1);

    let back: Route = serde_json::from_value(value).unwrap();
    assert_eq!(back, route);
}

#[test]
fn import_people_csv_parses_roles_and_rest_days() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("people.csv");
    std::fs::write(
        &path,
        "id,name,role,category,rest_day1,rest_day2,assigned_route,available_routes\n\
         1,Ana,driver,plant,,,R1,R1.1;R2\n\
         2,Luz,ayudante,plant,0,3,,\n",
    )
    .unwrap();

    let people = io::import_people_csv(&path).unwrap();
    assert_eq!(people.len(), 2);
    assert_eq!(people[0].role, PersonRole::Driver);
    assert_eq!(people[0].assigned_route.as_deref(), Some("R1"));
    assert_eq!(people[0].available_routes, vec!["R1.1", "R2"]);
    assert_eq!(people[1].role, PersonRole::Helper);
    assert_eq!(people[1].rest_day1, Some(0));
    assert_eq!(people[1].rest_day2, Some(3));
}

#[test]
fn export_missing_csv_writes_one_row_per_gap() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("missing.csv");
    let mut missing = std::collections::BTreeMap::new();
    missing.insert(5u32, vec!["R1".to_string(), "R2".to_string()]);
    missing.insert(6u32, vec!["R1".to_string()]);

    io::export_missing_csv(&path, &missing).unwrap();
    let content = std::fs::read_to_string(&path).unwrap();
    assert_eq!(content, "day,route\n5,R1\n5,R2\n6,R1\n");
}

#[test]
fn export_month_csv_writes_one_row_per_person() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("month.csv");
    let people = vec![Person::new(1, "Ana", PersonRole::Driver)];
    let mut calendar = Calendar::default();
    calendar.set(PersonId::new(1), 1, Cell::work("R1"));
    calendar.set(PersonId::new(1), 2, Cell::weekend());

    io::export_month_csv(&path, &people, &calendar, 2).unwrap();
    let content = std::fs::read_to_string(&path).unwrap();
    let mut lines = content.lines();
    assert_eq!(lines.next(), Some("id,name,1,2"));
    assert_eq!(lines.next(), Some("1,Ana,R1,"));
}
