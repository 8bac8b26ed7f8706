#![forbid(unsafe_code)]
//! Génération de base : routes attitrées, pool, congés, BAJA, jocker.

use chrono::NaiveDate;
use cuadrante::{
    Calendar, Cell, CellKind, Engine, EngineError, FixedRouteException, GenerateOptions,
    GenerationInput, Person, PersonId, PersonRole, Route, VacationRequest, VacationStatus,
};

const YEAR: i32 = 2025;
const MONTH0: u32 = 10; // novembre 2025, 30 jours

fn driver(id: u32) -> Person {
    Person::new(id, format!("driver-{id}"), PersonRole::Driver)
}

fn input(
    people: Vec<Person>,
    routes: Vec<Route>,
    vacations: Vec<VacationRequest>,
    previous: Option<Calendar>,
) -> GenerationInput {
    GenerationInput {
        people,
        routes,
        vacations,
        previous,
        year: YEAR,
        month0: MONTH0,
    }
}

fn date(day: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(YEAR, MONTH0 + 1, day).unwrap()
}

#[test]
fn assigned_route_fills_work_days_with_secondary() {
    let mut p = driver(1);
    p.assigned_route = Some("R1".to_string());
    let routes = vec![Route::new("R1"), Route::new("R1.1")];
    let result = Engine::new()
        .generate(&input(vec![p], routes, vec![], None))
        .unwrap();

    let id = PersonId::new(1);
    for day in [1u32, 2, 3, 4, 7, 8] {
        assert_eq!(result.schedule.cell(id, day).unwrap().value, "R1+R1.1");
    }
    for day in [5u32, 6] {
        let cell = result.schedule.cell(id, day).unwrap();
        assert_eq!(cell.kind, CellKind::Weekend);
        assert_eq!(cell.value, "");
    }
    // jours de repos : la route reste sans chauffeur
    assert_eq!(result.missing[&5], vec!["R1", "R1.1"]);
}

#[test]
fn main_route_is_never_assigned_twice_per_day() {
    let mut a = driver(1);
    a.assigned_route = Some("R1".to_string());
    let mut b = driver(2);
    b.assigned_route = Some("R1".to_string());
    let result = Engine::new()
        .generate(&input(vec![a, b], vec![Route::new("R1")], vec![], None))
        .unwrap();

    for day in 1..=30u32 {
        let holders = [1u32, 2]
            .iter()
            .filter(|id| {
                result
                    .schedule
                    .cell(PersonId::new(**id), day)
                    .is_some_and(|c| c.value.contains("R1"))
            })
            .count();
        assert!(holders <= 1, "day {day}: R1 held by {holders} people");
    }
    // le premier du roster gagne
    assert_eq!(result.schedule.cell(PersonId::new(1), 1).unwrap().value, "R1");
    assert_eq!(result.schedule.cell(PersonId::new(2), 1).unwrap().value, "");
}

#[test]
fn leftover_pool_routes_are_reported_in_order() {
    let people = vec![driver(1), driver(2), driver(3)];
    let routes = vec![
        Route::new("R1"),
        Route::new("R2"),
        Route::new("R3"),
        Route::new("R4"),
        Route::new("R5"),
    ];
    let result = Engine::new()
        .generate(&input(people, routes, vec![], None))
        .unwrap();

    // 3 chauffeurs en service, 5 routes : 2 restent, dans l'ordre du pool.
    assert_eq!(result.missing[&1], vec!["R4", "R5"]);
    // jours de repos communs (démarrage à froid) : tout reste
    assert_eq!(result.missing[&5].len(), 5);
}

#[test]
fn category_priority_orders_pool_distribution() {
    let mut a = driver(1);
    a.category = "secondary".to_string();
    let mut b = driver(2);
    b.category = "primary".to_string();
    let engine = Engine::with_options(GenerateOptions {
        category_priority: vec!["primary".to_string(), "secondary".to_string()],
        ..GenerateOptions::default()
    });
    let result = engine
        .generate(&input(vec![a, b], vec![Route::new("R1")], vec![], None))
        .unwrap();

    assert_eq!(result.schedule.cell(PersonId::new(2), 1).unwrap().value, "R1");
    assert_eq!(result.schedule.cell(PersonId::new(1), 1).unwrap().value, "");
}

#[test]
fn fixed_route_exception_prefills_outside_its_rest_weekday() {
    let mut p = driver(1);
    p.fixed_route_exception = Some(FixedRouteException {
        route: "RF".to_string(),
        rest_weekday: 0, // dimanche
    });
    // R9 en tête de catalogue : une distribution générique la servirait d'abord
    let routes = vec![Route::new("R9"), Route::new("RF")];
    let result = Engine::new()
        .generate(&input(vec![p], routes, vec![], None))
        .unwrap();

    let id = PersonId::new(1);
    let sundays = [2u32, 9, 16, 23, 30]; // novembre 2025
    for day in 1..=30u32 {
        let cell = result.schedule.cell(id, day).unwrap();
        if sundays.contains(&day) {
            assert_eq!(cell.kind, CellKind::Weekend, "day {day}");
        } else {
            assert_eq!(cell.kind, CellKind::Work, "day {day}");
            assert_eq!(cell.value, "RF", "day {day}");
        }
    }
    // hors distribution générique : R9 reste sans chauffeur tous les jours,
    // et RF seulement le dimanche
    for day in 1..=30u32 {
        if sundays.contains(&day) {
            assert_eq!(result.missing[&day], vec!["R9", "RF"], "day {day}");
        } else {
            assert_eq!(result.missing[&day], vec!["R9"], "day {day}");
        }
    }
}

#[test]
fn sick_last_day_carries_over_whole_month() {
    let mut prev = Calendar::default();
    prev.set(PersonId::new(1), 31, Cell::sick());
    prev.set(PersonId::new(2), 31, Cell::work("BAJA"));

    // même une demande de congés approuvée ne réécrit pas la BAJA
    let vacation =
        VacationRequest::new(PersonId::new(1), date(5), date(10), VacationStatus::Approved)
            .unwrap();

    let result = Engine::new()
        .generate(&input(
            vec![driver(1), driver(2)],
            vec![],
            vec![vacation],
            Some(prev),
        ))
        .unwrap();

    for id in [1u32, 2] {
        for day in 1..=30u32 {
            let cell = result.schedule.cell(PersonId::new(id), day).unwrap();
            assert_eq!(cell.kind, CellKind::Sick, "person {id} day {day}");
            assert_eq!(cell.value, "BAJA");
        }
    }
}

#[test]
fn approved_vacation_overrides_work_and_weekend() {
    let vacation =
        VacationRequest::new(PersonId::new(1), date(4), date(6), VacationStatus::Approved)
            .unwrap();
    let pending =
        VacationRequest::new(PersonId::new(1), date(10), date(12), VacationStatus::Pending)
            .unwrap();
    let result = Engine::new()
        .generate(&input(vec![driver(1)], vec![], vec![vacation, pending], None))
        .unwrap();

    let id = PersonId::new(1);
    for day in [4u32, 5, 6] {
        let cell = result.schedule.cell(id, day).unwrap();
        assert_eq!(cell.kind, CellKind::Vacation);
        assert_eq!(cell.value, "V");
    }
    // une demande non approuvée ne compte pas
    assert_eq!(result.schedule.cell(id, 10).unwrap().kind, CellKind::Work);
}

#[test]
fn duplicate_vacation_requests_leave_the_calendar_unchanged() {
    let make = || {
        VacationRequest::new(PersonId::new(1), date(4), date(6), VacationStatus::Approved).unwrap()
    };
    let once = Engine::new()
        .generate(&input(vec![driver(1)], vec![], vec![make()], None))
        .unwrap();
    let twice = Engine::new()
        .generate(&input(vec![driver(1)], vec![], vec![make(), make()], None))
        .unwrap();

    assert_eq!(once.schedule, twice.schedule);
    assert_eq!(once.missing, twice.missing);
}

#[test]
fn sick_carry_over_ignores_people_removed_from_roster() {
    let mut prev = Calendar::default();
    prev.set(PersonId::new(1), 31, Cell::sick());
    prev.set(PersonId::new(9), 31, Cell::sick()); // sortie du roster depuis

    let result = Engine::new()
        .generate(&input(vec![driver(1)], vec![], vec![], Some(prev)))
        .unwrap();

    assert_eq!(
        result.schedule.cell(PersonId::new(1), 1).unwrap().kind,
        CellKind::Sick
    );
    // aucune ligne pour un id absent du roster
    assert!(!result.schedule.cells.contains_key(&PersonId::new(9)));
}

#[test]
fn jocker_covers_vacationing_driver_with_preferred_secondary() {
    let mut d = driver(1);
    d.assigned_route = Some("R1".to_string());
    d.available_routes = vec!["R1.1".to_string()];
    let j = Person::new(2, "jocker", PersonRole::Jocker);
    let routes = vec![Route::new("R1"), Route::new("R1.1")];
    let vacation =
        VacationRequest::new(PersonId::new(1), date(1), date(3), VacationStatus::Approved)
            .unwrap();

    let result = Engine::new()
        .generate(&input(vec![d, j], routes, vec![vacation], None))
        .unwrap();

    let jocker = PersonId::new(2);
    for day in [1u32, 2, 3] {
        assert_eq!(result.schedule.cell(jocker, day).unwrap().value, "R1+R1.1");
    }
    // le titulaire reprend sa route au retour
    assert_eq!(
        result.schedule.cell(PersonId::new(1), 4).unwrap().value,
        "R1+R1.1"
    );
    assert_eq!(result.schedule.cell(jocker, 4).unwrap().value, "");

    assert_eq!(result.coverage.len(), 3);
    assert_eq!(result.coverage[0].day, 1);
    assert_eq!(result.coverage[0].jocker, jocker);
    assert_eq!(result.coverage[0].covered, PersonId::new(1));
    assert_eq!(result.coverage[0].route, "R1");
}

#[test]
fn generation_is_deterministic() {
    let mut d = driver(1);
    d.assigned_route = Some("R1".to_string());
    let people = vec![d, driver(2), Person::new(3, "sup", PersonRole::Supervisor)];
    let routes = vec![Route::new("R1"), Route::new("R2")];
    let a = Engine::new()
        .generate(&input(people.clone(), routes.clone(), vec![], None))
        .unwrap();
    let b = Engine::new()
        .generate(&input(people, routes, vec![], None))
        .unwrap();
    assert_eq!(a.schedule, b.schedule);
    assert_eq!(a.missing, b.missing);
}

#[test]
fn summary_counts_cells_and_gaps() {
    let people = vec![driver(1)];
    let routes = vec![Route::new("R1"), Route::new("R2")];
    let result = Engine::new()
        .generate(&input(people, routes, vec![], None))
        .unwrap();
    let summary = result.summary();

    assert_eq!(summary.work_days, 20); // 30 jours en 4/2 à froid
    assert_eq!(summary.rest_days, 10);
    assert_eq!(summary.vacation_days, 0);
    assert_eq!(summary.days_with_gaps, 30); // R2 n'a jamais de chauffeur
    assert!(summary.unfilled_slots >= 30);
}

#[test]
fn invalid_month_index_is_rejected() {
    let bad = GenerationInput {
        people: vec![],
        routes: vec![],
        vacations: vec![],
        previous: None,
        year: YEAR,
        month0: 12,
    };
    match Engine::new().generate(&bad) {
        Err(EngineError::InvalidMonth(12)) => {}
        other => panic!("expected InvalidMonth, got {other:?}"),
    }
}
