//! Surcouches congés / maladie. Ordre contractuel : la BAJA reportée du
//! mois précédent s'applique d'abord et n'est jamais réécrite, les congés
//! approuvés ensuite, la couverture jocker vise ces cellules congés.

use crate::model::{Calendar, Cell, CellKind, Person, PersonId, VacationRequest, SICK_VALUE};
use chrono::{Datelike, NaiveDate};
use std::collections::BTreeSet;

/// Personnes du roster dont le dernier jour du mois précédent est en
/// maladie (ou une cellule travail valant littéralement "BAJA") : l'arrêt
/// n'a pas de date de fin et se propage sur tout le nouveau mois. Les ids
/// présents dans l'ancien calendrier mais sortis du roster sont ignorés.
pub(super) fn carried_sick(
    prev: &Calendar,
    people: &[Person],
    prev_last_day: u32,
) -> BTreeSet<PersonId> {
    people
        .iter()
        .map(|p| p.id)
        .filter(|person| {
            prev.cell(*person, prev_last_day).is_some_and(|cell| {
                cell.kind == CellKind::Sick
                    || (cell.kind == CellKind::Work && cell.value == SICK_VALUE)
            })
        })
        .collect()
}

pub(super) fn apply_sick(calendar: &mut Calendar, people: &BTreeSet<PersonId>, days: u32) {
    for person in people {
        for day in 1..=days {
            calendar.set(*person, day, Cell::sick());
        }
    }
}

/// Force les cellules congés pour chaque demande approuvée chevauchant le
/// mois cible. Les cellules maladie restent intouchées (la BAJA prime).
pub(super) fn apply_vacations(
    calendar: &mut Calendar,
    vacations: &[VacationRequest],
    first_of_month: NaiveDate,
    days: u32,
) {
    for request in vacations.iter().filter(|r| r.is_approved()) {
        if !calendar.cells.contains_key(&request.driver) {
            continue;
        }
        for day in 1..=days {
            let date = first_of_month + chrono::Duration::days(i64::from(day) - 1);
            debug_assert_eq!(date.month(), first_of_month.month());
            if date < request.start || date > request.end {
                continue;
            }
            let sick = calendar
                .cell(request.driver, day)
                .is_some_and(|c| c.kind == CellKind::Sick);
            if !sick {
                calendar.set(request.driver, day, Cell::vacation());
            }
        }
    }
}
