//! Moteur de génération : une passe pure et synchrone qui produit le
//! calendrier d'un mois depuis le roster, le catalogue de routes, les
//! congés approuvés et le calendrier du mois précédent.

mod assignment;
mod overlay;
mod pattern;
mod report;
mod supervision;
mod types;

pub use report::{summarize, ScheduleSummary};
pub use types::{
    CoverageNote, EngineError, GenerateOptions, GenerationResult, ValidationWarning,
};

use crate::model::{Calendar, Cell, Person, PersonId, PersonRole, Route, VacationRequest};
use chrono::{Datelike, Duration, NaiveDate};
use std::collections::BTreeMap;

/// Instantané d'entrée d'une génération. Le calendrier précédent est lu
/// tel quel : une cellule éditée à la main vaut une cellule générée.
#[derive(Debug, Clone)]
pub struct GenerationInput {
    pub people: Vec<Person>,
    pub routes: Vec<Route>,
    /// Toutes les demandes ; seules les approuvées comptent.
    pub vacations: Vec<VacationRequest>,
    pub previous: Option<Calendar>,
    pub year: i32,
    /// Mois cible indexé 0-11, comme la clé de persistance "{year}-{month0}".
    pub month0: u32,
}

/// Nombre de jours du mois cible.
pub fn days_in_month(year: i32, month0: u32) -> Result<u32, EngineError> {
    if month0 > 11 {
        return Err(EngineError::InvalidMonth(month0));
    }
    let invalid = || EngineError::InvalidDate { year, month0 };
    let first = NaiveDate::from_ymd_opt(year, month0 + 1, 1).ok_or_else(invalid)?;
    let next = if month0 == 11 {
        NaiveDate::from_ymd_opt(year + 1, 1, 1)
    } else {
        NaiveDate::from_ymd_opt(year, month0 + 2, 1)
    }
    .ok_or_else(invalid)?;
    Ok((next - first).num_days() as u32)
}

fn previous_month(year: i32, month0: u32) -> (i32, u32) {
    if month0 == 0 {
        (year - 1, 11)
    } else {
        (year, month0 - 1)
    }
}

/// Moteur de génération mensuelle.
#[derive(Debug, Default)]
pub struct Engine {
    opts: GenerateOptions,
}

impl Engine {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_options(opts: GenerateOptions) -> Self {
        Self { opts }
    }

    /// Génère le calendrier du mois cible. Pure : aucune E/S, aucun état
    /// conservé entre deux appels.
    pub fn generate(&self, input: &GenerationInput) -> Result<GenerationResult, EngineError> {
        let days = days_in_month(input.year, input.month0)?;
        let first_of_month = NaiveDate::from_ymd_opt(input.year, input.month0 + 1, 1)
            .ok_or(EngineError::InvalidDate {
                year: input.year,
                month0: input.month0,
            })?;
        let (prev_year, prev_month0) = previous_month(input.year, input.month0);
        let prev_last_day = days_in_month(prev_year, prev_month0)?;

        let warnings = assignment::validate_routes(&input.routes);
        let resolved = assignment::resolve_all(&input.people, &input.routes);
        let sick_carry = input
            .previous
            .as_ref()
            .map(|prev| overlay::carried_sick(prev, &input.people, prev_last_day))
            .unwrap_or_default();
        let starts = infer_starts(input, &resolved, prev_last_day);

        let mut schedule = skeleton(input, &starts, first_of_month, days);
        overlay::apply_sick(&mut schedule, &sick_carry, days);
        overlay::apply_vacations(&mut schedule, &input.vacations, first_of_month, days);

        let loaders: Vec<&Person> = input
            .people
            .iter()
            .filter(|p| p.role == PersonRole::Loader)
            .collect();
        let mut loader_codes: BTreeMap<PersonId, pattern::LoaderCodeState> = loaders
            .iter()
            .map(|p| {
                let seed = input
                    .previous
                    .as_ref()
                    .and_then(|prev| pattern::infer_loader_code(prev, p.id, prev_last_day))
                    .unwrap_or_else(pattern::LoaderCodeState::cold);
                (p.id, seed)
            })
            .collect();

        let supervisors: Vec<&Person> = input
            .people
            .iter()
            .filter(|p| p.role == PersonRole::Supervisor)
            .collect();
        let mut sup_states =
            supervision::seed_states(&supervisors, input.previous.as_ref(), prev_last_day);
        let block_len = self.opts.supervisor_block_len.max(1);

        let mut missing = BTreeMap::new();
        let mut coverage = Vec::new();

        for day in 1..=days {
            let mut pool = assignment::DayPool::new(&input.routes);

            for loader in &loaders {
                let on_duty = schedule
                    .cell(loader.id, day)
                    .is_some_and(Cell::is_empty_work);
                if !on_duty {
                    continue;
                }
                let start = starts.get(&loader.id).copied().unwrap_or(0);
                let block_start = pattern::pattern_index(start, day) == 0;
                if let Some(state) = loader_codes.get_mut(&loader.id) {
                    let code = state.advance(block_start);
                    schedule.set(loader.id, day, Cell::work(code.as_str()));
                }
            }

            supervision::assign_day(&mut schedule, day, &input.people, &mut sup_states, block_len);

            assignment::apply_fixed(&mut schedule, day, &input.people, &resolved, &mut pool);
            assignment::apply_modes(
                &mut schedule,
                day,
                &input.people,
                &resolved,
                &starts,
                &mut pool,
            );
            if let Some(note) =
                assignment::cover_with_jocker(&mut schedule, day, &input.people, &resolved, &mut pool)
            {
                coverage.push(note);
            }
            assignment::distribute_pool(
                &mut schedule,
                day,
                &input.people,
                &resolved,
                &self.opts.category_priority,
                &mut pool,
            );

            let leftovers = pool.leftovers();
            if !leftovers.is_empty() {
                missing.insert(day, leftovers);
            }
        }

        Ok(GenerationResult {
            schedule,
            missing,
            coverage,
            warnings,
        })
    }
}

/// Phase de départ 4/2 de chaque personne concernée (chauffeurs,
/// chargeurs, jockers). Les rotations loader_like imposent leur phase.
fn infer_starts(
    input: &GenerationInput,
    resolved: &BTreeMap<PersonId, assignment::Resolved>,
    prev_last_day: u32,
) -> BTreeMap<PersonId, u32> {
    let mut out = BTreeMap::new();
    let mut loader_index = 0u32;
    for person in &input.people {
        match person.role {
            PersonRole::Driver | PersonRole::Jocker => {
                let start = resolved
                    .get(&person.id)
                    .and_then(assignment::Resolved::loader_phase)
                    .unwrap_or_else(|| inferred_or_cold(input, person.id, prev_last_day, 0));
                out.insert(person.id, start);
            }
            PersonRole::Loader => {
                let cold = pattern::loader_cold_start(loader_index);
                loader_index += 1;
                let start = inferred_or_cold(input, person.id, prev_last_day, cold);
                out.insert(person.id, start);
            }
            PersonRole::Supervisor | PersonRole::Helper => {}
        }
    }
    out
}

fn inferred_or_cold(
    input: &GenerationInput,
    person: PersonId,
    prev_last_day: u32,
    cold: u32,
) -> u32 {
    let slots = input
        .previous
        .as_ref()
        .map(|prev| pattern::tail_slots(prev, person, prev_last_day))
        .unwrap_or_default();
    if slots.is_empty() {
        cold
    } else {
        pattern::infer_start_index(&slots)
    }
}

/// Squelette travail/repos du mois, avant surcouches et affectations.
fn skeleton(
    input: &GenerationInput,
    starts: &BTreeMap<PersonId, u32>,
    first_of_month: NaiveDate,
    days: u32,
) -> Calendar {
    let mut calendar = Calendar::default();
    for person in &input.people {
        for day in 1..=days {
            let date = first_of_month + Duration::days(i64::from(day) - 1);
            let weekday = date.weekday().num_days_from_sunday() as u8;
            let working = match (&person.fixed_route_exception, person.role) {
                (Some(exc), _) => weekday != exc.rest_weekday,
                (None, PersonRole::Driver | PersonRole::Loader | PersonRole::Jocker) => {
                    let start = starts.get(&person.id).copied().unwrap_or(0);
                    pattern::is_work_slot(pattern::pattern_index(start, day))
                }
                (None, PersonRole::Supervisor | PersonRole::Helper) => {
                    person.rest_day1 != Some(weekday) && person.rest_day2 != Some(weekday)
                }
            };
            let cell = if working {
                Cell::work("")
            } else {
                Cell::weekend()
            };
            calendar.set(person.id, day, cell);
        }
    }
    calendar
}
