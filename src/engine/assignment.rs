//! Résolution des affectations de routes : un mode résolu une fois par
//! personne avant la boucle des jours, puis un pool de codes consommé
//! jour par jour (au plus une personne par route principale et par jour).

use super::pattern;
use super::types::{CoverageNote, ValidationWarning};
use crate::model::{
    main_prefix, AssignmentMode, Calendar, CellKind, Cell, Person, PersonId, PersonRole, Route,
};
use std::collections::BTreeMap;

/// Phases fixes des trois rôles d'une rotation loader_like.
const LOADER_LIKE_PHASES: [u32; 3] = [4, 0, 2];

/// Affectation résolue d'une personne, valable pour tout le mois.
#[derive(Debug, Clone, PartialEq, Eq)]
pub(super) enum Resolved {
    /// Route fixe tous les jours sauf un jour de repos hebdomadaire.
    FixedException { route: String },
    /// Titulaire de la route X d'une paire alternating_2x2.
    AlternatingPrimary { route: String },
    /// Titulaire de la route Y liée.
    AlternatingSecondary { route: String },
    /// Volant : X quand le titulaire principal se repose, sinon Y quand
    /// le titulaire secondaire se repose.
    AlternatingFloat {
        primary: PersonId,
        secondary: PersonId,
        route_x: String,
        route_y: Option<String>,
    },
    /// Rotation à trois sur deux routes liées, phase fixe par rôle.
    LoaderRotation {
        role: u32,
        phase: u32,
        route_x: String,
        route_y: Option<String>,
    },
    /// Route attitrée simple.
    DefaultRoute { route: String },
    Unassigned,
}

impl Resolved {
    /// Route principale désignée, pour la couverture jocker.
    pub(super) fn designated_route(&self) -> Option<&str> {
        match self {
            Self::FixedException { route }
            | Self::AlternatingPrimary { route }
            | Self::AlternatingSecondary { route }
            | Self::DefaultRoute { route } => Some(route),
            _ => None,
        }
    }

    pub(super) fn loader_phase(&self) -> Option<u32> {
        match self {
            Self::LoaderRotation { phase, .. } => Some(*phase),
            _ => None,
        }
    }
}

/// Contrôles de cohérence du catalogue ; la génération continue en mode
/// dégradé quand une route est incomplète.
pub(super) fn validate_routes(routes: &[Route]) -> Vec<ValidationWarning> {
    let mut out = Vec::new();
    for route in routes {
        match &route.mode {
            AssignmentMode::Alternating2x2 {
                alternating_linked_route: None,
                ..
            } => out.push(ValidationWarning::AlternatingLinkMissing {
                route: route.short_code.clone(),
            }),
            AssignmentMode::LoaderLike {
                rotation_drivers, ..
            } if rotation_drivers.len() < 3 => {
                out.push(ValidationWarning::LoaderRotationIncomplete {
                    route: route.short_code.clone(),
                    configured: rotation_drivers.len(),
                })
            }
            _ => {}
        }
    }
    out
}

/// Résout le mode d'affectation de chaque chauffeur régulier. Priorité :
/// rôle principal, sinon rôle secondaire, sinon première mention dans le
/// catalogue, sinon la route attitrée de la personne.
pub(super) fn resolve_all(people: &[Person], routes: &[Route]) -> BTreeMap<PersonId, Resolved> {
    let mut out = BTreeMap::new();
    for person in people {
        if person.role != PersonRole::Driver {
            continue;
        }
        out.insert(person.id, resolve_person(person, routes));
    }
    out
}

fn resolve_person(person: &Person, routes: &[Route]) -> Resolved {
    if let Some(exc) = &person.fixed_route_exception {
        return Resolved::FixedException {
            route: exc.route.clone(),
        };
    }

    let mut primary_match = None;
    let mut secondary_match = None;
    let mut first_match = None;

    for route in routes {
        match &route.mode {
            AssignmentMode::Alternating2x2 {
                primary_driver,
                secondary_driver,
                alternating_driver,
                alternating_linked_route,
            } => {
                if *primary_driver == person.id && primary_match.is_none() {
                    primary_match = Some(Resolved::AlternatingPrimary {
                        route: route.short_code.clone(),
                    });
                }
                if *secondary_driver == person.id && secondary_match.is_none() {
                    secondary_match = Some(match alternating_linked_route {
                        Some(linked) => Resolved::AlternatingSecondary {
                            route: linked.clone(),
                        },
                        // Route liée absente : signalée par validate_routes,
                        // le titulaire secondaire retombe dans le pool.
                        None => Resolved::Unassigned,
                    });
                }
                if *alternating_driver == person.id && first_match.is_none() {
                    first_match = Some(Resolved::AlternatingFloat {
                        primary: *primary_driver,
                        secondary: *secondary_driver,
                        route_x: route.short_code.clone(),
                        route_y: alternating_linked_route.clone(),
                    });
                }
            }
            AssignmentMode::LoaderLike {
                rotation_drivers,
                loader_linked_route,
            } => {
                if let Some(pos) = rotation_drivers.iter().position(|d| *d == person.id) {
                    if first_match.is_none() && pos < LOADER_LIKE_PHASES.len() {
                        first_match = Some(Resolved::LoaderRotation {
                            role: pos as u32,
                            phase: LOADER_LIKE_PHASES[pos],
                            route_x: route.short_code.clone(),
                            route_y: loader_linked_route.clone(),
                        });
                    }
                }
            }
            AssignmentMode::Default => {}
        }
    }

    primary_match
        .or(secondary_match)
        .or(first_match)
        .or_else(|| {
            person
                .assigned_route
                .clone()
                .map(|route| Resolved::DefaultRoute { route })
        })
        .unwrap_or(Resolved::Unassigned)
}

/// Pool de codes d'un jour : routes principales d'abord (ordre du
/// catalogue), secondaires ensuite. Consommé au fil des affectations ;
/// ce qui reste en fin de journée devient le rapport `missing`.
#[derive(Debug, Clone)]
pub(super) struct DayPool {
    mains: Vec<String>,
    secondaries: Vec<String>,
}

impl DayPool {
    pub(super) fn new(routes: &[Route]) -> Self {
        let mut mains = Vec::new();
        let mut secondaries = Vec::new();
        for route in routes {
            if route.is_secondary() {
                secondaries.push(route.short_code.clone());
            } else {
                mains.push(route.short_code.clone());
            }
        }
        Self { mains, secondaries }
    }

    fn take_main(&mut self, code: &str) -> bool {
        match self.mains.iter().position(|c| c == code) {
            Some(pos) => {
                self.mains.remove(pos);
                true
            }
            None => false,
        }
    }

    fn take_first_main(&mut self) -> Option<String> {
        if self.mains.is_empty() {
            None
        } else {
            Some(self.mains.remove(0))
        }
    }

    fn take_secondary(&mut self, code: &str) -> bool {
        match self.secondaries.iter().position(|c| c == code) {
            Some(pos) => {
                self.secondaries.remove(pos);
                true
            }
            None => false,
        }
    }

    fn take_secondary_of(&mut self, main: &str) -> Option<String> {
        let pos = self.secondaries.iter().position(|c| main_prefix(c) == main)?;
        Some(self.secondaries.remove(pos))
    }

    fn has_main(&self, code: &str) -> bool {
        self.mains.iter().any(|c| c == code)
    }

    pub(super) fn leftovers(self) -> Vec<String> {
        let mut out = self.mains;
        out.extend(self.secondaries);
        out
    }
}

/// Valeur de cellule pour une route principale déjà retirée du pool :
/// la secondaire pointée éventuelle est accolée avec `+`.
fn route_value(pool: &mut DayPool, main: &str) -> String {
    match pool.take_secondary_of(main) {
        Some(sec) => format!("{main}+{sec}"),
        None => main.to_string(),
    }
}

/// Pré-remplit les personnes à route fixe, hors distribution générique.
pub(super) fn apply_fixed(
    calendar: &mut Calendar,
    day: u32,
    people: &[Person],
    resolved: &BTreeMap<PersonId, Resolved>,
    pool: &mut DayPool,
) {
    for person in people {
        let Some(Resolved::FixedException { route }) = resolved.get(&person.id) else {
            continue;
        };
        let Some(cell) = calendar.cell(person.id, day) else {
            continue;
        };
        if cell.is_empty_work() && pool.take_main(route) {
            let value = route_value(pool, route);
            calendar.set(person.id, day, Cell::work(value));
        }
    }
}

/// Affectations par mode (titulaires, volant, rotations loader_like,
/// routes attitrées), dans l'ordre du roster.
pub(super) fn apply_modes(
    calendar: &mut Calendar,
    day: u32,
    people: &[Person],
    resolved: &BTreeMap<PersonId, Resolved>,
    starts: &BTreeMap<PersonId, u32>,
    pool: &mut DayPool,
) {
    for person in people {
        let Some(assignment) = resolved.get(&person.id) else {
            continue;
        };
        match assignment {
            Resolved::AlternatingPrimary { route }
            | Resolved::AlternatingSecondary { route }
            | Resolved::DefaultRoute { route } => {
                let on_duty = calendar
                    .cell(person.id, day)
                    .is_some_and(Cell::is_empty_work);
                if on_duty && pool.take_main(route) {
                    let value = route_value(pool, route);
                    calendar.set(person.id, day, Cell::work(value));
                }
            }
            Resolved::AlternatingFloat {
                primary,
                secondary,
                route_x,
                route_y,
            } => {
                let wanted = if resting(starts, *primary, day) {
                    Some(route_x.clone())
                } else if resting(starts, *secondary, day) {
                    route_y.clone()
                } else {
                    None
                };
                let Some(route) = wanted else { continue };
                // Le volant est mis au travail même sur un de ses jours
                // de repos : sa couverture suit les titulaires.
                let overridable = matches!(
                    calendar.cell(person.id, day).map(|c| c.kind),
                    Some(CellKind::Work) | Some(CellKind::Weekend)
                );
                let occupied = calendar
                    .cell(person.id, day)
                    .is_some_and(|c| c.kind == CellKind::Work && !c.value.is_empty());
                if overridable && !occupied && pool.take_main(&route) {
                    let value = route_value(pool, &route);
                    calendar.set(person.id, day, Cell::work(value));
                }
            }
            Resolved::LoaderRotation {
                role,
                phase,
                route_x,
                route_y,
            } => {
                let on_duty = calendar
                    .cell(person.id, day)
                    .is_some_and(Cell::is_empty_work);
                if !on_duty {
                    continue;
                }
                let cycles = (phase + day - 1) / 6;
                let use_x = (cycles % 2 == 0) != (*role == 2);
                let code = if use_x {
                    Some(route_x.clone())
                } else {
                    route_y.clone()
                };
                if let Some(code) = code {
                    if pool.take_main(&code) {
                        let value = route_value(pool, &code);
                        calendar.set(person.id, day, Cell::work(value));
                    }
                }
            }
            Resolved::FixedException { .. } | Resolved::Unassigned => {}
        }
    }
}

fn resting(starts: &BTreeMap<PersonId, u32>, person: PersonId, day: u32) -> bool {
    // Référence pendante : jamais en repos, le volant ne couvre rien.
    starts
        .get(&person)
        .is_some_and(|start| !pattern::is_work_slot(pattern::pattern_index(*start, day)))
}

/// Couverture jocker : au plus une par jour, pour la route désignée d'une
/// personne en congés ce jour-là. La préférence de secondaire explicite
/// de la personne couverte est honorée si elle est encore disponible.
pub(super) fn cover_with_jocker(
    calendar: &mut Calendar,
    day: u32,
    people: &[Person],
    resolved: &BTreeMap<PersonId, Resolved>,
    pool: &mut DayPool,
) -> Option<CoverageNote> {
    let vacationer = people.iter().find(|p| {
        calendar
            .cell(p.id, day)
            .is_some_and(|c| c.kind == CellKind::Vacation)
            && resolved
                .get(&p.id)
                .and_then(Resolved::designated_route)
                .is_some_and(|route| pool.has_main(route))
    })?;
    let jocker = people.iter().find(|p| {
        p.role == PersonRole::Jocker
            && calendar
                .cell(p.id, day)
                .is_some_and(Cell::is_empty_work)
    })?;

    let route = resolved
        .get(&vacationer.id)
        .and_then(Resolved::designated_route)?
        .to_string();
    if !pool.take_main(&route) {
        return None;
    }
    let preferred = vacationer
        .available_routes
        .iter()
        .find(|code| main_prefix(code) == route && pool.take_secondary(code))
        .cloned();
    let secondary = preferred.or_else(|| pool.take_secondary_of(&route));
    let value = match secondary {
        Some(sec) => format!("{route}+{sec}"),
        None => route.clone(),
    };
    calendar.set(jocker.id, day, Cell::work(value));

    Some(CoverageNote {
        day,
        jocker: jocker.id,
        covered: vacationer.id,
        route,
    })
}

/// Distribution générique : les chauffeurs en service encore sans valeur
/// consomment le pool, par priorité de catégorie puis ordre du roster.
pub(super) fn distribute_pool(
    calendar: &mut Calendar,
    day: u32,
    people: &[Person],
    resolved: &BTreeMap<PersonId, Resolved>,
    category_priority: &[String],
    pool: &mut DayPool,
) {
    let mut candidates: Vec<(usize, usize, PersonId)> = people
        .iter()
        .enumerate()
        .filter(|(_, p)| {
            p.role == PersonRole::Driver
                && matches!(resolved.get(&p.id), Some(Resolved::Unassigned))
                && calendar.cell(p.id, day).is_some_and(Cell::is_empty_work)
        })
        .map(|(idx, p)| {
            let rank = category_priority
                .iter()
                .position(|c| *c == p.category)
                .unwrap_or(usize::MAX);
            (rank, idx, p.id)
        })
        .collect();
    candidates.sort();

    for (_, _, id) in candidates {
        let Some(main) = pool.take_first_main() else {
            break;
        };
        let value = route_value(pool, &main);
        calendar.set(id, day, Cell::work(value));
    }
}
