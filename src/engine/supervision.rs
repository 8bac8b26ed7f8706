//! Rotation GT/P des superviseurs : blocs de longueur fixe, indépendants
//! de la rotation 4/2, repos hebdomadaires propres à chaque superviseur.

use super::pattern::LOOKBACK_DAYS;
use crate::model::{Calendar, Cell, CellKind, Person, PersonId, PersonRole};
use std::collections::BTreeMap;

/// Code de service d'un superviseur.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(super) enum DutyCode {
    Gt,
    P,
}

impl DutyCode {
    pub(super) fn as_str(self) -> &'static str {
        match self {
            Self::Gt => "GT",
            Self::P => "P",
        }
    }
    fn flip(self) -> Self {
        match self {
            Self::Gt => Self::P,
            Self::P => Self::Gt,
        }
    }
}

/// État de rotation d'un superviseur pendant la boucle des jours.
#[derive(Debug, Clone, Copy, Default)]
pub(super) struct SupervisorState {
    last: Option<DutyCode>,
    days_in_role: u8,
}

impl SupervisorState {
    /// Jour travaillé normal : bascule en début de bloc, tient ensuite.
    fn advance(&mut self, block_len: u8) -> DutyCode {
        let code = if self.days_in_role == 0 {
            match self.last {
                Some(last) => last.flip(),
                None => DutyCode::Gt,
            }
        } else {
            self.last.unwrap_or(DutyCode::Gt)
        };
        self.commit(code, block_len);
        code
    }

    /// Seul superviseur en service : GT forcé, le compteur de bloc
    /// continue d'avancer comme un jour normal.
    fn advance_forced(&mut self, block_len: u8) -> DutyCode {
        self.commit(DutyCode::Gt, block_len);
        DutyCode::Gt
    }

    fn commit(&mut self, code: DutyCode, block_len: u8) {
        self.last = Some(code);
        self.days_in_role += 1;
        if self.days_in_role >= block_len {
            self.days_in_role = 0;
        }
    }

    fn rest(&mut self) {
        self.days_in_role = 0;
    }
}

/// Amorce `last` depuis le dernier code GT/P des ~6 derniers jours du mois
/// précédent ; le compteur de bloc repart à zéro.
pub(super) fn seed_states(
    supervisors: &[&Person],
    prev: Option<&Calendar>,
    prev_last_day: u32,
) -> BTreeMap<PersonId, SupervisorState> {
    let mut out = BTreeMap::new();
    for sup in supervisors {
        let mut state = SupervisorState::default();
        if let Some(prev) = prev {
            let from = prev_last_day.saturating_sub(LOOKBACK_DAYS - 1).max(1);
            for day in (from..=prev_last_day).rev() {
                let code = prev.cell(sup.id, day).and_then(|cell| {
                    if cell.kind != CellKind::Work {
                        return None;
                    }
                    match cell.value.as_str() {
                        "GT" => Some(DutyCode::Gt),
                        "P" => Some(DutyCode::P),
                        _ => None,
                    }
                });
                if let Some(code) = code {
                    state.last = Some(code);
                    break;
                }
            }
        }
        out.insert(sup.id, state);
    }
    out
}

/// Affecte les codes du jour à tous les superviseurs et met leurs états à
/// jour. Un superviseur seul en service est forcé à GT.
pub(super) fn assign_day(
    calendar: &mut Calendar,
    day: u32,
    people: &[Person],
    states: &mut BTreeMap<PersonId, SupervisorState>,
    block_len: u8,
) {
    let supervisors: Vec<&Person> = people
        .iter()
        .filter(|p| p.role == PersonRole::Supervisor)
        .collect();
    let working: Vec<PersonId> = supervisors
        .iter()
        .filter(|p| calendar.cell(p.id, day).is_some_and(Cell::is_empty_work))
        .map(|p| p.id)
        .collect();

    for sup in &supervisors {
        if !working.contains(&sup.id) {
            if let Some(state) = states.get_mut(&sup.id) {
                state.rest();
            }
        }
    }

    let singleton = working.len() == 1;
    for id in working {
        let Some(state) = states.get_mut(&id) else {
            continue;
        };
        let code = if singleton {
            state.advance_forced(block_len)
        } else {
            state.advance(block_len)
        };
        calendar.set(id, day, Cell::work(code.as_str()));
    }
}
