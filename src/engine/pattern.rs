//! Rotation 4/2 : 4 jours de travail puis 2 jours de repos, sans ancrage
//! calendaire. La phase d'un nouveau mois est ré-inférée à chaque
//! génération depuis la fin du mois précédent, jamais persistée.

use crate::model::{Calendar, CellKind, PersonId};

pub(super) const CYCLE_LEN: u32 = 6;
pub(super) const WORK_SLOTS: u32 = 4;

/// Fenêtre de relecture en fin de mois précédent.
pub(super) const LOOKBACK_DAYS: u32 = 6;

/// Index dans le cycle pour `day` (1..=31) avec une phase de départ donnée.
pub(super) fn pattern_index(start_index: u32, day: u32) -> u32 {
    (start_index + day - 1) % CYCLE_LEN
}

pub(super) fn is_work_slot(index: u32) -> bool {
    index < WORK_SLOTS
}

/// Phase de départ à froid d'un chargeur : repos décalés de 2 jours entre
/// chargeurs, pour garder au moins deux chargeurs en service chaque jour.
pub(super) fn loader_cold_start(loader_index: u32) -> u32 {
    (loader_index * 2) % CYCLE_LEN
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(super) enum TailSlot {
    Work,
    Off,
}

/// Derniers jours (au plus 6) du mois précédent projetés en W/O ; les
/// cellules congés/maladie sont ignorées.
pub(super) fn tail_slots(prev: &Calendar, person: PersonId, prev_last_day: u32) -> Vec<TailSlot> {
    let from = prev_last_day.saturating_sub(LOOKBACK_DAYS - 1).max(1);
    (from..=prev_last_day)
        .filter_map(|day| prev.cell(person, day))
        .filter_map(|cell| match cell.kind {
            CellKind::Work => Some(TailSlot::Work),
            CellKind::Weekend => Some(TailSlot::Off),
            CellKind::Vacation | CellKind::Sick => None,
        })
        .collect()
}

/// Phase de reprise déduite de la traîne du mois précédent.
///
/// Règles, dans l'ordre : aucun historique → 0 ; un seul jour de repos en
/// traîne → 5 (un jour de repos encore dû) ; deux jours → 0 (repos soldé) ;
/// sinon la longueur de la traîne de travail (le modulo fera basculer en
/// repos une fois les 4 jours atteints).
pub(super) fn infer_start_index(slots: &[TailSlot]) -> u32 {
    if slots.is_empty() {
        return 0;
    }
    let off_tail = slots
        .iter()
        .rev()
        .take_while(|s| **s == TailSlot::Off)
        .count()
        .min(2) as u32;
    match off_tail {
        1 => CYCLE_LEN - 1,
        2 => 0,
        _ => {
            let work_tail = slots
                .iter()
                .rev()
                .take_while(|s| **s == TailSlot::Work)
                .count()
                .min(WORK_SLOTS as usize) as u32;
            work_tail
        }
    }
}

/// Code opérationnel d'un chargeur (tournée matin / après-midi).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(super) enum OpCode {
    Cm,
    Ct,
}

impl OpCode {
    pub(super) fn as_str(self) -> &'static str {
        match self {
            Self::Cm => "CM",
            Self::Ct => "CT",
        }
    }
    pub(super) fn flip(self) -> Self {
        match self {
            Self::Cm => Self::Ct,
            Self::Ct => Self::Cm,
        }
    }
}

/// Accumulateur CM/CT d'un chargeur pendant la boucle des jours : code
/// courant et nombre de jours travaillés consécutifs à ce code.
#[derive(Debug, Clone, Copy)]
pub(super) struct LoaderCodeState {
    value: OpCode,
    days: u32,
}

impl LoaderCodeState {
    /// Amorce à froid : le premier bloc travaillé sera CM.
    pub(super) fn cold() -> Self {
        Self {
            value: OpCode::Ct,
            days: WORK_SLOTS,
        }
    }

    pub(super) fn seeded(value: OpCode, days_held: u32) -> Self {
        Self {
            value,
            days: days_held.min(WORK_SLOTS),
        }
    }

    /// Avance d'un jour travaillé. Le code bascule au début de chaque
    /// nouveau bloc (index 0 du cycle) ou quand 4 jours au même code sont
    /// déjà écoulés (reprise à froid en milieu de bloc).
    pub(super) fn advance(&mut self, block_start: bool) -> OpCode {
        if block_start || self.days >= WORK_SLOTS {
            self.value = self.value.flip();
            self.days = 1;
        } else {
            self.days += 1;
        }
        self.value
    }
}

/// Continuité CM/CT : code du dernier jour travaillé du mois précédent et
/// nombre de jours consécutifs où il a été tenu.
pub(super) fn infer_loader_code(
    prev: &Calendar,
    person: PersonId,
    prev_last_day: u32,
) -> Option<LoaderCodeState> {
    let from = prev_last_day.saturating_sub(LOOKBACK_DAYS - 1).max(1);
    let mut day = prev_last_day;
    loop {
        if let Some(cell) = prev.cell(person, day) {
            if cell.kind == CellKind::Work {
                let code = match cell.value.as_str() {
                    "CM" => Some(OpCode::Cm),
                    "CT" => Some(OpCode::Ct),
                    _ => None,
                };
                if let Some(code) = code {
                    let mut held = 1;
                    let mut back = day;
                    while back > from {
                        back -= 1;
                        match prev.cell(person, back) {
                            Some(c) if c.kind == CellKind::Work && c.value == cell.value => {
                                held += 1
                            }
                            _ => break,
                        }
                    }
                    return Some(LoaderCodeState::seeded(code, held));
                }
            }
        }
        if day == from {
            return None;
        }
        day -= 1;
    }
}
