//! Lecture pure du résultat : statistiques d'un calendrier généré.

use super::types::GenerationResult;
use crate::model::{Calendar, CellKind};
use serde::Serialize;
use std::collections::BTreeMap;

/// Statistiques dérivées en une passe sur le calendrier fini.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct ScheduleSummary {
    pub work_days: u32,
    pub rest_days: u32,
    pub vacation_days: u32,
    pub sick_days: u32,
    /// Jours ayant au moins une route sans chauffeur.
    pub days_with_gaps: u32,
    /// Total de créneaux de route restés vides sur le mois.
    pub unfilled_slots: u32,
}

pub fn summarize(schedule: &Calendar, missing: &BTreeMap<u32, Vec<String>>) -> ScheduleSummary {
    let mut summary = ScheduleSummary::default();
    for days in schedule.cells.values() {
        for cell in days.values() {
            match cell.kind {
                CellKind::Work => summary.work_days += 1,
                CellKind::Weekend => summary.rest_days += 1,
                CellKind::Vacation => summary.vacation_days += 1,
                CellKind::Sick => summary.sick_days += 1,
            }
        }
    }
    summary.days_with_gaps = missing.len() as u32;
    summary.unfilled_slots = missing.values().map(|v| v.len() as u32).sum();
    summary
}

impl GenerationResult {
    pub fn summary(&self) -> ScheduleSummary {
        summarize(&self.schedule, &self.missing)
    }
}
