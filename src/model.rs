use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use uuid::Uuid;

/// Identifiant fort pour Person (entier stable fourni par la couche CRUD).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct PersonId(u32);

impl PersonId {
    pub fn new(id: u32) -> Self {
        Self(id)
    }
    pub fn get(self) -> u32 {
        self.0
    }
}

impl std::fmt::Display for PersonId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        self.0.fmt(f)
    }
}

/// Rôle d'une personne dans la flotte.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PersonRole {
    /// Chauffeur de route régulière (rotation 4/2).
    Driver,
    /// Chargeur (rotation 4/2 décalée, codes CM/CT).
    Loader,
    /// Superviseur (repos hebdomadaires, codes GT/P).
    Supervisor,
    /// Ayudante (repos hebdomadaires, pas d'affectation automatique).
    Helper,
    /// Remplaçant volant, couvre les congés.
    Jocker,
}

/// Exception nominative : une route fixe tous les jours sauf un jour de repos.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FixedRouteException {
    pub route: String,
    /// Jour de repos hebdomadaire (0 = dimanche).
    pub rest_weekday: u8,
}

/// Personne (chauffeur, chargeur, superviseur, ayudante ou jocker).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Person {
    pub id: PersonId,
    pub name: String,
    pub role: PersonRole,
    /// Étiquette de regroupement ; sert uniquement à ordonner la
    /// distribution du pool, jamais au reste de l'algorithme.
    #[serde(default)]
    pub category: String,
    /// Jours de repos hebdomadaires (0 = dimanche), superviseurs/ayudantes.
    #[serde(default)]
    pub rest_day1: Option<u8>,
    #[serde(default)]
    pub rest_day2: Option<u8>,
    /// Route attitrée en mode par défaut.
    #[serde(default)]
    pub assigned_route: Option<String>,
    /// Préférences de routes (dont secondaires), lues par la couverture jocker.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub available_routes: Vec<String>,
    #[serde(default)]
    pub fixed_route_exception: Option<FixedRouteException>,
}

impl Person {
    pub fn new<N: Into<String>>(id: u32, name: N, role: PersonRole) -> Self {
        Self {
            id: PersonId::new(id),
            name: name.into(),
            role,
            category: String::new(),
            rest_day1: None,
            rest_day2: None,
            assigned_route: None,
            available_routes: Vec::new(),
            fixed_route_exception: None,
        }
    }
}

/// Mode d'affectation d'une route.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "assignment_mode", rename_all = "snake_case")]
pub enum AssignmentMode {
    /// Route attitrée à un chauffeur via `Person::assigned_route`.
    Default,
    /// Deux routes, trois chauffeurs nommés : le volant prend la route
    /// du titulaire en repos.
    #[serde(rename = "alternating_2x2")]
    Alternating2x2 {
        primary_driver: PersonId,
        secondary_driver: PersonId,
        alternating_driver: PersonId,
        #[serde(default)]
        alternating_linked_route: Option<String>,
    },
    /// Deux routes liées, trois chauffeurs en rotation à phases fixes.
    LoaderLike {
        #[serde(default)]
        rotation_drivers: Vec<PersonId>,
        #[serde(default)]
        loader_linked_route: Option<String>,
    },
}

/// Route du catalogue. Un code à suffixe pointé ("R1.1") est une route
/// secondaire, toujours co-affectée avec sa route principale ("R1").
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Route {
    pub short_code: String,
    #[serde(flatten)]
    pub mode: AssignmentMode,
}

impl Route {
    pub fn new<C: Into<String>>(short_code: C) -> Self {
        Self {
            short_code: short_code.into(),
            mode: AssignmentMode::Default,
        }
    }

    pub fn is_secondary(&self) -> bool {
        self.short_code.contains('.')
    }
}

/// Préfixe principal d'un code de route ("R1.1" → "R1").
pub fn main_prefix(code: &str) -> &str {
    match code.split_once('.') {
        Some((main, _)) => main,
        None => code,
    }
}

/// Type d'une cellule du calendrier.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CellKind {
    Work,
    Weekend,
    Vacation,
    Sick,
}

/// Marqueur d'arrêt maladie sans date de fin connue.
pub const SICK_VALUE: &str = "BAJA";
/// Marqueur de congés approuvés.
pub const VACATION_VALUE: &str = "V";

/// Une journée pour une personne : type + valeur affichée (code de route,
/// code opérationnel CM/CT/GT/P, "MAIN+SECONDAIRE" ou vide).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Cell {
    #[serde(rename = "type")]
    pub kind: CellKind,
    #[serde(default)]
    pub value: String,
}

impl Cell {
    pub fn work<V: Into<String>>(value: V) -> Self {
        Self {
            kind: CellKind::Work,
            value: value.into(),
        }
    }
    pub fn weekend() -> Self {
        Self {
            kind: CellKind::Weekend,
            value: String::new(),
        }
    }
    pub fn vacation() -> Self {
        Self {
            kind: CellKind::Vacation,
            value: VACATION_VALUE.to_string(),
        }
    }
    pub fn sick() -> Self {
        Self {
            kind: CellKind::Sick,
            value: SICK_VALUE.to_string(),
        }
    }

    pub fn is_empty_work(&self) -> bool {
        self.kind == CellKind::Work && self.value.is_empty()
    }
}

/// Calendrier d'un mois : personne → jour (1..=jours du mois) → cellule.
/// BTreeMap pour un ordre d'itération et une sérialisation déterministes.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Calendar {
    pub cells: BTreeMap<PersonId, BTreeMap<u32, Cell>>,
}

impl Calendar {
    pub fn cell(&self, person: PersonId, day: u32) -> Option<&Cell> {
        self.cells.get(&person).and_then(|days| days.get(&day))
    }

    pub fn set(&mut self, person: PersonId, day: u32, cell: Cell) {
        self.cells.entry(person).or_default().insert(day, cell);
    }

    pub fn person_days(&self, person: PersonId) -> Option<&BTreeMap<u32, Cell>> {
        self.cells.get(&person)
    }
}

/// Statut d'une demande de congés.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum VacationStatus {
    Pending,
    Approved,
    Rejected,
}

/// Demande de congés, intervalle inclusif des deux côtés.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct VacationRequest {
    pub id: String,
    pub driver: PersonId,
    pub start: NaiveDate,
    pub end: NaiveDate,
    pub status: VacationStatus,
}

impl VacationRequest {
    /// Crée une demande en validant que `end >= start` (bornes incluses).
    pub fn new(
        driver: PersonId,
        start: NaiveDate,
        end: NaiveDate,
        status: VacationStatus,
    ) -> Result<Self, String> {
        if end < start {
            return Err("vacation end must not be before start".to_string());
        }
        Ok(Self {
            id: Uuid::new_v4().to_string(),
            driver,
            start,
            end,
            status,
        })
    }

    pub fn is_approved(&self) -> bool {
        self.status == VacationStatus::Approved
    }
}
