use crate::model::{Calendar, PersonId};
use std::collections::BTreeMap;
use thiserror::Error;

/// Options de génération.
#[derive(Debug, Clone)]
pub struct GenerateOptions {
    /// Longueur de bloc GT/P des superviseurs.
    pub supervisor_block_len: u8,
    /// Ordre de priorité des catégories pour la distribution du pool ;
    /// les catégories absentes passent après, dans l'ordre du roster.
    pub category_priority: Vec<String>,
}

impl Default for GenerateOptions {
    fn default() -> Self {
        Self {
            supervisor_block_len: 2,
            category_priority: Vec::new(),
        }
    }
}

/// Avertissements de validation du catalogue ; la génération continue en
/// mode dégradé, l'appelant décide quoi en faire.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ValidationWarning {
    /// Route alternating_2x2 sans `alternating_linked_route`.
    AlternatingLinkMissing { route: String },
    /// Route loader_like avec moins de trois chauffeurs configurés.
    LoaderRotationIncomplete { route: String, configured: usize },
}

impl std::fmt::Display for ValidationWarning {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::AlternatingLinkMissing { route } => {
                write!(f, "route {route}: alternating_2x2 without linked route")
            }
            Self::LoaderRotationIncomplete { route, configured } => {
                write!(
                    f,
                    "route {route}: loader_like rotation has {configured} driver(s), expected 3"
                )
            }
        }
    }
}

/// Trace d'une couverture de congés par un jocker.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CoverageNote {
    pub day: u32,
    pub jocker: PersonId,
    pub covered: PersonId,
    pub route: String,
}

/// Résultat d'une génération : calendrier + routes restées sans chauffeur
/// par jour (ordre du pool : principales puis secondaires).
#[derive(Debug, Clone)]
pub struct GenerationResult {
    pub schedule: Calendar,
    pub missing: BTreeMap<u32, Vec<String>>,
    pub coverage: Vec<CoverageNote>,
    pub warnings: Vec<ValidationWarning>,
}

#[derive(Error, Debug)]
pub enum EngineError {
    #[error("invalid month index: {0} (expected 0-11)")]
    InvalidMonth(u32),
    #[error("invalid date: year {year}, month index {month0}")]
    InvalidDate { year: i32, month0: u32 },
    #[error(transparent)]
    Other(#[from] anyhow::Error),
}
