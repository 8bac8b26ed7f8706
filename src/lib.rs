#![forbid(unsafe_code)]
//! Cuadrante — génération du planning mensuel d'une flotte, en local.
//!
//! - Rotation 4/2 (4 jours travaillés, 2 de repos) sans ancrage calendaire,
//!   phase ré-inférée chaque mois depuis la fin du mois précédent.
//! - Trois modes de partage de route : attitrée, alternating_2x2, loader_like.
//! - Surcouches congés ("V") et arrêt maladie reporté ("BAJA").
//! - Rotation GT/P des superviseurs par blocs.
//! - Moteur pur ; stockage fichiers (JSON/CSV) à côté, sans BD.

pub mod engine;
pub mod io;
pub mod model;
pub mod storage;

pub use engine::{
    days_in_month, summarize, CoverageNote, Engine, EngineError, GenerateOptions,
    GenerationInput, GenerationResult, ScheduleSummary, ValidationWarning,
};
pub use model::{
    main_prefix, AssignmentMode, Calendar, Cell, CellKind, FixedRouteException, Person, PersonId,
    PersonRole, Route, VacationRequest, VacationStatus, SICK_VALUE, VACATION_VALUE,
};
pub use storage::{JsonStorage, Snapshot, Storage};
