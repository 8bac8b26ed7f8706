use crate::model::{Calendar, Person, PersonId, Route, VacationRequest};
use anyhow::Context;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fs;
use std::io::Write;
use std::path::{Path, PathBuf};
use tempfile::NamedTempFile;

/// Instantané complet persisté : roster, catalogue, demandes de congés et
/// calendriers mensuels indexés par clé `"{year}-{month0}"`.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Snapshot {
    #[serde(default)]
    pub people: Vec<Person>,
    #[serde(default)]
    pub routes: Vec<Route>,
    #[serde(default)]
    pub vacations: Vec<VacationRequest>,
    #[serde(default)]
    pub calendars: BTreeMap<String, Calendar>,
}

impl Snapshot {
    /// Clé de persistance d'un mois (mois indexé 0-11).
    pub fn calendar_key(year: i32, month0: u32) -> String {
        format!("{year}-{month0}")
    }

    pub fn find_person_by_id(&self, id: PersonId) -> Option<&Person> {
        self.people.iter().find(|p| p.id == id)
    }

    pub fn find_person_by_name<'a>(&'a self, name: &str) -> Option<&'a Person> {
        self.people.iter().find(|p| p.name == name)
    }
}

pub trait Storage {
    /// Charge l'instantané depuis un support.
    fn load(&self) -> anyhow::Result<Snapshot>;
    /// Sauvegarde de manière atomique.
    fn save(&self, snapshot: &Snapshot) -> anyhow::Result<()>;
}

pub struct JsonStorage {
    path: PathBuf,
}

impl JsonStorage {
    pub fn open<P: AsRef<Path>>(path: P) -> anyhow::Result<Self> {
        Ok(Self {
            path: path.as_ref().to_path_buf(),
        })
    }
}

impl Storage for JsonStorage {
    fn load(&self) -> anyhow::Result<Snapshot> {
        let data =
            fs::read(&self.path).with_context(|| format!("reading {}", self.path.display()))?;
        let snapshot: Snapshot =
            serde_json::from_slice(&data).with_context(|| "parsing snapshot json")?;
        Ok(snapshot)
    }

    fn save(&self, snapshot: &Snapshot) -> anyhow::Result<()> {
        let json = serde_json::to_vec_pretty(snapshot)?;
        // un chemin nu ("cuadrante.json") n'a pas de parent exploitable
        let dir = match self.path.parent() {
            Some(p) if !p.as_os_str().is_empty() => p,
            _ => Path::new("."),
        };
        let mut tmp = NamedTempFile::new_in(dir).with_context(|| "creating temp file")?;
        tmp.write_all(&json)?;
        tmp.flush()?;
        tmp.as_file().sync_all()?;
        tmp.persist(&self.path).with_context(|| "atomic rename")?;
        Ok(())
    }
}
