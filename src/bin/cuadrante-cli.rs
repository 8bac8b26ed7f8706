#![forbid(unsafe_code)]
use anyhow::{bail, Result};
use chrono::NaiveDate;
use clap::{Parser, Subcommand};
use cuadrante::{
    io,
    model::{PersonId, VacationRequest, VacationStatus},
    storage::{JsonStorage, Snapshot, Storage},
    days_in_month, summarize, Engine, GenerateOptions, GenerationInput,
};
#[cfg(feature = "logging")]
use tracing_subscriber::{fmt::Subscriber, EnvFilter};

/// CLI minimaliste de planning de flotte (sans base de données)
#[derive(Parser, Debug)]
#[command(author, version, about)]
struct Cli {
    /// Active les logs (feature `logging`)
    #[arg(long, global = true)]
    log: bool,

    /// Fichier JSON de données
    #[arg(long, global = true, default_value = "cuadrante.json")]
    data: String,

    #[command(subcommand)]
    cmd: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Importer des personnes depuis un CSV
    ImportPeople {
        #[arg(long)]
        csv: String,
    },

    /// Importer le catalogue de routes depuis un JSON
    ImportRoutes {
        #[arg(long)]
        json: String,
    },

    /// Importer des demandes de congés depuis un CSV
    ImportVacations {
        #[arg(long)]
        csv: String,
    },

    /// Ajouter une demande de congés (bornes incluses)
    AddVacation {
        #[arg(long)]
        driver: u32,
        /// YYYY-MM-DD
        #[arg(long)]
        start: String,
        /// YYYY-MM-DD
        #[arg(long)]
        end: String,
        /// pending | approved | rejected
        #[arg(long, default_value = "approved")]
        status: String,
    },

    /// Générer le calendrier d'un mois depuis le mois précédent stocké
    Generate {
        #[arg(long)]
        year: i32,
        /// Mois 1-12
        #[arg(long)]
        month: u32,
        #[arg(long, default_value_t = 2)]
        supervisor_block: u8,
        /// Export CSV du mois généré (optionnel)
        #[arg(long)]
        out_csv: Option<String>,
    },

    /// Afficher un mois stocké
    Show {
        #[arg(long)]
        year: i32,
        /// Mois 1-12
        #[arg(long)]
        month: u32,
        #[arg(long)]
        out_csv: Option<String>,
    },

    /// Statistiques d'un mois stocké
    Report {
        #[arg(long)]
        year: i32,
        /// Mois 1-12
        #[arg(long)]
        month: u32,
    },
}

fn month0_of(month: u32) -> Result<u32> {
    if !(1..=12).contains(&month) {
        bail!("month must be 1-12, got {month}");
    }
    Ok(month - 1)
}

fn parse_date(raw: &str) -> Result<NaiveDate> {
    Ok(NaiveDate::parse_from_str(raw, "%Y-%m-%d")?)
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    #[cfg(feature = "logging")]
    if cli.log {
        let _ = Subscriber::builder()
            .with_env_filter(EnvFilter::from_default_env())
            .try_init();
    }

    let storage = JsonStorage::open(&cli.data)?;
    let mut snapshot = storage.load().unwrap_or_default();

    let code = match cli.cmd {
        Commands::ImportPeople { csv } => {
            let people = io::import_people_csv(csv)?;
            snapshot.people.extend(people);
            storage.save(&snapshot)?;
            0
        }
        Commands::ImportRoutes { json } => {
            let routes = io::import_routes_json(json)?;
            snapshot.routes.extend(routes);
            storage.save(&snapshot)?;
            0
        }
        Commands::ImportVacations { csv } => {
            let vacations = io::import_vacations_csv(csv)?;
            snapshot.vacations.extend(vacations);
            storage.save(&snapshot)?;
            0
        }
        Commands::AddVacation {
            driver,
            start,
            end,
            status,
        } => {
            let status = match status.as_str() {
                "pending" => VacationStatus::Pending,
                "approved" => VacationStatus::Approved,
                "rejected" => VacationStatus::Rejected,
                other => bail!("unknown status: {other}"),
            };
            let driver = PersonId::new(driver);
            if snapshot.find_person_by_id(driver).is_none() {
                bail!("unknown person id: {}", driver);
            }
            let request =
                VacationRequest::new(driver, parse_date(&start)?, parse_date(&end)?, status)
                    .map_err(anyhow::Error::msg)?;
            snapshot.vacations.push(request);
            storage.save(&snapshot)?;
            0
        }
        Commands::Generate {
            year,
            month,
            supervisor_block,
            out_csv,
        } => {
            let month0 = month0_of(month)?;
            let (prev_year, prev_month0) = if month0 == 0 {
                (year - 1, 11)
            } else {
                (year, month0 - 1)
            };
            let previous = snapshot
                .calendars
                .get(&Snapshot::calendar_key(prev_year, prev_month0))
                .cloned();
            let engine = Engine::with_options(GenerateOptions {
                supervisor_block_len: supervisor_block,
                ..GenerateOptions::default()
            });
            let input = GenerationInput {
                people: snapshot.people.clone(),
                routes: snapshot.routes.clone(),
                vacations: snapshot.vacations.clone(),
                previous,
                year,
                month0,
            };
            let result = engine.generate(&input)?;

            for warning in &result.warnings {
                eprintln!("Warning: {warning}");
            }
            for note in &result.coverage {
                println!(
                    "jocker {} covers {} on day {} (route {})",
                    note.jocker, note.covered, note.day, note.route
                );
            }
            let gaps = !result.missing.is_empty();
            for (day, routes) in &result.missing {
                eprintln!("day {day}: no driver for {}", routes.join(", "));
            }

            if let Some(path) = out_csv {
                let days = days_in_month(year, month0)?;
                io::export_month_csv(path, &snapshot.people, &result.schedule, days)?;
            }
            snapshot
                .calendars
                .insert(Snapshot::calendar_key(year, month0), result.schedule);
            storage.save(&snapshot)?;

            if gaps {
                // Code 2 = WARNING/INCOMPLETE
                2
            } else {
                println!("OK: full coverage");
                0
            }
        }
        Commands::Show {
            year,
            month,
            out_csv,
        } => {
            let month0 = month0_of(month)?;
            let key = Snapshot::calendar_key(year, month0);
            let Some(calendar) = snapshot.calendars.get(&key) else {
                bail!("no calendar stored for {key}");
            };
            let days = days_in_month(year, month0)?;
            if let Some(path) = out_csv {
                io::export_month_csv(path, &snapshot.people, calendar, days)?;
            }
            // impression compacte
            for person in &snapshot.people {
                let row: Vec<String> = (1..=days)
                    .map(|d| {
                        calendar
                            .cell(person.id, d)
                            .map(|c| if c.value.is_empty() { "-".to_string() } else { c.value.clone() })
                            .unwrap_or_else(|| "?".to_string())
                    })
                    .collect();
                println!("{:>4} {} | {}", person.id, person.name, row.join(" "));
            }
            0
        }
        Commands::Report { year, month } => {
            let month0 = month0_of(month)?;
            let key = Snapshot::calendar_key(year, month0);
            let Some(calendar) = snapshot.calendars.get(&key) else {
                bail!("no calendar stored for {key}");
            };
            let summary = summarize(calendar, &Default::default());
            println!(
                "work {} | rest {} | vacation {} | sick {}",
                summary.work_days, summary.rest_days, summary.vacation_days, summary.sick_days
            );
            0
        }
    };

    std::process::exit(code);
}
