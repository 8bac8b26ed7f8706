use crate::model::{
    Calendar, Person, PersonId, PersonRole, Route, VacationRequest, VacationStatus,
};
use anyhow::{bail, Context};
use chrono::NaiveDate;
use csv::{ReaderBuilder, WriterBuilder};
use std::collections::BTreeMap;
use std::fs;
use std::path::Path;

/// Import de personnes depuis CSV : header
/// `id,name,role,category[,rest_day1][,rest_day2][,assigned_route][,available_routes]`
pub fn import_people_csv<P: AsRef<Path>>(path: P) -> anyhow::Result<Vec<Person>> {
    let mut rdr = ReaderBuilder::new().has_headers(true).from_path(path)?;
    let mut out = Vec::new();
    for rec in rdr.records() {
        let rec = rec?;
        let id: u32 = rec
            .get(0)
            .context("missing id")?
            .trim()
            .parse()
            .context("invalid person id")?;
        let name = rec.get(1).context("missing name")?.trim();
        let role = parse_role(rec.get(2).context("missing role")?.trim())?;
        if name.is_empty() {
            bail!("invalid people row (empty name)");
        }
        let mut person = Person::new(id, name, role);
        if let Some(category) = rec.get(3) {
            person.category = category.trim().to_string();
        }
        person.rest_day1 = parse_weekday_opt(rec.get(4))?;
        person.rest_day2 = parse_weekday_opt(rec.get(5))?;
        if let Some(route) = rec.get(6) {
            let route = route.trim();
            if !route.is_empty() {
                person.assigned_route = Some(route.to_string());
            }
        }
        if let Some(routes) = rec.get(7) {
            person.available_routes = routes
                .split(';')
                .map(str::trim)
                .filter(|s| !s.is_empty())
                .map(str::to_string)
                .collect();
        }
        out.push(person);
    }
    Ok(out)
}

fn parse_role(s: &str) -> anyhow::Result<PersonRole> {
    match s.to_ascii_lowercase().as_str() {
        "driver" | "conductor" => Ok(PersonRole::Driver),
        "loader" | "cargador" => Ok(PersonRole::Loader),
        "supervisor" => Ok(PersonRole::Supervisor),
        "helper" | "ayudante" => Ok(PersonRole::Helper),
        "jocker" => Ok(PersonRole::Jocker),
        other => bail!("unknown role: {other}"),
    }
}

fn parse_weekday_opt(raw: Option<&str>) -> anyhow::Result<Option<u8>> {
    let Some(raw) = raw else { return Ok(None) };
    let raw = raw.trim();
    if raw.is_empty() {
        return Ok(None);
    }
    let day: u8 = raw.parse().context("invalid weekday index")?;
    if day > 6 {
        bail!("weekday index out of range: {day} (expected 0-6)");
    }
    Ok(Some(day))
}

/// Import de demandes de congés : header `driver_id,start,end[,status]`
/// (dates `YYYY-MM-DD`, bornes incluses ; statut `approved` par défaut).
pub fn import_vacations_csv<P: AsRef<Path>>(path: P) -> anyhow::Result<Vec<VacationRequest>> {
    let mut rdr = ReaderBuilder::new().has_headers(true).from_path(path)?;
    let mut out = Vec::new();
    for rec in rdr.records() {
        let rec = rec?;
        let driver: u32 = rec
            .get(0)
            .context("missing driver_id")?
            .trim()
            .parse()
            .context("invalid driver id")?;
        let start = parse_date(rec.get(1).context("missing start")?.trim())?;
        let end = parse_date(rec.get(2).context("missing end")?.trim())?;
        let status = match rec.get(3).map(str::trim) {
            None | Some("") | Some("approved") => VacationStatus::Approved,
            Some("pending") => VacationStatus::Pending,
            Some("rejected") => VacationStatus::Rejected,
            Some(other) => bail!("unknown vacation status: {other}"),
        };
        let request = VacationRequest::new(PersonId::new(driver), start, end, status)
            .map_err(anyhow::Error::msg)?;
        out.push(request);
    }
    Ok(out)
}

fn parse_date(raw: &str) -> anyhow::Result<NaiveDate> {
    NaiveDate::parse_from_str(raw, "%Y-%m-%d").with_context(|| format!("invalid date: {raw}"))
}

/// Import du catalogue de routes (JSON, modes inclus).
pub fn import_routes_json<P: AsRef<Path>>(path: P) -> anyhow::Result<Vec<Route>> {
    let data = fs::read(&path)
        .with_context(|| format!("reading {}", path.as_ref().display()))?;
    let routes: Vec<Route> =
        serde_json::from_slice(&data).with_context(|| "parsing routes json")?;
    Ok(routes)
}

/// Export CSV d'un mois : une ligne par personne, une colonne par jour.
pub fn export_month_csv<P: AsRef<Path>>(
    path: P,
    people: &[Person],
    calendar: &Calendar,
    days: u32,
) -> anyhow::Result<()> {
    let mut w = WriterBuilder::new().has_headers(false).from_path(path)?;
    let mut header = vec!["id".to_string(), "name".to_string()];
    header.extend((1..=days).map(|d| d.to_string()));
    w.write_record(&header)?;
    for person in people {
        let mut row = vec![person.id.to_string(), person.name.clone()];
        for day in 1..=days {
            let value = calendar
                .cell(person.id, day)
                .map(|c| c.value.clone())
                .unwrap_or_default();
            row.push(value);
        }
        w.write_record(&row)?;
    }
    w.flush()?;
    Ok(())
}

/// Export CSV du rapport de routes sans chauffeur : header `day,route`.
pub fn export_missing_csv<P: AsRef<Path>>(
    path: P,
    missing: &BTreeMap<u32, Vec<String>>,
) -> anyhow::Result<()> {
    let mut w = WriterBuilder::new().has_headers(true).from_path(path)?;
    w.write_record(["day", "route"])?;
    for (day, routes) in missing {
        for route in routes {
            w.write_record([day.to_string().as_str(), route.as_str()])?;
        }
    }
    w.flush()?;
    Ok(())
}
