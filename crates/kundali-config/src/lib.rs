use anyhow::Context;
use chrono::{DateTime, NaiveDate, NaiveTime, Utc};
use kundali::ephemeris::BodyMotion;
use kundali::{Ayanamsa, BirthMoment, Body, EngineSettings, HouseSystem, LinearEphemeris};
use serde::Deserialize;
use std::collections::BTreeMap;
use std::fs;
use std::path::Path;

/// A birth to chart together with the anchor sample to chart it from.
#[derive(Debug, Clone)]
pub struct ChartRequest {
    pub birth: BirthMoment,
    pub ephemeris: LinearEphemeris,
    /// Query instant; `None` asks for the natal report only
    pub at: Option<DateTime<Utc>>,
}

#[derive(Debug, Clone, Deserialize)]
struct BirthToml {
    date: String,
    time: String,
    timezone: String,
    latitude: f64,
    longitude: f64,
    #[serde(default)]
    altitude: f64,
    #[serde(default)]
    uncertainty_minutes: u32,
    #[serde(default)]
    ayanamsa: Ayanamsa,
    #[serde(default)]
    house_system: HouseSystem,
}

#[derive(Debug, Clone, Deserialize)]
struct EphemerisToml {
    epoch: String,
    ascendant: f64,
    #[serde(default)]
    ascendant_rate: Option<f64>,
    #[serde(default)]
    ayanamsa: Ayanamsa,
    bodies: BTreeMap<String, BodyMotion>,
    #[serde(default)]
    timezones: BTreeMap<String, i32>,
}

#[derive(Debug, Clone, Deserialize)]
struct QueryToml {
    at: String,
}

#[derive(Debug, Clone, Deserialize)]
struct RequestToml {
    birth: BirthToml,
    ephemeris: EphemerisToml,
    #[serde(default)]
    query: Option<QueryToml>,
}

/// Matches the daemon behavior: try common relative paths for `configs/kundali.toml`.
pub fn read_config_text() -> anyhow::Result<String> {
    let paths = ["configs/kundali.toml", "../../configs/kundali.toml"];
    for p in &paths {
        if let Ok(c) = fs::read_to_string(p) {
            return Ok(c);
        }
    }
    anyhow::bail!("Could not load kundali.toml from {:?}", paths);
}

/// Engine settings from `configs/kundali.toml`, or from `path` when given.
pub fn load_engine_settings(path: Option<&Path>) -> anyhow::Result<EngineSettings> {
    let text = match path {
        Some(p) => fs::read_to_string(p)
            .with_context(|| format!("Failed to read config {}", p.display()))?,
        None => read_config_text()?,
    };
    EngineSettings::from_toml_str(&text)
}

pub fn parse_instant(text: &str) -> anyhow::Result<DateTime<Utc>> {
    let parsed = DateTime::parse_from_rfc3339(text)
        .with_context(|| format!("'{text}' is not an RFC 3339 timestamp"))?;
    Ok(parsed.with_timezone(&Utc))
}

fn body_named(name: &str) -> anyhow::Result<Body> {
    Body::ALL
        .iter()
        .copied()
        .find(|b| b.name().eq_ignore_ascii_case(name))
        .ok_or_else(|| anyhow::anyhow!("Unknown body '{name}' in [ephemeris.bodies]"))
}

pub fn parse_request(text: &str) -> anyhow::Result<ChartRequest> {
    let root: RequestToml = toml::from_str(text).context("Failed to parse chart request")?;
    let RequestToml { birth, ephemeris, query } = root;

    let date = NaiveDate::parse_from_str(&birth.date, "%Y-%m-%d")
        .with_context(|| format!("birth.date '{}' is not YYYY-MM-DD", birth.date))?;
    let time = NaiveTime::parse_from_str(&birth.time, "%H:%M:%S")
        .or_else(|_| NaiveTime::parse_from_str(&birth.time, "%H:%M"))
        .with_context(|| format!("birth.time '{}' is not HH:MM[:SS]", birth.time))?;

    let moment = BirthMoment {
        civil: date.and_time(time),
        timezone: birth.timezone,
        latitude: birth.latitude,
        longitude: birth.longitude,
        altitude: birth.altitude,
        uncertainty_minutes: birth.uncertainty_minutes,
        ayanamsa: birth.ayanamsa,
        house_system: birth.house_system,
    };

    let mut provider = LinearEphemeris::new(parse_instant(&ephemeris.epoch)?, ephemeris.ascendant);
    provider.ayanamsa = ephemeris.ayanamsa;
    if let Some(rate) = ephemeris.ascendant_rate {
        provider = provider.with_ascendant_rate(rate);
    }
    for (name, motion) in &ephemeris.bodies {
        provider = provider.with_body(body_named(name)?, motion.longitude, motion.speed);
    }
    for (zone, offset) in &ephemeris.timezones {
        provider = provider.with_timezone(zone, *offset);
    }

    let at = query.map(|q| parse_instant(&q.at)).transpose()?;
    Ok(ChartRequest {
        birth: moment,
        ephemeris: provider,
        at,
    })
}

pub fn load_request(path: &Path) -> anyhow::Result<ChartRequest> {
    let text = fs::read_to_string(path)
        .with_context(|| format!("Failed to read request {}", path.display()))?;
    parse_request(&text).with_context(|| format!("Invalid request in {}", path.display()))
}
