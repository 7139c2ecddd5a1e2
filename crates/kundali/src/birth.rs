//! Birth data and its validation.

use chrono::{Datelike, NaiveDateTime};
use lazy_static::lazy_static;
use regex::Regex;
use serde::{Deserialize, Serialize};

use crate::ephemeris::{Ayanamsa, GeoLocation};
use crate::error::{KundaliError, Result};
use crate::settings::EngineSettings;

pub const MIN_ALTITUDE: f64 = -500.0;
pub const MAX_ALTITUDE: f64 = 10_000.0;

lazy_static! {
    static ref TIMEZONE_PATTERN: Regex =
        Regex::new(r"^(UTC|[A-Z][A-Za-z_+\-]*(/[A-Za-z0-9_+\-]+){1,2})$")
            .unwrap_or_else(|e| panic!("timezone pattern does not compile: {e}"));
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum HouseSystem {
    #[default]
    WholeSign,
    Placidus,
    Koch,
    Equal,
}

/// A birth as recorded: civil time in a named zone plus where it happened.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BirthMoment {
    /// Local civil date and time
    pub civil: NaiveDateTime,
    /// IANA timezone name, e.g. "Asia/Kolkata"
    pub timezone: String,
    pub latitude: f64,
    pub longitude: f64,
    /// Metres above sea level
    #[serde(default)]
    pub altitude: f64,
    /// How far off the recorded time may be, minutes
    #[serde(default, rename = "uncertaintyMinutes", alias = "uncertainty_minutes")]
    pub uncertainty_minutes: u32,
    #[serde(default)]
    pub ayanamsa: Ayanamsa,
    #[serde(default, rename = "houseSystem", alias = "house_system")]
    pub house_system: HouseSystem,
}

impl BirthMoment {
    pub fn new(civil: NaiveDateTime, timezone: &str, latitude: f64, longitude: f64) -> Self {
        Self {
            civil,
            timezone: timezone.to_string(),
            latitude,
            longitude,
            altitude: 0.0,
            uncertainty_minutes: 0,
            ayanamsa: Ayanamsa::default(),
            house_system: HouseSystem::default(),
        }
    }

    pub fn with_uncertainty(mut self, minutes: u32) -> Self {
        self.uncertainty_minutes = minutes;
        self
    }

    pub fn with_altitude(mut self, metres: f64) -> Self {
        self.altitude = metres;
        self
    }

    pub fn with_ayanamsa(mut self, ayanamsa: Ayanamsa) -> Self {
        self.ayanamsa = ayanamsa;
        self
    }

    pub fn location(&self) -> GeoLocation {
        GeoLocation {
            lat: self.latitude,
            lon: self.longitude,
            altitude: self.altitude,
        }
    }

    /// Reject anything the engine cannot chart.
    pub fn validate(&self, settings: &EngineSettings) -> Result<()> {
        let year = self.civil.year();
        if year < settings.min_birth_year || year > settings.max_birth_year {
            return Err(KundaliError::invalid(
                "civil",
                format!(
                    "year {year} is outside {}..={}",
                    settings.min_birth_year, settings.max_birth_year
                ),
            ));
        }
        if !self.latitude.is_finite() || !(-90.0..=90.0).contains(&self.latitude) {
            return Err(KundaliError::invalid(
                "latitude",
                format!("{} is outside -90..=90", self.latitude),
            ));
        }
        if !self.longitude.is_finite() || !(-180.0..=180.0).contains(&self.longitude) {
            return Err(KundaliError::invalid(
                "longitude",
                format!("{} is outside -180..=180", self.longitude),
            ));
        }
        if !self.altitude.is_finite() || !(MIN_ALTITUDE..=MAX_ALTITUDE).contains(&self.altitude) {
            return Err(KundaliError::invalid(
                "altitude",
                format!("{} m is outside {MIN_ALTITUDE}..={MAX_ALTITUDE}", self.altitude),
            ));
        }
        if self.uncertainty_minutes > settings.max_uncertainty_minutes {
            return Err(KundaliError::invalid(
                "uncertainty_minutes",
                format!(
                    "{} exceeds the maximum of {}",
                    self.uncertainty_minutes, settings.max_uncertainty_minutes
                ),
            ));
        }
        if !TIMEZONE_PATTERN.is_match(&self.timezone) {
            return Err(KundaliError::invalid(
                "timezone",
                format!("'{}' is not an IANA timezone name", self.timezone),
            ));
        }
        if self.house_system != HouseSystem::WholeSign {
            return Err(KundaliError::invalid(
                "house_system",
                format!("{:?} is not supported, only whole-sign houses are", self.house_system),
            ));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    fn birth() -> BirthMoment {
        let civil = NaiveDate::from_ymd_opt(1985, 7, 21)
            .unwrap()
            .and_hms_opt(14, 5, 0)
            .unwrap();
        BirthMoment::new(civil, "Europe/London", 51.5, -0.12)
    }

    #[test]
    fn test_valid_birth_passes() {
        birth().validate(&EngineSettings::default()).unwrap();
        let mut utc = birth();
        utc.timezone = "UTC".to_string();
        utc.validate(&EngineSettings::default()).unwrap();
        let mut nested = birth();
        nested.timezone = "America/Argentina/Buenos_Aires".to_string();
        nested.validate(&EngineSettings::default()).unwrap();
    }

    #[test]
    fn test_each_field_is_checked() {
        let settings = EngineSettings::default();
        let cases: Vec<(BirthMoment, &str)> = vec![
            (BirthMoment { latitude: 91.0, ..birth() }, "latitude"),
            (BirthMoment { longitude: -180.5, ..birth() }, "longitude"),
            (birth().with_altitude(12_000.0), "altitude"),
            (birth().with_uncertainty(11), "uncertainty_minutes"),
            (BirthMoment { timezone: "london".to_string(), ..birth() }, "timezone"),
            (BirthMoment { house_system: HouseSystem::Placidus, ..birth() }, "house_system"),
        ];
        for (moment, expected) in cases {
            match moment.validate(&settings) {
                Err(KundaliError::InvalidInput { field, .. }) => assert_eq!(field, expected),
                other => panic!("expected InvalidInput for {expected}, got {other:?}"),
            }
        }
    }

    #[test]
    fn test_year_range_comes_from_settings() {
        let mut old = birth();
        old.civil = NaiveDate::from_ymd_opt(1899, 12, 31)
            .unwrap()
            .and_hms_opt(23, 0, 0)
            .unwrap();
        assert!(old.validate(&EngineSettings::default()).is_err());
        let relaxed = EngineSettings {
            min_birth_year: 1800,
            ..EngineSettings::default()
        };
        old.validate(&relaxed).unwrap();
    }
}
