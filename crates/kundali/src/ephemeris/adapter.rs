use crate::ephemeris::types::{Ayanamsa, Body, BodyPosition, EphemerisSample, GeoLocation};
use crate::vedic::zodiac::normalize_degrees;
use chrono::{DateTime, FixedOffset, NaiveDateTime, TimeZone, Utc};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use thiserror::Error;

/// Mean sidereal motion of the ascendant, degrees per day.
pub const ASCENDANT_DAILY_MOTION: f64 = 360.985_647;

const MILLIS_PER_DAY: f64 = 86_400_000.0;

/// Errors that can occur while sourcing positions
#[derive(Error, Debug)]
pub enum EphemerisError {
    #[error("No position supplied for {body} at {instant}")]
    MissingBody { body: Body, instant: DateTime<Utc> },
    #[error("Unknown timezone: {timezone}")]
    UnknownTimezone { timezone: String },
    #[error("Civil time {civil} does not map to a single instant in {timezone}")]
    AmbiguousLocalTime { civil: NaiveDateTime, timezone: String },
    #[error("Non-finite longitude for {body}")]
    NonFinite { body: Body },
    #[error("Inconsistent sample: {message}")]
    Inconsistent { message: String },
    #[error("{0}")]
    Unavailable(String),
}

/// Source of raw sidereal positions. The engine never computes longitudes itself.
pub trait EphemerisProvider {
    /// Resolve a civil date-time in a named timezone to a UT instant.
    fn to_universal(
        &self,
        civil: NaiveDateTime,
        timezone: &str,
    ) -> Result<DateTime<Utc>, EphemerisError>;

    /// Ascendant and all nine body positions at `instant`.
    fn sample(
        &self,
        instant: DateTime<Utc>,
        location: &GeoLocation,
        ayanamsa: Ayanamsa,
    ) -> Result<EphemerisSample, EphemerisError>;
}

impl<P: EphemerisProvider + ?Sized> EphemerisProvider for &P {
    fn to_universal(
        &self,
        civil: NaiveDateTime,
        timezone: &str,
    ) -> Result<DateTime<Utc>, EphemerisError> {
        (**self).to_universal(civil, timezone)
    }

    fn sample(
        &self,
        instant: DateTime<Utc>,
        location: &GeoLocation,
        ayanamsa: Ayanamsa,
    ) -> Result<EphemerisSample, EphemerisError> {
        (**self).sample(instant, location, ayanamsa)
    }
}

/// Longitude and daily rate of one body at the anchor epoch.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct BodyMotion {
    pub longitude: f64,
    #[serde(default)]
    pub speed: f64,
}

fn default_ascendant_rate() -> f64 {
    ASCENDANT_DAILY_MOTION
}

/// Provider that extrapolates one anchor sample at constant daily rates.
///
/// Good enough for fixtures and short perturbation windows; it is not an
/// astronomical model. Timezones resolve through a fixed offset table.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LinearEphemeris {
    pub epoch: DateTime<Utc>,
    #[serde(default)]
    pub ayanamsa: Ayanamsa,
    pub ascendant: f64,
    #[serde(default = "default_ascendant_rate")]
    pub ascendant_rate: f64,
    #[serde(default)]
    pub bodies: BTreeMap<Body, BodyMotion>,
    /// Minutes east of UTC, keyed by IANA name
    #[serde(default)]
    pub timezones: BTreeMap<String, i32>,
}

impl LinearEphemeris {
    pub fn new(epoch: DateTime<Utc>, ascendant: f64) -> Self {
        Self {
            epoch,
            ayanamsa: Ayanamsa::default(),
            ascendant,
            ascendant_rate: ASCENDANT_DAILY_MOTION,
            bodies: BTreeMap::new(),
            timezones: BTreeMap::new(),
        }
    }

    pub fn with_body(mut self, body: Body, longitude: f64, speed: f64) -> Self {
        self.bodies.insert(body, BodyMotion { longitude, speed });
        self
    }

    /// Places Rahu and Ketu exactly opposite each other.
    pub fn with_nodes(self, rahu: f64, speed: f64) -> Self {
        self.with_body(Body::Rahu, rahu, speed)
            .with_body(Body::Ketu, normalize_degrees(rahu + 180.0), speed)
    }

    pub fn with_ascendant_rate(mut self, rate: f64) -> Self {
        self.ascendant_rate = rate;
        self
    }

    pub fn with_timezone(mut self, name: &str, offset_minutes: i32) -> Self {
        self.timezones.insert(name.to_string(), offset_minutes);
        self
    }

    fn offset_minutes(&self, timezone: &str) -> Option<i32> {
        match timezone {
            "UTC" | "Etc/UTC" | "Etc/GMT" => Some(0),
            other => self.timezones.get(other).copied(),
        }
    }
}

impl EphemerisProvider for LinearEphemeris {
    fn to_universal(
        &self,
        civil: NaiveDateTime,
        timezone: &str,
    ) -> Result<DateTime<Utc>, EphemerisError> {
        let minutes = self
            .offset_minutes(timezone)
            .ok_or_else(|| EphemerisError::UnknownTimezone {
                timezone: timezone.to_string(),
            })?;
        let offset = FixedOffset::east_opt(minutes * 60).ok_or_else(|| {
            EphemerisError::UnknownTimezone {
                timezone: timezone.to_string(),
            }
        })?;
        offset
            .from_local_datetime(&civil)
            .single()
            .map(|local| local.with_timezone(&Utc))
            .ok_or_else(|| EphemerisError::AmbiguousLocalTime {
                civil,
                timezone: timezone.to_string(),
            })
    }

    fn sample(
        &self,
        instant: DateTime<Utc>,
        _location: &GeoLocation,
        ayanamsa: Ayanamsa,
    ) -> Result<EphemerisSample, EphemerisError> {
        if ayanamsa != self.ayanamsa {
            return Err(EphemerisError::Unavailable(format!(
                "anchor sample was computed for {:?}, not {:?}",
                self.ayanamsa, ayanamsa
            )));
        }

        let days = (instant - self.epoch).num_milliseconds() as f64 / MILLIS_PER_DAY;
        let mut positions = Vec::with_capacity(Body::ALL.len());
        for body in Body::ALL {
            let motion = self
                .bodies
                .get(&body)
                .ok_or(EphemerisError::MissingBody { body, instant })?;
            let longitude = normalize_degrees(motion.longitude + motion.speed * days);
            if !longitude.is_finite() {
                return Err(EphemerisError::NonFinite { body });
            }
            positions.push(BodyPosition::new(body, longitude, motion.speed));
        }

        Ok(EphemerisSample {
            instant,
            ascendant: normalize_degrees(self.ascendant + self.ascendant_rate * days),
            positions,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{Duration, NaiveDate};

    fn epoch() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2000, 1, 1, 12, 0, 0).unwrap()
    }

    fn full_fixture() -> LinearEphemeris {
        let mut eph = LinearEphemeris::new(epoch(), 100.0).with_nodes(10.0, -0.053);
        for body in Body::CLASSICAL {
            eph = eph.with_body(body, 30.0 * body.index() as f64 + 5.0, 1.0);
        }
        eph
    }

    #[test]
    fn test_sample_extrapolates_linearly() {
        let eph = full_fixture();
        let loc = GeoLocation { lat: 0.0, lon: 0.0, altitude: 0.0 };
        let sample = eph
            .sample(epoch() + Duration::days(2), &loc, Ayanamsa::Lahiri)
            .unwrap();
        let sun = sample.position(Body::Sun).unwrap();
        assert!((sun.longitude - 7.0).abs() < 1e-9);
        let rahu = sample.position(Body::Rahu).unwrap();
        assert!(rahu.retrograde);
        assert_eq!(sample.positions.len(), 9);
    }

    #[test]
    fn test_missing_body_is_reported() {
        let eph = LinearEphemeris::new(epoch(), 0.0).with_body(Body::Sun, 0.0, 1.0);
        let loc = GeoLocation { lat: 0.0, lon: 0.0, altitude: 0.0 };
        let err = eph.sample(epoch(), &loc, Ayanamsa::Lahiri).unwrap_err();
        assert!(matches!(err, EphemerisError::MissingBody { body: Body::Moon, .. }));
    }

    #[test]
    fn test_to_universal_applies_fixed_offset() {
        let eph = full_fixture().with_timezone("Asia/Kolkata", 330);
        let civil = NaiveDate::from_ymd_opt(1990, 4, 12)
            .unwrap()
            .and_hms_opt(8, 30, 0)
            .unwrap();
        let ut = eph.to_universal(civil, "Asia/Kolkata").unwrap();
        assert_eq!(ut, Utc.with_ymd_and_hms(1990, 4, 12, 3, 0, 0).unwrap());
        assert!(eph.to_universal(civil, "Europe/Nowhere").is_err());
    }

    #[test]
    fn test_other_ayanamsa_is_unavailable() {
        let eph = full_fixture();
        let loc = GeoLocation { lat: 0.0, lon: 0.0, altitude: 0.0 };
        assert!(eph.sample(epoch(), &loc, Ayanamsa::Raman).is_err());
    }
}
