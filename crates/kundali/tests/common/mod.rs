#![allow(dead_code)]

use chrono::{DateTime, NaiveDate, NaiveDateTime, TimeZone, Utc};
use kundali::ephemeris::BodyPosition;
use kundali::{BirthMoment, Body, Chart, EphemerisSample, LinearEphemeris};

/// 08:30 in Asia/Kolkata on 1990-04-12
pub fn birth_instant() -> DateTime<Utc> {
    Utc.with_ymd_and_hms(1990, 4, 12, 3, 0, 0).unwrap()
}

pub fn birth_civil() -> NaiveDateTime {
    NaiveDate::from_ymd_opt(1990, 4, 12)
        .unwrap()
        .and_hms_opt(8, 30, 0)
        .unwrap()
}

/// Moon at 14°20' Aries, Cancer rising at 5°.
pub const MOON: f64 = 14.0 + 20.0 / 60.0;
pub const ASCENDANT: f64 = 95.0;

pub fn provider_with(ascendant: f64, moon: f64) -> LinearEphemeris {
    LinearEphemeris::new(birth_instant(), ascendant)
        .with_body(Body::Sun, 357.5, 0.9856)
        .with_body(Body::Moon, moon, 13.176)
        .with_body(Body::Mars, 300.0, 0.70)
        .with_body(Body::Mercury, 340.0, 1.40)
        .with_body(Body::Jupiter, 85.0, 0.12)
        .with_body(Body::Venus, 320.0, 1.10)
        .with_body(Body::Saturn, 292.0, 0.034)
        .with_nodes(305.0, -0.053)
        .with_timezone("Asia/Kolkata", 330)
}

pub fn provider() -> LinearEphemeris {
    provider_with(ASCENDANT, MOON)
}

pub fn birth() -> BirthMoment {
    BirthMoment::new(birth_civil(), "Asia/Kolkata", 28.61, 77.21)
}

/// Sample with every body at the given longitude, Sun first, nodes last.
pub fn sample(ascendant: f64, longitudes: [f64; 9]) -> EphemerisSample {
    sample_at(birth_instant(), ascendant, longitudes)
}

pub fn sample_at(instant: DateTime<Utc>, ascendant: f64, longitudes: [f64; 9]) -> EphemerisSample {
    EphemerisSample {
        instant,
        ascendant,
        positions: Body::ALL
            .iter()
            .zip(longitudes)
            .map(|(body, lon)| BodyPosition::new(*body, lon, 0.5))
            .collect(),
    }
}

pub fn chart(ascendant: f64, longitudes: [f64; 9]) -> Chart {
    kundali::build_chart(&sample(ascendant, longitudes)).unwrap()
}
