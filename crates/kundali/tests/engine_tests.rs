mod common;

use chrono::{DateTime, Duration, NaiveDateTime, Utc};
use common::{birth, birth_instant, provider, provider_with, ASCENDANT};
use kundali::vedic::dashas::DashaLevel;
use kundali::vedic::yogas::YogaName;
use kundali::{
    Ayanamsa, Body, ChartEngine, EngineSettings, EphemerisError, EphemerisProvider,
    EphemerisSample, GeoLocation, KundaliError, LinearEphemeris, RiskLevel,
};

#[test]
fn test_natal_report_is_complete() {
    let engine = ChartEngine::new(provider());
    let report = engine.natal(&birth()).unwrap();
    assert_eq!(report.chart.instant, birth_instant());
    assert_eq!(report.chart.bodies.len(), 9);
    assert_eq!(report.chart.houses.len(), 12);
    assert_eq!(report.dignities.entries.len(), 9);
    assert_eq!(report.navamsa_comparison.len(), 7);
    assert_eq!(report.ashtakavarga.total, 337);
    assert_eq!(report.bhava_bala.len(), 12);
    assert_eq!(report.yogas.len(), 11);
    assert_eq!(report.mahadashas.len(), 9);
    assert_eq!(report.dasha_balance.lord, Body::Venus);
    assert_eq!(report.panchanga.weekday, "Thu");
    assert_eq!(report.panchanga.weekday_lord, Body::Jupiter);
    assert!(report.sensitivity.is_none());
}

#[test]
fn test_natal_is_deterministic() {
    let engine = ChartEngine::new(provider());
    let first = engine.natal(&birth()).unwrap().to_json(false).unwrap();
    let second = engine.natal(&birth()).unwrap().to_json(false).unwrap();
    assert_eq!(first, second);
}

#[test]
fn test_report_serializes_camel_case_keys() {
    let engine = ChartEngine::new(provider());
    let report = engine.query(&birth(), birth_instant() + Duration::days(400)).unwrap();
    let value: serde_json::Value = serde_json::from_str(&report.to_json(true).unwrap()).unwrap();
    for key in ["natal", "transit", "currentPeriods", "upcomingWindows", "queryInstant"] {
        assert!(value.get(key).is_some(), "missing {key}");
    }
    let natal = &value["natal"];
    for key in ["chart", "harmonic", "dignities", "aspects", "ashtakavarga", "bhavaBala", "yogas", "panchanga", "dashaBalance"] {
        assert!(natal.get(key).is_some(), "missing natal.{key}");
    }
    assert!(natal.get("sensitivity").is_none());
    assert_eq!(natal["yogas"][0]["name"], "gaja_kesari");
}

#[test]
fn test_query_reports_periods_and_windows() {
    let engine = ChartEngine::new(provider());
    let at = birth_instant() + Duration::days(400);
    let report = engine.query(&birth(), at).unwrap();
    assert_eq!(report.current_periods.len(), 3);
    assert_eq!(report.current_periods[0].level, DashaLevel::Mahadasha);
    assert_eq!(report.current_periods[0].lord, Body::Venus);
    assert!(report.current_periods.iter().all(|p| p.contains(at)));
    assert!(!report.upcoming_windows.is_empty() && report.upcoming_windows.len() <= 2);
    assert_eq!(report.upcoming_windows[0].from, at);
    assert_eq!(report.transit.instant, at);
}

#[test]
fn test_dasha_depth_comes_from_settings() {
    let settings = EngineSettings {
        dasha_depth: 4,
        ..EngineSettings::default()
    };
    let engine = ChartEngine::with_settings(provider(), settings);
    let report = engine.query(&birth(), birth_instant() + Duration::days(10)).unwrap();
    assert_eq!(report.current_periods.len(), 5);
    assert_eq!(report.current_periods[4].level, DashaLevel::Prana);
}

#[test]
fn test_invalid_birth_is_rejected() {
    let engine = ChartEngine::new(provider());
    let mut b = birth();
    b.latitude = 95.0;
    assert!(matches!(
        engine.natal(&b),
        Err(KundaliError::InvalidInput { field: "latitude", .. })
    ));

    let early = engine.query(&birth(), birth_instant() - Duration::days(1));
    assert!(matches!(early, Err(KundaliError::InvalidInput { field: "at", .. })));
}

#[test]
fn test_provider_failures_surface() {
    let engine = ChartEngine::new(provider());
    let mut b = birth();
    b.timezone = "Europe/Paris".to_string();
    assert!(matches!(
        engine.natal(&b),
        Err(KundaliError::EphemerisUnavailable(EphemerisError::UnknownTimezone { .. }))
    ));

    let raman = birth().with_ayanamsa(Ayanamsa::Raman);
    assert!(matches!(
        engine.natal(&raman),
        Err(KundaliError::EphemerisUnavailable(EphemerisError::Unavailable(_)))
    ));

    let mut partial = provider();
    partial.bodies.remove(&Body::Saturn);
    let engine = ChartEngine::new(partial);
    assert!(matches!(
        engine.natal(&birth()),
        Err(KundaliError::EphemerisUnavailable(EphemerisError::MissingBody { body: Body::Saturn, .. }))
    ));
}

#[test]
fn test_stable_birth_time_is_low_risk() {
    let engine = ChartEngine::new(provider());
    let report = engine.natal(&birth().with_uncertainty(2)).unwrap();
    let sensitivity = report.sensitivity.expect("sensitivity for non-zero uncertainty");
    assert_eq!(sensitivity.uncertainty_minutes, 2);
    assert!(!sensitivity.ascendant.flips);
    assert!(!sensitivity.moon.flips);
    assert!(!sensitivity.navamsa_ascendant.flips);
    assert!(!sensitivity.period_boundary.at_risk);
    assert!(sensitivity.house_changes.is_empty());
    assert_eq!(sensitivity.summary.risk_level, RiskLevel::Low);
}

#[test]
fn test_query_at_antardasha_end_is_boundary_risk() {
    let engine = ChartEngine::new(provider());
    let at_birth = engine.query(&birth(), birth_instant()).unwrap();
    let antardasha = at_birth.current_periods[1];
    assert_eq!(antardasha.level, DashaLevel::Antardasha);

    let report = engine.query(&birth().with_uncertainty(10), antardasha.end).unwrap();
    let boundary = &report.sensitivity().unwrap().period_boundary;
    assert!(boundary.at_risk);
    assert_eq!(boundary.reason, "earlier time gives Venus/Venus, later time gives Venus/Sun");
    assert!(report.sensitivity().unwrap().summary.risk_factors >= 1);
}

#[test]
fn test_moon_on_sign_cusp_flips() {
    let engine = ChartEngine::new(provider_with(ASCENDANT, 29.95));
    let report = engine.natal(&birth().with_uncertainty(10)).unwrap();
    let sensitivity = report.sensitivity.unwrap();
    assert!(sensitivity.moon.flips);
    assert_eq!(sensitivity.moon.baseline, kundali::vedic::zodiac::Sign::Aries);
    assert_eq!(sensitivity.moon.plus, kundali::vedic::zodiac::Sign::Taurus);
    // the Moon changes house between the perturbed runs
    assert!(sensitivity
        .house_changes
        .iter()
        .any(|c| c.body == Body::Moon && c.minus != c.plus));
    assert_ne!(sensitivity.summary.risk_level, RiskLevel::Low);
}

#[test]
fn test_ascendant_on_cusp_is_high_risk() {
    // 0.25 degrees per minute of ascendant motion crosses the Cancer/Leo cusp
    let engine = ChartEngine::new(provider_with(119.5, common::MOON));
    let report = engine.natal(&birth().with_uncertainty(5)).unwrap();
    let sensitivity = report.sensitivity.unwrap();
    assert!(sensitivity.ascendant.flips);
    assert!(sensitivity.navamsa_ascendant.flips);
    assert!(!sensitivity.house_changes.is_empty());
    assert_eq!(sensitivity.summary.risk_level, RiskLevel::High);
}

/// Serves only the exact birth instant.
struct SingleInstant {
    inner: LinearEphemeris,
    instant: DateTime<Utc>,
}

impl EphemerisProvider for SingleInstant {
    fn to_universal(&self, civil: NaiveDateTime, timezone: &str) -> Result<DateTime<Utc>, EphemerisError> {
        self.inner.to_universal(civil, timezone)
    }

    fn sample(
        &self,
        instant: DateTime<Utc>,
        location: &GeoLocation,
        ayanamsa: Ayanamsa,
    ) -> Result<EphemerisSample, EphemerisError> {
        if instant != self.instant {
            return Err(EphemerisError::Unavailable(format!("no data at {instant}")));
        }
        self.inner.sample(instant, location, ayanamsa)
    }
}

#[test]
fn test_failed_perturbed_run_omits_sensitivity() {
    let engine = ChartEngine::new(SingleInstant {
        inner: provider(),
        instant: birth_instant(),
    });
    let report = engine.natal(&birth().with_uncertainty(5)).unwrap();
    assert!(report.sensitivity.is_none());
    assert!(report.yogas.iter().any(|y| y.name == YogaName::Kemadruma));
}

#[test]
fn test_engine_borrows_provider() {
    let eph = provider();
    let engine = ChartEngine::new(&eph);
    assert!(engine.natal(&birth()).is_ok());
}
