//! Birth-time sensitivity: what changes if the recorded time is off by the
//! stated uncertainty in either direction.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::engine::ChartCore;
use crate::ephemeris::Body;
use crate::error::{KundaliError, Result};
use crate::vedic::zodiac::Sign;

pub const HIGH_RISK_FACTORS: usize = 3;
pub const MEDIUM_RISK_FACTORS: usize = 1;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct SignFlip {
    pub minus: Sign,
    pub baseline: Sign,
    pub plus: Sign,
    /// Baseline differs from at least one perturbed run
    pub flips: bool,
}

impl SignFlip {
    fn new(minus: Sign, baseline: Sign, plus: Sign) -> Self {
        Self {
            minus,
            baseline,
            plus,
            flips: minus != baseline || plus != baseline,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct HouseChange {
    pub body: Body,
    pub minus: u8,
    pub baseline: u8,
    pub plus: u8,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RiskLevel {
    Low,
    Medium,
    High,
}

impl RiskLevel {
    pub fn from_factors(count: usize) -> Self {
        if count >= HIGH_RISK_FACTORS {
            RiskLevel::High
        } else if count >= MEDIUM_RISK_FACTORS {
            RiskLevel::Medium
        } else {
            RiskLevel::Low
        }
    }

    pub fn recommendation(self) -> &'static str {
        match self {
            RiskLevel::Low => "Chart features are stable across the stated birth time uncertainty.",
            RiskLevel::Medium => {
                "Some chart features depend on the exact birth time; confirm the recorded time if possible."
            }
            RiskLevel::High => {
                "Several chart features change within the uncertainty window; rectify the birth time before relying on this chart."
            }
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PeriodBoundaryRisk {
    #[serde(rename = "atRisk")]
    pub at_risk: bool,
    pub reason: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SensitivitySummary {
    /// Sign flips among ascendant, Moon and D9 ascendant
    pub flips: usize,
    #[serde(rename = "riskFactors")]
    pub risk_factors: usize,
    #[serde(rename = "riskLevel")]
    pub risk_level: RiskLevel,
    pub recommendation: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SensitivityReport {
    #[serde(rename = "uncertaintyMinutes")]
    pub uncertainty_minutes: u32,
    pub ascendant: SignFlip,
    pub moon: SignFlip,
    #[serde(rename = "navamsaAscendant")]
    pub navamsa_ascendant: SignFlip,
    #[serde(rename = "periodBoundary")]
    pub period_boundary: PeriodBoundaryRisk,
    #[serde(rename = "houseChanges")]
    pub house_changes: Vec<HouseChange>,
    pub summary: SensitivitySummary,
}

/// Mahadasha and antardasha lords of `core` at `reference`.
///
/// A run whose cycle starts after `reference` is read at its cycle start.
fn period_lords(core: &ChartCore, reference: DateTime<Utc>) -> Result<Vec<Body>> {
    let at = reference.max(core.timeline.cycle_start());
    let path = core.timeline.current_path(at, 1)?;
    Ok(path.iter().map(|node| node.lord).collect())
}

fn describe_lords(lords: &[Body]) -> String {
    lords.iter().map(|b| b.name()).collect::<Vec<_>>().join("/")
}

fn period_boundary(minus: &ChartCore, plus: &ChartCore, reference: DateTime<Utc>) -> Result<PeriodBoundaryRisk> {
    let minus_lords = period_lords(minus, reference)?;
    let plus_lords = period_lords(plus, reference)?;
    let risk = if minus_lords != plus_lords {
        PeriodBoundaryRisk {
            at_risk: true,
            reason: format!(
                "earlier time gives {}, later time gives {}",
                describe_lords(&minus_lords),
                describe_lords(&plus_lords)
            ),
        }
    } else {
        PeriodBoundaryRisk {
            at_risk: false,
            reason: format!("both times give {}", describe_lords(&minus_lords)),
        }
    };
    Ok(risk)
}

/// Compare the baseline chart with the runs at birth - Δ and birth + Δ.
pub fn analyze(
    baseline: &ChartCore,
    minus: &ChartCore,
    plus: &ChartCore,
    reference: DateTime<Utc>,
    uncertainty_minutes: u32,
) -> Result<SensitivityReport> {
    let ascendant = SignFlip::new(
        minus.chart.ascendant.sign,
        baseline.chart.ascendant.sign,
        plus.chart.ascendant.sign,
    );
    let moon = SignFlip::new(
        minus.chart.moon_sign(),
        baseline.chart.moon_sign(),
        plus.chart.moon_sign(),
    );
    let navamsa_ascendant = SignFlip::new(
        minus.navamsa.ascendant,
        baseline.navamsa.ascendant,
        plus.navamsa.ascendant,
    );
    let period_boundary = period_boundary(minus, plus, reference)?;

    let house_changes: Vec<HouseChange> = Body::ALL
        .iter()
        .map(|&body| HouseChange {
            body,
            minus: minus.chart.body(body).house,
            baseline: baseline.chart.body(body).house,
            plus: plus.chart.body(body).house,
        })
        .filter(|change| change.minus != change.plus)
        .collect();

    let flips = [ascendant.flips, moon.flips, navamsa_ascendant.flips]
        .iter()
        .filter(|&&flag| flag)
        .count();
    let risk_factors =
        flips + usize::from(period_boundary.at_risk) + usize::from(!house_changes.is_empty());
    let risk_level = RiskLevel::from_factors(risk_factors);

    log::debug!(
        "sensitivity over ±{} min: {} risk factors ({:?})",
        uncertainty_minutes,
        risk_factors,
        risk_level
    );

    Ok(SensitivityReport {
        uncertainty_minutes,
        ascendant,
        moon,
        navamsa_ascendant,
        period_boundary,
        house_changes,
        summary: SensitivitySummary {
            flips,
            risk_factors,
            risk_level,
            recommendation: risk_level.recommendation().to_string(),
        },
    })
}

/// Keep a failed analysis out of the report only when a perturbed run had no
/// ephemeris data. Any other failure propagates.
pub fn omit_unavailable(analysis: Result<SensitivityReport>) -> Result<Option<SensitivityReport>> {
    match analysis {
        Ok(report) => Ok(Some(report)),
        Err(KundaliError::EphemerisUnavailable(e)) => {
            log::warn!("sensitivity analysis omitted: {}", e);
            Ok(None)
        }
        Err(e) => Err(e),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ephemeris::EphemerisError;

    #[test]
    fn test_sign_flip_against_either_side() {
        assert!(!SignFlip::new(Sign::Leo, Sign::Leo, Sign::Leo).flips);
        assert!(SignFlip::new(Sign::Cancer, Sign::Leo, Sign::Leo).flips);
        assert!(SignFlip::new(Sign::Leo, Sign::Leo, Sign::Virgo).flips);
    }

    #[test]
    fn test_risk_levels() {
        assert_eq!(RiskLevel::from_factors(0), RiskLevel::Low);
        assert_eq!(RiskLevel::from_factors(1), RiskLevel::Medium);
        assert_eq!(RiskLevel::from_factors(2), RiskLevel::Medium);
        assert_eq!(RiskLevel::from_factors(3), RiskLevel::High);
        assert_eq!(RiskLevel::from_factors(5), RiskLevel::High);
    }

    #[test]
    fn test_only_ephemeris_failures_are_omitted() {
        let unavailable = Err(KundaliError::EphemerisUnavailable(EphemerisError::Unavailable(
            "no data".to_string(),
        )));
        assert!(matches!(omit_unavailable(unavailable), Ok(None)));

        let broken = Err(KundaliError::Invariant("period path is empty".to_string()));
        assert!(matches!(omit_unavailable(broken), Err(KundaliError::Invariant(_))));

        let invalid = Err(KundaliError::invalid("depth", "too deep"));
        assert!(matches!(
            omit_unavailable(invalid),
            Err(KundaliError::InvalidInput { field: "depth", .. })
        ));
    }
}
