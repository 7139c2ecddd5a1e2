//! Bhava Bala: a simple additive strength score per house.

use serde::{Deserialize, Serialize};

use crate::aspects::AspectSet;
use crate::chart::data::Chart;
use crate::ephemeris::Body;
use crate::vedic::dignities::{DignityTable, DignityTier};

pub const BASE_SCORE: f64 = 0.50;
pub const STRONG_LORD_BONUS: f64 = 0.15;
pub const BENEFIC_ASPECT_BONUS: f64 = 0.10;
pub const WEAK_LORD_PENALTY: f64 = 0.10;
pub const MALEFIC_CROWD_PENALTY: f64 = 0.10;
pub const MALEFIC_CROWD_SIZE: usize = 3;
pub const STRONG_THRESHOLD: f64 = 0.70;
pub const WEAK_THRESHOLD: f64 = 0.30;

pub const BENEFIC_CASTERS: [Body; 2] = [Body::Jupiter, Body::Venus];
pub const MALEFICS: [Body; 4] = [Body::Mars, Body::Saturn, Body::Rahu, Body::Ketu];

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BhavaBalaScore {
    pub house: u8,
    pub lord: Body,
    pub score: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StrengthSummary {
    #[serde(rename = "strongestHouse")]
    pub strongest_house: u8,
    #[serde(rename = "weakestHouse")]
    pub weakest_house: u8,
    pub average: f64,
    #[serde(rename = "strongHouses")]
    pub strong_houses: Vec<u8>,
    #[serde(rename = "weakHouses")]
    pub weak_houses: Vec<u8>,
}

/// Inputs to one house's score, each judged independently.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct BhavaFactors {
    pub lord_strong: bool,
    pub lord_receives_benefic: bool,
    pub lord_weak: bool,
    pub malefic_crowded: bool,
}

impl BhavaFactors {
    /// Sum of the four adjustments, clamped to [0, 1].
    pub fn score(&self) -> f64 {
        let mut score = BASE_SCORE;
        if self.lord_strong {
            score += STRONG_LORD_BONUS;
        }
        if self.lord_receives_benefic {
            score += BENEFIC_ASPECT_BONUS;
        }
        if self.lord_weak {
            score -= WEAK_LORD_PENALTY;
        }
        if self.malefic_crowded {
            score -= MALEFIC_CROWD_PENALTY;
        }
        // two decimals keeps 0.5 + 0.15 + 0.1 from drifting below 0.75
        ((score * 100.0).round() / 100.0).clamp(0.0, 1.0)
    }
}

pub fn bhava_factors(house: u8, chart: &Chart, dignities: &DignityTable, aspects: &AspectSet) -> BhavaFactors {
    let lord = chart.house_lord(house);
    let tier = dignities.tier(lord);
    let combust = dignities.is_combust(lord);
    let malefics = chart
        .occupants(house)
        .iter()
        .filter(|b| MALEFICS.contains(b))
        .count();

    BhavaFactors {
        lord_strong: tier >= DignityTier::Friend && !combust,
        lord_receives_benefic: !aspects.received_from(lord, &BENEFIC_CASTERS).is_empty(),
        lord_weak: tier <= DignityTier::Enemy || combust,
        malefic_crowded: malefics >= MALEFIC_CROWD_SIZE,
    }
}

/// Scores for houses 1-12.
pub fn bhava_bala(chart: &Chart, dignities: &DignityTable, aspects: &AspectSet) -> Vec<BhavaBalaScore> {
    (1..=12u8)
        .map(|house| BhavaBalaScore {
            house,
            lord: chart.house_lord(house),
            score: bhava_factors(house, chart, dignities, aspects).score(),
        })
        .collect()
}

pub fn summarize(scores: &[BhavaBalaScore]) -> StrengthSummary {
    let mut strongest = (0u8, f64::MIN);
    let mut weakest = (0u8, f64::MAX);
    for s in scores {
        if s.score > strongest.1 {
            strongest = (s.house, s.score);
        }
        if s.score < weakest.1 {
            weakest = (s.house, s.score);
        }
    }
    let average = if scores.is_empty() {
        0.0
    } else {
        scores.iter().map(|s| s.score).sum::<f64>() / scores.len() as f64
    };

    StrengthSummary {
        strongest_house: strongest.0,
        weakest_house: weakest.0,
        average,
        strong_houses: scores
            .iter()
            .filter(|s| s.score >= STRONG_THRESHOLD)
            .map(|s| s.house)
            .collect(),
        weak_houses: scores
            .iter()
            .filter(|s| s.score <= WEAK_THRESHOLD)
            .map(|s| s.house)
            .collect(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_factor_arithmetic() {
        let best = BhavaFactors {
            lord_strong: true,
            lord_receives_benefic: true,
            ..Default::default()
        };
        assert_eq!(best.score(), 0.75);

        let worst = BhavaFactors {
            lord_weak: true,
            malefic_crowded: true,
            ..Default::default()
        };
        assert_eq!(worst.score(), 0.3);
        assert_eq!(BhavaFactors::default().score(), 0.5);
    }

    #[test]
    fn test_summary_picks_first_extreme() {
        let scores: Vec<BhavaBalaScore> = [0.5, 0.75, 0.3, 0.75]
            .iter()
            .enumerate()
            .map(|(i, s)| BhavaBalaScore { house: i as u8 + 1, lord: Body::Sun, score: *s })
            .collect();
        let summary = summarize(&scores);
        assert_eq!(summary.strongest_house, 2);
        assert_eq!(summary.weakest_house, 3);
        assert_eq!(summary.strong_houses, vec![2, 4]);
        assert_eq!(summary.weak_houses, vec![3]);
    }
}
