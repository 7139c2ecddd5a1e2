//! Dignity tiers and combustion.
//!
//! All classical placements come from static per-body tables; nothing here
//! branches on a specific sign or body except through those tables.

use serde::{Deserialize, Serialize};

use crate::chart::data::Chart;
use crate::ephemeris::Body;
use crate::vedic::vargas::HarmonicChart;
use crate::vedic::zodiac::{angular_distance, Sign};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DignityTier {
    Exalted,
    Own,
    Mooltrikona,
    Friend,
    Neutral,
    Enemy,
    Debilitated,
}

impl DignityTier {
    pub fn score(self) -> i8 {
        match self {
            DignityTier::Exalted => 5,
            DignityTier::Own => 4,
            DignityTier::Mooltrikona => 3,
            DignityTier::Friend => 2,
            DignityTier::Neutral => 1,
            DignityTier::Enemy => 0,
            DignityTier::Debilitated => -1,
        }
    }
}

impl PartialOrd for DignityTier {
    fn partial_cmp(&self, other: &Self) -> Option<std::cmp::Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for DignityTier {
    fn cmp(&self, other: &Self) -> std::cmp::Ordering {
        self.score().cmp(&other.score())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Relationship {
    Friend,
    Neutral,
    Enemy,
}

/// Classical placements of one body.
pub struct DignityProfile {
    pub body: Body,
    pub exaltation: Sign,
    pub debilitation: Sign,
    pub mooltrikona: Sign,
    pub own: &'static [Sign],
    pub friends: &'static [Body],
    pub enemies: &'static [Body],
    /// Combustion orb from the Sun, degrees. `None` never combusts.
    pub combustion_orb: Option<f64>,
}

pub const DIGNITY_PROFILES: [DignityProfile; 7] = [
    DignityProfile {
        body: Body::Sun,
        exaltation: Sign::Aries,
        debilitation: Sign::Libra,
        mooltrikona: Sign::Leo,
        own: &[Sign::Leo],
        friends: &[Body::Moon, Body::Mars, Body::Jupiter],
        enemies: &[Body::Venus, Body::Saturn],
        combustion_orb: None,
    },
    DignityProfile {
        body: Body::Moon,
        exaltation: Sign::Taurus,
        debilitation: Sign::Scorpio,
        mooltrikona: Sign::Taurus,
        own: &[Sign::Cancer],
        friends: &[Body::Sun, Body::Mercury],
        enemies: &[],
        combustion_orb: Some(12.0),
    },
    DignityProfile {
        body: Body::Mars,
        exaltation: Sign::Capricorn,
        debilitation: Sign::Cancer,
        mooltrikona: Sign::Aries,
        own: &[Sign::Aries, Sign::Scorpio],
        friends: &[Body::Sun, Body::Moon, Body::Jupiter],
        enemies: &[Body::Mercury],
        combustion_orb: Some(17.0),
    },
    DignityProfile {
        body: Body::Mercury,
        exaltation: Sign::Virgo,
        debilitation: Sign::Pisces,
        mooltrikona: Sign::Virgo,
        own: &[Sign::Gemini, Sign::Virgo],
        friends: &[Body::Sun, Body::Venus],
        enemies: &[Body::Moon],
        combustion_orb: Some(12.0),
    },
    DignityProfile {
        body: Body::Jupiter,
        exaltation: Sign::Cancer,
        debilitation: Sign::Capricorn,
        mooltrikona: Sign::Sagittarius,
        own: &[Sign::Sagittarius, Sign::Pisces],
        friends: &[Body::Sun, Body::Moon, Body::Mars],
        enemies: &[Body::Mercury, Body::Venus],
        combustion_orb: Some(11.0),
    },
    DignityProfile {
        body: Body::Venus,
        exaltation: Sign::Pisces,
        debilitation: Sign::Virgo,
        mooltrikona: Sign::Libra,
        own: &[Sign::Taurus, Sign::Libra],
        friends: &[Body::Mercury, Body::Saturn],
        enemies: &[Body::Sun, Body::Moon],
        combustion_orb: Some(10.0),
    },
    DignityProfile {
        body: Body::Saturn,
        exaltation: Sign::Libra,
        debilitation: Sign::Aries,
        mooltrikona: Sign::Aquarius,
        own: &[Sign::Capricorn, Sign::Aquarius],
        friends: &[Body::Mercury, Body::Venus],
        enemies: &[Body::Sun, Body::Moon, Body::Mars],
        combustion_orb: Some(15.0),
    },
];

/// Table row for a classical body; the nodes have none.
pub fn profile(body: Body) -> Option<&'static DignityProfile> {
    DIGNITY_PROFILES.iter().find(|p| p.body == body)
}

/// Natural relationship of `body` towards `other`.
pub fn relationship(body: Body, other: Body) -> Relationship {
    match profile(body) {
        Some(p) if p.friends.contains(&other) => Relationship::Friend,
        Some(p) if p.enemies.contains(&other) => Relationship::Enemy,
        _ => Relationship::Neutral,
    }
}

/// Tier of `body` placed in `sign`.
pub fn dignity_tier(body: Body, sign: Sign) -> DignityTier {
    let Some(p) = profile(body) else {
        return DignityTier::Neutral;
    };
    if sign == p.exaltation {
        DignityTier::Exalted
    } else if sign == p.debilitation {
        DignityTier::Debilitated
    } else if sign == p.mooltrikona {
        DignityTier::Mooltrikona
    } else if p.own.contains(&sign) {
        DignityTier::Own
    } else {
        match relationship(body, sign.lord()) {
            Relationship::Friend => DignityTier::Friend,
            Relationship::Neutral => DignityTier::Neutral,
            Relationship::Enemy => DignityTier::Enemy,
        }
    }
}

/// True when `body` sits within its combustion orb of the Sun (inclusive).
pub fn is_combust(body: Body, longitude: f64, sun_longitude: f64) -> bool {
    match profile(body).and_then(|p| p.combustion_orb) {
        Some(orb) => angular_distance(longitude, sun_longitude) <= orb,
        None => false,
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Dignity {
    pub body: Body,
    pub sign: Sign,
    pub tier: DignityTier,
    pub score: i8,
    pub combust: bool,
    /// Angular distance from the Sun, degrees
    #[serde(rename = "sunDistance")]
    pub sun_distance: f64,
}

/// One entry per body, in `Body::ALL` order.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DignityTable {
    pub entries: Vec<Dignity>,
}

impl DignityTable {
    pub fn get(&self, body: Body) -> &Dignity {
        &self.entries[body.index()]
    }

    pub fn tier(&self, body: Body) -> DignityTier {
        self.get(body).tier
    }

    pub fn is_combust(&self, body: Body) -> bool {
        self.get(body).combust
    }
}

pub fn evaluate_dignities(chart: &Chart) -> DignityTable {
    let sun = chart.body(Body::Sun).longitude;
    let entries = chart
        .bodies
        .iter()
        .map(|placed| {
            let tier = dignity_tier(placed.body, placed.sign);
            Dignity {
                body: placed.body,
                sign: placed.sign,
                tier,
                score: tier.score(),
                combust: is_combust(placed.body, placed.longitude, sun),
                sun_distance: angular_distance(placed.longitude, sun),
            }
        })
        .collect();
    DignityTable { entries }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum VargaTrend {
    Stronger,
    Same,
    Weaker,
}

/// How a classical body fares in D9 compared with D1.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct VargaComparison {
    pub body: Body,
    #[serde(rename = "natalTier")]
    pub natal_tier: DignityTier,
    #[serde(rename = "navamsaTier")]
    pub navamsa_tier: DignityTier,
    pub trend: VargaTrend,
    pub vargottama: bool,
}

pub fn compare_navamsa(dignities: &DignityTable, harmonic: &HarmonicChart) -> Vec<VargaComparison> {
    Body::CLASSICAL
        .iter()
        .map(|&body| {
            let natal_tier = dignities.tier(body);
            let navamsa_tier = dignity_tier(body, harmonic.sign_of(body));
            let trend = match navamsa_tier.cmp(&natal_tier) {
                std::cmp::Ordering::Greater => VargaTrend::Stronger,
                std::cmp::Ordering::Equal => VargaTrend::Same,
                std::cmp::Ordering::Less => VargaTrend::Weaker,
            };
            VargaComparison {
                body,
                natal_tier,
                navamsa_tier,
                trend,
                vargottama: dignities.get(body).sign == harmonic.sign_of(body),
            }
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_exaltation_and_debilitation_are_opposite() {
        for p in &DIGNITY_PROFILES {
            assert_eq!(p.debilitation, Sign::from_index(p.exaltation.index() + 6));
        }
    }

    #[test]
    fn test_precedence() {
        assert_eq!(dignity_tier(Body::Sun, Sign::Aries), DignityTier::Exalted);
        assert_eq!(dignity_tier(Body::Sun, Sign::Libra), DignityTier::Debilitated);
        assert_eq!(dignity_tier(Body::Sun, Sign::Leo), DignityTier::Mooltrikona);
        assert_eq!(dignity_tier(Body::Mars, Sign::Scorpio), DignityTier::Own);
        // Moon's mooltrikona sign is also its exaltation
        assert_eq!(dignity_tier(Body::Moon, Sign::Taurus), DignityTier::Exalted);
    }

    #[test]
    fn test_relationship_with_sign_lord() {
        assert_eq!(dignity_tier(Body::Jupiter, Sign::Aries), DignityTier::Friend);
        assert_eq!(dignity_tier(Body::Saturn, Sign::Leo), DignityTier::Enemy);
        assert_eq!(dignity_tier(Body::Jupiter, Sign::Capricorn), DignityTier::Debilitated);
        assert_eq!(dignity_tier(Body::Mercury, Sign::Sagittarius), DignityTier::Neutral);
    }

    #[test]
    fn test_nodes_are_neutral() {
        for sign in Sign::ALL {
            assert_eq!(dignity_tier(Body::Rahu, sign), DignityTier::Neutral);
            assert_eq!(dignity_tier(Body::Ketu, sign), DignityTier::Neutral);
        }
    }

    #[test]
    fn test_tier_ordering_follows_score() {
        assert!(DignityTier::Exalted > DignityTier::Own);
        assert!(DignityTier::Own > DignityTier::Mooltrikona);
        assert!(DignityTier::Enemy > DignityTier::Debilitated);
    }

    #[test]
    fn test_combustion_orbs() {
        assert!(is_combust(Body::Mercury, 112.0, 100.0));
        assert!(!is_combust(Body::Mercury, 112.1, 100.0));
        assert!(is_combust(Body::Venus, 355.0, 5.0));
        assert!(!is_combust(Body::Sun, 100.0, 100.0));
        assert!(!is_combust(Body::Rahu, 100.0, 100.0));
        assert!(is_combust(Body::Mars, 83.0, 100.0));
    }
}
