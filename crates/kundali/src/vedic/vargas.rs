//! Navamsa (D9) divisional chart.
//!
//! Each sign is cut into nine arcs of 3°20'. Where the count starts, and in
//! which direction it runs, depends only on the natal sign's quality.

use serde::{Deserialize, Serialize};

use crate::chart::data::Chart;
use crate::ephemeris::Body;
use crate::vedic::zodiac::{normalize_degrees, sign_of, Sign, SignQuality};

pub const NAVAMSA_DIVISION: usize = 9;
pub const NAVAMSA_SPAN: f64 = 30.0 / NAVAMSA_DIVISION as f64;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CountDirection {
    Forward,
    Reverse,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct NavamsaRule {
    pub quality: SignQuality,
    /// Signs counted from the natal sign to reach the first arc's sign (0 = itself)
    pub start_offset: usize,
    pub direction: CountDirection,
}

/// Movable signs start from themselves, fixed from their 9th, dual from their 5th.
pub const NAVAMSA_RULES: [NavamsaRule; 3] = [
    NavamsaRule { quality: SignQuality::Movable, start_offset: 0, direction: CountDirection::Forward },
    NavamsaRule { quality: SignQuality::Fixed, start_offset: 8, direction: CountDirection::Forward },
    NavamsaRule { quality: SignQuality::Dual, start_offset: 4, direction: CountDirection::Forward },
];

fn rule_for(quality: SignQuality) -> &'static NavamsaRule {
    match quality {
        SignQuality::Movable => &NAVAMSA_RULES[0],
        SignQuality::Fixed => &NAVAMSA_RULES[1],
        SignQuality::Dual => &NAVAMSA_RULES[2],
    }
}

/// Arc index 0-8 of a longitude inside its sign.
pub fn navamsa_arc(longitude: f64) -> usize {
    let lon = normalize_degrees(longitude);
    // Same quarter arithmetic as the padas, so D9 arcs and padas share cusps.
    let global = (lon * (12 * NAVAMSA_DIVISION) as f64 / 360.0).floor() as usize;
    global
        .saturating_sub(sign_of(lon).index() * NAVAMSA_DIVISION)
        .min(NAVAMSA_DIVISION - 1)
}

/// D9 sign of a sidereal longitude.
pub fn navamsa_sign(longitude: f64) -> Sign {
    let natal = sign_of(longitude);
    let rule = rule_for(natal.quality());
    let arc = navamsa_arc(longitude);
    let start = natal.index() + rule.start_offset;
    match rule.direction {
        CountDirection::Forward => Sign::from_index(start + arc),
        CountDirection::Reverse => Sign::from_index(start + 12 * NAVAMSA_DIVISION - arc),
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HarmonicPlacement {
    pub body: Body,
    pub sign: Sign,
    /// Same sign in D1 and D9
    pub vargottama: bool,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HarmonicChart {
    pub ascendant: Sign,
    pub bodies: Vec<HarmonicPlacement>,
}

impl HarmonicChart {
    pub fn sign_of(&self, body: Body) -> Sign {
        self.bodies[body.index()].sign
    }
}

pub fn build_navamsa(chart: &Chart) -> HarmonicChart {
    let bodies = chart
        .bodies
        .iter()
        .map(|placed| {
            let sign = navamsa_sign(placed.longitude);
            HarmonicPlacement {
                body: placed.body,
                sign,
                vargottama: sign == placed.sign,
            }
        })
        .collect();

    HarmonicChart {
        ascendant: navamsa_sign(chart.ascendant.longitude),
        bodies,
    }
}
