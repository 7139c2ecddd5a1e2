//! Natal Ashtakavarga (benefic points).
//!
//! Each of the seven classical bodies receives points in a sign when that sign
//! lies at one of a fixed set of offsets from each of eight reference points:
//! the seven bodies and the ascendant. Summing the seven Bhinna tables gives
//! the Sarva table, whose total is 337 for every chart.

use serde::{Deserialize, Serialize};

use crate::chart::data::Chart;
use crate::ephemeris::Body;
use crate::vedic::zodiac::{house_of, Sign};

pub const REFERENCE_POINTS: usize = 8;
pub const SARVA_TOTAL: u32 = 337;
/// Upper bound of one Sarva entry: 7 tables x 8 reference points
pub const SARVA_MAX: u8 = 56;
/// Signs scoring this many Sarva points or more count as strong
pub const GOOD_SIGN_THRESHOLD: u8 = 30;

/// Offsets (own sign = 1) that score a point.
/// `BENEFIC_OFFSETS[target][reference]`, targets and the first seven references
/// in `Body::CLASSICAL` order, the eighth reference is the ascendant.
pub const BENEFIC_OFFSETS: [[&[u8]; REFERENCE_POINTS]; 7] = [
    // Sun
    [
        &[1, 2, 4, 7, 8, 9, 10, 11],
        &[3, 6, 10, 11],
        &[1, 2, 4, 7, 8, 9, 10, 11],
        &[3, 5, 6, 9, 10, 11, 12],
        &[5, 6, 9, 11],
        &[6, 7, 12],
        &[1, 2, 4, 7, 8, 9, 10, 11],
        &[3, 4, 6, 10, 11, 12],
    ],
    // Moon
    [
        &[3, 6, 7, 8, 10, 11],
        &[1, 3, 6, 7, 10, 11],
        &[2, 3, 5, 6, 9, 10, 11],
        &[1, 3, 4, 5, 7, 8, 10, 11],
        &[1, 4, 7, 8, 10, 11, 12],
        &[3, 4, 5, 7, 9, 10, 11],
        &[3, 5, 6, 11],
        &[3, 6, 10, 11],
    ],
    // Mars
    [
        &[3, 5, 6, 10, 11],
        &[3, 6, 11],
        &[1, 2, 4, 7, 8, 10, 11],
        &[3, 5, 6, 11],
        &[6, 10, 11, 12],
        &[6, 8, 11, 12],
        &[1, 4, 7, 8, 9, 10, 11],
        &[1, 3, 6, 10, 11],
    ],
    // Mercury
    [
        &[5, 6, 9, 11, 12],
        &[2, 4, 6, 8, 10, 11],
        &[1, 2, 4, 7, 8, 9, 10, 11],
        &[1, 3, 5, 6, 9, 10, 11, 12],
        &[6, 8, 11, 12],
        &[1, 2, 3, 4, 5, 8, 9, 11],
        &[1, 2, 4, 7, 8, 9, 10, 11],
        &[1, 2, 4, 6, 8, 10, 11],
    ],
    // Jupiter
    [
        &[1, 2, 3, 4, 7, 8, 9, 10, 11],
        &[2, 5, 7, 9, 11],
        &[1, 2, 4, 7, 8, 10, 11],
        &[1, 2, 4, 5, 6, 9, 10, 11],
        &[1, 2, 3, 4, 7, 8, 10, 11],
        &[2, 5, 6, 9, 10, 11],
        &[3, 5, 6, 12],
        &[1, 2, 4, 5, 6, 7, 9, 10, 11],
    ],
    // Venus
    [
        &[8, 11, 12],
        &[1, 2, 3, 4, 5, 8, 9, 11, 12],
        &[3, 4, 6, 9, 11, 12],
        &[3, 5, 6, 9, 11],
        &[5, 8, 9, 10, 11],
        &[1, 2, 3, 4, 5, 8, 9, 10, 11],
        &[3, 4, 5, 8, 9, 10, 11],
        &[1, 2, 3, 4, 5, 8, 9, 11],
    ],
    // Saturn
    [
        &[1, 2, 4, 7, 8, 10, 11],
        &[3, 6, 11],
        &[3, 5, 6, 10, 11, 12],
        &[6, 8, 9, 10, 11, 12],
        &[5, 6, 11, 12],
        &[6, 11, 12],
        &[3, 5, 6, 11],
        &[1, 3, 4, 6, 10, 11],
    ],
];

/// Points one body collects per sign, Aries first.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BhinnaTable {
    pub body: Body,
    pub points: [u8; 12],
}

impl BhinnaTable {
    pub fn total(&self) -> u32 {
        self.points.iter().map(|&p| p as u32).sum()
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AshtakavargaTable {
    /// Sarva points per sign, Aries first
    pub sarva: [u8; 12],
    pub bhinna: Vec<BhinnaTable>,
    /// Sarva points re-indexed by natal house, house 1 first
    #[serde(rename = "byHouse")]
    pub by_house: [u8; 12],
    #[serde(rename = "strongSigns")]
    pub strong_signs: Vec<Sign>,
    pub total: u32,
}

impl AshtakavargaTable {
    pub fn points_in(&self, sign: Sign) -> u8 {
        self.sarva[sign.index()]
    }
}

/// Bhinna table of `target` given the signs of the eight reference points.
pub fn bhinna(target: usize, reference_signs: &[Sign; REFERENCE_POINTS]) -> [u8; 12] {
    let rules = &BENEFIC_OFFSETS[target];
    let mut points = [0u8; 12];
    for sign in Sign::ALL {
        for (reference, offsets) in reference_signs.iter().zip(rules.iter()) {
            if offsets.contains(&house_of(sign, *reference)) {
                points[sign.index()] += 1;
            }
        }
    }
    points
}

pub fn ashtakavarga(chart: &Chart) -> AshtakavargaTable {
    let mut reference_signs = [chart.ascendant.sign; REFERENCE_POINTS];
    for (slot, body) in reference_signs.iter_mut().zip(Body::CLASSICAL) {
        *slot = chart.body(body).sign;
    }

    let bhinna_tables: Vec<BhinnaTable> = Body::CLASSICAL
        .iter()
        .enumerate()
        .map(|(target, &body)| BhinnaTable {
            body,
            points: bhinna(target, &reference_signs),
        })
        .collect();

    let mut sarva = [0u8; 12];
    for table in &bhinna_tables {
        for (total, points) in sarva.iter_mut().zip(table.points) {
            *total += points;
        }
    }

    let asc = chart.ascendant.sign.index();
    let by_house: [u8; 12] = std::array::from_fn(|h| sarva[(asc + h) % 12]);

    AshtakavargaTable {
        sarva,
        bhinna: bhinna_tables,
        by_house,
        strong_signs: Sign::ALL
            .iter()
            .copied()
            .filter(|s| sarva[s.index()] >= GOOD_SIGN_THRESHOLD)
            .collect(),
        total: sarva.iter().map(|&p| p as u32).sum(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const BHINNA_TOTALS: [u32; 7] = [48, 49, 39, 54, 56, 52, 39];

    #[test]
    fn test_table_totals_are_chart_independent() {
        for (target, expected) in BHINNA_TOTALS.iter().enumerate() {
            let offsets: u32 = BENEFIC_OFFSETS[target].iter().map(|o| o.len() as u32).sum();
            assert_eq!(offsets, *expected);
        }
        assert_eq!(BHINNA_TOTALS.iter().sum::<u32>(), SARVA_TOTAL);
    }

    #[test]
    fn test_bhinna_sums_offsets_for_any_reference_layout() {
        let refs = [
            Sign::Aries, Sign::Leo, Sign::Leo, Sign::Pisces,
            Sign::Virgo, Sign::Aries, Sign::Capricorn, Sign::Gemini,
        ];
        for (target, expected) in BHINNA_TOTALS.iter().enumerate() {
            let points = bhinna(target, &refs);
            assert_eq!(points.iter().map(|&p| p as u32).sum::<u32>(), *expected);
            assert!(points.iter().all(|&p| p as usize <= REFERENCE_POINTS));
        }
    }

    #[test]
    fn test_offsets_are_valid_houses() {
        for row in &BENEFIC_OFFSETS {
            for offsets in row {
                assert!(offsets.iter().all(|o| (1..=12).contains(o)));
                assert!(offsets.windows(2).all(|w| w[0] < w[1]));
            }
        }
    }
}
