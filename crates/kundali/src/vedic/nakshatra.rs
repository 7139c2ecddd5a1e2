//! Nakshatra utilities for Vedic astrology.
//!
//! Nakshatras are 27 lunar mansions, each spanning 13°20' (360/27 degrees).
//! Each nakshatra is divided into 4 padas (quarters) of 3°20'.

use lazy_static::lazy_static;
use serde::{Deserialize, Serialize};

use crate::ephemeris::Body;
use crate::vedic::zodiac::normalize_degrees;

pub const NAKSHATRA_COUNT: usize = 27;
pub const NAKSHATRA_SEGMENT_SIZE: f64 = 360.0 / 27.0;
pub const PADA_SIZE: f64 = NAKSHATRA_SEGMENT_SIZE / 4.0;
const QUARTER_COUNT: usize = NAKSHATRA_COUNT * 4;

// (slug, display_name, lord). Lords repeat every nine mansions.
pub const NAKSHATRA_ORDER: &[(&str, &str, Body)] = &[
    ("ashwini", "Ashwini", Body::Ketu),
    ("bharani", "Bharani", Body::Venus),
    ("krittika", "Krittika", Body::Sun),
    ("rohini", "Rohini", Body::Moon),
    ("mrigashira", "Mrigashira", Body::Mars),
    ("ardra", "Ardra", Body::Rahu),
    ("punarvasu", "Punarvasu", Body::Jupiter),
    ("pushya", "Pushya", Body::Saturn),
    ("ashlesha", "Ashlesha", Body::Mercury),
    ("magha", "Magha", Body::Ketu),
    ("purva_phalguni", "Purva Phalguni", Body::Venus),
    ("uttara_phalguni", "Uttara Phalguni", Body::Sun),
    ("hasta", "Hasta", Body::Moon),
    ("chitra", "Chitra", Body::Mars),
    ("swati", "Swati", Body::Rahu),
    ("vishakha", "Vishakha", Body::Jupiter),
    ("anuradha", "Anuradha", Body::Saturn),
    ("jyeshtha", "Jyeshtha", Body::Mercury),
    ("mula", "Mula", Body::Ketu),
    ("purva_ashadha", "Purva Ashadha", Body::Venus),
    ("uttara_ashadha", "Uttara Ashadha", Body::Sun),
    ("shravana", "Shravana", Body::Moon),
    ("dhanishta", "Dhanishta", Body::Mars),
    ("shatabhisha", "Shatabhisha", Body::Rahu),
    ("purva_bhadrapada", "Purva Bhadrapada", Body::Jupiter),
    ("uttara_bhadrapada", "Uttara Bhadrapada", Body::Saturn),
    ("revati", "Revati", Body::Mercury),
];

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NakshatraRecord {
    pub id: String,
    pub name: String,
    pub lord: Body,
    pub start: f64,
    pub end: f64,
    pub index: usize,
}

/// Nakshatra and pada occupied by a longitude.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct NakshatraPada {
    /// 0-based nakshatra index (0 = Ashwini)
    pub nakshatra: usize,
    /// 1-4
    pub pada: u8,
}

impl NakshatraPada {
    pub fn record(&self) -> &'static NakshatraRecord {
        &NAKSHATRA_TABLE[self.nakshatra]
    }

    pub fn lord(&self) -> Body {
        NAKSHATRA_ORDER[self.nakshatra].2
    }

    pub fn name(&self) -> &'static str {
        NAKSHATRA_ORDER[self.nakshatra].1
    }
}

fn build_nakshatra_table() -> Vec<NakshatraRecord> {
    NAKSHATRA_ORDER
        .iter()
        .enumerate()
        .map(|(idx, (slug, display_name, lord))| {
            let start = idx as f64 * NAKSHATRA_SEGMENT_SIZE;
            NakshatraRecord {
                id: slug.to_string(),
                name: display_name.to_string(),
                lord: *lord,
                start,
                end: start + NAKSHATRA_SEGMENT_SIZE,
                index: idx,
            }
        })
        .collect()
}

lazy_static! {
    pub static ref NAKSHATRA_TABLE: Vec<NakshatraRecord> = build_nakshatra_table();
}

/// Split a longitude into (nakshatra, pada).
///
/// Both come from one quarter index so that nakshatra and pada boundaries
/// can never disagree on which side of a cusp a longitude falls.
pub fn nakshatra_pada(longitude: f64) -> NakshatraPada {
    let lon = normalize_degrees(longitude);
    let quarter = ((lon * QUARTER_COUNT as f64 / 360.0).floor() as usize).min(QUARTER_COUNT - 1);
    NakshatraPada {
        nakshatra: quarter / 4,
        pada: (quarter % 4) as u8 + 1,
    }
}

/// Fraction of the occupied nakshatra's arc already traversed, in [0, 1).
pub fn elapsed_fraction(longitude: f64) -> f64 {
    let lon = normalize_degrees(longitude);
    let position = lon * NAKSHATRA_COUNT as f64 / 360.0;
    let index = nakshatra_pada(lon).nakshatra as f64;
    (position - index).clamp(0.0, 1.0 - f64::EPSILON)
}
