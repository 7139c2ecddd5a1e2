//! Angular primitives: longitude normalization, signs and whole-sign houses.
//!
//! Every segment is closed-open (`[k * unit, (k + 1) * unit)`), so a longitude
//! sitting exactly on a boundary belongs to the higher segment.

use serde::{Deserialize, Serialize};
use std::fmt;

use crate::ephemeris::Body;

pub const SIGN_SPAN: f64 = 30.0;

/// Normalize degrees to [0, 360).
pub fn normalize_degrees(value: f64) -> f64 {
    let mut normalized = value % 360.0;
    if normalized < 0.0 {
        normalized += 360.0;
    }
    // -1e-15 % 360 + 360 rounds up to 360.0
    if normalized >= 360.0 {
        normalized = 0.0;
    }
    normalized
}

/// Shortest distance between two longitudes on the circle, in [0, 180].
pub fn angular_distance(a: f64, b: f64) -> f64 {
    let diff = (normalize_degrees(a) - normalize_degrees(b)).abs();
    diff.min(360.0 - diff)
}

/// Counter-clockwise distance travelled from `from` to `to`, in [0, 360).
pub fn forward_distance(from: f64, to: f64) -> f64 {
    normalize_degrees(to - from)
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Sign {
    Aries,
    Taurus,
    Gemini,
    Cancer,
    Leo,
    Virgo,
    Libra,
    Scorpio,
    Sagittarius,
    Capricorn,
    Aquarius,
    Pisces,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SignQuality {
    Movable,
    Fixed,
    Dual,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Element {
    Fire,
    Earth,
    Air,
    Water,
}

const SIGN_ORDER: [Sign; 12] = [
    Sign::Aries,
    Sign::Taurus,
    Sign::Gemini,
    Sign::Cancer,
    Sign::Leo,
    Sign::Virgo,
    Sign::Libra,
    Sign::Scorpio,
    Sign::Sagittarius,
    Sign::Capricorn,
    Sign::Aquarius,
    Sign::Pisces,
];

const SIGN_NAMES: [&str; 12] = [
    "Aries", "Taurus", "Gemini", "Cancer",
    "Leo", "Virgo", "Libra", "Scorpio",
    "Sagittarius", "Capricorn", "Aquarius", "Pisces",
];

const SIGN_QUALITIES: [SignQuality; 3] = [SignQuality::Movable, SignQuality::Fixed, SignQuality::Dual];

const SIGN_ELEMENTS: [Element; 4] = [Element::Fire, Element::Earth, Element::Air, Element::Water];

// Traditional rulers; the nodes own no sign.
const SIGN_LORDS: [Body; 12] = [
    Body::Mars,    // Aries
    Body::Venus,   // Taurus
    Body::Mercury, // Gemini
    Body::Moon,    // Cancer
    Body::Sun,     // Leo
    Body::Mercury, // Virgo
    Body::Venus,   // Libra
    Body::Mars,    // Scorpio
    Body::Jupiter, // Sagittarius
    Body::Saturn,  // Capricorn
    Body::Saturn,  // Aquarius
    Body::Jupiter, // Pisces
];

impl Sign {
    pub const ALL: [Sign; 12] = SIGN_ORDER;

    /// Sign for a 0-based index; wraps modulo 12.
    pub fn from_index(index: usize) -> Sign {
        SIGN_ORDER[index % 12]
    }

    pub fn index(self) -> usize {
        self as usize
    }

    pub fn name(self) -> &'static str {
        SIGN_NAMES[self.index()]
    }

    pub fn quality(self) -> SignQuality {
        SIGN_QUALITIES[self.index() % 3]
    }

    pub fn element(self) -> Element {
        SIGN_ELEMENTS[self.index() % 4]
    }

    pub fn lord(self) -> Body {
        SIGN_LORDS[self.index()]
    }

    pub fn start_degree(self) -> f64 {
        self.index() as f64 * SIGN_SPAN
    }

    /// The sign `count` places forward, counting this sign as 1.
    pub fn nth_from(self, count: usize) -> Sign {
        Sign::from_index(self.index() + count.saturating_sub(1))
    }
}

impl fmt::Display for Sign {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Sign containing a longitude.
pub fn sign_of(longitude: f64) -> Sign {
    let index = (normalize_degrees(longitude) / SIGN_SPAN).floor() as usize;
    Sign::from_index(index.min(11))
}

/// Degrees travelled within the containing sign, in [0, 30).
pub fn degree_in_sign(longitude: f64) -> f64 {
    let lon = normalize_degrees(longitude);
    lon - sign_of(lon).start_degree()
}

/// Whole-sign house (1-12) of `sign` counted from `reference`.
pub fn house_of(sign: Sign, reference: Sign) -> u8 {
    (((sign.index() + 12 - reference.index()) % 12) + 1) as u8
}

/// Move `count` houses forward from `house`, counting `house` itself as 1.
pub fn house_offset(house: u8, count: u8) -> u8 {
    let zero_based = (house as usize + 11 + count as usize - 1) % 12;
    zero_based as u8 + 1
}

pub fn is_kendra(house: u8) -> bool {
    matches!(house, 1 | 4 | 7 | 10)
}

pub fn is_dusthana(house: u8) -> bool {
    matches!(house, 6 | 8 | 12)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_normalize_degrees() {
        assert_eq!(normalize_degrees(370.0), 10.0);
        assert_eq!(normalize_degrees(-10.0), 350.0);
        assert_eq!(normalize_degrees(360.0), 0.0);
        assert_eq!(normalize_degrees(-1e-15), 0.0);
    }

    #[test]
    fn test_sign_boundaries_belong_to_higher_sign() {
        assert_eq!(sign_of(29.999_999), Sign::Aries);
        assert_eq!(sign_of(30.0), Sign::Taurus);
        assert_eq!(sign_of(359.99), Sign::Pisces);
        assert_eq!(sign_of(360.0), Sign::Aries);
    }

    #[test]
    fn test_house_of_wraps() {
        assert_eq!(house_of(Sign::Leo, Sign::Leo), 1);
        assert_eq!(house_of(Sign::Cancer, Sign::Leo), 12);
        assert_eq!(house_of(Sign::Aries, Sign::Capricorn), 4);
    }

    #[test]
    fn test_house_offset_counts_inclusively() {
        assert_eq!(house_offset(1, 7), 7);
        assert_eq!(house_offset(10, 7), 4);
        assert_eq!(house_offset(12, 1), 12);
        assert_eq!(house_offset(9, 5), 1);
    }

    #[test]
    fn test_sign_tables() {
        assert_eq!(Sign::Cancer.quality(), SignQuality::Movable);
        assert_eq!(Sign::Scorpio.quality(), SignQuality::Fixed);
        assert_eq!(Sign::Pisces.quality(), SignQuality::Dual);
        assert_eq!(Sign::Aquarius.lord(), Body::Saturn);
        assert_eq!(Sign::Leo.element(), Element::Fire);
        assert_eq!(Sign::Aries.nth_from(12), Sign::Pisces);
    }

    #[test]
    fn test_angular_and_forward_distance() {
        assert_eq!(angular_distance(350.0, 10.0), 20.0);
        assert_eq!(forward_distance(350.0, 10.0), 20.0);
        assert_eq!(forward_distance(10.0, 350.0), 340.0);
    }
}
