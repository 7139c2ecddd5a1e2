use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::ephemeris::Body;
use crate::vedic::nakshatra::NakshatraPada;
use crate::vedic::zodiac::{house_of, Sign};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Ascendant {
    pub longitude: f64,
    pub sign: Sign,
    #[serde(rename = "degreeInSign")]
    pub degree_in_sign: f64,
    pub nakshatra: NakshatraPada,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PlacedBody {
    pub body: Body,
    pub longitude: f64,
    pub speed: f64,
    pub retrograde: bool,
    pub sign: Sign,
    #[serde(rename = "degreeInSign")]
    pub degree_in_sign: f64,
    pub nakshatra: NakshatraPada,
    pub house: u8,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct House {
    pub number: u8,
    pub sign: Sign,
    pub lord: Body,
    /// Ascendant longitude for house 1, sign start plus the ascendant's degree elsewhere.
    #[serde(rename = "cuspDegree")]
    pub cusp_degree: f64,
    pub occupants: Vec<Body>,
}

/// Whole-sign natal chart.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Chart {
    pub instant: DateTime<Utc>,
    pub ascendant: Ascendant,
    /// Houses 1-12, in order
    pub houses: Vec<House>,
    /// One entry per body, in `Body::ALL` order
    pub bodies: Vec<PlacedBody>,
}

impl Chart {
    pub fn body(&self, body: Body) -> &PlacedBody {
        &self.bodies[body.index()]
    }

    /// House `number` (1-12).
    pub fn house(&self, number: u8) -> &House {
        &self.houses[(number as usize + 11) % 12]
    }

    pub fn house_lord(&self, number: u8) -> Body {
        self.house(number).lord
    }

    pub fn moon_sign(&self) -> Sign {
        self.body(Body::Moon).sign
    }

    /// House of `body` counted from the natal Moon's sign instead of the ascendant.
    pub fn house_from_moon(&self, body: Body) -> u8 {
        house_of(self.body(body).sign, self.moon_sign())
    }

    pub fn occupants(&self, number: u8) -> &[Body] {
        &self.house(number).occupants
    }
}
