//! Panchanga: weekday, tithi, luminary yoga, karana and lunar mansion.

use chrono::{Datelike, NaiveDate, Weekday};
use serde::{Deserialize, Serialize};

use crate::chart::data::Chart;
use crate::ephemeris::Body;
use crate::vedic::nakshatra::{nakshatra_pada, NakshatraPada, NAKSHATRA_SEGMENT_SIZE};
use crate::vedic::zodiac::{forward_distance, normalize_degrees};

pub const TITHI_SPAN: f64 = 12.0;
pub const KARANA_SPAN: f64 = 6.0;

const TITHI_NAMES: [&str; 15] = [
    "Pratipada", "Dwitiya", "Tritiya", "Chaturthi", "Panchami",
    "Shashthi", "Saptami", "Ashtami", "Navami", "Dashami",
    "Ekadashi", "Dwadashi", "Trayodashi", "Chaturdashi", "Purnima",
];

const YOGA_NAMES: [&str; 27] = [
    "Vishkumbha", "Priti", "Ayushman", "Saubhagya", "Shobhana",
    "Atiganda", "Sukarma", "Dhriti", "Shula", "Ganda",
    "Vriddhi", "Dhruva", "Vyaghata", "Harshana", "Vajra",
    "Siddhi", "Vyatipata", "Variyana", "Parigha", "Shiva",
    "Siddha", "Sadhya", "Shubha", "Shukla", "Brahma",
    "Indra", "Vaidhriti",
];

const MOVABLE_KARANAS: [&str; 7] = ["Bava", "Balava", "Kaulava", "Taitila", "Garaja", "Vanija", "Vishti"];

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Paksha {
    Shukla,
    Krishna,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Tithi {
    /// 1-30; 15 is the full moon, 30 the new moon
    pub number: u8,
    pub name: String,
    pub paksha: Paksha,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Panchanga {
    pub weekday: String,
    #[serde(rename = "weekdayLord")]
    pub weekday_lord: Body,
    pub tithi: Tithi,
    /// 1-27
    pub yoga: u8,
    #[serde(rename = "yogaName")]
    pub yoga_name: String,
    pub karana: String,
    pub nakshatra: NakshatraPada,
}

pub fn tithi(sun: f64, moon: f64) -> Tithi {
    let elongation = forward_distance(sun, moon);
    let number = ((elongation / TITHI_SPAN).floor() as u8).min(29) + 1;
    let paksha = if elongation < 180.0 { Paksha::Shukla } else { Paksha::Krishna };
    let name = if number == 30 {
        "Amavasya"
    } else {
        TITHI_NAMES[((number - 1) % 15) as usize]
    };
    Tithi {
        number,
        name: name.to_string(),
        paksha,
    }
}

/// 1-27, from the sum of the luminaries' longitudes.
pub fn luminary_yoga(sun: f64, moon: f64) -> u8 {
    let total = normalize_degrees(sun + moon);
    ((total / NAKSHATRA_SEGMENT_SIZE).floor() as u8).min(26) + 1
}

/// Name of the half-tithi in force.
pub fn karana(sun: f64, moon: f64) -> &'static str {
    let half = ((forward_distance(sun, moon) / KARANA_SPAN).floor() as usize).min(59);
    match half {
        0 => "Kimstughna",
        57 => "Shakuni",
        58 => "Chatushpada",
        59 => "Naga",
        n => MOVABLE_KARANAS[(n - 1) % MOVABLE_KARANAS.len()],
    }
}

fn weekday_lord(day: Weekday) -> Body {
    match day {
        Weekday::Sun => Body::Sun,
        Weekday::Mon => Body::Moon,
        Weekday::Tue => Body::Mars,
        Weekday::Wed => Body::Mercury,
        Weekday::Thu => Body::Jupiter,
        Weekday::Fri => Body::Venus,
        Weekday::Sat => Body::Saturn,
    }
}

/// Panchanga of a chart; the weekday is that of the civil birth date.
pub fn panchanga(chart: &Chart, civil_date: NaiveDate) -> Panchanga {
    let sun = chart.body(Body::Sun).longitude;
    let moon = chart.body(Body::Moon).longitude;
    let yoga = luminary_yoga(sun, moon);
    let day = civil_date.weekday();

    Panchanga {
        weekday: format!("{day:?}"),
        weekday_lord: weekday_lord(day),
        tithi: tithi(sun, moon),
        yoga,
        yoga_name: YOGA_NAMES[(yoga - 1) as usize].to_string(),
        karana: karana(sun, moon).to_string(),
        nakshatra: nakshatra_pada(moon),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_tithi_and_paksha() {
        let new_moon = tithi(100.0, 100.0);
        assert_eq!(new_moon.number, 1);
        assert_eq!(new_moon.paksha, Paksha::Shukla);

        let full = tithi(0.0, 179.0);
        assert_eq!(full.number, 15);
        assert_eq!(full.name, "Purnima");

        let waning = tithi(0.0, 181.0);
        assert_eq!(waning.number, 16);
        assert_eq!(waning.paksha, Paksha::Krishna);
        assert_eq!(waning.name, "Pratipada");

        assert_eq!(tithi(10.0, 359.0).name, "Amavasya");
    }

    #[test]
    fn test_karana_fixed_and_movable() {
        assert_eq!(karana(0.0, 3.0), "Kimstughna");
        assert_eq!(karana(0.0, 7.0), "Bava");
        assert_eq!(karana(0.0, 13.0), "Balava");
        assert_eq!(karana(0.0, 343.0), "Shakuni");
        assert_eq!(karana(0.0, 355.0), "Naga");
        // 8th movable karana wraps to Bava
        assert_eq!(karana(0.0, 6.0 * 8.0 + 1.0), "Bava");
    }

    #[test]
    fn test_luminary_yoga_wraps() {
        assert_eq!(luminary_yoga(0.0, 0.0), 1);
        assert_eq!(luminary_yoga(200.0, 159.0), 27);
        assert_eq!(luminary_yoga(200.0, 170.0), 1 + (10.0 / NAKSHATRA_SEGMENT_SIZE) as u8);
    }
}
