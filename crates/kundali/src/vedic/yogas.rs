//! Yoga and dosha detection.
//!
//! A fixed catalog of rules, each a pure predicate over one immutable
//! [`ChartBundle`]. Every rule runs on every chart and reports why it matched
//! or did not; no rule looks at another rule's outcome.

use serde::{Deserialize, Serialize};
use std::fmt;

use crate::aspects::AspectSet;
use crate::chart::data::Chart;
use crate::ephemeris::Body;
use crate::vedic::dignities::{DignityTable, DignityTier};
use crate::vedic::zodiac::{forward_distance, house_of, house_offset, is_dusthana, is_kendra};

/// Houses that make Mars afflicting.
pub const MANGLIK_HOUSES: [u8; 6] = [1, 2, 4, 7, 8, 12];

const MAHAPURUSHA: [(Body, &str); 5] = [
    (Body::Mars, "Ruchaka"),
    (Body::Mercury, "Bhadra"),
    (Body::Jupiter, "Hamsa"),
    (Body::Venus, "Malavya"),
    (Body::Saturn, "Sasa"),
];

/// Bodies whose presence next to the Moon breaks its isolation.
const KEMADRUMA_IGNORED: [Body; 3] = [Body::Sun, Body::Rahu, Body::Ketu];

/// Everything a rule may look at.
#[derive(Debug, Clone, Copy)]
pub struct ChartBundle<'a> {
    pub chart: &'a Chart,
    pub dignities: &'a DignityTable,
    pub aspects: &'a AspectSet,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum YogaName {
    GajaKesari,
    PanchaMahapurusha,
    Raja,
    Dhana,
    ViparitaRaja,
    NeechaBhanga,
    ManglikStrict,
    ManglikLenient,
    KalaSarpaStrict,
    KalaSarpaLoose,
    Kemadruma,
}

impl fmt::Display for YogaName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            YogaName::GajaKesari => "Gaja Kesari Yoga",
            YogaName::PanchaMahapurusha => "Pancha Mahapurusha Yoga",
            YogaName::Raja => "Raja Yoga",
            YogaName::Dhana => "Dhana Yoga",
            YogaName::ViparitaRaja => "Viparita Raja Yoga",
            YogaName::NeechaBhanga => "Neecha Bhanga Raja Yoga",
            YogaName::ManglikStrict => "Manglik Dosha (from ascendant)",
            YogaName::ManglikLenient => "Manglik Dosha (from Moon)",
            YogaName::KalaSarpaStrict => "Kala Sarpa Dosha (strict)",
            YogaName::KalaSarpaLoose => "Kala Sarpa Dosha (loose)",
            YogaName::Kemadruma => "Kemadruma Dosha",
        };
        f.write_str(label)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum YogaKind {
    Yoga,
    Dosha,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RuleOutcome {
    pub present: bool,
    pub reason: String,
}

impl RuleOutcome {
    fn new(present: bool, reason: impl Into<String>) -> Self {
        Self {
            present,
            reason: reason.into(),
        }
    }
}

pub struct YogaRule {
    pub name: YogaName,
    pub kind: YogaKind,
    pub evaluate: fn(&ChartBundle) -> RuleOutcome,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct YogaResult {
    pub name: YogaName,
    pub label: String,
    #[serde(rename = "type")]
    pub kind: YogaKind,
    pub present: bool,
    pub reason: String,
}

pub const YOGA_CATALOG: [YogaRule; 11] = [
    YogaRule { name: YogaName::GajaKesari, kind: YogaKind::Yoga, evaluate: gaja_kesari },
    YogaRule { name: YogaName::PanchaMahapurusha, kind: YogaKind::Yoga, evaluate: pancha_mahapurusha },
    YogaRule { name: YogaName::Raja, kind: YogaKind::Yoga, evaluate: raja },
    YogaRule { name: YogaName::Dhana, kind: YogaKind::Yoga, evaluate: dhana },
    YogaRule { name: YogaName::ViparitaRaja, kind: YogaKind::Yoga, evaluate: viparita_raja },
    YogaRule { name: YogaName::NeechaBhanga, kind: YogaKind::Yoga, evaluate: neecha_bhanga },
    YogaRule { name: YogaName::ManglikStrict, kind: YogaKind::Dosha, evaluate: manglik_strict },
    YogaRule { name: YogaName::ManglikLenient, kind: YogaKind::Dosha, evaluate: manglik_lenient },
    YogaRule { name: YogaName::KalaSarpaStrict, kind: YogaKind::Dosha, evaluate: kala_sarpa_strict },
    YogaRule { name: YogaName::KalaSarpaLoose, kind: YogaKind::Dosha, evaluate: kala_sarpa_loose },
    YogaRule { name: YogaName::Kemadruma, kind: YogaKind::Dosha, evaluate: kemadruma },
];

/// Run every rule of the catalog.
pub fn identify_yogas(bundle: &ChartBundle) -> Vec<YogaResult> {
    YOGA_CATALOG
        .iter()
        .map(|rule| {
            let outcome = (rule.evaluate)(bundle);
            YogaResult {
                name: rule.name,
                label: rule.name.to_string(),
                kind: rule.kind,
                present: outcome.present,
                reason: outcome.reason,
            }
        })
        .collect()
}

fn join_bodies(bodies: &[Body]) -> String {
    bodies.iter().map(|b| b.name()).collect::<Vec<_>>().join(", ")
}

pub fn gaja_kesari(bundle: &ChartBundle) -> RuleOutcome {
    let house = bundle.chart.house_from_moon(Body::Jupiter);
    if is_kendra(house) {
        RuleOutcome::new(true, format!("Jupiter in house {house} from Moon, a kendra"))
    } else {
        RuleOutcome::new(false, format!("Jupiter in house {house} from Moon, not a kendra"))
    }
}

pub fn pancha_mahapurusha(bundle: &ChartBundle) -> RuleOutcome {
    let matched: Vec<String> = MAHAPURUSHA
        .iter()
        .filter_map(|&(body, yoga)| {
            let placed = bundle.chart.body(body);
            let tier = bundle.dignities.tier(body);
            let dignified = matches!(
                tier,
                DignityTier::Exalted | DignityTier::Own | DignityTier::Mooltrikona
            );
            (dignified && is_kendra(placed.house)).then(|| {
                format!("{yoga}: {body} {tier:?} in {} in house {}", placed.sign, placed.house)
            })
        })
        .collect();

    if matched.is_empty() {
        RuleOutcome::new(
            false,
            "none of Mars, Mercury, Jupiter, Venus, Saturn holds its own or exaltation sign in a kendra",
        )
    } else {
        RuleOutcome::new(true, matched.join("; "))
    }
}

/// Whether the lords of houses `a` and `b` share a body, a house, or an aspect.
fn lords_linked(bundle: &ChartBundle, a: u8, b: u8) -> RuleOutcome {
    let chart = bundle.chart;
    let lord_a = chart.house_lord(a);
    let lord_b = chart.house_lord(b);
    let house_a = chart.body(lord_a).house;
    let house_b = chart.body(lord_b).house;

    if lord_a == lord_b {
        return RuleOutcome::new(true, format!("{lord_a} lords both house {a} and house {b}"));
    }
    if house_a == house_b {
        return RuleOutcome::new(
            true,
            format!("lord of {a} ({lord_a}) and lord of {b} ({lord_b}) together in house {house_a}"),
        );
    }
    if bundle.aspects.linked(lord_a, lord_b) {
        return RuleOutcome::new(
            true,
            format!("lord of {a} ({lord_a}) and lord of {b} ({lord_b}) joined by aspect"),
        );
    }
    RuleOutcome::new(
        false,
        format!(
            "lord of {a} ({lord_a}) in house {house_a} and lord of {b} ({lord_b}) in house {house_b} are not linked"
        ),
    )
}

pub fn raja(bundle: &ChartBundle) -> RuleOutcome {
    lords_linked(bundle, 9, 10)
}

pub fn dhana(bundle: &ChartBundle) -> RuleOutcome {
    lords_linked(bundle, 2, 11)
}

pub fn viparita_raja(bundle: &ChartBundle) -> RuleOutcome {
    let chart = bundle.chart;
    let matched: Vec<String> = [6u8, 8, 12]
        .iter()
        .filter_map(|&house| {
            let lord = chart.house_lord(house);
            let placed = chart.body(lord).house;
            is_dusthana(placed).then(|| format!("lord of {house} ({lord}) in house {placed}"))
        })
        .collect();

    if matched.is_empty() {
        RuleOutcome::new(false, "no lord of 6, 8 or 12 sits in 6, 8 or 12")
    } else {
        RuleOutcome::new(true, matched.join("; "))
    }
}

pub fn neecha_bhanga(bundle: &ChartBundle) -> RuleOutcome {
    let chart = bundle.chart;
    let debilitated: Vec<Body> = Body::CLASSICAL
        .iter()
        .copied()
        .filter(|&b| bundle.dignities.tier(b) == DignityTier::Debilitated)
        .collect();
    if debilitated.is_empty() {
        return RuleOutcome::new(false, "no debilitated body to cancel");
    }

    let mut cancelled = Vec::new();
    let mut standing = Vec::new();
    for body in debilitated {
        let sign = chart.body(body).sign;
        let dispositor = sign.lord();
        let dispositor_house = chart.body(dispositor).house;
        if bundle.aspects.aspects(dispositor, body) {
            cancelled.push(format!("{body} debilitated in {sign}, aspected by its sign lord {dispositor}"));
        } else if is_kendra(dispositor_house) {
            cancelled.push(format!(
                "{body} debilitated in {sign}, sign lord {dispositor} in kendra house {dispositor_house}"
            ));
        } else {
            standing.push(format!("{body} debilitated in {sign} without cancellation"));
        }
    }

    if cancelled.is_empty() {
        RuleOutcome::new(false, standing.join("; "))
    } else {
        RuleOutcome::new(true, cancelled.join("; "))
    }
}

pub fn manglik_strict(bundle: &ChartBundle) -> RuleOutcome {
    let house = bundle.chart.body(Body::Mars).house;
    RuleOutcome::new(
        MANGLIK_HOUSES.contains(&house),
        format!("Mars in house {house} from ascendant"),
    )
}

pub fn manglik_lenient(bundle: &ChartBundle) -> RuleOutcome {
    let house = bundle.chart.house_from_moon(Body::Mars);
    RuleOutcome::new(
        MANGLIK_HOUSES.contains(&house),
        format!("Mars in house {house} from Moon"),
    )
}

/// Longitudes strictly inside one open arc between the nodes.
pub fn kala_sarpa_strict(bundle: &ChartBundle) -> RuleOutcome {
    let chart = bundle.chart;
    let rahu = chart.body(Body::Rahu).longitude;
    let ketu = chart.body(Body::Ketu).longitude;
    let arc = forward_distance(rahu, ketu);

    let mut rahu_side = Vec::new();
    let mut ketu_side = Vec::new();
    let mut on_axis = Vec::new();
    for body in Body::CLASSICAL {
        let d = forward_distance(rahu, chart.body(body).longitude);
        if d > 0.0 && d < arc {
            rahu_side.push(body);
        } else if d > arc {
            ketu_side.push(body);
        } else {
            on_axis.push(body);
        }
    }

    if rahu_side.len() == Body::CLASSICAL.len() {
        return RuleOutcome::new(true, "all seven bodies strictly between Rahu and Ketu");
    }
    if ketu_side.len() == Body::CLASSICAL.len() {
        return RuleOutcome::new(true, "all seven bodies strictly between Ketu and Rahu");
    }
    let mut parts = Vec::new();
    if !rahu_side.is_empty() {
        parts.push(format!("{} from Rahu to Ketu", join_bodies(&rahu_side)));
    }
    if !ketu_side.is_empty() {
        parts.push(format!("{} from Ketu to Rahu", join_bodies(&ketu_side)));
    }
    if !on_axis.is_empty() {
        parts.push(format!("{} on the nodal axis", join_bodies(&on_axis)));
    }
    RuleOutcome::new(false, parts.join("; "))
}

/// Sign-level containment; the nodes' own signs belong to both halves.
pub fn kala_sarpa_loose(bundle: &ChartBundle) -> RuleOutcome {
    let chart = bundle.chart;
    let rahu_sign = chart.body(Body::Rahu).sign;
    let ketu_sign = chart.body(Body::Ketu).sign;
    let rahu_span = house_of(ketu_sign, rahu_sign);
    let ketu_span = house_of(rahu_sign, ketu_sign);

    let outside_rahu_half: Vec<Body> = Body::CLASSICAL
        .iter()
        .copied()
        .filter(|&b| house_of(chart.body(b).sign, rahu_sign) > rahu_span)
        .collect();
    let outside_ketu_half: Vec<Body> = Body::CLASSICAL
        .iter()
        .copied()
        .filter(|&b| house_of(chart.body(b).sign, ketu_sign) > ketu_span)
        .collect();

    if outside_rahu_half.is_empty() {
        return RuleOutcome::new(true, format!("all seven bodies in the signs from Rahu ({rahu_sign}) to Ketu ({ketu_sign})"));
    }
    if outside_ketu_half.is_empty() {
        return RuleOutcome::new(true, format!("all seven bodies in the signs from Ketu ({ketu_sign}) to Rahu ({rahu_sign})"));
    }
    RuleOutcome::new(
        false,
        format!(
            "{} outside the signs from Rahu to Ketu; {} outside the signs from Ketu to Rahu",
            join_bodies(&outside_rahu_half),
            join_bodies(&outside_ketu_half)
        ),
    )
}

pub fn kemadruma(bundle: &ChartBundle) -> RuleOutcome {
    let chart = bundle.chart;
    let moon_house = chart.body(Body::Moon).house;
    let second = house_offset(moon_house, 2);
    let twelfth = house_offset(moon_house, 12);

    let neighbours: Vec<Body> = chart
        .occupants(second)
        .iter()
        .chain(chart.occupants(twelfth))
        .copied()
        .filter(|b| !KEMADRUMA_IGNORED.contains(b))
        .collect();

    if neighbours.is_empty() {
        RuleOutcome::new(
            true,
            format!("no planets in house {second} or house {twelfth}, the 2nd and 12th from Moon"),
        )
    } else {
        RuleOutcome::new(
            false,
            format!("{} beside the Moon in the 2nd or 12th from it", join_bodies(&neighbours)),
        )
    }
}
