//! Slow-body transits over the natal chart.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::chart::data::Chart;
use crate::chart::radix::ordered_positions;
use crate::ephemeris::{Body, EphemerisSample};
use crate::error::Result;
use crate::vedic::zodiac::{house_of, sign_of, Sign};

pub const TRANSIT_BODIES: [Body; 4] = [Body::Saturn, Body::Jupiter, Body::Rahu, Body::Ketu];

/// Phase of Saturn's passage over the natal Moon (Sade Sati).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AfflictionPhase {
    None,
    Rising,
    Peak,
    Setting,
}

/// Saturn's house from the natal Moon sign -> phase.
const PHASE_BY_OFFSET: [(u8, AfflictionPhase); 3] = [
    (12, AfflictionPhase::Rising),
    (1, AfflictionPhase::Peak),
    (2, AfflictionPhase::Setting),
];

pub fn affliction_phase(saturn_from_moon: u8) -> AfflictionPhase {
    PHASE_BY_OFFSET
        .iter()
        .find(|(offset, _)| *offset == saturn_from_moon)
        .map(|(_, phase)| *phase)
        .unwrap_or(AfflictionPhase::None)
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TransitPlacement {
    pub body: Body,
    pub longitude: f64,
    pub sign: Sign,
    pub retrograde: bool,
    #[serde(rename = "houseFromAscendant")]
    pub house_from_ascendant: u8,
    #[serde(rename = "houseFromMoon")]
    pub house_from_moon: u8,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TransitSnapshot {
    pub instant: DateTime<Utc>,
    pub placements: Vec<TransitPlacement>,
    pub phase: AfflictionPhase,
    /// Houses from the natal ascendant holding Rahu and Ketu
    #[serde(rename = "nodeAxis")]
    pub node_axis: (u8, u8),
}

impl TransitSnapshot {
    pub fn placement(&self, body: Body) -> Option<&TransitPlacement> {
        self.placements.iter().find(|p| p.body == body)
    }
}

/// Relate the slow bodies of `sample` to the natal chart.
pub fn transit_snapshot(natal: &Chart, sample: &EphemerisSample) -> Result<TransitSnapshot> {
    let positions = ordered_positions(sample)?;
    let moon_sign = natal.moon_sign();
    let asc_sign = natal.ascendant.sign;

    let placements: Vec<TransitPlacement> = TRANSIT_BODIES
        .iter()
        .map(|&body| {
            let position = &positions[body.index()];
            let sign = sign_of(position.longitude);
            TransitPlacement {
                body,
                longitude: position.longitude,
                sign,
                retrograde: position.speed < 0.0,
                house_from_ascendant: house_of(sign, asc_sign),
                house_from_moon: house_of(sign, moon_sign),
            }
        })
        .collect();

    let house_from = |body: Body, from_moon: bool| {
        placements
            .iter()
            .find(|p| p.body == body)
            .map(|p| if from_moon { p.house_from_moon } else { p.house_from_ascendant })
            .unwrap_or(0)
    };
    let phase = affliction_phase(house_from(Body::Saturn, true));
    let node_axis = (house_from(Body::Rahu, false), house_from(Body::Ketu, false));

    log::debug!("transit at {}: saturn phase {:?}", sample.instant, phase);

    Ok(TransitSnapshot {
        instant: sample.instant,
        placements,
        phase,
        node_axis,
    })
}
