use serde::{Deserialize, Serialize};

use crate::ephemeris::Body;

/// What an aspect lands on: an occupying body, or an empty house.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", content = "id", rename_all = "lowercase")]
pub enum AspectTarget {
    Body(Body),
    House(u8),
}

/// One directed house-offset aspect
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AspectEdge {
    pub from: Body,
    pub to: AspectTarget,
    /// Aspect type: "7th", "4th", ...
    #[serde(rename = "type")]
    pub aspect_type: String,
    /// Houses counted from the caster, caster's own house = 1
    #[serde(rename = "houseOffset")]
    pub house_offset: u8,
    #[serde(rename = "targetHouse")]
    pub target_house: u8,
    /// Deviation from the exact aspect angle, degrees
    pub orb: f64,
    /// 1.0 at exact, falling to 0.0 at the caster's allowed orb
    pub strength: f64,
}

/// Full aspect graph of one chart
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct AspectSet {
    pub edges: Vec<AspectEdge>,
}

impl AspectSet {
    pub fn from_body(&self, caster: Body) -> impl Iterator<Item = &AspectEdge> {
        self.edges.iter().filter(move |e| e.from == caster)
    }

    pub fn onto_body(&self, target: Body) -> impl Iterator<Item = &AspectEdge> {
        self.edges
            .iter()
            .filter(move |e| e.to == AspectTarget::Body(target))
    }

    /// Whether `caster` aspects `target`.
    pub fn aspects(&self, caster: Body, target: Body) -> bool {
        self.onto_body(target).any(|e| e.from == caster)
    }

    /// Whether either body aspects the other.
    pub fn linked(&self, a: Body, b: Body) -> bool {
        self.aspects(a, b) || self.aspects(b, a)
    }

    /// Casters among `casters` that aspect `target`.
    pub fn received_from(&self, target: Body, casters: &[Body]) -> Vec<Body> {
        self.onto_body(target)
            .filter(|e| casters.contains(&e.from))
            .map(|e| e.from)
            .collect()
    }
}

/// Per-body aspect reach and orb tolerance.
#[derive(Debug, Clone, Copy)]
pub struct AspectRule {
    pub body: Body,
    /// House offsets, ascending; always includes the 7th
    pub offsets: &'static [u8],
    pub allowed_orb: f64,
}
