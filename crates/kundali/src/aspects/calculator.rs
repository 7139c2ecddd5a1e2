use crate::aspects::types::{AspectEdge, AspectRule, AspectSet, AspectTarget};
use crate::chart::data::Chart;
use crate::ephemeris::Body;
use crate::vedic::zodiac::{forward_distance, house_offset};

/// Aspect reach in `Body::ALL` order.
pub const ASPECT_RULES: [AspectRule; 9] = [
    AspectRule { body: Body::Sun, offsets: &[7], allowed_orb: 7.0 },
    AspectRule { body: Body::Moon, offsets: &[7], allowed_orb: 7.0 },
    AspectRule { body: Body::Mars, offsets: &[4, 7, 8], allowed_orb: 8.0 },
    AspectRule { body: Body::Mercury, offsets: &[7], allowed_orb: 7.0 },
    AspectRule { body: Body::Jupiter, offsets: &[5, 7, 9], allowed_orb: 9.0 },
    AspectRule { body: Body::Venus, offsets: &[7], allowed_orb: 7.0 },
    AspectRule { body: Body::Saturn, offsets: &[3, 7, 10], allowed_orb: 9.0 },
    AspectRule { body: Body::Rahu, offsets: &[7], allowed_orb: 7.0 },
    AspectRule { body: Body::Ketu, offsets: &[7], allowed_orb: 7.0 },
];

pub fn aspect_rule(body: Body) -> &'static AspectRule {
    &ASPECT_RULES[body.index()]
}

fn ordinal(offset: u8) -> String {
    let suffix = match offset {
        1 => "st",
        2 => "nd",
        3 => "rd",
        _ => "th",
    };
    format!("{offset}{suffix}")
}

/// Aspect calculator
pub struct AspectCalculator {
    rules: [AspectRule; 9],
}

impl AspectCalculator {
    /// Create a calculator with the classical reach and orbs
    pub fn new() -> Self {
        Self { rules: ASPECT_RULES }
    }

    /// Orb and strength of an aspect cast over `offset` houses.
    ///
    /// The exact angle is `(offset - 1) * 30`; the orb is its distance from the
    /// forward separation, folded onto [0, 180].
    pub fn measure(&self, caster: Body, caster_lon: f64, target_lon: f64, offset: u8) -> (f64, f64) {
        let exact = (offset as f64 - 1.0) * 30.0;
        let separation = forward_distance(caster_lon, target_lon);
        let mut orb = (separation - exact).abs();
        if orb > 180.0 {
            orb = 360.0 - orb;
        }
        let allowed = self.rules[caster.index()].allowed_orb;
        let strength = (1.0 - orb / allowed).max(0.0);
        (orb, strength)
    }

    /// Build the aspect graph of a chart.
    ///
    /// Each (caster, offset) yields one edge per occupant of the target house,
    /// or a single house edge when the target house is empty.
    pub fn compute(&self, chart: &Chart) -> AspectSet {
        let mut edges = Vec::new();
        for caster in &chart.bodies {
            let rule = &self.rules[caster.body.index()];
            for &offset in rule.offsets {
                let target_house = house_offset(caster.house, offset);
                let house = chart.house(target_house);
                let aspect_type = ordinal(offset);

                if house.occupants.is_empty() {
                    let (orb, strength) =
                        self.measure(caster.body, caster.longitude, house.cusp_degree, offset);
                    edges.push(AspectEdge {
                        from: caster.body,
                        to: AspectTarget::House(target_house),
                        aspect_type,
                        house_offset: offset,
                        target_house,
                        orb,
                        strength,
                    });
                    continue;
                }

                for &occupant in &house.occupants {
                    let target = chart.body(occupant);
                    let (orb, strength) =
                        self.measure(caster.body, caster.longitude, target.longitude, offset);
                    edges.push(AspectEdge {
                        from: caster.body,
                        to: AspectTarget::Body(occupant),
                        aspect_type: aspect_type.clone(),
                        house_offset: offset,
                        target_house,
                        orb,
                        strength,
                    });
                }
            }
        }
        AspectSet { edges }
    }
}

impl Default for AspectCalculator {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_rules_are_in_body_order() {
        for (idx, rule) in ASPECT_RULES.iter().enumerate() {
            assert_eq!(rule.body.index(), idx);
            assert!(rule.offsets.contains(&7));
        }
    }

    #[test]
    fn test_measure_exact_opposition() {
        let calc = AspectCalculator::new();
        let (orb, strength) = calc.measure(Body::Sun, 10.0, 190.0, 7);
        assert_eq!(orb, 0.0);
        assert_eq!(strength, 1.0);
    }

    #[test]
    fn test_measure_strength_falls_with_orb() {
        let calc = AspectCalculator::new();
        let (orb, strength) = calc.measure(Body::Saturn, 0.0, 274.5, 10);
        assert!((orb - 4.5).abs() < 1e-9);
        assert!((strength - 0.5).abs() < 1e-9);
        let (_, none) = calc.measure(Body::Moon, 0.0, 200.0, 7);
        assert_eq!(none, 0.0);
    }

    #[test]
    fn test_ordinal_labels() {
        assert_eq!(ordinal(3), "3rd");
        assert_eq!(ordinal(7), "7th");
        assert_eq!(ordinal(10), "10th");
    }
}
