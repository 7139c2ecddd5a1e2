use crate::chart::data::{Ascendant, Chart, House, PlacedBody};
use crate::ephemeris::{Body, BodyPosition, EphemerisError, EphemerisSample};
use crate::error::Result;
use crate::vedic::nakshatra::nakshatra_pada;
use crate::vedic::zodiac::{
    angular_distance, degree_in_sign, house_of, normalize_degrees, sign_of, Sign,
};

/// Largest tolerated deviation of Ketu from the point opposite Rahu.
const NODE_AXIS_TOLERANCE: f64 = 1.0;

/// Pull the nine positions out of a sample in `Body::ALL` order.
pub fn ordered_positions(sample: &EphemerisSample) -> std::result::Result<Vec<BodyPosition>, EphemerisError> {
    let mut ordered = Vec::with_capacity(Body::ALL.len());
    for body in Body::ALL {
        let position = sample.position(body).ok_or(EphemerisError::MissingBody {
            body,
            instant: sample.instant,
        })?;
        if !position.longitude.is_finite() || !position.speed.is_finite() {
            return Err(EphemerisError::NonFinite { body });
        }
        ordered.push(*position);
    }

    if !sample.ascendant.is_finite() {
        return Err(EphemerisError::Inconsistent {
            message: "ascendant longitude is not finite".to_string(),
        });
    }

    let rahu = ordered[Body::Rahu.index()].longitude;
    let ketu = ordered[Body::Ketu.index()].longitude;
    let axis_error = 180.0 - angular_distance(rahu, ketu);
    if axis_error > NODE_AXIS_TOLERANCE {
        return Err(EphemerisError::Inconsistent {
            message: format!("Ketu at {ketu:.3} is not opposite Rahu at {rahu:.3}"),
        });
    }

    Ok(ordered)
}

/// Build the whole-sign chart for one provider sample.
pub fn build_chart(sample: &EphemerisSample) -> Result<Chart> {
    let positions = ordered_positions(sample)?;

    let asc_lon = normalize_degrees(sample.ascendant);
    let asc_sign = sign_of(asc_lon);
    let asc_degree = degree_in_sign(asc_lon);
    let ascendant = Ascendant {
        longitude: asc_lon,
        sign: asc_sign,
        degree_in_sign: asc_degree,
        nakshatra: nakshatra_pada(asc_lon),
    };

    let bodies: Vec<PlacedBody> = positions
        .iter()
        .map(|position| {
            let longitude = normalize_degrees(position.longitude);
            let sign = sign_of(longitude);
            PlacedBody {
                body: position.body,
                longitude,
                speed: position.speed,
                retrograde: position.speed < 0.0,
                sign,
                degree_in_sign: degree_in_sign(longitude),
                nakshatra: nakshatra_pada(longitude),
                house: house_of(sign, asc_sign),
            }
        })
        .collect();

    let houses = (1..=12u8)
        .map(|number| {
            let sign = Sign::from_index(asc_sign.index() + number as usize - 1);
            let cusp_degree = if number == 1 {
                asc_lon
            } else {
                sign.start_degree() + asc_degree
            };
            House {
                number,
                sign,
                lord: sign.lord(),
                cusp_degree: normalize_degrees(cusp_degree),
                occupants: bodies
                    .iter()
                    .filter(|b| b.house == number)
                    .map(|b| b.body)
                    .collect(),
            }
        })
        .collect();

    log::debug!(
        "built chart at {} with ascendant {:.3} ({})",
        sample.instant,
        asc_lon,
        asc_sign
    );

    Ok(Chart {
        instant: sample.instant,
        ascendant,
        houses,
        bodies,
    })
}
