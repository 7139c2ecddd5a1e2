pub mod adapter;
pub mod types;

pub use adapter::{BodyMotion, EphemerisError, EphemerisProvider, LinearEphemeris, ASCENDANT_DAILY_MOTION};
pub use types::{Ayanamsa, Body, BodyPosition, EphemerisSample, GeoLocation};
