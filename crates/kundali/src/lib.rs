//! Vedic chart derivation: sidereal placements, whole-sign houses, navamsa,
//! dignities, graha drishti, Vimshottari dashas, transits, strength scores,
//! yoga rules and birth-time sensitivity.

pub mod aspects;
pub mod birth;
pub mod chart;
pub mod engine;
pub mod ephemeris;
pub mod error;
pub mod sensitivity;
pub mod settings;
pub mod vedic;

pub use birth::{BirthMoment, HouseSystem};
pub use chart::{build_chart, Chart};
pub use engine::{ChartCore, ChartEngine, ChartReport, NatalReport};
pub use ephemeris::{
    Ayanamsa, Body, EphemerisError, EphemerisProvider, EphemerisSample, GeoLocation, LinearEphemeris,
};
pub use error::{KundaliError, Result};
pub use sensitivity::{RiskLevel, SensitivityReport};
pub use settings::EngineSettings;
