pub mod ashtakavarga;
pub mod dashas;
pub mod dignities;
pub mod nakshatra;
pub mod panchanga;
pub mod strength;
pub mod transits;
pub mod vargas;
pub mod yogas;
pub mod zodiac;

pub use ashtakavarga::{ashtakavarga, AshtakavargaTable, BhinnaTable};
pub use dashas::{
    expand, DashaBalance, DashaLevel, DashaPeriod, DashaTimeline, PeriodNode, PeriodWindow,
};
pub use dignities::{compare_navamsa, evaluate_dignities, Dignity, DignityTable, DignityTier, VargaComparison};
pub use nakshatra::{nakshatra_pada, NakshatraPada};
pub use panchanga::{panchanga, Panchanga, Tithi};
pub use strength::{bhava_bala, summarize, BhavaBalaScore, StrengthSummary};
pub use transits::{transit_snapshot, AfflictionPhase, TransitPlacement, TransitSnapshot};
pub use vargas::{build_navamsa, navamsa_sign, HarmonicChart, HarmonicPlacement};
pub use yogas::{identify_yogas, ChartBundle, YogaKind, YogaName, YogaResult, YOGA_CATALOG};
pub use zodiac::{sign_of, Sign};
