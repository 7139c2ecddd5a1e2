pub mod data;
pub mod radix;

pub use data::{Ascendant, Chart, House, PlacedBody};
pub use radix::build_chart;
