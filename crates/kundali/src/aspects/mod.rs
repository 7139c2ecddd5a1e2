pub mod calculator;
pub mod types;

pub use calculator::{aspect_rule, AspectCalculator, ASPECT_RULES};
pub use types::{AspectEdge, AspectRule, AspectSet, AspectTarget};
