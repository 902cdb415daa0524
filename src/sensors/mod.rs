pub mod classifier;
pub mod lux;

pub use classifier::{classify, classify_named};
pub use lux::{estimate_lux, LuxCalibration};
