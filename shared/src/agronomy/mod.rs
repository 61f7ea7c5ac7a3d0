//! Agronomic estimate engine
//!
//! Pure, deterministic transforms from crop and farm records to yield, water,
//! growth-stage, sustainability and alert outputs. Nothing here reads the
//! clock or performs I/O: the evaluation time is always passed in.

mod alerts;
mod estimator;
mod growth;
mod portfolio;
mod quantity;
mod soil;
mod traits;

pub use alerts::*;
pub use estimator::*;
pub use growth::*;
pub use portfolio::*;
pub use soil::*;
pub use traits::*;
