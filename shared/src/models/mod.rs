//! Domain records for the precision-agriculture dashboard

mod crop;
mod farm;
mod farmer;

pub use crop::*;
pub use farm::*;
pub use farmer::*;
