//! Shared types and the agronomic estimate engine
//!
//! This crate contains the records and pure computations shared between the
//! backend, the dashboard (via WASM), and any other caller, so crop constants
//! live in exactly one place.

pub mod agronomy;
pub mod models;
pub mod types;
pub mod validation;

pub use agronomy::*;
pub use models::*;
pub use types::*;
pub use validation::*;
