//! HTTP handlers

pub mod agronomy;
pub mod health;

pub use agronomy::*;
pub use health::*;
