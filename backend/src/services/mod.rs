//! Business logic services for the agronomic estimate server

pub mod agronomy;

pub use agronomy::AgronomyService;
