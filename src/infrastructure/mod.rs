//! Infrastructure layer: configuration loading and component wiring.

pub mod bootstrap;
pub mod config;
pub mod factory;
