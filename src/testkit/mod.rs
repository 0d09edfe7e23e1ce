//! Shared test utilities available to both unit and integration tests.
//!
//! Enabled via `#[cfg(test)]` (unit tests) or the `testkit` feature
//! (integration tests).
//!
//! # Modules
//!
//! - [`store`] - Quota store doubles: `CountingStore`, `FailingStore`,
//!   `StaleRejectingStore`.
//! - [`llm`] - Scripted [`Llm`](crate::port::outbound::Llm) implementations.
//! - [`clock`] - `FixedClock` with a settable day.
//! - [`config`] - Canonical test configurations.

pub mod clock;
pub mod config;
pub mod llm;
pub mod store;
