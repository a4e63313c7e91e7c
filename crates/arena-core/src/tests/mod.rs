//! Scenario tests spanning the registry and the battle engine.
//!
//! - `determinism.rs`: same seed and inputs produce identical ledgers
//! - `integration.rs`: end-to-end battle, progression and isolation flows
//! - `helpers.rs`: arena setup utilities

mod helpers;

pub use helpers::*;
