//! Shared types and domain rules for SimpleStock
//!
//! This crate contains the stock ledger and catalog rules shared between the
//! backend, the frontend (via WASM), and the seeding tool.

pub mod catalog;
pub mod ledger;
pub mod models;
pub mod types;
pub mod validation;

pub use models::*;
pub use types::*;
pub use validation::*;
