//! Business logic services for SimpleStock

pub mod catalog;
pub mod ledger;

pub use catalog::CatalogService;
pub use ledger::{LedgerService, ProductBalance};
