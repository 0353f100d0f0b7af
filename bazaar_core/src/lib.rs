// Bazaar Core Library
// Platform-agnostic marketplace client logic

pub mod amount;
pub mod catalog;
pub mod error;
pub mod market_service;
pub mod models;
pub mod provider;
pub mod session;
pub mod settings;
pub mod sim;
pub mod view;

// Re-exports
pub use amount::{to_display_amount, to_ledger_amount, TOKEN_DECIMALS};
pub use catalog::CatalogService;
pub use error::CoreError;
pub use market_service::*;
pub use models::*;
pub use provider::*;
pub use session::Session;
pub use settings::Settings;
pub use sim::SimLedger;
