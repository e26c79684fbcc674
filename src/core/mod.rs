//! Domain types and the workflows that drive the backend

pub mod browser;
pub mod config;
pub mod dashboard;
pub mod error;
pub mod fund;
pub mod gateway;
pub mod log;
pub mod portfolio;
pub mod purchase;
pub mod refresh;
pub mod session;

#[cfg(test)]
pub(crate) mod testing;

// Re-export main types for cleaner imports
pub use dashboard::{Dashboard, DashboardSettings};
pub use error::GatewayError;
pub use fund::{FundFamily, PurchaseConfirmation, PurchasedPosition, Scheme};
pub use gateway::FundGateway;
pub use session::{Session, SessionToken};
