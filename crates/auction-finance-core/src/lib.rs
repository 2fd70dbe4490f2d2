pub mod assumptions;
pub mod error;
pub mod time_value;
pub mod types;

#[cfg(feature = "financing")]
pub mod financing;

#[cfg(feature = "financing")]
pub mod service;

#[cfg(feature = "viability")]
pub mod viability;

pub use error::AuctionFinanceError;
pub use types::*;

/// Standard result type for all auction-finance operations
pub type AuctionFinanceResult<T> = Result<T, AuctionFinanceError>;
