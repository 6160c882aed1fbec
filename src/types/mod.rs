pub mod currency;
pub mod holding;
pub mod rate;

pub use currency::Currency;
pub use holding::{Holding, HoldingError, HoldingRow, Portfolio, PortfolioTotals, ValuedHolding};
pub use rate::{AssetRate, RateSnapshot, UrlBuilderEntry};
