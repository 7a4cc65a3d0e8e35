pub mod aggregator;
pub mod covalent;
pub mod cow;
pub mod error;
pub mod fakes;
pub mod tokens;
pub mod types;

mod http;

pub use aggregator::SwapAggregator;
pub use covalent::{CovalentClient, PriceOracle};
pub use cow::{CowClient, QuoteGateway};
pub use error::{ErrorKind, SwapError};
pub use tokens::{SwapToken, TokenRegistry};
pub use types::{
    AccountId, Address, ChainId, SwapAssets, SwapConfig, SwapQuote, SwapQuoteRequest,
    TokenBalance, Uint256,
};
