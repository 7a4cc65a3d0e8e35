use crate::types::{ChainId, Service};

pub const SELL_AMOUNT_DOES_NOT_COVER_FEE: &str = "SellAmountDoesNotCoverFee";

const INTERNAL_SERVER_ERROR: &str = "internal server error";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    InvalidArgument,
    SellAmountDoesNotCoverFee,
    Internal,
}

#[derive(Debug, thiserror::Error)]
pub enum SwapError {
    #[error("invalid argument: {0}")]
    InvalidArgument(String),

    #[error("unsupported chain: {0}")]
    UnsupportedChain(ChainId),

    #[error("sell amount does not cover fee")]
    SellAmountDoesNotCoverFee,

    #[error("{service} API error: {error_type}: {description}")]
    Api {
        service: Service,
        error_type: String,
        description: String,
    },

    #[error("invalid {field} amount: {value:?}")]
    InvalidAmount { field: &'static str, value: String },

    #[error("network error: {0}")]
    Network(#[from] reqwest::Error),

    #[error("serialization error: {0}")]
    Serialization(String),

    #[error("internal error: {0}")]
    Internal(String),
}

impl SwapError {
    pub fn kind(&self) -> ErrorKind {
        match self {
            Self::InvalidArgument(_) | Self::UnsupportedChain(_) => ErrorKind::InvalidArgument,
            Self::SellAmountDoesNotCoverFee => ErrorKind::SellAmountDoesNotCoverFee,
            Self::Api { .. }
            | Self::InvalidAmount { .. }
            | Self::Network(_)
            | Self::Serialization(_)
            | Self::Internal(_) => ErrorKind::Internal,
        }
    }

    pub fn public_message(&self) -> String {
        match self {
            Self::InvalidArgument(msg) => msg.clone(),
            Self::UnsupportedChain(chain) => format!("chain {chain} is not supported"),
            Self::SellAmountDoesNotCoverFee => "sell amount is lower than the fee".to_string(),
            _ => INTERNAL_SERVER_ERROR.to_string(),
        }
    }

    pub(crate) fn internal(context: impl Into<String>) -> Self {
        Self::Internal(context.into())
    }
}
