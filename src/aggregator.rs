use std::{future::Future, sync::Arc, time::Duration};

use chrono::{DateTime, Utc};
use futures::{
    future::{self, Either},
    FutureExt,
};
use tracing::{debug, error, warn};

use crate::{
    covalent::{types::TokenPrice, CovalentClient, PriceOracle},
    cow::{
        network_name,
        types::{Order, Quote, QuoteRequest, QuoteResponse},
        CowClient, QuoteGateway,
    },
    error::SwapError,
    tokens::TokenRegistry,
    types::{
        AccountId, Address, ChainId, SwapAssets, SwapConfig, SwapQuote, SwapQuoteRequest,
        TokenBalance, Uint256,
    },
};

const NATIVE_ASSET_NAME: &str = "Ether";

pub struct SwapAggregator {
    pub gateway: Arc<dyn QuoteGateway>,
    pub oracle: Arc<dyn PriceOracle>,
    pub registry: &'static TokenRegistry,
    pub quote_deadline: Option<Duration>,
}

impl SwapAggregator {
    pub fn new(config: SwapConfig) -> Result<Self, SwapError> {
        let SwapConfig {
            cow_api_url,
            covalent_api_url,
            covalent_api_key,
            request_timeout,
            quote_deadline,
        } = config;

        let gateway = CowClient::new(cow_api_url, request_timeout)?;
        let oracle = CovalentClient::new(covalent_api_url, covalent_api_key, request_timeout)?;

        Ok(Self {
            gateway: Arc::new(gateway),
            oracle: Arc::new(oracle),
            registry: TokenRegistry::global(),
            quote_deadline,
        })
    }

    pub fn with_clients(gateway: Arc<dyn QuoteGateway>, oracle: Arc<dyn PriceOracle>) -> Self {
        Self {
            gateway,
            oracle,
            registry: TokenRegistry::global(),
            quote_deadline: None,
        }
    }

    pub fn with_registry(mut self, registry: &'static TokenRegistry) -> Self {
        self.registry = registry;
        self
    }

    pub fn with_quote_deadline(mut self, deadline: Duration) -> Self {
        self.quote_deadline = Some(deadline);
        self
    }

    /// The sell token is not checked against the registry; callers only offer
    /// tokens the treasury holds (see [`SwapAggregator::available_swaps`]).
    pub async fn quote_swap(&self, request: &SwapQuoteRequest) -> Result<SwapQuote, SwapError> {
        network_name(&request.chain_id)?;

        let sell_amount: Uint256 = request.sell_amount.parse().map_err(|e| {
            SwapError::InvalidArgument(format!("invalid sell amount {:?}: {e}", request.sell_amount))
        })?;

        let buy_id = AccountId::new(request.chain_id.clone(), request.buy_token);
        if !self.registry.contains(&buy_id) {
            warn!(buy_token = %buy_id, "buy token not in swap registry");
            return Err(SwapError::InvalidArgument("buy token not available".to_string()));
        }

        let quote_request = QuoteRequest::sell(
            request.sell_token.to_string(),
            request.buy_token.to_string(),
            request.from.to_string(),
            sell_amount.to_string(),
        );

        debug!(
            chain = %request.chain_id,
            sell_token = %request.sell_token,
            buy_token = %request.buy_token,
            sell_amount = %sell_amount,
            "requesting swap quote"
        );

        let quote_call = self
            .gateway
            .quote(&request.chain_id, &quote_request)
            .map(|r| r.map_err(quote_failure));
        let price_call = self
            .oracle
            .token_price(request.chain_id.reference(), &request.buy_token, Utc::now())
            .map(|r| r.map_err(price_failure));
        let calls = quote_first(quote_call, price_call);

        let (quote, price) = match self.quote_deadline {
            Some(deadline) => tokio::time::timeout(deadline, calls).await.map_err(|_| {
                error!(?deadline, "swap quote deadline exceeded");
                SwapError::internal("swap quote deadline exceeded")
            })??,
            None => calls.await?,
        };

        build_swap_quote(&quote.quote, price.as_ref())
    }

    pub fn available_swaps(&self, chain_id: &ChainId, holdings: &[TokenBalance]) -> SwapAssets {
        let sell = holdings
            .iter()
            .filter(|b| {
                b.contract_name == NATIVE_ASSET_NAME
                    || self
                        .registry
                        .contains(&AccountId::new(chain_id.clone(), b.contract_address))
            })
            .cloned()
            .collect();

        let buy = self
            .registry
            .list_for_chain(chain_id)
            .into_iter()
            .cloned()
            .collect();

        SwapAssets { sell, buy }
    }

    pub async fn native_price(&self, token: &AccountId) -> Result<Option<f64>, SwapError> {
        network_name(&token.chain_id)?;
        let response = self.gateway.native_price(token).await.map_err(|e| {
            error!(error = %e, token = %token, "getting native price");
            SwapError::internal("getting native price")
        })?;
        if response.price.is_none() {
            warn!(token = %token, "no native price for token");
        }
        Ok(response.price)
    }

    pub async fn orders(&self, chain_id: &ChainId, owner: &Address) -> Result<Vec<Order>, SwapError> {
        network_name(chain_id)?;
        self.gateway.orders(chain_id, owner).await.map_err(|e| {
            error!(error = %e, owner = %owner, "getting orders");
            SwapError::internal("getting orders")
        })
    }
}

// A failed quote is returned as soon as it arrives, whatever the oracle is
// doing. An oracle failure only surfaces once the quote has succeeded.
async fn quote_first<Q, P>(quote: Q, price: P) -> Result<(QuoteResponse, Option<TokenPrice>), SwapError>
where
    Q: Future<Output = Result<QuoteResponse, SwapError>> + Unpin,
    P: Future<Output = Result<Option<TokenPrice>, SwapError>> + Unpin,
{
    match future::select(quote, price).await {
        Either::Left((quote, price)) => {
            let quote = quote?;
            Ok((quote, price.await?))
        }
        Either::Right((price, quote)) => {
            let quote = quote.await?;
            Ok((quote, price?))
        }
    }
}

fn quote_failure(e: SwapError) -> SwapError {
    match e {
        SwapError::SellAmountDoesNotCoverFee => e,
        other => {
            error!(error = %other, "getting swap quote");
            SwapError::internal("getting swap quote")
        }
    }
}

fn price_failure(e: SwapError) -> SwapError {
    error!(error = %e, "getting buy token price");
    SwapError::internal("getting buy token price")
}

pub fn build_swap_quote(quote: &Quote, price: Option<&TokenPrice>) -> Result<SwapQuote, SwapError> {
    let buy_amount = parse_amount("buyAmount", &quote.buy_amount)?;
    let sell_amount = parse_amount("sellAmount", &quote.sell_amount)?;
    let fee_amount = parse_amount("feeAmount", &quote.fee_amount)?;

    let valid_to = i64::try_from(quote.valid_to)
        .ok()
        .and_then(|secs| DateTime::<Utc>::from_timestamp(secs, 0))
        .ok_or_else(|| {
            error!(valid_to = quote.valid_to, "quote validTo out of range");
            SwapError::internal("quote validTo out of range")
        })?;

    Ok(SwapQuote {
        buy_amount,
        sell_amount,
        fee_amount,
        buy_token_quote_rate: price.and_then(TokenPrice::last_price),
        valid_to,
    })
}

fn parse_amount(field: &'static str, value: &str) -> Result<Uint256, SwapError> {
    value.parse().map_err(|e| {
        error!(field, value, error = %e, "malformed quote amount");
        SwapError::InvalidAmount {
            field,
            value: value.to_string(),
        }
    })
}
