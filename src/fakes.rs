use std::{
    sync::{
        atomic::{AtomicUsize, Ordering},
        Mutex,
    },
    time::Duration,
};

use async_trait::async_trait;
use chrono::{DateTime, Utc};

use crate::{
    covalent::{
        types::{PricePoint, TokenPrice},
        PriceOracle,
    },
    cow::{
        network_name,
        types::{NativePriceResponse, Order, Quote, QuoteRequest, QuoteResponse},
        QuoteGateway,
    },
    error::SwapError,
    types::{AccountId, Address, ChainId, Service},
};

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FakeFailure {
    SellAmountDoesNotCoverFee,
    Api { error_type: String, description: String },
    Serialization(String),
}

impl FakeFailure {
    pub fn api(error_type: &str) -> Self {
        Self::Api {
            error_type: error_type.to_string(),
            description: format!("injected {error_type}"),
        }
    }

    fn to_error(&self, service: Service) -> SwapError {
        match self {
            Self::SellAmountDoesNotCoverFee => SwapError::SellAmountDoesNotCoverFee,
            Self::Api {
                error_type,
                description,
            } => SwapError::Api {
                service,
                error_type: error_type.clone(),
                description: description.clone(),
            },
            Self::Serialization(msg) => SwapError::Serialization(msg.clone()),
        }
    }
}

pub fn sample_quote_response() -> QuoteResponse {
    QuoteResponse {
        quote: Quote {
            sell_token: "0xa0b86991c6218b36c1d19d4a2e9eb0ce3606eb48".to_string(),
            buy_token: "0xc02aaa39b223fe8d0a0e5c4f27ead9083c756cc2".to_string(),
            sell_amount: "500000000".to_string(),
            buy_amount: "250000000000000000".to_string(),
            valid_to: 1_700_000_000,
            app_data: "0x0000000000000000000000000000000000000000000000000000000000000000"
                .to_string(),
            fee_amount: "10000".to_string(),
            kind: "sell".to_string(),
            partially_fillable: false,
            sell_token_balance: "erc20".to_string(),
            buy_token_balance: "erc20".to_string(),
            signing_scheme: "eip712".to_string(),
        },
        from: String::new(),
        expiration: None,
        id: None,
    }
}

pub struct FakeCowClient {
    quote: Result<QuoteResponse, FakeFailure>,
    native_price: Result<Option<f64>, FakeFailure>,
    orders: Vec<Order>,
    delay: Option<Duration>,
    quote_calls: AtomicUsize,
    native_price_calls: AtomicUsize,
    orders_calls: AtomicUsize,
    last_quote_request: Mutex<Option<QuoteRequest>>,
}

impl Default for FakeCowClient {
    fn default() -> Self {
        Self::new()
    }
}

impl FakeCowClient {
    pub fn new() -> Self {
        Self {
            quote: Ok(sample_quote_response()),
            native_price: Ok(Some(1.0)),
            orders: Vec::new(),
            delay: None,
            quote_calls: AtomicUsize::new(0),
            native_price_calls: AtomicUsize::new(0),
            orders_calls: AtomicUsize::new(0),
            last_quote_request: Mutex::new(None),
        }
    }

    pub fn with_quote(mut self, quote: QuoteResponse) -> Self {
        self.quote = Ok(quote);
        self
    }

    pub fn with_quote_error(mut self, failure: FakeFailure) -> Self {
        self.quote = Err(failure);
        self
    }

    pub fn with_native_price(mut self, price: f64) -> Self {
        self.native_price = Ok(Some(price));
        self
    }

    pub fn without_native_price(mut self) -> Self {
        self.native_price = Ok(None);
        self
    }

    pub fn with_native_price_error(mut self, failure: FakeFailure) -> Self {
        self.native_price = Err(failure);
        self
    }

    pub fn with_orders(mut self, orders: Vec<Order>) -> Self {
        self.orders = orders;
        self
    }

    pub fn with_delay(mut self, delay: Duration) -> Self {
        self.delay = Some(delay);
        self
    }

    pub fn quote_calls(&self) -> usize {
        self.quote_calls.load(Ordering::SeqCst)
    }

    pub fn native_price_calls(&self) -> usize {
        self.native_price_calls.load(Ordering::SeqCst)
    }

    pub fn orders_calls(&self) -> usize {
        self.orders_calls.load(Ordering::SeqCst)
    }

    pub fn total_calls(&self) -> usize {
        self.quote_calls() + self.native_price_calls() + self.orders_calls()
    }

    pub fn last_quote_request(&self) -> Option<QuoteRequest> {
        self.last_quote_request
            .lock()
            .ok()
            .and_then(|guard| guard.clone())
    }

    async fn pause(&self) {
        if let Some(delay) = self.delay {
            tokio::time::sleep(delay).await;
        }
    }
}

#[async_trait]
impl QuoteGateway for FakeCowClient {
    async fn quote(
        &self,
        chain_id: &ChainId,
        request: &QuoteRequest,
    ) -> Result<QuoteResponse, SwapError> {
        self.quote_calls.fetch_add(1, Ordering::SeqCst);
        if let Ok(mut last) = self.last_quote_request.lock() {
            *last = Some(request.clone());
        }
        network_name(chain_id)?;
        self.pause().await;
        self.quote.clone().map_err(|f| f.to_error(Service::Cow))
    }

    async fn native_price(&self, token: &AccountId) -> Result<NativePriceResponse, SwapError> {
        self.native_price_calls.fetch_add(1, Ordering::SeqCst);
        network_name(&token.chain_id)?;
        self.pause().await;
        self.native_price
            .clone()
            .map(|price| NativePriceResponse { price })
            .map_err(|f| f.to_error(Service::Cow))
    }

    async fn orders(&self, chain_id: &ChainId, _owner: &Address) -> Result<Vec<Order>, SwapError> {
        self.orders_calls.fetch_add(1, Ordering::SeqCst);
        network_name(chain_id)?;
        self.pause().await;
        Ok(self.orders.clone())
    }
}

pub struct FakePriceOracle {
    price: Result<Option<TokenPrice>, FakeFailure>,
    delay: Option<Duration>,
    calls: AtomicUsize,
}

impl Default for FakePriceOracle {
    fn default() -> Self {
        Self::new()
    }
}

impl FakePriceOracle {
    pub fn new() -> Self {
        Self {
            price: Ok(None),
            delay: None,
            calls: AtomicUsize::new(0),
        }
    }

    pub fn with_last_price(mut self, price: f64) -> Self {
        self.price = Ok(Some(TokenPrice {
            prices: vec![PricePoint {
                date: "2023-11-14".to_string(),
                price: Some(price),
            }],
            ..TokenPrice::default()
        }));
        self
    }

    pub fn with_token_price(mut self, price: Option<TokenPrice>) -> Self {
        self.price = Ok(price);
        self
    }

    pub fn with_error(mut self, failure: FakeFailure) -> Self {
        self.price = Err(failure);
        self
    }

    pub fn with_delay(mut self, delay: Duration) -> Self {
        self.delay = Some(delay);
        self
    }

    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl PriceOracle for FakePriceOracle {
    async fn token_price(
        &self,
        _chain_reference: &str,
        _token: &Address,
        _at: DateTime<Utc>,
    ) -> Result<Option<TokenPrice>, SwapError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        if let Some(delay) = self.delay {
            tokio::time::sleep(delay).await;
        }
        self.price.clone().map_err(|f| f.to_error(Service::Covalent))
    }
}
