pub mod types;

use std::time::Duration;

use async_trait::async_trait;
use reqwest::StatusCode;
use serde::de::DeserializeOwned;
use tracing::debug;

use crate::{
    error::{SwapError, SELL_AMOUNT_DOES_NOT_COVER_FEE},
    http,
    types::{AccountId, Address, ChainId, Service, EIP155_NAMESPACE},
};

use self::types::{ApiErrorResponse, NativePriceResponse, Order, QuoteRequest, QuoteResponse};

const DEFAULT_COW_API_URL: &str = "https://api.cow.fi";
const COW_API_URL_ENV: &str = "COW_API_URL";

#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait QuoteGateway: Send + Sync {
    /// Fails with [`SwapError::SellAmountDoesNotCoverFee`] when the pre-fee
    /// sell amount is below the protocol fee.
    async fn quote(
        &self,
        chain_id: &ChainId,
        request: &QuoteRequest,
    ) -> Result<QuoteResponse, SwapError>;

    async fn native_price(&self, token: &AccountId) -> Result<NativePriceResponse, SwapError>;

    async fn orders(&self, chain_id: &ChainId, owner: &Address) -> Result<Vec<Order>, SwapError>;
}

pub fn network_name(chain_id: &ChainId) -> Result<&'static str, SwapError> {
    match (chain_id.namespace(), chain_id.reference()) {
        (EIP155_NAMESPACE, "1") => Ok("mainnet"),
        _ => Err(SwapError::UnsupportedChain(chain_id.clone())),
    }
}

pub struct CowClient {
    pub client: reqwest::Client,
    pub base_url: String,
}

impl CowClient {
    pub fn new(base_url: Option<String>, timeout: Option<Duration>) -> Result<Self, SwapError> {
        Ok(Self {
            client: http::build_client(timeout)?,
            base_url: base_url
                .or_else(|| std::env::var(COW_API_URL_ENV).ok())
                .unwrap_or_else(|| DEFAULT_COW_API_URL.to_string()),
        })
    }

    fn api_url(&self, network: &str, path: &str) -> String {
        format!(
            "{}/{network}/api/v1/{path}",
            self.base_url.trim_end_matches('/')
        )
    }
}

#[async_trait]
impl QuoteGateway for CowClient {
    async fn quote(
        &self,
        chain_id: &ChainId,
        request: &QuoteRequest,
    ) -> Result<QuoteResponse, SwapError> {
        let network = network_name(chain_id)?;
        let url = self.api_url(network, "quote");

        debug!("cow quote: {url}");
        let response = self.client.post(&url).json(request).send().await?;
        let status = response.status();
        let body = response.text().await?;

        decode_response(status, &body)
    }

    async fn native_price(&self, token: &AccountId) -> Result<NativePriceResponse, SwapError> {
        let network = network_name(&token.chain_id)?;
        let url = self.api_url(network, &format!("token/{}/native_price", token.address));

        debug!("cow native price: {url}");
        let response = self.client.get(&url).send().await?;
        let status = response.status();
        let body = response.text().await?;

        decode_response(status, &body)
    }

    async fn orders(&self, chain_id: &ChainId, owner: &Address) -> Result<Vec<Order>, SwapError> {
        let network = network_name(chain_id)?;
        let url = self.api_url(network, &format!("account/{owner}/orders"));

        debug!("cow orders: {url}");
        let response = self.client.get(&url).send().await?;
        let status = response.status();
        if status == StatusCode::NOT_FOUND {
            return Ok(Vec::new());
        }
        let body = response.text().await?;

        decode_response(status, &body)
    }
}

pub fn decode_response<T: DeserializeOwned>(status: StatusCode, body: &str) -> Result<T, SwapError> {
    if let Ok(error) = serde_json::from_str::<ApiErrorResponse>(body) {
        if !error.error_type.is_empty() {
            return Err(classify_api_error(error));
        }
    }

    if !status.is_success() {
        return Err(SwapError::Api {
            service: Service::Cow,
            error_type: format!("HTTP {status}"),
            description: body.to_string(),
        });
    }

    serde_json::from_str(body).map_err(|e| SwapError::Serialization(e.to_string()))
}

fn classify_api_error(error: ApiErrorResponse) -> SwapError {
    if error.error_type == SELL_AMOUNT_DOES_NOT_COVER_FEE {
        return SwapError::SellAmountDoesNotCoverFee;
    }
    SwapError::Api {
        service: Service::Cow,
        error_type: error.error_type,
        description: error.description,
    }
}
