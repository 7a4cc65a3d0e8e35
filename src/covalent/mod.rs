pub mod types;

use std::time::Duration;

use async_trait::async_trait;
use chrono::{DateTime, Days, Utc};
use tracing::debug;

use crate::{
    error::SwapError,
    http,
    types::{Address, Service},
};

use self::types::{PricingResponse, TokenPrice};

const DEFAULT_COVALENT_API_URL: &str = "https://api.covalenthq.com";
const COVALENT_API_URL_ENV: &str = "COVALENT_API_URL";
const COVALENT_API_KEY_ENV: &str = "COVALENT_API_KEY";
const QUOTE_CURRENCY: &str = "USD";

#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait PriceOracle: Send + Sync {
    /// Price history of `token` up to `at`. `Ok(None)` means the feed knows no
    /// price for it.
    async fn token_price(
        &self,
        chain_reference: &str,
        token: &Address,
        at: DateTime<Utc>,
    ) -> Result<Option<TokenPrice>, SwapError>;
}

pub struct CovalentClient {
    pub client: reqwest::Client,
    pub base_url: String,
    pub api_key: String,
}

impl CovalentClient {
    pub fn new(
        base_url: Option<String>,
        api_key: Option<String>,
        timeout: Option<Duration>,
    ) -> Result<Self, SwapError> {
        Ok(Self {
            client: http::build_client(timeout)?,
            base_url: base_url
                .or_else(|| std::env::var(COVALENT_API_URL_ENV).ok())
                .unwrap_or_else(|| DEFAULT_COVALENT_API_URL.to_string()),
            api_key: api_key
                .or_else(|| std::env::var(COVALENT_API_KEY_ENV).ok())
                .unwrap_or_default(),
        })
    }

    fn pricing_url(&self, chain_reference: &str, token: &Address) -> String {
        format!(
            "{}/v1/pricing/historical_by_addresses_v2/{chain_reference}/{QUOTE_CURRENCY}/{token}/",
            self.base_url.trim_end_matches('/')
        )
    }
}

#[async_trait]
impl PriceOracle for CovalentClient {
    async fn token_price(
        &self,
        chain_reference: &str,
        token: &Address,
        at: DateTime<Utc>,
    ) -> Result<Option<TokenPrice>, SwapError> {
        let url = self.pricing_url(chain_reference, token);
        let (from, to) = price_window(at);

        debug!("covalent token price: {url} from={from} to={to}");
        let response = self
            .client
            .get(&url)
            .basic_auth(&self.api_key, None::<&str>)
            .query(&[("from", from), ("to", to)])
            .send()
            .await?;
        let status = response.status();
        let body = response.text().await?;

        decode_pricing(status, &body)
    }
}

fn price_window(at: DateTime<Utc>) -> (String, String) {
    let to = at.date_naive();
    let from = to.checked_sub_days(Days::new(1)).unwrap_or(to);
    (
        from.format("%Y-%m-%d").to_string(),
        to.format("%Y-%m-%d").to_string(),
    )
}

pub fn decode_pricing(
    status: reqwest::StatusCode,
    body: &str,
) -> Result<Option<TokenPrice>, SwapError> {
    let response = match serde_json::from_str::<PricingResponse>(body) {
        Ok(response) if response.error => {
            return Err(SwapError::Api {
                service: Service::Covalent,
                error_type: response
                    .error_code
                    .map_or_else(|| format!("HTTP {status}"), |code| code.to_string()),
                description: response.error_message.unwrap_or_default(),
            });
        }
        Ok(response) if status.is_success() => response,
        Err(e) if status.is_success() => return Err(SwapError::Serialization(e.to_string())),
        _ => {
            return Err(SwapError::Api {
                service: Service::Covalent,
                error_type: format!("HTTP {status}"),
                description: body.to_string(),
            });
        }
    };

    Ok(response.data.and_then(|data| data.into_iter().next()))
}
