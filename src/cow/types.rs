use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

pub const ORDER_KIND_SELL: &str = "sell";

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct QuoteRequest {
    pub sell_token: String,
    pub buy_token: String,
    pub partially_fillable: bool,
    pub from: String,
    pub kind: String,
    pub sell_amount_before_fee: String,
}

impl QuoteRequest {
    pub fn sell(
        sell_token: String,
        buy_token: String,
        from: String,
        sell_amount_before_fee: String,
    ) -> Self {
        Self {
            sell_token,
            buy_token,
            partially_fillable: false,
            from,
            kind: ORDER_KIND_SELL.to_string(),
            sell_amount_before_fee,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Quote {
    pub sell_token: String,
    pub buy_token: String,
    pub sell_amount: String,
    pub buy_amount: String,
    pub valid_to: u64,
    #[serde(default)]
    pub app_data: String,
    pub fee_amount: String,
    #[serde(default)]
    pub kind: String,
    #[serde(default)]
    pub partially_fillable: bool,
    #[serde(default)]
    pub sell_token_balance: String,
    #[serde(default)]
    pub buy_token_balance: String,
    #[serde(default)]
    pub signing_scheme: String,
}

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct QuoteResponse {
    pub quote: Quote,
    #[serde(default)]
    pub from: String,
    #[serde(default)]
    pub expiration: Option<DateTime<Utc>>,
    #[serde(default)]
    pub id: Option<u64>,
}

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct NativePriceResponse {
    #[serde(default)]
    pub price: Option<f64>,
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ApiErrorResponse {
    pub error_type: String,
    #[serde(default)]
    pub description: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Order {
    pub uid: String,
    pub status: String,
    pub buy_amount: String,
}
