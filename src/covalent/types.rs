use serde::Deserialize;

#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct PricingResponse {
    #[serde(default)]
    pub data: Option<Vec<TokenPrice>>,
    #[serde(default)]
    pub error: bool,
    #[serde(default)]
    pub error_message: Option<String>,
    #[serde(default)]
    pub error_code: Option<u16>,
}

#[derive(Debug, Clone, PartialEq, Default, Deserialize)]
pub struct TokenPrice {
    #[serde(default)]
    pub contract_address: Option<String>,
    #[serde(default)]
    pub contract_ticker_symbol: Option<String>,
    #[serde(default)]
    pub quote_currency: Option<String>,
    #[serde(default)]
    pub prices: Vec<PricePoint>,
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct PricePoint {
    pub date: String,
    pub price: Option<f64>,
}

impl TokenPrice {
    pub fn last_price(&self) -> Option<f64> {
        self.prices
            .iter()
            .filter_map(|p| p.price.map(|price| (p.date.as_str(), price)))
            .max_by(|a, b| a.0.cmp(b.0))
            .map(|(_, price)| price)
    }
}
