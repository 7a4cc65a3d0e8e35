use std::{fmt, str::FromStr, time::Duration};

use chrono::{DateTime, Utc};
use num_bigint::BigUint;
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use tiny_keccak::{Hasher, Keccak};

use crate::{error::SwapError, tokens::SwapToken};

pub const EIP155_NAMESPACE: &str = "eip155";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Service {
    Cow,
    Covalent,
}

impl fmt::Display for Service {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Cow => write!(f, "CoW"),
            Self::Covalent => write!(f, "Covalent"),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct ChainId {
    namespace: String,
    reference: String,
}

impl ChainId {
    pub fn new(namespace: &str, reference: &str) -> Result<Self, SwapError> {
        let valid_namespace = (3..=8).contains(&namespace.len())
            && namespace
                .bytes()
                .all(|b| b.is_ascii_lowercase() || b.is_ascii_digit() || b == b'-');
        if !valid_namespace {
            return Err(SwapError::InvalidArgument(format!(
                "invalid chain namespace {namespace:?}"
            )));
        }

        let valid_reference = (1..=32).contains(&reference.len())
            && reference
                .bytes()
                .all(|b| b.is_ascii_alphanumeric() || b == b'-' || b == b'_');
        if !valid_reference {
            return Err(SwapError::InvalidArgument(format!(
                "invalid chain reference {reference:?}"
            )));
        }

        Ok(Self {
            namespace: namespace.to_string(),
            reference: reference.to_string(),
        })
    }

    pub fn eip155(chain_id: u64) -> Self {
        Self {
            namespace: EIP155_NAMESPACE.to_string(),
            reference: chain_id.to_string(),
        }
    }

    pub fn namespace(&self) -> &str {
        &self.namespace
    }

    pub fn reference(&self) -> &str {
        &self.reference
    }
}

impl fmt::Display for ChainId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}", self.namespace, self.reference)
    }
}

impl FromStr for ChainId {
    type Err = SwapError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let (namespace, reference) = s
            .split_once(':')
            .ok_or_else(|| SwapError::InvalidArgument(format!("invalid chain id {s:?}")))?;
        Self::new(namespace, reference)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Address([u8; 20]);

impl Address {
    pub fn to_checksum(&self) -> String {
        let lower = hex::encode(self.0);

        let mut hash = [0u8; 32];
        let mut keccak = Keccak::v256();
        keccak.update(lower.as_bytes());
        keccak.finalize(&mut hash);

        let mut out = String::with_capacity(42);
        out.push_str("0x");
        for (i, c) in lower.chars().enumerate() {
            let nibble = if i % 2 == 0 {
                hash[i / 2] >> 4
            } else {
                hash[i / 2] & 0x0f
            };
            if c.is_ascii_alphabetic() && nibble >= 8 {
                out.push(c.to_ascii_uppercase());
            } else {
                out.push(c);
            }
        }
        out
    }
}

impl fmt::Display for Address {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.to_checksum())
    }
}

impl FromStr for Address {
    type Err = SwapError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let digits = s
            .strip_prefix("0x")
            .or_else(|| s.strip_prefix("0X"))
            .ok_or_else(|| SwapError::InvalidArgument(format!("address {s:?} missing 0x prefix")))?;

        let mut bytes = [0u8; 20];
        hex::decode_to_slice(digits, &mut bytes)
            .map_err(|e| SwapError::InvalidArgument(format!("invalid address {s:?}: {e}")))?;
        Ok(Self(bytes))
    }
}

impl Serialize for Address {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

impl<'de> Deserialize<'de> for Address {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let s = String::deserialize(deserializer)?;
        s.parse().map_err(serde::de::Error::custom)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct AccountId {
    pub chain_id: ChainId,
    pub address: Address,
}

impl AccountId {
    pub fn new(chain_id: ChainId, address: Address) -> Self {
        Self { chain_id, address }
    }

    pub fn parse_on(chain_id: &ChainId, address: &str) -> Result<Self, SwapError> {
        if chain_id.namespace() != EIP155_NAMESPACE {
            return Err(SwapError::InvalidArgument(format!(
                "accounts on {chain_id} are not EVM accounts"
            )));
        }
        Ok(Self::new(chain_id.clone(), address.parse()?))
    }
}

impl fmt::Display for AccountId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}", self.chain_id, self.address)
    }
}

impl FromStr for AccountId {
    type Err = SwapError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let (chain, address) = s
            .rsplit_once(':')
            .ok_or_else(|| SwapError::InvalidArgument(format!("invalid account id {s:?}")))?;
        Self::parse_on(&chain.parse()?, address)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
pub enum ParseUint256Error {
    #[error("empty string")]
    Empty,
    #[error("not a decimal digit string")]
    InvalidDigit,
    #[error("value exceeds 256 bits")]
    Overflow,
}

#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Default)]
pub struct Uint256(BigUint);

impl Uint256 {
    pub const BITS: u64 = 256;
}

impl FromStr for Uint256 {
    type Err = ParseUint256Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        if s.is_empty() {
            return Err(ParseUint256Error::Empty);
        }
        if !s.bytes().all(|b| b.is_ascii_digit()) {
            return Err(ParseUint256Error::InvalidDigit);
        }
        let value = BigUint::parse_bytes(s.as_bytes(), 10).ok_or(ParseUint256Error::InvalidDigit)?;
        if value.bits() > Self::BITS {
            return Err(ParseUint256Error::Overflow);
        }
        Ok(Self(value))
    }
}

impl fmt::Display for Uint256 {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<u64> for Uint256 {
    fn from(value: u64) -> Self {
        Self(BigUint::from(value))
    }
}

impl From<u128> for Uint256 {
    fn from(value: u128) -> Self {
        Self(BigUint::from(value))
    }
}

impl Serialize for Uint256 {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

impl<'de> Deserialize<'de> for Uint256 {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let s = String::deserialize(deserializer)?;
        s.parse().map_err(serde::de::Error::custom)
    }
}

#[derive(Debug, Clone)]
pub struct SwapQuoteRequest {
    pub chain_id: ChainId,
    pub sell_token: Address,
    pub buy_token: Address,
    pub from: Address,
    pub sell_amount: String,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SwapQuote {
    pub buy_amount: Uint256,
    pub sell_amount: Uint256,
    pub fee_amount: Uint256,
    pub buy_token_quote_rate: Option<f64>,
    pub valid_to: DateTime<Utc>,
}

#[derive(Debug, Clone)]
pub struct TokenBalance {
    pub contract_address: Address,
    pub contract_name: String,
    pub balance: Uint256,
}

#[derive(Debug, Clone, Default)]
pub struct SwapAssets {
    pub sell: Vec<TokenBalance>,
    pub buy: Vec<SwapToken>,
}

#[derive(Debug, Clone, Default)]
pub struct SwapConfig {
    pub cow_api_url: Option<String>,
    pub covalent_api_url: Option<String>,
    pub covalent_api_key: Option<String>,
    pub request_timeout: Option<Duration>,
    pub quote_deadline: Option<Duration>,
}
