use std::{collections::HashMap, sync::LazyLock};

use tracing::warn;

use crate::types::{AccountId, ChainId};

pub const MAINNET_CHAIN_ID: u64 = 1;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SwapToken {
    pub address: String,
    pub id: AccountId,
    pub symbol: String,
    pub name: String,
    pub decimals: u8,
    pub logo: String,
}

#[derive(Debug, Clone, Copy)]
pub struct TokenDefinition {
    pub symbol: &'static str,
    pub name: &'static str,
    pub address: &'static str,
    pub decimals: u8,
    pub logo: &'static str,
}

pub const MAINNET_SWAP_TOKENS: &[TokenDefinition] = &[
    TokenDefinition {
        symbol: "USDC",
        name: "USD Coin",
        address: "0xA0b86991c6218b36c1d19D4a2e9Eb0cE3606eB48",
        decimals: 6,
        logo: "https://tokens.1inch.io/0xa0b86991c6218b36c1d19d4a2e9eb0ce3606eb48.png",
    },
    TokenDefinition {
        symbol: "WETH",
        name: "Wrapped Ether",
        address: "0xC02aaA39b223FE8D0A0e5C4F27eAD9083C756Cc2",
        decimals: 18,
        logo: "https://tokens.1inch.io/0xc02aaa39b223fe8d0a0e5c4f27ead9083c756cc2.png",
    },
    TokenDefinition {
        symbol: "USDT",
        name: "Tether USD",
        address: "0xdAC17F958D2ee523a2206206994597C13D831ec7",
        decimals: 6,
        logo: "https://tokens.1inch.io/0xdac17f958d2ee523a2206206994597c13d831ec7.png",
    },
    TokenDefinition {
        symbol: "DAI",
        name: "Dai Stablecoin",
        address: "0x6B175474E89094C44Da98b954EedeAC495271d0F",
        decimals: 18,
        logo: "https://tokens.1inch.io/0x6b175474e89094c44da98b954eedeac495271d0f.png",
    },
];

static GLOBAL_REGISTRY: LazyLock<TokenRegistry> = LazyLock::new(|| {
    TokenRegistry::from_definitions(&ChainId::eip155(MAINNET_CHAIN_ID), MAINNET_SWAP_TOKENS)
});

#[derive(Debug, Clone, Default)]
pub struct TokenRegistry {
    tokens: Vec<SwapToken>,
    by_id: HashMap<String, usize>,
}

impl TokenRegistry {
    pub fn global() -> &'static TokenRegistry {
        &GLOBAL_REGISTRY
    }

    pub fn from_definitions(chain_id: &ChainId, definitions: &[TokenDefinition]) -> Self {
        let mut registry = Self::default();

        for def in definitions {
            let id = match AccountId::parse_on(chain_id, def.address) {
                Ok(id) => id,
                Err(e) => {
                    warn!(symbol = def.symbol, address = def.address, error = %e, "skipping swap token");
                    continue;
                }
            };

            let key = id.to_string();
            if registry.by_id.contains_key(&key) {
                warn!(symbol = def.symbol, id = %key, "duplicate swap token");
                continue;
            }

            registry.by_id.insert(key, registry.tokens.len());
            registry.tokens.push(SwapToken {
                address: def.address.to_string(),
                id,
                symbol: def.symbol.to_string(),
                name: def.name.to_string(),
                decimals: def.decimals,
                logo: def.logo.to_string(),
            });
        }

        registry
    }

    /// Looks up a token by the string form of its CAIP-10 id. Address case
    /// does not matter.
    pub fn lookup(&self, chain_qualified_id: &str) -> Option<&SwapToken> {
        let id: AccountId = chain_qualified_id.parse().ok()?;
        self.get(&id)
    }

    pub fn get(&self, id: &AccountId) -> Option<&SwapToken> {
        self.by_id
            .get(&id.to_string())
            .and_then(|&i| self.tokens.get(i))
    }

    pub fn contains(&self, id: &AccountId) -> bool {
        self.get(id).is_some()
    }

    pub fn list_for_chain(&self, chain_id: &ChainId) -> Vec<&SwapToken> {
        self.tokens
            .iter()
            .filter(|t| &t.id.chain_id == chain_id)
            .collect()
    }

    pub fn tokens(&self) -> &[SwapToken] {
        &self.tokens
    }

    pub fn len(&self) -> usize {
        self.tokens.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tokens.is_empty()
    }
}
