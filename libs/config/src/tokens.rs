//! Built-in ERC-20 token table
//!
//! Maps `(chain, symbol)` to a deployed contract. A missing entry means the
//! token is not available on that chain and must be reported as N/A without
//! touching the network.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use types::ChainId;

/// Symbols of the fixed token set
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum TokenSymbol {
    Usdc,
    Usdt,
}

impl TokenSymbol {
    /// Every tracked symbol
    pub const ALL: [TokenSymbol; 2] = [TokenSymbol::Usdc, TokenSymbol::Usdt];

    pub fn as_str(&self) -> &'static str {
        match self {
            TokenSymbol::Usdc => "USDC",
            TokenSymbol::Usdt => "USDT",
        }
    }
}

impl fmt::Display for TokenSymbol {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for TokenSymbol {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        TokenSymbol::ALL
            .into_iter()
            .find(|symbol| symbol.as_str().eq_ignore_ascii_case(s.trim()))
            .ok_or_else(|| format!("unknown token symbol: {}", s))
    }
}

/// One deployed token contract
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TokenConfig {
    pub address: &'static str,
    pub symbol: TokenSymbol,
    pub name: &'static str,
    pub decimals: u8,
}

struct ChainTokens {
    chain_id: ChainId,
    usdc: Option<TokenConfig>,
    usdt: Option<TokenConfig>,
}

const TOKEN_TABLE: &[ChainTokens] = &[
    // Ethereum Mainnet
    ChainTokens {
        chain_id: ChainId(1),
        usdc: Some(TokenConfig {
            address: "0xA0b86991c6218b36c1d19d4a2e9eb0ce3606eb48",
            symbol: TokenSymbol::Usdc,
            name: "USD Coin",
            decimals: 6,
        }),
        usdt: None,
    },
    ChainTokens {
        chain_id: ChainId(11155111),
        usdc: None,
        usdt: None,
    },
    ChainTokens {
        chain_id: ChainId(56),
        usdc: None,
        usdt: None,
    },
    // BNB Chain Testnet
    ChainTokens {
        chain_id: ChainId(97),
        usdc: Some(TokenConfig {
            address: "0xb32B8625D2708FC7E7041BE4169EB188eeea3c14",
            symbol: TokenSymbol::Usdc,
            name: "USD Coin",
            decimals: 18,
        }),
        usdt: Some(TokenConfig {
            address: "0x222D12d538b7FB8B17723322aF40379D51C70372",
            symbol: TokenSymbol::Usdt,
            name: "Tether USD",
            decimals: 18,
        }),
    },
    ChainTokens {
        chain_id: ChainId(8453),
        usdc: None,
        usdt: None,
    },
    ChainTokens {
        chain_id: ChainId(84532),
        usdc: None,
        usdt: None,
    },
];

/// Contract for `symbol` on `chain_id`, or `None` when not deployed there
pub fn token_config(chain_id: Option<ChainId>, symbol: TokenSymbol) -> Option<TokenConfig> {
    let chain_id = chain_id?;
    let entry = TOKEN_TABLE.iter().find(|entry| entry.chain_id == chain_id)?;
    match symbol {
        TokenSymbol::Usdc => entry.usdc,
        TokenSymbol::Usdt => entry.usdt,
    }
}

/// Contract address for `symbol` on `chain_id`
pub fn token_address(symbol: TokenSymbol, chain_id: Option<ChainId>) -> Option<&'static str> {
    token_config(chain_id, symbol).map(|config| config.address)
}

/// Every tracked symbol paired with its contract on `chain_id`
pub fn tokens_for_chain(chain_id: ChainId) -> Vec<(TokenSymbol, Option<TokenConfig>)> {
    TokenSymbol::ALL
        .into_iter()
        .map(|symbol| (symbol, token_config(Some(chain_id), symbol)))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_mainnet_has_only_usdc() {
        let usdc = token_config(Some(ChainId(1)), TokenSymbol::Usdc).unwrap();
        assert_eq!(usdc.decimals, 6);
        assert!(token_config(Some(ChainId(1)), TokenSymbol::Usdt).is_none());
    }

    #[test]
    fn test_bsc_testnet_tokens_use_18_decimals() {
        for (_, config) in tokens_for_chain(ChainId(97)) {
            assert_eq!(config.unwrap().decimals, 18);
        }
    }

    #[test]
    fn test_unknown_chain_has_no_tokens() {
        assert!(tokens_for_chain(ChainId(137))
            .iter()
            .all(|(_, config)| config.is_none()));
        assert!(token_address(TokenSymbol::Usdc, None).is_none());
    }

    #[test]
    fn test_symbol_parsing() {
        assert_eq!("usdt".parse::<TokenSymbol>().unwrap(), TokenSymbol::Usdt);
        assert!("dai".parse::<TokenSymbol>().is_err());
    }
}
