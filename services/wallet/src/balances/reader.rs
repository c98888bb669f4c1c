//! ERC-20 balance reads

use async_trait::async_trait;
use dashmap::DashMap;
use tracing::{debug, warn};
use web3::contract::{Contract, Options};
use web3::transports::Http;
use web3::types::{Address, H160, U256};
use web3::Web3;

use super::format::format_units;
use crate::error::ProviderRpcError;

/// Minimal ERC-20 ABI: decimals, balanceOf, symbol
const ERC20_ABI: &str = r#"[
    {"constant":true,"inputs":[],"name":"decimals","outputs":[{"name":"","type":"uint8"}],"type":"function"},
    {"constant":true,"inputs":[{"name":"_owner","type":"address"}],"name":"balanceOf","outputs":[{"name":"balance","type":"uint256"}],"type":"function"},
    {"constant":true,"inputs":[],"name":"symbol","outputs":[{"name":"","type":"string"}],"type":"function"}
]"#;

/// Raw on-chain balance
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RawBalance {
    pub raw: U256,
    pub decimals: u8,
    pub symbol: Option<String>,
}

impl RawBalance {
    /// Human-readable amount
    pub fn display_value(&self) -> String {
        format_units(self.raw, self.decimals)
    }
}

/// Reads one token balance for one owner
#[async_trait]
pub trait BalanceReader: Send + Sync {
    async fn read_balance(
        &self,
        endpoint: &str,
        token: &str,
        owner: &str,
    ) -> Result<RawBalance, ProviderRpcError>;
}

/// Parse a `0x`-prefixed 20-byte address
pub fn parse_address(address: &str) -> Result<Address, ProviderRpcError> {
    let trimmed = address.trim();
    let digits = trimmed
        .strip_prefix("0x")
        .or_else(|| trimmed.strip_prefix("0X"))
        .ok_or_else(|| ProviderRpcError::message(format!("invalid address: {}", address)))?;

    let bytes = hex::decode(digits)
        .map_err(|_| ProviderRpcError::message(format!("invalid address: {}", address)))?;
    if bytes.len() != 20 {
        return Err(ProviderRpcError::message(format!(
            "invalid address: {}",
            address
        )));
    }

    Ok(H160::from_slice(&bytes))
}

/// [`BalanceReader`] over web3 HTTP transports, cached per endpoint
pub struct Web3BalanceReader {
    clients: DashMap<String, Web3<Http>>,
    fallback_decimals: u8,
}

impl Web3BalanceReader {
    pub fn new(fallback_decimals: u8) -> Self {
        Self {
            clients: DashMap::new(),
            fallback_decimals,
        }
    }

    fn client(&self, endpoint: &str) -> Result<Web3<Http>, ProviderRpcError> {
        if let Some(client) = self.clients.get(endpoint) {
            return Ok(client.clone());
        }

        let transport = Http::new(endpoint)?;
        let client = Web3::new(transport);
        self.clients.insert(endpoint.to_string(), client.clone());
        debug!(endpoint, "Created RPC client");
        Ok(client)
    }
}

#[async_trait]
impl BalanceReader for Web3BalanceReader {
    async fn read_balance(
        &self,
        endpoint: &str,
        token: &str,
        owner: &str,
    ) -> Result<RawBalance, ProviderRpcError> {
        let token_address = parse_address(token)?;
        let owner_address = parse_address(owner)?;

        let web3 = self.client(endpoint)?;
        let contract = Contract::from_json(web3.eth(), token_address, ERC20_ABI.as_bytes())
            .map_err(|e| ProviderRpcError::message(format!("ERC-20 interface error: {}", e)))?;

        let decimals = match contract
            .query::<U256, _, _, _>("decimals", (), None, Options::default(), None)
            .await
        {
            Ok(value) if value <= U256::from(u8::MAX) => value.low_u32() as u8,
            Ok(value) => {
                warn!(token, %value, fallback = self.fallback_decimals, "decimals() out of range");
                self.fallback_decimals
            }
            Err(e) => {
                warn!(token, error = %e, fallback = self.fallback_decimals, "decimals() failed");
                self.fallback_decimals
            }
        };

        let raw: U256 = contract
            .query("balanceOf", (owner_address,), None, Options::default(), None)
            .await?;

        let symbol = match contract
            .query::<String, _, _, _>("symbol", (), None, Options::default(), None)
            .await
        {
            Ok(symbol) => Some(symbol),
            Err(e) => {
                debug!(token, error = %e, "symbol() unavailable");
                None
            }
        };

        Ok(RawBalance {
            raw,
            decimals,
            symbol,
        })
    }
}
