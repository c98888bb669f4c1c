//! Wallet Settings Module
//!
//! Layered runtime settings for the wallet service: built-in defaults, an
//! optional TOML file, then `WALLET__`-prefixed environment variables
//! (for example `WALLET__RPC__DEFAULT_URL`).

use anyhow::{anyhow, Context, Result};
use config_crate::{Config, Environment, File};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::path::Path;
use tracing::{debug, info};
use types::ChainId;

use crate::rpc::{static_rpc_url, DEFAULT_RPC_URL};
use crate::tokens::TokenSymbol;

/// Decimal count assumed when a token's `decimals()` call fails
pub const DEFAULT_FALLBACK_DECIMALS: u8 = 6;

/// Main settings structure
#[derive(Debug, Deserialize, Serialize, Clone, PartialEq)]
#[serde(default)]
pub struct WalletSettings {
    /// Default tracing filter when `RUST_LOG` is unset
    pub log_level: String,

    /// RPC endpoint resolution
    pub rpc: RpcSettings,

    /// Balance coordinator settings
    pub balances: BalanceSettings,
}

/// RPC endpoint settings
#[derive(Debug, Deserialize, Serialize, Clone, PartialEq)]
#[serde(default)]
pub struct RpcSettings {
    /// Endpoint for chains without a static or overridden entry
    pub default_url: String,

    /// Per-chain overrides keyed by decimal chain id
    pub endpoints: HashMap<String, String>,
}

/// Balance read settings
#[derive(Debug, Deserialize, Serialize, Clone, PartialEq)]
#[serde(default)]
pub struct BalanceSettings {
    pub fallback_decimals: u8,

    /// Fixed token set fetched by the token balance coordinator
    pub tracked: Vec<TokenSymbol>,
}

impl Default for WalletSettings {
    fn default() -> Self {
        Self {
            log_level: "info".to_string(),
            rpc: RpcSettings::default(),
            balances: BalanceSettings::default(),
        }
    }
}

impl Default for RpcSettings {
    fn default() -> Self {
        Self {
            default_url: DEFAULT_RPC_URL.to_string(),
            endpoints: HashMap::new(),
        }
    }
}

impl Default for BalanceSettings {
    fn default() -> Self {
        Self {
            fallback_decimals: DEFAULT_FALLBACK_DECIMALS,
            tracked: TokenSymbol::ALL.to_vec(),
        }
    }
}

impl WalletSettings {
    /// Load settings from an optional file with environment overrides
    pub fn load(path: Option<&Path>) -> Result<Self> {
        let mut builder = Config::builder();

        if let Some(path) = path {
            info!("Loading wallet settings: {:?}", path);
            builder = builder.add_source(File::from(path).required(true));
        }

        // Override with environment variables (WALLET__ prefix)
        builder = builder.add_source(
            Environment::with_prefix("WALLET")
                .prefix_separator("__")
                .separator("__")
                .try_parsing(true),
        );

        let config = builder.build().context("Failed to build settings")?;

        let mut settings: WalletSettings = config
            .try_deserialize()
            .context("Failed to deserialize settings")?;

        settings.expand_env_vars()?;
        settings.validate().map_err(|e| anyhow!(e))?;

        debug!(
            "Wallet settings loaded: {} endpoint overrides, {} tracked tokens",
            settings.rpc.endpoints.len(),
            settings.balances.tracked.len()
        );

        Ok(settings)
    }

    /// Expand `${VAR}` references in endpoint URLs
    pub fn expand_env_vars(&mut self) -> Result<()> {
        let expanded = shellexpand::env(&self.rpc.default_url)
            .context("Failed to expand default RPC URL")?;
        self.rpc.default_url = expanded.to_string();

        for (chain, url) in self.rpc.endpoints.iter_mut() {
            let expanded = shellexpand::env(url.as_str())
                .with_context(|| format!("Failed to expand RPC URL for chain {}", chain))?;
            *url = expanded.to_string();
        }

        Ok(())
    }

    /// Validate settings
    pub fn validate(&self) -> std::result::Result<(), String> {
        validate_url(&self.rpc.default_url)?;

        for (chain, url) in &self.rpc.endpoints {
            if chain.parse::<u64>().is_err() {
                return Err(format!("RPC override key must be a decimal chain id: {}", chain));
            }
            validate_url(url)?;
        }

        if self.balances.tracked.is_empty() {
            return Err("At least one tracked token is required".to_string());
        }

        Ok(())
    }

    /// Endpoint for `chain_id`: override, then static table, then default
    pub fn rpc_url(&self, chain_id: ChainId) -> String {
        if let Some(url) = self.rpc.endpoints.get(&chain_id.to_string()) {
            return url.clone();
        }

        static_rpc_url(chain_id)
            .map(str::to_string)
            .unwrap_or_else(|| self.rpc.default_url.clone())
    }

    /// Render the effective settings as TOML
    pub fn to_toml(&self) -> Result<String> {
        toml::to_string_pretty(self).context("Failed to serialize settings")
    }
}

fn validate_url(raw: &str) -> std::result::Result<(), String> {
    if raw.is_empty() {
        return Err("RPC URL cannot be empty".to_string());
    }

    let parsed = url::Url::parse(raw).map_err(|e| format!("Invalid RPC URL {}: {}", raw, e))?;
    match parsed.scheme() {
        "http" | "https" => Ok(()),
        other => Err(format!("RPC URL must use http or https, got {}", other)),
    }
}
