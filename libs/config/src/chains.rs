//! Supported chain metadata

use types::ChainId;

/// Display metadata for one chain
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ChainConfig {
    pub id: ChainId,
    pub name: &'static str,
    pub short_name: &'static str,
    pub is_testnet: bool,
}

/// Label used for chains missing from [`CHAINS`]
pub const UNKNOWN_NETWORK: &str = "Unknown Network";

/// Every chain the wallet knows about
pub const CHAINS: &[ChainConfig] = &[
    // Ethereum
    ChainConfig {
        id: ChainId(1),
        name: "Ethereum Mainnet",
        short_name: "Ethereum",
        is_testnet: false,
    },
    ChainConfig {
        id: ChainId(11155111),
        name: "Ethereum Sepolia",
        short_name: "Sepolia",
        is_testnet: true,
    },
    // BNB Chain
    ChainConfig {
        id: ChainId(56),
        name: "BNB Chain Mainnet",
        short_name: "BNB Chain",
        is_testnet: false,
    },
    ChainConfig {
        id: ChainId(97),
        name: "BNB Chain Testnet",
        short_name: "BNB Testnet",
        is_testnet: true,
    },
    // Base
    ChainConfig {
        id: ChainId(8453),
        name: "Base Mainnet",
        short_name: "Base",
        is_testnet: false,
    },
    ChainConfig {
        id: ChainId(84532),
        name: "Base Sepolia",
        short_name: "Base Sepolia",
        is_testnet: true,
    },
];

/// Look up chain metadata
pub fn chain_config(chain_id: Option<ChainId>) -> Option<&'static ChainConfig> {
    let chain_id = chain_id?;
    CHAINS.iter().find(|chain| chain.id == chain_id)
}

/// Display name, or [`UNKNOWN_NETWORK`]
pub fn chain_name(chain_id: Option<ChainId>) -> &'static str {
    chain_config(chain_id)
        .map(|chain| chain.name)
        .unwrap_or(UNKNOWN_NETWORK)
}

/// True when the chain appears in [`CHAINS`]
pub fn is_supported_chain(chain_id: ChainId) -> bool {
    chain_config(Some(chain_id)).is_some()
}
