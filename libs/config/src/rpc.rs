//! Public RPC endpoints by chain

use types::ChainId;

/// Used for any chain missing from [`RPC_URLS`]
pub const DEFAULT_RPC_URL: &str = "https://eth.llamarpc.com";

/// Public endpoints per chain
pub const RPC_URLS: &[(ChainId, &str)] = &[
    // Ethereum
    (ChainId(1), "https://eth.llamarpc.com"),
    (ChainId(11155111), "https://rpc.sepolia.org"),
    // BNB Chain
    (ChainId(56), "https://bsc-dataseed.binance.org"),
    (ChainId(97), "https://data-seed-prebsc-1-s1.binance.org:8545"),
    // Base
    (ChainId(8453), "https://mainnet.base.org"),
    (ChainId(84532), "https://sepolia.base.org"),
];

/// Static endpoint for `chain_id`, if one is configured
pub fn static_rpc_url(chain_id: ChainId) -> Option<&'static str> {
    RPC_URLS
        .iter()
        .find(|(id, _)| *id == chain_id)
        .map(|(_, url)| *url)
}

/// Static endpoint for `chain_id`, falling back to [`DEFAULT_RPC_URL`]
pub fn rpc_url(chain_id: ChainId) -> &'static str {
    static_rpc_url(chain_id).unwrap_or(DEFAULT_RPC_URL)
}
