//! Provider backed by a JSON-RPC HTTP endpoint
//!
//! Lets the session run against a plain node: `eth_requestAccounts` is
//! answered with `eth_accounts` and no events are ever emitted. A fixed
//! watch-only account list can stand in for the node's own accounts.

use async_trait::async_trait;
use serde_json::Value;
use tracing::debug;
use web3::transports::Http;
use web3::Transport;

use super::{Eip1193Provider, ProviderListener};
use crate::error::ProviderRpcError;

pub struct HttpProvider {
    transport: Http,
    url: String,
    is_metamask: bool,
    accounts: Option<Vec<String>>,
}

impl HttpProvider {
    /// Provider for the endpoint at `url`
    pub fn new(url: &str) -> Result<Self, ProviderRpcError> {
        let transport = Http::new(url)?;
        Ok(Self {
            transport,
            url: url.to_string(),
            is_metamask: false,
            accounts: None,
        })
    }

    /// Carry the MetaMask flag so discovery accepts this provider in its place
    pub fn flagged_as_metamask(mut self) -> Self {
        self.is_metamask = true;
        self
    }

    /// Answer account requests with `accounts` instead of asking the node
    pub fn with_accounts(mut self, accounts: Vec<String>) -> Self {
        self.accounts = Some(accounts);
        self
    }

    pub fn url(&self) -> &str {
        &self.url
    }
}

fn positional(params: Value) -> Vec<Value> {
    match params {
        Value::Null => Vec::new(),
        Value::Array(items) => items,
        other => vec![other],
    }
}

#[async_trait]
impl Eip1193Provider for HttpProvider {
    fn is_metamask(&self) -> bool {
        self.is_metamask
    }

    async fn request(&self, method: &str, params: Value) -> Result<Value, ProviderRpcError> {
        if let ("eth_requestAccounts" | "eth_accounts", Some(accounts)) = (method, &self.accounts) {
            return Ok(Value::from(accounts.clone()));
        }

        let method = match method {
            "eth_requestAccounts" => "eth_accounts",
            other => other,
        };

        debug!(url = %self.url, method, "JSON-RPC request");
        let result = self.transport.execute(method, positional(params)).await?;
        Ok(result)
    }

    fn on(&self, event: &str, _listener: ProviderListener) {
        debug!(event, "HTTP provider emits no events; subscription ignored");
    }

    fn remove_listener(&self, _event: &str, _listener: &ProviderListener) {}
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_positional_params() {
        assert!(positional(Value::Null).is_empty());
        assert_eq!(positional(json!(["0x1", "latest"])).len(), 2);
        assert_eq!(positional(json!({"to": "0x0"})), vec![json!({"to": "0x0"})]);
    }

    #[tokio::test]
    async fn test_watch_accounts_answer_locally() {
        let provider = HttpProvider::new("http://localhost:8545")
            .unwrap()
            .flagged_as_metamask()
            .with_accounts(vec!["0xabc".to_string()]);

        assert!(provider.is_metamask());
        let accounts = provider.request("eth_requestAccounts", Value::Null).await.unwrap();
        assert_eq!(accounts, json!(["0xabc"]));
    }

    #[test]
    fn test_rejects_bad_url() {
        assert!(HttpProvider::new("not a url").is_err());
    }

    #[tokio::test]
    #[ignore] // Requires network access
    async fn test_live_chain_id() {
        let provider = HttpProvider::new("https://eth.llamarpc.com").unwrap();
        let chain = provider.request("eth_chainId", Value::Null).await.unwrap();
        assert_eq!(chain, json!("0x1"));
    }
}
