use crate::config::NetworkConfig;
use crate::ethereum::utils;
use alloy::{
    primitives::{Address, Bytes, U256},
    providers::{Provider, ProviderBuilder, RootProvider},
    rpc::types::TransactionRequest,
    transports::http::{Client, Http},
};
use anyhow::{anyhow, Result};
use async_trait::async_trait;

/// Read-only access to a chain. Everything the aggregator learns goes
/// through these two methods.
#[async_trait]
pub trait ChainReader: Send + Sync {
    /// `eth_call` against `to` with ABI-encoded `input`.
    async fn call(&self, to: Address, input: Bytes) -> Result<Bytes>;

    /// `eth_getStorageAt` for one 32-byte slot at the latest block.
    async fn storage_at(&self, address: Address, slot: U256) -> Result<U256>;
}

/// JSON-RPC client over HTTP, created once per run and shared.
#[derive(Debug)]
pub struct RpcClient {
    provider: RootProvider<Http<Client>>,
    endpoint: String,
}

impl RpcClient {
    pub fn new(network_config: &NetworkConfig) -> Result<Self> {
        let url = network_config
            .rpc_url
            .parse()
            .map_err(|e| anyhow!("Invalid RPC URL '{}': {}", network_config.rpc_url, e))?;
        let provider = ProviderBuilder::new().on_http(url);

        Ok(Self {
            provider,
            endpoint: network_config.rpc_url.clone(),
        })
    }

    pub fn endpoint(&self) -> &str {
        &self.endpoint
    }

    /// Compare the endpoint's chain id with the configured one.
    pub async fn check_chain_id(&self, expected: u64) -> Result<()> {
        let chain_id = self.provider.get_chain_id().await.map_err(|e| {
            anyhow!(
                "Cannot connect to '{}': {}",
                self.endpoint,
                utils::interpret_rpc_error(&e.to_string())
            )
        })?;

        if chain_id != expected {
            return Err(anyhow!(
                "Endpoint '{}' reports chain id {}, configuration expects {}",
                self.endpoint,
                chain_id,
                expected
            ));
        }
        Ok(())
    }
}

#[async_trait]
impl ChainReader for RpcClient {
    async fn call(&self, to: Address, input: Bytes) -> Result<Bytes> {
        let request = TransactionRequest::default().to(to).input(input.into());

        self.provider.call(&request).await.map_err(|e| {
            tracing::debug!("RPC error details: {}", e);
            anyhow!(utils::interpret_rpc_error(&e.to_string()))
        })
    }

    async fn storage_at(&self, address: Address, slot: U256) -> Result<U256> {
        // Block id defaults to `latest`.
        self.provider
            .get_storage_at(address, slot)
            .await
            .map_err(|e| {
                tracing::debug!("RPC error details: {}", e);
                anyhow!(utils::interpret_rpc_error(&e.to_string()))
            })
    }
}
