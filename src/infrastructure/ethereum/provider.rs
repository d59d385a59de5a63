//! Ethereum provider abstraction and Alloy implementations
//!
//! Blocks are fetched as raw JSON so that EVM-compatible chains with
//! non-standard block fields (Neon, Optimism/Base) parse the same way.

use std::time::{Duration, Instant};

use alloy::network::Ethereum;
use alloy::primitives::{Address, Bytes, B256, U256};
use alloy::providers::{
    fillers::{BlobGasFiller, ChainIdFiller, FillProvider, GasFiller, JoinFill, NonceFiller},
    Identity, Provider, ProviderBuilder, RootProvider,
};
use alloy::rpc::types::{TransactionReceipt, TransactionRequest};
use anyhow::{bail, Context, Result};
use tracing::debug;

use crate::core::ProbeError;

/// Block header summary parsed from JSON - works with any EVM chain
#[derive(Debug, Clone, PartialEq)]
pub struct RawBlock {
    pub number: u64,
    pub hash: String,
    pub parent_hash: String,
    pub timestamp: u64,
    pub gas_used: u64,
    pub gas_limit: u64,
    pub base_fee_per_gas: Option<u64>,
    pub miner: String,
    pub transactions: Vec<String>,
}

/// Provider configuration
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ProviderConfig {
    /// HTTP JSON-RPC endpoint
    Http(String),
    /// WebSocket endpoint
    WebSocket(String),
}

impl ProviderConfig {
    /// Pick the transport from the URL scheme
    pub fn from_url(url: &str) -> Result<Self> {
        let url = url.trim();
        let scheme = url.split("://").next().unwrap_or_default().to_ascii_lowercase();
        match scheme.as_str() {
            "http" | "https" => Ok(ProviderConfig::Http(url.to_string())),
            "ws" | "wss" => Ok(ProviderConfig::WebSocket(url.to_string())),
            _ => bail!("unsupported endpoint '{}': expected http(s):// or ws(s)://", url),
        }
    }

    /// Get display name for this endpoint
    pub fn display(&self) -> String {
        match self {
            ProviderConfig::Http(url) => url.clone(),
            ProviderConfig::WebSocket(url) => url.clone(),
        }
    }

    /// Check if this is a WebSocket endpoint
    pub fn is_websocket(&self) -> bool {
        matches!(self, ProviderConfig::WebSocket(_))
    }
}

/// Abstract Ethereum provider trait
///
/// Everything the probe asks of a node, independent of the transport.
#[async_trait::async_trait]
pub trait EthereumProvider: Send + Sync + 'static {
    /// Chain id reported by the node
    async fn chain_id(&self) -> Result<u64>;

    /// Get client version (for node detection)
    async fn client_version(&self) -> Result<String>;

    /// Get the current block number
    async fn block_number(&self) -> Result<u64>;

    /// Header summary of the most recent block (chain-agnostic raw format)
    async fn latest_block(&self) -> Result<Option<RawBlock>>;

    /// Get account balance
    async fn get_balance(&self, address: Address) -> Result<U256>;

    /// Nonce of the next transaction sent from `address`
    async fn transaction_count(&self, address: Address) -> Result<u64>;

    /// Current legacy gas price in wei
    async fn gas_price(&self) -> Result<u128>;

    /// Estimate gas (eth_estimateGas)
    async fn estimate_gas(&self, request: TransactionRequest) -> Result<u64>;

    /// Execute a call (eth_call)
    async fn call(&self, request: TransactionRequest) -> Result<Bytes>;

    /// Submit a signed, EIP-2718 encoded transaction and return its hash
    async fn send_raw_transaction(&self, raw: &[u8]) -> Result<B256>;

    /// Get transaction receipt
    async fn get_receipt(&self, hash: B256) -> Result<Option<TransactionReceipt>>;

    /// Poll for a receipt until it shows up or `timeout` elapses
    async fn wait_for_receipt(
        &self,
        hash: B256,
        poll_interval: Duration,
        timeout: Duration,
    ) -> Result<TransactionReceipt> {
        let started = Instant::now();
        loop {
            if let Some(receipt) = self.get_receipt(hash).await? {
                return Ok(receipt);
            }
            if started.elapsed() >= timeout {
                return Err(ProbeError::ReceiptTimeout(hash).into());
            }
            debug!(tx = %hash, "receipt not available yet");
            tokio::time::sleep(poll_interval).await;
        }
    }

    /// Get endpoint display name
    fn endpoint_name(&self) -> String;
}

type FilledProvider = FillProvider<
    JoinFill<
        Identity,
        JoinFill<GasFiller, JoinFill<BlobGasFiller, JoinFill<NonceFiller, ChainIdFiller>>>,
    >,
    RootProvider,
    Ethereum,
>;

/// Enum-based provider that stores the concrete provider for each transport
pub enum AlloyProvider {
    Http {
        provider: FilledProvider,
        endpoint: String,
    },
    WebSocket {
        provider: FilledProvider,
        endpoint: String,
    },
}

/// Create a provider from configuration
///
/// HTTP providers are lazy: nothing goes over the wire until the first call.
pub async fn create_provider(config: ProviderConfig) -> Result<Box<dyn EthereumProvider>> {
    match config {
        ProviderConfig::Http(url) => {
            let rpc_url = url.parse().context("Invalid HTTP URL")?;
            let provider = ProviderBuilder::new().connect_http(rpc_url);
            Ok(Box::new(AlloyProvider::Http {
                provider,
                endpoint: url,
            }))
        }
        ProviderConfig::WebSocket(url) => {
            let provider = ProviderBuilder::new()
                .connect(&url)
                .await
                .context("Failed to create WebSocket provider")?;
            Ok(Box::new(AlloyProvider::WebSocket {
                provider,
                endpoint: url,
            }))
        }
    }
}

// Dispatch a provider method to whichever transport is active
macro_rules! impl_provider_method {
    ($self:ident, $method:ident $(, $arg:expr)*) => {
        match $self {
            AlloyProvider::Http { provider, .. } => provider.$method($($arg),*).await,
            AlloyProvider::WebSocket { provider, .. } => provider.$method($($arg),*).await,
        }
    };
}

impl AlloyProvider {
    fn inner(&self) -> &FilledProvider {
        match self {
            AlloyProvider::Http { provider, .. } => provider,
            AlloyProvider::WebSocket { provider, .. } => provider,
        }
    }
}

#[async_trait::async_trait]
impl EthereumProvider for AlloyProvider {
    async fn chain_id(&self) -> Result<u64> {
        Ok(impl_provider_method!(self, get_chain_id)?)
    }

    async fn client_version(&self) -> Result<String> {
        Ok(impl_provider_method!(self, get_client_version)?)
    }

    async fn block_number(&self) -> Result<u64> {
        Ok(impl_provider_method!(self, get_block_number)?)
    }

    async fn latest_block(&self) -> Result<Option<RawBlock>> {
        // Hashes only; full transaction bodies are never needed
        let json: serde_json::Value = self
            .inner()
            .raw_request("eth_getBlockByNumber".into(), ("latest", false))
            .await
            .context("eth_getBlockByNumber failed")?;

        if json.is_null() {
            return Ok(None);
        }

        Ok(Some(parse_raw_block(&json)?))
    }

    async fn get_balance(&self, address: Address) -> Result<U256> {
        Ok(impl_provider_method!(self, get_balance, address)?)
    }

    async fn transaction_count(&self, address: Address) -> Result<u64> {
        Ok(impl_provider_method!(self, get_transaction_count, address)?)
    }

    async fn gas_price(&self) -> Result<u128> {
        Ok(impl_provider_method!(self, get_gas_price)?)
    }

    async fn estimate_gas(&self, request: TransactionRequest) -> Result<u64> {
        Ok(impl_provider_method!(self, estimate_gas, request)?)
    }

    async fn call(&self, request: TransactionRequest) -> Result<Bytes> {
        Ok(impl_provider_method!(self, call, request)?)
    }

    async fn send_raw_transaction(&self, raw: &[u8]) -> Result<B256> {
        let pending = self
            .inner()
            .send_raw_transaction(raw)
            .await
            .context("eth_sendRawTransaction failed")?;
        Ok(*pending.tx_hash())
    }

    async fn get_receipt(&self, hash: B256) -> Result<Option<TransactionReceipt>> {
        Ok(impl_provider_method!(self, get_transaction_receipt, hash)?)
    }

    fn endpoint_name(&self) -> String {
        match self {
            AlloyProvider::Http { endpoint, .. } => endpoint.clone(),
            AlloyProvider::WebSocket { endpoint, .. } => endpoint.clone(),
        }
    }
}

/// Parse raw JSON block response to our chain-agnostic RawBlock type
pub(crate) fn parse_raw_block(json: &serde_json::Value) -> Result<RawBlock> {
    if !json.is_object() {
        bail!("block response is not a JSON object: {}", json);
    }

    let number = parse_hex_u64(json.get("number").and_then(|v| v.as_str()).unwrap_or("0x0"))?;
    let hash = json
        .get("hash")
        .and_then(|v| v.as_str())
        .unwrap_or("0x0")
        .to_string();
    let parent_hash = json
        .get("parentHash")
        .and_then(|v| v.as_str())
        .unwrap_or("0x0")
        .to_string();
    let timestamp = parse_hex_u64(json.get("timestamp").and_then(|v| v.as_str()).unwrap_or("0x0"))?;
    let gas_used = parse_hex_u64(json.get("gasUsed").and_then(|v| v.as_str()).unwrap_or("0x0"))?;
    let gas_limit = parse_hex_u64(json.get("gasLimit").and_then(|v| v.as_str()).unwrap_or("0x0"))?;
    let base_fee_per_gas = json
        .get("baseFeePerGas")
        .and_then(|v| v.as_str())
        .and_then(|s| parse_hex_u64(s).ok());
    let miner = json
        .get("miner")
        .and_then(|v| v.as_str())
        .unwrap_or("0x0000000000000000000000000000000000000000")
        .to_string();

    // Either bare hashes or full transaction objects, depending on the request
    let transactions = json
        .get("transactions")
        .and_then(|v| v.as_array())
        .map(|txs| {
            txs.iter()
                .filter_map(|tx| {
                    tx.as_str()
                        .or_else(|| tx.get("hash").and_then(|h| h.as_str()))
                        .map(str::to_string)
                })
                .collect()
        })
        .unwrap_or_default();

    Ok(RawBlock {
        number,
        hash,
        parent_hash,
        timestamp,
        gas_used,
        gas_limit,
        base_fee_per_gas,
        miner,
        transactions,
    })
}

/// Parse hex string to u64
fn parse_hex_u64(s: &str) -> Result<u64> {
    let s = s
        .strip_prefix("0x")
        .or_else(|| s.strip_prefix("0X"))
        .unwrap_or(s);
    if s.is_empty() {
        return Ok(0);
    }
    u64::from_str_radix(s, 16).with_context(|| format!("Failed to parse hex u64 '{}'", s))
}
