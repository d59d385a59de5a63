//! The example runner: provider, wallet and contract wired together

use std::io::Write;
use std::time::Duration;

use alloy::primitives::Address;
use anyhow::{Context, Result};
use tracing::{info, warn};

use crate::config::Settings;
use crate::core::ProbeError;
use crate::domain::{ContractArtifact, ContractFactory, Wallet};
use crate::infrastructure::ethereum::types::format_timestamp;
use crate::infrastructure::ethereum::{create_provider, EthereumProvider, RawBlock};

/// Printed once the example round-trip has completed
pub const COMPLETION_MARKER: &str = "done";

/// What a successful `run` observed
#[derive(Debug, Clone)]
pub struct RunOutcome {
    pub endpoint: String,
    pub wallet: Option<Address>,
    /// `None` when the node answered `null` for the latest block
    pub latest_block: Option<RawBlock>,
}

/// How long to wait for receipts of transactions this runner sends
#[derive(Debug, Clone, Copy)]
pub struct ReceiptPolicy {
    pub poll_interval: Duration,
    pub timeout: Duration,
}

impl Default for ReceiptPolicy {
    fn default() -> Self {
        Self {
            poll_interval: Duration::from_secs(1),
            timeout: Duration::from_secs(120),
        }
    }
}

pub struct ExampleRunner {
    provider: Box<dyn EthereumProvider>,
    wallet: Option<Wallet>,
    factory: ContractFactory,
    chain_id: u64,
    receipts: ReceiptPolicy,
}

impl ExampleRunner {
    /// Build provider, wallet and contract factory from resolved settings
    ///
    /// The mnemonic is consumed here and zeroized once the key is derived.
    pub async fn new(settings: Settings) -> Result<Self> {
        let wallet = settings.wallet()?;
        if wallet.is_none() {
            warn!("no mnemonic supplied; signing commands are unavailable");
        }

        let Settings {
            provider,
            chain_id,
            artifact,
            poll_interval,
            receipt_timeout,
            mnemonic,
            derivation: _,
        } = settings;
        drop(mnemonic);

        let artifact = match artifact {
            Some(path) => ContractArtifact::from_path(&path)?,
            None => ContractArtifact::embedded()?,
        };

        let endpoint = provider.display();
        let provider = create_provider(provider)
            .await
            .with_context(|| format!("connect to {}", endpoint))?;

        Ok(Self::from_parts(
            provider,
            wallet,
            ContractFactory::new(artifact),
            chain_id,
            ReceiptPolicy {
                poll_interval,
                timeout: receipt_timeout,
            },
        ))
    }

    pub fn from_parts(
        provider: Box<dyn EthereumProvider>,
        wallet: Option<Wallet>,
        factory: ContractFactory,
        chain_id: u64,
        receipts: ReceiptPolicy,
    ) -> Self {
        Self {
            provider,
            wallet,
            factory,
            chain_id,
            receipts,
        }
    }

    pub fn provider(&self) -> &dyn EthereumProvider {
        self.provider.as_ref()
    }

    /// The signing wallet, required by every command that sends a transaction
    pub fn wallet(&self) -> Result<&Wallet, ProbeError> {
        self.wallet.as_ref().ok_or(ProbeError::MissingMnemonic)
    }

    pub fn factory(&self) -> &ContractFactory {
        &self.factory
    }

    pub fn chain_id(&self) -> u64 {
        self.chain_id
    }

    pub fn receipts(&self) -> ReceiptPolicy {
        self.receipts
    }

    /// Fetch the latest block, then write the completion marker to `out`
    ///
    /// Nothing is written when the request fails.
    pub async fn run<W: Write>(&self, out: &mut W) -> Result<RunOutcome> {
        let endpoint = self.provider.endpoint_name();
        info!(
            endpoint = %endpoint,
            chain_id = self.chain_id,
            contract = %self.factory.artifact().name,
            bytecode_len = self.factory.artifact().bytecode.len(),
            "requesting latest block"
        );

        let latest_block = self
            .provider
            .latest_block()
            .await
            .with_context(|| format!("fetch latest block from {}", endpoint))?;

        match &latest_block {
            Some(block) => info!(
                number = block.number,
                hash = %block.hash,
                timestamp = %format_timestamp(block.timestamp),
                txs = block.transactions.len(),
                "latest block"
            ),
            None => warn!("endpoint returned no latest block"),
        }

        writeln!(out, "{}", COMPLETION_MARKER)?;

        Ok(RunOutcome {
            endpoint,
            wallet: self.wallet.as_ref().map(Wallet::address),
            latest_block,
        })
    }
}
