//! Compare what the node reports with the configured network
//!
//! With a wallet loaded, its balance is reported as well.

use std::io::Write;

use alloy::primitives::U256;
use anyhow::{Context, Result};
use tracing::warn;

use crate::core::{ExampleRunner, ProbeError};
use crate::infrastructure::ethereum::types::format_ether;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NetworkInfo {
    pub chain_id: u64,
    /// `None` when the node does not implement `web3_clientVersion`
    pub client_version: Option<String>,
    pub block_number: u64,
    /// Wallet balance in wei, when a mnemonic was supplied
    pub balance: Option<U256>,
}

pub async fn check_network<W: Write>(runner: &ExampleRunner, out: &mut W) -> Result<NetworkInfo> {
    let provider = runner.provider();

    let chain_id = provider.chain_id().await.context("fetch chain id")?;
    if chain_id != runner.chain_id() {
        return Err(ProbeError::ChainMismatch {
            expected: runner.chain_id(),
            actual: chain_id,
        }
        .into());
    }

    let client_version = match provider.client_version().await {
        Ok(version) => Some(version),
        Err(err) => {
            warn!(error = %err, "client version unavailable");
            None
        }
    };
    let block_number = provider.block_number().await.context("fetch block number")?;
    let balance = match runner.wallet() {
        Ok(wallet) => Some(
            provider
                .get_balance(wallet.address())
                .await
                .context("fetch wallet balance")?,
        ),
        Err(_) => None,
    };

    writeln!(out, "endpoint: {}", provider.endpoint_name())?;
    writeln!(out, "chain id: {}", chain_id)?;
    writeln!(
        out,
        "client: {}",
        client_version.as_deref().unwrap_or("unknown")
    )?;
    writeln!(out, "block: {}", block_number)?;
    if let (Ok(wallet), Some(balance)) = (runner.wallet(), balance) {
        writeln!(out, "wallet: {} ({} ETH)", wallet.address(), format_ether(balance))?;
    }

    Ok(NetworkInfo {
        chain_id,
        client_version,
        block_number,
        balance,
    })
}
