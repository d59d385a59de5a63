//! Opt-in flows beyond the default latest-block round-trip
//!
//! - address: derive and print the wallet address, offline
//! - deploy: create the contract from its artifact and read it back
//! - call: invoke one contract function, read-only or signed
//! - network: compare the node's chain id with the configured one

pub mod address;
pub mod call;
pub mod deploy;
pub mod network;

use alloy::network::TransactionBuilder;
use alloy::rpc::types::{TransactionReceipt, TransactionRequest};
use anyhow::{Context, Result};
use tracing::info;

use crate::core::{ExampleRunner, ProbeError};
use crate::infrastructure::ethereum::types::format_gwei;

/// Fill nonce, gas price and gas limit, sign with the runner's wallet,
/// submit and wait for the receipt
///
/// A receipt with a failed status is an error.
pub(crate) async fn send_signed(
    runner: &ExampleRunner,
    request: TransactionRequest,
) -> Result<TransactionReceipt> {
    let wallet = runner.wallet()?;
    let provider = runner.provider();

    let nonce = provider
        .transaction_count(wallet.address())
        .await
        .context("fetch nonce")?;
    let gas_price = provider.gas_price().await.context("fetch gas price")?;

    let request = request
        .with_from(wallet.address())
        .with_nonce(nonce)
        .with_gas_price(gas_price);
    let gas_limit = provider
        .estimate_gas(request.clone())
        .await
        .context("estimate gas")?;
    let request = request.with_gas_limit(gas_limit);

    info!(
        from = %wallet.address(),
        nonce,
        gas_price_gwei = %format_gwei(gas_price),
        gas_limit,
        "sending transaction"
    );

    let raw = wallet.sign_transaction(request).await?;
    let hash = provider.send_raw_transaction(&raw).await?;
    info!(tx = %hash, "transaction submitted");

    let policy = runner.receipts();
    let receipt = provider
        .wait_for_receipt(hash, policy.poll_interval, policy.timeout)
        .await?;

    if !receipt.status() {
        return Err(ProbeError::TransactionReverted(hash).into());
    }

    info!(
        tx = %hash,
        block = ?receipt.block_number,
        gas_used = receipt.gas_used,
        "transaction mined"
    );
    Ok(receipt)
}
