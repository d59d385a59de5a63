//! Deploy the artifact and read the fresh instance back

use std::io::Write;

use alloy::primitives::{Address, B256};
use anyhow::{Context, Result};
use tracing::info;

use super::send_signed;
use crate::core::{ExampleRunner, ProbeError};

/// Function queried on the new instance when the artifact has it
const PROBE_FUNCTION: &str = "get";

#[derive(Debug, Clone)]
pub struct Deployment {
    pub tx_hash: B256,
    pub address: Address,
    pub gas_used: u64,
    /// Decoded `get()` result, if the contract exposes it
    pub probe_value: Option<String>,
}

pub async fn deploy<W: Write>(runner: &ExampleRunner, out: &mut W) -> Result<Deployment> {
    let factory = runner.factory();
    info!(
        contract = %factory.artifact().name,
        bytecode_len = factory.artifact().bytecode.len(),
        "deploying contract"
    );

    let receipt = send_signed(runner, factory.deploy_transaction()).await?;
    let tx_hash = receipt.transaction_hash;
    writeln!(out, "transaction: {}", tx_hash)?;

    let address = receipt
        .contract_address
        .ok_or(ProbeError::NoContractAddress(tx_hash))?;
    writeln!(out, "contract: {}", address)?;

    let contract = factory.attach(address);
    let probe_value = if let Ok(signature) = contract.function(PROBE_FUNCTION, 0) {
        let request = contract.call_request(PROBE_FUNCTION, &[])?;
        let data = runner
            .provider()
            .call(request)
            .await
            .with_context(|| format!("call {}() on {}", PROBE_FUNCTION, address))?;
        let value = contract
            .decode_output(&signature, &data)?
            .into_iter()
            .map(|output| output.value)
            .collect::<Vec<_>>()
            .join(", ");
        writeln!(out, "{}(): {}", PROBE_FUNCTION, value)?;
        Some(value)
    } else {
        None
    };

    Ok(Deployment {
        tx_hash,
        address,
        gas_used: receipt.gas_used,
        probe_value,
    })
}
