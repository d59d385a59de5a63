//! Invoke one function of a deployed contract

use std::io::Write;

use alloy::network::TransactionBuilder;
use alloy::primitives::{Address, B256};
use anyhow::{Context, Result};
use tracing::{debug, info};

use super::send_signed;
use crate::core::ExampleRunner;
use crate::domain::abi::DecodedArg;

#[derive(Debug, Clone)]
pub enum CallOutcome {
    /// View/pure function answered by `eth_call`
    Read(Vec<DecodedArg>),
    /// State-changing function mined successfully
    Sent { tx_hash: B256, gas_used: u64 },
}

pub async fn call<W: Write>(
    runner: &ExampleRunner,
    address: Address,
    function: &str,
    args: &[String],
    out: &mut W,
) -> Result<CallOutcome> {
    let contract = runner.factory().attach(address);
    let signature = contract.function(function, args.len())?;
    let request = contract.call_request(function, args)?;

    if let Some(input) = request.input.input() {
        if let Some(decoded) = contract.describe_calldata(input)? {
            debug!(signature = %decoded.signature, args = ?decoded.arguments, "encoded call");
        }
    }

    if signature.mutability.is_read_only() {
        // Some nodes evaluate msg.sender, so pass the wallet when there is one
        let request = match runner.wallet() {
            Ok(wallet) => request.with_from(wallet.address()),
            Err(_) => request,
        };
        let data = runner
            .provider()
            .call(request)
            .await
            .with_context(|| format!("call {} on {}", signature.signature, address))?;
        let outputs = contract.decode_output(&signature, &data)?;
        for output in &outputs {
            writeln!(out, "{} ({}): {}", output.name, output.kind, output.value)?;
        }
        return Ok(CallOutcome::Read(outputs));
    }

    info!(
        signature = %signature.signature,
        selector = %signature.selector_hex(),
        contract = %address,
        "sending state-changing call"
    );
    let receipt = send_signed(runner, request).await?;
    writeln!(out, "transaction: {}", receipt.transaction_hash)?;
    writeln!(out, "status: success, gas used: {}", receipt.gas_used)?;

    Ok(CallOutcome::Sent {
        tx_hash: receipt.transaction_hash,
        gas_used: receipt.gas_used,
    })
}
