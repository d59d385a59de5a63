//! Print the wallet address without touching the network

use std::io::Write;

use alloy::primitives::Address;
use anyhow::Result;
use tracing::info;

use crate::config::Settings;
use crate::core::ProbeError;

/// Derive the wallet from `settings` and write its checksummed address
///
/// No provider is built, so the configured endpoint may be unreachable.
pub fn show_address<W: Write>(settings: &Settings, out: &mut W) -> Result<Address> {
    let wallet = settings.wallet()?.ok_or(ProbeError::MissingMnemonic)?;
    let address = wallet.address();
    info!(%address, path = %settings.derivation, "derived wallet address");
    writeln!(out, "{}", address)?;
    Ok(address)
}
