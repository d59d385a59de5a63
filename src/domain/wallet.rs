//! Mnemonic-derived signing wallet
//!
//! Key derivation and signing are alloy's; this type only pins the derived
//! key to a chain and hands out raw signed transactions.

use alloy::eips::eip2718::Encodable2718;
use alloy::network::{EthereumWallet, TransactionBuilder};
use alloy::primitives::{Address, Bytes};
use alloy::rpc::types::TransactionRequest;
use alloy::signers::local::{coins_bip39::English, MnemonicBuilder, PrivateKeySigner};
use alloy::signers::Signer;
use anyhow::{Context, Result};
use tracing::debug;

use crate::core::ProbeError;

/// BIP-44 derivation for Ethereum accounts
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Derivation {
    /// `m/44'/60'/0'/0/{index}`
    Index(u32),
    /// Explicit derivation path
    Path(String),
}

impl Default for Derivation {
    fn default() -> Self {
        Derivation::Index(0)
    }
}

impl std::fmt::Display for Derivation {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Derivation::Index(index) => write!(f, "m/44'/60'/0'/0/{}", index),
            Derivation::Path(path) => f.write_str(path),
        }
    }
}

/// Key pair derived from a mnemonic, bound to one chain
#[derive(Debug, Clone)]
pub struct Wallet {
    signer: PrivateKeySigner,
    chain_id: u64,
}

impl Wallet {
    /// Derive a wallet from an English BIP-39 phrase
    pub fn from_mnemonic(
        phrase: &str,
        derivation: &Derivation,
        chain_id: u64,
    ) -> Result<Self, ProbeError> {
        let invalid = |e: alloy::signers::local::LocalSignerError| {
            ProbeError::InvalidMnemonic(e.to_string())
        };

        let builder = MnemonicBuilder::<English>::default().phrase(phrase);
        let builder = match derivation {
            Derivation::Index(index) => builder.index(*index).map_err(invalid)?,
            Derivation::Path(path) => builder.derivation_path(path.as_str()).map_err(invalid)?,
        };
        let signer = builder.build().map_err(invalid)?.with_chain_id(Some(chain_id));

        debug!(address = %signer.address(), path = %derivation, "derived wallet");
        Ok(Self { signer, chain_id })
    }

    pub fn address(&self) -> Address {
        self.signer.address()
    }

    pub fn chain_id(&self) -> u64 {
        self.chain_id
    }

    /// Sign `request` and return the EIP-2718 encoded transaction
    ///
    /// `from` and `chain_id` are always taken from the wallet. The request
    /// must already carry nonce, gas limit and gas price.
    pub async fn sign_transaction(&self, request: TransactionRequest) -> Result<Bytes> {
        let request = request
            .with_from(self.address())
            .with_chain_id(self.chain_id);
        let wallet = EthereumWallet::from(self.signer.clone());
        let envelope = request
            .build(&wallet)
            .await
            .context("Failed to sign transaction")?;
        Ok(envelope.encoded_2718().into())
    }
}
