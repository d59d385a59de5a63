//! Typed failures callers may want to match on

use alloy::primitives::B256;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ProbeError {
    #[error("no mnemonic supplied (use --mnemonic-file, EVM_PROBE_MNEMONIC or wallet.mnemonic_file)")]
    MissingMnemonic,

    #[error("invalid mnemonic or derivation: {0}")]
    InvalidMnemonic(String),

    #[error("contract has no function named '{0}'")]
    UnknownFunction(String),

    #[error("function '{function}' takes {expected} argument(s), got {got}")]
    ArgumentCount {
        function: String,
        expected: usize,
        got: usize,
    },

    #[error("argument {index} of '{function}' is not a valid {kind}: {reason}")]
    InvalidArgument {
        function: String,
        index: usize,
        kind: String,
        reason: String,
    },

    #[error("endpoint reports chain id {actual}, configured {expected}")]
    ChainMismatch { expected: u64, actual: u64 },

    #[error("timed out waiting for receipt of {0}")]
    ReceiptTimeout(B256),

    #[error("receipt of {0} carries no contract address")]
    NoContractAddress(B256),

    #[error("transaction {0} reverted")]
    TransactionReverted(B256),
}
