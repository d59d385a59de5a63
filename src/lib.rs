//! evm-probe: connect to an EVM JSON-RPC endpoint, derive a wallet from a
//! mnemonic and optionally deploy or call the bundled counter contract.

pub mod config;
pub mod core;
pub mod domain;
pub mod infrastructure;
pub mod modules;

pub use crate::core::{ExampleRunner, ProbeError, RunOutcome};
