//! Infrastructure layer - External service integrations
//!
//! This layer contains:
//! - Alloy-based Ethereum provider implementations
//! - ABI encoding and decoding using alloy-dyn-abi

pub mod abi;
pub mod ethereum;

pub use abi::{AlloyAbiCodec, AlloyAbiDecoder};
pub use ethereum::{create_provider, EthereumProvider, ProviderConfig};
