//! Ethereum infrastructure - Alloy provider implementations

mod provider;
pub mod types;

pub use provider::{
    create_provider, AlloyProvider, EthereumProvider, ProviderConfig, RawBlock,
};
