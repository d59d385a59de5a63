//! Domain layer - wallet, contract descriptor and ABI models

pub mod abi;
pub mod contract;
pub mod wallet;

pub use contract::{ContractArtifact, ContractFactory, DeployedContract};
pub use wallet::{Derivation, Wallet};
