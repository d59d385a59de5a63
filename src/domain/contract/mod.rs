//! Contract descriptor (ABI + bytecode) and the requests built from it

mod artifact;
mod factory;

pub use artifact::ContractArtifact;
pub use factory::{ContractFactory, DeployedContract};
