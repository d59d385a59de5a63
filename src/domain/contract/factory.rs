//! Deploy transactions and call requests for a contract artifact

use alloy::network::TransactionBuilder;
use alloy::primitives::Address;
use alloy::rpc::types::TransactionRequest;
use anyhow::Result;

use super::ContractArtifact;
use crate::domain::abi::{AbiDecoder, AbiEncoder, DecodedArg, DecodedCall, FunctionSignature};
use crate::infrastructure::abi::{AlloyAbiCodec, AlloyAbiDecoder};

/// Builds deployments of one artifact and handles to deployed instances
pub struct ContractFactory {
    artifact: ContractArtifact,
    codec: AlloyAbiCodec,
}

impl ContractFactory {
    pub fn new(artifact: ContractArtifact) -> Self {
        let codec = AlloyAbiCodec::new(artifact.abi.clone());
        Self { artifact, codec }
    }

    pub fn artifact(&self) -> &ContractArtifact {
        &self.artifact
    }

    /// Creation transaction: bytecode as input, no recipient
    ///
    /// The counter has no constructor arguments; nonce, gas and signer are
    /// left for the caller.
    pub fn deploy_transaction(&self) -> TransactionRequest {
        TransactionRequest::default().with_deploy_code(self.artifact.bytecode.clone())
    }

    /// Handle to an instance already on chain
    pub fn attach(&self, address: Address) -> DeployedContract {
        DeployedContract {
            address,
            codec: self.codec.clone(),
        }
    }
}

/// A deployed instance of the artifact
#[derive(Debug, Clone)]
pub struct DeployedContract {
    address: Address,
    codec: AlloyAbiCodec,
}

impl DeployedContract {
    pub fn address(&self) -> Address {
        self.address
    }

    /// Metadata of the overload of `name` that takes `arity` arguments
    pub fn function(&self, name: &str, arity: usize) -> Result<FunctionSignature> {
        Ok(self.codec.describe(name, arity)?)
    }

    /// Request addressed to this contract calling `function(args...)`
    pub fn call_request(&self, function: &str, args: &[String]) -> Result<TransactionRequest> {
        let input = self.codec.encode_call(function, args)?;
        Ok(TransactionRequest::default()
            .with_to(self.address)
            .with_input(input))
    }

    /// Decode return data of the overload picked by [`Self::function`]
    pub fn decode_output(&self, function: &FunctionSignature, data: &[u8]) -> Result<Vec<DecodedArg>> {
        self.codec.decode_output(function, data)
    }

    /// Decode calldata produced for this contract back into a readable call
    pub fn describe_calldata(&self, calldata: &[u8]) -> Result<Option<DecodedCall>> {
        AlloyAbiDecoder::new(self.codec.registry()).decode_by_selector(calldata)
    }
}
