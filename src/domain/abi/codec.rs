//! ABI encoder/decoder traits and types

use serde::{Deserialize, Serialize};

use super::FunctionSignature;

/// A decoded function argument or return value
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DecodedArg {
    /// Parameter name (or "arg{n}" / "out{n}" if unnamed)
    pub name: String,
    /// Solidity type (e.g., "address", "uint256", "(uint256,address)")
    pub kind: String,
    /// Decoded value as a formatted string
    pub value: String,
}

/// Result of decoding a function call
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DecodedCall {
    /// Function name
    pub function_name: String,
    /// Full function signature (e.g., "transfer(address,uint256)")
    pub signature: String,
    /// Decoded arguments
    pub arguments: Vec<DecodedArg>,
}

/// Trait for ABI decoding implementations
///
/// Keeps callers independent of alloy-dyn-abi.
pub trait AbiDecoder: Send + Sync {
    /// Decode calldata given a function signature
    ///
    /// `data` includes the 4-byte selector.
    fn decode_calldata(
        &self,
        function: &FunctionSignature,
        data: &[u8],
    ) -> anyhow::Result<DecodedCall>;

    /// Decode calldata by looking up the selector
    ///
    /// Returns `Ok(None)` when the selector is not known.
    fn decode_by_selector(&self, data: &[u8]) -> anyhow::Result<Option<DecodedCall>>;
}

/// Trait for turning user-supplied strings into calldata and return data into strings
pub trait AbiEncoder: Send + Sync {
    /// Encode selector plus arguments for `function`
    ///
    /// Arguments are coerced from their string form to the parameter types.
    fn encode_call(&self, function: &str, args: &[String]) -> anyhow::Result<Vec<u8>>;

    /// Decode the return data of the overload described by `function`
    fn decode_output(
        &self,
        function: &FunctionSignature,
        data: &[u8],
    ) -> anyhow::Result<Vec<DecodedArg>>;
}
