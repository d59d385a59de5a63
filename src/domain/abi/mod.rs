//! ABI domain models and contracts
//!
//! Traits and types for ABI encoding and decoding, independent of the
//! underlying implementation (alloy-dyn-abi).

mod codec;
mod registry;

pub use codec::{AbiDecoder, AbiEncoder, DecodedArg, DecodedCall};
pub use registry::{AbiRegistry, FunctionSignature, Mutability, ParamSpec};
