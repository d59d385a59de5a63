//! ABI infrastructure - Alloy-based calldata encoding and decoding

mod codec;
mod decoder;

pub use codec::AlloyAbiCodec;
pub use decoder::AlloyAbiDecoder;
