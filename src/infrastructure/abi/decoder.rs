//! Calldata decoder implementation using alloy-dyn-abi

use alloy_dyn_abi::{DynSolType, DynSolValue};
use anyhow::{bail, Context, Result};

use crate::domain::abi::{AbiDecoder, AbiRegistry, DecodedArg, DecodedCall, FunctionSignature, ParamSpec};

/// Calldata decoder backed by a selector registry
pub struct AlloyAbiDecoder {
    registry: AbiRegistry,
}

impl AlloyAbiDecoder {
    /// Create a new decoder with the given registry
    pub fn new(registry: AbiRegistry) -> Self {
        Self { registry }
    }
}

impl AbiDecoder for AlloyAbiDecoder {
    fn decode_calldata(&self, function: &FunctionSignature, data: &[u8]) -> Result<DecodedCall> {
        let Some((selector, args_data)) = data.split_first_chunk::<4>() else {
            bail!("calldata too short (need at least 4 bytes for selector)");
        };

        if *selector != function.selector {
            bail!(
                "selector mismatch: got 0x{}, expected 0x{}",
                hex::encode(selector),
                hex::encode(function.selector)
            );
        }

        let values = decode_params(&function.inputs, args_data).context("Failed to decode calldata")?;

        Ok(DecodedCall {
            function_name: function.name.clone(),
            signature: function.signature.clone(),
            arguments: label_values(&function.inputs, &values, "arg"),
        })
    }

    fn decode_by_selector(&self, data: &[u8]) -> Result<Option<DecodedCall>> {
        let Some(selector) = data.first_chunk::<4>() else {
            return Ok(None);
        };
        match self.registry.lookup(*selector) {
            Some(function) => Ok(Some(self.decode_calldata(function, data)?)),
            None => Ok(None),
        }
    }
}

/// Decode ABI-encoded parameters described by `params`
pub(crate) fn decode_params(params: &[ParamSpec], data: &[u8]) -> Result<Vec<DynSolValue>> {
    let types: Vec<DynSolType> = params
        .iter()
        .map(|param| {
            DynSolType::parse(&param.kind).with_context(|| {
                format!("Failed to parse type '{}' for param '{}'", param.kind, param.name)
            })
        })
        .collect::<Result<Vec<_>>>()?;

    if types.is_empty() {
        return Ok(Vec::new());
    }

    match DynSolType::Tuple(types).abi_decode_params(data)? {
        DynSolValue::Tuple(values) => Ok(values),
        other => Ok(vec![other]),
    }
}

/// Pair decoded values with their parameter names
pub(crate) fn label_values(params: &[ParamSpec], values: &[DynSolValue], prefix: &str) -> Vec<DecodedArg> {
    params
        .iter()
        .zip(values.iter())
        .enumerate()
        .map(|(idx, (param, value))| DecodedArg {
            name: if param.name.trim().is_empty() {
                format!("{}{}", prefix, idx)
            } else {
                param.name.clone()
            },
            kind: param.kind.clone(),
            value: format_dyn_sol_value(value),
        })
        .collect()
}

/// Format a DynSolValue for display
pub(crate) fn format_dyn_sol_value(value: &DynSolValue) -> String {
    match value {
        DynSolValue::Bool(b) => b.to_string(),
        DynSolValue::Int(i, _) => i.to_string(),
        DynSolValue::Uint(u, _) => u.to_string(),
        DynSolValue::FixedBytes(word, size) => {
            let bytes = &word.as_slice()[..(*size).min(32)];
            format!("0x{}", hex::encode(bytes))
        }
        DynSolValue::Address(addr) => addr.to_checksum(None),
        DynSolValue::Function(func) => format!("0x{}", hex::encode(func.as_slice())),
        DynSolValue::Bytes(bytes) => {
            if bytes.len() <= 32 {
                format!("0x{}", hex::encode(bytes))
            } else {
                format!("0x{}… ({} bytes)", hex::encode(&bytes[..32]), bytes.len())
            }
        }
        DynSolValue::String(s) => {
            let chars = s.chars().count();
            if chars <= 64 {
                format!("\"{}\"", s)
            } else {
                let head: String = s.chars().take(64).collect();
                format!("\"{}…\" ({} chars)", head, chars)
            }
        }
        DynSolValue::Array(arr) | DynSolValue::FixedArray(arr) => {
            let max_items = 10;
            let items: Vec<String> = arr
                .iter()
                .take(max_items)
                .map(format_dyn_sol_value)
                .collect();
            if arr.len() > max_items {
                format!("[{}, …] ({} items)", items.join(", "), arr.len())
            } else {
                format!("[{}]", items.join(", "))
            }
        }
        DynSolValue::Tuple(fields) => {
            let items: Vec<String> = fields.iter().map(format_dyn_sol_value).collect();
            format!("({})", items.join(", "))
        }
        // eip712 struct values, present only when that alloy feature is unified in
        #[allow(unreachable_patterns)]
        other => format!("{:?}", other),
    }
}
