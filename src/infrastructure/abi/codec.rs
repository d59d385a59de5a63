//! Calldata encoder and return-data decoder over a JSON ABI

use alloy_dyn_abi::{DynSolValue, JsonAbiExt, Specifier};
use alloy_json_abi::{Function, JsonAbi, Param, StateMutability};
use anyhow::{Context, Result};

use super::decoder::{decode_params, label_values};
use crate::core::ProbeError;
use crate::domain::abi::{AbiEncoder, AbiRegistry, DecodedArg, FunctionSignature, Mutability, ParamSpec};

/// ABI codec for one contract interface
#[derive(Debug, Clone)]
pub struct AlloyAbiCodec {
    abi: JsonAbi,
}

impl AlloyAbiCodec {
    pub fn new(abi: JsonAbi) -> Self {
        Self { abi }
    }

    /// Build a selector registry from every function in the ABI
    pub fn registry(&self) -> AbiRegistry {
        let mut registry = AbiRegistry::new();
        for function in self.abi.functions() {
            registry.insert(signature_of(function));
        }
        registry
    }

    /// Describe the overload of `name` taking `arity` arguments
    pub fn describe(&self, name: &str, arity: usize) -> Result<FunctionSignature, ProbeError> {
        self.resolve(name, arity).map(signature_of)
    }

    fn resolve(&self, name: &str, arity: usize) -> Result<&Function, ProbeError> {
        let overloads = self
            .abi
            .function(name)
            .filter(|overloads| !overloads.is_empty())
            .ok_or_else(|| ProbeError::UnknownFunction(name.to_string()))?;

        overloads
            .iter()
            .find(|function| function.inputs.len() == arity)
            .ok_or_else(|| ProbeError::ArgumentCount {
                function: name.to_string(),
                expected: overloads[0].inputs.len(),
                got: arity,
            })
    }
}

impl AbiEncoder for AlloyAbiCodec {
    fn encode_call(&self, function: &str, args: &[String]) -> Result<Vec<u8>> {
        let resolved = self.resolve(function, args.len())?;

        let values = resolved
            .inputs
            .iter()
            .zip(args)
            .enumerate()
            .map(|(index, (param, arg))| coerce_arg(function, index, param, arg))
            .collect::<Result<Vec<DynSolValue>, ProbeError>>()?;

        resolved
            .abi_encode_input(&values)
            .with_context(|| format!("Failed to encode call to {}", resolved.signature()))
    }

    fn decode_output(&self, function: &FunctionSignature, data: &[u8]) -> Result<Vec<DecodedArg>> {
        let values = decode_params(&function.outputs, data)
            .with_context(|| format!("Failed to decode output of {}", function.signature))?;
        Ok(label_values(&function.outputs, &values, "out"))
    }
}

fn coerce_arg(function: &str, index: usize, param: &Param, arg: &str) -> Result<DynSolValue, ProbeError> {
    let invalid = |reason: String| ProbeError::InvalidArgument {
        function: function.to_string(),
        index,
        kind: param.selector_type().to_string(),
        reason,
    };
    let ty = param.resolve().map_err(|e| invalid(e.to_string()))?;
    ty.coerce_str(arg.trim()).map_err(|e| invalid(e.to_string()))
}

fn params_of(params: &[Param]) -> Vec<ParamSpec> {
    params
        .iter()
        .map(|param| ParamSpec {
            name: param.name.clone(),
            kind: param.selector_type().to_string(),
        })
        .collect()
}

fn signature_of(function: &Function) -> FunctionSignature {
    FunctionSignature {
        selector: function.selector().0,
        name: function.name.clone(),
        signature: function.signature(),
        inputs: params_of(&function.inputs),
        outputs: params_of(&function.outputs),
        mutability: match function.state_mutability {
            StateMutability::Pure => Mutability::Pure,
            StateMutability::View => Mutability::View,
            StateMutability::NonPayable => Mutability::NonPayable,
            StateMutability::Payable => Mutability::Payable,
        },
    }
}
