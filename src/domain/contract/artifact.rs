//! Compiled contract artifact: interface description plus creation bytecode

use std::fs;
use std::path::Path;

use alloy::primitives::Bytes;
use alloy_json_abi::JsonAbi;
use anyhow::{bail, Context, Result};
use serde::Deserialize;

const EMBEDDED_COUNTER: &str = include_str!("../../../artifacts/counter.json");

/// Hardhat stores bytecode as a string, Foundry as `{ "object": "0x..." }`
#[derive(Deserialize)]
#[serde(untagged)]
enum BytecodeField {
    Hex(String),
    Object { object: String },
}

#[derive(Deserialize)]
struct ArtifactFile {
    #[serde(default, rename = "contractName")]
    contract_name: Option<String>,
    abi: JsonAbi,
    bytecode: BytecodeField,
}

/// ABI and bytecode of one contract
#[derive(Debug, Clone)]
pub struct ContractArtifact {
    pub name: String,
    pub abi: JsonAbi,
    pub bytecode: Bytes,
}

impl ContractArtifact {
    /// The counter contract shipped with the binary
    pub fn embedded() -> Result<Self> {
        Self::parse(EMBEDDED_COUNTER, "Counter").context("embedded counter artifact")
    }

    /// Load a Hardhat or Foundry artifact JSON
    pub fn from_path(path: &Path) -> Result<Self> {
        let content = fs::read_to_string(path)
            .with_context(|| format!("read artifact {}", path.display()))?;
        let fallback = path
            .file_stem()
            .and_then(|s| s.to_str())
            .unwrap_or("Contract");
        Self::parse(&content, fallback).with_context(|| format!("parse artifact {}", path.display()))
    }

    pub fn parse(content: &str, fallback_name: &str) -> Result<Self> {
        let file: ArtifactFile = serde_json::from_str(content)?;
        let hex_code = match file.bytecode {
            BytecodeField::Hex(code) => code,
            BytecodeField::Object { object } => object,
        };
        let hex_code = hex_code.trim();
        let hex_code = hex_code
            .strip_prefix("0x")
            .or_else(|| hex_code.strip_prefix("0X"))
            .unwrap_or(hex_code);
        if hex_code.is_empty() {
            bail!("artifact has no bytecode (abstract contract or interface?)");
        }
        let bytecode = hex::decode(hex_code).context("bytecode is not valid hex")?;

        Ok(Self {
            name: file
                .contract_name
                .filter(|name| !name.trim().is_empty())
                .unwrap_or_else(|| fallback_name.to_string()),
            abi: file.abi,
            bytecode: bytecode.into(),
        })
    }
}
