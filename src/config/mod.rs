use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;

use anyhow::{Context, Result};
use serde::Deserialize;
use zeroize::Zeroizing;

use crate::core::ProbeError;
use crate::domain::wallet::{Derivation, Wallet};
use crate::infrastructure::ethereum::ProviderConfig;

/// Endpoint the probe talks to when nothing else is configured.
pub const DEFAULT_RPC: &str = "http://proxy.night.stand.neontest.xyz/solana";
pub const DEFAULT_CHAIN_ID: u64 = 111;

pub const CONFIG_ENV: &str = "EVM_PROBE_CONFIG";
pub const RPC_ENV: &str = "EVM_PROBE_RPC";
pub const MNEMONIC_ENV: &str = "EVM_PROBE_MNEMONIC";

const DEFAULT_POLL_INTERVAL_MS: u64 = 1_000;
const DEFAULT_RECEIPT_TIMEOUT_SECS: u64 = 120;

#[derive(Debug, Clone, Default, Deserialize)]
pub struct NetworkConfig {
    pub rpc: Option<String>,
    pub chain_id: Option<u64>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct WalletConfig {
    pub mnemonic_file: Option<PathBuf>,
    pub index: Option<u32>,
    pub derivation_path: Option<String>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct ContractConfig {
    pub artifact: Option<PathBuf>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct ReceiptConfig {
    pub poll_interval_ms: Option<u64>,
    pub timeout_secs: Option<u64>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub network: NetworkConfig,

    #[serde(default)]
    pub wallet: WalletConfig,

    #[serde(default)]
    pub contract: ContractConfig,

    #[serde(default)]
    pub receipt: ReceiptConfig,
}

/// Values given on the command line; they win over everything else.
#[derive(Debug, Clone, Default)]
pub struct Overrides {
    pub rpc: Option<String>,
    pub chain_id: Option<u64>,
    pub mnemonic_file: Option<PathBuf>,
    pub index: Option<u32>,
    pub derivation_path: Option<String>,
    pub artifact: Option<PathBuf>,
}

/// Fully resolved settings for one process run.
pub struct Settings {
    pub provider: ProviderConfig,
    pub chain_id: u64,
    pub mnemonic: Option<Zeroizing<String>>,
    pub derivation: Derivation,
    pub artifact: Option<PathBuf>,
    pub poll_interval: Duration,
    pub receipt_timeout: Duration,
}

impl std::fmt::Debug for Settings {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Settings")
            .field("provider", &self.provider)
            .field("chain_id", &self.chain_id)
            .field("mnemonic", &self.mnemonic.as_ref().map(|_| "<redacted>"))
            .field("derivation", &self.derivation)
            .field("artifact", &self.artifact)
            .field("poll_interval", &self.poll_interval)
            .field("receipt_timeout", &self.receipt_timeout)
            .finish()
    }
}

impl Settings {
    /// Derive the signing wallet from the configured mnemonic, if any.
    ///
    /// Needs no endpoint, so it works before any provider exists.
    pub fn wallet(&self) -> Result<Option<Wallet>, ProbeError> {
        self.mnemonic
            .as_ref()
            .map(|phrase| Wallet::from_mnemonic(phrase, &self.derivation, self.chain_id))
            .transpose()
    }

    /// Resolve settings against the process environment.
    pub fn resolve(config: Config, overrides: Overrides) -> Result<Self> {
        Self::resolve_with_env(config, overrides, |key| std::env::var(key).ok())
    }

    /// Precedence: command line, then environment, then config file, then defaults.
    pub fn resolve_with_env(
        config: Config,
        overrides: Overrides,
        env: impl Fn(&str) -> Option<String>,
    ) -> Result<Self> {
        let rpc = overrides
            .rpc
            .or_else(|| env(RPC_ENV))
            .or(config.network.rpc)
            .unwrap_or_else(|| DEFAULT_RPC.to_string());
        let provider = ProviderConfig::from_url(&rpc)?;
        let chain_id = overrides
            .chain_id
            .or(config.network.chain_id)
            .unwrap_or(DEFAULT_CHAIN_ID);

        let mnemonic = match overrides.mnemonic_file {
            Some(path) => Some(read_mnemonic_file(&path)?),
            None => match env(MNEMONIC_ENV).filter(|value| !value.trim().is_empty()) {
                Some(phrase) => Some(Zeroizing::new(phrase.trim().to_string())),
                None => match config.wallet.mnemonic_file {
                    Some(path) => Some(read_mnemonic_file(&path)?),
                    None => None,
                },
            },
        };

        let derivation = match (overrides.derivation_path, overrides.index) {
            (Some(path), _) => Derivation::Path(path),
            (None, Some(index)) => Derivation::Index(index),
            (None, None) => match (config.wallet.derivation_path, config.wallet.index) {
                (Some(path), _) => Derivation::Path(path),
                (None, Some(index)) => Derivation::Index(index),
                (None, None) => Derivation::default(),
            },
        };

        Ok(Self {
            provider,
            chain_id,
            mnemonic,
            derivation,
            artifact: overrides.artifact.or(config.contract.artifact),
            poll_interval: Duration::from_millis(
                config
                    .receipt
                    .poll_interval_ms
                    .unwrap_or(DEFAULT_POLL_INTERVAL_MS),
            ),
            receipt_timeout: Duration::from_secs(
                config
                    .receipt
                    .timeout_secs
                    .unwrap_or(DEFAULT_RECEIPT_TIMEOUT_SECS),
            ),
        })
    }
}

/// Load the config file.
///
/// A missing file at the default location yields defaults. A file named
/// explicitly (flag or `EVM_PROBE_CONFIG`) must exist and parse.
pub fn load(explicit: Option<&Path>) -> Result<Config> {
    if let Some(path) = explicit {
        return load_from(path);
    }
    if let Some(path) = std::env::var_os(CONFIG_ENV).map(PathBuf::from) {
        return load_from(&path);
    }
    match config_path() {
        Some(path) if path.is_file() => load_from(&path),
        _ => Ok(Config::default()),
    }
}

pub fn load_from(path: &Path) -> Result<Config> {
    let content = fs::read_to_string(path)
        .with_context(|| format!("read config {}", path.display()))?;
    toml::from_str::<Config>(&content).with_context(|| format!("parse config {}", path.display()))
}

pub fn config_path() -> Option<PathBuf> {
    if let Some(xdg) = std::env::var_os("XDG_CONFIG_HOME").map(PathBuf::from) {
        return Some(xdg.join("evm-probe").join("config.toml"));
    }
    if let Some(home) = std::env::var_os("HOME").map(PathBuf::from) {
        return Some(home.join(".config").join("evm-probe").join("config.toml"));
    }

    directories::ProjectDirs::from("io", "evm-probe", "evm-probe")
        .map(|dirs| dirs.config_dir().join("config.toml"))
}

fn read_mnemonic_file(path: &Path) -> Result<Zeroizing<String>> {
    let raw = Zeroizing::new(
        fs::read_to_string(path)
            .with_context(|| format!("read mnemonic file {}", path.display()))?,
    );
    Ok(Zeroizing::new(normalize_phrase(&raw)))
}

/// Collapse whitespace so phrases copied across lines still parse.
fn normalize_phrase(raw: &str) -> String {
    raw.split_whitespace().collect::<Vec<_>>().join(" ")
}
