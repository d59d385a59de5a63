use std::io;
use std::path::PathBuf;

use alloy::primitives::Address;
use anyhow::Result;
use clap::{Parser, Subcommand};
use tracing::info;
use tracing_subscriber::EnvFilter;

use evm_probe::config::{self, Overrides, Settings};
use evm_probe::modules::{address, call, deploy, network};
use evm_probe::ExampleRunner;

#[derive(Debug, Parser)]
#[command(
    name = "evm-probe",
    version,
    about = "Connect to an EVM JSON-RPC endpoint, derive a wallet and poke a contract"
)]
struct Args {
    /// Config file (defaults to $XDG_CONFIG_HOME/evm-probe/config.toml)
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    /// JSON-RPC endpoint, http(s):// or ws(s)://
    #[arg(long, global = true)]
    rpc: Option<String>,

    /// Chain id used for signing and the network check
    #[arg(long, global = true)]
    chain_id: Option<u64>,

    /// File holding the BIP-39 mnemonic (otherwise EVM_PROBE_MNEMONIC)
    #[arg(long, global = true)]
    mnemonic_file: Option<PathBuf>,

    /// Account index on m/44'/60'/0'/0
    #[arg(long, global = true, conflicts_with = "derivation_path")]
    index: Option<u32>,

    /// Full derivation path, e.g. m/44'/60'/0'/0/3
    #[arg(long, global = true)]
    derivation_path: Option<String>,

    /// Hardhat or Foundry artifact to use instead of the bundled counter
    #[arg(long, global = true)]
    artifact: Option<PathBuf>,

    /// Debug logging (RUST_LOG takes precedence)
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Option<Command>,
}

#[derive(Debug, Subcommand)]
enum Command {
    /// Fetch the latest block and print "done" (default)
    Run,
    /// Print the wallet address derived from the mnemonic
    Address,
    /// Check the node's chain id and client version
    Network,
    /// Deploy the contract and read it back
    Deploy,
    /// Call a contract function; state-changing functions are signed and sent
    Call {
        /// Deployed contract address
        address: Address,
        /// Function name, e.g. get or moreInstruction
        function: String,
        /// Arguments in Solidity literal form
        args: Vec<String>,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    let args = Args::parse();
    init_logging(args.verbose);

    let config = config::load(args.config.as_deref())?;
    let overrides = Overrides {
        rpc: args.rpc,
        chain_id: args.chain_id,
        mnemonic_file: args.mnemonic_file,
        index: args.index,
        derivation_path: args.derivation_path,
        artifact: args.artifact,
    };
    let settings = Settings::resolve(config, overrides)?;
    let mut stdout = io::stdout().lock();

    // Only `address` stays offline; every other command needs a provider
    match args.command.unwrap_or(Command::Run) {
        Command::Address => {
            address::show_address(&settings, &mut stdout)?;
        }
        Command::Run => {
            let runner = ExampleRunner::new(settings).await?;
            runner.run(&mut stdout).await?;
        }
        Command::Network => {
            let runner = ExampleRunner::new(settings).await?;
            network::check_network(&runner, &mut stdout).await?;
        }
        Command::Deploy => {
            let runner = ExampleRunner::new(settings).await?;
            let deployment = deploy::deploy(&runner, &mut stdout).await?;
            info!(address = %deployment.address, gas_used = deployment.gas_used, "deployed");
        }
        Command::Call {
            address: contract,
            function,
            args,
        } => {
            let runner = ExampleRunner::new(settings).await?;
            call::call(&runner, contract, &function, &args, &mut stdout).await?;
        }
    }

    Ok(())
}

/// Logs go to stderr so stdout only carries program output
fn init_logging(verbose: bool) {
    let default = if verbose { "evm_probe=debug,info" } else { "info" };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(io::stderr)
        .with_target(false)
        .init();
}
