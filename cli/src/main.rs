//! Command-line front end for the lockb0x Key flows.
//!
//! Each subcommand is a trigger; the terminal is its status region.
//!
//! # Commands
//!
//! - `lockb0x mint`   - Mint a key, paying the current mint price
//! - `lockb0x verify` - Record on-chain that the account holds a key
//! - `lockb0x info`   - Show mint price, total minted and the account balance
//!
//! # Configuration
//!
//! - `WALLET_RPC_URL`            - EIP-1193 JSON-RPC endpoint of the wallet (required)
//! - `LOCKB0X_CONFIG`            - JSON configuration file (optional)
//! - `LOCKB0X_CONTRACT_ADDRESS`  - Contract address (default: Linea Sepolia deployment)
//! - `LOCKB0X_CHAIN_ID`          - Target chain id, decimal or hex (default: 59141)
//! - `LOCKB0X_POLL_INTERVAL_MS`  - Receipt poll interval (default: 1500)
//! - `RUST_LOG` / `LOG_LEVEL`    - Log filter (default: info)

use std::env;
use std::path::PathBuf;
use std::process::ExitCode;
use std::time::Duration;

use alloy_primitives::Address;
use clap::{Parser, Subcommand};
use lockb0x_key::StatusSink;
use lockb0x_key::chain::{ChainId, ConfigError, Lockb0xConfig};
use lockb0x_key::flows::{MintFlow, VerifyFlow, query_info};
use lockb0x_key::wallet::JsonRpcWallet;

#[derive(Debug, Parser)]
#[command(name = "lockb0x", version, about = "Mint and verify lockb0x Key tokens")]
struct Cli {
    /// EIP-1193 JSON-RPC endpoint of the wallet.
    #[arg(long, env = "WALLET_RPC_URL", global = true)]
    wallet_rpc_url: Option<String>,

    /// JSON configuration file.
    #[arg(long, env = "LOCKB0X_CONFIG", global = true)]
    config: Option<PathBuf>,

    /// Contract address, overriding the configuration file.
    #[arg(long, env = "LOCKB0X_CONTRACT_ADDRESS", global = true)]
    contract_address: Option<Address>,

    /// Target chain id, overriding the configuration file.
    #[arg(long, env = "LOCKB0X_CHAIN_ID", global = true)]
    chain_id: Option<ChainId>,

    /// Receipt poll interval in milliseconds (at least 1).
    #[arg(
        long,
        env = "LOCKB0X_POLL_INTERVAL_MS",
        global = true,
        value_parser = clap::value_parser!(u64).range(1..)
    )]
    poll_interval_ms: Option<u64>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Debug, Subcommand)]
enum Command {
    /// Mint a key, paying the current mint price.
    Mint,
    /// Record on-chain that the connected account holds a key.
    Verify,
    /// Show mint price, total minted and the connected account's balance.
    Info,
}

/// Prints status updates to stdout.
struct Terminal;

impl StatusSink for Terminal {
    fn set_status(&self, text: &str) {
        if !text.is_empty() {
            println!("{text}");
        }
    }

    fn set_trigger_enabled(&self, enabled: bool) {
        tracing::debug!(enabled, "trigger");
    }
}

#[tokio::main]
async fn main() -> Result<ExitCode, Box<dyn std::error::Error>> {
    // LOG_LEVEL is used if RUST_LOG is not set
    let log_level = env::var("LOG_LEVEL").unwrap_or_else(|_| "info".to_string());
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(&log_level)),
        )
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();
    let config = load_config(&cli)?;

    let wallet = cli.wallet_rpc_url.as_deref().map(|url| {
        JsonRpcWallet::new(url).with_poll_interval(config.receipt_poll_interval)
    });

    tracing::info!(
        contract = %config.contract_address,
        chain_id = %config.target_chain_id,
        wallet = ?wallet.as_ref().map(JsonRpcWallet::url),
        "lockb0x starting"
    );

    let result = match cli.command {
        Command::Mint => MintFlow::new(config).run(wallet.as_ref(), &Terminal).await,
        Command::Verify => VerifyFlow::new(config).run(wallet.as_ref(), &Terminal).await,
        Command::Info => query_info(&config, wallet.as_ref(), &Terminal).await,
    };

    Ok(match result {
        Ok(_) => ExitCode::SUCCESS,
        Err(_) => ExitCode::FAILURE,
    })
}

/// Builds the configuration: defaults, then the JSON file, then overrides.
fn load_config(cli: &Cli) -> Result<Lockb0xConfig, ConfigError> {
    let mut config = match &cli.config {
        Some(path) => Lockb0xConfig::from_file(path)?,
        None => Lockb0xConfig::default(),
    };

    if let Some(address) = cli.contract_address {
        config.contract_address = address;
    }
    if let Some(chain_id) = cli.chain_id {
        config.target_chain_id = chain_id;
    }
    if let Some(ms) = cli.poll_interval_ms {
        config = config.with_receipt_poll_interval(Duration::from_millis(ms));
    }
    Ok(config)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_zero_poll_interval_is_rejected() {
        let result = Cli::try_parse_from(["lockb0x", "--poll-interval-ms", "0", "info"]);
        assert!(result.is_err());

        let cli = Cli::try_parse_from(["lockb0x", "--poll-interval-ms", "5", "info"]).unwrap();
        let config = load_config(&cli).unwrap();
        assert_eq!(config.receipt_poll_interval, Duration::from_millis(5));
    }

    #[test]
    fn test_missing_config_file_is_a_read_error() {
        let cli = Cli::try_parse_from([
            "lockb0x",
            "--config",
            "/nonexistent/lockb0x.json",
            "info",
        ])
        .unwrap();
        assert!(matches!(load_config(&cli), Err(ConfigError::Read { .. })));
    }
}
