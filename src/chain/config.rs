//! Configuration for the lockb0x Key flows.
//!
//! The contract address and target network are deployment configuration:
//! they are passed into each flow explicitly instead of living in globals.

use std::path::{Path, PathBuf};
use std::time::Duration;

use alloy_primitives::Address;
use serde::{Deserialize, Serialize};

use super::{ChainId, ContractAbi};
use crate::networks::{KnownNetworkLinea, Lockb0xKey};

/// Default interval between `eth_getTransactionReceipt` polls.
pub const DEFAULT_RECEIPT_POLL_INTERVAL: Duration = Duration::from_millis(1_500);

/// Shortest accepted interval between receipt polls.
pub const MIN_RECEIPT_POLL_INTERVAL: Duration = Duration::from_millis(1);

/// Configuration shared by the mint and verify flows.
///
/// # Example
///
/// ```
/// use lockb0x_key::chain::{ChainId, Lockb0xConfig};
///
/// let config = Lockb0xConfig::default();
/// assert_eq!(config.target_chain_id, ChainId::new(59141));
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Lockb0xConfig {
    /// Address of the deployed lockb0x Key contract.
    pub contract_address: Address,
    /// Functions the contract binding may call.
    #[serde(default)]
    pub abi: ContractAbi,
    /// The only network the flows will transact on.
    pub target_chain_id: ChainId,
    /// Interval between receipt polls while awaiting confirmation.
    #[serde(default = "default_poll_interval", with = "duration_millis")]
    pub receipt_poll_interval: Duration,
}

impl Lockb0xConfig {
    /// Creates a configuration for `contract_address` on `target_chain_id`
    /// with the full contract ABI.
    pub fn new(contract_address: Address, target_chain_id: ChainId) -> Self {
        Self {
            contract_address,
            abi: ContractAbi::full(),
            target_chain_id,
            receipt_poll_interval: DEFAULT_RECEIPT_POLL_INTERVAL,
        }
    }

    /// Replaces the ABI the contract binding is restricted to.
    pub fn with_abi(mut self, abi: ContractAbi) -> Self {
        self.abi = abi;
        self
    }

    /// Replaces the receipt poll interval, clamped to
    /// [`MIN_RECEIPT_POLL_INTERVAL`].
    pub fn with_receipt_poll_interval(mut self, interval: Duration) -> Self {
        self.receipt_poll_interval = interval.max(MIN_RECEIPT_POLL_INTERVAL);
        self
    }

    /// Reads a JSON configuration file.
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let raw = std::fs::read_to_string(path).map_err(|source| ConfigError::Read {
            path: path.to_path_buf(),
            source,
        })?;
        serde_json::from_str(&raw).map_err(|source| ConfigError::Parse {
            path: path.to_path_buf(),
            source,
        })
    }
}

/// Errors raised while loading a configuration file.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Cannot read config {}: {source}", path.display())]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Invalid config {}: {source}", path.display())]
    Parse {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },
}

impl Default for Lockb0xConfig {
    /// The known deployment on Linea Sepolia.
    fn default() -> Self {
        Lockb0xKey::linea_sepolia()
    }
}

fn default_poll_interval() -> Duration {
    DEFAULT_RECEIPT_POLL_INTERVAL
}

/// Whole milliseconds; zero is rejected.
mod duration_millis {
    use serde::{Deserialize, Deserializer, Serializer, de, ser};
    use std::time::Duration;

    pub fn serialize<S>(value: &Duration, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        let millis =
            u64::try_from(value.as_millis()).map_err(<S::Error as ser::Error>::custom)?;
        serializer.serialize_u64(millis)
    }

    pub fn deserialize<'de, D>(deserializer: D) -> Result<Duration, D::Error>
    where
        D: Deserializer<'de>,
    {
        match u64::deserialize(deserializer)? {
            0 => Err(<D::Error as de::Error>::invalid_value(
                de::Unexpected::Unsigned(0),
                &"a poll interval of at least 1 ms",
            )),
            millis => Ok(Duration::from_millis(millis)),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_config_from_json_defaults() {
        let json = r#"{
            "contractAddress": "0x1c6445eBcEe5b9B12cfA63AecA1fa3e90b06BFcC",
            "targetChainId": "0xe705"
        }"#;
        let config: Lockb0xConfig = serde_json::from_str(json).unwrap();
        assert_eq!(config.target_chain_id, ChainId::new(59141));
        assert_eq!(config.abi, ContractAbi::full());
        assert_eq!(config.receipt_poll_interval, DEFAULT_RECEIPT_POLL_INTERVAL);
    }

    #[test]
    fn test_config_custom_abi_and_interval() {
        let json = r#"{
            "contractAddress": "0x1c6445eBcEe5b9B12cfA63AecA1fa3e90b06BFcC",
            "targetChainId": 59144,
            "abi": ["function balanceOf(address owner) view returns (uint256)"],
            "receiptPollInterval": 250
        }"#;
        let config: Lockb0xConfig = serde_json::from_str(json).unwrap();
        assert!(config.abi.declares("balanceOf"));
        assert!(!config.abi.declares("mint"));
        assert_eq!(config.receipt_poll_interval, Duration::from_millis(250));
    }

    #[test]
    fn test_config_rejects_zero_poll_interval() {
        let json = r#"{
            "contractAddress": "0x1c6445eBcEe5b9B12cfA63AecA1fa3e90b06BFcC",
            "targetChainId": 59141,
            "receiptPollInterval": 0
        }"#;
        let err = serde_json::from_str::<Lockb0xConfig>(json).unwrap_err();
        assert!(err.to_string().contains("at least 1 ms"));

        let config = Lockb0xConfig::default().with_receipt_poll_interval(Duration::ZERO);
        assert_eq!(config.receipt_poll_interval, MIN_RECEIPT_POLL_INTERVAL);
    }

    #[test]
    fn test_config_rejects_unrepresentable_poll_interval() {
        let config = Lockb0xConfig::default().with_receipt_poll_interval(Duration::MAX);
        assert!(serde_json::to_string(&config).is_err());

        let config = Lockb0xConfig::default()
            .with_receipt_poll_interval(Duration::from_millis(u64::MAX));
        let json = serde_json::to_string(&config).unwrap();
        assert!(json.contains(&format!("\"receiptPollInterval\":{}", u64::MAX)));
    }

    #[test]
    fn test_config_from_file() {
        let path =
            std::env::temp_dir().join(format!("lockb0x-config-{}.json", std::process::id()));
        let config = Lockb0xConfig::default().with_abi(ContractAbi::verify());
        std::fs::write(&path, serde_json::to_string(&config).unwrap()).unwrap();

        let loaded = Lockb0xConfig::from_file(&path).unwrap();
        assert_eq!(loaded, config);

        std::fs::write(&path, "{ not json").unwrap();
        let err = Lockb0xConfig::from_file(&path).unwrap_err();
        assert!(matches!(err, ConfigError::Parse { .. }));
        assert!(err.to_string().starts_with("Invalid config "));

        std::fs::remove_file(&path).unwrap();
        let err = Lockb0xConfig::from_file(&path).unwrap_err();
        assert!(matches!(err, ConfigError::Read { .. }));
        assert!(err.to_string().contains(&path.display().to_string()));
    }

    #[test]
    fn test_config_rejects_bad_abi() {
        let json = r#"{
            "contractAddress": "0x1c6445eBcEe5b9B12cfA63AecA1fa3e90b06BFcC",
            "targetChainId": 59141,
            "abi": ["not a function"]
        }"#;
        assert!(serde_json::from_str::<Lockb0xConfig>(json).is_err());
    }
}
