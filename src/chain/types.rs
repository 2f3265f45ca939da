//! Wire format types for EVM chain interactions.
//!
//! This module provides the values exchanged with an EIP-1193 wallet provider:
//! chain identifiers, transaction requests and receipts. Quantities travel as
//! `0x`-prefixed hex strings on the wire.

use alloy_primitives::{Address, B256, Bytes, U256};
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::fmt::{Display, Formatter};
use std::str::FromStr;

// ============================================================================
// ChainId
// ============================================================================

/// A numeric EVM chain identifier (EIP-155).
///
/// Serializes as a `0x`-prefixed hex quantity, which is the form expected by
/// `eth_chainId` responses and `wallet_switchEthereumChain` parameters.
///
/// # Example
///
/// ```
/// use lockb0x_key::chain::ChainId;
///
/// let linea_sepolia = ChainId::new(59141);
/// assert_eq!(linea_sepolia.to_hex(), "0xe705");
/// assert_eq!("0xe705".parse::<ChainId>().unwrap(), linea_sepolia);
/// ```
#[derive(Clone, Copy, Debug, Eq, PartialEq, Hash, PartialOrd, Ord)]
pub struct ChainId(u64);

impl ChainId {
    /// Creates a chain identifier from its numeric value.
    pub const fn new(id: u64) -> Self {
        Self(id)
    }

    /// Returns the numeric value.
    pub const fn get(&self) -> u64 {
        self.0
    }

    /// Returns the hex quantity form, e.g. `0xe705`.
    pub fn to_hex(&self) -> String {
        format!("{:#x}", self.0)
    }
}

impl From<u64> for ChainId {
    fn from(value: u64) -> Self {
        Self(value)
    }
}

impl Display for ChainId {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl FromStr for ChainId {
    type Err = ChainIdParseError;

    /// Accepts either a hex quantity (`0xe705`) or a decimal string (`59141`).
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let s = s.trim();
        let parsed = match s.strip_prefix("0x").or_else(|| s.strip_prefix("0X")) {
            Some(hex) => u64::from_str_radix(hex, 16),
            None => s.parse(),
        };
        parsed
            .map(Self)
            .map_err(|_| ChainIdParseError(s.to_string()))
    }
}

impl Serialize for ChainId {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        serializer.serialize_str(&self.to_hex())
    }
}

impl<'de> Deserialize<'de> for ChainId {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        #[derive(Deserialize)]
        #[serde(untagged)]
        enum Repr {
            Number(u64),
            Text(String),
        }

        match Repr::deserialize(deserializer)? {
            Repr::Number(n) => Ok(Self(n)),
            Repr::Text(s) => s.parse().map_err(serde::de::Error::custom),
        }
    }
}

/// Error returned when a chain identifier string cannot be parsed.
#[derive(Debug, thiserror::Error)]
#[error("Invalid chain id: {0}")]
pub struct ChainIdParseError(pub String);

// ============================================================================
// TransactionRequest
// ============================================================================

/// A state-changing call to be signed and broadcast by the wallet provider.
///
/// Gas and nonce are left to the wallet, as an `eth_sendTransaction` caller
/// would do.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TransactionRequest {
    /// The signing account.
    pub from: Address,
    /// The contract being called.
    pub to: Address,
    /// ABI-encoded calldata.
    pub data: Bytes,
    /// Attached native-currency value in wei.
    pub value: U256,
}

// ============================================================================
// TransactionReceipt
// ============================================================================

/// Execution status of a mined transaction.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TxStatus {
    /// The call executed successfully.
    Success,
    /// The call reverted on-chain.
    Reverted,
}

impl Serialize for TxStatus {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        match self {
            TxStatus::Success => serializer.serialize_str("0x1"),
            TxStatus::Reverted => serializer.serialize_str("0x0"),
        }
    }
}

impl<'de> Deserialize<'de> for TxStatus {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        let s = String::deserialize(deserializer)?;
        match s.as_str() {
            "0x1" | "0x01" => Ok(TxStatus::Success),
            "0x0" | "0x00" => Ok(TxStatus::Reverted),
            other => Err(serde::de::Error::custom(format!(
                "unknown receipt status '{other}'"
            ))),
        }
    }
}

/// The subset of an `eth_getTransactionReceipt` result the flows act on.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TransactionReceipt {
    /// Hash of the confirmed transaction.
    pub transaction_hash: B256,
    /// Success or revert.
    pub status: TxStatus,
    /// Block the transaction was included in.
    #[serde(default)]
    pub block_number: Option<U256>,
}

impl TransactionReceipt {
    /// Returns `true` if the transaction executed without reverting.
    pub fn is_success(&self) -> bool {
        self.status == TxStatus::Success
    }
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_chain_id_hex() {
        assert_eq!(ChainId::new(59141).to_hex(), "0xe705");
        assert_eq!(ChainId::new(1).to_hex(), "0x1");
    }

    #[test]
    fn test_chain_id_parse_decimal_and_hex() {
        assert_eq!("59141".parse::<ChainId>().unwrap(), ChainId::new(59141));
        assert_eq!("0xE705".parse::<ChainId>().unwrap(), ChainId::new(59141));
        assert!("linea".parse::<ChainId>().is_err());
    }

    #[test]
    fn test_chain_id_serde() {
        let json = serde_json::to_string(&ChainId::new(59144)).unwrap();
        assert_eq!(json, "\"0xe708\"");
        let from_number: ChainId = serde_json::from_str("59141").unwrap();
        assert_eq!(from_number, ChainId::new(59141));
    }

    #[test]
    fn test_receipt_deserialize() {
        let json = r#"{
            "transactionHash": "0x1111111111111111111111111111111111111111111111111111111111111111",
            "status": "0x0",
            "blockNumber": "0x10",
            "gasUsed": "0x5208"
        }"#;
        let receipt: TransactionReceipt = serde_json::from_str(json).unwrap();
        assert_eq!(receipt.status, TxStatus::Reverted);
        assert!(!receipt.is_success());
        assert_eq!(receipt.block_number, Some(U256::from(16)));
    }

    #[test]
    fn test_receipt_unknown_status_rejected() {
        let json = r#"{
            "transactionHash": "0x1111111111111111111111111111111111111111111111111111111111111111",
            "status": "0x2"
        }"#;
        assert!(serde_json::from_str::<TransactionReceipt>(json).is_err());
    }
}
