//! Known Linea networks and lockb0x Key deployments.

use alloy_primitives::{Address, address};

use crate::chain::{ChainId, Lockb0xConfig};

/// Linea Sepolia testnet.
pub const LINEA_SEPOLIA: ChainId = ChainId::new(59141);

/// Linea mainnet.
pub const LINEA_MAINNET: ChainId = ChainId::new(59144);

/// The lockb0x Key contract deployed on Linea Sepolia.
pub const LOCKB0X_KEY_LINEA_SEPOLIA: Address = address!("0x1c6445eBcEe5b9B12cfA63AecA1fa3e90b06BFcC");

/// Trait providing convenient constructors for well-known Linea networks.
///
/// # Example
///
/// ```
/// use lockb0x_key::KnownNetworkLinea;
/// use lockb0x_key::chain::ChainId;
///
/// assert_eq!(ChainId::linea_sepolia().get(), 59141);
/// ```
pub trait KnownNetworkLinea<A> {
    /// Returns the instance for Linea Sepolia (59141).
    fn linea_sepolia() -> A;
    /// Returns the instance for Linea mainnet (59144).
    fn linea_mainnet() -> A;
}

impl KnownNetworkLinea<ChainId> for ChainId {
    fn linea_sepolia() -> ChainId {
        LINEA_SEPOLIA
    }

    fn linea_mainnet() -> ChainId {
        LINEA_MAINNET
    }
}

/// Marker type for lockb0x Key deployments.
pub struct Lockb0xKey;

impl KnownNetworkLinea<Lockb0xConfig> for Lockb0xKey {
    fn linea_sepolia() -> Lockb0xConfig {
        Lockb0xConfig::new(LOCKB0X_KEY_LINEA_SEPOLIA, LINEA_SEPOLIA)
    }

    fn linea_mainnet() -> Lockb0xConfig {
        // Not deployed yet; the address must be supplied by the deployer.
        Lockb0xConfig::new(Address::ZERO, LINEA_MAINNET)
    }
}

/// Returns a human-readable name for a known chain id.
pub fn network_name(chain_id: ChainId) -> Option<&'static str> {
    match chain_id {
        LINEA_SEPOLIA => Some("Linea Sepolia"),
        LINEA_MAINNET => Some("Linea"),
        _ => None,
    }
}
