//! Wallet provider abstraction.
//!
//! A [`WalletProvider`] is the external collaborator that owns accounts,
//! switches networks, signs and broadcasts transactions. The flows only issue
//! requests to it; every method may suspend until the user answers a prompt
//! in the wallet's own UI.
//!
//! With the `rpc` feature, [`JsonRpcWallet`] implements the trait over an
//! EIP-1193 compatible JSON-RPC endpoint.

use alloy_primitives::{Address, B256, Bytes};
use async_trait::async_trait;

use crate::chain::{ChainId, TransactionReceipt, TransactionRequest};

#[cfg(feature = "rpc")]
pub mod rpc;
#[cfg(feature = "rpc")]
pub use rpc::*;

/// EIP-1193 error code for a request the user rejected.
pub const USER_REJECTED_CODE: i64 = 4001;

/// EIP-1193 error code for a chain the wallet does not know.
pub const UNRECOGNIZED_CHAIN_CODE: i64 = 4902;

/// Requests a flow can make of a wallet.
#[async_trait]
pub trait WalletProvider: Send + Sync {
    /// Asks the user to expose an account, returning the selected one.
    async fn request_accounts(&self) -> Result<Address, WalletError>;

    /// Returns the chain the wallet is currently connected to.
    async fn chain_id(&self) -> Result<ChainId, WalletError>;

    /// Asks the wallet to switch to `chain_id`.
    async fn switch_chain(&self, chain_id: ChainId) -> Result<(), WalletError>;

    /// Executes a read-only call against the latest block.
    async fn call(&self, to: Address, data: Bytes) -> Result<Bytes, WalletError>;

    /// Signs and broadcasts a state-changing call, returning its hash.
    async fn send_transaction(&self, request: TransactionRequest) -> Result<B256, WalletError>;

    /// Suspends until `hash` is mined and returns its receipt.
    ///
    /// No timeout is applied; resolution is left to the wallet and network.
    async fn wait_for_receipt(&self, hash: B256) -> Result<TransactionReceipt, WalletError>;

    /// Returns a signing handle for `account`.
    fn signer(&self, account: Address) -> Signer {
        Signer { address: account }
    }
}

/// The account transactions are signed with.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Signer {
    address: Address,
}

impl Signer {
    /// Returns the signing account.
    pub fn address(&self) -> Address {
        self.address
    }
}

/// Errors surfaced by a wallet provider.
#[derive(Debug, thiserror::Error)]
pub enum WalletError {
    /// The user declined the request in the wallet UI.
    #[error("User rejected the request: {0}")]
    UserRejected(String),

    /// The wallet answered with a JSON-RPC error.
    #[error("{message} (code {code})")]
    Rpc { code: i64, message: String },

    /// The wallet returned no accounts.
    #[error("No accounts available")]
    NoAccounts,

    /// The wallet could not be reached.
    #[error("Connection error: {0}")]
    Connection(String),

    /// The wallet answered with something that could not be decoded.
    #[error("Invalid response: {0}")]
    InvalidResponse(String),
}

impl WalletError {
    /// Builds an error from an EIP-1193 error object.
    pub fn from_rpc(code: i64, message: impl Into<String>) -> Self {
        let message = message.into();
        if code == USER_REJECTED_CODE {
            WalletError::UserRejected(message)
        } else {
            WalletError::Rpc { code, message }
        }
    }

    /// Returns `true` if the user declined the request.
    pub fn is_user_rejection(&self) -> bool {
        matches!(self, WalletError::UserRejected(_))
    }
}
