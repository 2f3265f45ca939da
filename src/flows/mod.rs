//! The user-facing flows: mint, verify ownership, and a read-only info query.
//!
//! Each flow is a linear sequence of wallet and contract requests with a few
//! guards. Progress is projected onto a [`StatusSink`], the host's status text
//! region and trigger control. A flow ends in one of three ways:
//!
//! - a guard terminates it early with an informative [`FlowOutcome`] and no
//!   chain mutation (already holds, does not own, wrong network)
//! - a transaction is submitted and confirmed ([`FlowOutcome::Minted`],
//!   [`FlowOutcome::Verified`])
//! - a [`FlowError`] is caught at the flow boundary, logged and rendered
//!
//! Nothing is retried and nothing survives between invocations.

use alloy_primitives::{Address, B256, U256};

use crate::chain::{ChainId, Lockb0xConfig, TransactionReceipt};
use crate::contract::ContractError;
use crate::networks::network_name;
use crate::wallet::{Signer, WalletError, WalletProvider};

pub mod guard;
pub use guard::{InFlight, InFlightGuard, TriggerGuard};

pub mod info;
pub use info::*;

pub mod mint;
pub use mint::*;

pub mod verify;
pub use verify::*;

/// Status shown when no wallet provider is available.
pub const PROVIDER_UNAVAILABLE_STATUS: &str = "A wallet provider is required.";
/// Status shown by the mint flow when the account already holds a key.
pub const ALREADY_HOLDS_STATUS: &str = "You already hold a lockb0x Key.";
/// Status shown after a confirmed mint.
pub const MINT_SUCCESS_STATUS: &str = "Mint successful! Your NFT has been created.";
/// Status shown by the verify flow when the account holds no key.
pub const NOT_OWNER_STATUS: &str = "You do not own a lockb0x Key NFT.";
/// Status shown before the verification call is submitted.
pub const VERIFY_SUBMITTING_STATUS: &str = "NFT detected, submitting verification...";
/// Status shown after a confirmed verification.
pub const VERIFY_SUCCESS_STATUS: &str = "Verification successful! Event emitted.";

/// Returns the status shown when the wallet could not be moved to `required`.
pub fn wrong_network_status(required: ChainId) -> String {
    match network_name(required) {
        Some(name) => format!("Please switch to the {name} network."),
        None => format!("Please switch to the network with chain id {required}."),
    }
}

/// Returns the status shown once a transaction has been broadcast.
pub fn submitted_status(hash: B256) -> String {
    format!("Transaction submitted: {hash}")
}

/// The host surface a flow reports to.
pub trait StatusSink: Send + Sync {
    /// Replaces the status text.
    fn set_status(&self, text: &str);

    /// Enables or disables the control that triggers the flow.
    fn set_trigger_enabled(&self, enabled: bool);
}

/// Successful termination of a flow.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FlowOutcome {
    /// The wallet could not be moved to the target network.
    WrongNetwork { active: ChainId, required: ChainId },
    /// Mint skipped because the account already holds `balance` keys.
    AlreadyHolds { balance: U256 },
    /// Verification skipped because the account holds no key.
    NotOwner,
    /// `mint()` confirmed.
    Minted { receipt: TransactionReceipt },
    /// `verifyOwnership()` confirmed.
    Verified { receipt: TransactionReceipt },
    /// Read-only contract state.
    Info(ContractInfo),
}

impl FlowOutcome {
    /// Text rendered in the status region.
    pub fn status_text(&self) -> String {
        match self {
            FlowOutcome::WrongNetwork { required, .. } => wrong_network_status(*required),
            FlowOutcome::AlreadyHolds { .. } => ALREADY_HOLDS_STATUS.to_string(),
            FlowOutcome::NotOwner => NOT_OWNER_STATUS.to_string(),
            FlowOutcome::Minted { .. } => MINT_SUCCESS_STATUS.to_string(),
            FlowOutcome::Verified { .. } => VERIFY_SUCCESS_STATUS.to_string(),
            FlowOutcome::Info(info) => info.to_string(),
        }
    }

    /// Returns the confirmed transaction, if the flow mutated chain state.
    pub fn receipt(&self) -> Option<&TransactionReceipt> {
        match self {
            FlowOutcome::Minted { receipt } | FlowOutcome::Verified { receipt } => Some(receipt),
            _ => None,
        }
    }
}

/// Failure of a flow.
#[derive(Debug, thiserror::Error)]
pub enum FlowError {
    /// No wallet provider in the environment.
    #[error("{}", PROVIDER_UNAVAILABLE_STATUS)]
    ProviderUnavailable,

    /// The user declined the account request.
    #[error("{0}")]
    UserRejected(String),

    /// The transaction was mined and reverted.
    #[error("transaction reverted (transactionHash=\"{transaction_hash}\")")]
    CallReverted { transaction_hash: B256 },

    /// The wallet refused or failed to broadcast the transaction.
    #[error("{0}")]
    SubmissionFailed(String),

    /// Another invocation of the same flow has not finished.
    #[error("{0} is already in progress")]
    AlreadyRunning(&'static str),

    #[error("{0}")]
    Unknown(String),
}

impl FlowError {
    /// Text rendered in the status region.
    pub fn status_text(&self) -> String {
        match self {
            FlowError::ProviderUnavailable => PROVIDER_UNAVAILABLE_STATUS.to_string(),
            other => format!("Error: {other}"),
        }
    }
}

impl From<WalletError> for FlowError {
    fn from(value: WalletError) -> Self {
        match value {
            WalletError::UserRejected(message) => FlowError::UserRejected(message),
            other => FlowError::Unknown(other.to_string()),
        }
    }
}

impl From<ContractError> for FlowError {
    fn from(value: ContractError) -> Self {
        match value {
            ContractError::Reverted { transaction_hash } => {
                FlowError::CallReverted { transaction_hash }
            }
            ContractError::Submission(e) => FlowError::SubmissionFailed(e.to_string()),
            ContractError::Wallet(e) => e.into(),
            ContractError::Abi(e) => FlowError::Unknown(e.to_string()),
        }
    }
}

/// Connected account on the target network.
#[derive(Debug, Clone, Copy)]
pub struct Session {
    pub account: Address,
    pub signer: Signer,
    pub chain_id: ChainId,
}

pub(crate) enum Connection {
    Ready(Session),
    WrongNetwork { active: ChainId, required: ChainId },
}

/// Requests an account and makes sure the wallet is on the target network.
///
/// A rejected or failed switch is not an error: the caller terminates with the
/// wrong-network status without touching the contract. The active chain is not
/// re-read after a successful switch.
pub(crate) async fn connect<W>(wallet: &W, config: &Lockb0xConfig) -> Result<Connection, FlowError>
where
    W: WalletProvider + ?Sized,
{
    let account = wallet.request_accounts().await?;
    let signer = wallet.signer(account);
    let active = wallet.chain_id().await?;
    let required = config.target_chain_id;

    if active != required {
        tracing::info!(%active, %required, "requesting network switch");
        if let Err(e) = wallet.switch_chain(required).await {
            tracing::warn!(%active, %required, error = %e, "network switch failed");
            return Ok(Connection::WrongNetwork { active, required });
        }
    }

    Ok(Connection::Ready(Session {
        account,
        signer,
        chain_id: required,
    }))
}

/// Renders the terminal state of a flow and logs failures.
pub(crate) fn report<U>(
    flow: &'static str,
    ui: &U,
    result: Result<FlowOutcome, FlowError>,
) -> Result<FlowOutcome, FlowError>
where
    U: StatusSink + ?Sized,
{
    match &result {
        Ok(outcome) => {
            tracing::info!(flow, outcome = ?outcome, "flow finished");
            ui.set_status(&outcome.status_text());
        }
        Err(e) => {
            tracing::error!(flow, error = %e, "flow failed");
            ui.set_status(&e.status_text());
        }
    }
    result
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_status_text() {
        assert_eq!(
            FlowError::ProviderUnavailable.status_text(),
            PROVIDER_UNAVAILABLE_STATUS
        );
        assert_eq!(
            FlowError::SubmissionFailed("insufficient funds".into()).status_text(),
            "Error: insufficient funds"
        );
    }

    #[test]
    fn test_wallet_rejection_maps_to_user_rejected() {
        let err: FlowError = WalletError::UserRejected("denied".into()).into();
        assert!(matches!(err, FlowError::UserRejected(_)));

        let err: FlowError = WalletError::Connection("refused".into()).into();
        assert!(matches!(err, FlowError::Unknown(_)));
    }

    #[test]
    fn test_submission_rejection_maps_to_submission_failed() {
        let err: FlowError =
            ContractError::Submission(WalletError::UserRejected("denied".into())).into();
        assert!(matches!(err, FlowError::SubmissionFailed(_)));
    }

    #[test]
    fn test_wrong_network_status() {
        assert_eq!(
            wrong_network_status(ChainId::new(59141)),
            "Please switch to the Linea Sepolia network."
        );
        assert_eq!(
            wrong_network_status(ChainId::new(11155111)),
            "Please switch to the network with chain id 11155111."
        );
    }

    #[test]
    fn test_submitted_status_contains_full_hash() {
        let hash = B256::repeat_byte(0xab);
        let status = submitted_status(hash);
        assert!(status.starts_with("Transaction submitted: 0x"));
        assert!(status.ends_with(&"ab".repeat(32)));
    }
}
