//! Verify flow: record on-chain that the account holds a lockb0x Key.

use alloy_primitives::U256;

use super::{
    Connection, FlowError, FlowOutcome, InFlight, StatusSink, VERIFY_SUBMITTING_STATUS, connect,
    report, submitted_status,
};
use crate::chain::Lockb0xConfig;
use crate::contract::KeyContract;
use crate::wallet::WalletProvider;

/// Drives `balanceOf` -> `verifyOwnership()` -> confirmation.
#[derive(Debug)]
pub struct VerifyFlow {
    config: Lockb0xConfig,
    in_flight: InFlight,
}

impl VerifyFlow {
    pub fn new(config: Lockb0xConfig) -> Self {
        Self {
            config,
            in_flight: InFlight::new(),
        }
    }

    pub fn config(&self) -> &Lockb0xConfig {
        &self.config
    }

    pub fn is_running(&self) -> bool {
        self.in_flight.is_running()
    }

    /// Runs the flow once. Only the status text is updated; the trigger is
    /// left alone.
    pub async fn run<W, U>(&self, wallet: Option<&W>, ui: &U) -> Result<FlowOutcome, FlowError>
    where
        W: WalletProvider + ?Sized,
        U: StatusSink + ?Sized,
    {
        let Some(_running) = self.in_flight.try_acquire() else {
            tracing::warn!("verification requested while a previous one is in progress");
            return Err(FlowError::AlreadyRunning("verification"));
        };

        ui.set_status("");
        let result = self.execute(wallet, ui).await;
        report("verify", ui, result)
    }

    async fn execute<W, U>(&self, wallet: Option<&W>, ui: &U) -> Result<FlowOutcome, FlowError>
    where
        W: WalletProvider + ?Sized,
        U: StatusSink + ?Sized,
    {
        let wallet = wallet.ok_or(FlowError::ProviderUnavailable)?;

        let session = match connect(wallet, &self.config).await? {
            Connection::Ready(session) => session,
            Connection::WrongNetwork { active, required } => {
                return Ok(FlowOutcome::WrongNetwork { active, required });
            }
        };

        let contract = KeyContract::new(&self.config, wallet, session.signer);

        let balance = contract.balance_of(session.account).await?;
        if balance == U256::ZERO {
            return Ok(FlowOutcome::NotOwner);
        }

        ui.set_status(VERIFY_SUBMITTING_STATUS);
        let pending = contract.verify_ownership().await?;
        ui.set_status(&submitted_status(pending.hash()));

        let receipt = pending.wait().await?;
        Ok(FlowOutcome::Verified { receipt })
    }
}
