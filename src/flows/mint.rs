//! Mint flow: purchase a lockb0x Key.

use alloy_primitives::U256;

use super::{
    Connection, FlowError, FlowOutcome, InFlight, StatusSink, TriggerGuard, connect, report,
    submitted_status,
};
use crate::chain::Lockb0xConfig;
use crate::contract::KeyContract;
use crate::wallet::WalletProvider;

/// Drives `balanceOf` -> `mintPrice` -> `mint{value}` -> confirmation.
///
/// The ownership short-circuit is a convenience check only. The balance is
/// not re-read before `mint()` is submitted, so the contract must reject
/// duplicate mints itself.
#[derive(Debug)]
pub struct MintFlow {
    config: Lockb0xConfig,
    in_flight: InFlight,
}

impl MintFlow {
    pub fn new(config: Lockb0xConfig) -> Self {
        Self {
            config,
            in_flight: InFlight::new(),
        }
    }

    pub fn config(&self) -> &Lockb0xConfig {
        &self.config
    }

    /// Returns `true` while an invocation is in progress.
    pub fn is_running(&self) -> bool {
        self.in_flight.is_running()
    }

    /// Runs the flow once.
    ///
    /// `wallet` is `None` when no provider is present in the environment. The
    /// trigger is disabled for the duration and re-enabled on every exit path.
    /// A concurrent invocation returns [`FlowError::AlreadyRunning`] without
    /// touching `ui`.
    pub async fn run<W, U>(&self, wallet: Option<&W>, ui: &U) -> Result<FlowOutcome, FlowError>
    where
        W: WalletProvider + ?Sized,
        U: StatusSink + ?Sized,
    {
        let Some(_running) = self.in_flight.try_acquire() else {
            tracing::warn!("mint requested while a previous mint is in progress");
            return Err(FlowError::AlreadyRunning("mint"));
        };

        ui.set_status("");
        let _trigger = TriggerGuard::disable(ui);
        let result = self.execute(wallet, ui).await;
        report("mint", ui, result)
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
        if balance > U256::ZERO {
            tracing::info!(account = %session.account, %balance, "account already holds a key");
            return Ok(FlowOutcome::AlreadyHolds { balance });
        }

        let price = contract.mint_price().await?;
        tracing::debug!(price_wei = %price, "mint price");

        let pending = contract.mint(price).await?;
        ui.set_status(&submitted_status(pending.hash()));

        let receipt = pending.wait().await?;
        Ok(FlowOutcome::Minted { receipt })
    }
}
