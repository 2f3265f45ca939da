//! Read-only query of the contract's public state.

use std::fmt::{Display, Formatter};

use alloy_primitives::{Address, U256};

use super::{Connection, FlowError, FlowOutcome, StatusSink, connect, report};
use crate::chain::Lockb0xConfig;
use crate::contract::KeyContract;
use crate::wallet::WalletProvider;

/// Contract state as seen by the connected account.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ContractInfo {
    pub account: Address,
    pub balance: U256,
    pub mint_price: U256,
    pub total_minted: U256,
}

impl Display for ContractInfo {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "Mint price: {} wei. Total minted: {}. Keys held by {}: {}.",
            self.mint_price, self.total_minted, self.account, self.balance
        )
    }
}

/// Reads `mintPrice()`, `totalMinted()` and the account's balance without
/// submitting anything.
pub async fn query_info<W, U>(
    config: &Lockb0xConfig,
    wallet: Option<&W>,
    ui: &U,
) -> Result<FlowOutcome, FlowError>
where
    W: WalletProvider + ?Sized,
    U: StatusSink + ?Sized,
{
    ui.set_status("");
    let result = read_info(config, wallet).await;
    report("info", ui, result)
}

async fn read_info<W>(config: &Lockb0xConfig, wallet: Option<&W>) -> Result<FlowOutcome, FlowError>
where
    W: WalletProvider + ?Sized,
{
    let wallet = wallet.ok_or(FlowError::ProviderUnavailable)?;

    let session = match connect(wallet, config).await? {
        Connection::Ready(session) => session,
        Connection::WrongNetwork { active, required } => {
            return Ok(FlowOutcome::WrongNetwork { active, required });
        }
    };

    let contract = KeyContract::new(config, wallet, session.signer);
    let info = ContractInfo {
        account: session.account,
        balance: contract.balance_of(session.account).await?,
        mint_price: contract.mint_price().await?,
        total_minted: contract.total_minted().await?,
    };
    Ok(FlowOutcome::Info(info))
}
