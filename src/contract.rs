//! Binding to the deployed lockb0x Key contract.
//!
//! [`KeyContract`] pairs the contract address and ABI with a wallet and the
//! signing account. View methods go through `eth_call`; state-changing
//! methods are handed to the wallet for signing and return a
//! [`PendingTransaction`].

use alloy_dyn_abi::DynSolValue;
use alloy_primitives::{Address, B256, U256};

use crate::chain::abi;
use crate::chain::{ContractAbi, Lockb0xConfig, TransactionReceipt, TransactionRequest};
use crate::wallet::{Signer, WalletError, WalletProvider};

/// A contract binding restricted to the functions its ABI declares.
pub struct KeyContract<'a, W: ?Sized> {
    address: Address,
    abi: &'a ContractAbi,
    wallet: &'a W,
    signer: Signer,
}

impl<'a, W> KeyContract<'a, W>
where
    W: WalletProvider + ?Sized,
{
    /// Binds the contract described by `config` to `wallet` and `signer`.
    pub fn new(config: &'a Lockb0xConfig, wallet: &'a W, signer: Signer) -> Self {
        Self {
            address: config.contract_address,
            abi: &config.abi,
            wallet,
            signer,
        }
    }

    /// Returns the contract address.
    pub fn address(&self) -> Address {
        self.address
    }

    /// Returns the signing account.
    pub fn signer(&self) -> Signer {
        self.signer
    }

    /// `balanceOf(owner)`
    pub async fn balance_of(&self, owner: Address) -> Result<U256, ContractError> {
        self.view_uint("balanceOf", &[DynSolValue::Address(owner)])
            .await
    }

    /// `mintPrice()`, in wei.
    pub async fn mint_price(&self) -> Result<U256, ContractError> {
        self.view_uint("mintPrice", &[]).await
    }

    /// `totalMinted()`
    pub async fn total_minted(&self) -> Result<U256, ContractError> {
        self.view_uint("totalMinted", &[]).await
    }

    /// Submits `mint()` paying `value` wei.
    pub async fn mint(&self, value: U256) -> Result<PendingTransaction<'a, W>, ContractError> {
        self.transact("mint", &[], value).await
    }

    /// Submits `verifyOwnership()` with no value attached.
    pub async fn verify_ownership(&self) -> Result<PendingTransaction<'a, W>, ContractError> {
        self.transact("verifyOwnership", &[], U256::ZERO).await
    }

    async fn view_uint(&self, method: &str, args: &[DynSolValue]) -> Result<U256, ContractError> {
        let function = self.abi.function(method)?;
        let data = abi::encode_call(function, args)?;
        let output = self.wallet.call(self.address, data).await?;
        Ok(abi::decode_uint(function, &output)?)
    }

    async fn transact(
        &self,
        method: &str,
        args: &[DynSolValue],
        value: U256,
    ) -> Result<PendingTransaction<'a, W>, ContractError> {
        let data = abi::encode_call(self.abi.function(method)?, args)?;
        let request = TransactionRequest {
            from: self.signer.address(),
            to: self.address,
            data,
            value,
        };
        let hash = self
            .wallet
            .send_transaction(request)
            .await
            .map_err(ContractError::Submission)?;
        tracing::info!(method, tx_hash = %hash, value = %value, "transaction submitted");
        Ok(PendingTransaction {
            hash,
            wallet: self.wallet,
        })
    }
}

/// A submitted transaction awaiting confirmation.
pub struct PendingTransaction<'a, W: ?Sized> {
    hash: B256,
    wallet: &'a W,
}

impl<W> PendingTransaction<'_, W>
where
    W: WalletProvider + ?Sized,
{
    /// Returns the transaction hash.
    pub fn hash(&self) -> B256 {
        self.hash
    }

    /// Suspends until the transaction is mined.
    ///
    /// A mined transaction that reverted is reported as
    /// [`ContractError::Reverted`].
    pub async fn wait(self) -> Result<TransactionReceipt, ContractError> {
        let receipt = self.wallet.wait_for_receipt(self.hash).await?;
        if !receipt.is_success() {
            return Err(ContractError::Reverted {
                transaction_hash: receipt.transaction_hash,
            });
        }
        Ok(receipt)
    }
}

/// Errors raised by contract calls.
#[derive(Debug, thiserror::Error)]
pub enum ContractError {
    /// The call could not be encoded or its result decoded.
    #[error(transparent)]
    Abi(#[from] abi::AbiError),

    /// The wallet failed a read or a receipt lookup.
    #[error(transparent)]
    Wallet(#[from] WalletError),

    /// The wallet failed to sign or broadcast a state-changing call.
    #[error("{0}")]
    Submission(WalletError),

    /// The transaction was mined but reverted.
    #[error("transaction reverted (transactionHash=\"{transaction_hash}\")")]
    Reverted { transaction_hash: B256 },
}
