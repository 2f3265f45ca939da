//! Mint and verify lockb0x Key tokens through an EIP-1193 wallet provider.
//!
//! The lockb0x Key is an ERC-721 token deployed on Linea. All token logic
//! (pricing, balances, ownership events) lives in the contract; this crate
//! only drives a wallet through two short flows and reports their progress:
//!
//! 1. **Mint**: connect -> ensure network -> skip if already holding a key ->
//!    read `mintPrice()` -> submit `mint()` with exactly that value -> await
//!    confirmation
//! 2. **Verify**: connect -> ensure network -> skip if holding no key ->
//!    submit `verifyOwnership()` -> await confirmation
//!
//! # Feature Flags
//!
//! - `rpc` (default) - [`wallet::JsonRpcWallet`], a wallet provider over
//!   HTTP JSON-RPC
//!
//! # Usage
//!
//! ```ignore
//! use lockb0x_key::flows::{MintFlow, StatusSink};
//! use lockb0x_key::chain::Lockb0xConfig;
//! use lockb0x_key::wallet::JsonRpcWallet;
//!
//! let wallet = JsonRpcWallet::new("http://127.0.0.1:8545");
//! let flow = MintFlow::new(Lockb0xConfig::default());
//! let outcome = flow.run(Some(&wallet), &terminal).await?;
//! ```

pub mod chain;
pub mod contract;
pub mod flows;
pub mod wallet;

mod networks;
pub use networks::*;

pub use flows::{FlowError, FlowOutcome, MintFlow, StatusSink, VerifyFlow};
