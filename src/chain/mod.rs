//! Core EVM chain types, ABI handling and configuration.
//!
//! - [`ChainId`] - EIP-155 chain identifier with hex wire form
//! - [`TransactionRequest`] / [`TransactionReceipt`] - wallet wire types
//! - [`ContractAbi`] - the function set a contract binding may call
//! - [`Lockb0xConfig`] - contract address, ABI and target network

pub mod types;
pub use types::*;

pub mod abi;
pub use abi::{AbiError, ContractAbi};

pub mod config;
pub use config::*;
