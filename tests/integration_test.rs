//! Integration tests for lockb0x-key.
//!
//! These tests cover the public configuration surface: known networks,
//! deployments, ABIs and the contract binding's encoding against a
//! capturing wallet.

use std::sync::Mutex;

use alloy_primitives::{Address, B256, Bytes, U256};
use async_trait::async_trait;

use lockb0x_key::chain::{
    ChainId, ContractAbi, Lockb0xConfig, TransactionReceipt, TransactionRequest, TxStatus,
};
use lockb0x_key::contract::{ContractError, KeyContract};
use lockb0x_key::wallet::{WalletError, WalletProvider};
use lockb0x_key::{KnownNetworkLinea, LOCKB0X_KEY_LINEA_SEPOLIA, Lockb0xKey, network_name};

// ============================================================================
// Known Networks Tests
// ============================================================================

#[test]
fn test_known_network_linea_sepolia() {
    let chain_id: ChainId = ChainId::linea_sepolia();
    assert_eq!(chain_id.get(), 59141);
    assert_eq!(chain_id.to_hex(), "0xe705");
    assert_eq!(network_name(chain_id), Some("Linea Sepolia"));
}

#[test]
fn test_known_network_linea_mainnet() {
    let chain_id: ChainId = ChainId::linea_mainnet();
    assert_eq!(chain_id.get(), 59144);
    assert_eq!(network_name(chain_id), Some("Linea"));
    assert_eq!(network_name(ChainId::new(1)), None);
}

#[test]
fn test_default_deployment() {
    let config = Lockb0xConfig::default();
    assert_eq!(config, Lockb0xKey::linea_sepolia());
    assert_eq!(config.contract_address, LOCKB0X_KEY_LINEA_SEPOLIA);
    assert_eq!(
        config.contract_address.to_string().to_lowercase(),
        "0x1c6445ebcee5b9b12cfa63aeca1fa3e90b06bfcc"
    );
    assert_eq!(config.abi, ContractAbi::full());
}

#[test]
fn test_mainnet_deployment_requires_address() {
    let config = Lockb0xKey::linea_mainnet();
    assert_eq!(config.target_chain_id, ChainId::new(59144));
    assert_eq!(config.contract_address, Address::ZERO);
}

#[test]
fn test_config_serde_roundtrip() {
    let config = Lockb0xConfig::default().with_abi(ContractAbi::verify());
    let json = serde_json::to_string(&config).unwrap();
    assert!(json.contains("\"targetChainId\":\"0xe705\""));
    let recovered: Lockb0xConfig = serde_json::from_str(&json).unwrap();
    assert_eq!(config, recovered);
}

// ============================================================================
// Contract Binding Tests
// ============================================================================

#[derive(Default)]
struct CapturingWallet {
    views: Mutex<Vec<(Address, Bytes)>>,
    sent: Mutex<Vec<TransactionRequest>>,
}

#[async_trait]
impl WalletProvider for CapturingWallet {
    async fn request_accounts(&self) -> Result<Address, WalletError> {
        Err(WalletError::NoAccounts)
    }

    async fn chain_id(&self) -> Result<ChainId, WalletError> {
        Ok(ChainId::linea_sepolia())
    }

    async fn switch_chain(&self, _chain_id: ChainId) -> Result<(), WalletError> {
        Ok(())
    }

    async fn call(&self, to: Address, data: Bytes) -> Result<Bytes, WalletError> {
        self.views.lock().unwrap().push((to, data));
        Ok(U256::from(3).to_be_bytes::<32>().to_vec().into())
    }

    async fn send_transaction(&self, request: TransactionRequest) -> Result<B256, WalletError> {
        self.sent.lock().unwrap().push(request);
        Ok(B256::repeat_byte(1))
    }

    async fn wait_for_receipt(&self, hash: B256) -> Result<TransactionReceipt, WalletError> {
        Ok(TransactionReceipt {
            transaction_hash: hash,
            status: TxStatus::Success,
            block_number: None,
        })
    }
}

#[tokio::test]
async fn test_contract_balance_of_encoding() {
    let config = Lockb0xConfig::default();
    let wallet = CapturingWallet::default();
    let owner: Address = "0x00000000000000000000000000000000000000ff".parse().unwrap();
    let contract = KeyContract::new(&config, &wallet, wallet.signer(owner));

    let balance = contract.balance_of(owner).await.unwrap();

    assert_eq!(balance, U256::from(3));
    let views = wallet.views.lock().unwrap();
    assert_eq!(views.len(), 1);
    assert_eq!(views[0].0, LOCKB0X_KEY_LINEA_SEPOLIA);
    assert_eq!(
        hex::encode(&views[0].1),
        format!("70a08231{}ff", "0".repeat(62))
    );
}

#[tokio::test]
async fn test_contract_mint_attaches_value() {
    let config = Lockb0xConfig::default();
    let wallet = CapturingWallet::default();
    let signer: Address = "0x00000000000000000000000000000000000000aa".parse().unwrap();
    let contract = KeyContract::new(&config, &wallet, wallet.signer(signer));

    let pending = contract.mint(U256::from(5)).await.unwrap();
    assert_eq!(pending.hash(), B256::repeat_byte(1));
    let receipt = pending.wait().await.unwrap();
    assert!(receipt.is_success());

    let sent = wallet.sent.lock().unwrap();
    assert_eq!(sent.len(), 1);
    assert_eq!(sent[0].from, signer);
    assert_eq!(sent[0].to, LOCKB0X_KEY_LINEA_SEPOLIA);
    assert_eq!(sent[0].value, U256::from(5));
    assert_eq!(hex::encode(&sent[0].data), "1249c58b");
}

#[tokio::test]
async fn test_contract_undeclared_method_makes_no_request() {
    let config = Lockb0xConfig::default().with_abi(ContractAbi::verify());
    let wallet = CapturingWallet::default();
    let contract = KeyContract::new(&config, &wallet, wallet.signer(Address::ZERO));

    let result = contract.total_minted().await;

    assert!(matches!(result, Err(ContractError::Abi(_))));
    assert!(wallet.views.lock().unwrap().is_empty());
}
