//! EVM wallet implementation.
//!
//! Built on [`alloy`]'s local signer and HTTP provider. Construction
//! performs no network I/O; the chain id comes from configuration rather
//! than endpoint auto-detection, so a wallet can be built (and unit tested)
//! without a reachable RPC.

use std::fmt;
use std::time::Duration;

use alloy::network::{Ethereum, EthereumWallet, TransactionBuilder};
use alloy::primitives::{Address, B256, U256};
use alloy::providers::{DynProvider, PendingTransactionBuilder, Provider, ProviderBuilder};
use alloy::rpc::types::TransactionRequest as RpcTransactionRequest;
use alloy::signers::local::PrivateKeySigner;
use alloy::signers::{Signer, SignerSync};
use tokio::sync::Mutex;
use tracing::{debug, info, warn};

use super::error::WalletError;
use crate::abi::{IAgentRegistry, IERC20, IGameManager};
use crate::chain::{TransactionOutcome, TransactionRequest, TxStatus};
use crate::config::{Config, DEFAULT_CONFIRMATION_TIMEOUT};

/// Builder for constructing an [`AgentWallet`].
///
/// Created by [`AgentWallet::builder`]. All of `private_key`, `rpc_url`
/// and `chain_id` are required.
#[derive(Debug, Default)]
pub struct AgentWalletBuilder {
    /// Raw private key hex string, with or without `0x` prefix.
    private_key: Option<String>,
    /// JSON-RPC endpoint URL.
    rpc_url: Option<String>,
    /// Chain id the wallet is bound to.
    chain_id: Option<u64>,
    /// Bound on the receipt wait for write operations.
    confirmation_timeout: Option<Duration>,
}

impl AgentWalletBuilder {
    /// Set the private key (hex string, with or without `0x` prefix).
    #[must_use]
    pub fn private_key(mut self, key: impl Into<String>) -> Self {
        self.private_key = Some(key.into());
        self
    }

    /// Set the JSON-RPC endpoint URL.
    #[must_use]
    pub fn rpc_url(mut self, url: impl Into<String>) -> Self {
        self.rpc_url = Some(url.into());
        self
    }

    /// Set the chain id the wallet signs for.
    #[must_use]
    pub const fn chain_id(mut self, chain_id: u64) -> Self {
        self.chain_id = Some(chain_id);
        self
    }

    /// Bound the receipt wait for write operations (default 60 s).
    #[must_use]
    pub const fn confirmation_timeout(mut self, timeout: Duration) -> Self {
        self.confirmation_timeout = Some(timeout);
        self
    }

    /// Build the [`AgentWallet`].
    pub fn build(self) -> Result<AgentWallet, WalletError> {
        let rpc_url = self
            .rpc_url
            .ok_or_else(|| WalletError::Config("rpc_url is required".into()))?;
        let key = self
            .private_key
            .ok_or_else(|| WalletError::Config("private_key is required".into()))?;
        let chain_id = self
            .chain_id
            .ok_or_else(|| WalletError::Config("chain_id is required".into()))?;

        let stripped = key.strip_prefix("0x").unwrap_or(&key);
        let mut signer = stripped
            .parse::<PrivateKeySigner>()
            .map_err(|e| WalletError::Config(format!("invalid private key: {e}")))?;
        signer.set_chain_id(Some(chain_id));

        let url = rpc_url
            .parse()
            .map_err(|e| WalletError::Config(format!("invalid RPC URL '{rpc_url}': {e}")))?;
        let provider = ProviderBuilder::new()
            .wallet(EthereumWallet::from(signer.clone()))
            .connect_http(url)
            .erased();

        let address = signer.address();
        info!(address = %address, chain_id, "agent wallet initialized");

        Ok(AgentWallet {
            signer,
            provider,
            address,
            chain_id,
            confirmation_timeout: self.confirmation_timeout.unwrap_or(DEFAULT_CONFIRMATION_TIMEOUT),
            write_lock: Mutex::new(()),
        })
    }
}

/// A freshly provisioned signing identity.
///
/// `private_key` and `address` are distinct values: the address is derived
/// from the key and the key alone signs for it.
#[derive(Clone)]
pub struct GeneratedIdentity {
    /// The private key as a `0x`-prefixed hex string. Handle with care.
    pub private_key: String,
    /// The address derived from the private key.
    pub address: Address,
}

impl fmt::Debug for GeneratedIdentity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("GeneratedIdentity")
            .field("address", &self.address)
            .finish_non_exhaustive()
    }
}

/// One agent's signing identity bound to one chain endpoint.
///
/// See the [module docs](crate::wallet) for the custody and ordering
/// contract.
pub struct AgentWallet {
    /// Local signer; the only copy of the key material.
    signer: PrivateKeySigner,
    /// Wallet-filled provider used for both reads and writes.
    provider: DynProvider,
    /// Address derived from the signing key.
    address: Address,
    /// Chain the wallet is bound to.
    chain_id: u64,
    /// Bound on the receipt wait.
    confirmation_timeout: Duration,
    /// Serializes writes so account nonces stay ordered.
    write_lock: Mutex<()>,
}

impl fmt::Debug for AgentWallet {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("AgentWallet")
            .field("address", &self.address)
            .field("chain_id", &self.chain_id)
            .finish_non_exhaustive()
    }
}

impl AgentWallet {
    /// Create a builder for constructing an [`AgentWallet`].
    #[must_use]
    pub fn builder() -> AgentWalletBuilder {
        AgentWalletBuilder::default()
    }

    /// Build the wallet described by startup configuration.
    ///
    /// Returns `Ok(None)` when no private key is configured; the process
    /// then runs read-only and write tools report themselves unconfigured.
    pub fn from_config(config: &Config) -> Result<Option<Self>, WalletError> {
        let Some(key) = config.private_key.as_deref() else {
            return Ok(None);
        };
        let chain_id = config.chain_id.ok_or_else(|| {
            WalletError::Config("CHAIN_ID is required when PRIVATE_KEY is set".into())
        })?;
        Self::builder()
            .private_key(key)
            .rpc_url(&config.rpc_url)
            .chain_id(chain_id)
            .confirmation_timeout(config.confirmation_timeout)
            .build()
            .map(Some)
    }

    /// Generate a fresh random identity for provisioning a new agent.
    #[must_use]
    pub fn generate() -> GeneratedIdentity {
        let signer = PrivateKeySigner::random();
        GeneratedIdentity {
            private_key: format!("0x{}", hex::encode(signer.to_bytes())),
            address: signer.address(),
        }
    }

    /// The wallet's address.
    #[must_use]
    pub const fn address(&self) -> Address {
        self.address
    }

    /// The checksummed address string.
    #[must_use]
    pub fn address_string(&self) -> String {
        self.address.to_checksum(None)
    }

    /// The chain id this wallet signs for.
    #[must_use]
    pub const fn chain_id(&self) -> u64 {
        self.chain_id
    }

    /// Native-currency balance of this wallet, in wei.
    pub async fn balance(&self) -> Result<U256, WalletError> {
        self.balance_of(self.address).await
    }

    /// Native-currency balance of any address, in wei.
    pub async fn balance_of(&self, address: Address) -> Result<U256, WalletError> {
        self.provider
            .get_balance(address)
            .await
            .map_err(|e| WalletError::Provider(format!("failed to get balance: {e}")))
    }

    /// This wallet's balance of a fungible token (`balanceOf(self)`).
    pub async fn token_balance(&self, token: Address) -> Result<U256, WalletError> {
        IERC20::new(token, &self.provider)
            .balanceOf(self.address)
            .call()
            .await
            .map_err(|e| WalletError::Provider(format!("failed to read token balance: {e}")))
    }

    /// Estimate gas for a value transfer from this wallet. Signs nothing.
    pub async fn estimate_gas(&self, to: Address, value: U256) -> Result<u64, WalletError> {
        let tx = RpcTransactionRequest::default()
            .with_from(self.address)
            .with_to(to)
            .with_value(value);
        self.provider
            .estimate_gas(tx)
            .await
            .map_err(|e| WalletError::Provider(format!("failed to estimate gas: {e}")))
    }

    /// Sign an arbitrary message (EIP-191 `personal_sign`).
    pub async fn sign_message(&self, message: &[u8]) -> Result<String, WalletError> {
        let sig = self
            .signer
            .sign_message(message)
            .await
            .map_err(|e| WalletError::Signing(format!("message signing failed: {e}")))?;
        Ok(format!("0x{}", hex::encode(sig.as_bytes())))
    }

    /// Sign an arbitrary message synchronously.
    pub fn sign_message_sync(&self, message: &[u8]) -> Result<String, WalletError> {
        let sig = self
            .signer
            .sign_message_sync(message)
            .map_err(|e| WalletError::Signing(format!("message signing failed: {e}")))?;
        Ok(format!("0x{}", hex::encode(sig.as_bytes())))
    }

    /// Send native currency to an address. Returns the transaction hash.
    pub async fn send_eth(&self, to: Address, value: U256) -> Result<B256, WalletError> {
        let request = TransactionRequest::transfer(to, value, self.chain_id);
        Ok(self.execute(request).await?.hash)
    }

    /// Submit a transaction request and block until it confirms.
    ///
    /// Holds the wallet's write lock across submit and confirm. A revert or
    /// an exceeded confirmation bound is an error; neither is retried.
    pub async fn execute(
        &self,
        request: TransactionRequest,
    ) -> Result<TransactionOutcome, WalletError> {
        let _guard = self.write_lock.lock().await;
        debug!(to = %request.to, value = %request.value, "submitting transaction");
        let pending = self
            .provider
            .send_transaction(request.into_rpc(self.address))
            .await
            .map_err(|e| WalletError::Transaction(format!("submission failed: {e}")))?;
        self.confirm(pending).await
    }

    /// Register this agent in the on-chain registry.
    pub async fn register_on_chain(
        &self,
        registry: Address,
        name: &str,
    ) -> Result<B256, WalletError> {
        let _guard = self.write_lock.lock().await;
        debug!(%registry, name, "registering agent on chain");
        let pending = IAgentRegistry::new(registry, &self.provider)
            .registerAgent(name.to_string())
            .send()
            .await
            .map_err(|e| WalletError::Transaction(format!("registration failed: {e}")))?;
        Ok(self.confirm(pending).await?.hash)
    }

    /// Approve a spender for a fungible-token amount.
    pub async fn approve_token(
        &self,
        token: Address,
        spender: Address,
        amount: U256,
    ) -> Result<B256, WalletError> {
        let _guard = self.write_lock.lock().await;
        debug!(%token, %spender, %amount, "approving token spend");
        let pending = IERC20::new(token, &self.provider)
            .approve(spender, amount)
            .send()
            .await
            .map_err(|e| WalletError::Transaction(format!("approve failed: {e}")))?;
        Ok(self.confirm(pending).await?.hash)
    }

    /// Create a game with the given wager.
    pub async fn create_game(&self, game: Address, wager: U256) -> Result<B256, WalletError> {
        let _guard = self.write_lock.lock().await;
        debug!(%game, %wager, "creating game");
        let pending = IGameManager::new(game, &self.provider)
            .createGame(wager)
            .send()
            .await
            .map_err(|e| WalletError::Transaction(format!("createGame failed: {e}")))?;
        Ok(self.confirm(pending).await?.hash)
    }

    /// Join an existing game by id.
    pub async fn join_game(&self, game: Address, game_id: U256) -> Result<B256, WalletError> {
        let _guard = self.write_lock.lock().await;
        debug!(%game, %game_id, "joining game");
        let pending = IGameManager::new(game, &self.provider)
            .joinGame(game_id)
            .send()
            .await
            .map_err(|e| WalletError::Transaction(format!("joinGame failed: {e}")))?;
        Ok(self.confirm(pending).await?.hash)
    }

    /// Block on the receipt for a submitted transaction, bounded by the
    /// configured confirmation timeout.
    async fn confirm(
        &self,
        pending: PendingTransactionBuilder<Ethereum>,
    ) -> Result<TransactionOutcome, WalletError> {
        let hash = *pending.tx_hash();
        debug!(%hash, "waiting for receipt");
        let receipt = match tokio::time::timeout(self.confirmation_timeout, pending.get_receipt())
            .await
        {
            Ok(Ok(receipt)) => receipt,
            Ok(Err(e)) => {
                return Err(WalletError::Transaction(format!(
                    "confirmation of {hash} failed: {e}"
                )));
            }
            Err(_) => {
                warn!(%hash, timeout = ?self.confirmation_timeout, "gave up waiting for receipt");
                return Err(WalletError::ConfirmationTimeout {
                    hash,
                    timeout: self.confirmation_timeout,
                });
            }
        };

        let outcome = TransactionOutcome::from_receipt(&receipt);
        if outcome.status == TxStatus::Reverted {
            warn!(%hash, "transaction reverted");
            return Err(WalletError::Reverted { hash });
        }
        info!(%hash, block = ?outcome.block_number, gas = ?outcome.gas_used, "transaction confirmed");
        Ok(outcome)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    // The address derived from private key 0x…01, a standard test vector.
    const KEY_ONE: &str = "0x0000000000000000000000000000000000000000000000000000000000000001";
    const ADDR_ONE: &str = "0x7E5F4552091A69125d5DfCb7b8C2659029395Bdf";

    fn wallet() -> AgentWallet {
        AgentWallet::builder()
            .private_key(KEY_ONE)
            .rpc_url("http://127.0.0.1:8545")
            .chain_id(31337)
            .build()
            .unwrap()
    }

    #[test]
    fn builder_requires_private_key() {
        let err = AgentWallet::builder()
            .rpc_url("http://127.0.0.1:8545")
            .chain_id(1)
            .build()
            .unwrap_err();
        assert!(matches!(err, WalletError::Config(_)));
    }

    #[test]
    fn builder_requires_rpc_url() {
        let err = AgentWallet::builder()
            .private_key(KEY_ONE)
            .chain_id(1)
            .build()
            .unwrap_err();
        assert!(matches!(err, WalletError::Config(_)));
    }

    #[test]
    fn builder_requires_chain_id() {
        let err = AgentWallet::builder()
            .private_key(KEY_ONE)
            .rpc_url("http://127.0.0.1:8545")
            .build()
            .unwrap_err();
        assert!(matches!(err, WalletError::Config(_)));
    }

    #[test]
    fn builder_rejects_malformed_key() {
        let err = AgentWallet::builder()
            .private_key("0xnot-a-key")
            .rpc_url("http://127.0.0.1:8545")
            .chain_id(1)
            .build()
            .unwrap_err();
        assert!(matches!(err, WalletError::Config(_)));
    }

    #[test]
    fn address_is_derived_from_the_key() {
        let wallet = wallet();
        assert_eq!(wallet.address_string(), ADDR_ONE);
        assert_eq!(wallet.chain_id(), 31337);
    }

    #[test]
    fn key_prefix_is_optional() {
        let bare = AgentWallet::builder()
            .private_key(KEY_ONE.trim_start_matches("0x"))
            .rpc_url("http://127.0.0.1:8545")
            .chain_id(31337)
            .build()
            .unwrap();
        assert_eq!(bare.address_string(), ADDR_ONE);
    }

    #[test]
    fn generated_identity_is_usable_for_signing() {
        let identity = AgentWallet::generate();

        // The private key field must carry the actual key, not the address:
        // it re-derives the advertised address and the two values differ.
        assert_ne!(
            identity.private_key.to_lowercase(),
            identity.address.to_string().to_lowercase()
        );
        let signer: PrivateKeySigner = identity
            .private_key
            .trim_start_matches("0x")
            .parse()
            .unwrap();
        assert_eq!(signer.address(), identity.address);
    }

    #[test]
    fn generated_identities_are_unique() {
        let a = AgentWallet::generate();
        let b = AgentWallet::generate();
        assert_ne!(a.address, b.address);
        assert_ne!(a.private_key, b.private_key);
    }

    #[test]
    fn debug_output_redacts_key_material() {
        let rendered = format!("{:?}", wallet());
        assert!(!rendered.contains(KEY_ONE.trim_start_matches("0x")));
        assert!(rendered.contains("AgentWallet"));

        let identity = AgentWallet::generate();
        let rendered = format!("{identity:?}");
        assert!(!rendered.contains(&identity.private_key));
    }

    #[test]
    fn sign_message_sync_produces_a_65_byte_signature() {
        let sig = wallet().sign_message_sync(b"hello").unwrap();
        assert!(sig.starts_with("0x"));
        assert_eq!(sig.len(), 2 + 130);
    }

    #[tokio::test]
    async fn write_locks_are_per_wallet() {
        let a = wallet();
        let b = wallet();

        let _held = a.write_lock.lock().await;
        // The other wallet's writes are unaffected…
        assert!(b.write_lock.try_lock().is_ok());
        // …while a second write on the same wallet must wait.
        assert!(a.write_lock.try_lock().is_err());
    }
}
