//! Read-only chain access and the domain transaction types.
//!
//! [`ChainClient`] wraps a type-erased alloy provider and exposes the read
//! surface the tool layer needs: balances, blocks, gas price, transactions,
//! receipts, ERC-20 reads and ENS reverse lookups. It holds no key material
//! and is safe to share across concurrent readers. There is deliberately no
//! global client: callers construct one and pass it by handle, which keeps
//! tests isolated and lets different agents point at different endpoints.

pub mod ens;
mod error;
pub mod tools;

pub use error::ChainError;
pub use tools::chain_tools;

use alloy::network::TransactionBuilder;
use alloy::primitives::{Address, B256, Bytes, U256};
use alloy::providers::{DynProvider, Provider, ProviderBuilder};
use alloy::rpc::types::{
    Block, Transaction, TransactionReceipt, TransactionRequest as RpcTransactionRequest,
};
use serde::Serialize;

use crate::abi::IERC20;

/// A state-changing operation, immutable once constructed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TransactionRequest {
    /// Recipient address.
    pub to: Address,
    /// Amount in the chain's smallest unit (wei).
    pub value: U256,
    /// Optional calldata for contract interactions.
    pub data: Option<Bytes>,
    /// Chain the transaction is bound to.
    pub chain_id: u64,
}

impl TransactionRequest {
    /// A plain value transfer.
    #[must_use]
    pub fn transfer(to: Address, value: U256, chain_id: u64) -> Self {
        Self {
            to,
            value,
            data: None,
            chain_id,
        }
    }

    /// A contract call carrying calldata.
    #[must_use]
    pub fn call(to: Address, value: U256, data: Bytes, chain_id: u64) -> Self {
        Self {
            to,
            value,
            data: Some(data),
            chain_id,
        }
    }

    /// Lower into the wire-level request the provider consumes.
    pub(crate) fn into_rpc(self, from: Address) -> RpcTransactionRequest {
        let mut tx = RpcTransactionRequest::default()
            .with_from(from)
            .with_to(self.to)
            .with_value(self.value)
            .with_chain_id(self.chain_id);
        if let Some(data) = self.data {
            tx = tx.with_input(data);
        }
        tx
    }
}

/// Where a submitted transaction stands.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum TxStatus {
    /// Submitted, no receipt observed yet.
    Pending,
    /// Mined and executed successfully.
    Confirmed,
    /// Mined but execution failed.
    Reverted,
}

impl std::fmt::Display for TxStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let s = match self {
            Self::Pending => "pending",
            Self::Confirmed => "confirmed",
            Self::Reverted => "reverted",
        };
        f.write_str(s)
    }
}

/// The terminal record of one [`TransactionRequest`].
///
/// Created pending on submission and completed once a receipt is observed;
/// terminal either way, the same hash is never retried.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct TransactionOutcome {
    /// Transaction hash.
    pub hash: B256,
    /// Execution status.
    pub status: TxStatus,
    /// Block the transaction was included in, once known.
    pub block_number: Option<u64>,
    /// Gas consumed, once known.
    pub gas_used: Option<u64>,
}

impl TransactionOutcome {
    /// Outcome for a transaction that has been submitted but not confirmed.
    #[must_use]
    pub const fn pending(hash: B256) -> Self {
        Self {
            hash,
            status: TxStatus::Pending,
            block_number: None,
            gas_used: None,
        }
    }

    /// Complete an outcome from an observed receipt.
    #[must_use]
    pub fn from_receipt(receipt: &TransactionReceipt) -> Self {
        Self {
            hash: receipt.transaction_hash,
            status: if receipt.status() {
                TxStatus::Confirmed
            } else {
                TxStatus::Reverted
            },
            block_number: receipt.block_number,
            gas_used: Some(receipt.gas_used),
        }
    }

    /// Whether the transaction executed successfully.
    #[must_use]
    pub fn is_confirmed(&self) -> bool {
        self.status == TxStatus::Confirmed
    }
}

/// Read-only RPC access to one chain endpoint.
#[derive(Clone)]
pub struct ChainClient {
    provider: DynProvider,
    rpc_url: String,
}

impl std::fmt::Debug for ChainClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ChainClient")
            .field("rpc_url", &self.rpc_url)
            .finish_non_exhaustive()
    }
}

impl ChainClient {
    /// Connect to an RPC endpoint.
    ///
    /// Construction performs no network I/O; the first request does.
    pub fn new(rpc_url: &str) -> Result<Self, ChainError> {
        let url = rpc_url
            .parse()
            .map_err(|e| ChainError::InvalidInput(format!("invalid RPC URL '{rpc_url}': {e}")))?;
        let provider = ProviderBuilder::new().connect_http(url).erased();
        Ok(Self {
            provider,
            rpc_url: rpc_url.to_string(),
        })
    }

    /// The endpoint this client talks to.
    #[must_use]
    pub fn rpc_url(&self) -> &str {
        &self.rpc_url
    }

    /// Borrow the underlying provider.
    #[must_use]
    pub const fn provider(&self) -> &DynProvider {
        &self.provider
    }

    /// Native-currency balance of an address, in wei.
    pub async fn balance(&self, address: Address) -> Result<U256, ChainError> {
        self.provider
            .get_balance(address)
            .await
            .map_err(|e| ChainError::Provider(format!("failed to get balance: {e}")))
    }

    /// Current chain height.
    pub async fn block_number(&self) -> Result<u64, ChainError> {
        self.provider
            .get_block_number()
            .await
            .map_err(|e| ChainError::Provider(format!("failed to get block number: {e}")))
    }

    /// Current gas price in wei per gas.
    pub async fn gas_price(&self) -> Result<u128, ChainError> {
        self.provider
            .get_gas_price()
            .await
            .map_err(|e| ChainError::Provider(format!("failed to get gas price: {e}")))
    }

    /// Look up a transaction by hash.
    pub async fn transaction(&self, hash: B256) -> Result<Transaction, ChainError> {
        self.provider
            .get_transaction_by_hash(hash)
            .await
            .map_err(|e| ChainError::Provider(format!("failed to get transaction: {e}")))?
            .ok_or_else(|| ChainError::NotFound(format!("transaction {hash} not found")))
    }

    /// Look up a transaction receipt by hash.
    pub async fn receipt(&self, hash: B256) -> Result<TransactionReceipt, ChainError> {
        self.provider
            .get_transaction_receipt(hash)
            .await
            .map_err(|e| ChainError::Provider(format!("failed to get receipt: {e}")))?
            .ok_or_else(|| ChainError::NotFound(format!("no receipt found for {hash}")))
    }

    /// Fetch a block by height.
    pub async fn block(&self, number: u64) -> Result<Block, ChainError> {
        self.provider
            .get_block_by_number(number.into())
            .await
            .map_err(|e| ChainError::Provider(format!("failed to get block: {e}")))?
            .ok_or_else(|| ChainError::NotFound(format!("block {number} not found")))
    }

    /// Standard fungible-token balance read (`balanceOf`).
    pub async fn erc20_balance(&self, token: Address, owner: Address) -> Result<U256, ChainError> {
        IERC20::new(token, &self.provider)
            .balanceOf(owner)
            .call()
            .await
            .map_err(|e| ChainError::Provider(format!("failed to read token balance: {e}")))
    }

    /// Estimate gas for a plain value transfer. Read-only; signs nothing.
    pub async fn estimate_gas(&self, to: Address, value: U256) -> Result<u64, ChainError> {
        let tx = RpcTransactionRequest::default()
            .with_to(to)
            .with_value(value);
        self.provider
            .estimate_gas(tx)
            .await
            .map_err(|e| ChainError::Provider(format!("failed to estimate gas: {e}")))
    }

    /// Resolve the ENS primary name registered for an address, if any.
    pub async fn ens_name(&self, address: Address) -> Result<Option<String>, ChainError> {
        ens::reverse_lookup(&self.provider, address).await
    }
}
