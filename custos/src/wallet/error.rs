//! Error type for wallet operations.

use std::time::Duration;

use alloy::primitives::B256;

/// Errors raised by [`AgentWallet`](crate::wallet::AgentWallet) operations.
#[derive(Debug, Clone, thiserror::Error)]
#[non_exhaustive]
pub enum WalletError {
    /// Wallet construction failed (bad key, endpoint or chain id).
    #[error("wallet configuration error: {0}")]
    Config(String),

    /// A write operation was attempted with no signing key available.
    #[error("Wallet not configured. Please set PRIVATE_KEY in environment variables.")]
    NotConfigured,

    /// The RPC endpoint returned an error for a read.
    #[error("provider error: {0}")]
    Provider(String),

    /// Message or transaction signing failed.
    #[error("signing error: {0}")]
    Signing(String),

    /// Submission or confirmation of a transaction failed.
    #[error("transaction error: {0}")]
    Transaction(String),

    /// The transaction was mined but execution failed.
    #[error("transaction {hash} reverted")]
    Reverted {
        /// Hash of the reverted transaction.
        hash: B256,
    },

    /// No receipt was observed within the configured bound.
    ///
    /// The transaction may still confirm later; only the wait is abandoned,
    /// the submission cannot be cancelled.
    #[error("transaction {hash} unconfirmed after {timeout:?}")]
    ConfirmationTimeout {
        /// Hash of the submitted transaction.
        hash: B256,
        /// The bound that was exceeded.
        timeout: Duration,
    },
}
