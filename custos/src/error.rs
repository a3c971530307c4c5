//! Unified error types for the custos crate.
//!
//! Each module raises its own structured error; this module aggregates them
//! for callers composing the whole stack. Propagation policy: configuration
//! errors are fatal at startup by caller convention, everything else is
//! recoverable, and nothing crosses the [`ToolRegistry`] boundary as an
//! error at all: the registry lowers failures into string results.
//!
//! [`ToolRegistry`]: crate::tool::ToolRegistry

use crate::chain::ChainError;
use crate::config::ConfigError;
use crate::tool::ToolError;
use crate::vault::VaultError;
use crate::wallet::WalletError;

/// Result type alias for custos operations.
pub type Result<T> = std::result::Result<T, Error>;

/// The main error type for the custos crate.
#[derive(Debug, thiserror::Error)]
#[non_exhaustive]
pub enum Error {
    /// Fatal startup configuration error.
    #[error("configuration error: {0}")]
    Config(#[from] ConfigError),

    /// Key vault error.
    #[error("vault error: {0}")]
    Vault(#[from] VaultError),

    /// Chain read error.
    #[error("chain error: {0}")]
    Chain(#[from] ChainError),

    /// Wallet error.
    #[error("wallet error: {0}")]
    Wallet(#[from] WalletError),

    /// Tool execution error.
    #[error("tool error: {0}")]
    Tool(#[from] ToolError),

    /// JSON serialization/deserialization error.
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn errors_carry_their_source_text() {
        let err: Error = VaultError::Format("missing delimiter".into()).into();
        assert_eq!(
            err.to_string(),
            "vault error: malformed encrypted blob: missing delimiter"
        );

        let err: Error = WalletError::NotConfigured.into();
        assert!(err.to_string().contains("Wallet not configured"));
    }
}
