//! Error types for the tool module.

use crate::chain::ChainError;
use crate::wallet::WalletError;

/// Errors that can occur during tool execution.
///
/// These never reach the planner as errors: [`ToolRegistry`] lowers them
/// into descriptive string results at the boundary.
///
/// [`ToolRegistry`]: crate::tool::ToolRegistry
#[derive(Debug, Clone, thiserror::Error)]
#[non_exhaustive]
pub enum ToolError {
    /// Invalid arguments provided to the tool.
    #[error("Invalid arguments: {0}")]
    InvalidArguments(String),

    /// Error during tool execution.
    #[error("Execution error: {0}")]
    Execution(String),

    /// Tool not found.
    #[error("Tool not found: {0}")]
    NotFound(String),
}

impl ToolError {
    /// Create an invalid arguments error.
    #[must_use]
    pub fn invalid_args(msg: impl Into<String>) -> Self {
        Self::InvalidArguments(msg.into())
    }

    /// Create an execution error.
    #[must_use]
    pub fn execution(msg: impl Into<String>) -> Self {
        Self::Execution(msg.into())
    }

    /// Create a not found error.
    #[must_use]
    pub fn not_found(name: impl Into<String>) -> Self {
        Self::NotFound(name.into())
    }
}

impl From<ChainError> for ToolError {
    fn from(err: ChainError) -> Self {
        Self::Execution(err.to_string())
    }
}

impl From<WalletError> for ToolError {
    fn from(err: WalletError) -> Self {
        Self::Execution(err.to_string())
    }
}
