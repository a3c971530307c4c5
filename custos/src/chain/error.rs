//! Error type for read-only chain access.

/// Errors raised by [`ChainClient`](crate::chain::ChainClient) operations.
///
/// The upstream failure text is always preserved in the message so it can
/// be surfaced verbatim at the tool boundary.
#[derive(Debug, Clone, thiserror::Error)]
#[non_exhaustive]
pub enum ChainError {
    /// The RPC endpoint returned an error or was unreachable.
    #[error("chain RPC error: {0}")]
    Provider(String),

    /// The requested entity does not exist on chain (yet).
    #[error("{0}")]
    NotFound(String),

    /// A locally rejected input, such as an unparseable endpoint URL.
    #[error("invalid input: {0}")]
    InvalidInput(String),
}
