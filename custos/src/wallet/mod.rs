//! Signing identity and transaction execution for one agent.
//!
//! An [`AgentWallet`] binds one decrypted signing key to one RPC endpoint
//! and chain id, and mediates all state-changing chain interaction for that
//! identity.
//!
//! # Architecture
//!
//! ```text
//! AgentWallet (alloy signer + wallet-filled provider)
//!   ├── builder()            → AgentWalletBuilder → build()
//!   ├── balance()            → native balance reads
//!   ├── token_balance()      → ERC-20 balanceOf reads
//!   ├── send_eth() …         → sign, submit, block on bounded receipt wait
//!   ├── estimate_gas()       → read-only, signs nothing
//!   └── generate()           → provision a fresh random identity
//! ```
//!
//! # Custody
//!
//! The key material lives only in process memory for the wallet's lifetime.
//! It is decrypted by the caller (via [`KeyVault`](crate::vault::KeyVault))
//! before construction, is never logged, and is never returned from any
//! operation. Each wallet owns its identity exclusively; agents do not share
//! wallets.
//!
//! # Ordering
//!
//! Write operations on one wallet are serialized through an internal lock
//! held across submit and confirm, because transaction ordering depends on
//! the account nonce. Different wallets are fully independent.

mod error;
mod evm;

pub use error::WalletError;
pub use evm::{AgentWallet, AgentWalletBuilder, GeneratedIdentity};
