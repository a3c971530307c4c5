//! Custos gives an autonomous agent custody of an EVM account and a
//! constrained, auditable way to read chain state and submit signed
//! transactions on its own behalf.
//!
//! # Architecture
//!
//! ```text
//! planner ──▶ ToolRegistry::invoke(name, params)
//!               ├── read tools  ──▶ ChainClient ──▶ RPC endpoint
//!               └── send_eth    ──▶ AgentWallet ──▶ sign → submit → confirm
//!
//! KeyVault ──▶ decrypt key at startup ──▶ AgentWallet construction
//! ```
//!
//! - [`vault::KeyVault`] encrypts and decrypts private keys at rest
//!   (AES-256-CBC, `hex(iv):hex(ciphertext)` blobs).
//! - [`wallet::AgentWallet`] holds one signing identity and mediates all
//!   state-changing chain interaction for it, with writes serialized per
//!   wallet and receipt waits bounded by a configurable timeout.
//! - [`chain::ChainClient`] is the shared read-only RPC surface.
//! - [`tool::ToolRegistry`] exposes both as named, schema-validated tools
//!   and is the single boundary no error may cross: every failure is
//!   lowered to a descriptive string result the planner can read, and key
//!   material never appears in any message.
//!
//! # Example
//!
//! ```rust,ignore
//! use std::sync::Arc;
//! use custos::{AgentWallet, ChainClient, Config, ToolRegistry, chain_tools};
//!
//! let config = Config::from_env()?;
//! let client = Arc::new(ChainClient::new(&config.rpc_url)?);
//! let wallet = AgentWallet::from_config(&config)?.map(Arc::new);
//!
//! let mut registry = ToolRegistry::new();
//! registry.register_all(chain_tools(client, wallet));
//!
//! let invocation = registry.invoke("get_gas_price", serde_json::json!({})).await;
//! println!("{}", invocation.result);
//! ```

pub mod abi;
pub mod chain;
pub mod config;
pub mod error;
pub mod tool;
pub mod vault;
pub mod wallet;

pub use chain::{
    ChainClient, ChainError, TransactionOutcome, TransactionRequest, TxStatus, chain_tools,
};
pub use config::{Config, ConfigError};
pub use error::{Error, Result};
pub use tool::{BoxedTool, DynTool, ToolDefinition, ToolError, ToolInvocation, ToolRegistry};
pub use vault::{EncryptedSecret, KeyVault, VaultError};
pub use wallet::{AgentWallet, AgentWalletBuilder, GeneratedIdentity, WalletError};
