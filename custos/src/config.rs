//! Process configuration, read once at startup.
//!
//! All inputs are environment-style variables. Construction is fail-fast:
//! a missing RPC endpoint or an encryption passphrase that does not decode
//! to exactly 32 bytes is a [`ConfigError`], and callers are expected to
//! treat that as fatal. The private key is the one optional input; its
//! absence simply disables every write tool.

use std::env;
use std::time::Duration;

use crate::vault::KeyVault;

/// RPC endpoint URL. Required.
const ENV_RPC_URL: &str = "RPC_URL";
/// Chain id the wallet is bound to. Required for write operations.
const ENV_CHAIN_ID: &str = "CHAIN_ID";
/// Raw private key hex. Optional; absence disables write tools.
const ENV_PRIVATE_KEY: &str = "PRIVATE_KEY";
/// Vault passphrase; must decode to exactly 32 bytes.
const ENV_ENCRYPTION_KEY: &str = "WALLET_ENCRYPTION_KEY";
/// Bound on the receipt wait for write operations, in seconds.
const ENV_CONFIRMATION_TIMEOUT: &str = "CONFIRMATION_TIMEOUT_SECS";

/// Default bound on the receipt wait.
pub const DEFAULT_CONFIRMATION_TIMEOUT: Duration = Duration::from_secs(60);

/// Fatal startup configuration error.
#[derive(Debug, Clone, thiserror::Error)]
#[non_exhaustive]
pub enum ConfigError {
    /// A required variable is absent or empty.
    #[error("{name} environment variable not set")]
    Missing {
        /// Variable name.
        name: &'static str,
    },

    /// A variable is present but unusable.
    #[error("invalid {name}: {reason}")]
    Invalid {
        /// Variable name.
        name: &'static str,
        /// Why the value was rejected.
        reason: String,
    },
}

/// Startup configuration for one agent process.
#[derive(Debug, Clone)]
pub struct Config {
    /// JSON-RPC endpoint URL.
    pub rpc_url: String,
    /// Chain id the signing wallet is bound to, when configured.
    pub chain_id: Option<u64>,
    /// Raw private key hex; `None` disables write operations.
    pub private_key: Option<String>,
    /// The 32-byte vault encryption key decoded from the passphrase.
    pub encryption_key: [u8; 32],
    /// Bound on the receipt wait for write operations.
    pub confirmation_timeout: Duration,
}

impl Config {
    /// Load configuration from the process environment.
    pub fn from_env() -> Result<Self, ConfigError> {
        let rpc_url = env::var(ENV_RPC_URL)
            .ok()
            .filter(|v| !v.is_empty())
            .ok_or(ConfigError::Missing { name: ENV_RPC_URL })?;

        let chain_id = match env::var(ENV_CHAIN_ID).ok().filter(|v| !v.is_empty()) {
            Some(raw) => Some(raw.parse::<u64>().map_err(|e| ConfigError::Invalid {
                name: ENV_CHAIN_ID,
                reason: format!("'{raw}' is not a chain id: {e}"),
            })?),
            None => None,
        };

        let private_key = env::var(ENV_PRIVATE_KEY).ok().filter(|v| !v.is_empty());

        let passphrase = env::var(ENV_ENCRYPTION_KEY)
            .ok()
            .filter(|v| !v.is_empty())
            .ok_or(ConfigError::Missing {
                name: ENV_ENCRYPTION_KEY,
            })?;
        let encryption_key = decode_passphrase(&passphrase)?;

        let confirmation_timeout = match env::var(ENV_CONFIRMATION_TIMEOUT)
            .ok()
            .filter(|v| !v.is_empty())
        {
            Some(raw) => {
                let secs = raw.parse::<u64>().map_err(|e| ConfigError::Invalid {
                    name: ENV_CONFIRMATION_TIMEOUT,
                    reason: format!("'{raw}' is not a number of seconds: {e}"),
                })?;
                Duration::from_secs(secs)
            }
            None => DEFAULT_CONFIRMATION_TIMEOUT,
        };

        Ok(Self {
            rpc_url,
            chain_id,
            private_key,
            encryption_key,
            confirmation_timeout,
        })
    }

    /// Build the key vault for this process.
    #[must_use]
    pub const fn vault(&self) -> KeyVault {
        KeyVault::new(self.encryption_key)
    }

    /// Whether a signing key is configured (write tools enabled).
    #[must_use]
    pub const fn has_signer(&self) -> bool {
        self.private_key.is_some()
    }
}

/// Decode the vault passphrase into the 32-byte encryption key.
fn decode_passphrase(raw: &str) -> Result<[u8; 32], ConfigError> {
    KeyVault::from_passphrase(raw)
        .map(|vault| vault.into_key())
        .map_err(|e| ConfigError::Invalid {
            name: ENV_ENCRYPTION_KEY,
            reason: e.to_string(),
        })
}

#[cfg(test)]
mod tests {
    use super::*;
    use serial_test::serial;

    fn set(name: &str, value: &str) {
        #[allow(unsafe_code)]
        unsafe {
            env::set_var(name, value);
        }
    }

    fn unset(name: &str) {
        #[allow(unsafe_code)]
        unsafe {
            env::remove_var(name);
        }
    }

    fn clear_all() {
        for name in [
            ENV_RPC_URL,
            ENV_CHAIN_ID,
            ENV_PRIVATE_KEY,
            ENV_ENCRYPTION_KEY,
            ENV_CONFIRMATION_TIMEOUT,
        ] {
            unset(name);
        }
    }

    #[test]
    #[serial]
    fn minimal_configuration() {
        clear_all();
        set(ENV_RPC_URL, "http://127.0.0.1:8545");
        set(ENV_ENCRYPTION_KEY, "this-passphrase-is-32-bytes-long");

        let config = Config::from_env().unwrap();
        assert_eq!(config.rpc_url, "http://127.0.0.1:8545");
        assert_eq!(config.chain_id, None);
        assert!(!config.has_signer());
        assert_eq!(config.confirmation_timeout, DEFAULT_CONFIRMATION_TIMEOUT);
        assert_eq!(&config.encryption_key, b"this-passphrase-is-32-bytes-long");
        clear_all();
    }

    #[test]
    #[serial]
    fn missing_rpc_url_is_fatal() {
        clear_all();
        set(ENV_ENCRYPTION_KEY, "this-passphrase-is-32-bytes-long");
        assert!(matches!(
            Config::from_env().unwrap_err(),
            ConfigError::Missing { name: "RPC_URL" }
        ));
        clear_all();
    }

    #[test]
    #[serial]
    fn passphrase_must_decode_to_32_bytes() {
        clear_all();
        set(ENV_RPC_URL, "http://127.0.0.1:8545");
        set(ENV_ENCRYPTION_KEY, "too-short");
        assert!(matches!(
            Config::from_env().unwrap_err(),
            ConfigError::Invalid {
                name: "WALLET_ENCRYPTION_KEY",
                ..
            }
        ));
        clear_all();
    }

    #[test]
    #[serial]
    fn hex_passphrase_is_decoded() {
        clear_all();
        set(ENV_RPC_URL, "http://127.0.0.1:8545");
        set(ENV_ENCRYPTION_KEY, &"0f".repeat(32));

        let config = Config::from_env().unwrap();
        assert_eq!(config.encryption_key, [0x0f; 32]);
        clear_all();
    }

    #[test]
    #[serial]
    fn full_configuration() {
        clear_all();
        set(ENV_RPC_URL, "https://sepolia.base.org");
        set(ENV_CHAIN_ID, "84532");
        set(ENV_PRIVATE_KEY, &format!("0x{}", "11".repeat(32)));
        set(ENV_ENCRYPTION_KEY, "this-passphrase-is-32-bytes-long");
        set(ENV_CONFIRMATION_TIMEOUT, "120");

        let config = Config::from_env().unwrap();
        assert_eq!(config.chain_id, Some(84532));
        assert!(config.has_signer());
        assert_eq!(config.confirmation_timeout, Duration::from_secs(120));
        clear_all();
    }

    #[test]
    #[serial]
    fn empty_private_key_is_treated_as_absent() {
        clear_all();
        set(ENV_RPC_URL, "http://127.0.0.1:8545");
        set(ENV_ENCRYPTION_KEY, "this-passphrase-is-32-bytes-long");
        set(ENV_PRIVATE_KEY, "");

        assert!(!Config::from_env().unwrap().has_signer());
        clear_all();
    }

    #[test]
    #[serial]
    fn invalid_chain_id_is_fatal() {
        clear_all();
        set(ENV_RPC_URL, "http://127.0.0.1:8545");
        set(ENV_ENCRYPTION_KEY, "this-passphrase-is-32-bytes-long");
        set(ENV_CHAIN_ID, "not-a-number");
        assert!(matches!(
            Config::from_env().unwrap_err(),
            ConfigError::Invalid { name: "CHAIN_ID", .. }
        ));
        clear_all();
    }
}
