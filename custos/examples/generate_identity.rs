//! Identity provisioning example.
//!
//! Generates a fresh signing identity and encrypts its private key the way
//! it would be stored in an agent record.
//!
//! Run with: `cargo run --example generate_identity`
//!
//! Note: Requires the WALLET_ENCRYPTION_KEY environment variable (64 hex
//! chars or a 32-byte string).

use custos::{AgentWallet, KeyVault};

fn main() -> anyhow::Result<()> {
    let passphrase = std::env::var("WALLET_ENCRYPTION_KEY")?;
    let vault = KeyVault::from_passphrase(&passphrase)?;

    let identity = AgentWallet::generate();
    let blob = vault.encrypt_key(&identity.private_key)?;

    println!("=== new agent identity ===");
    println!("address:       {}", identity.address);
    println!("encrypted key: {blob}");

    // Round-trip through the vault to prove the blob is usable.
    let recovered = vault.decrypt(&blob)?;
    assert_eq!(format!("0x{}", hex::encode(recovered)), identity.private_key);
    println!("vault round-trip: ok");

    Ok(())
}
