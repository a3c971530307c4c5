//! Chain tools example.
//!
//! Builds the full tool set from environment configuration and invokes a
//! few read tools the way a planner would.
//!
//! Run with: `cargo run --example agent_tools`
//!
//! Note: Requires RPC_URL and WALLET_ENCRYPTION_KEY environment variables;
//! set PRIVATE_KEY and CHAIN_ID as well to enable the send_eth tool.

use std::sync::Arc;

use custos::{AgentWallet, ChainClient, Config, ToolRegistry, chain_tools};
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .init();

    let config = Config::from_env()?;
    let client = Arc::new(ChainClient::new(&config.rpc_url)?);
    let wallet = AgentWallet::from_config(&config)?.map(Arc::new);

    let mut registry = ToolRegistry::new();
    registry.register_all(chain_tools(client, wallet));

    println!("=== custos chain tools ===\n");
    for definition in registry.definitions() {
        println!("  {:<24} {}", definition.name, definition.description);
    }
    println!();

    for (name, params) in [
        ("get_block_number", serde_json::json!({})),
        ("get_gas_price", serde_json::json!({})),
        (
            "get_eth_balance",
            serde_json::json!({"address": "0x7E5F4552091A69125d5DfCb7b8C2659029395Bdf"}),
        ),
    ] {
        let invocation = registry.invoke(name, params).await;
        println!(
            "{} (succeeded: {})\n  {}\n",
            invocation.name, invocation.succeeded, invocation.result
        );
    }

    Ok(())
}
