//! Planner-facing chain tools.
//!
//! Each tool wraps an `Arc<ChainClient>` (and, for the one write tool, an
//! optional `Arc<AgentWallet>`) and exposes a single chain capability via
//! the [`DynTool`] interface. Tools validate their declared parameters
//! before any network use and report results as human/planner-readable
//! strings; failures are surfaced as [`ToolError`]s and lowered to string
//! results by the registry.

use std::sync::Arc;

use alloy::consensus::{BlockHeader, Transaction as _};
use alloy::primitives::utils::{format_ether, parse_ether};
use alloy::primitives::{Address, B256, U256};
use async_trait::async_trait;
use serde_json::{Value, json};

use super::ChainClient;
use crate::tool::{BoxedTool, DynTool, ToolDefinition, ToolError};
use crate::wallet::{AgentWallet, WalletError};

/// All ten chain tools, wired to one client and an optional signing wallet.
///
/// Without a wallet the set is read-only and `send_eth` reports itself
/// unconfigured instead of touching the network.
#[must_use]
pub fn chain_tools(client: Arc<ChainClient>, wallet: Option<Arc<AgentWallet>>) -> Vec<BoxedTool> {
    vec![
        Box::new(GetEthBalanceTool::new(Arc::clone(&client))),
        Box::new(GetBlockNumberTool::new(Arc::clone(&client))),
        Box::new(GetTransactionTool::new(Arc::clone(&client))),
        Box::new(GetGasPriceTool::new(Arc::clone(&client))),
        Box::new(SendEthTool::new(wallet)),
        Box::new(ReadErc20BalanceTool::new(Arc::clone(&client))),
        Box::new(GetEnsNameTool::new(Arc::clone(&client))),
        Box::new(EstimateGasTool::new(Arc::clone(&client))),
        Box::new(GetBlockDetailsTool::new(Arc::clone(&client))),
        Box::new(GetTransactionReceiptTool::new(client)),
    ]
}

/// Render a wei amount as a decimal ETH string, trailing zeros trimmed.
pub(crate) fn format_eth(wei: U256) -> String {
    let formatted = format_ether(wei);
    formatted
        .trim_end_matches('0')
        .trim_end_matches('.')
        .to_string()
}

/// Render a wei-per-gas price in gwei with two decimal places.
pub(crate) fn format_gwei(wei_per_gas: u128) -> String {
    format!("{:.2}", wei_per_gas as f64 / 1e9)
}

/// The `get_eth_balance` result line.
fn balance_message(wei: U256) -> String {
    format!("Balance: {} ETH", format_eth(wei))
}

/// The `get_gas_price` result line.
fn gas_price_message(wei_per_gas: u128) -> String {
    format!("Current gas price: {} Gwei", format_gwei(wei_per_gas))
}

/// Render a unix timestamp as ISO-8601.
fn iso_timestamp(secs: u64) -> String {
    chrono::DateTime::from_timestamp(i64::try_from(secs).unwrap_or(i64::MAX), 0)
        .map_or_else(|| secs.to_string(), |dt| dt.to_rfc3339())
}

fn require_str<'a>(args: &'a Value, field: &str) -> Result<&'a str, ToolError> {
    args.get(field)
        .and_then(Value::as_str)
        .ok_or_else(|| ToolError::invalid_args(format!("'{field}' must be a string")))
}

fn address_arg(args: &Value, field: &str) -> Result<Address, ToolError> {
    let raw = require_str(args, field)?;
    raw.parse::<Address>()
        .map_err(|e| ToolError::invalid_args(format!("invalid address '{raw}': {e}")))
}

fn hash_arg(args: &Value, field: &str) -> Result<B256, ToolError> {
    let raw = require_str(args, field)?;
    raw.parse::<B256>()
        .map_err(|e| ToolError::invalid_args(format!("invalid transaction hash '{raw}': {e}")))
}

fn eth_amount_arg(args: &Value, field: &str) -> Result<U256, ToolError> {
    let raw = require_str(args, field)?;
    parse_ether(raw)
        .map_err(|e| ToolError::invalid_args(format!("invalid ETH amount '{raw}': {e}")))
}

fn block_number_arg(args: &Value, field: &str) -> Result<u64, ToolError> {
    match args.get(field) {
        Some(Value::Number(n)) => n
            .as_u64()
            .ok_or_else(|| ToolError::invalid_args(format!("'{field}' must be a block height"))),
        Some(Value::String(s)) => s
            .parse::<u64>()
            .map_err(|e| ToolError::invalid_args(format!("invalid block number '{s}': {e}"))),
        _ => Err(ToolError::invalid_args(format!(
            "'{field}' must be a number or numeric string"
        ))),
    }
}

/// Query the native-currency balance of an address.
#[derive(Debug)]
pub struct GetEthBalanceTool {
    client: Arc<ChainClient>,
}

impl GetEthBalanceTool {
    /// Wire the tool to a chain client.
    #[must_use]
    pub const fn new(client: Arc<ChainClient>) -> Self {
        Self { client }
    }
}

#[async_trait]
impl DynTool for GetEthBalanceTool {
    fn name(&self) -> &str {
        "get_eth_balance"
    }

    fn description(&self) -> String {
        "Get the ETH (native currency) balance of an address".into()
    }

    fn definition(&self) -> ToolDefinition {
        let params = json!({
            "type": "object",
            "properties": {
                "address": {
                    "type": "string",
                    "description": "The Ethereum address to check (hex, 0x-prefixed)"
                }
            },
            "required": ["address"]
        });
        ToolDefinition::new(self.name(), self.description(), params)
    }

    async fn call_json(&self, args: Value) -> Result<Value, ToolError> {
        let address = address_arg(&args, "address")?;
        let balance = self.client.balance(address).await?;
        Ok(Value::String(balance_message(balance)))
    }
}

/// Report the current chain height.
#[derive(Debug)]
pub struct GetBlockNumberTool {
    client: Arc<ChainClient>,
}

impl GetBlockNumberTool {
    /// Wire the tool to a chain client.
    #[must_use]
    pub const fn new(client: Arc<ChainClient>) -> Self {
        Self { client }
    }
}

#[async_trait]
impl DynTool for GetBlockNumberTool {
    fn name(&self) -> &str {
        "get_block_number"
    }

    fn description(&self) -> String {
        "Get the current block number of the chain".into()
    }

    fn definition(&self) -> ToolDefinition {
        let params = json!({
            "type": "object",
            "properties": {},
            "required": []
        });
        ToolDefinition::new(self.name(), self.description(), params)
    }

    async fn call_json(&self, _args: Value) -> Result<Value, ToolError> {
        let number = self.client.block_number().await?;
        Ok(Value::String(number.to_string()))
    }
}

/// Look up a transaction by hash.
#[derive(Debug)]
pub struct GetTransactionTool {
    client: Arc<ChainClient>,
}

impl GetTransactionTool {
    /// Wire the tool to a chain client.
    #[must_use]
    pub const fn new(client: Arc<ChainClient>) -> Self {
        Self { client }
    }
}

#[async_trait]
impl DynTool for GetTransactionTool {
    fn name(&self) -> &str {
        "get_transaction"
    }

    fn description(&self) -> String {
        "Get the details of a transaction by its hash".into()
    }

    fn definition(&self) -> ToolDefinition {
        let params = json!({
            "type": "object",
            "properties": {
                "hash": {
                    "type": "string",
                    "description": "The transaction hash (hex, 0x-prefixed)"
                }
            },
            "required": ["hash"]
        });
        ToolDefinition::new(self.name(), self.description(), params)
    }

    async fn call_json(&self, args: Value) -> Result<Value, ToolError> {
        let hash = hash_arg(&args, "hash")?;
        let tx = self.client.transaction(hash).await?;
        let to = tx
            .to()
            .map_or_else(|| "contract creation".to_string(), |a| a.to_string());
        let block = tx
            .block_number
            .map_or_else(|| "pending".to_string(), |n| n.to_string());
        Ok(Value::String(format!(
            "From: {}, To: {}, Value: {} ETH, Block: {}, Gas limit: {}",
            tx.inner.signer(),
            to,
            format_eth(tx.value()),
            block,
            tx.gas_limit()
        )))
    }
}

/// Report the current gas price in gwei.
#[derive(Debug)]
pub struct GetGasPriceTool {
    client: Arc<ChainClient>,
}

impl GetGasPriceTool {
    /// Wire the tool to a chain client.
    #[must_use]
    pub const fn new(client: Arc<ChainClient>) -> Self {
        Self { client }
    }
}

#[async_trait]
impl DynTool for GetGasPriceTool {
    fn name(&self) -> &str {
        "get_gas_price"
    }

    fn description(&self) -> String {
        "Get the current gas price in Gwei".into()
    }

    fn definition(&self) -> ToolDefinition {
        let params = json!({
            "type": "object",
            "properties": {},
            "required": []
        });
        ToolDefinition::new(self.name(), self.description(), params)
    }

    async fn call_json(&self, _args: Value) -> Result<Value, ToolError> {
        let price = self.client.gas_price().await?;
        Ok(Value::String(gas_price_message(price)))
    }
}

/// Send native currency from the agent's wallet.
///
/// The only state-changing tool in the set. Without a configured wallet it
/// reports itself unconfigured and performs no network call.
#[derive(Debug)]
pub struct SendEthTool {
    wallet: Option<Arc<AgentWallet>>,
}

impl SendEthTool {
    /// Wire the tool to an optional signing wallet.
    #[must_use]
    pub const fn new(wallet: Option<Arc<AgentWallet>>) -> Self {
        Self { wallet }
    }
}

#[async_trait]
impl DynTool for SendEthTool {
    fn name(&self) -> &str {
        "send_eth"
    }

    fn description(&self) -> String {
        "Send ETH from the agent's wallet to an address. \
         Amount is a decimal ETH string (e.g. \"0.1\"). Returns the transaction hash."
            .into()
    }

    fn definition(&self) -> ToolDefinition {
        let params = json!({
            "type": "object",
            "properties": {
                "to": {
                    "type": "string",
                    "description": "The recipient Ethereum address (hex, 0x-prefixed)"
                },
                "amount": {
                    "type": "string",
                    "description": "The amount to send in ETH (e.g. \"0.1\")"
                }
            },
            "required": ["to", "amount"]
        });
        ToolDefinition::new(self.name(), self.description(), params)
    }

    async fn call_json(&self, args: Value) -> Result<Value, ToolError> {
        let Some(wallet) = &self.wallet else {
            return Ok(Value::String(WalletError::NotConfigured.to_string()));
        };

        let to = address_arg(&args, "to")?;
        let amount = eth_amount_arg(&args, "amount")?;

        let hash = wallet.send_eth(to, amount).await?;
        Ok(Value::String(hash.to_string()))
    }
}

/// Read a fungible-token balance via the standard `balanceOf` interface.
#[derive(Debug)]
pub struct ReadErc20BalanceTool {
    client: Arc<ChainClient>,
}

impl ReadErc20BalanceTool {
    /// Wire the tool to a chain client.
    #[must_use]
    pub const fn new(client: Arc<ChainClient>) -> Self {
        Self { client }
    }
}

#[async_trait]
impl DynTool for ReadErc20BalanceTool {
    fn name(&self) -> &str {
        "read_erc20_balance"
    }

    fn description(&self) -> String {
        "Read the raw ERC-20 token balance of a wallet address. \
         Returns the balance in the token's smallest unit."
            .into()
    }

    fn definition(&self) -> ToolDefinition {
        let params = json!({
            "type": "object",
            "properties": {
                "contract_address": {
                    "type": "string",
                    "description": "The ERC-20 token contract address"
                },
                "wallet_address": {
                    "type": "string",
                    "description": "The wallet address to query"
                }
            },
            "required": ["contract_address", "wallet_address"]
        });
        ToolDefinition::new(self.name(), self.description(), params)
    }

    async fn call_json(&self, args: Value) -> Result<Value, ToolError> {
        let token = address_arg(&args, "contract_address")?;
        let owner = address_arg(&args, "wallet_address")?;
        let balance = self.client.erc20_balance(token, owner).await?;
        Ok(Value::String(balance.to_string()))
    }
}

/// Reverse-resolve the ENS name registered for an address.
#[derive(Debug)]
pub struct GetEnsNameTool {
    client: Arc<ChainClient>,
}

impl GetEnsNameTool {
    /// Wire the tool to a chain client.
    #[must_use]
    pub const fn new(client: Arc<ChainClient>) -> Self {
        Self { client }
    }
}

#[async_trait]
impl DynTool for GetEnsNameTool {
    fn name(&self) -> &str {
        "get_ens_name"
    }

    fn description(&self) -> String {
        "Look up the ENS name registered for an address, if any".into()
    }

    fn definition(&self) -> ToolDefinition {
        let params = json!({
            "type": "object",
            "properties": {
                "address": {
                    "type": "string",
                    "description": "The Ethereum address to reverse-resolve"
                }
            },
            "required": ["address"]
        });
        ToolDefinition::new(self.name(), self.description(), params)
    }

    async fn call_json(&self, args: Value) -> Result<Value, ToolError> {
        let address = address_arg(&args, "address")?;
        let result = match self.client.ens_name(address).await? {
            Some(name) => name,
            None => format!("No ENS name found for {address}"),
        };
        Ok(Value::String(result))
    }
}

/// Estimate gas for a value transfer.
#[derive(Debug)]
pub struct EstimateGasTool {
    client: Arc<ChainClient>,
}

impl EstimateGasTool {
    /// Wire the tool to a chain client.
    #[must_use]
    pub const fn new(client: Arc<ChainClient>) -> Self {
        Self { client }
    }
}

#[async_trait]
impl DynTool for EstimateGasTool {
    fn name(&self) -> &str {
        "estimate_gas"
    }

    fn description(&self) -> String {
        "Estimate the gas units needed to send ETH to an address. \
         Read-only; signs and submits nothing."
            .into()
    }

    fn definition(&self) -> ToolDefinition {
        let params = json!({
            "type": "object",
            "properties": {
                "to": {
                    "type": "string",
                    "description": "The recipient Ethereum address"
                },
                "value": {
                    "type": "string",
                    "description": "The amount in ETH (e.g. \"0.1\")"
                }
            },
            "required": ["to", "value"]
        });
        ToolDefinition::new(self.name(), self.description(), params)
    }

    async fn call_json(&self, args: Value) -> Result<Value, ToolError> {
        let to = address_arg(&args, "to")?;
        let value = eth_amount_arg(&args, "value")?;
        let gas = self.client.estimate_gas(to, value).await?;
        Ok(Value::String(gas.to_string()))
    }
}

/// Fetch a block's headline details by height.
#[derive(Debug)]
pub struct GetBlockDetailsTool {
    client: Arc<ChainClient>,
}

impl GetBlockDetailsTool {
    /// Wire the tool to a chain client.
    #[must_use]
    pub const fn new(client: Arc<ChainClient>) -> Self {
        Self { client }
    }
}

#[async_trait]
impl DynTool for GetBlockDetailsTool {
    fn name(&self) -> &str {
        "get_block_details"
    }

    fn description(&self) -> String {
        "Get details of a block by number: hash, timestamp, transaction count and gas figures"
            .into()
    }

    fn definition(&self) -> ToolDefinition {
        let params = json!({
            "type": "object",
            "properties": {
                "block_number": {
                    "type": "number",
                    "description": "The block height to fetch"
                }
            },
            "required": ["block_number"]
        });
        ToolDefinition::new(self.name(), self.description(), params)
    }

    async fn call_json(&self, args: Value) -> Result<Value, ToolError> {
        let number = block_number_arg(&args, "block_number")?;
        let block = self.client.block(number).await?;
        Ok(Value::String(format!(
            "Block {}: hash {}, timestamp {}, {} transactions, gas used {}, gas limit {}",
            block.header.number(),
            block.header.hash,
            iso_timestamp(block.header.timestamp()),
            block.transactions.len(),
            block.header.gas_used(),
            block.header.gas_limit()
        )))
    }
}

/// Look up a transaction receipt and normalize its status.
#[derive(Debug)]
pub struct GetTransactionReceiptTool {
    client: Arc<ChainClient>,
}

impl GetTransactionReceiptTool {
    /// Wire the tool to a chain client.
    #[must_use]
    pub const fn new(client: Arc<ChainClient>) -> Self {
        Self { client }
    }
}

#[async_trait]
impl DynTool for GetTransactionReceiptTool {
    fn name(&self) -> &str {
        "get_transaction_receipt"
    }

    fn description(&self) -> String {
        "Get the receipt of a mined transaction: success/failure, block, gas used".into()
    }

    fn definition(&self) -> ToolDefinition {
        let params = json!({
            "type": "object",
            "properties": {
                "hash": {
                    "type": "string",
                    "description": "The transaction hash (hex, 0x-prefixed)"
                }
            },
            "required": ["hash"]
        });
        ToolDefinition::new(self.name(), self.description(), params)
    }

    async fn call_json(&self, args: Value) -> Result<Value, ToolError> {
        let hash = hash_arg(&args, "hash")?;
        let receipt = self.client.receipt(hash).await?;
        let status = if receipt.status() { "Success" } else { "Failed" };
        let block = receipt
            .block_number
            .map_or_else(|| "pending".to_string(), |n| n.to_string());
        let to = receipt
            .to
            .map_or_else(|| "contract creation".to_string(), |a| a.to_string());
        Ok(Value::String(format!(
            "Status: {}, Block: {}, Gas used: {}, From: {}, To: {}",
            status, block, receipt.gas_used, receipt.from, to
        )))
    }
}
