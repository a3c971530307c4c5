//! Tool abstractions consumed by an external planner.
//!
//! A tool is a named, schema-described operation. The [`DynTool`] trait is
//! object-safe so heterogeneous tools can live behind one registry;
//! implementations validate their own arguments and return structured
//! [`serde_json::Value`] results.

pub mod errors;
pub mod registry;

pub use errors::ToolError;
pub use registry::{ToolInvocation, ToolRegistry};

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use serde_json::Value;

/// A tool definition surfaced to the planner.
///
/// `parameters` is a JSON-schema-shaped object describing the expected
/// argument bag; the registry uses its `required` list for boundary
/// validation before dispatch.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ToolDefinition {
    /// Unique tool name.
    pub name: String,
    /// Human/planner-readable description.
    pub description: String,
    /// JSON schema for the argument object.
    pub parameters: Value,
}

impl ToolDefinition {
    /// Create a definition.
    pub fn new(
        name: impl Into<String>,
        description: impl Into<String>,
        parameters: Value,
    ) -> Self {
        Self {
            name: name.into(),
            description: description.into(),
            parameters,
        }
    }
}

/// Object-safe tool interface.
#[async_trait]
pub trait DynTool: Send + Sync {
    /// The tool's unique name.
    fn name(&self) -> &str;

    /// One-line description shown to the planner.
    fn description(&self) -> String;

    /// Full definition including the parameter schema.
    fn definition(&self) -> ToolDefinition;

    /// Execute with a raw JSON argument object.
    async fn call_json(&self, args: Value) -> Result<Value, ToolError>;
}

/// A boxed tool for dynamic dispatch.
pub type BoxedTool = Box<dyn DynTool>;
