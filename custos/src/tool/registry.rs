//! The planner-facing tool registry.
//!
//! [`ToolRegistry`] is the sole interface an external decision-maker
//! consumes, and the single boundary where no error may cross: unknown
//! tools, schema violations and handler failures are all lowered into
//! descriptive string results. The planner always receives a usable
//! [`ToolInvocation`], never an error type.

use std::collections::HashMap;

use serde::Serialize;
use serde_json::Value;
use tracing::debug;

use super::{BoxedTool, ToolDefinition, ToolError};

/// The record of one tool call.
///
/// Ephemeral: produced per [`ToolRegistry::invoke`] call and handed to the
/// planner; never persisted by this crate.
#[derive(Debug, Clone, Serialize)]
pub struct ToolInvocation {
    /// Tool name as requested by the planner.
    pub name: String,
    /// The raw parameter bag the planner supplied.
    pub params: Value,
    /// String or structured result; on failure, a descriptive message.
    pub result: Value,
    /// Whether the handler completed without error.
    pub succeeded: bool,
}

impl ToolInvocation {
    fn failure(name: &str, params: Value, message: String) -> Self {
        Self {
            name: name.to_string(),
            params,
            result: Value::String(message),
            succeeded: false,
        }
    }
}

/// A name-keyed collection of tools.
#[derive(Default)]
pub struct ToolRegistry {
    tools: HashMap<String, BoxedTool>,
}

impl std::fmt::Debug for ToolRegistry {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ToolRegistry")
            .field("tools", &self.names())
            .finish()
    }
}

impl ToolRegistry {
    /// Create an empty registry.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a tool, replacing any previous tool with the same name.
    pub fn register(&mut self, tool: BoxedTool) {
        self.tools.insert(tool.name().to_string(), tool);
    }

    /// Register a batch of tools.
    pub fn register_all(&mut self, tools: Vec<BoxedTool>) {
        for tool in tools {
            self.register(tool);
        }
    }

    /// Whether a tool with this name is registered.
    #[must_use]
    pub fn contains(&self, name: &str) -> bool {
        self.tools.contains_key(name)
    }

    /// Registered tool names, sorted for stable output.
    #[must_use]
    pub fn names(&self) -> Vec<&str> {
        let mut names: Vec<&str> = self.tools.keys().map(String::as_str).collect();
        names.sort_unstable();
        names
    }

    /// Definitions of all registered tools, sorted by name.
    #[must_use]
    pub fn definitions(&self) -> Vec<ToolDefinition> {
        let mut defs: Vec<ToolDefinition> =
            self.tools.values().map(|t| t.definition()).collect();
        defs.sort_by(|a, b| a.name.cmp(&b.name));
        defs
    }

    /// Number of registered tools.
    #[must_use]
    pub fn len(&self) -> usize {
        self.tools.len()
    }

    /// Whether the registry is empty.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.tools.is_empty()
    }

    /// Invoke a tool by name with a raw parameter bag.
    ///
    /// Absent parameters are treated as an empty object. The failure text
    /// of the underlying operation is preserved verbatim in `result` so a
    /// human or planner can diagnose it; key material never appears in any
    /// message.
    pub async fn invoke(&self, name: &str, params: Value) -> ToolInvocation {
        let params = match params {
            Value::Null => Value::Object(serde_json::Map::new()),
            other => other,
        };

        let Some(tool) = self.tools.get(name) else {
            return ToolInvocation::failure(
                name,
                params,
                ToolError::not_found(name).to_string(),
            );
        };

        if let Err(err) = validate(&tool.definition(), &params) {
            debug!(tool = name, error = %err, "tool arguments rejected");
            return ToolInvocation::failure(name, params, err.to_string());
        }

        debug!(tool = name, "invoking tool");
        match tool.call_json(params.clone()).await {
            Ok(result) => ToolInvocation {
                name: name.to_string(),
                params,
                result,
                succeeded: true,
            },
            Err(err) => {
                debug!(tool = name, error = %err, "tool failed");
                ToolInvocation::failure(name, params, err.to_string())
            }
        }
    }
}

/// Boundary validation against the tool's declared schema.
///
/// Checks the argument shape and the schema's `required` list; per-field
/// parsing stays inside each tool.
fn validate(definition: &ToolDefinition, params: &Value) -> Result<(), ToolError> {
    let Some(object) = params.as_object() else {
        return Err(ToolError::invalid_args(format!(
            "parameters must be a JSON object, got {}",
            type_name(params)
        )));
    };

    if let Some(required) = definition
        .parameters
        .get("required")
        .and_then(Value::as_array)
    {
        for field in required.iter().filter_map(Value::as_str) {
            if !object.contains_key(field) {
                return Err(ToolError::invalid_args(format!(
                    "missing required field '{field}'"
                )));
            }
        }
    }
    Ok(())
}

fn type_name(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "an array",
        Value::Object(_) => "an object",
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::tool::DynTool;
    use async_trait::async_trait;
    use serde_json::json;

    #[derive(Debug)]
    struct EchoTool;

    #[async_trait]
    impl DynTool for EchoTool {
        fn name(&self) -> &str {
            "echo"
        }

        fn description(&self) -> String {
            "Echo the 'message' argument back".into()
        }

        fn definition(&self) -> ToolDefinition {
            ToolDefinition::new(
                self.name(),
                self.description(),
                json!({
                    "type": "object",
                    "properties": {
                        "message": { "type": "string" }
                    },
                    "required": ["message"]
                }),
            )
        }

        async fn call_json(&self, args: Value) -> Result<Value, ToolError> {
            let message = args
                .get("message")
                .and_then(Value::as_str)
                .ok_or_else(|| ToolError::invalid_args("'message' must be a string"))?;
            if message == "boom" {
                return Err(ToolError::execution("echo backend exploded"));
            }
            Ok(Value::String(message.to_string()))
        }
    }

    fn registry() -> ToolRegistry {
        let mut registry = ToolRegistry::new();
        registry.register(Box::new(EchoTool));
        registry
    }

    #[tokio::test]
    async fn successful_invocation() {
        let invocation = registry().invoke("echo", json!({"message": "hi"})).await;
        assert!(invocation.succeeded);
        assert_eq!(invocation.result, json!("hi"));
        assert_eq!(invocation.name, "echo");
    }

    #[tokio::test]
    async fn unknown_tool_is_a_string_result() {
        let invocation = registry().invoke("nope", json!({})).await;
        assert!(!invocation.succeeded);
        assert_eq!(invocation.result, json!("Tool not found: nope"));
    }

    #[tokio::test]
    async fn missing_required_field_is_rejected_before_dispatch() {
        let invocation = registry().invoke("echo", json!({})).await;
        assert!(!invocation.succeeded);
        let text = invocation.result.as_str().unwrap();
        assert!(text.contains("missing required field 'message'"));
    }

    #[tokio::test]
    async fn non_object_params_are_rejected() {
        let invocation = registry().invoke("echo", json!([1, 2])).await;
        assert!(!invocation.succeeded);
        assert!(invocation.result.as_str().unwrap().contains("an array"));
    }

    #[tokio::test]
    async fn null_params_become_an_empty_object() {
        let invocation = registry().invoke("echo", Value::Null).await;
        // Still fails the required check, but as a schema violation rather
        // than a shape error.
        assert!(!invocation.succeeded);
        assert!(
            invocation
                .result
                .as_str()
                .unwrap()
                .contains("missing required field")
        );
    }

    #[tokio::test]
    async fn handler_errors_are_lowered_to_strings() {
        let invocation = registry().invoke("echo", json!({"message": "boom"})).await;
        assert!(!invocation.succeeded);
        assert_eq!(
            invocation.result,
            json!("Execution error: echo backend exploded")
        );
    }

    #[test]
    fn definitions_are_sorted_and_complete() {
        let registry = registry();
        assert_eq!(registry.len(), 1);
        assert!(registry.contains("echo"));
        let defs = registry.definitions();
        assert_eq!(defs.len(), 1);
        assert_eq!(defs[0].name, "echo");
        assert!(defs[0].parameters.get("required").is_some());
    }
}
