//! Tool System
//!
//! Named, schema-validated operations the orchestrator can invoke on
//! behalf of the model. The registry is built once at startup from a
//! fixed set of tools; validation always precedes execution.

use std::collections::HashMap;
use std::sync::Arc;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use crate::error::Result;

/// One violated field or constraint found during schema validation
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Violation {
    /// Path to the offending field (e.g. `tasks[0].title`)
    pub path: String,

    /// What went wrong
    pub message: String,
}

impl Violation {
    pub fn new(path: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            path: path.into(),
            message: message.into(),
        }
    }
}

impl std::fmt::Display for Violation {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}: {}", self.path, self.message)
    }
}

/// Structural schema for one parameter.
///
/// Covers the subset of JSON Schema the tools actually need: scalar
/// types, closed enums, non-empty strings, arrays with item schemas,
/// and nested objects.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct ParameterSchema {
    /// Parameter name
    pub name: String,

    /// JSON type: "string", "number", "integer", "boolean", "array", "object"
    #[serde(rename = "type")]
    pub param_type: String,

    /// Human-readable description (shown to the model)
    pub description: String,

    /// Whether the parameter must be present
    #[serde(default)]
    pub required: bool,

    /// Closed set of allowed values
    #[serde(skip_serializing_if = "Option::is_none")]
    pub enum_values: Option<Vec<serde_json::Value>>,

    /// Minimum string length (in characters)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub min_length: Option<usize>,

    /// Minimum number of array items
    #[serde(skip_serializing_if = "Option::is_none")]
    pub min_items: Option<usize>,

    /// Item schema for arrays
    #[serde(skip_serializing_if = "Option::is_none")]
    pub items: Option<Box<ParameterSchema>>,

    /// Field schemas for objects
    #[serde(skip_serializing_if = "Option::is_none")]
    pub properties: Option<Vec<ParameterSchema>>,
}

impl ParameterSchema {
    /// Minimal schema: name, type, description
    pub fn new(
        name: impl Into<String>,
        param_type: impl Into<String>,
        description: impl Into<String>,
    ) -> Self {
        Self {
            name: name.into(),
            param_type: param_type.into(),
            description: description.into(),
            required: false,
            enum_values: None,
            min_length: None,
            min_items: None,
            items: None,
            properties: None,
        }
    }

    pub fn required(mut self) -> Self {
        self.required = true;
        self
    }

    pub fn with_enum(mut self, values: Vec<serde_json::Value>) -> Self {
        self.enum_values = Some(values);
        self
    }

    pub fn with_min_length(mut self, min: usize) -> Self {
        self.min_length = Some(min);
        self
    }

    pub fn with_min_items(mut self, min: usize) -> Self {
        self.min_items = Some(min);
        self
    }

    pub fn with_items(mut self, items: ParameterSchema) -> Self {
        self.items = Some(Box::new(items));
        self
    }

    pub fn with_properties(mut self, properties: Vec<ParameterSchema>) -> Self {
        self.properties = Some(properties);
        self
    }

    fn validate_value(&self, value: &serde_json::Value, path: &str, out: &mut Vec<Violation>) {
        match self.param_type.as_str() {
            "string" => {
                let Some(s) = value.as_str() else {
                    out.push(Violation::new(path, "must be a string"));
                    return;
                };
                if let Some(min) = self.min_length {
                    if s.chars().count() < min {
                        let message = if min == 1 {
                            "must not be empty".to_string()
                        } else {
                            format!("must have at least {min} character(s)")
                        };
                        out.push(Violation::new(path, message));
                    }
                }
            }
            "number" => {
                if !value.is_number() {
                    out.push(Violation::new(path, "must be a number"));
                    return;
                }
            }
            "integer" => {
                if value.as_i64().is_none() && value.as_u64().is_none() {
                    out.push(Violation::new(path, "must be an integer"));
                    return;
                }
            }
            "boolean" => {
                if !value.is_boolean() {
                    out.push(Violation::new(path, "must be a boolean"));
                    return;
                }
            }
            "array" => {
                let Some(array) = value.as_array() else {
                    out.push(Violation::new(path, "must be an array"));
                    return;
                };
                if let Some(min) = self.min_items {
                    if array.len() < min {
                        out.push(Violation::new(
                            path,
                            format!("must have at least {min} item(s)"),
                        ));
                    }
                }
                if let Some(items) = &self.items {
                    for (i, item) in array.iter().enumerate() {
                        items.validate_value(item, &format!("{path}[{i}]"), out);
                    }
                }
                return;
            }
            "object" => {
                let Some(fields) = self.properties.as_deref() else {
                    if !value.is_object() {
                        out.push(Violation::new(path, "must be an object"));
                    }
                    return;
                };
                validate_fields(fields, value, path, out);
                return;
            }
            _ => {}
        }

        if let Some(allowed) = &self.enum_values {
            if !allowed.contains(value) {
                let rendered: Vec<String> = allowed.iter().map(render_value).collect();
                out.push(Violation::new(
                    path,
                    format!("must be one of: {}", rendered.join(", ")),
                ));
            }
        }
    }
}

fn render_value(value: &serde_json::Value) -> String {
    match value.as_str() {
        Some(s) => s.to_string(),
        None => value.to_string(),
    }
}

fn validate_fields(
    fields: &[ParameterSchema],
    value: &serde_json::Value,
    path: &str,
    out: &mut Vec<Violation>,
) {
    let Some(object) = value.as_object() else {
        let shown = if path.is_empty() { "arguments" } else { path };
        out.push(Violation::new(shown, "must be an object"));
        return;
    };

    for field in fields {
        let field_path = if path.is_empty() {
            field.name.clone()
        } else {
            format!("{path}.{}", field.name)
        };

        match object.get(&field.name) {
            None | Some(serde_json::Value::Null) => {
                if field.required {
                    out.push(Violation::new(field_path, "required field is missing"));
                }
            }
            Some(present) => field.validate_value(present, &field_path, out),
        }
    }
}

/// Tool definition schema (for model function binding)
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct ToolSchema {
    /// Unique tool identifier
    pub name: String,

    /// Human-readable description (shown to the model)
    pub description: String,

    /// Top-level parameter definitions
    pub parameters: Vec<ParameterSchema>,
}

impl ToolSchema {
    /// Validate raw arguments, collecting every violated field
    pub fn validate(&self, arguments: &serde_json::Value) -> Vec<Violation> {
        let mut out = Vec::new();
        validate_fields(&self.parameters, arguments, "", &mut out);
        out
    }

    /// Render as a JSON Schema object (for providers that bind tools
    /// through the OpenAI function-calling format)
    pub fn to_json_schema(&self) -> serde_json::Value {
        parameters_to_json_schema(&self.parameters)
    }
}

fn parameters_to_json_schema(parameters: &[ParameterSchema]) -> serde_json::Value {
    let mut properties = serde_json::Map::new();
    let mut required = Vec::new();

    for param in parameters {
        properties.insert(param.name.clone(), parameter_to_json_schema(param));
        if param.required {
            required.push(serde_json::Value::String(param.name.clone()));
        }
    }

    serde_json::json!({
        "type": "object",
        "properties": properties,
        "required": required,
    })
}

fn parameter_to_json_schema(param: &ParameterSchema) -> serde_json::Value {
    if param.param_type == "object" {
        if let Some(fields) = &param.properties {
            let mut schema = parameters_to_json_schema(fields);
            schema["description"] = serde_json::Value::String(param.description.clone());
            return schema;
        }
    }

    let mut schema = serde_json::Map::new();
    schema.insert("type".into(), param.param_type.clone().into());
    schema.insert("description".into(), param.description.clone().into());

    if let Some(allowed) = &param.enum_values {
        schema.insert("enum".into(), serde_json::Value::Array(allowed.clone()));
    }
    if let Some(min) = param.min_length {
        schema.insert("minLength".into(), min.into());
    }
    if let Some(min) = param.min_items {
        schema.insert("minItems".into(), min.into());
    }
    if let Some(items) = &param.items {
        schema.insert("items".into(), parameter_to_json_schema(items));
    }

    serde_json::Value::Object(schema)
}

/// Outcome of one tool call, converted to exactly one tool turn
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct ToolResult {
    /// Tool that was called
    pub name: String,

    /// Id of the request this result answers
    pub call_id: String,

    /// Whether execution succeeded
    pub success: bool,

    /// Output payload (or failure reason)
    pub output: String,
}

impl ToolResult {
    pub fn success(
        name: impl Into<String>,
        call_id: impl Into<String>,
        output: impl Into<String>,
    ) -> Self {
        Self {
            name: name.into(),
            call_id: call_id.into(),
            success: true,
            output: output.into(),
        }
    }

    pub fn failure(
        name: impl Into<String>,
        call_id: impl Into<String>,
        error: impl Into<String>,
    ) -> Self {
        Self {
            name: name.into(),
            call_id: call_id.into(),
            success: false,
            output: error.into(),
        }
    }
}

/// Tool trait - implement to add new capabilities.
///
/// `execute` only ever sees arguments that already passed the schema;
/// an `Err` from the body is an execution fault, caught by the executor.
#[async_trait]
pub trait Tool: Send + Sync {
    /// Get the tool's schema for model function binding and validation
    fn schema(&self) -> ToolSchema;

    /// Execute the tool with validated arguments
    async fn execute(&self, arguments: &serde_json::Value) -> Result<String>;
}

/// Registry of available tools, fixed after startup
pub struct ToolRegistry {
    tools: HashMap<String, Arc<dyn Tool>>,
}

impl Default for ToolRegistry {
    fn default() -> Self {
        Self::new()
    }
}

impl ToolRegistry {
    pub fn new() -> Self {
        Self {
            tools: HashMap::new(),
        }
    }

    /// Register a new tool
    pub fn register<T: Tool + 'static>(&mut self, tool: T) {
        let schema = tool.schema();
        self.tools.insert(schema.name, Arc::new(tool));
    }

    /// Register a shared tool
    pub fn register_shared(&mut self, tool: Arc<dyn Tool>) {
        let schema = tool.schema();
        self.tools.insert(schema.name, tool);
    }

    /// Get a tool by name
    pub fn get(&self, name: &str) -> Option<Arc<dyn Tool>> {
        self.tools.get(name).cloned()
    }

    /// Get all tool schemas (for binding to the model)
    pub fn schemas(&self) -> Vec<ToolSchema> {
        self.tools.values().map(|t| t.schema()).collect()
    }

    /// Get tool names
    pub fn names(&self) -> Vec<&str> {
        self.tools.keys().map(String::as_str).collect()
    }

    /// Number of registered tools
    pub fn len(&self) -> usize {
        self.tools.len()
    }

    /// Check if empty
    pub fn is_empty(&self) -> bool {
        self.tools.is_empty()
    }
}
