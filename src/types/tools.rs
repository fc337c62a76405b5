//! Tool specification, declaration and call types.

use serde::{Deserialize, Serialize};
use serde_json::Value;

/// A tool as advertised by the tool gateway.
///
/// `input_schema` is optional on the wire; declarations substitute an empty
/// object schema when it is missing.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ToolSpec {
    pub name: String,
    #[serde(default)]
    pub description: String,
    #[serde(rename = "inputSchema", default, skip_serializing_if = "Option::is_none")]
    pub input_schema: Option<Value>,
}

impl ToolSpec {
    /// Create a spec with a schema.
    pub fn new(name: impl Into<String>, description: impl Into<String>, input_schema: Value) -> Self {
        Self {
            name: name.into(),
            description: description.into(),
            input_schema: Some(input_schema),
        }
    }
}

/// Tool declaration in the upstream request format.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ToolDeclaration {
    pub r#type: String,
    pub function: ToolFunction,
}

/// Function definition inside a [`ToolDeclaration`].
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ToolFunction {
    pub name: String,
    pub description: String,
    /// JSON schema for function parameters
    pub parameters: Value,
}

impl ToolDeclaration {
    /// Create a new function declaration.
    pub fn function(name: String, description: String, parameters: Value) -> Self {
        Self {
            r#type: "function".to_string(),
            function: ToolFunction {
                name,
                description,
                parameters,
            },
        }
    }
}

impl From<&ToolSpec> for ToolDeclaration {
    fn from(spec: &ToolSpec) -> Self {
        let parameters = spec
            .input_schema
            .clone()
            .unwrap_or_else(|| serde_json::json!({"type": "object", "properties": {}}));
        Self::function(spec.name.clone(), spec.description.clone(), parameters)
    }
}

/// A tool call as declared back to the upstream in a continuation request.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ToolCall {
    pub id: String,
    pub r#type: String,
    pub function: FunctionCall,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FunctionCall {
    pub name: String,
    pub arguments: String,
}

impl ToolCall {
    /// Build a function call declaration with serialized arguments.
    pub fn function(id: impl Into<String>, name: impl Into<String>, arguments: String) -> Self {
        Self {
            id: id.into(),
            r#type: "function".to_string(),
            function: FunctionCall {
                name: name.into(),
                arguments,
            },
        }
    }
}

/// A fully reassembled tool invocation, ready to execute.
#[derive(Debug, Clone)]
pub struct CompletedToolCall {
    pub name: String,
    pub arguments: Value,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn declaration_from_spec_keeps_schema() {
        let spec = ToolSpec::new("list_equipment", "목록 조회", serde_json::json!({"type": "object"}));
        let decl = ToolDeclaration::from(&spec);
        assert_eq!(decl.r#type, "function");
        assert_eq!(decl.function.name, "list_equipment");
        assert_eq!(decl.function.parameters["type"], "object");
    }

    #[test]
    fn declaration_from_schemaless_spec_gets_empty_object() {
        let spec = ToolSpec {
            name: "ping".into(),
            description: String::new(),
            input_schema: None,
        };
        let decl = ToolDeclaration::from(&spec);
        assert_eq!(decl.function.parameters["type"], "object");
        assert!(decl.function.parameters["properties"].as_object().unwrap().is_empty());
    }

    #[test]
    fn spec_deserializes_wire_field_names() {
        let spec: ToolSpec = serde_json::from_value(serde_json::json!({
            "name": "get_sensor_data",
            "description": "조회",
            "inputSchema": {"type": "object", "required": ["sensor_type"]}
        }))
        .unwrap();
        assert_eq!(spec.name, "get_sensor_data");
        assert_eq!(spec.input_schema.unwrap()["required"][0], "sensor_type");
    }
}
