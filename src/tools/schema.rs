//! JSON schema helpers for tool parameter declarations

use serde_json::{json, Value};

/// Start building an object schema for a tool's parameters
pub fn params() -> ParamsBuilder {
    ParamsBuilder::new()
}

/// Builder for tool parameter schemas
pub struct ParamsBuilder {
    properties: serde_json::Map<String, Value>,
    required: Vec<String>,
}

impl ParamsBuilder {
    pub fn new() -> Self {
        Self {
            properties: serde_json::Map::new(),
            required: Vec::new(),
        }
    }

    /// Add a required string parameter
    pub fn string(self, name: &str, description: &str) -> Self {
        self.push(name, "string", description, true)
    }

    /// Add an optional string parameter
    pub fn string_opt(self, name: &str, description: &str) -> Self {
        self.push(name, "string", description, false)
    }

    /// Add an optional integer parameter
    pub fn integer_opt(self, name: &str, description: &str) -> Self {
        self.push(name, "integer", description, false)
    }

    fn push(mut self, name: &str, param_type: &str, description: &str, required: bool) -> Self {
        self.properties.insert(
            name.to_string(),
            json!({
                "type": param_type,
                "description": description
            }),
        );
        if required {
            self.required.push(name.to_string());
        }
        self
    }

    /// Build the final schema
    pub fn build(self) -> Value {
        json!({
            "type": "object",
            "properties": self.properties,
            "required": self.required
        })
    }
}

impl Default for ParamsBuilder {
    fn default() -> Self {
        Self::new()
    }
}
