//! Tool schemas advertised to the model under test.

use std::fmt;

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value, json};

use crate::error::{Error, Result};

/// JSON type of a tool parameter.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ParamType {
    /// UTF-8 string.
    String,
    /// Any JSON number.
    Number,
    /// Integral JSON number.
    Integer,
    /// `true` or `false`.
    Boolean,
}

impl ParamType {
    /// Returns `true` when `value` has this JSON type.
    #[must_use]
    pub fn accepts(self, value: &Value) -> bool {
        match self {
            Self::String => value.is_string(),
            Self::Number => value.is_number(),
            Self::Integer => value.is_i64() || value.is_u64(),
            Self::Boolean => value.is_boolean(),
        }
    }
}

impl fmt::Display for ParamType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::String => "string",
            Self::Number => "number",
            Self::Integer => "integer",
            Self::Boolean => "boolean",
        })
    }
}

/// One named field of a tool's parameter contract.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct ParameterSpec {
    name: String,
    kind: ParamType,
    description: String,
    required: bool,
}

impl ParameterSpec {
    /// Returns the parameter name.
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Returns the parameter JSON type.
    #[must_use]
    pub const fn kind(&self) -> ParamType {
        self.kind
    }

    /// Returns the human-readable description.
    #[must_use]
    pub fn description(&self) -> &str {
        &self.description
    }

    /// Returns `true` if callers must supply this parameter.
    #[must_use]
    pub const fn is_required(&self) -> bool {
        self.required
    }
}

/// Name, description, and parameter contract of a tool.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct ToolSchema {
    name: String,
    description: String,
    parameters: Vec<ParameterSpec>,
}

impl ToolSchema {
    /// Creates a schema with no parameters.
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidToolSchema`] if the name is blank or contains
    /// whitespace.
    pub fn new(name: impl Into<String>, description: impl Into<String>) -> Result<Self> {
        let name = name.into();
        if name.trim().is_empty() {
            return Err(Error::InvalidToolSchema {
                name,
                reason: "tool name cannot be empty".into(),
            });
        }
        if name.chars().any(char::is_whitespace) {
            return Err(Error::InvalidToolSchema {
                name,
                reason: "tool name cannot contain whitespace".into(),
            });
        }

        Ok(Self {
            name,
            description: description.into(),
            parameters: Vec::new(),
        })
    }

    /// Adds a required parameter.
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidToolSchema`] if a parameter with the same name
    /// already exists.
    pub fn required(
        self,
        name: impl Into<String>,
        kind: ParamType,
        description: impl Into<String>,
    ) -> Result<Self> {
        self.with_parameter(name.into(), kind, description.into(), true)
    }

    /// Adds an optional parameter.
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidToolSchema`] if a parameter with the same name
    /// already exists.
    pub fn optional(
        self,
        name: impl Into<String>,
        kind: ParamType,
        description: impl Into<String>,
    ) -> Result<Self> {
        self.with_parameter(name.into(), kind, description.into(), false)
    }

    fn with_parameter(
        mut self,
        name: String,
        kind: ParamType,
        description: String,
        required: bool,
    ) -> Result<Self> {
        if self.parameters.iter().any(|param| param.name == name) {
            return Err(Error::InvalidToolSchema {
                name: self.name,
                reason: format!("duplicate parameter `{name}`"),
            });
        }
        self.parameters.push(ParameterSpec {
            name,
            kind,
            description,
            required,
        });
        Ok(self)
    }

    /// Returns the tool name.
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Returns the tool description.
    #[must_use]
    pub fn description(&self) -> &str {
        &self.description
    }

    /// Returns the parameter contract in declaration order.
    #[must_use]
    pub fn parameters(&self) -> &[ParameterSpec] {
        &self.parameters
    }

    /// Iterates over the required parameters only.
    pub fn required_parameters(&self) -> impl Iterator<Item = &ParameterSpec> {
        self.parameters.iter().filter(|param| param.required)
    }

    /// Renders the parameter contract as a JSON-schema object.
    #[must_use]
    pub fn to_json_schema(&self) -> Value {
        let mut properties = Map::new();
        for param in &self.parameters {
            properties.insert(
                param.name.clone(),
                json!({
                    "type": param.kind.to_string(),
                    "description": param.description,
                }),
            );
        }

        let required: Vec<&str> = self
            .required_parameters()
            .map(ParameterSpec::name)
            .collect();

        json!({
            "type": "object",
            "properties": properties,
            "required": required,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn rejects_blank_names() {
        let err = ToolSchema::new("  ", "nothing").expect_err("blank name");
        assert!(matches!(err, Error::InvalidToolSchema { .. }));

        let err = ToolSchema::new("read file", "spaces").expect_err("whitespace");
        assert!(matches!(err, Error::InvalidToolSchema { .. }));
    }

    #[test]
    fn rejects_duplicate_parameters() {
        let err = ToolSchema::new("read_file", "Read a file")
            .unwrap()
            .required("path", ParamType::String, "Path")
            .unwrap()
            .optional("path", ParamType::String, "Again")
            .expect_err("duplicate parameter");
        assert!(err.to_string().contains("duplicate parameter"));
    }

    #[test]
    fn renders_json_schema() {
        let schema = ToolSchema::new("run_command", "Execute a shell command")
            .unwrap()
            .required("command", ParamType::String, "Shell command to execute")
            .unwrap()
            .optional("timeout", ParamType::Number, "Timeout in seconds")
            .unwrap();

        let rendered = schema.to_json_schema();
        assert_eq!(rendered["type"], "object");
        assert_eq!(rendered["properties"]["command"]["type"], "string");
        assert_eq!(rendered["properties"]["timeout"]["type"], "number");
        assert_eq!(rendered["required"], json!(["command"]));
    }

    #[test]
    fn param_type_checks_values() {
        assert!(ParamType::String.accepts(&json!("x")));
        assert!(!ParamType::String.accepts(&json!(1)));
        assert!(ParamType::Number.accepts(&json!(1.5)));
        assert!(ParamType::Integer.accepts(&json!(3)));
        assert!(!ParamType::Integer.accepts(&json!(3.5)));
        assert!(ParamType::Boolean.accepts(&json!(false)));
    }
}
