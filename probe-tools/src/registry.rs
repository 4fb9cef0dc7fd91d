//! Registry of the built-in tool kinds and their simulated handlers.

use std::fmt;
use std::sync::Arc;

use probe_primitives::{ParamType, ToolCallResult, ToolSchema};
use serde_json::{Map, Value};
use thiserror::Error;
use tracing::{debug, warn};

use crate::calc;

/// Result alias for tool operations.
pub type ToolResult<T> = Result<T, ToolError>;

/// Closed set of tools the harness knows how to simulate.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum ToolKind {
    /// Write content to a file.
    WriteFile,
    /// Read the contents of a file.
    ReadFile,
    /// Execute a shell command.
    RunCommand,
    /// Evaluate an arithmetic expression.
    Calculate,
}

impl ToolKind {
    /// Every kind, in advertisement order.
    pub const ALL: [Self; 4] = [
        Self::WriteFile,
        Self::ReadFile,
        Self::RunCommand,
        Self::Calculate,
    ];

    /// Returns the wire name advertised to the model.
    #[must_use]
    pub const fn name(self) -> &'static str {
        match self {
            Self::WriteFile => "write_file",
            Self::ReadFile => "read_file",
            Self::RunCommand => "run_command",
            Self::Calculate => "calculate",
        }
    }

    /// Resolves a wire name. Matching is exact.
    #[must_use]
    pub fn from_name(name: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|kind| kind.name() == name)
    }

    /// Builds the schema advertised for this kind.
    ///
    /// # Errors
    ///
    /// Returns [`ToolError::InvalidSchema`] if the schema fails validation.
    pub fn schema(self) -> ToolResult<ToolSchema> {
        let schema = match self {
            Self::WriteFile => ToolSchema::new(self.name(), "Write content to a file")?
                .required("path", ParamType::String, "Path to the file to write")?
                .required("content", ParamType::String, "Content to write to the file")?,
            Self::ReadFile => ToolSchema::new(self.name(), "Read the contents of a file")?
                .required("path", ParamType::String, "Path to the file to read")?,
            Self::RunCommand => ToolSchema::new(self.name(), "Execute a shell command")?
                .required("command", ParamType::String, "Shell command to execute")?
                .optional(
                    "timeout",
                    ParamType::Number,
                    "Timeout in seconds (optional, default 30)",
                )?,
            Self::Calculate => ToolSchema::new(self.name(), "Perform a mathematical calculation")?
                .required(
                    "expression",
                    ParamType::String,
                    "Mathematical expression to evaluate",
                )?,
        };
        Ok(schema)
    }

    fn default_handler(self) -> Arc<dyn ToolHandler> {
        match self {
            Self::WriteFile | Self::ReadFile | Self::RunCommand => Arc::new(ValidateOnly),
            Self::Calculate => Arc::new(Calculator),
        }
    }
}

impl fmt::Display for ToolKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Validator and simulated executor for one tool kind.
pub trait ToolHandler: Send + Sync {
    /// Checks the arguments against the schema. The default implementation
    /// requires every required parameter to be present, of the declared type,
    /// and non-empty when it is a string.
    ///
    /// # Errors
    ///
    /// Returns [`ToolError::MissingArgument`] or [`ToolError::InvalidArgument`].
    fn validate(&self, schema: &ToolSchema, arguments: &Map<String, Value>) -> ToolResult<()> {
        validate_required(schema, arguments)
    }

    /// Simulates the tool after validation succeeded. No side effects.
    ///
    /// # Errors
    ///
    /// Returns [`ToolError::Execution`] when the simulated action fails.
    fn execute(&self, _arguments: &Map<String, Value>) -> ToolResult<()> {
        Ok(())
    }
}

/// Handler that only validates arguments.
#[derive(Debug, Default)]
pub struct ValidateOnly;

impl ToolHandler for ValidateOnly {}

/// Handler for `calculate` backed by the restricted evaluator in [`calc`].
#[derive(Debug, Default)]
pub struct Calculator;

impl ToolHandler for Calculator {
    fn execute(&self, arguments: &Map<String, Value>) -> ToolResult<()> {
        let expression = arguments
            .get("expression")
            .and_then(Value::as_str)
            .unwrap_or_default();
        let value = calc::evaluate(expression)
            .map_err(|err| ToolError::execution(format!("invalid expression: {err}")))?;
        debug!(expression, value, "calculation evaluated");
        Ok(())
    }
}

fn validate_required(schema: &ToolSchema, arguments: &Map<String, Value>) -> ToolResult<()> {
    for param in schema.required_parameters() {
        let Some(value) = arguments.get(param.name()) else {
            return Err(ToolError::MissingArgument {
                name: param.name().to_owned(),
            });
        };

        if !param.kind().accepts(value) {
            return Err(ToolError::InvalidArgument {
                name: param.name().to_owned(),
                reason: format!("expected {}", param.kind()),
            });
        }

        if value.as_str().is_some_and(|text| text.trim().is_empty()) {
            return Err(ToolError::MissingArgument {
                name: param.name().to_owned(),
            });
        }
    }
    Ok(())
}

struct RegisteredTool {
    kind: ToolKind,
    schema: ToolSchema,
    handler: Arc<dyn ToolHandler>,
}

/// Read-only catalog mapping each tool kind to its schema and handler.
#[derive(Default)]
pub struct ToolRegistry {
    tools: Vec<RegisteredTool>,
}

impl fmt::Debug for ToolRegistry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let names: Vec<_> = self.tools.iter().map(|tool| tool.kind.name()).collect();
        f.debug_struct("ToolRegistry")
            .field("registered", &names)
            .finish()
    }
}

impl ToolRegistry {
    /// Creates an empty registry.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a registry holding every built-in kind with its default handler.
    ///
    /// # Errors
    ///
    /// Propagates schema construction failures.
    pub fn builtin() -> ToolResult<Self> {
        let mut registry = Self::new();
        for kind in ToolKind::ALL {
            registry.register(kind, kind.schema()?, kind.default_handler())?;
        }
        Ok(registry)
    }

    /// Registers a handler for `kind`.
    ///
    /// # Errors
    ///
    /// Returns [`ToolError::DuplicateTool`] if the kind is already present and
    /// [`ToolError::InvalidSchema`] if the schema name differs from the kind's
    /// wire name.
    pub fn register(
        &mut self,
        kind: ToolKind,
        schema: ToolSchema,
        handler: Arc<dyn ToolHandler>,
    ) -> ToolResult<()> {
        if schema.name() != kind.name() {
            return Err(ToolError::InvalidSchema {
                reason: format!(
                    "schema `{}` registered for tool `{}`",
                    schema.name(),
                    kind.name()
                ),
            });
        }
        if self.tools.iter().any(|tool| tool.kind == kind) {
            return Err(ToolError::DuplicateTool {
                name: kind.name().to_owned(),
            });
        }

        self.tools.push(RegisteredTool {
            kind,
            schema,
            handler,
        });
        Ok(())
    }

    /// Returns the schemas in registration order.
    #[must_use]
    pub fn schemas(&self) -> Vec<ToolSchema> {
        self.tools.iter().map(|tool| tool.schema.clone()).collect()
    }

    /// Returns `true` if a tool with the given wire name is registered.
    #[must_use]
    pub fn contains(&self, name: &str) -> bool {
        self.lookup(name).is_some()
    }

    /// Returns the number of registered tools.
    #[must_use]
    pub fn len(&self) -> usize {
        self.tools.len()
    }

    /// Returns `true` if nothing is registered.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.tools.is_empty()
    }

    fn lookup(&self, name: &str) -> Option<&RegisteredTool> {
        let kind = ToolKind::from_name(name)?;
        self.tools.iter().find(|tool| tool.kind == kind)
    }

    /// Validates and simulates one call, converting every failure into a
    /// failed [`ToolCallResult`].
    #[must_use]
    pub fn execute(&self, name: &str, arguments: Map<String, Value>) -> ToolCallResult {
        match self.try_execute(name, &arguments) {
            Ok(()) => {
                debug!(tool = name, "tool call accepted");
                ToolCallResult::succeeded(name, arguments)
            }
            Err(err) => {
                warn!(tool = name, error = %err, "tool call rejected");
                ToolCallResult::failed(name, arguments, err.to_string())
            }
        }
    }

    fn try_execute(&self, name: &str, arguments: &Map<String, Value>) -> ToolResult<()> {
        let tool = self.lookup(name).ok_or_else(|| ToolError::UnknownTool {
            name: name.to_owned(),
        })?;
        tool.handler.validate(&tool.schema, arguments)?;
        tool.handler.execute(arguments)
    }
}

/// Errors produced by tool registration and simulated execution.
#[derive(Debug, Error)]
pub enum ToolError {
    /// Tool schema failed validation.
    #[error("invalid tool schema: {reason}")]
    InvalidSchema {
        /// Human-readable reason for rejection.
        reason: String,
    },

    /// Tool kind was registered twice.
    #[error("tool `{name}` is already registered")]
    DuplicateTool {
        /// Name of the offending tool.
        name: String,
    },

    /// Requested tool does not exist.
    #[error("unknown tool: {name}")]
    UnknownTool {
        /// Name the model used.
        name: String,
    },

    /// A required argument is absent or blank.
    #[error("missing required argument `{name}`")]
    MissingArgument {
        /// Parameter name.
        name: String,
    },

    /// A required argument has the wrong type.
    #[error("invalid argument `{name}`: {reason}")]
    InvalidArgument {
        /// Parameter name.
        name: String,
        /// What was wrong with it.
        reason: String,
    },

    /// The simulated action failed.
    #[error("{reason}")]
    Execution {
        /// Human-readable failure description.
        reason: String,
    },
}

impl ToolError {
    /// Creates an execution error from the supplied reason.
    #[must_use]
    pub fn execution(reason: impl Into<String>) -> Self {
        Self::Execution {
            reason: reason.into(),
        }
    }
}

impl From<probe_primitives::Error> for ToolError {
    fn from(err: probe_primitives::Error) -> Self {
        Self::InvalidSchema {
            reason: err.to_string(),
        }
    }
}
