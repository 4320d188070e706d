//! Tool layer
//!
//! Named operations taking JSON parameters, for driving a [`BrowserSession`] from outside Rust:
//! - `navigate`: load a URL in the active tab
//! - `take_action`: apply an action expression to the element matching a CSS selector
//! - `check_visibility`: evaluate inline-style visibility of an element

pub mod navigate;
pub mod take_action;
pub mod utils;
pub mod visibility;

pub use navigate::{NavigateParams, NavigateTool};
pub use take_action::{TakeActionParams, TakeActionTool};
pub use visibility::{CheckVisibilityParams, CheckVisibilityTool};

use crate::browser::{BrowserSession, ChromePage};
use crate::engine::ActionEngine;
use crate::error::{ActionError, Result};
use indexmap::IndexMap;
use schemars::JsonSchema;
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Outcome of a tool execution
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ToolResult {
    pub success: bool,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub data: Option<Value>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl ToolResult {
    pub fn success(data: Option<Value>) -> Self {
        Self {
            success: true,
            data,
            error: None,
        }
    }

    pub fn success_with(data: Value) -> Self {
        Self::success(Some(data))
    }

    pub fn failure(error: impl Into<String>) -> Self {
        Self {
            success: false,
            data: None,
            error: Some(error.into()),
        }
    }
}

/// State shared by the tools of one execution
pub struct ToolContext<'a> {
    pub session: &'a BrowserSession,

    pub engine: ActionEngine,

    page: Option<ChromePage>,
}

impl<'a> ToolContext<'a> {
    pub fn new(session: &'a BrowserSession) -> Self {
        Self {
            session,
            engine: ActionEngine::default(),
            page: None,
        }
    }

    pub fn with_engine(mut self, engine: ActionEngine) -> Self {
        self.engine = engine;
        self
    }

    /// Page over the active tab, with a snapshot no older than this call
    pub fn page(&mut self) -> Result<&mut ChromePage> {
        if let Some(page) = self.page.as_mut() {
            page.refresh()?;
        } else {
            self.page = Some(self.session.page()?);
        }
        self.page
            .as_mut()
            .ok_or_else(|| ActionError::TabOperationFailed("No page available".to_string()))
    }

    /// Drop the cached page, e.g. after the tab navigated elsewhere
    pub fn invalidate_page(&mut self) {
        self.page = None;
    }
}

/// A named operation with typed parameters
pub trait Tool: Send + Sync {
    type Params: DeserializeOwned + JsonSchema;

    fn name(&self) -> &str;

    fn execute_typed(&self, params: Self::Params, context: &mut ToolContext) -> Result<ToolResult>;

    /// JSON schema of the parameters
    fn parameters_schema(&self) -> Value {
        serde_json::to_value(schemars::schema_for!(Self::Params)).unwrap_or(Value::Null)
    }
}

/// Object-safe view of a [`Tool`], used by the registry
pub trait DynTool: Send + Sync {
    fn name(&self) -> &str;

    fn parameters_schema(&self) -> Value;

    fn execute(&self, params: Value, context: &mut ToolContext) -> Result<ToolResult>;
}

impl<T: Tool> DynTool for T {
    fn name(&self) -> &str {
        Tool::name(self)
    }

    fn parameters_schema(&self) -> Value {
        Tool::parameters_schema(self)
    }

    fn execute(&self, params: Value, context: &mut ToolContext) -> Result<ToolResult> {
        let params: T::Params = serde_json::from_value(params).map_err(|e| {
            ActionError::InvalidArgument(format!("Invalid parameters for '{}': {}", Tool::name(self), e))
        })?;
        self.execute_typed(params, context)
    }
}

/// Tools by name, in registration order
#[derive(Default)]
pub struct ToolRegistry {
    tools: IndexMap<String, Box<dyn DynTool>>,
}

impl ToolRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Registry with `navigate`, `take_action` and `check_visibility`
    pub fn with_defaults() -> Self {
        let mut registry = Self::new();
        registry.register(NavigateTool);
        registry.register(TakeActionTool);
        registry.register(CheckVisibilityTool);
        registry
    }

    /// Add a tool, replacing any tool with the same name
    pub fn register<T: Tool + 'static>(&mut self, tool: T) {
        self.tools.insert(Tool::name(&tool).to_string(), Box::new(tool));
    }

    pub fn get(&self, name: &str) -> Option<&dyn DynTool> {
        self.tools.get(name).map(|t| t.as_ref())
    }

    pub fn has(&self, name: &str) -> bool {
        self.tools.contains_key(name)
    }

    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.tools.keys().map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.tools.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tools.is_empty()
    }

    /// Run the tool `name` with JSON parameters
    pub fn execute(&self, name: &str, params: Value, context: &mut ToolContext) -> Result<ToolResult> {
        let tool = self
            .get(name)
            .ok_or_else(|| ActionError::InvalidArgument(format!("Unknown tool '{}'", name)))?;

        log::debug!("Executing tool '{}'", name);
        tool.execute(params, context).map_err(|e| match e {
            ActionError::InvalidArgument(_) | ActionError::ToolExecutionFailed { .. } => e,
            other => ActionError::ToolExecutionFailed {
                tool: name.to_string(),
                reason: other.to_string(),
            },
        })
    }
}
