use thiserror::Error;

/// Errors raised while resolving, validating or executing actions
#[derive(Debug, Error)]
pub enum ActionError {
    /// Fatal violation of an engine precondition (malformed node, unresolved term)
    #[error("Precondition violated: {0}")]
    Precondition(String),

    /// Action term does not fit the element it is applied to, or the token is malformed
    #[error("Bad action data: {0}")]
    BadData(String),

    #[error("Failed to launch browser: {0}")]
    LaunchFailed(String),

    #[error("Failed to connect to browser: {0}")]
    ConnectionFailed(String),

    #[error("Tab operation failed: {0}")]
    TabOperationFailed(String),

    #[error("Navigation failed: {0}")]
    NavigationFailed(String),

    #[error("Failed to parse DOM: {0}")]
    DomParseFailed(String),

    #[error("Element not found: {0}")]
    ElementNotFound(String),

    #[error("JavaScript evaluation failed: {0}")]
    EvaluationFailed(String),

    #[error("Tool '{tool}' failed: {reason}")]
    ToolExecutionFailed { tool: String, reason: String },

    #[error("Invalid argument: {0}")]
    InvalidArgument(String),
}

impl ActionError {
    /// Whether this is a data/type mismatch (the action was not applied)
    pub fn is_bad_data(&self) -> bool {
        matches!(self, ActionError::BadData(_))
    }

    /// Whether this is a fatal precondition violation
    pub fn is_precondition(&self) -> bool {
        matches!(self, ActionError::Precondition(_))
    }

    pub(crate) fn bad_data(reason: impl Into<String>) -> Self {
        ActionError::BadData(reason.into())
    }
}

/// Result alias used throughout the crate
pub type Result<T> = std::result::Result<T, ActionError>;
