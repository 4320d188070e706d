use super::{ActionType, Keyword, parser};
use crate::error::{ActionError, Result};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Separator used when rendering the values of a multi-valued term
pub const VALUE_SEPARATOR: &str = "; ";

/// Ordered sub-actions of a term; never empty once parsed
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", content = "values", rename_all = "snake_case")]
pub enum ActionValues {
    Keyword(Vec<Keyword>),
    Explicit(Vec<String>),
    /// 1-based
    Position(Vec<usize>),
}

/// Parsed form of an action token
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "RawActionTerm")]
pub struct ActionTerm {
    values: ActionValues,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    attribute_name: Option<String>,
}

impl ActionTerm {
    /// Parse a raw action token, failing with `BadData` on malformed or contradictory input
    pub fn parse(token: &str) -> Result<Self> {
        parser::parse_token(token)
    }

    pub(crate) fn from_parts(values: ActionValues, attribute_name: Option<String>) -> Self {
        Self { values, attribute_name }
    }

    /// Term with a single `click` verb
    pub fn click() -> Self {
        Self::from_parts(ActionValues::Keyword(vec![Keyword::Click]), None)
    }

    pub fn action_type(&self) -> ActionType {
        match self.values {
            ActionValues::Keyword(_) => ActionType::Keyword,
            ActionValues::Explicit(_) => ActionType::Explicit,
            ActionValues::Position(_) => ActionType::Position,
        }
    }

    pub fn values(&self) -> &ActionValues {
        &self.values
    }

    /// Number of sub-actions
    pub fn len(&self) -> usize {
        match &self.values {
            ActionValues::Keyword(v) => v.len(),
            ActionValues::Explicit(v) => v.len(),
            ActionValues::Position(v) => v.len(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// First verb of a keyword term
    pub fn first_keyword(&self) -> Option<Keyword> {
        match &self.values {
            ActionValues::Keyword(v) => v.first().copied(),
            _ => None,
        }
    }

    /// Whether this is a keyword term whose verb is `click`
    pub fn is_click(&self) -> bool {
        self.first_keyword() == Some(Keyword::Click)
    }

    /// Sub-action values as strings, in declaration order
    pub fn value_strings(&self) -> Vec<String> {
        match &self.values {
            ActionValues::Keyword(v) => v.iter().map(|k| k.as_str().to_string()).collect(),
            ActionValues::Explicit(v) => v.clone(),
            ActionValues::Position(v) => v.iter().map(|p| p.to_string()).collect(),
        }
    }

    /// Sub-action values joined with `"; "`
    pub fn render_values(&self) -> String {
        self.value_strings().join(VALUE_SEPARATOR)
    }

    pub fn has_attribute(&self) -> bool {
        self.attribute_name.is_some()
    }

    /// Name of the attribute the token asks to capture
    pub fn attribute_name(&self) -> Option<&str> {
        self.attribute_name.as_deref()
    }

    /// Captured value for the attribute annotation: the rendered sub-action values
    pub fn attribute_value(&self) -> Option<String> {
        self.attribute_name.as_ref().map(|_| self.render_values())
    }
}

/// Unchecked wire form; deserialized terms go through the same checks as parsed ones
#[derive(Deserialize)]
struct RawActionTerm {
    values: ActionValues,

    #[serde(default)]
    attribute_name: Option<String>,
}

impl TryFrom<RawActionTerm> for ActionTerm {
    type Error = ActionError;

    fn try_from(raw: RawActionTerm) -> Result<Self> {
        let term = ActionTerm::from_parts(raw.values, raw.attribute_name);
        if term.is_empty() {
            return Err(ActionError::bad_data("Action term must carry at least one value"));
        }
        if let ActionValues::Position(positions) = term.values() {
            if positions.contains(&0) {
                return Err(ActionError::bad_data("Action term positions are 1-based"));
            }
        }
        if let Some(name) = term.attribute_name() {
            if !parser::is_attribute_name(name) {
                return Err(ActionError::bad_data(format!("Invalid attribute name '{}'", name)));
            }
        }
        Ok(term)
    }
}

impl FromStr for ActionTerm {
    type Err = crate::error::ActionError;

    fn from_str(s: &str) -> Result<Self> {
        ActionTerm::parse(s)
    }
}

fn write_literal(f: &mut fmt::Formatter<'_>, literal: &str) -> fmt::Result {
    f.write_str("\"")?;
    for c in literal.chars() {
        if c == '"' || c == '\\' {
            f.write_str("\\")?;
        }
        write!(f, "{}", c)?;
    }
    f.write_str("\"")
}

/// Canonical token form; parsing it yields an equal term
impl fmt::Display for ActionTerm {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.values {
            ActionValues::Keyword(v) => {
                for (i, keyword) in v.iter().enumerate() {
                    if i > 0 {
                        f.write_str(VALUE_SEPARATOR)?;
                    }
                    f.write_str(keyword.as_str())?;
                }
            }
            ActionValues::Explicit(v) => {
                for (i, literal) in v.iter().enumerate() {
                    if i > 0 {
                        f.write_str(VALUE_SEPARATOR)?;
                    }
                    write_literal(f, literal)?;
                }
            }
            ActionValues::Position(v) => {
                for (i, position) in v.iter().enumerate() {
                    if i > 0 {
                        f.write_str(VALUE_SEPARATOR)?;
                    }
                    write!(f, "{}", position)?;
                }
            }
        }

        if let Some(name) = &self.attribute_name {
            write!(f, " @{}", name)?;
        }
        Ok(())
    }
}
