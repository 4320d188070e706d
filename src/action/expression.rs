use super::{ActionTerm, ActionType};
use crate::error::{ActionError, Result};
use std::fmt;
use std::time::Duration;

/// Capability carried by every action evaluated by the surrounding language
pub trait Action {
    /// Raw value of the action (the action token, or `$name` for database-bound actions)
    fn value(&self) -> &str;

    fn action_type(&self) -> ActionType;

    /// `true` when the path continuing after the action is evaluated from the document root
    fn is_absolute_action(&self) -> bool;

    fn set_absolute_action(&mut self, absolute: bool);

    /// Post-action wait in milliseconds (0 when none is set)
    fn wait(&self) -> u64;

    fn set_wait(&mut self, wait_ms: u64);

    fn has_wait(&self) -> bool;

    fn wait_duration(&self) -> Option<Duration> {
        self.has_wait().then(|| Duration::from_millis(self.wait()))
    }
}

/// Action as written in an expression: `{ token [wait=<ms>] [/] }`
///
/// Braces are optional. A trailing `/` marks the action absolute; `wait=` adds a pause after
/// the action completes.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ActionExpression {
    value: String,
    action_type: ActionType,
    absolute: bool,
    wait_ms: Option<u64>,
}

impl ActionExpression {
    /// Parse an action expression, validating its token
    pub fn parse(expression: &str) -> Result<Self> {
        let mut body = expression.trim();
        if let Some(inner) = body.strip_prefix('{') {
            body = inner
                .strip_suffix('}')
                .ok_or_else(|| ActionError::bad_data(format!("Unbalanced braces in action '{}'", expression)))?;
        }

        let mut body = body.trim();
        let mut absolute = false;
        if let Some(rest) = body.strip_suffix('/') {
            absolute = true;
            body = rest.trim_end();
        }

        let mut wait_ms = None;
        if let Some((head, ms)) = body.rsplit_once("wait=") {
            let is_flag = !ms.is_empty()
                && ms.chars().all(|c| c.is_ascii_digit())
                && (head.is_empty() || head.ends_with(char::is_whitespace));
            if is_flag {
                let ms = ms
                    .parse()
                    .map_err(|_| ActionError::bad_data(format!("Wait '{}' is out of range", ms)))?;
                wait_ms = Some(ms);
                body = head.trim_end();
            }
        }

        let mut action = if is_database_reference(body) {
            Self::database(&body[1..])
        } else {
            Self::from_term(&ActionTerm::parse(body)?)
        };
        action.absolute = absolute;
        action.wait_ms = wait_ms;
        Ok(action)
    }

    /// Wrap an already parsed term
    pub fn from_term(term: &ActionTerm) -> Self {
        Self {
            value: term.to_string(),
            action_type: term.action_type(),
            absolute: false,
            wait_ms: None,
        }
    }

    /// Database-bound action referencing `name`
    pub fn database(name: &str) -> Self {
        Self {
            value: format!("${}", name),
            action_type: ActionType::Database,
            absolute: false,
            wait_ms: None,
        }
    }

    /// Parsed term of a non-database action
    pub fn term(&self) -> Result<ActionTerm> {
        if self.action_type == ActionType::Database {
            return Err(ActionError::Precondition(format!(
                "Database action '{}' has no term until it is resolved",
                self.value
            )));
        }
        ActionTerm::parse(&self.value)
    }
}

fn is_database_reference(body: &str) -> bool {
    body.strip_prefix('$').is_some_and(|name| {
        !name.is_empty() && name.chars().all(|c| c.is_ascii_alphanumeric() || c == '_')
    })
}

impl Action for ActionExpression {
    fn value(&self) -> &str {
        &self.value
    }

    fn action_type(&self) -> ActionType {
        self.action_type
    }

    fn is_absolute_action(&self) -> bool {
        self.absolute
    }

    fn set_absolute_action(&mut self, absolute: bool) {
        self.absolute = absolute;
    }

    fn wait(&self) -> u64 {
        self.wait_ms.unwrap_or(0)
    }

    fn set_wait(&mut self, wait_ms: u64) {
        self.wait_ms = Some(wait_ms);
    }

    fn has_wait(&self) -> bool {
        self.wait_ms.is_some()
    }
}

impl fmt::Display for ActionExpression {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{{{}", self.value)?;
        if let Some(ms) = self.wait_ms {
            write!(f, " wait={}", ms)?;
        }
        if self.absolute {
            f.write_str(" /")?;
        }
        f.write_str("}")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_plain_token() {
        let action = ActionExpression::parse("click").unwrap();

        assert_eq!(action.action_type(), ActionType::Keyword);
        assert_eq!(action.value(), "click");
        assert!(!action.is_absolute_action());
        assert!(!action.has_wait());
        assert_eq!(action.wait(), 0);
        assert_eq!(action.wait_duration(), None);
    }

    #[test]
    fn test_braced_with_flags() {
        let action = ActionExpression::parse(r#"{ "Oxford" @city wait=250 / }"#).unwrap();

        assert_eq!(action.action_type(), ActionType::Explicit);
        assert_eq!(action.value(), r#""Oxford" @city"#);
        assert!(action.is_absolute_action());
        assert_eq!(action.wait(), 250);
        assert_eq!(action.wait_duration(), Some(Duration::from_millis(250)));
    }

    #[test]
    fn test_wait_inside_literal_is_not_a_flag() {
        let action = ActionExpression::parse(r#"{"please wait=5"}"#).unwrap();

        assert!(!action.has_wait());
        assert_eq!(action.term().unwrap().render_values(), "please wait=5");
    }

    #[test]
    fn test_database_action() {
        let action = ActionExpression::parse("{$city /}").unwrap();

        assert_eq!(action.action_type(), ActionType::Database);
        assert_eq!(action.value(), "$city");
        assert!(action.is_absolute_action());
        assert!(action.term().unwrap_err().is_precondition());
    }

    #[test]
    fn test_setters() {
        let mut action = ActionExpression::from_term(&ActionTerm::click());
        action.set_absolute_action(true);
        action.set_wait(1000);

        assert!(action.is_absolute_action());
        assert!(action.has_wait());
        assert_eq!(action.to_string(), "{click wait=1000 /}");
    }

    #[test]
    fn test_malformed_expressions() {
        assert!(ActionExpression::parse("{click").unwrap_err().is_bad_data());
        assert!(ActionExpression::parse("{}").unwrap_err().is_bad_data());
        assert!(ActionExpression::parse("{tap /}").unwrap_err().is_bad_data());
    }

    #[test]
    fn test_display_round_trip() {
        let action = ActionExpression::parse("{2; 3 @pos wait=10 /}").unwrap();
        let again = ActionExpression::parse(&action.to_string()).unwrap();

        assert_eq!(action, again);
    }
}
