//! Action language: typed action terms, the token parser and the action capability
//!
//! An action token is the raw string form of an interaction instruction:
//!
//! ```text
//! click                      keyword (interaction verb)
//! "Berlin"                   one explicit literal
//! "Red"; "Blue" @colour      several literals, captured under the attribute name `colour`
//! 2; 4                       1-based positions
//! ```
//!
//! [`ActionTerm::parse`] turns a token into an [`ActionTerm`]; [`ActionExpression`] wraps a
//! token with the absolute flag and post-action wait used by the surrounding language.

pub mod expression;
pub mod parser;
pub mod term;

pub use expression::{Action, ActionExpression};
pub use term::{ActionTerm, ActionValues};

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Kind of value an action carries
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ActionType {
    /// Interaction verb such as `click`
    Keyword,
    /// Literal values written by the script author
    Explicit,
    /// 1-based ordinal indices
    Position,
    /// Value bound from a database; resolved before an action ever reaches dispatch
    Database,
}

impl fmt::Display for ActionType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            ActionType::Keyword => "keyword",
            ActionType::Explicit => "explicit",
            ActionType::Position => "position",
            ActionType::Database => "database",
        };
        f.write_str(name)
    }
}

/// Interaction verbs recognised in action tokens
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Keyword {
    Click,
    DblClick,
    RightClick,
    MouseDown,
    MouseUp,
    MouseOver,
    MouseOut,
    MouseMove,
    KeyDown,
    KeyPress,
    KeyUp,
    Check,
    Uncheck,
    Scroll,
}

impl Keyword {
    pub const ALL: [Keyword; 14] = [
        Keyword::Click,
        Keyword::DblClick,
        Keyword::RightClick,
        Keyword::MouseDown,
        Keyword::MouseUp,
        Keyword::MouseOver,
        Keyword::MouseOut,
        Keyword::MouseMove,
        Keyword::KeyDown,
        Keyword::KeyPress,
        Keyword::KeyUp,
        Keyword::Check,
        Keyword::Uncheck,
        Keyword::Scroll,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Keyword::Click => "click",
            Keyword::DblClick => "dblclick",
            Keyword::RightClick => "rightclick",
            Keyword::MouseDown => "mousedown",
            Keyword::MouseUp => "mouseup",
            Keyword::MouseOver => "mouseover",
            Keyword::MouseOut => "mouseout",
            Keyword::MouseMove => "mousemove",
            Keyword::KeyDown => "keydown",
            Keyword::KeyPress => "keypress",
            Keyword::KeyUp => "keyup",
            Keyword::Check => "check",
            Keyword::Uncheck => "uncheck",
            Keyword::Scroll => "scroll",
        }
    }
}

impl FromStr for Keyword {
    type Err = ();

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Keyword::ALL
            .into_iter()
            .find(|k| k.as_str().eq_ignore_ascii_case(s))
            .ok_or(())
    }
}

impl fmt::Display for Keyword {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_keyword_from_str_ignores_case() {
        assert_eq!("CLICK".parse::<Keyword>(), Ok(Keyword::Click));
        assert_eq!("DblClick".parse::<Keyword>(), Ok(Keyword::DblClick));
        assert!("tap".parse::<Keyword>().is_err());
    }

    #[test]
    fn test_keyword_names_round_trip() {
        for keyword in Keyword::ALL {
            assert_eq!(keyword.as_str().parse::<Keyword>(), Ok(keyword));
        }
    }

    #[test]
    fn test_action_type_serialization() {
        assert_eq!(serde_json::to_string(&ActionType::Position).unwrap(), "\"position\"");
        assert_eq!(ActionType::Database.to_string(), "database");
    }
}
