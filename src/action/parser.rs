//! Token grammar:
//!
//! ```text
//! token     := item ( ";" item )* [ "@" attr-name ]
//! item      := keyword | literal | position | "$" ident
//! literal   := '"' chars '"' | "'" chars "'"     (escapes: \" \' \\)
//! position  := integer >= 1
//! attr-name := [A-Za-z_][A-Za-z0-9_.:-]*
//! ```
//!
//! All items of a token must be of the same kind. `$name` references are database-bound and
//! are rejected here: they must be resolved by the caller before an action is dispatched.

use super::Keyword;
use super::term::{ActionTerm, ActionValues};
use crate::error::{ActionError, Result};
use std::iter::Peekable;
use std::str::Chars;

#[derive(Debug, PartialEq)]
enum Item {
    Keyword(Keyword),
    Literal(String),
    Position(usize),
}

impl Item {
    fn kind(&self) -> &'static str {
        match self {
            Item::Keyword(_) => "keyword",
            Item::Literal(_) => "explicit",
            Item::Position(_) => "position",
        }
    }
}

struct Cursor<'a> {
    token: &'a str,
    chars: Peekable<Chars<'a>>,
}

impl<'a> Cursor<'a> {
    fn new(token: &'a str) -> Self {
        Self {
            token,
            chars: token.chars().peekable(),
        }
    }

    fn error(&self, reason: impl std::fmt::Display) -> ActionError {
        ActionError::bad_data(format!("Malformed action token '{}': {}", self.token, reason))
    }

    fn peek(&mut self) -> Option<char> {
        self.chars.peek().copied()
    }

    fn skip_whitespace(&mut self) {
        while self.chars.next_if(|c| c.is_whitespace()).is_some() {}
    }

    fn take_while(&mut self, pred: impl Fn(char) -> bool) -> String {
        let mut out = String::new();
        while let Some(c) = self.chars.next_if(|&c| pred(c)) {
            out.push(c);
        }
        out
    }

    fn item(&mut self) -> Result<Item> {
        match self.peek() {
            None => Err(self.error("expected a value")),
            Some(quote @ ('"' | '\'')) => {
                self.chars.next();
                self.literal(quote).map(Item::Literal)
            }
            Some(c) if c.is_ascii_digit() => {
                let digits = self.take_while(|c| c.is_ascii_digit());
                let position: usize = digits
                    .parse()
                    .map_err(|_| self.error(format!("position '{}' is out of range", digits)))?;
                if position == 0 {
                    return Err(self.error("positions are 1-based"));
                }
                Ok(Item::Position(position))
            }
            Some('$') => {
                self.chars.next();
                let name = self.take_while(is_ident_char);
                Err(self.error(format!(
                    "database-bound value '${}' must be resolved before dispatch",
                    name
                )))
            }
            Some(c) if c.is_ascii_alphabetic() => {
                let word = self.take_while(|c| c.is_ascii_alphanumeric());
                word.parse::<Keyword>()
                    .map(Item::Keyword)
                    .map_err(|_| self.error(format!("unknown keyword '{}'", word)))
            }
            Some(c) => Err(self.error(format!("unexpected character '{}'", c))),
        }
    }

    fn literal(&mut self, quote: char) -> Result<String> {
        let mut out = String::new();
        loop {
            match self.chars.next() {
                None => return Err(self.error("unterminated literal")),
                Some('\\') => match self.chars.next() {
                    Some(escaped @ ('"' | '\'' | '\\')) => out.push(escaped),
                    Some(other) => {
                        out.push('\\');
                        out.push(other);
                    }
                    None => return Err(self.error("unterminated literal")),
                },
                Some(c) if c == quote => return Ok(out),
                Some(c) => out.push(c),
            }
        }
    }

    fn attribute_name(&mut self) -> Result<String> {
        match self.peek() {
            Some(c) if c.is_ascii_alphabetic() || c == '_' => Ok(self.take_while(is_ident_char)),
            _ => Err(self.error("expected an attribute name after '@'")),
        }
    }
}

fn is_ident_char(c: char) -> bool {
    c.is_ascii_alphanumeric() || matches!(c, '_' | '.' | ':' | '-')
}

/// Whether `name` is accepted after `@`
pub(crate) fn is_attribute_name(name: &str) -> bool {
    let mut chars = name.chars();
    chars.next().is_some_and(|c| c.is_ascii_alphabetic() || c == '_') && chars.all(is_ident_char)
}

/// Parse a raw action token into a term
pub fn parse_token(token: &str) -> Result<ActionTerm> {
    let mut cursor = Cursor::new(token);
    let mut items = Vec::new();
    let mut attribute_name = None;

    cursor.skip_whitespace();
    if cursor.peek().is_none() {
        return Err(ActionError::bad_data("Empty action token"));
    }

    loop {
        cursor.skip_whitespace();
        items.push(cursor.item()?);
        cursor.skip_whitespace();

        match cursor.peek() {
            None => break,
            Some(';') => {
                cursor.chars.next();
            }
            Some('@') => {
                cursor.chars.next();
                attribute_name = Some(cursor.attribute_name()?);
                cursor.skip_whitespace();
                if let Some(c) = cursor.peek() {
                    return Err(cursor.error(format!("unexpected '{}' after attribute name", c)));
                }
                break;
            }
            Some(c) => return Err(cursor.error(format!("expected ';' or '@', found '{}'", c))),
        }
    }

    let values = combine(&cursor, items)?;
    let term = ActionTerm::from_parts(values, attribute_name);
    log::debug!("Parsed action token '{}' as {} term {}", token, term.action_type(), term);
    Ok(term)
}

/// Fold same-kind items into typed values; mixing kinds is a contradiction
fn combine(cursor: &Cursor<'_>, items: Vec<Item>) -> Result<ActionValues> {
    let mut values = match items.first() {
        Some(Item::Keyword(_)) => ActionValues::Keyword(Vec::with_capacity(items.len())),
        Some(Item::Literal(_)) => ActionValues::Explicit(Vec::with_capacity(items.len())),
        Some(Item::Position(_)) => ActionValues::Position(Vec::with_capacity(items.len())),
        None => return Err(cursor.error("expected a value")),
    };

    for item in items {
        match (&mut values, item) {
            (ActionValues::Keyword(v), Item::Keyword(k)) => v.push(k),
            (ActionValues::Explicit(v), Item::Literal(s)) => v.push(s),
            (ActionValues::Position(v), Item::Position(p)) => v.push(p),
            (_, other) => {
                return Err(cursor.error(format!("cannot mix {} values with other kinds", other.kind())));
            }
        }
    }

    Ok(values)
}
