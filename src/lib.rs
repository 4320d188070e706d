//! # oxpath-actions
//!
//! Type-checked resolution and execution of OXPath-style actions against web pages.
//!
//! An action token (`click`, `"Berlin"`, `2; 4`, optionally annotated `@name`) is parsed into an
//! [`ActionTerm`], checked against the [`FieldType`] of the element it targets, and only then
//! applied to the page with a single mutating call. A term that does not fit the element is
//! rejected before the page is touched.
//!
//! ## Quick start
//!
//! ```rust
//! use oxpath_actions::{ActionEngine, ElementNode, FieldType, MemoryPage};
//!
//! # fn main() -> oxpath_actions::Result<()> {
//! let root = ElementNode::new("html").with_child(ElementNode::select(["Red", "Green", "Blue"]));
//! let mut page = MemoryPage::new("https://example.com", root);
//!
//! let outcome = ActionEngine::default().take_action(&mut page, 1, FieldType::Select, r#""Green" @colour"#)?;
//!
//! assert_eq!(page.selected_texts(1), vec!["Green"]);
//! assert_eq!(outcome.last_attribute_value(), "Green");
//! # Ok(())
//! # }
//! ```
//!
//! ### Against Chrome
//!
//! ```rust,no_run
//! use oxpath_actions::{ActionEngine, ActionExpression, BrowserSession, LaunchOptions};
//!
//! # fn main() -> oxpath_actions::Result<()> {
//! let session = BrowserSession::launch(LaunchOptions::default())?;
//! session.navigate("https://example.com/search")?;
//! session.wait_for_navigation()?;
//!
//! let mut page = session.page()?;
//! let query = page.find("input[name=q]")?;
//! let action = ActionExpression::parse(r#"{"rust" wait=200}"#)?;
//! ActionEngine::default().execute(&mut page, query, &action)?;
//! # Ok(())
//! # }
//! ```
//!
//! ## Module Overview
//!
//! - [`field`]: element classification into field types
//! - [`action`]: action terms, the token parser and the action capability
//! - [`engine`]: validation and dispatch of terms onto a page
//! - [`visibility`]: inline-style visibility evaluation
//! - [`axis`]: node-name and attribute predicates for additional axes
//! - [`page`]: the page boundary and an in-memory page
//! - [`browser`]: Chrome sessions and live pages
//! - [`dom`]: DOM snapshots
//! - [`tools`]: JSON-parameterised tools over a browser session
//! - [`error`]: error types and result aliases

pub mod action;
pub mod axis;
pub mod browser;
pub mod dom;
pub mod engine;
pub mod error;
pub mod field;
pub mod page;
pub mod tools;
pub mod visibility;

pub use action::{Action, ActionExpression, ActionTerm, ActionType, ActionValues, Keyword};
pub use axis::{AdditionalAxisNavigator, node_satisfies_axis};
pub use browser::{BrowserSession, ChromePage, ConnectionOptions, LaunchOptions, PageOptions};
pub use dom::{DomTree, ElementNode, ElementRef, ElementSelector, NodeId, SelectorMap};
pub use engine::{ActionEngine, ActionOutcome, CapturedAttribute};
pub use error::{ActionError, Result};
pub use field::FieldType;
pub use page::{MemoryPage, PageEvent, PageModel, PageTransition, SelectOption};
pub use tools::{Tool, ToolContext, ToolRegistry, ToolResult};
pub use visibility::{CssHidden, is_visible};
