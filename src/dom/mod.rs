//! DOM snapshot model
//!
//! This module provides the read side of the page model:
//! - ElementNode: serializable element snapshot produced by the extraction script
//! - DomTree: arena of elements with parent links, addressed by NodeId
//! - ElementRef: borrowed read handle (node name, attributes, parent, text)
//! - SelectorMap: mapping of node ids to structural CSS selectors

pub mod element;
pub mod selector_map;
pub mod tree;

pub use element::ElementNode;
pub use selector_map::{ElementSelector, SelectorMap};
pub use tree::{DomTree, ElementRef, NodeId};
