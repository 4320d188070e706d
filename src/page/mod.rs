//! Browser Page Model boundary
//!
//! The engine reads the page through [`PageModel::dom`] and mutates it through the remaining
//! operations. Implementations:
//! - [`MemoryPage`]: deterministic in-memory page, records every mutation
//! - [`crate::browser::ChromePage`]: live Chrome tab over CDP

pub mod memory;

pub use memory::{MemoryPage, PageEvent};

use crate::dom::{DomTree, ElementRef, NodeId};
use crate::error::Result;
use serde::{Deserialize, Serialize};

/// Effect of a click on the current document
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PageTransition {
    /// Same document; node ids remain valid
    Stayed,
    /// A new document replaced the old one; previously obtained node ids are stale
    Navigated,
}

impl PageTransition {
    pub fn navigated(&self) -> bool {
        matches!(self, PageTransition::Navigated)
    }
}

/// One `<option>` of a `<select>`
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SelectOption {
    pub node: NodeId,
    /// 0-based position among the select's options
    pub index: usize,
    /// Displayed text (not the `value` attribute)
    pub text: String,
}

/// Operations the action engine needs from a loaded page
pub trait PageModel {
    /// Current DOM snapshot
    fn dom(&self) -> &DomTree;

    /// Set the value of a text-like input, textarea or file input
    fn set_value(&mut self, node: NodeId, value: &str) -> Result<()>;

    /// Click an element. On `Navigated`, `dom()` reflects the new document.
    fn click(&mut self, node: NodeId) -> Result<PageTransition>;

    /// Mark the options at the given 0-based indices selected, in order
    fn set_selected(&mut self, select: NodeId, indices: &[usize]) -> Result<()>;

    /// Options of a select element in document order
    fn select_options(&self, select: NodeId) -> Vec<SelectOption> {
        self.dom()
            .element(select)
            .map(collect_select_options)
            .unwrap_or_default()
    }
}

/// Options below `select`, including those grouped in `<optgroup>`
pub fn collect_select_options(select: ElementRef<'_>) -> Vec<SelectOption> {
    select
        .descendants()
        .filter(|e| e.node_name() == "option")
        .enumerate()
        .map(|(index, option)| SelectOption {
            node: option.id(),
            index,
            text: option.text().to_string(),
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dom::ElementNode;

    #[test]
    fn test_collect_select_options_with_groups() {
        let select = ElementNode::new("select")
            .with_child(ElementNode::new("option").with_text(" Any "))
            .with_child(
                ElementNode::new("optgroup")
                    .with_attribute("label", "Warm")
                    .with_child(ElementNode::new("option").with_text("Red"))
                    .with_child(ElementNode::new("option").with_text("Orange")),
            );
        let tree = DomTree::new(ElementNode::new("html").with_child(select));

        let options = collect_select_options(tree.element(1).unwrap());
        let texts: Vec<_> = options.iter().map(|o| o.text.as_str()).collect();
        let indices: Vec<_> = options.iter().map(|o| o.index).collect();

        assert_eq!(texts, vec!["Any", "Red", "Orange"]);
        assert_eq!(indices, vec![0, 1, 2]);
        assert_eq!(options[1].node, 4);
    }

    #[test]
    fn test_transition() {
        assert!(PageTransition::Navigated.navigated());
        assert!(!PageTransition::Stayed.navigated());
    }
}
