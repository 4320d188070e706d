use crate::dom::tree::NodeId;
use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

/// Information needed to locate a snapshot node in the live page
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ElementSelector {
    /// Structural CSS path from the document element
    pub css_selector: String,
}

impl ElementSelector {
    pub fn new(css_selector: impl Into<String>) -> Self {
        Self {
            css_selector: css_selector.into(),
        }
    }

    /// Get the selector to hand to the browser.
    ///
    /// Always the structural path: `id` attributes are not guaranteed unique on real pages.
    pub fn best_selector(&self) -> &str {
        &self.css_selector
    }
}

/// Map of snapshot node ids to their selectors
/// Uses IndexMap to preserve document order
#[derive(Debug, Clone, Default)]
pub struct SelectorMap {
    map: IndexMap<NodeId, ElementSelector>,
}

impl SelectorMap {
    /// Create a new empty SelectorMap
    pub fn new() -> Self {
        Self { map: IndexMap::new() }
    }

    /// Register the selector for a node
    pub fn register(&mut self, node: NodeId, selector: ElementSelector) {
        self.map.insert(node, selector);
    }

    /// Get selector by node id
    pub fn get(&self, node: NodeId) -> Option<&ElementSelector> {
        self.map.get(&node)
    }

    /// Get the number of registered elements
    pub fn len(&self) -> usize {
        self.map.len()
    }

    /// Check if the map is empty
    pub fn is_empty(&self) -> bool {
        self.map.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_element_selector() {
        let selector = ElementSelector::new("html > body:nth-child(2)");

        assert_eq!(selector.best_selector(), "html > body:nth-child(2)");
    }

    #[test]
    fn test_selector_map_register_and_get() {
        let mut map = SelectorMap::new();
        assert!(map.is_empty());

        map.register(0, ElementSelector::new("html"));
        map.register(1, ElementSelector::new("html > body:nth-child(1)"));

        assert_eq!(map.len(), 2);
        assert_eq!(map.get(1).unwrap().css_selector, "html > body:nth-child(1)");
        assert!(map.get(7).is_none());
    }

    #[test]
    fn test_selector_serialization() {
        let selector = ElementSelector::new("html > head:nth-child(1)");

        let json = serde_json::to_string(&selector).unwrap();
        let deserialized: ElementSelector = serde_json::from_str(&json).unwrap();

        assert_eq!(selector, deserialized);
    }
}
