use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// Snapshot of a DOM element as produced by the extraction script
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ElementNode {
    /// HTML tag name (e.g., "div", "select", "input")
    pub tag_name: String,

    /// Element attributes (e.g., type, style, class)
    #[serde(default)]
    pub attributes: HashMap<String, String>,

    /// Text carried directly by the element (the displayed label for `<option>`)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub text_content: Option<String>,

    /// Child elements, in document order
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub children: Vec<ElementNode>,
}

impl ElementNode {
    /// Create a new ElementNode
    pub fn new(tag_name: impl Into<String>) -> Self {
        Self {
            tag_name: tag_name.into(),
            attributes: HashMap::new(),
            text_content: None,
            children: Vec::new(),
        }
    }

    /// Builder method: add a single attribute
    pub fn with_attribute(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.attributes.insert(key.into(), value.into());
        self
    }

    /// Builder method: set text content
    pub fn with_text(mut self, text: impl Into<String>) -> Self {
        self.text_content = Some(text.into());
        self
    }

    /// Builder method: set children
    pub fn with_children(mut self, children: Vec<ElementNode>) -> Self {
        self.children = children;
        self
    }

    /// Builder method: append a child
    pub fn with_child(mut self, child: ElementNode) -> Self {
        self.children.push(child);
        self
    }

    /// Shorthand for `<input type="...">`
    pub fn input(input_type: &str) -> Self {
        Self::new("input").with_attribute("type", input_type)
    }

    /// Shorthand for a `<select>` whose options display the given labels
    pub fn select<I, S>(labels: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let options = labels
            .into_iter()
            .map(|label| ElementNode::new("option").with_text(label))
            .collect();
        Self::new("select").with_children(options)
    }
}
