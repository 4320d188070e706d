use crate::dom::element::ElementNode;
use crate::dom::selector_map::{ElementSelector, SelectorMap};
use crate::error::{ActionError, Result};
use headless_chrome::Tab;
use std::collections::HashMap;
use std::sync::Arc;

/// Position of a node in a [`DomTree`] (pre-order, document root is 0)
pub type NodeId = usize;

#[derive(Debug, Clone)]
struct DomNode {
    tag_name: String,
    attributes: HashMap<String, String>,
    text: Option<String>,
    parent: Option<NodeId>,
    children: Vec<NodeId>,
}

/// Snapshot of a page's DOM with parent links.
///
/// Tag names and attribute names are stored lower-cased; attribute values are kept verbatim.
#[derive(Debug, Clone)]
pub struct DomTree {
    nodes: Vec<DomNode>,

    /// Map of node ids to structural selectors
    pub selector_map: SelectorMap,
}

impl DomTree {
    /// Build a tree from a root element snapshot
    pub fn new(root: ElementNode) -> Self {
        let mut tree = Self {
            nodes: Vec::new(),
            selector_map: SelectorMap::new(),
        };
        tree.insert(root, None, "html".to_string());
        tree
    }

    /// Build DOM tree from a browser tab
    pub fn from_tab(tab: &Arc<Tab>) -> Result<Self> {
        let js_code = include_str!("extract_dom.js");

        let result = tab
            .evaluate(js_code, false)
            .map_err(|e| ActionError::DomParseFailed(format!("Failed to execute DOM extraction script: {}", e)))?;

        let json_value = result
            .value
            .ok_or_else(|| ActionError::DomParseFailed("No value returned from DOM extraction".to_string()))?;

        // The script returns a JSON string, not an object
        let json_str: String = serde_json::from_value(json_value)
            .map_err(|e| ActionError::DomParseFailed(format!("Failed to get JSON string: {}", e)))?;

        let root: ElementNode = serde_json::from_str(&json_str)
            .map_err(|e| ActionError::DomParseFailed(format!("Failed to parse DOM JSON: {}", e)))?;

        Ok(Self::new(root))
    }

    /// Flatten `node` and its subtree in pre-order, registering a selector for each element
    fn insert(&mut self, node: ElementNode, parent: Option<NodeId>, css_path: String) -> NodeId {
        let id = self.nodes.len();
        let tag_name = node.tag_name.to_ascii_lowercase();
        let attributes: HashMap<String, String> = node
            .attributes
            .into_iter()
            .map(|(k, v)| (k.to_ascii_lowercase(), v))
            .collect();

        self.selector_map.register(id, ElementSelector::new(css_path.clone()));

        self.nodes.push(DomNode {
            tag_name,
            attributes,
            text: node.text_content,
            parent,
            children: Vec::new(),
        });

        for (i, child) in node.children.into_iter().enumerate() {
            let child_path = format!("{} > {}:nth-child({})", css_path, child.tag_name.to_ascii_lowercase(), i + 1);
            let child_id = self.insert(child, Some(id), child_path);
            self.nodes[id].children.push(child_id);
        }

        id
    }

    /// The document root
    pub fn root(&self) -> ElementRef<'_> {
        ElementRef { tree: self, id: 0 }
    }

    /// Borrow the element with the given id
    pub fn element(&self, id: NodeId) -> Option<ElementRef<'_>> {
        (id < self.nodes.len()).then_some(ElementRef { tree: self, id })
    }

    /// Borrow the element with the given id, failing with `ElementNotFound`
    pub fn require(&self, id: NodeId) -> Result<ElementRef<'_>> {
        self.element(id)
            .ok_or_else(|| ActionError::ElementNotFound(format!("No element with id {} in the current page", id)))
    }

    /// Total number of elements in the tree
    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    /// All elements in document order
    pub fn elements(&self) -> impl Iterator<Item = ElementRef<'_>> {
        (0..self.nodes.len()).map(move |id| ElementRef { tree: self, id })
    }

    /// Get the live-page selector of a node
    pub fn get_selector(&self, id: NodeId) -> Option<&ElementSelector> {
        self.selector_map.get(id)
    }
}

/// Read-only handle on one element of a [`DomTree`]
#[derive(Clone, Copy)]
pub struct ElementRef<'a> {
    tree: &'a DomTree,
    id: NodeId,
}

impl<'a> ElementRef<'a> {
    fn node(&self) -> &'a DomNode {
        &self.tree.nodes[self.id]
    }

    pub fn id(&self) -> NodeId {
        self.id
    }

    pub fn tree(&self) -> &'a DomTree {
        self.tree
    }

    /// Lower-cased node name
    pub fn node_name(&self) -> &'a str {
        &self.node().tag_name
    }

    /// Attribute lookup, case-insensitive on the name
    pub fn attribute(&self, name: &str) -> Option<&'a str> {
        let attributes = &self.node().attributes;
        match attributes.get(name) {
            Some(value) => Some(value.as_str()),
            None => attributes.get(&name.to_ascii_lowercase()).map(String::as_str),
        }
    }

    /// Text carried directly by the element, trimmed
    pub fn text(&self) -> &'a str {
        self.node().text.as_deref().map(str::trim).unwrap_or("")
    }

    /// Parent element, `None` for the document root
    pub fn parent(&self) -> Option<ElementRef<'a>> {
        self.node().parent.map(|id| ElementRef { tree: self.tree, id })
    }

    pub fn children(&self) -> impl Iterator<Item = ElementRef<'a>> + 'a {
        let tree = self.tree;
        self.node().children.iter().map(move |&id| ElementRef { tree, id })
    }

    /// Descendants in document order, excluding self
    pub fn descendants(&self) -> impl Iterator<Item = ElementRef<'a>> + 'a {
        let tree = self.tree;
        let mut stack: Vec<NodeId> = self.node().children.iter().rev().copied().collect();
        std::iter::from_fn(move || {
            let id = stack.pop()?;
            stack.extend(tree.nodes[id].children.iter().rev());
            Some(ElementRef { tree, id })
        })
    }

    /// Self followed by every ancestor up to the document root
    pub fn ancestors_or_self(&self) -> impl Iterator<Item = ElementRef<'a>> + 'a {
        std::iter::successors(Some(*self), |e| e.parent())
    }
}

impl std::fmt::Debug for ElementRef<'_> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "<{} #{}>", self.node_name(), self.id)
    }
}

impl PartialEq for ElementRef<'_> {
    fn eq(&self, other: &Self) -> bool {
        std::ptr::eq(self.tree, other.tree) && self.id == other.id
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn create_test_tree() -> ElementNode {
        ElementNode::new("HTML").with_child(
            ElementNode::new("body")
                .with_child(
                    ElementNode::new("form")
                        .with_attribute("ID", "login")
                        .with_child(ElementNode::input("text").with_attribute("name", "user"))
                        .with_child(ElementNode::input("submit")),
                )
                .with_child(ElementNode::new("a").with_attribute("href", "/help").with_text("  Help ")),
        )
    }

    #[test]
    fn test_dom_tree_creation() {
        let tree = DomTree::new(create_test_tree());

        assert_eq!(tree.len(), 6);
        assert_eq!(tree.root().node_name(), "html");
        assert!(tree.root().parent().is_none());
    }

    #[test]
    fn test_pre_order_ids_and_parents() {
        let tree = DomTree::new(create_test_tree());

        let names: Vec<_> = tree.elements().map(|e| e.node_name()).collect();
        assert_eq!(names, vec!["html", "body", "form", "input", "input", "a"]);

        let user = tree.element(3).unwrap();
        assert_eq!(user.parent().unwrap().node_name(), "form");
        assert_eq!(user.ancestors_or_self().count(), 4);
    }

    #[test]
    fn test_attribute_lookup_is_case_insensitive() {
        let tree = DomTree::new(create_test_tree());
        let form = tree.element(2).unwrap();

        assert_eq!(form.attribute("id"), Some("login"));
        assert_eq!(form.attribute("ID"), Some("login"));
        assert_eq!(form.attribute("class"), None);
    }

    #[test]
    fn test_text_is_trimmed() {
        let tree = DomTree::new(create_test_tree());

        assert_eq!(tree.element(5).unwrap().text(), "Help");
        assert_eq!(tree.root().text(), "");
    }

    #[test]
    fn test_descendants_order() {
        let tree = DomTree::new(create_test_tree());
        let ids: Vec<_> = tree.root().descendants().map(|e| e.id()).collect();

        assert_eq!(ids, vec![1, 2, 3, 4, 5]);
    }

    #[test]
    fn test_selector_paths() {
        let tree = DomTree::new(create_test_tree());

        assert_eq!(tree.get_selector(0).unwrap().css_selector, "html");
        assert_eq!(
            tree.get_selector(4).unwrap().css_selector,
            "html > body:nth-child(1) > form:nth-child(1) > input:nth-child(2)"
        );
    }

    #[test]
    fn test_require_missing_element() {
        let tree = DomTree::new(create_test_tree());

        assert!(tree.require(5).is_ok());
        assert!(matches!(tree.require(42), Err(ActionError::ElementNotFound(_))));
    }
}
