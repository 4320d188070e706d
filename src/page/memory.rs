use super::{PageModel, PageTransition};
use crate::dom::{DomTree, ElementNode, NodeId};
use crate::error::{ActionError, Result};
use std::collections::{HashMap, HashSet};

/// Mutation recorded by a [`MemoryPage`]
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PageEvent {
    SetValue { node: NodeId, value: String },
    Click { node: NodeId },
    Select { node: NodeId, indices: Vec<usize> },
}

struct Navigation {
    url: String,
    root: ElementNode,
}

/// In-memory page model.
///
/// Form state (values, checked boxes, selected options) lives beside the immutable snapshot.
/// Clicks can be scripted to navigate to another document or to fail like a broken transport.
pub struct MemoryPage {
    url: String,
    dom: DomTree,
    values: HashMap<NodeId, String>,
    checked: HashSet<NodeId>,
    selected: HashMap<NodeId, Vec<usize>>,
    navigations: HashMap<NodeId, Navigation>,
    failing_clicks: HashMap<NodeId, String>,
    events: Vec<PageEvent>,
}

impl MemoryPage {
    pub fn new(url: impl Into<String>, root: ElementNode) -> Self {
        Self {
            url: url.into(),
            dom: DomTree::new(root),
            values: HashMap::new(),
            checked: HashSet::new(),
            selected: HashMap::new(),
            navigations: HashMap::new(),
            failing_clicks: HashMap::new(),
            events: Vec::new(),
        }
    }

    /// Clicking `node` loads `root` as a new document at `url`
    pub fn navigate_on_click(&mut self, node: NodeId, url: impl Into<String>, root: ElementNode) {
        self.navigations.insert(node, Navigation { url: url.into(), root });
    }

    /// Clicking `node` fails with a navigation error carrying `reason`
    pub fn fail_click(&mut self, node: NodeId, reason: impl Into<String>) {
        self.failing_clicks.insert(node, reason.into());
    }

    pub fn url(&self) -> &str {
        &self.url
    }

    /// Current value of an input: the last value set, else its `value` attribute
    pub fn value(&self, node: NodeId) -> Option<&str> {
        self.values
            .get(&node)
            .map(String::as_str)
            .or_else(|| self.dom.element(node).and_then(|e| e.attribute("value")))
    }

    pub fn is_checked(&self, node: NodeId) -> bool {
        self.checked.contains(&node)
    }

    /// Selected option indices of a select, in the order they were selected
    pub fn selected_indices(&self, select: NodeId) -> Vec<usize> {
        match self.selected.get(&select) {
            Some(indices) => indices.clone(),
            None => self
                .select_options(select)
                .into_iter()
                .filter(|o| {
                    self.dom
                        .element(o.node)
                        .is_some_and(|e| e.attribute("selected").is_some())
                })
                .map(|o| o.index)
                .collect(),
        }
    }

    /// Displayed texts of the selected options
    pub fn selected_texts(&self, select: NodeId) -> Vec<String> {
        let options = self.select_options(select);
        self.selected_indices(select)
            .into_iter()
            .filter_map(|i| options.get(i).map(|o| o.text.clone()))
            .collect()
    }

    /// All mutations performed so far, across navigations
    pub fn events(&self) -> &[PageEvent] {
        &self.events
    }

    pub fn click_count(&self, node: NodeId) -> usize {
        self.events
            .iter()
            .filter(|e| matches!(e, PageEvent::Click { node: n } if *n == node))
            .count()
    }

    fn toggle_checked(&mut self, node: NodeId) {
        let Some(element) = self.dom.element(node) else {
            return;
        };
        if element.node_name() != "input" {
            return;
        }
        match element.attribute("type").map(str::to_ascii_lowercase).as_deref() {
            Some("checkbox") => {
                if !self.checked.remove(&node) {
                    self.checked.insert(node);
                }
            }
            Some("radio") => {
                let group = element.attribute("name").map(str::to_string);
                let peers: Vec<NodeId> = self
                    .dom
                    .elements()
                    .filter(|e| e.node_name() == "input" && e.attribute("name").map(str::to_string) == group)
                    .map(|e| e.id())
                    .collect();
                for peer in peers {
                    self.checked.remove(&peer);
                }
                self.checked.insert(node);
            }
            _ => {}
        }
    }
}

impl PageModel for MemoryPage {
    fn dom(&self) -> &DomTree {
        &self.dom
    }

    fn set_value(&mut self, node: NodeId, value: &str) -> Result<()> {
        self.dom.require(node)?;
        self.values.insert(node, value.to_string());
        self.events.push(PageEvent::SetValue {
            node,
            value: value.to_string(),
        });
        Ok(())
    }

    fn click(&mut self, node: NodeId) -> Result<PageTransition> {
        self.dom.require(node)?;
        if let Some(reason) = self.failing_clicks.get(&node) {
            return Err(ActionError::NavigationFailed(reason.clone()));
        }

        self.events.push(PageEvent::Click { node });

        match self.navigations.remove(&node) {
            Some(navigation) => {
                log::info!("Navigated from {} to {}", self.url, navigation.url);
                self.url = navigation.url;
                self.dom = DomTree::new(navigation.root);
                self.values.clear();
                self.checked.clear();
                self.selected.clear();
                self.navigations.clear();
                self.failing_clicks.clear();
                Ok(PageTransition::Navigated)
            }
            None => {
                self.toggle_checked(node);
                Ok(PageTransition::Stayed)
            }
        }
    }

    fn set_selected(&mut self, select: NodeId, indices: &[usize]) -> Result<()> {
        let element = self.dom.require(select)?;
        let multiple = element.attribute("multiple").is_some();
        let option_count = self.select_options(select).len();

        if let Some(&bad) = indices.iter().find(|&&i| i >= option_count) {
            return Err(ActionError::ElementNotFound(format!(
                "Select {} has no option at index {}",
                select, bad
            )));
        }

        let mut current = self.selected_indices(select);
        for &index in indices {
            if multiple {
                if !current.contains(&index) {
                    current.push(index);
                }
            } else {
                current = vec![index];
            }
        }
        self.selected.insert(select, current);
        self.events.push(PageEvent::Select {
            node: select,
            indices: indices.to_vec(),
        });
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn form() -> ElementNode {
        ElementNode::new("html").with_child(
            ElementNode::new("form")
                .with_child(ElementNode::input("text").with_attribute("value", "initial"))
                .with_child(ElementNode::input("checkbox"))
                .with_child(ElementNode::input("radio").with_attribute("name", "size"))
                .with_child(ElementNode::input("radio").with_attribute("name", "size"))
                .with_child(ElementNode::select(["S", "M", "L"]).with_attribute("multiple", ""))
                .with_child(ElementNode::select(["A", "B"]))
                .with_child(ElementNode::input("submit")),
        )
    }

    // ids: html 0, form 1, text 2, checkbox 3, radio 4, radio 5,
    // multi-select 6 (options 7..=9), single select 10 (options 11, 12), submit 13

    #[test]
    fn test_set_value() {
        let mut page = MemoryPage::new("https://example.com", form());
        assert_eq!(page.value(2), Some("initial"));

        page.set_value(2, "hello").unwrap();

        assert_eq!(page.value(2), Some("hello"));
        assert_eq!(page.events(), &[PageEvent::SetValue { node: 2, value: "hello".into() }]);
    }

    #[test]
    fn test_checkbox_toggles_and_radio_groups() {
        let mut page = MemoryPage::new("https://example.com", form());

        page.click(3).unwrap();
        assert!(page.is_checked(3));
        page.click(3).unwrap();
        assert!(!page.is_checked(3));

        page.click(4).unwrap();
        page.click(5).unwrap();
        assert!(!page.is_checked(4));
        assert!(page.is_checked(5));
        assert_eq!(page.click_count(3), 2);
    }

    #[test]
    fn test_multi_and_single_select() {
        let mut page = MemoryPage::new("https://example.com", form());

        page.set_selected(6, &[2, 0]).unwrap();
        assert_eq!(page.selected_texts(6), vec!["L", "S"]);

        page.set_selected(10, &[0, 1]).unwrap();
        assert_eq!(page.selected_indices(10), vec![1]);
    }

    #[test]
    fn test_select_out_of_range() {
        let mut page = MemoryPage::new("https://example.com", form());

        assert!(page.set_selected(10, &[2]).is_err());
        assert!(page.events().is_empty());
    }

    #[test]
    fn test_initially_selected_option() {
        let select = ElementNode::new("select")
            .with_child(ElementNode::new("option").with_text("One"))
            .with_child(ElementNode::new("option").with_text("Two").with_attribute("selected", ""));
        let page = MemoryPage::new("about:blank", ElementNode::new("html").with_child(select));

        assert_eq!(page.selected_texts(1), vec!["Two"]);
    }

    #[test]
    fn test_scripted_navigation() {
        let mut page = MemoryPage::new("https://example.com/form", form());
        page.set_value(2, "query").unwrap();
        page.navigate_on_click(13, "https://example.com/results", ElementNode::new("html").with_child(ElementNode::new("table")));

        let transition = page.click(13).unwrap();

        assert_eq!(transition, PageTransition::Navigated);
        assert_eq!(page.url(), "https://example.com/results");
        assert_eq!(page.dom().len(), 2);
        assert_eq!(page.value(2), None);
        assert_eq!(page.events().len(), 2);
    }

    #[test]
    fn test_failing_click_leaves_page_untouched() {
        let mut page = MemoryPage::new("https://example.com", form());
        page.fail_click(13, "connection reset");

        let err = page.click(13).unwrap_err();

        assert!(matches!(err, ActionError::NavigationFailed(ref r) if r == "connection reset"));
        assert!(page.events().is_empty());
        assert_eq!(page.url(), "https://example.com");
    }

    #[test]
    fn test_unknown_node() {
        let mut page = MemoryPage::new("about:blank", ElementNode::new("html"));
        assert!(matches!(page.click(9), Err(ActionError::ElementNotFound(_))));
    }
}
