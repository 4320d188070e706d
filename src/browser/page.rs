use crate::browser::config::PageOptions;
use crate::dom::{DomTree, NodeId};
use crate::error::{ActionError, Result};
use crate::field::FieldType;
use crate::page::{PageModel, PageTransition};
use headless_chrome::{Element, Tab};
use serde_json::json;
use std::sync::Arc;

const SET_VALUE_JS: &str = r#"
    function(value) {
        this.value = value;
        this.dispatchEvent(new Event('input', { bubbles: true }));
        this.dispatchEvent(new Event('change', { bubbles: true }));
    }
"#;

const SET_SELECTED_JS: &str = r#"
    function(indices) {
        for (const i of indices) {
            const option = this.options[i];
            if (!option) {
                continue;
            }
            if (this.multiple) {
                option.selected = true;
            } else {
                this.selectedIndex = i;
            }
        }
        this.dispatchEvent(new Event('change', { bubbles: true }));
    }
"#;

const MARK_DOCUMENT_JS: &str = "window.__oxpathDocument = true";

const DOCUMENT_MARKED_JS: &str = "window.__oxpathDocument === true";

/// Live page in a Chrome tab.
///
/// Reads go to a DOM snapshot taken when the page is created and after every navigation.
/// Node ids are document-order positions, so they match `document.querySelectorAll('*')`.
pub struct ChromePage {
    tab: Arc<Tab>,
    dom: DomTree,
    options: PageOptions,
}

impl ChromePage {
    /// Snapshot the document currently loaded in `tab`
    pub fn new(tab: Arc<Tab>, options: PageOptions) -> Result<Self> {
        tab.set_default_timeout(options.navigation_timeout);
        let dom = DomTree::from_tab(&tab)?;
        log::debug!("Snapshot of {} has {} elements", tab.get_url(), dom.len());
        Ok(Self { tab, dom, options })
    }

    pub fn tab(&self) -> &Arc<Tab> {
        &self.tab
    }

    pub fn url(&self) -> String {
        self.tab.get_url()
    }

    /// Take a fresh snapshot of the current document
    pub fn refresh(&mut self) -> Result<()> {
        self.dom = DomTree::from_tab(&self.tab)?;
        Ok(())
    }

    /// Node id of the first element matching `css_selector`
    pub fn find(&self, css_selector: &str) -> Result<NodeId> {
        let selector = serde_json::to_string(css_selector)
            .map_err(|e| ActionError::InvalidArgument(format!("Bad selector '{}': {}", css_selector, e)))?;
        let js = format!(
            "(function() {{ \
                const el = document.querySelector({}); \
                return el ? Array.prototype.indexOf.call(document.querySelectorAll('*'), el) : -1; \
            }})()",
            selector
        );

        let result = self
            .tab
            .evaluate(&js, false)
            .map_err(|e| ActionError::EvaluationFailed(format!("Failed to resolve '{}': {}", css_selector, e)))?;

        let position = result.value.and_then(|v| v.as_i64()).unwrap_or(-1);
        match usize::try_from(position) {
            Ok(node) if node < self.dom.len() => Ok(node),
            _ => Err(ActionError::ElementNotFound(format!(
                "No element matches '{}' in the current snapshot",
                css_selector
            ))),
        }
    }

    fn element(&self, node: NodeId) -> Result<Element<'_>> {
        let selector = self
            .dom
            .get_selector(node)
            .ok_or_else(|| ActionError::ElementNotFound(format!("No element with id {}", node)))?;

        self.tab.find_element(selector.best_selector()).map_err(|e| {
            ActionError::ElementNotFound(format!("Element '{}' not found: {}", selector.best_selector(), e))
        })
    }

    fn document_replaced(&self, url_before: &str) -> bool {
        // a fragment-only change keeps the document; the marker decides
        if without_fragment(&self.tab.get_url()) != without_fragment(url_before) {
            return true;
        }
        match self.tab.evaluate(DOCUMENT_MARKED_JS, false) {
            Ok(result) => !result.value.and_then(|v| v.as_bool()).unwrap_or(false),
            // the execution context is torn down while the old document unloads
            Err(_) => true,
        }
    }
}

impl PageModel for ChromePage {
    fn dom(&self) -> &DomTree {
        &self.dom
    }

    fn set_value(&mut self, node: NodeId, value: &str) -> Result<()> {
        let is_file = self
            .dom
            .element(node)
            .and_then(|e| FieldType::classify(e).ok())
            == Some(FieldType::InputFile);

        let element = self.element(node)?;
        if is_file {
            element
                .set_input_files(&[value])
                .map_err(|e| ActionError::EvaluationFailed(format!("Failed to set file on {}: {}", node, e)))?;
        } else {
            element
                .call_js_fn(SET_VALUE_JS, vec![json!(value)], false)
                .map_err(|e| ActionError::EvaluationFailed(format!("Failed to set value on {}: {}", node, e)))?;
        }
        Ok(())
    }

    fn click(&mut self, node: NodeId) -> Result<PageTransition> {
        let url_before = self.tab.get_url();
        self.tab
            .evaluate(MARK_DOCUMENT_JS, false)
            .map_err(|e| ActionError::EvaluationFailed(e.to_string()))?;

        self.element(node)?
            .click()
            .map_err(|e| ActionError::NavigationFailed(format!("Click on {} failed: {}", node, e)))?;

        std::thread::sleep(self.options.settle_delay);

        if !self.document_replaced(&url_before) {
            return Ok(PageTransition::Stayed);
        }

        self.tab
            .wait_until_navigated()
            .map_err(|e| ActionError::NavigationFailed(format!("Navigation after click did not finish: {}", e)))?;
        self.refresh()?;
        log::info!("Navigated from {} to {}", url_before, self.tab.get_url());
        Ok(PageTransition::Navigated)
    }

    fn set_selected(&mut self, select: NodeId, indices: &[usize]) -> Result<()> {
        self.element(select)?
            .call_js_fn(SET_SELECTED_JS, vec![json!(indices)], false)
            .map_err(|e| ActionError::EvaluationFailed(format!("Failed to select options on {}: {}", select, e)))?;
        Ok(())
    }
}

fn without_fragment(url: &str) -> &str {
    url.split_once('#').map_or(url, |(base, _)| base)
}
