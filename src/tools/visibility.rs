use crate::error::Result;
use crate::page::PageModel;
use crate::tools::{Tool, ToolContext, ToolResult};
use crate::visibility::{is_visible, own_hiding};
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

/// Parameters for the check_visibility tool
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema)]
pub struct CheckVisibilityParams {
    /// CSS selector of the element to check
    pub selector: String,
}

/// Reports whether an element is hidden by its own or an ancestor's inline style
#[derive(Default)]
pub struct CheckVisibilityTool;

impl Tool for CheckVisibilityTool {
    type Params = CheckVisibilityParams;

    fn name(&self) -> &str {
        "check_visibility"
    }

    fn execute_typed(&self, params: CheckVisibilityParams, context: &mut ToolContext) -> Result<ToolResult> {
        let page = context.page()?;
        let node = page.find(&params.selector)?;
        let element = page.dom().require(node)?;

        let visible = is_visible(element);
        let hidden_by = element.ancestors_or_self().find_map(|e| {
            own_hiding(e).map(|hidden| {
                serde_json::json!({
                    "tag": e.node_name(),
                    "selector": page.dom().get_selector(e.id()).map(|s| s.css_selector.clone()),
                    "declaration": format!("{}: {}", hidden.property(), hidden.value())
                })
            })
        });

        Ok(ToolResult::success_with(serde_json::json!({
            "selector": params.selector,
            "tag": element.node_name(),
            "visible": visible,
            "hidden_by": hidden_by
        })))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_params() {
        let params: CheckVisibilityParams =
            serde_json::from_value(serde_json::json!({ "selector": "form > input" })).unwrap();
        assert_eq!(params.selector, "form > input");
    }

    #[test]
    fn test_tool_metadata() {
        let tool = CheckVisibilityTool;
        assert_eq!(tool.name(), "check_visibility");
        assert!(tool.parameters_schema().is_object());
    }
}
