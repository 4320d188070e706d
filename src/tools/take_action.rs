use crate::action::{Action, ActionExpression};
use crate::error::Result;
use crate::page::PageModel;
use crate::tools::{Tool, ToolContext, ToolResult};
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

/// Parameters for the take_action tool
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema)]
pub struct TakeActionParams {
    /// CSS selector of the element to act on
    pub selector: String,

    /// Action expression, e.g. `click`, `{"Oxford" wait=500}`, `{2; 3 @rank /}`
    pub action: String,
}

/// Applies an action expression to an element of the current page
#[derive(Default)]
pub struct TakeActionTool;

impl Tool for TakeActionTool {
    type Params = TakeActionParams;

    fn name(&self) -> &str {
        "take_action"
    }

    fn execute_typed(&self, params: TakeActionParams, context: &mut ToolContext) -> Result<ToolResult> {
        let action = ActionExpression::parse(&params.action)?;
        let engine = context.engine.clone();

        let page = context.page()?;
        let node = page.find(&params.selector)?;
        let outcome = engine.execute(&mut *page, node, &action)?;

        Ok(ToolResult::success_with(serde_json::json!({
            "selector": params.selector,
            "action": action.to_string(),
            "field_type": outcome.field_type,
            "navigated": outcome.navigated(),
            "absolute": action.is_absolute_action(),
            "attribute": outcome.attribute,
            "url": page.url(),
            "elements": page.dom().len()
        })))
    }
}
