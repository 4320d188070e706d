//! Action dispatch
//!
//! Every dispatch first resolves the field type and term into a single [`Operation`], so a
//! mismatch is reported before the page sees any call. The operation is then applied with
//! exactly one page mutation.

use crate::action::{Action, ActionTerm, ActionType, ActionValues};
use crate::dom::NodeId;
use crate::error::{ActionError, Result};
use crate::field::FieldType;
use crate::page::{PageModel, PageTransition};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::time::Duration;

/// Default upper bound for post-action waits
pub const DEFAULT_MAX_WAIT: Duration = Duration::from_secs(60);

/// Attribute annotation captured from the dispatched term
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CapturedAttribute {
    pub name: String,
    /// Sub-action values joined with `"; "`
    pub value: String,
}

/// Result of one dispatch
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ActionOutcome {
    pub field_type: FieldType,
    pub transition: PageTransition,
    pub attribute: Option<CapturedAttribute>,
}

impl ActionOutcome {
    pub fn navigated(&self) -> bool {
        self.transition.navigated()
    }

    pub fn has_attribute(&self) -> bool {
        self.attribute.is_some()
    }

    /// Captured attribute name, empty when the term had no annotation
    pub fn last_attribute_name(&self) -> &str {
        self.attribute.as_ref().map_or("", |a| a.name.as_str())
    }

    /// Captured attribute value, empty when the term had no annotation
    pub fn last_attribute_value(&self) -> &str {
        self.attribute.as_ref().map_or("", |a| a.value.as_str())
    }
}

/// Validated page mutation
#[derive(Debug, PartialEq, Eq)]
enum Operation {
    SetValue(String),
    Click,
    /// 0-based option indices, in the order written
    Select(Vec<usize>),
}

/// Applies action terms to page elements
#[derive(Debug, Clone)]
pub struct ActionEngine {
    max_wait: Duration,
}

impl Default for ActionEngine {
    fn default() -> Self {
        Self {
            max_wait: DEFAULT_MAX_WAIT,
        }
    }
}

impl ActionEngine {
    pub fn new() -> Self {
        Self::default()
    }

    /// Cap applied to post-action waits requested by actions
    pub fn with_max_wait(mut self, max_wait: Duration) -> Self {
        self.max_wait = max_wait;
        self
    }

    pub fn max_wait(&self) -> Duration {
        self.max_wait
    }

    /// Parse `token` and apply it to `context`, already classified as `field`
    pub fn take_action<P: PageModel + ?Sized>(
        &self,
        page: &mut P,
        context: NodeId,
        field: FieldType,
        token: &str,
    ) -> Result<ActionOutcome> {
        let term = ActionTerm::parse(token)?;
        self.take_action_term(page, context, field, &term)
    }

    /// Apply a parsed term to `context`, already classified as `field`.
    ///
    /// A term that does not fit the field fails with `BadData` and the page is not touched.
    /// Failures of the page call itself propagate unchanged.
    pub fn take_action_term<P: PageModel + ?Sized>(
        &self,
        page: &mut P,
        context: NodeId,
        field: FieldType,
        term: &ActionTerm,
    ) -> Result<ActionOutcome> {
        let operation = resolve(&*page, context, field, term)?;
        log::debug!("Dispatching {:?} on node {} ({}) for '{}'", operation, context, field, term);

        let transition = match operation {
            Operation::SetValue(value) => {
                page.set_value(context, &value)?;
                PageTransition::Stayed
            }
            Operation::Click => {
                let transition = page.click(context)?;
                if field == FieldType::InputImage && !transition.navigated() {
                    log::warn!("Image input {} was clicked but the page did not navigate", context);
                }
                transition
            }
            Operation::Select(indices) => {
                page.set_selected(context, &indices)?;
                PageTransition::Stayed
            }
        };

        let attribute = term.attribute_name().map(|name| CapturedAttribute {
            name: name.to_string(),
            value: term.render_values(),
        });

        Ok(ActionOutcome {
            field_type: field,
            transition,
            attribute,
        })
    }

    /// Classify `context`, dispatch `action` on it and honour the action's post-action wait
    pub fn execute<P, A>(&self, page: &mut P, context: NodeId, action: &A) -> Result<ActionOutcome>
    where
        P: PageModel + ?Sized,
        A: Action + ?Sized,
    {
        if action.action_type() == ActionType::Database {
            return Err(ActionError::Precondition(format!(
                "Database action '{}' reached the dispatch engine unresolved",
                action.value()
            )));
        }

        let field = FieldType::classify(page.dom().require(context)?)?;
        let term = ActionTerm::parse(action.value())?;
        let outcome = self.take_action_term(page, context, field, &term)?;

        if let Some(wait) = action.wait_duration() {
            let wait = if wait > self.max_wait {
                log::warn!("Wait of {:?} capped at {:?}", wait, self.max_wait);
                self.max_wait
            } else {
                wait
            };
            std::thread::sleep(wait);
        }

        Ok(outcome)
    }
}

fn resolve<P: PageModel + ?Sized>(
    page: &P,
    context: NodeId,
    field: FieldType,
    term: &ActionTerm,
) -> Result<Operation> {
    match field {
        f if f.takes_value() => match term.values() {
            ActionValues::Explicit(values) if values.len() == 1 => Ok(Operation::SetValue(values[0].clone())),
            _ => Err(improper(field, term)),
        },
        FieldType::InputSubmit => match term.action_type() {
            ActionType::Keyword => Ok(Operation::Click),
            _ => Err(improper(field, term)),
        },
        FieldType::Select => resolve_select(page, context, term),
        // every remaining field type is activated by a click
        _ => {
            if term.is_click() {
                Ok(Operation::Click)
            } else {
                Err(improper(field, term))
            }
        }
    }
}

fn resolve_select<P: PageModel + ?Sized>(page: &P, select: NodeId, term: &ActionTerm) -> Result<Operation> {
    let options = page.select_options(select);

    match term.values() {
        ActionValues::Explicit(texts) => {
            // a later option with the same text shadows earlier ones
            let by_text: HashMap<&str, usize> =
                options.iter().map(|o| (o.text.as_str(), o.index)).collect();

            let mut indices = Vec::with_capacity(texts.len());
            for text in texts {
                match by_text.get(text.as_str()) {
                    Some(&index) => indices.push(index),
                    None => log::debug!("Select {} has no option with text '{}', skipping", select, text),
                }
            }
            Ok(Operation::Select(indices))
        }
        ActionValues::Position(positions) => {
            let indices = positions
                .iter()
                .map(|&position| {
                    if position == 0 || position > options.len() {
                        Err(ActionError::bad_data(format!(
                            "Select {} has {} options, position {} is out of range",
                            select,
                            options.len(),
                            position
                        )))
                    } else {
                        Ok(position - 1)
                    }
                })
                .collect::<Result<Vec<_>>>()?;
            Ok(Operation::Select(indices))
        }
        ActionValues::Keyword(_) => Err(improper(FieldType::Select, term)),
    }
}

fn improper(field: FieldType, term: &ActionTerm) -> ActionError {
    ActionError::bad_data(format!(
        "Improper {} action '{}' for {} field",
        term.action_type(),
        term,
        field
    ))
}
