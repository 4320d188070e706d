//! Classification of DOM elements into interactive field types

use crate::dom::ElementRef;
use crate::error::{ActionError, Result};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Interaction category of a DOM element
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FieldType {
    Text,
    Password,
    Checkbox,
    RadioButton,
    InputButton,
    InputFile,
    InputImage,
    InputSubmit,
    InputReset,
    TextArea,
    Select,
    Button,
    Href,
    /// Anything else, typically driven by a script click handler
    Clickable,
}

impl FieldType {
    /// Determine the field type of `element`.
    ///
    /// Fails with a precondition violation when the node has no name, or when an
    /// `<input>` carries no `type` attribute or a type outside the recognised set.
    pub fn classify(element: ElementRef<'_>) -> Result<FieldType> {
        let node_name = element.node_name();
        if node_name.is_empty() {
            return Err(ActionError::Precondition(format!(
                "Element {} has no readable node name",
                element.id()
            )));
        }

        let field_type = match node_name {
            "input" => {
                let input_type = element.attribute("type").ok_or_else(|| {
                    ActionError::Precondition("Input node must have a type attribute".to_string())
                })?;
                Self::from_input_type(input_type).ok_or_else(|| {
                    ActionError::Precondition(format!("Unsupported input type '{}'", input_type))
                })?
            }
            "textarea" => FieldType::TextArea,
            "select" => FieldType::Select,
            "button" => FieldType::Button,
            "a" => FieldType::Href,
            _ => FieldType::Clickable,
        };

        log::debug!("Classified {:?} as {}", element, field_type);
        Ok(field_type)
    }

    /// Map an `<input type="...">` value to its field type
    pub fn from_input_type(input_type: &str) -> Option<FieldType> {
        match input_type.trim().to_ascii_lowercase().as_str() {
            "text" => Some(FieldType::Text),
            "password" => Some(FieldType::Password),
            "checkbox" => Some(FieldType::Checkbox),
            "radio" => Some(FieldType::RadioButton),
            "button" => Some(FieldType::InputButton),
            "file" => Some(FieldType::InputFile),
            "image" => Some(FieldType::InputImage),
            "submit" => Some(FieldType::InputSubmit),
            "reset" => Some(FieldType::InputReset),
            _ => None,
        }
    }

    /// Fields whose only accepted action is setting a literal value
    pub fn takes_value(&self) -> bool {
        matches!(
            self,
            FieldType::Text | FieldType::Password | FieldType::TextArea | FieldType::InputFile
        )
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            FieldType::Text => "text",
            FieldType::Password => "password",
            FieldType::Checkbox => "checkbox",
            FieldType::RadioButton => "radio_button",
            FieldType::InputButton => "input_button",
            FieldType::InputFile => "input_file",
            FieldType::InputImage => "input_image",
            FieldType::InputSubmit => "input_submit",
            FieldType::InputReset => "input_reset",
            FieldType::TextArea => "text_area",
            FieldType::Select => "select",
            FieldType::Button => "button",
            FieldType::Href => "href",
            FieldType::Clickable => "clickable",
        }
    }
}

impl fmt::Display for FieldType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dom::{DomTree, ElementNode};

    fn classify(node: ElementNode) -> Result<FieldType> {
        let tree = DomTree::new(node);
        FieldType::classify(tree.root())
    }

    #[test]
    fn test_input_types() {
        let cases = [
            ("text", FieldType::Text),
            ("password", FieldType::Password),
            ("checkbox", FieldType::Checkbox),
            ("radio", FieldType::RadioButton),
            ("button", FieldType::InputButton),
            ("file", FieldType::InputFile),
            ("image", FieldType::InputImage),
            ("submit", FieldType::InputSubmit),
            ("reset", FieldType::InputReset),
        ];

        for (input_type, expected) in cases {
            assert_eq!(classify(ElementNode::input(input_type)).unwrap(), expected, "type={}", input_type);
        }
    }

    #[test]
    fn test_input_type_is_case_insensitive() {
        assert_eq!(classify(ElementNode::input("CheckBox")).unwrap(), FieldType::Checkbox);
        assert_eq!(classify(ElementNode::new("INPUT").with_attribute("TYPE", "Submit")).unwrap(), FieldType::InputSubmit);
    }

    #[test]
    fn test_non_input_elements() {
        assert_eq!(classify(ElementNode::new("textarea")).unwrap(), FieldType::TextArea);
        assert_eq!(classify(ElementNode::new("select")).unwrap(), FieldType::Select);
        assert_eq!(classify(ElementNode::new("button")).unwrap(), FieldType::Button);
        assert_eq!(classify(ElementNode::new("a")).unwrap(), FieldType::Href);
        assert_eq!(classify(ElementNode::new("div").with_attribute("onclick", "go()")).unwrap(), FieldType::Clickable);
        assert_eq!(classify(ElementNode::new("span")).unwrap(), FieldType::Clickable);
    }

    #[test]
    fn test_input_without_type_is_precondition_violation() {
        let err = classify(ElementNode::new("input")).unwrap_err();
        assert!(err.is_precondition());
    }

    #[test]
    fn test_unknown_input_type_is_rejected() {
        let err = classify(ElementNode::input("color")).unwrap_err();
        assert!(err.is_precondition());
    }

    #[test]
    fn test_missing_node_name() {
        let err = classify(ElementNode::new("")).unwrap_err();
        assert!(err.is_precondition());
    }

    #[test]
    fn test_takes_value() {
        assert!(FieldType::Text.takes_value());
        assert!(FieldType::InputFile.takes_value());
        assert!(!FieldType::Select.takes_value());
        assert!(!FieldType::Href.takes_value());
    }

    #[test]
    fn test_serialization() {
        assert_eq!(serde_json::to_string(&FieldType::RadioButton).unwrap(), "\"radio_button\"");
        let parsed: FieldType = serde_json::from_str("\"input_submit\"").unwrap();
        assert_eq!(parsed, FieldType::InputSubmit);
        assert_eq!(FieldType::TextArea.to_string(), "text_area");
    }
}
