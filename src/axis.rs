//! Node-name and attribute-equality predicates for additional axis navigation

use crate::dom::ElementRef;
use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

/// Required node name plus required attribute values, all lower-cased on construction
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "RawAxisNavigator")]
pub struct AdditionalAxisNavigator {
    node_type: String,
    attributes: IndexMap<String, String>,
}

impl AdditionalAxisNavigator {
    pub fn new(node_type: impl AsRef<str>) -> Self {
        Self {
            node_type: node_type.as_ref().to_ascii_lowercase(),
            attributes: IndexMap::new(),
        }
    }

    /// Builder method: require `name` to equal `value` (compared lower-cased)
    pub fn with_attribute(mut self, name: impl AsRef<str>, value: impl AsRef<str>) -> Self {
        self.attributes.insert(
            name.as_ref().to_ascii_lowercase(),
            value.as_ref().to_ascii_lowercase(),
        );
        self
    }

    pub fn node_type(&self) -> &str {
        &self.node_type
    }

    /// Required attribute names, in declaration order
    pub fn attribute_keys(&self) -> impl Iterator<Item = &str> {
        self.attributes.keys().map(String::as_str)
    }

    pub fn attribute_value(&self, name: &str) -> Option<&str> {
        self.attributes.get(name).map(String::as_str)
    }
}

#[derive(Deserialize)]
struct RawAxisNavigator {
    node_type: String,

    #[serde(default)]
    attributes: IndexMap<String, String>,
}

impl From<RawAxisNavigator> for AdditionalAxisNavigator {
    fn from(raw: RawAxisNavigator) -> Self {
        raw.attributes
            .iter()
            .fold(Self::new(&raw.node_type), |navigator, (name, value)| {
                navigator.with_attribute(name, value)
            })
    }
}

/// Whether `element` has the navigator's node name and every required attribute value
pub fn node_satisfies_axis(element: ElementRef<'_>, navigator: &AdditionalAxisNavigator) -> bool {
    if element.node_name() != navigator.node_type() {
        return false;
    }

    navigator.attributes.iter().all(|(name, required)| {
        element
            .attribute(name)
            .is_some_and(|actual| actual.to_ascii_lowercase() == *required)
    })
}
