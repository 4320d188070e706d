//! Inline-style visibility evaluation
//!
//! Only an element's own `style` attribute is consulted, for the two declarations that hide an
//! element outright. Hiding is inherited: an element is visible only if neither it nor any
//! ancestor up to the document root hides itself.

use crate::dom::ElementRef;

/// Inline style declarations that hide an element
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CssHidden {
    /// `display: none`
    DisplayNone,
    /// `visibility: hidden` (space is still provisioned)
    VisibilityHidden,
}

impl CssHidden {
    pub const ALL: [CssHidden; 2] = [CssHidden::DisplayNone, CssHidden::VisibilityHidden];

    pub fn property(&self) -> &'static str {
        match self {
            CssHidden::DisplayNone => "display",
            CssHidden::VisibilityHidden => "visibility",
        }
    }

    pub fn value(&self) -> &'static str {
        match self {
            CssHidden::DisplayNone => "none",
            CssHidden::VisibilityHidden => "hidden",
        }
    }

    fn matches(&self, property: &str, value: &str) -> bool {
        property == self.property() && value == self.value()
    }
}

/// Property/value pairs of an inline style, lower-cased and trimmed.
///
/// Declarations without a value are dropped.
pub fn style_declarations(style: &str) -> impl Iterator<Item = (String, String)> + '_ {
    style.split(';').filter_map(|declaration| {
        let (property, value) = declaration.split_once(':')?;
        let property = property.trim().to_ascii_lowercase();
        let value = value.trim().to_ascii_lowercase();
        if property.is_empty() || value.is_empty() {
            return None;
        }
        Some((property, value))
    })
}

/// Which hiding declaration, if any, the element's own inline style asserts
pub fn own_hiding(element: ElementRef<'_>) -> Option<CssHidden> {
    let style = element.attribute("style")?;
    style_declarations(style).find_map(|(property, value)| {
        CssHidden::ALL
            .into_iter()
            .find(|hidden| hidden.matches(&property, &value))
    })
}

/// Whether `element` is rendered-visible.
///
/// Walks from the element up to the document root and stops at the first node whose inline
/// style hides it.
pub fn is_visible(element: ElementRef<'_>) -> bool {
    match element.ancestors_or_self().find_map(|e| own_hiding(e).map(|hidden| (e, hidden))) {
        Some((hider, hidden)) => {
            log::debug!(
                "{:?} is hidden by {}: {} on {:?}",
                element,
                hidden.property(),
                hidden.value(),
                hider
            );
            false
        }
        None => true,
    }
}
