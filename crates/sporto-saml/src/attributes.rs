//! Attribute extraction from a verified assertion.

use std::collections::BTreeMap;

use crate::types::{SamlResponse, SAML_NS};

/// Attribute name to values, in document order per attribute.
pub type AttributeMap = BTreeMap<String, Vec<String>>;

/// Collects `saml:Attribute` values from the response's assertion.
///
/// Values are the raw text content of each `saml:AttributeValue`; nothing
/// is trimmed or decoded. When two attributes share a `Name`, the one
/// appearing later in the document replaces the earlier one. Attributes
/// without a `Name` are skipped.
#[must_use]
pub fn extract_attributes(response: &SamlResponse) -> AttributeMap {
    let mut attributes = AttributeMap::new();
    let Some(assertion) = response.assertion() else {
        return attributes;
    };

    let path = [(SAML_NS, "AttributeStatement"), (SAML_NS, "Attribute")];
    for attribute in assertion.find_all(&path) {
        let Some(name) = attribute.attr("Name") else {
            tracing::debug!("skipping Attribute without Name");
            continue;
        };

        let values: Vec<String> = attribute
            .children_named(SAML_NS, "AttributeValue")
            .map(|value| value.text())
            .collect();

        if attributes.insert(name.to_string(), values).is_some() {
            tracing::debug!(name, "duplicate attribute name, keeping the later one");
        }
    }

    attributes
}
