//! Decoded function calls and their render-friendly projection.
//!
//! `DecodedCall` is what the pipeline hands to renderers. Renderers that
//! only want display strings use [`DecodedCall::render`].

use serde::{Deserialize, Serialize};

use crate::{selector::Selector, signature::Signature, types::DecodedValue, types::ParamType};

/// Marker that replaces array values in rendered output.
pub const ARRAY_MARKER: &str = "[]";

/// Result of decoding a function call's calldata.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DecodedCall {
    /// First 4 bytes of the calldata.
    pub selector: Selector,
    /// The signature the arguments were decoded against.
    pub signature: Signature,
    /// `(parameter index, value)` in declaration order.
    pub arguments: Vec<(usize, DecodedValue)>,
    /// Every signature text the registry knows for `selector`, in registry
    /// order. Empty when the caller supplied the signature directly.
    #[serde(default)]
    pub candidates: Vec<String>,
}

/// More than one signature is registered for a selector.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AmbiguousSelector {
    pub selector: Selector,
    /// The candidate the pipeline decoded with.
    pub chosen: String,
    pub candidates: Vec<String>,
}

impl DecodedCall {
    pub fn function_name(&self) -> &str {
        &self.signature.name
    }

    /// Look up a decoded argument by position.
    pub fn argument(&self, index: usize) -> Option<&DecodedValue> {
        self.arguments
            .iter()
            .find(|(i, _)| *i == index)
            .map(|(_, v)| v)
    }

    /// Look up a decoded argument by the name given in the signature text.
    pub fn named(&self, name: &str) -> Option<&DecodedValue> {
        let index = self
            .signature
            .param_names
            .iter()
            .position(|n| n.as_deref() == Some(name))?;
        self.argument(index)
    }

    /// Returns the collision details if the selector had several candidates.
    pub fn ambiguity(&self) -> Option<AmbiguousSelector> {
        if self.candidates.len() < 2 {
            return None;
        }
        Some(AmbiguousSelector {
            selector: self.selector,
            chosen: self.signature.canonical(),
            candidates: self.candidates.clone(),
        })
    }

    /// Per-parameter declared type, position and display value.
    pub fn render(&self) -> Vec<RenderedParam> {
        self.arguments
            .iter()
            .map(|(index, value)| {
                let declared_type = self
                    .signature
                    .parameters
                    .get(*index)
                    .map(ParamType::to_string)
                    .unwrap_or_else(|| value.param_type().to_string());
                RenderedParam {
                    index: index + 1,
                    binding: binding_name(&declared_type, index + 1),
                    value: render_value(value),
                    declared_type,
                }
            })
            .collect()
    }
}

/// One argument projected to scalar strings for templates and HTML.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RenderedParam {
    /// 1-based position.
    pub index: usize,
    /// Canonical type text, e.g. `uint256` or `(address,bool)[]`.
    pub declared_type: String,
    /// Variable name a template binds the value to.
    pub binding: String,
    pub value: String,
}

impl RenderedParam {
    /// `string` and `address` values are emitted as quoted literals.
    pub fn is_quoted(&self) -> bool {
        matches!(self.declared_type.as_str(), "string" | "address")
    }
}

/// `param_<type>_<position>`, with characters that cannot appear in an
/// identifier (brackets, parentheses, commas) replaced by `_`.
fn binding_name(declared_type: &str, position: usize) -> String {
    let ty: String = declared_type
        .chars()
        .map(|c| if c.is_ascii_alphanumeric() { c } else { '_' })
        .collect();
    format!("param_{ty}_{position}")
}

/// Integers as decimal, addresses checksummed, bytes as `0x` hex; arrays
/// collapse to [`ARRAY_MARKER`].
pub fn render_value(value: &DecodedValue) -> String {
    match value {
        DecodedValue::FixedArray { .. } | DecodedValue::Array { .. } => ARRAY_MARKER.to_string(),
        DecodedValue::Tuple(values) => {
            let parts: Vec<_> = values.iter().map(render_value).collect();
            format!("({})", parts.join(", "))
        }
        other => other.to_string(),
    }
}
