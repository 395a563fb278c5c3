use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Class of design-token violation
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "kebab-case")]
pub enum ViolationKind {
    /// Lowercase HTML element rendered outside a primitive file
    RawHtml,
    /// Literal px/hex/rgb/hsl value inside `style={{...}}`
    InlineStyle,
    /// `className` literal without the token prefix
    CustomClass,
}

impl ViolationKind {
    /// All kinds, in report order
    pub const ALL: [Self; 3] = [Self::RawHtml, Self::InlineStyle, Self::CustomClass];

    pub fn as_str(self) -> &'static str {
        match self {
            Self::RawHtml => "raw-html",
            Self::InlineStyle => "inline-style",
            Self::CustomClass => "custom-class",
        }
    }

    /// Human-readable group heading
    pub fn title(self) -> &'static str {
        match self {
            Self::RawHtml => "Raw HTML elements",
            Self::InlineStyle => "Inline styles with literal values",
            Self::CustomClass => "Custom class names",
        }
    }
}

impl fmt::Display for ViolationKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ViolationKind {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|k| k.as_str() == s)
            .ok_or_else(|| format!("Unknown violation type '{}'", s))
    }
}

/// A single finding from the design-token scanner
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct DesignTokenViolation {
    /// File path, relative to the scan working directory
    pub file: String,
    /// Line number (1-indexed)
    pub line: usize,
    #[serde(rename = "type")]
    pub kind: ViolationKind,
    /// Offending element for raw-html violations
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub element: Option<String>,
    /// Offending class for custom-class violations
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub class_name: Option<String>,
    /// Trimmed source line
    pub content: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_kind_round_trips_through_str() {
        for kind in ViolationKind::ALL {
            assert_eq!(kind.to_string().parse::<ViolationKind>(), Ok(kind));
        }
        assert!("raw_html".parse::<ViolationKind>().is_err());
    }

    #[test]
    fn test_violation_json_shape() {
        let violation = DesignTokenViolation {
            file: "src/Card.tsx".into(),
            line: 12,
            kind: ViolationKind::CustomClass,
            element: None,
            class_name: Some("card".into()),
            content: "<Box className=\"card\">".into(),
        };
        let value = serde_json::to_value(&violation).unwrap();
        assert_eq!(value["type"], "custom-class");
        assert_eq!(value["className"], "card");
        assert!(value.get("element").is_none());
    }
}
