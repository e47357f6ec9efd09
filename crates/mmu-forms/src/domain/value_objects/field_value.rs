//! Field types and field values

use serde::{Deserialize, Serialize};
use std::fmt;

/// Closed set of field-type tags a template may declare
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FieldType {
    ShortText,
    MultilineText,
    Number,
    Integer,
    Dropdown,
    Checkbox,
    Date,
    Time,
    Photo,
    Signature,
}

impl FieldType {
    pub fn is_numeric(&self) -> bool {
        matches!(self, Self::Number | Self::Integer)
    }

    pub fn is_text(&self) -> bool {
        matches!(self, Self::ShortText | Self::MultilineText)
    }

    pub fn is_attachment(&self) -> bool {
        matches!(self, Self::Photo | Self::Signature)
    }
}

/// Opaque reference to a captured photo or signature
#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct AttachmentRef(String);

impl AttachmentRef {
    pub fn new(reference: impl Into<String>) -> Self {
        Self(reference.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for AttachmentRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Dynamically-typed value held in the field value store
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", content = "value", rename_all = "snake_case")]
pub enum FieldValue {
    Text(String),
    Number(f64),
    Integer(i64),
    Boolean(bool),
    Attachment(AttachmentRef),
}

impl FieldValue {
    pub fn text(value: impl Into<String>) -> Self {
        Self::Text(value.into())
    }

    pub fn as_text(&self) -> Option<&str> {
        match self {
            Self::Text(s) => Some(s),
            _ => None,
        }
    }

    /// Numeric view of Number and Integer values
    pub fn as_number(&self) -> Option<f64> {
        match self {
            Self::Number(n) => Some(*n),
            Self::Integer(i) => Some(*i as f64),
            _ => None,
        }
    }

    pub fn as_bool(&self) -> Option<bool> {
        match self {
            Self::Boolean(b) => Some(*b),
            _ => None,
        }
    }

    /// Empty or whitespace-only text counts as no answer
    pub fn is_blank(&self) -> bool {
        matches!(self, Self::Text(s) if s.trim().is_empty())
    }

    /// Whether this value can be bound to a field of the given type
    pub fn fits(&self, field_type: FieldType) -> bool {
        match field_type {
            FieldType::ShortText
            | FieldType::MultilineText
            | FieldType::Dropdown
            | FieldType::Date
            | FieldType::Time => matches!(self, Self::Text(_)),
            FieldType::Number => matches!(self, Self::Number(_) | Self::Integer(_)),
            FieldType::Integer => matches!(self, Self::Integer(_)),
            FieldType::Checkbox => matches!(self, Self::Boolean(_)),
            FieldType::Photo | FieldType::Signature => matches!(self, Self::Attachment(_)),
        }
    }

    /// Text shown in a bound control
    pub fn display(&self) -> String {
        match self {
            Self::Text(s) => s.clone(),
            Self::Number(n) => n.to_string(),
            Self::Integer(i) => i.to_string(),
            Self::Boolean(true) => "Yes".to_string(),
            Self::Boolean(false) => "No".to_string(),
            Self::Attachment(r) => r.to_string(),
        }
    }
}

impl fmt::Display for FieldValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.display())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_display() {
        assert_eq!(FieldValue::Number(23.5).display(), "23.5");
        assert_eq!(FieldValue::Number(40.0).display(), "40");
        assert_eq!(FieldValue::Integer(-3).display(), "-3");
        assert_eq!(FieldValue::Boolean(true).display(), "Yes");
        assert_eq!(FieldValue::Attachment(AttachmentRef::new("/sdcard/p1.jpg")).display(), "/sdcard/p1.jpg");
    }

    #[test]
    fn test_fits() {
        assert!(FieldValue::text("SAT").fits(FieldType::Dropdown));
        assert!(FieldValue::Integer(3).fits(FieldType::Number));
        assert!(!FieldValue::Number(3.5).fits(FieldType::Integer));
        assert!(!FieldValue::text("yes").fits(FieldType::Checkbox));
        assert!(FieldValue::Attachment(AttachmentRef::new("sig.png")).fits(FieldType::Signature));
    }

    #[test]
    fn test_blank() {
        assert!(FieldValue::text("   ").is_blank());
        assert!(!FieldValue::text("ok").is_blank());
        assert!(!FieldValue::Boolean(false).is_blank());
    }

    #[test]
    fn test_tagged_serialization() {
        let json = serde_json::to_value(FieldValue::Number(23.5)).unwrap();
        assert_eq!(json, serde_json::json!({ "type": "number", "value": 23.5 }));
    }
}
