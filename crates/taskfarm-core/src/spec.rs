use crate::{Priority, Result, TaskError};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// A single kind-specific parameter value.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum FieldValue {
    Int(i64),
    Float(f64),
    Text(String),
}

impl FieldValue {
    pub fn as_i64(&self) -> Option<i64> {
        match self {
            FieldValue::Int(v) => Some(*v),
            _ => None,
        }
    }

    pub fn as_f64(&self) -> Option<f64> {
        match self {
            FieldValue::Float(v) => Some(*v),
            FieldValue::Int(v) => Some(*v as f64),
            _ => None,
        }
    }

    pub fn as_str(&self) -> Option<&str> {
        match self {
            FieldValue::Text(v) => Some(v),
            _ => None,
        }
    }
}

/// Kind-specific parameters. A BTreeMap keeps field order deterministic
/// on the wire.
pub type FieldMap = BTreeMap<String, FieldValue>;

/// Immutable description of one work unit. Created once at startup,
/// serialized across the transport boundary when dispatched, never
/// persisted beyond process lifetime.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TaskSpec {
    /// Tag identifying the work-unit variant.
    pub kind: String,

    /// Free-form label, not required to be unique.
    pub name: String,

    pub priority: Priority,

    /// Kind-specific parameters.
    pub fields: FieldMap,
}

impl TaskSpec {
    pub fn new(
        kind: impl Into<String>,
        name: impl Into<String>,
        priority: Priority,
        fields: FieldMap,
    ) -> Self {
        TaskSpec {
            kind: kind.into(),
            name: name.into(),
            priority,
            fields,
        }
    }

    /// Serialize the spec for transport.
    pub fn to_bytes(&self) -> Result<Vec<u8>> {
        bincode::serialize(self).map_err(TaskError::from)
    }

    /// Deserialize a spec received over the transport.
    pub fn from_bytes(bytes: &[u8]) -> Result<Self> {
        bincode::deserialize(bytes).map_err(TaskError::from)
    }

    /// Look up an integer field, failing on absence or a mismatched type.
    pub fn field_i64(&self, field: &'static str) -> Result<i64> {
        let value = self.fields.get(field).ok_or_else(|| TaskError::MissingField {
            kind: self.kind.clone(),
            field,
        })?;
        value.as_i64().ok_or_else(|| TaskError::FieldType {
            kind: self.kind.clone(),
            field,
        })
    }

    pub fn field_f64(&self, field: &'static str) -> Result<f64> {
        let value = self.fields.get(field).ok_or_else(|| TaskError::MissingField {
            kind: self.kind.clone(),
            field,
        })?;
        value.as_f64().ok_or_else(|| TaskError::FieldType {
            kind: self.kind.clone(),
            field,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn spec_with(fields: FieldMap) -> TaskSpec {
        TaskSpec::new("test_kind", "t1", Priority::Medium, fields)
    }

    #[test]
    fn test_serialization_roundtrip() {
        let mut fields = FieldMap::new();
        fields.insert("epochs".to_string(), FieldValue::Int(50));
        fields.insert("rate".to_string(), FieldValue::Float(0.01));
        fields.insert("note".to_string(), FieldValue::Text("x".to_string()));
        let spec = spec_with(fields);

        let bytes = spec.to_bytes().unwrap();
        let decoded = TaskSpec::from_bytes(&bytes).unwrap();
        assert_eq!(decoded, spec);
    }

    #[test]
    fn test_field_lookup() {
        let mut fields = FieldMap::new();
        fields.insert("epochs".to_string(), FieldValue::Int(30));
        let spec = spec_with(fields);

        assert_eq!(spec.field_i64("epochs").unwrap(), 30);
        assert!(matches!(
            spec.field_i64("data_size"),
            Err(TaskError::MissingField { field: "data_size", .. })
        ));
    }

    #[test]
    fn test_field_type_mismatch() {
        let mut fields = FieldMap::new();
        fields.insert("epochs".to_string(), FieldValue::Text("fifty".to_string()));
        let spec = spec_with(fields);

        assert!(matches!(
            spec.field_i64("epochs"),
            Err(TaskError::FieldType { field: "epochs", .. })
        ));
    }
}
