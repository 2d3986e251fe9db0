use crate::error::{FormatError, TreeError};
use serde::{Deserialize, Serialize};

/// Fields with this prefix address device custom fields and are always accepted.
pub const CUSTOM_FIELD_PREFIX: &str = "cf_";

/// A selectable option with its display label.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FieldOption {
    pub value: String,
    pub label: String,
}

impl FieldOption {
    pub fn new(value: impl Into<String>, label: impl Into<String>) -> Self {
        Self {
            value: value.into(),
            label: label.into(),
        }
    }
}

/// The fields, operators and connectives offered when building conditions,
/// in the shape the `field-options` endpoint returns.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FieldCatalog {
    pub fields: Vec<FieldOption>,
    pub operators: Vec<FieldOption>,
    #[serde(default)]
    pub logical_operations: Vec<FieldOption>,
}

impl Default for FieldCatalog {
    fn default() -> Self {
        Self {
            fields: vec![
                FieldOption::new("name", "Device Name"),
                FieldOption::new("location", "Location"),
                FieldOption::new("role", "Role"),
                FieldOption::new("tag", "Tag"),
                FieldOption::new("device_type", "Device Type"),
                FieldOption::new("manufacturer", "Manufacturer"),
                FieldOption::new("platform", "Platform"),
                FieldOption::new("custom_fields", "Custom Fields..."),
            ],
            operators: vec![
                FieldOption::new("equals", "Equals"),
                FieldOption::new("contains", "Contains"),
            ],
            logical_operations: vec![
                FieldOption::new("AND", "AND"),
                FieldOption::new("OR", "OR"),
                FieldOption::new("NOT", "NOT"),
            ],
        }
    }
}

impl FieldCatalog {
    pub fn from_json(json: &str) -> Result<Self, FormatError> {
        Ok(serde_json::from_str(json)?)
    }

    pub fn has_field(&self, field: &str) -> bool {
        field.starts_with(CUSTOM_FIELD_PREFIX) || self.fields.iter().any(|f| f.value == field)
    }

    pub fn has_operator(&self, operator: &str) -> bool {
        self.operators.iter().any(|o| o.value == operator)
    }

    /// The display label of `field`; custom fields are labelled by their bare name.
    pub fn field_label<'a>(&'a self, field: &'a str) -> Option<&'a str> {
        self.fields
            .iter()
            .find(|f| f.value == field)
            .map(|f| f.label.as_str())
            .or_else(|| field.strip_prefix(CUSTOM_FIELD_PREFIX))
    }

    /// Checks that both `field` and `operator` are offered by this catalog.
    pub fn validate(&self, field: &str, operator: &str) -> Result<(), TreeError> {
        if !self.has_field(field) {
            return Err(TreeError::UnknownField(field.to_string()));
        }
        if !self.has_operator(operator) {
            return Err(TreeError::UnknownOperator(operator.to_string()));
        }
        Ok(())
    }
}
