use thiserror::Error;

/// Errors raised while editing a condition tree.
///
/// These are user-input errors: the caller is expected to block the edit and
/// prompt for a correction rather than retry.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum TreeError {
    #[error("A condition needs a field to filter on")]
    MissingField,

    #[error("A condition needs a value to compare against")]
    MissingValue,

    #[error("Field '{0}' is not offered by the field catalog")]
    UnknownField(String),

    #[error("Operator '{0}' is not offered by the field catalog")]
    UnknownOperator(String),

    #[error("The filter is empty, add at least one condition")]
    EmptyFilter,
}

/// Errors that can occur while loading a filter from its wire representation.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum FormatError {
    #[error("Failed to parse filter JSON: {0}")]
    JsonParseError(String),

    #[error("Node id '{0}' appears more than once in the condition tree")]
    DuplicateId(String),

    #[error("Unsupported filter format version {0}, expected 2")]
    UnsupportedVersion(u64),

    #[error("Stored filter is neither a version 2 tree nor a flat condition list")]
    UnrecognizedShape,
}

impl From<serde_json::Error> for FormatError {
    fn from(err: serde_json::Error) -> Self {
        FormatError::JsonParseError(err.to_string())
    }
}

/// Errors that can occur when validating an exported inventory for import.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ImportError {
    #[error("Invalid inventory file format, expected version 2 but found {}", found_version(.0))]
    UnsupportedVersion(Option<u64>),

    #[error("Invalid inventory file, the condition tree is missing")]
    MissingConditionTree,

    #[error("Invalid inventory file, the metadata or its name is missing")]
    MissingMetadata,

    #[error(transparent)]
    Format(#[from] FormatError),
}

fn found_version(version: &Option<u64>) -> String {
    version.map_or_else(|| "none".to_string(), |v| v.to_string())
}
