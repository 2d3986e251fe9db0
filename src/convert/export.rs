//! Inventory export and import documents.
//!
//! An exported inventory is a standalone JSON file holding metadata and the
//! condition tree. Importing validates the raw JSON before deserialising it so
//! each missing piece gets its own error.

use super::document::{StoredFilter, TREE_FORMAT_VERSION, TreeDocument};
use crate::error::{FormatError, ImportError};
use crate::tree::ConditionTree;
use chrono::{SecondsFormat, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;

const IMPORTED_SUFFIX: &str = " (imported)";
const MAX_FILE_STEM: usize = 100;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ExportMetadata {
    pub name: String,
    #[serde(default)]
    pub description: String,
    #[serde(default = "default_scope")]
    pub scope: String,
    #[serde(default)]
    pub exported_at: Option<String>,
    #[serde(default)]
    pub exported_by: Option<String>,
    #[serde(default)]
    pub original_id: Option<i64>,
}

fn default_scope() -> String {
    "global".to_string()
}

impl ExportMetadata {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            description: String::new(),
            scope: default_scope(),
            exported_at: None,
            exported_by: None,
            original_id: None,
        }
    }

    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = description.into();
        self
    }

    pub fn with_scope(mut self, scope: impl Into<String>) -> Self {
        self.scope = scope.into();
        self
    }

    pub fn with_original_id(mut self, id: i64) -> Self {
        self.original_id = Some(id);
        self
    }
}

/// `{ "version": 2, "metadata": {...}, "conditionTree": {...} }`
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct InventoryExport {
    pub version: u64,
    pub metadata: ExportMetadata,
    pub condition_tree: Option<TreeDocument>,
}

/// The result of a successful import, ready to be stored as a new inventory.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ImportedInventory {
    pub name: String,
    pub description: String,
    pub tree: ConditionTree,
}

impl ImportedInventory {
    /// The `conditions` payload the inventory resource stores for this import.
    pub fn stored_filter(&self) -> StoredFilter {
        StoredFilter::from_tree(&self.tree)
    }
}

impl InventoryExport {
    /// Wraps `tree` for export, stamping the current time and the exporting user.
    pub fn new(
        mut metadata: ExportMetadata,
        exported_by: impl Into<String>,
        tree: &ConditionTree,
    ) -> Self {
        metadata.exported_at = Some(Utc::now().to_rfc3339_opts(SecondsFormat::Micros, true));
        metadata.exported_by = Some(exported_by.into());
        Self {
            version: TREE_FORMAT_VERSION,
            metadata,
            condition_tree: Some(tree.to_document()),
        }
    }

    /// Validates raw export JSON and loads it.
    ///
    /// The version must be 2, the condition tree must be present and the
    /// metadata must carry a non-empty name. The imported inventory is named
    /// after the original with an ` (imported)` suffix.
    pub fn import(value: &Value) -> Result<ImportedInventory, ImportError> {
        match value.get("version").and_then(Value::as_u64) {
            Some(TREE_FORMAT_VERSION) => {}
            found => return Err(ImportError::UnsupportedVersion(found)),
        }
        match value.get("conditionTree") {
            None | Some(Value::Null) => return Err(ImportError::MissingConditionTree),
            Some(Value::Object(tree)) if tree.is_empty() => {
                return Err(ImportError::MissingConditionTree);
            }
            Some(_) => {}
        }
        let has_name = value
            .get("metadata")
            .and_then(|metadata| metadata.get("name"))
            .and_then(Value::as_str)
            .is_some_and(|name| !name.is_empty());
        if !has_name {
            return Err(ImportError::MissingMetadata);
        }

        let export = InventoryExport::deserialize(value).map_err(FormatError::from)?;
        let document = export
            .condition_tree
            .ok_or(ImportError::MissingConditionTree)?;
        let tree = ConditionTree::from_document(&document)?;
        let description = if export.metadata.description.is_empty() {
            "Imported inventory".to_string()
        } else {
            export.metadata.description
        };
        Ok(ImportedInventory {
            name: format!("{}{}", export.metadata.name, IMPORTED_SUFFIX),
            description,
            tree,
        })
    }
}

/// The download file name for an exported inventory: `inventory-<slug>.json`.
pub fn export_file_name(inventory_name: &str) -> String {
    format!("inventory-{}.json", sanitize_file_stem(inventory_name))
}

/// Turns an inventory name into a safe, lowercase file stem.
pub fn sanitize_file_stem(name: &str) -> String {
    let mut stem: String = name
        .chars()
        .map(|c| if "<>:\"/\\|?*".contains(c) { '-' } else { c })
        .collect();
    stem = stem.trim_matches(|c: char| c == '.' || c == ' ').to_string();
    while stem.contains("--") || stem.contains("  ") {
        stem = stem.replace("--", "-").replace("  ", " ");
    }
    let stem: String = stem
        .replace(' ', "-")
        .to_lowercase()
        .chars()
        .take(MAX_FILE_STEM)
        .collect();
    if stem.is_empty() {
        "unnamed".to_string()
    } else {
        stem
    }
}
