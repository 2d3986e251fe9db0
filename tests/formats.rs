//! Tests for the flat, versioned tree and export formats.
mod common;
use common::*;
use sentei::convert::{ItemDocument, export_file_name};
use sentei::prelude::*;
use serde_json::json;

#[test]
fn test_tree_to_flat_uses_parent_logic() {
    let (tree, _) = create_or_group_tree();
    let flat = tree_to_flat_conditions(&tree);

    let summary: Vec<(&str, Logic)> = flat.iter().map(|c| (c.value.as_str(), c.logic)).collect();
    // First leaf is always AND, its sibling takes the group's OR, the root
    // leaf takes the root's AND.
    assert_eq!(
        summary,
        vec![("A", Logic::And), ("B", Logic::Or), ("Active", Logic::And)]
    );
}

#[test]
fn test_flat_drops_not_semantics() {
    let nested = create_nested_tree();
    let flat = tree_to_flat_conditions(&nested.tree);
    assert!(flat.iter().all(|c| c.logic != Logic::Not));
    assert_eq!(flat.len(), 4);
}

#[test]
fn test_flat_round_trip_keeps_leaves_but_not_nesting() {
    let nested = create_nested_tree();
    let rebuilt = flat_conditions_to_tree(&tree_to_flat_conditions(&nested.tree));

    assert_eq!(leaf_triples(&rebuilt), leaf_triples(&nested.tree));
    assert_eq!(rebuilt.internal_logic(), Junction::And);
    assert_eq!(rebuilt.items().len(), 4);
    assert!(rebuilt.walk().all(|(depth, node)| depth == 0 && node.as_group().is_none()));
    assert_ne!(rebuilt.to_document(), nested.tree.to_document());
}

#[test]
fn test_flat_to_tree_allocates_fresh_ids() {
    let flat = vec![
        FlatCondition::new(equals("role", "router"), Logic::And),
        FlatCondition::new(equals("role", "router"), Logic::And),
    ];
    let tree = flat_conditions_to_tree(&flat);
    assert_eq!(tree.items().len(), 2);
    assert_ne!(tree.items()[0], tree.items()[1]);
}

#[test]
fn test_document_shape() {
    let (tree, sites) = create_or_group_tree();
    let value = serde_json::to_value(tree.to_document()).expect("serialisable");

    assert_eq!(value["type"], "root");
    assert_eq!(value["internalLogic"], "AND");
    let group = &value["items"][0];
    assert_eq!(group["type"], "group");
    assert_eq!(group["id"], sites.as_str());
    assert_eq!(group["logic"], "AND");
    assert_eq!(group["internalLogic"], "OR");
    assert_eq!(group["items"][1]["value"], "B");
    assert_eq!(value["items"][1]["field"], "status");
    assert!(value["items"][1].get("type").is_none());
}

#[test]
fn test_document_round_trip_preserves_structure_and_ids() {
    let nested = create_nested_tree();
    let document = nested.tree.to_document();
    let json = serde_json::to_string(&document).expect("serialisable");
    let parsed: TreeDocument = serde_json::from_str(&json).expect("parsable");
    let rebuilt = ConditionTree::from_document(&parsed).expect("well-formed");

    assert_eq!(rebuilt, nested.tree);
    assert_eq!(
        rebuilt.find_path_to_group(&nested.inner),
        nested.tree.find_path_to_group(&nested.inner)
    );
}

#[test]
fn test_document_with_duplicate_ids_is_rejected() {
    let document: TreeDocument = serde_json::from_value(json!({
        "type": "root",
        "internalLogic": "AND",
        "items": [
            {"id": "item-1", "field": "role", "operator": "equals", "value": "router"},
            {"id": "group-1", "type": "group", "logic": "AND", "internalLogic": "OR", "items": [
                {"id": "item-1", "field": "role", "operator": "equals", "value": "switch"}
            ]}
        ]
    }))
    .expect("valid shape");

    assert!(matches!(document.items[1], ItemDocument::Group(_)));
    assert_eq!(
        ConditionTree::from_document(&document),
        Err(FormatError::DuplicateId("item-1".to_string()))
    );
}

#[test]
fn test_stored_envelope_list_is_detected() {
    let (tree, _) = create_or_group_tree();
    let stored = StoredFilter::from_tree(&tree);
    let value = stored.to_value().expect("serialisable");

    assert_eq!(value[0]["version"], 2);
    let loaded = StoredFilter::from_value(&value).expect("version 2");
    assert!(!loaded.is_legacy());
    assert_eq!(loaded.to_tree().expect("well-formed"), tree);
}

#[test]
fn test_bare_envelope_is_detected() {
    let stored = StoredFilter::from_json(
        r#"{"version": 2, "tree": {"type": "root", "internalLogic": "OR", "items": [
            {"id": "item-1", "field": "role", "operator": "equals", "value": "router"}
        ]}}"#,
    )
    .expect("version 2");
    let tree = stored.to_tree().expect("well-formed");
    assert_eq!(tree.internal_logic(), Junction::Or);
    assert_eq!(tree.items(), &[NodeId::new("item-1")]);
}

#[test]
fn test_legacy_flat_list_is_detected() {
    let stored = StoredFilter::from_value(&json!([
        {"field": "role", "operator": "equals", "value": "router", "logic": "AND"},
        {"field": "status", "operator": "equals", "value": "Offline", "logic": "NOT"}
    ]))
    .expect("flat list");

    assert!(stored.is_legacy());
    let tree = stored.to_tree().expect("flat lists always load");
    assert_eq!(tree.items().len(), 2);
    let operations = stored.to_operations().expect("flat lists always convert");
    assert_eq!(operations[1].operation_type, Logic::Not);
}

#[test]
fn test_legacy_logic_is_read_in_any_case() {
    let stored = StoredFilter::from_value(&json!([
        {"field": "role", "operator": "equals", "value": "router", "logic": "and"},
        {"field": "platform", "operator": "equals", "value": "eos", "logic": "Or"},
        {"field": "status", "operator": "equals", "value": "Offline", "logic": "not"}
    ]))
    .expect("lowercase connectives still load");

    let flat = stored.to_flat().expect("flat lists always convert");
    let logics: Vec<Logic> = flat.iter().map(|c| c.logic).collect();
    assert_eq!(logics, vec![Logic::And, Logic::Or, Logic::Not]);

    let types: Vec<Logic> = stored
        .to_operations()
        .expect("flat lists always convert")
        .iter()
        .map(|op| op.operation_type)
        .collect();
    assert_eq!(types, vec![Logic::And, Logic::Or, Logic::Not]);

    assert!(matches!(
        StoredFilter::from_value(&json!([
            {"field": "role", "operator": "equals", "value": "router", "logic": "xor"}
        ])),
        Err(FormatError::JsonParseError(_))
    ));
}

#[test]
fn test_unknown_version_is_rejected() {
    let result = StoredFilter::from_value(&json!([{"version": 3, "tree": {}}]));
    assert_eq!(result, Err(FormatError::UnsupportedVersion(3)));

    let result = StoredFilter::from_value(&json!("conditions"));
    assert_eq!(result, Err(FormatError::UnrecognizedShape));

    assert!(matches!(
        StoredFilter::from_json("not json"),
        Err(FormatError::JsonParseError(_))
    ));
}

#[test]
fn test_export_then_import() {
    let (tree, _) = create_or_group_tree();
    let export = InventoryExport::new(
        sentei::convert::ExportMetadata::new("Core Sites")
            .with_description("Active routers in A and B")
            .with_original_id(7),
        "alice",
        &tree,
    );
    let value = serde_json::to_value(&export).expect("serialisable");
    assert_eq!(value["version"], 2);
    assert_eq!(value["metadata"]["exportedBy"], "alice");
    assert!(value["metadata"]["exportedAt"].as_str().is_some_and(|s| s.ends_with('Z')));

    let imported = InventoryExport::import(&value).expect("valid export");
    assert_eq!(imported.name, "Core Sites (imported)");
    assert_eq!(imported.description, "Active routers in A and B");
    assert_eq!(imported.tree, tree);
    assert!(!imported.stored_filter().is_legacy());
}

#[test]
fn test_import_validation() {
    let tree = json!({"type": "root", "internalLogic": "AND", "items": []});

    let missing_version = json!({"metadata": {"name": "x"}, "conditionTree": tree});
    assert_eq!(
        InventoryExport::import(&missing_version),
        Err(ImportError::UnsupportedVersion(None))
    );

    let wrong_version = json!({"version": 1, "metadata": {"name": "x"}, "conditionTree": tree});
    assert_eq!(
        InventoryExport::import(&wrong_version),
        Err(ImportError::UnsupportedVersion(Some(1)))
    );

    let missing_tree = json!({"version": 2, "metadata": {"name": "x"}, "conditionTree": null});
    assert_eq!(
        InventoryExport::import(&missing_tree),
        Err(ImportError::MissingConditionTree)
    );

    let missing_name = json!({"version": 2, "metadata": {"name": ""}, "conditionTree": tree});
    assert_eq!(
        InventoryExport::import(&missing_name),
        Err(ImportError::MissingMetadata)
    );

    let ok = json!({"version": 2, "metadata": {"name": "x"}, "conditionTree": tree});
    let imported = InventoryExport::import(&ok).expect("valid");
    assert_eq!(imported.description, "Imported inventory");
    assert!(imported.tree.is_empty());
}

#[test]
fn test_export_file_name() {
    assert_eq!(export_file_name("Core Sites"), "inventory-core-sites.json");
    assert_eq!(export_file_name("Edge/Core"), "inventory-edge-core.json");
    assert_eq!(export_file_name(" . "), "inventory-unnamed.json");
}
