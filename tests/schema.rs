//! Schema registry and lookup-list behavior.
mod common;
use common::{registry, write_file};
use flowpack::prelude::*;

#[test]
fn test_every_type_has_a_schema() {
    let registry = registry();
    for node_type in NodeType::ALL {
        let schema = registry.schema(node_type);
        assert_eq!(schema.node_type, node_type);
        assert!(!schema.display_name.is_empty());
    }
}

#[test]
fn test_port_layouts() {
    let registry = registry();

    let source = registry.schema(NodeType::TriggerSource);
    assert!(source.inputs.is_empty());
    assert_eq!(source.outputs.len(), 1);

    let query = registry.schema(NodeType::DataQuery);
    assert_eq!(query.inputs.len(), 2);
    assert_eq!(query.inputs[0].name, "previous step");
    assert_eq!(query.inputs[1].name, "data sources");

    let decision = registry.schema(NodeType::Decision);
    assert_eq!(decision.outputs.len(), 2);
    assert_eq!(decision.outputs[0].name, "true");
    assert_eq!(decision.outputs[1].name, "false");

    let looping = registry.schema(NodeType::Loop);
    assert_eq!(looping.outputs[0].name, "enter");
    assert_eq!(looping.outputs[1].name, "exit");

    let conclusion = registry.schema(NodeType::Conclusion);
    assert!(conclusion.outputs.is_empty());
    assert_eq!(conclusion.inputs.len(), 1);
}

#[test]
fn test_new_node_starts_at_schema_defaults() {
    let registry = registry();

    let table = registry.create_node(NodeType::TableSource, "t");
    assert_eq!(table.attribute("target_table"), Some("TB_MCS_LOG"));
    assert_eq!(table.attribute("target_columns"), Some("e.g. A, B, C"));
    assert_eq!(table.attached_file(), "");

    let trigger = registry.create_node(NodeType::Trigger, "t");
    assert_eq!(trigger.attribute("situation"), Some(""));
    assert_eq!(trigger.attribute("situation_type"), Some("transport delay"));
}

#[test]
fn test_lookup_files_override_builtins() {
    let dir = tempfile::tempdir().expect("temp dir");
    write_file(
        dir.path(),
        "tables.json",
        br#"{"tables": ["TB_CUSTOM_A", "TB_CUSTOM_B", "TB_CUSTOM_A"]}"#,
    );

    let lookups = LookupLists::from_dir(dir.path());
    // Duplicates collapse, first occurrence wins.
    assert_eq!(lookups.tables, vec!["TB_CUSTOM_A", "TB_CUSTOM_B"]);
    // The other lists were absent and fall back per-list.
    assert_eq!(lookups.screens, LookupLists::builtin().screens);

    let registry = NodeSchemaRegistry::new(&lookups);
    let node = registry.create_node(NodeType::TableSource, "t");
    assert_eq!(node.attribute("target_table"), Some("TB_CUSTOM_A"));
}

#[test]
fn test_unparseable_and_empty_lookup_files_fall_back() {
    let dir = tempfile::tempdir().expect("temp dir");
    write_file(dir.path(), "logs.json", b"{ this is not json");
    write_file(dir.path(), "screens.json", br#"{"screens": []}"#);

    let lookups = LookupLists::from_dir(dir.path());
    assert_eq!(lookups.logs, LookupLists::builtin().logs);
    assert_eq!(lookups.screens, LookupLists::builtin().screens);
}

#[test]
fn test_free_form_override_is_preserved() {
    // A value outside the option list is accepted, kept, and exported as-is.
    let registry = registry();
    let mut node = registry.create_node(NodeType::Trigger, "t");
    node.set_attribute("situation_type", "a brand new category");
    assert_eq!(node.attribute("situation_type"), Some("a brand new category"));
}

#[test]
fn test_refresh_moves_options_but_not_values() {
    let mut registry = registry();
    let mut node = registry.create_node(NodeType::LogSource, "logs");
    node.set_attribute("log_source", "MCS log");

    let fresh = LookupLists {
        logs: vec!["gateway log".to_string()],
        ..LookupLists::builtin()
    };
    registry.refresh(&fresh);

    // The offered options moved...
    let options = registry
        .schema(NodeType::LogSource)
        .attribute("log_source")
        .and_then(AttributeSpec::options)
        .expect("choice attribute");
    assert_eq!(options, ["gateway log".to_string()]);

    // ...the already-constructed node keeps its value.
    assert_eq!(node.attribute("log_source"), Some("MCS log"));

    // New nodes pick up the refreshed default.
    let fresh_node = registry.create_node(NodeType::LogSource, "logs");
    assert_eq!(fresh_node.attribute("log_source"), Some("gateway log"));
}

#[test]
fn test_tag_round_trip() {
    for node_type in NodeType::ALL {
        assert_eq!(NodeType::from_tag(node_type.tag()), Some(node_type));
        assert_eq!(
            NodeType::from_identifier(&node_type.identifier()),
            Some(node_type)
        );
    }
    assert_eq!(NodeType::from_tag("observation"), Some(NodeType::DataQuery));
    assert_eq!(NodeType::from_tag("reasoning"), Some(NodeType::Decision));
    assert_eq!(NodeType::from_tag("nonsense"), None);
    assert_eq!(NodeType::from_identifier("nonsense"), None);
}

#[test]
fn test_set_attribute_is_total() {
    // The attribute capability accepts names outside the schema; nothing is
    // rejected and the value reads back.
    let registry = registry();
    let mut node = registry.create_node(NodeType::Conclusion, "c");
    node.set_attribute("annotation", "added later");
    assert_eq!(node.attribute("annotation"), Some("added later"));
}

#[test]
fn test_graph_connect_validates_endpoints() {
    let registry = registry();
    let mut snapshot = GraphSnapshot::new();
    let conclusion = snapshot.add_node(registry.create_node(NodeType::Conclusion, "end"));
    let trigger = snapshot.add_node(registry.create_node(NodeType::Trigger, "start"));

    // Conclusion has no outputs.
    let result = snapshot.connect(&conclusion, 0, &trigger, 0);
    assert!(matches!(result, Err(GraphError::PortOutOfRange { .. })));

    // Removing a node drops its edges.
    snapshot.connect(&trigger, 0, &conclusion, 0).expect("edge");
    assert_eq!(snapshot.edges().len(), 1);
    snapshot.remove_node(&conclusion);
    assert!(snapshot.edges().is_empty());
}
