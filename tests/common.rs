//! Common test utilities for building snapshots, stores and archives.
use flowpack::prelude::*;

/// Registry backed by the built-in lookup lists.
#[allow(dead_code)]
pub fn registry() -> NodeSchemaRegistry {
    NodeSchemaRegistry::new(&LookupLists::default())
}

/// A fresh attachment store on its own scratch directory.
#[allow(dead_code)]
pub fn store() -> AttachmentStore {
    AttachmentStore::new().expect("scratch directory should be creatable")
}

/// Creates the simplest connected graph: one trigger source feeding one
/// trigger node.
///
/// Layout: source at (100, 300), trigger at (500, 300).
#[allow(dead_code)]
pub fn two_step_snapshot(registry: &NodeSchemaRegistry) -> (GraphSnapshot, NodeId, NodeId) {
    let mut snapshot = GraphSnapshot::new();

    let source_id = {
        let mut node = registry.create_node(NodeType::TriggerSource, "Mail arrives");
        node.position = (100.0, 300.0);
        node.set_attribute("trigger_source", "mail");
        node.set_attribute("note", "daily operations inbox");
        snapshot.add_node(node)
    };

    let trigger_id = {
        let mut node = registry.create_node(NodeType::Trigger, "Transport delayed");
        node.position = (500.0, 300.0);
        node.set_attribute("situation", "a lot is overdue at the stocker");
        node.set_attribute("situation_type", "transport delay");
        snapshot.add_node(node)
    };

    snapshot
        .connect(&source_id, 0, &trigger_id, 0)
        .expect("source output connects to trigger input");

    (snapshot, source_id, trigger_id)
}

/// Creates a five-node analysis graph exercising fan-in on the data-query
/// node's second input port and a decision in front of the conclusion.
///
/// trigger-source -> trigger -> data-query -> decision -> conclusion,
/// with a table source feeding the data-query's "data sources" port.
#[allow(dead_code)]
pub fn analysis_snapshot(registry: &NodeSchemaRegistry) -> GraphSnapshot {
    let mut snapshot = GraphSnapshot::new();

    let source = {
        let mut node = registry.create_node(NodeType::TriggerSource, "Anomaly alert");
        node.position = (0.0, 0.0);
        node.set_attribute("trigger_source", "anomaly detection");
        snapshot.add_node(node)
    };
    let trigger = {
        let mut node = registry.create_node(NodeType::Trigger, "Transport delayed");
        node.position = (400.0, 0.0);
        node.set_attribute("situation", "carrier stuck between bays");
        snapshot.add_node(node)
    };
    let query = {
        let mut node = registry.create_node(NodeType::DataQuery, "Collect transport data");
        node.position = (800.0, 0.0);
        node.set_attribute("description", "pull the last hour of transport records");
        snapshot.add_node(node)
    };
    let table = {
        let mut node = registry.create_node(NodeType::TableSource, "Transport log");
        node.position = (800.0, 400.0);
        node.set_attribute("target_table", "TB_TRANSPORT");
        node.set_attribute("target_columns", "CARRIER_ID, STATE, UPDATED_AT");
        snapshot.add_node(node)
    };
    let decision = {
        let mut node = registry.create_node(NodeType::Decision, "Stuck longer than 10 min?");
        node.position = (1200.0, 0.0);
        node.set_attribute("condition", "UPDATED_AT older than 10 minutes");
        node.set_attribute("reasoning", "carriers normally move within two minutes");
        snapshot.add_node(node)
    };
    let conclusion = {
        let mut node = registry.create_node(NodeType::Conclusion, "Escalate to OHT team");
        node.position = (1600.0, 0.0);
        node.set_attribute("conclusion", "dispatch maintenance to the stalled carrier");
        node.set_attribute("conclusion_type", "corrective action");
        snapshot.add_node(node)
    };

    snapshot.connect(&source, 0, &trigger, 0).expect("edge");
    snapshot.connect(&trigger, 0, &query, 0).expect("edge");
    snapshot.connect(&table, 0, &query, 1).expect("edge");
    snapshot.connect(&query, 0, &decision, 0).expect("edge");
    snapshot.connect(&decision, 0, &conclusion, 0).expect("edge");

    snapshot
}

/// Writes `bytes` to `name` inside `dir` and returns the full path.
#[allow(dead_code)]
pub fn write_file(dir: &std::path::Path, name: &str, bytes: &[u8]) -> std::path::PathBuf {
    let path = dir.join(name);
    std::fs::write(&path, bytes).expect("test file should be writable");
    path
}
