//! Exporter tests: step projection, sequence numbering, connection entries,
//! instruction synthesis and extension forcing.
mod common;
use common::{analysis_snapshot, registry, store, two_step_snapshot};
use flowpack::prelude::*;

#[test]
fn test_sequence_ids_are_dense_and_one_based() {
    let registry = registry();
    let store = store();
    let snapshot = analysis_snapshot(&registry);

    let document = Exporter::new(&snapshot, &store).build_document();

    let mut ids: Vec<u32> = document.steps.iter().map(|s| s.sequence_id).collect();
    ids.sort_unstable();
    let expected: Vec<u32> = (1..=snapshot.len() as u32).collect();
    assert_eq!(ids, expected);
}

#[test]
fn test_two_step_export_records_connection() {
    // Scenario A: trigger source -> trigger gives two steps, step 1 carrying
    // one connection entry that names step 2.
    let registry = registry();
    let store = store();
    let (snapshot, _, _) = two_step_snapshot(&registry);

    let document = Exporter::new(&snapshot, &store)
        .with_name("two step flow")
        .build_document();

    assert_eq!(document.workflow_name, "two step flow");
    assert_eq!(document.steps.len(), 2);

    let first = &document.steps[0];
    assert_eq!(first.tag, "trigger_source");
    assert_eq!(first.connections.len(), 1);
    let connection = &first.connections[0];
    assert_eq!(connection.from_port_index, 0);
    assert_eq!(connection.from_port_name, "situation");
    assert_eq!(connection.to_node_sequence_id, Some(2));
    assert_eq!(
        connection.to_node_id.as_deref(),
        document.steps[1].node_id.as_deref()
    );

    let second = &document.steps[1];
    assert_eq!(second.tag, "trigger");
    assert!(second.connections.is_empty());
}

#[test]
fn test_positions_and_identities_recorded() {
    let registry = registry();
    let store = store();
    let (snapshot, source_id, _) = two_step_snapshot(&registry);

    let document = Exporter::new(&snapshot, &store).build_document();

    let first = &document.steps[0];
    assert_eq!(first.position, Some([100.0, 300.0]));
    assert_eq!(first.node_id.as_deref(), Some(source_id.as_str()));
}

#[test]
fn test_instruction_synthesis() {
    let registry = registry();
    let store = store();
    let mut snapshot = GraphSnapshot::new();

    let mut decision = registry.create_node(NodeType::Decision, "check");
    decision.set_attribute("condition", "queue length > 50");
    decision.set_attribute("reasoning", "the line saturates past fifty lots");
    snapshot.add_node(decision);

    let mut conclusion = registry.create_node(NodeType::Conclusion, "done");
    conclusion.set_attribute("conclusion", "slow the release plan");
    snapshot.add_node(conclusion);

    let document = Exporter::new(&snapshot, &store).build_document();

    assert_eq!(
        document.steps[0].fields.get("instruction").and_then(|v| v.as_str()),
        Some("condition: queue length > 50 - the line saturates past fifty lots")
    );
    assert_eq!(
        document.steps[1].fields.get("instruction").and_then(|v| v.as_str()),
        Some("conclusion: slow the release plan")
    );
}

#[test]
fn test_type_specific_fields_exported() {
    let registry = registry();
    let store = store();
    let snapshot = analysis_snapshot(&registry);

    let document = Exporter::new(&snapshot, &store).build_document();

    let table = document
        .steps
        .iter()
        .find(|step| step.tag == "table")
        .expect("table step present");
    assert_eq!(
        table.fields.get("target_table").and_then(|v| v.as_str()),
        Some("TB_TRANSPORT")
    );
    assert_eq!(
        table.fields.get("target_columns").and_then(|v| v.as_str()),
        Some("CARRIER_ID, STATE, UPDATED_AT")
    );

    let query = document
        .steps
        .iter()
        .find(|step| step.tag == "observation")
        .expect("observation step present");
    assert_eq!(
        query.fields.get("description").and_then(|v| v.as_str()),
        Some("pull the last hour of transport records")
    );
}

#[test]
fn test_export_forces_canonical_extension() {
    let registry = registry();
    let store = store();
    let (snapshot, _, _) = two_step_snapshot(&registry);
    let dir = tempfile::tempdir().expect("temp dir");

    // A different extension is replaced, not appended.
    Exporter::new(&snapshot, &store)
        .export(&dir.path().join("report.json"))
        .expect("export succeeds");
    assert!(dir.path().join("report.flow").exists());
    assert!(!dir.path().join("report.json").exists());
    assert!(!dir.path().join("report.json.flow").exists());

    // No extension gets one.
    Exporter::new(&snapshot, &store)
        .export(&dir.path().join("bare"))
        .expect("export succeeds");
    assert!(dir.path().join("bare.flow").exists());
}

#[test]
fn test_export_to_unwritable_target_is_fatal() {
    let registry = registry();
    let store = store();
    let (snapshot, _, _) = two_step_snapshot(&registry);

    let missing_dir = std::path::Path::new("/nonexistent-flowpack-dir/out.flow");
    let result = Exporter::new(&snapshot, &store).export(missing_dir);
    assert!(matches!(result, Err(ExportError::ArchiveCreate { .. })));
}

#[test]
fn test_attached_file_omitted_when_empty() {
    let registry = registry();
    let store = store();
    let (snapshot, _, _) = two_step_snapshot(&registry);

    let document = Exporter::new(&snapshot, &store).build_document();
    assert!(document.steps.iter().all(|s| s.attached_file.is_none()));
}
