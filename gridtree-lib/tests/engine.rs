//! End-to-end behaviour of the hierarchy engine.

use std::sync::Arc;
use std::sync::Mutex;

use gridtree_lib::hierarchy::EventFilter;
use gridtree_lib::hierarchy::EventKind;
use gridtree_lib::hierarchy::ExpandOptions;
use gridtree_lib::hierarchy::HierarchyEvent;
use gridtree_lib::hierarchy::RelationshipDetector;
use gridtree_lib::model::Record;
use gridtree_lib::{DefaultExpansion, HierarchyConfig, HierarchyEngine};
use pretty_assertions::assert_eq;

fn parents() -> Vec<Arc<Record>> {
    vec![
        Arc::new(Record::new().set("ID", "P1")),
        Arc::new(Record::new().set("ID", "P2")),
    ]
}

fn children() -> Vec<Arc<Record>> {
    vec![
        Arc::new(Record::new().set("CID", "C1").set("ParentID", "P1")),
        Arc::new(Record::new().set("CID", "C2").set("ParentID", "P1")),
        Arc::new(Record::new().set("CID", "C3").set("ParentID", "P9")),
    ]
}

fn visible(engine: &HierarchyEngine) -> Vec<&str> {
    engine
        .visible_nodes()
        .iter()
        .map(|n| n.id.as_str())
        .collect()
}

fn engine_with(config: HierarchyConfig) -> HierarchyEngine {
    let mut engine = HierarchyEngine::new(config);
    assert!(engine.initialize(&parents(), &children()));
    engine
}

fn event_log(engine: &mut HierarchyEngine) -> Arc<Mutex<Vec<HierarchyEvent>>> {
    let log = Arc::new(Mutex::new(Vec::new()));
    let sink = Arc::clone(&log);
    engine.on(EventFilter::All, move |event| {
        sink.lock().unwrap().push(event.clone());
    });
    log
}

#[test]
fn test_auto_detected_scenario() {
    let mut engine = engine_with(HierarchyConfig::default());

    let relationship = engine.relationship().unwrap();
    assert_eq!(relationship.parent_key, "ID");
    assert_eq!(relationship.child_key, "CID");
    assert_eq!(relationship.reference_column, "ParentID");
    assert!(relationship.auto_detected);
    assert_eq!(relationship.confidence, Some(0.85));

    assert_eq!(engine.root_ids(), ["P1", "P2"]);
    let p1 = engine.node("P1").unwrap();
    assert!(p1.has_children);
    assert_eq!(p1.child_count, 2);
    assert!(!engine.node("P2").unwrap().has_children);
    assert!(engine.node("C3").is_none());
    assert_eq!(visible(&engine), ["P1", "P2"]);

    engine.expand_node("P1", ExpandOptions::default());
    assert_eq!(visible(&engine), ["P1", "C1", "C2", "P2"]);
}

#[test]
fn test_expand_all_by_default() {
    let engine = engine_with(HierarchyConfig::default().with_default_expansion(DefaultExpansion::All));
    assert_eq!(visible(&engine), ["P1", "C1", "C2", "P2"]);
}

#[test]
fn test_expand_levels_by_default() {
    let engine =
        engine_with(HierarchyConfig::default().with_default_expansion(DefaultExpansion::Levels(1)));
    assert_eq!(visible(&engine), ["P1", "C1", "C2", "P2"]);
}

#[test]
fn test_manual_mapping_wins() {
    let config = HierarchyConfig::default().with_manual_mapping("ID", "CID", "ParentID");
    let engine = engine_with(config);

    let relationship = engine.relationship().unwrap();
    assert!(!relationship.auto_detected);
    assert_eq!(relationship.confidence, None);
    assert_eq!(engine.detection().unwrap().match_count, 2);
}

#[test]
fn test_toggle_and_collapse() {
    let mut engine = engine_with(HierarchyConfig::default());

    engine.toggle_node("P1");
    assert!(engine.is_expanded("P1"));
    assert_eq!(visible(&engine), ["P1", "C1", "C2", "P2"]);

    engine.toggle_node("P1");
    assert!(!engine.is_expanded("P1"));
    assert_eq!(visible(&engine), ["P1", "P2"]);
}

#[test]
fn test_collapse_all_after_expand_all() {
    let mut engine = engine_with(HierarchyConfig::default());
    engine.expand_all();
    engine.collapse_all();
    assert_eq!(visible(&engine), ["P1", "P2"]);
    assert_eq!(engine.statistics().expanded_count, 0);
}

#[test]
fn test_unknown_ids_are_ignored() {
    let mut engine = engine_with(HierarchyConfig::default());
    let log = event_log(&mut engine);

    engine.expand_node("stale", ExpandOptions::recursive());
    engine.collapse_node("stale");
    engine.toggle_node("stale");
    engine.expand_to("stale");

    assert!(engine.node("stale").is_none());
    assert!(engine.children("stale").is_empty());
    assert!(!engine.is_expanded("stale"));
    assert_eq!(visible(&engine), ["P1", "P2"]);
    assert!(log.lock().unwrap().is_empty());
}

#[test]
fn test_events_carry_changed_ids() {
    let mut engine = engine_with(HierarchyConfig::default());
    let log = event_log(&mut engine);

    engine.expand_node("P1", ExpandOptions::default());
    engine.collapse_node("P1");
    engine.expand_all();
    engine.collapse_all();

    let log = log.lock().unwrap();
    let kinds: Vec<_> = log.iter().map(|e| e.kind).collect();
    assert_eq!(
        kinds,
        [
            EventKind::Expand,
            EventKind::Collapse,
            EventKind::ExpandAll,
            EventKind::CollapseAll
        ]
    );
    assert_eq!(log[0].node_ids, ["P1", "C1", "C2"]);
    assert_eq!(log[1].node_ids, ["P1", "C1", "C2"]);
}

#[test]
fn test_kind_filter_and_unsubscribe() {
    let mut engine = engine_with(HierarchyConfig::default());
    let count = Arc::new(Mutex::new(0));
    let sink = Arc::clone(&count);
    let id = engine.on(EventKind::Collapse, move |_| *sink.lock().unwrap() += 1);

    engine.expand_node("P1", ExpandOptions::default());
    engine.collapse_node("P1");
    assert_eq!(*count.lock().unwrap(), 1);

    assert!(engine.off(id));
    engine.collapse_node("P1");
    assert_eq!(*count.lock().unwrap(), 1);
}

#[test]
fn test_initialize_publishes_build() {
    let mut engine: HierarchyEngine = HierarchyEngine::new(HierarchyConfig::default());
    let log = event_log(&mut engine);

    engine.initialize(&parents(), &children());

    let log = log.lock().unwrap();
    assert_eq!(log.len(), 1);
    assert_eq!(log[0].kind, EventKind::Build);
    assert_eq!(log[0].node_ids, ["P1", "P2"]);
}

#[test]
fn test_failed_detection_leaves_state_empty() {
    let mut engine = engine_with(HierarchyConfig::default());
    engine.expand_all();

    assert!(!engine.initialize(&parents(), &[]));

    assert_eq!(engine.statistics().total_nodes, 0);
    assert!(engine.visible_nodes().is_empty());
    assert!(engine.relationship().is_none());
    assert!(!engine.detection().unwrap().warnings.is_empty());
    assert_eq!(engine.metrics().node_count, 0);
}

#[test]
fn test_disabled_builds_nothing() {
    let mut engine = HierarchyEngine::new(HierarchyConfig::default().with_enabled(false));
    assert!(!engine.initialize(&parents(), &children()));
    assert!(engine.state().is_empty());
    assert!(engine.detection().is_none());
}

#[test]
fn test_invalid_config_builds_nothing() {
    let mut engine = HierarchyEngine::new(HierarchyConfig::default().with_max_depth(0));
    assert!(!engine.initialize(&parents(), &children()));
    assert!(engine.state().is_empty());
}

#[test]
fn test_rebuild_discards_expansion() {
    let mut engine = engine_with(HierarchyConfig::default());
    engine.expand_node("P1", ExpandOptions::default());

    engine.initialize(&parents(), &children());

    assert!(!engine.is_expanded("P1"));
    assert_eq!(visible(&engine), ["P1", "P2"]);
}

#[test]
fn test_point_queries() {
    let engine = engine_with(HierarchyConfig::default());

    let kids: Vec<_> = engine.children("P1").iter().map(|n| n.id.as_str()).collect();
    assert_eq!(kids, ["C1", "C2"]);
    assert_eq!(engine.parent("C2").unwrap().id, "P1");
    assert!(engine.parent("P1").is_none());
    let path: Vec<_> = engine.path("C2").iter().map(|n| n.id.as_str()).collect();
    assert_eq!(path, ["P1", "C2"]);
    assert_eq!(engine.children_cache("P1").unwrap(), ["C1", "C2"]);
    assert!(engine.children_cache("P2").is_none());
}

#[test]
fn test_expand_to_child() {
    let mut engine = engine_with(HierarchyConfig::default());
    engine.expand_to("C2");
    assert_eq!(visible(&engine), ["P1", "C1", "C2", "P2"]);
}

#[test]
fn test_statistics_and_metrics() {
    let mut engine = engine_with(HierarchyConfig::default());
    engine.expand_node("P1", ExpandOptions::default());

    let stats = engine.statistics();
    assert_eq!(stats.total_nodes, 4);
    assert_eq!(stats.root_count, 2);
    assert_eq!(stats.child_count, 2);
    assert_eq!(stats.expanded_count, 1);
    assert_eq!(stats.visible_count, 4);
    assert_eq!(stats.max_depth, 1);
    assert_eq!(stats.orphan_count, 1);

    let metrics = engine.metrics();
    assert_eq!(metrics.node_count, 4);
    assert_eq!(metrics.cache_hit_rate, 0.0);
}

#[test]
fn test_dispose_releases_records() {
    let parents = parents();
    let children = children();
    let mut engine = HierarchyEngine::new(HierarchyConfig::default());
    engine.initialize(&parents, &children);
    assert_eq!(Arc::strong_count(&parents[0]), 2);

    let log = event_log(&mut engine);
    engine.dispose();

    assert_eq!(Arc::strong_count(&parents[0]), 1);
    assert!(engine.visible_nodes().is_empty());
    assert_eq!(log.lock().unwrap()[0].kind, EventKind::Dispose);

    // Handlers are gone after dispose
    engine.initialize(&parents, &children);
    assert_eq!(log.lock().unwrap().len(), 1);
}

#[test]
fn test_lookup_reference_rows_from_json() {
    let parents: Vec<Record> = serde_json::from_str(
        r#"[
            {"accountid": "11111111-1111-1111-1111-111111111111", "name": "Contoso"},
            {"accountid": "22222222-2222-2222-2222-222222222222", "name": "Fabrikam"}
        ]"#,
    )
    .unwrap();
    let children: Vec<Record> = serde_json::from_str(
        r#"[
            {
                "contactid": "33333333-3333-3333-3333-333333333333",
                "_parentcustomerid_value": "22222222-2222-2222-2222-222222222222",
                "_parentcustomerid_value@Microsoft.Dynamics.CRM.lookuplogicalname": "account"
            }
        ]"#,
    )
    .unwrap();
    let parents: Vec<_> = parents.into_iter().map(Arc::new).collect();
    let children: Vec<_> = children.into_iter().map(Arc::new).collect();

    let mut engine = HierarchyEngine::new(HierarchyConfig::default());
    assert!(engine.initialize(&parents, &children));

    let relationship = engine.relationship().unwrap();
    assert_eq!(relationship.parent_key, "accountid");
    assert_eq!(relationship.child_key, "contactid");
    assert_eq!(relationship.reference_column, "parentcustomerid");

    engine.expand_all();
    assert_eq!(
        visible(&engine),
        [
            "11111111-1111-1111-1111-111111111111",
            "22222222-2222-2222-2222-222222222222",
            "33333333-3333-3333-3333-333333333333",
        ]
    );
}

#[test]
fn test_node_ids_match_host_key_text() {
    let parents: Vec<Record> = serde_json::from_str(
        r#"[
            {"ID": "AAAAAAAA-1111-2222-3333-444444444444"},
            {"ID": "2024-01-02T03:04:05Z"}
        ]"#,
    )
    .unwrap();
    let children: Vec<Record> = serde_json::from_str(
        r#"[{"CID": "C1", "ParentID": "AAAAAAAA-1111-2222-3333-444444444444"}]"#,
    )
    .unwrap();
    let parents: Vec<_> = parents.into_iter().map(Arc::new).collect();
    let children: Vec<_> = children.into_iter().map(Arc::new).collect();

    let mut engine = HierarchyEngine::new(HierarchyConfig::default());
    assert!(engine.initialize(&parents, &children));

    assert_eq!(
        engine.root_ids(),
        ["AAAAAAAA-1111-2222-3333-444444444444", "2024-01-02T03:04:05Z"]
    );
    assert!(engine.node("2024-01-02T03:04:05Z").is_some());
    let host_id = "AAAAAAAA-1111-2222-3333-444444444444";
    assert_eq!(engine.node(host_id).unwrap().child_count, 1);
    assert_eq!(engine.parent("C1").unwrap().id, host_id);
}

#[test]
fn test_custom_detector() {
    let detector = RelationshipDetector::with_patterns(["*_no"], ["owner*"]).unwrap();
    let parents = vec![Arc::new(Record::new().set("order_no", 10))];
    let children = vec![Arc::new(
        Record::new().set("line_no", 1).set("owner_order", 10),
    )];

    let mut engine = HierarchyEngine::new(HierarchyConfig::default()).with_detector(detector);
    assert!(engine.initialize(&parents, &children));

    assert_eq!(engine.relationship().unwrap().reference_column, "owner_order");
    assert_eq!(engine.children_cache("10").unwrap(), ["1"]);
}

#[test]
fn test_root_flag() {
    let engine = engine_with(HierarchyConfig::default());
    assert!(engine.node("P1").unwrap().is_root());
    assert!(!engine.node("C1").unwrap().is_root());
}
