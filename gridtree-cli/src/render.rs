//! Text rendering of the visible projection, one line per grid row.

use std::fmt::Write;

use gridtree_lib::HierarchyConfig;
use gridtree_lib::HierarchyEngine;
use gridtree_lib::hierarchy::HierarchyNode;
use gridtree_lib::model::Record;

/// Renders every visible node as an indented row.
pub fn render_rows(engine: &HierarchyEngine, config: &HierarchyConfig) -> String {
    let mut out = String::new();
    for node in engine.visible_nodes() {
        let _ = writeln!(out, "{}", render_row(node, config));
    }
    out
}

fn render_row(node: &HierarchyNode<Record>, config: &HierarchyConfig) -> String {
    // Pixels to columns, roughly one column per 10px
    let indent = " ".repeat((config.indent_for(node.level) / 10) as usize);
    let affordance = match (node.is_expandable(), node.is_expanded) {
        (false, _) => " ",
        (true, true) => "▼",
        (true, false) => "▶",
    };
    let count = if node.has_children {
        format!(" ({})", node.child_count)
    } else {
        String::new()
    };
    let fields = node
        .data
        .iter()
        .map(|(name, value)| {
            let shown = node
                .data
                .get_formatted(name)
                .map(str::to_string)
                .or_else(|| value.as_key())
                .unwrap_or_default();
            format!("{name}={shown}")
        })
        .collect::<Vec<_>>()
        .join(" ");
    format!("{indent}{affordance} {}{count}  {fields}", node.id)
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use gridtree_lib::hierarchy::ExpandOptions;
    use pretty_assertions::assert_eq;

    use super::*;

    #[test]
    fn test_render_rows() {
        let parents = vec![
            Arc::new(Record::new().set("ID", "P1")),
            Arc::new(Record::new().set("ID", "P2")),
        ];
        let children = vec![Arc::new(Record::new().set("CID", "C1").set("ParentID", "P1"))];
        let config = HierarchyConfig::default();
        let mut engine = HierarchyEngine::new(config.clone());
        engine.initialize(&parents, &children);
        engine.expand_node("P1", ExpandOptions::default());

        assert_eq!(
            render_rows(&engine, &config),
            "▼ P1 (1)  ID=P1\n    C1  CID=C1 ParentID=P1\n  P2  ID=P2\n"
        );
    }

    #[test]
    fn test_render_prefers_formatted_values() {
        let parents = vec![Arc::new(
            Record::new()
                .set("ID", "P1")
                .set("statuscode", 1)
                .with_formatted("statuscode", "Active"),
        )];
        let children = vec![Arc::new(Record::new().set("CID", "C1").set("ParentID", "P1"))];
        let config = HierarchyConfig::default();
        let mut engine = HierarchyEngine::new(config.clone());
        engine.initialize(&parents, &children);

        assert_eq!(
            render_rows(&engine, &config),
            "▶ P1 (1)  ID=P1 statuscode=Active\n"
        );
    }
}
