use crate::ir::{Hypergraph, VertexId};
use std::collections::HashMap;

pub type Labels = HashMap<VertexId, String>;

/// Display text for a vertex that may stand for a collapsed group.
///
/// Plain vertices (no recorded members, or a single member) show their id.
/// Groups show their members joined by `", "`, or with `count` set, the first
/// member followed by how many others were merged into it.
pub fn group_label(id: &str, members: &[String], count: bool) -> String {
    match members {
        [] | [_] => id.to_string(),
        [first, rest @ ..] if count => format!("{first} +{} more", rest.len()),
        _ => members.join(", "),
    }
}

pub fn group_labels<'a, I>(items: I, count: bool) -> Labels
where
    I: IntoIterator<Item = (VertexId, &'a [String])>,
{
    items
        .into_iter()
        .map(|(id, members)| {
            let text = group_label(id.name(), members, count);
            (id, text)
        })
        .collect()
}

/// Default labels for every node and hyperedge of `graph`, with caller
/// overrides applied last.
pub fn default_labels(
    graph: &Hypergraph,
    node_counts: bool,
    edge_counts: bool,
    overrides: &Labels,
) -> Labels {
    let mut labels = group_labels(
        graph
            .nodes()
            .iter()
            .map(|n| (VertexId::node(n.id.as_str()), n.members.as_slice())),
        node_counts,
    );
    labels.extend(group_labels(
        graph
            .edges()
            .iter()
            .map(|e| (VertexId::edge(e.uid.as_str()), e.members.as_slice())),
        edge_counts,
    ));
    for (id, text) in overrides {
        labels.insert(id.clone(), text.clone());
    }
    labels
}

/// Label text for `id`, falling back to the raw identifier.
pub fn label_for<'a>(labels: &'a Labels, id: &'a VertexId) -> &'a str {
    labels.get(id).map(String::as_str).unwrap_or_else(|| id.name())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn plain_ids_label_themselves() {
        assert_eq!(group_label("a", &[], false), "a");
        assert_eq!(group_label("a", &[], true), "a");
        assert_eq!(group_label("a", &["a".to_string()], true), "a");
    }

    #[test]
    fn groups_join_or_count() {
        let members = vec!["a".to_string(), "b".to_string(), "c".to_string()];
        assert_eq!(group_label("a", &members, false), "a, b, c");
        assert_eq!(group_label("a", &members, true), "a +2 more");
    }

    #[test]
    fn overrides_win() {
        let graph = Hypergraph::from_edges([("e1", ["a", "b"])]).collapse_nodes();
        let mut overrides = Labels::new();
        overrides.insert(VertexId::edge("e1"), "first".to_string());
        let labels = default_labels(&graph, true, false, &overrides);
        assert_eq!(labels[&VertexId::node("a")], "a +1 more");
        assert_eq!(labels[&VertexId::edge("e1")], "first");
        assert_eq!(label_for(&labels, &VertexId::node("zzz")), "zzz");
    }
}
