//! Two-column layout of a hypergraph.
//!
//! The hypergraph is turned into its node/hyperedge incidence graph, split
//! into connected components, and each component is ordered and stacked
//! below the previous one.

pub mod spectral;

use crate::ir::{BipartiteGraph, Hypergraph, VertexId};
use petgraph::graph::NodeIndex;
use serde::Serialize;
use std::collections::{BTreeMap, HashMap};
use thiserror::Error;

pub use spectral::spectral_ordering;

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct Point {
    pub x: f32,
    pub y: f32,
}

impl Point {
    pub fn new(x: f32, y: f32) -> Self {
        Self { x, y }
    }

    pub fn transposed(self) -> Self {
        Self {
            x: self.y,
            y: self.x,
        }
    }
}

pub type Positions = BTreeMap<VertexId, Point>;

/// Caller-supplied node ranks. Lower ranks come first.
pub type NodeOrder = HashMap<String, usize>;

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TwoColumnOptions {
    /// Blank space inserted between stacked components.
    pub spacing: f32,
    /// Distance between the node column and the hyperedge column.
    pub width: f32,
    /// Lay columns out as rows.
    pub flip_orientation: bool,
}

impl Default for TwoColumnOptions {
    fn default() -> Self {
        Self {
            spacing: 0.0,
            width: 1.0,
            flip_orientation: false,
        }
    }
}

#[derive(Debug, Error, PartialEq)]
pub enum LayoutError {
    #[error("component spacing must be a finite non-negative number, got {0}")]
    InvalidSpacing(f32),
    #[error("column width must be a finite number, got {0}")]
    InvalidWidth(f32),
}

/// Placement of one connected component.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ComponentSpan {
    pub offset: f32,
    pub height: usize,
    pub nodes: Vec<String>,
    pub edges: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TwoColumnLayout {
    pub positions: Positions,
    pub components: Vec<ComponentSpan>,
}

/// Computes node and hyperedge positions.
///
/// Nodes sit in the column `x = 0`, hyperedges in `x = options.width` (rows
/// instead of columns with `flip_orientation`). Within a component both
/// columns are centered on the taller one.
pub fn layout_two_column(
    graph: &Hypergraph,
    options: &TwoColumnOptions,
    node_order: Option<&NodeOrder>,
) -> Result<Positions, LayoutError> {
    Ok(compute_two_column_layout(graph, options, node_order)?.positions)
}

/// Like [`layout_two_column`], also reporting each component's span.
pub fn compute_two_column_layout(
    graph: &Hypergraph,
    options: &TwoColumnOptions,
    node_order: Option<&NodeOrder>,
) -> Result<TwoColumnLayout, LayoutError> {
    if !options.spacing.is_finite() || options.spacing < 0.0 {
        return Err(LayoutError::InvalidSpacing(options.spacing));
    }
    if !options.width.is_finite() {
        return Err(LayoutError::InvalidWidth(options.width));
    }

    let bipartite = graph.bipartite();
    let components = bipartite.connected_components();
    tracing::debug!(
        nodes = graph.nodes().len(),
        edges = graph.edges().len(),
        components = components.len(),
        "two-column layout"
    );

    let mut positions = Positions::new();
    let mut spans = Vec::with_capacity(components.len());
    let mut offset = 0.0_f32;

    for component in &components {
        let rank = component_ranks(&bipartite, component, node_order);
        let mut nodes: Vec<&VertexId> = Vec::new();
        let mut edges: Vec<&VertexId> = Vec::new();
        for ix in component {
            let id = bipartite.vertex(*ix);
            if id.is_node() {
                nodes.push(id);
            } else {
                edges.push(id);
            }
        }
        nodes.sort_by_key(|id| rank.get(*id).copied());
        edges.sort_by_key(|id| rank.get(*id).copied());

        let height = nodes.len().max(edges.len());
        stack(&mut positions, &nodes, 0.0, height, offset, options.flip_orientation);
        stack(
            &mut positions,
            &edges,
            options.width,
            height,
            offset,
            options.flip_orientation,
        );
        tracing::trace!(
            offset,
            height,
            nodes = nodes.len(),
            edges = edges.len(),
            "stacked component"
        );

        spans.push(ComponentSpan {
            offset,
            height,
            nodes: nodes.iter().map(|id| id.name().to_string()).collect(),
            edges: edges.iter().map(|id| id.name().to_string()).collect(),
        });
        offset += height as f32 + options.spacing;
    }

    Ok(TwoColumnLayout {
        positions,
        components: spans,
    })
}

/// Sort key: (group, rank, insertion index). Group 1 holds nodes the caller's
/// order does not mention.
type RankKey = (u8, usize, usize);

/// Bipartite vertices are added nodes first, then hyperedges, each in
/// insertion order, so a vertex's graph index is its insertion index.
fn component_ranks(
    bipartite: &BipartiteGraph,
    component: &[NodeIndex],
    node_order: Option<&NodeOrder>,
) -> HashMap<VertexId, RankKey> {
    let mut ranks = HashMap::with_capacity(component.len());
    match node_order {
        None => {
            let ordered = spectral_ordering(&bipartite.graph, component);
            for (pos, ix) in ordered.into_iter().enumerate() {
                ranks.insert(bipartite.vertex(ix).clone(), (0, pos, 0));
            }
        }
        Some(order) => {
            for ix in component {
                let id = bipartite.vertex(*ix);
                let inserted = ix.index();
                let key = match id {
                    VertexId::Edge(_) => (0, inserted, 0),
                    VertexId::Node(name) => match order.get(name) {
                        Some(rank) => (0, *rank, inserted),
                        None => (1, inserted, 0),
                    },
                };
                ranks.insert(id.clone(), key);
            }
        }
    }
    ranks
}

fn stack(
    positions: &mut Positions,
    vertices: &[&VertexId],
    x: f32,
    height: usize,
    offset: f32,
    flip_orientation: bool,
) {
    let centering = (height - vertices.len()) as f32 / 2.0;
    for (i, id) in vertices.iter().enumerate() {
        let point = Point::new(x, i as f32 + offset + centering);
        let point = if flip_orientation {
            point.transposed()
        } else {
            point
        };
        positions.insert((*id).clone(), point);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn pos(positions: &Positions, id: VertexId) -> Point {
        *positions.get(&id).unwrap()
    }

    #[test]
    fn empty_hypergraph_has_no_positions() {
        let positions =
            layout_two_column(&Hypergraph::new(), &TwoColumnOptions::default(), None).unwrap();
        assert!(positions.is_empty());
    }

    #[test]
    fn single_edge_is_centered() {
        let graph = Hypergraph::from_edges([("e", ["a", "b"])]);
        let layout =
            compute_two_column_layout(&graph, &TwoColumnOptions::default(), None).unwrap();
        assert_eq!(layout.positions.len(), 3);
        assert_eq!(layout.components.len(), 1);
        assert_eq!(layout.components[0].height, 2);

        let a = pos(&layout.positions, VertexId::node("a"));
        let b = pos(&layout.positions, VertexId::node("b"));
        let e = pos(&layout.positions, VertexId::edge("e"));
        assert_eq!(a.x, 0.0);
        assert_eq!(b.x, 0.0);
        let mut ys = vec![a.y, b.y];
        ys.sort_by(f32::total_cmp);
        assert_eq!(ys, vec![0.0, 1.0]);
        assert_eq!(e, Point::new(1.0, 0.5));
    }

    #[test]
    fn disjoint_edges_stack_with_spacing() {
        let graph = Hypergraph::from_edges([("e1", ["a"]), ("e2", ["b"])]);
        let options = TwoColumnOptions {
            spacing: 0.75,
            width: 2.0,
            flip_orientation: false,
        };
        let layout = compute_two_column_layout(&graph, &options, None).unwrap();
        assert_eq!(layout.components.len(), 2);
        assert_eq!(layout.components[0].offset, 0.0);
        assert_eq!(layout.components[1].offset, 1.75);
        assert_eq!(pos(&layout.positions, VertexId::node("a")), Point::new(0.0, 0.0));
        assert_eq!(pos(&layout.positions, VertexId::edge("e1")), Point::new(2.0, 0.0));
        assert_eq!(pos(&layout.positions, VertexId::node("b")), Point::new(0.0, 1.75));
        assert_eq!(pos(&layout.positions, VertexId::edge("e2")), Point::new(2.0, 1.75));
    }

    #[test]
    fn flip_transposes_coordinates() {
        let graph = Hypergraph::from_edges([("e1", vec!["a", "b", "c"]), ("e2", vec!["c", "d"])]);
        let plain = layout_two_column(&graph, &TwoColumnOptions::default(), None).unwrap();
        let flipped = layout_two_column(
            &graph,
            &TwoColumnOptions {
                flip_orientation: true,
                ..Default::default()
            },
            None,
        )
        .unwrap();
        assert_eq!(plain.len(), flipped.len());
        for (id, point) in &plain {
            assert_eq!(flipped[id], point.transposed());
        }
    }

    #[test]
    fn isolated_node_gets_its_own_row() {
        let mut graph = Hypergraph::from_edges([("e1", ["a", "b"])]);
        graph.ensure_node("z");
        let layout =
            compute_two_column_layout(&graph, &TwoColumnOptions::default(), None).unwrap();
        assert_eq!(layout.components.len(), 2);
        assert_eq!(layout.components[1].height, 1);
        assert!(layout.components[1].edges.is_empty());
        assert_eq!(pos(&layout.positions, VertexId::node("z")), Point::new(0.0, 2.0));
    }

    #[test]
    fn node_order_overrides_spectral_ranks() {
        let graph = Hypergraph::from_edges([("e1", vec!["a", "b"]), ("e2", vec!["b", "c"])]);
        let order: NodeOrder = [("c", 0), ("a", 1), ("b", 2)]
            .into_iter()
            .map(|(k, v)| (k.to_string(), v))
            .collect();
        let layout =
            compute_two_column_layout(&graph, &TwoColumnOptions::default(), Some(&order))
                .unwrap();
        assert_eq!(layout.components[0].nodes, vec!["c", "a", "b"]);
    }

    #[test]
    fn partial_node_order_puts_unranked_nodes_last() {
        let graph = Hypergraph::from_edges([("e1", vec!["a", "b", "c"])]);
        let order: NodeOrder = [("c".to_string(), 5)].into_iter().collect();
        let layout =
            compute_two_column_layout(&graph, &TwoColumnOptions::default(), Some(&order))
                .unwrap();
        assert_eq!(layout.components[0].nodes, vec!["c", "a", "b"]);

        let graph = Hypergraph::from_edges([("e1", vec!["a", "b", "c", "d", "e"])]);
        let order: NodeOrder = [("d".to_string(), 0), ("b".to_string(), 1)]
            .into_iter()
            .collect();
        let layout =
            compute_two_column_layout(&graph, &TwoColumnOptions::default(), Some(&order))
                .unwrap();
        assert_eq!(layout.components[0].nodes, vec!["d", "b", "a", "c", "e"]);
    }

    #[test]
    fn node_order_keeps_hyperedges_in_insertion_order() {
        let graph = Hypergraph::from_edges([
            ("e1", vec!["a", "c"]),
            ("e2", vec!["b"]),
            ("e3", vec!["a", "b"]),
        ]);
        let order: NodeOrder = [("a", 0), ("b", 1), ("c", 2)]
            .into_iter()
            .map(|(k, v)| (k.to_string(), v))
            .collect();
        let layout =
            compute_two_column_layout(&graph, &TwoColumnOptions::default(), Some(&order))
                .unwrap();
        assert_eq!(layout.components.len(), 1);
        assert_eq!(layout.components[0].nodes, vec!["a", "b", "c"]);
        assert_eq!(layout.components[0].edges, vec!["e1", "e2", "e3"]);
        for (i, uid) in ["e1", "e2", "e3"].into_iter().enumerate() {
            assert_eq!(pos(&layout.positions, VertexId::edge(uid)), Point::new(1.0, i as f32));
        }
    }

    #[test]
    fn empty_hyperedge_gets_its_own_row() {
        let mut graph = Hypergraph::from_edges([("e1", ["a"])]);
        graph.add_edge("lonely", Vec::<String>::new());
        let options = TwoColumnOptions {
            width: 3.0,
            ..Default::default()
        };
        let layout = compute_two_column_layout(&graph, &options, None).unwrap();
        assert_eq!(layout.components.len(), 2);
        let span = &layout.components[1];
        assert_eq!(span.height, 1);
        assert!(span.nodes.is_empty());
        assert_eq!(span.edges, vec!["lonely"]);
        assert_eq!(
            pos(&layout.positions, VertexId::edge("lonely")),
            Point::new(3.0, 1.0)
        );
    }

    #[test]
    fn rejects_negative_spacing() {
        let options = TwoColumnOptions {
            spacing: -1.0,
            ..Default::default()
        };
        let err = layout_two_column(&Hypergraph::new(), &options, None).unwrap_err();
        assert_eq!(err, LayoutError::InvalidSpacing(-1.0));
    }

    #[test]
    fn layout_is_idempotent() {
        let graph = Hypergraph::from_edges([
            ("e1", vec!["a", "b", "c"]),
            ("e2", vec!["c", "d"]),
            ("e3", vec!["d", "e", "a"]),
        ]);
        let first = layout_two_column(&graph, &TwoColumnOptions::default(), None).unwrap();
        let second = layout_two_column(&graph, &TwoColumnOptions::default(), None).unwrap();
        assert_eq!(first, second);
    }
}
