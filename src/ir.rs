use petgraph::graph::{NodeIndex, UnGraph};
use petgraph::visit::Bfs;
use serde::Serialize;
use std::collections::{BTreeSet, HashMap, HashSet};
use std::fmt;

/// Identifier of a vertex in the two-column diagram.
///
/// Nodes and hyperedges live in separate namespaces, so `Node("a")` and
/// `Edge("a")` are different vertices.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
#[serde(tag = "kind", content = "id", rename_all = "lowercase")]
pub enum VertexId {
    Node(String),
    Edge(String),
}

impl VertexId {
    pub fn node(id: impl Into<String>) -> Self {
        Self::Node(id.into())
    }

    pub fn edge(uid: impl Into<String>) -> Self {
        Self::Edge(uid.into())
    }

    pub fn name(&self) -> &str {
        match self {
            Self::Node(id) | Self::Edge(id) => id,
        }
    }

    pub fn is_node(&self) -> bool {
        matches!(self, Self::Node(_))
    }

    pub fn is_edge(&self) -> bool {
        matches!(self, Self::Edge(_))
    }

    /// Bipartite part: 0 for nodes, 1 for hyperedges.
    pub fn part(&self) -> u8 {
        match self {
            Self::Node(_) => 0,
            Self::Edge(_) => 1,
        }
    }
}

impl fmt::Display for VertexId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Node {
    pub id: String,
    /// Original node ids when this node stands for a collapsed group.
    pub members: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HyperEdge {
    pub uid: String,
    pub nodes: Vec<String>,
    /// Original hyperedge uids when this edge stands for a collapsed group.
    pub members: Vec<String>,
}

impl HyperEdge {
    pub fn contains(&self, node: &str) -> bool {
        self.nodes.iter().any(|n| n == node)
    }
}

/// A hypergraph with insertion-ordered nodes and hyperedges.
#[derive(Debug, Clone, Default)]
pub struct Hypergraph {
    nodes: Vec<Node>,
    edges: Vec<HyperEdge>,
    node_index: HashMap<String, usize>,
    edge_index: HashMap<String, usize>,
}

impl Hypergraph {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_edges<I, S, N>(edges: I) -> Self
    where
        I: IntoIterator<Item = (S, N)>,
        S: Into<String>,
        N: IntoIterator,
        N::Item: Into<String>,
    {
        let mut graph = Self::new();
        for (uid, members) in edges {
            graph.add_edge(uid, members);
        }
        graph
    }

    pub fn ensure_node(&mut self, id: &str) {
        if self.node_index.contains_key(id) {
            return;
        }
        self.node_index.insert(id.to_string(), self.nodes.len());
        self.nodes.push(Node {
            id: id.to_string(),
            members: Vec::new(),
        });
    }

    /// Adds `members` to hyperedge `uid`, creating the edge and any missing
    /// nodes. Repeated members are kept once.
    pub fn add_edge<S, N>(&mut self, uid: S, members: N)
    where
        S: Into<String>,
        N: IntoIterator,
        N::Item: Into<String>,
    {
        let uid = uid.into();
        let idx = match self.edge_index.get(&uid) {
            Some(idx) => *idx,
            None => {
                self.edge_index.insert(uid.clone(), self.edges.len());
                self.edges.push(HyperEdge {
                    uid,
                    nodes: Vec::new(),
                    members: Vec::new(),
                });
                self.edges.len() - 1
            }
        };
        for member in members {
            let member = member.into();
            self.ensure_node(&member);
            let edge = &mut self.edges[idx];
            if !edge.contains(&member) {
                edge.nodes.push(member);
            }
        }
    }

    pub fn nodes(&self) -> &[Node] {
        &self.nodes
    }

    pub fn edges(&self) -> &[HyperEdge] {
        &self.edges
    }

    pub fn node(&self, id: &str) -> Option<&Node> {
        self.node_index.get(id).map(|idx| &self.nodes[*idx])
    }

    pub fn edge(&self, uid: &str) -> Option<&HyperEdge> {
        self.edge_index.get(uid).map(|idx| &self.edges[*idx])
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty() && self.edges.is_empty()
    }

    /// All vertex ids: nodes first, then hyperedges.
    pub fn vertex_ids(&self) -> impl Iterator<Item = VertexId> + '_ {
        self.nodes
            .iter()
            .map(|n| VertexId::Node(n.id.clone()))
            .chain(self.edges.iter().map(|e| VertexId::Edge(e.uid.clone())))
    }

    /// `(node, edge uid)` for every membership, in edge order then member order.
    pub fn membership_pairs(&self) -> impl Iterator<Item = (&str, &str)> + '_ {
        self.edges.iter().flat_map(|edge| {
            edge.nodes
                .iter()
                .map(move |node| (node.as_str(), edge.uid.as_str()))
        })
    }

    pub fn bipartite(&self) -> BipartiteGraph {
        let mut graph: UnGraph<VertexId, ()> =
            UnGraph::with_capacity(self.nodes.len() + self.edges.len(), 0);
        let mut index = HashMap::new();
        for id in self.vertex_ids() {
            let ix = graph.add_node(id.clone());
            index.insert(id, ix);
        }
        for (node, uid) in self.membership_pairs() {
            if let (Some(a), Some(b)) = (
                index.get(&VertexId::node(node)),
                index.get(&VertexId::edge(uid)),
            ) {
                graph.add_edge(*a, *b, ());
            }
        }
        BipartiteGraph { graph, index }
    }

    /// Merges nodes that belong to exactly the same hyperedges. The merged node
    /// keeps the id of the first member and lists every member.
    pub fn collapse_nodes(&self) -> Self {
        let mut membership: HashMap<&str, BTreeSet<&str>> = HashMap::new();
        for (node, uid) in self.membership_pairs() {
            membership.entry(node).or_default().insert(uid);
        }
        let mut groups: Vec<(BTreeSet<&str>, Vec<String>)> = Vec::new();
        let mut rep_of: HashMap<&str, String> = HashMap::new();
        for node in &self.nodes {
            let key = membership.remove(node.id.as_str()).unwrap_or_default();
            let originals = expand_members(&node.id, &node.members);
            match groups.iter_mut().find(|(k, _)| *k == key) {
                Some((_, members)) => {
                    rep_of.insert(node.id.as_str(), members[0].clone());
                    members.extend(originals);
                }
                None => {
                    rep_of.insert(node.id.as_str(), originals[0].clone());
                    groups.push((key, originals));
                }
            }
        }

        let mut collapsed = Self::new();
        for (_, members) in groups {
            let rep = members[0].clone();
            collapsed.node_index.insert(rep.clone(), collapsed.nodes.len());
            collapsed.nodes.push(Node { id: rep, members });
        }
        for edge in &self.edges {
            let members: Vec<String> = edge
                .nodes
                .iter()
                .filter_map(|n| rep_of.get(n.as_str()).cloned())
                .collect();
            collapsed.add_edge(edge.uid.clone(), members);
            if let Some(idx) = collapsed.edge_index.get(&edge.uid) {
                collapsed.edges[*idx].members = edge.members.clone();
            }
        }
        collapsed
    }

    /// Merges hyperedges with identical member sets. The merged edge keeps the
    /// uid of the first member and lists every member.
    pub fn collapse_edges(&self) -> Self {
        let mut groups: Vec<(BTreeSet<&str>, usize, Vec<String>)> = Vec::new();
        for (idx, edge) in self.edges.iter().enumerate() {
            let key: BTreeSet<&str> = edge.nodes.iter().map(String::as_str).collect();
            let originals = expand_members(&edge.uid, &edge.members);
            match groups.iter_mut().find(|(k, _, _)| *k == key) {
                Some((_, _, members)) => members.extend(originals),
                None => groups.push((key, idx, originals)),
            }
        }

        let mut collapsed = Self::new();
        for node in &self.nodes {
            collapsed.ensure_node(&node.id);
            if let Some(idx) = collapsed.node_index.get(&node.id) {
                collapsed.nodes[*idx].members = node.members.clone();
            }
        }
        for (_, first, members) in groups {
            let edge = &self.edges[first];
            collapsed.add_edge(edge.uid.clone(), edge.nodes.iter().cloned());
            if let Some(idx) = collapsed.edge_index.get(&edge.uid) {
                collapsed.edges[*idx].members = members;
            }
        }
        collapsed
    }
}

fn expand_members(id: &str, members: &[String]) -> Vec<String> {
    if members.is_empty() {
        vec![id.to_string()]
    } else {
        members.to_vec()
    }
}

/// Node/hyperedge incidence graph of a [`Hypergraph`].
#[derive(Debug, Clone)]
pub struct BipartiteGraph {
    pub graph: UnGraph<VertexId, ()>,
    pub index: HashMap<VertexId, NodeIndex>,
}

impl BipartiteGraph {
    pub fn vertex(&self, ix: NodeIndex) -> &VertexId {
        &self.graph[ix]
    }

    pub fn vertex_count(&self) -> usize {
        self.graph.node_count()
    }

    /// Connected components in discovery order. Each component lists its
    /// vertices in breadth-first order from the earliest inserted vertex.
    pub fn connected_components(&self) -> Vec<Vec<NodeIndex>> {
        let mut seen: HashSet<NodeIndex> = HashSet::new();
        let mut components = Vec::new();
        for start in self.graph.node_indices() {
            if seen.contains(&start) {
                continue;
            }
            let mut component = Vec::new();
            let mut bfs = Bfs::new(&self.graph, start);
            while let Some(ix) = bfs.next(&self.graph) {
                seen.insert(ix);
                component.push(ix);
            }
            components.push(component);
        }
        components
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn add_edge_creates_nodes_once() {
        let mut graph = Hypergraph::new();
        graph.add_edge("e1", ["a", "b", "a"]);
        graph.add_edge("e2", ["b", "c"]);
        graph.add_edge("e1", ["c"]);
        let ids: Vec<&str> = graph.nodes().iter().map(|n| n.id.as_str()).collect();
        assert_eq!(ids, vec!["a", "b", "c"]);
        assert_eq!(graph.edge("e1").unwrap().nodes, vec!["a", "b", "c"]);
        assert_eq!(graph.membership_pairs().count(), 5);
    }

    #[test]
    fn node_and_edge_namespaces_are_disjoint() {
        let graph = Hypergraph::from_edges([("a", ["a", "b"])]);
        let bip = graph.bipartite();
        assert_eq!(bip.vertex_count(), 3);
        assert!(bip.index.contains_key(&VertexId::node("a")));
        assert!(bip.index.contains_key(&VertexId::edge("a")));
        assert_eq!(bip.graph.edge_count(), 2);
    }

    #[test]
    fn components_follow_discovery_order() {
        let mut graph = Hypergraph::from_edges([("e1", vec!["a"]), ("e2", vec!["b", "c"])]);
        graph.ensure_node("lonely");
        let bip = graph.bipartite();
        let components = bip.connected_components();
        assert_eq!(components.len(), 3);
        assert_eq!(bip.vertex(components[0][0]), &VertexId::node("a"));
        assert_eq!(components[1].len(), 3);
        assert_eq!(components[2].len(), 1);
        assert_eq!(bip.vertex(components[2][0]), &VertexId::node("lonely"));
    }

    #[test]
    fn collapse_nodes_merges_identical_memberships() {
        let graph = Hypergraph::from_edges([("e1", vec!["a", "b", "c"]), ("e2", vec!["c"])]);
        let collapsed = graph.collapse_nodes();
        assert_eq!(collapsed.nodes().len(), 2);
        assert_eq!(collapsed.nodes()[0].id, "a");
        assert_eq!(collapsed.nodes()[0].members, vec!["a", "b"]);
        assert_eq!(collapsed.edge("e1").unwrap().nodes, vec!["a", "c"]);
        assert_eq!(collapsed.edge("e2").unwrap().nodes, vec!["c"]);
    }

    #[test]
    fn collapse_edges_merges_identical_member_sets() {
        let graph = Hypergraph::from_edges([
            ("e1", vec!["a", "b"]),
            ("e2", vec!["b", "a"]),
            ("e3", vec!["c"]),
        ]);
        let collapsed = graph.collapse_edges();
        assert_eq!(collapsed.edges().len(), 2);
        assert_eq!(collapsed.edges()[0].uid, "e1");
        assert_eq!(collapsed.edges()[0].members, vec!["e1", "e2"]);
        assert_eq!(collapsed.edges()[1].members, vec!["e3"]);
        assert_eq!(collapsed.nodes().len(), 3);
    }
}
