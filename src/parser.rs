use crate::ir::Hypergraph;
use crate::layout::NodeOrder;
use once_cell::sync::Lazy;
use regex::Regex;
use serde::Deserialize;
use thiserror::Error;

static ENTRY_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^(?P<key>[^:]+?)\s*:\s*(?P<members>.*)$").unwrap());

#[derive(Debug, Error)]
pub enum ParseError {
    #[error("line {line}: expected `name: member, member, ...`, got `{text}`")]
    Syntax { line: usize, text: String },
    #[error("line {line}: hyperedge `{uid}` has no members")]
    EmptyEdge { line: usize, uid: String },
    #[error("hyperedge `{0}` has no members")]
    EmptyJsonEdge(String),
    #[error("invalid hypergraph JSON: {0}")]
    Json(String),
}

#[derive(Debug, Clone)]
pub struct ParseOutput {
    pub hypergraph: Hypergraph,
    pub node_order: Option<NodeOrder>,
}

/// Reads a hypergraph from either the line format or JSON.
///
/// Line format, one entry per line:
///
/// ```text
/// %% comment
/// e1: a, b, c
/// e2: c, d
/// node: lonely
/// order: d, c, b, a
/// ```
pub fn parse_hypergraph(input: &str) -> Result<ParseOutput, ParseError> {
    if input.trim_start().starts_with('{') {
        parse_json(input)
    } else {
        parse_lines(input)
    }
}

fn split_members(raw: &str) -> Vec<String> {
    raw.split(',')
        .map(|m| m.trim())
        .filter(|m| !m.is_empty())
        .map(str::to_string)
        .collect()
}

fn order_from(names: Vec<String>) -> NodeOrder {
    let mut order = NodeOrder::new();
    for name in names {
        let rank = order.len();
        order.entry(name).or_insert(rank);
    }
    order
}

fn parse_lines(input: &str) -> Result<ParseOutput, ParseError> {
    let mut hypergraph = Hypergraph::new();
    let mut order_names: Option<Vec<String>> = None;

    for (idx, raw_line) in input.lines().enumerate() {
        let line = idx + 1;
        let trimmed = raw_line.trim();
        if trimmed.is_empty() || trimmed.starts_with("%%") {
            continue;
        }
        let Some(caps) = ENTRY_RE.captures(trimmed) else {
            return Err(ParseError::Syntax {
                line,
                text: trimmed.to_string(),
            });
        };
        let key = caps["key"].trim();
        let members = split_members(&caps["members"]);
        match key {
            "node" | "nodes" => {
                for member in &members {
                    hypergraph.ensure_node(member);
                }
            }
            "order" => {
                order_names.get_or_insert_with(Vec::new).extend(members);
            }
            uid => {
                if members.is_empty() {
                    return Err(ParseError::EmptyEdge {
                        line,
                        uid: uid.to_string(),
                    });
                }
                hypergraph.add_edge(uid, members);
            }
        }
    }

    tracing::debug!(
        nodes = hypergraph.nodes().len(),
        edges = hypergraph.edges().len(),
        "parsed hypergraph"
    );
    Ok(ParseOutput {
        hypergraph,
        node_order: order_names.map(order_from),
    })
}

#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum EdgesFile {
    Map(serde_json::Map<String, serde_json::Value>),
    List(Vec<EdgeEntry>),
}

#[derive(Debug, Deserialize)]
struct EdgeEntry {
    uid: String,
    nodes: Vec<String>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct HypergraphFile {
    #[serde(default)]
    nodes: Vec<String>,
    edges: Option<EdgesFile>,
    node_order: Option<Vec<String>>,
}

fn parse_json(input: &str) -> Result<ParseOutput, ParseError> {
    let file: HypergraphFile = match serde_json::from_str(input) {
        Ok(file) => file,
        Err(json_err) => json5::from_str(input)
            .map_err(|json5_err| ParseError::Json(format!("{json_err}; as JSON5: {json5_err}")))?,
    };

    let mut hypergraph = Hypergraph::new();
    let entries: Vec<(String, Vec<String>)> = match file.edges {
        None => Vec::new(),
        Some(EdgesFile::List(list)) => list.into_iter().map(|e| (e.uid, e.nodes)).collect(),
        Some(EdgesFile::Map(map)) => {
            let mut entries = Vec::with_capacity(map.len());
            for (uid, value) in map {
                let members: Vec<String> = serde_json::from_value(value)
                    .map_err(|err| ParseError::Json(format!("edge `{uid}`: {err}")))?;
                entries.push((uid, members));
            }
            entries
        }
    };
    for (uid, members) in entries {
        if members.is_empty() {
            return Err(ParseError::EmptyJsonEdge(uid));
        }
        hypergraph.add_edge(uid, members);
    }
    for node in &file.nodes {
        hypergraph.ensure_node(node);
    }

    Ok(ParseOutput {
        hypergraph,
        node_order: file.node_order.map(order_from),
    })
}
