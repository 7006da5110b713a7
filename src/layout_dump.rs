use crate::ir::{Hypergraph, VertexId};
use crate::labels::label_for;
use crate::layout::ComponentSpan;
use crate::render::{Drawing, LineSegment};
use serde::Serialize;
use std::fs::File;
use std::io::BufWriter;
use std::path::Path;

#[derive(Debug, Serialize)]
pub struct LayoutDump {
    pub node_count: usize,
    pub edge_count: usize,
    pub vertices: Vec<VertexDump>,
    pub components: Vec<ComponentSpan>,
    pub segments: Vec<LineSegment>,
}

#[derive(Debug, Serialize)]
pub struct VertexDump {
    #[serde(flatten)]
    pub id: VertexId,
    pub label: String,
    pub x: f32,
    pub y: f32,
}

impl LayoutDump {
    pub fn from_drawing(drawing: &Drawing, graph: &Hypergraph) -> Self {
        let vertices = graph
            .vertex_ids()
            .filter_map(|id| {
                let point = drawing.positions.get(&id)?;
                Some(VertexDump {
                    label: label_for(&drawing.labels, &id).to_string(),
                    x: point.x,
                    y: point.y,
                    id,
                })
            })
            .collect();

        LayoutDump {
            node_count: graph.nodes().len(),
            edge_count: graph.edges().len(),
            vertices,
            components: drawing.components.clone(),
            segments: drawing.segments.clone(),
        }
    }
}

pub fn write_layout_dump(path: &Path, drawing: &Drawing, graph: &Hypergraph) -> anyhow::Result<()> {
    let file = File::create(path)?;
    let writer = BufWriter::new(file);
    let dump = LayoutDump::from_drawing(drawing, graph);
    serde_json::to_writer_pretty(writer, &dump)?;
    Ok(())
}
