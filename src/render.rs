pub mod canvas;
pub mod svg;

use crate::ir::{Hypergraph, VertexId};
use crate::labels::{Labels, default_labels, label_for};
use crate::layout::{
    ComponentSpan, LayoutError, NodeOrder, Point, Positions, TwoColumnOptions,
    compute_two_column_layout,
};
use crate::theme::Theme;
use std::collections::HashMap;
use thiserror::Error;

pub use canvas::{Canvas, CanvasOp, Circle, HAlign, LineSegment, RecordingCanvas, VAlign};
pub use svg::{SvgCanvas, write_output_svg};
#[cfg(feature = "png")]
pub use svg::write_output_png;

#[derive(Debug, Error, PartialEq)]
pub enum RenderError {
    #[error(transparent)]
    Layout(#[from] LayoutError),
    #[error("no position for {0:?}")]
    MissingPosition(VertexId),
}

/// A style value given once for everything or per identifier.
#[derive(Debug, Clone, PartialEq)]
pub enum PerItem<T> {
    Flat(T),
    ById(HashMap<String, T>),
}

impl<T> PerItem<T> {
    pub fn get(&self, id: &str) -> Option<&T> {
        match self {
            Self::Flat(value) => Some(value),
            Self::ById(map) => map.get(id),
        }
    }
}

impl<T> From<T> for PerItem<T> {
    fn from(value: T) -> Self {
        Self::Flat(value)
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct EdgeStyle {
    /// Line color per hyperedge. Falls back to the theme line color.
    pub edge_color: Option<PerItem<String>>,
    /// Line width per hyperedge. Falls back to the theme line width.
    pub line_width: Option<PerItem<f32>>,
    /// Marker color per node. Falls back to the theme node color.
    pub node_color: Option<PerItem<String>>,
    pub node_radius: f32,
}

impl Default for EdgeStyle {
    fn default() -> Self {
        Self {
            edge_color: None,
            line_width: None,
            node_color: None,
            node_radius: 0.1,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LabelOptions {
    pub with_node_labels: bool,
    pub with_edge_labels: bool,
    /// Downward shift of row labels in layout units.
    pub row_offset: f32,
}

impl Default for LabelOptions {
    fn default() -> Self {
        Self {
            with_node_labels: true,
            with_edge_labels: true,
            row_offset: 0.15,
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct DrawOptions {
    pub labels: LabelOptions,
    pub with_node_counts: bool,
    pub with_edge_counts: bool,
    /// Cycle hyperedge colors through the theme palette.
    pub with_color: bool,
    /// Distance between the node and hyperedge columns.
    pub column_spacing: f32,
    /// Gap between stacked components.
    pub spacing: f32,
    pub flip_orientation: bool,
    pub style: EdgeStyle,
    pub node_order: Option<NodeOrder>,
    pub label_overrides: Labels,
}

impl Default for DrawOptions {
    fn default() -> Self {
        Self {
            labels: LabelOptions::default(),
            with_node_counts: false,
            with_edge_counts: false,
            with_color: true,
            column_spacing: 1.0,
            spacing: 0.0,
            flip_orientation: false,
            style: EdgeStyle::default(),
            node_order: None,
            label_overrides: Labels::new(),
        }
    }
}

/// Everything `draw` computed on the way to the canvas.
#[derive(Debug, Clone, PartialEq)]
pub struct Drawing {
    pub positions: Positions,
    pub components: Vec<ComponentSpan>,
    pub labels: Labels,
    pub segments: Vec<LineSegment>,
}

fn position(positions: &Positions, id: VertexId) -> Result<Point, RenderError> {
    positions
        .get(&id)
        .copied()
        .ok_or(RenderError::MissingPosition(id))
}

/// Draws one line per node/hyperedge membership, then one marker per node.
///
/// Per-hyperedge styles are resolved into a list parallel to the membership
/// pairs before anything reaches the canvas.
pub fn draw_hyper_edges<C: Canvas + ?Sized>(
    graph: &Hypergraph,
    positions: &Positions,
    canvas: &mut C,
    style: &EdgeStyle,
    theme: &Theme,
) -> Result<Vec<LineSegment>, RenderError> {
    let mut segments = Vec::new();
    for (node, uid) in graph.membership_pairs() {
        let color = style
            .edge_color
            .as_ref()
            .and_then(|colors| colors.get(uid))
            .unwrap_or(&theme.line_color);
        let width = style
            .line_width
            .as_ref()
            .and_then(|widths| widths.get(uid))
            .copied()
            .unwrap_or(theme.line_width);
        segments.push(LineSegment {
            node: node.to_string(),
            edge: uid.to_string(),
            from: position(positions, VertexId::node(node))?,
            to: position(positions, VertexId::edge(uid))?,
            color: color.clone(),
            width,
        });
    }
    canvas.add_lines(&segments);

    let mut circles = Vec::with_capacity(graph.nodes().len());
    for node in graph.nodes() {
        let color = style
            .node_color
            .as_ref()
            .and_then(|colors| colors.get(&node.id))
            .unwrap_or(&theme.node_color);
        circles.push(Circle {
            center: position(positions, VertexId::node(node.id.as_str()))?,
            radius: style.node_radius,
            color: color.clone(),
        });
    }
    canvas.add_circles(&circles);
    tracing::trace!(
        segments = segments.len(),
        circles = circles.len(),
        "drew hyperedges"
    );
    Ok(segments)
}

/// Labels for the side-by-side orientation: node labels right-aligned at
/// their node, hyperedge labels left-aligned at their hyperedge, so both
/// extend away from the columns.
pub fn draw_column_labels<C: Canvas + ?Sized>(
    graph: &Hypergraph,
    positions: &Positions,
    labels: &Labels,
    options: &LabelOptions,
    canvas: &mut C,
) -> Result<(), RenderError> {
    for (id, halign) in label_targets(graph, options, HAlign::Right, HAlign::Left) {
        let at = position(positions, id.clone())?;
        canvas.annotate(label_for(labels, &id), at, halign, VAlign::Center);
    }
    Ok(())
}

/// Labels for the flipped orientation: centered, shifted down by
/// `options.row_offset`, hanging below nodes and resting above hyperedges'
/// shifted anchor.
pub fn draw_row_labels<C: Canvas + ?Sized>(
    graph: &Hypergraph,
    positions: &Positions,
    labels: &Labels,
    options: &LabelOptions,
    canvas: &mut C,
) -> Result<(), RenderError> {
    for (id, valign) in label_targets(graph, options, VAlign::Top, VAlign::Bottom) {
        let point = position(positions, id.clone())?;
        let at = Point::new(point.x, point.y - options.row_offset);
        canvas.annotate(label_for(labels, &id), at, HAlign::Center, valign);
    }
    Ok(())
}

fn label_targets<A: Copy>(
    graph: &Hypergraph,
    options: &LabelOptions,
    node_align: A,
    edge_align: A,
) -> Vec<(VertexId, A)> {
    let mut targets = Vec::new();
    if options.with_node_labels {
        targets.extend(
            graph
                .nodes()
                .iter()
                .map(|n| (VertexId::node(n.id.as_str()), node_align)),
        );
    }
    if options.with_edge_labels {
        targets.extend(
            graph
                .edges()
                .iter()
                .map(|e| (VertexId::edge(e.uid.as_str()), edge_align)),
        );
    }
    targets
}

/// Lays out `graph` in two columns and draws it onto `canvas`.
pub fn draw<C: Canvas + ?Sized>(
    graph: &Hypergraph,
    canvas: &mut C,
    options: &DrawOptions,
    theme: &Theme,
) -> Result<Drawing, RenderError> {
    let layout_options = TwoColumnOptions {
        spacing: options.spacing,
        width: options.column_spacing,
        flip_orientation: options.flip_orientation,
    };
    let layout =
        compute_two_column_layout(graph, &layout_options, options.node_order.as_ref())?;
    let positions = layout.positions;

    let labels = default_labels(
        graph,
        options.with_node_counts,
        options.with_edge_counts,
        &options.label_overrides,
    );

    let mut style = options.style.clone();
    if style.edge_color.is_none() && options.with_color {
        let cycle = graph
            .edges()
            .iter()
            .enumerate()
            .map(|(idx, edge)| (edge.uid.clone(), theme.edge_color(idx).to_string()))
            .collect();
        style.edge_color = Some(PerItem::ById(cycle));
    }

    let segments = draw_hyper_edges(graph, &positions, canvas, &style, theme)?;

    if options.flip_orientation {
        draw_row_labels(graph, &positions, &labels, &options.labels, canvas)?;
    } else {
        draw_column_labels(graph, &positions, &labels, &options.labels, canvas)?;
    }

    canvas.set_aspect(1.0);
    canvas.autoscale_view();
    canvas.hide_axes();

    Ok(Drawing {
        positions,
        components: layout.components,
        labels,
        segments,
    })
}
