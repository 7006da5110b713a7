#[cfg(feature = "cli")]
pub mod cli;
pub mod config;
pub mod ir;
pub mod labels;
pub mod layout;
pub mod layout_dump;
pub mod parser;
pub mod render;
pub mod text_metrics;
pub mod theme;

#[cfg(feature = "cli")]
pub use cli::run;
pub use config::{Config, LayoutConfig, RenderConfig, load_config};
pub use ir::{HyperEdge, Hypergraph, Node, VertexId};
pub use layout::{NodeOrder, Point, Positions, TwoColumnOptions, layout_two_column};
pub use parser::{ParseError, parse_hypergraph};
pub use render::{Canvas, DrawOptions, Drawing, RecordingCanvas, SvgCanvas, draw};
pub use theme::Theme;

/// Everything needed to turn hypergraph text into an SVG document.
#[derive(Debug, Clone)]
pub struct RenderOptions {
    pub theme: Theme,
    pub layout: LayoutConfig,
    pub draw: DrawOptions,
}

impl RenderOptions {
    pub fn classic() -> Self {
        Self::from_config(&Config::default())
    }

    pub fn modern() -> Self {
        let config = Config {
            theme: Theme::modern(),
            ..Config::default()
        };
        Self::from_config(&config)
    }

    pub fn from_config(config: &Config) -> Self {
        Self {
            theme: config.theme.clone(),
            layout: config.layout.clone(),
            draw: config.draw_options(),
        }
    }
}

impl Default for RenderOptions {
    fn default() -> Self {
        Self::classic()
    }
}

/// Parses `input`, draws it and returns the SVG document.
///
/// A node order given in the input is used unless `options.draw` already
/// carries one.
pub fn render_with_options(input: &str, options: RenderOptions) -> anyhow::Result<String> {
    let parsed = parse_hypergraph(input)?;
    render_hypergraph(&parsed.hypergraph, parsed.node_order, options)
}

pub fn render_hypergraph(
    graph: &Hypergraph,
    node_order: Option<NodeOrder>,
    options: RenderOptions,
) -> anyhow::Result<String> {
    let mut draw_options = options.draw;
    if draw_options.node_order.is_none() {
        draw_options.node_order = node_order;
    }
    let mut canvas = SvgCanvas::new(
        options.theme.clone(),
        options.layout.scale,
        options.layout.padding,
    );
    render::draw(graph, &mut canvas, &draw_options, &options.theme)?;
    Ok(canvas.to_svg())
}
