use crate::config::{Config, load_config};
use crate::layout_dump::write_layout_dump;
use crate::parser::parse_hypergraph;
use crate::render::{SvgCanvas, draw, write_output_svg};
#[cfg(feature = "png")]
use crate::render::write_output_png;
use anyhow::Result;
use clap::{ArgAction, Parser, ValueEnum};
use std::io::{self, Read};
use std::path::{Path, PathBuf};
use tracing_subscriber::EnvFilter;

#[derive(Parser, Debug)]
#[command(name = "hgcol", version, about = "Two-column hypergraph diagrams")]
pub struct Args {
    /// Input file (edge list or JSON) or '-' for stdin
    #[arg(short = 'i', long = "input")]
    pub input: Option<PathBuf>,

    /// Output file (svg/png). Defaults to stdout for SVG if omitted.
    #[arg(short = 'o', long = "output")]
    pub output: Option<PathBuf>,

    /// Output format
    #[arg(short = 'e', long = "outputFormat", value_enum, default_value = "svg")]
    pub output_format: OutputFormat,

    /// Config JSON file
    #[arg(short = 'c', long = "configFile")]
    pub config: Option<PathBuf>,

    /// Lay the columns out as rows
    #[arg(long = "flip")]
    pub flip: bool,

    /// Gap between disconnected components
    #[arg(long = "spacing")]
    pub spacing: Option<f32>,

    /// Distance between the node column and the hyperedge column
    #[arg(long = "column-spacing")]
    pub column_spacing: Option<f32>,

    #[arg(long = "no-node-labels")]
    pub no_node_labels: bool,

    #[arg(long = "no-edge-labels")]
    pub no_edge_labels: bool,

    /// Label collapsed nodes with their member count
    #[arg(long = "node-counts")]
    pub node_counts: bool,

    /// Label collapsed hyperedges with their member count
    #[arg(long = "edge-counts")]
    pub edge_counts: bool,

    /// Draw every membership line in the theme line color
    #[arg(long = "no-color")]
    pub no_color: bool,

    /// Merge nodes that belong to the same hyperedges
    #[arg(long = "collapse-nodes")]
    pub collapse_nodes: bool,

    /// Merge hyperedges with the same members
    #[arg(long = "collapse-edges")]
    pub collapse_edges: bool,

    /// Write positions, components and segments as JSON
    #[arg(long = "dump-layout")]
    pub dump_layout: Option<PathBuf>,

    /// More log output (-v debug, -vv trace)
    #[arg(short = 'v', long = "verbose", action = ArgAction::Count)]
    pub verbose: u8,
}

#[derive(ValueEnum, Debug, Clone, Copy)]
pub enum OutputFormat {
    Svg,
    Png,
}

pub fn run() -> Result<()> {
    let args = Args::parse();
    init_tracing(args.verbose);

    let mut config = load_config(args.config.as_deref())?;
    apply_overrides(&mut config, &args);

    let input = read_input(args.input.as_deref())?;
    let parsed = parse_hypergraph(&input)?;
    let mut graph = parsed.hypergraph;
    if args.collapse_edges {
        graph = graph.collapse_edges();
    }
    if args.collapse_nodes {
        graph = graph.collapse_nodes();
    }

    let mut options = config.draw_options();
    options.labels.with_node_labels = !args.no_node_labels;
    options.labels.with_edge_labels = !args.no_edge_labels;
    options.with_node_counts = args.node_counts;
    options.with_edge_counts = args.edge_counts;
    options.with_color = !args.no_color;
    options.node_order = parsed.node_order;

    let mut canvas = SvgCanvas::new(config.theme.clone(), config.layout.scale, config.layout.padding);
    let drawing = draw(&graph, &mut canvas, &options, &config.theme)?;
    tracing::info!(
        vertices = drawing.positions.len(),
        components = drawing.components.len(),
        "rendered hypergraph"
    );
    if let Some(path) = args.dump_layout.as_deref() {
        write_layout_dump(path, &drawing, &graph)?;
    }

    let svg = canvas.to_svg();
    match args.output_format {
        OutputFormat::Svg => write_output_svg(&svg, args.output.as_deref())?,
        OutputFormat::Png => write_png(&svg, args.output.as_deref(), &config)?,
    }
    Ok(())
}

fn init_tracing(verbose: u8) {
    let default_level = match verbose {
        0 => "warn",
        1 => "debug",
        _ => "trace",
    };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(io::stderr)
        .try_init();
}

fn apply_overrides(config: &mut Config, args: &Args) {
    if args.flip {
        config.layout.flip_orientation = true;
    }
    if let Some(spacing) = args.spacing {
        config.layout.spacing = spacing;
    }
    if let Some(column_spacing) = args.column_spacing {
        config.layout.column_spacing = column_spacing;
    }
}

#[cfg(feature = "png")]
fn write_png(svg: &str, output: Option<&Path>, config: &Config) -> Result<()> {
    let output = output.ok_or_else(|| anyhow::anyhow!("Output path required for png output"))?;
    write_output_png(svg, output, &config.render)
}

#[cfg(not(feature = "png"))]
fn write_png(_svg: &str, _output: Option<&Path>, _config: &Config) -> Result<()> {
    Err(anyhow::anyhow!("PNG output requires the `png` feature"))
}

fn read_input(path: Option<&Path>) -> Result<String> {
    let mut buf = String::new();
    match path {
        Some(path) if path != Path::new("-") => {
            buf = std::fs::read_to_string(path)?;
        }
        _ => {
            io::stdin().read_to_string(&mut buf)?;
        }
    }
    Ok(buf)
}
