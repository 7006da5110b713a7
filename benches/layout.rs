use criterion::{BenchmarkId, Criterion, criterion_group, criterion_main};
use hypergraph_columns::layout::{TwoColumnOptions, layout_two_column};
use hypergraph_columns::parser::parse_hypergraph;
use hypergraph_columns::render::{DrawOptions, SvgCanvas, draw};
use hypergraph_columns::theme::Theme;
use std::hint::black_box;

/// Chains `edges` hyperedges of `arity` members, each sharing one node with
/// the previous edge, split into `components` disconnected groups.
fn chained_source(edges: usize, arity: usize, components: usize) -> String {
    let mut out = String::new();
    let per_component = edges.div_ceil(components.max(1)).max(1);
    for i in 0..edges {
        let comp = i / per_component;
        let start = i * (arity - 1);
        let members: Vec<String> = (0..arity)
            .map(|k| format!("c{}n{}", comp, start + k))
            .collect();
        out.push_str(&format!("e{}: {}\n", i, members.join(", ")));
    }
    out
}

fn bench_parse(c: &mut Criterion) {
    let mut group = c.benchmark_group("parse");
    for edges in [50usize, 200, 800] {
        let input = chained_source(edges, 4, 4);
        group.bench_with_input(BenchmarkId::from_parameter(edges), &input, |b, input| {
            b.iter(|| {
                let parsed = parse_hypergraph(black_box(input)).expect("parse failed");
                black_box(parsed.hypergraph.edges().len());
            });
        });
    }
    group.finish();
}

fn bench_layout(c: &mut Criterion) {
    let mut group = c.benchmark_group("layout_two_column");
    let options = TwoColumnOptions {
        spacing: 0.5,
        ..Default::default()
    };
    for (edges, components) in [(20usize, 1usize), (40, 1), (60, 3), (120, 6)] {
        let name = format!("edges_{}_components_{}", edges, components);
        let parsed = parse_hypergraph(&chained_source(edges, 3, components)).expect("parse failed");
        group.bench_with_input(
            BenchmarkId::from_parameter(name),
            &parsed.hypergraph,
            |b, graph| {
                b.iter(|| {
                    let positions =
                        layout_two_column(black_box(graph), &options, None).expect("layout failed");
                    black_box(positions.len());
                });
            },
        );
    }
    group.finish();
}

fn bench_render(c: &mut Criterion) {
    let mut group = c.benchmark_group("render_svg");
    let theme = Theme::classic();
    let options = DrawOptions::default();
    for edges in [20usize, 80] {
        let parsed = parse_hypergraph(&chained_source(edges, 3, 2)).expect("parse failed");
        group.bench_with_input(
            BenchmarkId::from_parameter(edges),
            &parsed.hypergraph,
            |b, graph| {
                b.iter(|| {
                    let mut canvas = SvgCanvas::new(theme.clone(), 60.0, 12.0);
                    draw(black_box(graph), &mut canvas, &options, &theme).expect("draw failed");
                    black_box(canvas.to_svg().len());
                });
            },
        );
    }
    group.finish();
}

criterion_group!(benches, bench_parse, bench_layout, bench_render);
criterion_main!(benches);
