use hypergraph_columns::{RenderOptions, render_with_options};
use serde::Deserialize;
use wasm_bindgen::prelude::*;

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
struct HypergraphRenderOptions {
    theme: Option<String>,
    font_family: Option<String>,
    font_size: Option<f32>,
    flip_orientation: Option<bool>,
    spacing: Option<f32>,
    column_spacing: Option<f32>,
    with_node_labels: Option<bool>,
    with_edge_labels: Option<bool>,
    with_color: Option<bool>,
}

fn build_render_options(options: HypergraphRenderOptions) -> RenderOptions {
    let mut render_options = if options.theme.as_deref() == Some("modern") {
        RenderOptions::modern()
    } else {
        RenderOptions::classic()
    };

    if let Some(font_family) = options.font_family {
        render_options.theme.font_family = font_family;
    }
    if let Some(font_size) = options.font_size {
        render_options.theme.font_size = font_size;
    }
    let draw = &mut render_options.draw;
    if let Some(flip) = options.flip_orientation {
        draw.flip_orientation = flip;
    }
    if let Some(spacing) = options.spacing {
        draw.spacing = spacing;
    }
    if let Some(column_spacing) = options.column_spacing {
        draw.column_spacing = column_spacing;
    }
    if let Some(with_node_labels) = options.with_node_labels {
        draw.labels.with_node_labels = with_node_labels;
    }
    if let Some(with_edge_labels) = options.with_edge_labels {
        draw.labels.with_edge_labels = with_edge_labels;
    }
    if let Some(with_color) = options.with_color {
        draw.with_color = with_color;
    }

    render_options
}

#[wasm_bindgen]
pub fn render_hypergraph_svg(input: &str, options_json: Option<String>) -> Result<String, JsValue> {
    let options = if let Some(raw_options) = options_json {
        serde_json::from_str::<HypergraphRenderOptions>(&raw_options)
            .map_err(|error| JsValue::from_str(&error.to_string()))?
    } else {
        HypergraphRenderOptions::default()
    };

    let render_options = build_render_options(options);
    render_with_options(input, render_options).map_err(|error| JsValue::from_str(&error.to_string()))
}

#[cfg(test)]
mod tests {
    use hypergraph_columns::render_with_options;

    use crate::{HypergraphRenderOptions, build_render_options};

    #[test]
    fn renders_edge_list_with_labels() {
        let input = "e1: a, b, c\ne2: c, d\nnode: lonely\n";

        let svg = render_with_options(input, build_render_options(HypergraphRenderOptions::default()))
            .expect("edge list should render");

        assert!(svg.contains("<svg"));
        assert!(svg.contains("e1"));
        assert!(svg.contains("lonely"));
    }

    #[test]
    fn camel_case_options_are_applied() {
        let options: HypergraphRenderOptions = serde_json::from_str(
            r#"{"theme":"modern","flipOrientation":true,"withEdgeLabels":false,"spacing":0.5}"#,
        )
        .unwrap();
        let render_options = build_render_options(options);
        assert!(render_options.draw.flip_orientation);
        assert!(!render_options.draw.labels.with_edge_labels);
        assert_eq!(render_options.draw.spacing, 0.5);
    }
}
