use crate::render::{DrawOptions, EdgeStyle, LabelOptions};
use crate::theme::Theme;
use serde::{Deserialize, Serialize};
use std::path::Path;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LayoutConfig {
    /// Gap between stacked components, in layout units.
    pub spacing: f32,
    /// Distance between the node and hyperedge columns, in layout units.
    pub column_spacing: f32,
    pub flip_orientation: bool,
    pub node_radius: f32,
    /// Downward shift of labels in the flipped orientation.
    pub label_offset: f32,
    /// Pixels per layout unit in SVG output.
    pub scale: f32,
    /// Blank border around the SVG, in pixels.
    pub padding: f32,
}

impl Default for LayoutConfig {
    fn default() -> Self {
        Self {
            spacing: 0.0,
            column_spacing: 1.0,
            flip_orientation: false,
            node_radius: 0.1,
            label_offset: 0.15,
            scale: 60.0,
            padding: 12.0,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RenderConfig {
    pub width: f32,
    pub height: f32,
    pub background: String,
}

impl Default for RenderConfig {
    fn default() -> Self {
        Self {
            width: 800.0,
            height: 600.0,
            background: "#FFFFFF".to_string(),
        }
    }
}

#[derive(Debug, Clone)]
pub struct Config {
    pub theme: Theme,
    pub layout: LayoutConfig,
    pub render: RenderConfig,
}

impl Default for Config {
    fn default() -> Self {
        let theme = Theme::classic();
        let render = RenderConfig {
            background: theme.background.clone(),
            ..Default::default()
        };
        Self {
            theme,
            layout: LayoutConfig::default(),
            render,
        }
    }
}

impl Config {
    /// Draw options seeded from the layout section.
    pub fn draw_options(&self) -> DrawOptions {
        DrawOptions {
            labels: LabelOptions {
                row_offset: self.layout.label_offset,
                ..Default::default()
            },
            column_spacing: self.layout.column_spacing,
            spacing: self.layout.spacing,
            flip_orientation: self.layout.flip_orientation,
            style: EdgeStyle {
                node_radius: self.layout.node_radius,
                ..Default::default()
            },
            ..Default::default()
        }
    }
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
struct ThemeVariables {
    font_family: Option<String>,
    font_size: Option<f32>,
    text_color: Option<String>,
    line_color: Option<String>,
    line_width: Option<f32>,
    node_color: Option<String>,
    axis_color: Option<String>,
    background: Option<String>,
    edge_palette: Option<Vec<String>>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
struct LayoutVariables {
    spacing: Option<f32>,
    column_spacing: Option<f32>,
    flip_orientation: Option<bool>,
    node_radius: Option<f32>,
    label_offset: Option<f32>,
    scale: Option<f32>,
    padding: Option<f32>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
struct ConfigFile {
    theme: Option<String>,
    theme_variables: Option<ThemeVariables>,
    layout: Option<LayoutVariables>,
    width: Option<f32>,
    height: Option<f32>,
}

pub fn load_config(path: Option<&Path>) -> anyhow::Result<Config> {
    let Some(path) = path else {
        return Ok(Config::default());
    };
    let contents = std::fs::read_to_string(path)?;
    parse_config(&contents)
}

/// Parses a JSON (or JSON5) config document over the defaults.
pub fn parse_config(contents: &str) -> anyhow::Result<Config> {
    let parsed: ConfigFile = match serde_json::from_str(contents) {
        Ok(parsed) => parsed,
        Err(json_err) => json5::from_str(contents).map_err(|json5_err| {
            anyhow::anyhow!("invalid config: {json_err} (as JSON5: {json5_err})")
        })?,
    };

    let mut config = Config::default();
    if let Some(theme_name) = parsed.theme.as_deref() {
        match theme_name {
            "modern" => config.theme = Theme::modern(),
            "classic" | "default" => config.theme = Theme::classic(),
            other => tracing::warn!(theme = other, "unknown theme, keeping default"),
        }
    }

    if let Some(vars) = parsed.theme_variables {
        if let Some(v) = vars.font_family {
            config.theme.font_family = v;
        }
        if let Some(v) = vars.font_size {
            config.theme.font_size = v;
        }
        if let Some(v) = vars.text_color {
            config.theme.text_color = v;
        }
        if let Some(v) = vars.line_color {
            config.theme.line_color = v;
        }
        if let Some(v) = vars.line_width {
            config.theme.line_width = v;
        }
        if let Some(v) = vars.node_color {
            config.theme.node_color = v;
        }
        if let Some(v) = vars.axis_color {
            config.theme.axis_color = v;
        }
        if let Some(v) = vars.background {
            config.theme.background = v;
        }
        if let Some(v) = vars.edge_palette {
            config.theme.edge_palette = v;
        }
    }
    config.render.background = config.theme.background.clone();

    if let Some(vars) = parsed.layout {
        if let Some(v) = vars.spacing {
            config.layout.spacing = v;
        }
        if let Some(v) = vars.column_spacing {
            config.layout.column_spacing = v;
        }
        if let Some(v) = vars.flip_orientation {
            config.layout.flip_orientation = v;
        }
        if let Some(v) = vars.node_radius {
            config.layout.node_radius = v;
        }
        if let Some(v) = vars.label_offset {
            config.layout.label_offset = v;
        }
        if let Some(v) = vars.scale {
            config.layout.scale = v;
        }
        if let Some(v) = vars.padding {
            config.layout.padding = v;
        }
    }

    if let Some(v) = parsed.width {
        config.render.width = v;
    }
    if let Some(v) = parsed.height {
        config.render.height = v;
    }

    Ok(config)
}
