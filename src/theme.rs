use serde::{Deserialize, Serialize};

/// Qualitative ten-color cycle used for hyperedges.
pub const TAB10: [&str; 10] = [
    "#1f77b4", "#ff7f0e", "#2ca02c", "#d62728", "#9467bd", "#8c564b", "#e377c2", "#7f7f7f",
    "#bcbd22", "#17becf",
];

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Theme {
    pub font_family: String,
    pub font_size: f32,
    pub text_color: String,
    pub line_color: String,
    pub line_width: f32,
    pub node_color: String,
    pub axis_color: String,
    pub background: String,
    pub edge_palette: Vec<String>,
}

impl Theme {
    /// Plot-style defaults: black lines, red node markers, tab10 hyperedges.
    pub fn classic() -> Self {
        Self {
            font_family: "DejaVu Sans, Bitstream Vera Sans, Arial, sans-serif".to_string(),
            font_size: 10.0,
            text_color: "#000000".to_string(),
            line_color: "#000000".to_string(),
            line_width: 1.5,
            node_color: "red".to_string(),
            axis_color: "#000000".to_string(),
            background: "#FFFFFF".to_string(),
            edge_palette: TAB10.iter().map(|c| c.to_string()).collect(),
        }
    }

    pub fn modern() -> Self {
        Self {
            font_family: "Inter, Segoe UI, system-ui, -apple-system, sans-serif".to_string(),
            font_size: 13.0,
            text_color: "#1C2430".to_string(),
            line_color: "#7A8AA6".to_string(),
            line_width: 1.4,
            node_color: "#E5484D".to_string(),
            axis_color: "#C7D2E5".to_string(),
            background: "#FFFFFF".to_string(),
            edge_palette: TAB10.iter().map(|c| c.to_string()).collect(),
        }
    }

    /// Color of the `idx`-th hyperedge when cycling.
    pub fn edge_color(&self, idx: usize) -> &str {
        if self.edge_palette.is_empty() {
            return &self.line_color;
        }
        &self.edge_palette[idx % self.edge_palette.len()]
    }
}

impl Default for Theme {
    fn default() -> Self {
        Self::classic()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn palette_cycles_every_ten() {
        let theme = Theme::classic();
        assert_eq!(theme.edge_color(0), "#1f77b4");
        assert_eq!(theme.edge_color(10), theme.edge_color(0));
        assert_eq!(theme.edge_color(13), "#d62728");
    }

    #[test]
    fn empty_palette_falls_back_to_line_color() {
        let mut theme = Theme::modern();
        theme.edge_palette.clear();
        assert_eq!(theme.edge_color(4), theme.line_color);
    }
}
