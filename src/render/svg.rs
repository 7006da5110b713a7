use super::canvas::{Canvas, Circle, HAlign, LineSegment, VAlign};
#[cfg(feature = "png")]
use crate::config::RenderConfig;
use crate::layout::Point;
use crate::text_metrics::text_width_or_estimate;
use crate::theme::Theme;
use anyhow::Result;
use std::path::Path;

#[derive(Debug, Clone)]
struct Annotation {
    text: String,
    at: Point,
    halign: HAlign,
    valign: VAlign,
}

#[derive(Debug, Clone, Copy, PartialEq)]
struct Bounds {
    min_x: f32,
    min_y: f32,
    max_x: f32,
    max_y: f32,
}

impl Bounds {
    fn empty() -> Self {
        Self {
            min_x: f32::INFINITY,
            min_y: f32::INFINITY,
            max_x: f32::NEG_INFINITY,
            max_y: f32::NEG_INFINITY,
        }
    }

    fn include(&mut self, x: f32, y: f32) {
        self.min_x = self.min_x.min(x);
        self.min_y = self.min_y.min(y);
        self.max_x = self.max_x.max(x);
        self.max_y = self.max_y.max(y);
    }

    fn is_empty(&self) -> bool {
        self.min_x > self.max_x || self.min_y > self.max_y
    }
}

/// Canvas that renders to a standalone SVG document.
///
/// Layout units are scaled by `scale` pixels; y is flipped so that larger
/// layout y values appear higher on the page.
#[derive(Debug, Clone)]
pub struct SvgCanvas {
    theme: Theme,
    scale: f32,
    padding: f32,
    lines: Vec<LineSegment>,
    circles: Vec<Circle>,
    annotations: Vec<Annotation>,
    aspect: f32,
    view: Option<Bounds>,
    axes_hidden: bool,
}

impl SvgCanvas {
    pub fn new(theme: Theme, scale: f32, padding: f32) -> Self {
        Self {
            theme,
            scale: scale.max(1.0),
            padding: padding.max(0.0),
            lines: Vec::new(),
            circles: Vec::new(),
            annotations: Vec::new(),
            aspect: 1.0,
            view: None,
            axes_hidden: false,
        }
    }

    fn data_bounds(&self) -> Bounds {
        let mut bounds = Bounds::empty();
        for line in &self.lines {
            bounds.include(line.from.x, line.from.y);
            bounds.include(line.to.x, line.to.y);
        }
        for circle in &self.circles {
            bounds.include(circle.center.x - circle.radius, circle.center.y - circle.radius);
            bounds.include(circle.center.x + circle.radius, circle.center.y + circle.radius);
        }
        bounds
    }

    fn to_px(&self, view: &Bounds, point: Point) -> (f32, f32) {
        let x = (point.x - view.min_x) * self.scale;
        let y = (view.max_y - point.y) * self.scale * self.aspect;
        (x, y)
    }

    /// Pixel box covered by a label, before translation.
    fn label_box(&self, view: &Bounds, label: &Annotation) -> (f32, f32, f32, f32) {
        let (x, y) = self.to_px(view, label.at);
        let width = text_width_or_estimate(&label.text, self.theme.font_size, &self.theme.font_family);
        let height = self.theme.font_size * 1.2;
        let left = match label.halign {
            HAlign::Left => x,
            HAlign::Center => x - width / 2.0,
            HAlign::Right => x - width,
        };
        let top = match label.valign {
            VAlign::Top => y,
            VAlign::Center => y - height / 2.0,
            VAlign::Bottom => y - height,
        };
        (left, top, left + width, top + height)
    }

    /// Serializes everything drawn so far.
    pub fn to_svg(&self) -> String {
        let view = match self.view {
            Some(view) => view,
            None => Bounds {
                min_x: 0.0,
                min_y: 0.0,
                max_x: 1.0,
                max_y: 1.0,
            },
        };

        // Pixel extent of the plot area plus every label, so nothing is clipped.
        let (plot_w, plot_h) = (
            (view.max_x - view.min_x) * self.scale,
            (view.max_y - view.min_y) * self.scale * self.aspect,
        );
        let mut extent = (0.0_f32, 0.0_f32, plot_w, plot_h);
        for label in &self.annotations {
            let (l, t, r, b) = self.label_box(&view, label);
            extent.0 = extent.0.min(l);
            extent.1 = extent.1.min(t);
            extent.2 = extent.2.max(r);
            extent.3 = extent.3.max(b);
        }
        let shift_x = self.padding - extent.0;
        let shift_y = self.padding - extent.1;
        let width = extent.2 - extent.0 + self.padding * 2.0;
        let height = extent.3 - extent.1 + self.padding * 2.0;
        let px = |point: Point| {
            let (x, y) = self.to_px(&view, point);
            (x + shift_x, y + shift_y)
        };

        let mut svg = String::new();
        svg.push_str(&format!(
            "<svg xmlns=\"http://www.w3.org/2000/svg\" width=\"{width:.2}\" height=\"{height:.2}\" viewBox=\"0 0 {width:.2} {height:.2}\">",
        ));
        svg.push_str(&format!(
            "<rect width=\"100%\" height=\"100%\" fill=\"{}\"/>",
            self.theme.background
        ));

        if !self.axes_hidden {
            svg.push_str(&format!(
                "<rect x=\"{shift_x:.2}\" y=\"{shift_y:.2}\" width=\"{plot_w:.2}\" height=\"{plot_h:.2}\" fill=\"none\" stroke=\"{}\" stroke-width=\"0.8\"/>",
                self.theme.axis_color
            ));
        }

        svg.push_str("<g class=\"memberships\">");
        for line in &self.lines {
            let (x1, y1) = px(line.from);
            let (x2, y2) = px(line.to);
            svg.push_str(&format!(
                "<line x1=\"{x1:.2}\" y1=\"{y1:.2}\" x2=\"{x2:.2}\" y2=\"{y2:.2}\" stroke=\"{}\" stroke-width=\"{:.2}\" stroke-linecap=\"round\"/>",
                escape_xml(&line.color),
                line.width
            ));
        }
        svg.push_str("</g>");

        svg.push_str("<g class=\"nodes\">");
        for circle in &self.circles {
            let (cx, cy) = px(circle.center);
            let r = circle.radius * self.scale;
            svg.push_str(&format!(
                "<circle cx=\"{cx:.2}\" cy=\"{cy:.2}\" r=\"{r:.2}\" fill=\"{}\"/>",
                escape_xml(&circle.color)
            ));
        }
        svg.push_str("</g>");

        svg.push_str("<g class=\"labels\">");
        for label in &self.annotations {
            let (x, y) = px(label.at);
            let anchor = match label.halign {
                HAlign::Left => "start",
                HAlign::Center => "middle",
                HAlign::Right => "end",
            };
            let baseline = match label.valign {
                VAlign::Top => "hanging",
                VAlign::Center => "central",
                VAlign::Bottom => "text-after-edge",
            };
            svg.push_str(&format!(
                "<text x=\"{x:.2}\" y=\"{y:.2}\" text-anchor=\"{anchor}\" dominant-baseline=\"{baseline}\" font-family=\"{}\" font-size=\"{}\" fill=\"{}\">{}</text>",
                escape_xml(&self.theme.font_family),
                self.theme.font_size,
                self.theme.text_color,
                escape_xml(&label.text)
            ));
        }
        svg.push_str("</g>");

        svg.push_str("</svg>");
        svg
    }
}

impl Canvas for SvgCanvas {
    fn add_lines(&mut self, lines: &[LineSegment]) {
        self.lines.extend_from_slice(lines);
    }

    fn add_circles(&mut self, circles: &[Circle]) {
        self.circles.extend_from_slice(circles);
    }

    fn annotate(&mut self, text: &str, at: Point, halign: HAlign, valign: VAlign) {
        self.annotations.push(Annotation {
            text: text.to_string(),
            at,
            halign,
            valign,
        });
    }

    fn set_aspect(&mut self, ratio: f32) {
        if ratio.is_finite() && ratio > 0.0 {
            self.aspect = ratio;
        }
    }

    fn autoscale_view(&mut self) {
        let bounds = self.data_bounds();
        if !bounds.is_empty() {
            self.view = Some(bounds);
        }
    }

    fn hide_axes(&mut self) {
        self.axes_hidden = true;
    }
}

pub fn write_output_svg(svg: &str, output: Option<&Path>) -> Result<()> {
    match output {
        Some(path) => {
            std::fs::write(path, svg)?;
        }
        None => {
            print!("{}", svg);
        }
    }
    Ok(())
}

#[cfg(feature = "png")]
pub fn write_output_png(svg: &str, output: &Path, render_cfg: &RenderConfig) -> Result<()> {
    let mut opt = usvg::Options::default();
    opt.default_size = usvg::Size::from_wh(render_cfg.width, render_cfg.height)
        .ok_or_else(|| anyhow::anyhow!("Invalid PNG size {}x{}", render_cfg.width, render_cfg.height))?;
    opt.fontdb_mut().load_system_fonts();

    let tree = usvg::Tree::from_str(svg, &opt)?;
    let size = tree.size().to_int_size();
    let mut pixmap = resvg::tiny_skia::Pixmap::new(size.width(), size.height())
        .ok_or_else(|| anyhow::anyhow!("Failed to allocate pixmap"))?;
    if let Some(color) = parse_hex_color(&render_cfg.background) {
        pixmap.fill(color);
    }

    let mut pixmap_mut = pixmap.as_mut();
    resvg::render(&tree, resvg::tiny_skia::Transform::default(), &mut pixmap_mut);
    pixmap.save_png(output)?;
    Ok(())
}

#[cfg(feature = "png")]
fn parse_hex_color(value: &str) -> Option<resvg::tiny_skia::Color> {
    let hex = value.trim().strip_prefix('#')?;
    if hex.len() != 6 {
        return None;
    }
    let channel = |range: std::ops::Range<usize>| u8::from_str_radix(&hex[range], 16).ok();
    Some(resvg::tiny_skia::Color::from_rgba8(
        channel(0..2)?,
        channel(2..4)?,
        channel(4..6)?,
        255,
    ))
}

fn escape_xml(input: &str) -> String {
    input
        .replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
        .replace('"', "&quot;")
        .replace('\'', "&apos;")
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ir::Hypergraph;
    use crate::render::{DrawOptions, draw};

    fn render(graph: &Hypergraph, options: &DrawOptions) -> String {
        let theme = Theme::classic();
        let mut canvas = SvgCanvas::new(theme.clone(), 60.0, 8.0);
        draw(graph, &mut canvas, options, &theme).unwrap();
        canvas.to_svg()
    }

    #[test]
    fn renders_lines_circles_and_labels() {
        let graph = Hypergraph::from_edges([("e1", vec!["a", "b"]), ("e2", vec!["b", "c"])]);
        let svg = render(&graph, &DrawOptions::default());
        assert!(svg.starts_with("<svg"));
        assert!(svg.ends_with("</svg>"));
        assert_eq!(svg.matches("<line ").count(), 4);
        assert_eq!(svg.matches("<circle ").count(), 3);
        assert_eq!(svg.matches("<text ").count(), 5);
        assert!(svg.contains("text-anchor=\"end\""));
        assert!(svg.contains("text-anchor=\"start\""));
    }

    #[test]
    fn hidden_axes_have_no_frame() {
        let graph = Hypergraph::from_edges([("e1", ["a"])]);
        let svg = render(&graph, &DrawOptions::default());
        assert!(!svg.contains("fill=\"none\" stroke="));

        let mut canvas = SvgCanvas::new(Theme::classic(), 60.0, 8.0);
        canvas.autoscale_view();
        assert!(canvas.to_svg().contains("fill=\"none\" stroke="));
    }

    #[test]
    fn escapes_label_text() {
        let graph = Hypergraph::from_edges([("<e&1>", ["a"])]);
        let svg = render(&graph, &DrawOptions::default());
        assert!(svg.contains("&lt;e&amp;1&gt;"));
        assert!(!svg.contains("<e&1>"));
    }

    #[test]
    fn larger_y_is_drawn_higher() {
        let mut canvas = SvgCanvas::new(Theme::classic(), 10.0, 0.0);
        canvas.add_circles(&[
            Circle {
                center: Point::new(0.0, 0.0),
                radius: 0.1,
                color: "red".to_string(),
            },
            Circle {
                center: Point::new(0.0, 2.0),
                radius: 0.1,
                color: "blue".to_string(),
            },
        ]);
        canvas.autoscale_view();
        let svg = canvas.to_svg();
        let red = svg.find("fill=\"red\"").unwrap();
        let blue = svg.find("fill=\"blue\"").unwrap();
        let cy = |at: usize| -> f32 {
            let start = svg[..at].rfind("cy=\"").unwrap() + 4;
            let end = start + svg[start..].find('"').unwrap();
            svg[start..end].parse().unwrap()
        };
        assert!(cy(blue) < cy(red));
    }
}
