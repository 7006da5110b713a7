use crate::layout::Point;
use serde::Serialize;

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct LineSegment {
    pub node: String,
    pub edge: String,
    pub from: Point,
    pub to: Point,
    pub color: String,
    pub width: f32,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Circle {
    pub center: Point,
    pub radius: f32,
    pub color: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum HAlign {
    Left,
    Center,
    Right,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum VAlign {
    Top,
    Center,
    Bottom,
}

/// A 2D plotting surface in layout coordinates (y grows upward).
pub trait Canvas {
    fn add_lines(&mut self, lines: &[LineSegment]);
    fn add_circles(&mut self, circles: &[Circle]);
    fn annotate(&mut self, text: &str, at: Point, halign: HAlign, valign: VAlign);
    /// Ratio of y units to x units on screen.
    fn set_aspect(&mut self, ratio: f32);
    /// Fit the view to everything drawn so far.
    fn autoscale_view(&mut self);
    fn hide_axes(&mut self);
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "op", rename_all = "snake_case")]
pub enum CanvasOp {
    Lines { lines: Vec<LineSegment> },
    Circles { circles: Vec<Circle> },
    Annotate {
        text: String,
        at: Point,
        halign: HAlign,
        valign: VAlign,
    },
    SetAspect { ratio: f32 },
    AutoscaleView,
    HideAxes,
}

/// Canvas that only remembers what it was asked to draw.
#[derive(Debug, Clone, Default, Serialize)]
pub struct RecordingCanvas {
    pub ops: Vec<CanvasOp>,
}

impl RecordingCanvas {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn lines(&self) -> impl Iterator<Item = &LineSegment> + '_ {
        self.ops
            .iter()
            .filter_map(|op| match op {
                CanvasOp::Lines { lines } => Some(lines),
                _ => None,
            })
            .flatten()
    }

    pub fn circles(&self) -> impl Iterator<Item = &Circle> + '_ {
        self.ops
            .iter()
            .filter_map(|op| match op {
                CanvasOp::Circles { circles } => Some(circles),
                _ => None,
            })
            .flatten()
    }

    pub fn annotations(&self) -> impl Iterator<Item = (&str, Point, HAlign, VAlign)> + '_ {
        self.ops.iter().filter_map(|op| match op {
            CanvasOp::Annotate {
                text,
                at,
                halign,
                valign,
            } => Some((text.as_str(), *at, *halign, *valign)),
            _ => None,
        })
    }
}

impl Canvas for RecordingCanvas {
    fn add_lines(&mut self, lines: &[LineSegment]) {
        self.ops.push(CanvasOp::Lines {
            lines: lines.to_vec(),
        });
    }

    fn add_circles(&mut self, circles: &[Circle]) {
        self.ops.push(CanvasOp::Circles {
            circles: circles.to_vec(),
        });
    }

    fn annotate(&mut self, text: &str, at: Point, halign: HAlign, valign: VAlign) {
        self.ops.push(CanvasOp::Annotate {
            text: text.to_string(),
            at,
            halign,
            valign,
        });
    }

    fn set_aspect(&mut self, ratio: f32) {
        self.ops.push(CanvasOp::SetAspect { ratio });
    }

    fn autoscale_view(&mut self) {
        self.ops.push(CanvasOp::AutoscaleView);
    }

    fn hide_axes(&mut self) {
        self.ops.push(CanvasOp::HideAxes);
    }
}
