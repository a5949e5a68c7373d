use std::path::Path;

use anyhow::anyhow;
use kurbo::{Affine, Point, Rect};
use svg::{
    node::element::{Line, Rectangle},
    Document,
};
use turtlelogo::{Canvas, Segment};

pub fn read_whole_file(path: &Path) -> anyhow::Result<String> {
    std::fs::read_to_string(path)
        .map_err(|e| anyhow!("Failed to open input file {}: {}", path.display(), e))
}

/// Collects the turtle's segments and lays them out as an SVG drawing.
#[derive(Debug)]
pub struct SvgCanvas {
    segments: Vec<Segment>,
    stroke_width: f64,
}

impl Default for SvgCanvas {
    fn default() -> Self {
        SvgCanvas::new(1.0)
    }
}

impl Canvas for SvgCanvas {
    fn draw_segment(&mut self, start: (f32, f32), end: (f32, f32), color: u32) {
        self.segments.push(Segment { start, end, color });
    }
}

fn point(p: (f32, f32)) -> Point {
    // The turtle is y-up and svg is y-down.
    Affine::FLIP_Y * Point::new(p.0 as f64, p.1 as f64)
}

/// Split `0xRRGGBBAA` into an svg color and an opacity.
fn paint(rgba: u32) -> (String, f64) {
    (
        format!("#{:06x}", rgba >> 8),
        (rgba & 0xff) as f64 / 255.0,
    )
}

impl SvgCanvas {
    pub fn new(stroke_width: f64) -> SvgCanvas {
        SvgCanvas {
            segments: Vec::new(),
            stroke_width,
        }
    }

    pub fn segments(&self) -> &[Segment] {
        &self.segments
    }

    /// The area covered by the drawing, in svg coordinates.
    pub fn bounding_box(&self) -> Option<Rect> {
        self.segments
            .iter()
            .map(|s| Rect::from_points(point(s.start), point(s.end)))
            .reduce(|a, b| a.union(b))
    }

    pub fn document(&self) -> Document {
        let margin = self.stroke_width * 2.0;
        let bbox = self
            .bounding_box()
            .unwrap_or(Rect::new(-1.0, -1.0, 1.0, 1.0))
            .inflate(margin, margin);

        let background = Rectangle::new()
            .set("x", bbox.x0)
            .set("y", bbox.y0)
            .set("width", bbox.width())
            .set("height", bbox.height())
            .set("fill", "black");

        let mut doc = Document::new()
            .set("viewBox", (bbox.x0, bbox.y0, bbox.width(), bbox.height()))
            .add(background);

        for seg in &self.segments {
            let (start, end) = (point(seg.start), point(seg.end));
            let (color, opacity) = paint(seg.color);
            doc = doc.add(
                Line::new()
                    .set("x1", start.x)
                    .set("y1", start.y)
                    .set("x2", end.x)
                    .set("y2", end.y)
                    .set("stroke", color)
                    .set("stroke-opacity", opacity)
                    .set("stroke-width", self.stroke_width)
                    .set("stroke-linecap", "round"),
            );
        }
        doc
    }

    pub fn save(&self, path: &Path) -> anyhow::Result<()> {
        log::debug!("writing {} segments to {}", self.segments.len(), path.display());
        svg::save(path, &self.document())
            .map_err(|e| anyhow!("Failed to write {}: {}", path.display(), e))
    }
}
