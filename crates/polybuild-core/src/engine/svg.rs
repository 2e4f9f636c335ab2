use super::render::Canvas;
use nalgebra::Point2;
use std::fmt::Write as _;

/// A [`Canvas`] that records a standalone SVG document.
///
/// Device coordinates have their origin in the bottom-left corner with `y`
/// pointing up, so every `y` is flipped when written out.
#[derive(Debug, Clone)]
pub struct SvgCanvas {
    width: f64,
    height: f64,
    background: String,
    elements: Vec<String>,
}

impl SvgCanvas {
    pub fn new(width: f64, height: f64) -> Self {
        Self {
            width,
            height,
            background: "white".to_string(),
            elements: Vec::new(),
        }
    }

    pub fn with_background(mut self, color: &str) -> Self {
        self.background = color.to_string();
        self
    }

    fn flip(&self, point: &Point2<f64>) -> (f64, f64) {
        (point.x, self.height - point.y)
    }

    pub fn element_count(&self) -> usize {
        self.elements.len()
    }

    pub fn to_document(&self) -> String {
        let mut out = String::new();
        let _ = writeln!(
            out,
            r#"<svg xmlns="http://www.w3.org/2000/svg" width="{w}" height="{h}" viewBox="0 0 {w} {h}">"#,
            w = self.width,
            h = self.height
        );
        let _ = writeln!(
            out,
            r#"  <rect width="100%" height="100%" fill="{}"/>"#,
            escape_attr(&self.background)
        );
        for element in &self.elements {
            let _ = writeln!(out, "  {element}");
        }
        out.push_str("</svg>\n");
        out
    }
}

impl Canvas for SvgCanvas {
    fn erase(&mut self) {
        self.elements.clear();
    }

    fn draw_line(&mut self, from: &Point2<f64>, to: &Point2<f64>, color: &str) {
        let (x1, y1) = self.flip(from);
        let (x2, y2) = self.flip(to);
        self.elements.push(format!(
            r#"<line x1="{x1:.3}" y1="{y1:.3}" x2="{x2:.3}" y2="{y2:.3}" stroke="{}"/>"#,
            escape_attr(color)
        ));
    }

    fn draw_circle(&mut self, center: &Point2<f64>, radius: f64, fill: &str) {
        let (cx, cy) = self.flip(center);
        self.elements.push(format!(
            r#"<circle cx="{cx:.3}" cy="{cy:.3}" r="{radius:.3}" fill="{}" stroke="black"/>"#,
            escape_attr(fill)
        ));
    }

    fn draw_square(&mut self, center: &Point2<f64>, radius: f64, fill: &str) {
        let (cx, cy) = self.flip(center);
        let side = 2.0 * radius;
        self.elements.push(format!(
            r#"<rect x="{:.3}" y="{:.3}" width="{side:.3}" height="{side:.3}" fill="{}" stroke="black"/>"#,
            cx - radius,
            cy - radius,
            escape_attr(fill)
        ));
    }

    fn draw_point(&mut self, center: &Point2<f64>, size: f64, color: &str) {
        let (cx, cy) = self.flip(center);
        let r = (size / 4.0).max(1.0);
        self.elements.push(format!(
            r#"<circle cx="{cx:.3}" cy="{cy:.3}" r="{r:.3}" fill="{}"/>"#,
            escape_attr(color)
        ));
    }
}

fn escape_attr(value: &str) -> String {
    value
        .replace('&', "&amp;")
        .replace('"', "&quot;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
}
