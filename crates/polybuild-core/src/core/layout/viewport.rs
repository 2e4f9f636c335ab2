use super::LayoutError;
use nalgebra::{Point2, Vector2};

/// Maps a normalised layout point onto the canvas.
///
/// Per axis: `scale = c - zoom * c` and `device = c + p * scale - pan`. A zoom
/// of 0 maps `[-1, 1]` onto the full canvas; negative values zoom in. No bounds
/// are enforced: a zoom of 1 collapses the drawing onto the centre and larger
/// values mirror it.
pub fn project(
    point: &Point2<f64>,
    canvas_center: &Point2<f64>,
    zoom: f64,
    pan: &Vector2<f64>,
) -> Point2<f64> {
    let scale = canvas_center.coords * (1.0 - zoom);
    Point2::new(
        canvas_center.x + point.x * scale.x - pan.x,
        canvas_center.y + point.y * scale.y - pan.y,
    )
}

/// Glyph radius for a graph of `node_count` residues.
///
/// Shrinks with the square root of the node count so that the total inked
/// area of the drawing stays roughly constant as the polymer grows.
pub fn radius_for(node_count: usize, radius_scale: f64) -> Result<f64, LayoutError> {
    if node_count == 0 {
        return Err(LayoutError::EmptyGraph);
    }
    Ok(radius_scale / (node_count as f64).sqrt())
}

/// The canvas centre together with the current zoom and pan.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Viewport {
    pub center: Point2<f64>,
    pub zoom: f64,
    pub pan: Vector2<f64>,
}

impl Viewport {
    /// An unzoomed, unpanned viewport centred on a `width` x `height` canvas.
    pub fn for_canvas(width: f64, height: f64) -> Self {
        Self {
            center: Point2::new(width / 2.0, height / 2.0),
            zoom: 0.0,
            pan: Vector2::zeros(),
        }
    }

    pub fn with_view(mut self, zoom: f64, pan: Vector2<f64>) -> Self {
        self.zoom = zoom;
        self.pan = pan;
        self
    }

    pub fn project(&self, point: &Point2<f64>) -> Point2<f64> {
        project(point, &self.center, self.zoom, &self.pan)
    }
}
