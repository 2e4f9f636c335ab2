use nalgebra::{Point2, Vector2};

/// Zoom and pan applied on top of the cached layout.
///
/// Negative zoom values zoom in. Structural edits never touch the view; only
/// an explicit reset brings it back to its default.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ViewState {
    pub zoom: f64,
    pub pan: Vector2<f64>,
}

impl Default for ViewState {
    fn default() -> Self {
        Self {
            zoom: 0.0,
            pan: Vector2::zeros(),
        }
    }
}

impl ViewState {
    pub fn zoom_in(&mut self, step: f64) {
        self.zoom -= step;
    }

    pub fn zoom_out(&mut self, step: f64) {
        self.zoom += step;
    }

    /// Pans so that `cursor` is where the canvas centre used to be.
    pub fn pan_to(&mut self, cursor: &Point2<f64>, canvas_center: &Point2<f64>) {
        self.pan = canvas_center - cursor;
    }

    pub fn reset(&mut self) {
        *self = Self::default();
    }

    pub fn is_default(&self) -> bool {
        *self == Self::default()
    }
}

/// Where a session stands between two events.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionPhase {
    /// No residues; nothing is drawn.
    Empty,
    /// Laid out and shown with the default view.
    LaidOut,
    /// Laid out and shown zoomed or panned.
    ViewAdjusted,
}

impl SessionPhase {
    pub fn of(graph_is_empty: bool, view: &ViewState) -> Self {
        if graph_is_empty {
            Self::Empty
        } else if view.is_default() {
            Self::LaidOut
        } else {
            Self::ViewAdjusted
        }
    }
}
