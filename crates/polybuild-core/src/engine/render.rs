//! Turning a laid-out graph into something a drawing surface can show.
//!
//! A [`Scene`] holds device-space primitives only; any toolkit that implements
//! [`Canvas`] can draw it.

use crate::core::layout::{LayoutCache, LayoutError, Viewport, radius_for};
use crate::core::models::graph::MolecularGraph;
use crate::core::models::ids::NodeId;
use nalgebra::Point2;
use serde::Deserialize;
use std::collections::BTreeMap;
use std::path::Path;
use thiserror::Error;

const DEFAULT_NODE_COLOR: &str = "gray";
const DEFAULT_LINE_COLOR: &str = "black";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Glyph {
    #[default]
    Circle,
    Square,
    Point,
}

/// Per-residue colours and glyphs, keyed by residue name.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default, deny_unknown_fields, rename_all = "kebab-case")]
pub struct Palette {
    pub default_color: String,
    pub line_color: String,
    pub colors: BTreeMap<String, String>,
    pub glyphs: BTreeMap<String, Glyph>,
}

impl Default for Palette {
    fn default() -> Self {
        Self {
            default_color: DEFAULT_NODE_COLOR.to_string(),
            line_color: DEFAULT_LINE_COLOR.to_string(),
            colors: BTreeMap::new(),
            glyphs: BTreeMap::new(),
        }
    }
}

#[derive(Debug, Error)]
pub enum PaletteError {
    #[error("File I/O error for '{path}': {source}")]
    Io {
        path: String,
        source: std::io::Error,
    },
    #[error("TOML parsing error for '{path}': {source}")]
    Toml {
        path: String,
        source: toml::de::Error,
    },
}

impl Palette {
    pub fn load(path: &Path) -> Result<Self, PaletteError> {
        let content = std::fs::read_to_string(path).map_err(|e| PaletteError::Io {
            path: path.to_string_lossy().to_string(),
            source: e,
        })?;
        toml::from_str(&content).map_err(|e| PaletteError::Toml {
            path: path.to_string_lossy().to_string(),
            source: e,
        })
    }

    pub fn color_for(&self, resname: Option<&str>) -> &str {
        resname
            .and_then(|name| self.colors.get(name))
            .map_or(self.default_color.as_str(), String::as_str)
    }

    pub fn glyph_for(&self, resname: Option<&str>) -> Glyph {
        resname
            .and_then(|name| self.glyphs.get(name))
            .copied()
            .unwrap_or_default()
    }
}

/// A drawing surface in device coordinates.
pub trait Canvas {
    fn erase(&mut self);
    fn draw_line(&mut self, from: &Point2<f64>, to: &Point2<f64>, color: &str);
    fn draw_circle(&mut self, center: &Point2<f64>, radius: f64, fill: &str);
    /// `radius` is half the side length.
    fn draw_square(&mut self, center: &Point2<f64>, radius: f64, fill: &str);
    fn draw_point(&mut self, center: &Point2<f64>, size: f64, color: &str);
}

#[derive(Debug, Clone, PartialEq)]
pub struct SceneNode {
    pub id: NodeId,
    pub center: Point2<f64>,
    pub radius: f64,
    pub color: String,
    pub glyph: Glyph,
}

#[derive(Debug, Clone, PartialEq)]
pub struct SceneLine {
    pub from: Point2<f64>,
    pub to: Point2<f64>,
    pub color: String,
}

/// Everything needed to draw one frame.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Scene {
    pub lines: Vec<SceneLine>,
    pub nodes: Vec<SceneNode>,
}

impl Scene {
    /// Projects every cached position through `viewport`.
    ///
    /// An empty graph gives an empty scene. Nodes without a cached position
    /// are left out, as are links touching them.
    pub fn build(
        graph: &MolecularGraph,
        cache: &LayoutCache,
        viewport: &Viewport,
        palette: &Palette,
        radius_scale: f64,
    ) -> Result<Self, LayoutError> {
        if graph.is_empty() {
            return Ok(Self::default());
        }
        let radius = radius_for(graph.node_count(), radius_scale)?;

        let lines = graph
            .edges()
            .filter_map(|(a, b)| {
                let from = cache.get(a)?;
                let to = cache.get(b)?;
                Some(SceneLine {
                    from: viewport.project(from),
                    to: viewport.project(to),
                    color: palette.line_color.clone(),
                })
            })
            .collect();

        let nodes = graph
            .nodes()
            .filter_map(|(id, attributes)| {
                let position = cache.get(id)?;
                let resname = attributes.resname.as_deref();
                Some(SceneNode {
                    id,
                    center: viewport.project(position),
                    radius,
                    color: palette.color_for(resname).to_string(),
                    glyph: palette.glyph_for(resname),
                })
            })
            .collect();

        Ok(Self { lines, nodes })
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    /// Erases the canvas, then draws links below residues.
    pub fn draw(&self, canvas: &mut impl Canvas) {
        canvas.erase();
        for line in &self.lines {
            canvas.draw_line(&line.from, &line.to, &line.color);
        }
        for node in &self.nodes {
            match node.glyph {
                Glyph::Circle => canvas.draw_circle(&node.center, node.radius, &node.color),
                Glyph::Square => canvas.draw_square(&node.center, node.radius, &node.color),
                Glyph::Point => canvas.draw_point(&node.center, node.radius, &node.color),
            }
        }
    }
}
