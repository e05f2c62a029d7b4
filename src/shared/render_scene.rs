//! Render-Szene als expliziter Übergabevertrag zwischen Kern und Renderer.
//!
//! Der Renderer entscheidet über Strich, Füllung und Schrift; dieser Vertrag
//! liefert ausschließlich fertige Geometrie. Pro Redraw wird das Bündel
//! einmal aus dem Graphen gebaut und read-only konsumiert.

use glam::Vec2;

use crate::core::{DiagramGraph, Rect};
use super::options::GeometryOptions;

/// Pfeilspitze am Ziel-Anker: Spitze plus zwei Flügelpunkte.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ArrowHead {
    /// Spitze (liegt auf dem Ziel-Anker)
    pub peak: Vec2,
    /// Erster Flügelpunkt
    pub wing_a: Vec2,
    /// Zweiter Flügelpunkt
    pub wing_b: Vec2,
}

/// Bogen-Parameter einer Selbst-Schleife (für Arc-Zeichnung).
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LoopArc {
    /// Linke obere Ecke des umschließenden Quadrats
    pub top_left: Vec2,
    /// Kantenlänge des Quadrats (2 · Node-Radius)
    pub size: f32,
    /// Startwinkel in Grad
    pub start_deg: f32,
    /// Überstrichener Winkel in Grad
    pub sweep_deg: f32,
}

/// Fertige Geometrie einer Kante für genau einen Redraw.
#[derive(Debug, Clone, PartialEq)]
pub struct EdgeGeometry {
    /// Kanten-ID
    pub edge_id: u64,
    /// Anker auf der Quell-Grenze
    pub source_point: Vec2,
    /// Anker auf der Ziel-Grenze
    pub target_point: Vec2,
    /// Kontrollpunkt der Kurve (Marker-Position)
    pub control_point: Vec2,
    /// Label-Anker
    pub label_anchor: Vec2,
    /// Label-Text
    pub label_text: String,
    /// `true` bei Selbst-Schleifen (Bogen statt Kurve)
    pub is_self_loop: bool,
    /// Pfeilspitze; `None` bei zusammengefallenen Ankern
    pub arrow: Option<ArrowHead>,
    /// Bogen-Parameter; nur bei Selbst-Schleifen gesetzt
    pub loop_arc: Option<LoopArc>,
    /// Bounding-Rechteck für Damage-Tracking
    pub bounds: Rect,
}

/// Read-only Daten für einen Render-Frame.
#[derive(Debug, Clone, PartialEq)]
pub struct RenderScene {
    /// Kanten-Geometrie in aufsteigender ID-Reihenfolge
    pub edges: Vec<EdgeGeometry>,
    /// Laufzeit-Optionen für Strichstärken und Schrift
    pub options: GeometryOptions,
}

/// Fester Pfeilwinkel der Selbst-Schleife (Tangente am Bogen-Ende).
const LOOP_ARROW_ANGLE: f32 = 1.07 * std::f32::consts::PI;

/// Baut eine Pfeilspitze an `peak` für eine Linie mit Bildschirm-Winkel
/// `angle` (gegen den Uhrzeigersinn, y nach unten).
pub fn arrow_head(peak: Vec2, angle: f32, size: f32) -> ArrowHead {
    let spread = std::f32::consts::PI / 1.8;
    let wing = |a: f32| peak + Vec2::new(a.sin() * size, a.cos() * size);
    ArrowHead {
        peak,
        wing_a: wing(angle - spread),
        wing_b: wing(angle - std::f32::consts::PI + spread),
    }
}

impl EdgeGeometry {
    fn from_graph_edge(graph: &DiagramGraph, edge_id: u64) -> Option<Self> {
        let edge = graph.edge(edge_id)?;
        let options = graph.options();

        let (arrow, loop_arc) = if edge.is_self_loop() {
            let node = graph.node(edge.source_id)?;
            let arrow = arrow_head(edge.target_point, LOOP_ARROW_ANGLE, options.arrow_size_px);
            let arc = LoopArc {
                top_left: node.position + Vec2::new(0.0, -2.0 * node.radius),
                size: 2.0 * node.radius,
                start_deg: -70.0,
                sweep_deg: 270.0,
            };
            (Some(arrow), Some(arc))
        } else {
            let delta = edge.target_point - edge.source_point;
            let length = delta.length();
            if length <= f32::EPSILON {
                (None, None)
            } else {
                let angle = (-delta.y).atan2(delta.x);
                let size = options.arrow_size_px.min(length);
                (
                    Some(arrow_head(edge.target_point, angle, size)),
                    None,
                )
            }
        };

        Some(Self {
            edge_id: edge.id,
            source_point: edge.source_point,
            target_point: edge.target_point,
            control_point: edge.control_point,
            label_anchor: edge.label_anchor,
            label_text: edge.label.clone(),
            is_self_loop: edge.is_self_loop(),
            arrow,
            loop_arc,
            bounds: edge.bounds,
        })
    }
}

impl RenderScene {
    /// Baut die Szene aus dem Graphen, Kanten aufsteigend nach ID.
    pub fn from_graph(graph: &DiagramGraph) -> Self {
        let edges = graph
            .sorted_edge_ids()
            .into_iter()
            .filter_map(|edge_id| EdgeGeometry::from_graph_edge(graph, edge_id))
            .collect();
        Self {
            edges,
            options: graph.options().clone(),
        }
    }

    /// Gibt zurück, ob es etwas zu zeichnen gibt.
    pub fn is_empty(&self) -> bool {
        self.edges.is_empty()
    }
}
