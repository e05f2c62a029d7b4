//! Kanten-Geometrie-Kern für interaktive Node-Link-Diagramme.
//! Berechnet Anker, Kurven-Kontrollpunkte, Label-Positionen und Pick-Formen
//! gerichteter Kanten; als Library exportiert für Tests und Wiederverwendung.

pub mod core;
pub mod shared;

pub use core::{CurveReference, DiagramGraph, DiagramNode, Edge, PickShape, Quadrant, Rect};
pub use shared::{ArrowHead, EdgeGeometry, GeometryOptions, LabelMetrics, LoopArc, RenderScene};
