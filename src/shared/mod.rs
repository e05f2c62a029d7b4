//! Geteilte Typen für layer-übergreifende Verträge.
//!
//! Enthält die Laufzeit-Optionen und den Render-Vertrag, damit der Kern
//! keine direkten Abhängigkeiten an einen konkreten Renderer bindet.

pub mod options;
mod render_scene;

pub use options::{GeometryOptions, LabelMetrics};
pub use options::{CURVE_OFFSET_PX, PARALLEL_OFFSET_DEG, SELECTION_OFFSET_PX};
pub use render_scene::{arrow_head, ArrowHead, EdgeGeometry, LoopArc, RenderScene};
