//! Core-Domänentypen: Nodes, Kanten, Graph-Container und die reinen
//! Geometrie-Bausteine (Anker, Label, Pick-Formen).

pub mod anchor;
pub mod edge;
pub mod graph;
pub mod label;
pub mod node;

pub use anchor::{fan_offset_angle, resolve_line_anchors, self_loop_anchors};
pub use edge::{CurveReference, Edge};
pub use graph::DiagramGraph;
pub use hit_test::{PickShape, Rect};
pub use label::{line_angle_deg, quadrant_of, Quadrant};
pub use node::DiagramNode;
