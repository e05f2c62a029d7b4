//! Die gerichtete Kante zwischen zwei Nodes — das einzige Entity des Kerns.
//!
//! Neben den pro Refresh abgeleiteten Ankern trägt die Kante echten Zustand:
//! den Kontrollpunkt der Kurve samt Referenzrahmen. Der Rahmen merkt sich
//! Abstand und Winkelabweichung des Kontrollpunkts relativ zur Mittellinie,
//! so dass die Kurve bei Node-Bewegungen proportional mitskaliert und
//! mitrotiert, statt starr in Szenen-Koordinaten zu kleben.

use glam::Vec2;

use super::hit_test::{perpendicular, PickShape, Rect};

/// Unterhalb dieser Mittellinien-Länge ist das Skalierungsverhältnis
/// undefiniert; Updates werden dann verweigert statt durch Null zu teilen.
const MIN_BASELINE_LENGTH: f32 = 1e-3;

/// Referenzrahmen des Kontrollpunkts, erfasst beim letzten Settle.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CurveReference {
    /// Länge der Mittellinie bei der Erfassung
    pub baseline_length: f32,
    /// Winkel der Mittellinie bei der Erfassung (Radiant)
    pub baseline_angle: f32,
    /// Abstand Quelle → Kontrollpunkt bei der Erfassung
    pub distance: f32,
    /// Winkel der Mittellinie minus Winkel Quelle → Kontrollpunkt
    pub angle_offset: f32,
}

/// Eine gerichtete Kante zwischen zwei Nodes.
#[derive(Debug, Clone)]
pub struct Edge {
    /// Monoton vergebene Identität; einziger Tie-Break unter parallelen Kanten
    pub id: u64,
    /// Quell-Node-ID (für die gesamte Lebensdauer gültig)
    pub source_id: u64,
    /// Ziel-Node-ID (für die gesamte Lebensdauer gültig)
    pub target_id: u64,
    /// Label-Text; leer ist gültig
    pub label: String,
    /// Anker auf der Quell-Grenze (abgeleitet, pro Refresh neu)
    pub source_point: Vec2,
    /// Anker auf der Ziel-Grenze (abgeleitet, pro Refresh neu)
    pub target_point: Vec2,
    /// Kontrollpunkt der Kurve (autoritativer Zustand)
    pub control_point: Vec2,
    /// Label-Anker (abgeleitet, pro Refresh neu)
    pub label_anchor: Vec2,
    /// Pick-Form für Pointer-Selektion (abgeleitet)
    pub pick_shape: PickShape,
    /// Bounding-Rechteck für Damage-Tracking (abgeleitet)
    pub bounds: Rect,
    reference: Option<CurveReference>,
    suppress_recompute: bool,
}

impl Edge {
    /// Erstellt eine Kante ohne berechnete Geometrie.
    /// Der erste Refresh etabliert Anker, Kontrollpunkt und Referenzrahmen.
    pub fn new(id: u64, source_id: u64, target_id: u64, label: String) -> Self {
        Self {
            id,
            source_id,
            target_id,
            label,
            source_point: Vec2::ZERO,
            target_point: Vec2::ZERO,
            control_point: Vec2::ZERO,
            label_anchor: Vec2::ZERO,
            pick_shape: PickShape::Line {
                quad: [Vec2::ZERO; 4],
                marker: Rect::around(Vec2::ZERO, 0.0),
            },
            bounds: Rect::around(Vec2::ZERO, 0.0),
            reference: None,
            suppress_recompute: false,
        }
    }

    /// `true` wenn Quelle und Ziel derselbe Node sind.
    pub fn is_self_loop(&self) -> bool {
        self.source_id == self.target_id
    }

    /// Prüft, ob die Kante das ungeordnete Node-Paar verbindet.
    pub fn connects(&self, node_a: u64, node_b: u64) -> bool {
        (self.source_id == node_a && self.target_id == node_b)
            || (self.source_id == node_b && self.target_id == node_a)
    }

    /// Aktueller Referenzrahmen (None vor dem ersten Refresh).
    pub fn reference(&self) -> Option<&CurveReference> {
        self.reference.as_ref()
    }

    /// Setzt den Kontrollpunkt durch direkte Interaktion.
    ///
    /// Der nächste Refresh überschreibt ihn nicht aus dem Referenzrahmen,
    /// sondern erfasst den Rahmen aus dem neuen Punkt neu.
    pub fn mark_control_moved(&mut self, new_control_point: Vec2) {
        self.control_point = new_control_point;
        self.suppress_recompute = true;
    }

    /// Führt den Kontrollpunkt unter der aktuellen Mittellinie nach.
    ///
    /// Erste Berechnung: Kontrollpunkt im Abstand `curve_offset` senkrecht
    /// zur Mitte der Mittellinie (Senkrechte = Richtung um +90° gedreht),
    /// danach Erfassung des Referenzrahmens. Folgeberechnungen skalieren den
    /// erfassten Abstand mit dem Längenverhältnis und rotieren um die
    /// erfasste Winkelabweichung relativ zur aktuellen Mittellinie.
    pub fn track_control_point(&mut self, source_pos: Vec2, target_pos: Vec2, curve_offset: f32) {
        let baseline = target_pos - source_pos;
        let length = baseline.length();

        if self.suppress_recompute {
            self.suppress_recompute = false;
            if length > MIN_BASELINE_LENGTH {
                self.reference = Some(Self::capture(source_pos, baseline, length, self.control_point));
            } else {
                // Eine Null-Mittellinie als Referenz würde den Guard dauerhaft
                // verklemmen; der alte Rahmen bleibt bestehen.
                log::debug!(
                    "Kante {}: Referenz-Neuerfassung bei degenerierter Mittellinie übersprungen",
                    self.id
                );
            }
            return;
        }

        match self.reference {
            None => {
                if length <= MIN_BASELINE_LENGTH {
                    return;
                }
                let midpoint = source_pos + baseline * 0.5;
                let normal = perpendicular(baseline) / length;
                self.control_point = midpoint + normal * curve_offset;
                self.reference = Some(Self::capture(source_pos, baseline, length, self.control_point));
            }
            Some(reference) => {
                if length <= MIN_BASELINE_LENGTH
                    || reference.baseline_length <= MIN_BASELINE_LENGTH
                {
                    log::debug!(
                        "Kante {}: Kurven-Update bei degenerierter Mittellinie übersprungen",
                        self.id
                    );
                    return;
                }
                let scale = length / reference.baseline_length;
                let angle = baseline.y.atan2(baseline.x) - reference.angle_offset;
                self.control_point =
                    source_pos + scale * reference.distance * Vec2::from_angle(angle);
                self.reference = Some(Self::capture(source_pos, baseline, length, self.control_point));
            }
        }
    }

    fn capture(source_pos: Vec2, baseline: Vec2, length: f32, control_point: Vec2) -> CurveReference {
        let baseline_angle = baseline.y.atan2(baseline.x);
        let to_control = control_point - source_pos;
        CurveReference {
            baseline_length: length,
            baseline_angle,
            distance: to_control.length(),
            angle_offset: baseline_angle - to_control.y.atan2(to_control.x),
        }
    }
}
