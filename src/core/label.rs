//! Platzierung des Kanten-Labels neben der Linie.
//!
//! Die Ankerposition hängt vom Winkel-Quadranten der Kante ab. Jeder
//! Quadrant kombiniert eine text-abhängige Verkürzung der Linie mit einer
//! senkrechten Projektion, damit das Label aufrecht lesbar neben — nicht
//! auf — der Kurve sitzt, egal in welche Richtung die Kante zeigt.
//!
//! Winkel-Konvention: Grad in [0, 360), gegen den Uhrzeigersinn auf dem
//! Bildschirm gemessen (y wächst nach unten), d.h. `atan2(-dy, dx)`.

use glam::Vec2;

use super::hit_test::{perpendicular, Rect};
use crate::shared::LabelMetrics;

/// Winkel-Quadrant einer Kantenlinie.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Quadrant {
    /// (0°, 90°] — Kante zeigt nach rechts oben
    UpRight,
    /// (90°, 180°] — Kante zeigt nach links oben
    UpLeft,
    /// (180°, 270°] — Kante zeigt nach links unten
    DownLeft,
    /// (270°, 360°) ∪ {0°} — Kante zeigt nach rechts unten
    DownRight,
}

/// Winkel der Linie in Grad, [0, 360), gegen den Uhrzeigersinn auf dem Bildschirm.
pub fn line_angle_deg(delta: Vec2) -> f32 {
    (-delta.y).atan2(delta.x).to_degrees().rem_euclid(360.0)
}

/// Ordnet einen Linienwinkel seinem Quadranten zu.
pub fn quadrant_of(angle_deg: f32) -> Quadrant {
    if angle_deg > 0.0 && angle_deg <= 90.0 {
        Quadrant::UpRight
    } else if angle_deg > 90.0 && angle_deg <= 180.0 {
        Quadrant::UpLeft
    } else if angle_deg > 180.0 && angle_deg <= 270.0 {
        Quadrant::DownLeft
    } else {
        Quadrant::DownRight
    }
}

/// Berechnet den Label-Anker für eine Kante entlang ihrer Ankerlinie.
///
/// Bei zusammengefallenen Ankern (degenerierte Kante) wird der gemeinsame
/// Punkt zurückgegeben; es entstehen nie nicht-endliche Koordinaten.
pub fn place_along_line(
    source_point: Vec2,
    target_point: Vec2,
    text: &str,
    metrics: &LabelMetrics,
) -> Vec2 {
    let delta = target_point - source_point;
    let length = delta.length();
    if length <= f32::EPSILON {
        return source_point;
    }

    let u = delta / length;
    // Senkrechte zeigt bei y-nach-unten auf die "untere" Seite der Linie
    let n = perpendicular(u);

    let angle_deg = line_angle_deg(delta);
    let angle_rad = angle_deg.to_radians();
    let (sin_a, cos_a) = angle_rad.sin_cos();

    let width = metrics.text_width(text);
    let height = metrics.line_height_px;

    match quadrant_of(angle_deg) {
        Quadrant::UpRight => {
            // Verkürzung vom Ziel her: volle Textbreite bei 0°, Texthöhe bei 90°
            let shortened = source_point + u * (length - (width * cos_a + height * sin_a));
            shortened + n * (10.0 * sin_a + (height + 10.0) * cos_a)
        }
        Quadrant::UpLeft => {
            let shortened = source_point + u * (length - (5.0 * -cos_a + height * sin_a));
            shortened + n * (10.0 * -cos_a + 10.0 * sin_a)
        }
        Quadrant::DownLeft => {
            // Fester kurzer Rücksprung vom Ziel, Projektion auf die Gegenseite
            let back = target_point - u * 5.0;
            back - n * (height * -cos_a + 5.0 * -sin_a)
        }
        Quadrant::DownRight => {
            let back = target_point - u * (5.0 * -sin_a + width * cos_a);
            back - n * 5.0
        }
    }
}

/// Label-Anker einer Selbst-Schleife: Mittelpunkt des Schleifen-Kreises,
/// um den halben Node-Radius nach links versetzt.
pub fn self_loop_anchor(node_center: Vec2, node_radius: f32) -> Vec2 {
    let loop_center = node_center + Vec2::new(node_radius, -node_radius);
    loop_center - Vec2::new(node_radius / 2.0, 0.0)
}

/// Bounding-Rechteck des Labels: vom Anker um die Oberlänge nach oben,
/// die Unterlänge nach unten und die Textbreite nach rechts.
pub fn label_rect(anchor: Vec2, text: &str, metrics: &LabelMetrics) -> Rect {
    Rect::from_corners(
        Vec2::new(anchor.x, anchor.y - metrics.ascent_px),
        Vec2::new(anchor.x + metrics.text_width(text), anchor.y + metrics.descent_px),
    )
}
