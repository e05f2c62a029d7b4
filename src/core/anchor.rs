//! Anker-Auflösung: wo die sichtbare Linie auf den Node-Grenzen beginnt und endet.
//!
//! Ohne parallele Geschwister liegen beide Anker auf der Mittellinie, jeweils
//! um den Node-Radius zum anderen Node hin versetzt. Parallele Kanten drehen
//! ihre Anker um einen signierten Winkel-Versatz um das jeweilige Node-Zentrum,
//! damit mehrere Kanten zwischen demselben Paar als getrennte Bögen lesbar
//! bleiben. Selbst-Schleifen nutzen feste Anker an der Node-Grenze.

use glam::Vec2;

/// Ankerpaar auf den Grenzen zweier verschiedener Nodes.
///
/// `offset_angle` ist der signierte Winkel-Versatz in Radiant (0 = keine
/// parallele Geschwister-Kante). Beide Anker drehen um das jeweilige
/// Node-Zentrum auf dieselbe Seite der Mittellinie; die gegenläufige
/// Geschwister-Kante landet durch ihren gespiegelten Bezugsrahmen auf der
/// anderen Seite.
///
/// Degenerierter Fall: ist der Abstand nicht größer als die Radiensumme,
/// fallen beide Anker auf das Quell-Zentrum zusammen — ohne Division durch
/// die (möglicherweise verschwindende) Länge.
pub fn resolve_line_anchors(
    source_pos: Vec2,
    source_radius: f32,
    target_pos: Vec2,
    target_radius: f32,
    offset_angle: f32,
) -> (Vec2, Vec2) {
    let delta = target_pos - source_pos;
    let length = delta.length();
    if length <= source_radius + target_radius {
        return (source_pos, source_pos);
    }

    let phi = delta.y.atan2(delta.x);
    let source_point = source_pos + source_radius * Vec2::from_angle(phi - offset_angle);
    let target_point =
        target_pos + target_radius * Vec2::from_angle(phi + std::f32::consts::PI + offset_angle);

    (source_point, target_point)
}

/// Feste Anker einer Selbst-Schleife: direkt über und rechts neben der
/// Node-Grenze. Es gibt keine Mittellinie, aus der sie ableitbar wären.
pub fn self_loop_anchors(node_center: Vec2, node_radius: f32) -> (Vec2, Vec2) {
    (
        node_center + Vec2::new(0.0, -node_radius),
        node_center + Vec2::new(node_radius, 0.0),
    )
}

/// Signierter Winkel-Versatz für Rang `rank` innerhalb einer
/// Richtungsgruppe paralleler Kanten: `(2·rank + 1) · base`.
///
/// Gegenläufige Paare erhalten damit je `+base` im eigenen Bezugsrahmen,
/// gleichgerichtete Duplikate fächern bei `+base, +3·base, …` auf.
pub fn fan_offset_angle(rank: usize, base_offset: f32) -> f32 {
    (2 * rank + 1) as f32 * base_offset
}
