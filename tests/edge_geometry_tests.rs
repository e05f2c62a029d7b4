//! Integrationstests für den Kanten-Geometrie-Kern:
//! - Anker-Auflösung inkl. paralleler Kanten und Degenerat-Fällen
//! - Movement-invariantes Kontrollpunkt-Tracking
//! - Label-Quadranten und Selbst-Schleifen
//! - Pick-Formen, Bounds und Render-Vertrag

use approx::assert_relative_eq;
use diagram_edge_engine::core::{line_angle_deg, quadrant_of};
use diagram_edge_engine::{DiagramGraph, Quadrant, RenderScene};
use glam::Vec2;

/// Erstellt das Referenz-Szenario: zwei Nodes mit Radius 20 bei (0,0) und (100,0).
fn graph_a_b() -> (DiagramGraph, u64, u64) {
    let mut graph = DiagramGraph::default();
    let a = graph.add_node(Vec2::new(0.0, 0.0), 20.0);
    let b = graph.add_node(Vec2::new(100.0, 0.0), 20.0);
    (graph, a, b)
}

// ─── Referenz-Szenario ───────────────────────────────────────────────────────

#[test]
fn test_referenz_szenario_anker_und_kontrollpunkt() {
    let (mut graph, a, b) = graph_a_b();
    let edge_id = graph.add_edge(a, b, "x").expect("Kante muss entstehen");

    let edge = graph.edge(edge_id).unwrap();
    assert_relative_eq!(edge.source_point.x, 20.0, epsilon = 1e-3);
    assert_relative_eq!(edge.source_point.y, 0.0, epsilon = 1e-3);
    assert_relative_eq!(edge.target_point.x, 80.0, epsilon = 1e-3);
    assert_relative_eq!(edge.target_point.y, 0.0, epsilon = 1e-3);
    // Dokumentierte Normalen-Konvention: Kontrollpunkt auf der +y-Seite
    assert_relative_eq!(edge.control_point.x, 50.0, epsilon = 1e-3);
    assert_relative_eq!(edge.control_point.y, 30.0, epsilon = 1e-3);
}

// ─── Anker-Eigenschaften ─────────────────────────────────────────────────────

#[test]
fn test_anker_liegen_im_radius_abstand_auf_der_linie() {
    let mut graph = DiagramGraph::default();
    let a = graph.add_node(Vec2::new(-40.0, 25.0), 12.0);
    let b = graph.add_node(Vec2::new(130.0, -60.0), 18.0);
    let edge_id = graph.add_edge(a, b, "").unwrap();

    let edge = graph.edge(edge_id).unwrap();
    let a_pos = graph.node(a).unwrap().position;
    let b_pos = graph.node(b).unwrap().position;

    assert_relative_eq!(edge.source_point.distance(a_pos), 12.0, epsilon = 1e-3);
    assert_relative_eq!(edge.target_point.distance(b_pos), 18.0, epsilon = 1e-3);
    // Beide Anker liegen auf der Mittellinie
    let direction = (b_pos - a_pos).normalize();
    let to_source = (edge.source_point - a_pos).normalize();
    assert_relative_eq!(direction.dot(to_source), 1.0, epsilon = 1e-4);
}

#[test]
fn test_kurze_distanz_kollabiert_anker_ohne_nan() {
    let (mut graph, a, b) = graph_a_b();
    let edge_id = graph.add_edge(a, b, "x").unwrap();

    // Abstand 30 <= Radiensumme 40
    graph.update_node_position(b, Vec2::new(30.0, 0.0)).unwrap();

    let edge = graph.edge(edge_id).unwrap();
    assert_eq!(edge.source_point, edge.target_point);
    assert_eq!(edge.source_point, Vec2::new(0.0, 0.0));
    assert!(edge.control_point.is_finite());
    assert!(edge.label_anchor.is_finite());
    assert!(edge.bounds.min.is_finite() && edge.bounds.max.is_finite());
}

// ─── Parallele Kanten ────────────────────────────────────────────────────────

#[test]
fn test_parallele_kanten_trennen_sich_um_den_versatzwinkel() {
    let (mut graph, a, b) = graph_a_b();
    let forward = graph.add_edge(a, b, "hin").unwrap();
    let backward = graph.add_edge(b, a, "zurueck").unwrap();

    let offset_deg = graph.options().parallel_offset_deg;
    let forward_edge = graph.edge(forward).unwrap();
    let backward_edge = graph.edge(backward).unwrap();

    // Winkel zwischen Anker-Richtung und Mittellinie entspricht dem Versatz
    let forward_source = forward_edge.source_point;
    let forward_angle = forward_source.y.atan2(forward_source.x).to_degrees();
    assert_relative_eq!(forward_angle, -offset_deg, epsilon = 0.1);

    let backward_source = backward_edge.source_point - Vec2::new(100.0, 0.0);
    let backward_angle = backward_source.y.atan2(backward_source.x).to_degrees();
    assert_relative_eq!(backward_angle, 180.0 - offset_deg, epsilon = 0.1);

    // Die beiden Sehnen liegen auf verschiedenen Seiten der Mittellinie
    assert!(forward_edge.source_point.y < 0.0);
    assert!(backward_edge.source_point.y > 0.0);
}

#[test]
fn test_wiederholter_refresh_oszilliert_nicht() {
    let (mut graph, a, b) = graph_a_b();
    let forward = graph.add_edge(a, b, "hin").unwrap();
    let backward = graph.add_edge(b, a, "zurueck").unwrap();

    let snapshot = |graph: &DiagramGraph| {
        (
            graph.edge(forward).unwrap().source_point,
            graph.edge(forward).unwrap().target_point,
            graph.edge(backward).unwrap().source_point,
            graph.edge(backward).unwrap().target_point,
        )
    };

    let before = snapshot(&graph);
    for _ in 0..3 {
        graph.refresh_edge(forward).unwrap();
        graph.refresh_edge(backward).unwrap();
    }
    let after = snapshot(&graph);

    assert_relative_eq!(before.0.distance(after.0), 0.0, epsilon = 1e-4);
    assert_relative_eq!(before.1.distance(after.1), 0.0, epsilon = 1e-4);
    assert_relative_eq!(before.2.distance(after.2), 0.0, epsilon = 1e-4);
    assert_relative_eq!(before.3.distance(after.3), 0.0, epsilon = 1e-4);
}

#[test]
fn test_drei_parallele_kanten_ohne_kollision_und_ohne_absturz() {
    let (mut graph, a, b) = graph_a_b();
    let e1 = graph.add_edge(a, b, "").unwrap();
    let e2 = graph.add_edge(a, b, "").unwrap();
    let e3 = graph.add_edge(b, a, "").unwrap();
    for id in [e1, e2, e3] {
        graph.refresh_edge(id).unwrap();
    }

    let p1 = graph.edge(e1).unwrap().source_point;
    let p2 = graph.edge(e2).unwrap().source_point;
    let p3 = graph.edge(e3).unwrap().source_point;

    assert!(p1.is_finite() && p2.is_finite() && p3.is_finite());
    // Paarweise getrennt: gleichgerichtete fächern auf, gegenläufige spiegeln
    assert!(p1.distance(p2) > 1.0);
    assert!(p1.distance(p3) > 1.0);
}

// ─── Kontrollpunkt-Tracking ──────────────────────────────────────────────────

#[test]
fn test_skalierung_skaliert_den_kontrollpunkt_abstand() {
    let mut graph = DiagramGraph::default();
    let a = graph.add_node(Vec2::new(10.0, 20.0), 5.0);
    let b = graph.add_node(Vec2::new(110.0, 20.0), 5.0);
    let edge_id = graph.add_edge(a, b, "").unwrap();

    let reference_before = *graph.edge(edge_id).unwrap().reference().unwrap();

    // Beide Positionen um k = 2.5 um den Ursprung skalieren
    let k = 2.5;
    graph
        .update_node_position(a, Vec2::new(25.0, 50.0))
        .unwrap();
    graph
        .update_node_position(b, Vec2::new(275.0, 50.0))
        .unwrap();

    let reference_after = *graph.edge(edge_id).unwrap().reference().unwrap();
    assert_relative_eq!(
        reference_after.distance,
        k * reference_before.distance,
        epsilon = 1e-2
    );
    assert_relative_eq!(
        reference_after.angle_offset,
        reference_before.angle_offset,
        epsilon = 1e-3
    );
}

#[test]
fn test_rotation_fuehrt_den_kontrollpunkt_affin_mit() {
    let (mut graph, a, b) = graph_a_b();
    let edge_id = graph.add_edge(a, b, "").unwrap();
    assert_eq!(graph.edge(edge_id).unwrap().control_point, Vec2::new(50.0, 30.0));

    // Ziel um 90° um die Quelle gedreht: (100,0) → (0,100)
    graph.update_node_position(b, Vec2::new(0.0, 100.0)).unwrap();

    let control = graph.edge(edge_id).unwrap().control_point;
    assert_relative_eq!(control.x, -30.0, epsilon = 1e-2);
    assert_relative_eq!(control.y, 50.0, epsilon = 1e-2);
}

#[test]
fn test_suppress_roundtrip_erhaelt_den_gezogenen_punkt() {
    let (mut graph, a, b) = graph_a_b();
    let edge_id = graph.add_edge(a, b, "").unwrap();

    graph
        .move_control_point(edge_id, Vec2::new(60.0, -25.0))
        .unwrap();

    // Unmittelbar nächster Refresh: exakt erhalten
    graph.update_node_position(b, Vec2::new(150.0, 0.0)).unwrap();
    assert_eq!(
        graph.edge(edge_id).unwrap().control_point,
        Vec2::new(60.0, -25.0)
    );

    // Danach: proportional mitgeführt
    graph.update_node_position(b, Vec2::new(300.0, 0.0)).unwrap();
    let control = graph.edge(edge_id).unwrap().control_point;
    assert_relative_eq!(control.x, 120.0, epsilon = 1e-2);
    assert_relative_eq!(control.y, -50.0, epsilon = 1e-2);
}

#[test]
fn test_nullabstand_behaelt_den_letzten_kontrollpunkt() {
    let (mut graph, a, b) = graph_a_b();
    let edge_id = graph.add_edge(a, b, "").unwrap();
    let before = graph.edge(edge_id).unwrap().control_point;

    graph.update_node_position(b, Vec2::new(0.0, 0.0)).unwrap();

    let edge = graph.edge(edge_id).unwrap();
    assert_eq!(edge.control_point, before);
    assert!(edge.control_point.is_finite());
}

// ─── Label-Platzierung ───────────────────────────────────────────────────────

#[test]
fn test_label_quadranten_ueber_alle_richtungen() {
    // 9 Richtungen: Diagonalen, exakte 0° und knapp neben den übrigen Achsen
    // (Bildschirm-Koordinaten, y nach unten; exakte Grenzwinkel deckt der
    // Unit-Test der Quadranten-Zuordnung ab)
    let cases = [
        (Vec2::new(100.0, 0.0), Quadrant::DownRight), // 0°
        (Vec2::new(100.0, -100.0), Quadrant::UpRight), // 45°
        (Vec2::new(2.0, -100.0), Quadrant::UpRight),  // ≈ 88.9°
        (Vec2::new(-100.0, -100.0), Quadrant::UpLeft), // 135°
        (Vec2::new(-100.0, -2.0), Quadrant::UpLeft),  // ≈ 178.9°
        (Vec2::new(-100.0, 100.0), Quadrant::DownLeft), // 225°
        (Vec2::new(-2.0, 100.0), Quadrant::DownLeft), // ≈ 268.9°
        (Vec2::new(100.0, 100.0), Quadrant::DownRight), // 315°
        (Vec2::new(100.0, 2.0), Quadrant::DownRight), // ≈ 358.9°
    ];

    for (delta, expected) in cases {
        assert_eq!(
            quadrant_of(line_angle_deg(delta)),
            expected,
            "Richtung {:?}",
            delta
        );

        let mut graph = DiagramGraph::default();
        let a = graph.add_node(Vec2::new(0.0, 0.0), 10.0);
        let b = graph.add_node(delta, 10.0);
        let edge_id = graph.add_edge(a, b, "label").unwrap();

        let anchor = graph.edge(edge_id).unwrap().label_anchor;
        assert!(anchor.is_finite(), "Label-Anker für {:?}", delta);
    }
}

#[test]
fn test_horizontales_label_sitzt_oberhalb_vor_dem_ziel() {
    let (mut graph, a, b) = graph_a_b();
    let edge_id = graph.add_edge(a, b, "x").unwrap();

    let anchor = graph.edge(edge_id).unwrap().label_anchor;
    assert_relative_eq!(anchor.x, 72.0, epsilon = 1e-3);
    assert_relative_eq!(anchor.y, -5.0, epsilon = 1e-3);
}

#[test]
fn test_label_aenderung_verschiebt_anker_und_bounds() {
    let (mut graph, a, b) = graph_a_b();
    let edge_id = graph.add_edge(a, b, "x").unwrap();
    let bounds_before = graph.edge(edge_id).unwrap().bounds;

    graph
        .set_edge_label(edge_id, "ein-langes-label")
        .unwrap();

    let edge = graph.edge(edge_id).unwrap();
    assert_eq!(edge.label, "ein-langes-label");
    // Längerer Text: Anker rückt weiter vom Ziel weg, Bounds wachsen
    assert!(edge.label_anchor.x < 72.0);
    assert!(edge.bounds.max.x >= bounds_before.max.x);
}

// ─── Selbst-Schleifen ────────────────────────────────────────────────────────

#[test]
fn test_self_loop_geometrie_ist_fest_an_der_node_grenze() {
    let mut graph = DiagramGraph::default();
    let a = graph.add_node(Vec2::new(50.0, 50.0), 20.0);
    let edge_id = graph.add_edge(a, a, "loop").unwrap();

    let edge = graph.edge(edge_id).unwrap();
    assert!(edge.is_self_loop());
    assert_eq!(edge.source_point, Vec2::new(50.0, 30.0));
    assert_eq!(edge.target_point, Vec2::new(70.0, 50.0));
    // Label-Anker: Schleifenzentrum um den halben Radius nach links versetzt
    assert_eq!(edge.label_anchor, Vec2::new(60.0, 30.0));
}

#[test]
fn test_self_loop_pick_trifft_den_bogen_statt_einer_linie() {
    let mut graph = DiagramGraph::default();
    let a = graph.add_node(Vec2::new(0.0, 0.0), 20.0);
    let edge_id = graph.add_edge(a, a, "").unwrap();

    // Schleifenzentrum (20,-20), Radius 22
    assert_eq!(graph.edge_at(Vec2::new(20.0, -20.0)), Some(edge_id));
    assert_eq!(graph.edge_at(Vec2::new(35.0, -35.0)), Some(edge_id));
    assert_eq!(graph.edge_at(Vec2::new(60.0, 20.0)), None);
}

// ─── Lebenszyklus ────────────────────────────────────────────────────────────

#[test]
fn test_node_entfernung_raeumt_kanten_und_registries() {
    let (mut graph, a, b) = graph_a_b();
    let c = graph.add_node(Vec2::new(50.0, 120.0), 20.0);
    graph.add_edge(a, b, "ab").unwrap();
    graph.add_edge(b, c, "bc").unwrap();
    graph.add_edge(c, c, "cc").unwrap();

    let removed = graph.remove_node(b).unwrap();
    assert!(removed.is_some());

    assert_eq!(graph.edge_count(), 1, "nur die Schleife an c bleibt");
    assert_eq!(graph.node(a).unwrap().degree(), 0);
    assert_eq!(graph.node(c).unwrap().degree(), 1);
}

#[test]
fn test_kante_zu_fehlendem_node_ist_ein_contract_fehler() {
    let (mut graph, a, _b) = graph_a_b();

    assert!(graph.add_edge(a, 999, "x").is_err());
    assert!(graph.remove_edge(42).is_err());
}

// ─── Render-Vertrag ──────────────────────────────────────────────────────────

#[test]
fn test_render_szene_buendelt_fertige_geometrie() {
    let (mut graph, a, b) = graph_a_b();
    graph.add_edge(a, b, "x").unwrap();
    graph.add_edge(b, b, "loop").unwrap();

    let scene = RenderScene::from_graph(&graph);
    assert_eq!(scene.edges.len(), 2);

    let line = &scene.edges[0];
    assert!(!line.is_self_loop);
    assert!(line.arrow.is_some());
    assert!(line.loop_arc.is_none());
    assert_eq!(line.label_text, "x");

    let arrow = line.arrow.unwrap();
    assert_relative_eq!(arrow.peak.x, 80.0, epsilon = 1e-3);

    let looped = &scene.edges[1];
    assert!(looped.is_self_loop);
    assert!(looped.loop_arc.is_some());
}
