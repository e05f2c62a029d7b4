//! Der Diagramm-Container: Node- und Kanten-Registries plus Refresh-Orchestrierung.
//!
//! Kanten referenzieren ihre Endpunkte nur über IDs; der Container besitzt
//! beide Seiten und hält Registrierung und Deregistrierung symmetrisch. Die
//! gegenseitige Neuberechnung paralleler Geschwister läuft hier als
//! begrenzter Zwei-Phasen-Durchlauf statt als rekursiver In-Place-Aufruf:
//! der auslösende Refresh sammelt die Geschwister und berechnet sie
//! anschließend ohne weitere Propagation neu.

use std::collections::HashMap;

use anyhow::{bail, Result};
use glam::Vec2;

use super::anchor;
use super::edge::Edge;
use super::hit_test::PickShape;
use super::label;
use super::node::DiagramNode;
use crate::shared::GeometryOptions;

/// Container für alle Nodes und Kanten eines Diagramms.
#[derive(Debug, Clone)]
pub struct DiagramGraph {
    /// Alle Nodes, indexiert nach ihrer ID
    nodes: HashMap<u64, DiagramNode>,
    /// Alle Kanten, indexiert nach ihrer ID
    edges: HashMap<u64, Edge>,
    next_node_id: u64,
    next_edge_id: u64,
    options: GeometryOptions,
}

impl DiagramGraph {
    /// Erstellt ein leeres Diagramm mit den übergebenen Optionen.
    pub fn new(options: GeometryOptions) -> Self {
        Self {
            nodes: HashMap::new(),
            edges: HashMap::new(),
            next_node_id: 1,
            next_edge_id: 1,
            options,
        }
    }

    /// Aktuelle Geometrie-Optionen.
    pub fn options(&self) -> &GeometryOptions {
        &self.options
    }

    /// Ersetzt die Optionen und berechnet alle Kanten neu.
    pub fn set_options(&mut self, options: GeometryOptions) -> Result<()> {
        self.options = options;
        for edge_id in self.sorted_edge_ids() {
            self.refresh_one(edge_id)?;
        }
        Ok(())
    }

    // ── Node-Lebenszyklus ───────────────────────────────────────────

    /// Fügt einen Node hinzu und vergibt die nächste ID.
    pub fn add_node(&mut self, position: Vec2, radius: f32) -> u64 {
        let id = self.next_node_id;
        self.next_node_id += 1;
        self.nodes.insert(id, DiagramNode::new(id, position, radius));
        id
    }

    /// Entfernt einen Node inklusive aller anliegenden Kanten.
    pub fn remove_node(&mut self, node_id: u64) -> Result<Option<DiagramNode>> {
        if !self.nodes.contains_key(&node_id) {
            return Ok(None);
        }
        let incident: Vec<u64> = self
            .nodes
            .get(&node_id)
            .map(|node| node.incident_edges().collect())
            .unwrap_or_default();
        for edge_id in incident {
            self.remove_edge(edge_id)?;
        }
        Ok(self.nodes.remove(&node_id))
    }

    /// Gibt einen Node zurück.
    pub fn node(&self, node_id: u64) -> Option<&DiagramNode> {
        self.nodes.get(&node_id)
    }

    /// Anzahl der Nodes.
    pub fn node_count(&self) -> usize {
        self.nodes.len()
    }

    /// Aktualisiert die Position eines Nodes und berechnet alle anliegenden
    /// Kanten neu. Gibt `false` zurück, wenn der Node nicht existiert.
    pub fn update_node_position(&mut self, node_id: u64, new_position: Vec2) -> Result<bool> {
        let Some(node) = self.nodes.get_mut(&node_id) else {
            return Ok(false);
        };
        if node.position == new_position {
            return Ok(true);
        }
        node.position = new_position;
        let mut incident: Vec<u64> = node.incident_edges().collect();
        incident.sort_unstable();
        for edge_id in incident {
            self.refresh_one(edge_id)?;
        }
        Ok(true)
    }

    // ── Kanten-Lebenszyklus ─────────────────────────────────────────

    /// Erstellt eine Kante zwischen zwei existierenden Nodes und berechnet
    /// ihre Geometrie sofort. Fehlende Endpunkte sind Contract-Fehler.
    pub fn add_edge(
        &mut self,
        source_id: u64,
        target_id: u64,
        label: impl Into<String>,
    ) -> Result<u64> {
        if !self.nodes.contains_key(&source_id) {
            bail!("Quell-Node {} existiert nicht", source_id);
        }
        if !self.nodes.contains_key(&target_id) {
            bail!("Ziel-Node {} existiert nicht", target_id);
        }

        let edge_id = self.next_edge_id;
        self.next_edge_id += 1;

        let Some(source) = self.nodes.get_mut(&source_id) else {
            bail!("Quell-Node {} existiert nicht", source_id);
        };
        source.attach_edge(edge_id)?;
        if source_id != target_id {
            let Some(target) = self.nodes.get_mut(&target_id) else {
                bail!("Ziel-Node {} existiert nicht", target_id);
            };
            target.attach_edge(edge_id)?;
        }

        self.edges
            .insert(edge_id, Edge::new(edge_id, source_id, target_id, label.into()));
        self.refresh_edge(edge_id)?;
        Ok(edge_id)
    }

    /// Entfernt eine Kante und deregistriert sie symmetrisch von beiden
    /// Endpunkten. Verbleibende Geschwister werden neu aufgelöst.
    pub fn remove_edge(&mut self, edge_id: u64) -> Result<Edge> {
        let Some(edge) = self.edges.remove(&edge_id) else {
            bail!("Kante {} existiert nicht", edge_id);
        };

        let Some(source) = self.nodes.get_mut(&edge.source_id) else {
            bail!("Quell-Node {} der Kante {} fehlt", edge.source_id, edge.id);
        };
        source.detach_edge(edge_id)?;
        if edge.source_id != edge.target_id {
            let Some(target) = self.nodes.get_mut(&edge.target_id) else {
                bail!("Ziel-Node {} der Kante {} fehlt", edge.target_id, edge.id);
            };
            target.detach_edge(edge_id)?;
        }

        for sibling_id in self.sibling_ids(edge.source_id, edge.target_id, edge.id) {
            self.refresh_one(sibling_id)?;
        }
        Ok(edge)
    }

    /// Setzt den Label-Text und berechnet die Geometrie neu
    /// (die Label-Metriken fließen in Anker und Bounds ein).
    pub fn set_edge_label(&mut self, edge_id: u64, label: impl Into<String>) -> Result<()> {
        let Some(edge) = self.edges.get_mut(&edge_id) else {
            bail!("Kante {} existiert nicht", edge_id);
        };
        edge.label = label.into();
        self.refresh_edge(edge_id)
    }

    /// Setzt den Kontrollpunkt durch direkte Interaktion.
    ///
    /// Der Kurven-Tracker läuft hier bewusst nicht: der One-Shot-Flag bleibt
    /// gesetzt, damit der nächste Refresh (z.B. durch einen Node-Move) den
    /// verschobenen Punkt exakt erhält und erst dabei den Referenzrahmen neu
    /// erfasst. Nur Pick-Form und Bounds hängen sofort am neuen Punkt.
    pub fn move_control_point(&mut self, edge_id: u64, new_point: Vec2) -> Result<()> {
        let metrics = self.options.label_metrics();
        let selection_offset = self.options.selection_offset_px;
        let marker_radius = self.options.control_marker_radius_px;

        let Some(edge) = self.edges.get_mut(&edge_id) else {
            bail!("Kante {} existiert nicht", edge_id);
        };
        if edge.is_self_loop() {
            // Schleifen haben keinen Kurven-Griff; der Punkt bleibt geparkt.
            return Ok(());
        }
        edge.mark_control_moved(new_point);
        let pick_shape = PickShape::for_line(
            edge.source_point,
            edge.target_point,
            edge.control_point,
            selection_offset,
            marker_radius,
        );
        let label_rect = label::label_rect(edge.label_anchor, &edge.label, &metrics);
        edge.bounds = pick_shape.bounding_rect().union(&label_rect);
        edge.pick_shape = pick_shape;
        Ok(())
    }

    /// Gibt eine Kante zurück.
    pub fn edge(&self, edge_id: u64) -> Option<&Edge> {
        self.edges.get(&edge_id)
    }

    /// Anzahl der Kanten.
    pub fn edge_count(&self) -> usize {
        self.edges.len()
    }

    /// Alle Kanten-IDs aufsteigend sortiert.
    pub fn sorted_edge_ids(&self) -> Vec<u64> {
        let mut ids: Vec<u64> = self.edges.keys().copied().collect();
        ids.sort_unstable();
        ids
    }

    /// Findet die oberste Kante unter dem Zeiger (kleinste ID gewinnt).
    pub fn edge_at(&self, point: Vec2) -> Option<u64> {
        self.sorted_edge_ids()
            .into_iter()
            .find(|id| {
                self.edges
                    .get(id)
                    .is_some_and(|edge| edge.pick_shape.contains(point))
            })
    }

    // ── Geometrie-Refresh ───────────────────────────────────────────

    /// Berechnet die Geometrie einer Kante neu und löst danach Geschwister
    /// mit kleinerer Identität genau einmal mit auf (Tiefe 1, keine Zyklen).
    pub fn refresh_edge(&mut self, edge_id: u64) -> Result<()> {
        self.refresh_one(edge_id)?;

        let Some(edge) = self.edges.get(&edge_id) else {
            bail!("Kante {} existiert nicht", edge_id);
        };
        let (source_id, target_id, id) = (edge.source_id, edge.target_id, edge.id);
        let mut lower_siblings: Vec<u64> = self
            .sibling_ids(source_id, target_id, id)
            .into_iter()
            .filter(|&sibling_id| sibling_id < id)
            .collect();
        lower_siblings.sort_unstable();
        for sibling_id in lower_siblings {
            self.refresh_one(sibling_id)?;
        }
        Ok(())
    }

    /// Geschwister-Kanten desselben ungeordneten Node-Paars (ohne Schleifen).
    fn sibling_ids(&self, source_id: u64, target_id: u64, except_edge_id: u64) -> Vec<u64> {
        let Some(source) = self.nodes.get(&source_id) else {
            return Vec::new();
        };
        source
            .incident_edges()
            .filter(|&eid| eid != except_edge_id)
            .filter(|eid| {
                self.edges
                    .get(eid)
                    .is_some_and(|other| !other.is_self_loop() && other.connects(source_id, target_id))
            })
            .collect()
    }

    /// Signierter Winkel-Versatz der Kante innerhalb ihrer Parallel-Schar.
    fn parallel_offset_for(&self, edge_id: u64, source_id: u64, target_id: u64) -> f32 {
        let Some(source) = self.nodes.get(&source_id) else {
            return 0.0;
        };
        let mut pair_count = 0usize;
        let mut same_direction: Vec<u64> = Vec::new();
        for eid in source.incident_edges() {
            let Some(other) = self.edges.get(&eid) else {
                continue;
            };
            if other.is_self_loop() || !other.connects(source_id, target_id) {
                continue;
            }
            pair_count += 1;
            if other.source_id == source_id {
                same_direction.push(other.id);
            }
        }
        if pair_count <= 1 {
            return 0.0;
        }
        same_direction.sort_unstable();
        let rank = same_direction
            .iter()
            .position(|&id| id == edge_id)
            .unwrap_or(0);
        anchor::fan_offset_angle(rank, self.options.parallel_offset_rad())
    }

    /// Berechnet eine einzelne Kante neu, ohne Geschwister anzustoßen.
    fn refresh_one(&mut self, edge_id: u64) -> Result<()> {
        let Some(edge) = self.edges.get(&edge_id) else {
            bail!("Kante {} existiert nicht", edge_id);
        };
        let (source_id, target_id) = (edge.source_id, edge.target_id);
        let Some(source) = self.nodes.get(&source_id) else {
            bail!("Quell-Node {} der Kante {} fehlt", source_id, edge_id);
        };
        let Some(target) = self.nodes.get(&target_id) else {
            bail!("Ziel-Node {} der Kante {} fehlt", target_id, edge_id);
        };
        let (source_pos, source_radius) = (source.position, source.radius);
        let target_pos = target.position;
        let target_radius = target.radius;
        let metrics = self.options.label_metrics();

        if source_id == target_id {
            let (source_point, target_point) = anchor::self_loop_anchors(source_pos, source_radius);
            let label_anchor = label::self_loop_anchor(source_pos, source_radius);
            let pick_shape = PickShape::for_loop(
                source_pos,
                source_radius,
                self.options.loop_pick_padding_px,
            );

            let Some(edge) = self.edges.get_mut(&edge_id) else {
                bail!("Kante {} existiert nicht", edge_id);
            };
            edge.source_point = source_point;
            edge.target_point = target_point;
            // Kein Kurven-Tracking: die Schleife wird als Bogen gezeichnet.
            // Der Kontrollpunkt parkt im Schleifenzentrum und bleibt endlich.
            edge.control_point = source_pos + Vec2::new(source_radius, -source_radius);
            edge.label_anchor = label_anchor;
            let label_rect = label::label_rect(label_anchor, &edge.label, &metrics);
            edge.bounds = pick_shape.bounding_rect().union(&label_rect);
            edge.pick_shape = pick_shape;
            return Ok(());
        }

        let offset_angle = self.parallel_offset_for(edge_id, source_id, target_id);
        let (source_point, target_point) = anchor::resolve_line_anchors(
            source_pos,
            source_radius,
            target_pos,
            target_radius,
            offset_angle,
        );
        let curve_offset = self.options.curve_offset_px;
        let selection_offset = self.options.selection_offset_px;
        let marker_radius = self.options.control_marker_radius_px;

        let Some(edge) = self.edges.get_mut(&edge_id) else {
            bail!("Kante {} existiert nicht", edge_id);
        };
        edge.source_point = source_point;
        edge.target_point = target_point;
        edge.track_control_point(source_pos, target_pos, curve_offset);
        edge.label_anchor = label::place_along_line(source_point, target_point, &edge.label, &metrics);
        let pick_shape = PickShape::for_line(
            source_point,
            target_point,
            edge.control_point,
            selection_offset,
            marker_radius,
        );
        let label_rect = label::label_rect(edge.label_anchor, &edge.label, &metrics);
        edge.bounds = pick_shape.bounding_rect().union(&label_rect);
        edge.pick_shape = pick_shape;
        Ok(())
    }
}

impl Default for DiagramGraph {
    fn default() -> Self {
        Self::new(GeometryOptions::default())
    }
}
