//! Node-Proxy: Zentrum, Radius und Registry der anliegenden Kanten.
//!
//! Der Geometrie-Kern liest nur Position und Radius; die Registry dient der
//! Erkennung paralleler Geschwister und Selbst-Schleifen. Registrierung und
//! Deregistrierung erfolgen symmetrisch durch den Kanten-Lebenszyklus.

use anyhow::{bail, Result};
use glam::Vec2;
use indexmap::IndexSet;

/// Ein Node im Diagramm, aus Sicht des Kanten-Kerns.
#[derive(Debug, Clone)]
pub struct DiagramNode {
    /// Eindeutige Node-ID
    pub id: u64,
    /// Zentrum in Welt-Koordinaten
    pub position: Vec2,
    /// Radius der kreisförmigen Node-Grenze
    pub radius: f32,
    /// Anliegende Kanten in deterministischer Einfüge-Reihenfolge
    incident: IndexSet<u64>,
}

impl DiagramNode {
    /// Erstellt einen Node ohne anliegende Kanten.
    pub fn new(id: u64, position: Vec2, radius: f32) -> Self {
        Self {
            id,
            position,
            radius,
            incident: IndexSet::new(),
        }
    }

    /// Registriert eine Kante. Doppelte Registrierung ist ein Contract-Fehler.
    pub fn attach_edge(&mut self, edge_id: u64) -> Result<()> {
        if !self.incident.insert(edge_id) {
            bail!("Kante {} ist bereits an Node {} registriert", edge_id, self.id);
        }
        Ok(())
    }

    /// Deregistriert eine Kante. Fehlende Registrierung ist ein Contract-Fehler.
    pub fn detach_edge(&mut self, edge_id: u64) -> Result<()> {
        if !self.incident.shift_remove(&edge_id) {
            bail!("Kante {} ist nicht an Node {} registriert", edge_id, self.id);
        }
        Ok(())
    }

    /// IDs der anliegenden Kanten in deterministischer Reihenfolge.
    pub fn incident_edges(&self) -> impl Iterator<Item = u64> + '_ {
        self.incident.iter().copied()
    }

    /// Anzahl der anliegenden Kanten.
    pub fn degree(&self) -> usize {
        self.incident.len()
    }
}
