//! Zentrale Konfiguration für den Kanten-Geometrie-Kern.
//!
//! `GeometryOptions` enthält alle zur Laufzeit änderbaren Zeichen-Konstanten,
//! die die Label-Platzierung, das Pick-Polygon und die Kurven-Geometrie
//! benötigen. Die `const`-Werte bleiben als Fallback/Default erhalten.

use serde::{Deserialize, Serialize};

// ── Label-Metriken ──────────────────────────────────────────────────

/// Breite eines Zeichens in Pixeln (Referenz-Schrift der Host-Anwendung).
pub const CHAR_WIDTH_PX: f32 = 8.0;
/// Zeilenhöhe des Labels in Pixeln.
pub const LABEL_LINE_HEIGHT_PX: f32 = 14.0;
/// Oberlänge der Label-Schrift in Pixeln (Bounding-Box nach oben).
pub const LABEL_ASCENT_PX: f32 = 18.0;
/// Unterlänge der Label-Schrift in Pixeln (Bounding-Box nach unten).
pub const LABEL_DESCENT_PX: f32 = 2.0;

// ── Selektion ───────────────────────────────────────────────────────

/// Halbe Breite des Pick-Polygons senkrecht zur Linie, in Pixeln.
pub const SELECTION_OFFSET_PX: f32 = 4.0;
/// Halbe Kantenlänge des Pick-Quadrats um den Kontrollpunkt.
pub const CONTROL_MARKER_RADIUS_PX: f32 = 3.0;
/// Zusätzlicher Radius des Pick-Kreises bei Selbst-Schleifen.
pub const LOOP_PICK_PADDING_PX: f32 = 2.0;

// ── Kanten-Geometrie ───────────────────────────────────────────────

/// Winkel-Versatz paralleler Kanten in Grad.
pub const PARALLEL_OFFSET_DEG: f32 = 5.0;
/// Senkrechter Abstand des initialen Kontrollpunkts von der Mittellinie.
pub const CURVE_OFFSET_PX: f32 = 30.0;
/// Länge der Pfeilspitze in Pixeln.
pub const ARROW_SIZE_PX: f32 = 15.0;

/// Metriken der Label-Schrift, wie sie die Label-Platzierung benötigt.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LabelMetrics {
    /// Breite eines Zeichens in Pixeln
    pub char_width_px: f32,
    /// Zeilenhöhe in Pixeln
    pub line_height_px: f32,
    /// Oberlänge in Pixeln
    pub ascent_px: f32,
    /// Unterlänge in Pixeln
    pub descent_px: f32,
}

impl LabelMetrics {
    /// Breite eines Label-Texts in Pixeln.
    pub fn text_width(&self, text: &str) -> f32 {
        self.char_width_px * text.chars().count() as f32
    }
}

// ── Laufzeit-Optionen (serialisierbar) ─────────────────────────────

/// Alle zur Laufzeit änderbaren Geometrie-Optionen.
/// Kann als TOML-Datei neben der Host-Anwendung gespeichert werden.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct GeometryOptions {
    // ── Label ───────────────────────────────────────────────────
    /// Breite eines Zeichens in Pixeln
    pub char_width_px: f32,
    /// Zeilenhöhe des Labels in Pixeln
    pub label_line_height_px: f32,
    /// Oberlänge der Label-Schrift in Pixeln
    pub label_ascent_px: f32,
    /// Unterlänge der Label-Schrift in Pixeln
    pub label_descent_px: f32,

    // ── Selektion ───────────────────────────────────────────────
    /// Halbe Breite des Pick-Polygons senkrecht zur Linie
    pub selection_offset_px: f32,
    /// Halbe Kantenlänge des Pick-Quadrats um den Kontrollpunkt
    #[serde(default = "default_control_marker_radius_px")]
    pub control_marker_radius_px: f32,
    /// Zusätzlicher Radius des Pick-Kreises bei Selbst-Schleifen
    #[serde(default = "default_loop_pick_padding_px")]
    pub loop_pick_padding_px: f32,

    // ── Kanten-Geometrie ────────────────────────────────────────
    /// Winkel-Versatz paralleler Kanten in Grad
    pub parallel_offset_deg: f32,
    /// Senkrechter Abstand des initialen Kontrollpunkts von der Mittellinie
    pub curve_offset_px: f32,
    /// Länge der Pfeilspitze in Pixeln
    pub arrow_size_px: f32,
}

impl Default for GeometryOptions {
    fn default() -> Self {
        Self {
            char_width_px: CHAR_WIDTH_PX,
            label_line_height_px: LABEL_LINE_HEIGHT_PX,
            label_ascent_px: LABEL_ASCENT_PX,
            label_descent_px: LABEL_DESCENT_PX,

            selection_offset_px: SELECTION_OFFSET_PX,
            control_marker_radius_px: CONTROL_MARKER_RADIUS_PX,
            loop_pick_padding_px: LOOP_PICK_PADDING_PX,

            parallel_offset_deg: PARALLEL_OFFSET_DEG,
            curve_offset_px: CURVE_OFFSET_PX,
            arrow_size_px: ARROW_SIZE_PX,
        }
    }
}

/// Serde-Default für `control_marker_radius_px` (Abwärtskompatibilität).
fn default_control_marker_radius_px() -> f32 {
    CONTROL_MARKER_RADIUS_PX
}

/// Serde-Default für `loop_pick_padding_px` (Abwärtskompatibilität).
fn default_loop_pick_padding_px() -> f32 {
    LOOP_PICK_PADDING_PX
}

impl GeometryOptions {
    /// Lädt Optionen aus einer TOML-Datei. Bei Fehler: Standardwerte.
    pub fn load_from_file(path: &std::path::Path) -> Self {
        match std::fs::read_to_string(path) {
            Ok(content) => match toml::from_str(&content) {
                Ok(opts) => {
                    log::info!("Geometrie-Optionen geladen aus: {}", path.display());
                    opts
                }
                Err(e) => {
                    log::warn!("Optionen-Datei fehlerhaft, verwende Standardwerte: {}", e);
                    Self::default()
                }
            },
            Err(_) => {
                log::info!("Keine Optionen-Datei gefunden, verwende Standardwerte");
                Self::default()
            }
        }
    }

    /// Speichert Optionen als TOML-Datei.
    pub fn save_to_file(&self, path: &std::path::Path) -> anyhow::Result<()> {
        let content = toml::to_string_pretty(self)?;
        std::fs::write(path, content)?;
        log::info!("Geometrie-Optionen gespeichert nach: {}", path.display());
        Ok(())
    }

    /// Winkel-Versatz paralleler Kanten in Radiant.
    pub fn parallel_offset_rad(&self) -> f32 {
        self.parallel_offset_deg.to_radians()
    }

    /// Label-Metriken für die Label-Platzierung.
    pub fn label_metrics(&self) -> LabelMetrics {
        LabelMetrics {
            char_width_px: self.char_width_px,
            line_height_px: self.label_line_height_px,
            ascent_px: self.label_ascent_px,
            descent_px: self.label_descent_px,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_entsprechen_den_konstanten() {
        let opts = GeometryOptions::default();

        assert_eq!(opts.char_width_px, CHAR_WIDTH_PX);
        assert_eq!(opts.selection_offset_px, SELECTION_OFFSET_PX);
        assert_eq!(opts.parallel_offset_deg, PARALLEL_OFFSET_DEG);
        assert_eq!(opts.curve_offset_px, CURVE_OFFSET_PX);
        assert_eq!(opts.arrow_size_px, ARROW_SIZE_PX);
    }

    #[test]
    fn toml_roundtrip_erhaelt_alle_werte() {
        let opts = GeometryOptions {
            parallel_offset_deg: 7.5,
            char_width_px: 9.0,
            ..GeometryOptions::default()
        };

        let content =
            toml::to_string_pretty(&opts).expect("Serialisierung darf nicht fehlschlagen");
        let parsed: GeometryOptions = toml::from_str(&content).expect("TOML muss parsebar sein");

        assert_eq!(parsed, opts);
    }

    #[test]
    fn fehlende_felder_nutzen_serde_defaults() {
        // Ältere Options-Datei ohne die später ergänzten Pick-Felder
        let content = r#"
            char_width_px = 8.0
            label_line_height_px = 14.0
            label_ascent_px = 18.0
            label_descent_px = 2.0
            selection_offset_px = 4.0
            parallel_offset_deg = 5.0
            curve_offset_px = 30.0
            arrow_size_px = 15.0
        "#;

        let parsed: GeometryOptions = toml::from_str(content).expect("TOML muss parsebar sein");
        assert_eq!(parsed.control_marker_radius_px, CONTROL_MARKER_RADIUS_PX);
        assert_eq!(parsed.loop_pick_padding_px, LOOP_PICK_PADDING_PX);
    }

    #[test]
    fn text_width_zaehlt_zeichen() {
        let metrics = GeometryOptions::default().label_metrics();

        assert_eq!(metrics.text_width(""), 0.0);
        assert_eq!(metrics.text_width("x"), CHAR_WIDTH_PX);
        assert_eq!(metrics.text_width("abc"), 3.0 * CHAR_WIDTH_PX);
    }
}
