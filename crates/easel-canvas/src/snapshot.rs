//! Snapshot Capture and Restore
//!
//! This module defines the persistable project state and the round-trip
//! between a live [`Canvas`] and its stored form. Two schemas exist side by
//! side, mirroring the two storage keys the editor maintains: the full
//! [`ProjectSnapshot`] (elements + background + zoom + metadata) and the
//! lighter [`CanvasState`] (elements + background only). Both decode through
//! the same lenient element path: a stored element that fails to parse is
//! skipped with a warning and the rest of the snapshot is restored.

use std::collections::HashSet;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use tracing::warn;
use uuid::Uuid;

use crate::canvas::Canvas;
use crate::element::CanvasElement;
use crate::error::Result;

/// Current snapshot schema version
pub const SCHEMA_VERSION: u32 = 1;

fn default_schema_version() -> u32 {
    SCHEMA_VERSION
}

fn default_zoom() -> f64 {
    1.0
}

fn default_background() -> String {
    crate::canvas::DEFAULT_BACKGROUND.to_string()
}

/// Full project snapshot: the serializable unit for save/load
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProjectSnapshot {
    /// Project identifier, stable across saves of the same project
    pub id: Uuid,

    /// Project display name
    pub name: String,

    /// Elements in ascending z-order at capture time
    pub elements: Vec<CanvasElement>,

    /// Canvas background (CSS color string)
    #[serde(default = "default_background")]
    pub background: String,

    /// Zoom factor at capture time
    #[serde(default = "default_zoom")]
    pub zoom: f64,

    /// When the snapshot was captured
    pub saved_at: DateTime<Utc>,

    /// Snapshot schema version
    #[serde(default = "default_schema_version")]
    pub schema_version: u32,
}

impl ProjectSnapshot {
    /// Capture the current canvas into a snapshot.
    ///
    /// Elements are recorded in ascending z-order so restore can rebuild by
    /// straight iteration; ties keep the canvas insertion order.
    #[must_use]
    pub fn capture(canvas: &Canvas, name: impl Into<String>) -> Self {
        Self {
            id: Uuid::new_v4(),
            name: name.into(),
            elements: canvas
                .elements_in_z_order()
                .into_iter()
                .cloned()
                .collect(),
            background: canvas.background().to_string(),
            zoom: canvas.zoom(),
            saved_at: Utc::now(),
            schema_version: SCHEMA_VERSION,
        }
    }

    /// Keep the same project id across repeated saves
    #[must_use]
    pub fn with_id(mut self, id: Uuid) -> Self {
        self.id = id;
        self
    }

    /// Rebuild a live canvas from this snapshot.
    ///
    /// Elements are inserted in recorded order (ascending z), except that a
    /// background template always lands beneath everything else regardless
    /// of its recorded z-order. An element that cannot be placed (duplicate
    /// id) is skipped with a warning rather than failing the whole restore.
    #[must_use]
    pub fn restore(&self) -> Canvas {
        let mut canvas = Canvas::new();
        canvas.set_background(self.background.clone());
        canvas.set_zoom(self.zoom);
        restore_elements(&mut canvas, &self.elements);
        canvas
    }

    /// Serialize to the stored JSON form
    pub fn to_json(&self) -> Result<String> {
        Ok(serde_json::to_string(self)?)
    }

    /// Parse a stored snapshot, skipping elements that fail to decode.
    ///
    /// Top-level corruption is still an error; per-element corruption (an
    /// unrecognized `kind`, a malformed payload) drops only that element.
    pub fn from_json(json: &str) -> Result<Self> {
        let raw: RawProjectSnapshot = serde_json::from_str(json)?;
        Ok(Self {
            id: raw.id,
            name: raw.name,
            elements: decode_elements(raw.elements),
            background: raw.background,
            zoom: raw.zoom,
            saved_at: raw.saved_at,
            schema_version: raw.schema_version,
        })
    }
}

/// Lighter-weight canvas-only state (no name, zoom, or metadata)
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CanvasState {
    /// Elements in ascending z-order at capture time
    pub elements: Vec<CanvasElement>,

    /// Canvas background (CSS color string)
    #[serde(default = "default_background")]
    pub background: String,

    /// When the state was captured
    pub saved_at: DateTime<Utc>,
}

impl CanvasState {
    /// Capture elements and background from the canvas
    #[must_use]
    pub fn capture(canvas: &Canvas) -> Self {
        Self {
            elements: canvas
                .elements_in_z_order()
                .into_iter()
                .cloned()
                .collect(),
            background: canvas.background().to_string(),
            saved_at: Utc::now(),
        }
    }

    /// Rebuild a live canvas; zoom is not part of this schema and stays
    /// at its default
    #[must_use]
    pub fn restore(&self) -> Canvas {
        let mut canvas = Canvas::new();
        canvas.set_background(self.background.clone());
        restore_elements(&mut canvas, &self.elements);
        canvas
    }

    /// Serialize to the stored JSON form
    pub fn to_json(&self) -> Result<String> {
        Ok(serde_json::to_string(self)?)
    }

    /// Parse stored state with the same lenient element decode as
    /// [`ProjectSnapshot::from_json`]
    pub fn from_json(json: &str) -> Result<Self> {
        let raw: RawCanvasState = serde_json::from_str(json)?;
        Ok(Self {
            elements: decode_elements(raw.elements),
            background: raw.background,
            saved_at: raw.saved_at,
        })
    }
}

#[derive(Deserialize)]
struct RawProjectSnapshot {
    id: Uuid,
    name: String,
    #[serde(default)]
    elements: Vec<serde_json::Value>,
    #[serde(default = "default_background")]
    background: String,
    #[serde(default = "default_zoom")]
    zoom: f64,
    saved_at: DateTime<Utc>,
    #[serde(default = "default_schema_version")]
    schema_version: u32,
}

#[derive(Deserialize)]
struct RawCanvasState {
    #[serde(default)]
    elements: Vec<serde_json::Value>,
    #[serde(default = "default_background")]
    background: String,
    saved_at: DateTime<Utc>,
}

/// Decode stored elements one by one, dropping the ones that fail
fn decode_elements(raw: Vec<serde_json::Value>) -> Vec<CanvasElement> {
    raw.into_iter()
        .enumerate()
        .filter_map(|(index, value)| {
            match serde_json::from_value::<CanvasElement>(value) {
                Ok(element) => Some(element),
                Err(err) => {
                    warn!(index, %err, "skipping element that failed to decode");
                    None
                }
            }
        })
        .collect()
}

/// Place decoded elements onto a canvas, preserving recorded order and
/// skipping duplicates so one bad element never aborts the restore
fn restore_elements(canvas: &mut Canvas, elements: &[CanvasElement]) {
    let mut seen: HashSet<Uuid> = HashSet::new();
    for element in elements {
        if !seen.insert(element.id) {
            warn!(id = %element.id, "skipping element with duplicate id");
            continue;
        }
        if let Err(err) = canvas.add_element(element.clone()) {
            warn!(id = %element.id, %err, "skipping element that failed to restore");
        }
    }
}
