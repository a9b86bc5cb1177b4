//! JSON-lines input of the headless viewer.
//!
//! Each input line is one event object tagged by `"event"`. Besides the two
//! transport events the browser hook receives (`update_pacs`, `toggle`),
//! the viewer accepts events that stand in for what a real map surface
//! would report: lifecycle, viewport changes, clicks, and drags.

use gridworld_types::{GeoBounds, GeoPoint, PacId, SnapshotPayload, ToggleEvent};
use serde::Deserialize;

/// One line of viewer input.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(tag = "event", rename_all = "snake_case")]
pub enum ViewerEvent {
    /// The surface finished initializing.
    SurfaceReady,
    /// The surface failed to initialize.
    SurfaceFailed {
        /// Human-readable failure reason.
        #[serde(default)]
        reason: String,
    },
    /// The viewport settled on new bounds.
    Viewport(GeoBounds),
    /// Click on the map background.
    MapClick(GeoPoint),
    /// Click on a PAC marker.
    MarkerClick {
        /// The PAC whose marker was clicked.
        #[serde(alias = "pac_id")]
        entity_id: PacId,
    },
    /// A PAC marker was dropped after a drag.
    MarkerDragEnd {
        /// The PAC whose marker was dragged.
        #[serde(alias = "pac_id")]
        entity_id: PacId,
        /// Drop latitude.
        lat: f64,
        /// Drop longitude.
        lng: f64,
    },
    /// The inspect overlay's removal affordance was clicked.
    RemoveClick {
        /// The PAC to remove.
        #[serde(alias = "pac_id")]
        entity_id: PacId,
    },
    /// The host re-rendered the map element; every PAC marker is redrawn.
    Rerender,
    /// The host tore the overlay down.
    Detach,
    /// A new authoritative snapshot.
    UpdatePacs(SnapshotPayload),
    /// A visibility control changed.
    Toggle(ToggleEvent),
}

/// Parse one input line.
pub fn parse_line(line: &str) -> Result<ViewerEvent, serde_json::Error> {
    serde_json::from_str(line)
}
