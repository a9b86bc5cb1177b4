//! Outbound intents raised by user interaction.
//!
//! An intent is a request for the controller to validate and act on. The
//! overlay never applies an intent locally: the next authoritative snapshot
//! is the only thing that changes what is drawn.

use serde::{Deserialize, Serialize};
use ts_rs::TS;

use crate::ids::PacId;
use crate::structs::GeoPoint;

/// Place a new PAC at a clicked map position.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize, TS)]
#[ts(export, export_to = "bindings/")]
pub struct PlaceIntent {
    /// Clicked latitude.
    pub lat: f64,
    /// Clicked longitude.
    pub lng: f64,
}

/// Move an existing PAC to the position its marker was dragged to.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[ts(export, export_to = "bindings/")]
pub struct MoveIntent {
    /// The PAC being relocated.
    #[serde(alias = "pac_id")]
    pub entity_id: PacId,
    /// Drop latitude.
    pub lat: f64,
    /// Drop longitude.
    pub lng: f64,
}

/// Remove a PAC, raised from its inspect view.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export, export_to = "bindings/")]
pub struct RemoveIntent {
    /// The PAC to remove.
    #[serde(alias = "pac_id")]
    pub entity_id: PacId,
}

/// Any outbound intent, tagged with the event name the controller expects.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[ts(export, export_to = "bindings/")]
#[serde(tag = "event")]
pub enum Intent {
    /// See [`PlaceIntent`].
    #[serde(rename = "place_pac")]
    Place(PlaceIntent),
    /// See [`MoveIntent`].
    #[serde(rename = "move_pac")]
    Move(MoveIntent),
    /// See [`RemoveIntent`].
    #[serde(rename = "remove_pac")]
    Remove(RemoveIntent),
}

impl Intent {
    /// Build a place intent for a clicked point.
    pub const fn place(point: GeoPoint) -> Self {
        Self::Place(PlaceIntent {
            lat: point.lat,
            lng: point.lng,
        })
    }

    /// Build a move intent for a dragged PAC.
    pub const fn relocate(entity_id: PacId, point: GeoPoint) -> Self {
        Self::Move(MoveIntent {
            entity_id,
            lat: point.lat,
            lng: point.lng,
        })
    }

    /// Build a remove intent.
    pub const fn remove(entity_id: PacId) -> Self {
        Self::Remove(RemoveIntent { entity_id })
    }

    /// The wire event name of this intent.
    pub const fn event_name(&self) -> &'static str {
        match self {
            Self::Place(_) => "place_pac",
            Self::Move(_) => "move_pac",
            Self::Remove(_) => "remove_pac",
        }
    }
}
