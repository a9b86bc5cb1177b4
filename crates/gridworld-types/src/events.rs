//! Inbound events pushed to the overlay by the controller and host page.

use serde::{Deserialize, Serialize};
use ts_rs::TS;

use crate::enums::OverlayToggle;

/// A complete authoritative entity set.
///
/// Elements are kept as raw JSON so that each one can be validated on its
/// own: a malformed PAC is skipped without discarding the rest of the
/// snapshot. A missing or `null` entity list is an empty snapshot.
///
/// The list may be spelled `entities` or `pacs`. A payload that carries
/// both is rejected whole with a duplicate-field error.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize, TS)]
#[ts(export, export_to = "bindings/")]
pub struct SnapshotPayload {
    /// Raw entity objects, in controller order.
    #[serde(default, alias = "pacs")]
    pub entities: Option<Vec<serde_json::Value>>,
}

impl SnapshotPayload {
    /// Wrap a list of raw entity objects.
    pub const fn new(entities: Vec<serde_json::Value>) -> Self {
        Self {
            entities: Some(entities),
        }
    }

    /// The raw entity objects, empty when the list was absent.
    pub fn entities(&self) -> &[serde_json::Value] {
        self.entities.as_deref().unwrap_or_default()
    }

    /// Number of raw entity objects.
    pub fn len(&self) -> usize {
        self.entities().len()
    }

    /// Whether the snapshot carries no entities.
    pub fn is_empty(&self) -> bool {
        self.entities().is_empty()
    }
}

/// A change to one of the visibility controls.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export, export_to = "bindings/")]
pub struct ToggleEvent {
    /// Which control changed.
    pub control: OverlayToggle,
    /// The control's new checked state.
    pub enabled: bool,
}

/// Any inbound event, tagged with its wire event name.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[ts(export, export_to = "bindings/")]
#[serde(tag = "event")]
pub enum InboundEvent {
    /// A new authoritative snapshot.
    #[serde(rename = "update_pacs")]
    UpdatePacs(SnapshotPayload),
    /// A visibility control changed.
    #[serde(rename = "toggle")]
    Toggle(ToggleEvent),
}
