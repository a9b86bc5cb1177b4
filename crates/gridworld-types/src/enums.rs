//! Enumeration types shared between the overlay and its host.

use serde::{Deserialize, Serialize};
use ts_rs::TS;

/// One of the four visibility controls exposed next to the map.
///
/// Only [`OverlayToggle::Grid`] has a wired effect. The other three are
/// declared so the host can route them, and are recorded but otherwise
/// inert.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize, TS)]
#[ts(export, export_to = "bindings/")]
#[serde(rename_all = "snake_case")]
pub enum OverlayToggle {
    /// Reference lattice lines.
    Grid,
    /// Region boundary polygons (not rendered).
    Regions,
    /// Coordinate readout (not rendered).
    Coordinates,
    /// Movement trails (extension point, not rendered).
    Trails,
}

impl OverlayToggle {
    /// All toggles in display order.
    pub const ALL: [Self; 4] = [Self::Grid, Self::Regions, Self::Coordinates, Self::Trails];

    /// Element id of the control in the host page.
    pub const fn control_id(self) -> &'static str {
        match self {
            Self::Grid => "show-grid",
            Self::Regions => "show-regions",
            Self::Coordinates => "show-coordinates",
            Self::Trails => "show-trails",
        }
    }

    /// Whether toggling this control changes what is drawn.
    pub const fn is_wired(self) -> bool {
        matches!(self, Self::Grid)
    }
}

/// Orientation of a single lattice line.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, TS)]
#[ts(export, export_to = "bindings/")]
#[serde(rename_all = "snake_case")]
pub enum LineAxis {
    /// Constant latitude, spanning the viewport's longitude range.
    Latitude,
    /// Constant longitude, spanning the viewport's latitude range.
    Longitude,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn toggles_use_snake_case_on_the_wire() {
        let json = serde_json::to_string(&OverlayToggle::Coordinates).unwrap_or_default();
        assert_eq!(json, "\"coordinates\"");
    }

    #[test]
    fn only_grid_is_wired() {
        let wired: Vec<_> = OverlayToggle::ALL
            .iter()
            .filter(|t| t.is_wired())
            .collect();
        assert_eq!(wired, vec![&OverlayToggle::Grid]);
    }

    #[test]
    fn control_ids_match_host_markup() {
        assert_eq!(OverlayToggle::Grid.control_id(), "show-grid");
        assert_eq!(OverlayToggle::Trails.control_id(), "show-trails");
    }
}
