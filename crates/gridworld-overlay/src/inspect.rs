//! Inspect content shown when a PAC marker is clicked.

use gridworld_types::{GeoPoint, GridCoords, Pac, PacId};

/// Caption of the removal affordance.
pub const REMOVE_LABEL: &str = "Remove PAC";

/// Marker label for a PAC: `PAC ` followed by a truncated identifier.
pub fn pac_label(id: &PacId, prefix_len: usize) -> String {
    format!("PAC {}", id.prefix(prefix_len))
}

/// Structured content of the inspect overlay.
///
/// Built from the PAC as it was in the latest snapshot. The removal
/// affordance carries [`InspectView::remove_target`]; activating it raises
/// a remove intent for that id.
#[derive(Debug, Clone, PartialEq)]
pub struct InspectView {
    /// Heading line, the marker label.
    pub title: String,
    /// PAC identifier, also the removal target.
    pub pac_id: PacId,
    /// Geographic position.
    pub position: GeoPoint,
    /// Local grid coordinates.
    pub grid: GridCoords,
    /// Region id.
    pub region_id: String,
    /// Logical tick.
    pub tick_id: u64,
    /// Heading in degrees.
    pub heading: f64,
    /// Speed in m/s.
    pub velocity: f64,
}

impl InspectView {
    /// Build the view for a PAC.
    pub fn for_pac(pac: &Pac, title: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            pac_id: pac.pac_id.clone(),
            position: pac.position(),
            grid: pac.grid(),
            region_id: pac.region_id.clone(),
            tick_id: pac.tick_id,
            heading: pac.heading,
            velocity: pac.velocity,
        }
    }

    /// The id a click on the removal affordance removes.
    pub const fn remove_target(&self) -> &PacId {
        &self.pac_id
    }

    /// Render the rows of the overlay as text, title first.
    pub fn lines(&self) -> Vec<String> {
        vec![
            self.title.clone(),
            format!(
                "Position: {:.6}, {:.6}",
                self.position.lat, self.position.lng
            ),
            format!(
                "Grid: ({:.2}, {:.2}, {:.2})",
                self.grid.x, self.grid.y, self.grid.z
            ),
            format!("Region: {}", self.region_id),
            format!("Tick: {}", self.tick_id),
            format!("Heading: {}°", self.heading),
            format!("Velocity: {} m/s", self.velocity),
            format!("[{REMOVE_LABEL}]"),
        ]
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn pac() -> Pac {
        Pac {
            pac_id: PacId::new("abc123def456"),
            lat: 40.712_8,
            lng: -74.006,
            x: 1.5,
            y: 2.25,
            z: 0.1,
            region_id: "sector_alpha".to_owned(),
            tick_id: 42,
            heading: 270.0,
            velocity: 3.5,
        }
    }

    #[test]
    fn label_truncates_identifier() {
        assert_eq!(pac_label(&PacId::new("abc123def456"), 8), "PAC abc123de");
        assert_eq!(pac_label(&PacId::new("abc"), 8), "PAC abc");
    }

    #[test]
    fn lines_format_every_field() {
        let view = InspectView::for_pac(&pac(), "PAC abc123de");
        let lines = view.lines();
        assert_eq!(
            lines,
            vec![
                "PAC abc123de".to_owned(),
                "Position: 40.712800, -74.006000".to_owned(),
                "Grid: (1.50, 2.25, 0.10)".to_owned(),
                "Region: sector_alpha".to_owned(),
                "Tick: 42".to_owned(),
                "Heading: 270°".to_owned(),
                "Velocity: 3.5 m/s".to_owned(),
                "[Remove PAC]".to_owned(),
            ]
        );
        assert_eq!(view.remove_target().as_str(), "abc123def456");
    }
}
