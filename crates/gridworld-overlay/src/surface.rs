//! Rendering surface trait and headless implementation.
//!
//! The map itself (projection, imagery, input capture) is an external
//! collaborator. The [`RenderSurface`] trait is the narrow set of
//! capabilities the overlay needs from it: report the viewport, attach and
//! detach polylines and markers, and show the single shared content overlay.
//!
//! [`HeadlessSurface`] keeps everything in memory. It backs the headless
//! viewer and makes resource leaks observable in tests through its live
//! primitive counts.

use std::collections::BTreeMap;

use gridworld_types::{GeoBounds, GeoPoint};

use crate::config::{LatticeStyle, MarkerStyle};
use crate::error::SurfaceError;
use crate::inspect::InspectView;

/// Surface-assigned id of an attached polyline.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct LineId(pub u64);

/// Surface-assigned id of an attached marker.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct MarkerId(pub u64);

impl core::fmt::Display for LineId {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        write!(f, "line#{}", self.0)
    }
}

impl core::fmt::Display for MarkerId {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        write!(f, "marker#{}", self.0)
    }
}

/// A two-point polyline to attach.
#[derive(Debug, Clone, PartialEq)]
pub struct PolylineSpec {
    /// Start of the segment.
    pub from: GeoPoint,
    /// End of the segment.
    pub to: GeoPoint,
    /// Stroke styling.
    pub style: LatticeStyle,
    /// Whether the line is drawn once attached.
    pub visible: bool,
}

/// A circular marker to attach or update.
///
/// `draggable` and `clickable` are the relocate and inspect bindings. The
/// surface reports drag completion and clicks by [`MarkerId`]; removing
/// the marker drops both bindings with it.
#[derive(Debug, Clone, PartialEq)]
pub struct MarkerSpec {
    /// Marker position.
    pub position: GeoPoint,
    /// Hover title, also the marker label.
    pub title: String,
    /// Fill color as `#rrggbb`.
    pub fill_color: String,
    /// Symbol styling.
    pub style: MarkerStyle,
    /// Relocate binding.
    pub draggable: bool,
    /// Inspect binding.
    pub clickable: bool,
}

/// Capabilities the overlay consumes from the map surface.
///
/// Every method runs on the surface's single UI thread.
pub trait RenderSurface {
    /// Current viewport bounds, or `None` while the surface cannot report
    /// them.
    fn bounds(&self) -> Option<GeoBounds>;

    /// Attach a polyline.
    ///
    /// # Errors
    ///
    /// Returns [`SurfaceError::Attach`] if the surface refuses the line.
    fn add_polyline(&mut self, spec: &PolylineSpec) -> Result<LineId, SurfaceError>;

    /// Show or hide an attached polyline. Unknown ids are ignored.
    fn set_polyline_visible(&mut self, id: LineId, visible: bool);

    /// Detach a polyline and release it. Unknown ids are ignored.
    fn remove_polyline(&mut self, id: LineId);

    /// Attach a marker with its bindings.
    ///
    /// # Errors
    ///
    /// Returns [`SurfaceError::Attach`] if the surface refuses the marker.
    fn add_marker(&mut self, spec: &MarkerSpec) -> Result<MarkerId, SurfaceError>;

    /// Replace position, title and styling of an attached marker in place.
    ///
    /// # Errors
    ///
    /// Returns [`SurfaceError::Unknown`] if the marker is not attached.
    fn update_marker(&mut self, id: MarkerId, spec: &MarkerSpec) -> Result<(), SurfaceError>;

    /// Detach a marker and release its bindings. Unknown ids are ignored.
    fn remove_marker(&mut self, id: MarkerId);

    /// Open the shared content overlay anchored at a marker.
    fn show_info(&mut self, anchor: MarkerId, view: &InspectView);

    /// Close the shared content overlay.
    fn close_info(&mut self);
}

/// Operation counters kept by [`HeadlessSurface`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct SurfaceStats {
    /// Polylines attached.
    pub lines_added: u64,
    /// Polylines detached.
    pub lines_removed: u64,
    /// Markers attached.
    pub markers_added: u64,
    /// Markers updated in place.
    pub markers_updated: u64,
    /// Markers detached.
    pub markers_removed: u64,
}

/// An attached polyline on the headless surface.
#[derive(Debug, Clone, PartialEq)]
pub struct HeadlessLine {
    /// Geometry and style it was attached with.
    pub spec: PolylineSpec,
    /// Current visibility.
    pub visible: bool,
}

/// In-memory [`RenderSurface`].
#[derive(Debug, Clone, Default)]
pub struct HeadlessSurface {
    bounds: Option<GeoBounds>,
    next_id: u64,
    lines: BTreeMap<LineId, HeadlessLine>,
    markers: BTreeMap<MarkerId, MarkerSpec>,
    info: Option<(MarkerId, InspectView)>,
    stats: SurfaceStats,
    refuse_attach: bool,
}

impl HeadlessSurface {
    /// Create a surface with no viewport.
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a surface reporting the given viewport.
    pub fn with_bounds(bounds: GeoBounds) -> Self {
        Self {
            bounds: Some(bounds),
            ..Self::default()
        }
    }

    /// Change the reported viewport, as a pan or zoom would.
    pub const fn set_bounds(&mut self, bounds: Option<GeoBounds>) {
        self.bounds = bounds;
    }

    /// Make every subsequent attach fail until switched back.
    pub const fn refuse_attachments(&mut self, refuse: bool) {
        self.refuse_attach = refuse;
    }

    /// Number of polylines currently attached.
    pub fn live_lines(&self) -> usize {
        self.lines.len()
    }

    /// Number of markers currently attached.
    pub fn live_markers(&self) -> usize {
        self.markers.len()
    }

    /// Look up an attached polyline.
    pub fn line(&self, id: LineId) -> Option<&HeadlessLine> {
        self.lines.get(&id)
    }

    /// Iterate over attached polylines in attach order.
    pub fn lines(&self) -> impl Iterator<Item = (&LineId, &HeadlessLine)> {
        self.lines.iter()
    }

    /// Look up an attached marker.
    pub fn marker(&self, id: MarkerId) -> Option<&MarkerSpec> {
        self.markers.get(&id)
    }

    /// Iterate over attached markers in attach order.
    pub fn markers(&self) -> impl Iterator<Item = (&MarkerId, &MarkerSpec)> {
        self.markers.iter()
    }

    /// The open content overlay and its anchor, if any.
    pub const fn info(&self) -> Option<&(MarkerId, InspectView)> {
        self.info.as_ref()
    }

    /// Operation counters since creation.
    pub const fn stats(&self) -> SurfaceStats {
        self.stats
    }

    fn allocate(&mut self, primitive: &'static str) -> Result<u64, SurfaceError> {
        if self.refuse_attach {
            return Err(SurfaceError::Attach {
                primitive,
                reason: "surface refused attachment".to_owned(),
            });
        }
        self.next_id = self.next_id.saturating_add(1);
        Ok(self.next_id)
    }
}

impl RenderSurface for HeadlessSurface {
    fn bounds(&self) -> Option<GeoBounds> {
        self.bounds
    }

    fn add_polyline(&mut self, spec: &PolylineSpec) -> Result<LineId, SurfaceError> {
        let id = LineId(self.allocate("polyline")?);
        self.lines.insert(
            id,
            HeadlessLine {
                spec: spec.clone(),
                visible: spec.visible,
            },
        );
        self.stats.lines_added = self.stats.lines_added.saturating_add(1);
        Ok(id)
    }

    fn set_polyline_visible(&mut self, id: LineId, visible: bool) {
        if let Some(line) = self.lines.get_mut(&id) {
            line.visible = visible;
        }
    }

    fn remove_polyline(&mut self, id: LineId) {
        if self.lines.remove(&id).is_some() {
            self.stats.lines_removed = self.stats.lines_removed.saturating_add(1);
        }
    }

    fn add_marker(&mut self, spec: &MarkerSpec) -> Result<MarkerId, SurfaceError> {
        let id = MarkerId(self.allocate("marker")?);
        self.markers.insert(id, spec.clone());
        self.stats.markers_added = self.stats.markers_added.saturating_add(1);
        Ok(id)
    }

    fn update_marker(&mut self, id: MarkerId, spec: &MarkerSpec) -> Result<(), SurfaceError> {
        let Some(existing) = self.markers.get_mut(&id) else {
            return Err(SurfaceError::Unknown {
                primitive: "marker",
                id: id.0,
            });
        };
        existing.clone_from(spec);
        self.stats.markers_updated = self.stats.markers_updated.saturating_add(1);
        Ok(())
    }

    fn remove_marker(&mut self, id: MarkerId) {
        if self.markers.remove(&id).is_some() {
            self.stats.markers_removed = self.stats.markers_removed.saturating_add(1);
            if self.info.as_ref().is_some_and(|(anchor, _)| *anchor == id) {
                self.info = None;
            }
        }
    }

    fn show_info(&mut self, anchor: MarkerId, view: &InspectView) {
        self.info = Some((anchor, view.clone()));
    }

    fn close_info(&mut self) {
        self.info = None;
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    fn marker_spec() -> MarkerSpec {
        MarkerSpec {
            position: GeoPoint::new(1.0, 2.0),
            title: "PAC test".to_owned(),
            fill_color: "#6b7280".to_owned(),
            style: MarkerStyle::default(),
            draggable: true,
            clickable: true,
        }
    }

    #[test]
    fn markers_are_counted_and_released() {
        let mut surface = HeadlessSurface::new();
        let a = surface.add_marker(&marker_spec()).unwrap();
        let b = surface.add_marker(&marker_spec()).unwrap();
        assert_ne!(a, b);
        assert_eq!(surface.live_markers(), 2);

        surface.remove_marker(a);
        surface.remove_marker(a);
        assert_eq!(surface.live_markers(), 1);
        assert_eq!(surface.stats().markers_removed, 1);
    }

    #[test]
    fn refused_attachment_allocates_nothing() {
        let mut surface = HeadlessSurface::new();
        surface.refuse_attachments(true);
        assert!(surface.add_marker(&marker_spec()).is_err());
        assert_eq!(surface.live_markers(), 0);
        assert_eq!(surface.stats().markers_added, 0);
    }

    #[test]
    fn updating_unknown_marker_fails() {
        let mut surface = HeadlessSurface::new();
        let err = surface.update_marker(MarkerId(99), &marker_spec()).unwrap_err();
        assert_eq!(
            err,
            SurfaceError::Unknown {
                primitive: "marker",
                id: 99
            }
        );
    }

    #[test]
    fn removing_anchor_closes_info() {
        let mut surface = HeadlessSurface::new();
        let id = surface.add_marker(&marker_spec()).unwrap();
        let pac = gridworld_types::Pac {
            pac_id: "p".into(),
            lat: 0.0,
            lng: 0.0,
            x: 0.0,
            y: 0.0,
            z: 0.0,
            region_id: String::new(),
            tick_id: 0,
            heading: 0.0,
            velocity: 0.0,
        };
        surface.show_info(id, &InspectView::for_pac(&pac, "PAC p"));
        assert!(surface.info().is_some());
        surface.remove_marker(id);
        assert!(surface.info().is_none());
    }
}
