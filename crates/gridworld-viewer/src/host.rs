//! Drives an [`InteractionBridge`] over a [`HeadlessSurface`] from
//! [`ViewerEvent`]s.
//!
//! The host plays the part of the browser glue: it owns the mount
//! parameters, resolves PAC ids in pointer events to the marker ids the
//! surface would report, and logs what a user would see.

use std::ops::ControlFlow;

use gridworld_overlay::config::OverlayConfig;
use gridworld_overlay::{HeadlessSurface, InteractionBridge, IntentSink, MarkerId};
use gridworld_types::{GeoPoint, MountParams, PacId};
use tracing::{debug, info};

use crate::events::ViewerEvent;
use crate::viewport::initial_bounds;

/// Headless host for one overlay instance.
#[derive(Debug)]
pub struct Host<K> {
    mount: MountParams,
    bridge: InteractionBridge<HeadlessSurface, K>,
}

impl<K: IntentSink> Host<K> {
    /// Mount an overlay on a fresh headless surface.
    pub fn new(config: &OverlayConfig, sink: K) -> Self {
        let mount = MountParams {
            region: config.map.region.clone(),
            center: config.map.center,
            zoom: config.map.zoom,
        };
        let surface = HeadlessSurface::with_bounds(initial_bounds(&config.map));
        Self {
            mount,
            bridge: InteractionBridge::new(surface, sink, config),
        }
    }

    /// Apply one event. Breaks once the overlay is detached.
    pub fn handle(&mut self, event: ViewerEvent) -> ControlFlow<()> {
        match event {
            ViewerEvent::SurfaceReady => self.bridge.surface_ready(),
            ViewerEvent::SurfaceFailed { reason } => self.bridge.surface_failed(&reason),
            ViewerEvent::Viewport(bounds) => {
                self.bridge.surface_mut().set_bounds(Some(bounds));
                self.bridge.viewport_changed();
            }
            ViewerEvent::MapClick(point) => self.bridge.background_click(point),
            ViewerEvent::MarkerClick { entity_id } => {
                let view = self
                    .marker_of(&entity_id)
                    .and_then(|marker| self.bridge.marker_click(marker));
                if let Some(view) = view {
                    info!(pac_id = %entity_id, "{}", view.lines().join(" | "));
                }
            }
            ViewerEvent::MarkerDragEnd { entity_id, lat, lng } => {
                if let Some(marker) = self.marker_of(&entity_id) {
                    self.bridge.marker_drag_end(marker, GeoPoint::new(lat, lng));
                }
            }
            ViewerEvent::RemoveClick { entity_id } => {
                self.bridge.remove_requested(&entity_id);
            }
            ViewerEvent::Rerender => {
                if let Some(report) = self.bridge.rerender() {
                    debug!(created = report.created, failed = report.failed, "PACs redrawn");
                }
            }
            ViewerEvent::Detach => {
                self.bridge.detach();
                return ControlFlow::Break(());
            }
            ViewerEvent::UpdatePacs(payload) => {
                if let Some(report) = self.bridge.snapshot(payload) {
                    info!(
                        live = self.bridge.reconciler().len(),
                        created = report.created,
                        destroyed = report.destroyed,
                        rejected = report.rejected,
                        "PACs updated"
                    );
                }
            }
            ViewerEvent::Toggle(toggle) => self.bridge.toggle(toggle.control, toggle.enabled),
        }
        ControlFlow::Continue(())
    }

    fn marker_of(&self, id: &PacId) -> Option<MarkerId> {
        let marker = self.bridge.reconciler().handle(id).map(|h| h.marker());
        if marker.is_none() {
            debug!(pac_id = %id, "No marker for PAC");
        }
        marker
    }

    /// Mount parameters the overlay was created with.
    pub const fn mount(&self) -> &MountParams {
        &self.mount
    }

    /// The driven bridge.
    pub const fn bridge(&self) -> &InteractionBridge<HeadlessSurface, K> {
        &self.bridge
    }
}
