//! Interaction bridge between the transport, the surface, and the overlay.
//!
//! The bridge is the single entry point for everything that happens to the
//! overlay. It owns the rendering surface, the lattice generator, the
//! entity reconciler, and the intent sink, and it gates every event on the
//! surface lifecycle:
//!
//! ```text
//! Loading --surface_ready--> Ready --detach--> Detached
//!    |                                           ^
//!    +--surface_failed--> Failed ----detach------+
//! ```
//!
//! Snapshots that arrive while the surface is still loading are held, the
//! latest one replacing any earlier one, and applied once the surface is
//! ready. After a failure or detach every event is a no-op.
//!
//! Every handler takes `&mut self`, so handlers never interleave.

use std::collections::BTreeMap;

use gridworld_types::{GeoPoint, InboundEvent, Intent, OverlayToggle, PacId, SnapshotPayload};
use tracing::{debug, error, info, warn};

use crate::config::OverlayConfig;
use crate::inspect::InspectView;
use crate::lattice::LatticeGenerator;
use crate::reconcile::{EntityReconciler, ReconcileReport};
use crate::sink::IntentSink;
use crate::surface::{MarkerId, RenderSurface};

/// Lifecycle of the underlying rendering surface.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SurfaceState {
    /// The surface is initializing. Snapshots are held.
    Loading,
    /// The surface is drawable.
    Ready,
    /// The surface failed to initialize. Nothing is ever drawn.
    Failed,
    /// The overlay was torn down.
    Detached,
}

/// Routes inbound events to the lattice and reconciler and raises intents.
#[derive(Debug)]
pub struct InteractionBridge<S, K> {
    surface: S,
    sink: K,
    lattice: LatticeGenerator,
    reconciler: EntityReconciler,
    state: SurfaceState,
    pending: Option<SnapshotPayload>,
    toggles: BTreeMap<OverlayToggle, bool>,
    inspecting: Option<PacId>,
}

impl<S: RenderSurface, K: IntentSink> InteractionBridge<S, K> {
    /// Create a bridge in the [`SurfaceState::Loading`] state.
    ///
    /// Styling and the reconcile mode are taken from `config` and stay
    /// fixed for the bridge's lifetime. Every toggle starts enabled.
    pub fn new(surface: S, sink: K, config: &OverlayConfig) -> Self {
        Self {
            surface,
            sink,
            lattice: LatticeGenerator::new(config.lattice.clone()),
            reconciler: EntityReconciler::new(config.reconcile.mode, config.markers.clone()),
            state: SurfaceState::Loading,
            pending: None,
            toggles: OverlayToggle::ALL.iter().map(|t| (*t, true)).collect(),
            inspecting: None,
        }
    }

    // -----------------------------------------------------------------------
    // Surface lifecycle
    // -----------------------------------------------------------------------

    /// The surface finished initializing.
    ///
    /// Builds the first lattice with the recorded grid visibility, then
    /// applies the held snapshot if one arrived while loading.
    pub fn surface_ready(&mut self) {
        if self.state != SurfaceState::Loading {
            debug!(state = ?self.state, "Ignoring surface_ready");
            return;
        }
        self.state = SurfaceState::Ready;
        info!("Surface ready");

        let grid = self.toggle_state(OverlayToggle::Grid);
        self.lattice.set_visible(&mut self.surface, grid);
        self.lattice.regenerate(&mut self.surface);

        if let Some(payload) = self.pending.take() {
            debug!(entities = payload.len(), "Applying held snapshot");
            self.apply_snapshot(&payload);
        }
    }

    /// The surface failed to initialize. The overlay stays inert.
    pub fn surface_failed(&mut self, reason: &str) {
        if self.state != SurfaceState::Loading {
            warn!(state = ?self.state, "Ignoring surface failure after initialization: {reason}");
            return;
        }
        error!("Map surface failed to initialize: {reason}");
        self.state = SurfaceState::Failed;
        self.pending = None;
    }

    /// Release every marker and lattice line and stop handling events.
    pub fn detach(&mut self) {
        if self.state == SurfaceState::Detached {
            return;
        }
        let markers = self.reconciler.clear(&mut self.surface);
        let lines = self.lattice.clear(&mut self.surface);
        self.surface.close_info();
        self.inspecting = None;
        self.pending = None;
        self.state = SurfaceState::Detached;
        info!(markers, lines, "Overlay detached");
    }

    // -----------------------------------------------------------------------
    // Transport events
    // -----------------------------------------------------------------------

    /// Route a wire event to its handler.
    pub fn dispatch(&mut self, event: InboundEvent) {
        match event {
            InboundEvent::UpdatePacs(payload) => {
                self.snapshot(payload);
            }
            InboundEvent::Toggle(toggle) => self.toggle(toggle.control, toggle.enabled),
        }
    }

    /// A new authoritative snapshot.
    ///
    /// Returns the reconciliation report when the snapshot was applied
    /// immediately, `None` when it was held or ignored.
    pub fn snapshot(&mut self, payload: SnapshotPayload) -> Option<ReconcileReport> {
        match self.state {
            SurfaceState::Loading => {
                debug!(entities = payload.len(), "Surface loading, holding snapshot");
                self.pending = Some(payload);
                None
            }
            SurfaceState::Ready => Some(self.apply_snapshot(&payload)),
            SurfaceState::Failed | SurfaceState::Detached => {
                debug!(state = ?self.state, "Dropping snapshot");
                None
            }
        }
    }

    fn apply_snapshot(&mut self, payload: &SnapshotPayload) -> ReconcileReport {
        let report = self
            .reconciler
            .reconcile(&mut self.surface, payload.entities());
        self.refresh_inspect();
        report
    }

    /// Redraw every PAC marker from the retained snapshot.
    ///
    /// Every handle is destroyed and rebuilt whatever the reconcile mode,
    /// so each PAC ends up on a new marker. Returns `None` unless the
    /// surface is ready.
    pub fn rerender(&mut self) -> Option<ReconcileReport> {
        if self.state != SurfaceState::Ready {
            debug!(state = ?self.state, "Ignoring re-render");
            return None;
        }
        let report = self.reconciler.rerender(&mut self.surface);
        self.refresh_inspect();
        Some(report)
    }

    /// Re-anchor the open inspect overlay on its PAC's current marker, or
    /// close it if the PAC is gone.
    fn refresh_inspect(&mut self) {
        if let Some(id) = self.inspecting.clone() {
            match self.reconciler.handle(&id) {
                Some(handle) => {
                    self.surface
                        .show_info(handle.marker(), &handle.inspect_view());
                }
                None => {
                    debug!(pac_id = %id, "Inspected PAC left the snapshot");
                    self.surface.close_info();
                    self.inspecting = None;
                }
            }
        }
    }

    /// A visibility control changed.
    pub fn toggle(&mut self, control: OverlayToggle, enabled: bool) {
        if matches!(self.state, SurfaceState::Failed | SurfaceState::Detached) {
            debug!(?control, "Dropping toggle");
            return;
        }
        self.toggles.insert(control, enabled);
        if control.is_wired() {
            self.lattice.set_visible(&mut self.surface, enabled);
            debug!(enabled, "Grid visibility changed");
        } else {
            debug!(?control, enabled, "Toggle recorded, no rendering attached");
        }
    }

    // -----------------------------------------------------------------------
    // Surface input
    // -----------------------------------------------------------------------

    /// The viewport settled after a pan or zoom.
    pub fn viewport_changed(&mut self) {
        if self.state == SurfaceState::Ready {
            self.lattice.regenerate(&mut self.surface);
        }
    }

    /// A click on the map background. Raises a place intent.
    pub fn background_click(&mut self, point: GeoPoint) {
        if self.state != SurfaceState::Ready {
            return;
        }
        if !point.is_finite() {
            warn!(lat = point.lat, lng = point.lng, "Ignoring click at non-finite position");
            return;
        }
        self.sink.emit(Intent::place(point));
    }

    /// A click on a PAC marker. Opens the inspect overlay on it.
    pub fn marker_click(&mut self, marker: MarkerId) -> Option<InspectView> {
        if self.state != SurfaceState::Ready {
            return None;
        }
        let Some(view) = self.reconciler.inspect(marker) else {
            debug!(%marker, "Click on unknown marker");
            return None;
        };
        self.surface.show_info(marker, &view);
        self.inspecting = Some(view.pac_id.clone());
        Some(view)
    }

    /// A PAC marker was dropped after a drag. Raises one move intent.
    ///
    /// Returns whether an intent was emitted.
    pub fn marker_drag_end(&mut self, marker: MarkerId, dropped_at: GeoPoint) -> bool {
        if self.state != SurfaceState::Ready {
            return false;
        }
        match self.reconciler.drag_end(marker, dropped_at) {
            Some(intent) => {
                self.sink.emit(intent);
                true
            }
            None => false,
        }
    }

    /// The removal affordance of the inspect overlay was activated.
    ///
    /// Raises a remove intent for a live PAC and closes the overlay. The
    /// PAC's marker stays until a snapshot without it arrives.
    pub fn remove_requested(&mut self, id: &PacId) -> bool {
        if self.state != SurfaceState::Ready {
            return false;
        }
        if self.reconciler.handle(id).is_none() {
            warn!(pac_id = %id, "Remove requested for unknown PAC");
            return false;
        }
        self.sink.emit(Intent::remove(id.clone()));
        self.surface.close_info();
        self.inspecting = None;
        true
    }

    // -----------------------------------------------------------------------
    // Accessors
    // -----------------------------------------------------------------------

    /// Current lifecycle state.
    pub const fn state(&self) -> SurfaceState {
        self.state
    }

    /// Recorded state of a visibility control.
    pub fn toggle_state(&self, control: OverlayToggle) -> bool {
        self.toggles.get(&control).copied().unwrap_or(true)
    }

    /// Snapshot held while the surface is loading.
    pub const fn pending(&self) -> Option<&SnapshotPayload> {
        self.pending.as_ref()
    }

    /// PAC whose inspect overlay is open.
    pub const fn inspecting(&self) -> Option<&PacId> {
        self.inspecting.as_ref()
    }

    /// The rendering surface.
    pub const fn surface(&self) -> &S {
        &self.surface
    }

    /// Mutable access to the rendering surface, for hosts that drive
    /// viewport changes.
    pub const fn surface_mut(&mut self) -> &mut S {
        &mut self.surface
    }

    /// The intent sink.
    pub const fn sink(&self) -> &K {
        &self.sink
    }

    /// Mutable access to the intent sink.
    pub const fn sink_mut(&mut self) -> &mut K {
        &mut self.sink
    }

    /// The lattice generator.
    pub const fn lattice(&self) -> &LatticeGenerator {
        &self.lattice
    }

    /// The entity reconciler.
    pub const fn reconciler(&self) -> &EntityReconciler {
        &self.reconciler
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use gridworld_types::GeoBounds;
    use serde_json::{Value, json};

    use super::*;
    use crate::sink::VecSink;
    use crate::surface::HeadlessSurface;

    fn pac(id: &str) -> Value {
        json!({
            "pac_id": id, "lat": 1.0, "lng": 2.0,
            "x": 0.0, "y": 0.0, "z": 0.0,
            "region_id": "sector_gamma", "tick_id": 3,
            "heading": 90.0, "velocity": 1.0
        })
    }

    fn bridge() -> InteractionBridge<HeadlessSurface, VecSink> {
        let bounds = GeoBounds::new(GeoPoint::new(10.0, 10.0), GeoPoint::new(0.0, 0.0));
        InteractionBridge::new(
            HeadlessSurface::with_bounds(bounds),
            VecSink::new(),
            &OverlayConfig::default(),
        )
    }

    #[test]
    fn latest_held_snapshot_wins() {
        let mut b = bridge();
        assert!(b.snapshot(SnapshotPayload::new(vec![pac("a")])).is_none());
        b.snapshot(SnapshotPayload::new(vec![pac("b"), pac("c")]));
        assert_eq!(b.surface().live_markers(), 0);

        b.surface_ready();
        let ids: Vec<&str> = b.reconciler().ids().map(PacId::as_str).collect();
        assert_eq!(ids, vec!["b", "c"]);
        assert!(b.pending().is_none());
        assert_eq!(b.surface().live_lines(), 42);
    }

    #[test]
    fn failed_surface_ignores_everything() {
        let mut b = bridge();
        b.snapshot(SnapshotPayload::new(vec![pac("a")]));
        b.surface_failed("no tiles");
        b.surface_ready();
        b.snapshot(SnapshotPayload::new(vec![pac("a")]));
        b.background_click(GeoPoint::new(1.0, 1.0));
        assert_eq!(b.state(), SurfaceState::Failed);
        assert_eq!(b.surface().live_markers(), 0);
        assert_eq!(b.surface().live_lines(), 0);
        assert!(b.sink().intents().is_empty());
    }

    #[test]
    fn grid_toggle_before_ready_applies_on_ready() {
        let mut b = bridge();
        b.toggle(OverlayToggle::Grid, false);
        b.surface_ready();
        assert_eq!(b.surface().live_lines(), 42);
        assert!(b.surface().lines().all(|(_, line)| !line.visible));
    }

    #[test]
    fn inert_toggles_are_recorded_only() {
        let mut b = bridge();
        b.surface_ready();
        let before = b.surface().stats();
        b.toggle(OverlayToggle::Trails, false);
        assert!(!b.toggle_state(OverlayToggle::Trails));
        assert_eq!(b.surface().stats(), before);
    }

    #[test]
    fn inspect_view_follows_snapshots() {
        let mut b = bridge();
        b.surface_ready();
        b.snapshot(SnapshotPayload::new(vec![pac("a")]));
        let marker = b.reconciler().handle(&"a".into()).unwrap().marker();
        let view = b.marker_click(marker).unwrap();
        assert_eq!(view.tick_id, 3);

        let mut newer = pac("a");
        newer["tick_id"] = json!(4);
        b.snapshot(SnapshotPayload::new(vec![newer]));
        let (anchor, shown) = b.surface().info().unwrap();
        assert_eq!(*anchor, b.reconciler().handle(&"a".into()).unwrap().marker());
        assert_eq!(shown.tick_id, 4);

        b.snapshot(SnapshotPayload::default());
        assert!(b.surface().info().is_none());
        assert!(b.inspecting().is_none());
    }

    #[test]
    fn remove_only_for_live_pacs() {
        let mut b = bridge();
        b.surface_ready();
        b.snapshot(SnapshotPayload::new(vec![pac("a")]));
        assert!(!b.remove_requested(&"ghost".into()));
        assert!(b.remove_requested(&"a".into()));
        assert_eq!(b.sink().intents(), &[Intent::remove("a".into())]);
        assert_eq!(b.surface().live_markers(), 1);
    }

    #[test]
    fn rerender_moves_every_pac_to_a_new_marker() {
        let mut b = bridge();
        assert!(b.rerender().is_none());
        b.surface_ready();
        b.snapshot(SnapshotPayload::new(vec![pac("a"), pac("b")]));
        let old_a = b.reconciler().handle(&"a".into()).unwrap().marker();
        b.marker_click(old_a).unwrap();
        let before = b.surface().stats();

        let report = b.rerender().unwrap();

        let after = b.surface().stats();
        assert_eq!(report.created, 2);
        assert_eq!(
            after.markers_added.saturating_sub(before.markers_added),
            after.markers_removed.saturating_sub(before.markers_removed)
        );
        let ids: Vec<&str> = b.reconciler().ids().map(PacId::as_str).collect();
        assert_eq!(ids, vec!["a", "b"]);
        let new_a = b.reconciler().handle(&"a".into()).unwrap().marker();
        assert_ne!(new_a, old_a);
        assert_eq!(b.surface().info().unwrap().0, new_a);
        assert!(b.sink().intents().is_empty());
    }

    #[test]
    fn detach_releases_everything() {
        let mut b = bridge();
        b.surface_ready();
        b.snapshot(SnapshotPayload::new(vec![pac("a"), pac("b")]));
        b.detach();
        assert_eq!(b.state(), SurfaceState::Detached);
        assert_eq!(b.surface().live_markers(), 0);
        assert_eq!(b.surface().live_lines(), 0);
        b.snapshot(SnapshotPayload::new(vec![pac("a")]));
        assert_eq!(b.surface().live_markers(), 0);
    }
}
