//! Entity reconciler: snapshot in, marker handles out.
//!
//! The reconciler is the only owner of PAC markers. Each call to
//! [`EntityReconciler::reconcile`] takes a complete snapshot and leaves
//! exactly one handle per valid PAC id in it, releasing every marker that
//! is superseded on the way.
//!
//! # Modes
//!
//! - [`ReconcileMode::FullReplace`] (default) destroys every handle and
//!   recreates one per entity. Applying the same snapshot twice costs the
//!   same number of creates and destroys both times. This is a known cost
//!   traded for simplicity; entity counts are small and snapshot frequency
//!   is bounded by the controller.
//! - [`ReconcileMode::Incremental`] keeps handles for ids present in both
//!   snapshots and updates them in place only when the entity changed.
//!
//! # Validation
//!
//! Snapshot elements arrive as raw JSON and are validated one by one. A
//! malformed element, or a repeat of an id already seen in the same
//! snapshot, is logged and skipped; the rest of the snapshot still applies.

use std::collections::{BTreeMap, BTreeSet};

use gridworld_types::{GeoPoint, Intent, InvalidPac, Pac, PacId};
use tracing::{debug, warn};

use crate::config::{MarkerStyle, ReconcileMode};
use crate::inspect::{InspectView, pac_label};
use crate::palette::region_color;
use crate::surface::{MarkerId, MarkerSpec, RenderSurface};

/// The on-surface representation of one PAC.
#[derive(Debug, Clone, PartialEq)]
pub struct VisualHandle {
    marker: MarkerId,
    pac: Pac,
    label: String,
    color: &'static str,
}

impl VisualHandle {
    /// Surface id of the marker.
    pub const fn marker(&self) -> MarkerId {
        self.marker
    }

    /// The PAC as of the snapshot that last touched this handle.
    pub const fn pac(&self) -> &Pac {
        &self.pac
    }

    /// Marker label.
    pub fn label(&self) -> &str {
        &self.label
    }

    /// Fill color derived from the PAC's region.
    pub const fn color(&self) -> &'static str {
        self.color
    }

    /// Inspect content for this handle.
    pub fn inspect_view(&self) -> InspectView {
        InspectView::for_pac(&self.pac, self.label.clone())
    }
}

/// Counts of what one reconciliation did.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct ReconcileReport {
    /// Markers attached.
    pub created: usize,
    /// Markers updated in place.
    pub updated: usize,
    /// Markers kept without any surface call.
    pub unchanged: usize,
    /// Markers detached.
    pub destroyed: usize,
    /// Snapshot elements skipped as malformed or duplicate.
    pub rejected: usize,
    /// Valid PACs the surface refused to draw.
    pub failed: usize,
}

/// Owner of the `PacId -> VisualHandle` mapping.
#[derive(Debug, Clone)]
pub struct EntityReconciler {
    mode: ReconcileMode,
    style: MarkerStyle,
    handles: BTreeMap<PacId, VisualHandle>,
    by_marker: BTreeMap<MarkerId, PacId>,
    highest_tick: Option<u64>,
}

impl EntityReconciler {
    /// Create an empty reconciler.
    pub const fn new(mode: ReconcileMode, style: MarkerStyle) -> Self {
        Self {
            mode,
            style,
            handles: BTreeMap::new(),
            by_marker: BTreeMap::new(),
            highest_tick: None,
        }
    }

    /// The strategy this reconciler applies.
    pub const fn mode(&self) -> ReconcileMode {
        self.mode
    }

    /// Apply a snapshot of raw entity objects.
    pub fn reconcile<S: RenderSurface + ?Sized>(
        &mut self,
        surface: &mut S,
        entities: &[serde_json::Value],
    ) -> ReconcileReport {
        let (pacs, rejected) = validate_snapshot(entities);
        let mut report = self.apply(surface, pacs);
        report.rejected = rejected;
        debug!(
            created = report.created,
            updated = report.updated,
            unchanged = report.unchanged,
            destroyed = report.destroyed,
            rejected = report.rejected,
            failed = report.failed,
            live = self.handles.len(),
            "Snapshot reconciled"
        );
        report
    }

    /// Apply a snapshot of already-validated PACs.
    ///
    /// Ids must be unique; a repeated id replaces the handle built for the
    /// earlier occurrence.
    pub fn apply<S: RenderSurface + ?Sized>(
        &mut self,
        surface: &mut S,
        pacs: Vec<Pac>,
    ) -> ReconcileReport {
        self.note_ticks(&pacs);
        match self.mode {
            ReconcileMode::FullReplace => self.apply_full_replace(surface, pacs),
            ReconcileMode::Incremental => self.apply_incremental(surface, pacs),
        }
    }

    fn apply_full_replace<S: RenderSurface + ?Sized>(
        &mut self,
        surface: &mut S,
        pacs: Vec<Pac>,
    ) -> ReconcileReport {
        let mut report = ReconcileReport {
            destroyed: self.clear(surface),
            ..ReconcileReport::default()
        };
        for pac in pacs {
            if self.create(surface, pac) {
                report.created = report.created.saturating_add(1);
            } else {
                report.failed = report.failed.saturating_add(1);
            }
        }
        report
    }

    fn apply_incremental<S: RenderSurface + ?Sized>(
        &mut self,
        surface: &mut S,
        pacs: Vec<Pac>,
    ) -> ReconcileReport {
        let mut report = ReconcileReport::default();

        let incoming: BTreeSet<&PacId> = pacs.iter().map(|p| &p.pac_id).collect();
        let departed: Vec<PacId> = self
            .handles
            .keys()
            .filter(|id| !incoming.contains(id))
            .cloned()
            .collect();
        for id in departed {
            if self.destroy(surface, &id) {
                report.destroyed = report.destroyed.saturating_add(1);
            }
        }

        for pac in pacs {
            let Some(handle) = self.handles.get(&pac.pac_id) else {
                if self.create(surface, pac) {
                    report.created = report.created.saturating_add(1);
                } else {
                    report.failed = report.failed.saturating_add(1);
                }
                continue;
            };
            if handle.pac == pac {
                report.unchanged = report.unchanged.saturating_add(1);
                continue;
            }

            let marker = handle.marker;
            let (spec, label, color) = self.marker_spec(&pac);
            match surface.update_marker(marker, &spec) {
                Ok(()) => {
                    self.handles.insert(
                        pac.pac_id.clone(),
                        VisualHandle {
                            marker,
                            pac,
                            label,
                            color,
                        },
                    );
                    report.updated = report.updated.saturating_add(1);
                }
                Err(e) => {
                    warn!(pac_id = %pac.pac_id, "Marker update failed, recreating: {e}");
                    if self.destroy(surface, &pac.pac_id) {
                        report.destroyed = report.destroyed.saturating_add(1);
                    }
                    if self.create(surface, pac) {
                        report.created = report.created.saturating_add(1);
                    } else {
                        report.failed = report.failed.saturating_add(1);
                    }
                }
            }
        }
        report
    }

    /// Attach a marker for a PAC and record its handle.
    fn create<S: RenderSurface + ?Sized>(&mut self, surface: &mut S, pac: Pac) -> bool {
        let (spec, label, color) = self.marker_spec(&pac);
        match surface.add_marker(&spec) {
            Ok(marker) => {
                let id = pac.pac_id.clone();
                if let Some(previous) = self.handles.insert(
                    id.clone(),
                    VisualHandle {
                        marker,
                        pac,
                        label,
                        color,
                    },
                ) {
                    // Never leave a superseded marker attached.
                    surface.remove_marker(previous.marker);
                    self.by_marker.remove(&previous.marker);
                }
                self.by_marker.insert(marker, id);
                true
            }
            Err(e) => {
                warn!(pac_id = %pac.pac_id, "PAC marker not attached: {e}");
                false
            }
        }
    }

    /// Detach one PAC's marker and forget its handle.
    fn destroy<S: RenderSurface + ?Sized>(&mut self, surface: &mut S, id: &PacId) -> bool {
        let Some(handle) = self.handles.remove(id) else {
            return false;
        };
        self.by_marker.remove(&handle.marker);
        surface.remove_marker(handle.marker);
        true
    }

    fn marker_spec(&self, pac: &Pac) -> (MarkerSpec, String, &'static str) {
        let label = pac_label(&pac.pac_id, self.style.label_prefix_len);
        let color = region_color(&pac.region_id);
        let spec = MarkerSpec {
            position: pac.position(),
            title: label.clone(),
            fill_color: color.to_owned(),
            style: self.style.clone(),
            draggable: true,
            clickable: true,
        };
        (spec, label, color)
    }

    fn note_ticks(&mut self, pacs: &[Pac]) {
        for pac in pacs {
            match self.highest_tick {
                Some(highest) if pac.tick_id < highest => {
                    debug!(
                        pac_id = %pac.pac_id,
                        tick_id = pac.tick_id,
                        highest,
                        "PAC tick went backwards"
                    );
                }
                Some(highest) if pac.tick_id == highest => {}
                _ => self.highest_tick = Some(pac.tick_id),
            }
        }
    }

    /// Detach every marker and empty the mapping. Returns how many were
    /// released.
    pub fn clear<S: RenderSurface + ?Sized>(&mut self, surface: &mut S) -> usize {
        let handles = std::mem::take(&mut self.handles);
        self.by_marker.clear();
        let released = handles.len();
        for handle in handles.into_values() {
            surface.remove_marker(handle.marker);
        }
        released
    }

    /// Destroy every handle and rebuild it from the PAC it last held.
    ///
    /// Applies regardless of mode. Keys are preserved; every marker id
    /// changes. PACs the surface refuses to redraw are dropped and counted
    /// as failed.
    pub fn rerender<S: RenderSurface + ?Sized>(&mut self, surface: &mut S) -> ReconcileReport {
        let retained: Vec<Pac> = self.handles.values().map(|h| h.pac.clone()).collect();
        let report = self.apply_full_replace(surface, retained);
        debug!(
            created = report.created,
            failed = report.failed,
            "Markers re-rendered"
        );
        report
    }

    /// Resolve a finished drag into a move intent.
    ///
    /// The stored PAC keeps its old position: only the next snapshot moves
    /// it. Returns `None` for a marker this reconciler does not own.
    pub fn drag_end(&self, marker: MarkerId, dropped_at: GeoPoint) -> Option<Intent> {
        let Some(id) = self.by_marker.get(&marker) else {
            debug!(%marker, "Drag ended on unknown marker");
            return None;
        };
        Some(Intent::relocate(id.clone(), dropped_at))
    }

    /// Inspect content for a clicked marker.
    pub fn inspect(&self, marker: MarkerId) -> Option<InspectView> {
        self.by_marker
            .get(&marker)
            .and_then(|id| self.handles.get(id))
            .map(VisualHandle::inspect_view)
    }

    /// Look up the handle for a PAC id.
    pub fn handle(&self, id: &PacId) -> Option<&VisualHandle> {
        self.handles.get(id)
    }

    /// Resolve a marker to the PAC it draws.
    pub fn pac_for_marker(&self, marker: MarkerId) -> Option<&Pac> {
        self.by_marker
            .get(&marker)
            .and_then(|id| self.handles.get(id))
            .map(VisualHandle::pac)
    }

    /// Ids with a live handle, in order.
    pub fn ids(&self) -> impl Iterator<Item = &PacId> {
        self.handles.keys()
    }

    /// Iterate over live handles.
    pub fn handles(&self) -> impl Iterator<Item = (&PacId, &VisualHandle)> {
        self.handles.iter()
    }

    /// Number of live handles.
    pub fn len(&self) -> usize {
        self.handles.len()
    }

    /// Whether no handles are live.
    pub fn is_empty(&self) -> bool {
        self.handles.is_empty()
    }

    /// Highest tick seen across all snapshots so far.
    pub const fn highest_tick(&self) -> Option<u64> {
        self.highest_tick
    }
}

/// Decode every snapshot element, keeping the first occurrence of each id.
///
/// Returns the valid PACs in snapshot order and the number of elements
/// skipped.
pub fn validate_snapshot(entities: &[serde_json::Value]) -> (Vec<Pac>, usize) {
    let mut seen: BTreeSet<PacId> = BTreeSet::new();
    let mut pacs = Vec::with_capacity(entities.len());
    let mut rejected: usize = 0;

    for (index, raw) in entities.iter().enumerate() {
        let result = Pac::from_json(raw).and_then(|pac| {
            if seen.insert(pac.pac_id.clone()) {
                Ok(pac)
            } else {
                Err(InvalidPac::Duplicate(pac.pac_id))
            }
        });
        match result {
            Ok(pac) => pacs.push(pac),
            Err(e) => {
                warn!(index, "Skipping snapshot entity: {e}");
                rejected = rejected.saturating_add(1);
            }
        }
    }
    (pacs, rejected)
}
