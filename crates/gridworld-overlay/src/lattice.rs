//! Reference lattice drawn over the current viewport.
//!
//! [`lattice_lines`] is the pure part: viewport in, line geometry out.
//! [`LatticeGenerator`] owns the polylines attached for the last
//! regeneration and replaces the whole set every time. There is no partial
//! update path.

use gridworld_types::{GeoBounds, GeoPoint, LineAxis, normalize_lng};
use tracing::{debug, warn};

use crate::config::LatticeStyle;
use crate::surface::{LineId, PolylineSpec, RenderSurface};

/// Number of steps per axis. Each axis gets `LATTICE_STEPS + 1` lines.
pub const LATTICE_STEPS: u32 = 20;

/// Geometry of one lattice line.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LatticeLine {
    /// Which coordinate is held constant.
    pub axis: LineAxis,
    /// The constant latitude or longitude.
    pub value: f64,
    /// Start of the segment.
    pub from: GeoPoint,
    /// End of the segment.
    pub to: GeoPoint,
}

/// Compute the lattice for a viewport.
///
/// Produces `LATTICE_STEPS + 1` latitude lines from `sw.lat` to `ne.lat`
/// followed by `LATTICE_STEPS + 1` longitude lines from `sw.lng` to
/// `ne.lng`. Positions are computed from the step index rather than by
/// accumulation, so the line count never drifts; the last line can miss the
/// boundary by floating-point rounding only. Invalid bounds yield no lines.
pub fn lattice_lines(bounds: &GeoBounds) -> Vec<LatticeLine> {
    if !bounds.is_valid() {
        return Vec::new();
    }
    let steps = f64::from(LATTICE_STEPS);
    let lat_step = bounds.lat_span() / steps;
    let lng_step = bounds.lng_span() / steps;

    let latitudes = (0..=LATTICE_STEPS).map(|i| {
        let lat = f64::from(i).mul_add(lat_step, bounds.sw.lat);
        LatticeLine {
            axis: LineAxis::Latitude,
            value: lat,
            from: GeoPoint::new(lat, bounds.sw.lng),
            to: GeoPoint::new(lat, bounds.ne.lng),
        }
    });
    let longitudes = (0..=LATTICE_STEPS).map(|i| {
        let lng = normalize_lng(f64::from(i).mul_add(lng_step, bounds.sw.lng));
        LatticeLine {
            axis: LineAxis::Longitude,
            value: lng,
            from: GeoPoint::new(bounds.sw.lat, lng),
            to: GeoPoint::new(bounds.ne.lat, lng),
        }
    });
    latitudes.chain(longitudes).collect()
}

/// One attached lattice line.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LatticeArtifact {
    /// Surface id of the polyline.
    pub id: LineId,
    /// Which coordinate is held constant.
    pub axis: LineAxis,
    /// The constant latitude or longitude.
    pub value: f64,
}

/// Owner of the attached lattice polylines.
#[derive(Debug, Clone)]
pub struct LatticeGenerator {
    style: LatticeStyle,
    artifacts: Vec<LatticeArtifact>,
    visible: bool,
}

impl LatticeGenerator {
    /// Create a generator with fixed styling and nothing attached.
    pub const fn new(style: LatticeStyle) -> Self {
        Self {
            style,
            artifacts: Vec::new(),
            visible: true,
        }
    }

    /// Rebuild the lattice from the surface's current viewport.
    ///
    /// If the surface reports no bounds, or degenerate bounds, nothing
    /// changes and `false` is returned. Otherwise every held line is
    /// detached before the new set is attached. Lines the surface refuses
    /// are logged and left out.
    pub fn regenerate<S: RenderSurface + ?Sized>(&mut self, surface: &mut S) -> bool {
        let Some(bounds) = surface.bounds() else {
            debug!("Viewport unavailable, lattice left unchanged");
            return false;
        };
        if !bounds.is_valid() {
            debug!(?bounds, "Degenerate viewport, lattice left unchanged");
            return false;
        }

        self.clear(surface);

        for line in lattice_lines(&bounds) {
            let spec = PolylineSpec {
                from: line.from,
                to: line.to,
                style: self.style.clone(),
                visible: self.visible,
            };
            match surface.add_polyline(&spec) {
                Ok(id) => self.artifacts.push(LatticeArtifact {
                    id,
                    axis: line.axis,
                    value: line.value,
                }),
                Err(e) => warn!(axis = ?line.axis, value = line.value, "Lattice line not attached: {e}"),
            }
        }

        debug!(
            lines = self.artifacts.len(),
            lat_span = bounds.lat_span(),
            lng_span = bounds.lng_span(),
            "Lattice regenerated"
        );
        true
    }

    /// Show or hide every attached line without regenerating.
    ///
    /// The flag also applies to lines attached by later regenerations.
    pub fn set_visible<S: RenderSurface + ?Sized>(&mut self, surface: &mut S, visible: bool) {
        self.visible = visible;
        for artifact in &self.artifacts {
            surface.set_polyline_visible(artifact.id, visible);
        }
    }

    /// Whether lattice lines are currently shown.
    pub const fn is_visible(&self) -> bool {
        self.visible
    }

    /// Detach and release every held line. Returns how many were released.
    pub fn clear<S: RenderSurface + ?Sized>(&mut self, surface: &mut S) -> usize {
        let released = self.artifacts.len();
        for artifact in self.artifacts.drain(..) {
            surface.remove_polyline(artifact.id);
        }
        released
    }

    /// The lines attached by the last regeneration.
    pub fn artifacts(&self) -> &[LatticeArtifact] {
        &self.artifacts
    }

    /// Lines of one orientation, in generation order.
    pub fn artifacts_along(&self, axis: LineAxis) -> impl Iterator<Item = &LatticeArtifact> {
        self.artifacts.iter().filter(move |a| a.axis == axis)
    }

    /// Number of attached lines.
    pub fn len(&self) -> usize {
        self.artifacts.len()
    }

    /// Whether no lines are attached.
    pub fn is_empty(&self) -> bool {
        self.artifacts.is_empty()
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::surface::HeadlessSurface;

    const TOLERANCE: f64 = 1e-9;

    fn unit_bounds() -> GeoBounds {
        GeoBounds::new(GeoPoint::new(10.0, 10.0), GeoPoint::new(0.0, 0.0))
    }

    #[test]
    fn lattice_has_21_lines_per_axis() {
        let lines = lattice_lines(&unit_bounds());
        let lats: Vec<_> = lines.iter().filter(|l| l.axis == LineAxis::Latitude).collect();
        let lngs: Vec<_> = lines.iter().filter(|l| l.axis == LineAxis::Longitude).collect();
        assert_eq!(lats.len(), 21);
        assert_eq!(lngs.len(), 21);

        assert!(lats.first().unwrap().value.abs() < TOLERANCE);
        assert!((lats.last().unwrap().value - 10.0).abs() < TOLERANCE);
        assert!((lngs.last().unwrap().value - 10.0).abs() < TOLERANCE);
    }

    #[test]
    fn lines_span_the_full_viewport() {
        let lines = lattice_lines(&unit_bounds());
        for line in &lines {
            match line.axis {
                LineAxis::Latitude => {
                    assert!(line.from.lng.abs() < TOLERANCE);
                    assert!((line.to.lng - 10.0).abs() < TOLERANCE);
                }
                LineAxis::Longitude => {
                    assert!(line.from.lat.abs() < TOLERANCE);
                    assert!((line.to.lat - 10.0).abs() < TOLERANCE);
                }
            }
        }
    }

    #[test]
    fn awkward_steps_still_give_21_lines() {
        let bounds = GeoBounds::new(GeoPoint::new(0.3, 0.7), GeoPoint::new(0.1, 0.0));
        let lines = lattice_lines(&bounds);
        assert_eq!(lines.len(), 42);
        let last_lat = lines
            .iter()
            .filter(|l| l.axis == LineAxis::Latitude)
            .last()
            .unwrap();
        assert!((last_lat.value - 0.3).abs() < TOLERANCE);
    }

    #[test]
    fn antimeridian_longitudes_are_normalized() {
        let bounds = GeoBounds::new(GeoPoint::new(10.0, -170.0), GeoPoint::new(0.0, 170.0));
        let lngs: Vec<f64> = lattice_lines(&bounds)
            .iter()
            .filter(|l| l.axis == LineAxis::Longitude)
            .map(|l| l.value)
            .collect();
        assert_eq!(lngs.len(), 21);
        assert!(lngs.iter().all(|lng| (-180.0..=180.0).contains(lng)));
        assert!((lngs.first().unwrap() - 170.0).abs() < TOLERANCE);
        assert!((lngs.last().unwrap() - -170.0).abs() < TOLERANCE);
    }

    #[test]
    fn invalid_bounds_yield_nothing() {
        let bounds = GeoBounds::new(GeoPoint::new(0.0, 0.0), GeoPoint::new(0.0, 0.0));
        assert!(lattice_lines(&bounds).is_empty());
    }

    #[test]
    fn regenerate_without_viewport_is_noop() {
        let mut surface = HeadlessSurface::new();
        let mut lattice = LatticeGenerator::new(LatticeStyle::default());
        assert!(!lattice.regenerate(&mut surface));
        assert!(lattice.is_empty());
        assert_eq!(surface.live_lines(), 0);
    }

    #[test]
    fn missing_viewport_keeps_existing_lattice() {
        let mut surface = HeadlessSurface::with_bounds(unit_bounds());
        let mut lattice = LatticeGenerator::new(LatticeStyle::default());
        assert!(lattice.regenerate(&mut surface));
        let before: Vec<LineId> = lattice.artifacts().iter().map(|a| a.id).collect();

        surface.set_bounds(None);
        assert!(!lattice.regenerate(&mut surface));
        let after: Vec<LineId> = lattice.artifacts().iter().map(|a| a.id).collect();
        assert_eq!(before, after);
        assert_eq!(surface.live_lines(), 42);
    }

    #[test]
    fn regenerate_replaces_whole_set() {
        let mut surface = HeadlessSurface::with_bounds(unit_bounds());
        let mut lattice = LatticeGenerator::new(LatticeStyle::default());
        lattice.regenerate(&mut surface);
        let first: Vec<LineId> = lattice.artifacts().iter().map(|a| a.id).collect();

        surface.set_bounds(Some(GeoBounds::new(
            GeoPoint::new(20.0, 20.0),
            GeoPoint::new(5.0, 5.0),
        )));
        lattice.regenerate(&mut surface);

        assert_eq!(lattice.len(), 42);
        assert_eq!(surface.live_lines(), 42);
        assert!(first.iter().all(|id| surface.line(*id).is_none()));
        assert_eq!(surface.stats().lines_removed, 42);
        let first_lat = lattice.artifacts_along(LineAxis::Latitude).next().unwrap();
        assert!((first_lat.value - 5.0).abs() < TOLERANCE);
    }

    #[test]
    fn refused_lines_are_skipped() {
        let mut surface = HeadlessSurface::with_bounds(unit_bounds());
        surface.refuse_attachments(true);
        let mut lattice = LatticeGenerator::new(LatticeStyle::default());
        assert!(lattice.regenerate(&mut surface));
        assert!(lattice.is_empty());
    }

    #[test]
    fn visibility_toggle_keeps_artifacts() {
        let mut surface = HeadlessSurface::with_bounds(unit_bounds());
        let mut lattice = LatticeGenerator::new(LatticeStyle::default());
        lattice.regenerate(&mut surface);
        let ids: Vec<LineId> = lattice.artifacts().iter().map(|a| a.id).collect();
        let added = surface.stats().lines_added;

        lattice.set_visible(&mut surface, false);
        assert!(ids.iter().all(|id| !surface.line(*id).unwrap().visible));

        lattice.set_visible(&mut surface, true);
        assert!(ids.iter().all(|id| surface.line(*id).unwrap().visible));
        assert_eq!(surface.stats().lines_added, added);
        assert_eq!(surface.stats().lines_removed, 0);
    }

    #[test]
    fn hidden_flag_carries_into_new_lines() {
        let mut surface = HeadlessSurface::with_bounds(unit_bounds());
        let mut lattice = LatticeGenerator::new(LatticeStyle::default());
        lattice.set_visible(&mut surface, false);
        lattice.regenerate(&mut surface);
        assert!(surface.lines().all(|(_, line)| !line.visible));
    }
}
