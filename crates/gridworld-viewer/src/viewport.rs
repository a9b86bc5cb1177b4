//! Initial viewport of the headless surface.
//!
//! A real map derives its bounds from the center, the zoom level, and the
//! size of its container. The viewer has no map, so it approximates the
//! same thing on a 256-pixel web-mercator tile pyramid, treating degrees as
//! linear in both axes.

use gridworld_overlay::config::MapConfig;
use gridworld_types::{GeoBounds, GeoPoint, normalize_lng};

/// Edge length of one zoom-0 tile in pixels.
const TILE_SIZE_PX: f64 = 256.0;

/// Latitude limit of the web-mercator projection.
const MAX_MERCATOR_LAT: f64 = 85.051_128;

/// Degrees covered by one pixel at a zoom level.
pub fn degrees_per_pixel(zoom: u8) -> f64 {
    360.0 / (TILE_SIZE_PX * f64::from(zoom).exp2())
}

/// Bounds of a `width_px` by `height_px` viewport centered on `map.center`.
pub fn initial_bounds(map: &MapConfig) -> GeoBounds {
    let per_px = degrees_per_pixel(map.zoom);
    let half_lat = f64::from(map.height_px) * per_px / 2.0;
    let half_lng = f64::from(map.width_px) * per_px / 2.0;
    let center = map.center;
    let center_lat = center.lat.clamp(-MAX_MERCATOR_LAT, MAX_MERCATOR_LAT);

    let ne_lat = (center_lat + half_lat).min(MAX_MERCATOR_LAT);
    let sw_lat = (center_lat - half_lat).max(-MAX_MERCATOR_LAT);

    let (ne_lng, sw_lng) = if half_lng >= 180.0 {
        (180.0, -180.0)
    } else {
        (
            normalize_lng(center.lng + half_lng),
            normalize_lng(center.lng - half_lng),
        )
    };

    GeoBounds::new(GeoPoint::new(ne_lat, ne_lng), GeoPoint::new(sw_lat, sw_lng))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn map(lat: f64, lng: f64, zoom: u8) -> MapConfig {
        MapConfig {
            center: GeoPoint::new(lat, lng),
            zoom,
            ..MapConfig::default()
        }
    }

    #[test]
    fn default_map_spans_half_the_world() {
        let bounds = initial_bounds(&MapConfig::default());
        assert!((bounds.ne.lng - 90.0).abs() < 1e-9);
        assert!((bounds.sw.lng + 90.0).abs() < 1e-9);
        assert!((bounds.ne.lat - 67.5).abs() < 1e-9);
        assert!((bounds.sw.lat + 67.5).abs() < 1e-9);
        assert!(bounds.is_valid());
    }

    #[test]
    fn low_zoom_covers_all_longitudes() {
        let bounds = initial_bounds(&map(0.0, 30.0, 0));
        assert!((bounds.lng_span() - 360.0).abs() < 1e-9);
        assert!((bounds.ne.lat - MAX_MERCATOR_LAT).abs() < 1e-9);
    }

    #[test]
    fn center_near_antimeridian_wraps() {
        let bounds = initial_bounds(&map(0.0, 170.0, 3));
        assert!(bounds.crosses_antimeridian());
        assert!((bounds.lng_span() - 180.0).abs() < 1e-9);
        assert!(bounds.is_valid());
    }

    #[test]
    fn polar_center_still_gives_valid_bounds() {
        for lat in [89.0, -89.0, 90.0] {
            let bounds = initial_bounds(&map(lat, 0.0, 18));
            assert!(bounds.is_valid(), "center lat {lat}: {bounds:?}");
            assert!(bounds.ne.lat <= MAX_MERCATOR_LAT);
            assert!(bounds.sw.lat >= -MAX_MERCATOR_LAT);
        }
    }

    #[test]
    fn zooming_in_halves_the_span() {
        let a = initial_bounds(&map(40.0, -74.0, 10));
        let b = initial_bounds(&map(40.0, -74.0, 11));
        assert!((a.lng_span() / b.lng_span() - 2.0).abs() < 1e-9);
    }
}
