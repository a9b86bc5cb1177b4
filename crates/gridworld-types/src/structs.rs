//! Core data structs: geographic primitives, the PAC entity, and mount
//! parameters.

use serde::{Deserialize, Serialize};
use ts_rs::TS;

use crate::error::InvalidPac;
use crate::ids::PacId;

// ---------------------------------------------------------------------------
// Geography
// ---------------------------------------------------------------------------

/// A geographic position in floating-point degrees.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize, TS)]
#[ts(export, export_to = "bindings/")]
pub struct GeoPoint {
    /// Latitude in degrees, positive north.
    pub lat: f64,
    /// Longitude in degrees, positive east.
    pub lng: f64,
}

impl GeoPoint {
    /// Create a point from latitude and longitude.
    pub const fn new(lat: f64, lng: f64) -> Self {
        Self { lat, lng }
    }

    /// Whether both components are finite numbers.
    pub const fn is_finite(&self) -> bool {
        self.lat.is_finite() && self.lng.is_finite()
    }
}

/// A rectangular viewport given by its northeast and southwest corners.
///
/// A viewport whose northeast longitude is smaller than its southwest
/// longitude wraps across the antimeridian.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize, TS)]
#[ts(export, export_to = "bindings/")]
pub struct GeoBounds {
    /// Northeast corner.
    pub ne: GeoPoint,
    /// Southwest corner.
    pub sw: GeoPoint,
}

impl GeoBounds {
    /// Create bounds from the northeast and southwest corners.
    pub const fn new(ne: GeoPoint, sw: GeoPoint) -> Self {
        Self { ne, sw }
    }

    /// Whether the viewport wraps across the 180th meridian.
    pub fn crosses_antimeridian(&self) -> bool {
        self.ne.lng < self.sw.lng
    }

    /// Height of the viewport in degrees of latitude.
    pub fn lat_span(&self) -> f64 {
        self.ne.lat - self.sw.lat
    }

    /// Width of the viewport in degrees of longitude, unwrapped across the
    /// antimeridian.
    pub fn lng_span(&self) -> f64 {
        if self.crosses_antimeridian() {
            self.ne.lng - self.sw.lng + 360.0
        } else {
            self.ne.lng - self.sw.lng
        }
    }

    /// Whether the bounds describe a non-degenerate rectangle.
    ///
    /// Requires finite corners, a positive latitude span within the poles,
    /// and a positive longitude span of at most one full turn.
    pub fn is_valid(&self) -> bool {
        if !self.ne.is_finite() || !self.sw.is_finite() {
            return false;
        }
        let lat_span = self.lat_span();
        let lng_span = self.lng_span();
        lat_span > 0.0
            && self.ne.lat <= 90.0
            && self.sw.lat >= -90.0
            && lng_span > 0.0
            && lng_span <= 360.0
    }
}

/// Wrap a longitude back into the `[-180, 180]` range.
pub fn normalize_lng(lng: f64) -> f64 {
    if lng > 180.0 {
        lng - 360.0
    } else if lng < -180.0 {
        lng + 360.0
    } else {
        lng
    }
}

/// Local grid coordinates of a PAC. Their meaning belongs to the controller.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize, TS)]
#[ts(export, export_to = "bindings/")]
pub struct GridCoords {
    /// Grid x.
    pub x: f64,
    /// Grid y.
    pub y: f64,
    /// Grid z.
    pub z: f64,
}

// ---------------------------------------------------------------------------
// PAC
// ---------------------------------------------------------------------------

/// A positioned actor cell as delivered in an authoritative snapshot.
///
/// Every field is required on the wire. The identifier also accepts the
/// `entity_id` and `id` spellings.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[ts(export, export_to = "bindings/")]
pub struct Pac {
    /// Stable identifier, unique within a snapshot.
    #[serde(alias = "entity_id", alias = "id")]
    pub pac_id: PacId,
    /// Latitude in degrees.
    pub lat: f64,
    /// Longitude in degrees.
    pub lng: f64,
    /// Grid x coordinate.
    pub x: f64,
    /// Grid y coordinate.
    pub y: f64,
    /// Grid z coordinate.
    pub z: f64,
    /// Region the PAC belongs to; drives its color.
    pub region_id: String,
    /// Logical tick at which this state was produced.
    pub tick_id: u64,
    /// Heading in degrees, 0 to 360.
    pub heading: f64,
    /// Scalar speed.
    pub velocity: f64,
}

impl Pac {
    /// Decode and validate a PAC from one raw snapshot element.
    ///
    /// # Errors
    ///
    /// Returns [`InvalidPac::Decode`] if the element is not a PAC object
    /// with every field present, or any validation error from
    /// [`Pac::validate`].
    pub fn from_json(value: &serde_json::Value) -> Result<Self, InvalidPac> {
        let pac = Self::deserialize(value).map_err(|e| InvalidPac::Decode(e.to_string()))?;
        pac.validate()?;
        Ok(pac)
    }

    /// Check the invariants a decoded PAC must satisfy to be drawn.
    ///
    /// # Errors
    ///
    /// Returns the first violated invariant.
    pub fn validate(&self) -> Result<(), InvalidPac> {
        if self.pac_id.is_empty() {
            return Err(InvalidPac::EmptyId);
        }
        let numeric = [
            ("lat", self.lat),
            ("lng", self.lng),
            ("x", self.x),
            ("y", self.y),
            ("z", self.z),
            ("heading", self.heading),
            ("velocity", self.velocity),
        ];
        for (field, value) in numeric {
            if !value.is_finite() {
                return Err(InvalidPac::NonFinite {
                    pac_id: self.pac_id.clone(),
                    field,
                });
            }
        }
        if !(-90.0..=90.0).contains(&self.lat) {
            return Err(InvalidPac::LatitudeOutOfRange {
                pac_id: self.pac_id.clone(),
                lat: self.lat,
            });
        }
        if !(-180.0..=180.0).contains(&self.lng) {
            return Err(InvalidPac::LongitudeOutOfRange {
                pac_id: self.pac_id.clone(),
                lng: self.lng,
            });
        }
        Ok(())
    }

    /// Geographic position of the PAC.
    pub const fn position(&self) -> GeoPoint {
        GeoPoint::new(self.lat, self.lng)
    }

    /// Local grid coordinates of the PAC.
    pub const fn grid(&self) -> GridCoords {
        GridCoords {
            x: self.x,
            y: self.y,
            z: self.z,
        }
    }
}

// ---------------------------------------------------------------------------
// Mount parameters
// ---------------------------------------------------------------------------

/// Parameters read once from the host element when the overlay is mounted.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[ts(export, export_to = "bindings/")]
pub struct MountParams {
    /// Region the map is opened on.
    pub region: String,
    /// Initial map center.
    pub center: GeoPoint,
    /// Initial zoom level.
    pub zoom: u8,
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use serde_json::json;

    use super::*;

    fn pac_json() -> serde_json::Value {
        json!({
            "pac_id": "abc123def456",
            "lat": 40.7128,
            "lng": -74.006,
            "x": 1.5,
            "y": 2.25,
            "z": 0.0,
            "region_id": "sector_alpha",
            "tick_id": 17,
            "heading": 90.0,
            "velocity": 3.5
        })
    }

    #[test]
    fn decodes_complete_pac() {
        let pac = Pac::from_json(&pac_json()).unwrap();
        assert_eq!(pac.pac_id.as_str(), "abc123def456");
        assert_eq!(pac.region_id, "sector_alpha");
        assert_eq!(pac.tick_id, 17);
    }

    #[test]
    fn accepts_entity_id_alias() {
        let mut value = pac_json();
        let obj = value.as_object_mut().unwrap();
        let id = obj.remove("pac_id").unwrap();
        obj.insert("entity_id".to_owned(), id);
        let pac = Pac::from_json(&value).unwrap();
        assert_eq!(pac.pac_id.as_str(), "abc123def456");
    }

    #[test]
    fn missing_field_is_decode_error() {
        let mut value = pac_json();
        value.as_object_mut().unwrap().remove("region_id");
        let err = Pac::from_json(&value).unwrap_err();
        assert!(matches!(err, InvalidPac::Decode(_)));
    }

    #[test]
    fn non_object_is_decode_error() {
        let err = Pac::from_json(&json!("not a pac")).unwrap_err();
        assert!(matches!(err, InvalidPac::Decode(_)));
    }

    #[test]
    fn empty_id_is_rejected() {
        let mut value = pac_json();
        value["pac_id"] = json!("");
        assert!(matches!(
            Pac::from_json(&value).unwrap_err(),
            InvalidPac::EmptyId
        ));
    }

    #[test]
    fn out_of_range_latitude_is_rejected() {
        let mut value = pac_json();
        value["lat"] = json!(91.0);
        assert!(matches!(
            Pac::from_json(&value).unwrap_err(),
            InvalidPac::LatitudeOutOfRange { .. }
        ));
    }

    #[test]
    fn non_finite_field_is_rejected() {
        let mut pac = Pac::from_json(&pac_json()).unwrap();
        pac.velocity = f64::NAN;
        assert!(matches!(
            pac.validate().unwrap_err(),
            InvalidPac::NonFinite {
                field: "velocity",
                ..
            }
        ));
    }

    #[test]
    fn bounds_spans_and_validity() {
        let bounds = GeoBounds::new(GeoPoint::new(10.0, 10.0), GeoPoint::new(0.0, 0.0));
        assert!(bounds.is_valid());
        assert!((bounds.lat_span() - 10.0).abs() < 1e-12);
        assert!((bounds.lng_span() - 10.0).abs() < 1e-12);
    }

    #[test]
    fn degenerate_bounds_are_invalid() {
        let flat = GeoBounds::new(GeoPoint::new(0.0, 10.0), GeoPoint::new(0.0, 0.0));
        assert!(!flat.is_valid());
        let nan = GeoBounds::new(GeoPoint::new(f64::NAN, 10.0), GeoPoint::new(0.0, 0.0));
        assert!(!nan.is_valid());
    }

    #[test]
    fn antimeridian_bounds_unwrap_longitude_span() {
        let bounds = GeoBounds::new(GeoPoint::new(10.0, -170.0), GeoPoint::new(0.0, 170.0));
        assert!(bounds.crosses_antimeridian());
        assert!(bounds.is_valid());
        assert!((bounds.lng_span() - 20.0).abs() < 1e-9);
    }

    #[test]
    fn normalize_wraps_past_the_antimeridian() {
        assert!((normalize_lng(190.0) - -170.0).abs() < 1e-12);
        assert!((normalize_lng(-190.0) - 170.0).abs() < 1e-12);
        assert!((normalize_lng(180.0) - 180.0).abs() < 1e-12);
    }
}
