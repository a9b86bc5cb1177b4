//! Parsing of the mount attributes the host element carries.
//!
//! The host page renders the map container with three string attributes:
//! the region id, the initial center as a JSON object, and the zoom level.
//! They are read once when the overlay is mounted.

use gridworld_types::{GeoPoint, MountParams};

/// Errors raised while parsing mount attributes.
#[derive(Debug, thiserror::Error)]
pub enum MountError {
    /// The region attribute is empty.
    #[error("region attribute is empty")]
    EmptyRegion,

    /// The center attribute is not a `{"lat":..,"lng":..}` object.
    #[error("invalid center attribute: {source}")]
    Center {
        /// The underlying JSON error.
        #[from]
        source: serde_json::Error,
    },

    /// The center has non-finite or out-of-range coordinates.
    #[error("center {lat}, {lng} is not a valid position")]
    CenterOutOfRange {
        /// Parsed latitude.
        lat: f64,
        /// Parsed longitude.
        lng: f64,
    },

    /// The zoom attribute is not an integer in `0..=22`.
    #[error("invalid zoom attribute {value:?}")]
    Zoom {
        /// The raw attribute value.
        value: String,
    },
}

/// Highest zoom level a map surface supports.
pub const MAX_ZOOM: u8 = 22;

/// Parse all three mount attributes.
///
/// # Errors
///
/// Returns the first attribute that fails to parse.
pub fn parse_mount_params(region: &str, center: &str, zoom: &str) -> Result<MountParams, MountError> {
    Ok(MountParams {
        region: parse_region(region)?,
        center: parse_center(center)?,
        zoom: parse_zoom(zoom)?,
    })
}

/// Parse the region attribute.
///
/// # Errors
///
/// Returns [`MountError::EmptyRegion`] for a blank value.
pub fn parse_region(raw: &str) -> Result<String, MountError> {
    let region = raw.trim();
    if region.is_empty() {
        return Err(MountError::EmptyRegion);
    }
    Ok(region.to_owned())
}

/// Parse the center attribute.
///
/// # Errors
///
/// Returns [`MountError::Center`] for malformed JSON or
/// [`MountError::CenterOutOfRange`] for an impossible position.
pub fn parse_center(raw: &str) -> Result<GeoPoint, MountError> {
    let center: GeoPoint = serde_json::from_str(raw)?;
    let in_range = center.is_finite()
        && (-90.0..=90.0).contains(&center.lat)
        && (-180.0..=180.0).contains(&center.lng);
    if !in_range {
        return Err(MountError::CenterOutOfRange {
            lat: center.lat,
            lng: center.lng,
        });
    }
    Ok(center)
}

/// Parse the zoom attribute.
///
/// # Errors
///
/// Returns [`MountError::Zoom`] if the value is not an integer in range.
pub fn parse_zoom(raw: &str) -> Result<u8, MountError> {
    raw.trim()
        .parse::<u8>()
        .ok()
        .filter(|zoom| *zoom <= MAX_ZOOM)
        .ok_or_else(|| MountError::Zoom {
            value: raw.to_owned(),
        })
}
