//! Validation errors for wire types.

use crate::ids::PacId;

/// Why a snapshot element could not be turned into a drawable PAC.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum InvalidPac {
    /// The element is not a PAC object or lacks a required field.
    #[error("malformed PAC: {0}")]
    Decode(String),

    /// The identifier is the empty string.
    #[error("PAC identifier is empty")]
    EmptyId,

    /// A numeric field is NaN or infinite.
    #[error("PAC {pac_id} has non-finite {field}")]
    NonFinite {
        /// The offending PAC.
        pac_id: PacId,
        /// Name of the field.
        field: &'static str,
    },

    /// Latitude outside `[-90, 90]`.
    #[error("PAC {pac_id} latitude {lat} out of range")]
    LatitudeOutOfRange {
        /// The offending PAC.
        pac_id: PacId,
        /// The rejected latitude.
        lat: f64,
    },

    /// Longitude outside `[-180, 180]`.
    #[error("PAC {pac_id} longitude {lng} out of range")]
    LongitudeOutOfRange {
        /// The offending PAC.
        pac_id: PacId,
        /// The rejected longitude.
        lng: f64,
    },

    /// The identifier already appeared earlier in the same snapshot.
    #[error("duplicate PAC identifier {0} in snapshot")]
    Duplicate(PacId),
}
