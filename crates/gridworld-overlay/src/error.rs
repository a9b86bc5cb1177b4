//! Error types for the rendering-surface boundary.
//!
//! Nothing in this crate lets a [`SurfaceError`] escape an event handler:
//! the lattice generator and the reconciler log it and carry on.

/// Errors reported by a [`RenderSurface`](crate::surface::RenderSurface).
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum SurfaceError {
    /// The surface refused to attach a primitive.
    #[error("failed to attach {primitive}: {reason}")]
    Attach {
        /// Kind of primitive (`polyline`, `marker`).
        primitive: &'static str,
        /// Surface-provided reason.
        reason: String,
    },

    /// The primitive id does not exist on the surface.
    #[error("unknown {primitive} {id}")]
    Unknown {
        /// Kind of primitive.
        primitive: &'static str,
        /// The id that was not found.
        id: u64,
    },
}
