//! Shared type definitions for the GridWorld overlay.
//!
//! This crate is the single source of truth for everything that crosses the
//! boundary between the overlay core, the controller, and the map hook in
//! the browser. Types flow to `TypeScript` via `ts-rs`.
//!
//! # Modules
//!
//! - [`ids`] -- String identifier wrappers ([`PacId`])
//! - [`enums`] -- Visibility toggles and lattice line axes
//! - [`structs`] -- Geographic primitives, the [`Pac`] entity, mount params
//! - [`events`] -- Inbound snapshot and toggle events
//! - [`intents`] -- Outbound place/move/remove intents
//! - [`error`] -- Validation errors for snapshot elements

pub mod enums;
pub mod error;
pub mod events;
pub mod ids;
pub mod intents;
pub mod structs;

// Re-export all public types at crate root for convenience.
pub use enums::{LineAxis, OverlayToggle};
pub use error::InvalidPac;
pub use events::{InboundEvent, SnapshotPayload, ToggleEvent};
pub use ids::PacId;
pub use intents::{Intent, MoveIntent, PlaceIntent, RemoveIntent};
pub use structs::{GeoBounds, GeoPoint, GridCoords, MountParams, Pac, normalize_lng};
