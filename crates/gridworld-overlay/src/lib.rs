//! Live PAC overlay for a geographic map surface.
//!
//! The overlay keeps a set of PAC markers in step with the authoritative
//! snapshots pushed by a controller, draws a reference lattice over the
//! current viewport, and turns user interaction with either into outbound
//! intents. The map itself is reached only through [`RenderSurface`].
//!
//! # Modules
//!
//! - [`bridge`] -- [`InteractionBridge`], the event router and lifecycle gate.
//! - [`config`] -- Configuration loading from `gridworld-config.yaml`.
//! - [`error`] -- Rendering surface errors.
//! - [`inspect`] -- Content of the per-PAC inspect overlay.
//! - [`lattice`] -- Viewport lattice generation.
//! - [`mount`] -- Parsing of the host element's mount attributes.
//! - [`palette`] -- Region id to marker color.
//! - [`reconcile`] -- Snapshot to marker reconciliation.
//! - [`sink`] -- [`IntentSink`] trait, [`VecSink`] and [`ChannelSink`].
//! - [`surface`] -- [`RenderSurface`] trait and [`HeadlessSurface`].

pub mod bridge;
pub mod config;
pub mod error;
pub mod inspect;
pub mod lattice;
pub mod mount;
pub mod palette;
pub mod reconcile;
pub mod sink;
pub mod surface;

pub use bridge::{InteractionBridge, SurfaceState};
pub use config::{OverlayConfig, ReconcileMode};
pub use error::SurfaceError;
pub use inspect::InspectView;
pub use lattice::LatticeGenerator;
pub use reconcile::{EntityReconciler, ReconcileReport};
pub use sink::{ChannelSink, IntentSink, VecSink};
pub use surface::{HeadlessSurface, LineId, MarkerId, RenderSurface};
