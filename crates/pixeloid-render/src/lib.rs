//! # Pixeloid Render Core
//!
//! Dual-layer viewport for the pixeloid canvas. The sampling layer renders a
//! window of the pixeloid grid at scale 1; the mirror layer re-presents that
//! content at integer zoom. Pan input goes to exactly one of the two
//! controllers depending on zoom level, and a dirty-state scheduler turns
//! store notifications into at most one recompute per component per frame.
//!
//! The crate never draws. It hands rectangles and visibility flags to a
//! [`RenderBackend`] implementation.

pub mod camera;
pub mod config;
pub mod engine;
pub mod events;
pub mod render_data;
pub mod routing;
pub mod sampling;
pub mod scheduler;

pub use camera::{CameraViewport, CameraViewportController};
pub use config::ViewportConfig;
pub use engine::ViewportEngine;
pub use events::{InputEvent, PanEvent, PanGesture, ZoomEvent};
pub use render_data::{
    BackendError, MirrorPass, MirrorSource, ObjectPass, RenderBackend, SamplingPass,
    ViewportReadModel,
};
pub use routing::{ControllerKind, InputRouter, LayerVisibility, RoutingMode, RoutingState, ZoomOutcome};
pub use sampling::SamplingWindowController;
pub use scheduler::{affected_components, ComponentId, DirtyLedger, RenderScheduler, TickReport};
