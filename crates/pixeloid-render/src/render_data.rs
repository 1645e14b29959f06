use pixeloid_core::{ObjectId, Offset, PixeloidCoordinate, PixeloidRect, VertexRect, ZoomLevel};
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::camera::CameraViewport;
use crate::routing::{LayerVisibility, RoutingState};

/// Errors a render backend may report for a pass it cannot accept.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum BackendError {
    #[error("Degenerate rectangle {width}x{height}")]
    DegenerateRect { width: f64, height: f64 },

    #[error("Backend rejected pass: {0}")]
    Rejected(String),
}

/// Fixed-scale draw of the sampling layer.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SamplingPass {
    pub window: PixeloidRect,
    /// Always 1.
    pub scale: u32,
    /// Always (0, 0).
    pub origin: PixeloidCoordinate,
}

/// Where the mirror layer takes its pixels from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum MirrorSource {
    SamplingLayer,
}

/// Display-layer draw: a crop of the mirrored content at `scale`.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct MirrorPass {
    pub source_rect: VertexRect,
    pub scale: u32,
    pub source: MirrorSource,
}

/// Visible objects inside the sampling window, in draw order.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ObjectPass {
    pub window: PixeloidRect,
    pub objects: Vec<ObjectId>,
}

/// Sink for the rectangles the scheduler produces.
///
/// The core never issues drawing primitives; a backend turns these passes
/// into whatever texture and draw calls it needs.
pub trait RenderBackend {
    fn present_sampling(&mut self, pass: &SamplingPass) -> Result<(), BackendError>;
    fn present_mirror(&mut self, pass: &MirrorPass) -> Result<(), BackendError>;
    fn present_visibility(&mut self, visibility: LayerVisibility) -> Result<(), BackendError>;
    fn present_objects(&mut self, pass: &ObjectPass) -> Result<(), BackendError>;
}

/// Snapshot of everything a renderer may read about the viewport.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ViewportReadModel {
    /// Committed offset of the active controller.
    pub offset: Offset,
    /// Display-local vertex to pixeloid translation.
    pub world_offset: Offset,
    pub zoom_level: ZoomLevel,
    pub routing: RoutingState,
    pub sampling_window: PixeloidRect,
    pub camera_viewport: Option<CameraViewport>,
    pub mirror_rect: VertexRect,
    pub visibility: LayerVisibility,
}

impl ViewportReadModel {
    pub fn to_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string_pretty(self)
    }
}
