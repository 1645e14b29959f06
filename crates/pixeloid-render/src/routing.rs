//! Exclusive routing of pan input between the two viewport controllers.
//!
//! The active controller is carried in the [`RoutingMode`] variant itself, so
//! "both active" and "neither active" cannot be expressed. Only zoom level
//! changes move between variants.

use pixeloid_core::{
    to_pixeloid, Offset, PixeloidCoordinate, VertexCoordinate, VertexRect, ViewportError,
    ViewportSize, ZoomLevel,
};
use serde::{Deserialize, Serialize};

use crate::camera::{CameraViewport, CameraViewportController};
use crate::events::{PanEvent, ZoomEvent};
use crate::sampling::SamplingWindowController;

/// Which controller currently owns pan input.
#[derive(Debug, Clone)]
pub enum RoutingMode {
    /// Zoom level 1: the sampling window pans.
    AtBase,
    /// Zoom level >= 2: the camera pans.
    Zoomed(CameraViewportController),
}

/// Tag-only view of [`RoutingMode`] for reporting.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum RoutingState {
    AtBase,
    Zoomed,
}

/// Controller that received a routed event.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ControllerKind {
    SamplingWindow,
    CameraViewport,
}

impl ControllerKind {
    pub fn name(&self) -> &'static str {
        match self {
            ControllerKind::SamplingWindow => "sampling window",
            ControllerKind::CameraViewport => "camera viewport",
        }
    }
}

/// Which layers the backend should draw.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct LayerVisibility {
    pub sampling_layer_visible: bool,
    pub mirror_layer_visible: bool,
}

impl LayerVisibility {
    pub fn for_zoom(zoom: ZoomLevel) -> Self {
        Self {
            sampling_layer_visible: zoom.is_base(),
            mirror_layer_visible: true,
        }
    }
}

/// Result of applying a zoom step.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ZoomOutcome {
    pub previous: ZoomLevel,
    pub current: ZoomLevel,
}

impl ZoomOutcome {
    pub fn changed(&self) -> bool {
        self.previous != self.current
    }

    pub fn crossed_base(&self) -> bool {
        self.previous.is_base() != self.current.is_base()
    }
}

#[derive(Debug, Clone)]
pub struct InputRouter {
    sampling: SamplingWindowController,
    mode: RoutingMode,
    max_zoom: ZoomLevel,
}

impl InputRouter {
    pub fn new(sampling: SamplingWindowController, max_zoom: ZoomLevel) -> Self {
        Self {
            sampling,
            mode: RoutingMode::AtBase,
            max_zoom,
        }
    }

    pub fn state(&self) -> RoutingState {
        match self.mode {
            RoutingMode::AtBase => RoutingState::AtBase,
            RoutingMode::Zoomed(_) => RoutingState::Zoomed,
        }
    }

    pub fn mode(&self) -> &RoutingMode {
        &self.mode
    }

    pub fn sampling(&self) -> &SamplingWindowController {
        &self.sampling
    }

    pub fn camera(&self) -> Option<&CameraViewportController> {
        match &self.mode {
            RoutingMode::AtBase => None,
            RoutingMode::Zoomed(camera) => Some(camera),
        }
    }

    pub fn max_zoom(&self) -> ZoomLevel {
        self.max_zoom
    }

    pub fn zoom_level(&self) -> ZoomLevel {
        match &self.mode {
            RoutingMode::AtBase => ZoomLevel::BASE,
            RoutingMode::Zoomed(camera) => camera.zoom(),
        }
    }

    /// Offset owned by the controller that currently accepts pan input.
    pub fn active_offset(&self) -> Offset {
        match &self.mode {
            RoutingMode::AtBase => self.sampling.offset(),
            RoutingMode::Zoomed(camera) => camera.offset(),
        }
    }

    /// Offset from display-local vertex space to pixeloid space.
    pub fn world_offset(&self) -> Offset {
        match &self.mode {
            RoutingMode::AtBase => self.sampling.offset(),
            RoutingMode::Zoomed(camera) => self.sampling.offset() + camera.offset(),
        }
    }

    pub fn visibility(&self) -> LayerVisibility {
        LayerVisibility::for_zoom(self.zoom_level())
    }

    /// Rectangle the mirror layer presents: all sampled content at the base
    /// level, the camera viewport otherwise.
    pub fn mirror_rect(&self) -> VertexRect {
        match &self.mode {
            RoutingMode::AtBase => {
                let size = self.sampling.viewport().as_vertex();
                VertexRect::new(VertexCoordinate::ZERO, size.x, size.y)
            }
            RoutingMode::Zoomed(camera) => camera.viewport_rect().rect,
        }
    }

    pub fn camera_viewport(&self) -> Option<CameraViewport> {
        self.camera().map(CameraViewportController::viewport_rect)
    }

    /// Pixeloid under a point on the display layer.
    pub fn pixeloid_at(&self, display: VertexCoordinate) -> PixeloidCoordinate {
        let local = display.scale(1.0 / self.zoom_level().factor());
        to_pixeloid(local, self.world_offset())
    }

    /// Forward a pan to exactly one controller.
    pub fn route_pan(&mut self, event: PanEvent) -> ControllerKind {
        match &mut self.mode {
            RoutingMode::AtBase => {
                self.sampling.queue_pan(event.delta());
                ControllerKind::SamplingWindow
            }
            RoutingMode::Zoomed(camera) => {
                camera.queue_pan(event.delta());
                ControllerKind::CameraViewport
            }
        }
    }

    pub fn has_pending_pan(&self) -> bool {
        match &self.mode {
            RoutingMode::AtBase => self.sampling.has_pending_pan(),
            RoutingMode::Zoomed(camera) => camera.has_pending_pan(),
        }
    }

    /// Commit the active controller's queued pan. Returns the new offset if
    /// it moved.
    pub fn commit_pending(&mut self) -> Option<Offset> {
        match &mut self.mode {
            RoutingMode::AtBase => self.sampling.commit_pending(),
            RoutingMode::Zoomed(camera) => camera.commit_pending(),
        }
    }

    /// Apply a single ±1 zoom step anchored at the event's cursor.
    pub fn apply_zoom(&mut self, event: ZoomEvent) -> ZoomOutcome {
        let previous = self.zoom_level();
        let target = previous.step(event.direction, self.max_zoom);
        self.zoom_to(event.cursor_vertex, target);
        ZoomOutcome {
            previous,
            current: self.zoom_level(),
        }
    }

    /// Walk to `requested` one level at a time.
    ///
    /// Requests below 1 are clamped to 1, above the cap to the cap.
    pub fn request_zoom_level(&mut self, requested: i64, cursor: VertexCoordinate) -> ZoomOutcome {
        let previous = self.zoom_level();
        let target = ZoomLevel::clamped(requested).min(self.max_zoom);
        while self.zoom_level() != target {
            let current = self.zoom_level();
            let next = if target > current {
                ZoomLevel::clamped(i64::from(current.get()) + 1)
            } else {
                ZoomLevel::clamped(i64::from(current.get()) - 1)
            };
            self.zoom_to(cursor, next);
        }
        ZoomOutcome {
            previous,
            current: self.zoom_level(),
        }
    }

    /// Drop back to the base level with the sampling window at `offset`.
    pub fn reset(&mut self, offset: Offset) {
        if let RoutingMode::Zoomed(camera) = &mut self.mode {
            discard_stale(ControllerKind::CameraViewport, camera.discard_gesture());
            log::info!("Routing reset: Zoomed -> AtBase");
        }
        self.mode = RoutingMode::AtBase;
        discard_stale(ControllerKind::SamplingWindow, self.sampling.discard_gesture());
        self.sampling.set_offset(offset);
    }

    pub fn resize(&mut self, viewport: ViewportSize) {
        self.sampling.resize(viewport);
        if let RoutingMode::Zoomed(camera) = &mut self.mode {
            camera.resize(viewport);
        }
    }

    fn zoom_to(&mut self, cursor: VertexCoordinate, target: ZoomLevel) {
        let current = self.zoom_level();
        if target == current {
            return;
        }
        match &mut self.mode {
            RoutingMode::AtBase => {
                discard_stale(ControllerKind::SamplingWindow, self.sampling.discard_gesture());
                let mut camera = CameraViewportController::seeded(self.sampling.viewport());
                camera.zoom_to_cursor(cursor, target);
                log::info!("Routing AtBase -> Zoomed at level {}", target.get());
                self.mode = RoutingMode::Zoomed(camera);
            }
            RoutingMode::Zoomed(camera) if target.is_base() => {
                discard_stale(ControllerKind::CameraViewport, camera.discard_gesture());
                log::info!("Routing Zoomed -> AtBase");
                self.mode = RoutingMode::AtBase;
            }
            RoutingMode::Zoomed(camera) => {
                // Same controller stays active, so its queued pan is still valid.
                camera.commit_pending();
                camera.zoom_to_cursor(cursor, target);
            }
        }
    }
}

fn discard_stale(controller: ControllerKind, discarded: Option<VertexCoordinate>) {
    if let Some(delta) = discarded {
        let conflict = ViewportError::StaleGestureConflict {
            controller: controller.name(),
            dx: delta.x,
            dy: delta.y,
        };
        log::debug!("{conflict}");
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn router() -> InputRouter {
        let sampling = SamplingWindowController::new(ViewportSize::new(200, 100), Offset::new(10, 20));
        InputRouter::new(sampling, ZoomLevel::new(8).unwrap())
    }

    #[test]
    fn test_base_routes_to_sampling_only() {
        let mut router = router();
        assert_eq!(router.route_pan(PanEvent::new(3.0, 0.0)), ControllerKind::SamplingWindow);
        assert!(router.camera().is_none());
        assert_eq!(router.commit_pending(), Some(Offset::new(13, 20)));
        assert_eq!(
            router.visibility(),
            LayerVisibility {
                sampling_layer_visible: true,
                mirror_layer_visible: true
            }
        );
        assert_eq!(router.mirror_rect(), VertexRect::new(VertexCoordinate::ZERO, 200.0, 100.0));
    }

    #[test]
    fn test_zoomed_routes_to_camera_only() {
        let mut router = router();
        router.apply_zoom(ZoomEvent::zoom_in(0.0, 0.0));
        assert_eq!(router.state(), RoutingState::Zoomed);

        assert_eq!(router.route_pan(PanEvent::new(5.0, 5.0)), ControllerKind::CameraViewport);
        router.commit_pending();
        assert_eq!(router.sampling().offset(), Offset::new(10, 20));
        assert_eq!(router.active_offset(), Offset::new(5, 5));
        assert_eq!(router.world_offset(), Offset::new(15, 25));
        assert!(!router.visibility().sampling_layer_visible);
        assert!(router.visibility().mirror_layer_visible);
    }

    #[test]
    fn test_entering_zoom_discards_sampling_gesture() {
        let mut router = router();
        router.route_pan(PanEvent::new(40.0, -40.0));
        let outcome = router.apply_zoom(ZoomEvent::zoom_in(0.0, 0.0));

        assert!(outcome.crossed_base());
        assert!(!router.sampling().has_pending_pan());
        assert_eq!(router.commit_pending(), None);
        assert_eq!(router.active_offset(), Offset::ZERO);
        assert_eq!(router.sampling().offset(), Offset::new(10, 20));
    }

    #[test]
    fn test_leaving_zoom_discards_camera_gesture() {
        let mut router = router();
        router.apply_zoom(ZoomEvent::zoom_in(0.0, 0.0));
        router.route_pan(PanEvent::new(9.0, 9.0));
        router.apply_zoom(ZoomEvent::zoom_out(0.0, 0.0));

        assert_eq!(router.state(), RoutingState::AtBase);
        assert_eq!(router.commit_pending(), None);
        assert_eq!(router.active_offset(), Offset::new(10, 20));
    }

    #[test]
    fn test_zoom_within_zoomed_keeps_camera_pan() {
        let mut router = router();
        router.apply_zoom(ZoomEvent::zoom_in(0.0, 0.0));
        router.route_pan(PanEvent::new(4.0, 0.0));
        router.apply_zoom(ZoomEvent::zoom_in(0.0, 0.0));

        assert_eq!(router.zoom_level().get(), 3);
        assert_eq!(router.active_offset(), Offset::new(4, 0));
    }

    #[test]
    fn test_pixeloid_under_cursor_survives_transition() {
        let mut router = router();
        let cursor = VertexCoordinate::new(64.0, 32.0);
        let before = router.pixeloid_at(cursor);
        router.apply_zoom(ZoomEvent {
            cursor_vertex: cursor,
            direction: pixeloid_core::ZoomDirection::In,
        });
        assert_eq!(router.pixeloid_at(cursor), before);
    }

    #[test]
    fn test_request_zoom_level_clamps() {
        let mut router = router();
        let outcome = router.request_zoom_level(50, VertexCoordinate::ZERO);
        assert_eq!(outcome.current.get(), 8);

        let outcome = router.request_zoom_level(-2, VertexCoordinate::ZERO);
        assert_eq!(outcome.current, ZoomLevel::BASE);
        assert_eq!(router.state(), RoutingState::AtBase);
    }

    #[test]
    fn test_zoom_in_at_cap_is_noop() {
        let sampling = SamplingWindowController::new(ViewportSize::new(10, 10), Offset::ZERO);
        let mut router = InputRouter::new(sampling, ZoomLevel::new(2).unwrap());
        assert!(router.apply_zoom(ZoomEvent::zoom_in(1.0, 1.0)).changed());
        assert!(!router.apply_zoom(ZoomEvent::zoom_in(1.0, 1.0)).changed());
    }
}
