use pixeloid_core::{to_pixeloid, Offset, VertexCoordinate, VertexRect, ViewportSize, ZoomLevel};
use serde::{Deserialize, Serialize};

use crate::events::PanGesture;

/// The zoomed display rectangle, in the vertex space of the mirrored content.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct CameraViewport {
    pub rect: VertexRect,
    /// Display pixels per vertex unit; equal to the zoom level.
    pub scale: u32,
}

/// Translation and scale of the mirror layer at zoom level >= 2.
///
/// The offset is in vertex space, relative to the origin of the mirrored
/// sampling content, and is integral after every operation.
#[derive(Debug, Clone)]
pub struct CameraViewportController {
    offset: Offset,
    zoom: ZoomLevel,
    viewport: ViewportSize,
    gesture: PanGesture,
}

impl CameraViewportController {
    /// A camera showing the complete mirrored content, unscaled.
    ///
    /// This is the state every 1 -> 2 transition starts from, before any
    /// cursor-anchored zoom math runs.
    pub fn seeded(viewport: ViewportSize) -> Self {
        Self {
            offset: Offset::ZERO,
            zoom: ZoomLevel::BASE,
            viewport,
            gesture: PanGesture::default(),
        }
    }

    pub fn offset(&self) -> Offset {
        self.offset
    }

    pub fn zoom(&self) -> ZoomLevel {
        self.zoom
    }

    pub fn viewport(&self) -> ViewportSize {
        self.viewport
    }

    pub fn has_pending_pan(&self) -> bool {
        !self.gesture.is_idle()
    }

    pub fn queue_pan(&mut self, delta: VertexCoordinate) {
        self.gesture.push(delta);
    }

    pub fn commit_pending(&mut self) -> Option<Offset> {
        let delta = self.gesture.take()?;
        self.pan(delta)
    }

    /// Apply `delta` straight to the offset and round, keeping the grid
    /// pixel-aligned at any zoom.
    pub fn pan(&mut self, delta: VertexCoordinate) -> Option<Offset> {
        let next = self.offset.translated(delta);
        if next == self.offset {
            return None;
        }
        self.offset = next;
        Some(next)
    }

    pub fn discard_gesture(&mut self) -> Option<VertexCoordinate> {
        self.gesture.take()
    }

    pub fn resize(&mut self, viewport: ViewportSize) {
        self.viewport = viewport;
    }

    /// Cursor position in camera-local vertex space at the current zoom.
    pub fn local_cursor(&self, cursor_display: VertexCoordinate) -> VertexCoordinate {
        cursor_display.scale(1.0 / self.zoom.factor())
    }

    /// Change zoom to `target`, keeping the pixeloid under the cursor fixed.
    ///
    /// The pixeloid under the cursor at the old scale is pinned, then the
    /// offset becomes `round(pinned - m')` with `m'` the cursor at the new
    /// scale. The pin is exact unless `m'` falls on a half cell, where no
    /// integer offset can reproduce it under nearest rounding.
    pub fn zoom_to_cursor(&mut self, cursor_display: VertexCoordinate, target: ZoomLevel) -> Offset {
        if target == self.zoom {
            return self.offset;
        }
        let cursor = if cursor_display.is_finite() {
            cursor_display
        } else {
            log::warn!("Non-finite zoom cursor {cursor_display:?}, anchoring at origin");
            VertexCoordinate::ZERO
        };

        let pinned = to_pixeloid(self.local_cursor(cursor), self.offset);
        let after = cursor.scale(1.0 / target.factor());
        self.offset = Offset::commit(VertexCoordinate::new(
            pinned.x as f64 - after.x,
            pinned.y as f64 - after.y,
        ));
        self.zoom = target;
        self.offset
    }

    /// The full mirrored content, as the camera sees it at zoom level 1.
    pub fn content_rect(&self) -> VertexRect {
        let size = self.viewport.as_vertex();
        VertexRect::new(VertexCoordinate::ZERO, size.x, size.y)
    }

    pub fn viewport_rect(&self) -> CameraViewport {
        let size = self.viewport.as_vertex().scale(1.0 / self.zoom.factor());
        CameraViewport {
            rect: VertexRect::new(self.offset.as_vertex(), size.x, size.y),
            scale: self.zoom.get(),
        }
    }
}

#[cfg(test)]
mod tests {
    use pixeloid_core::PixeloidCoordinate;

    use super::*;

    fn zoom(level: i64) -> ZoomLevel {
        ZoomLevel::new(level).unwrap()
    }

    fn camera_at(level: i64) -> CameraViewportController {
        let mut camera = CameraViewportController::seeded(ViewportSize::new(300, 200));
        for step in 2..=level {
            camera.zoom_to_cursor(VertexCoordinate::ZERO, zoom(step));
        }
        camera
    }

    #[test]
    fn test_seeded_camera_covers_content() {
        let camera = CameraViewportController::seeded(ViewportSize::new(300, 200));
        assert_eq!(camera.viewport_rect().rect, camera.content_rect());
        assert_eq!(camera.viewport_rect().scale, 1);
    }

    #[test]
    fn test_zoom_keeps_pixeloid_under_cursor() {
        let mut camera = camera_at(2);
        let old_offset = camera.offset();
        let cursor_display = VertexCoordinate::new(80.0, 60.0);
        let before = camera.local_cursor(cursor_display);
        assert_eq!(before, VertexCoordinate::new(40.0, 30.0));

        let new_offset = camera.zoom_to_cursor(cursor_display, zoom(3));
        let after = camera.local_cursor(cursor_display);

        assert_eq!(new_offset, Offset::new(13, 10));
        assert_eq!(
            to_pixeloid(before, old_offset),
            to_pixeloid(after, new_offset)
        );
    }

    #[test]
    fn test_fractional_cursor_keeps_pixeloid() {
        let mut camera = camera_at(2);
        let cursor = VertexCoordinate::new(1.0, 1.0);
        let pinned = to_pixeloid(camera.local_cursor(cursor), camera.offset());
        assert_eq!(pinned, PixeloidCoordinate::new(1, 1));

        camera.zoom_to_cursor(cursor, zoom(3));
        assert_eq!(to_pixeloid(camera.local_cursor(cursor), camera.offset()), pinned);
    }

    #[test]
    fn test_zoom_in_then_out_is_exact() {
        let mut camera = camera_at(2);
        camera.pan(VertexCoordinate::new(-17.0, 4.0));
        let start = camera.offset();

        let cursor = VertexCoordinate::new(124.0, 76.0);
        camera.zoom_to_cursor(cursor, zoom(3));
        assert_eq!(camera.offset(), Offset::new(4, 17));
        camera.zoom_to_cursor(cursor, zoom(2));
        assert_eq!(camera.offset(), start);
    }

    #[test]
    fn test_viewport_shrinks_with_zoom() {
        let camera = camera_at(4);
        let viewport = camera.viewport_rect();
        assert_eq!(viewport.scale, 4);
        assert!((viewport.rect.width - 75.0).abs() < 1e-12);
        assert!((viewport.rect.height - 50.0).abs() < 1e-12);
        assert!(camera.content_rect().contains_rect(&viewport.rect));
    }

    #[test]
    fn test_pan_rounds_at_any_zoom() {
        let mut camera = camera_at(3);
        camera.queue_pan(VertexCoordinate::new(1.25, 0.0));
        camera.queue_pan(VertexCoordinate::new(1.25, -0.5));
        assert_eq!(camera.commit_pending(), Some(Offset::new(3, -1)));
    }
}
