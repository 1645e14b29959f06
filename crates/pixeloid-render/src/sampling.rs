use pixeloid_core::{Offset, PixeloidCoordinate, PixeloidRect, VertexCoordinate, ViewportSize};

use crate::events::PanGesture;

/// Owns the fixed-scale sampling rectangle.
///
/// Authoritative only at zoom level 1. It always renders at scale 1 from draw
/// origin (0, 0) and never applies a zoom transform of its own.
#[derive(Debug, Clone)]
pub struct SamplingWindowController {
    offset: Offset,
    viewport: ViewportSize,
    gesture: PanGesture,
}

impl SamplingWindowController {
    pub const SCALE: u32 = 1;
    pub const DRAW_ORIGIN: VertexCoordinate = VertexCoordinate::ZERO;

    pub fn new(viewport: ViewportSize, offset: Offset) -> Self {
        Self {
            offset,
            viewport,
            gesture: PanGesture::default(),
        }
    }

    pub fn offset(&self) -> Offset {
        self.offset
    }

    pub fn viewport(&self) -> ViewportSize {
        self.viewport
    }

    pub fn has_pending_pan(&self) -> bool {
        !self.gesture.is_idle()
    }

    /// Record a pan delta; it is committed on the next [`commit_pending`].
    ///
    /// [`commit_pending`]: SamplingWindowController::commit_pending
    pub fn queue_pan(&mut self, delta: VertexCoordinate) {
        self.gesture.push(delta);
    }

    /// Commit queued deltas as `round(offset + sum)`. Returns the new offset
    /// if it moved.
    pub fn commit_pending(&mut self) -> Option<Offset> {
        let delta = self.gesture.take()?;
        self.pan(delta)
    }

    /// Apply a delta right away. Returns the new offset if it moved.
    pub fn pan(&mut self, delta: VertexCoordinate) -> Option<Offset> {
        let next = self.offset.translated(delta);
        if next == self.offset {
            return None;
        }
        self.offset = next;
        Some(next)
    }

    /// Drop the in-flight gesture, returning what was discarded.
    pub fn discard_gesture(&mut self) -> Option<VertexCoordinate> {
        self.gesture.take()
    }

    pub fn set_offset(&mut self, offset: Offset) {
        self.offset = offset;
    }

    pub fn resize(&mut self, viewport: ViewportSize) {
        self.viewport = viewport;
    }

    /// The sampled rectangle: `rect(offset, viewport_width, viewport_height)`.
    pub fn window(&self) -> PixeloidRect {
        PixeloidRect::new(
            PixeloidCoordinate::new(self.offset.x, self.offset.y),
            self.viewport.width,
            self.viewport.height,
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_window_follows_offset() {
        let controller = SamplingWindowController::new(ViewportSize::new(100, 100), Offset::new(5, 5));
        let window = controller.window();
        assert_eq!(window.min(), PixeloidCoordinate::new(5, 5));
        assert_eq!(window.max(), PixeloidCoordinate::new(105, 105));
    }

    #[test]
    fn test_queued_pans_commit_once_rounded() {
        let mut controller = SamplingWindowController::new(ViewportSize::new(100, 100), Offset::ZERO);
        controller.queue_pan(VertexCoordinate::new(0.3, 2.0));
        controller.queue_pan(VertexCoordinate::new(0.3, -0.6));

        assert_eq!(controller.commit_pending(), Some(Offset::new(1, 1)));
        assert_eq!(controller.commit_pending(), None);
        assert_eq!(controller.offset(), Offset::new(1, 1));
    }

    #[test]
    fn test_sub_pixeloid_pan_does_not_move() {
        let mut controller = SamplingWindowController::new(ViewportSize::new(10, 10), Offset::new(-3, 8));
        assert_eq!(controller.pan(VertexCoordinate::new(0.2, -0.4)), None);
        assert_eq!(controller.offset(), Offset::new(-3, 8));
    }

    #[test]
    fn test_discard_gesture() {
        let mut controller = SamplingWindowController::new(ViewportSize::new(10, 10), Offset::ZERO);
        controller.queue_pan(VertexCoordinate::new(7.0, 0.0));
        assert!(controller.has_pending_pan());
        assert_eq!(controller.discard_gesture(), Some(VertexCoordinate::new(7.0, 0.0)));
        assert_eq!(controller.commit_pending(), None);
        assert_eq!(controller.offset(), Offset::ZERO);
    }
}
