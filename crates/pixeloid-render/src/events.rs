use pixeloid_core::{VertexCoordinate, ZoomDirection};
use serde::{Deserialize, Serialize};

/// Pan (drag or WASD) by a vertex-space delta.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PanEvent {
    pub dx: f64,
    pub dy: f64,
}

impl PanEvent {
    pub fn new(dx: f64, dy: f64) -> Self {
        Self { dx, dy }
    }

    pub fn delta(&self) -> VertexCoordinate {
        VertexCoordinate::new(self.dx, self.dy)
    }
}

/// One zoom step anchored at the cursor.
///
/// `cursor_vertex` is the cursor position on the display layer, in unscaled
/// display pixels. At zoom level 1 this coincides with sampling vertex space.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ZoomEvent {
    pub cursor_vertex: VertexCoordinate,
    pub direction: ZoomDirection,
}

impl ZoomEvent {
    pub fn zoom_in(x: f64, y: f64) -> Self {
        Self {
            cursor_vertex: VertexCoordinate::new(x, y),
            direction: ZoomDirection::In,
        }
    }

    pub fn zoom_out(x: f64, y: f64) -> Self {
        Self {
            cursor_vertex: VertexCoordinate::new(x, y),
            direction: ZoomDirection::Out,
        }
    }
}

/// The only two input kinds the viewport core accepts.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub enum InputEvent {
    Pan(PanEvent),
    Zoom(ZoomEvent),
}

impl From<PanEvent> for InputEvent {
    fn from(event: PanEvent) -> Self {
        InputEvent::Pan(event)
    }
}

impl From<ZoomEvent> for InputEvent {
    fn from(event: ZoomEvent) -> Self {
        InputEvent::Zoom(event)
    }
}

/// Pan deltas a controller has received but not yet committed.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct PanGesture {
    accumulated: VertexCoordinate,
    events: u32,
}

impl PanGesture {
    pub fn push(&mut self, delta: VertexCoordinate) {
        // Non-finite deltas would poison the offset.
        if !delta.is_finite() {
            log::warn!("Ignoring non-finite pan delta {delta:?}");
            return;
        }
        self.accumulated = self.accumulated + delta;
        self.events += 1;
    }

    pub fn is_idle(&self) -> bool {
        self.events == 0
    }

    pub fn event_count(&self) -> u32 {
        self.events
    }

    /// Take the summed delta, leaving the gesture idle.
    pub fn take(&mut self) -> Option<VertexCoordinate> {
        if self.is_idle() {
            return None;
        }
        let delta = self.accumulated;
        *self = Self::default();
        Some(delta)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_gesture_sums_and_resets() {
        let mut gesture = PanGesture::default();
        assert_eq!(gesture.take(), None);

        gesture.push(VertexCoordinate::new(0.4, 1.0));
        gesture.push(VertexCoordinate::new(0.4, -3.0));
        gesture.push(VertexCoordinate::new(f64::NAN, 0.0));
        assert_eq!(gesture.event_count(), 2);

        let delta = gesture.take().unwrap();
        assert!((delta.x - 0.8).abs() < 1e-12);
        assert!((delta.y + 2.0).abs() < 1e-12);
        assert!(gesture.is_idle());
    }
}
