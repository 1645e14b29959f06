use serde::{Deserialize, Serialize};

use crate::coords::{PixeloidCoordinate, VertexCoordinate};

/// Size of the display viewport in device pixels.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ViewportSize {
    pub width: u32,
    pub height: u32,
}

impl ViewportSize {
    pub fn new(width: u32, height: u32) -> Self {
        Self { width, height }
    }

    pub fn as_vertex(&self) -> VertexCoordinate {
        VertexCoordinate::new(f64::from(self.width), f64::from(self.height))
    }
}

impl Default for ViewportSize {
    fn default() -> Self {
        Self::new(1400, 900)
    }
}

/// An axis-aligned rectangle on the pixeloid grid.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct PixeloidRect {
    pub origin: PixeloidCoordinate,
    pub width: u32,
    pub height: u32,
}

impl PixeloidRect {
    pub fn new(origin: PixeloidCoordinate, width: u32, height: u32) -> Self {
        Self {
            origin,
            width,
            height,
        }
    }

    pub fn min(&self) -> PixeloidCoordinate {
        self.origin
    }

    pub fn max(&self) -> PixeloidCoordinate {
        PixeloidCoordinate::new(
            self.origin.x.saturating_add(i64::from(self.width)),
            self.origin.y.saturating_add(i64::from(self.height)),
        )
    }

    pub fn is_degenerate(&self) -> bool {
        self.width == 0 || self.height == 0
    }

    pub fn contains(&self, p: PixeloidCoordinate) -> bool {
        let max = self.max();
        p.x >= self.origin.x && p.x < max.x && p.y >= self.origin.y && p.y < max.y
    }

    pub fn to_bbox(&self) -> BBox {
        let max = self.max();
        BBox::new(
            self.origin.x as f64,
            self.origin.y as f64,
            max.x as f64,
            max.y as f64,
        )
    }
}

/// A rectangle in vertex space. Sizes may be fractional when a zoomed
/// viewport does not divide the display evenly.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct VertexRect {
    pub origin: VertexCoordinate,
    pub width: f64,
    pub height: f64,
}

impl VertexRect {
    pub fn new(origin: VertexCoordinate, width: f64, height: f64) -> Self {
        Self {
            origin,
            width,
            height,
        }
    }

    pub fn max(&self) -> VertexCoordinate {
        VertexCoordinate::new(self.origin.x + self.width, self.origin.y + self.height)
    }

    pub fn is_degenerate(&self) -> bool {
        !(self.width > 0.0 && self.height > 0.0) || !self.origin.is_finite()
    }

    /// True when `other` lies entirely inside `self`.
    pub fn contains_rect(&self, other: &VertexRect) -> bool {
        let (a, b) = (self.max(), other.max());
        other.origin.x >= self.origin.x
            && other.origin.y >= self.origin.y
            && b.x <= a.x
            && b.y <= a.y
    }
}

/// Floating-point bounds of a scene object in pixeloid space.
///
/// Shapes are not snapped to the grid here; how non-axis-aligned shapes align
/// to whole pixeloids is up to the shape code.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct BBox {
    pub min_x: f64,
    pub min_y: f64,
    pub max_x: f64,
    pub max_y: f64,
}

impl BBox {
    pub fn new(x1: f64, y1: f64, x2: f64, y2: f64) -> Self {
        Self {
            min_x: x1.min(x2),
            min_y: y1.min(y2),
            max_x: x1.max(x2),
            max_y: y1.max(y2),
        }
    }

    pub fn from_points(points: &[VertexCoordinate]) -> Option<Self> {
        let first = points.first()?;
        Some(points.iter().fold(
            Self::new(first.x, first.y, first.x, first.y),
            |bb, p| Self {
                min_x: bb.min_x.min(p.x),
                min_y: bb.min_y.min(p.y),
                max_x: bb.max_x.max(p.x),
                max_y: bb.max_y.max(p.y),
            },
        ))
    }

    pub fn width(&self) -> f64 {
        self.max_x - self.min_x
    }

    pub fn height(&self) -> f64 {
        self.max_y - self.min_y
    }

    pub fn intersects(&self, other: &BBox) -> bool {
        self.min_x <= other.max_x
            && self.max_x >= other.min_x
            && self.min_y <= other.max_y
            && self.max_y >= other.min_y
    }

    pub fn union(&self, other: &BBox) -> Self {
        Self {
            min_x: self.min_x.min(other.min_x),
            min_y: self.min_y.min(other.min_y),
            max_x: self.max_x.max(other.max_x),
            max_y: self.max_y.max(other.max_y),
        }
    }
}
