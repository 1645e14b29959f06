//! Conversions between the fixed-resolution vertex space and the integer
//! pixeloid grid.
//!
//! Everything here is a pure value type. The only stateful notion is the
//! [`Offset`], which maps the vertex-space origin onto a pixeloid position and
//! is integral by construction.

use std::ops::{Add, Neg, Sub};

use serde::{Deserialize, Serialize};

use crate::error::ViewportError;

/// Round to the nearest integer, ties away from zero.
///
/// This is the single rounding rule for every offset commit. It is odd
/// (`round_half_away(-x) == -round_half_away(x)`).
pub fn round_half_away(value: f64) -> i64 {
    value.round() as i64
}

/// A point on the world-space integer grid.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub struct PixeloidCoordinate {
    pub x: i64,
    pub y: i64,
}

impl PixeloidCoordinate {
    pub const ORIGIN: Self = Self { x: 0, y: 0 };

    pub fn new(x: i64, y: i64) -> Self {
        Self { x, y }
    }
}

/// A point in the local sampling space, before any offset is applied.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct VertexCoordinate {
    pub x: f64,
    pub y: f64,
}

impl VertexCoordinate {
    pub const ZERO: Self = Self { x: 0.0, y: 0.0 };

    pub fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }

    pub fn scale(&self, factor: f64) -> Self {
        Self::new(self.x * factor, self.y * factor)
    }

    pub fn is_finite(&self) -> bool {
        self.x.is_finite() && self.y.is_finite()
    }
}

impl Add for VertexCoordinate {
    type Output = Self;

    fn add(self, rhs: Self) -> Self {
        Self::new(self.x + rhs.x, self.y + rhs.y)
    }
}

impl Sub for VertexCoordinate {
    type Output = Self;

    fn sub(self, rhs: Self) -> Self {
        Self::new(self.x - rhs.x, self.y - rhs.y)
    }
}

/// Translation from vertex-space origin to a pixeloid position.
///
/// Always integral: there is no way to build a fractional `Offset`, every
/// constructor that accepts floats rounds with [`round_half_away`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub struct Offset {
    pub x: i64,
    pub y: i64,
}

impl Offset {
    pub const ZERO: Self = Self { x: 0, y: 0 };

    pub fn new(x: i64, y: i64) -> Self {
        Self { x, y }
    }

    /// Commit a raw translation, rounding each axis to the nearest pixeloid.
    pub fn commit(raw: VertexCoordinate) -> Self {
        Self::new(round_half_away(raw.x), round_half_away(raw.y))
    }

    /// `round(offset + delta)`.
    pub fn translated(&self, delta: VertexCoordinate) -> Self {
        Self::commit(self.as_vertex() + delta)
    }

    /// Snap a value that was expected to be integral already.
    ///
    /// A fractional input is a drift bug upstream; it is corrected and logged
    /// rather than propagated.
    pub fn realign(raw: VertexCoordinate) -> Self {
        if raw.x.fract() != 0.0 || raw.y.fract() != 0.0 {
            let drift = ViewportError::DriftDetected { x: raw.x, y: raw.y };
            log::warn!("{drift}; rounding to nearest pixeloid");
        }
        Self::commit(raw)
    }

    pub fn as_vertex(&self) -> VertexCoordinate {
        VertexCoordinate::new(self.x as f64, self.y as f64)
    }
}

// Offsets may sit anywhere on the grid, so arithmetic saturates at the
// i64 range instead of overflowing.

impl Add for Offset {
    type Output = Self;

    fn add(self, rhs: Self) -> Self {
        Self::new(self.x.saturating_add(rhs.x), self.y.saturating_add(rhs.y))
    }
}

impl Sub for Offset {
    type Output = Self;

    fn sub(self, rhs: Self) -> Self {
        Self::new(self.x.saturating_sub(rhs.x), self.y.saturating_sub(rhs.y))
    }
}

impl Neg for Offset {
    type Output = Self;

    fn neg(self) -> Self {
        Self::new(self.x.saturating_neg(), self.y.saturating_neg())
    }
}

/// `vertex + offset`, snapped to the nearest grid node.
pub fn to_pixeloid(vertex: VertexCoordinate, offset: Offset) -> PixeloidCoordinate {
    PixeloidCoordinate::new(
        round_half_away(vertex.x + offset.x as f64),
        round_half_away(vertex.y + offset.y as f64),
    )
}

/// `pixeloid - offset`.
pub fn to_vertex(pixeloid: PixeloidCoordinate, offset: Offset) -> VertexCoordinate {
    VertexCoordinate::new(
        pixeloid.x.saturating_sub(offset.x) as f64,
        pixeloid.y.saturating_sub(offset.y) as f64,
    )
}
