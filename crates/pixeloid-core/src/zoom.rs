use serde::{Deserialize, Serialize};

use crate::error::ViewportError;

/// Integer display zoom. Level 1 shows the sampled content unscaled.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(try_from = "i64", into = "u32")]
pub struct ZoomLevel(u32);

/// Direction of a single zoom step.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ZoomDirection {
    In,
    Out,
}

impl ZoomLevel {
    pub const BASE: Self = Self(1);

    /// Accepts any level >= 1.
    pub fn new(level: i64) -> Result<Self, ViewportError> {
        if level < 1 {
            return Err(ViewportError::InvalidZoomLevel { requested: level });
        }
        Ok(Self(u32::try_from(level).unwrap_or(u32::MAX)))
    }

    /// Like [`ZoomLevel::new`], but out-of-range requests are clamped to 1
    /// and logged instead of rejected.
    pub fn clamped(level: i64) -> Self {
        Self::new(level).unwrap_or_else(|err| {
            log::warn!("{err}");
            Self::BASE
        })
    }

    pub fn get(&self) -> u32 {
        self.0
    }

    pub fn factor(&self) -> f64 {
        f64::from(self.0)
    }

    pub fn is_base(&self) -> bool {
        self.0 == 1
    }

    /// One step in `direction`, bounded to `1..=max`.
    pub fn step(&self, direction: ZoomDirection, max: ZoomLevel) -> Self {
        match direction {
            ZoomDirection::In => Self(self.0.saturating_add(1).min(max.0.max(1))),
            ZoomDirection::Out => Self(self.0.saturating_sub(1).max(1)),
        }
    }
}

impl Default for ZoomLevel {
    fn default() -> Self {
        Self::BASE
    }
}

impl TryFrom<i64> for ZoomLevel {
    type Error = ViewportError;

    fn try_from(level: i64) -> Result<Self, Self::Error> {
        Self::new(level)
    }
}

impl From<ZoomLevel> for u32 {
    fn from(level: ZoomLevel) -> u32 {
        level.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_rejects_non_positive_levels() {
        assert_eq!(
            ZoomLevel::new(0),
            Err(ViewportError::InvalidZoomLevel { requested: 0 })
        );
        assert_eq!(ZoomLevel::clamped(-3), ZoomLevel::BASE);
        assert_eq!(ZoomLevel::clamped(4).get(), 4);
    }

    #[test]
    fn test_step_is_bounded() {
        let max = ZoomLevel::new(3).unwrap();
        let two = ZoomLevel::new(2).unwrap();
        assert_eq!(two.step(ZoomDirection::In, max), max);
        assert_eq!(max.step(ZoomDirection::In, max), max);
        assert_eq!(ZoomLevel::BASE.step(ZoomDirection::Out, max), ZoomLevel::BASE);
    }

    #[test]
    fn test_serde_rejects_zero() {
        assert!(serde_json::from_str::<ZoomLevel>("0").is_err());
        let level: ZoomLevel = serde_json::from_str("5").unwrap();
        assert_eq!(level.get(), 5);
    }
}
