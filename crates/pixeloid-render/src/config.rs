use pixeloid_core::{Offset, VertexCoordinate, ViewportSize, ZoomLevel};
use serde::{Deserialize, Serialize};

/// Startup parameters for a [`ViewportEngine`](crate::ViewportEngine).
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ViewportConfig {
    pub viewport_width: u32,
    pub viewport_height: u32,
    pub max_zoom_level: u32,
    /// Expected to be integral; fractional values are snapped with a warning.
    pub initial_offset: [f64; 2],
}

impl Default for ViewportConfig {
    fn default() -> Self {
        Self {
            viewport_width: 1400,
            viewport_height: 900,
            max_zoom_level: 64,
            initial_offset: [0.0, 0.0],
        }
    }
}

impl ViewportConfig {
    pub fn viewport(&self) -> ViewportSize {
        ViewportSize::new(self.viewport_width, self.viewport_height)
    }

    pub fn max_zoom(&self) -> ZoomLevel {
        ZoomLevel::clamped(i64::from(self.max_zoom_level))
    }

    pub fn initial_offset(&self) -> Offset {
        let [x, y] = self.initial_offset;
        Offset::realign(VertexCoordinate::new(x, y))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_partial_config_uses_defaults() {
        let config: ViewportConfig = serde_json::from_str(r#"{ "viewport_width": 640 }"#).unwrap();
        assert_eq!(config.viewport(), ViewportSize::new(640, 900));
        assert_eq!(config.max_zoom().get(), 64);
    }

    #[test]
    fn test_fractional_offset_is_snapped() {
        let config = ViewportConfig {
            initial_offset: [2.6, -1.2],
            ..Default::default()
        };
        assert_eq!(config.initial_offset(), Offset::new(3, -1));
    }

    #[test]
    fn test_zero_max_zoom_falls_back_to_base() {
        let config = ViewportConfig {
            max_zoom_level: 0,
            ..Default::default()
        };
        assert_eq!(config.max_zoom(), ZoomLevel::BASE);
    }
}
