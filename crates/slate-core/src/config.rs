//! Tunables shared by the viewport, interaction, and animation layers.
//!
//! Every field has a default, so a host can pass a partial JSON object
//! (`{"maxScale": 8}`) and get the rest filled in.

use crate::model::NodeKind;
use kurbo::{Size, Vec2};
use serde::{Deserialize, Serialize};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("config json: {0}")]
    Json(#[from] serde_json::Error),
    #[error("scale range {min}..{max} must be finite, positive, and ordered")]
    ScaleRange { min: f64, max: f64 },
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct CanvasConfig {
    pub min_scale: f64,
    pub max_scale: f64,
    /// Exponent step per precision-zoom wheel event (`scale *= e^±step`).
    pub wheel_zoom_step: f64,
    /// Multiplier used by the zoom-in / zoom-out shortcuts.
    pub button_zoom_factor: f64,
    /// Width floor (world units) while resizing.
    pub min_node_width: f64,
    /// World offset applied to duplicated nodes.
    pub duplicate_offset: Vec2,
    pub animation_duration_ms: f64,
    /// Padding (screen px) kept around content by zoom-to-fit.
    pub fit_padding: f64,
    /// Scale difference below which the gesture-library sync stays quiet.
    pub scale_epsilon: f64,
    /// Pan difference (px) below which the gesture-library sync stays quiet.
    pub pan_epsilon: f64,
}

impl Default for CanvasConfig {
    fn default() -> Self {
        Self {
            min_scale: 0.1,
            max_scale: 5.0,
            wheel_zoom_step: 0.1,
            button_zoom_factor: 1.2,
            min_node_width: 50.0,
            duplicate_offset: Vec2::new(30.0, 30.0),
            animation_duration_ms: 750.0,
            fit_padding: 40.0,
            scale_epsilon: 0.001,
            pan_epsilon: 0.1,
        }
    }
}

impl CanvasConfig {
    /// Parse a partial config and reject a scale range no view could satisfy.
    pub fn from_json(json: &str) -> Result<Self, ConfigError> {
        let config: Self = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        let (min, max) = (self.min_scale, self.max_scale);
        if !(min.is_finite() && max.is_finite() && min > 0.0 && min <= max) {
            return Err(ConfigError::ScaleRange { min, max });
        }
        Ok(())
    }

    /// Clamp into `[min_scale, max_scale]`. Never panics, even on a range
    /// that failed [`Self::validate`]; the upper bound wins then.
    pub fn clamp_scale(&self, scale: f64) -> f64 {
        scale.max(self.min_scale).min(self.max_scale)
    }

    /// Initial size for freshly created resizable nodes.
    pub fn default_size(&self, kind: NodeKind) -> Option<Size> {
        match kind {
            NodeKind::Image => Some(Size::new(300.0, 200.0)),
            NodeKind::Video => Some(Size::new(480.0, 270.0)),
            NodeKind::Script => Some(Size::new(400.0, 300.0)),
            NodeKind::EnhancedMath => Some(Size::new(360.0, 160.0)),
            _ => None,
        }
    }
}
